//! Format-specific document readers
//!
//! Readers turn files into ordered `(source_id, location, text)` units with
//! normalized text. Files that cannot be handled are skipped, never fatal.
//!
//! | Format | Feature | Location |
//! |--------|---------|----------|
//! | txt, md, json, csv | always | `document` |
//! | pdf | `pdf` | `page N` |
//! | xlsx, xlsm, xls, ods | `xlsx` | `sheet <name>` |
//! | pptx | `pptx` | `slide N` |

use crate::normalize::normalize_text;
use crate::ExtractorError;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One located span of normalized source text (a page, sheet, slide or whole text file)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// File name
    pub source_id: String,

    /// Location label within the file
    pub location: String,

    /// Normalized text
    pub text: String,
}

impl SourceUnit {
    /// Create a unit
    pub fn new(
        source_id: impl Into<String>,
        location: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            location: location.into(),
            text: text.into(),
        }
    }
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.txt`, `.md`, `.json`, `.csv`
    PlainText,
    /// `.pdf`
    Pdf,
    /// `.xlsx`, `.xlsm`, `.xls`, `.ods`
    Spreadsheet,
    /// `.pptx`
    Slides,
}

impl SourceFormat {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "md" | "json" | "csv" => Some(SourceFormat::PlainText),
            "pdf" => Some(SourceFormat::Pdf),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(SourceFormat::Spreadsheet),
            "pptx" => Some(SourceFormat::Slides),
            _ => None,
        }
    }
}

/// A file that was not read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    /// File name
    pub name: String,

    /// Why it was skipped
    pub reason: String,
}

/// Everything read from a documents directory
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    /// Units in file name order, then position order
    pub units: Vec<SourceUnit>,

    /// Files that were skipped
    pub skipped: Vec<SkippedSource>,
}

/// Reads supported documents into source units
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentReader;

impl DocumentReader {
    /// Create a reader
    pub fn new() -> Self {
        Self
    }

    /// Read every supported file directly under `dir`
    ///
    /// Files are visited in file name order and subdirectories are ignored.
    /// Unsupported or unreadable files are logged and recorded as skipped.
    ///
    /// # Errors
    ///
    /// Returns an error only if the directory itself cannot be listed.
    pub fn read_dir(&self, dir: &Path) -> Result<SourceSet, ExtractorError> {
        let entries = fs::read_dir(dir).map_err(|e| ExtractorError::SourceRead {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut set = SourceSet::default();
        for path in paths {
            let name = file_name(&path);
            match self.read_file(&path) {
                Ok(units) => {
                    debug!(file = %name, units = units.len(), "Read source");
                    set.units.extend(units);
                }
                Err(e) => {
                    warn!(file = %name, error = %e, "Skipping source");
                    set.skipped.push(SkippedSource {
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(set)
    }

    /// Read one file into units
    ///
    /// Units whose normalized text is empty are dropped.
    pub fn read_file(&self, path: &Path) -> Result<Vec<SourceUnit>, ExtractorError> {
        let name = file_name(path);
        match SourceFormat::from_path(path) {
            Some(SourceFormat::PlainText) => read_plain(path, &name),
            Some(SourceFormat::Pdf) => read_pdf(path, &name),
            Some(SourceFormat::Spreadsheet) => read_spreadsheet(path, &name),
            Some(SourceFormat::Slides) => read_slides(path, &name),
            None => Err(ExtractorError::UnsupportedSourceFormat(name)),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_error(path: &Path, e: impl std::fmt::Display) -> ExtractorError {
    ExtractorError::SourceRead {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ExtractorError> {
    fs::read(path).map_err(|e| read_error(path, e))
}

fn built_without(name: &str, feature: &str) -> ExtractorError {
    ExtractorError::UnsupportedSourceFormat(format!(
        "{} (built without {} support)",
        name, feature
    ))
}

fn read_plain(path: &Path, name: &str) -> Result<Vec<SourceUnit>, ExtractorError> {
    let bytes = read_bytes(path)?;
    let text = normalize_text(&String::from_utf8_lossy(&bytes));
    if text.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![SourceUnit::new(name, "document", text)])
}

#[cfg(feature = "pdf")]
fn read_pdf(path: &Path, name: &str) -> Result<Vec<SourceUnit>, ExtractorError> {
    let bytes = read_bytes(path)?;
    let raw = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| read_error(path, e))?;
    Ok(pages_to_units(name, &raw))
}

#[cfg(not(feature = "pdf"))]
fn read_pdf(_path: &Path, name: &str) -> Result<Vec<SourceUnit>, ExtractorError> {
    Err(built_without(name, "pdf"))
}

/// Split extracted PDF text on form feeds into `page N` units
#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
fn pages_to_units(name: &str, raw: &str) -> Vec<SourceUnit> {
    raw.split('\u{000c}')
        .enumerate()
        .filter_map(|(i, page)| {
            let text = normalize_text(page);
            (!text.is_empty()).then(|| SourceUnit::new(name, format!("page {}", i + 1), text))
        })
        .collect()
}

/// One unit per non-empty sheet; rows with any content become tab-separated lines
#[cfg(feature = "xlsx")]
fn read_spreadsheet(path: &Path, name: &str) -> Result<Vec<SourceUnit>, ExtractorError> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook = open_workbook_auto(path).map_err(|e| read_error(path, e))?;

    let mut units = Vec::new();
    for sheet in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| read_error(path, e))?;

        let rows: Vec<String> = range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::Empty => String::new(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|values| values.iter().any(|v| !v.trim().is_empty()))
            .map(|values| values.join("\t"))
            .collect();

        let text = normalize_text(&rows.join("\n"));
        if !text.is_empty() {
            units.push(SourceUnit::new(name, format!("sheet {}", sheet), text));
        }
    }
    Ok(units)
}

#[cfg(not(feature = "xlsx"))]
fn read_spreadsheet(_path: &Path, name: &str) -> Result<Vec<SourceUnit>, ExtractorError> {
    Err(built_without(name, "xlsx"))
}

/// One unit per non-empty slide, in slide number order
#[cfg(feature = "pptx")]
fn read_slides(path: &Path, name: &str) -> Result<Vec<SourceUnit>, ExtractorError> {
    use std::io::Read;

    let file = fs::File::open(path).map_err(|e| read_error(path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| read_error(path, e))?;

    let mut slides: Vec<(usize, String)> = archive
        .file_names()
        .filter_map(|entry| slide_number(entry).map(|n| (n, entry.to_string())))
        .collect();
    slides.sort();

    let mut units = Vec::new();
    for (number, entry) in slides {
        let mut xml = String::new();
        archive
            .by_name(&entry)
            .map_err(|e| read_error(path, e))?
            .read_to_string(&mut xml)
            .map_err(|e| read_error(path, e))?;

        let text = normalize_text(&slide_text(&xml).map_err(|e| read_error(path, e))?);
        if !text.is_empty() {
            units.push(SourceUnit::new(name, format!("slide {}", number), text));
        }
    }
    Ok(units)
}

#[cfg(not(feature = "pptx"))]
fn read_slides(_path: &Path, name: &str) -> Result<Vec<SourceUnit>, ExtractorError> {
    Err(built_without(name, "pptx"))
}

/// `ppt/slides/slide12.xml` -> 12
#[cfg(feature = "pptx")]
fn slide_number(entry: &str) -> Option<usize> {
    entry
        .strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Text runs of a slide, one line per paragraph
#[cfg(feature = "pptx")]
fn slide_text(xml: &str) -> Result<String, quick_xml::Error> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_run = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_run = true,
            Event::End(e) if e.local_name().as_ref() == b"t" => in_run = false,
            Event::End(e) if e.local_name().as_ref() == b"p" => out.push('\n'),
            Event::Text(t) if in_run => out.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(SourceFormat::from_path(Path::new("a.TXT")), Some(SourceFormat::PlainText));
        assert_eq!(SourceFormat::from_path(Path::new("b.csv")), Some(SourceFormat::PlainText));
        assert_eq!(SourceFormat::from_path(Path::new("c.pdf")), Some(SourceFormat::Pdf));
        assert_eq!(SourceFormat::from_path(Path::new("d.pptx")), Some(SourceFormat::Slides));
        assert_eq!(SourceFormat::from_path(Path::new("e.XLSX")), Some(SourceFormat::Spreadsheet));
        assert_eq!(SourceFormat::from_path(Path::new("f.docx")), None);
        assert_eq!(SourceFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_read_dir_order_and_skips() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b_notes.md", "# Notes\n\n\n\nSecond   file");
        write(&dir, "a_summary.txt", "Revenue was $5M in 2023.");
        write(&dir, "memo.docx", "binary");
        write(&dir, "empty.txt", "  \n ");
        fs::create_dir(dir.path().join("nested")).unwrap();
        write(&dir, "nested/inner.txt", "ignored");

        let set = DocumentReader::new().read_dir(dir.path()).unwrap();

        let ids: Vec<&str> = set.units.iter().map(|u| u.source_id.as_str()).collect();
        assert_eq!(ids, vec!["a_summary.txt", "b_notes.md"]);
        assert_eq!(set.units[0].location, "document");
        assert_eq!(set.units[1].text, "# Notes\n\nSecond file");

        assert_eq!(set.skipped.len(), 1);
        assert_eq!(set.skipped[0].name, "memo.docx");
    }

    #[test]
    fn test_read_dir_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = DocumentReader::new().read_dir(&dir.path().join("absent"));
        assert!(matches!(result, Err(ExtractorError::SourceRead { .. })));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("raw.txt"), [b'o', b'k', 0xff, b'!']).unwrap();
        let units = DocumentReader::new().read_file(&dir.path().join("raw.txt")).unwrap();
        assert_eq!(units[0].text, "ok\u{fffd}!");
    }

    #[test]
    fn test_pages_to_units() {
        let units = pages_to_units("report.pdf", "Page one\u{000c}\u{000c}Page  three\n");
        assert_eq!(
            units,
            vec![
                SourceUnit::new("report.pdf", "page 1", "Page one"),
                SourceUnit::new("report.pdf", "page 3", "Page three"),
            ]
        );
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_corrupt_pdf_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "broken.pdf", "not a pdf");
        let result = DocumentReader::new().read_file(&dir.path().join("broken.pdf"));
        assert!(matches!(result, Err(ExtractorError::SourceRead { .. })));
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_spreadsheet_one_unit_per_sheet() {
        use rust_xlsxwriter::Workbook;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("numbers.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Financials").unwrap();
        sheet.write_string(0, 0, "Revenue").unwrap();
        sheet.write_string(0, 1, "$5M").unwrap();
        sheet.write_string(2, 0, "Year").unwrap();
        sheet.write_string(2, 1, "2023").unwrap();
        workbook.add_worksheet().set_name("Empty").unwrap();
        workbook.save(&path).unwrap();

        let units = DocumentReader::new().read_file(&path).unwrap();
        assert_eq!(
            units,
            vec![SourceUnit::new("numbers.xlsx", "sheet Financials", "Revenue $5M\nYear 2023")]
        );
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_corrupt_spreadsheet_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "broken.xlsx", "not a workbook");
        let result = DocumentReader::new().read_file(&dir.path().join("broken.xlsx"));
        assert!(matches!(result, Err(ExtractorError::SourceRead { .. })));
    }

    #[cfg(feature = "pptx")]
    fn write_deck(path: &Path, slides: &[(&str, &str)]) {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut zip = zip::ZipWriter::new(fs::File::create(path).unwrap());
        for (entry, xml) in slides {
            zip.start_file(*entry, SimpleFileOptions::default()).unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[cfg(feature = "pptx")]
    fn slide_xml(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", p))
            .collect();
        format!(
            r#"<?xml version="1.0"?><p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:txBody>{}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
            body
        )
    }

    #[cfg(feature = "pptx")]
    #[test]
    fn test_slides_in_number_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deck.pptx");
        write_deck(
            &path,
            &[
                ("ppt/slides/slide10.xml", slide_xml(&["Appendix"]).as_str()),
                ("ppt/slides/slide2.xml", slide_xml(&["Revenue was $5M", "Costs &amp; margins"]).as_str()),
                ("ppt/slides/slide1.xml", slide_xml(&["Acme Oy"]).as_str()),
                ("ppt/slides/slide3.xml", slide_xml(&[]).as_str()),
                ("ppt/slides/_rels/slide1.xml.rels", "<Relationships/>"),
            ],
        );

        let units = DocumentReader::new().read_file(&path).unwrap();
        assert_eq!(
            units,
            vec![
                SourceUnit::new("deck.pptx", "slide 1", "Acme Oy"),
                SourceUnit::new("deck.pptx", "slide 2", "Revenue was $5M\nCosts & margins"),
                SourceUnit::new("deck.pptx", "slide 10", "Appendix"),
            ]
        );
    }

    #[cfg(feature = "pptx")]
    #[test]
    fn test_corrupt_deck_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "broken.pptx", "binary");
        let result = DocumentReader::new().read_file(&dir.path().join("broken.pptx"));
        assert!(matches!(result, Err(ExtractorError::SourceRead { .. })));
    }
}
