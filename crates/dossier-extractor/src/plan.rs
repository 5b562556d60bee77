//! Division of source units into collaborator calls

use crate::chunking::TextChunker;
use crate::config::{ExtractorConfig, Granularity};
use crate::reader::SourceUnit;
use dossier_domain::{FieldCatalog, Template, TextChunk};
use std::sync::Arc;

/// One collaborator call: a chunk and the fields to look for in it
#[derive(Debug, Clone)]
pub struct ExtractionTask {
    /// Text the call sees
    pub chunk: TextChunk,

    /// Fields offered to the collaborator
    pub catalog: Arc<FieldCatalog>,

    /// Top-level section the catalog is restricted to, if any
    pub section: Option<String>,
}

/// Plan every call for a run
///
/// Units are ordered by source id (stable, so page order within a source is
/// kept). Tasks follow source, unit position, chunk position and then
/// section order. An empty catalog plans no calls.
pub fn plan_tasks(
    template: &Template,
    units: &[SourceUnit],
    config: &ExtractorConfig,
) -> Vec<ExtractionTask> {
    let catalog = template.catalog();
    if catalog.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<&SourceUnit> = units.iter().collect();
    ordered.sort_by(|a, b| a.source_id.cmp(&b.source_id));

    let chunker = TextChunker::new(config.max_chunk_chars);

    match config.granularity {
        Granularity::Document => {
            let catalog = Arc::new(catalog);
            ordered
                .into_iter()
                .filter(|unit| !unit.text.trim().is_empty())
                .map(|unit| ExtractionTask {
                    chunk: TextChunk::new(
                        unit.source_id.as_str(),
                        unit.location.as_str(),
                        unit.text.trim(),
                    ),
                    catalog: Arc::clone(&catalog),
                    section: None,
                })
                .collect()
        }
        Granularity::Chunk => {
            let catalog = Arc::new(catalog);
            ordered
                .into_iter()
                .flat_map(|unit| chunker.chunk_unit(unit))
                .map(|chunk| ExtractionTask {
                    chunk,
                    catalog: Arc::clone(&catalog),
                    section: None,
                })
                .collect()
        }
        Granularity::Section => {
            let sections: Vec<(String, Arc<FieldCatalog>)> = catalog
                .sections()
                .into_iter()
                .map(|name| {
                    let subset = Arc::new(template.catalog_for_section(&name));
                    (name, subset)
                })
                .collect();

            let mut tasks = Vec::new();
            for unit in ordered {
                for chunk in chunker.chunk_unit(unit) {
                    for (name, subset) in &sections {
                        tasks.push(ExtractionTask {
                            chunk: chunk.clone(),
                            catalog: Arc::clone(subset),
                            section: Some(name.clone()),
                        });
                    }
                }
            }
            tasks
        }
    }
}

/// Sorted distinct sources that yield at least one chunk
pub fn contributing_sources(units: &[SourceUnit]) -> Vec<String> {
    let mut sources: Vec<String> = units
        .iter()
        .filter(|unit| !unit.text.trim().is_empty())
        .map(|unit| unit.source_id.clone())
        .collect();
    sources.sort();
    sources.dedup();
    sources
}
