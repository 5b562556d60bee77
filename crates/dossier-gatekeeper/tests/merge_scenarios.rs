//! Merge behaviour over whole chunk sequences

use dossier_domain::{
    build_skeleton, CandidateExtraction, Extracted, OutputDocument, Pointer, Template, TextChunk,
};
use dossier_gatekeeper::{Gatekeeper, RejectionReason, ValidationConfig};
use serde_json::json;

fn template() -> Template {
    Template::from_value(&json!({
        "x": {"update_rule": "append", "instruction": "extract X"},
        "y": {"update_rule": "locked", "instruction": "fixed"},
        "z": {"update_rule": "overwrite", "instruction": "latest Z"}
    }))
    .unwrap()
}

fn extracted(document: &OutputDocument, pointer: &str) -> Extracted {
    document
        .resolve_field(&Pointer::parse(pointer).unwrap())
        .unwrap()
        .slots()
        .unwrap()
        .extracted
        .clone()
}

fn x_candidate(quote: &str) -> CandidateExtraction {
    let mut candidate = CandidateExtraction::new("/x", "$5M revenue in 2023", quote);
    candidate.evidence[0].location = Some("chunk 1".to_string());
    candidate
}

#[test]
fn test_supported_quote_is_merged_with_provenance() {
    let template = template();
    let mut document = build_skeleton(&template);
    let chunk = TextChunk::new("financials.txt", "chunk 1", "Revenue was $5M in 2023.");

    let outcome = Gatekeeper::default_config().merge(
        &mut document,
        &template,
        &chunk,
        &[x_candidate("Revenue was $5M in 2023.")],
    );

    assert_eq!(outcome.accepted, 1);
    assert_eq!(
        document.to_value()["x"],
        json!({
            "update_rule": "append",
            "instruction": "extract X",
            "extracted": ["$5M revenue in 2023"],
            "evidence": [{
                "source_id": "financials.txt",
                "location": "chunk 1",
                "quote": "Revenue was $5M in 2023."
            }]
        })
    );
}

#[test]
fn test_fabricated_quote_is_dropped_entirely() {
    let template = template();
    let mut document = build_skeleton(&template);
    let chunk = TextChunk::new("financials.txt", "chunk 1", "Revenue was $5M in 2023.");

    let outcome = Gatekeeper::default_config().merge(
        &mut document,
        &template,
        &chunk,
        &[x_candidate("Revenue was $6M")],
    );

    assert_eq!(outcome.accepted, 0);
    assert_eq!(outcome.rejections[0].reason, RejectionReason::UnsupportedEvidence);
    assert_eq!(extracted(&document, "/x"), Extracted::Empty);
    assert_eq!(document.to_value()["x"]["evidence"], json!([]));
}

#[test]
fn test_locked_leaf_never_written() {
    let template = template();
    let mut document = build_skeleton(&template);
    let chunk = TextChunk::new("a.txt", "document", "The fixed value is 42.");
    let candidate = CandidateExtraction::new("/y", "42", "The fixed value is 42.");

    let outcome = Gatekeeper::new(ValidationConfig::permissive()).merge(
        &mut document,
        &template,
        &chunk,
        &[candidate],
    );

    assert_eq!(outcome.rejections[0].reason, RejectionReason::LockedFieldWrite);
    assert_eq!(
        document.to_value()["y"],
        json!({"update_rule": "locked", "instruction": "fixed"})
    );
}

#[test]
fn test_recorded_quotes_relocate_in_their_chunks() {
    let template = template();
    let mut document = build_skeleton(&template);
    let chunks = vec![
        TextChunk::new("a.txt", "document", "Alpha grew 10% year over year."),
        TextChunk::new("b.txt", "page 1", "Beta opened two offices."),
        TextChunk::new("b.txt", "page 2", "Gamma is the main competitor."),
    ];
    let gatekeeper = Gatekeeper::default_config();

    for chunk in &chunks {
        let candidates = vec![
            CandidateExtraction::new("/x", "fact", &chunk.text[..10]).with_quote("invented text"),
            CandidateExtraction::new("/z", chunk.location.clone(), chunk.text.clone()),
        ];
        gatekeeper.merge(&mut document, &template, chunk, &candidates);
    }

    for (_, field) in document.fields() {
        let Some(slots) = field.slots() else { continue };
        for record in &slots.evidence {
            let chunk = chunks
                .iter()
                .find(|c| c.source_id == record.source_id && c.location == record.location)
                .unwrap();
            assert!(chunk.text.contains(&record.quote));
        }
    }
}

#[test]
fn test_append_across_chunks_grows_list() {
    let template = template();
    let n = 4;

    let mut keep_all = build_skeleton(&template);
    let mut dedupe = build_skeleton(&template);
    for i in 0..n {
        let text = format!("Chunk {} mentions the product launch.", i);
        let chunk = TextChunk::new("notes.md", format!("document, chunk {}", i + 1), text.clone());
        let candidate = CandidateExtraction::new("/x", format!("launch {}", i % 2), text);

        Gatekeeper::new(ValidationConfig::permissive()).merge(
            &mut keep_all,
            &template,
            &chunk,
            std::slice::from_ref(&candidate),
        );
        Gatekeeper::default_config().merge(&mut dedupe, &template, &chunk, &[candidate]);
    }

    assert_eq!(extracted(&keep_all, "/x").values().len(), n);
    assert_eq!(extracted(&dedupe, "/x").values(), vec!["launch 0", "launch 1"]);
}

#[test]
fn test_overwrite_order_is_exact() {
    let template = template();
    let chunk_a = TextChunk::new("a.txt", "document", "Z is A.");
    let chunk_b = TextChunk::new("b.txt", "document", "Z is B.");
    let candidate_a = CandidateExtraction::new("/z", "A", "Z is A.");
    let candidate_b = CandidateExtraction::new("/z", "B", "Z is B.");
    let gatekeeper = Gatekeeper::default_config();

    let mut ab = build_skeleton(&template);
    gatekeeper.merge(&mut ab, &template, &chunk_a, std::slice::from_ref(&candidate_a));
    gatekeeper.merge(&mut ab, &template, &chunk_b, std::slice::from_ref(&candidate_b));
    assert_eq!(extracted(&ab, "/z"), Extracted::Scalar("B".to_string()));

    let mut ba = build_skeleton(&template);
    gatekeeper.merge(&mut ba, &template, &chunk_b, &[candidate_b]);
    gatekeeper.merge(&mut ba, &template, &chunk_a, &[candidate_a]);
    assert_eq!(extracted(&ba, "/z"), Extracted::Scalar("A".to_string()));
}

#[test]
fn test_merge_into_resumed_document() {
    let template = Template::from_value(&json!({
        "x": {
            "update_rule": "append",
            "instruction": "extract X",
            "extracted": "from an earlier run",
            "evidence": []
        }
    }))
    .unwrap();
    let mut document = build_skeleton(&template);
    let chunk = TextChunk::new("new.txt", "document", "A new fact.");

    Gatekeeper::default_config().merge(
        &mut document,
        &template,
        &chunk,
        &[CandidateExtraction::new("/x", "new fact", "A new fact.")],
    );

    assert_eq!(
        extracted(&document, "/x").values(),
        vec!["from an earlier run", "new fact"]
    );
}

#[test]
fn test_whitespace_quote_is_not_evidence() {
    let template = template();
    let mut document = build_skeleton(&template);
    let chunk = TextChunk::new("a.txt", "document", "Revenue was $5M in 2023.");
    let candidate = CandidateExtraction::new("/x", "$99M hallucinated", " ");

    let outcome = Gatekeeper::default_config().merge(&mut document, &template, &chunk, &[candidate]);

    assert_eq!(outcome.accepted, 0);
    assert_eq!(outcome.evidence_dropped, 1);
    assert_eq!(outcome.rejections[0].reason, RejectionReason::UnsupportedEvidence);
    assert_eq!(extracted(&document, "/x"), Extracted::Empty);
}

#[test]
fn test_min_quote_chars_counts_trimmed_text() {
    let template = template();
    let mut document = build_skeleton(&template);
    let chunk = TextChunk::new("a.txt", "document", "Revenue was $5M in 2023.");
    let gatekeeper = Gatekeeper::new(ValidationConfig {
        min_quote_chars: 4,
        ..ValidationConfig::default()
    });

    // Padding does not stretch a three-character quote past the limit
    let padded = CandidateExtraction::new("/x", "$5M", " $5M ");
    let outcome = gatekeeper.merge(&mut document, &template, &chunk, &[padded]);
    assert_eq!(outcome.accepted, 0);

    let outcome = gatekeeper.merge(
        &mut document,
        &template,
        &chunk,
        &[CandidateExtraction::new("/x", "$5M", "was $5M")],
    );
    assert_eq!(outcome.accepted, 1);
}
