//! Parse collaborator output into candidate extractions
//!
//! Parsing happens in two stages. The first recovers a JSON span from text
//! that may carry a code fence or surrounding prose. The second parses it
//! strictly and validates the shape item by item.

use crate::error::ExtractorError;
use dossier_domain::{CandidateExtraction, ClaimedEvidence};
use serde_json::{Map, Value};
use tracing::warn;

/// Parse a collaborator response into candidate extractions
///
/// Accepts `{"extractions": [...]}` or a bare array of extraction objects.
/// An object without an `extractions` key means nothing was found. Items
/// with the wrong shape are dropped with a warning; the remaining items are
/// returned in response order.
///
/// # Errors
///
/// Returns [`ExtractorError::MalformedResponse`] when no JSON can be
/// recovered, or when the top-level shape is wrong.
pub fn parse_extractions(response: &str) -> Result<Vec<CandidateExtraction>, ExtractorError> {
    let span = extract_json(response)?;

    let json: Value = serde_json::from_str(span)
        .map_err(|e| ExtractorError::MalformedResponse(format!("JSON parse error: {}", e)))?;

    let items = match json {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("extractions") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(ExtractorError::MalformedResponse(format!(
                    "'extractions' must be an array, got {}",
                    kind(&other)
                )))
            }
        },
        other => {
            return Err(ExtractorError::MalformedResponse(format!(
                "Expected a JSON object or array, got {}",
                kind(&other)
            )))
        }
    };

    let mut candidates = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match parse_item(item) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => warn!("Dropping extraction {}: {}", idx, e),
        }
    }

    Ok(candidates)
}

/// Recover the JSON span from a response
///
/// Strips a leading code fence, then takes the balanced span starting at the
/// first `{`. A response that itself opens with `[` is taken as a bare array,
/// so brackets in leading prose never capture the span. Brackets inside
/// strings are ignored.
fn extract_json(response: &str) -> Result<&str, ExtractorError> {
    let text = strip_fence(response.trim());

    let start = if text.starts_with('[') {
        Some(0)
    } else {
        text.find('{')
    }
    .ok_or_else(|| ExtractorError::MalformedResponse("No JSON found in response".to_string()))?;
    let body = &text[start..];

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(&body[..i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    // Unbalanced; let the strict parse report where it breaks.
    Ok(body)
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_item(item: &Value) -> Result<CandidateExtraction, String> {
    let obj = item
        .as_object()
        .ok_or_else(|| format!("not a JSON object ({})", kind(item)))?;

    let pointer = obj
        .get("pointer")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing or invalid 'pointer'".to_string())?
        .to_string();

    let evidence = match obj.get("evidence") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(parse_evidence).collect(),
        Some(other) => return Err(format!("'evidence' must be an array, got {}", kind(other))),
    };

    Ok(CandidateExtraction {
        pointer,
        value: value_text(obj),
        evidence,
    })
}

/// Text form of `value`; strings as-is, numbers and booleans rendered
fn value_text(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("value")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_evidence(item: &Value) -> Option<ClaimedEvidence> {
    let obj = item.as_object()?;
    let quote = match obj.get("quote") {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };
    Some(ClaimedEvidence {
        quote,
        location: obj.get("location").and_then(Value::as_str).map(str::to_string),
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
