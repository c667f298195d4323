//! Model reply parsing.
//!
//! Replies look like `<think>…</think>` followed by one or more JSON objects, sometimes with
//! stray text around them. [`parse`] walks a fixed sequence of steps:
//!
//! 1. split off the reasoning span ([`REASONING_OPEN`] / [`REASONING_CLOSE`]),
//! 2. take the region from the first `{` after it through the last `}`,
//! 3. parse that region as one object ([`Provenance::Single`]),
//! 4. otherwise scan flat `{…}` spans and fold them ([`Provenance::Folded`]).
//!
//! Folding joins `system_component` and `failure_mode` with `|` across every parsed object and
//! lets the last object win for `severity`, `priority` and `level2`.

pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{ParseError, ParseResult};
pub use types::{ClassificationResult, ParsedReply, Provenance};

use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::{FOLD_SEPARATOR, REASONING_CLOSE, REASONING_OPEN};
use crate::record::ClassificationFields;

const KEY_SYSTEM_COMPONENT: &str = "system_component";
const KEY_FAILURE_MODE: &str = "failure_mode";
const KEY_SEVERITY: &str = "severity";
const KEY_PRIORITY: &str = "priority";
const KEY_LEVEL2: &str = "level2";

/// Parses a raw model reply into a classification.
pub fn parse(reply: &str) -> ParseResult<ParsedReply> {
    let reasoning = ReasoningSpan::locate(reply);
    let rationale = reasoning.rationale.to_string();

    let region = structured_region(reply, reasoning.body_start).ok_or_else(|| {
        debug!(reply_len = reply.len(), "No opening brace after reasoning span");
        ParseError::NoStructuredContent
    })?;

    if let Some(object) = parse_object(region) {
        debug!(region_len = region.len(), "Parsed reply as a single object");
        return Ok(ParsedReply {
            result: ClassificationResult {
                fields: fields_from_object(&object),
                rationale,
            },
            provenance: Provenance::Single,
        });
    }

    let mut fold = Fold::default();
    for span in BraceSpans::new(region) {
        match parse_object(span) {
            Some(object) => fold.push(&object),
            None => {
                debug!(span_len = span.len(), "Skipping unparsable span");
                fold.skipped += 1;
            }
        }
    }

    if fold.parsed == 0 {
        debug!(skipped = fold.skipped, "No brace span parsed as an object");
        return Err(ParseError::NoStructuredContent);
    }

    let provenance = Provenance::Folded {
        parsed: fold.parsed,
        skipped: fold.skipped,
    };
    debug!(%provenance, "Folded classification objects");

    Ok(ParsedReply {
        result: ClassificationResult {
            fields: fold.finish(),
            rationale,
        },
        provenance,
    })
}

/// Reasoning span and the offset where structured content may begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReasoningSpan<'a> {
    rationale: &'a str,
    body_start: usize,
}

impl<'a> ReasoningSpan<'a> {
    fn locate(reply: &'a str) -> Self {
        let opener = reply.find(REASONING_OPEN);
        let closer = reply.rfind(REASONING_CLOSE);

        match (opener, closer) {
            (Some(open), Some(close)) if close >= open + REASONING_OPEN.len() => Self {
                rationale: &reply[open + REASONING_OPEN.len()..close],
                body_start: close + REASONING_CLOSE.len(),
            },
            // Unterminated span: the rationale runs to the end and the body search starts
            // right after the opener.
            (Some(open), _) => Self {
                rationale: &reply[open + REASONING_OPEN.len()..],
                body_start: open + REASONING_OPEN.len(),
            },
            (None, Some(close)) => Self {
                rationale: "",
                body_start: close + REASONING_CLOSE.len(),
            },
            (None, None) => Self {
                rationale: "",
                body_start: 0,
            },
        }
    }
}

/// Text from the first `{` at or after `from` through the last `}` (or the end).
fn structured_region(reply: &str, from: usize) -> Option<&str> {
    let tail = &reply[from..];
    let start = tail.find('{')?;
    let body = &tail[start..];
    let end = body.rfind('}').map_or(body.len(), |i| i + 1);
    Some(&body[..end])
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    serde_json::from_str::<Map<String, Value>>(text).ok()
}

/// Flat `{…}` spans: the next `{`, then the next `}` after it. Nested braces are not tracked.
struct BraceSpans<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> BraceSpans<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for BraceSpans<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.text.get(self.pos..)?;
        let open = self.pos + rest.find('{')?;
        let close = open + self.text[open..].find('}')?;
        self.pos = close + 1;
        Some(&self.text[open..=close])
    }
}

#[derive(Debug, Default)]
struct Fold {
    system_components: Vec<String>,
    failure_modes: Vec<String>,
    severity: Option<String>,
    priority: Option<String>,
    level2: Option<String>,
    parsed: usize,
    skipped: usize,
}

impl Fold {
    /// One `system_component` and `failure_mode` segment per object (empty when the key is
    /// unset) so both lists stay aligned. The scalar fields always take this object's value.
    fn push(&mut self, object: &Map<String, Value>) {
        self.parsed += 1;
        self.system_components
            .push(field_text(object, KEY_SYSTEM_COMPONENT).unwrap_or_default());
        self.failure_modes
            .push(field_text(object, KEY_FAILURE_MODE).unwrap_or_default());

        self.severity = field_text(object, KEY_SEVERITY);
        self.priority = field_text(object, KEY_PRIORITY);
        self.level2 = field_text(object, KEY_LEVEL2);
    }

    fn finish(self) -> ClassificationFields {
        ClassificationFields {
            system_component: join_values(self.system_components),
            failure_mode: join_values(self.failure_modes),
            severity: self.severity,
            priority: self.priority,
            level2: self.level2,
        }
    }
}

/// Unset when no object carried the key.
fn join_values(values: Vec<String>) -> Option<String> {
    if values.iter().all(String::is_empty) {
        return None;
    }
    Some(values.join(FOLD_SEPARATOR))
}

fn fields_from_object(object: &Map<String, Value>) -> ClassificationFields {
    ClassificationFields {
        system_component: field_text(object, KEY_SYSTEM_COMPONENT),
        failure_mode: field_text(object, KEY_FAILURE_MODE),
        severity: field_text(object, KEY_SEVERITY),
        priority: field_text(object, KEY_PRIORITY),
        level2: field_text(object, KEY_LEVEL2),
    }
}

/// Strings are taken verbatim, `null` and missing keys are unset, anything else is rendered
/// as JSON text.
fn field_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
