//! Frontmatter extraction
//!
//! A document is a YAML block fenced by `---` lines followed by a markdown
//! body. The fence must open on the very first line.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::{Mapping, Value};

static FRONTMATTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)")
        .expect("frontmatter pattern is valid")
});

/// Parse the metadata block of `text`
///
/// Returns an empty mapping when there is no block, when the YAML is
/// malformed, or when it is not a mapping at the top level.
#[must_use]
pub fn parse_metadata(text: &str) -> Mapping {
    let Some(captures) = FRONTMATTER_RE.captures(text) else {
        return Mapping::new();
    };
    let block = captures.get(1).map_or("", |m| m.as_str());
    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Mapping(map)) => map,
        Ok(_) => Mapping::new(),
        Err(err) => {
            tracing::debug!("ignoring malformed frontmatter: {err}");
            Mapping::new()
        }
    }
}

/// `text` with the metadata block removed, trimmed
#[must_use]
pub fn strip_metadata(text: &str) -> &str {
    match FRONTMATTER_RE.find(text) {
        Some(m) => text[m.end()..].trim(),
        None => text.trim(),
    }
}
