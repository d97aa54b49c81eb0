//! Select-list pattern extraction
//!
//! Heuristic used when the tokenizer rejects the text. Takes whatever
//! sits between `SELECT` and `FROM`, splits it on commas and peels off
//! aggregate wrappers and `AS` aliases.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::error::ExtractResult;
use super::extractor::{ExtractStrategy, ExtractionPath};

static SELECT_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)SELECT\s+(.*?)\s+FROM").expect("valid select pattern"));

static AGGREGATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(AVG|COUNT|SUM|MAX|MIN)\s*\(\s*([^)]+)\s*\)").expect("valid aggregate pattern")
});

static ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+as\s+\w+").expect("valid alias pattern"));

/// Fallback extraction strategy. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        PatternExtractor
    }

    fn clean(item: &str) -> Option<String> {
        let unwrapped = AGGREGATE_RE.replace_all(item, "$2");
        let unaliased = ALIAS_RE.replace_all(&unwrapped, "");
        let name = unaliased.trim().to_lowercase();

        if name.is_empty() || name == "*" || name.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(name)
    }
}

impl ExtractStrategy for PatternExtractor {
    fn path(&self) -> ExtractionPath {
        ExtractionPath::Pattern
    }

    fn extract(&self, sql: &str) -> ExtractResult<BTreeSet<String>> {
        let Some(caps) = SELECT_LIST_RE.captures(sql) else {
            return Ok(BTreeSet::new());
        };
        let select_list = caps.get(1).map_or("", |m| m.as_str());

        Ok(select_list.split(',').filter_map(Self::clean).collect())
    }
}
