//! Field extractor - strategy composition
//!
//! The tokenizer strategy runs first. Only when it fails does the pattern
//! strategy run; the two results are never merged. Extraction as a whole
//! cannot fail.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::error::ExtractResult;
use super::pattern::PatternExtractor;
use super::tokens::TokenExtractor;

/// Which strategy produced an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionPath {
    /// sqlparser token stream
    Tokenizer,
    /// Regex over the select list
    Pattern,
}

impl fmt::Display for ExtractionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionPath::Tokenizer => write!(f, "tokenizer"),
            ExtractionPath::Pattern => write!(f, "pattern"),
        }
    }
}

/// A way of pulling candidate field names out of SQL text
///
/// Names are lower-cased and deduplicated.
pub trait ExtractStrategy: Send + Sync {
    /// Identifies the strategy in extraction results
    fn path(&self) -> ExtractionPath;

    /// Extract candidate field names
    fn extract(&self, sql: &str) -> ExtractResult<BTreeSet<String>>;
}

/// Extracted field names and the strategy that produced them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub fields: BTreeSet<String>,
    pub path: ExtractionPath,
}

/// Tokenizer-first extractor with a pattern fallback
pub struct FieldExtractor {
    primary: Box<dyn ExtractStrategy>,
    fallback: PatternExtractor,
}

impl FieldExtractor {
    /// Create an extractor that ignores the given table names
    pub fn new(tables: impl IntoIterator<Item = String>) -> Self {
        Self::with_primary(Box::new(TokenExtractor::new(tables)))
    }

    /// Create an extractor around a custom primary strategy
    pub fn with_primary(primary: Box<dyn ExtractStrategy>) -> Self {
        Self {
            primary,
            fallback: PatternExtractor::new(),
        }
    }

    /// Extract field names. Falls back to the pattern strategy on failure.
    pub fn extract(&self, sql: &str) -> Extraction {
        match self.primary.extract(sql) {
            Ok(fields) => Extraction {
                fields,
                path: self.primary.path(),
            },
            Err(e) => {
                debug!(error = %e, "primary extraction failed, using pattern fallback");
                // Pattern extraction does not fail
                let fields = self.fallback.extract(sql).unwrap_or_default();
                Extraction {
                    fields,
                    path: self.fallback.path(),
                }
            }
        }
    }
}

impl fmt::Debug for FieldExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldExtractor")
            .field("primary", &self.primary.path())
            .field("fallback", &self.fallback.path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::error::ExtractError;

    fn extractor() -> FieldExtractor {
        FieldExtractor::new(["users".to_string(), "orders".to_string()])
    }

    struct FailingStrategy;

    impl ExtractStrategy for FailingStrategy {
        fn path(&self) -> ExtractionPath {
            ExtractionPath::Tokenizer
        }

        fn extract(&self, _sql: &str) -> ExtractResult<BTreeSet<String>> {
            Err(ExtractError::Tokenize("always fails".to_string()))
        }
    }

    #[test]
    fn test_primary_path() {
        let result = extractor().extract("SELECT name FROM users");
        assert_eq!(result.path, ExtractionPath::Tokenizer);
        assert!(result.fields.contains("name"));
    }

    #[test]
    fn test_fallback_on_tokenizer_failure() {
        let result = extractor().extract("SELECT name, salary FROM users WHERE name = 'x");
        assert_eq!(result.path, ExtractionPath::Pattern);
        assert_eq!(
            result.fields.into_iter().collect::<Vec<_>>(),
            vec!["name", "salary"]
        );
    }

    #[test]
    fn test_fallback_strategy_injected() {
        let extractor = FieldExtractor::with_primary(Box::new(FailingStrategy));
        let result = extractor.extract("SELECT AVG(salary) FROM users");
        assert_eq!(result.path, ExtractionPath::Pattern);
        assert!(result.fields.contains("salary"));
    }

    #[test]
    fn test_paths_agree_on_simple_select() {
        let tokens = TokenExtractor::new(["t".to_string()]);
        let pattern = PatternExtractor::new();
        for sql in [
            "SELECT a, b FROM t",
            "SELECT id FROM t",
            "select x,y,z from t",
        ] {
            assert_eq!(
                tokens.extract(sql).unwrap(),
                pattern.extract(sql).unwrap(),
                "{}",
                sql
            );
        }
    }

    #[test]
    fn test_empty_extraction_is_valid() {
        let result = extractor().extract("SELECT * FROM users");
        assert!(result.fields.is_empty());
        assert_eq!(result.path, ExtractionPath::Tokenizer);
    }
}
