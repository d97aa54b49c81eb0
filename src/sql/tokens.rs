//! Token-stream field extraction
//!
//! Tokenizes the SQL text with sqlparser and keeps every word token that
//! names a column. Dropped along the way:
//! - unquoted words in the stop list (keywords, aggregate functions)
//! - words that are part of a qualified name (`t.col`)
//! - the alias after `AS`
//! - words naming a known table

use std::collections::BTreeSet;

use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer, Word};

use super::error::ExtractResult;
use super::extractor::{ExtractStrategy, ExtractionPath};

/// Words that are never field names when unquoted
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "select", "from", "where", "and", "or", "avg", "count", "sum", "max", "min", "not", "as",
    "distinct", "group", "by", "order", "having", "limit", "offset", "asc", "desc", "null", "is",
    "in", "like", "between", "case", "when", "then", "else", "end", "on", "all", "true", "false",
];

/// Primary extraction strategy over the sqlparser token stream
#[derive(Debug, Clone)]
pub struct TokenExtractor {
    stop_words: BTreeSet<String>,
    tables: BTreeSet<String>,
}

impl TokenExtractor {
    /// Create an extractor that also ignores the given table names
    pub fn new(tables: impl IntoIterator<Item = String>) -> Self {
        Self {
            stop_words: DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            tables: tables.into_iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Extend the stop list
    #[must_use]
    pub fn with_stop_words<S: AsRef<str>>(mut self, words: impl IntoIterator<Item = S>) -> Self {
        self.stop_words
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    fn is_alias(prev: Option<&Token>) -> bool {
        matches!(
            prev,
            Some(Token::Word(Word {
                keyword: Keyword::AS,
                quote_style: None,
                ..
            }))
        )
    }

    fn accept(&self, word: &Word) -> Option<String> {
        let name = word
            .value
            .trim()
            .trim_matches(|c| c == '"' || c == '\'' || c == '`')
            .to_lowercase();

        if name.is_empty() || name.contains('.') {
            return None;
        }
        if word.quote_style.is_none() && self.stop_words.contains(&name) {
            return None;
        }
        if self.tables.contains(&name) {
            return None;
        }
        Some(name)
    }
}

impl ExtractStrategy for TokenExtractor {
    fn path(&self) -> ExtractionPath {
        ExtractionPath::Tokenizer
    }

    fn extract(&self, sql: &str) -> ExtractResult<BTreeSet<String>> {
        let dialect = GenericDialect {};
        let tokens = Tokenizer::new(&dialect, sql).tokenize()?;

        let significant: Vec<&Token> = tokens
            .iter()
            .filter(|t| !matches!(t, Token::Whitespace(_)))
            .collect();

        let mut fields = BTreeSet::new();
        for (i, &token) in significant.iter().enumerate() {
            let Token::Word(word) = token else {
                continue;
            };

            let prev = i.checked_sub(1).map(|p| significant[p]);
            let next = significant.get(i + 1).copied();

            // Qualified name segment. Both parts are dropped, so `t.col` is
            // never checked against the allowed fields.
            if matches!(prev, Some(Token::Period)) || matches!(next, Some(Token::Period)) {
                continue;
            }
            if Self::is_alias(prev) {
                continue;
            }
            if let Some(name) = self.accept(word) {
                fields.insert(name);
            }
        }

        Ok(fields)
    }
}
