//! SQL layer - field extraction from generated SQL text
//!
//! This module provides:
//! - `TokenExtractor`: walks the sqlparser token stream for identifiers
//! - `PatternExtractor`: regex heuristic over the select list
//! - `FieldExtractor`: tries the tokenizer first, falls back to the pattern

pub mod error;
pub mod extractor;
pub mod pattern;
pub mod tokens;

pub use error::{ExtractError, ExtractResult};
pub use extractor::{ExtractStrategy, Extraction, ExtractionPath, FieldExtractor};
pub use pattern::PatternExtractor;
pub use tokens::{TokenExtractor, DEFAULT_STOP_WORDS};
