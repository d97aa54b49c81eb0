//! SQL extraction error types

use thiserror::Error;

/// Extraction strategy failure
///
/// Never escapes `FieldExtractor`: a failing strategy hands over to the
/// next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Tokenizer rejected the text
    #[error("Tokenize error: {0}")]
    Tokenize(String),
}

impl From<sqlparser::tokenizer::TokenizerError> for ExtractError {
    fn from(err: sqlparser::tokenizer::TokenizerError) -> Self {
        ExtractError::Tokenize(err.to_string())
    }
}

/// Result type for extraction strategies
pub type ExtractResult<T> = Result<T, ExtractError>;
