//! Error types for query parsing.

use thiserror::Error;

/// Errors raised for malformed query strings.
///
/// Positions are byte offsets into the original query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid query: query is empty")]
    Empty,

    #[error("invalid query: empty segment at position {position}")]
    EmptySegment { position: usize },

    #[error("invalid query: unterminated {quote} quote at position {position}")]
    UnterminatedQuote { quote: char, position: usize },

    #[error("invalid query: unexpected '{found}' after closing quote at position {position}")]
    TrailingAfterQuote { found: char, position: usize },
}
