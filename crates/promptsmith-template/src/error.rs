//! Error types for the template crate.

use thiserror::Error;

/// Errors raised while turning template source into a node tree.
///
/// Every variant carries the 1-based line on which the offending construct
/// starts. Parse errors are always fatal for the template being parsed:
/// a malformed template indicates a corrupt catalog, not a transient state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `{{` (or `{{{`) with no matching closing delimiter.
    #[error("unclosed tag at line {line}: expected `{expected}`")]
    UnclosedTag {
        line: usize,
        expected: &'static str,
    },

    /// A block directive with no matching close tag.
    #[error("unclosed `#{directive}` block opened at line {line}")]
    UnclosedBlock {
        directive: &'static str,
        line: usize,
    },

    /// A block or partial directive without its required argument.
    #[error("`{directive}` at line {line} is missing its argument")]
    MissingArgument {
        directive: &'static str,
        line: usize,
    },
}

impl ParseError {
    /// Returns the line on which the error starts.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnclosedTag { line, .. }
            | ParseError::UnclosedBlock { line, .. }
            | ParseError::MissingArgument { line, .. } => *line,
        }
    }
}

/// Result type for template parsing.
pub type Result<T> = std::result::Result<T, ParseError>;
