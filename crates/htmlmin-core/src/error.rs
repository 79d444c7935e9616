//! Error kinds for the minifier core.
//!
//! Mirrors the teacher's plain enum + hand-rolled `Display` style
//! (`html_processor/errors.rs`) rather than a derive-macro error crate.

use std::fmt;

/// A snippet of input surrounding a parse failure, for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorContext {
    pub line: usize,
    pub column: usize,
    pub snippet: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Input exceeded `Options::max_input_length`. Thrown before any output
    /// is produced.
    InputTooLarge { limit: usize, actual: usize },

    /// Malformed markup encountered with `continue_on_parse_error` unset.
    Parse(ErrorContext),

    /// A sub-minifier rejected content and `continue_on_minify_error` is
    /// unset.
    Minify { context: String, cause: String },

    /// Unknown preset name or an invalid option combination, raised at call
    /// entry.
    Config(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InputTooLarge { limit, actual } => write!(
                f,
                "input of {actual} bytes exceeds max_input_length of {limit}"
            ),
            CoreError::Parse(ctx) => write!(
                f,
                "parse error at {}:{}: {}",
                ctx.line, ctx.column, ctx.snippet
            ),
            CoreError::Minify { context, cause } => {
                write!(f, "sub-minifier failed for {context}: {cause}")
            }
            CoreError::Config(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl std::error::Error for CoreError {}

pub type CoreResult<T> = Result<T, CoreError>;
