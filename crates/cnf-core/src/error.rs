//! Error types for parsing, editing, and persisting OpenSSL configuration files.

use thiserror::Error;

/// Errors that can occur while scanning, building, or writing a configuration tree.
///
/// Structural errors carry the 1-based line and column of the character at
/// which the scanner gave up.
#[derive(Error, Debug)]
pub enum CnfError {
    /// A `[` section header reached end of input before its closing `]`.
    #[error("unterminated section header at line {line}, column {column}")]
    UnterminatedSection { line: usize, column: usize },

    /// A key (or the spacer after it) ran into a line end or end of input
    /// before an `=` was found.
    #[error("malformed key at line {line}, column {column}: expected '='")]
    MalformedKey { line: usize, column: usize },

    /// A line end was reached after `=` before any value character.
    #[error("malformed value at line {line}, column {column}: line ends after '='")]
    MalformedValueStart { line: usize, column: usize },

    /// A node started with a character none of the productions accept.
    /// Only reported in strict mode.
    #[error("unexpected character {ch:?} at line {line}, column {column}")]
    UnexpectedChar { ch: char, line: usize, column: usize },

    /// Whitespace nodes must be non-empty and contain only whitespace.
    #[error("invalid whitespace run: {0:?}")]
    InvalidWhitespace(String),

    /// Values must be non-empty, must not start with whitespace, and must
    /// not contain `#`, CR, or LF.
    #[error("invalid value: {0:?}")]
    InvalidValue(String),

    /// Keys must start with an alphanumeric character and contain no
    /// whitespace or `=`.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// Section names must be non-empty and contain no whitespace or `]`.
    #[error("invalid section name: {0:?}")]
    InvalidSectionName(String),

    /// Reading or writing the underlying file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout cnf-core.
pub type Result<T> = std::result::Result<T, CnfError>;
