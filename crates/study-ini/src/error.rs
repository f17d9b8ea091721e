//! Error types for the INI engine
//!
//! Covers:
//! - Read operations (file → document)
//! - Filter construction (invalid patterns)
//! - Write operations (document → file)

use std::path::PathBuf;

/// Errors raised while reading, filtering or writing INI files
#[derive(Debug, thiserror::Error)]
pub enum IniError {
    /// Line is neither blank, comment, section header nor assignment
    #[error("invalid line {line_number}: {line:?}")]
    InvalidLine {
        /// 1-based line number
        line_number: usize,
        /// Offending line, trimmed
        line: String,
    },

    /// Section or option pattern does not compile
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Content is neither UTF-8 nor Windows-1252
    #[error("cannot decode {path}: not UTF-8 nor Windows-1252")]
    Decode { path: PathBuf },

    /// IO error during file read or write
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IniError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create invalid line error
    pub fn invalid_line(line_number: usize, line: impl Into<String>) -> Self {
        Self::InvalidLine {
            line_number,
            line: line.into(),
        }
    }
}

/// Result type alias for INI operations
pub type IniResult<T> = Result<T, IniError>;
