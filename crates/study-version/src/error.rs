//! Error types for study versions, models, upgrades and creation
//!
//! - [`VersionError`]: version string parsing
//! - [`ModelError`]: reading typed models (`study.antares`, `generaldata.ini`)
//! - [`UpgradeError`]: resolving and applying upgrade steps
//! - [`CreateError`]: creating a study from a template

use crate::version::StudyVersion;
use study_ini::IniError;
use std::path::PathBuf;

/// Errors parsing a study version
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// Not a recognized version string
    #[error("invalid study version: {0:?}")]
    Invalid(String),
}

/// Errors loading or saving a typed model
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Required file is absent
    #[error("missing file: {0}")]
    MissingFile(PathBuf),

    /// Required field is absent
    #[error("missing field [{section}] {key} in {path}")]
    MissingField {
        path: PathBuf,
        section: String,
        key: String,
    },

    /// Version field cannot be parsed
    #[error("invalid version in {path}: {source}")]
    InvalidVersion {
        path: PathBuf,
        #[source]
        source: VersionError,
    },

    /// INI read/write failure
    #[error("ini error: {0}")]
    Ini(#[from] IniError),
}

impl ModelError {
    /// Create missing field error
    pub fn missing_field(
        path: impl Into<PathBuf>,
        section: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self::MissingField {
            path: path.into(),
            section: section.into(),
            key: key.into(),
        }
    }
}

/// Errors during study upgrades
#[derive(Debug, thiserror::Error)]
pub enum UpgradeError {
    /// Version is not part of the upgrade chain
    #[error("version {0} is not supported for upgrade")]
    UnsupportedVersion(StudyVersion),

    /// Target is older than the study
    #[error("cannot downgrade study from {from} to {to}")]
    Downgrade { from: StudyVersion, to: StudyVersion },

    /// No registered step continues the chain
    #[error("no upgrade step from {from} (towards {to})")]
    MissingStep { from: StudyVersion, to: StudyVersion },

    /// Both variable selection lists reference trimmed variables
    #[error(
        "unexpected thematic trimming fields: both 'select_var +' ({positive:?}) \
         and 'select_var -' ({negative:?}) reference grouped variables"
    )]
    UnexpectedThematicTrimmingFields {
        positive: Vec<String>,
        negative: Vec<String>,
    },

    /// Matrix file contains a non-numeric cell
    #[error("invalid matrix {path} at line {line}")]
    InvalidMatrix { path: PathBuf, line: u64 },

    /// IO error on a study file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// INI read/write failure
    #[error("ini error: {0}")]
    Ini(#[from] IniError),

    /// Typed model failure
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl UpgradeError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors while creating a study
#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    /// Target directory is already there
    #[error("study directory already exists: {0}")]
    StudyExists(PathBuf),

    /// Caption is blank
    #[error("caption cannot be empty")]
    EmptyCaption,

    /// No template for the requested version
    #[error("no available template for version {version}: available templates are {available:?}")]
    NoTemplate {
        version: StudyVersion,
        available: Vec<String>,
    },

    /// IO error on a template or study file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Typed model failure
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl CreateError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for upgrade operations
pub type UpgradeResult<T> = Result<T, UpgradeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downgrade_display() {
        let err = UpgradeError::Downgrade {
            from: StudyVersion::new(9, 2),
            to: StudyVersion::new(8, 8),
        };
        assert_eq!(err.to_string(), "cannot downgrade study from 9.2 to 8.8");
    }

    #[test]
    fn thematic_error_names_both_lists() {
        let err = UpgradeError::UnexpectedThematicTrimmingFields {
            positive: vec!["lignite".to_string()],
            negative: vec!["nuclear".to_string()],
        };
        let text = err.to_string();
        assert!(text.contains("lignite"));
        assert!(text.contains("nuclear"));
    }

    #[test]
    fn error_conversions() {
        let model = ModelError::MissingFile(PathBuf::from("study.antares"));
        let upgrade: UpgradeError = model.into();
        assert!(matches!(upgrade, UpgradeError::Model(_)));
    }
}
