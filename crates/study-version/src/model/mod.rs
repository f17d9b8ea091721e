//! Typed handles over study configuration files
//!
//! Each model owns one INI file of a study directory and round-trips it
//! through the study dialect:
//!
//! - [`GeneralData`]: `settings/generaldata.ini`
//! - [`StudyAntares`]: `study.antares`
//!
//! Models are read-modify-write handles: load with [`IniModel::from_source`],
//! mutate, then save with [`IniModel::to_source`].

mod general_data;
mod study_antares;

pub use general_data::{GeneralData, GENERAL_DATA_PATH};
pub use study_antares::{StudyAntares, STUDY_ANTARES_PATH};

use crate::error::ModelError;
use std::path::Path;
use study_ini::{IniDocument, SpecialKeys};

/// A study file backed by an [`IniDocument`]
pub trait IniModel: Sized {
    /// Path of the file, relative to the study directory
    const INI_PATH: &'static str;

    /// List-valued keys of the file
    fn special_keys() -> SpecialKeys {
        SpecialKeys::none()
    }

    /// Build the model from a parsed document
    ///
    /// # Errors
    /// Returns an error if a required field is missing or invalid.
    fn from_document(document: IniDocument, study_dir: &Path) -> Result<Self, ModelError>;

    /// Convert the model back into a document
    fn to_document(&self) -> IniDocument;

    /// Hook run before saving when the caller asks for a timestamp refresh
    fn refresh_timestamp(&mut self) {}

    /// Read the model from `study_dir`
    ///
    /// # Errors
    /// Returns an error if the file cannot be parsed or the model rejects it.
    fn from_source(study_dir: &Path) -> Result<Self, ModelError> {
        let path = study_dir.join(Self::INI_PATH);
        let document = Self::special_keys().reader().read(&path)?;
        tracing::debug!("read {}", path.display());
        Self::from_document(document, study_dir)
    }

    /// Write the model into `study_dir`
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    fn to_source(&mut self, study_dir: &Path, update_timestamp: bool) -> Result<(), ModelError> {
        if update_timestamp {
            self.refresh_timestamp();
        }
        let path = study_dir.join(Self::INI_PATH);
        Self::special_keys().writer().write(&self.to_document(), &path)?;
        tracing::debug!("wrote {}", path.display());
        Ok(())
    }
}
