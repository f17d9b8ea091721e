//! Study creation from versioned templates
//!
//! A template is an empty study for one version. [`CreateApp`] copies it to
//! a new directory and writes a fresh `study.antares`.

use crate::error::CreateError;
use crate::model::{IniModel, StudyAntares};
use crate::version::StudyVersion;
use chrono::Utc;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Provider of study templates
pub trait TemplateSource {
    /// Versions with a template, ascending
    ///
    /// # Errors
    /// Returns an error if the templates cannot be listed.
    fn versions(&self) -> Result<Vec<StudyVersion>, CreateError>;

    /// Lay out the template of `version` into `target`
    ///
    /// Returns `false` when no template exists for `version`.
    ///
    /// # Errors
    /// Returns an error if the template cannot be extracted.
    fn extract(&self, version: StudyVersion, target: &Path) -> Result<bool, CreateError>;
}

/// Templates stored as directories named `<prefix>_<version>`
///
/// ```text
/// templates/
///   empty_study_880/
///   empty_study_92/
/// ```
#[derive(Debug, Clone)]
pub struct TemplateDir {
    root: PathBuf,
}

impl TemplateDir {
    /// Create source over `root`
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Template directories by version
    fn templates(&self) -> Result<BTreeMap<StudyVersion, PathBuf>, CreateError> {
        let entries =
            fs::read_dir(&self.root).map_err(|e| CreateError::io_error(&self.root, e))?;
        let mut templates = BTreeMap::new();
        for entry in entries {
            let path = entry.map_err(|e| CreateError::io_error(&self.root, e))?.path();
            if !path.is_dir() {
                continue;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match template_version(&name) {
                Some(version) => {
                    templates.insert(version, path);
                }
                None => tracing::warn!("ignoring template {name:?}: no version suffix"),
            }
        }
        Ok(templates)
    }
}

/// Version encoded in a template name, e.g. `empty_study_880`
fn template_version(name: &str) -> Option<StudyVersion> {
    let (_, suffix) = name.rsplit_once('_')?;
    StudyVersion::parse(suffix).ok()
}

impl TemplateSource for TemplateDir {
    fn versions(&self) -> Result<Vec<StudyVersion>, CreateError> {
        Ok(self.templates()?.into_keys().collect())
    }

    fn extract(&self, version: StudyVersion, target: &Path) -> Result<bool, CreateError> {
        let Some(template) = self.templates()?.remove(&version) else {
            return Ok(false);
        };
        tracing::info!("extracting template {} to {}", template.display(), target.display());
        copy_tree(&template, target)?;
        Ok(true)
    }
}

fn copy_tree(source: &Path, target: &Path) -> Result<(), CreateError> {
    fs::create_dir_all(target).map_err(|e| CreateError::io_error(target, e))?;
    for entry in fs::read_dir(source).map_err(|e| CreateError::io_error(source, e))? {
        let entry = entry.map_err(|e| CreateError::io_error(source, e))?;
        let from = entry.path();
        let to = target.join(entry.file_name());
        if from.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| CreateError::io_error(&from, e))?;
        }
    }
    Ok(())
}

/// Template versions in display form, ascending
///
/// # Errors
/// Returns an error if the templates cannot be listed.
pub fn available_versions(source: &dyn TemplateSource) -> Result<Vec<String>, CreateError> {
    Ok(source.versions()?.iter().map(ToString::to_string).collect())
}

/// Creation of a new study
#[derive(Debug, Clone)]
pub struct CreateApp {
    study_dir: PathBuf,
    caption: String,
    version: StudyVersion,
    author: String,
}

impl CreateApp {
    /// Validate creation parameters
    ///
    /// Caption and author are trimmed.
    ///
    /// # Errors
    /// Returns [`CreateError::StudyExists`] if `study_dir` exists and
    /// [`CreateError::EmptyCaption`] if the caption is blank.
    pub fn new(
        study_dir: impl Into<PathBuf>,
        caption: &str,
        version: StudyVersion,
        author: &str,
    ) -> Result<Self, CreateError> {
        let study_dir = study_dir.into();
        if study_dir.exists() {
            return Err(CreateError::StudyExists(study_dir));
        }
        let caption = caption.trim();
        if caption.is_empty() {
            return Err(CreateError::EmptyCaption);
        }
        Ok(Self {
            study_dir,
            caption: caption.to_string(),
            version,
            author: author.trim().to_string(),
        })
    }

    /// Study directory
    #[inline]
    #[must_use]
    pub fn study_dir(&self) -> &Path {
        &self.study_dir
    }

    /// Trimmed caption
    #[inline]
    #[must_use]
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Trimmed author
    #[inline]
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Version of the new study
    #[inline]
    #[must_use]
    pub fn version(&self) -> StudyVersion {
        self.version
    }

    /// Create the study from `source`
    ///
    /// # Errors
    /// Returns [`CreateError::NoTemplate`] when `source` has no template for
    /// the version, or an IO error while laying out the study.
    pub fn run(&self, source: &dyn TemplateSource) -> Result<(), CreateError> {
        if !source.extract(self.version, &self.study_dir)? {
            return Err(CreateError::NoTemplate {
                version: self.version,
                available: available_versions(source)?,
            });
        }

        let mut study = StudyAntares::new(self.version, &*self.caption, &*self.author, Utc::now());
        study.to_source(&self.study_dir, false)?;
        tracing::info!(
            "study {:?} created in {} (version {})",
            self.caption,
            self.study_dir.display(),
            self.version
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_from_template_name() {
        assert_eq!(template_version("empty_study_880"), Some(StudyVersion::new(8, 8)));
        assert_eq!(template_version("empty_study_9.2"), Some(StudyVersion::new(9, 2)));
        assert_eq!(template_version("empty_study"), None);
        assert_eq!(template_version("880"), None);
    }

    #[test]
    fn caption_and_author_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let version = StudyVersion::new(8, 8);
        let app = CreateApp::new(dir.path().join("s"), "  My study ", version, " me ").unwrap();
        assert_eq!(app.caption(), "My study");
        assert_eq!(app.author(), "me");
    }

    #[test]
    fn rejects_blank_caption_and_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            CreateApp::new(dir.path().join("s"), "   ", StudyVersion::new(8, 8), ""),
            Err(CreateError::EmptyCaption)
        ));
        assert!(matches!(
            CreateApp::new(dir.path(), "x", StudyVersion::new(8, 8), ""),
            Err(CreateError::StudyExists(_))
        ));
    }
}
