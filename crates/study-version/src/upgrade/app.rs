use super::upgrade_steps;
use crate::error::UpgradeResult;
use crate::model::{IniModel, StudyAntares};
use crate::version::StudyVersion;
use std::path::{Path, PathBuf};

/// Upgrade of one study directory to a target version
#[derive(Debug, Clone)]
pub struct UpgradeApp {
    study_dir: PathBuf,
    version: StudyVersion,
}

impl UpgradeApp {
    /// Create upgrade of `study_dir` to `version`
    #[inline]
    #[must_use]
    pub fn new(study_dir: impl Into<PathBuf>, version: StudyVersion) -> Self {
        Self {
            study_dir: study_dir.into(),
            version,
        }
    }

    /// Study directory
    #[inline]
    #[must_use]
    pub fn study_dir(&self) -> &Path {
        &self.study_dir
    }

    /// Target version
    #[inline]
    #[must_use]
    pub fn version(&self) -> StudyVersion {
        self.version
    }

    /// Run the upgrade and return the version the study started from
    ///
    /// Applies every step from the current version to the target, then
    /// stamps the target version and a fresh save date into
    /// `study.antares`. A study already at the target is left untouched.
    ///
    /// # Errors
    /// Fails on an unsupported target, a downgrade, a gap in the step chain
    /// or any step failure. Files written before the failure are kept.
    pub fn run(&self) -> UpgradeResult<StudyVersion> {
        let mut study = StudyAntares::from_source(&self.study_dir)?;
        let current = study.version;
        let steps = upgrade_steps(current, self.version)?;
        if steps.is_empty() {
            tracing::info!("study {} is already in version {current}", self.study_dir.display());
            return Ok(current);
        }

        for step in steps {
            tracing::info!(
                "upgrading {} from {} to {}",
                self.study_dir.display(),
                step.old_version(),
                step.new_version()
            );
            step.upgrade(&self.study_dir)?;
        }

        study.version = self.version;
        study.to_source(&self.study_dir, true)?;
        tracing::info!(
            "study {} upgraded from {current} to {}",
            self.study_dir.display(),
            self.version
        );
        Ok(current)
    }
}
