//! Study upgrade pipeline
//!
//! Every supported version pair has one [`UpgradeStep`] rewriting the files
//! that changed between the two versions. Steps are registered in the
//! static [`UPGRADE_STEPS`] table, ordered by version; together they form a
//! single chain from 7.0 to the latest version.
//!
//! # Core Concepts
//!
//! - [`UpgradeStep`]: one version pair, one in-place rewrite
//! - [`upgrade_steps`]: the chain between two supported versions
//! - [`UpgradeApp`]: upgrade a study directory and stamp its new version
//!
//! Steps mutate the study in place. A failing step leaves the files written
//! by earlier steps on disk.

mod app;
pub mod matrix;
pub mod thematic;
mod v7;
mod v8;
mod v9;

pub use app::UpgradeApp;
pub use v7::{UpgradeTo0701, UpgradeTo0702};
pub use v8::{
    UpgradeTo0800, UpgradeTo0801, UpgradeTo0802, UpgradeTo0803, UpgradeTo0804, UpgradeTo0805,
    UpgradeTo0806, UpgradeTo0807, UpgradeTo0808,
};
pub use v9::{UpgradeTo0900, UpgradeTo0902, UpgradeTo0903};

use crate::error::{UpgradeError, UpgradeResult};
use crate::version::StudyVersion;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use study_ini::{IniDocument, IniReader, IniWriter};

/// Rewrite of a study from one version to the next
///
/// Sealed: the set of steps is fixed by [`UPGRADE_STEPS`].
pub trait UpgradeStep: Send + Sync + Debug + private::Sealed {
    /// Version the step starts from
    fn old_version(&self) -> StudyVersion;

    /// Version the step produces
    fn new_version(&self) -> StudyVersion;

    /// Study paths the step may touch, relative to the study directory
    fn files(&self) -> &'static [&'static str];

    /// Rewrite the study in `study_dir`
    ///
    /// # Errors
    /// Returns an error on unreadable or unwritable study files.
    fn upgrade(&self, study_dir: &Path) -> UpgradeResult<()>;
}

mod private {
    pub trait Sealed {}

    impl Sealed for super::UpgradeTo0701 {}
    impl Sealed for super::UpgradeTo0702 {}
    impl Sealed for super::UpgradeTo0800 {}
    impl Sealed for super::UpgradeTo0801 {}
    impl Sealed for super::UpgradeTo0802 {}
    impl Sealed for super::UpgradeTo0803 {}
    impl Sealed for super::UpgradeTo0804 {}
    impl Sealed for super::UpgradeTo0805 {}
    impl Sealed for super::UpgradeTo0806 {}
    impl Sealed for super::UpgradeTo0807 {}
    impl Sealed for super::UpgradeTo0808 {}
    impl Sealed for super::UpgradeTo0900 {}
    impl Sealed for super::UpgradeTo0902 {}
    impl Sealed for super::UpgradeTo0903 {}
}

/// All upgrade steps, ordered by version
pub static UPGRADE_STEPS: &[&dyn UpgradeStep] = &[
    &UpgradeTo0701,
    &UpgradeTo0702,
    &UpgradeTo0800,
    &UpgradeTo0801,
    &UpgradeTo0802,
    &UpgradeTo0803,
    &UpgradeTo0804,
    &UpgradeTo0805,
    &UpgradeTo0806,
    &UpgradeTo0807,
    &UpgradeTo0808,
    &UpgradeTo0900,
    &UpgradeTo0902,
    &UpgradeTo0903,
];

/// Versions a study can be upgraded from or to, ascending
#[must_use]
pub fn supported_versions() -> Vec<StudyVersion> {
    let mut versions: Vec<StudyVersion> = UPGRADE_STEPS
        .iter()
        .flat_map(|step| [step.old_version(), step.new_version()])
        .collect();
    versions.sort_unstable();
    versions.dedup();
    versions
}

/// Most recent supported version
#[must_use]
pub fn latest_version() -> Option<StudyVersion> {
    UPGRADE_STEPS.iter().map(|step| step.new_version()).max()
}

/// Steps leading from `from` to `to`, in application order
///
/// The chain is empty when both versions are equal.
///
/// # Errors
/// Returns [`UpgradeError::UnsupportedVersion`] when either version is not
/// supported, [`UpgradeError::Downgrade`] when `to < from` and
/// [`UpgradeError::MissingStep`] when the chain has a gap.
pub fn upgrade_steps(
    from: StudyVersion,
    to: StudyVersion,
) -> UpgradeResult<Vec<&'static dyn UpgradeStep>> {
    let supported = supported_versions();
    for version in [to, from] {
        if !supported.contains(&version) {
            return Err(UpgradeError::UnsupportedVersion(version));
        }
    }
    if to < from {
        return Err(UpgradeError::Downgrade { from, to });
    }

    let mut chain = Vec::new();
    let mut current = from;
    while current < to {
        let step = UPGRADE_STEPS
            .iter()
            .copied()
            .find(|step| step.old_version() == current && step.new_version() <= to)
            .ok_or(UpgradeError::MissingStep { from: current, to })?;
        chain.push(step);
        current = step.new_version();
    }
    Ok(chain)
}

/// Sub-directories of `dir`, sorted by name; empty when `dir` is absent
pub(crate) fn sub_dirs(dir: &Path) -> UpgradeResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| UpgradeError::io_error(dir, e))? {
        let path = entry.map_err(|e| UpgradeError::io_error(dir, e))?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Regular files of `dir` with the given extension, sorted by name
pub(crate) fn files_with_extension(dir: &Path, extension: &str) -> UpgradeResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| UpgradeError::io_error(dir, e))? {
        let path = entry.map_err(|e| UpgradeError::io_error(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub(crate) fn create_dir(path: &Path) -> UpgradeResult<()> {
    fs::create_dir_all(path).map_err(|e| UpgradeError::io_error(path, e))
}

pub(crate) fn remove_file(path: &Path) -> UpgradeResult<()> {
    fs::remove_file(path).map_err(|e| UpgradeError::io_error(path, e))
}

/// Rewrite every section of a plain INI file; absent files are skipped
pub(crate) fn update_sections<F>(path: &Path, mut update: F) -> UpgradeResult<()>
where
    F: FnMut(&str, &mut study_ini::Section),
{
    if !path.is_file() {
        tracing::warn!("{} is missing, skipped", path.display());
        return Ok(());
    }
    let mut document: IniDocument = IniReader::default().read(path)?;
    for (name, section) in &mut document {
        update(name, section);
    }
    IniWriter::default().write(&document, path)?;
    Ok(())
}

/// File stem of `path` as UTF-8, lossy
pub(crate) fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn v(major: u8, minor: u8) -> StudyVersion {
        StudyVersion::new(major, minor)
    }

    #[test]
    fn registry_forms_a_chain() {
        for pair in UPGRADE_STEPS.windows(2) {
            assert_eq!(pair[0].new_version(), pair[1].old_version());
            assert!(pair[0].old_version() < pair[0].new_version());
        }
    }

    #[test]
    fn supported_and_latest() {
        let versions = supported_versions();
        assert_eq!(versions.first(), Some(&v(7, 0)));
        assert_eq!(versions.last(), Some(&v(9, 3)));
        assert!(!versions.contains(&v(9, 1)));
        assert_eq!(latest_version(), Some(v(9, 3)));
    }

    #[test]
    fn chain_between_versions() {
        let chain = upgrade_steps(v(8, 6), v(9, 2)).unwrap();
        let news: Vec<String> = chain.iter().map(|s| s.new_version().to_string()).collect();
        assert_eq!(news, ["8.7", "8.8", "9.0", "9.2"]);
        assert_eq!(upgrade_steps(v(7, 0), v(9, 3)).unwrap().len(), UPGRADE_STEPS.len());
        assert!(upgrade_steps(v(8, 8), v(8, 8)).unwrap().is_empty());
    }

    #[test]
    fn chain_errors() {
        assert!(matches!(
            upgrade_steps(v(9, 2), v(8, 8)),
            Err(UpgradeError::Downgrade { .. })
        ));
        assert!(matches!(
            upgrade_steps(v(8, 8), v(9, 1)),
            Err(UpgradeError::UnsupportedVersion(version)) if version == v(9, 1)
        ));
        assert!(matches!(
            upgrade_steps(v(6, 5), v(8, 8)),
            Err(UpgradeError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn declared_files() {
        assert!(UpgradeTo0702.files().is_empty());
        assert!(UpgradeTo0802.files().contains(&"input/links"));
        assert!(UpgradeTo0903.files().contains(&"settings/generaldata.ini"));
    }
}
