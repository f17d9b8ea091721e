use super::UpgradeStep;
use crate::error::UpgradeResult;
use crate::model::{GeneralData, IniModel, GENERAL_DATA_PATH};
use crate::version::StudyVersion;
use std::path::Path;

/// 7.0 → 7.1: geographic and thematic trimming, link type, hydro pricing
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0701;

impl UpgradeStep for UpgradeTo0701 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(7, 0)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(7, 1)
    }

    fn files(&self) -> &'static [&'static str] {
        &[GENERAL_DATA_PATH]
    }

    fn upgrade(&self, study_dir: &Path) -> UpgradeResult<()> {
        let mut data = GeneralData::from_source(study_dir)?;
        data.rename("general", "filtering", "geographic-trimming");
        data.set("general", "thematic-trimming", false);
        data.set("optimization", "link-type", "local");
        data.set("other preferences", "hydro-pricing-mode", "fast");
        data.to_source(study_dir, false)?;
        Ok(())
    }
}

/// 7.1 → 7.2: no input change
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0702;

impl UpgradeStep for UpgradeTo0702 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(7, 1)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(7, 2)
    }

    fn files(&self) -> &'static [&'static str] {
        &[]
    }

    fn upgrade(&self, _study_dir: &Path) -> UpgradeResult<()> {
        Ok(())
    }
}
