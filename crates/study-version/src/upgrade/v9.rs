use super::thematic::{self, VARIABLES_SELECTION};
use super::{create_dir, matrix, sub_dirs, update_sections, UpgradeStep};
use crate::error::UpgradeResult;
use crate::model::{GeneralData, IniModel, GENERAL_DATA_PATH};
use crate::version::StudyVersion;
use std::path::Path;
use study_ini::{IniReader, IniValue, IniWriter};

/// 8.8 → 9.0: no input change
///
/// From 9.0 on the version is written in dotted form in `study.antares`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0900;

impl UpgradeStep for UpgradeTo0900 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(8, 8)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(9, 0)
    }

    fn files(&self) -> &'static [&'static str] {
        &[]
    }

    fn upgrade(&self, _study_dir: &Path) -> UpgradeResult<()> {
        Ok(())
    }
}

/// 9.0 → 9.2: link time series generation, storage costs
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0902;

impl UpgradeTo0902 {
    fn upgrade_general_data(study_dir: &Path) -> UpgradeResult<()> {
        let mut data = GeneralData::from_source(study_dir)?;
        data.remove("adequacy patch", "enable-first-step");
        data.remove(
            "adequacy patch",
            "set-to-null-ntc-between-physical-out-for-first-step",
        );
        data.remove("other preferences", "initial-reservoir-levels");
        data.set("other preferences", "hydro-pmax-format", "daily");
        data.set("general", "nbtimeserieslinks", IniValue::Int(1));
        if data.contains_section(VARIABLES_SELECTION) {
            thematic::trim_storage_variables(data.section_mut(VARIABLES_SELECTION));
        }
        data.to_source(study_dir, false)?;
        Ok(())
    }

    /// Links of areas with a `capacities` directory get prepro matrices
    fn upgrade_links(study_dir: &Path) -> UpgradeResult<()> {
        let prepro = matrix::tiled(&[1.0, 1.0, 0.0, 0.0, 0.0, 0.0], matrix::DAYS_PER_YEAR);
        let modulation = matrix::filled(matrix::HOURS_PER_YEAR, 1, 1.0);

        for area_dir in sub_dirs(&study_dir.join("input/links"))? {
            if !area_dir.join("capacities").is_dir() {
                continue;
            }
            let ini_path = area_dir.join("properties.ini");
            let mut properties = IniReader::default().read(&ini_path)?;
            for section in properties.values_mut() {
                section.insert("unitcount".to_string(), IniValue::Int(1));
                section.insert("nominalcapacity".to_string(), IniValue::Int(0));
                section.insert("law.planned".to_string(), "uniform".into());
                section.insert("law.forced".to_string(), "uniform".into());
                section.insert("volatility.planned".to_string(), IniValue::Int(0));
                section.insert("volatility.forced".to_string(), IniValue::Int(0));
                section.insert("force-no-generation".to_string(), true.into());
            }
            IniWriter::default().write(&properties, &ini_path)?;

            let prepro_dir = area_dir.join("prepro");
            create_dir(&prepro_dir)?;
            for link in properties.keys() {
                matrix::write(&prepro_dir.join(format!("{link}_direct.txt")), &prepro)?;
                matrix::write(&prepro_dir.join(format!("{link}_indirect.txt")), &prepro)?;
                matrix::write(&prepro_dir.join(format!("{link}_mod.txt")), &modulation)?;
            }
        }
        Ok(())
    }

    fn upgrade_storages(study_dir: &Path) -> UpgradeResult<()> {
        let storage = study_dir.join("input/st-storage");
        for area_dir in sub_dirs(&storage.join("clusters"))? {
            update_sections(&area_dir.join("list.ini"), |_, section| {
                section.insert("efficiencywithdrawal".to_string(), IniValue::Int(1));
            })?;
        }
        for area_dir in sub_dirs(&storage.join("series"))? {
            for storage_dir in sub_dirs(&area_dir)? {
                for name in ["cost-injection.txt", "cost-withdrawal.txt", "cost-level.txt"] {
                    matrix::touch(&storage_dir.join(name))?;
                }
            }
        }
        Ok(())
    }
}

impl UpgradeStep for UpgradeTo0902 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(9, 0)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(9, 2)
    }

    fn files(&self) -> &'static [&'static str] {
        &["input/st-storage", GENERAL_DATA_PATH, "input/links"]
    }

    fn upgrade(&self, study_dir: &Path) -> UpgradeResult<()> {
        Self::upgrade_general_data(study_dir)?;
        Self::upgrade_links(study_dir)?;
        Self::upgrade_storages(study_dir)
    }
}

/// 9.2 → 9.3: time series refresh removed, grouped thermal/renewable outputs
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0903;

const REFRESH_KEYS: [&str; 6] = [
    "refreshtimeseries",
    "refreshintervalload",
    "refreshintervalhydro",
    "refreshintervalwind",
    "refreshintervalthermal",
    "refreshintervalsolar",
];

impl UpgradeStep for UpgradeTo0903 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(9, 2)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(9, 3)
    }

    fn files(&self) -> &'static [&'static str] {
        &[GENERAL_DATA_PATH]
    }

    fn upgrade(&self, study_dir: &Path) -> UpgradeResult<()> {
        let mut data = GeneralData::from_source(study_dir)?;
        for key in REFRESH_KEYS {
            data.remove("general", key);
        }
        if data.contains_section(VARIABLES_SELECTION) {
            thematic::trim_group_variables(data.section_mut(VARIABLES_SELECTION))?;
        }
        data.to_source(study_dir, false)?;
        Ok(())
    }
}
