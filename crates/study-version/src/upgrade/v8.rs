use super::matrix;
use super::{
    create_dir, files_with_extension, remove_file, stem, sub_dirs, update_sections, UpgradeStep,
};
use crate::error::UpgradeResult;
use crate::model::{GeneralData, IniModel, GENERAL_DATA_PATH};
use crate::version::StudyVersion;
use std::path::Path;
use study_ini::{IniDocument, IniReader, IniValue, IniWriter, Section};

/// 7.2 → 8.0: hydro heuristic, export structure, unfeasible problem behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0800;

impl UpgradeStep for UpgradeTo0800 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(7, 2)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(8, 0)
    }

    fn files(&self) -> &'static [&'static str] {
        &[GENERAL_DATA_PATH]
    }

    fn upgrade(&self, study_dir: &Path) -> UpgradeResult<()> {
        let mut data = GeneralData::from_source(study_dir)?;
        data.set("other preferences", "hydro-heuristic-policy", "accommodate rule curves");
        data.set("optimization", "include-exportstructure", false);
        data.set("optimization", "include-unfeasible-problem-behavior", "error-verbose");
        data.rename("general", "custom-ts-numbers", "custom-scenario");
        data.to_source(study_dir, false)?;
        Ok(())
    }
}

/// 8.0 → 8.1: renewable clusters
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0801;

impl UpgradeStep for UpgradeTo0801 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(8, 0)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(8, 1)
    }

    fn files(&self) -> &'static [&'static str] {
        &[GENERAL_DATA_PATH, "input/renewables"]
    }

    fn upgrade(&self, study_dir: &Path) -> UpgradeResult<()> {
        let mut data = GeneralData::from_source(study_dir)?;
        data.set("other preferences", "renewable-generation-modelling", "aggregated");
        data.to_source(study_dir, false)?;

        let renewables = study_dir.join("input/renewables");
        create_dir(&renewables.join("clusters"))?;
        create_dir(&renewables.join("series"))?;
        Ok(())
    }
}

/// 8.1 → 8.2: link capacities move to their own matrices
///
/// `input/links/<area>/<link>.txt` holds 8 columns: direct capacity,
/// indirect capacity, then 6 parameter columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0802;

impl UpgradeStep for UpgradeTo0802 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(8, 1)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(8, 2)
    }

    fn files(&self) -> &'static [&'static str] {
        &["input/links"]
    }

    fn upgrade(&self, study_dir: &Path) -> UpgradeResult<()> {
        for area_dir in sub_dirs(&study_dir.join("input/links"))? {
            let capacities = area_dir.join("capacities");
            create_dir(&capacities)?;
            for link_path in files_with_extension(&area_dir, "txt")? {
                let link = stem(&link_path);
                let values = matrix::read(&link_path)?;
                matrix::write(
                    &area_dir.join(format!("{link}_parameters.txt")),
                    &matrix::columns(&values, 2..8),
                )?;
                matrix::write(
                    &capacities.join(format!("{link}_direct.txt")),
                    &matrix::columns(&values, 0..1),
                )?;
                matrix::write(
                    &capacities.join(format!("{link}_indirect.txt")),
                    &matrix::columns(&values, 1..2),
                )?;
                remove_file(&link_path)?;
            }
        }
        Ok(())
    }
}

/// 8.2 → 8.3: adequacy patch
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0803;

impl UpgradeStep for UpgradeTo0803 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(8, 2)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(8, 3)
    }

    fn files(&self) -> &'static [&'static str] {
        &[GENERAL_DATA_PATH, "input/areas"]
    }

    fn upgrade(&self, study_dir: &Path) -> UpgradeResult<()> {
        let mut data = GeneralData::from_source(study_dir)?;
        data.set("adequacy patch", "include-adq-patch", false);
        data.set(
            "adequacy patch",
            "set-to-null-ntc-between-physical-out-for-first-step",
            true,
        );
        data.set(
            "adequacy patch",
            "set-to-null-ntc-from-physical-out-to-physical-in-for-first-step",
            true,
        );
        data.set("optimization", "include-split-exported-mps", false);
        data.to_source(study_dir, false)?;

        let mut patch = Section::new();
        patch.insert("adequacy-patch-mode".to_string(), "outside".into());
        let mut document = IniDocument::new();
        document.insert("adequacy-patch".to_string(), patch);
        for area_dir in sub_dirs(&study_dir.join("input/areas"))? {
            IniWriter::default().write(&document, area_dir.join("adequacy_patch.ini"))?;
        }
        Ok(())
    }
}

/// 8.3 → 8.4: transmission capacities become an enumeration
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0804;

impl UpgradeStep for UpgradeTo0804 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(8, 3)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(8, 4)
    }

    fn files(&self) -> &'static [&'static str] {
        &[GENERAL_DATA_PATH]
    }

    fn upgrade(&self, study_dir: &Path) -> UpgradeResult<()> {
        let mut data = GeneralData::from_source(study_dir)?;
        let optimization = data.section_mut("optimization");
        if let Some(value) = optimization.get_mut("transmission-capacities") {
            let renamed = match &*value {
                IniValue::Bool(true) => Some("local-values"),
                IniValue::Bool(false) => Some("null-for-all-links"),
                other if other.as_str() == Some("infinite") => Some("infinite-for-all-links"),
                _ => None,
            };
            if let Some(renamed) = renamed {
                *value = renamed.into();
            }
        }
        optimization.shift_remove("include-split-exported-mps");
        data.to_source(study_dir, false)?;
        Ok(())
    }
}

/// 8.4 → 8.5: curtailment sharing rule
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0805;

impl UpgradeStep for UpgradeTo0805 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(8, 4)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(8, 5)
    }

    fn files(&self) -> &'static [&'static str] {
        &[GENERAL_DATA_PATH]
    }

    fn upgrade(&self, study_dir: &Path) -> UpgradeResult<()> {
        let mut data = GeneralData::from_source(study_dir)?;
        let patch = data.section_mut("adequacy patch");
        let fields: [(&str, IniValue); 6] = [
            ("price-taking-order", "DENS".into()),
            ("include-hurdle-cost-csr", false.into()),
            ("check-csr-cost-function", false.into()),
            ("threshold-initiate-curtailment-sharing-rule", IniValue::Float(0.0)),
            ("threshold-display-local-matching-rule-violations", IniValue::Float(0.0)),
            ("threshold-csr-variable-bounds-relaxation", IniValue::Int(3)),
        ];
        for (key, value) in fields {
            patch.insert(key.to_string(), value);
        }
        data.to_source(study_dir, false)?;
        Ok(())
    }
}

/// 8.5 → 8.6: short-term storages and hydro minimum generation
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0806;

impl UpgradeStep for UpgradeTo0806 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(8, 5)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(8, 6)
    }

    fn files(&self) -> &'static [&'static str] {
        &[GENERAL_DATA_PATH, "input/areas", "input/hydro", "input/st-storage"]
    }

    fn upgrade(&self, study_dir: &Path) -> UpgradeResult<()> {
        let mut data = GeneralData::from_source(study_dir)?;
        data.set("adequacy patch", "enable-first-step", true);
        data.to_source(study_dir, false)?;

        let storage = study_dir.join("input/st-storage");
        let hydro_series = study_dir.join("input/hydro/series");
        create_dir(&storage.join("clusters"))?;
        create_dir(&storage.join("series"))?;

        let mingen = matrix::filled(matrix::HOURS_PER_YEAR, 1, 0.0);
        for area_dir in sub_dirs(&study_dir.join("input/areas"))? {
            let area = stem(&area_dir);
            let clusters = storage.join("clusters").join(&area);
            create_dir(&clusters)?;
            matrix::touch(&clusters.join("list.ini"))?;

            let series = hydro_series.join(&area);
            create_dir(&series)?;
            matrix::write(&series.join("mingen.txt"), &mingen)?;
        }
        Ok(())
    }
}

/// 8.6 → 8.7: binding constraint groups, thermal cluster costs
///
/// Binding constraint time series are split by operator:
///
/// | operator | matrices |
/// |---|---|
/// | `less` | `<id>_lt.txt` |
/// | `greater` | `<id>_gt.txt` |
/// | `equal` | `<id>_eq.txt` |
/// | `both` | `<id>_lt.txt`, `<id>_gt.txt` |
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0807;

impl UpgradeTo0807 {
    fn split_constraint(dir: &Path, id: &str, operator: &str) -> UpgradeResult<()> {
        let source = dir.join(format!("{id}.txt"));
        if !source.is_file() {
            tracing::warn!("{} is missing, skipped", source.display());
            return Ok(());
        }
        let values = matrix::read(&source)?;
        let targets: &[(&str, usize)] = match operator {
            "less" => &[("lt", 0)],
            "greater" => &[("gt", 1)],
            "equal" => &[("eq", 2)],
            "both" => &[("lt", 0), ("gt", 1)],
            other => {
                tracing::warn!("unknown operator {other:?} for binding constraint {id}");
                &[]
            }
        };
        for &(suffix, column) in targets {
            matrix::write(
                &dir.join(format!("{id}_{suffix}.txt")),
                &matrix::columns(&values, column..column + 1),
            )?;
        }
        remove_file(&source)
    }
}

impl UpgradeStep for UpgradeTo0807 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(8, 6)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(8, 7)
    }

    fn files(&self) -> &'static [&'static str] {
        &["input/bindingconstraints", "input/thermal"]
    }

    fn upgrade(&self, study_dir: &Path) -> UpgradeResult<()> {
        let constraints_dir = study_dir.join("input/bindingconstraints");
        let ini_path = constraints_dir.join("bindingconstraints.ini");
        if ini_path.is_file() {
            let mut document = IniReader::default().read(&ini_path)?;
            for section in document.values_mut() {
                section.insert("group".to_string(), "default".into());
                let id = section.get("id").map(ToString::to_string).unwrap_or_default();
                let operator = section
                    .get("operator")
                    .map(ToString::to_string)
                    .unwrap_or_default();
                if !id.is_empty() {
                    Self::split_constraint(&constraints_dir, &id, &operator)?;
                }
            }
            IniWriter::default().write(&document, &ini_path)?;
        }

        let thermal = study_dir.join("input/thermal");
        for area_dir in sub_dirs(&thermal.join("clusters"))? {
            update_sections(&area_dir.join("list.ini"), |_, section| {
                section.insert("costgeneration".to_string(), "SetManually".into());
                section.insert("efficiency".to_string(), IniValue::Int(100));
                section.insert("variableomcost".to_string(), IniValue::Int(0));
            })?;
        }
        for area_dir in sub_dirs(&thermal.join("series"))? {
            for cluster_dir in sub_dirs(&area_dir)? {
                matrix::touch(&cluster_dir.join("CO2Cost.txt"))?;
                matrix::touch(&cluster_dir.join("fuelCost.txt"))?;
            }
        }
        Ok(())
    }
}

/// 8.7 → 8.8: short-term storages can be disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeTo0808;

impl UpgradeStep for UpgradeTo0808 {
    fn old_version(&self) -> StudyVersion {
        StudyVersion::new(8, 7)
    }

    fn new_version(&self) -> StudyVersion {
        StudyVersion::new(8, 8)
    }

    fn files(&self) -> &'static [&'static str] {
        &["input/st-storage"]
    }

    fn upgrade(&self, study_dir: &Path) -> UpgradeResult<()> {
        for area_dir in sub_dirs(&study_dir.join("input/st-storage/clusters"))? {
            update_sections(&area_dir.join("list.ini"), |_, section| {
                section.insert("enabled".to_string(), true.into());
            })?;
        }
        Ok(())
    }
}
