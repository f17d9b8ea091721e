//! Testing utilities for study workspace
//!
//! Shared fixtures laying out study trees in temporary directories.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use study_ini::{IniDocument, IniReader};
use tempfile::TempDir;

/// `generaldata.ini` of a 7.0 study, trimmed to the options upgrades touch
pub const GENERAL_DATA_0700: &str = "\
[general]
mode = Economy
horizon = 2030
nbyears = 2
filtering = true
custom-ts-numbers = false
refreshtimeseries = 0
refreshintervalload = 100
refreshintervalhydro = 100
refreshintervalwind = 100
refreshintervalthermal = 100
refreshintervalsolar = 100

[output]
synthesis = true
storenewset = false

[optimization]
transmission-capacities = true
include-constraints = true

[other preferences]
initial-reservoir-levels = cold start
hydro-pricing-mode = fast

[playlist]
playlist_reset = false
playlist_year + = 0
playlist_year + = 1
";

/// Study directory living as long as the fixture
pub struct StudyFixture {
    dir: TempDir,
}

impl StudyFixture {
    /// Study with a `study.antares` declaring `version` (raw text, e.g. `700` or `9.2`)
    pub fn new(version: &str) -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        fixture.write(
            "study.antares",
            &format!(
                "[antares]\nversion = {version}\ncaption = fixture\ncreated = 1700000000\n\
                 lastsave = 1700000000\nauthor = tester\n"
            ),
        );
        fixture
    }

    /// Study at `version` with the 7.0 general data
    pub fn with_general_data(version: &str) -> Self {
        let fixture = Self::new(version);
        fixture.write("settings/generaldata.ini", GENERAL_DATA_0700);
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a file, creating parent directories
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn mkdir(&self, relative: &str) {
        fs::create_dir_all(self.join(relative)).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.join(relative)).unwrap()
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.join(relative).exists()
    }

    pub fn read_ini(&self, relative: &str) -> IniDocument {
        IniReader::default().read(self.join(relative)).unwrap()
    }

    /// Replace the variables selection of `generaldata.ini`
    pub fn set_variables_selection(&self, plus: &[&str], minus: &[&str]) {
        let mut text = self.read("settings/generaldata.ini");
        text.push_str("\n[variables selection]\n");
        for token in plus {
            writeln!(text, "select_var + = {token}").unwrap();
        }
        for token in minus {
            writeln!(text, "select_var - = {token}").unwrap();
        }
        self.write("settings/generaldata.ini", &text);
    }

    /// Area directories under `input/areas`
    pub fn add_area(&self, area: &str) {
        self.mkdir(&format!("input/areas/{area}"));
    }

    /// Link `area → other` in the 8.1 layout: 8 columns per hour
    pub fn add_link_0801(&self, area: &str, other: &str, hours: usize) {
        let row = "100\t90\t0\t0\t0\t0\t0\t0\n";
        self.write(&format!("input/links/{area}/{other}.txt"), &row.repeat(hours));
        self.write(
            &format!("input/links/{area}/properties.ini"),
            &format!("[{other}]\nhurdles-cost = false\ntransmission = true\n"),
        );
    }

    /// Short-term storage `name` in `area`
    pub fn add_storage(&self, area: &str, name: &str) {
        self.write(
            &format!("input/st-storage/clusters/{area}/list.ini"),
            &format!("[{name}]\nname = {name}\ngroup = battery\nefficiency = 1\n"),
        );
        self.mkdir(&format!("input/st-storage/series/{area}/{name}"));
    }

    /// Thermal cluster `name` in `area`
    pub fn add_thermal(&self, area: &str, name: &str) {
        self.write(
            &format!("input/thermal/clusters/{area}/list.ini"),
            &format!("[{name}]\nname = {name}\ngroup = nuclear\nunitcount = 1\n"),
        );
        self.mkdir(&format!("input/thermal/series/{area}/{name}"));
    }
}

/// Every file under `root` except `study.antares`, by relative path
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, files);
            } else if path.file_name().is_some_and(|name| name != "study.antares") {
                let relative = path.strip_prefix(root).unwrap().to_path_buf();
                files.insert(relative, fs::read(&path).unwrap());
            }
        }
    }
    let mut files = BTreeMap::new();
    walk(root, root, &mut files);
    files
}

/// Template directory holding one empty study per name, e.g. `empty_study_880`
pub fn template_root(names: &[&str]) -> TempDir {
    let root = tempfile::tempdir().unwrap();
    for name in names {
        let template = root.path().join(name);
        fs::create_dir_all(template.join("settings")).unwrap();
        fs::create_dir_all(template.join("input/areas")).unwrap();
        fs::write(template.join("settings/generaldata.ini"), GENERAL_DATA_0700).unwrap();
        fs::write(
            template.join("study.antares"),
            "[antares]\nversion = 0\ncaption = template\ncreated = 0\nlastsave = 0\nauthor = \n",
        )
        .unwrap();
    }
    root
}
