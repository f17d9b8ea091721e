use super::IniModel;
use crate::error::ModelError;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use study_ini::{IniDocument, IniValue, Section, SpecialKeys};

/// Location of the general settings, relative to the study directory
pub const GENERAL_DATA_PATH: &str = "settings/generaldata.ini";

/// Keys of `generaldata.ini` that may appear several times per section
const GENERAL_DATA_SPECIAL_KEYS: [&str; 5] = [
    "playlist_year_weight",
    "playlist_year +",
    "playlist_year -",
    "select_var -",
    "select_var +",
];

/// Read-modify-write handle over `settings/generaldata.ini`
///
/// Dereferences to the underlying [`IniDocument`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneralData(IniDocument);

impl GeneralData {
    /// Wrap a document
    #[inline]
    #[must_use]
    pub fn new(document: IniDocument) -> Self {
        Self(document)
    }

    /// Section by name
    #[inline]
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.0.get(name)
    }

    /// Section by name, created empty when absent
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        self.0.entry(name.to_string()).or_default()
    }

    /// Check if a section is present
    #[inline]
    #[must_use]
    pub fn contains_section(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Set an option, creating the section if needed
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<IniValue>) {
        self.section_mut(section).insert(key.to_string(), value.into());
    }

    /// Remove an option, keeping the order of the remaining ones
    pub fn remove(&mut self, section: &str, key: &str) -> Option<IniValue> {
        self.0.get_mut(section)?.shift_remove(key)
    }

    /// Rename an option in place
    ///
    /// Nothing happens when the option is absent.
    pub fn rename(&mut self, section: &str, old_key: &str, new_key: &str) {
        let Some(options) = self.0.get_mut(section) else {
            return;
        };
        if let Some(index) = options.get_index_of(old_key) {
            let value = options.shift_remove_index(index).map(|(_, v)| v);
            if let Some(value) = value {
                options.shift_insert(index, new_key.to_string(), value);
            }
        }
    }
}

impl Deref for GeneralData {
    type Target = IniDocument;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for GeneralData {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl IniModel for GeneralData {
    const INI_PATH: &'static str = GENERAL_DATA_PATH;

    fn special_keys() -> SpecialKeys {
        SpecialKeys::new(GENERAL_DATA_SPECIAL_KEYS)
    }

    fn from_document(document: IniDocument, _study_dir: &Path) -> Result<Self, ModelError> {
        Ok(Self(document))
    }

    fn to_document(&self) -> IniDocument {
        self.0.clone()
    }
}
