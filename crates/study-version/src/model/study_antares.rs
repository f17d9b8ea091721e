use super::IniModel;
use crate::error::ModelError;
use crate::version::StudyVersion;
use chrono::{DateTime, Utc};
use std::path::Path;
use study_ini::{IniDocument, IniFilter, IniReader, IniValue, Section};

/// Location of the study header, relative to the study directory
pub const STUDY_ANTARES_PATH: &str = "study.antares";

const SECTION: &str = "antares";

/// Header of a study: version, caption, author and dates
///
/// Options other than the known ones are kept and written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyAntares {
    /// Schema version of the study
    pub version: StudyVersion,
    /// Display name
    pub caption: String,
    /// Creation date
    pub created_date: DateTime<Utc>,
    /// Last save date
    pub last_save_date: DateTime<Utc>,
    /// Author name
    pub author: String,
    extra: Section,
}

impl StudyAntares {
    /// Create a header with both dates set to `date`
    #[must_use]
    pub fn new(
        version: StudyVersion,
        caption: impl Into<String>,
        author: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            version,
            caption: caption.into(),
            created_date: date,
            last_save_date: date,
            author: author.into(),
            extra: Section::new(),
        }
    }

    /// Options without a dedicated field
    #[inline]
    #[must_use]
    pub fn extra(&self) -> &Section {
        &self.extra
    }

    /// Read only the version of the study in `study_dir`
    ///
    /// Stops scanning `study.antares` as soon as the version is found.
    ///
    /// # Errors
    /// Returns [`ModelError::MissingFile`] when the header is absent, or a
    /// field error when the version is missing or malformed.
    pub fn read_version(study_dir: &Path) -> Result<StudyVersion, ModelError> {
        let path = study_dir.join(STUDY_ANTARES_PATH);
        if !path.is_file() {
            return Err(ModelError::MissingFile(path));
        }
        let filter = IniFilter::section_option(SECTION, "version")?;
        let document = IniReader::default().read_filtered(&path, &filter)?;
        let value = document
            .get(SECTION)
            .and_then(|options| options.get("version"))
            .ok_or_else(|| ModelError::missing_field(&path, SECTION, "version"))?;
        StudyVersion::from_ini_value(value)
            .map_err(|source| ModelError::InvalidVersion { path, source })
    }
}

fn timestamp(value: Option<&IniValue>) -> Option<DateTime<Utc>> {
    value
        .and_then(IniValue::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

fn text(value: Option<IniValue>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl IniModel for StudyAntares {
    const INI_PATH: &'static str = STUDY_ANTARES_PATH;

    fn from_document(mut document: IniDocument, study_dir: &Path) -> Result<Self, ModelError> {
        let path = study_dir.join(STUDY_ANTARES_PATH);
        let mut options = document
            .shift_remove(SECTION)
            .ok_or_else(|| ModelError::MissingFile(path.clone()))?;

        let version = options
            .shift_remove("version")
            .ok_or_else(|| ModelError::missing_field(&path, SECTION, "version"))?;
        let version =
            StudyVersion::from_ini_value(&version).map_err(|source| ModelError::InvalidVersion {
                path: path.clone(),
                source,
            })?;

        let created = options.shift_remove("created");
        let last_save = options.shift_remove("lastsave");
        let created_date = timestamp(created.as_ref()).unwrap_or_else(|| {
            tracing::warn!(
                "{}: creation date {:?} unreadable, using now",
                path.display(),
                text(created)
            );
            Utc::now()
        });
        let last_save_date = timestamp(last_save.as_ref()).unwrap_or(created_date);

        Ok(Self {
            version,
            caption: text(options.shift_remove("caption")),
            created_date,
            last_save_date,
            author: text(options.shift_remove("author")),
            extra: options,
        })
    }

    fn to_document(&self) -> IniDocument {
        let mut options = Section::new();
        options.insert("version".to_string(), self.version.to_ini_value());
        options.insert("caption".to_string(), self.caption.clone().into());
        options.insert("created".to_string(), self.created_date.timestamp().into());
        options.insert("lastsave".to_string(), self.last_save_date.timestamp().into());
        options.insert("author".to_string(), self.author.clone().into());
        options.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut document = IniDocument::new();
        document.insert(SECTION.to_string(), options);
        document
    }

    fn refresh_timestamp(&mut self) {
        self.last_save_date = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, text: &str) {
        std::fs::write(dir.join(STUDY_ANTARES_PATH), text).unwrap();
    }

    #[test]
    fn parse_compact_header() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "[antares]\nversion = 880\ncaption = North Sea\ncreated = 1700000000\n\
             lastsave = 1700000100\nauthor = planner\n",
        );

        let study = StudyAntares::from_source(dir.path()).unwrap();
        assert_eq!(study.version, StudyVersion::new(8, 8));
        assert_eq!(study.caption, "North Sea");
        assert_eq!(study.author, "planner");
        assert_eq!(study.created_date.timestamp(), 1_700_000_000);
        assert_eq!(study.last_save_date.timestamp(), 1_700_000_100);
        assert!(study.extra().is_empty());
    }

    #[test]
    fn dotted_version_and_extra_options() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "[antares]\nversion = 9.2\ncaption = x\neditor = Antares\n");

        let study = StudyAntares::from_source(dir.path()).unwrap();
        assert_eq!(study.version, StudyVersion::new(9, 2));
        assert_eq!(study.extra()["editor"], IniValue::from("Antares"));
    }

    #[test]
    fn unreadable_creation_date_falls_back_to_now() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "[antares]\nversion = 880\ncaption = x\ncreated = yesterday\n");

        let before = Utc::now().timestamp();
        let study = StudyAntares::from_source(dir.path()).unwrap();
        assert!(study.created_date.timestamp() >= before);
        assert_eq!(study.last_save_date, study.created_date);
        assert!(!study.extra().contains_key("created"));
    }

    #[test]
    fn save_writes_compact_or_dotted() {
        let dir = tempfile::tempdir().unwrap();
        let date = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let mut study = StudyAntares::new(StudyVersion::new(8, 6), "a", "b", date);
        study.to_source(dir.path(), false).unwrap();
        let text = std::fs::read_to_string(dir.path().join(STUDY_ANTARES_PATH)).unwrap();
        assert!(text.contains("version = 860\n"));
        assert!(text.contains("lastsave = 1700000000\n"));

        study.version = StudyVersion::new(9, 3);
        study.to_source(dir.path(), true).unwrap();
        let back = StudyAntares::from_source(dir.path()).unwrap();
        assert_eq!(back.version, StudyVersion::new(9, 3));
        assert!(back.last_save_date > date);
        assert_eq!(back.created_date, date);
    }

    #[test]
    fn read_version_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            StudyAntares::read_version(dir.path()),
            Err(ModelError::MissingFile(_))
        ));

        write(dir.path(), "[antares]\ncaption = no version\n");
        assert!(matches!(
            StudyAntares::read_version(dir.path()),
            Err(ModelError::MissingField { .. })
        ));

        write(dir.path(), "[antares]\nversion = latest\n");
        assert!(matches!(
            StudyAntares::read_version(dir.path()),
            Err(ModelError::InvalidVersion { .. })
        ));
    }
}
