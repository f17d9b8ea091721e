//! Study schema versions
//!
//! A version is a `(major, minor)` pair with a single-digit minor. Studies
//! written before 9.0 store it in compact form (`880` for 8.8); later
//! studies store the dotted form (`9.2`).

use crate::error::{ModelError, VersionError};
use crate::model::StudyAntares;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::str::FromStr;
use study_ini::IniValue;

/// First major version written in dotted form
const DOTTED_FORMAT_MAJOR: u8 = 9;

/// Schema revision of a study
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudyVersion {
    major: u8,
    minor: u8,
}

impl StudyVersion {
    /// Create version; `minor` must be a single digit
    ///
    /// # Panics
    /// Panics if `minor > 9`.
    #[inline]
    #[must_use]
    pub const fn new(major: u8, minor: u8) -> Self {
        assert!(minor <= 9, "minor version must be a single digit");
        Self { major, minor }
    }

    /// Major number
    #[inline]
    #[must_use]
    pub const fn major(&self) -> u8 {
        self.major
    }

    /// Minor number
    #[inline]
    #[must_use]
    pub const fn minor(&self) -> u8 {
        self.minor
    }

    /// Parse `"880"`, `"88"`, `"8"`, `"9.2"` or `"9.2.0"`
    ///
    /// # Errors
    /// Returns [`VersionError::Invalid`] for anything else.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let text = text.trim();
        let invalid = || VersionError::Invalid(text.to_string());

        if text.contains('.') {
            let parts: Vec<&str> = text.split('.').collect();
            if !(2..=3).contains(&parts.len()) || parts.iter().any(|p| !is_digits(p)) {
                return Err(invalid());
            }
            if parts.get(2).is_some_and(|patch| patch.bytes().any(|b| b != b'0')) {
                return Err(invalid());
            }
            let major = parts[0].parse::<u8>().map_err(|_| invalid())?;
            let minor = parts[1].parse::<u8>().map_err(|_| invalid())?;
            if minor > 9 {
                return Err(invalid());
            }
            return Ok(Self { major, minor });
        }

        if !is_digits(text) {
            return Err(invalid());
        }
        let digits = text.as_bytes();
        let (major, minor) = match digits {
            [major] => (major - b'0', 0),
            [major, minor] | [major, minor, b'0'] => (major - b'0', minor - b'0'),
            _ => return Err(invalid()),
        };
        Ok(Self { major, minor })
    }

    /// Compact form, e.g. `880`
    #[must_use]
    pub fn compact(&self) -> String {
        format!("{}{}0", self.major, self.minor)
    }

    /// Value stored in `study.antares`
    ///
    /// Compact integer before 9.0, dotted string afterwards.
    #[must_use]
    pub fn to_ini_value(&self) -> IniValue {
        if self.major < DOTTED_FORMAT_MAJOR {
            IniValue::Int(i64::from(self.major) * 100 + i64::from(self.minor) * 10)
        } else {
            IniValue::Str(self.to_string())
        }
    }

    /// Read a version from an INI value (`880`, `9.2` or `"9.2"`)
    ///
    /// # Errors
    /// Returns [`VersionError::Invalid`] for other values.
    pub fn from_ini_value(value: &IniValue) -> Result<Self, VersionError> {
        match value {
            IniValue::Int(_) | IniValue::Float(_) | IniValue::Str(_) => {
                Self::parse(&value.to_string())
            }
            other => Err(VersionError::Invalid(other.to_string())),
        }
    }

    /// Current version of the study in `study_dir`
    ///
    /// # Errors
    /// Returns an error if `study.antares` is missing or has no valid version.
    pub fn from_study(study_dir: &Path) -> Result<Self, ModelError> {
        StudyAntares::read_version(study_dir)
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

impl Display for StudyVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for StudyVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for StudyVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StudyVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_compact() {
        assert_eq!(StudyVersion::parse("880").unwrap(), StudyVersion::new(8, 8));
        assert_eq!(StudyVersion::parse("700").unwrap(), StudyVersion::new(7, 0));
        assert_eq!(StudyVersion::parse("86").unwrap(), StudyVersion::new(8, 6));
        assert_eq!(StudyVersion::parse("9").unwrap(), StudyVersion::new(9, 0));
    }

    #[test]
    fn parse_dotted() {
        assert_eq!(StudyVersion::parse("9.2").unwrap(), StudyVersion::new(9, 2));
        assert_eq!(StudyVersion::parse(" 9.2.0 ").unwrap(), StudyVersion::new(9, 2));
        assert_eq!(StudyVersion::parse("10.1").unwrap(), StudyVersion::new(10, 1));
    }

    #[test]
    fn parse_rejects_garbage() {
        for text in ["", "abc", "8.88", "9.2.1", "8815", "881", "9.", ".2", "9.x"] {
            assert!(StudyVersion::parse(text).is_err(), "{text:?} should be rejected");
        }
    }

    #[test]
    fn ordering() {
        let v88 = StudyVersion::new(8, 8);
        let v90 = StudyVersion::new(9, 0);
        let v92 = StudyVersion::new(9, 2);
        assert!(v88 < v90);
        assert!(v90 < v92);
        assert!(StudyVersion::new(7, 2) < StudyVersion::new(8, 0));
    }

    #[test]
    fn formats() {
        let v = StudyVersion::new(8, 8);
        assert_eq!(v.to_string(), "8.8");
        assert_eq!(v.compact(), "880");
        assert_eq!(v.to_ini_value(), IniValue::Int(880));
        assert_eq!(StudyVersion::new(9, 2).to_ini_value(), IniValue::from("9.2"));
    }

    #[test]
    fn from_ini_values() {
        assert_eq!(
            StudyVersion::from_ini_value(&IniValue::Int(860)).unwrap(),
            StudyVersion::new(8, 6)
        );
        assert_eq!(
            StudyVersion::from_ini_value(&IniValue::Float(9.2)).unwrap(),
            StudyVersion::new(9, 2)
        );
        assert_eq!(
            StudyVersion::from_ini_value(&IniValue::Float(9.0)).unwrap(),
            StudyVersion::new(9, 0)
        );
        assert!(StudyVersion::from_ini_value(&IniValue::Bool(true)).is_err());
    }

    #[test]
    fn serde_as_string() {
        let v = StudyVersion::new(9, 3);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"9.3\"");
        let back: StudyVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    proptest! {
        #[test]
        fn prop_display_parses_back(major in 0u8..100, minor in 0u8..10) {
            let v = StudyVersion::new(major, minor);
            prop_assert_eq!(StudyVersion::parse(&v.to_string()).unwrap(), v);
        }

        #[test]
        fn prop_compact_parses_back(major in 0u8..10, minor in 0u8..10) {
            let v = StudyVersion::new(major, minor);
            prop_assert_eq!(StudyVersion::parse(&v.compact()).unwrap(), v);
        }
    }
}
