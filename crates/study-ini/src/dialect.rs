//! Special-key configuration shared by readers and writers
//!
//! Reading collapses repeated occurrences of a special key into a list and
//! writing expands the list back into repeated lines. Both sides must use the
//! same [`SpecialKeys`] or a round-trip silently changes the data, so the set
//! is a value object handed to both constructors.

use crate::reader::IniReader;
use crate::writer::IniWriter;
use indexmap::IndexSet;

/// Option names whose occurrences accumulate into an ordered list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialKeys(IndexSet<String>);

impl SpecialKeys {
    /// No special key: every duplicate is last-wins
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from key names
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    /// Check whether `key` accumulates into a list
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    /// Iterate over key names in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of special keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no key is special
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reader configured with these keys
    #[must_use]
    pub fn reader(&self) -> IniReader {
        IniReader::new(self.clone())
    }

    /// Writer configured with these keys
    #[must_use]
    pub fn writer(&self) -> IniWriter {
        IniWriter::new(self.clone())
    }
}

impl<S: Into<String>> FromIterator<S> for SpecialKeys {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
