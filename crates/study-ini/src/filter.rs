//! Section and option filtering
//!
//! A filter narrows a read to the sections and options whose names fully
//! match a pattern. The reader uses it to stop scanning as soon as the
//! matching block of a file has been consumed.

use crate::error::{IniError, IniResult};
use regex::Regex;

/// Filter on section and option names
///
/// A missing pattern matches everything.
#[derive(Debug, Clone, Default)]
pub struct IniFilter {
    section_regex: Option<Regex>,
    option_regex: Option<Regex>,
}

impl IniFilter {
    /// Filter matching every section and option
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from exact names and/or patterns
    ///
    /// Exact names are escaped before being compiled. When a pattern is
    /// given for the same target it takes precedence over the exact name.
    /// Empty strings mean "no rule".
    ///
    /// # Errors
    /// Returns [`IniError::InvalidPattern`] if a pattern does not compile.
    pub fn from_parts(
        section: &str,
        option: &str,
        section_regex: Option<&str>,
        option_regex: Option<&str>,
    ) -> IniResult<Self> {
        Ok(Self {
            section_regex: build_rule(section, section_regex)?,
            option_regex: build_rule(option, option_regex)?,
        })
    }

    /// Exact match on one section
    ///
    /// # Errors
    /// Never fails for exact names; kept fallible for symmetry with patterns.
    pub fn section(name: &str) -> IniResult<Self> {
        Self::from_parts(name, "", None, None)
    }

    /// Exact match on one option of one section
    ///
    /// # Errors
    /// Never fails for exact names.
    pub fn section_option(section: &str, option: &str) -> IniResult<Self> {
        Self::from_parts(section, option, None, None)
    }

    /// Pattern match on section names
    ///
    /// # Errors
    /// Returns [`IniError::InvalidPattern`] if the pattern does not compile.
    pub fn section_regex(pattern: &str) -> IniResult<Self> {
        Self::from_parts("", "", Some(pattern), None)
    }

    /// Check a section name and, optionally, an option name
    ///
    /// An empty `option` always matches, so `matches(section, "")` answers
    /// "does this section qualify at all".
    #[must_use]
    pub fn matches(&self, section: &str, option: &str) -> bool {
        if let Some(re) = &self.section_regex {
            if !re.is_match(section) {
                return false;
            }
        }
        if let Some(re) = &self.option_regex {
            if !option.is_empty() && !re.is_match(option) {
                return false;
            }
        }
        true
    }

    /// Check whether this filter has no rule at all
    #[inline]
    #[must_use]
    pub fn is_match_all(&self) -> bool {
        self.section_regex.is_none() && self.option_regex.is_none()
    }
}

fn build_rule(exact: &str, pattern: Option<&str>) -> IniResult<Option<Regex>> {
    match pattern.filter(|p| !p.is_empty()) {
        Some(pattern) => compile_full(pattern).map(Some),
        None if !exact.is_empty() => compile_full(&regex::escape(exact)).map(Some),
        None => Ok(None),
    }
}

// Anchored on both sides for full-match semantics
fn compile_full(pattern: &str) -> IniResult<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| IniError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
