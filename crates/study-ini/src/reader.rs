//! Line-oriented reader for the study INI dialect
//!
//! The dialect is not compatible with standard INI parsers:
//!
//! - Duplicate sections are merged, duplicate options are last-wins.
//! - Options declared in [`SpecialKeys`] accumulate into lists, e.g. the
//!   `playlist_year +` entries of `settings/generaldata.ini` or the `+`
//!   entries of `input/areas/sets.ini`:
//!
//!   ```text
//!   [all areas]
//!   caption = All areas
//!   + = east
//!   + = west
//!   ```
//!
//! - Options found before the first header land in a default section
//!   (`settings` unless configured otherwise).
//! - Square brackets inside section names are preserved
//!   (`[[allocation]]` is the section `[allocation]`).
//! - A section without options yields an empty mapping.

use crate::dialect::SpecialKeys;
use crate::error::{IniError, IniResult};
use crate::filter::IniFilter;
use crate::value::convert_value;
use crate::{IniDocument, IniValue, Section};
use encoding_rs::WINDOWS_1252;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Section name used for options that precede any header
pub const DEFAULT_SECTION_NAME: &str = "settings";

/// Bytes left undefined by Windows-1252
const UNDEFINED_1252: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Reader for the study INI dialect
///
/// Stateless between calls: every read builds its own parse state.
#[derive(Debug, Clone)]
pub struct IniReader {
    special_keys: SpecialKeys,
    section_name: String,
}

impl Default for IniReader {
    fn default() -> Self {
        Self::new(SpecialKeys::none())
    }
}

impl IniReader {
    /// Create reader with the given special keys
    #[inline]
    #[must_use]
    pub fn new(special_keys: SpecialKeys) -> Self {
        Self {
            special_keys,
            section_name: DEFAULT_SECTION_NAME.to_string(),
        }
    }

    /// Set the section name used for section-less options
    #[inline]
    #[must_use]
    pub fn with_section_name(mut self, section_name: impl Into<String>) -> Self {
        self.section_name = section_name.into();
        self
    }

    /// Special keys of this reader
    #[inline]
    #[must_use]
    pub fn special_keys(&self) -> &SpecialKeys {
        &self.special_keys
    }

    /// Default section name of this reader
    #[inline]
    #[must_use]
    pub fn section_name(&self) -> &str {
        &self.section_name
    }

    /// Read a whole file
    ///
    /// A missing file yields an empty document.
    ///
    /// # Errors
    /// Returns an error on malformed lines, undecodable content or IO failure.
    pub fn read(&self, path: impl AsRef<Path>) -> IniResult<IniDocument> {
        self.read_filtered(path, &IniFilter::all())
    }

    /// Read the part of a file selected by `filter`
    ///
    /// Parsing stops at the first section (or option) that no longer
    /// matches once matching content has been collected, so the rest of
    /// the file is never scanned.
    ///
    /// # Errors
    /// Returns an error on malformed lines, undecodable content or IO failure.
    pub fn read_filtered(
        &self,
        path: impl AsRef<Path>,
        filter: &IniFilter,
    ) -> IniResult<IniDocument> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} is missing, using an empty document", path.display());
                return Ok(IniDocument::new());
            }
            Err(e) => return Err(IniError::io_error(path, e)),
        };

        match self.parse_lines(BufReader::new(file).lines(), filter, path) {
            Err(IniError::Io { source, .. }) if source.kind() == io::ErrorKind::InvalidData => {
                // Files edited on Windows may be encoded in cp1252
                tracing::debug!("{} is not UTF-8, retrying as Windows-1252", path.display());
                let bytes = std::fs::read(path).map_err(|e| IniError::io_error(path, e))?;
                let text = decode_1252(&bytes).ok_or_else(|| IniError::Decode {
                    path: path.to_path_buf(),
                })?;
                self.parse_str_filtered(&text, filter)
            }
            other => other,
        }
    }

    /// Read from any buffered source
    ///
    /// # Errors
    /// Returns an error on malformed lines or read failure.
    pub fn read_from<R: BufRead>(&self, reader: R, filter: &IniFilter) -> IniResult<IniDocument> {
        self.parse_lines(reader.lines(), filter, Path::new("<stream>"))
    }

    /// Parse in-memory text
    ///
    /// # Errors
    /// Returns [`IniError::InvalidLine`] on malformed lines.
    pub fn parse_str(&self, text: &str) -> IniResult<IniDocument> {
        self.parse_str_filtered(text, &IniFilter::all())
    }

    /// Parse the part of in-memory text selected by `filter`
    ///
    /// # Errors
    /// Returns [`IniError::InvalidLine`] on malformed lines.
    pub fn parse_str_filtered(&self, text: &str, filter: &IniFilter) -> IniResult<IniDocument> {
        let lines = text.lines().map(|line| Ok(line.to_string()));
        self.parse_lines(lines, filter, Path::new("<memory>"))
    }

    fn parse_lines<I>(&self, lines: I, filter: &IniFilter, origin: &Path) -> IniResult<IniDocument>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let mut state = ParseState::new(&self.special_keys, filter);
        let mut section_name = self.section_name.clone();

        for (index, line) in lines.into_iter().enumerate() {
            let line = line.map_err(|e| IniError::io_error(origin, e))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            let stop = if line.starts_with('[') {
                let end = line
                    .rfind(']')
                    .ok_or_else(|| IniError::invalid_line(index + 1, line))?;
                section_name = line[1..end].to_string();
                state.handle_section(&section_name)
            } else if let Some((key, value)) = line.split_once('=') {
                state.handle_option(&section_name, key.trim(), value.trim())
            } else {
                return Err(IniError::invalid_line(index + 1, line));
            };

            if stop {
                tracing::debug!(
                    "filter no longer matches at line {} of {}, stopping",
                    index + 1,
                    origin.display()
                );
                break;
            }
        }

        Ok(state.into_document())
    }
}

/// Per-call parse state
///
/// `current_section` / `current_option` record the last collected items;
/// they decide between skipping and stopping when the filter rejects a name.
struct ParseState<'a> {
    special_keys: &'a SpecialKeys,
    filter: &'a IniFilter,
    sections: IniDocument,
    current_section: Option<String>,
    current_option: Option<String>,
}

impl<'a> ParseState<'a> {
    fn new(special_keys: &'a SpecialKeys, filter: &'a IniFilter) -> Self {
        Self {
            special_keys,
            filter,
            sections: IniDocument::new(),
            current_section: None,
            current_option: None,
        }
    }

    /// Returns `true` when parsing must stop
    fn handle_section(&mut self, section: &str) -> bool {
        let matched = self.filter.matches(section, "");
        if self.current_section.is_some() && !matched {
            return true;
        }
        if matched {
            self.append_section(section);
        }
        false
    }

    /// Returns `true` when parsing must stop
    fn handle_option(&mut self, section: &str, key: &str, value: &str) -> bool {
        let matched = self.filter.matches(section, key);
        if matched {
            self.append_option(section, key, value);
            return false;
        }
        // Skip while nothing was collected, stop once the section is left
        self.current_option.is_some() && !self.filter.matches(section, "")
    }

    fn append_section(&mut self, section: &str) {
        self.sections.entry(section.to_string()).or_default();
        self.current_section = Some(section.to_string());
        self.current_option = None;
    }

    fn append_option(&mut self, section: &str, key: &str, value: &str) {
        let values = self.sections.entry(section.to_string()).or_default();
        let value = convert_value(value);
        if self.special_keys.contains(key) {
            push_special(values, key, value);
        } else {
            values.insert(key.to_string(), value);
        }
        self.current_option = Some(key.to_string());
    }

    fn into_document(self) -> IniDocument {
        self.sections
    }
}

/// Strict Windows-1252 decoding, `None` on an undefined byte
fn decode_1252(bytes: &[u8]) -> Option<std::borrow::Cow<'_, str>> {
    if bytes.iter().any(|b| UNDEFINED_1252.contains(b)) {
        return None;
    }
    WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)
}

fn push_special(values: &mut Section, key: &str, value: IniValue) {
    match values.entry(key.to_string()).or_insert_with(|| IniValue::List(Vec::new())) {
        IniValue::List(items) => items.push(value),
        other => *other = IniValue::List(vec![value]),
    }
}

/// Reader for files made of bare `key = value` lines
///
/// Returns the option mapping of the implicit section directly.
#[derive(Debug, Clone, Default)]
pub struct SimpleKeyValueReader {
    inner: IniReader,
}

impl SimpleKeyValueReader {
    /// Create reader with the given special keys
    #[inline]
    #[must_use]
    pub fn new(special_keys: SpecialKeys) -> Self {
        Self {
            inner: IniReader::new(special_keys),
        }
    }

    /// Read a section-less file
    ///
    /// A missing file, or a file whose options all sit under headers,
    /// yields an empty mapping.
    ///
    /// # Errors
    /// Returns an error on malformed lines, undecodable content or IO failure.
    pub fn read(&self, path: impl AsRef<Path>) -> IniResult<Section> {
        let mut sections = self.inner.read(path)?;
        Ok(sections
            .shift_remove(self.inner.section_name())
            .unwrap_or_default())
    }

    /// Parse section-less in-memory text
    ///
    /// # Errors
    /// Returns [`IniError::InvalidLine`] on malformed lines.
    pub fn parse_str(&self, text: &str) -> IniResult<Section> {
        let mut sections = self.inner.parse_str(text)?;
        Ok(sections
            .shift_remove(self.inner.section_name())
            .unwrap_or_default())
    }
}
