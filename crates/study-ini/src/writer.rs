//! Writer for the study INI dialect
//!
//! Output layout:
//!
//! ```text
//! [section]
//! key = value
//! special = first
//! special = second
//!
//! ```
//!
//! Newlines inside a string value are written as a `\n\t` continuation.
//! [`IniReader`](crate::IniReader) does not parse continuations: the
//! continued line is reported as [`IniError::InvalidLine`], so multi-line
//! strings do not survive a round trip.

use crate::dialect::SpecialKeys;
use crate::error::{IniError, IniResult};
use crate::{IniDocument, IniValue, Section};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writer for sectioned INI files
///
/// Lists stored under a special key are expanded into one line per element.
#[derive(Debug, Clone, Default)]
pub struct IniWriter {
    special_keys: SpecialKeys,
}

impl IniWriter {
    /// Create writer with the given special keys
    #[inline]
    #[must_use]
    pub fn new(special_keys: SpecialKeys) -> Self {
        Self { special_keys }
    }

    /// Special keys of this writer
    #[inline]
    #[must_use]
    pub fn special_keys(&self) -> &SpecialKeys {
        &self.special_keys
    }

    /// Render a document to INI text
    #[must_use]
    pub fn render(&self, data: &IniDocument) -> String {
        let mut out = String::new();
        for (section, options) in data {
            let _ = writeln!(out, "[{section}]");
            for (key, value) in options {
                match value {
                    IniValue::List(items) if self.special_keys.contains(key) => {
                        for item in items {
                            push_line(&mut out, key, " = ", item);
                        }
                    }
                    _ => push_line(&mut out, key, " = ", value),
                }
            }
            out.push('\n');
        }
        out
    }

    /// Write a document to `path`
    ///
    /// The parent directory must already exist.
    ///
    /// # Errors
    /// Returns [`IniError::Io`] if the file cannot be written.
    pub fn write(&self, data: &IniDocument, path: impl AsRef<Path>) -> IniResult<()> {
        let path = path.as_ref();
        write_text(path, &self.render(data))?;
        tracing::debug!("wrote {} section(s) to {}", data.len(), path.display());
        Ok(())
    }
}

/// Writer for section-less `key=value` files
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleKeyValueWriter;

impl SimpleKeyValueWriter {
    /// Create writer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Render options to text, skipping null values
    #[must_use]
    pub fn render(&self, data: &Section) -> String {
        let mut out = String::new();
        for (key, value) in data {
            push_line(&mut out, key, "=", value);
        }
        out
    }

    /// Write options to `path`
    ///
    /// # Errors
    /// Returns [`IniError::Io`] if the file cannot be written.
    pub fn write(&self, data: &Section, path: impl AsRef<Path>) -> IniResult<()> {
        write_text(path.as_ref(), &self.render(data))
    }
}

/// One `key<delimiter>value` line; `Null` is skipped, newlines continue with a tab
fn push_line(out: &mut String, key: &str, delimiter: &str, value: &IniValue) {
    if value.is_null() {
        return;
    }
    let text = value.to_string().replace('\n', "\n\t");
    let _ = writeln!(out, "{key}{delimiter}{text}");
}

fn write_text(path: &Path, text: &str) -> IniResult<()> {
    let file = File::create(path).map_err(|e| IniError::io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|e| IniError::io_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IniReader;
    use indexmap::indexmap;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_sections() {
        let data: IniDocument = indexmap! {
            "general".to_string() => indexmap! {
                "mode".to_string() => IniValue::from("Economy"),
                "nbyears".to_string() => IniValue::Int(2),
                "derated".to_string() => IniValue::Bool(false),
            },
            "empty".to_string() => Section::new(),
        };
        let text = IniWriter::default().render(&data);
        assert_eq!(
            text,
            "[general]\nmode = Economy\nnbyears = 2\nderated = false\n\n[empty]\n\n"
        );
    }

    #[test]
    fn special_lists_expand() {
        let data: IniDocument = indexmap! {
            "all areas".to_string() => indexmap! {
                "+".to_string() => IniValue::List(vec!["east".into(), "west".into()]),
            },
        };
        let text = IniWriter::new(SpecialKeys::new(["+"])).render(&data);
        assert_eq!(text, "[all areas]\n+ = east\n+ = west\n\n");
    }

    #[test]
    fn lists_under_plain_keys_stay_on_one_line() {
        let data: IniDocument = indexmap! {
            "a".to_string() => indexmap! {
                "k".to_string() => IniValue::List(vec![1.into(), 2.into()]),
            },
        };
        assert_eq!(IniWriter::default().render(&data), "[a]\nk = [1, 2]\n\n");
    }

    #[test]
    fn multiline_values_are_indented() {
        let data: IniDocument = indexmap! {
            "a".to_string() => indexmap! {
                "comments".to_string() => IniValue::from("line one\nline two"),
            },
        };
        let text = IniWriter::default().render(&data);
        assert_eq!(text, "[a]\ncomments = line one\n\tline two\n\n");

        let err = IniReader::default().parse_str(&text).unwrap_err();
        assert!(matches!(err, IniError::InvalidLine { line_number: 3, .. }));
    }

    #[test]
    fn null_values_skipped() {
        let data: Section = indexmap! {
            "solver".to_string() => IniValue::from("Cbc"),
            "timelimit".to_string() => IniValue::Null,
            "gap".to_string() => IniValue::Float(0.5),
        };
        assert_eq!(SimpleKeyValueWriter::new().render(&data), "solver=Cbc\ngap=0.5\n");
    }

    #[test]
    fn write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("properties.ini");
        let data: IniDocument = indexmap! {
            "north".to_string() => indexmap! {
                "hurdles-cost".to_string() => IniValue::Bool(true),
                "filter-synthesis".to_string() => IniValue::from("hourly, daily"),
            },
        };
        IniWriter::default().write(&data, &path).unwrap();
        assert_eq!(IniReader::default().read(&path).unwrap(), data);
    }

    #[test]
    fn missing_parent_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("file.ini");
        let err = IniWriter::default().write(&IniDocument::new(), &path).unwrap_err();
        assert!(matches!(err, IniError::Io { .. }));
    }
}
