//! Study INI dialect
//!
//! Reader and writer for the INI files found in simulation studies. The
//! dialect tolerates duplicate sections and keys, section-less files and
//! brackets inside section names.
//!
//! # Core Concepts
//!
//! - [`IniDocument`]: ordered mapping section → option → [`IniValue`]
//! - [`SpecialKeys`]: option names accumulated into lists, shared by reader and writer
//! - [`IniFilter`]: section/option selection enabling partial reads
//! - [`IniReader`] / [`IniWriter`]: file ↔ document conversion
//!
//! # Example
//!
//! ```rust
//! use study_ini::{IniReader, IniValue, SpecialKeys};
//!
//! let keys = SpecialKeys::new(["+"]);
//! let doc = keys.reader().parse_str("[all areas]\n+ = east\n+ = west\n").unwrap();
//! assert_eq!(
//!     doc["all areas"]["+"],
//!     IniValue::List(vec!["east".into(), "west".into()])
//! );
//! let text = keys.writer().render(&doc);
//! assert_eq!(keys.reader().parse_str(&text).unwrap(), doc);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod dialect;
pub mod error;
pub mod filter;
pub mod reader;
pub mod value;
pub mod writer;

use indexmap::IndexMap;

pub use dialect::SpecialKeys;
pub use error::{IniError, IniResult};
pub use filter::IniFilter;
pub use reader::{IniReader, SimpleKeyValueReader, DEFAULT_SECTION_NAME};
pub use value::{convert_value, IniValue, NEGATIVE_INFINITY, POSITIVE_INFINITY};
pub use writer::{IniWriter, SimpleKeyValueWriter};

/// Options of one section, in file order
pub type Section = IndexMap<String, IniValue>;

/// Parsed INI file, sections in file order
pub type IniDocument = IndexMap<String, Section>;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
