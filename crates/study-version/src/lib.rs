//! Study versions and upgrades
//!
//! Typed access to study files, the version upgrade pipeline and study
//! creation from templates.
//!
//! # Core Concepts
//!
//! - [`StudyVersion`]: `(major, minor)` schema version, `880` or `9.2` on disk
//! - [`model`]: read-modify-write handles over `study.antares` and `generaldata.ini`
//! - [`upgrade`]: static chain of [`UpgradeStep`]s and the [`UpgradeApp`] driver
//! - [`create`]: [`CreateApp`] and the [`TemplateSource`] seam
//!
//! # Example
//!
//! ```rust,no_run
//! use study_version::{StudyVersion, UpgradeApp};
//!
//! let target: StudyVersion = "9.2".parse().unwrap();
//! let previous = UpgradeApp::new("/data/studies/north-sea", target).run().unwrap();
//! println!("upgraded from {previous}");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod create;
pub mod error;
pub mod model;
pub mod upgrade;
pub mod version;

pub use create::{available_versions, CreateApp, TemplateDir, TemplateSource};
pub use error::{CreateError, ModelError, UpgradeError, UpgradeResult, VersionError};
pub use model::{GeneralData, IniModel, StudyAntares, GENERAL_DATA_PATH, STUDY_ANTARES_PATH};
pub use upgrade::{latest_version, supported_versions, upgrade_steps, UpgradeApp, UpgradeStep};
pub use version::StudyVersion;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
