//! Best-effort build metadata as preprocessor definitions.
//!
//! Resolves the git revision, a build timestamp and (in the extended
//! variant) the build host and user, and appends them as quoted
//! `NAME="value"` definitions to a build environment owned by the caller.
//!
//! ```
//! use buildstamp::command::SystemCommandRunner;
//! use buildstamp::define::{DefineList, GIT_HASH};
//! use buildstamp::injector::{MetadataInjector, Variant};
//! use buildstamp::timestamp::TimestampStyle;
//!
//! let injector = MetadataInjector::system(Variant::Minimal, TimestampStyle::Utc, SystemCommandRunner::new());
//! let mut defines = DefineList::new();
//! injector.inject(&mut defines);
//! assert!(defines.get(GIT_HASH).is_some());
//! ```

pub mod command;
pub mod config;
pub mod define;
pub mod error;
pub mod identity;
pub mod injector;
pub mod revision;
pub mod sink;
pub mod stamp;
pub mod timestamp;
