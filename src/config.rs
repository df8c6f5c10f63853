//! Configuration loading from environment.
//!
//! The binary has no flags of its own; everything comes from `BUILDSTAMP_*`
//! variables (optionally via a `.env` file).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, StampError};
use crate::injector::Variant;
use crate::sink::OutputFormat;
use crate::timestamp::TimestampStyle;

/// Main configuration for buildstamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampConfig {
    /// Which definitions to register.
    pub variant: Variant,
    /// How the build timestamp is rendered.
    pub timestamp_style: TimestampStyle,
    /// Output shape.
    pub format: OutputFormat,
    /// Output file; stdout when unset.
    pub output: Option<PathBuf>,
    /// Directory `git` runs in; the current directory when unset.
    pub repo_dir: Option<PathBuf>,
}

impl Default for StampConfig {
    fn default() -> Self {
        let variant = Variant::default();
        Self {
            variant,
            timestamp_style: variant.default_timestamp_style(),
            format: OutputFormat::Flags,
            output: None,
            repo_dir: None,
        }
    }
}

impl StampConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `BUILDSTAMP_VARIANT`: `minimal` or `extended` (default: extended)
    /// - `BUILDSTAMP_TIMESTAMP`: `utc` or `local` (default: utc for minimal, local for extended)
    /// - `BUILDSTAMP_FORMAT`: `flags`, `header`, `cargo` or `json` (default: flags)
    /// - `BUILDSTAMP_OUTPUT`: output file path (default: stdout)
    /// - `BUILDSTAMP_REPO_DIR`: directory to describe (default: current directory)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let variant: Variant = parse_var(&lookup, "BUILDSTAMP_VARIANT")?.unwrap_or_default();

        let timestamp_style: TimestampStyle = parse_var(&lookup, "BUILDSTAMP_TIMESTAMP")?
            .unwrap_or_else(|| variant.default_timestamp_style());

        let format: OutputFormat = parse_var(&lookup, "BUILDSTAMP_FORMAT")?.unwrap_or(OutputFormat::Flags);

        let output = path_var(&lookup, "BUILDSTAMP_OUTPUT");
        let repo_dir = path_var(&lookup, "BUILDSTAMP_REPO_DIR");

        if let Some(dir) = &repo_dir {
            if !dir.is_dir() {
                return Err(StampError::Config(format!(
                    "BUILDSTAMP_REPO_DIR is not a directory: {}",
                    dir.display()
                )));
            }
        }

        Ok(Self {
            variant,
            timestamp_style,
            format,
            output,
            repo_dir,
        })
    }
}

/// Parse a non-blank variable with `FromStr`, naming the variable on failure.
fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr<Err = StampError>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| StampError::Config(format!("{}: {}", key, e))),
        None => Ok(None),
    }
}

fn path_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<PathBuf> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
