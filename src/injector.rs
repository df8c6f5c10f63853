//! Metadata injector.
//!
//! Gathers the build-identifying strings once and appends them as
//! preprocessor definitions to a caller-owned [`BuildEnvironment`]. Every
//! source is best-effort: a missing `git`, host name or user name degrades to
//! a placeholder and never fails the build.

use std::fmt;
use std::str::FromStr;

use crate::command::{CommandRunner, SystemCommandRunner};
use crate::define::{
    BuildEnvironment, Define, BUILD_HOST, BUILD_TIMESTAMP, BUILD_USER, GIT_HASH,
};
use crate::error::{Result, StampError};
use crate::identity::{resolve_host, resolve_user, EnvSource, ProcessEnv};
use crate::revision::resolve_revision;
use crate::timestamp::{resolve_timestamp, Clock, SystemClock, TimestampStyle};

/// Which set of definitions to register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variant {
    /// `GIT_HASH` and `BUILD_TIMESTAMP`.
    Minimal,
    /// `GIT_HASH`, `BUILD_TIMESTAMP`, `BUILD_HOST` and `BUILD_USER`.
    #[default]
    Extended,
}

impl Variant {
    /// Timestamp style each variant used before styles were configurable.
    pub fn default_timestamp_style(self) -> TimestampStyle {
        match self {
            Self::Minimal => TimestampStyle::Utc,
            Self::Extended => TimestampStyle::Local,
        }
    }

    /// Definition names registered by this variant, in registration order.
    pub fn keys(self) -> &'static [&'static str] {
        match self {
            Self::Minimal => &[GIT_HASH, BUILD_TIMESTAMP],
            Self::Extended => &[GIT_HASH, BUILD_TIMESTAMP, BUILD_HOST, BUILD_USER],
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimal => f.write_str("minimal"),
            Self::Extended => f.write_str("extended"),
        }
    }
}

impl FromStr for Variant {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "extended" => Ok(Self::Extended),
            other => Err(StampError::Config(format!(
                "unknown variant '{}', expected minimal or extended",
                other
            ))),
        }
    }
}

/// Resolved metadata for one build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMetadata {
    pub revision: String,
    pub timestamp: String,
    /// Present only for [`Variant::Extended`].
    pub host: Option<String>,
    /// Present only for [`Variant::Extended`].
    pub user: Option<String>,
}

impl BuildMetadata {
    /// Definitions in registration order.
    pub fn defines(&self) -> Vec<Define> {
        let mut defines = vec![
            Define::new(GIT_HASH, self.revision.as_str()),
            Define::new(BUILD_TIMESTAMP, self.timestamp.as_str()),
        ];
        if let Some(host) = &self.host {
            defines.push(Define::new(BUILD_HOST, host.as_str()));
        }
        if let Some(user) = &self.user {
            defines.push(Define::new(BUILD_USER, user.as_str()));
        }
        defines
    }
}

/// Collects build metadata from injectable sources.
pub struct MetadataInjector<R = SystemCommandRunner, E = ProcessEnv, C = SystemClock> {
    variant: Variant,
    style: TimestampStyle,
    runner: R,
    env: E,
    clock: C,
}

impl MetadataInjector {
    /// Injector backed by real processes, the process environment and the system clock.
    pub fn system(variant: Variant, style: TimestampStyle, runner: SystemCommandRunner) -> Self {
        Self::with_sources(variant, style, runner, ProcessEnv, SystemClock)
    }
}

impl<R: CommandRunner, E: EnvSource, C: Clock> MetadataInjector<R, E, C> {
    pub fn with_sources(variant: Variant, style: TimestampStyle, runner: R, env: E, clock: C) -> Self {
        Self {
            variant,
            style,
            runner,
            env,
            clock,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Resolve every value for the configured variant. Never fails.
    pub fn collect(&self) -> BuildMetadata {
        let revision = resolve_revision(&self.runner);
        let timestamp = resolve_timestamp(&self.clock, self.style);
        let (host, user) = match self.variant {
            Variant::Minimal => (None, None),
            Variant::Extended => (
                Some(resolve_host(&self.env, &self.runner)),
                Some(resolve_user(&self.env, &self.runner)),
            ),
        };

        tracing::debug!(
            variant = %self.variant,
            revision = %revision,
            timestamp = %timestamp,
            host = ?host,
            user = ?user,
            "Build metadata collected"
        );

        BuildMetadata {
            revision,
            timestamp,
            host,
            user,
        }
    }

    /// Collect metadata and append it to `env` as quoted definitions.
    pub fn inject<B: BuildEnvironment + ?Sized>(&self, env: &mut B) -> BuildMetadata {
        let metadata = self.collect();
        env.append_defines(&metadata.defines());
        metadata
    }
}
