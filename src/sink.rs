//! Build environments that render definitions for a surrounding build tool.

use std::fmt;
use std::str::FromStr;

use crate::define::{BuildEnvironment, Define, DefineList};
use crate::error::{Result, StampError};

/// Output shape of the `buildstamp` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Shell-quoted `-DNAME="value"` compiler flags, one per line.
    Flags,
    /// C header with guarded `#define`s.
    Header,
    /// `cargo:rustc-env=NAME=value` directives.
    Cargo,
    /// JSON object of raw values.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flags => "flags",
            Self::Header => "header",
            Self::Cargo => "cargo",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flags" => Ok(Self::Flags),
            "header" => Ok(Self::Header),
            "cargo" => Ok(Self::Cargo),
            "json" => Ok(Self::Json),
            other => Err(StampError::Config(format!(
                "unknown output format '{}', expected flags, header, cargo or json",
                other
            ))),
        }
    }
}

/// A build environment that can render what was appended to it.
pub trait Sink: BuildEnvironment {
    fn render(&self) -> Result<String>;
}

/// Compiler command-line flags.
#[derive(Debug, Default)]
pub struct CompilerFlags {
    defines: DefineList,
}

impl CompilerFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// One shell word per definition, e.g. `'-DGIT_HASH="a1b2c3d"'`.
    pub fn flags(&self) -> Vec<String> {
        self.defines.defines().iter().map(Define::shell_flag).collect()
    }
}

impl BuildEnvironment for CompilerFlags {
    fn append_defines(&mut self, defines: &[Define]) {
        self.defines.append_defines(defines);
    }
}

impl Sink for CompilerFlags {
    fn render(&self) -> Result<String> {
        Ok(lines(self.flags()))
    }
}

/// C header with one guarded `#define` per definition.
///
/// Guards let a source file keep its own fallback `#define`s for builds that
/// skip the header.
#[derive(Debug)]
pub struct HeaderFile {
    guard: String,
    defines: DefineList,
}

impl HeaderFile {
    pub fn new(guard: impl Into<String>) -> Self {
        Self {
            guard: guard.into(),
            defines: DefineList::new(),
        }
    }
}

impl Default for HeaderFile {
    fn default() -> Self {
        Self::new("BUILDSTAMP_H")
    }
}

impl BuildEnvironment for HeaderFile {
    fn append_defines(&mut self, defines: &[Define]) {
        self.defines.append_defines(defines);
    }
}

impl Sink for HeaderFile {
    fn render(&self) -> Result<String> {
        let mut out = String::new();
        out.push_str("/* Generated by buildstamp. Do not edit. */\n");
        out.push_str(&format!("#ifndef {0}\n#define {0}\n", self.guard));
        for d in self.defines.defines() {
            out.push_str(&format!(
                "\n#ifndef {0}\n#define {0} {1}\n#endif\n",
                d.name,
                d.value()
            ));
        }
        out.push_str(&format!("\n#endif /* {} */\n", self.guard));
        Ok(out)
    }
}

/// `cargo:rustc-env` directives for a Rust build script.
///
/// Values are raw; `env!` yields them as `&'static str` without quotes.
#[derive(Debug, Default)]
pub struct CargoDirectives {
    defines: DefineList,
}

impl CargoDirectives {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BuildEnvironment for CargoDirectives {
    fn append_defines(&mut self, defines: &[Define]) {
        self.defines.append_defines(defines);
    }
}

impl Sink for CargoDirectives {
    fn render(&self) -> Result<String> {
        Ok(lines(
            self.defines
                .defines()
                .iter()
                .map(|d| format!("cargo:rustc-env={}={}", d.name, d.raw.replace('\n', " "))),
        ))
    }
}

/// JSON object mapping each name to its raw value.
#[derive(Debug, Default)]
pub struct JsonDocument {
    defines: DefineList,
}

impl JsonDocument {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BuildEnvironment for JsonDocument {
    fn append_defines(&mut self, defines: &[Define]) {
        self.defines.append_defines(defines);
    }
}

impl Sink for JsonDocument {
    fn render(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&self.defines)?;
        out.push('\n');
        Ok(out)
    }
}

/// Build the sink for `format`.
pub fn sink_for(format: OutputFormat) -> Box<dyn Sink> {
    match format {
        OutputFormat::Flags => Box::new(CompilerFlags::new()),
        OutputFormat::Header => Box::new(HeaderFile::default()),
        OutputFormat::Cargo => Box::new(CargoDirectives::new()),
        OutputFormat::Json => Box::new(JsonDocument::new()),
    }
}

fn lines(items: impl IntoIterator<Item = String>) -> String {
    items.into_iter().map(|line| line + "\n").collect()
}
