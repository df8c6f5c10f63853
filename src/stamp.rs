//! One buildstamp invocation: collect, render, write.

use std::fs;
use std::io::Write;

use crate::command::SystemCommandRunner;
use crate::config::StampConfig;
use crate::error::Result;
use crate::injector::{BuildMetadata, MetadataInjector};
use crate::sink::sink_for;

/// Render the configured definitions to `BUILDSTAMP_OUTPUT`, or to `stdout`
/// when no output file is set. Missing parent directories are created.
pub fn run(config: &StampConfig, stdout: &mut impl Write) -> Result<BuildMetadata> {
    let runner = match &config.repo_dir {
        Some(dir) => SystemCommandRunner::in_dir(dir),
        None => SystemCommandRunner::new(),
    };
    let injector = MetadataInjector::system(config.variant, config.timestamp_style, runner);

    let mut sink = sink_for(config.format);
    let metadata = injector.inject(sink.as_mut());
    let rendered = sink.render()?;

    match &config.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)?;
            tracing::info!(path = %path.display(), revision = %metadata.revision, "Build metadata written");
        }
        None => {
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(metadata)
}
