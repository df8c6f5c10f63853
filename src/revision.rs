//! Version-control revision identifier.

use crate::command::CommandRunner;

/// Placeholder used when no version-control information is available.
pub const NO_GIT: &str = "nogit";

/// Arguments passed to `git` to describe the current checkout.
pub const DESCRIBE_ARGS: [&str; 3] = ["describe", "--always", "--dirty"];

/// Describe the current checkout, e.g. `v1.2.0`, `a1b2c3d-dirty`.
///
/// Any failure of the `git` invocation (not installed, not a repository,
/// no output) yields [`NO_GIT`].
pub fn resolve_revision(runner: &impl CommandRunner) -> String {
    match runner.run("git", &DESCRIBE_ARGS) {
        Ok(revision) => revision,
        Err(e) => {
            e.log_with_operation("resolve_revision");
            NO_GIT.to_string()
        }
    }
}
