//! Build host and build user.
//!
//! Both are read from the environment first and from a command second, and
//! degrade to [`UNKNOWN`] when neither yields a non-empty value.

use std::collections::HashMap;

use crate::command::CommandRunner;

/// Placeholder used when host or user identity is unavailable.
pub const UNKNOWN: &str = "unknown";

const HOST_VARS: [&str; 2] = ["HOSTNAME", "COMPUTERNAME"];
const USER_VARS: [&str; 3] = ["USER", "USERNAME", "LOGNAME"];

/// Lookup of environment variables.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// First non-blank value among `keys`, trimmed.
fn first_var(env: &impl EnvSource, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| env.var(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn resolve(
    operation: &str,
    env: &impl EnvSource,
    keys: &[&str],
    runner: &impl CommandRunner,
    program: &str,
) -> String {
    if let Some(value) = first_var(env, keys) {
        return value;
    }
    match runner.run(program, &[]) {
        Ok(value) => value,
        Err(e) => {
            e.log_with_operation(operation);
            UNKNOWN.to_string()
        }
    }
}

/// Network host name of the build machine, or [`UNKNOWN`].
pub fn resolve_host(env: &impl EnvSource, runner: &impl CommandRunner) -> String {
    resolve("resolve_host", env, &HOST_VARS, runner, "hostname")
}

/// Name of the user running the build, or [`UNKNOWN`].
pub fn resolve_user(env: &impl EnvSource, runner: &impl CommandRunner) -> String {
    resolve("resolve_user", env, &USER_VARS, runner, "whoami")
}
