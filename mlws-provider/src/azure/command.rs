//! Azure CLI command builder.
//!
//! Every call into the management API goes through [`AzCommand`], which adds
//! the session-wide flags (subscription, output format, warning suppression),
//! captures output, and sorts failures into "resource missing" versus real
//! provider errors.

use std::io::ErrorKind;
use std::process::Output;

use duct::cmd;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use mlws_core::error::{Result, WsError};

pub(crate) const AZ_BINARY: &str = "az";

/// Flags shared by every invocation, fixed when the provider is built.
#[derive(Debug, Clone, Default)]
pub struct AzGlobalFlags {
    pub subscription_id: Option<String>,
    pub suppress_warnings: bool,
}

/// How a failed `az` call should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AzFailure {
    NotFound,
    Auth,
    Other,
}

/// Classify `az` stderr. Missing resources are reported in several shapes
/// depending on the command group.
pub fn classify_stderr(stderr: &str) -> AzFailure {
    let lower = stderr.to_lowercase();
    if lower.contains("az login")
        || lower.contains("please run 'az login'")
        || lower.contains("refresh token has expired")
        || lower.contains("aadsts")
    {
        return AzFailure::Auth;
    }
    const NOT_FOUND_MARKERS: &[&str] = &[
        "resourcenotfound",
        "resourcegroupnotfound",
        "deletedvaultnotfound",
        "was not found",
        "could not be found",
        "not found within subscription",
        "does not exist",
    ];
    if NOT_FOUND_MARKERS.iter().any(|m| lower.contains(m)) {
        AzFailure::NotFound
    } else {
        AzFailure::Other
    }
}

/// Builder for one `az` invocation.
#[derive(Debug, Clone)]
pub struct AzCommand {
    args: Vec<String>,
    flags: AzGlobalFlags,
    json_output: bool,
}

impl AzCommand {
    pub fn new(flags: &AzGlobalFlags) -> Self {
        Self {
            args: Vec::new(),
            flags: flags.clone(),
            json_output: true,
        }
    }

    /// Add a single argument to the command.
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add `flag value`.
    pub fn opt<S: Into<String>>(self, flag: &str, value: S) -> Self {
        self.arg(flag).arg(value)
    }

    /// Skip `--output json`, for commands whose stdout is a bare value.
    pub fn raw_output(mut self) -> Self {
        self.json_output = false;
        self
    }

    pub(crate) fn build_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        if let Some(subscription) = &self.flags.subscription_id {
            args.push("--subscription".to_string());
            args.push(subscription.clone());
        }
        if self.json_output {
            args.push("--output".to_string());
            args.push("json".to_string());
        }
        if self.flags.suppress_warnings {
            args.push("--only-show-errors".to_string());
        }
        args
    }

    fn command_line(&self) -> String {
        format!("{} {}", AZ_BINARY, self.args.join(" "))
    }

    /// Run and return the raw output, whatever the exit status.
    pub fn execute_raw(self) -> Result<Output> {
        let args = self.build_args();
        debug!(command = %self.command_line(), "Executing az command");

        cmd(AZ_BINARY, &args)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    WsError::Dependency(format!("{AZ_BINARY} (Azure CLI)"))
                } else {
                    WsError::Command(format!(
                        "Failed to execute '{}': {}",
                        self.command_line(),
                        e
                    ))
                }
            })
    }

    /// Run and return stdout; any failure is an error.
    pub fn execute_with_output(self) -> Result<String> {
        let shown = self.command_line();
        let output = self.execute_raw()?;
        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout).to_string();
            trace!(command = %shown, stdout = %stdout, "az command succeeded");
            Ok(stdout)
        } else {
            Err(failure_error(&shown, &output))
        }
    }

    /// Run for its side effect only.
    pub fn execute(self) -> Result<()> {
        self.execute_with_output().map(|_| ())
    }

    /// Run and parse stdout as JSON.
    pub fn execute_json<T: DeserializeOwned>(self) -> Result<T> {
        let stdout = self.execute_with_output()?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Run a lookup. `Ok(None)` when the provider reports the target missing.
    pub fn execute_lookup<T: DeserializeOwned>(self) -> Result<Option<T>> {
        let shown = self.command_line();
        let output = self.execute_raw()?;
        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if stdout.trim().is_empty() {
                return Ok(None);
            }
            return Ok(Some(serde_json::from_str(&stdout)?));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        match classify_stderr(&stderr) {
            AzFailure::NotFound => {
                debug!(command = %shown, "az lookup reported resource missing");
                Ok(None)
            }
            _ => Err(failure_error(&shown, &output)),
        }
    }
}

fn failure_error(shown: &str, output: &Output) -> WsError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    match classify_stderr(&stderr) {
        AzFailure::Auth => WsError::Auth(stderr),
        _ => WsError::Provider(format!("'{}' failed ({}): {}", shown, output.status, stderr)),
    }
}
