// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! External command execution.
//!
//! A switch transition runs one of the two configured shell commands,
//! bounded by a timeout. [`CommandRunner`] is the seam between the state
//! machine and the operating system; [`ShellRunner`] is the production
//! implementation, and tests substitute their own double.
//!
//! Exactly one attempt per invocation, no retries, no output capture.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::CommandError;

/// Trait for executing a switch's transition command.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Runs `command`, waiting at most `timeout` for it to complete.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the command fails to spawn, exits
    /// non-zero, or exceeds the timeout. The three cases are collapsed into
    /// one failure signal carrying a diagnostic reason.
    async fn run(&self, command: &str, timeout: Duration) -> Result<(), CommandError>;
}

/// Runs commands through the system shell (`sh -c`).
///
/// Stdin, stdout, and stderr are all detached; the command's output is not
/// captured. On timeout the child process is killed and reaped before the
/// error is returned.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use shellswitch::{CommandRunner, ShellRunner};
///
/// # async fn demo() -> Result<(), shellswitch::CommandError> {
/// let runner = ShellRunner::new();
/// runner.run("lamp-ctl on", Duration::from_secs(30)).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    /// Creates a new shell runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str, timeout: Duration) -> Result<(), CommandError> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CommandError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let status = match tokio::time::timeout(timeout, child.wait()).await {
            Ok(wait_result) => wait_result.map_err(|source| CommandError::Spawn {
                command: command.to_string(),
                source,
            })?,
            Err(_) => {
                // Budget elapsed: kill and reap the child so it does not
                // linger as a zombie.
                let _ = child.kill().await;
                let _ = child.wait().await;
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                return Err(CommandError::Timeout {
                    command: command.to_string(),
                    timeout_ms,
                });
            }
        };

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::NonZeroExit {
                command: command.to_string(),
                code: status.code(),
            })
        }
    }
}
