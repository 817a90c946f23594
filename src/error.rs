// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `shellswitch` library.
//!
//! This module provides the error hierarchy for handling failures across the
//! library: configuration validation, persistent-store access, and external
//! command execution.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur while operating
/// a shell-command switch.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during configuration validation.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Error occurred while accessing the persistent state store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Error occurred while executing an external command.
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}

/// Errors related to per-accessory configuration.
///
/// These errors occur when a configuration block fails validation at
/// switch construction time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The switch name is empty.
    ///
    /// The name doubles as the persistence key, so it must be non-empty.
    #[error("switch name must not be empty")]
    EmptyName,

    /// The command timeout is zero.
    #[error("command timeout must be greater than zero")]
    ZeroTimeout,
}

/// Errors related to the persistent state store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store directory could not be created.
    #[error("failed to create store directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: String,
        /// The underlying io error.
        source: std::io::Error,
    },

    /// A state record could not be written durably.
    #[error("failed to persist record {path}: {source}")]
    WriteRecord {
        /// The record file that could not be written.
        path: String,
        /// The underlying io error.
        source: std::io::Error,
    },
}

/// Errors related to external command execution.
///
/// Non-zero exit, spawn failure, and timeout are deliberately collapsed into
/// a single failure signal carrying a diagnostic reason; callers are not
/// expected to distinguish them further.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command could not be spawned.
    #[error("failed to spawn command '{command}': {source}")]
    Spawn {
        /// The command that failed to spawn.
        command: String,
        /// The underlying io error.
        source: std::io::Error,
    },

    /// The command ran but exited with a non-zero status.
    #[error("command '{command}' exited with {}", exit_code_label(.code))]
    NonZeroExit {
        /// The command that failed.
        command: String,
        /// The exit code, if the process exited normally.
        code: Option<i32>,
    },

    /// The command did not complete within the configured timeout.
    #[error("command '{command}' timed out after {timeout_ms} ms")]
    Timeout {
        /// The command that timed out.
        command: String,
        /// The timeout budget in milliseconds.
        timeout_ms: u64,
    },
}

impl CommandError {
    /// Returns `true` if this failure was caused by the timeout elapsing.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "no exit code (killed by signal)".to_string(),
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
