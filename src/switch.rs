// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The switch state machine.
//!
//! A [`Switch`] mediates between the hub's get/set requests, the persistent
//! [`StateStore`], and the [`CommandRunner`]. Its one hard invariant: at most
//! one command execution per genuine state change. The hub re-asserts the
//! last-known state right after an accessory is registered at boot, and that
//! first write must not re-run a command (it would needlessly cycle whatever
//! device the command controls).
//!
//! Transition ordering is fixed: persist, then run the command, then update
//! the in-memory state. A command failure therefore leaves the persisted
//! value at the requested state while the in-memory value keeps the previous
//! one. That divergence is an accepted property, not corrected by rollback;
//! the next restart restores from the persisted value either way.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::SwitchConfig;
use crate::error::Result;
use crate::runner::CommandRunner;
use crate::store::StateStore;

/// Mutable half of a switch, guarded by a mutex that is never held across
/// an await point.
#[derive(Debug)]
struct SwitchState {
    /// Last state confirmed by a successful command (or restored at boot).
    current: bool,
    /// One-shot guard; armed at construction, cleared by the first
    /// processed set-request.
    restoring_on_boot: bool,
}

/// A boolean switch whose transitions run external shell commands.
///
/// Construct one per configured accessory, sharing a single [`StateStore`]
/// handle across all of them. The hub is expected to deliver set-requests
/// one at a time per accessory; overlapping requests are not rejected, but
/// the outcome is last-write-wins.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use shellswitch::{ShellRunner, StateStore, Switch, SwitchConfig};
///
/// # async fn demo() -> shellswitch::Result<()> {
/// let store = Arc::new(StateStore::open("/var/lib/hub/shellswitch")?);
/// let config = SwitchConfig::new("Lamp", "lamp-ctl on", "lamp-ctl off");
/// let switch = Switch::new(config, store, ShellRunner::new())?;
///
/// // The hub's boot-time write-back is swallowed.
/// switch.set_state(switch.state()).await?;
///
/// // A genuine toggle persists and runs the mapped command.
/// switch.set_state(true).await?;
/// assert!(switch.state());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Switch<R = crate::runner::ShellRunner> {
    config: SwitchConfig,
    store: Arc<StateStore>,
    runner: R,
    state: Mutex<SwitchState>,
}

impl<R: CommandRunner> Switch<R> {
    /// Creates a switch from its configuration, restoring the last-known
    /// state from the store.
    ///
    /// The boot-restoration guard is armed unconditionally: whatever the
    /// store holds, the first set-request is treated as the hub's boot-time
    /// re-assertion and suppressed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration
    /// fails validation.
    pub fn new(config: SwitchConfig, store: Arc<StateStore>, runner: R) -> Result<Self> {
        config.validate()?;
        let current = store.get(&config.name);
        tracing::debug!(switch = %config.name, restored = current, "Created switch");
        Ok(Self {
            config,
            store,
            runner,
            state: Mutex::new(SwitchState {
                current,
                restoring_on_boot: true,
            }),
        })
    }

    /// Returns the switch name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Returns the switch configuration.
    #[must_use]
    pub fn config(&self) -> &SwitchConfig {
        &self.config
    }

    /// Returns the current logical on/off state.
    ///
    /// Side-effect free and synchronous. After a failed transition this
    /// keeps the pre-transition value even though the store already holds
    /// the requested one.
    #[must_use]
    pub fn state(&self) -> bool {
        self.state.lock().current
    }

    /// Returns `true` until the first set-request has been processed.
    #[must_use]
    pub fn is_restoring(&self) -> bool {
        self.state.lock().restoring_on_boot
    }

    /// Processes a set-request for `requested`.
    ///
    /// The first call after construction only disarms the boot-restoration
    /// guard: no persistence write, no command. Every later call persists
    /// `requested` (even when it equals the current state), runs the mapped
    /// command, and updates the in-memory state once the command succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`](crate::Error::Store) if the persistence
    /// write fails, and [`Error::Command`](crate::Error::Command) if the
    /// command fails to spawn, exits non-zero, or times out. On command
    /// failure the persisted write is not rolled back.
    pub async fn set_state(&self, requested: bool) -> Result<()> {
        {
            let mut state = self.state.lock();
            if state.restoring_on_boot {
                state.restoring_on_boot = false;
                tracing::debug!(
                    switch = %self.config.name,
                    requested,
                    "Ignoring boot-time state restoration"
                );
                return Ok(());
            }
        }

        tracing::info!(switch = %self.config.name, on = requested, "Setting switch state");
        if let Err(e) = self.store.set(&self.config.name, requested) {
            tracing::error!(switch = %self.config.name, error = %e, "Failed to persist switch state");
            return Err(e.into());
        }

        let command = self.config.command_for(requested);
        tracing::debug!(switch = %self.config.name, command = %command, "Executing command");
        match self.runner.run(command, self.config.timeout()).await {
            Ok(()) => {
                self.state.lock().current = requested;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    switch = %self.config.name,
                    command = %command,
                    error = %e,
                    "Command failed"
                );
                Err(e.into())
            }
        }
    }
}
