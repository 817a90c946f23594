// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `shellswitch` - A Rust library exposing a shell-command-backed switch
//! accessory to smart-home hubs.
//!
//! Each configured switch is a single boolean accessory whose on/off
//! transitions run external shell commands, and whose last-known state
//! survives process restarts via a directory-backed persistent store.
//!
//! # Behavior
//!
//! - **Boot restoration**: the hub re-asserts the last-known state right
//!   after an accessory is registered. That first write-back is swallowed by
//!   a one-shot guard so the transition command is not re-run on every boot.
//! - **Transitions**: every genuine set-request persists the requested state,
//!   then runs the mapped command (`onCmd` or `offCmd`) bounded by the
//!   configured timeout. Re-setting the same value persists and runs again;
//!   there is no equality short-circuit.
//! - **Failures**: a failed or timed-out command is surfaced as the
//!   set-request's error and logged with the failing command string. The
//!   persisted write is not rolled back, so the store holds the requested
//!   value while the in-memory state keeps the previous one until the next
//!   successful transition.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use shellswitch::{ShellRunner, StateStore, Switch, SwitchConfig};
//!
//! #[tokio::main]
//! async fn main() -> shellswitch::Result<()> {
//!     // Open the store once per process, before constructing switches.
//!     let store = Arc::new(StateStore::open("/var/lib/hub/shellswitch")?);
//!
//!     let config = SwitchConfig::new("Lamp", "lamp-ctl on", "lamp-ctl off")
//!         .with_timeout_secs(10);
//!     let switch = Switch::new(config, store, ShellRunner::new())?;
//!
//!     // The hub's boot-time write-back is suppressed...
//!     switch.set_state(switch.state()).await?;
//!
//!     // ...while a genuine toggle persists and runs `lamp-ctl on`.
//!     switch.set_state(true).await?;
//!     assert!(switch.state());
//!     Ok(())
//! }
//! ```
//!
//! # Hub Registration
//!
//! The hub's service/characteristic machinery stays behind the
//! [`AccessoryHost`] trait; wrap a switch in a [`SwitchAccessory`] and attach
//! it:
//!
//! ```no_run
//! use shellswitch::{AccessoryHost, SwitchAccessory};
//!
//! fn register(accessory: &SwitchAccessory, host: &mut impl AccessoryHost) {
//!     accessory.attach(host);
//! }
//! ```

mod accessory;
mod config;
pub mod error;
mod runner;
mod store;
mod switch;

pub use accessory::{AccessoryHost, AccessoryInformation, MANUFACTURER, MODEL, SwitchAccessory};
pub use config::SwitchConfig;
pub use error::{CommandError, ConfigError, Error, Result, StoreError};
pub use runner::{CommandRunner, ShellRunner};
pub use store::StateStore;
pub use switch::Switch;
