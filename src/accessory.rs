// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hub-facing accessory adapter.
//!
//! Thin glue between a [`Switch`] and the hub's accessory model. The hub's
//! service/characteristic machinery stays opaque behind the
//! [`AccessoryHost`] capability trait; this module only calls through it and
//! translates get/set callbacks into state-machine operations.

use crate::error::Result;
use crate::runner::{CommandRunner, ShellRunner};
use crate::switch::Switch;

/// Manufacturer string reported by the information service.
pub const MANUFACTURER: &str = "Shell Command Switch";

/// Model string reported by the information service.
pub const MODEL: &str = "Shell Command Switch";

/// Descriptor for the accessory information service.
///
/// Only the name is derived from configuration; manufacturer and model are
/// fixed strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInformation {
    /// Display name of the accessory.
    pub name: String,
    /// Manufacturer string.
    pub manufacturer: &'static str,
    /// Model string.
    pub model: &'static str,
}

/// Capability surface the hub platform provides for registering an
/// accessory.
///
/// Implemented by the hub integration layer in production and by a test
/// double in the test suite.
pub trait AccessoryHost {
    /// Registers the get/set handlers for the switch characteristic of the
    /// named service.
    fn register_get_set_handlers(&mut self, switch_name: &str);

    /// Publishes the accessory's service descriptors, asserting the switch
    /// characteristic to `initial_on`.
    fn publish(&mut self, information: &AccessoryInformation, initial_on: bool);
}

/// A [`Switch`] wrapped for registration with a hub.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use shellswitch::{ShellRunner, StateStore, Switch, SwitchAccessory, SwitchConfig};
///
/// # fn demo(host: &mut impl shellswitch::AccessoryHost) -> shellswitch::Result<()> {
/// let store = Arc::new(StateStore::open("/var/lib/hub/shellswitch")?);
/// let config = SwitchConfig::new("Lamp", "lamp-ctl on", "lamp-ctl off");
/// let accessory = SwitchAccessory::new(Switch::new(config, store, ShellRunner::new())?);
/// accessory.attach(host);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SwitchAccessory<R = ShellRunner> {
    switch: Switch<R>,
}

impl<R: CommandRunner> SwitchAccessory<R> {
    /// Wraps a switch for hub registration.
    #[must_use]
    pub fn new(switch: Switch<R>) -> Self {
        Self { switch }
    }

    /// Returns the wrapped switch.
    #[must_use]
    pub fn switch(&self) -> &Switch<R> {
        &self.switch
    }

    /// Returns the information-service descriptor.
    #[must_use]
    pub fn information(&self) -> AccessoryInformation {
        AccessoryInformation {
            name: self.switch.name().to_string(),
            manufacturer: MANUFACTURER,
            model: MODEL,
        }
    }

    /// Registers this accessory with the hub.
    ///
    /// The switch characteristic is published as ON no matter what the
    /// store holds. The hub immediately writes the asserted value back, and
    /// the switch's armed boot-restoration guard swallows that write, so no
    /// command runs. Deliberate: the published value does not consult the
    /// cached state.
    pub fn attach<H: AccessoryHost>(&self, host: &mut H) {
        host.register_get_set_handlers(self.switch.name());
        host.publish(&self.information(), true);
        tracing::debug!(switch = %self.switch.name(), "Registered accessory with hub");
    }

    /// Handles a get-request from the hub, responding exactly once.
    pub fn on_get_request(&self, respond: impl FnOnce(bool)) {
        respond(self.switch.state());
    }

    /// Handles a set-request from the hub.
    ///
    /// # Errors
    ///
    /// Returns the transition error for the hub to display or react to per
    /// its own policy; the process is never taken down by a failed command.
    pub async fn on_set_request(&self, on: bool) -> Result<()> {
        self.switch.set_state(on).await
    }
}
