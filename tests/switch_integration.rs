// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests driving a switch through the real shell runner and a
//! real on-disk store, including a simulated process restart.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use shellswitch::{Error, ShellRunner, StateStore, Switch, SwitchConfig};

fn temp_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("shellswitch-it-{label}-{}", uuid::Uuid::new_v4()))
}

fn lamp_config() -> SwitchConfig {
    SwitchConfig::new("Lamp", "true", "false").with_timeout_secs(1)
}

#[tokio::test]
async fn lamp_lifecycle_across_restart() {
    let dir = temp_dir("lifecycle");

    // First boot.
    {
        let store = Arc::new(StateStore::open(&dir).unwrap());
        let switch = Switch::new(lamp_config(), Arc::clone(&store), ShellRunner::new()).unwrap();

        assert!(!switch.state());
        assert!(switch.is_restoring());

        // The hub syncs its view; nothing is persisted, no command runs.
        switch.set_state(false).await.unwrap();
        assert!(!switch.is_restoring());

        // Genuine toggle: persists true and runs `true` (exit 0).
        switch.set_state(true).await.unwrap();
        assert!(switch.state());
        assert!(store.get("Lamp"));
    }

    // Restart: a fresh process restores from the store.
    {
        let store = Arc::new(StateStore::open(&dir).unwrap());
        let switch = Switch::new(lamp_config(), Arc::clone(&store), ShellRunner::new()).unwrap();

        assert!(switch.state());
        assert!(switch.is_restoring());

        // The hub's write-back is swallowed again.
        switch.set_state(true).await.unwrap();
        assert!(switch.state());
        assert!(!switch.is_restoring());
    }
}

#[tokio::test]
async fn transition_commands_actually_execute() {
    let dir = temp_dir("marker");
    let marker = dir.join("on-ran");

    let config = SwitchConfig::new(
        "Heater",
        format!("touch {}", marker.display()),
        "true",
    )
    .with_timeout_secs(1);

    let store = Arc::new(StateStore::open(&dir).unwrap());
    let switch = Switch::new(config, store, ShellRunner::new()).unwrap();

    switch.set_state(false).await.unwrap(); // boot write-back
    assert!(!marker.exists());

    switch.set_state(true).await.unwrap();
    assert!(marker.exists());
}

#[tokio::test]
async fn failed_off_command_diverges_store_from_memory() {
    // `false` exits 1, so the off transition fails after persisting.
    let store = Arc::new(StateStore::open(temp_dir("diverge")).unwrap());
    let switch = Switch::new(lamp_config(), Arc::clone(&store), ShellRunner::new()).unwrap();

    switch.set_state(false).await.unwrap(); // boot write-back
    switch.set_state(true).await.unwrap();
    assert!(switch.state());

    let err = switch.set_state(false).await.unwrap_err();
    assert!(matches!(err, Error::Command(_)));

    // Persisted: off. In memory: still on. The next restart restores off.
    assert!(!store.get("Lamp"));
    assert!(switch.state());

    let restarted = Switch::new(lamp_config(), store, ShellRunner::new()).unwrap();
    assert!(!restarted.state());
}

#[tokio::test]
async fn slow_command_times_out_within_budget() {
    let config = SwitchConfig::new("Blinds", "sleep 30", "true").with_timeout_secs(1);
    let store = Arc::new(StateStore::open(temp_dir("timeout")).unwrap());
    let switch = Switch::new(config, store, ShellRunner::new()).unwrap();

    switch.set_state(false).await.unwrap(); // boot write-back

    let started = Instant::now();
    let err = switch.set_state(true).await.unwrap_err();
    let elapsed = started.elapsed();

    match err {
        Error::Command(e) => assert!(e.is_timeout(), "expected timeout, got {e:?}"),
        other => panic!("expected command error, got {other:?}"),
    }
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");
}

#[tokio::test]
async fn switches_share_one_store_without_interference() {
    let dir = temp_dir("shared");
    let store = Arc::new(StateStore::open(&dir).unwrap());

    let lamp = Switch::new(lamp_config(), Arc::clone(&store), ShellRunner::new()).unwrap();
    let fan_config = SwitchConfig::new("Fan", "true", "true").with_timeout_secs(1);
    let fan = Switch::new(fan_config, Arc::clone(&store), ShellRunner::new()).unwrap();

    lamp.set_state(false).await.unwrap(); // boot write-back
    fan.set_state(false).await.unwrap(); // boot write-back

    lamp.set_state(true).await.unwrap();
    fan.set_state(false).await.unwrap();

    assert!(store.get("Lamp"));
    assert!(!store.get("Fan"));
    assert!(lamp.state());
    assert!(!fan.state());
}
