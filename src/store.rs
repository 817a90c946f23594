// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Directory-backed persistent state store.
//!
//! Each switch persists its last-known boolean state under its name so that
//! the state survives process restarts. The store keeps one small JSON record
//! file per key inside a directory chosen at initialization, plus an
//! in-memory cache of everything read or written during the current process.
//!
//! Reads are forgiving: an absent, unreadable, or corrupt record reads as
//! `false`. Writes are durable before [`StateStore::set`] returns.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// On-disk shape of one persisted entry.
#[derive(Debug, Serialize, Deserialize)]
struct Record {
    key: String,
    value: bool,
}

/// Process-wide persistent key-value store for switch states.
///
/// Open the store once per process and share the handle (typically behind an
/// [`Arc`](std::sync::Arc)) with every switch. Each switch touches only its
/// own key, so no cross-key coordination is needed.
///
/// # Examples
///
/// ```no_run
/// use shellswitch::StateStore;
///
/// let store = StateStore::open("/var/lib/hub/shellswitch")?;
/// store.set("Lamp", true)?;
/// assert!(store.get("Lamp"));
/// assert!(!store.get("never-written"));
/// # Ok::<(), shellswitch::StoreError>(())
/// ```
#[derive(Debug)]
pub struct StateStore {
    dir: PathBuf,
    cache: RwLock<HashMap<String, bool>>,
}

impl StateStore {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    ///
    /// This is the once-per-process initialization step; perform it before
    /// constructing any switch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CreateDir`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;
        tracing::debug!(dir = %dir.display(), "Opened state store");
        Ok(Self {
            dir,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Returns the directory backing this store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the stored boolean for `key`.
    ///
    /// Never fails: an absent record, an unreadable file, or a corrupt entry
    /// all read as `false`.
    #[must_use]
    pub fn get(&self, key: &str) -> bool {
        if let Some(value) = self.cache.read().get(key) {
            return *value;
        }

        let value = self.read_record(key);
        self.cache.write().insert(key.to_string(), value);
        value
    }

    /// Persists `value` under `key` durably before returning.
    ///
    /// A subsequent [`get`](Self::get) observes the write even across a
    /// process restart, barring storage-medium failure.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WriteRecord`] if the record cannot be written
    /// or synced to disk.
    pub fn set(&self, key: &str, value: bool) -> Result<(), StoreError> {
        let path = self.record_path(key);
        let record = Record {
            key: key.to_string(),
            value,
        };
        let bytes = serde_json::to_vec(&record).map_err(|e| StoreError::WriteRecord {
            path: path.display().to_string(),
            source: std::io::Error::other(e),
        })?;

        write_durably(&path, &bytes).map_err(|source| StoreError::WriteRecord {
            path: path.display().to_string(),
            source,
        })?;

        self.cache.write().insert(key.to_string(), value);
        tracing::debug!(key = %key, value, "Persisted switch state");
        Ok(())
    }

    /// Removes the record for `key`, if any.
    ///
    /// A subsequent [`get`](Self::get) reads `false`.
    pub fn remove(&self, key: &str) {
        self.cache.write().remove(key);
        let _ = fs::remove_file(self.record_path(key));
    }

    fn read_record(&self, key: &str) -> bool {
        let path = self.record_path(key);
        let Ok(bytes) = fs::read(&path) else {
            return false;
        };
        match serde_json::from_slice::<Record>(&bytes) {
            Ok(record) => record.value,
            Err(e) => {
                // Forgive corrupt records; they read as absent.
                tracing::warn!(key = %key, path = %path.display(), error = %e, "Ignoring corrupt state record");
                false
            }
        }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", record_file_name(key)))
    }
}

fn write_durably(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Encodes a key into a file-system safe name.
///
/// Alphanumerics and `-` pass through; every other character becomes its
/// hex codepoint wrapped in underscores, so distinct keys never collide.
fn record_file_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for c in key.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            name.push(c);
        } else {
            name.push_str(&format!("_{:x}_", u32::from(c)));
        }
    }
    name
}
