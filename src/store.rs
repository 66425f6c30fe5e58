//! Config persistence over a storage backend.

use crate::config::{AppConfig, ConfigError};
use crate::{ConfigStorage, StorageError};

/// NVS namespace the persisted key lives in.
pub const NVS_NAMESPACE: &str = "rgbctrl";
/// NVS key holding the persisted config JSON.
pub const NVS_KEY: &str = "config";

/// Owns the live configuration record and its persistence.
///
/// All inbound JSON goes through the record's clamping merge; a reader
/// never observes a partially updated record because merges build a full
/// copy before replacing it.
pub struct ConfigStore<S: ConfigStorage> {
    cfg: AppConfig,
    storage: S,
    in_preview: bool,
}

impl<S: ConfigStorage> ConfigStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            cfg: AppConfig::default(),
            storage,
            in_preview: false,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.cfg
    }

    pub const fn in_preview(&self) -> bool {
        self.in_preview
    }

    /// Overlay the persisted record, if any, onto defaults.
    ///
    /// A missing key or unreadable JSON leaves defaults in place.
    pub fn load(&mut self) {
        let defaults = AppConfig::default();
        self.cfg = match self.storage.load() {
            Some(json) => match defaults.merge_json(&json) {
                Ok(cfg) => cfg,
                Err(err) => {
                    log::warn!("stored config unreadable ({err}), using defaults");
                    defaults
                }
            },
            None => defaults,
        };
    }

    /// Persist the current record (persistent subset only).
    pub fn save(&mut self) -> Result<(), StorageError> {
        self.storage.store(&self.cfg.persist_json())
    }

    /// Erase the persisted record and restore defaults.
    pub fn reset(&mut self) {
        if let Err(err) = self.storage.erase() {
            log::warn!("config erase failed: {err}");
        }
        self.cfg = AppConfig::default();
        self.in_preview = false;
    }

    /// Merge a JSON body into the live record without persisting.
    pub fn apply_preview(&mut self, body: &str) -> Result<(), ConfigError> {
        self.cfg = self.cfg.merge_json(body)?;
        self.in_preview = true;
        Ok(())
    }

    /// Merge a JSON body into the live record and persist it.
    ///
    /// A failed storage write is logged but still reports success when
    /// the in-memory apply succeeded; the client cannot distinguish the
    /// two (known weakness, kept for protocol compatibility).
    pub fn apply_save(&mut self, body: &str) -> Result<(), ConfigError> {
        self.cfg = self.cfg.merge_json(body)?;
        self.in_preview = false;
        if let Err(err) = self.save() {
            log::warn!("config save failed: {err}");
        }
        Ok(())
    }

    /// Full config JSON including the display-only fields.
    pub fn full_json(&self) -> String {
        self.cfg.full_json(self.in_preview)
    }

    /// Clamp and install new per-channel counts.
    pub fn set_counts(&mut self, counts: [u16; crate::NUM_CHANNELS]) {
        for (slot, &c) in self.cfg.count.iter_mut().zip(counts.iter()) {
            *slot = c.min(crate::MAX_PER_CHANNEL as u16);
        }
    }

    /// Direct mutable access for host-side wiring (tests, simulators).
    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.cfg
    }
}
