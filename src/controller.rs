//! The controller: configuration, rendering and transmission in one
//! place.
//!
//! This is the piece the host firmware owns. It is driven from a single
//! cooperative loop: call [`Controller::poll`] as often as convenient and
//! sleep for the returned hint. Config mutations arrive only through the
//! apply operations here (the control plane and HTTP surface call them),
//! so the render path always reads a consistent record.

use embassy_time::{Duration, Instant};

use crate::config::{AppConfig, ConfigError};
use crate::frame_scheduler::FrameScheduler;
use crate::renderer::Renderer;
use crate::ring::RingMap;
use crate::sink::PixelSink;
use crate::store::ConfigStore;
use crate::{ConfigStorage, StripDriver, NUM_CHANNELS};

/// Result of a poll that rendered a frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// How long the caller may sleep before the next frame is due.
    pub sleep_hint: Duration,
}

pub struct Controller<D: StripDriver, S: ConfigStorage> {
    store: ConfigStore<S>,
    map: RingMap,
    sink: PixelSink<D>,
    renderer: Renderer,
    scheduler: FrameScheduler,
}

impl<D: StripDriver, S: ConfigStorage> Controller<D, S> {
    /// Bring the controller up: load the persisted config, arm the boot
    /// fade and transmit a first frame so the strips light immediately.
    pub fn new(driver: D, storage: S, now: Instant) -> Self {
        let mut store = ConfigStore::new(storage);
        store.load();
        let map = RingMap::from_config(store.config());
        let mut this = Self {
            store,
            map,
            sink: PixelSink::new(driver),
            renderer: Renderer::new(),
            scheduler: FrameScheduler::new(now),
        };
        this.render_now(now);
        this
    }

    /// Render and transmit a frame if one is due.
    pub fn poll(&mut self, now: Instant) -> Option<FrameResult> {
        let speed = self.store.config().speed;
        if !self.scheduler.due(now, speed) {
            return None;
        }
        self.scheduler.begin_frame(now);
        self.transmit(now);
        Some(FrameResult {
            sleep_hint: self.scheduler.time_to_next(now, speed),
        })
    }

    /// Render and transmit immediately, outside the frame cadence (used
    /// after config applies so changes preview without waiting a frame).
    pub fn render_now(&mut self, now: Instant) {
        self.transmit(now);
    }

    fn transmit(&mut self, now: Instant) {
        let tick = self.scheduler.tick();
        let brightness = self
            .scheduler
            .output_brightness(now, self.store.config().brightness);
        self.sink.set_brightness(brightness);
        let frame = self.renderer.render(self.store.config(), tick, now);
        self.sink.transmit(frame, &self.map);
    }

    fn apply_config(&mut self) {
        self.map.rebuild(self.store.config());
    }

    /// Parse, clamp and apply a config body without persisting.
    pub fn apply_json_preview(&mut self, body: &str, now: Instant) -> Result<(), ConfigError> {
        self.store.apply_preview(body)?;
        self.apply_config();
        self.render_now(now);
        Ok(())
    }

    /// Parse, clamp, apply and persist a config body.
    pub fn apply_json_save(&mut self, body: &str, now: Instant) -> Result<(), ConfigError> {
        self.store.apply_save(body)?;
        self.apply_config();
        self.render_now(now);
        Ok(())
    }

    /// Erase the persisted config and restore defaults.
    pub fn reset_to_defaults(&mut self, now: Instant) {
        self.store.reset();
        self.renderer.reset_effects();
        self.apply_config();
        self.render_now(now);
    }

    /// Install new per-channel counts (clamped to 50 each).
    pub fn set_counts(&mut self, counts: [u16; NUM_CHANNELS], now: Instant) {
        self.store.set_counts(counts);
        self.apply_config();
        self.render_now(now);
    }

    /// Re-persist the current record.
    pub fn force_save(&mut self) {
        if let Err(err) = self.store.save() {
            log::warn!("config save failed: {err}");
        }
    }

    /// Re-read the persisted record and apply it.
    pub fn force_load(&mut self, now: Instant) {
        self.store.load();
        self.apply_config();
        self.render_now(now);
    }

    /// Full config JSON including display fields.
    pub fn config_json(&self) -> String {
        self.store.full_json()
    }

    pub fn config(&self) -> &AppConfig {
        self.store.config()
    }

    pub fn in_preview(&self) -> bool {
        self.store.in_preview()
    }

    /// CH5 CPU-temperature status bar enable (read by the telemetry
    /// driver).
    pub fn smbus_cpu_enabled(&self) -> bool {
        self.store.config().enable_cpu
    }

    /// CH6 fan-speed status bar enable.
    pub fn smbus_fan_enabled(&self) -> bool {
        self.store.config().enable_fan
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn driver(&self) -> &D {
        self.sink.driver()
    }

    pub fn driver_mut(&mut self) -> &mut D {
        self.sink.driver_mut()
    }
}
