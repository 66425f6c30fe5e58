//! Rendering engine and control plane for a four-channel addressable-LED
//! ring controller.
//!
//! The ring is the logical concatenation of channels CH1..CH4 (up to 50
//! pixels each). Effects render into a ring-ordered frame buffer; the
//! [`sink::PixelSink`] scatters the frame back onto the physical channels,
//! honoring per-channel reversal and global brightness, and hands each
//! channel to a [`StripDriver`].
//!
//! Configuration lives in a single [`config::AppConfig`] record with
//! clamping JSON merge semantics, persisted through a [`ConfigStorage`]
//! backend. The [`control`] module implements the UDP control protocol
//! (discover / get / preview / save / reset / setCounts) with coalesced
//! deferred work, and [`http`] provides the request/response fallback
//! surface for an externally owned web server.

pub mod color;
pub mod config;
pub mod control;
pub mod controller;
pub mod effect;
pub mod frame_scheduler;
pub mod http;
pub mod math8;
pub mod playlist;
pub mod renderer;
pub mod ring;
pub mod rng;
pub mod sink;
pub mod store;

// Driver/storage fakes for headless testing
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use color::Rgb;
pub use config::{AppConfig, ConfigError, Mode};
pub use controller::Controller;
pub use frame_scheduler::{frame_ms, FrameScheduler};
pub use store::ConfigStore;

pub use embassy_time::{Duration, Instant};

/// Maximum pixels per data-line channel.
pub const MAX_PER_CHANNEL: usize = 50;

/// Number of ring data-line channels (CH1..CH4).
pub const NUM_CHANNELS: usize = 4;

/// Maximum logical ring length.
pub const MAX_RING: usize = MAX_PER_CHANNEL * NUM_CHANNELS;

/// Firmware version shown in the config JSON and the web footer.
pub const BUILD_VERSION: &str = "1.6.1";

/// Branding line shown in the config JSON and the web footer.
pub const COPYRIGHT: &str = "© Darkone Customs 2025";

/// Abstract LED strip driver trait
///
/// Implement this trait to support different hardware platforms. The
/// controller is generic over this trait; one `write` per channel per
/// frame, slice length equals the channel's configured pixel count.
pub trait StripDriver {
    /// Write colors to one channel's strip
    fn write(&mut self, channel: usize, pixels: &[Rgb]);
}

/// Non-volatile backend for the persisted configuration record.
///
/// Models a single NVS-style key (`rgbctrl/config`) holding the JSON
/// string of the persistent config subset.
pub trait ConfigStorage {
    /// Read the stored config JSON, if any.
    fn load(&mut self) -> Option<String>;
    /// Replace the stored config JSON atomically.
    fn store(&mut self, json: &str) -> Result<(), StorageError>;
    /// Remove the stored config JSON.
    fn erase(&mut self) -> Result<(), StorageError>;
}

/// Error from a [`ConfigStorage`] backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageError(pub &'static str);

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage error: {}", self.0)
    }
}

impl std::error::Error for StorageError {}
