//! The authoritative configuration record.
//!
//! One instance drives the whole device. Inbound JSON (UDP, HTTP, NVS) is
//! merged through [`AppConfig::merge_json`]: unknown fields are ignored,
//! missing fields keep their current values and out-of-range numbers are
//! clamped, never rejected. The only hard failure is malformed JSON.

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{BUILD_VERSION, COPYRIGHT, MAX_PER_CHANNEL, NUM_CHANNELS};

/// Number of effect modes, including the playlist.
pub const MODE_COUNT: u8 = 15;

/// Effect program selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    Solid = 0,
    Breathe = 1,
    ColorWipe = 2,
    Larson = 3,
    Rainbow = 4,
    TheaterChase = 5,
    Twinkle = 6,
    Comet = 7,
    Meteor = 8,
    ClockSpin = 9,
    Plasma = 10,
    Fire = 11,
    PaletteCycle = 12,
    PaletteChase = 13,
    Custom = 14,
}

impl Mode {
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Solid,
            1 => Self::Breathe,
            2 => Self::ColorWipe,
            3 => Self::Larson,
            4 => Self::Rainbow,
            5 => Self::TheaterChase,
            6 => Self::Twinkle,
            7 => Self::Comet,
            8 => Self::Meteor,
            9 => Self::ClockSpin,
            10 => Self::Plasma,
            11 => Self::Fire,
            12 => Self::PaletteCycle,
            13 => Self::PaletteChase,
            14 => Self::Custom,
            _ => return None,
        })
    }

    /// Clamp an arbitrary integer onto the mode range.
    pub fn from_clamped(value: i64) -> Self {
        let raw = value.clamp(0, i64::from(MODE_COUNT - 1)) as u8;
        Self::from_raw(raw).unwrap_or(Self::Solid)
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Serialize for Mode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Error from config JSON handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The body was not valid JSON (or not an object).
    BadJson,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BadJson => write!(f, "bad json"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The single source-of-truth configuration record.
///
/// Serializes to the persistent subset; display-only fields
/// (`inPreview`, `buildVersion`, `copyright`) are added by
/// [`AppConfig::full_json`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Pixels per channel, 0..=50 each.
    pub count: [u16; NUM_CHANNELS],
    /// Global brightness, 1..=255.
    pub brightness: u8,
    pub mode: Mode,
    /// 0..=255, higher is faster.
    pub speed: u8,
    /// 0..=255, meaning depends on mode.
    pub intensity: u8,
    /// Segment width / gap, 1..=255.
    pub width: u8,
    pub color_a: u32,
    pub color_b: u32,
    pub color_c: u32,
    pub color_d: u32,
    /// How many of colors A..D form the palette, 1..=4.
    pub palette_count: u8,
    pub resume_on_boot: bool,
    /// CPU-temperature status bar (CH5) enable, consumed by the telemetry
    /// driver.
    pub enable_cpu: bool,
    /// Fan-speed status bar (CH6) enable.
    pub enable_fan: bool,
    /// Per-channel direction flip (within-channel index only).
    pub reverse: [bool; NUM_CHANNELS],
    /// Kill switch: forces an all-zero frame regardless of mode.
    pub master_off: bool,
    /// Playlist steps as a JSON array literal; parsed lazily by the
    /// playlist engine.
    pub custom_seq: String,
    pub custom_loop: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            count: [50, 50, 50, 50],
            brightness: 180,
            mode: Mode::Rainbow,
            speed: 128,
            intensity: 128,
            width: 4,
            color_a: 0xFF0000,
            color_b: 0xFFA000,
            color_c: 0x00FF00,
            color_d: 0x0000FF,
            palette_count: 2,
            resume_on_boot: true,
            enable_cpu: true,
            enable_fan: true,
            reverse: [true, false, false, true],
            master_off: false,
            custom_seq: String::from("[]"),
            custom_loop: true,
        }
    }
}

/// Partial update parsed from inbound JSON.
///
/// Every field is optional and wide-typed so that out-of-range numbers
/// deserialize fine and get clamped during the merge.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigPatch {
    count: Option<Vec<i64>>,
    brightness: Option<i64>,
    mode: Option<i64>,
    speed: Option<i64>,
    intensity: Option<i64>,
    width: Option<i64>,
    color_a: Option<i64>,
    color_b: Option<i64>,
    color_c: Option<i64>,
    color_d: Option<i64>,
    palette_count: Option<i64>,
    resume_on_boot: Option<bool>,
    enable_cpu: Option<bool>,
    enable_fan: Option<bool>,
    reverse: Option<Vec<Option<bool>>>,
    master_off: Option<bool>,
    custom_seq: Option<String>,
    custom_loop: Option<bool>,
}

pub(crate) fn clamp_u8(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

pub(crate) fn clamp_color(value: i64) -> u32 {
    (value.clamp(0, i64::from(u32::MAX)) as u32) & 0x00FF_FFFF
}

impl AppConfig {
    /// Derived ring length (sum of channel counts).
    pub fn ring_len(&self) -> usize {
        self.count.iter().map(|&c| usize::from(c)).sum()
    }

    /// Merge a JSON body onto a copy of this record.
    ///
    /// Returns the merged record; `self` is untouched so callers can
    /// apply-on-success.
    pub fn merge_json(&self, body: &str) -> Result<Self, ConfigError> {
        let patch: ConfigPatch =
            serde_json::from_str(body).map_err(|_| ConfigError::BadJson)?;
        let mut out = self.clone();

        if let Some(counts) = patch.count {
            // Short arrays update only the leading channels.
            for (i, &v) in counts.iter().take(NUM_CHANNELS).enumerate() {
                out.count[i] = v.clamp(0, MAX_PER_CHANNEL as i64) as u16;
            }
        }
        if let Some(v) = patch.brightness {
            out.brightness = v.clamp(1, 255) as u8;
        }
        if let Some(v) = patch.mode {
            out.mode = Mode::from_clamped(v);
        }
        if let Some(v) = patch.speed {
            out.speed = clamp_u8(v);
        }
        if let Some(v) = patch.intensity {
            out.intensity = clamp_u8(v);
        }
        if let Some(v) = patch.width {
            out.width = v.clamp(1, 255) as u8;
        }
        if let Some(v) = patch.color_a {
            out.color_a = clamp_color(v);
        }
        if let Some(v) = patch.color_b {
            out.color_b = clamp_color(v);
        }
        if let Some(v) = patch.color_c {
            out.color_c = clamp_color(v);
        }
        if let Some(v) = patch.color_d {
            out.color_d = clamp_color(v);
        }
        if let Some(v) = patch.palette_count {
            out.palette_count = v.clamp(1, 4) as u8;
        }
        if let Some(v) = patch.resume_on_boot {
            out.resume_on_boot = v;
        }
        if let Some(v) = patch.enable_cpu {
            out.enable_cpu = v;
        }
        if let Some(v) = patch.enable_fan {
            out.enable_fan = v;
        }
        if let Some(flags) = patch.reverse {
            // Null entries leave the channel's flag unchanged.
            for (i, flag) in flags.iter().take(NUM_CHANNELS).enumerate() {
                if let Some(v) = flag {
                    out.reverse[i] = *v;
                }
            }
        }
        if let Some(v) = patch.master_off {
            out.master_off = v;
        }
        if let Some(v) = patch.custom_seq {
            out.custom_seq = v;
        }
        if let Some(v) = patch.custom_loop {
            out.custom_loop = v;
        }

        Ok(out)
    }

    /// Serialize the persistent subset (what goes to NVS).
    pub fn persist_json(&self) -> String {
        serde_json::to_string(self).expect("config serialization cannot fail")
    }

    /// Serialize the full record including display-only fields.
    pub fn full_json(&self, in_preview: bool) -> String {
        let mut value = serde_json::to_value(self).expect("config serialization cannot fail");
        let obj = value.as_object_mut().expect("config serializes as object");
        obj.insert(String::from("inPreview"), json!(in_preview));
        obj.insert(String::from("buildVersion"), json!(BUILD_VERSION));
        obj.insert(String::from("copyright"), json!(COPYRIGHT));
        value.to_string()
    }
}
