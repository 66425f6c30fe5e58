//! User-scriptable playlist (mode 14).
//!
//! The playlist source is the `customSeq` JSON array literal carried
//! verbatim in the config. It is re-parsed lazily whenever the source
//! string changes; parse errors never propagate to the config apply path,
//! they simply render black.

use embassy_time::Instant;
use serde::Deserialize;

use crate::config::{clamp_color, clamp_u8, AppConfig, Mode};
use crate::effect::{clear, EffectBank, EffectParams};
use crate::rng::FrameRng;
use crate::Rgb;

const MIN_STEP_MS: i64 = 1;
const MAX_STEP_MS: i64 = 60_000;

/// One playlist entry: a built-in mode, a duration, and optional
/// parameter overrides applied on top of the live config for the step's
/// lifetime only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistStep {
    pub mode: Mode,
    pub duration_ms: u32,
    pub speed: Option<u8>,
    pub intensity: Option<u8>,
    pub width: Option<u8>,
    pub palette_count: Option<u8>,
    pub color_a: Option<u32>,
    pub color_b: Option<u32>,
    pub color_c: Option<u32>,
    pub color_d: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepPatch {
    mode: Option<i64>,
    duration: Option<i64>,
    speed: Option<i64>,
    intensity: Option<i64>,
    width: Option<i64>,
    palette_count: Option<i64>,
    color_a: Option<i64>,
    color_b: Option<i64>,
    color_c: Option<i64>,
    color_d: Option<i64>,
}

impl PlaylistStep {
    fn from_patch(patch: &StepPatch) -> Option<Self> {
        // A step without a mode is invalid and gets dropped.
        let mode = Mode::from_clamped(patch.mode?);
        let duration = patch
            .duration
            .unwrap_or(1000)
            .clamp(MIN_STEP_MS, MAX_STEP_MS) as u32;
        Some(Self {
            mode,
            duration_ms: duration,
            speed: patch.speed.map(clamp_u8),
            intensity: patch.intensity.map(clamp_u8),
            width: patch.width.map(|w| w.clamp(1, 255) as u8),
            palette_count: patch.palette_count.map(|c| c.clamp(1, 4) as u8),
            color_a: patch.color_a.map(clamp_color),
            color_b: patch.color_b.map(clamp_color),
            color_c: patch.color_c.map(clamp_color),
            color_d: patch.color_d.map(clamp_color),
        })
    }

    fn apply_overrides(&self, p: &mut EffectParams) {
        if let Some(v) = self.speed {
            p.speed = v;
        }
        if let Some(v) = self.intensity {
            p.intensity = v;
        }
        if let Some(v) = self.width {
            p.width = v;
        }
        if let Some(v) = self.palette_count {
            p.palette_count = v;
        }
        if let Some(v) = self.color_a {
            p.colors[0] = v;
        }
        if let Some(v) = self.color_b {
            p.colors[1] = v;
        }
        if let Some(v) = self.color_c {
            p.colors[2] = v;
        }
        if let Some(v) = self.color_d {
            p.colors[3] = v;
        }
    }
}

/// Parse a playlist source string.
///
/// `None` means the source was not a JSON array at all; entries that are
/// not objects or lack a `mode` are silently dropped.
pub fn parse_steps(src: &str) -> Option<Vec<PlaylistStep>> {
    if src.trim().is_empty() {
        return Some(Vec::new());
    }
    let entries: Vec<serde_json::Value> = serde_json::from_str(src).ok()?;
    let mut steps = Vec::with_capacity(entries.len());
    for entry in entries {
        if !entry.is_object() {
            continue;
        }
        match serde_json::from_value::<StepPatch>(entry) {
            Ok(patch) => {
                if let Some(step) = PlaylistStep::from_patch(&patch) {
                    steps.push(step);
                } else {
                    log::debug!("playlist: dropping step without mode");
                }
            }
            Err(_) => log::debug!("playlist: dropping malformed step"),
        }
    }
    Some(steps)
}

/// Runs the parsed playlist: advances steps on wall time, holds the last
/// step when looping is off.
pub struct PlaylistEngine {
    steps: Vec<PlaylistStep>,
    source: String,
    index: usize,
    step_start: Instant,
}

impl PlaylistEngine {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            source: String::new(),
            index: 0,
            step_start: Instant::from_millis(0),
        }
    }

    /// Current step index (for observability).
    pub fn index(&self) -> usize {
        self.index
    }

    fn sync(&mut self, src: &str, now: Instant) {
        if self.source == src {
            return;
        }
        self.steps = parse_steps(src).unwrap_or_default();
        self.source = String::from(src);
        self.index = 0;
        self.step_start = now;
    }

    /// Render one playlist frame into `leds`.
    pub fn render(
        &mut self,
        cfg: &AppConfig,
        tick: u32,
        now: Instant,
        bank: &mut EffectBank,
        rng: &mut FrameRng,
        leds: &mut [Rgb],
    ) {
        self.sync(&cfg.custom_seq, now);

        if self.steps.is_empty() {
            clear(leds);
            return;
        }

        let step = &self.steps[self.index];

        // Overrides live on a scratch view; the config record is untouched
        // and steps without an override see the live value.
        let mut params = EffectParams::from_config(cfg, tick);
        step.apply_overrides(&mut params);

        // A step cannot recurse into the playlist; Custom renders Solid.
        bank.render_mode(step.mode, &params, rng, leds);

        let duration = u64::from(step.duration_ms);
        if now.duration_since(self.step_start).as_millis() >= duration {
            self.step_start = now;
            self.index += 1;
            if self.index >= self.steps.len() {
                self.index = if cfg.custom_loop {
                    0
                } else {
                    self.steps.len() - 1
                };
            }
        }
    }
}

impl Default for PlaylistEngine {
    fn default() -> Self {
        Self::new()
    }
}
