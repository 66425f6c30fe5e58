//! Frame pacing and boot fade.
//!
//! Pacing is driven by the `speed` parameter; the caller is responsible
//! for sleeping between polls. On each rendered frame the scheduler
//! advances the frame counter and the smoothed frame delta.

use embassy_time::{Duration, Instant};

/// Boot fade-in length.
pub const BOOT_FADE_MS: u64 = 3200;

/// Frame interval for a given speed: 10..=138 ms, faster speed means a
/// shorter frame.
pub const fn frame_ms(speed: u8) -> u64 {
    10 + (255 - speed as u64) / 2
}

/// Paces rendering and tracks tick / dt / boot-fade state.
pub struct FrameScheduler {
    last_frame: Instant,
    tick: u32,
    dt_sec: f32,
    boot_fade_start: Option<Instant>,
}

impl FrameScheduler {
    /// Create a scheduler with the boot fade armed.
    pub fn new(now: Instant) -> Self {
        Self {
            last_frame: now,
            tick: 0,
            dt_sec: 0.0,
            boot_fade_start: Some(now),
        }
    }

    /// Whether the next frame is due.
    pub fn due(&self, now: Instant, speed: u8) -> bool {
        now.duration_since(self.last_frame).as_millis() >= frame_ms(speed)
    }

    /// Time until the next frame is due (zero when overdue).
    pub fn time_to_next(&self, now: Instant, speed: u8) -> Duration {
        let elapsed = now.duration_since(self.last_frame).as_millis();
        Duration::from_millis(frame_ms(speed).saturating_sub(elapsed))
    }

    /// Account for a frame being rendered now: bumps the tick counter and
    /// updates the smoothed delta.
    pub fn begin_frame(&mut self, now: Instant) {
        let inst = now.duration_since(self.last_frame).as_millis() as f32 / 1000.0;
        self.dt_sec = self.dt_sec * 0.8 + inst * 0.2;
        self.last_frame = now;
        self.tick = self.tick.wrapping_add(1);
    }

    pub const fn tick(&self) -> u32 {
        self.tick
    }

    /// Smoothed seconds-per-frame estimate.
    pub const fn dt_sec(&self) -> f32 {
        self.dt_sec
    }

    /// Brightness to transmit this frame.
    ///
    /// During the boot fade this ramps linearly from 0 to the live target
    /// over [`BOOT_FADE_MS`], never reporting 0 while the target is
    /// nonzero so pixels appear immediately. The target tracks live
    /// brightness changes.
    pub fn output_brightness(&mut self, now: Instant, target: u8) -> u8 {
        let Some(start) = self.boot_fade_start else {
            return target;
        };
        let elapsed = now.duration_since(start).as_millis();
        if elapsed >= BOOT_FADE_MS {
            self.boot_fade_start = None;
            return target;
        }
        let mut cur = (u64::from(target) * elapsed / BOOT_FADE_MS) as u8;
        if target > 0 && cur == 0 {
            cur = 1;
        }
        cur
    }

    /// Whether the boot fade is still running.
    pub const fn boot_fading(&self) -> bool {
        self.boot_fade_start.is_some()
    }
}
