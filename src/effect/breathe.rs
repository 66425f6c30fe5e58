//! Breathe: sinusoidal brightness on the primary color.
//!
//! The raw sine is eased (smoothstep) and then low-pass filtered so the
//! frame-stepped level never shows visible bands, with a small floor so
//! the LEDs never go fully dark.

use super::{fill, Effect, EffectParams};
use crate::color::{rgb_from_u32, scale_color};
use crate::rng::FrameRng;
use crate::Rgb;

const LEVEL_FLOOR: f32 = 0.10;
const SMOOTHING: f32 = 0.10;

#[derive(Debug, Clone, Copy, Default)]
pub struct BreatheEffect {
    phase: f32,
    level: f32,
}

impl Effect for BreatheEffect {
    fn render(&mut self, p: &EffectParams, _rng: &mut FrameRng, leds: &mut [Rgb]) {
        // Phase advances with speed, independent of tick granularity.
        let step = 0.010 + (f32::from(p.speed) / 255.0) * 0.045;
        self.phase += step;

        let s = 0.5 + 0.5 * (self.phase * core::f32::consts::TAU).sin();
        let eased = s * s * (3.0 - 2.0 * s);
        let target = LEVEL_FLOOR + (1.0 - LEVEL_FLOOR) * eased;
        self.level = self.level * (1.0 - SMOOTHING) + target * SMOOTHING;

        fill(leds, scale_color(rgb_from_u32(p.colors[0]), self.level));
    }

    fn reset(&mut self) {
        self.phase = 0.0;
        self.level = 0.0;
    }
}
