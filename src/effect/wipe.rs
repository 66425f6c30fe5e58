//! Color wipe: a single head sweeping the ring over a cleared background.

use super::{clear, Effect, EffectParams};
use crate::rng::FrameRng;
use crate::Rgb;

#[derive(Debug, Clone, Copy, Default)]
pub struct ColorWipeEffect;

impl Effect for ColorWipeEffect {
    fn render(&mut self, p: &EffectParams, _rng: &mut FrameRng, leds: &mut [Rgb]) {
        clear(leds);
        let len = leds.len();
        let idx = (p.tick as usize / 2) % len;

        // Head color drifts through the motion palette over time.
        let pal = p.motion_palette();
        let phase = p.tick as f32 * (0.003 + (f32::from(p.speed) / 255.0) * 0.008);
        leds[idx] = pal.sample(idx as f32 / len as f32 + phase, p.intensity);
    }
}
