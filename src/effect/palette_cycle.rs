//! Palette cycle: the palette laid around the ring as one period,
//! rotating with speed; intensity controls blending between entries.

use super::{Effect, EffectParams};
use crate::rng::FrameRng;
use crate::Rgb;

#[derive(Debug, Clone, Copy, Default)]
pub struct PaletteCycleEffect;

impl Effect for PaletteCycleEffect {
    fn render(&mut self, p: &EffectParams, _rng: &mut FrameRng, leds: &mut [Rgb]) {
        let len = leds.len();
        let pal = p.palette();

        let denom = p.tick_divider(6, 51);
        let offset = (p.tick as f32 / denom as f32) * 0.015;
        for (i, led) in leds.iter_mut().enumerate() {
            *led = pal.sample(i as f32 / len as f32 + offset, p.intensity);
        }
    }
}
