//! Rainbow: the full color wheel laid around the ring, rotating with
//! speed.

use super::{Effect, EffectParams};
use crate::color::wheel;
use crate::rng::FrameRng;
use crate::Rgb;

#[derive(Debug, Clone, Copy, Default)]
pub struct RainbowEffect;

impl Effect for RainbowEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, p: &EffectParams, _rng: &mut FrameRng, leds: &mut [Rgb]) {
        let len = leds.len();
        let denom = p.tick_divider(6, 51);
        let offset = (p.tick / denom) as u8;
        for (i, led) in leds.iter_mut().enumerate() {
            *led = wheel(((i * 256 / len) as u8).wrapping_add(offset));
        }
    }
}
