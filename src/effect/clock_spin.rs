//! Clock spin: a contiguous arc of the primary color sweeping over a
//! secondary-color background.

use super::{fill, Effect, EffectParams};
use crate::color::rgb_from_u32;
use crate::rng::FrameRng;
use crate::Rgb;

#[derive(Debug, Clone, Copy, Default)]
pub struct ClockSpinEffect;

impl Effect for ClockSpinEffect {
    fn render(&mut self, p: &EffectParams, _rng: &mut FrameRng, leds: &mut [Rgb]) {
        let len = leds.len();
        let denom = p.tick_divider(3, 85);
        let pos = ((p.tick / denom) as usize) % len;

        fill(leds, rgb_from_u32(p.colors[1]));

        let fg = rgb_from_u32(p.colors[0]);
        let span = (usize::from(p.width) * 2 + 1).max(1);
        for w in 0..span {
            leds[(pos + w) % len] = fg;
        }
    }
}
