//! Solid color fill.

use super::{fill, Effect, EffectParams};
use crate::color::rgb_from_u32;
use crate::rng::FrameRng;
use crate::Rgb;

#[derive(Debug, Clone, Copy, Default)]
pub struct SolidEffect;

impl Effect for SolidEffect {
    fn render(&mut self, p: &EffectParams, _rng: &mut FrameRng, leds: &mut [Rgb]) {
        fill(leds, rgb_from_u32(p.colors[0]));
    }
}
