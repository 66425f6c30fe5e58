//! Larson scanner: a tent-shaped head ping-ponging across the ring over a
//! dimming trail.

use super::{fade_frame, Effect, EffectParams};
use crate::rng::FrameRng;
use crate::Rgb;

#[derive(Debug, Clone, Copy, Default)]
pub struct LarsonEffect;

impl Effect for LarsonEffect {
    fn render(&mut self, p: &EffectParams, _rng: &mut FrameRng, leds: &mut [Rgb]) {
        let len = leds.len();
        let denom = p.tick_divider(6, 51);
        let mut pos = ((p.tick / denom) as usize) % (len * 2);
        if pos >= len {
            pos = 2 * len - 1 - pos;
        }

        let fade_base = (10 + u32::from(p.intensity)).min(254) as u8;
        fade_frame(leds, 255 - fade_base);

        let pal = p.motion_palette();
        let phase = p.tick as f32 * 0.006;
        let width = i32::from(p.width);
        for w in -width..=width {
            let q = pos as i32 + w;
            if q >= 0 && (q as usize) < len {
                let q = q as usize;
                leds[q] = pal.sample(q as f32 / len as f32 + phase, p.intensity);
            }
        }
    }
}
