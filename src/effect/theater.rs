//! Theater chase: every gap-th pixel lit, marching with speed.

use super::{fade_frame, Effect, EffectParams};
use crate::rng::FrameRng;
use crate::Rgb;

#[derive(Debug, Clone, Copy, Default)]
pub struct TheaterEffect;

impl Effect for TheaterEffect {
    fn render(&mut self, p: &EffectParams, _rng: &mut FrameRng, leds: &mut [Rgb]) {
        let len = leds.len();
        let denom = p.tick_divider(10, 32);
        let gap = usize::from(p.width.max(1));
        let q = ((p.tick / denom) as usize) % gap;

        let fade_base = (10 + u32::from(p.intensity)).min(254) as u8;
        fade_frame(leds, 255 - fade_base);

        let pal = p.motion_palette();
        let phase = p.tick as f32 * 0.0045;
        let mut i = q;
        while i < len {
            leds[i] = pal.sample(i as f32 / len as f32 + phase, p.intensity);
            i += gap;
        }
    }
}
