//! Comet: a head circling the ring with a linear-falloff tail, over a
//! dimming trail.

use super::{fade_frame, Effect, EffectParams};
use crate::color::scale_color;
use crate::rng::FrameRng;
use crate::Rgb;

#[derive(Debug, Clone, Copy, Default)]
pub struct CometEffect;

impl Effect for CometEffect {
    fn render(&mut self, p: &EffectParams, _rng: &mut FrameRng, leds: &mut [Rgb]) {
        let len = leds.len();
        let denom = p.tick_divider(4, 64);
        let pos = ((p.tick / denom) as usize) % len;

        fade_frame(leds, 200 - p.intensity.min(199));

        let pal = p.motion_palette();
        let phase = p.tick as f32 * 0.0055;
        let head = pal.sample(pos as f32 / len as f32 + phase, p.intensity);
        let width = usize::from(p.width.max(1));
        for w in 0..width {
            let tail = 1.0 - w as f32 / width as f32;
            leds[(pos + len - (w % len)) % len] = scale_color(head, tail);
        }
    }
}
