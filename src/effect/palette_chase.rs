//! Palette chase: blocks of palette colors marching around the ring,
//! with intensity darkening block edges for a soft look.

use super::{Effect, EffectParams};
use crate::color::scale_color;
use crate::rng::FrameRng;
use crate::Rgb;

#[derive(Debug, Clone, Copy, Default)]
pub struct PaletteChaseEffect;

impl Effect for PaletteChaseEffect {
    fn render(&mut self, p: &EffectParams, _rng: &mut FrameRng, leds: &mut [Rgb]) {
        let len = leds.len();
        let pal = p.palette();
        let n = usize::from(pal.len());

        let block = usize::from(p.width.max(1));
        let denom = p.tick_divider(4, 64);
        let pos = ((p.tick / denom) as usize) % len;

        for (i, led) in leds.iter_mut().enumerate() {
            let k = (i + len - pos) % len; // shift by pos for motion
            let which = (k / block) % n;
            let base = pal.color(which);

            if p.intensity == 0 {
                *led = base;
                continue;
            }

            // Edge softening: darken toward block boundaries.
            let edge = (k % block) as f32;
            let t_edge = (edge - (block - 1) as f32 / 2.0).abs() / (block as f32 / 2.0);
            let soft = (1.0 - (f32::from(p.intensity) / 255.0) * t_edge).max(0.0);
            *led = scale_color(base, soft);
        }
    }
}
