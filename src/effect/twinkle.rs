//! Twinkle: per-pixel glints with a rise-and-fall brightness curve.
//!
//! Each pixel carries a glint phase (0 = idle, 1..=255 = progress through
//! a sin^3 curve). New glints spawn on idle pixels at a rate scaled by
//! intensity and ring size; speed advances the phase, width stretches the
//! glint.

use super::{fade_frame, Effect, EffectParams};
use crate::color::scale_color;
use crate::rng::FrameRng;
use crate::{Rgb, MAX_RING};

pub struct TwinkleEffect {
    phase: [u8; MAX_RING],
}

impl Default for TwinkleEffect {
    fn default() -> Self {
        Self {
            phase: [0; MAX_RING],
        }
    }
}

impl Effect for TwinkleEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, p: &EffectParams, rng: &mut FrameRng, leds: &mut [Rgb]) {
        let len = leds.len();

        let f = (18 + u32::from(p.speed) / 2).min(254) as u8;
        fade_frame(leds, 255 - f);

        // Spawn new glints on idle pixels, up to ~7 per frame on a full
        // ring; rounded to nearest, not truncated.
        const POP_DIV: u32 = 255 * 30;
        let pops = 1 + (u32::from(p.intensity) * len as u32 + POP_DIV / 2) / POP_DIV;
        for _ in 0..pops {
            let k = rng.below(len as u32) as usize;
            if self.phase[k] == 0 {
                self.phase[k] = 1 + (rng.next_u32() & 1) as u8;
            }
        }

        let pal = p.motion_palette();
        let pal_phase = p.tick as f32 * 0.0025;
        let advance = (2 + i32::from(p.speed) / 24 - i32::from(p.width) / 6).max(1) as u16;

        for (i, led) in leds.iter_mut().enumerate() {
            let ph = self.phase[i];
            if ph == 0 {
                continue;
            }

            let x = f32::from(ph) / 255.0;
            let b = (core::f32::consts::PI * x).sin();
            let b = b * b * b; // sharper peak

            let base = pal.sample(i as f32 / len as f32 + pal_phase, p.intensity);
            *led = scale_color(base, b);

            let next = u16::from(ph) + advance;
            self.phase[i] = if next >= 255 { 0 } else { next as u8 };
        }
    }

    fn reset(&mut self) {
        self.phase = [0; MAX_RING];
    }
}
