//! Meteor shower: several independent heads with tapered tails.
//!
//! Each meteor keeps its own fractional position, velocity and extra tail
//! length; a small per-frame chance re-randomizes one so the shower stays
//! organic. Kinematics are rebuilt when the ring length changes.

use super::{fade_frame, Effect, EffectParams};
use crate::color::scale_color;
use crate::rng::FrameRng;
use crate::Rgb;

const MAX_METEORS: usize = 8;

pub struct MeteorEffect {
    pos: [f32; MAX_METEORS],
    vel: [f32; MAX_METEORS],
    len: [u8; MAX_METEORS],
    seeded_for: usize,
}

impl Default for MeteorEffect {
    fn default() -> Self {
        Self {
            pos: [0.0; MAX_METEORS],
            vel: [0.0; MAX_METEORS],
            len: [0; MAX_METEORS],
            seeded_for: 0,
        }
    }
}

impl MeteorEffect {
    fn reseed(&mut self, ring_len: usize, rng: &mut FrameRng) {
        for m in 0..MAX_METEORS {
            self.pos[m] = rng.below(ring_len as u32) as f32;
            self.vel[m] = 0.35 + 1.25 * rng.unit();
            self.len[m] = 2 + rng.below(6) as u8;
        }
        self.seeded_for = ring_len;
    }
}

impl Effect for MeteorEffect {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render(&mut self, p: &EffectParams, rng: &mut FrameRng, leds: &mut [Rgb]) {
        let ring_len = leds.len();
        if self.seeded_for != ring_len {
            self.reseed(ring_len, rng);
        }

        fade_frame(leds, 210 - p.intensity.min(209));

        let count = 1 + usize::from(p.intensity) * (MAX_METEORS - 1) / 255;
        let base_tail = 2 + u32::from(p.width) * 2;
        let pal = p.motion_palette();
        let pal_phase = p.tick as f32 * 0.004;
        let speed_mul = 0.5 + 2.0 * f32::from(p.speed) / 255.0;

        for m in 0..count {
            self.pos[m] += self.vel[m] * speed_mul;
            while self.pos[m] >= ring_len as f32 {
                self.pos[m] -= ring_len as f32;
            }

            let head_idx = (self.pos[m] as usize).min(ring_len - 1);
            let head = pal.sample(self.pos[m] / ring_len as f32 + pal_phase, p.intensity);
            leds[head_idx] = head;

            let tail = base_tail + u32::from(self.len[m]);
            for k in 1..=tail {
                let t = k as f32 / tail as f32;
                let fall = (1.0 - t) * (1.0 - t);
                let q = (head_idx + ring_len - (k as usize % ring_len)) % ring_len;
                leds[q] = scale_color(head, fall);
            }

            // ~1.5% chance per frame to re-randomize this meteor.
            if (rng.next_u32() & 255) < 4 {
                self.vel[m] = 0.35 + 1.25 * rng.unit();
                self.len[m] = 2 + rng.below(6) as u8;
            }
        }
    }

    fn reset(&mut self) {
        self.seeded_for = 0;
    }
}
