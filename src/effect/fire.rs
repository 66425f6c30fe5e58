//! Fire: the classic cool / diffuse / spark heat simulation, wrapped
//! around the ring and mapped through a red-yellow-white ramp.

use super::{Effect, EffectParams};
use crate::rng::FrameRng;
use crate::{Rgb, MAX_RING};

const COOL_BASE: u32 = 50;
const COOL_SPAN: u32 = 36;
const SPARK_ADD_BASE: u32 = 180;
// Pushes the ramp toward yellow/white before color mapping.
const HEAT_BIAS: u16 = 65;
const TH1: u16 = 35;
const TH2: u16 = 160;

pub struct FireEffect {
    heat: [u8; MAX_RING],
}

impl Default for FireEffect {
    fn default() -> Self {
        Self {
            heat: [0; MAX_RING],
        }
    }
}

impl Effect for FireEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, p: &EffectParams, rng: &mut FrameRng, leds: &mut [Rgb]) {
        let len = leds.len();

        // 1) cool each cell a little
        let cool = COOL_BASE - u32::from(p.intensity) * COOL_SPAN / 255; // ~14..50
        for h in self.heat[..len].iter_mut() {
            let dec = rng.below(cool + 1) as u8;
            *h = h.saturating_sub(dec);
        }

        // 2) diffuse (3-tap wraparound blur)
        let prev = self.heat;
        for i in 0..len {
            let i1 = (i + len - 1) % len;
            let i2 = (i + 1) % len;
            self.heat[i] =
                ((u16::from(prev[i]) + u16::from(prev[i1]) + u16::from(prev[i2])) / 3) as u8;
        }

        // 3) random sparks, hotter than the cooling floor
        let sparks = 1 + u32::from(p.speed) / 64;
        for _ in 0..sparks {
            let q = rng.below(len as u32) as usize;
            let add = SPARK_ADD_BASE + rng.below(96); // 180..=275
            self.heat[q] = (u32::from(self.heat[q]) + add).min(255) as u8;
        }

        // 4) map heat to color
        for (i, led) in leds.iter_mut().enumerate() {
            let t = (u16::from(self.heat[i]) + HEAT_BIAS).min(255);
            *led = if t < TH1 {
                Rgb {
                    r: (t * 255 / TH1) as u8,
                    g: 0,
                    b: 0,
                }
            } else if t < TH2 {
                Rgb {
                    r: 255,
                    g: ((t - TH1) * 255 / (TH2 - TH1)) as u8,
                    b: 0,
                }
            } else {
                Rgb {
                    r: 255,
                    g: 255,
                    b: ((t - TH2) * 255 / (255 - TH2)) as u8,
                }
            };
        }
    }

    fn reset(&mut self) {
        self.heat = [0; MAX_RING];
    }
}
