//! Plasma: a multi-octave sine field over (ring angle, time) mapped to
//! hue, with contrast from width and saturation/sparkle from intensity.

use super::{Effect, EffectParams};
use crate::color::hsv_to_rgb;
use crate::rng::FrameRng;
use crate::Rgb;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlasmaEffect {
    t: f32,
}

impl Effect for PlasmaEffect {
    fn render(&mut self, p: &EffectParams, _rng: &mut FrameRng, leds: &mut [Rgb]) {
        let len = leds.len();

        let tstep = 0.015 + (f32::from(p.speed) / 255.0) * 0.050;
        self.t += tstep;
        let t = self.t;

        let drift = (t * 0.23).sin() * 0.35 + (t * 0.11 + 1.3).sin() * 0.15;

        let sat_base = 0.55 + (f32::from(p.intensity) / 255.0) * 0.45;
        let contrast = 0.90 + (f32::from(p.width) / 20.0) * 0.60;
        let spark_amp = 0.06 * (f32::from(p.intensity) / 255.0);

        for (i, led) in leds.iter_mut().enumerate() {
            let u = i as f32 / len as f32;
            let a = u * core::f32::consts::TAU;

            let f1 = (3.0 * a + t).sin() * 0.55;
            let f2 = (5.0 * a - t * 0.8 + drift).sin() * 0.35;
            let f3 = (6.3 * a + t * 1.6).sin() * 0.20;
            let field = (f1 + f2 + f3) * 0.5 + 0.5;

            let v = (field * contrast + spark_amp * (a * 8.0 - t * 2.2).sin()).clamp(0.0, 1.0);
            let hue = (field * 1.2 + t * 0.05).rem_euclid(1.0);

            *led = hsv_to_rgb(hue, sat_base, v);
        }
    }

    fn reset(&mut self) {
        self.t = 0.0;
    }
}
