//! Effect system with compile-time known effect variants
//!
//! One state struct per effect, no heap for per-frame work. Effects render
//! into a ring-ordered slice; state that survives between frames (heat
//! maps, glint phases, meteor kinematics) lives in fixed-size arrays
//! inside the effect structs. Effects never fail: invalid parameters are
//! clamped before they get here.

mod breathe;
mod clock_spin;
mod comet;
mod fire;
mod larson;
mod meteor;
mod palette_chase;
mod palette_cycle;
mod plasma;
mod rainbow;
mod solid;
mod theater;
mod twinkle;
mod wipe;

pub use breathe::BreatheEffect;
pub use clock_spin::ClockSpinEffect;
pub use comet::CometEffect;
pub use fire::FireEffect;
pub use larson::LarsonEffect;
pub use meteor::MeteorEffect;
pub use palette_chase::PaletteChaseEffect;
pub use palette_cycle::PaletteCycleEffect;
pub use plasma::PlasmaEffect;
pub use rainbow::RainbowEffect;
pub use solid::SolidEffect;
pub use theater::TheaterEffect;
pub use twinkle::TwinkleEffect;
pub use wipe::ColorWipeEffect;

use crate::color::{Palette, BLACK};
use crate::config::{AppConfig, Mode};
use crate::math8::dim8;
use crate::rng::FrameRng;
use crate::Rgb;

/// Per-frame effect inputs: the tick counter plus the animation subset of
/// the config (possibly overridden by a playlist step).
#[derive(Debug, Clone, Copy)]
pub struct EffectParams {
    pub tick: u32,
    pub speed: u8,
    pub intensity: u8,
    pub width: u8,
    pub palette_count: u8,
    pub colors: [u32; 4],
}

impl EffectParams {
    pub fn from_config(cfg: &AppConfig, tick: u32) -> Self {
        Self {
            tick,
            speed: cfg.speed,
            intensity: cfg.intensity,
            width: cfg.width,
            palette_count: cfg.palette_count,
            colors: [cfg.color_a, cfg.color_b, cfg.color_c, cfg.color_d],
        }
    }

    /// The configured palette (first `palette_count` of colors A..D).
    pub fn palette(&self) -> Palette {
        Palette::new(self.colors, self.palette_count)
    }

    /// Palette with derived companions when only one color is configured.
    pub fn motion_palette(&self) -> Palette {
        Palette::motion(self.colors, self.palette_count)
    }

    /// Map `speed` onto a tick divider: `base - speed/step`, minimum 1.
    ///
    /// The classic NeoPixel-era way of making the slider feel roughly
    /// perceptual on a tick-driven animation.
    pub(crate) fn tick_divider(&self, base: u32, step: u32) -> u32 {
        base.saturating_sub(u32::from(self.speed) / step).max(1)
    }
}

/// Render one frame of an effect.
pub(crate) trait Effect {
    fn render(&mut self, p: &EffectParams, rng: &mut FrameRng, leds: &mut [Rgb]);

    /// Reset effect state
    fn reset(&mut self) {}
}

/// Dim every pixel toward black by `amount` (trail fade).
pub(crate) fn fade_frame(leds: &mut [Rgb], amount: u8) {
    for led in leds {
        led.r = dim8(led.r, amount);
        led.g = dim8(led.g, amount);
        led.b = dim8(led.b, amount);
    }
}

/// Fill the frame with one color.
pub(crate) fn fill(leds: &mut [Rgb], c: Rgb) {
    for led in leds {
        *led = c;
    }
}

/// All built-in effects, one persistent instance each.
///
/// Both the direct mode dispatch and the playlist engine render through
/// the same bank, so trails and heat carry across step boundaries the way
/// they do across config changes.
#[derive(Default)]
pub struct EffectBank {
    solid: SolidEffect,
    breathe: BreatheEffect,
    wipe: ColorWipeEffect,
    larson: LarsonEffect,
    rainbow: RainbowEffect,
    theater: TheaterEffect,
    twinkle: TwinkleEffect,
    comet: CometEffect,
    meteor: MeteorEffect,
    clock_spin: ClockSpinEffect,
    plasma: PlasmaEffect,
    fire: FireEffect,
    palette_cycle: PaletteCycleEffect,
    palette_chase: PaletteChaseEffect,
}

impl EffectBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one frame of `mode`. `Custom` is not a drawable effect and
    /// falls back to `Solid` (the playlist engine resolves steps before
    /// calling in here).
    pub fn render_mode(
        &mut self,
        mode: Mode,
        p: &EffectParams,
        rng: &mut FrameRng,
        leds: &mut [Rgb],
    ) {
        if leds.is_empty() {
            return;
        }
        match mode {
            Mode::Solid | Mode::Custom => self.solid.render(p, rng, leds),
            Mode::Breathe => self.breathe.render(p, rng, leds),
            Mode::ColorWipe => self.wipe.render(p, rng, leds),
            Mode::Larson => self.larson.render(p, rng, leds),
            Mode::Rainbow => self.rainbow.render(p, rng, leds),
            Mode::TheaterChase => self.theater.render(p, rng, leds),
            Mode::Twinkle => self.twinkle.render(p, rng, leds),
            Mode::Comet => self.comet.render(p, rng, leds),
            Mode::Meteor => self.meteor.render(p, rng, leds),
            Mode::ClockSpin => self.clock_spin.render(p, rng, leds),
            Mode::Plasma => self.plasma.render(p, rng, leds),
            Mode::Fire => self.fire.render(p, rng, leds),
            Mode::PaletteCycle => self.palette_cycle.render(p, rng, leds),
            Mode::PaletteChase => self.palette_chase.render(p, rng, leds),
        }
    }

    /// Clear all carried effect state (trails, heat, glint phases).
    pub fn reset_all(&mut self) {
        self.solid.reset();
        self.breathe.reset();
        self.wipe.reset();
        self.larson.reset();
        self.rainbow.reset();
        self.theater.reset();
        self.twinkle.reset();
        self.comet.reset();
        self.meteor.reset();
        self.clock_spin.reset();
        self.plasma.reset();
        self.fire.reset();
        self.palette_cycle.reset();
        self.palette_chase.reset();
    }
}

pub(crate) fn clear(leds: &mut [Rgb]) {
    fill(leds, BLACK);
}
