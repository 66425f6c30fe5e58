//! Frame composition: master-off gate, mode dispatch, ring frame buffer.

use embassy_time::Instant;

use crate::color::BLACK;
use crate::config::{AppConfig, Mode};
use crate::effect::{fill, EffectBank, EffectParams};
use crate::playlist::PlaylistEngine;
use crate::rng::FrameRng;
use crate::{Rgb, MAX_RING};

/// Owns the ring-ordered frame buffer and everything that draws into it.
///
/// The buffer persists between frames; trail effects (Larson, comet,
/// meteor, twinkle, theater) read the previous frame from it before
/// dimming. Effects address pixels only through the slice they are given.
pub struct Renderer {
    frame: [Rgb; MAX_RING],
    bank: EffectBank,
    playlist: PlaylistEngine,
    rng: FrameRng,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            frame: [BLACK; MAX_RING],
            bank: EffectBank::new(),
            playlist: PlaylistEngine::new(),
            rng: FrameRng::default(),
        }
    }

    /// Render one frame and return the ring slice to transmit.
    ///
    /// With `masterOff` set the frame is forced all-zero regardless of
    /// mode or brightness.
    pub fn render(&mut self, cfg: &AppConfig, tick: u32, now: Instant) -> &[Rgb] {
        let len = cfg.ring_len().min(MAX_RING);
        let Self {
            frame,
            bank,
            playlist,
            rng,
        } = self;
        let leds = &mut frame[..len];

        if cfg.master_off {
            fill(leds, BLACK);
            return leds;
        }

        match cfg.mode {
            Mode::Custom => playlist.render(cfg, tick, now, bank, rng, leds),
            mode => {
                let params = EffectParams::from_config(cfg, tick);
                bank.render_mode(mode, &params, rng, leds);
            }
        }
        leds
    }

    /// Drop all carried effect state (trails, heat maps, glint phases).
    pub fn reset_effects(&mut self) {
        self.bank.reset_all();
    }

    pub fn playlist(&self) -> &PlaylistEngine {
        &self.playlist
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
