//! Pixel sink: channel buffers, global brightness, frame transmission.

use crate::color::BLACK;
use crate::math8::scale8;
use crate::ring::RingMap;
use crate::{Rgb, StripDriver, MAX_PER_CHANNEL, NUM_CHANNELS};

/// Owns the four per-channel strip buffers and the output driver.
///
/// Effects never touch this directly; the renderer hands over a
/// ring-ordered frame and [`PixelSink::transmit`] scatters it through the
/// [`RingMap`], applies the global brightness scalar and writes each
/// channel once. The brightness value is latched: it is only re-applied
/// when the target changes.
pub struct PixelSink<D: StripDriver> {
    driver: D,
    buffers: [[Rgb; MAX_PER_CHANNEL]; NUM_CHANNELS],
    brightness: u8,
}

impl<D: StripDriver> PixelSink<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            buffers: [[BLACK; MAX_PER_CHANNEL]; NUM_CHANNELS],
            brightness: 0,
        }
    }

    /// Latch a new global brightness (0..=255). No-op when unchanged.
    pub fn set_brightness(&mut self, brightness: u8) {
        if self.brightness != brightness {
            self.brightness = brightness;
        }
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Scatter a ring-ordered frame onto the channels and transmit.
    ///
    /// Out-of-range ring indices are ignored; a zero-length ring is a
    /// legal no-op frame (all channels written empty).
    pub fn transmit(&mut self, frame: &[Rgb], map: &RingMap) {
        for (idx, &c) in frame.iter().enumerate() {
            if let Some((ch, px)) = map.locate(idx) {
                self.buffers[ch][px] = Rgb {
                    r: scale8(c.r, self.brightness),
                    g: scale8(c.g, self.brightness),
                    b: scale8(c.b, self.brightness),
                };
            }
        }
        for ch in 0..NUM_CHANNELS {
            let count = usize::from(map.channel_count(ch)).min(MAX_PER_CHANNEL);
            self.driver.write(ch, &self.buffers[ch][..count]);
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
