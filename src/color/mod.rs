mod palette;
mod utils;

pub use palette::Palette;
use smart_leds::RGB8;
pub use utils::{
    blend_colors, hsv_to_rgb, rgb_from_u32, rgb_to_hsv, scale_color, u32_from_rgb, wheel,
};

pub type Rgb = RGB8;

/// All-off pixel.
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
