use crate::math8::blend8;

use super::Rgb;

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Pack an RGB color into a 0xRRGGBB value
pub const fn u32_from_rgb(c: Rgb) -> u32 {
    ((c.r as u32) << 16) | ((c.g as u32) << 8) | c.b as u32
}

/// Blend two RGB colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0 = all a, 255 = all b)
#[inline]
pub fn blend_colors(a: Rgb, b: Rgb, amount_of_b: u8) -> Rgb {
    Rgb {
        r: blend8(a.r, b.r, amount_of_b),
        g: blend8(a.g, b.g, amount_of_b),
        b: blend8(a.b, b.b, amount_of_b),
    }
}

/// Scale a color by a unit-range level.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scale_color(c: Rgb, level: f32) -> Rgb {
    let level = level.clamp(0.0, 1.0);
    Rgb {
        r: (f32::from(c.r) * level) as u8,
        g: (f32::from(c.g) * level) as u8,
        b: (f32::from(c.b) * level) as u8,
    }
}

/// Classic 256-step color wheel: red -> green -> blue -> red.
pub const fn wheel(pos: u8) -> Rgb {
    if pos < 85 {
        return Rgb {
            r: 255 - pos * 3,
            g: pos * 3,
            b: 0,
        };
    }
    if pos < 170 {
        let pos = pos - 85;
        return Rgb {
            r: 0,
            g: 255 - pos * 3,
            b: pos * 3,
        };
    }
    let pos = pos - 170;
    Rgb {
        r: pos * 3,
        g: 0,
        b: 255 - pos * 3,
    }
}

/// Convert float HSV (hue and saturation/value all 0..1) to RGB.
///
/// Hue wraps; the plasma field relies on the continuous mapping.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match (i as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb {
        r: (r * 255.0) as u8,
        g: (g * 255.0) as u8,
        b: (b * 255.0) as u8,
    }
}

/// Convert RGB to float HSV `(h, s, v)`, each 0..1.
pub fn rgb_to_hsv(c: Rgb) -> (f32, f32, f32) {
    let r = f32::from(c.r) / 255.0;
    let g = f32::from(c.g) / 255.0;
    let b = f32::from(c.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max <= 0.0 { 0.0 } else { delta / max };
    if delta == 0.0 {
        return (0.0, s, v);
    }

    let mut h = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    h /= 6.0;
    if h < 0.0 {
        h += 1.0;
    }
    (h, s, v)
}
