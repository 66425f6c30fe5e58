mod tests {
    use rgbctrl::color::{rgb_from_u32, u32_from_rgb, Palette, Rgb};

    const COLORS: [u32; 4] = [0xFF0000, 0xFFA000, 0x00FF00, 0x0000FF];

    #[test]
    fn test_single_color_palette_is_bit_exact() {
        let pal = Palette::new(COLORS, 1);
        for i in 0..100 {
            let x = i as f32 / 25.0 - 1.0; // include negatives and > 1
            assert_eq!(pal.sample(x, 255), rgb_from_u32(0xFF0000));
        }
    }

    #[test]
    fn test_zero_blend_is_a_hard_step() {
        let pal = Palette::new(COLORS, 4);
        let allowed: Vec<Rgb> = COLORS.iter().map(|&c| rgb_from_u32(c)).collect();
        for i in 0..64 {
            let x = i as f32 / 64.0;
            let c = pal.sample(x, 0);
            assert!(allowed.contains(&c), "blended value {c:?} at x={x}");
        }
    }

    #[test]
    fn test_sample_wraps_around_the_unit_interval() {
        let pal = Palette::new(COLORS, 2);
        assert_eq!(pal.sample(0.25, 0), pal.sample(1.25, 0));
        assert_eq!(pal.sample(0.25, 0), pal.sample(-0.75, 0));
    }

    #[test]
    fn test_blend_moves_toward_next_entry() {
        let pal = Palette::new([0x000000, 0xFF0000, 0, 0], 2);
        // Midway through the first segment with full blend: halfway to red.
        let mid = pal.sample(0.25, 255);
        assert!(mid.r > 100 && mid.r < 155, "got {mid:?}");
        assert_eq!(mid.g, 0);
    }

    #[test]
    fn test_palette_count_clamps() {
        assert_eq!(Palette::new(COLORS, 0).len(), 1);
        assert_eq!(Palette::new(COLORS, 9).len(), 4);
    }

    #[test]
    fn test_motion_palette_passes_multi_color_through() {
        let pal = Palette::motion(COLORS, 3);
        assert_eq!(pal.len(), 3);
        assert_eq!(pal.color(0), rgb_from_u32(COLORS[0]));
        assert_eq!(pal.color(2), rgb_from_u32(COLORS[2]));
    }

    #[test]
    fn test_motion_palette_derives_companions_from_one_color() {
        let pal = Palette::motion(COLORS, 1);
        assert_eq!(pal.len(), 4);
        // Base color survives (HSV round trip keeps pure red exact).
        assert_eq!(pal.color(0), rgb_from_u32(0xFF0000));
        // Companions differ from the base and from each other.
        let c: Vec<u32> = (0..4).map(|i| u32_from_rgb(pal.color(i))).collect();
        assert_ne!(c[0], c[1]);
        assert_ne!(c[1], c[2]);
        assert_ne!(c[2], c[3]);
    }
}
