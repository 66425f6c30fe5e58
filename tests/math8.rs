mod tests {
    use rgbctrl::math8::{blend8, dim8, scale8};

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(255, 128), 128);
        assert_eq!(scale8(0, 128), 0);
        assert_eq!(scale8(128, 128), 64);
        assert_eq!(scale8(128, 255), 128);
        assert_eq!(scale8(128, 0), 0);
    }

    #[test]
    fn test_blend8() {
        assert_eq!(blend8(255, 128, 128), 191);
        assert_eq!(blend8(0, 128, 255), 128);
        assert_eq!(blend8(255, 0, 128), 127);
        assert_eq!(blend8(255, 128, 0), 255);
    }

    #[test]
    fn test_dim8_converges_to_black() {
        let mut v = 255u8;
        for _ in 0..64 {
            v = dim8(v, 40);
        }
        assert_eq!(v, 0);
    }

    #[test]
    fn test_dim8_zero_amount_is_near_identity() {
        // amount 0 keeps 255/256 of the value
        assert_eq!(dim8(255, 0), 254);
        assert_eq!(dim8(0, 0), 0);
    }
}
