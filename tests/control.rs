mod tests {
    use std::net::{Ipv4Addr, SocketAddr};

    use embassy_time::Instant;
    use rgbctrl::config::Mode;
    use rgbctrl::control::{Advertiser, ControlPlane, DeviceIdentity, PENDING_BUDGET};
    use rgbctrl::test_utils::{CaptureDriver, MemStorage};
    use rgbctrl::Controller;

    const MAC: [u8; 6] = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];

    fn identity() -> DeviceIdentity {
        DeviceIdentity::new(7777, Ipv4Addr::new(192, 168, 1, 50), MAC)
    }

    fn plane(psk: Option<&str>) -> ControlPlane {
        ControlPlane::new(identity(), psk.map(String::from))
    }

    fn device() -> Controller<CaptureDriver, MemStorage> {
        Controller::new(
            CaptureDriver::new(),
            MemStorage::new(),
            Instant::from_millis(0),
        )
    }

    fn peer() -> SocketAddr {
        "192.168.1.20:40000".parse().unwrap()
    }

    fn handle(
        plane: &mut ControlPlane,
        dev: &mut Controller<CaptureDriver, MemStorage>,
        at_ms: u64,
        payload: &str,
    ) -> Option<serde_json::Value> {
        plane
            .handle_datagram(
                payload.as_bytes(),
                peer(),
                Instant::from_millis(at_ms),
                dev,
            )
            .map(|r| serde_json::from_str(&r.payload).expect("reply is JSON"))
    }

    fn drain(
        plane: &mut ControlPlane,
        dev: &mut Controller<CaptureDriver, MemStorage>,
        at_ms: u64,
    ) {
        for _ in 0..8 {
            plane.process_pending(PENDING_BUDGET, Instant::from_millis(at_ms), dev);
        }
    }

    #[test]
    fn test_json_discover_reply() {
        let mut plane = plane(None);
        let mut dev = device();
        let reply = handle(&mut plane, &mut dev, 0, r#"{"op":"discover"}"#).unwrap();
        assert_eq!(reply["ok"], serde_json::json!(true));
        assert_eq!(reply["op"], "discover");
        assert_eq!(reply["name"], "XBOX RGB");
        assert_eq!(reply["port"], 7777);
        assert_eq!(reply["ip"], "192.168.1.50");
        assert_eq!(reply["mac"], "AA:BB:CC:DD:EE:FF");
        assert!(reply["ver"].is_string());
    }

    #[test]
    fn test_plain_text_discovery() {
        let mut plane = plane(None);
        let mut dev = device();
        for probe in ["RGBDISC?", "RGBDISC?\n"] {
            let reply = plane
                .handle_datagram(probe.as_bytes(), peer(), Instant::from_millis(0), &mut dev)
                .unwrap();
            assert!(reply.payload.starts_with("RGBDISC! "));
            let json: serde_json::Value =
                serde_json::from_str(&reply.payload["RGBDISC! ".len()..]).unwrap();
            assert_eq!(json["op"], "discover");
        }
    }

    #[test]
    fn test_unknown_text_is_rejected() {
        let mut plane = plane(None);
        let mut dev = device();
        let reply = handle(&mut plane, &mut dev, 0, "HELLO?").unwrap();
        assert_eq!(reply["ok"], serde_json::json!(false));
        assert_eq!(reply["op"], "raw");
        assert_eq!(reply["err"], "unknown text");
    }

    #[test]
    fn test_error_envelopes() {
        let mut plane = plane(None);
        let mut dev = device();

        let reply = handle(&mut plane, &mut dev, 0, "{broken").unwrap();
        assert_eq!((reply["op"].as_str(), reply["err"].as_str()),
                   (Some("parse"), Some("bad json")));

        let reply = handle(&mut plane, &mut dev, 0, r#"{"x":1}"#).unwrap();
        assert_eq!((reply["op"].as_str(), reply["err"].as_str()),
                   (Some("op"), Some("missing op")));

        let reply = handle(&mut plane, &mut dev, 0, r#"{"op":"fly"}"#).unwrap();
        assert_eq!((reply["op"].as_str(), reply["err"].as_str()),
                   (Some("op"), Some("unknown op")));

        let reply = handle(&mut plane, &mut dev, 0, r#"{"op":"setCounts","c":[1,2]}"#).unwrap();
        assert_eq!((reply["op"].as_str(), reply["err"].as_str()),
                   (Some("setCounts"), Some("need 4 ints")));
    }

    #[test]
    fn test_get_returns_the_full_config() {
        let mut plane = plane(None);
        let mut dev = device();
        let reply = handle(&mut plane, &mut dev, 0, r#"{"op":"get"}"#).unwrap();
        assert_eq!(reply["ok"], serde_json::json!(true));
        assert_eq!(reply["op"], "get");
        assert_eq!(reply["cfg"]["mode"], 4);
        assert_eq!(reply["cfg"]["count"], serde_json::json!([50, 50, 50, 50]));
        assert_eq!(reply["cfg"]["buildVersion"], rgbctrl::BUILD_VERSION);
    }

    #[test]
    fn test_preview_is_deferred_then_applied() {
        let mut plane = plane(None);
        let mut dev = device();
        let reply = handle(
            &mut plane,
            &mut dev,
            0,
            r#"{"op":"preview","cfg":{"brightness":42}}"#,
        )
        .unwrap();
        assert_eq!(reply["ok"], serde_json::json!(true));
        assert_eq!(reply["op"], "preview");
        // Nothing applied on the receive path.
        assert_eq!(dev.config().brightness, 180);

        drain(&mut plane, &mut dev, 1);
        assert_eq!(dev.config().brightness, 42);
        assert!(dev.in_preview());
    }

    #[test]
    fn test_save_accepts_direct_fields_without_cfg_wrapper() {
        let mut plane = plane(None);
        let mut dev = device();
        handle(&mut plane, &mut dev, 0, r#"{"op":"save","mode":7,"speed":9}"#).unwrap();
        drain(&mut plane, &mut dev, 1);
        assert_eq!(dev.config().mode, Mode::Comet);
        assert_eq!(dev.config().speed, 9);
        assert!(!dev.in_preview());
    }

    #[test]
    fn test_set_counts_round_trip() {
        let mut plane = plane(None);
        let mut dev = device();
        let reply = handle(
            &mut plane,
            &mut dev,
            0,
            r#"{"op":"setCounts","c":[100,0,51,50]}"#,
        )
        .unwrap();
        assert_eq!(reply["ok"], serde_json::json!(true));
        drain(&mut plane, &mut dev, 1);
        assert_eq!(dev.config().count, [50, 0, 50, 50]);
    }

    #[test]
    fn test_reset_is_deferred() {
        let mut plane = plane(None);
        let mut dev = device();
        dev.apply_json_preview(r#"{"brightness":3}"#, Instant::from_millis(0))
            .unwrap();
        handle(&mut plane, &mut dev, 0, r#"{"op":"reset"}"#).unwrap();
        assert_eq!(dev.config().brightness, 3);
        drain(&mut plane, &mut dev, 1);
        assert_eq!(dev.config().brightness, 180);
    }

    #[test]
    fn test_bad_key_is_rejected_everywhere() {
        let mut plane = plane(Some("sekrit"));
        let mut dev = device();

        for body in [
            r#"{"op":"get"}"#,
            r#"{"op":"get","key":"wrong"}"#,
            r#"{"op":"discover"}"#,
        ] {
            let reply = handle(&mut plane, &mut dev, 0, body).unwrap();
            assert_eq!(reply["op"], "auth");
            assert_eq!(reply["err"], "bad key");
        }

        let reply = handle(&mut plane, &mut dev, 0, r#"{"op":"get","key":"sekrit"}"#).unwrap();
        assert_eq!(reply["ok"], serde_json::json!(true));

        // The plain-text probe stays public.
        let reply = plane
            .handle_datagram(b"RGBDISC?", peer(), Instant::from_millis(0), &mut dev)
            .unwrap();
        assert!(reply.payload.starts_with("RGBDISC! "));
    }

    #[test]
    fn test_quiet_window_coalesces_to_the_last_preview() {
        let mut plane = plane(None);
        let mut dev = device();

        plane.enter_smbus_quiet_us(10_000, Instant::from_millis(0));

        // Three previews inside the window: none parsed, none applied.
        for (at, b) in [(2u64, 10u8), (4, 50), (6, 200)] {
            let body = format!(r#"{{"op":"preview","cfg":{{"brightness":{b}}}}}"#);
            let reply = plane.handle_datagram(
                body.as_bytes(),
                peer(),
                Instant::from_millis(at),
                &mut dev,
            );
            assert!(reply.is_none(), "JSON must be deferred during quiet");
        }
        assert_eq!(dev.config().brightness, 180);

        // Still quiet: the deferred datagram must not be released yet.
        plane.process_pending(PENDING_BUDGET, Instant::from_millis(8), &mut dev);
        assert_eq!(dev.config().brightness, 180);

        // Window over: one dispatch (the last datagram), then one apply.
        let reply = plane
            .process_pending(PENDING_BUDGET, Instant::from_millis(11), &mut dev)
            .expect("deferred datagram yields its reply");
        let json: serde_json::Value = serde_json::from_str(&reply.payload).unwrap();
        assert_eq!(json["op"], "preview");
        assert_eq!(dev.config().brightness, 180);

        plane.process_pending(PENDING_BUDGET, Instant::from_millis(12), &mut dev);
        assert_eq!(dev.config().brightness, 200);
        assert!(plane.pending().is_idle());
    }

    #[test]
    fn test_plain_discovery_is_answered_during_quiet() {
        let mut plane = plane(None);
        let mut dev = device();
        plane.enter_smbus_quiet_us(10_000, Instant::from_millis(0));
        let reply = plane
            .handle_datagram(b"RGBDISC?", peer(), Instant::from_millis(1), &mut dev)
            .unwrap();
        assert!(reply.payload.starts_with("RGBDISC! "));
    }

    #[test]
    fn test_quiet_window_only_extends() {
        let plane = plane(None);
        plane.enter_smbus_quiet_us(10_000, Instant::from_millis(0));
        // A shorter request cannot shrink the active window.
        plane.enter_smbus_quiet_us(1_000, Instant::from_millis(1));
        assert!(plane.quiet().active(Instant::from_millis(9)));
        assert!(!plane.quiet().active(Instant::from_millis(11)));
    }

    #[test]
    fn test_pending_priority_reset_counts_config() {
        let mut plane = plane(None);
        let mut dev = device();

        handle(&mut plane, &mut dev, 0, r#"{"op":"preview","cfg":{"speed":5}}"#);
        handle(&mut plane, &mut dev, 0, r#"{"op":"setCounts","c":[1,2,3,4]}"#);
        handle(&mut plane, &mut dev, 0, r#"{"op":"reset"}"#);

        // One heavy item per call, highest priority first.
        plane.process_pending(PENDING_BUDGET, Instant::from_millis(1), &mut dev);
        assert_eq!(dev.config().count, [50, 50, 50, 50]); // reset ran
        assert_eq!(dev.config().speed, 128);

        plane.process_pending(PENDING_BUDGET, Instant::from_millis(2), &mut dev);
        assert_eq!(dev.config().count, [1, 2, 3, 4]); // counts ran

        plane.process_pending(PENDING_BUDGET, Instant::from_millis(3), &mut dev);
        assert_eq!(dev.config().speed, 5); // config ran last
        assert!(plane.pending().is_idle());
    }

    #[test]
    fn test_rapid_previews_coalesce_without_quiet() {
        let mut plane = plane(None);
        let mut dev = device();
        for b in [10, 50, 200] {
            let body = format!(r#"{{"op":"preview","cfg":{{"brightness":{b}}}}}"#);
            handle(&mut plane, &mut dev, 0, &body);
        }
        plane.process_pending(PENDING_BUDGET, Instant::from_millis(1), &mut dev);
        assert_eq!(dev.config().brightness, 200);
        assert!(plane.pending().is_idle());
    }

    #[test]
    fn test_oversized_and_empty_datagrams_are_dropped() {
        let mut plane = plane(None);
        let mut dev = device();
        let huge = vec![b'{'; 1600];
        assert!(plane
            .handle_datagram(&huge, peer(), Instant::from_millis(0), &mut dev)
            .is_none());
        assert!(plane
            .handle_datagram(b"", peer(), Instant::from_millis(0), &mut dev)
            .is_none());
        assert!(plane
            .handle_datagram(b"   ", peer(), Instant::from_millis(0), &mut dev)
            .is_none());
    }

    #[test]
    fn test_advertiser_fast_burst_then_slow_cadence() {
        let ip = Some(Ipv4Addr::new(10, 0, 0, 5));
        // Seeded with the address the boot broadcast already used: the
        // first poll must not announce again.
        let mut adv = Advertiser::new(Instant::from_millis(0), ip);
        assert!(!adv.should_announce(Instant::from_millis(1), ip));

        // Three fast announces at the 3 s cadence.
        assert!(!adv.should_announce(Instant::from_millis(2_000), ip));
        assert!(adv.should_announce(Instant::from_millis(3_100), ip));
        assert!(adv.should_announce(Instant::from_millis(6_200), ip));
        assert!(adv.should_announce(Instant::from_millis(9_300), ip));
        // Burst spent: the next interval is the slow 15 s one.
        assert!(!adv.should_announce(Instant::from_millis(13_000), ip));
        assert!(adv.should_announce(Instant::from_millis(24_400), ip));
    }

    #[test]
    fn test_advertiser_rearms_on_ip_change() {
        let a = Some(Ipv4Addr::new(10, 0, 0, 5));
        let b = Some(Ipv4Addr::new(10, 0, 0, 9));
        let mut adv = Advertiser::new(Instant::from_millis(0), a);

        // Exhaust the fast burst.
        for t in [3_100u64, 6_200, 9_300] {
            assert!(adv.should_announce(Instant::from_millis(t), a));
        }
        assert!(!adv.should_announce(Instant::from_millis(12_000), a));

        // New address: immediate announce, fast cadence again.
        assert!(adv.should_announce(Instant::from_millis(12_500), b));
        assert!(adv.should_announce(Instant::from_millis(15_600), b));
    }

    #[test]
    fn test_advertiser_stays_quiet_without_a_link() {
        let mut adv = Advertiser::new(Instant::from_millis(0), None);
        for t in [100u64, 10_000, 60_000] {
            assert!(!adv.should_announce(Instant::from_millis(t), None));
        }
        // Association: the first address triggers an immediate announce.
        let ip = Some(Ipv4Addr::new(10, 0, 0, 5));
        assert!(adv.should_announce(Instant::from_millis(61_000), ip));
        assert!(!adv.should_announce(Instant::from_millis(62_000), ip));
    }

    #[test]
    fn test_classification_skips_leading_whitespace() {
        let mut plane = plane(None);
        let mut dev = device();
        let reply = handle(&mut plane, &mut dev, 0, "  \n {\"op\":\"discover\"}").unwrap();
        assert_eq!(reply["op"], "discover");
    }
}
