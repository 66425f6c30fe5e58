mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use embassy_time::Instant;
    use rgbctrl::http;
    use rgbctrl::test_utils::{CaptureDriver, MemStorage};
    use rgbctrl::{ConfigStorage, Controller, StorageError};

    #[derive(Clone, Default)]
    struct SharedStorage(Rc<RefCell<MemStorage>>);

    impl ConfigStorage for SharedStorage {
        fn load(&mut self) -> Option<String> {
            self.0.borrow_mut().load()
        }
        fn store(&mut self, json: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().store(json)
        }
        fn erase(&mut self) -> Result<(), StorageError> {
            self.0.borrow_mut().erase()
        }
    }

    fn device() -> Controller<CaptureDriver, SharedStorage> {
        Controller::new(
            CaptureDriver::new(),
            SharedStorage::default(),
            Instant::from_millis(0),
        )
    }

    #[test]
    fn test_index_page_embeds_the_saved_config() {
        let mut dev = device();
        let page = http::index_page(&mut dev, "/config", Instant::from_millis(1));
        assert_eq!(page.status, 200);
        assert_eq!(page.content_type, "text/html");
        assert!(page.body.contains("\"brightness\":180"));
        assert!(page.body.contains(rgbctrl::BUILD_VERSION));
        assert!(page.body.contains(rgbctrl::COPYRIGHT));
        assert!(page.body.contains("const BASE='/config'"));
        // No placeholder left behind.
        assert!(!page.body.contains("%%"));
    }

    #[test]
    fn test_config_endpoint_reflects_the_saved_state() {
        let mut dev = device();
        // A preview is live but not saved; the API reports saved state.
        http::preview(&mut dev, r#"{"brightness":7}"#, Instant::from_millis(1));
        let resp = http::config_json(&mut dev, Instant::from_millis(2));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type, "application/json");
        let json: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(json["brightness"], 180);
    }

    #[test]
    fn test_preview_applies_without_persisting() {
        let mut dev = device();
        let resp = http::preview(&mut dev, r#"{"brightness":7}"#, Instant::from_millis(1));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, "{\"ok\":true}");
        assert_eq!(dev.config().brightness, 7);
        assert!(dev.in_preview());
    }

    #[test]
    fn test_save_persists() {
        let mut dev = device();
        let resp = http::save(&mut dev, r#"{"brightness":7}"#, Instant::from_millis(1));
        assert_eq!(resp.status, 200);
        let resp = http::config_json(&mut dev, Instant::from_millis(2));
        let json: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(json["brightness"], 7);
    }

    #[test]
    fn test_bad_json_yields_400() {
        let mut dev = device();
        let resp = http::preview(&mut dev, "{oops", Instant::from_millis(1));
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body, "Bad JSON");
        let resp = http::save(&mut dev, "[]", Instant::from_millis(1));
        assert_eq!(resp.status, 400);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut dev = device();
        http::save(&mut dev, r#"{"brightness":7,"mode":0}"#, Instant::from_millis(1));
        let resp = http::reset(&mut dev, Instant::from_millis(2));
        assert_eq!(resp.status, 200);
        assert_eq!(dev.config().brightness, 180);
        let resp = http::config_json(&mut dev, Instant::from_millis(3));
        let json: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(json["brightness"], 180);
        assert_eq!(json["mode"], 4);
    }

    #[test]
    fn test_cache_policy_is_no_store() {
        assert_eq!(http::CACHE_CONTROL, "no-store");
    }
}
