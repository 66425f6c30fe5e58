//! Presence advertisement cadence.
//!
//! After association the device announces itself to the broadcast
//! address: a short fast burst so fresh clients find it quickly, then a
//! slow keepalive. An IP change re-announces immediately and re-arms the
//! fast burst.

use std::net::Ipv4Addr;

use embassy_time::{Duration, Instant};

const ADVERT_FAST: Duration = Duration::from_secs(3);
const ADVERT_SLOW: Duration = Duration::from_secs(15);
const FAST_BURSTS: u8 = 3;

#[derive(Debug)]
pub struct Advertiser {
    last_sent: Instant,
    fast_left: u8,
    last_ip: Option<Ipv4Addr>,
}

impl Advertiser {
    /// A fresh advertiser considers the boot announcement already sent at
    /// `now` (the control plane broadcasts once on bind). `ip` is the
    /// address that announcement went out with, so the first poll does
    /// not treat it as a change and re-broadcast.
    pub fn new(now: Instant, ip: Option<Ipv4Addr>) -> Self {
        Self {
            last_sent: now,
            fast_left: FAST_BURSTS,
            last_ip: ip,
        }
    }

    /// Decide whether to broadcast now. `ip` is the current local
    /// address, `None` while the link is down.
    pub fn should_announce(&mut self, now: Instant, ip: Option<Ipv4Addr>) -> bool {
        let Some(ip) = ip else {
            return false;
        };

        if self.last_ip != Some(ip) {
            self.last_ip = Some(ip);
            self.fast_left = FAST_BURSTS;
            self.last_sent = now;
            return true;
        }

        let interval = if self.fast_left > 0 {
            ADVERT_FAST
        } else {
            ADVERT_SLOW
        };
        if now.duration_since(self.last_sent) >= interval {
            self.last_sent = now;
            self.fast_left = self.fast_left.saturating_sub(1);
            return true;
        }
        false
    }
}
