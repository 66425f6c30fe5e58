//! Coalesced deferred work and the SMBus quiet window.
//!
//! UDP handlers never run the heavy config apply on the receive path;
//! they park work here. Each kind has a single latest-wins slot, so a
//! burst of previews collapses to the most recent one.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use embassy_time::Instant;

use crate::NUM_CHANNELS;

/// Largest accepted datagram; larger packets are dropped.
pub const MAX_DATAGRAM: usize = 1600;

/// A JSON datagram parked while a quiet window is active.
#[derive(Debug, Clone)]
pub struct DeferredDatagram {
    pub data: heapless::Vec<u8, MAX_DATAGRAM>,
    pub peer: SocketAddr,
}

/// A queued config apply, preview or save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgApply {
    pub json: String,
    pub save: bool,
}

/// One unit of deferred work.
#[derive(Debug, Clone)]
pub enum PendingOp {
    /// Re-dispatch a whole datagram (deferred during a quiet window).
    Raw(DeferredDatagram),
    /// Erase persisted config and restore defaults.
    Reset,
    /// Install new per-channel counts.
    Counts([u16; NUM_CHANNELS]),
    /// Merge-and-apply a config body.
    Config(CfgApply),
}

/// Latest-wins slot per work kind, drained in priority order
/// raw -> reset -> counts -> config.
#[derive(Debug, Default)]
pub struct PendingOps {
    raw: Option<DeferredDatagram>,
    reset: bool,
    counts: Option<[u16; NUM_CHANNELS]>,
    cfg: Option<CfgApply>,
}

impl PendingOps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park one op, overwriting any older op of the same kind.
    pub fn queue(&mut self, op: PendingOp) {
        match op {
            PendingOp::Raw(raw) => self.raw = Some(raw),
            PendingOp::Reset => self.reset = true,
            PendingOp::Counts(c) => self.counts = Some(c),
            PendingOp::Config(cfg) => self.cfg = Some(cfg),
        }
    }

    /// Take the highest-priority queued op. The raw slot is only released
    /// once the quiet window has passed (`raw_ready`).
    pub fn take_next(&mut self, raw_ready: bool) -> Option<PendingOp> {
        if raw_ready {
            if let Some(raw) = self.raw.take() {
                return Some(PendingOp::Raw(raw));
            }
        }
        if self.reset {
            self.reset = false;
            return Some(PendingOp::Reset);
        }
        if let Some(c) = self.counts.take() {
            return Some(PendingOp::Counts(c));
        }
        self.cfg.take().map(PendingOp::Config)
    }

    pub fn is_idle(&self) -> bool {
        self.raw.is_none() && !self.reset && self.counts.is_none() && self.cfg.is_none()
    }
}

/// Quiet window requested by the telemetry bus driver.
///
/// While active, the UDP path must not JSON-parse or apply. Single writer
/// (the bus driver), single reader (the control plane); one monotonic
/// deadline in microseconds is all the shared state needed.
#[derive(Debug, Default)]
pub struct QuietWindow {
    until_us: AtomicU64,
}

impl QuietWindow {
    pub const fn new() -> Self {
        Self {
            until_us: AtomicU64::new(0),
        }
    }

    /// Request quiet for `dur_us` microseconds from `now`. An already
    /// active window is only ever extended, never shortened.
    pub fn enter_us(&self, dur_us: u64, now: Instant) {
        let deadline = now.as_micros().saturating_add(dur_us);
        self.until_us.fetch_max(deadline, Ordering::Relaxed);
    }

    pub fn active(&self, now: Instant) -> bool {
        now.as_micros() < self.until_us.load(Ordering::Relaxed)
    }
}
