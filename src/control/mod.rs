//! UDP control protocol: classification, dispatch, reply envelopes.
//!
//! A single port carries JSON request/response operations, a plain-text
//! discovery fallback and the periodic presence broadcast. The handlers
//! here are transport-free (bytes in, replies out); `net` owns the
//! socket.
//!
//! Heavy work (config applies, counts, reset) is never performed on the
//! receive path: handlers park it in [`PendingOps`] and the frame loop
//! drains it through [`ControlPlane::process_pending`].

mod advert;
mod net;
mod pending;

pub use advert::Advertiser;
pub use net::UdpControl;
pub use pending::{CfgApply, DeferredDatagram, PendingOp, PendingOps, QuietWindow, MAX_DATAGRAM};

use std::net::{Ipv4Addr, SocketAddr};

use embassy_time::{Duration, Instant};
use serde_json::{json, Value};

use crate::controller::Controller;
use crate::{ConfigStorage, StripDriver};

/// Protocol-level version tag carried in discover replies. Free-form,
/// informational only; distinct from [`crate::BUILD_VERSION`].
pub const PROTO_VERSION: &str = "1.4.x";

/// Device name announced in discover replies.
pub const DEVICE_NAME: &str = "XBOX RGB";

/// Default UDP control port.
pub const DEFAULT_PORT: u16 = 7777;

/// Per-call budget for [`ControlPlane::process_pending`].
pub const PENDING_BUDGET: Duration = Duration::from_micros(1500);

/// Plain-text discovery probe and reply prefix.
const DISCOVER_PROBE: &str = "RGBDISC?";
const DISCOVER_PREFIX: &str = "RGBDISC! ";

/// Identity advertised to clients.
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    pub port: u16,
    pub ip: Ipv4Addr,
    pub mac: [u8; 6],
}

impl DeviceIdentity {
    pub fn new(port: u16, ip: Ipv4Addr, mac: [u8; 6]) -> Self {
        Self { port, ip, mac }
    }

    pub fn mac_string(&self) -> String {
        let m = self.mac;
        format!(
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }

    /// The discover JSON sent in replies and presence broadcasts.
    pub fn discover_json(&self) -> String {
        json!({
            "ok": true,
            "op": "discover",
            "name": DEVICE_NAME,
            "ver": PROTO_VERSION,
            "port": self.port,
            "ip": self.ip.to_string(),
            "mac": self.mac_string(),
        })
        .to_string()
    }

    /// The text-prefixed variant for very simple listeners.
    pub fn discover_text(&self) -> String {
        format!("{DISCOVER_PREFIX}{}", self.discover_json())
    }
}

/// An outbound datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub peer: SocketAddr,
    pub payload: String,
}

fn reply_ok(peer: SocketAddr, op: &str) -> Reply {
    Reply {
        peer,
        payload: json!({"ok": true, "op": op}).to_string(),
    }
}

fn reply_err(peer: SocketAddr, op: &str, err: &str) -> Reply {
    Reply {
        peer,
        payload: json!({"ok": false, "op": op, "err": err}).to_string(),
    }
}

/// Protocol state: authentication, identity, pending work, quiet window.
pub struct ControlPlane {
    identity: DeviceIdentity,
    psk: Option<String>,
    pending: PendingOps,
    quiet: QuietWindow,
}

impl ControlPlane {
    /// `psk`: optional shared secret. When set, every JSON operation
    /// (discover included) must carry a matching `"key"`; the plain-text
    /// discovery path stays public.
    pub fn new(identity: DeviceIdentity, psk: Option<String>) -> Self {
        Self {
            identity,
            psk: psk.filter(|k| !k.is_empty()),
            pending: PendingOps::new(),
            quiet: QuietWindow::new(),
        }
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn identity_mut(&mut self) -> &mut DeviceIdentity {
        &mut self.identity
    }

    /// Entry point for the telemetry bus driver: keep the control plane
    /// away from heavy JSON work for `dur_us` microseconds.
    pub fn enter_smbus_quiet_us(&self, dur_us: u64, now: Instant) {
        self.quiet.enter_us(dur_us, now);
    }

    pub fn quiet(&self) -> &QuietWindow {
        &self.quiet
    }

    pub fn pending(&self) -> &PendingOps {
        &self.pending
    }

    /// Classify and handle one inbound datagram.
    ///
    /// Plain-text discovery is always answered immediately. JSON frames
    /// arriving during a quiet window are parked whole (latest wins) and
    /// handled by `process_pending` once the window closes.
    pub fn handle_datagram<D, S>(
        &mut self,
        data: &[u8],
        peer: SocketAddr,
        now: Instant,
        controller: &mut Controller<D, S>,
    ) -> Option<Reply>
    where
        D: StripDriver,
        S: ConfigStorage,
    {
        if data.is_empty() || data.len() >= MAX_DATAGRAM {
            return None;
        }

        let first = data.iter().copied().find(|b| !b.is_ascii_whitespace())?;
        if first != b'{' {
            return Some(self.handle_plain(data, peer));
        }

        if self.quiet.active(now) {
            let mut buf = heapless::Vec::new();
            // Length checked above; the copy cannot fail.
            let _ = buf.extend_from_slice(data);
            self.pending
                .queue(PendingOp::Raw(DeferredDatagram { data: buf, peer }));
            return None;
        }

        Some(self.dispatch_json(data, peer, controller))
    }

    fn handle_plain(&self, data: &[u8], peer: SocketAddr) -> Reply {
        let text = core::str::from_utf8(data).unwrap_or("");
        if text.trim_end_matches(['\r', '\n']) == DISCOVER_PROBE {
            Reply {
                peer,
                payload: self.identity.discover_text(),
            }
        } else {
            reply_err(peer, "raw", "unknown text")
        }
    }

    fn key_ok(&self, root: &Value) -> bool {
        let Some(psk) = &self.psk else {
            return true;
        };
        root.get("key").and_then(Value::as_str) == Some(psk.as_str())
    }

    fn dispatch_json<D, S>(
        &mut self,
        data: &[u8],
        peer: SocketAddr,
        controller: &mut Controller<D, S>,
    ) -> Reply
    where
        D: StripDriver,
        S: ConfigStorage,
    {
        let Ok(root) = serde_json::from_slice::<Value>(data) else {
            return reply_err(peer, "parse", "bad json");
        };
        if !self.key_ok(&root) {
            return reply_err(peer, "auth", "bad key");
        }
        let Some(op) = root.get("op").and_then(Value::as_str).filter(|s| !s.is_empty())
        else {
            return reply_err(peer, "op", "missing op");
        };

        match op {
            "discover" => Reply {
                peer,
                payload: self.identity.discover_json(),
            },
            "get" => Reply {
                peer,
                payload: format!(
                    "{{\"ok\":true,\"op\":\"get\",\"cfg\":{}}}",
                    controller.config_json()
                ),
            },
            "preview" | "save" => {
                // Normalize: the config body is `cfg` when present,
                // otherwise the whole request (extra keys are ignored by
                // the merge). Applied later, off the receive path.
                let cfg = root.get("cfg").unwrap_or(&root);
                self.pending.queue(PendingOp::Config(CfgApply {
                    json: cfg.to_string(),
                    save: op == "save",
                }));
                reply_ok(peer, op)
            }
            "reset" => {
                self.pending.queue(PendingOp::Reset);
                reply_ok(peer, "reset")
            }
            "setCounts" => match parse_counts(&root) {
                Some(counts) => {
                    self.pending.queue(PendingOp::Counts(counts));
                    reply_ok(peer, "setCounts")
                }
                None => reply_err(peer, "setCounts", "need 4 ints"),
            },
            _ => reply_err(peer, "op", "unknown op"),
        }
    }

    /// Drain one pending heavy op, in priority order raw -> reset ->
    /// counts -> config. At most one heavy item per invocation; `budget`
    /// is the intended share of the frame interval and overruns are
    /// reported at debug level.
    pub fn process_pending<D, S>(
        &mut self,
        budget: Duration,
        now: Instant,
        controller: &mut Controller<D, S>,
    ) -> Option<Reply>
    where
        D: StripDriver,
        S: ConfigStorage,
    {
        let raw_ready = !self.quiet.active(now);
        let op = self.pending.take_next(raw_ready)?;
        let started = Instant::now();

        let reply = match op {
            PendingOp::Raw(raw) => Some(self.dispatch_json(&raw.data, raw.peer, controller)),
            PendingOp::Reset => {
                controller.reset_to_defaults(now);
                None
            }
            PendingOp::Counts(counts) => {
                controller.set_counts(counts, now);
                None
            }
            PendingOp::Config(cfg) => {
                let result = if cfg.save {
                    controller.apply_json_save(&cfg.json, now)
                } else {
                    controller.apply_json_preview(&cfg.json, now)
                };
                if let Err(err) = result {
                    // The client already got its ok; nothing to send.
                    log::debug!("deferred config apply failed: {err}");
                }
                None
            }
        };

        let elapsed = started.elapsed();
        if elapsed > budget {
            log::debug!("pending op overran budget: {}us", elapsed.as_micros());
        }
        reply
    }
}

fn parse_counts(root: &Value) -> Option<[u16; crate::NUM_CHANNELS]> {
    let arr = root.get("c")?.as_array()?;
    if arr.len() < crate::NUM_CHANNELS {
        return None;
    }
    let mut counts = [0u16; crate::NUM_CHANNELS];
    for (slot, v) in counts.iter_mut().zip(arr.iter()) {
        *slot = v.as_i64().unwrap_or(0).clamp(0, u16::MAX as i64) as u16;
    }
    Some(counts)
}
