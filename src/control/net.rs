//! UDP socket pump for the control plane.
//!
//! Owns the one socket everything shares: request/response traffic and
//! the presence broadcast. Non-blocking; drive it from the same
//! cooperative loop as the renderer.

use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

use embassy_time::Instant;

use super::{Advertiser, ControlPlane, Reply, PENDING_BUDGET};
use crate::controller::Controller;
use crate::{ConfigStorage, StripDriver};

pub struct UdpControl {
    socket: UdpSocket,
    control: ControlPlane,
    advert: Advertiser,
    buf: [u8; super::MAX_DATAGRAM],
}

impl UdpControl {
    /// Bind the control socket and send the boot announcement (both the
    /// JSON and the text-prefixed format).
    pub fn bind(control: ControlPlane, now: Instant) -> std::io::Result<Self> {
        let port = control.identity().port;
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port))?;
        socket.set_nonblocking(true)?;
        socket.set_broadcast(true)?;
        log::info!("control listening on udp/{port}");

        let ip = control.identity().ip;
        let this = Self {
            socket,
            control,
            advert: Advertiser::new(now, (!ip.is_unspecified()).then_some(ip)),
            buf: [0; super::MAX_DATAGRAM],
        };
        this.broadcast_discovery();
        Ok(this)
    }

    pub fn control(&self) -> &ControlPlane {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut ControlPlane {
        &mut self.control
    }

    fn send(&self, reply: &Reply) {
        if let Err(err) = self.socket.send_to(reply.payload.as_bytes(), reply.peer) {
            log::debug!("udp send to {} failed: {err}", reply.peer);
        }
    }

    fn broadcast_discovery(&self) {
        let port = self.control.identity().port;
        let target = SocketAddr::from((Ipv4Addr::BROADCAST, port));
        for payload in [
            self.control.identity().discover_json(),
            self.control.identity().discover_text(),
        ] {
            if let Err(err) = self.socket.send_to(payload.as_bytes(), target) {
                log::debug!("discovery broadcast failed: {err}");
                break;
            }
        }
    }

    /// One pump pass: presence cadence, deferred work, inbound datagrams.
    pub fn poll<D, S>(&mut self, now: Instant, controller: &mut Controller<D, S>)
    where
        D: StripDriver,
        S: ConfigStorage,
    {
        let ip = self.control.identity().ip;
        let link_up = !ip.is_unspecified();
        if self.advert.should_announce(now, link_up.then_some(ip)) {
            self.broadcast_discovery();
        }

        if let Some(reply) = self
            .control
            .process_pending(PENDING_BUDGET, now, controller)
        {
            self.send(&reply);
        }

        loop {
            let (len, peer) = match self.socket.recv_from(&mut self.buf) {
                Ok(received) => received,
                Err(err) if err.kind() == ErrorKind::WouldBlock => break,
                Err(err) => {
                    log::debug!("udp recv failed: {err}");
                    break;
                }
            };
            let reply = self
                .control
                .handle_datagram(&self.buf[..len], peer, now, controller);
            if let Some(reply) = reply {
                self.send(&reply);
            }
        }
    }
}
