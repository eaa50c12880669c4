//! Connection gateway.
//!
//! Binds the relay handlers to the host transport once per process. The
//! WebSocket route only accepts upgrades after the relay has been attached.

use std::{
    net::SocketAddr,
    sync::{Arc, OnceLock},
};

use thiserror::Error;

use super::state::RelayState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The host has not bound its listener yet
    #[error("host transport is not ready")]
    NotReady,
}

/// Outcome of a successful attach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachStatus {
    Attached,
    AlreadyAttached,
}

pub struct Gateway {
    relay: Arc<RelayState>,
    host_addr: OnceLock<SocketAddr>,
    attached: OnceLock<Arc<RelayState>>,
}

impl Gateway {
    pub fn new(relay: Arc<RelayState>) -> Self {
        Self {
            relay,
            host_addr: OnceLock::new(),
            attached: OnceLock::new(),
        }
    }

    /// Record the address the host listener is bound to.
    pub fn expose_host(&self, addr: SocketAddr) {
        if self.host_addr.set(addr).is_err() {
            tracing::debug!("Host address already exposed, ignoring {}", addr);
        }
    }

    pub fn host_addr(&self) -> Option<SocketAddr> {
        self.host_addr.get().copied()
    }

    /// Attach the relay handlers to the host transport.
    ///
    /// Only the first successful call binds anything; later calls report
    /// `AlreadyAttached`. Fails with `NotReady` while the host is unbound.
    /// `Server::serve` exposes the host before it routes any request, so a
    /// running server only sees `NotReady` from callers outside the router.
    pub fn attach(&self) -> Result<AttachStatus, GatewayError> {
        let Some(addr) = self.host_addr() else {
            return Err(GatewayError::NotReady);
        };

        let mut status = AttachStatus::AlreadyAttached;
        self.attached.get_or_init(|| {
            status = AttachStatus::Attached;
            self.relay.clone()
        });

        if status == AttachStatus::Attached {
            tracing::info!("Relay attached to ws://{}/api/socket.io", addr);
        }
        Ok(status)
    }

    /// The attached relay, if any.
    pub fn relay(&self) -> Option<Arc<RelayState>> {
        self.attached.get().cloned()
    }
}
