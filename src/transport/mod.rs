//! Transport layer abstraction.
//!
//! A [`Connector`] acquires one [`Transport`] per exchange. The transport is
//! owned by the session for that exchange only and released when dropped, so
//! concurrent sessions never share a socket.

mod udp;

#[cfg(any(test, feature = "testing"))]
mod mock;

pub use udp::*;

#[cfg(any(test, feature = "testing"))]
pub use mock::*;

use crate::endpoint::Endpoint;
use crate::error::Result;
use bytes::Bytes;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

/// Datagram channel to one agent for the duration of one exchange.
pub trait Transport: Send + Sync {
    /// Send one request datagram.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Wait up to `timeout` for the next datagram from the agent.
    ///
    /// Expiry is reported as [`Error::Timeout`](crate::Error::Timeout).
    fn recv(&self, timeout: Duration) -> impl Future<Output = Result<Bytes>> + Send;

    /// The agent address this transport talks to.
    fn peer_addr(&self) -> SocketAddr;
}

/// Factory for exchange-scoped transports.
pub trait Connector: Send + Sync {
    type Transport: Transport;

    /// Resolve `endpoint` and open a transport to it.
    fn connect(&self, endpoint: &Endpoint) -> impl Future<Output = Result<Self::Transport>> + Send;
}
