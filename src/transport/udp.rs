//! UDP transport implementation.

use super::{Connector, Transport};
use crate::endpoint::Endpoint;
use crate::error::{Error, Result, UNKNOWN_TARGET};
use crate::util::bind_ephemeral_udp_socket;
use bytes::Bytes;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// Largest datagram we will read.
const MAX_DATAGRAM: usize = 65535;

/// Opens a fresh connected UDP socket per exchange.
///
/// Host names are resolved on every connect, and only IPv4 addresses are
/// considered.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpConnector;

impl Connector for UdpConnector {
    type Transport = UdpTransport;

    async fn connect(&self, endpoint: &Endpoint) -> Result<UdpTransport> {
        let target = resolve(endpoint).await?;
        UdpTransport::connect(target).await
    }
}

async fn resolve(endpoint: &Endpoint) -> Result<SocketAddr> {
    let addrs = tokio::net::lookup_host((endpoint.host(), endpoint.port()))
        .await
        .map_err(|e| Error::Network {
            target: UNKNOWN_TARGET,
            source: e,
        })?;

    addrs
        .into_iter()
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| {
            Error::Network {
                target: UNKNOWN_TARGET,
                source: io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no IPv4 address for {}", endpoint),
                ),
            }
            .boxed()
        })
}

/// UDP socket connected to a single agent.
///
/// Owned by one session; dropping it closes the socket.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    target: SocketAddr,
    local_addr: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral socket and connect it to `target`.
    ///
    /// A connected socket only delivers datagrams sent from `target`.
    pub async fn connect(target: SocketAddr) -> Result<Self> {
        let network = |source| Error::Network { target, source }.boxed();

        let socket = bind_ephemeral_udp_socket(target).map_err(network)?;
        socket.connect(target).await.map_err(network)?;
        let local_addr = socket.local_addr().map_err(network)?;

        tracing::debug!(
            target: "snmpv1_manager::transport",
            { snmp.target = %target, snmp.local_addr = %local_addr },
            "UDP transport connected"
        );

        Ok(Self {
            socket,
            target,
            local_addr,
        })
    }

    /// Local bind address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Transport for UdpTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        tracing::trace!(
            target: "snmpv1_manager::transport",
            { snmp.target = %self.target, snmp.bytes = data.len() },
            "UDP send"
        );
        self.socket.send(data).await.map_err(|e| {
            Error::Network {
                target: self.target,
                source: e,
            }
            .boxed()
        })?;
        Ok(())
    }

    async fn recv(&self, recv_timeout: Duration) -> Result<Bytes> {
        let mut buf = vec![0u8; MAX_DATAGRAM];

        match timeout(recv_timeout, self.socket.recv(&mut buf)).await {
            Ok(Ok(len)) => {
                buf.truncate(len);
                tracing::trace!(
                    target: "snmpv1_manager::transport",
                    { snmp.target = %self.target, snmp.bytes = len },
                    "UDP recv complete"
                );
                Ok(Bytes::from(buf))
            }
            Ok(Err(e)) => Err(Error::Network {
                target: self.target,
                source: e,
            }
            .boxed()),
            Err(_) => Err(Error::Timeout {
                target: self.target,
                elapsed: recv_timeout,
            }
            .boxed()),
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.target
    }
}

impl Drop for UdpTransport {
    fn drop(&mut self) {
        tracing::debug!(
            target: "snmpv1_manager::transport",
            { snmp.target = %self.target, snmp.local_addr = %self.local_addr },
            "dispatcher closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_recv_roundtrip() {
        let agent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let agent_addr = agent.local_addr().unwrap();

        let transport = UdpTransport::connect(agent_addr).await.unwrap();
        assert_eq!(transport.peer_addr(), agent_addr);
        transport.send(b"ping").await.unwrap();

        let mut buf = [0u8; 16];
        let (len, from) = agent.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"ping");
        agent.send_to(b"pong", from).await.unwrap();

        let reply = transport.recv(Duration::from_secs(1)).await.unwrap();
        assert_eq!(reply.as_ref(), b"pong");
    }

    #[tokio::test]
    async fn test_recv_times_out() {
        let agent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = UdpTransport::connect(agent.local_addr().unwrap())
            .await
            .unwrap();

        let err = transport.recv(Duration::from_millis(20)).await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_connector_resolves_literal() {
        let agent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = agent.local_addr().unwrap().port();
        let endpoint = Endpoint::new("127.0.0.1", port).unwrap();

        let transport = UdpConnector.connect(&endpoint).await.unwrap();
        assert_eq!(transport.peer_addr(), agent.local_addr().unwrap());
    }
}
