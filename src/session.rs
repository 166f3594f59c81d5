//! One request/response exchange.
//!
//! A [`Session`] drives exactly one exchange through
//! `Idle -> Sending -> AwaitingResponse -> {Decoded | TimedOut}` and always
//! ends in an [`Outcome`]. It is consumed by [`Session::execute`], so it can
//! never be reused.
//!
//! The transport is acquired from the connector when the exchange starts and
//! dropped when `execute` returns, whichever way it ends.

use std::fmt;
use std::net::SocketAddr;
use std::num::NonZeroU32;

use tokio::time::Instant;
use tracing::{Span, instrument};

use crate::codec::{Codec, ResponsePdu};
use crate::config::ManagerConfig;
use crate::endpoint::Endpoint;
use crate::error::{DecodeErrorKind, Error, Result};
use crate::operation::Operation;
use crate::outcome::{Failure, Outcome};
use crate::transport::{Connector, Transport};
use crate::util::next_request_id;
use crate::varbind::VarBind;

/// Exchange progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Idle,
    Sending,
    AwaitingResponse,
    Decoded,
    TimedOut,
    /// Ended by a connect, encode, I/O or decode failure.
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Sending => "sending",
            Self::AwaitingResponse => "awaiting_response",
            Self::Decoded => "decoded",
            Self::TimedOut => "timed_out",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Single-use SNMPv1 exchange.
pub struct Session<'a, C, K> {
    config: &'a ManagerConfig,
    connector: &'a C,
    codec: &'a K,
    state: SessionState,
}

impl<'a, C: Connector, K: Codec> Session<'a, C, K> {
    /// Create an idle session.
    pub fn new(config: &'a ManagerConfig, connector: &'a C, codec: &'a K) -> Self {
        Self {
            config,
            connector,
            codec,
            state: SessionState::Idle,
        }
    }

    /// Run the exchange to a terminal outcome.
    ///
    /// Never retries: a timeout is a terminal transport failure.
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            snmp.target = %endpoint,
            snmp.kind = %operation.kind(),
            snmp.request_id = tracing::field::Empty,
            snmp.state = tracing::field::Empty,
            snmp.elapsed_ms = tracing::field::Empty,
        )
    )]
    pub async fn execute(mut self, endpoint: &Endpoint, operation: &Operation) -> Outcome {
        let start = Instant::now();
        let request_id = next_request_id();
        Span::current().record("snmp.request_id", request_id);

        let outcome = match self.exchange(endpoint, operation, request_id).await {
            Ok(response) => {
                self.transition(SessionState::Decoded);
                classify(response, operation.varbinds())
            }
            Err(e) => {
                self.transition(if e.is_timeout() {
                    SessionState::TimedOut
                } else {
                    SessionState::Failed
                });
                tracing::debug!(target: "snmpv1_manager::session", error = %e, "exchange failed");
                Outcome::transport(&e)
            }
        };

        Span::current().record("snmp.elapsed_ms", start.elapsed().as_millis() as u64);
        outcome
    }

    async fn exchange(
        &mut self,
        endpoint: &Endpoint,
        operation: &Operation,
        request_id: i32,
    ) -> Result<ResponsePdu> {
        let transport = self.connector.connect(endpoint).await?;

        let data = self.codec.encode(
            &self.config.community,
            operation.kind(),
            request_id,
            operation.varbinds(),
        )?;

        self.transition(SessionState::Sending);
        tracing::trace!(target: "snmpv1_manager::session", { snmp.bytes = data.len() }, "sending request");
        transport.send(&data).await?;

        self.transition(SessionState::AwaitingResponse);
        let response = self.await_response(&transport, request_id).await?;
        check_bindings(&response, operation.varbinds(), transport.peer_addr())?;
        Ok(response)
    }

    /// Wait for the response carrying `request_id`.
    ///
    /// Stray datagrams are discarded; the deadline is fixed when waiting starts.
    async fn await_response<T: Transport>(
        &self,
        transport: &T,
        request_id: i32,
    ) -> Result<ResponsePdu> {
        let target = transport.peer_addr();
        let deadline = Instant::now() + self.config.timeout;
        let timed_out = || {
            Error::Timeout {
                target,
                elapsed: self.config.timeout,
            }
            .boxed()
        };

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timed_out());
            }

            let data = match transport.recv(remaining).await {
                Ok(data) => data,
                Err(e) if e.is_timeout() => return Err(timed_out()),
                Err(e) => return Err(e),
            };
            tracing::trace!(target: "snmpv1_manager::session", { snmp.bytes = data.len() }, "received datagram");

            let response = self.codec.decode(data, target)?;

            if response.request_id != request_id {
                tracing::warn!(
                    target: "snmpv1_manager::session",
                    { expected_request_id = request_id, actual_request_id = response.request_id, peer = %target },
                    "discarding response with mismatched request id"
                );
                continue;
            }

            return Ok(response);
        }
    }

    fn transition(&mut self, next: SessionState) {
        tracing::trace!(target: "snmpv1_manager::session", from = %self.state, to = %next, "state transition");
        self.state = next;
        Span::current().record("snmp.state", tracing::field::display(next));
    }
}

/// Reject a successful reply that does not echo the request OIDs in order.
fn check_bindings(response: &ResponsePdu, request: &[VarBind], target: SocketAddr) -> Result<()> {
    if response.error_status.is_error() {
        return Ok(());
    }

    let kind = if response.varbinds.is_empty() {
        DecodeErrorKind::EmptyResponse
    } else {
        let len = request.len().max(response.varbinds.len());
        let Some(position) = (0..len).find(|&i| {
            response.varbinds.get(i).map(|vb| &vb.oid) != request.get(i).map(|vb| &vb.oid)
        }) else {
            return Ok(());
        };
        DecodeErrorKind::VarbindMismatch { position }
    };

    tracing::debug!(
        target: "snmpv1_manager::session",
        { snmp.target = %target, kind = %kind },
        "response bindings do not match request"
    );
    Err(Error::MalformedResponse { target }.boxed())
}

/// Turn a decoded response into an outcome.
///
/// The 1-based error index is resolved against the response bindings, then
/// the request bindings when the agent sent fewer back. Index 0 or an index
/// past both lists stays unresolved.
fn classify(response: ResponsePdu, request: &[VarBind]) -> Outcome {
    if !response.error_status.is_error() {
        return Outcome::Success(response.varbinds);
    }

    tracing::debug!(
        target: "snmpv1_manager::session",
        { snmp.error_status = %response.error_status, snmp.error_index = response.error_index },
        "agent rejected request"
    );

    let resolved = u32::try_from(response.error_index)
        .ok()
        .and_then(NonZeroU32::new)
        .and_then(|index| {
            let pos = index.get() as usize - 1;
            response
                .varbinds
                .get(pos)
                .or_else(|| request.get(pos))
                .map(|vb| (index, vb.oid.clone()))
        });

    Outcome::Failure(Failure::Protocol {
        status: response.error_status,
        index: resolved.as_ref().map(|(index, _)| *index),
        oid: resolved.map(|(_, oid)| oid),
    })
}
