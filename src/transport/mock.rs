//! Mock transport for testing.
//!
//! Provides a programmable connector that can simulate replies, stray
//! datagrams, timeouts and I/O errors without a network, and counts how many
//! transports were opened and released.

use super::{Connector, Transport};
use crate::endpoint::Endpoint;
use crate::error::{Error, ErrorStatus, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::Pdu;
use crate::value::Value;
use crate::varbind::VarBind;
use bytes::Bytes;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A mock response to return for a request.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this data with its request id patched to the last request sent
    Data(Bytes),
    /// Return this data as-is
    RawData(Bytes),
    /// Simulate a timeout
    Timeout,
    /// Simulate an IO error
    IoError(String),
}

/// A recorded request sent through a mock transport.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    /// The raw request data
    pub data: Bytes,
    /// The request ID extracted from the message (if possible)
    pub request_id: Option<i32>,
}

struct MockState {
    target: SocketAddr,
    responses: VecDeque<MockResponse>,
    requests: Vec<RecordedRequest>,
    connect_errors: usize,
    opened: usize,
    released: usize,
    last_request_id: Option<i32>,
}

/// Mock connector for testing sessions and executors.
///
/// Responses are queued on the connector and consumed by whichever
/// transport receives next.
///
/// # Example
///
/// Requires the `testing` feature.
///
/// ```rust,ignore
/// use snmpv1_manager::transport::{MockConnector, ResponseBuilder};
/// use snmpv1_manager::{Value, oid};
///
/// let mock = MockConnector::new("127.0.0.1:161".parse().unwrap());
/// mock.queue_response(
///     ResponseBuilder::new(0)
///         .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("test-agent"))
///         .build(b"public"),
/// );
/// mock.queue_timeout();
/// ```
#[derive(Clone)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    /// Create a new mock connector whose transports report `target` as peer.
    pub fn new(target: SocketAddr) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                target,
                responses: VecDeque::new(),
                requests: Vec::new(),
                connect_errors: 0,
                opened: 0,
                released: 0,
                last_request_id: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        lock(&self.state)
    }

    /// Queue a reply whose request id is patched to match the request.
    pub fn queue_response(&self, data: impl Into<Bytes>) {
        self.lock().responses.push_back(MockResponse::Data(data.into()));
    }

    /// Queue a reply returned exactly as given.
    pub fn queue_raw_response(&self, data: impl Into<Bytes>) {
        self.lock()
            .responses
            .push_back(MockResponse::RawData(data.into()));
    }

    /// Queue a timeout.
    pub fn queue_timeout(&self) {
        self.lock().responses.push_back(MockResponse::Timeout);
    }

    /// Queue an IO error.
    pub fn queue_io_error(&self, msg: impl Into<String>) {
        self.lock()
            .responses
            .push_back(MockResponse::IoError(msg.into()));
    }

    /// Make the next `count` connects fail.
    pub fn fail_connects(&self, count: usize) {
        self.lock().connect_errors += count;
    }

    /// All requests sent so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Number of transports handed out.
    pub fn opened(&self) -> usize {
        self.lock().opened
    }

    /// Number of transports dropped.
    pub fn released(&self) -> usize {
        self.lock().released
    }

    /// Number of queued responses remaining.
    pub fn queued_response_count(&self) -> usize {
        self.lock().responses.len()
    }
}

impl Connector for MockConnector {
    type Transport = MockTransport;

    async fn connect(&self, _endpoint: &Endpoint) -> Result<MockTransport> {
        let mut state = self.lock();
        if state.connect_errors > 0 {
            state.connect_errors -= 1;
            return Err(Error::Network {
                target: state.target,
                source: std::io::Error::other("mock connect failure"),
            }
            .boxed());
        }
        state.opened += 1;
        Ok(MockTransport {
            state: self.state.clone(),
            target: state.target,
        })
    }
}

/// Transport handed out by [`MockConnector`].
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    target: SocketAddr,
}

impl Transport for MockTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        let data = Bytes::copy_from_slice(data);
        let request_id = CommunityMessage::decode(data.clone())
            .ok()
            .map(|msg| msg.pdu.request_id);

        let mut state = lock(&self.state);
        state.requests.push(RecordedRequest { data, request_id });
        state.last_request_id = request_id;
        Ok(())
    }

    async fn recv(&self, timeout: Duration) -> Result<Bytes> {
        let (response, last_request_id) = {
            let mut state = lock(&self.state);
            (state.responses.pop_front(), state.last_request_id)
        };

        match response {
            Some(MockResponse::Data(data)) => Ok(match last_request_id {
                Some(id) => patch_request_id(data, id),
                None => data,
            }),
            Some(MockResponse::RawData(data)) => Ok(data),
            Some(MockResponse::IoError(msg)) => Err(Error::Network {
                target: self.target,
                source: std::io::Error::other(msg),
            }
            .boxed()),
            Some(MockResponse::Timeout) | None => Err(Error::Timeout {
                target: self.target,
                elapsed: timeout,
            }
            .boxed()),
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.target
    }
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        lock(&self.state).released += 1;
    }
}

// A panicking test must not poison every later assertion on the counters.
fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn patch_request_id(data: Bytes, request_id: i32) -> Bytes {
    match CommunityMessage::decode(data.clone()) {
        Ok(mut msg) => {
            msg.pdu.request_id = request_id;
            msg.encode()
        }
        Err(_) => data,
    }
}

/// Builder for SNMPv1 GetResponse messages.
pub struct ResponseBuilder {
    request_id: i32,
    varbinds: Vec<VarBind>,
    error_status: ErrorStatus,
    error_index: i32,
}

impl ResponseBuilder {
    /// Create a new response builder with the given request ID.
    pub fn new(request_id: i32) -> Self {
        Self {
            request_id,
            varbinds: Vec::new(),
            error_status: ErrorStatus::NoError,
            error_index: 0,
        }
    }

    /// Add a varbind to the response.
    pub fn varbind(mut self, oid: Oid, value: Value) -> Self {
        self.varbinds.push(VarBind::new(oid, value));
        self
    }

    /// Set the error status.
    pub fn error_status(mut self, status: ErrorStatus) -> Self {
        self.error_status = status;
        self
    }

    /// Set the error index.
    pub fn error_index(mut self, index: i32) -> Self {
        self.error_index = index;
        self
    }

    /// Build the encoded message.
    pub fn build(self, community: &[u8]) -> Bytes {
        let pdu = Pdu::response(
            self.request_id,
            self.error_status,
            self.error_index,
            self.varbinds,
        );
        CommunityMessage::new(Bytes::copy_from_slice(community), pdu).encode()
    }
}
