//! In-process SNMPv1 agent for testing.
//!
//! Serves GET and SET from a `BTreeMap<Oid, Value>` on an ephemeral localhost
//! UDP port and shuts down cleanly on drop.

use crate::common::fixtures;

use bytes::Bytes;
use snmpv1_manager::message::CommunityMessage;
use snmpv1_manager::pdu::{Pdu, PduType};
use snmpv1_manager::{ErrorStatus, Oid, Value, VarBind};
use std::collections::{BTreeMap, BTreeSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How the agent answers a well-formed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Reply immediately.
    Normal,
    /// Reply after a fixed delay. Requests are handled concurrently.
    Delay(Duration),
    /// Never reply.
    Silent,
    /// Reply with bytes that are not an SNMP message.
    Garbage,
    /// Send a reply with the wrong request id before the real one.
    StrayFirst,
}

struct AgentState {
    data: BTreeMap<Oid, Value>,
    read_only: BTreeSet<Oid>,
}

/// An in-process SNMPv1 agent.
///
/// # Example
///
/// ```ignore
/// let agent = TestAgent::new().await;
/// let manager = Manager::builder().build()?;
/// let outcome = manager.get(&agent.endpoint(), [sys_name()]).await?;
/// // Agent automatically stops when dropped
/// ```
pub struct TestAgent {
    addr: SocketAddr,
    state: Arc<Mutex<AgentState>>,
    requests: Arc<AtomicUsize>,
    cancel: CancellationToken,
    _task: JoinHandle<()>,
}

impl TestAgent {
    /// Create an agent with default system MIB data.
    pub async fn new() -> Self {
        TestAgentBuilder::new().build().await
    }

    /// Create an agent with default data and the given behavior.
    pub async fn with_behavior(behavior: Behavior) -> Self {
        TestAgentBuilder::new().behavior(behavior).build().await
    }

    pub fn builder() -> TestAgentBuilder {
        TestAgentBuilder::new()
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The agent address as a manager endpoint.
    pub fn endpoint(&self) -> snmpv1_manager::Endpoint {
        snmpv1_manager::Endpoint::new(self.addr.ip().to_string(), self.addr.port())
            .expect("localhost endpoint")
    }

    /// Current value of an object.
    pub fn get(&self, oid: &Oid) -> Option<Value> {
        self.state.lock().unwrap().data.get(oid).cloned()
    }

    /// Number of datagrams received, including ones not answered.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for TestAgent {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Builder for [`TestAgent`].
pub struct TestAgentBuilder {
    data: BTreeMap<Oid, Value>,
    read_only: BTreeSet<Oid>,
    community: Bytes,
    behavior: Behavior,
}

impl TestAgentBuilder {
    pub fn new() -> Self {
        Self {
            data: fixtures::system_mib(),
            read_only: fixtures::read_only_objects(),
            community: Bytes::from_static(b"public"),
            behavior: Behavior::Normal,
        }
    }

    pub fn data(mut self, data: BTreeMap<Oid, Value>) -> Self {
        self.data = data;
        self
    }

    pub fn community(mut self, community: &[u8]) -> Self {
        self.community = Bytes::copy_from_slice(community);
        self
    }

    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub async fn build(self) -> TestAgent {
        let socket = UdpSocket::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test agent");
        let addr = socket.local_addr().expect("local addr");
        let socket = Arc::new(socket);

        let state = Arc::new(Mutex::new(AgentState {
            data: self.data,
            read_only: self.read_only,
        }));
        let requests = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();

        let task = tokio::spawn(serve(
            socket,
            state.clone(),
            requests.clone(),
            self.community,
            self.behavior,
            cancel.clone(),
        ));

        TestAgent {
            addr,
            state,
            requests,
            cancel,
            _task: task,
        }
    }
}

async fn serve(
    socket: Arc<UdpSocket>,
    state: Arc<Mutex<AgentState>>,
    requests: Arc<AtomicUsize>,
    community: Bytes,
    behavior: Behavior,
    cancel: CancellationToken,
) {
    let mut buf = vec![0u8; 65535];
    loop {
        let (len, peer) = tokio::select! {
            _ = cancel.cancelled() => return,
            received = socket.recv_from(&mut buf) => match received {
                Ok(received) => received,
                Err(_) => continue,
            },
        };
        requests.fetch_add(1, Ordering::SeqCst);

        let Ok(request) = CommunityMessage::decode(Bytes::copy_from_slice(&buf[..len])) else {
            continue;
        };
        // SNMPv1 agents drop requests with an unknown community
        if request.community != community {
            continue;
        }

        let response = {
            let mut state = state.lock().unwrap();
            handle(&mut state, &request.pdu)
        };
        let Some(response) = response else {
            continue;
        };
        let reply = CommunityMessage::new(community.clone(), response.clone()).encode();

        match behavior {
            Behavior::Normal => {
                let _ = socket.send_to(&reply, peer).await;
            }
            Behavior::Delay(delay) => {
                let socket = socket.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = socket.send_to(&reply, peer).await;
                });
            }
            Behavior::Silent => {}
            Behavior::Garbage => {
                let _ = socket.send_to(b"definitely not BER", peer).await;
            }
            Behavior::StrayFirst => {
                let mut stray = response;
                stray.request_id = stray.request_id.wrapping_add(1);
                stray.varbinds = Vec::new();
                let stray = CommunityMessage::new(community.clone(), stray).encode();
                let _ = socket.send_to(&stray, peer).await;
                let _ = socket.send_to(&reply, peer).await;
            }
        }
    }
}

/// Build the GetResponse for a request, or `None` for PDUs an agent ignores.
fn handle(state: &mut AgentState, request: &Pdu) -> Option<Pdu> {
    let id = request.request_id;
    let reject = |status: ErrorStatus, position: usize| {
        Pdu::response(id, status, position as i32 + 1, request.varbinds.clone())
    };

    match request.pdu_type {
        PduType::GetRequest => {
            let mut varbinds = Vec::with_capacity(request.varbinds.len());
            for (i, vb) in request.varbinds.iter().enumerate() {
                match state.data.get(&vb.oid) {
                    Some(value) => varbinds.push(VarBind::new(vb.oid.clone(), value.clone())),
                    None => return Some(reject(ErrorStatus::NoSuchName, i)),
                }
            }
            Some(Pdu::response(id, ErrorStatus::NoError, 0, varbinds))
        }
        PduType::SetRequest => {
            // all bindings are checked before any is applied
            for (i, vb) in request.varbinds.iter().enumerate() {
                let Some(current) = state.data.get(&vb.oid) else {
                    return Some(reject(ErrorStatus::NoSuchName, i));
                };
                if state.read_only.contains(&vb.oid) {
                    return Some(reject(ErrorStatus::ReadOnly, i));
                }
                if std::mem::discriminant(current) != std::mem::discriminant(&vb.value) {
                    return Some(reject(ErrorStatus::BadValue, i));
                }
            }
            for vb in &request.varbinds {
                state.data.insert(vb.oid.clone(), vb.value.clone());
            }
            Some(Pdu::response(
                id,
                ErrorStatus::NoError,
                0,
                request.varbinds.clone(),
            ))
        }
        _ => None,
    }
}
