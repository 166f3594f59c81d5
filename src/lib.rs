//! # snmpv1-manager
//!
//! Async SNMPv1 manager: GET and SET exchanges over UDP, run one at a time or
//! as concurrent batches.
//!
//! ## Features
//!
//! - SNMPv1 community messages (RFC 1157), BER encoded
//! - One exchange-scoped UDP socket per request
//! - Request id matching with a single per-exchange deadline
//! - Concurrent and sequential batches with per-operation outcomes
//! - Optional retry of timed-out exchanges
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snmpv1_manager::{Endpoint, Manager, Operation, VarBind, oid};
//!
//! #[tokio::main]
//! async fn main() -> snmpv1_manager::Result<()> {
//!     let manager = Manager::builder().build()?;
//!     let agent: Endpoint = "demo.example:161".parse()?;
//!
//!     let set = Operation::set([VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), "A")])?;
//!     let get = Operation::get([oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)])?;
//!
//!     for outcome in manager.run_sequential(&agent, vec![set, get]).await {
//!         println!("{}", outcome);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Outcomes
//!
//! Every operation ends in an [`Outcome`]: the response bindings, an agent
//! rejection naming the offending binding, or a transport failure (timeout,
//! network error, undecodable reply). Batches never stop early.

pub mod ber;
pub mod codec;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod message;
pub mod mib;
pub mod oid;
pub mod operation;
pub mod outcome;
pub mod pdu;
pub mod session;
pub mod transport;
pub mod value;
pub mod varbind;

pub(crate) mod util;

#[cfg(feature = "cli")]
pub mod cli;

pub use codec::{BerCodec, Codec, ResponsePdu};
pub use config::{ManagerBuilder, ManagerConfig};
pub use endpoint::Endpoint;
pub use error::{DecodeErrorKind, EncodeErrorKind, Error, ErrorStatus, Result};
pub use executor::{Batch, BatchOutcome, Completion, ExecutionMode, Executor, Manager};
pub use mib::{MibResolver, SystemMib};
pub use oid::Oid;
pub use operation::{Operation, OperationKind};
pub use outcome::{Failure, Outcome, TransportCause};
pub use pdu::{Pdu, PduType};
pub use session::Session;
pub use transport::{Connector, Transport, UdpConnector, UdpTransport};
pub use value::Value;
pub use varbind::VarBind;
