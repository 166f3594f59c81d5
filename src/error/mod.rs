//! Error types for snmpv1-manager.
//!
//! This module provides:
//!
//! - [`Error`] - The main error type for codec, transport and validation failures
//! - [`ErrorStatus`] - SNMPv1 protocol errors returned by agents (RFC 1157)
//!
//! Errors are boxed for efficiency: `Result<T> = Result<T, Box<Error>>`.
//!
//! Note that [`Session`](crate::session::Session) and
//! [`Executor`](crate::executor::Executor) never return these errors for a
//! completed exchange. They are folded into an
//! [`Outcome`](crate::outcome::Outcome) instead. `Error` surfaces directly only
//! from constructors (validation) and from the collaborator traits.
//!
//! ```rust
//! use snmpv1_manager::{Error, Result};
//!
//! fn handle_error(result: Result<()>) {
//!     match result {
//!         Ok(()) => println!("Success"),
//!         Err(e) => match &*e {
//!             Error::Timeout { target, .. } => println!("{} did not answer", target),
//!             Error::Validation(reason) => println!("rejected: {}", reason),
//!             _ => println!("Error: {}", e),
//!         },
//!     }
//! }
//! ```

pub(crate) mod internal;

use std::net::SocketAddr;
use std::time::Duration;

pub use internal::{DecodeErrorKind, EncodeErrorKind};

/// Placeholder target address used when no target is known.
///
/// Used in error contexts where the peer cannot be determined, such as
/// BER decoding of a buffer that has not been tied to a socket.
pub(crate) const UNKNOWN_TARGET: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)), 0);

// Pattern for converting detailed internal errors to simplified public errors:
//
// tracing::debug!(
//     target: "snmpv1_manager::ber",
//     { snmp.offset = 42, kind = %DecodeErrorKind::ZeroLengthInteger },
//     "decode error"
// );
// return Err(Error::MalformedResponse { target }.boxed());

/// Result type alias using the library's boxed Error type.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// The main error type for snmpv1-manager.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Network failure (bind, resolve, send or receive).
    #[error("network error communicating with {target}: {source}")]
    Network {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// No response arrived before the request deadline.
    #[error("request timed out after {elapsed:?} waiting for {target}")]
    Timeout {
        target: SocketAddr,
        elapsed: Duration,
    },

    /// Response could not be decoded as an SNMPv1 GetResponse.
    #[error("malformed response from {target}")]
    MalformedResponse { target: SocketAddr },

    /// Request could not be encoded.
    #[error("encode error: {kind}")]
    Encode { kind: EncodeErrorKind },

    /// Caller input rejected before any network I/O.
    #[error("validation error: {0}")]
    Validation(Box<str>),

    /// Invalid OID format.
    #[error("invalid OID: {0}")]
    InvalidOid(Box<str>),

    /// Symbolic MIB name that the resolver does not know.
    #[error("unknown MIB object {module}::{symbol}")]
    UnknownObject { module: Box<str>, symbol: Box<str> },
}

impl Error {
    /// Box this error (convenience for constructing boxed errors).
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub(crate) fn validation(reason: impl Into<Box<str>>) -> Box<Self> {
        Box::new(Error::Validation(reason.into()))
    }

    /// Whether this error is a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

/// SNMPv1 error status codes (RFC 1157 Section 4.1.1).
///
/// Carried by a GetResponse-PDU. A non-zero status means the agent rejected the
/// whole request; the accompanying error index names the offending binding.
///
/// # Example
///
/// ```
/// use snmpv1_manager::ErrorStatus;
///
/// let status = ErrorStatus::from_i32(2);
/// assert_eq!(status, ErrorStatus::NoSuchName);
/// assert_eq!(status.as_i32(), 2);
/// assert_eq!(status.to_string(), "noSuchName");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    /// Operation completed successfully (status = 0).
    NoError,
    /// Response would not fit in a single message (status = 1).
    TooBig,
    /// Requested object not found or not accessible (status = 2).
    NoSuchName,
    /// Value in a SET has the wrong type, length or content (status = 3).
    BadValue,
    /// SET attempted on a read-only object (status = 4).
    ReadOnly,
    /// Any other agent-side failure (status = 5).
    GenErr,
    /// Status code outside the SNMPv1 range.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            other => {
                tracing::warn!(target: "snmpv1_manager::error", { snmp.error_status = other }, "unknown SNMP error status");
                Self::Unknown(other)
            }
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::Unknown(code) => *code,
        }
    }

    /// Whether this status reports a failure.
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::NoError)
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size_budget() {
        assert!(
            std::mem::size_of::<Error>() <= 64,
            "Error size {} exceeds 64-byte budget",
            std::mem::size_of::<Error>()
        );

        // Result<(), Box<Error>> should be pointer-sized (8 bytes on 64-bit).
        assert_eq!(
            std::mem::size_of::<Result<()>>(),
            std::mem::size_of::<*const ()>(),
            "Result<()> should be pointer-sized"
        );
    }

    #[test]
    fn status_codes_roundtrip_through_i32() {
        for code in 0..=5 {
            assert_eq!(ErrorStatus::from_i32(code).as_i32(), code);
        }
        assert_eq!(ErrorStatus::from_i32(17), ErrorStatus::Unknown(17));
        assert_eq!(ErrorStatus::Unknown(17).to_string(), "unknown(17)");
    }

    #[test]
    fn only_no_error_is_success() {
        assert!(!ErrorStatus::NoError.is_error());
        assert!(ErrorStatus::ReadOnly.is_error());
        assert!(ErrorStatus::Unknown(-1).is_error());
    }

    #[test]
    fn timeout_is_detected() {
        let err = Error::Timeout {
            target: UNKNOWN_TARGET,
            elapsed: Duration::from_millis(10),
        };
        assert!(err.is_timeout());
        assert!(!Error::Validation("x".into()).is_timeout());
    }
}
