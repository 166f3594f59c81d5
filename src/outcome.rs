//! Result of one exchange.
//!
//! An [`Outcome`] is what a session always ends in: it never carries a raw
//! [`Error`]. Display output is one line per binding (`oid = value`) on
//! success, `<status> at <oid>` for an agent rejection, and the failure
//! description otherwise.

use std::fmt;
use std::num::NonZeroU32;

use crate::error::{Error, ErrorStatus};
use crate::oid::Oid;
use crate::varbind::VarBind;

/// Terminal state of one GET or SET exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The agent answered with error status 0. Bindings are in request order.
    Success(Vec<VarBind>),
    /// The exchange failed.
    Failure(Failure),
}

impl Outcome {
    /// Whether the exchange succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Response bindings, if the exchange succeeded.
    pub fn varbinds(&self) -> Option<&[VarBind]> {
        match self {
            Outcome::Success(varbinds) => Some(varbinds),
            Outcome::Failure(_) => None,
        }
    }

    /// The failure, if the exchange failed.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }

    pub(crate) fn transport(error: &Error) -> Self {
        Outcome::Failure(Failure::from_error(error))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(varbinds) => {
                for (i, vb) in varbinds.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", vb)?;
                }
                Ok(())
            }
            Outcome::Failure(failure) => write!(f, "{}", failure),
        }
    }
}

/// What went wrong below the protocol layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCause {
    /// No matching response before the deadline.
    Timeout,
    /// Resolve, bind, send or receive failed.
    Io,
    /// The reply could not be decoded as an SNMPv1 GetResponse.
    Malformed,
    /// The request could not be encoded.
    Encode,
}

/// Why an exchange failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Network, timeout or codec failure. The agent's verdict is unknown.
    Transport {
        cause: TransportCause,
        detail: Box<str>,
    },
    /// The agent rejected the request with a non-zero error status.
    Protocol {
        status: ErrorStatus,
        /// 1-based error index as sent by the agent. `None` when the agent
        /// sent 0 or an index past the bindings.
        index: Option<NonZeroU32>,
        /// Offending binding, when the index points at one.
        oid: Option<Oid>,
    },
}

impl Failure {
    /// Classify a collaborator error.
    pub fn from_error(error: &Error) -> Self {
        let cause = match error {
            Error::Timeout { .. } => TransportCause::Timeout,
            Error::MalformedResponse { .. } => TransportCause::Malformed,
            Error::Encode { .. } | Error::InvalidOid(_) | Error::Validation(_) => {
                TransportCause::Encode
            }
            _ => TransportCause::Io,
        };
        Failure::Transport {
            cause,
            detail: error.to_string().into_boxed_str(),
        }
    }

    /// Whether this failure is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Failure::Transport {
                cause: TransportCause::Timeout,
                ..
            }
        )
    }

    /// The offending binding's OID as text, or `"?"` when unresolved.
    pub fn offender(&self) -> String {
        match self {
            Failure::Protocol { oid: Some(oid), .. } => oid.to_string(),
            _ => "?".to_string(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Transport { detail, .. } => f.write_str(detail),
            Failure::Protocol { status, .. } => write!(f, "{} at {}", status, self.offender()),
        }
    }
}
