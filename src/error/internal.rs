//! Detailed error kinds.
//!
//! Decode kinds are only ever logged; the public error collapses them into
//! [`Error::MalformedResponse`](super::Error::MalformedResponse). Encode kinds
//! are carried by [`Error::Encode`](super::Error::Encode).

use std::fmt;

/// Reason a BER buffer could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// Input ended inside a TLV.
    TruncatedData,
    /// A length claims more bytes than remain.
    InsufficientData { needed: usize, available: usize },
    /// Tag differs from the one required at this position.
    UnexpectedTag { expected: u8, actual: u8 },
    /// Indefinite length form (0x80) is not accepted.
    IndefiniteLength,
    /// Long form length with zero length octets.
    InvalidLength,
    /// Long form length with more than 4 length octets.
    LengthTooLong { octets: usize },
    /// Length above the sanity limit.
    LengthExceedsMax { length: usize, max: usize },
    /// INTEGER with no content octets.
    ZeroLengthInteger,
    /// NULL with content octets.
    InvalidNull,
    /// IpAddress that is not exactly 4 octets.
    InvalidIpAddressLength { length: usize },
    /// OID subidentifier does not fit in 32 bits.
    IntegerOverflow,
    /// OID with more than 128 arcs.
    OidTooLong { count: usize, max: usize },
    /// Message version other than SNMPv1 (0).
    UnknownVersion(i32),
    /// Context tag outside the SNMPv1 PDU range.
    UnknownPduType(u8),
    /// Well-formed PDU that is not a GetResponse.
    UnexpectedPduType(u8),
    /// Bytes left over after the message.
    TrailingData { remaining: usize },
    /// Successful GetResponse without any bindings.
    EmptyResponse,
    /// Successful GetResponse whose binding at `position` does not match the request.
    VarbindMismatch { position: usize },
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedData => write!(f, "unexpected end of data"),
            Self::InsufficientData { needed, available } => {
                write!(f, "need {} bytes but only {} remaining", needed, available)
            }
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::InvalidLength => write!(f, "invalid length encoding"),
            Self::LengthTooLong { octets } => {
                write!(f, "length encoding too long ({} octets)", octets)
            }
            Self::LengthExceedsMax { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
            Self::ZeroLengthInteger => write!(f, "zero-length integer"),
            Self::InvalidNull => write!(f, "NULL with non-zero length"),
            Self::InvalidIpAddressLength { length } => {
                write!(f, "IP address must be 4 bytes, got {}", length)
            }
            Self::IntegerOverflow => write!(f, "subidentifier overflow"),
            Self::OidTooLong { count, max } => {
                write!(f, "OID has {} arcs, maximum is {}", count, max)
            }
            Self::UnknownVersion(v) => write!(f, "unsupported SNMP version {}", v),
            Self::UnknownPduType(t) => write!(f, "unknown PDU type 0x{:02X}", t),
            Self::UnexpectedPduType(t) => write!(f, "expected GetResponse, got PDU 0x{:02X}", t),
            Self::TrailingData { remaining } => {
                write!(f, "{} trailing bytes after message", remaining)
            }
            Self::EmptyResponse => write!(f, "empty response"),
            Self::VarbindMismatch { position } => {
                write!(f, "response binding {} does not match request", position)
            }
        }
    }
}

/// Reason a request could not be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeErrorKind {
    /// First arc must be 0, 1 or 2.
    InvalidFirstArc(u32),
    /// Second arc must be below 40 when the first arc is 0 or 1.
    InvalidSecondArc { first: u32, second: u32 },
    /// OIDs need at least two arcs on the wire.
    OidTooShort,
}

impl fmt::Display for EncodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFirstArc(v) => write!(f, "first arc must be 0, 1 or 2, got {}", v),
            Self::InvalidSecondArc { first, second } => write!(
                f,
                "second arc must be below 40 under arc {}, got {}",
                first, second
            ),
            Self::OidTooShort => write!(f, "OID must have at least two arcs"),
        }
    }
}
