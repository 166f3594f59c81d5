//! SNMPv1 Protocol Data Units (RFC 1157 Section 4.1).
//!
//! GetRequest, SetRequest and GetResponse share one layout:
//! `[tag] { request-id, error-status, error-index, variable-bindings }`.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, ErrorStatus, Result};
use crate::oid::Oid;
use crate::varbind::{VarBind, decode_varbind_list, encode_varbind_list};

/// PDU type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PduType {
    GetRequest = 0xA0,
    GetResponse = 0xA2,
    SetRequest = 0xA3,
}

impl PduType {
    /// Classify a tag byte.
    ///
    /// GetNextRequest and Trap are valid SNMPv1 PDUs this crate never
    /// exchanges; they are reported separately from tags outside SNMPv1.
    pub fn from_tag(tag: u8) -> std::result::Result<Self, DecodeErrorKind> {
        match tag {
            tag::pdu::GET_REQUEST => Ok(Self::GetRequest),
            tag::pdu::GET_RESPONSE => Ok(Self::GetResponse),
            tag::pdu::SET_REQUEST => Ok(Self::SetRequest),
            tag::pdu::GET_NEXT_REQUEST | tag::pdu::TRAP => {
                Err(DecodeErrorKind::UnexpectedPduType(tag))
            }
            _ => Err(DecodeErrorKind::UnknownPduType(tag)),
        }
    }

    /// Get the tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetRequest => write!(f, "GetRequest"),
            Self::GetResponse => write!(f, "GetResponse"),
            Self::SetRequest => write!(f, "SetRequest"),
        }
    }
}

/// Request or response PDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    /// PDU type
    pub pdu_type: PduType,
    /// Request ID for correlating requests and responses
    pub request_id: i32,
    /// Error status (0 for requests, error code for responses)
    pub error_status: i32,
    /// Error index (1-based index of problematic varbind)
    pub error_index: i32,
    /// Variable bindings
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    /// Create a GET request PDU. Every binding carries a NULL placeholder.
    pub fn get_request(request_id: i32, oids: impl IntoIterator<Item = Oid>) -> Self {
        Self {
            pdu_type: PduType::GetRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds: oids.into_iter().map(VarBind::null).collect(),
        }
    }

    /// Create a SET request PDU.
    pub fn set_request(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::SetRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    /// Create a GetResponse PDU.
    pub fn response(
        request_id: i32,
        error_status: ErrorStatus,
        error_index: i32,
        varbinds: Vec<VarBind>,
    ) -> Self {
        Self {
            pdu_type: PduType::GetResponse,
            request_id,
            error_status: error_status.as_i32(),
            error_index,
            varbinds,
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(self.pdu_type.tag(), |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_integer(self.error_index);
            buf.push_integer(self.error_status);
            buf.push_integer(self.request_id);
        });
    }

    /// Decode from BER.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let tag = decoder.read_tag()?;
        let pdu_type = PduType::from_tag(tag).map_err(|kind| decoder.error(kind))?;

        let len = decoder.read_length()?;
        let mut pdu_decoder = decoder.sub_decoder(len)?;

        let request_id = pdu_decoder.read_integer()?;
        let error_status = pdu_decoder.read_integer()?;
        let error_index = pdu_decoder.read_integer()?;
        let varbinds = decode_varbind_list(&mut pdu_decoder)?;
        pdu_decoder.expect_end()?;

        Ok(Pdu {
            pdu_type,
            request_id,
            error_status,
            error_index,
            varbinds,
        })
    }

    /// Check if this is an error response.
    pub fn is_error(&self) -> bool {
        self.error_status != 0
    }

    /// Get the error status as an enum.
    pub fn error_status_enum(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }
}
