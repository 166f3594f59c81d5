//! Community-based SNMPv1 message format.

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, Result};
use crate::pdu::Pdu;
use bytes::Bytes;

use super::SNMP_V1;

/// Community-based SNMPv1 message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityMessage {
    /// Community string for authentication
    pub community: Bytes,
    /// Protocol data unit
    pub pdu: Pdu,
}

impl CommunityMessage {
    /// Create a new SNMPv1 message.
    pub fn new(community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self {
            community: community.into(),
            pdu,
        }
    }

    /// Encode to BER.
    pub fn encode(&self) -> Bytes {
        let mut buf = EncodeBuf::new();

        buf.push_sequence(|buf| {
            self.pdu.encode(buf);
            buf.push_octet_string(&self.community);
            buf.push_integer(SNMP_V1);
        });

        buf.finish()
    }

    /// Decode from BER.
    ///
    /// Rejects any version other than SNMPv1 and any bytes after the message.
    pub fn decode(data: Bytes) -> Result<Self> {
        Self::decode_from(&mut Decoder::new(data))
    }

    /// Decode from an existing decoder, which carries the peer address for
    /// error reporting.
    pub fn decode_from(decoder: &mut Decoder) -> Result<Self> {
        let mut seq = decoder.read_sequence()?;

        let version = seq.read_integer()?;
        if version != SNMP_V1 {
            return Err(seq.error(DecodeErrorKind::UnknownVersion(version)));
        }

        let community = seq.read_octet_string()?;
        let pdu = Pdu::decode(&mut seq)?;
        seq.expect_end()?;
        decoder.expect_end()?;

        Ok(CommunityMessage { community, pdu })
    }

    /// Consume and return the PDU.
    pub fn into_pdu(self) -> Pdu {
        self.pdu
    }
}
