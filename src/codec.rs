//! Request encoding and response decoding.
//!
//! The session only sees [`Codec`]; [`BerCodec`] is the SNMPv1 community
//! message implementation.

use std::net::SocketAddr;

use bytes::Bytes;

use crate::ber::Decoder;
use crate::error::{DecodeErrorKind, ErrorStatus, Result};
use crate::message::CommunityMessage;
use crate::operation::OperationKind;
use crate::pdu::{Pdu, PduType};
use crate::varbind::VarBind;

/// Decoded GetResponse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePdu {
    pub request_id: i32,
    pub error_status: ErrorStatus,
    /// 1-based index of the offending binding, 0 when unspecified.
    pub error_index: i32,
    pub varbinds: Vec<VarBind>,
}

/// Wire codec used by a session.
///
/// An `Err` from [`decode`](Codec::decode) is the error indication: the reply
/// is unusable and the exchange fails at the transport level.
pub trait Codec: Send + Sync {
    /// Encode a request message.
    fn encode(
        &self,
        community: &[u8],
        kind: OperationKind,
        request_id: i32,
        varbinds: &[VarBind],
    ) -> Result<Bytes>;

    /// Decode a response message received from `peer`.
    fn decode(&self, data: Bytes, peer: SocketAddr) -> Result<ResponsePdu>;
}

/// SNMPv1 BER codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct BerCodec;

impl Codec for BerCodec {
    fn encode(
        &self,
        community: &[u8],
        kind: OperationKind,
        request_id: i32,
        varbinds: &[VarBind],
    ) -> Result<Bytes> {
        for vb in varbinds {
            vb.oid.validate()?;
        }

        let pdu = match kind {
            OperationKind::Get => {
                Pdu::get_request(request_id, varbinds.iter().map(|vb| vb.oid.clone()))
            }
            OperationKind::Set => Pdu::set_request(request_id, varbinds.to_vec()),
        };

        Ok(CommunityMessage::new(Bytes::copy_from_slice(community), pdu).encode())
    }

    fn decode(&self, data: Bytes, peer: SocketAddr) -> Result<ResponsePdu> {
        let mut decoder = Decoder::with_target(data, peer);
        let pdu = CommunityMessage::decode_from(&mut decoder)?.into_pdu();

        if pdu.pdu_type != PduType::GetResponse {
            return Err(decoder.error(DecodeErrorKind::UnexpectedPduType(pdu.pdu_type.tag())));
        }

        Ok(ResponsePdu {
            request_id: pdu.request_id,
            error_status: pdu.error_status_enum(),
            error_index: pdu.error_index,
            varbinds: pdu.varbinds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::oid;
    use crate::value::Value;

    fn peer() -> SocketAddr {
        "192.0.2.10:161".parse().unwrap()
    }

    #[test]
    fn get_request_drops_values() {
        let codec = BerCodec;
        let bytes = codec
            .encode(
                b"public",
                OperationKind::Get,
                12,
                &[VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), "ignored")],
            )
            .unwrap();

        let msg = CommunityMessage::decode(bytes).unwrap();
        assert_eq!(msg.community.as_ref(), b"public");
        assert_eq!(msg.pdu.pdu_type, PduType::GetRequest);
        assert_eq!(msg.pdu.request_id, 12);
        assert_eq!(msg.pdu.varbinds[0].value, Value::Null);
    }

    #[test]
    fn set_request_keeps_values() {
        let bytes = BerCodec
            .encode(
                b"private",
                OperationKind::Set,
                3,
                &[VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), "A")],
            )
            .unwrap();

        let msg = CommunityMessage::decode(bytes).unwrap();
        assert_eq!(msg.pdu.pdu_type, PduType::SetRequest);
        assert_eq!(msg.pdu.varbinds[0].value, Value::from("A"));
    }

    #[test]
    fn decodes_error_response() {
        let reply = CommunityMessage::new(
            b"public".as_slice(),
            Pdu::response(
                5,
                ErrorStatus::NoSuchName,
                1,
                vec![VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 99, 0))],
            ),
        )
        .encode();

        let response = BerCodec.decode(reply, peer()).unwrap();
        assert_eq!(response.request_id, 5);
        assert_eq!(response.error_status, ErrorStatus::NoSuchName);
        assert_eq!(response.error_index, 1);
        assert_eq!(response.varbinds.len(), 1);
    }

    #[test]
    fn request_pdu_is_not_a_response() {
        let echoed = BerCodec
            .encode(b"public", OperationKind::Get, 1, &[VarBind::null(oid!(1, 3))])
            .unwrap();
        let err = BerCodec.decode(echoed, peer()).unwrap_err();
        assert!(matches!(*err, Error::MalformedResponse { target } if target == peer()));
    }

    #[test]
    fn garbage_is_malformed() {
        let err = BerCodec
            .decode(Bytes::from_static(b"\x30\x03\x02\x01"), peer())
            .unwrap_err();
        assert!(matches!(*err, Error::MalformedResponse { target } if target == peer()));
    }

    #[test]
    fn invalid_oid_fails_to_encode() {
        let err = BerCodec
            .encode(b"public", OperationKind::Get, 1, &[VarBind::null(oid!(5, 5))])
            .unwrap_err();
        assert!(matches!(*err, Error::Encode { .. }));
    }
}
