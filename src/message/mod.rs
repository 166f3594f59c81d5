//! SNMP message wrapper.
//!
//! An SNMPv1 message is `SEQUENCE { version INTEGER (0), community OCTET STRING, pdu PDU }`.

mod community;

pub use community::CommunityMessage;

/// Version field value carried by every SNMPv1 message.
pub const SNMP_V1: i32 = 0;
