//! Command-line support for the `snmpv1` tool.
//!
//! Operations are given as positional words:
//!
//! - `get:OBJECT[,OBJECT...]`
//! - `set:OBJECT=TYPE:VALUE`
//!
//! `OBJECT` is anything [`parse_object`](crate::mib::parse_object) accepts.
//! `TYPE` follows net-snmp: `i` INTEGER, `u` Gauge32, `s` STRING, `o` OBJECT
//! IDENTIFIER, `a` IpAddress, `t` TimeTicks, `c` Counter32.

pub mod args;

pub use args::{Args, Mode, ValueType, parse_operation};
