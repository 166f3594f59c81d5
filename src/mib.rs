//! Symbolic object names.
//!
//! Only the SNMPv2-MIB system group is built in. Numeric OIDs always work.
//!
//! # Example
//!
//! ```
//! use snmpv1_manager::mib::parse_object;
//! use snmpv1_manager::oid;
//!
//! assert_eq!(parse_object("sysName.0").unwrap(), oid!(1, 3, 6, 1, 2, 1, 1, 5, 0));
//! assert_eq!(parse_object("SNMPv2-MIB::sysLocation.0").unwrap(), oid!(1, 3, 6, 1, 2, 1, 1, 6, 0));
//! assert_eq!(parse_object("1.3.6.1.2.1.1.1.0").unwrap(), oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));
//! ```

use crate::error::{Error, Result};
use crate::oid::Oid;

/// Module assumed when a name has no `MODULE::` prefix.
pub const DEFAULT_MODULE: &str = "SNMPv2-MIB";

/// Maps `MODULE::symbol` plus instance index to an OID.
pub trait MibResolver {
    fn resolve(&self, module: &str, symbol: &str, index: &[u32]) -> Result<Oid>;
}

/// system group (1.3.6.1.2.1.1)
const SYSTEM: [u32; 7] = [1, 3, 6, 1, 2, 1, 1];

const SYSTEM_OBJECTS: &[(&str, u32)] = &[
    ("sysDescr", 1),
    ("sysObjectID", 2),
    ("sysUpTime", 3),
    ("sysContact", 4),
    ("sysName", 5),
    ("sysLocation", 6),
    ("sysServices", 7),
];

/// Static SNMPv2-MIB system group.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMib;

impl MibResolver for SystemMib {
    fn resolve(&self, module: &str, symbol: &str, index: &[u32]) -> Result<Oid> {
        let arc = (module == DEFAULT_MODULE)
            .then(|| SYSTEM_OBJECTS.iter().find(|(name, _)| *name == symbol))
            .flatten()
            .map(|(_, arc)| *arc)
            .ok_or_else(|| {
                Error::UnknownObject {
                    module: module.into(),
                    symbol: symbol.into(),
                }
                .boxed()
            })?;

        Ok(Oid::from_slice(&SYSTEM).child(arc).extend_from_slice(index))
    }
}

/// Parse an object name with [`SystemMib`].
pub fn parse_object(name: &str) -> Result<Oid> {
    parse_object_with(&SystemMib, name)
}

/// Parse `[MODULE::]symbol[.index...]` or a dotted numeric OID.
pub fn parse_object_with(resolver: &impl MibResolver, name: &str) -> Result<Oid> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidOid("empty object name".into()).boxed());
    }

    let (module, rest) = name.split_once("::").unwrap_or((DEFAULT_MODULE, name));
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        if rest.len() != name.len() {
            return Err(Error::InvalidOid(name.into()).boxed());
        }
        let oid = Oid::parse(rest)?;
        oid.validate_length()?;
        return Ok(oid);
    }

    let (symbol, index) = match rest.split_once('.') {
        Some((symbol, index)) => (symbol, Oid::parse(index)?),
        None => (rest, Oid::empty()),
    };

    let oid = resolver.resolve(module, symbol, index.arcs())?;
    oid.validate_length()?;
    Ok(oid)
}
