//! GET and SET operations.

use std::fmt;

use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::varbind::VarBind;

/// Request kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Read the named objects.
    Get,
    /// Write the supplied values.
    Set,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("get"),
            Self::Set => f.write_str("set"),
        }
    }
}

/// One request against an agent: a kind plus an ordered, non-empty binding list.
///
/// Bindings keep the order given here on the wire and in the outcome.
///
/// # Examples
///
/// ```
/// use snmpv1_manager::{Operation, VarBind, Value, oid};
///
/// let get = Operation::get([oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)]).unwrap();
/// assert_eq!(get.varbinds().len(), 1);
///
/// let set = Operation::set([VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), "A")]).unwrap();
/// assert!(set.varbinds()[0].has_value());
///
/// // SET needs a value on every binding
/// assert!(Operation::set([VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::Null)]).is_err());
/// // and nothing may be empty
/// assert!(Operation::get(Vec::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    kind: OperationKind,
    varbinds: Vec<VarBind>,
}

impl Operation {
    /// GET the given objects.
    pub fn get(oids: impl IntoIterator<Item = Oid>) -> Result<Self> {
        Self::get_bindings(oids.into_iter().map(VarBind::null))
    }

    /// GET the objects named by `varbinds`. Any values are ignored and sent
    /// as NULL placeholders.
    pub fn get_bindings(varbinds: impl IntoIterator<Item = VarBind>) -> Result<Self> {
        Self::build(OperationKind::Get, varbinds.into_iter().collect())
    }

    /// SET the given bindings. Every binding must carry a value.
    pub fn set(varbinds: impl IntoIterator<Item = VarBind>) -> Result<Self> {
        let varbinds: Vec<VarBind> = varbinds.into_iter().collect();
        if let Some(pos) = varbinds.iter().position(|vb| !vb.has_value()) {
            return Err(Error::validation(format!(
                "set binding {} ({}) has no value",
                pos + 1,
                varbinds[pos].oid
            )));
        }
        Self::build(OperationKind::Set, varbinds)
    }

    fn build(kind: OperationKind, varbinds: Vec<VarBind>) -> Result<Self> {
        if varbinds.is_empty() {
            return Err(Error::validation(format!("{} operation has no bindings", kind)));
        }
        for vb in &varbinds {
            vb.oid.validate()?;
            vb.oid.validate_length()?;
        }
        Ok(Self { kind, varbinds })
    }

    /// Request kind.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Request bindings in wire order.
    pub fn varbinds(&self) -> &[VarBind] {
        &self.varbinds
    }
}
