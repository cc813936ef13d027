use std::fmt;

use serde::{Deserialize, Serialize};

/// The type field carried in every object header.
///
/// Four values have defined semantics on the network. Every other value is an
/// "unknown" object type that is still stored and relayed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectType(u32);

impl ObjectType {
    /// Request for a public key.
    pub const GET_PUBKEY: Self = Self(0);
    /// Public key announcement (the tagged-key type).
    pub const PUBKEY: Self = Self(1);
    /// Person-to-person message.
    pub const MSG: Self = Self(2);
    /// Broadcast message.
    pub const BROADCAST: Self = Self(3);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Returns `true` for the four types with defined semantics.
    pub const fn is_known(&self) -> bool {
        self.0 <= Self::BROADCAST.0
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Self::GET_PUBKEY => "getpubkey",
            Self::PUBKEY => "pubkey",
            Self::MSG => "msg",
            Self::BROADCAST => "broadcast",
            _ => "unknown",
        }
    }
}

impl From<u32> for ObjectType {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<ObjectType> for u32 {
    fn from(ty: ObjectType) -> Self {
        ty.0
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "ObjectType({})", self.name())
        } else {
            write!(f, "ObjectType(unknown:{})", self.0)
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            f.write_str(self.name())
        } else {
            write!(f, "unknown({})", self.0)
        }
    }
}
