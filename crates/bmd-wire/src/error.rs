use bmd_types::ObjectType;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("truncated {what}: need {needed} bytes, have {available}")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("expiry time out of range: {0}")]
    InvalidExpiry(u64),

    #[error("unexpected object type: expected {expected}, got {actual}")]
    UnexpectedType {
        expected: ObjectType,
        actual: ObjectType,
    },

    #[error("unsupported {kind} version: {version}")]
    UnsupportedVersion { kind: &'static str, version: u64 },

    #[error("field too large: {what} is {size} bytes (max {max})")]
    FieldTooLarge {
        what: &'static str,
        size: u64,
        max: usize,
    },
}

pub type WireResult<T> = Result<T, WireError>;
