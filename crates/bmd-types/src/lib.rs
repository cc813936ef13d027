//! Foundation types for bmd.
//!
//! This crate provides the identifiers shared by the wire codec, the crypto
//! helpers, and the object store.
//!
//! # Key Types
//!
//! - [`ObjectHash`] -- inventory hash identifying a stored object
//! - [`Tag`] -- public-key tag derived from an address
//! - [`ObjectType`] -- the object header's type field

pub mod error;
pub mod object;
pub mod object_type;
pub mod tag;

pub use error::TypeError;
pub use object::ObjectHash;
pub use object_type::ObjectType;
pub use tag::Tag;
