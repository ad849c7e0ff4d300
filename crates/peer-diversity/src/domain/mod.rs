//! Domain Layer - Pure diversity logic with no I/O and no locking
//!
//! This module contains:
//! - Node identifiers, peer addresses and group records
//! - IP group classification (legacy Class A /8, /16, ASN)
//! - Common prefix length between node identifiers
//! - Limits for the bundled group policy

pub mod distance;
pub mod entities;
pub mod errors;
pub mod ip_group;
pub mod value_objects;

pub use distance::*;
pub use entities::*;
pub use errors::*;
pub use ip_group::*;
pub use value_objects::*;
