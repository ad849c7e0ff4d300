//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** the admission API the routing table calls
//! - **Driven Ports (Outbound):** policy, CPL, ASN and address-book lookups
//!   the host supplies

pub mod inbound;
pub mod outbound;

pub use inbound::PeerDiversityApi;
pub use outbound::{AddressBook, AsnLookup, CplLookup, GroupingPolicy, LocalCplLookup};
