//! # Peer Diversity Filter
//!
//! Admission control for DHT routing-table buckets based on network
//! topology rather than identity alone. Keeps one operator (one IP block or
//! one Autonomous System) from dominating a bucket or the table, which is
//! what Sybil and eclipse attacks rely on.
//!
//! ## Grouping
//!
//! Every address of a candidate peer is mapped to an IP group:
//! - IPv4 inside a legacy Class A block (`12/8`, `17/8`, ...): the `/8`
//! - other IPv4: the `/16`
//! - IPv6: the ASN, or one shared "unknown ASN" group
//!
//! How many peers per group is too many is decided by a pluggable
//! [`GroupingPolicy`]. [`GroupLimitPolicy`] is the standard per-bucket and
//! per-table limiter.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** group keys, CIDR matching, CPL, entities
//! - **Ports Layer:** the admission API and the collaborator traits
//! - **Service Layer:** [`DiversityFilter`], one lock around all bookkeeping
//! - **Adapters Layer:** policy, ASN table, address book, TOML config
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use peer_diversity::{
//!     DiversityConfig, DiversityFilterBuilder, GroupLimitPolicy, NodeId, PeerAddress,
//!     StaticAddressBook,
//! };
//!
//! let book = Arc::new(StaticAddressBook::new());
//! let policy = Arc::new(GroupLimitPolicy::new(DiversityConfig::default(), book.clone()).unwrap());
//!
//! let filter = DiversityFilterBuilder::new()
//!     .policy(policy)
//!     .local_node(NodeId::new([0u8; 32]))
//!     .log_key("rt/diversity")
//!     .build()
//!     .unwrap();
//!
//! let peer = NodeId::new([0x80; 32]);
//! book.set_addresses(peer, vec![PeerAddress::Ip("192.168.5.9".parse().unwrap())]);
//!
//! assert!(filter.try_add(&peer));
//! assert_eq!(filter.diversity_stats().len(), 1);
//!
//! filter.remove(&peer);
//! assert!(filter.diversity_stats().is_empty());
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// =============================================================================
// FEATURE-GATED MODULES
// =============================================================================

/// Collaborator fakes (RecordingPolicy, FixedAsnLookup, MapCplLookup)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// RE-EXPORTS
// =============================================================================

// Domain
pub use domain::{
    asn_group_key, common_prefix_len, ipv4_group_key, mask_ipv4, AsnLookupError,
    CplDiversityStats, DiversityConfig, DiversityError, Ipv4Cidr, Ipv6Cidr, LegacyClassA, NodeId,
    PeerAddress, PeerGroupInfo, PeerIpGroupKey, LEGACY_CLASS_A, UNKNOWN_ASN_KEY,
};

// Port traits
pub use ports::{
    AddressBook, AsnLookup, CplLookup, GroupingPolicy, LocalCplLookup, PeerDiversityApi,
};

// Service
pub use service::{DiversityFilter, DiversityFilterBuilder};

// Adapters
pub use adapters::{GroupLimitPolicy, NoAsnLookup, StaticAddressBook, StaticAsnTable};

#[cfg(feature = "toml-config")]
pub use adapters::{ConfigError, TomlConfigProvider};
