//! Domain Errors for Peer Diversity

use std::net::IpAddr;

use thiserror::Error;

/// Errors raised while building the filter or deriving group keys.
///
/// Only `Configuration` ever reaches a caller. The other variants are logged
/// inside `try_add` and turned into a rejected admission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiversityError {
    /// Missing collaborator or malformed built-in/configured value.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Address cannot be reduced to a bare IP.
    #[error("cannot resolve address {address} to an IP: {reason}")]
    AddressResolution { address: String, reason: String },

    /// ASN collaborator failed for an IPv6 address.
    #[error("failed to fetch ASN for IPv6 addr {ip}: {reason}")]
    AsnLookup { ip: IpAddr, reason: String },
}

/// Failure reported by an `AsnLookup` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct AsnLookupError(pub String);

impl AsnLookupError {
    /// Create a new lookup error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}
