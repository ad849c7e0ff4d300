//! Core Domain Entities for Peer Diversity
//!
//! Identifiers, addresses and the group records the filter keeps per peer.

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::domain::DiversityError;

/// 256-bit DHT node identifier.
///
/// The filter only uses it as a map key and as input to CPL lookups, so it is
/// a plain byte array with a hex `Display`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub [u8; 32]);

impl NodeId {
    /// Create a NodeId from raw 32-byte array.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// All-zero identifier.
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, DiversityError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.trim(), &mut bytes).map_err(|e| {
            DiversityError::Configuration(format!("invalid node id {:?}: {}", s, e))
        })?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for NodeId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for NodeId {
    // Short form keeps log lines readable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NodeId({:02x}{:02x}{:02x}{:02x}..)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// A network address as known to the address book.
///
/// Only IP-bearing variants can be grouped. Name-based addresses have no
/// topology the filter can reason about and cause the peer to be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PeerAddress {
    /// Bare IP address.
    Ip(IpAddr),
    /// IP address with transport port.
    Socket(SocketAddr),
    /// DNS name that has not been resolved.
    Dns {
        /// Host name.
        host: String,
        /// Transport port.
        port: u16,
    },
    /// Onion service address.
    Onion(String),
}

impl PeerAddress {
    /// Convert to the bare IP used for grouping.
    pub fn to_ip(&self) -> Result<IpAddr, DiversityError> {
        match self {
            Self::Ip(ip) => Ok(*ip),
            Self::Socket(sa) => Ok(sa.ip()),
            Self::Dns { .. } => Err(DiversityError::AddressResolution {
                address: self.to_string(),
                reason: "unresolved DNS name".to_string(),
            }),
            Self::Onion(_) => Err(DiversityError::AddressResolution {
                address: self.to_string(),
                reason: "onion address has no IP".to_string(),
            }),
        }
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(ip) => write!(f, "{}", ip),
            Self::Socket(sa) => write!(f, "{}", sa),
            Self::Dns { host, port } => write!(f, "dns:{}:{}", host, port),
            Self::Onion(addr) => write!(f, "onion:{}", addr),
        }
    }
}

impl From<IpAddr> for PeerAddress {
    fn from(ip: IpAddr) -> Self {
        Self::Ip(ip)
    }
}

impl From<SocketAddr> for PeerAddress {
    fn from(sa: SocketAddr) -> Self {
        Self::Socket(sa)
    }
}

/// Opaque identifier of a topology group.
///
/// `/8` or `/16` network string for IPv4, ASN string for IPv6.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerIpGroupKey(String);

impl PeerIpGroupKey {
    /// Wrap a raw group string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw group string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if no group could be derived.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PeerIpGroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerIpGroupKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PeerIpGroupKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One (peer, address-derived group) association.
///
/// Passed by value to every policy hook. The values handed to `decrement`
/// on removal are exactly the ones handed to `increment` on admission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerGroupInfo {
    /// The peer.
    pub id: NodeId,
    /// Common prefix length against the local node, computed at admission.
    pub cpl: u32,
    /// Topology group of one of the peer's addresses.
    pub ip_group_key: PeerIpGroupKey,
}

impl PeerGroupInfo {
    /// Create a new group record.
    pub fn new(id: NodeId, cpl: u32, ip_group_key: PeerIpGroupKey) -> Self {
        Self {
            id,
            cpl,
            ip_group_key,
        }
    }
}

/// Snapshot of one non-empty CPL bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CplDiversityStats {
    /// Bucket CPL.
    pub cpl: u32,
    /// Group keys of every admitted peer in the bucket.
    pub peers: HashMap<NodeId, Vec<PeerIpGroupKey>>,
}

impl CplDiversityStats {
    /// Number of peers in the bucket.
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Peers in the bucket with at least one address in `key`.
    pub fn peers_in_group(&self, key: &PeerIpGroupKey) -> usize {
        self.peers.values().filter(|keys| keys.contains(key)).count()
    }
}
