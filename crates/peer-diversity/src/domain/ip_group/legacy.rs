//! Legacy Class A allocations.
//!
//! These /8 blocks belong to single large operators, so splitting them at /16
//! would let one operator appear as up to 256 distinct groups.

use std::net::Ipv4Addr;

use super::cidr::Ipv4Cidr;
use crate::domain::DiversityError;

/// Built-in legacy Class A networks, each grouped as one /8.
pub const LEGACY_CLASS_A: [&str; 8] = [
    "12.0.0.0/8",
    "17.0.0.0/8",
    "19.0.0.0/8",
    "38.0.0.0/8",
    "48.0.0.0/8",
    "56.0.0.0/8",
    "73.0.0.0/8",
    "53.0.0.0/8",
];

/// Membership matcher over a fixed set of IPv4 networks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyClassA {
    networks: Vec<Ipv4Cidr>,
}

impl LegacyClassA {
    /// Matcher over the built-in list.
    pub fn builtin() -> Result<Self, DiversityError> {
        Self::from_literals(&LEGACY_CLASS_A)
    }

    /// Parse every literal, failing on the first malformed one.
    pub fn from_literals(literals: &[&str]) -> Result<Self, DiversityError> {
        let networks = literals
            .iter()
            .map(|s| s.parse::<Ipv4Cidr>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { networks })
    }

    /// True if any listed network contains `ip`.
    pub fn contains(&self, ip: &Ipv4Addr) -> bool {
        self.networks.iter().any(|n| n.contains(ip))
    }

    /// Listed networks.
    pub fn networks(&self) -> &[Ipv4Cidr] {
        &self.networks
    }
}
