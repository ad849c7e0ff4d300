//! CIDR prefixes and prefix matching.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::domain::DiversityError;

/// Compare byte slices up to a prefix length in bits.
///
/// Returns true if the first `prefix_bits` bits of both slices are equal.
pub(crate) fn prefix_matches(a: &[u8], b: &[u8], prefix_bits: u8) -> bool {
    let max_bytes = a.len().min(b.len());
    let prefix_bytes = (prefix_bits / 8) as usize;
    let remaining_bits = prefix_bits % 8;

    if a[..prefix_bytes.min(max_bytes)] != b[..prefix_bytes.min(max_bytes)] {
        return false;
    }

    // Partial byte when the prefix is not byte aligned
    if remaining_bits > 0 && prefix_bytes < max_bytes {
        let mask_byte = 0xFFu8 << (8 - remaining_bits);
        return (a[prefix_bytes] & mask_byte) == (b[prefix_bytes] & mask_byte);
    }

    true
}

/// Split `"addr/len"` and parse the length against `max_len`.
fn split_prefix(s: &str, max_len: u8) -> Result<(&str, u8), DiversityError> {
    let (addr, len) = s
        .trim()
        .split_once('/')
        .ok_or_else(|| DiversityError::Configuration(format!("missing prefix length in {:?}", s)))?;
    let len: u8 = len
        .parse()
        .map_err(|_| DiversityError::Configuration(format!("invalid prefix length in {:?}", s)))?;
    if len > max_len {
        return Err(DiversityError::Configuration(format!(
            "prefix length {} exceeds {} in {:?}",
            len, max_len, s
        )));
    }
    Ok((addr, len))
}

/// An IPv4 network such as `12.0.0.0/8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Cidr {
    network: Ipv4Addr,
    prefix_len: u8,
}

impl Ipv4Cidr {
    /// Build a network, masking off host bits.
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Result<Self, DiversityError> {
        if prefix_len > 32 {
            return Err(DiversityError::Configuration(format!(
                "IPv4 prefix length {} exceeds 32",
                prefix_len
            )));
        }
        Ok(Self {
            network: mask_ipv4(addr, prefix_len),
            prefix_len,
        })
    }

    /// Network address.
    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    /// Prefix length in bits.
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// True if `ip` lies inside this network.
    pub fn contains(&self, ip: &Ipv4Addr) -> bool {
        prefix_matches(&self.network.octets(), &ip.octets(), self.prefix_len)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = DiversityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, len) = split_prefix(s, 32)?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| DiversityError::Configuration(format!("invalid IPv4 network {:?}", s)))?;
        Self::new(addr, len)
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

/// An IPv6 network such as `2001:db8::/32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv6Cidr {
    network: Ipv6Addr,
    prefix_len: u8,
}

impl Ipv6Cidr {
    /// Build a network, masking off host bits.
    pub fn new(addr: Ipv6Addr, prefix_len: u8) -> Result<Self, DiversityError> {
        if prefix_len > 128 {
            return Err(DiversityError::Configuration(format!(
                "IPv6 prefix length {} exceeds 128",
                prefix_len
            )));
        }
        let bits = u128::from(addr);
        let mask = if prefix_len == 0 {
            0
        } else {
            u128::MAX << (128 - u32::from(prefix_len))
        };
        Ok(Self {
            network: Ipv6Addr::from(bits & mask),
            prefix_len,
        })
    }

    /// Network address.
    pub fn network(&self) -> Ipv6Addr {
        self.network
    }

    /// Prefix length in bits.
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// True if `ip` lies inside this network.
    pub fn contains(&self, ip: &Ipv6Addr) -> bool {
        prefix_matches(&self.network.octets(), &ip.octets(), self.prefix_len)
    }
}

impl FromStr for Ipv6Cidr {
    type Err = DiversityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, len) = split_prefix(s, 128)?;
        let addr: Ipv6Addr = addr
            .parse()
            .map_err(|_| DiversityError::Configuration(format!("invalid IPv6 network {:?}", s)))?;
        Self::new(addr, len)
    }
}

impl fmt::Display for Ipv6Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

/// Zero every bit past `prefix_len`.
pub fn mask_ipv4(ip: Ipv4Addr, prefix_len: u8) -> Ipv4Addr {
    let mask = if prefix_len == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix_len.min(32)))
    };
    Ipv4Addr::from(u32::from(ip) & mask)
}
