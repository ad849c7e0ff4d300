//! Group key derivation.
//!
//! SECURITY-CRITICAL: the key decides which peers count as topologically
//! redundant. Isolate for security audits.

use std::net::Ipv4Addr;

use super::cidr::mask_ipv4;
use super::legacy::LegacyClassA;
use crate::domain::PeerIpGroupKey;

/// Group key shared by every IPv6 address with no known ASN.
///
/// The hex is the /32 mask of a 128-bit address. It is constant text, so all
/// such peers land in one group and are treated as mutually redundant.
pub const UNKNOWN_ASN_KEY: &str = "unknown ASN: ffffffff000000000000000000000000";

/// `/8` network for legacy Class A members, `/16` network otherwise.
pub fn ipv4_group_key(ip: Ipv4Addr, legacy: &LegacyClassA) -> PeerIpGroupKey {
    let prefix_len = if legacy.contains(&ip) { 8 } else { 16 };
    PeerIpGroupKey::new(mask_ipv4(ip, prefix_len).to_string())
}

/// Key for a resolved ASN, falling back to [`UNKNOWN_ASN_KEY`].
pub fn asn_group_key(asn: Option<String>) -> PeerIpGroupKey {
    match asn {
        Some(asn) if !asn.is_empty() => PeerIpGroupKey::new(asn),
        _ => PeerIpGroupKey::new(UNKNOWN_ASN_KEY),
    }
}
