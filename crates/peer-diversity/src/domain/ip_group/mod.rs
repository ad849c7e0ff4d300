//! IP Group Classification
//!
//! Maps an address to the topology group used for diversity accounting:
//! - IPv4 inside a legacy Class A block: the /8 network
//! - other IPv4: the /16 network
//! - IPv6: the ASN, or one shared "unknown ASN" group

mod cidr;
mod key;
mod legacy;

pub use cidr::{mask_ipv4, Ipv4Cidr, Ipv6Cidr};
pub use key::{asn_group_key, ipv4_group_key, UNKNOWN_ASN_KEY};
pub use legacy::{LegacyClassA, LEGACY_CLASS_A};
