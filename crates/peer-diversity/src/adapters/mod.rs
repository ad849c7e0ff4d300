//! Adapters - Concrete implementations of the outbound ports
//!
//! - `GroupLimitPolicy`: per-CPL and per-table group limits
//! - `StaticAsnTable`, `NoAsnLookup`: IPv6 ASN sources
//! - `StaticAddressBook`: in-memory address book
//! - `TomlConfigProvider`: file configuration (feature `toml-config`)

mod address_book;
mod asn_table;
mod group_limiter;

#[cfg(feature = "toml-config")]
mod config;

pub use address_book::StaticAddressBook;
pub use asn_table::{NoAsnLookup, StaticAsnTable};
pub use group_limiter::GroupLimitPolicy;

#[cfg(feature = "toml-config")]
pub use config::{ConfigError, TomlConfigProvider};
