//! In-memory address book.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::{NodeId, PeerAddress};
use crate::ports::AddressBook;

/// Address book backed by a map, fed by the connection layer.
#[derive(Debug, Default)]
pub struct StaticAddressBook {
    addrs: RwLock<HashMap<NodeId, Vec<PeerAddress>>>,
}

impl StaticAddressBook {
    /// Empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the known addresses of `peer`.
    pub fn set_addresses(&self, peer: NodeId, addrs: Vec<PeerAddress>) {
        self.addrs.write().insert(peer, addrs);
    }

    /// Add one address to `peer`.
    pub fn add_address(&self, peer: NodeId, addr: PeerAddress) {
        let mut book = self.addrs.write();
        let entry = book.entry(peer).or_default();
        if !entry.contains(&addr) {
            entry.push(addr);
        }
    }

    /// Forget `peer`.
    pub fn forget(&self, peer: &NodeId) {
        self.addrs.write().remove(peer);
    }
}

impl AddressBook for StaticAddressBook {
    fn addresses_of(&self, peer: &NodeId) -> Vec<PeerAddress> {
        self.addrs.read().get(peer).cloned().unwrap_or_default()
    }
}
