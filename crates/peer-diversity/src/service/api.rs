use crate::domain::{CplDiversityStats, NodeId};
use crate::ports::PeerDiversityApi;

use super::filter::DiversityFilter;

impl PeerDiversityApi for DiversityFilter {
    fn try_add(&self, peer: &NodeId) -> bool {
        DiversityFilter::try_add(self, peer)
    }

    fn remove(&self, peer: &NodeId) {
        DiversityFilter::remove(self, peer)
    }

    fn whitelist_peers(&self, peers: &[NodeId]) {
        DiversityFilter::whitelist_peers(self, peers)
    }

    fn diversity_stats(&self) -> Vec<CplDiversityStats> {
        DiversityFilter::diversity_stats(self)
    }
}
