//! # Integration Test Flows
//!
//! `DiversityFilter` driving the real `GroupLimitPolicy`, fed by
//! `StaticAddressBook`, `StaticAsnTable` and `TomlConfigProvider`.
//!
//! ## Flows Tested:
//!
//! 1. **Bucket and table limits**: one /16 is capped per CPL and overall
//! 2. **Release**: removal hands back exactly the groups admission took
//! 3. **IPv6**: ASN table splits groups, unknown ASNs collapse into one
//! 4. **Config file**: limits, whitelist and ASN data loaded from TOML

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::IpAddr;
    use std::sync::Arc;

    use peer_diversity::{
        DiversityConfig, DiversityFilterBuilder, GroupLimitPolicy, NodeId, PeerAddress,
        PeerIpGroupKey, StaticAddressBook, StaticAsnTable, TomlConfigProvider, UNKNOWN_ASN_KEY,
    };
    use rand::SeedableRng;

    use crate::fixtures::{host_in, id_with_cpl, init_tracing, Harness};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(0x5eed)
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    fn key(s: &str) -> PeerIpGroupKey {
        PeerIpGroupKey::new(s)
    }

    // =============================================================================
    // LIMITS
    // =============================================================================

    #[test]
    fn test_bucket_limit_then_table_limit() {
        let h = Harness::new(DiversityConfig::default());
        let mut rng = rng();
        let group = key("10.1.0.0");

        // max_per_cpl = 2 in bucket 3
        let a = id_with_cpl(&mut rng, &h.local, 3);
        let b = id_with_cpl(&mut rng, &h.local, 3);
        let c = id_with_cpl(&mut rng, &h.local, 3);
        assert!(h.offer(a, &[ip("10.1.0.1")]));
        assert!(h.offer(b, &[ip("10.1.0.2")]));
        assert!(!h.offer(c, &[ip("10.1.0.3")]));
        assert_eq!(h.policy.cpl_group_count(3, &group), 2);

        // a different bucket still has room, until max_for_table = 3
        let d = id_with_cpl(&mut rng, &h.local, 4);
        let e = id_with_cpl(&mut rng, &h.local, 5);
        assert!(h.offer(d, &[ip("10.1.0.4")]));
        assert!(!h.offer(e, &[ip("10.1.0.5")]));
        assert_eq!(h.policy.group_count(&group), 3);

        // other groups are unaffected
        assert!(h.offer(e, &[ip("10.2.0.5")]));
    }

    #[test]
    fn test_legacy_block_shares_one_group() {
        let h = Harness::new(DiversityConfig::new(1, 1));
        let mut rng = rng();

        let a = id_with_cpl(&mut rng, &h.local, 0);
        let b = id_with_cpl(&mut rng, &h.local, 1);
        assert!(h.offer(a, &[ip("17.1.2.3")]));
        // different /16, same legacy /8
        assert!(!h.offer(b, &[ip("17.200.9.9")]));
        assert_eq!(h.policy.group_count(&key("17.0.0.0")), 1);
    }

    #[test]
    fn test_saturated_address_rejects_whole_peer() {
        let h = Harness::new(DiversityConfig::new(1, 1));
        let mut rng = rng();

        let a = id_with_cpl(&mut rng, &h.local, 0);
        assert!(h.offer(a, &[ip("10.1.0.1")]));

        let b = id_with_cpl(&mut rng, &h.local, 1);
        assert!(!h.offer(b, &[ip("10.9.0.1"), ip("10.1.0.2")]));
        assert_eq!(h.policy.group_count(&key("10.9.0.0")), 0);
        assert!(h.filter.peer_groups(&b).is_empty());
    }

    // =============================================================================
    // RELEASE
    // =============================================================================

    #[test]
    fn test_remove_releases_groups_admitted_with() {
        let h = Harness::new(DiversityConfig::default());
        let mut rng = rng();
        let peer = id_with_cpl(&mut rng, &h.local, 2);

        assert!(h.offer(peer, &[ip("10.1.0.1"), ip("172.16.0.1")]));
        assert_eq!(h.policy.tracked_groups(), 2);

        // the address book moves on before the peer is evicted
        h.book
            .set_addresses(peer, vec![PeerAddress::Ip(ip("192.168.0.1"))]);
        h.filter.remove(&peer);

        assert_eq!(h.policy.tracked_groups(), 0);
        assert!(h.filter.diversity_stats().is_empty());
    }

    #[test]
    fn test_churn_keeps_policy_and_stats_in_step() {
        let h = Harness::new(DiversityConfig::new(2, 3));
        let mut rng = rng();
        let mut admitted = Vec::new();

        for i in 0..200u32 {
            let peer = id_with_cpl(&mut rng, &h.local, i % 6);
            let addr = host_in(&mut rng, 10, (i % 5) as u8);
            if h.offer(peer, &[addr]) {
                admitted.push(peer);
            }
            if i % 3 == 0 && !admitted.is_empty() {
                let victim = admitted.remove(0);
                h.filter.remove(&victim);
            }
        }

        assert_eq!(h.filter.admitted_count(), admitted.len());
        let stats = h.filter.diversity_stats();
        for g in 0..5u8 {
            let group = key(&format!("10.{}.0.0", g));
            let held: usize = stats.iter().map(|s| s.peers_in_group(&group)).sum();
            assert_eq!(h.policy.group_count(&group), held);
            assert!(held <= 3);
            for s in &stats {
                assert!(s.peers_in_group(&group) <= 2);
            }
        }
    }

    // =============================================================================
    // IPV6
    // =============================================================================

    #[test]
    fn test_asn_table_splits_ipv6_groups() {
        let table = StaticAsnTable::from_entries([
            ("2001:db8::/32", "64500"),
            ("2001:db8:beef::/48", "64501"),
        ])
        .unwrap();
        let h = Harness::with_asn_table(DiversityConfig::new(1, 1), table);
        let mut rng = rng();

        let a = id_with_cpl(&mut rng, &h.local, 0);
        let b = id_with_cpl(&mut rng, &h.local, 1);
        let c = id_with_cpl(&mut rng, &h.local, 2);
        assert!(h.offer(a, &[ip("2001:db8:1::1")]));
        assert!(h.offer(b, &[ip("2001:db8:beef::1")]));
        assert!(!h.offer(c, &[ip("2001:db8:2::1")]));

        assert_eq!(h.policy.group_count(&key("64500")), 1);
        assert_eq!(h.policy.group_count(&key("64501")), 1);
    }

    #[test]
    fn test_unknown_asns_collapse_into_one_group() {
        let h = Harness::new(DiversityConfig::new(2, 2));
        let mut rng = rng();

        let peers: Vec<NodeId> = (0..3).map(|i| id_with_cpl(&mut rng, &h.local, i)).collect();
        assert!(h.offer(peers[0], &[ip("2a00:1450::1")]));
        assert!(h.offer(peers[1], &[ip("2606:4700::1")]));
        assert!(!h.offer(peers[2], &[ip("2400:cb00::1")]));
        assert_eq!(h.policy.group_count(&key(UNKNOWN_ASN_KEY)), 2);
    }

    // =============================================================================
    // CONFIG FILE
    // =============================================================================

    #[test]
    fn test_filter_from_config_file() {
        init_tracing();
        let trusted = NodeId::new([0x42; 32]);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[diversity]
max_per_cpl = 1
max_for_table = 2
log_key = "rt/diversity"
whitelist = ["{}"]

[[asn]]
prefix = "2001:db8::/32"
asn = "64500"
"#,
            trusted
        )
        .unwrap();

        let provider = TomlConfigProvider::load(file.path()).unwrap();
        let book = Arc::new(StaticAddressBook::new());
        let policy = Arc::new(
            GroupLimitPolicy::new(provider.diversity_config().clone(), book.clone()).unwrap(),
        );
        let filter = DiversityFilterBuilder::new()
            .policy(policy.clone())
            .local_node(NodeId::zero())
            .asn_lookup(Arc::new(provider.asn_table().clone()))
            .log_key(provider.log_key())
            .whitelist(provider.whitelist().iter().copied())
            .build()
            .unwrap();

        assert_eq!(filter.log_key(), "rt/diversity");
        // whitelisted without any address
        assert!(filter.try_add(&trusted));

        let a = NodeId::new([0x80; 32]);
        let b = NodeId::new([0x81; 32]);
        book.set_addresses(a, vec![PeerAddress::Ip(ip("2001:db8::1"))]);
        book.set_addresses(b, vec![PeerAddress::Ip(ip("2001:db8::2"))]);
        assert!(filter.try_add(&a));
        // same ASN, same bucket, max_per_cpl = 1
        assert!(!filter.try_add(&b));
        assert_eq!(policy.group_count(&key("64500")), 1);
    }
}
