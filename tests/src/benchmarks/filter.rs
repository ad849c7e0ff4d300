//! # Diversity Filter Benchmarks
//!
//! Performance targets:
//! - Group key derivation: < 200ns
//! - `try_add` on a populated table: < 5µs
//! - Admit + remove cycle: < 10µs
//!
//! Brutal Conditions:
//! - Table already holding thousands of peers across all buckets
//! - Sybil flood where every offer is rejected
//! - Concurrent admission from several threads

use std::net::IpAddr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use peer_diversity::{DiversityConfig, NodeId};
use rand::{Rng, SeedableRng};

use crate::fixtures::{host_in, id_with_cpl, random_host, Harness};

fn rng() -> rand::rngs::StdRng {
    rand::rngs::StdRng::seed_from_u64(42)
}

/// Harness with `n` honest peers spread over random /16s and buckets.
fn populated(n: usize) -> Harness {
    let h = Harness::new(DiversityConfig::new(20, 200));
    let mut rng = rng();
    let mut added = 0;
    while added < n {
        let peer = NodeId::new(rng.gen());
        let addr = random_host(&mut rng);
        if h.offer(peer, &[addr]) {
            added += 1;
        }
    }
    h
}

pub fn brutal_group_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("peer-diversity/brutal/group_key");
    group.measurement_time(Duration::from_secs(5));
    let h = Harness::new(DiversityConfig::default());

    let v4: IpAddr = "192.168.5.9".parse().unwrap();
    let legacy: IpAddr = "12.5.6.7".parse().unwrap();
    let v6: IpAddr = "2001:db8::1".parse().unwrap();

    group.bench_function("ipv4_slash16", |b| {
        b.iter(|| black_box(h.filter.ip_group_key(black_box(v4))))
    });
    group.bench_function("ipv4_legacy_slash8", |b| {
        b.iter(|| black_box(h.filter.ip_group_key(black_box(legacy))))
    });
    group.bench_function("ipv6_unknown_asn", |b| {
        b.iter(|| black_box(h.filter.ip_group_key(black_box(v6))))
    });

    group.finish();
}

pub fn brutal_admission(c: &mut Criterion) {
    let mut group = c.benchmark_group("peer-diversity/brutal/admission");
    group.measurement_time(Duration::from_secs(10));

    for size in [100usize, 1_000, 4_000] {
        let h = populated(size);
        let mut rng = rng();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("add_remove_cycle", size), &size, |b, _| {
            b.iter(|| {
                let peer = NodeId::new(rng.gen());
                let addr = random_host(&mut rng);
                if h.offer(peer, &[addr]) {
                    h.filter.remove(&peer);
                }
            })
        });
    }

    // Adversarial: every offer hits a saturated group
    let h = populated(1_000);
    let mut rng = rng();
    for cpl in 0..10 {
        let peer = id_with_cpl(&mut rng, &h.local, cpl);
        let addr = host_in(&mut rng, 10, 66);
        h.offer(peer, &[addr]);
    }
    group.bench_function("sybil_rejection", |b| {
        b.iter(|| {
            let peer = NodeId::new(rng.gen());
            let addr = host_in(&mut rng, 10, 66);
            black_box(h.offer(peer, &[addr]))
        })
    });

    group.finish();
}

pub fn brutal_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("peer-diversity/brutal/stats");
    group.measurement_time(Duration::from_secs(5));

    for size in [100usize, 4_000] {
        let h = populated(size);
        group.bench_with_input(BenchmarkId::new("diversity_stats", size), &size, |b, _| {
            b.iter(|| black_box(h.filter.diversity_stats()))
        });
    }

    group.finish();
}

pub fn brutal_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("peer-diversity/brutal/contention");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    let h = Arc::new(populated(1_000));
    let threads = 4;
    let per_thread = 250;

    group.throughput(Throughput::Elements((threads * per_thread) as u64));
    group.bench_function("parallel_add_remove_4x250", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let h = h.clone();
                    thread::spawn(move || {
                        let mut rng = rand::rngs::StdRng::seed_from_u64(t as u64);
                        for _ in 0..per_thread {
                            let peer = NodeId::new(rng.gen());
                            let addr = random_host(&mut rng);
                            if h.offer(peer, &[addr]) {
                                h.filter.remove(&peer);
                            }
                        }
                    })
                })
                .collect();
            for handle in handles {
                let _ = handle.join();
            }
        })
    });

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    brutal_group_key(c);
    brutal_admission(c);
    brutal_stats(c);
    brutal_contention(c);
}
