//! # Peer-Diversity Benchmarks
//!
//! Performance validation for the admission path:
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | Grouping | IPv4 /16, legacy /8, IPv6 ASN key | < 200ns |
//! | Admission | `try_add` + `remove` on 4k-peer table | < 10µs |
//! | Sybil flood | rejected `try_add` | < 5µs |
//! | Stats | `diversity_stats` snapshot, 4k peers | < 1ms |

use criterion::{criterion_group, criterion_main, Criterion};
use pd_tests::benchmarks::filter;

fn bench_filter(c: &mut Criterion) {
    filter::register_benchmarks(c);
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
