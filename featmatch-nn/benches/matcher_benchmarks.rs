use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use featmatch_core::Descriptor;
use featmatch_nn::{good_matches, normalized_hamming, HammingMatcher, MatchStats};

/// Deterministic pseudo-random descriptors for benchmark inputs
fn synthetic_descriptors(count: usize, seed: u64) -> Vec<Descriptor> {
    let mut state = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    (0..count)
        .map(|_| {
            let mut d = [0u8; 32];
            for byte in d.iter_mut() {
                // xorshift64
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                *byte = (state & 0xFF) as u8;
            }
            d
        })
        .collect()
}

fn bench_hamming_distance(c: &mut Criterion) {
    let a = synthetic_descriptors(1, 1)[0];
    let b = synthetic_descriptors(1, 2)[0];

    c.bench_function("normalized_hamming", |bench| {
        bench.iter(|| normalized_hamming(black_box(&a), black_box(&b)))
    });
}

fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_descriptors");
    let matcher = HammingMatcher::new();

    for size in [100, 500, 1000] {
        let query = synthetic_descriptors(size, 3);
        let train = synthetic_descriptors(size, 4);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bench, _| {
            bench.iter(|| matcher.match_descriptors(black_box(&query), black_box(&train)))
        });
    }
    group.finish();
}

fn bench_filtering(c: &mut Criterion) {
    let matcher = HammingMatcher::new();
    let query = synthetic_descriptors(1000, 5);
    let train = synthetic_descriptors(1000, 6);
    let matches = matcher.match_descriptors(&query, &train);

    c.bench_function("good_matches", |bench| {
        bench.iter(|| {
            let stats = MatchStats::from_matches(black_box(&matches));
            good_matches(black_box(&matches), stats)
        })
    });
}

criterion_group!(benches, bench_hamming_distance, bench_matching, bench_filtering);
criterion_main!(benches);
