use clownlzss::nlz;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// Generates a vector of pseudo-random bytes using a deterministic Linear Congruential Generator (LCG).
///
/// This ensures benchmarks are reproducible across runs. The generated data has high entropy,
/// representing a "worst-case" scenario for the optimal parser (almost every edge is a literal).
///
/// # Parameters
/// * `size` - The number of bytes to generate.
///
/// # Returns
/// A `Vec<u8>` containing the generated random data.
fn generate_random(size: usize) -> Vec<u8> {
    let mut vec = Vec::with_capacity(size);
    // Fixed seed for determinism (0xDEAD_BEEF).
    let mut seed: u64 = 0xDEAD_BEEF;
    for _ in 0..size {
        // Simple LCG: seed = (a * seed + c) % m
        seed = (seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)) & 0xFFFF_FFFF;
        vec.push((seed >> 24) as u8);
    }
    vec
}

/// Generates a vector containing repeated standard text sentences.
///
/// The pattern is "The quick brown fox jumps over the lazy dog. ".
/// This represents "typical" compressible data (text logs, JSON, etc.) with
/// plenty of repeated substrings for the match finder to exploit.
///
/// # Parameters
/// * `size` - The target size in bytes.
///
/// # Returns
/// A `Vec<u8>` filled with the repeated text pattern, truncated to `size`.
fn generate_text(size: usize) -> Vec<u8> {
    let text = b"The quick brown fox jumps over the lazy dog. ";
    let mut vec = Vec::with_capacity(size);
    while vec.len() < size {
        vec.extend_from_slice(text);
    }
    vec.truncate(size);
    vec
}

/// Generates a vector filled with zeroes.
///
/// This represents a "best-case" scenario: the optimal parser should choose
/// overlapping maximum-length matches almost everywhere (`spec.md` §8's "all
/// identical input" boundary).
///
/// # Parameters
/// * `size` - The number of bytes to allocate.
///
/// # Returns
/// A `Vec<u8>` initialized to zero.
fn generate_zeroes(size: usize) -> Vec<u8> {
    vec![0u8; size]
}

/// Benchmarks NLZ compression (optimal parser + emitter) against data patterns
/// spanning the cost spectrum from incompressible to maximally repetitive.
///
/// Scenarios:
/// 1. **Zeroes**: maximal repetition, exercises overlapping-match emission.
/// 2. **Random**: high entropy, every token is a literal.
/// 3. **Text**: moderate entropy, representative of real-world repeated content.
fn bench_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("NLZ Compression");

    // NLZ's header is a 16-bit size, so keep benchmark inputs under 0xFFFF.
    let size = 32 * 1024;

    let scenarios = [
        ("Zeroes", generate_zeroes(size)),
        ("Random", generate_random(size)),
        ("Text", generate_text(size)),
    ];

    for (name, input_data) in &scenarios {
        let bench_name = format!("{name} 32KB");

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(&bench_name, |b| {
            // Pre-allocate output to avoid measuring allocation overhead during the loop.
            let mut output = Vec::with_capacity(size);
            b.iter(|| {
                output.clear();
                nlz::compress_into(black_box(input_data), black_box(&mut output)).unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmarks NLZ decompression throughput.
///
/// Requires pre-compressing the source data before measuring decompression throughput.
/// Throughput is calculated based on the *uncompressed* size to represent the rate
/// of data restoration.
fn bench_decompression(c: &mut Criterion) {
    let mut group = c.benchmark_group("NLZ Decompression");
    let size = 32 * 1024;

    let scenarios = [
        ("Zeroes", generate_zeroes(size)),
        ("Random", generate_random(size)),
        ("Text", generate_text(size)),
    ];

    for (name, source_data) in &scenarios {
        // Setup: Compress the data first so we have a valid source for decompression.
        let compressed_data = nlz::compress(source_data).unwrap();

        let bench_name = format!("{name} 32KB");

        // Throughput metrics are based on the original uncompressed size.
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(&bench_name, |b| {
            let mut output = Vec::with_capacity(size);
            b.iter(|| {
                output.clear();
                // We unwrap here to ensure correctness; if decompression fails, the benchmark should fail.
                nlz::decompress_into(black_box(&compressed_data), black_box(&mut output)).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compression, bench_decompression);
criterion_main!(benches);
