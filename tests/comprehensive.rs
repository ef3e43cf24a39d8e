use clownlzss::{comper, moduled, nlz, rocket};

// --- Helpers ---

#[track_caller]
fn assert_nlz_round_trip(input: &[u8]) {
    let compressed = nlz::compress(input).expect("compression failed");
    let decompressed = nlz::decompress(&compressed).expect("decompression failed");
    assert_eq!(decompressed, input, "round-trip output mismatches input");
}

fn pseudorandom(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            (state >> 33) as u8
        })
        .collect()
}

/// Installs a logger so the `debug!`/`trace!` points in `moduled.rs` have
/// somewhere to go when these tests run with `RUST_LOG` set. Safe to call
/// from more than one test: unlike `env_logger::init()`, `try_init()`
/// doesn't panic if a logger is already installed.
fn init_logging() {
    let _ = env_logger::try_init();
}

// --- NLZ: basic sanity and boundaries ---

#[test]
fn t01_empty_input() {
    assert_nlz_round_trip(b"");
}

#[test]
fn t02_single_byte() {
    assert_nlz_round_trip(b"A");
}

#[test]
fn t03_tiny_string() {
    assert_nlz_round_trip(b"Hi");
}

#[test]
fn t04_all_byte_values() {
    let input: Vec<u8> = (0..=255).collect();
    assert_nlz_round_trip(&input);
}

#[test]
fn t05_incrementing_pattern_incompressible() {
    // No repeats of length >= 2, so every token is a literal.
    let input: Vec<u8> = (0..=255).collect();
    let compressed = nlz::compress(&input).unwrap();
    assert!(compressed.len() > input.len());
    assert_nlz_round_trip(&input);
}

// --- NLZ: tier boundaries (spec.md's 4-tier match encoding) ---

#[test]
fn t06_tier1_short_distance_short_length() {
    // Run of 4 identical bytes: distance 1, length 4 (tier 1's upper edge).
    assert_nlz_round_trip(&vec![b'A'; 4]);
}

#[test]
fn t07_tier2_short_distance_long_length() {
    // Distance 1, length 259 (tier 2's upper edge: length - 4 must fit a byte).
    assert_nlz_round_trip(&vec![b'A'; 259]);
}

#[test]
fn t08_tier3_long_distance_short_length() {
    let mut input = vec![0u8; 0x200];
    input[0] = b'X';
    input[1] = b'Y';
    input[2] = b'Z';
    // Distance 0x200 (> 0x40, forcing tier 3/4), length 3.
    input.extend_from_slice(b"XYZ");
    assert_nlz_round_trip(&input);
}

#[test]
fn t09_tier4_long_distance_long_length() {
    let mut input = vec![0u8; 0x500];
    let pattern: Vec<u8> = (0..40u8).collect();
    input.extend_from_slice(&pattern);
    input.extend(vec![0xFFu8; 0x300]); // push the repeat past 0x40 distance
    input.extend_from_slice(&pattern);
    assert_nlz_round_trip(&input);
}

#[test]
fn t10_distance_past_12_bit_window_falls_back_to_literals() {
    // The only prior occurrence of "needle" sits more than 0x1000 bytes
    // back, outside the maximum match distance; the parser must skip that
    // edge and fall back to literals rather than emit an invalid distance.
    let mut input = Vec::new();
    input.extend_from_slice(b"needle");
    input.extend(vec![0u8; 5000]);
    input.extend_from_slice(b"needle");
    assert_nlz_round_trip(&input);
}

// --- NLZ: compression-quality sanity (not exact-size, just "it compresses") ---

#[test]
fn t11_rle_simple() {
    let input = vec![b'A'; 100];
    let compressed = nlz::compress(&input).unwrap();
    assert!(compressed.len() < 10);
    assert_nlz_round_trip(&input);
}

#[test]
fn t12_all_zeros() {
    let input = vec![0u8; 1024];
    let compressed = nlz::compress(&input).unwrap();
    assert!(compressed.len() < 40);
    assert_nlz_round_trip(&input);
}

#[test]
fn t13_repeating_phrases() {
    let phrase = b"The quick brown fox jumps over the lazy dog. ";
    let mut input = Vec::new();
    for _ in 0..50 {
        input.extend_from_slice(phrase);
    }
    let compressed = nlz::compress(&input).unwrap();
    assert!(compressed.len() < input.len() / 4);
    assert_nlz_round_trip(&input);
}

#[test]
fn t14_distant_match_within_window() {
    let mut input = Vec::new();
    input.extend_from_slice(b"ABC");
    input.extend(vec![0xFFu8; 3000]);
    input.extend_from_slice(b"ABC");
    assert_nlz_round_trip(&input);
}

#[test]
fn t15_pseudorandom_noise() {
    for (len, seed) in [(0, 1), (1, 2), (2, 3), (16, 4), (4096, 5)] {
        assert_nlz_round_trip(&pseudorandom(len, seed));
    }
}

#[test]
fn t16_fibonacci_content() {
    let mut input = vec![1u8, 1];
    for _ in 0..1000 {
        let next = input[input.len() - 1].wrapping_add(input[input.len() - 2]);
        input.push(next);
    }
    assert_nlz_round_trip(&input);
}

#[test]
fn t17_unicode_bytes() {
    assert_nlz_round_trip("おはようございます".as_bytes());
}

// --- NLZ: decode error handling ---

#[test]
fn t18_decompress_truncated_header() {
    assert!(matches!(
        nlz::decompress(&[0x00]),
        Err(clownlzss::Error::UnexpectedEof)
    ));
}

#[test]
fn t19_decompress_truncated_mid_stream() {
    let compressed = nlz::compress(b"hello world").unwrap();
    let truncated = &compressed[..compressed.len() - 2];
    assert!(nlz::decompress(truncated).is_err());
}

#[test]
fn t20_decompress_offset_before_start() {
    // Descriptor byte 0x01 (bits: match, short-distance), byte1 0x01
    // decodes to a tier-1 match of distance 1, length 2 as the very first
    // token — invalid, since nothing has been written yet to copy from.
    let data = vec![0x00, 0x02, 0x01, 0x01];
    assert!(matches!(
        nlz::decompress(&data),
        Err(clownlzss::Error::InvalidOffset)
    ));
}

// --- NLZ moduled wrapper ---

#[test]
fn t21_moduled_round_trip_exact_multiple() {
    init_logging();
    let input: Vec<u8> = (0..0x3000u32).map(|i| (i % 251) as u8).collect();
    let compressed = nlz::compress_moduled(&input, 0x1000).unwrap();
    assert_eq!(nlz::decompress_moduled(&compressed).unwrap(), input);
}

#[test]
fn t22_moduled_round_trip_uneven_remainder() {
    let input = pseudorandom(0x2500, 42);
    let compressed = nlz::compress_moduled(&input, 0x1000).unwrap();
    assert_eq!(nlz::decompress_moduled(&compressed).unwrap(), input);
}

#[test]
fn t23_moduled_empty_input() {
    let compressed = nlz::compress_moduled(&[], 0x1000).unwrap();
    assert_eq!(nlz::decompress_moduled(&compressed).unwrap(), Vec::<u8>::new());
}

#[test]
fn t24_moduled_generic_over_other_compressors() {
    // The moduled wrapper isn't NLZ-specific: it just needs a
    // compress_one/decompress_one pair.
    let input = pseudorandom(0x2800, 7);
    let compressed =
        moduled::compress_moduled(&input, 0x800, nlz::compress).unwrap();
    let decompressed =
        moduled::decompress_moduled(&compressed, nlz::decompress).unwrap();
    assert_eq!(decompressed, input);
}

// --- Comper (decompress only) ---

#[test]
fn t25_comper_literal_stream() {
    // Descriptor word 0x2000: bit15=0, bit14=0, bit13=1 (high-bit-first),
    // so two literal pairs followed by a match token used as terminator.
    let mut stream = Vec::new();
    stream.extend(0x2000u16.to_be_bytes());
    stream.extend([0x01, 0x02, 0x03, 0x04]); // two literal pairs
    stream.extend([0x00, 0x00]); // terminator: count byte 0
    assert_eq!(
        comper::decompress(&stream).unwrap(),
        vec![0x01, 0x02, 0x03, 0x04]
    );
}

#[test]
fn t26_comper_truncated_input_errors() {
    let stream = vec![0x80]; // half a descriptor word
    assert!(comper::decompress(&stream).is_err());
}

// --- Rocket (decompress only) ---

#[test]
fn t27_rocket_empty_stream() {
    let stream = vec![0x00, 0x00, 0x00, 0x00];
    assert_eq!(rocket::decompress(&stream).unwrap(), Vec::<u8>::new());
}

#[test]
fn t28_rocket_literal_stream() {
    let stream = vec![0x00, 0x03, 0x00, 0x04, 0x07, 0xAA, 0xBB, 0xCC];
    assert_eq!(rocket::decompress(&stream).unwrap(), vec![0xAA, 0xBB, 0xCC]);
}

// --- Core engine properties ---

#[test]
fn t29_core_cost_model_rejects_unencodable_distance() {
    use clownlzss::{CostModel, find_optimal_matches};

    struct NoMatches;
    impl CostModel for NoMatches {
        fn literal_cost(&self) -> usize {
            0 // forbid literals too, forcing Unencodable for any non-empty input
        }
        fn match_cost(&self, _distance: usize, _length: usize) -> usize {
            0
        }
    }

    let result = find_optimal_matches(b"abc", 1, 10, 10, &NoMatches);
    assert!(matches!(result, Err(clownlzss::Error::Unencodable)));
}

#[test]
fn t30_core_empty_input_yields_no_tokens() {
    assert!(nlz::compress(&[]).is_ok());
    let matches = clownlzss::find_optimal_matches(&[], 1, 10, 10, &nlz::NlzCost).unwrap();
    assert!(matches.is_empty());
}
