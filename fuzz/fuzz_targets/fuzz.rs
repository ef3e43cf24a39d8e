#![no_main]

use clownlzss::{comper, nlz, rocket};
use libfuzzer_sys::fuzz_target;

/// Verifies that every decompressor safely handles arbitrary, potentially
/// malformed input.
///
/// This simulates scenarios involving corrupted files, malicious payloads, or
/// random noise.
///
/// # Invariant
/// Each decompressor must return either `Ok(_)` or `Err(_)`. It must **never**
/// panic or cause memory safety violations (segfaults), regardless of the
/// input data (`spec.md` §7's "no partial output exposed on failure").
fn verify_decompression_robustness(data: &[u8]) {
    let _ = nlz::decompress(data);
    let _ = nlz::decompress_moduled(data);
    let _ = comper::decompress(data);
    let _ = rocket::decompress(data);
}

/// Verifies the lossless "round-trip" property of NLZ compression, wrapped
/// in the moduled format so arbitrary-length fuzz inputs never trip NLZ's
/// own 16-bit header limit.
///
/// # Invariant
/// `decompress_moduled(compress_moduled(data)) == data`
///
/// If this invariant fails, it implies one of three critical issues:
/// 1. The compressor discarded information.
/// 2. The decompressor corrupted the restored data.
/// 3. The compressor produced output that the decompressor rejects as invalid.
///
/// # Panics
/// This function panics if the decompressed output does not bit-match the
/// input, or if either half of the round trip returns an error. These
/// panics signal a fuzzing failure.
fn verify_round_trip(data: &[u8]) {
    const MODULE_SIZE: usize = 0x1000;

    let compressed = match nlz::compress_moduled(data, MODULE_SIZE) {
        Ok(compressed) => compressed,
        Err(e) => panic!("compression failed on valid input: {e:?}\nInput len: {}", data.len()),
    };

    match nlz::decompress_moduled(&compressed) {
        Ok(decompressed) => {
            if decompressed != data {
                panic!(
                    "Round-trip mismatch!\nInput len: {}\nCompressed len: {}\nDecompressed len: {}",
                    data.len(),
                    compressed.len(),
                    decompressed.len()
                );
            }
        }
        Err(e) => {
            panic!(
                "Round-trip failed! Decompressor rejected valid compressed data.\nError: {e:?}\nInput len: {}",
                data.len()
            );
        }
    }
}

fuzz_target!(|data: &[u8]| {
    // 1. Robustness: Ensure random noise doesn't crash any decompressor.
    verify_decompression_robustness(data);

    // 2. Correctness: Ensure valid data survives NLZ's compress-decompress cycle.
    verify_round_trip(data);
});
