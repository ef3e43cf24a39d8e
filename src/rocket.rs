//! Rocket Knight Adventures — decompression only (`spec.md` §1's "external
//! collaborator" formats; grounded in
//! `examples/original_source/decompressors/rocket.h`). No corresponding
//! compressor exists in the retrieved sources; see `DESIGN.md` for the
//! scope decision.
//!
//! A fixed 1024-byte circular dictionary seeded with filler, addressed by
//! an absolute position modulo the window size rather than an explicit
//! back-reference distance — [`StreamDictionaryOutput`] exists precisely
//! for this "cannot assume the whole output is addressable, window is
//! pre-filled" shape.

use crate::bitfield::{DescriptorReader, Endian, Position, Width};
use crate::error::Result;
use crate::io::{ByteInput, ByteOutput, DictionaryOutput, SliceInput, StreamDictionaryOutput};

const DICTIONARY_SIZE: usize = 0x400;
const MAXIMUM_COPY_LENGTH: usize = 0x40;
const FILLER: u8 = 0x20;

/// Decompresses a Rocket stream, appending to `output`.
///
/// Header: big-endian 16-bit uncompressed size, then big-endian 16-bit
/// compressed size. Decoding stops once either the input or the output has
/// consumed/produced its declared size, matching the upstream decoder's
/// dual loop bound (rather than a single terminator token).
pub fn decompress_into(data: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let mut input = SliceInput::new(data);
    let uncompressed_size = input.read_be16()? as usize;
    let compressed_size = input.read_be16()? as usize;
    let input_start = input.tell();

    let mut writer = StreamDictionaryOutput::new(output, DICTIONARY_SIZE, MAXIMUM_COPY_LENGTH, FILLER);
    let mut descriptor = DescriptorReader::new(Width::Eight, Position::Low, Endian::Big);

    while input.tell() - input_start < compressed_size && writer.tell() < uncompressed_size {
        if descriptor.pop(&mut input)? {
            // Bit set: uncompressed byte. (Opposite sense from NLZ, where a
            // set bit means "match" — each format's descriptor polarity is
            // its own.)
            let byte = input.read_u8()?;
            writer.write_u8(byte)?;
        } else {
            let word = input.read_be16()? as usize;
            let dictionary_index = (word + 0x40) % DICTIONARY_SIZE;
            let count = (word >> 10) + 1;
            let position = writer.tell();

            // `(position - dictionary_index - 1) mod 0x400 + 1`, done with
            // wrapping arithmetic since `position` can be smaller than
            // `dictionary_index`; the modulus being a power of two makes
            // this equivalent to the unsigned-wraparound trick the
            // original takes by adding 0x400 before subtracting.
            let distance = position.wrapping_sub(dictionary_index).wrapping_sub(1) % DICTIONARY_SIZE + 1;

            writer.copy_match(distance, count)?;
        }
    }

    Ok(())
}

/// Convenience wrapper returning a freshly allocated `Vec<u8>`.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress_into(data, &mut output)?;
    Ok(output)
}
