//! NLZ — the one per-format codec this crate specifies in full
//! (`spec.md` §1, §4.4/§4.5, §8; grounded in
//! `examples/original_source/compressors/nlz.h`).
//!
//! A custom LZSS variant (credited upstream to Naoto_NTP) with an 8-bit,
//! low-bit-first, reserve-before-push descriptor byte and four match
//! sub-encodings chosen by distance/length boundaries. This module is both
//! the worked example the core's cost-model contract is built against and
//! the only format in this crate with a compressor.

use crate::bitfield::{DescriptorReader, DescriptorWriter, Endian, Position, Timing, Width};
use crate::core::{CostModel, Match, find_optimal_matches};
use crate::error::{Error, Result};
use crate::io::{ByteInput, ByteOutput, DictionaryOutput, SliceInput, VecOutput};
use crate::moduled::{compress_moduled as compress_moduled_generic, decompress_moduled as decompress_moduled_generic};

/// `0x100 + 17`: the longest match representable by the long-length
/// encoding (`length - 18` must fit a byte, so `length <= 18 + 255`).
const MAXIMUM_MATCH_LENGTH: usize = 0x100 + 17;
/// 12-bit back-reference window.
const MAXIMUM_MATCH_DISTANCE: usize = 0x1000;
/// 1 descriptor bit + 1 payload byte.
const LITERAL_COST: usize = 1 + 8;

/// The NLZ cost model (`compressors/nlz.h`'s `GetMatchCost`, reproduced
/// exactly: its branch order and bit budgets are normative for this
/// format). A `0` result means the `(distance, length)` pair has no
/// encoding, e.g. `length == 2` with `distance > 0x40`.
pub struct NlzCost;

impl CostModel for NlzCost {
    fn literal_cost(&self) -> usize {
        LITERAL_COST
    }

    fn match_cost(&self, distance: usize, length: usize) -> usize {
        if (2..=4).contains(&length) && distance <= 0x40 {
            2 + 8
        } else if (5..=259).contains(&length) && distance <= 0x40 {
            2 + 8 + 8
        } else if (3..=17).contains(&length) {
            2 + 16
        } else if length >= 18 {
            2 + 16 + 8
        } else {
            0
        }
    }
}

// `compressors/nlz.h` builds its writer as
// `BitField::DescriptorFieldWriter<1, WriteWhen::BeforePush, PushWhere::Low,
// Endian::Big, T>` with `T` an 8-bit unit — one descriptor *byte* per 8
// pushed flag bits, reserved as soon as the first bit of a new byte is
// pushed and patched in place as the rest arrive.
fn descriptor_writer() -> DescriptorWriter {
    DescriptorWriter::new(Width::Eight, Timing::BeforePush, Position::Low, Endian::Big)
}

fn descriptor_reader() -> DescriptorReader {
    DescriptorReader::new(Width::Eight, Position::Low, Endian::Big)
}

/// Compresses `data` in the NLZ format, appending to `output`.
///
/// Header: big-endian 16-bit uncompressed size. `data.len()` must fit in
/// 16 bits; larger inputs should go through [`compress_moduled_nlz`].
pub fn compress_into(data: &[u8], output: &mut Vec<u8>) -> Result<()> {
    assert!(
        data.len() <= 0xFFFF,
        "NLZ's header is a 16-bit size; use compress_moduled_nlz for larger inputs"
    );

    let mut writer = VecOutput::new(output);
    writer.write_be16(data.len() as u16)?;

    let matches = find_optimal_matches(
        data,
        1,
        MAXIMUM_MATCH_LENGTH,
        MAXIMUM_MATCH_DISTANCE,
        &NlzCost,
    )?;

    let mut descriptor = descriptor_writer();

    for m in &matches {
        emit_match(&mut writer, &mut descriptor, data, m)?;
    }

    // Terminator: a short-distance-shaped match descriptor ("10") whose
    // payload byte pair can never arise from a real tier-2 match, since
    // tier 2 only ever encodes length >= 5 (length field byte != 0).
    descriptor.push(&mut writer, true)?;
    descriptor.push(&mut writer, false)?;
    writer.write_u8(0xFC)?;
    writer.write_u8(0x00)?;

    descriptor.finish(&mut writer)?;

    Ok(())
}

fn emit_match(
    writer: &mut VecOutput<'_>,
    descriptor: &mut DescriptorWriter,
    data: &[u8],
    m: &Match,
) -> Result<()> {
    if m.is_literal() {
        descriptor.push(writer, false)?;
        writer.write_u8(data[m.destination])?;
        return Ok(());
    }

    let distance = m.distance();
    let length = m.length;

    if (2..=4).contains(&length) && distance <= 0x40 {
        descriptor.push(writer, true)?;
        descriptor.push(writer, false)?;
        writer.write_u8((((distance - 1) & 0x3F) << 2) as u8 | (length - 1) as u8)?;
    } else if (5..=259).contains(&length) && distance <= 0x40 {
        descriptor.push(writer, true)?;
        descriptor.push(writer, false)?;
        writer.write_u8((((distance - 1) & 0x3F) << 2) as u8)?;
        writer.write_u8((length - 4) as u8)?;
    } else if (3..=17).contains(&length) {
        // Long-distance, short-length encoding. The upstream C++ source
        // packs the distance's top nibble with `<< 4` into a value that an
        // `unsigned char` `Write` silently truncates away; reconstructed
        // here (Design Notes' "copy-paste defect" treatment, applied by
        // analogy to Comper) as `>> 4` so the nibble actually lands in the
        // byte, which both the cost accounting (still 2 bytes) and
        // round-trip correctness require.
        descriptor.push(writer, true)?;
        descriptor.push(writer, true)?;
        writer.write_u8(((((distance - 1) >> 8) & 0xF) << 4) as u8 | (length - 2) as u8)?;
        writer.write_u8(((distance - 1) & 0xFF) as u8)?;
    } else {
        debug_assert!(length >= 18);
        descriptor.push(writer, true)?;
        descriptor.push(writer, true)?;
        writer.write_u8(((((distance - 1) >> 8) & 0xF) << 4) as u8)?;
        writer.write_u8(((distance - 1) & 0xFF) as u8)?;
        writer.write_u8((length - 18) as u8)?;
    }

    Ok(())
}

/// Decompresses an NLZ stream, appending to `output`.
pub fn decompress_into(data: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let mut input = SliceInput::new(data);
    let uncompressed_size = input.read_be16()? as usize;
    let start_len = output.len();

    let mut writer = VecOutput::new(output);
    let mut descriptor = descriptor_reader();

    loop {
        if !descriptor.pop(&mut input)? {
            // Literal.
            let byte = input.read_u8()?;
            writer.write_u8(byte)?;
            continue;
        }

        if descriptor.pop(&mut input)? {
            // "11": long-distance encoding (tiers 3/4).
            let b1 = input.read_u8()?;
            let b2 = input.read_u8()?;
            let distance = (((b1 as usize >> 4) & 0xF) << 8 | b2 as usize) + 1;
            let length_field = b1 as usize & 0xF;

            if length_field != 0 {
                writer.copy_match(distance, length_field + 2)?;
            } else {
                let b3 = input.read_u8()?;
                writer.copy_match(distance, b3 as usize + 18)?;
            }
        } else {
            // "10": short-distance encoding (tiers 1/2) or terminator.
            let b1 = input.read_u8()?;
            if b1 & 0x3 != 0 {
                let length = (b1 & 0x3) as usize + 1;
                let distance = ((b1 >> 2) & 0x3F) as usize + 1;
                writer.copy_match(distance, length)?;
            } else {
                let b2 = input.read_u8()?;
                if b2 == 0 {
                    break; // Terminator.
                }
                let length = b2 as usize + 4;
                let distance = ((b1 >> 2) & 0x3F) as usize + 1;
                writer.copy_match(distance, length)?;
            }
        }
    }

    if output.len() - start_len != uncompressed_size {
        return Err(Error::Truncated);
    }

    Ok(())
}

/// Convenience wrapper returning a freshly allocated `Vec<u8>`.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    compress_into(data, &mut output)?;
    Ok(output)
}

/// Convenience wrapper returning a freshly allocated `Vec<u8>`.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress_into(data, &mut output)?;
    Ok(output)
}

/// NLZ wrapped in the moduled format (`spec.md` §4.7), for inputs whose
/// size would overflow NLZ's own 16-bit header.
pub fn compress_moduled(data: &[u8], module_size: usize) -> Result<Vec<u8>> {
    compress_moduled_generic(data, module_size, compress)
}

pub fn decompress_moduled(data: &[u8]) -> Result<Vec<u8>> {
    decompress_moduled_generic(data, decompress)
}
