//! Comper — decompression only (`spec.md` §1's "external collaborator"
//! formats; grounded in
//! `examples/original_source/decompressors/comper.h`). No corresponding
//! compressor exists in the retrieved sources, so none is reconstructed
//! here; see `DESIGN.md` for the scope decision.
//!
//! A word-oriented LZSS variant: every literal and every dictionary match
//! moves data two bytes at a time, with a 16-bit, high-bit-first descriptor
//! field read up front each time it empties.

use crate::bitfield::{DescriptorReader, Endian, Position, Width};
use crate::error::Result;
use crate::io::{ByteInput, ByteOutput, DictionaryOutput, SliceInput, VecOutput};

/// Dictionary window: `(0xFF + 1) * 2` bytes.
const MAXIMUM_COPY_LENGTH: usize = (0xFF + 1) * 2;

/// Decompresses a Comper stream, appending to `output`. There is no size
/// header; the stream ends at its own terminator token (a match whose
/// count field is zero).
pub fn decompress_into(data: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let mut input = SliceInput::new(data);
    let mut writer = VecOutput::new(output);
    let mut descriptor = DescriptorReader::new(Width::Sixteen, Position::High, Endian::Big);

    loop {
        if descriptor.pop(&mut input)? {
            let offset_byte = input.read_u8()?;
            let count_byte = input.read_u8()?;
            let count = (count_byte as usize + 1) * 2;

            if count_byte == 0 {
                break;
            }

            let offset = (0x100 - offset_byte as usize) * 2;
            debug_assert!(count <= MAXIMUM_COPY_LENGTH);
            writer.copy_match(offset, count)?;
        } else {
            let a = input.read_u8()?;
            let b = input.read_u8()?;
            writer.write_u8(a)?;
            writer.write_u8(b)?;
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
