//! Bit-field descriptor packer/unpacker (`spec.md` §4.2).
//!
//! Materializes a stream of single-bit "descriptor" flags into whole bytes
//! or 16-bit words interleaved with payload bytes written through the same
//! [`ByteOutput`]/[`ByteInput`]. Four axes of configuration are exposed,
//! matching the spec one-for-one: chunk [`Width`], [`Timing`] of the
//! chunk's write relative to its first bit, bit [`Position`] (low/high end
//! first), and [`Endian`] for multi-byte chunks. Direction (`Push` vs
//! `Pop`) is which of [`DescriptorWriter`]/[`DescriptorReader`] you use,
//! rather than a further configuration axis.

use crate::error::Result;
use crate::io::{ByteInput, ByteOutput};

/// Bits materialized per descriptor chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    One,
    Eight,
    Sixteen,
}

impl Width {
    fn bits(self) -> u32 {
        match self {
            Width::One => 1,
            Width::Eight => 8,
            Width::Sixteen => 16,
        }
    }
}

/// When an encode-side chunk is written to the sink relative to its first
/// bit being pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// Reserve the chunk's bytes in the output as soon as the first bit of
    /// a new chunk is pushed, then patch them in place (via `Seek`) on
    /// every subsequent push into that chunk.
    BeforePush,
    /// Buffer bits in memory and write the chunk to the output only once it
    /// fills (or the stream ends).
    AfterFill,
}

/// Which end of the chunk newly pushed/popped bits occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Low,
    High,
}

/// Byte order used when a chunk is more than one byte wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

fn shift_for(position: Position, width_bits: u32, index_in_chunk: u32) -> u32 {
    match position {
        Position::Low => index_in_chunk,
        Position::High => width_bits - 1 - index_in_chunk,
    }
}

/// Encode-side (`Push`) half of the descriptor bit packer.
pub struct DescriptorWriter {
    width: Width,
    timing: Timing,
    position: Position,
    endian: Endian,
    chunk_value: u32,
    bits_in_chunk: u32,
    reserved_pos: usize,
}

impl DescriptorWriter {
    pub fn new(width: Width, timing: Timing, position: Position, endian: Endian) -> Self {
        Self {
            width,
            timing,
            position,
            endian,
            chunk_value: 0,
            bits_in_chunk: 0,
            reserved_pos: 0,
        }
    }

    fn write_chunk<O: ByteOutput>(&self, output: &mut O) -> Result<()> {
        match self.width {
            Width::One | Width::Eight => output.write_u8(self.chunk_value as u8),
            Width::Sixteen => match self.endian {
                Endian::Big => output.write_be16(self.chunk_value as u16),
                Endian::Little => output.write_le16(self.chunk_value as u16),
            },
        }
    }

    /// Push a single descriptor bit, interleaving the chunk's bytes with
    /// whatever payload the caller writes to `output` around each call.
    pub fn push<O: ByteOutput>(&mut self, output: &mut O, bit: bool) -> Result<()> {
        let width_bits = self.width.bits();

        if self.bits_in_chunk == 0 && self.timing == Timing::BeforePush {
            self.reserved_pos = output.tell();
            self.write_chunk(output)?; // reserve with a zeroed placeholder
        }

        let shift = shift_for(self.position, width_bits, self.bits_in_chunk);
        if bit {
            self.chunk_value |= 1 << shift;
        }
        self.bits_in_chunk += 1;

        if self.timing == Timing::BeforePush {
            let resume_pos = output.tell();
            output.seek_to(self.reserved_pos);
            self.write_chunk(output)?;
            output.seek_to(resume_pos);
        }

        if self.bits_in_chunk == width_bits {
            self.bits_in_chunk = 0;
            self.chunk_value = 0;
        }

        Ok(())
    }

    /// Flush a partially filled chunk at end-of-stream. A no-op for
    /// [`Timing::BeforePush`], whose chunks are always already committed.
    pub fn finish<O: ByteOutput>(&mut self, output: &mut O) -> Result<()> {
        if self.timing == Timing::AfterFill && self.bits_in_chunk > 0 {
            self.write_chunk(output)?;
            self.bits_in_chunk = 0;
            self.chunk_value = 0;
        }
        Ok(())
    }
}

/// Decode-side (`Pop`) half of the descriptor bit packer.
pub struct DescriptorReader {
    width: Width,
    position: Position,
    endian: Endian,
    chunk_value: u32,
    bits_in_chunk: u32,
}

impl DescriptorReader {
    pub fn new(width: Width, position: Position, endian: Endian) -> Self {
        Self {
            width,
            position,
            endian,
            chunk_value: 0,
            bits_in_chunk: 0,
        }
    }

    fn read_chunk<I: ByteInput>(&mut self, input: &mut I) -> Result<()> {
        self.chunk_value = match self.width {
            Width::One | Width::Eight => input.read_u8()? as u32,
            Width::Sixteen => match self.endian {
                Endian::Big => input.read_be16()? as u32,
                Endian::Little => input.read_le16()? as u32,
            },
        };
        Ok(())
    }

    /// Pop a single descriptor bit. Pulls a fresh chunk from `input` on the
    /// first call and every time the previous chunk is exhausted.
    pub fn pop<I: ByteInput>(&mut self, input: &mut I) -> Result<bool> {
        let width_bits = self.width.bits();

        if self.bits_in_chunk == 0 {
            self.read_chunk(input)?;
        }

        let shift = shift_for(self.position, width_bits, self.bits_in_chunk);
        let bit = (self.chunk_value >> shift) & 1 != 0;
        self.bits_in_chunk += 1;

        if self.bits_in_chunk == width_bits {
            self.bits_in_chunk = 0;
        }

        Ok(bit)
    }
}
