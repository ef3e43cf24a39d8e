//! Byte I/O adapters (`spec.md` §4.1).
//!
//! Every adapter in this module exposes the same small surface —
//! `Read`/`Write`, big/little-endian 16-bit helpers built on top of it,
//! `Fill`, and `Tell`/`Seek`/`Distance` — over either a random-access buffer
//! (slice/`Vec`) or a `std::io` stream. Positions are plain `usize` byte
//! offsets in both variants, which is all any format in this crate needs;
//! the Design Notes' "runtime interface or generics" choice is resolved
//! here as ordinary trait-bound generics, not a vtable.

use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::{Error, Result};

/// A source of bytes with a trackable, seekable cursor.
pub trait ByteInput {
    fn read_u8(&mut self) -> Result<u8>;

    fn read_be16(&mut self) -> Result<u16> {
        let upper = self.read_u8()? as u16;
        let lower = self.read_u8()? as u16;
        Ok(upper << 8 | lower)
    }

    fn read_le16(&mut self) -> Result<u16> {
        let lower = self.read_u8()? as u16;
        let upper = self.read_u8()? as u16;
        Ok(upper << 8 | lower)
    }

    fn tell(&self) -> usize;
    fn seek_to(&mut self, position: usize);

    fn distance(&self, first: usize) -> isize {
        self.tell() as isize - first as isize
    }
}

/// A sink of bytes with a trackable, seekable cursor.
pub trait ByteOutput {
    fn write_u8(&mut self, value: u8) -> Result<()>;

    fn write_be16(&mut self, value: u16) -> Result<()> {
        self.write_u8((value >> 8) as u8)?;
        self.write_u8((value & 0xFF) as u8)
    }

    fn write_le16(&mut self, value: u16) -> Result<()> {
        self.write_u8((value & 0xFF) as u8)?;
        self.write_u8((value >> 8) as u8)
    }

    fn fill(&mut self, value: u8, count: usize) -> Result<()> {
        for _ in 0..count {
            self.write_u8(value)?;
        }
        Ok(())
    }

    fn tell(&self) -> usize;
    fn seek_to(&mut self, position: usize);

    fn distance(&self, first: usize) -> isize {
        self.tell() as isize - first as isize
    }
}

/// An output that can copy already-produced bytes as an LZSS match, forming
/// the sliding-window dictionary described in `spec.md` §4.6.
pub trait DictionaryOutput: ByteOutput {
    /// Copy `count` bytes that were written `distance` bytes ago to the
    /// current write position. Overlap (`distance < count`) is expected and
    /// must reproduce run-length patterns byte-by-byte, not via `memcpy`.
    fn copy_match(&mut self, distance: usize, count: usize) -> Result<()>;
}

// --- Random-access (slice/Vec) variant ---------------------------------

/// Random-access input over an in-memory byte slice.
pub struct SliceInput<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceInput<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos.min(self.data.len())
    }
}

impl ByteInput for SliceInput<'_> {
    fn read_u8(&mut self) -> Result<u8> {
        let byte = *self.data.get(self.pos).ok_or(Error::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }

    fn tell(&self) -> usize {
        self.pos
    }

    fn seek_to(&mut self, position: usize) {
        self.pos = position;
    }
}

/// A length-bounded view over a [`SliceInput`] (`spec.md` §4.1,
/// `DecompressorInputWithLength`). Answers `at_end` by comparing the
/// current position to a declared end, independent of the slice's own
/// length.
pub struct BoundedSliceInput<'a> {
    inner: SliceInput<'a>,
    end: usize,
}

impl<'a> BoundedSliceInput<'a> {
    pub fn new(data: &'a [u8], length: usize) -> Self {
        let inner = SliceInput::new(data);
        let end = inner.tell() + length;
        Self { inner, end }
    }

    pub fn at_end(&self) -> bool {
        self.inner.tell() >= self.end
    }
}

impl ByteInput for BoundedSliceInput<'_> {
    fn read_u8(&mut self) -> Result<u8> {
        self.inner.read_u8()
    }

    fn tell(&self) -> usize {
        self.inner.tell()
    }

    fn seek_to(&mut self, position: usize) {
        self.inner.seek_to(position);
    }
}

/// A second, independent cursor into the same slice (`spec.md` §4.1,
/// `DecompressorInputSeparate`). For a random-access medium this needs no
/// swap-in/swap-out dance: the two cursors simply never interact, matching
/// `decompressors/common.h`'s random-access specialisation, which is a bare
/// type alias over the ordinary input.
pub type SeparateSliceInput<'a> = SliceInput<'a>;

/// Random-access output over a growable `Vec<u8>`, supporting both
/// append-at-end writes and seek-then-overwrite (used to patch
/// already-written header fields once a size becomes known).
pub struct VecOutput<'a> {
    buffer: &'a mut Vec<u8>,
    pos: usize,
}

impl<'a> VecOutput<'a> {
    pub fn new(buffer: &'a mut Vec<u8>) -> Self {
        let pos = buffer.len();
        Self { buffer, pos }
    }
}

impl ByteOutput for VecOutput<'_> {
    fn write_u8(&mut self, value: u8) -> Result<()> {
        if self.pos < self.buffer.len() {
            self.buffer[self.pos] = value;
        } else {
            self.buffer
                .try_reserve(1)
                .map_err(|_| Error::AllocationFailure("growing output buffer"))?;
            self.buffer.push(value);
        }
        self.pos += 1;
        Ok(())
    }

    fn tell(&self) -> usize {
        self.pos
    }

    fn seek_to(&mut self, position: usize) {
        self.pos = position;
    }
}

impl DictionaryOutput for VecOutput<'_> {
    fn copy_match(&mut self, distance: usize, count: usize) -> Result<()> {
        if distance > self.pos {
            return Err(Error::InvalidOffset);
        }

        self.buffer
            .try_reserve(count)
            .map_err(|_| Error::AllocationFailure("growing output buffer"))?;

        // Byte-by-byte, not a block copy: overlap (distance < count) must
        // reproduce run-length patterns, which a `memcpy`/`copy_within`
        // cannot do for distance < count. `start` is fixed before the loop
        // since `write_u8` advances `self.pos` every iteration.
        let start = self.pos;
        for i in 0..count {
            let source_index = start - distance + i;
            let value = self.buffer[source_index];
            self.write_u8(value)?;
        }

        Ok(())
    }
}

// --- Stream (`std::io`) variant -----------------------------------------

/// A byte-oriented stream input, tracking its own position since arbitrary
/// `Read` implementors cannot `Seek`.
pub struct StreamInput<R: Read> {
    inner: R,
    pos: usize,
}

impl<R: Read> StreamInput<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }
}

impl<R: Read> ByteInput for StreamInput<R> {
    fn read_u8(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.inner
            .read_exact(&mut byte)
            .map_err(|_| Error::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte[0])
    }

    fn tell(&self) -> usize {
        self.pos
    }

    fn seek_to(&mut self, _position: usize) {
        // A plain `Read` cannot seek backwards; formats in this crate never
        // need to, since `StreamInput` is the append-only, forward-only
        // counterpart of `SliceInput`.
        unimplemented!("StreamInput does not support seeking; use SliceInput for random access")
    }
}

/// A length-bounded stream input (`spec.md` §4.1,
/// `DecompressorInputWithLength`, `std::istream` specialisation).
pub struct BoundedStreamInput<R: Read> {
    inner: StreamInput<R>,
    end: usize,
}

impl<R: Read> BoundedStreamInput<R> {
    pub fn new(inner: R, length: usize) -> Self {
        let inner = StreamInput::new(inner);
        let end = inner.tell() + length;
        Self { inner, end }
    }

    pub fn at_end(&self) -> bool {
        self.inner.tell() >= self.end
    }
}

impl<R: Read> ByteInput for BoundedStreamInput<R> {
    fn read_u8(&mut self) -> Result<u8> {
        self.inner.read_u8()
    }

    fn tell(&self) -> usize {
        self.inner.tell()
    }

    fn seek_to(&mut self, position: usize) {
        self.inner.seek_to(position);
    }
}

/// A second, independent cursor sharing one physical stream
/// (`spec.md` §4.1, `DecompressorInputSeparate`, `std::istream`
/// specialisation). Every read saves the shared stream's position,
/// restores this cursor's own, reads, then swaps back — supporting
/// decoders that interleave reads from two logical positions in one
/// physical stream.
pub struct SeparateStreamInput<'a, R: Read + Seek> {
    shared: &'a mut R,
    own_pos: u64,
}

impl<'a, R: Read + Seek> SeparateStreamInput<'a, R> {
    pub fn new(shared: &'a mut R) -> std::io::Result<Self> {
        let own_pos = shared.stream_position()?;
        Ok(Self { shared, own_pos })
    }
}

impl<R: Read + Seek> ByteInput for SeparateStreamInput<'_, R> {
    fn read_u8(&mut self) -> Result<u8> {
        let previous = self.shared.stream_position()?;
        self.shared.seek(SeekFrom::Start(self.own_pos))?;
        let mut byte = [0u8; 1];
        self.shared
            .read_exact(&mut byte)
            .map_err(|_| Error::UnexpectedEof)?;
        self.own_pos = self.shared.stream_position()?;
        self.shared.seek(SeekFrom::Start(previous))?;
        Ok(byte[0])
    }

    fn tell(&self) -> usize {
        self.own_pos as usize
    }

    fn seek_to(&mut self, position: usize) {
        self.own_pos = position as u64;
    }
}

/// A byte-oriented stream output requiring `Seek` so that header fields
/// written before their value is known can be patched in place, mirroring
/// the `std::ostream` specialisation's `seekp`/`tellp`.
pub struct StreamOutput<W: Write + Seek> {
    inner: W,
}

impl<W: Write + Seek> StreamOutput<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write + Seek> ByteOutput for StreamOutput<W> {
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.inner.write_all(&[value])?;
        Ok(())
    }

    fn tell(&self) -> usize {
        self.inner
            .stream_position()
            .expect("stream_position should not fail on a writable stream") as usize
    }

    fn seek_to(&mut self, position: usize) {
        self.inner
            .seek(SeekFrom::Start(position as u64))
            .expect("seek should not fail on a writable stream");
    }
}

/// Dictionary-backed output for streams that cannot read their own tail
/// (`spec.md` §4.6). Keeps a circular buffer of size
/// `dictionary_size + maximum_copy_length`; the leading
/// `maximum_copy_length` real positions of each cycle are additionally
/// mirrored past the end of the window (at `dictionary_size + index`, for
/// `index` the real position within the window) so any copy of up to
/// `maximum_copy_length` bytes starting anywhere in the window reads out
/// contiguously, without wrap handling. The buffer needs one more byte
/// than the mirrored span alone (`maximum_copy_length - 1` *offsets* past
/// `dictionary_size`) because the highest mirrored index,
/// `maximum_copy_length - 1`, lands at `dictionary_size + maximum_copy_length
/// - 1`, which is the buffer's last valid index only when the buffer has
/// `dictionary_size + maximum_copy_length` elements.
pub struct StreamDictionaryOutput<W: Write> {
    inner: W,
    buffer: Vec<u8>,
    dictionary_size: usize,
    maximum_copy_length: usize,
    index: usize,
    pos: usize,
}

impl<W: Write> StreamDictionaryOutput<W> {
    pub fn new(
        inner: W,
        dictionary_size: usize,
        maximum_copy_length: usize,
        filler_value: u8,
    ) -> Self {
        Self {
            inner,
            buffer: vec![filler_value; dictionary_size + maximum_copy_length],
            dictionary_size,
            maximum_copy_length,
            index: 0,
            pos: 0,
        }
    }

    fn write_to_buffer(&mut self, value: u8) {
        self.buffer[self.index] = value;
        if self.index < self.maximum_copy_length {
            self.buffer[self.dictionary_size + self.index] = value;
        }
        self.index = (self.index + 1) % self.dictionary_size;
    }
}

impl<W: Write> ByteOutput for StreamDictionaryOutput<W> {
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_to_buffer(value);
        self.inner.write_all(&[value])?;
        self.pos += 1;
        Ok(())
    }

    fn tell(&self) -> usize {
        self.pos
    }

    fn seek_to(&mut self, _position: usize) {
        unimplemented!("StreamDictionaryOutput is append-only")
    }
}

impl<W: Write> DictionaryOutput for StreamDictionaryOutput<W> {
    fn copy_match(&mut self, distance: usize, count: usize) -> Result<()> {
        if distance > self.pos {
            return Err(Error::InvalidOffset);
        }

        let source_index = (self.index + self.dictionary_size - distance) % self.dictionary_size;
        for i in 0..count {
            self.write_to_buffer(self.buffer[source_index + i]);
        }
        self.inner
            .write_all(&self.buffer[source_index..source_index + count])?;
        self.pos += count;
        Ok(())
    }
}
