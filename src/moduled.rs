//! Moduled wrapper (`spec.md` §4.7).
//!
//! Splits an oversized input into fixed-size modules, compresses each
//! independently with the same per-format routine, and concatenates the
//! results behind a small header. Generic over any per-format
//! compress/decompress pair, demonstrated in this crate by [`crate::nlz`].

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::io::{ByteInput, ByteOutput, SliceInput, VecOutput};

/// Compresses `data` as a sequence of independently compressed modules of
/// at most `module_size` values each (the final module may be shorter).
///
/// Layout: a big-endian 32-bit total uncompressed size, then for each
/// module a big-endian 16-bit *unpadded* compressed size followed by that
/// many compressed bytes, padded with a trailing zero byte to keep the
/// next module's header 2-byte aligned.
pub fn compress_moduled<F>(data: &[u8], module_size: usize, mut compress_one: F) -> Result<Vec<u8>>
where
    F: FnMut(&[u8]) -> Result<Vec<u8>>,
{
    assert!(module_size > 0);

    let mut output = Vec::new();
    {
        let mut writer = VecOutput::new(&mut output);
        writer.write_be16((data.len() >> 16) as u16)?;
        writer.write_be16((data.len() & 0xFFFF) as u16)?;
    }

    debug!(
        "moduled compress: {} bytes in chunks of {module_size}",
        data.len()
    );

    for chunk in data.chunks(module_size) {
        let compressed_chunk = compress_one(chunk)?;
        trace!(
            "moduled compress: {} byte chunk -> {} compressed bytes",
            chunk.len(),
            compressed_chunk.len()
        );

        {
            let mut writer = VecOutput::new(&mut output);
            writer.write_be16(compressed_chunk.len() as u16)?;
        }
        output.extend_from_slice(&compressed_chunk);

        if compressed_chunk.len() % 2 != 0 {
            output.push(0);
        }
    }

    Ok(output)
}

/// Decompresses a stream produced by [`compress_moduled`].
pub fn decompress_moduled<F>(data: &[u8], mut decompress_one: F) -> Result<Vec<u8>>
where
    F: FnMut(&[u8]) -> Result<Vec<u8>>,
{
    let mut input = SliceInput::new(data);
    let total_size = ((input.read_be16()? as usize) << 16) | input.read_be16()? as usize;

    debug!("moduled decompress: expecting {total_size} total bytes");

    let mut output = Vec::new();
    output
        .try_reserve(total_size)
        .map_err(|_| Error::AllocationFailure("allocating moduled decompress output"))?;

    while output.len() < total_size {
        let chunk_size = input.read_be16()? as usize;
        let start = input.tell();
        let end = start + chunk_size;
        if end > data.len() {
            return Err(Error::Truncated);
        }

        let decompressed_chunk = decompress_one(&data[start..end])?;
        output.extend_from_slice(&decompressed_chunk);
        input.seek_to(end + (chunk_size % 2));
    }

    if output.len() != total_size {
        return Err(Error::Truncated);
    }

    Ok(output)
}
