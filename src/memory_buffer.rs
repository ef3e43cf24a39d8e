//! Growable byte buffer (`spec.md` §4.8), grounded in
//! `examples/original_source/memory_stream.c`'s `MemoryStream`.
//!
//! Deliberately not a thin wrapper over `Vec<u8>`'s own amortized-doubling
//! growth: the spec calls out a specific caller-controlled growth
//! increment, rounding requested capacity up to the next multiple of it,
//! which is a distinct, testable policy worth keeping explicit.

/// A growable byte sink with an explicit, caller-chosen growth increment.
pub struct MemoryBuffer {
    buffer: Vec<u8>,
    growth: usize,
}

impl MemoryBuffer {
    /// Creates an empty buffer that grows in increments of `growth` bytes.
    pub fn new(growth: usize) -> Self {
        assert!(growth > 0, "growth increment must be non-zero");
        Self {
            buffer: Vec::new(),
            growth,
        }
    }

    /// Rounds `needed` up to the next multiple of `growth`, matching
    /// `memory_stream.c`'s `size = needed_size + growth - (needed_size % growth)`.
    fn rounded_capacity(&self, needed: usize) -> usize {
        if needed % self.growth == 0 {
            needed
        } else {
            needed + self.growth - (needed % self.growth)
        }
    }

    fn ensure_capacity(&mut self, needed: usize) {
        if needed > self.buffer.capacity() {
            let target = self.rounded_capacity(needed);
            self.buffer.reserve(target - self.buffer.len());
        }
    }

    pub fn push(&mut self, byte: u8) {
        self.ensure_capacity(self.buffer.len() + 1);
        self.buffer.push(byte);
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.ensure_capacity(self.buffer.len() + bytes.len());
        self.buffer.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Resets to empty without releasing the backing storage.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Hands ownership of the backing storage to the caller, leaving this
    /// buffer empty. Mirrors `MemoryStream_Destroy`'s
    /// `free_buffer_when_destroyed = false` path (transfer rather than
    /// free).
    pub fn into_vec(self) -> Vec<u8> {
        self.buffer
    }
}
