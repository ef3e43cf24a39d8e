use thiserror::Error;

/// Unified error type for both compression and decompression.
///
/// `spec.md` §7 enumerates four error kinds (`AllocationFailure`,
/// `Unencodable`, `IOFailure`, `Truncated`); the decode-detail variants below
/// (`InvalidHeader`, `InvalidOffset`, `UnexpectedEof`) are refinements kept
/// at the granularity the teacher crate's `DecompressionError` used.
#[derive(Error, Debug)]
pub enum Error {
    /// Scratch or output storage could not be allocated.
    ///
    /// Surfaced via `Vec::try_reserve`/`try_reserve_exact` on the core's two
    /// heap allocations (the `NodeMeta` scratch array and the token output
    /// array); the core releases anything it owns before returning this.
    #[error("allocation failed while {0}")]
    AllocationFailure(&'static str),

    /// The parser left the sink node at infinite cost: every non-literal
    /// edge was forbidden by the cost model, and so was the literal cost.
    #[error("input cannot be encoded under the supplied cost model")]
    Unencodable,

    /// An underlying I/O adapter failed; the core does not interpret this,
    /// it only propagates it.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The input ended before the header-declared output size was reached.
    #[error("input truncated before declared output size was reached")]
    Truncated,

    /// A chunk header did not match any recognised encoding.
    #[error("invalid block header")]
    InvalidHeader,

    /// A match referenced a distance larger than the bytes produced so far.
    #[error("match offset points before the start of output")]
    InvalidOffset,

    /// The input ended in the middle of a token that required more bytes.
    #[error("unexpected end of input")]
    UnexpectedEof,
}

pub type Result<T> = core::result::Result<T, Error>;
