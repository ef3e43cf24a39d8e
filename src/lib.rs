//! # clownlzss
//!
//! Optimal-parsing LZSS compressors and decompressors for the small family
//! of retro-game binary formats this crate targets.
//!
//! The [`core`] module does the actual work: given raw bytes and a
//! [`CostModel`] describing what a format's literals and matches cost to
//! encode, [`find_optimal_matches`] returns the minimum-total-cost token
//! sequence via a single dynamic-programming sweep. Each format module
//! ([`nlz`], [`comper`], [`rocket`]) is a thin cost model plus a
//! descriptor-bit-and-byte emitter/parser built on [`bitfield`] and [`io`].
//!
//! Only [`nlz`] has both directions implemented; [`comper`] and [`rocket`]
//! are decompression-only, reflecting what this crate can ground a
//! reconstruction on.
//!
//! ## Example
//!
//! ```
//! use clownlzss::nlz;
//!
//! let data: &[u8] = b"Hello world, hello world!";
//! let compressed = nlz::compress(data).unwrap();
//! let decompressed = nlz::decompress(&compressed).unwrap();
//! assert_eq!(decompressed, data);
//! ```

#![forbid(unsafe_code)]

pub mod bitfield;
pub mod comper;
pub mod core;
pub mod error;
pub mod io;
pub mod memory_buffer;
pub mod moduled;
pub mod nlz;
pub mod rocket;

pub use core::{CostModel, Match, find_optimal_matches};
pub use error::{Error, Result};
