//! # QuickLZ Level 3 Decompression
//!
//! `quicklz3` is a safe, pure-Rust decoder for buffers produced by QuickLZ 1.5.0
//! at compression level 3 (non-streaming). Each buffer is a single block: a 3 or
//! 9 byte header followed by either a token stream or the stored payload.
//!
//! ## Example
//!
//! ```rust
//! use quicklz3::{compressed_size, decompress};
//!
//! // "a" as written by the reference encoder:
//! // Header: control 0x4D (level 3, compressed, compact), 12 bytes total, 1 byte out.
//! // Control word 0x80000000: one literal flag, then the sentinel.
//! // The literal, then zero padding up to the 9-byte stream minimum.
//! let compressed = [
//!     0x4d, 0x0c, 0x01,
//!     0x00, 0x00, 0x00, 0x80,
//!     b'a',
//!     0x00, 0x00, 0x00, 0x00,
//! ];
//!
//! assert_eq!(compressed_size(&compressed), Ok(compressed.len()));
//! let decoded = decompress(&compressed).expect("Decompression failed");
//! assert_eq!(decoded, b"a");
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod decompress;
pub mod error;
pub mod header;

pub use config::Decoder;
pub use decompress::{decompress, decompress_into};
pub use error::{Corruption, DecodeError};
pub use header::{Header, compressed_size, decompressed_size, header_len};
