use alloc::vec::Vec;

use crate::decompress::decode_block;
use crate::error::DecodeError;

/// Upper bound a header can declare: the size fields are at most 32 bits wide.
pub const MAX_DECLARED_LEN: usize = u32::MAX as usize;

/// Decode settings for QuickLZ blocks.
///
/// A `Decoder` owns no buffers; every call allocates its own working state,
/// so one value can be shared freely between threads.
///
/// ```rust
/// use quicklz3::{Decoder, DecodeError};
///
/// let decoder = Decoder::new().max_output_len(4);
/// let stored = [0x4c, 0x08, 0x05, b'h', b'e', b'l', b'l', b'o'];
/// assert!(matches!(
///     decoder.decompress(&stored),
///     Err(DecodeError::OutputTooLarge { declared: 5, limit: 4 })
/// ));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    max_output_len: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub const fn new() -> Self {
        Self {
            max_output_len: MAX_DECLARED_LEN,
        }
    }

    /// Rejects blocks whose header declares more than `limit` output bytes,
    /// before any allocation happens.
    #[must_use]
    pub const fn max_output_len(mut self, limit: usize) -> Self {
        self.max_output_len = limit;
        self
    }

    #[inline]
    pub const fn output_limit(&self) -> usize {
        self.max_output_len
    }

    /// Decodes a complete block into a freshly allocated vector.
    pub fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, DecodeError> {
        let mut output = Vec::new();
        self.decompress_into(input, &mut output)?;
        Ok(output)
    }

    /// Decodes a complete block, appending the result to `output`.
    ///
    /// On error `output` is left exactly as it was passed in.
    pub fn decompress_into(
        &self,
        input: &[u8],
        output: &mut Vec<u8>,
    ) -> Result<(), DecodeError> {
        let start = output.len();
        decode_block(input, output, self.max_output_len)
            .inspect_err(|_| output.truncate(start))
    }
}
