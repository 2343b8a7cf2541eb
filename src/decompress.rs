use crate::config::Decoder;
use crate::error::{Corruption, DecodeError};
use crate::header::Header;
use alloc::vec::Vec;

type Result<T> = core::result::Result<T, DecodeError>;

// --- Constants ---

/// Only level-3 token streams are understood by this decoder.
const SUPPORTED_LEVEL: u8 = 3;

/// Size of a control word in the input stream.
const CWORD_LEN: usize = 4;

/// Marker bit placed above the 31 flag bits of every control word.
/// The register holds exactly `1` once all flags have been consumed.
const CWORD_SENTINEL: u32 = 1 << 31;

/// Bytes that must be readable at the top of every token iteration.
const FETCH_LEN: usize = 4;

/// The encoder never starts a match within this many bytes of the end...
const UNCONDITIONAL_MATCHLEN: usize = 6;

/// ...and always finishes with at least this many literals.
const UNCOMPRESSED_END: usize = 4;

/// Once fewer than this many output bytes remain, every token is a literal.
const LITERAL_TAIL: usize = UNCONDITIONAL_MATCHLEN + UNCOMPRESSED_END + 1;

/// The encoder pads its token stream (control words included) to this length.
const MIN_STREAM_LEN: usize = 9;

/// No token stream decodes to more than this many bytes per input byte: the
/// longest match is 258 bytes from a 4-byte field plus its share of a control word.
const MAX_EXPANSION: usize = 64;

/// Literal run length for the low nibble of the flag register: the number of
/// clear flags before the first set one, capped at 4.
const LITERAL_RUN: [u8; 16] = [4, 0, 1, 0, 2, 0, 1, 0, 3, 0, 1, 0, 2, 0, 1, 0];

/// Decompresses a complete QuickLZ level-3 block into a new vector.
///
/// `input` must be exactly one block: its length has to equal the compressed
/// size declared in the header.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    Decoder::new().decompress(input)
}

/// Decompresses a complete QuickLZ level-3 block, appending to `output`.
pub fn decompress_into(input: &[u8], output: &mut Vec<u8>) -> Result<()> {
    Decoder::new().decompress_into(input, output)
}

/// Validates the header, reserves the output and runs the matching decoder.
///
/// On error `output` may hold a partially written tail; the caller truncates it.
pub(crate) fn decode_block(
    input: &[u8],
    output: &mut Vec<u8>,
    max_output_len: usize,
) -> Result<()> {
    let header = Header::parse(input)?;

    if header.compressed_size() != input.len() {
        return Err(DecodeError::SizeMismatch {
            declared: header.compressed_size(),
            actual: input.len(),
        });
    }
    if header.level() != SUPPORTED_LEVEL {
        return Err(DecodeError::UnsupportedLevel(header.level()));
    }
    if header.streaming_mode() != 0 {
        return Err(DecodeError::UnsupportedStreaming(header.streaming_mode()));
    }

    let size = header.decompressed_size();
    if size > max_output_len {
        return Err(DecodeError::OutputTooLarge {
            declared: size,
            limit: max_output_len,
        });
    }

    tracing::trace!(
        "Decoding QuickLZ block: {} -> {} bytes (compressed: {})",
        input.len(),
        size,
        header.is_compressed()
    );

    if size == 0 {
        return Ok(());
    }

    let payload = &input[header.header_len()..];
    if !header.is_compressed() {
        if payload.len() != size {
            tracing::trace!("Stored payload is {} bytes, expected {}", payload.len(), size);
            return Err(Corruption::StoredLengthMismatch.into());
        }
        reserve(output, size)?;
        output.extend_from_slice(payload);
        return Ok(());
    }

    if payload.len().saturating_mul(MAX_EXPANSION) < size {
        tracing::trace!("{} stream bytes cannot expand to {}", payload.len(), size);
        return Err(Corruption::ExpansionLimit {
            declared: size,
            available: payload.len(),
        }
        .into());
    }

    reserve(output, size)?;
    let start = output.len();
    output.resize(start + size, 0);
    let consumed = decode_tokens(payload, &mut output[start..]).inspect_err(|e| {
        tracing::trace!("Rejected token stream: {}", e);
    })?;

    // Only the encoder's minimum-length padding may follow the last token.
    if payload.len() > consumed.max(MIN_STREAM_LEN) {
        return Err(Corruption::TrailingInput(payload.len() - consumed).into());
    }

    Ok(())
}

#[inline]
fn reserve(output: &mut Vec<u8>, size: usize) -> Result<()> {
    output
        .try_reserve_exact(size)
        .map_err(|_| DecodeError::AllocationFailure(size))
}

/// A decoded match field: how many input bytes it occupied, and the copy it requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MatchField {
    width: usize,
    distance: usize,
    length: usize,
}

impl MatchField {
    /// Picks the field encoding from the low bits of the next four input bytes.
    #[inline]
    const fn decode(fetch: u32) -> Self {
        let (width, distance, length) = if fetch & 0b11 == 0b00 {
            (1, (fetch & 0xff) >> 2, 3)
        } else if fetch & 0b10 == 0 {
            (2, (fetch & 0xffff) >> 2, 3)
        } else if fetch & 0b01 == 0 {
            (2, (fetch & 0xffff) >> 6, ((fetch >> 2) & 0x0f) + 3)
        } else if fetch & 0x7f != 0b11 {
            (3, (fetch >> 7) & 0x1ffff, ((fetch >> 2) & 0x1f) + 2)
        } else {
            (4, fetch >> 15, ((fetch >> 7) & 0xff) + 3)
        };

        Self {
            width,
            distance: distance as usize,
            length: length as usize,
        }
    }
}

#[inline]
fn read_u32(input: &[u8], pos: usize) -> Option<u32> {
    let bytes = input.get(pos..pos + FETCH_LEN)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Decodes the token stream in `input` until `output` is full.
///
/// Returns the number of input bytes consumed. `output` must not be empty.
fn decode_tokens(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let size = output.len();
    let mut src = 0;
    let mut dst = 0;
    let mut cword: u32 = 1;

    loop {
        if cword == 1 {
            cword = read_u32(input, src).ok_or(Corruption::InputExhausted(src))?;
            src += CWORD_LEN;
        }

        let fetch = read_u32(input, src).ok_or(Corruption::InputExhausted(src))?;

        if cword & 1 == 1 {
            cword >>= 1;
            let field = MatchField::decode(fetch);
            src += field.width;
            copy_match(output, dst, field.distance, field.length)?;
            dst += field.length;
        } else if dst + LITERAL_TAIL < size {
            // The fetch window guarantees `n <= 4` readable bytes at `src`.
            let n = LITERAL_RUN[(cword & 0x0f) as usize] as usize;
            output[dst..dst + n].copy_from_slice(&input[src..src + n]);
            cword >>= n;
            dst += n;
            src += n;
        } else {
            // Tail: the remaining output is all literals, control words are skipped unread.
            while dst < size {
                if cword == 1 {
                    src += CWORD_LEN;
                    cword = CWORD_SENTINEL;
                }
                output[dst] = *input.get(src).ok_or(Corruption::InputExhausted(src))?;
                dst += 1;
                src += 1;
                cword >>= 1;
            }
            return Ok(src);
        }
    }
}

/// Copies `length` bytes from `distance` bytes behind `dst` to `dst`.
///
/// Source and destination may overlap (`distance < length`), in which case the
/// copy repeats the trailing pattern, so it must run forward one byte at a time.
#[inline]
fn copy_match(output: &mut [u8], dst: usize, distance: usize, length: usize) -> Result<()> {
    if distance == 0 || distance > dst {
        return Err(Corruption::DistanceOutOfRange {
            distance,
            position: dst,
        }
        .into());
    }
    if dst + length + UNCOMPRESSED_END > output.len() {
        return Err(Corruption::MatchOverrun {
            length,
            position: dst,
        }
        .into());
    }

    let from = dst - distance;
    if distance == 1 {
        let byte = output[from];
        output[dst..dst + length].fill(byte);
    } else if distance >= length {
        output.copy_within(from..from + length, dst);
    } else {
        for k in 0..length {
            output[dst + k] = output[from + k];
        }
    }

    Ok(())
}
