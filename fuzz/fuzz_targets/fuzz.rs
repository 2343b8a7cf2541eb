#![no_main]

use libfuzzer_sys::fuzz_target;
use quicklz3::{Decoder, decompress};

/// Verifies that the decoder safely handles arbitrary, potentially malformed input.
///
/// # Invariant
/// The decoder must return either `Ok(_)` or `Err(_)`. It must **never** panic,
/// regardless of the input data.
fn verify_decompression_robustness(data: &[u8]) {
    let _ = decompress(data);
}

/// Wraps the fuzz input in a valid level-3 header so the token loop is reached.
///
/// The first two bytes choose the declared output size; the rest is the token stream.
///
/// # Invariant
/// A successful decode produces exactly the declared number of bytes.
///
/// # Panics
/// Panics if the decoder reports success with an output of the wrong length.
fn verify_token_stream(data: &[u8]) {
    let Some((size_bytes, stream)) = data.split_first_chunk::<2>() else {
        return;
    };
    let declared = u16::from_le_bytes(*size_bytes) as u32;

    let mut block = Vec::with_capacity(stream.len() + 9);
    block.push(0x4f);
    block.extend_from_slice(&((stream.len() + 9) as u32).to_le_bytes());
    block.extend_from_slice(&declared.to_le_bytes());
    block.extend_from_slice(stream);

    let decoder = Decoder::new().max_output_len(1 << 16);
    if let Ok(output) = decoder.decompress(&block) {
        if output.len() != declared as usize {
            panic!(
                "Length mismatch!\nDeclared: {}\nDecoded: {}\nStream len: {}",
                declared,
                output.len(),
                stream.len()
            );
        }
    }
}

fuzz_target!(|data: &[u8]| {
    // 1. Robustness: random noise, header included.
    verify_decompression_robustness(data);

    // 2. Token loop: random streams behind a well-formed header.
    verify_token_stream(data);
});
