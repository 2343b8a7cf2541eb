//! Hand assembly of QuickLZ level-3 blocks for tests and benches.
//!
//! This is not a compressor: callers choose every literal and match token
//! themselves. The writer only handles control-word placement, field
//! encodings, minimum-length padding and the header.

#![allow(dead_code)]

use quicklz3::header::COMPACT_HEADER_THRESHOLD;

/// Level 3, non-streaming, bit 6 set: the constant part of every control byte.
pub const CONTROL_BASE: u8 = 0x4c;
pub const CONTROL_COMPRESSED: u8 = 0x01;
pub const CONTROL_EXTENDED: u8 = 0x02;

const FLAGS_PER_WORD: u32 = 31;
const SENTINEL: u32 = 1 << 31;
const MIN_STREAM_LEN: usize = 9;

/// Match field encodings, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchForm {
    /// 1 byte: distance < 64, length 3.
    Short,
    /// 2 bytes: distance < 16384, length 3.
    Wide,
    /// 2 bytes: distance < 1024, length 3..=18.
    Medium,
    /// 3 bytes: distance < 131072, length 3..=33.
    Long,
    /// 4 bytes: distance < 131072, length 3..=258.
    Huge,
}

impl MatchForm {
    /// Smallest encoding that can carry `(distance, length)`.
    pub fn pick(distance: usize, length: usize) -> Self {
        match (distance, length) {
            (d, 3) if d < 64 => Self::Short,
            (d, 3) if d < 16384 => Self::Wide,
            (d, l) if d < 1024 && l <= 18 => Self::Medium,
            (_, l) if l <= 33 => Self::Long,
            _ => Self::Huge,
        }
    }

    fn encode(self, distance: usize, length: usize, out: &mut Vec<u8>) {
        let d = distance as u32;
        let l = length as u32;
        match self {
            Self::Short => {
                assert!(d < 64 && l == 3);
                out.push((d << 2) as u8);
            }
            Self::Wide => {
                assert!(d < 16384 && l == 3);
                out.extend_from_slice(&(((d << 2) | 0b01) as u16).to_le_bytes());
            }
            Self::Medium => {
                assert!(d < 1024 && (3..=18).contains(&l));
                out.extend_from_slice(&(((d << 6) | ((l - 3) << 2) | 0b10) as u16).to_le_bytes());
            }
            Self::Long => {
                assert!(d < 131_072 && (3..=33).contains(&l));
                let v = (d << 7) | ((l - 2) << 2) | 0b11;
                out.extend_from_slice(&v.to_le_bytes()[..3]);
            }
            Self::Huge => {
                assert!(d < 131_072 && (3..=258).contains(&l));
                let v = (d << 15) | ((l - 3) << 7) | 0b11;
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
    }
}

/// Writes a token stream and tracks the output it would decode to.
#[derive(Debug, Default)]
pub struct StreamBuilder {
    body: Vec<u8>,
    cword_pos: usize,
    cword: u32,
    flags: u32,
    expected: Vec<u8>,
    started: bool,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&mut self, is_match: bool) {
        if !self.started || self.flags == FLAGS_PER_WORD {
            self.close_word();
            self.cword_pos = self.body.len();
            self.body.extend_from_slice(&[0; 4]);
            self.cword = 0;
            self.flags = 0;
            self.started = true;
        }
        if is_match {
            self.cword |= 1 << self.flags;
        }
        self.flags += 1;
    }

    fn close_word(&mut self) {
        if self.started {
            let word = (self.cword | SENTINEL).to_le_bytes();
            self.body[self.cword_pos..self.cword_pos + 4].copy_from_slice(&word);
        }
    }

    pub fn literal(&mut self, byte: u8) -> &mut Self {
        self.flag(false);
        self.body.push(byte);
        self.expected.push(byte);
        self
    }

    pub fn literals(&mut self, bytes: &[u8]) -> &mut Self {
        for &b in bytes {
            self.literal(b);
        }
        self
    }

    /// Appends a match using the smallest field encoding.
    pub fn copy(&mut self, distance: usize, length: usize) -> &mut Self {
        self.copy_as(MatchForm::pick(distance, length), distance, length)
    }

    pub fn copy_as(&mut self, form: MatchForm, distance: usize, length: usize) -> &mut Self {
        self.flag(true);
        form.encode(distance, length, &mut self.body);
        // Only track output for references that are in range.
        if distance >= 1 && distance <= self.expected.len() {
            let from = self.expected.len() - distance;
            for k in 0..length {
                let b = self.expected[from + k];
                self.expected.push(b);
            }
        } else {
            self.expected.extend(std::iter::repeat_n(0, length));
        }
        self
    }

    /// Bytes a correct decoder must produce.
    pub fn expected(&self) -> &[u8] {
        &self.expected
    }

    pub fn decoded_len(&self) -> usize {
        self.expected.len()
    }

    /// Token stream with control words filled in and the encoder's padding applied.
    pub fn stream(&mut self) -> Vec<u8> {
        self.close_word();
        let mut body = self.body.clone();
        if body.len() < MIN_STREAM_LEN {
            body.resize(MIN_STREAM_LEN, 0);
        }
        body
    }

    /// Complete block, choosing the header width the way the reference encoder does.
    pub fn finish(&mut self) -> Vec<u8> {
        let stream = self.stream();
        let len = self.decoded_len();
        if len < COMPACT_HEADER_THRESHOLD {
            block(CONTROL_COMPRESSED, &stream, len)
        } else {
            block(CONTROL_COMPRESSED | CONTROL_EXTENDED, &stream, len)
        }
    }

    /// Complete block, always with 4-byte size fields.
    pub fn finish_extended(&mut self) -> Vec<u8> {
        let stream = self.stream();
        block(CONTROL_COMPRESSED | CONTROL_EXTENDED, &stream, self.decoded_len())
    }
}

/// Prefixes `payload` with a header of the width chosen by `flags`.
pub fn block(flags: u8, payload: &[u8], decoded_len: usize) -> Vec<u8> {
    let control = CONTROL_BASE | flags;
    let mut out = Vec::with_capacity(payload.len() + 9);
    out.push(control);
    if control & CONTROL_EXTENDED != 0 {
        let total = (payload.len() + 9) as u32;
        out.extend_from_slice(&total.to_le_bytes());
        out.extend_from_slice(&(decoded_len as u32).to_le_bytes());
    } else {
        out.push((payload.len() + 3) as u8);
        out.push(decoded_len as u8);
    }
    out.extend_from_slice(payload);
    out
}

/// A stored (uncompressed) block holding `data` verbatim.
pub fn stored(data: &[u8], extended: bool) -> Vec<u8> {
    let flags = if extended { CONTROL_EXTENDED } else { 0 };
    block(flags, data, data.len())
}

/// Deterministic LCG bytes (high entropy).
pub fn noise(size: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..size)
        .map(|_| {
            state = (state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)) & 0xFFFF_FFFF;
            (state >> 24) as u8
        })
        .collect()
}
