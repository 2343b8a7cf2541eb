use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("quicklz header missing")]
    MalformedHeader,

    #[error("input size mismatch: header declares {declared} bytes, got {actual}")]
    SizeMismatch { declared: usize, actual: usize },

    #[error("unsupported quicklz compression level {0}")]
    UnsupportedLevel(u8),

    #[error("quicklz streaming buffer mode {0} is not supported")]
    UnsupportedStreaming(u8),

    #[error("declared output size {declared} exceeds the limit of {limit} bytes")]
    OutputTooLarge { declared: usize, limit: usize },

    #[error("cannot allocate {0} bytes for the output buffer")]
    AllocationFailure(usize),

    #[error("corrupt quicklz stream: {0}")]
    StreamCorruption(Corruption),
}

/// Why a token stream was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    #[error("match distance {distance} reaches before the start of output at {position}")]
    DistanceOutOfRange { distance: usize, position: usize },

    #[error("match of {length} bytes at {position} runs into the literal tail")]
    MatchOverrun { length: usize, position: usize },

    #[error("input exhausted at offset {0}")]
    InputExhausted(usize),

    #[error("{0} unconsumed bytes after the token stream")]
    TrailingInput(usize),

    #[error("{available} stream bytes cannot decode to {declared} bytes")]
    ExpansionLimit { declared: usize, available: usize },

    #[error("stored payload length does not match the declared size")]
    StoredLengthMismatch,
}

impl From<Corruption> for DecodeError {
    fn from(value: Corruption) -> Self {
        Self::StreamCorruption(value)
    }
}
