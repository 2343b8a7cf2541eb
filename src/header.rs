use crate::error::DecodeError;

type Result<T> = core::result::Result<T, DecodeError>;

// --- Constants ---

/// Control bit set when a token stream follows the header (clear: stored verbatim).
pub const CONTROL_COMPRESSED: u8 = 0x01;

/// Control bit selecting 4-byte size fields instead of 1-byte fields.
pub const CONTROL_EXTENDED: u8 = 0x02;

const LEVEL_SHIFT: u8 = 2;
const STREAMING_SHIFT: u8 = 4;
const TWO_BIT_MASK: u8 = 0b11;

/// Header length when both size fields are a single byte.
pub const COMPACT_HEADER_LEN: usize = 3;

/// Header length when both size fields are 4 bytes wide.
pub const EXTENDED_HEADER_LEN: usize = 9;

/// Inputs shorter than this are written with a compact header by the QuickLZ encoder.
pub const COMPACT_HEADER_THRESHOLD: usize = 216;

/// Width of the two size fields, chosen by [`CONTROL_EXTENDED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    Compact,
    Extended,
}

impl FieldWidth {
    #[inline]
    pub const fn from_control(control: u8) -> Self {
        if control & CONTROL_EXTENDED != 0 {
            Self::Extended
        } else {
            Self::Compact
        }
    }

    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Compact => 1,
            Self::Extended => 4,
        }
    }

    /// Total header length for this width: control byte plus two size fields.
    #[inline]
    pub const fn header_len(self) -> usize {
        match self {
            Self::Compact => COMPACT_HEADER_LEN,
            Self::Extended => EXTENDED_HEADER_LEN,
        }
    }

    /// Reads one little-endian size field at `offset`, returning `(width, value)`.
    fn read(self, buf: &[u8], offset: usize) -> Result<(usize, u32)> {
        let width = self.bytes();
        let field = buf
            .get(offset..offset + width)
            .ok_or(DecodeError::MalformedHeader)?;
        let value = field
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
        Ok((width, value))
    }
}

/// A parsed QuickLZ block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    control: u8,
    width: FieldWidth,
    compressed_size: u32,
    decompressed_size: u32,
}

impl Header {
    /// Reads the control byte and both size fields from the start of `buf`.
    ///
    /// Only the header bytes are touched; the token stream is not inspected.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < COMPACT_HEADER_LEN {
            return Err(DecodeError::MalformedHeader);
        }

        let control = buf[0];
        let width = FieldWidth::from_control(control);
        let (n, compressed_size) = width.read(buf, 1)?;
        let (_, decompressed_size) = width.read(buf, 1 + n)?;

        Ok(Self {
            control,
            width,
            compressed_size,
            decompressed_size,
        })
    }

    #[inline]
    pub const fn control(&self) -> u8 {
        self.control
    }

    #[inline]
    pub const fn width(&self) -> FieldWidth {
        self.width
    }

    #[inline]
    pub const fn header_len(&self) -> usize {
        self.width.header_len()
    }

    /// Total size of the compressed block, header included.
    #[inline]
    pub const fn compressed_size(&self) -> usize {
        self.compressed_size as usize
    }

    #[inline]
    pub const fn decompressed_size(&self) -> usize {
        self.decompressed_size as usize
    }

    /// Whether a token stream follows (as opposed to a verbatim payload).
    #[inline]
    pub const fn is_compressed(&self) -> bool {
        self.control & CONTROL_COMPRESSED != 0
    }

    #[inline]
    pub const fn level(&self) -> u8 {
        (self.control >> LEVEL_SHIFT) & TWO_BIT_MASK
    }

    /// Streaming-buffer mode the encoder was built with; `0` means none.
    #[inline]
    pub const fn streaming_mode(&self) -> u8 {
        (self.control >> STREAMING_SHIFT) & TWO_BIT_MASK
    }
}

/// Header length (3 or 9) implied by the control byte of `buf`.
pub fn header_len(buf: &[u8]) -> Result<usize> {
    buf.first()
        .map(|&control| FieldWidth::from_control(control).header_len())
        .ok_or(DecodeError::MalformedHeader)
}

/// Total compressed size declared by the header of `buf`.
pub fn compressed_size(buf: &[u8]) -> Result<usize> {
    Header::parse(buf).map(|h| h.compressed_size())
}

/// Decompressed size declared by the header of `buf`.
pub fn decompressed_size(buf: &[u8]) -> Result<usize> {
    Header::parse(buf).map(|h| h.decompressed_size())
}
