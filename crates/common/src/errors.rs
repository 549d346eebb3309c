//! Codec error types
//!
//! Decode failures come from untrusted peers and are always recoverable per
//! message. Encode failures can only arise from a message built outside the
//! factory with a field too large for its length prefix.

/// Result type alias for decoding
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Why a byte buffer could not be turned back into a message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer ended before a fixed-width field
    #[error("truncated message: {field} needs {needed} bytes, {remaining} remaining")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// The leading tag names no known message kind
    #[error("unknown {context} discriminator 0x{tag:02x}")]
    UnknownDiscriminator { context: &'static str, tag: u8 },

    /// A length or count field claims more data than the buffer holds
    #[error("{field} declares {declared} bytes but only {remaining} remain")]
    LengthOverrun {
        field: &'static str,
        declared: u64,
        remaining: usize,
    },

    /// A text field is not valid UTF-8
    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    /// Bytes left over after a complete message
    #[error("{remaining} trailing bytes after a complete message")]
    TrailingBytes { remaining: usize },
}

impl DecodeError {
    /// Short stable label, used as a log field
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Truncated { .. } => "truncated",
            Self::UnknownDiscriminator { .. } => "unknown_discriminator",
            Self::LengthOverrun { .. } => "length_overrun",
            Self::InvalidUtf8 { .. } => "invalid_utf8",
            Self::TrailingBytes { .. } => "trailing_bytes",
        }
    }
}

/// Why a message could not be written to the wire
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// A length-prefixed field does not fit in its `u32` prefix
    #[error("{field} is {len} bytes, exceeding the {max} byte wire limit")]
    FieldTooLarge {
        field: &'static str,
        len: usize,
        max: u64,
    },
}
