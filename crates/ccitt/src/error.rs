use thiserror::Error;

/// Why a row could not be decoded
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    /// The input bits match no code in the active table
    #[error("invalid code")]
    InvalidCode,
    /// A run extends past the end of the row
    #[error("run overshoots the row width")]
    Overshoot,
    /// An EOL code appeared before the row was complete
    #[error("unexpected end-of-line code")]
    UnexpectedEndOfLine,
    /// A vertical mode code points before the current position
    #[error("vertical mode before the current position")]
    BadReference,
    /// The input ended in the middle of a row
    #[error("input ended in the middle of a row")]
    Truncated,
    /// A 2-D extension other than uncompressed mode
    #[error("unsupported extension code")]
    UnsupportedExtension,
    /// A row is not followed by the EOL code that was configured
    #[error("missing end-of-line code")]
    MissingEndOfLine,
}

/// An error when decoding a CCITT encoded bi-level image
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaxError {
    /// The decoder parameters are inconsistent
    #[error("invalid parameters: {0}")]
    InvalidConfig(&'static str),

    /// The stream is damaged and cannot be decoded any further
    #[error("malformed data in row {row} at column {column}: {kind}")]
    Malformed {
        /// Index of the row being decoded
        row: u32,
        /// Pixel position within that row
        column: u32,
        /// What went wrong
        kind: Malformed,
    },

    /// A row passed to the [`Encoder`](crate::Encoder) does not fit the image
    #[error("cannot encode row {row}: {reason}")]
    InvalidRow {
        /// Index of the rejected row
        row: u32,
        /// What is wrong with it
        reason: &'static str,
    },

    /// More consecutive damaged rows than allowed
    #[error("{count} consecutive damaged rows (up to row {row})")]
    TooManyDamagedRows {
        /// Index of the last damaged row
        row: u32,
        /// Number of consecutive damaged rows
        count: u32,
    },
}

/// Type alias for convenience
pub type FaxResult<T> = Result<T, FaxError>;

/// Marker for "the cursor ran out of bits"
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NeedMoreInput;

/// Result of a single code lookup or scanline step
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum CodeError {
    NeedMoreInput,
    Malformed(Malformed),
}

impl From<NeedMoreInput> for CodeError {
    fn from(_: NeedMoreInput) -> Self {
        CodeError::NeedMoreInput
    }
}

impl From<Malformed> for CodeError {
    fn from(kind: Malformed) -> Self {
        CodeError::Malformed(kind)
    }
}
