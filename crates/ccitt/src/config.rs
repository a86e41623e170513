//! # Decoder parameters
//!
//! These mirror the `/DecodeParms` dictionary of the PDF `CCITTFaxDecode`
//! filter. With the `serde` feature, the PDF key names can be used
//! directly, e.g. `(Columns: 2480, K: -1, BlackIs1: true)` in RON.

use crate::{FaxError, FaxResult};

/// Parameters for one decoding session
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "PascalCase"))]
pub struct DecoderConfig {
    /// Pixels per row
    pub columns: u32,
    /// Maximum number of rows, `None` for "until the data ends"
    pub rows: Option<u32>,
    /// Coding scheme: `< 0` pure 2-D (G4), `0` pure 1-D (G3),
    /// `> 0` mixed 1-D/2-D (G3)
    #[cfg_attr(feature = "serde", serde(rename = "K"))]
    pub k: i32,
    /// Whether a `1` bit represents a black pixel in the output
    #[cfg_attr(feature = "serde", serde(rename = "BlackIs1"))]
    pub black_is_one: bool,
    /// Whether each encoded row (or its EOL) is padded to a byte boundary
    pub encoded_byte_align: bool,
    /// Whether rows are preceded by EOL codes
    ///
    /// When set, a row after the first that is not preceded by an EOL is
    /// treated as damage.
    pub end_of_line: bool,
    /// Whether the data is terminated by EOFB / RTC
    ///
    /// The decoder stops at EOFB / RTC either way. When this is set, data
    /// that ends without one is logged as a warning. The encoder only
    /// writes the terminator when this is set.
    pub end_of_block: bool,
    /// How many consecutive damaged rows are tolerated
    pub damaged_rows_before_error: u32,
    /// Report unrecoverable errors as a regular end of data
    pub errors_as_end_of_data: bool,
    /// Output rows are padded to a multiple of this many bytes
    pub decoded_byte_align: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            columns: 1728,
            rows: None,
            k: 0,
            black_is_one: false,
            encoded_byte_align: false,
            end_of_line: false,
            end_of_block: true,
            damaged_rows_before_error: 0,
            errors_as_end_of_data: false,
            decoded_byte_align: 1,
        }
    }
}

impl DecoderConfig {
    /// Parameters for a Group 4 (T.6) image of the given width
    pub fn group4(columns: u32) -> Self {
        Self {
            columns,
            k: -1,
            ..Self::default()
        }
    }

    /// Parameters for a Group 3 1-D (T.4 MH) image of the given width
    pub fn group3(columns: u32) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    /// Check the parameters for consistency
    pub fn validate(&self) -> FaxResult<()> {
        if self.columns == 0 {
            return Err(FaxError::InvalidConfig("columns must be positive"));
        }
        if self.columns > u32::MAX - 64 {
            return Err(FaxError::InvalidConfig("columns too large"));
        }
        if !self.decoded_byte_align.is_power_of_two() {
            return Err(FaxError::InvalidConfig(
                "decoded byte alignment must be a power of two",
            ));
        }
        Ok(())
    }

    /// Number of bytes in one output row
    pub fn raster(&self) -> usize {
        let bytes = (self.columns as usize).div_ceil(8);
        let align = self.decoded_byte_align.max(1) as usize;
        bytes.div_ceil(align) * align
    }

    /// Whether damaged rows can be skipped by resynchronizing on the next EOL
    pub fn recovers_damage(&self) -> bool {
        self.end_of_line && self.k >= 0
    }

    /// Number of consecutive EOL codes that terminate the data
    ///
    /// T.6 defines EOFB as two EOLs, T.4 defines RTC as six.
    pub fn end_of_data_eols(&self) -> u32 {
        if self.k < 0 {
            2
        } else {
            6
        }
    }
}
