#![warn(missing_docs)]
//! CCITT fax encodings
//!
//! A streaming decoder for ITU-T T.4 (Group 3) and T.6 (Group 4) bitstreams,
//! as found in `CCITTFaxDecode` streams of PDF and PostScript files, and an
//! encoder for the same formats.
//!
//! ```
//! use ccitt_fax::{decode, DecoderConfig, Encoder};
//!
//! let config = DecoderConfig::group4(16);
//! let mut encoder = Encoder::new(&config)?;
//! encoder.encode_row(&[0xF0, 0x0F])?;
//! let data = encoder.finish();
//!
//! assert_eq!(decode(&data, &config)?, vec![0xF0, 0x0F]);
//! # Ok::<(), ccitt_fax::FaxError>(())
//! ```

mod ascii_art;
pub mod bits;
mod color;
mod config;
mod decoder;
pub mod encode;
pub mod eol;
mod error;
mod g3;
mod g42d;
pub mod row;
mod run;
pub mod tables;
mod uncompressed;

pub use ascii_art::{ascii_art, BorderDrawing, BoxDrawing, ASCII, UNICODE};
pub use color::Color;
pub use config::DecoderConfig;
pub use decoder::{Decoder, Progress, Status};
pub use encode::Encoder;
pub use error::{FaxError, FaxResult, Malformed, NeedMoreInput};

/// Decode a complete stream at once
///
/// A fatal error discards the rows before it. Use a [`Decoder`] to keep
/// them, or set `errors_as_end_of_data`.
pub fn decode(data: &[u8], config: &DecoderConfig) -> FaxResult<Vec<u8>> {
    let mut decoder = Decoder::new(config.clone())?;
    let mut image = Vec::new();
    let mut buffer = vec![0; config.raster() * 16];
    let mut input = data;
    loop {
        let progress = decoder.feed(input, &mut buffer, true)?;
        input = &input[progress.consumed..];
        image.extend_from_slice(&buffer[..progress.produced]);
        match progress.status {
            Status::NeedOutput => continue,
            Status::NeedInput | Status::EndOfData => return Ok(image),
        }
    }
}
