use std::{fmt, io, path::PathBuf, str::FromStr};

use ccitt_fax::DecoderConfig;
use clap::Parser;
use thiserror::*;

/// The format to write decoded images in
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    /// Portable Bitmap Format (binary `P4`)
    Pbm,
    /// Portable Network Graphic
    Png,
    /// Box drawing characters on the console
    Ascii,
}

#[derive(Debug, Error)]
#[error("Use one of `pbm`, `png` or `ascii`")]
/// Failed to parse a format name
pub struct FormatError {}

impl Default for Format {
    fn default() -> Self {
        Format::Pbm
    }
}

impl FromStr for Format {
    type Err = FormatError;
    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val {
            "pbm" => Ok(Self::Pbm),
            "png" => Ok(Self::Png),
            "ascii" | "txt" => Ok(Self::Ascii),
            _ => Err(FormatError {}),
        }
    }
}

impl Format {
    fn to_static_str(self) -> &'static str {
        match self {
            Self::Pbm => "pbm",
            Self::Png => "png",
            Self::Ascii => "ascii",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_static_str())
    }
}

#[derive(Parser)]
/// Decode and encode CCITT Group 3 and Group 4 fax images
pub struct Options {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand)]
pub enum Command {
    /// Decode a raw CCITT stream into an image
    Decode(DecodeOptions),
    /// Encode a PNG image into a raw CCITT stream
    Encode(EncodeOptions),
}

#[derive(Parser)]
pub struct DecodeOptions {
    /// The raw CCITT stream
    pub file: PathBuf,
    /// Where to store the output
    #[clap(long, short = 'o')]
    pub out: Option<PathBuf>,
    /// Format of the output. Valid choices are:
    ///
    /// "pbm", "png" and "ascii"
    #[clap(default_value_t, long, short = 'F')]
    pub format: Format,
    /// Number of input bytes passed to the decoder at once
    #[clap(long, default_value = "4096")]
    pub chunk_size: usize,

    #[clap(flatten)]
    pub params: ParamArgs,
}

#[derive(Parser)]
pub struct EncodeOptions {
    /// The image to encode (e.g. *.PNG)
    pub file: PathBuf,
    /// Where to store the output
    #[clap(long, short = 'o')]
    pub out: Option<PathBuf>,
    /// Luma values below this are black
    #[clap(long, default_value = "128")]
    pub threshold: u8,

    #[clap(flatten)]
    pub params: ParamArgs,
}

/// Decoder parameters passed as command line args
#[derive(Debug, Default, Clone, Parser)]
pub struct ParamArgs {
    /// Pixels per row
    #[clap(long, short = 'c')]
    pub columns: Option<u32>,
    /// Maximum number of rows
    #[clap(long, short = 'r')]
    pub rows: Option<u32>,
    /// Coding scheme: negative for Group 4, 0 for Group 3 1-D,
    /// positive for Group 3 2-D
    #[clap(short = 'k', allow_hyphen_values = true)]
    pub k: Option<i32>,
    /// Rows are preceded by EOL codes
    #[clap(long)]
    pub end_of_line: bool,
    /// Encoded rows are padded to a byte boundary
    #[clap(long)]
    pub encoded_byte_align: bool,
    /// The data is not terminated by EOFB / RTC
    #[clap(long)]
    pub no_end_of_block: bool,
    /// A `1` bit is a black pixel
    #[clap(long = "black-is-1")]
    pub black_is_one: bool,
    /// Number of consecutive damaged rows to tolerate
    #[clap(long)]
    pub damaged_rows: Option<u32>,
    /// Treat decoding errors as the end of the data
    #[clap(long)]
    pub lenient: bool,

    /// Decoder parameters as a RON file, e.g. `(Columns: 2480, K: -1)`
    #[clap(long)]
    pub params: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("IO Error")]
    Io(#[from] io::Error),
    #[error("Deserialize Error")]
    Ron(#[from] ron::error::Error),
}

impl ParamArgs {
    /// Load the parameter file (if any) and apply the flags on top
    pub fn config(&self) -> Result<DecoderConfig, ParamsError> {
        let mut config = if let Some(params_path) = &self.params {
            let text = std::fs::read_to_string(params_path)?;
            ron::from_str(&text)?
        } else {
            DecoderConfig::default()
        };
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(rows) = self.rows {
            config.rows = Some(rows);
        }
        if let Some(k) = self.k {
            config.k = k;
        }
        if self.end_of_line {
            config.end_of_line = true;
        }
        if self.encoded_byte_align {
            config.encoded_byte_align = true;
        }
        if self.no_end_of_block {
            config.end_of_block = false;
        }
        if self.black_is_one {
            config.black_is_one = true;
        }
        if let Some(damaged_rows) = self.damaged_rows {
            config.damaged_rows_before_error = damaged_rows;
        }
        if self.lenient {
            config.errors_as_end_of_data = true;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{Format, ParamArgs};

    #[test]
    fn test_format() {
        assert_eq!("png".parse::<Format>().unwrap(), Format::Png);
        assert_eq!("txt".parse::<Format>().unwrap(), Format::Ascii);
        assert!("gif".parse::<Format>().is_err());
        assert_eq!(Format::default().to_string(), "pbm");
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = ParamArgs {
            columns: Some(2480),
            k: Some(-1),
            no_end_of_block: true,
            lenient: true,
            ..ParamArgs::default()
        };
        let config = args.config().unwrap();
        assert_eq!(config.columns, 2480);
        assert_eq!(config.k, -1);
        assert!(!config.end_of_block);
        assert!(config.errors_as_end_of_data);
        assert!(!config.black_is_one);
    }
}
