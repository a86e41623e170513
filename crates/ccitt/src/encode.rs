//! # Encoder
//!
//! Produces streams that [`Decoder`](crate::Decoder) accepts with the same
//! [`DecoderConfig`]. Uncompressed mode is never used.

use log::debug;

use crate::{
    bits::BitWriter,
    row::RowBuffer,
    tables::{run_code_words, EOL, EOL_BITS},
    Color, DecoderConfig, FaxError, FaxResult,
};

/// The encoder
#[derive(Debug)]
pub struct Encoder {
    config: DecoderConfig,
    output: BitWriter,
    reference: RowBuffer,
    current: RowBuffer,
    row: u32,
}

impl Encoder {
    /// Create a new encoder
    pub fn new(config: &DecoderConfig) -> FaxResult<Self> {
        config.validate()?;
        let raster = config.raster();
        Ok(Self {
            config: config.clone(),
            output: BitWriter::new(),
            reference: RowBuffer::new(config.columns, raster),
            current: RowBuffer::new(config.columns, raster),
            row: 0,
        })
    }

    fn eol_aligned(&self) -> bool {
        self.config.encoded_byte_align && self.config.end_of_line && self.config.k >= 0
    }

    fn row_aligned(&self) -> bool {
        self.config.encoded_byte_align && !(self.config.end_of_line && self.config.k >= 0)
    }

    fn write_eol(&mut self) {
        if self.eol_aligned() {
            while (self.output.bit_len() + EOL_BITS as usize) % 8 != 0 {
                self.output.write(false);
            }
        }
        self.output.write_bits(EOL, EOL_BITS);
    }

    fn write_run(&mut self, color: Color, len: u32) {
        let output = &mut self.output;
        run_code_words(color, len, |bits, len| output.write_bits(bits, len));
    }

    /// Append one row, packed like the decoder output
    pub fn encode_row(&mut self, row: &[u8]) -> FaxResult<()> {
        if row.len() < (self.config.columns as usize).div_ceil(8) {
            return Err(FaxError::InvalidRow {
                row: self.row,
                reason: "shorter than the image width",
            });
        }
        if let Some(rows) = self.config.rows {
            if self.row >= rows {
                return Err(FaxError::InvalidRow {
                    row: self.row,
                    reason: "more rows than configured",
                });
            }
        }
        self.current.load(row, !self.config.black_is_one);

        if self.row_aligned() {
            self.output.flush();
        }
        if self.config.end_of_line {
            self.write_eol();
        }
        let k = self.config.k;
        let two_d = k < 0 || (k > 0 && self.row % k as u32 != 0);
        if k > 0 {
            self.output.write(!two_d);
        }
        if two_d {
            self.encode_2d();
        } else {
            self.encode_1d();
        }

        std::mem::swap(&mut self.current, &mut self.reference);
        self.row += 1;
        Ok(())
    }

    fn encode_1d(&mut self) {
        let columns = self.current.columns();
        let mut a0 = 0;
        let mut color = Color::White;
        loop {
            let a1 = self.current.find(a0, !color);
            self.write_run(color, a1 - a0);
            a0 = a1;
            if a0 >= columns {
                break;
            }
            color.invert();
        }
    }

    fn encode_2d(&mut self) {
        let columns = self.current.columns();
        let mut a0 = 0;
        let mut first = true;
        let mut color = Color::White;
        loop {
            let (a1, a2) = self.current.transitions(a0, first, color);
            let (b1, b2) = self.reference.transitions(a0, first, color);

            if b2 < a1 {
                self.output.write_bits(0b0001, 4);
                a0 = b2;
            } else {
                match i64::from(a1) - i64::from(b1) {
                    -3 => self.output.write_bits(0b0000010, 7),
                    -2 => self.output.write_bits(0b000010, 6),
                    -1 => self.output.write_bits(0b010, 3),
                    0 => self.output.write_bits(0b1, 1),
                    1 => self.output.write_bits(0b011, 3),
                    2 => self.output.write_bits(0b000011, 6),
                    3 => self.output.write_bits(0b0000011, 7),
                    _ => {
                        self.output.write_bits(0b001, 3);
                        self.write_run(color, a1 - a0);
                        self.write_run(!color, a2 - a1);
                        a0 = a2;
                        first = false;
                        if a0 >= columns {
                            break;
                        }
                        continue;
                    }
                }
                a0 = a1;
                color.invert();
            }
            first = false;
            if a0 >= columns {
                break;
            }
        }
    }

    /// Write the end-of-data marker, if configured, and return the stream
    pub fn finish(mut self) -> Vec<u8> {
        if self.config.end_of_block {
            if self.row_aligned() {
                self.output.flush();
            }
            for _ in 0..self.config.end_of_data_eols() {
                self.write_eol();
                if self.config.k > 0 {
                    self.output.write(true);
                }
            }
        }
        let data = self.output.done();
        debug!("Encoded {} rows into {} bytes", self.row, data.len());
        data
    }
}
