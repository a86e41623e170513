//! # Streaming decoder
//!
//! The [`Decoder`] is a state machine that is driven by repeated calls to
//! [`Decoder::feed`]. Every call may stop at any bit of the input, when it
//! runs out of input, or at any byte of the output, when it runs out of
//! room. The next call picks up exactly where the last one stopped.

use log::{debug, trace, warn};

use crate::{
    bits::{BitCursor, BitState},
    eol::{EolOutcome, EolScanner},
    error::CodeError,
    g3, g42d,
    row::{Line, RowBuffer},
    DecoderConfig, FaxError, FaxResult, Malformed,
};

/// Why a call to [`Decoder::feed`] returned
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    /// All input was consumed, call again with more
    NeedInput,
    /// The output buffer is full, call again with more room
    NeedOutput,
    /// The image is complete
    EndOfData,
}

/// Result of a call to [`Decoder::feed`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Number of input bytes consumed
    pub consumed: usize,
    /// Number of output bytes written
    pub produced: usize,
    /// Why the call returned
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    /// Between rows, looking for EOL codes
    StartRow { aligned: bool },
    /// Reading the 1-D/2-D tag bit
    ModeTag,
    /// Within a row
    Decoding,
    /// Copying the finished row to the output
    Emit { offset: usize, damaged: bool },
    /// Discarding bits up to the next EOL
    SkipDamage,
    Done,
    Failed(FaxError),
}

/// A decoder for one CCITT encoded image
#[derive(Debug)]
pub struct Decoder {
    config: DecoderConfig,
    bits: BitState,
    eol: EolScanner,
    current: RowBuffer,
    reference: RowBuffer,
    line: Line,
    phase: Phase,
    row: u32,
    eol_count: u32,
    two_d: bool,
    tag: Option<bool>,
    damaged: u32,
    damaged_total: u32,
}

impl Decoder {
    /// Create a new decoder
    pub fn new(config: DecoderConfig) -> FaxResult<Self> {
        config.validate()?;
        debug!("Starting CCITT decoder: {:?}", config);
        let raster = config.raster();
        Ok(Self {
            current: RowBuffer::new(config.columns, raster),
            reference: RowBuffer::new(config.columns, raster),
            config,
            bits: BitState::default(),
            eol: EolScanner::default(),
            line: Line::default(),
            phase: Phase::StartRow { aligned: false },
            row: 0,
            eol_count: 0,
            two_d: false,
            tag: None,
            damaged: 0,
            damaged_total: 0,
        })
    }

    /// The parameters of this session
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Number of rows completed so far
    pub fn rows(&self) -> u32 {
        self.row
    }

    /// Number of damaged rows so far
    pub fn damaged_rows(&self) -> u32 {
        self.damaged_total
    }

    /// Decode as much of `input` into `output` as possible
    ///
    /// `end_of_input` signals that `input` holds all the remaining data.
    /// Input bytes that are reported as consumed must not be passed again.
    ///
    /// If a fatal error follows rows that were written to `output` in the
    /// same call, those rows are returned with [`Status::NeedOutput`] and
    /// the next call reports the error.
    pub fn feed(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        end_of_input: bool,
    ) -> FaxResult<Progress> {
        let mut cursor = BitCursor::resume(self.bits, input, end_of_input);
        let mut produced = 0;
        let result = self.step(&mut cursor, output, &mut produced);
        let (bits, consumed) = cursor.suspend();
        self.bits = bits;

        let status = match result {
            Ok(status) => status,
            Err(e) if self.config.errors_as_end_of_data => {
                debug!("Ending data early: {}", e);
                self.phase = Phase::Done;
                Status::EndOfData
            }
            Err(e) => {
                self.phase = Phase::Failed(e.clone());
                if produced == 0 {
                    return Err(e);
                }
                Status::NeedOutput
            }
        };
        Ok(Progress {
            consumed,
            produced,
            status,
        })
    }

    fn step(
        &mut self,
        cursor: &mut BitCursor<'_>,
        output: &mut [u8],
        produced: &mut usize,
    ) -> FaxResult<Status> {
        loop {
            let status = match self.phase {
                Phase::Failed(ref e) => return Err(e.clone()),
                Phase::Done => Some(Status::EndOfData),
                Phase::StartRow { aligned } => self.start_row(cursor, aligned)?,
                Phase::ModeTag => self.mode_tag(cursor),
                Phase::Decoding => self.decode_row(cursor)?,
                Phase::Emit { offset, damaged } => self.emit(output, produced, offset, damaged),
                Phase::SkipDamage => self.skip_damage(cursor),
            };
            if let Some(status) = status {
                return Ok(status);
            }
        }
    }

    fn end_of_data(&mut self, reason: &str) -> Option<Status> {
        debug!("End of data after {} rows: {}", self.row, reason);
        self.phase = Phase::Done;
        Some(Status::EndOfData)
    }

    fn input_exhausted(&mut self) -> Option<Status> {
        if self.config.end_of_block {
            warn!("Data ended after {} rows without EOFB/RTC", self.row);
        }
        self.end_of_data("input exhausted")
    }

    fn start_row(
        &mut self,
        cursor: &mut BitCursor<'_>,
        aligned: bool,
    ) -> FaxResult<Option<Status>> {
        if let Some(rows) = self.config.rows {
            if self.row >= rows {
                return Ok(self.end_of_data("row limit reached"));
            }
        }
        if cursor.is_last() && cursor.rest_is_zero() {
            return Ok(self.input_exhausted());
        }
        // with EOLs in T.4, the fill before each EOL does the alignment
        let eol_aligned = self.config.end_of_line && self.config.k >= 0;
        if !aligned && self.config.encoded_byte_align && !eol_aligned {
            cursor.align();
        }
        self.phase = Phase::StartRow { aligned: true };

        let status = match self.eol.scan_eol(cursor) {
            Ok(EolOutcome::Found) => {
                self.eol_count += 1;
                trace!("EOL #{} before row {}", self.eol_count, self.row);
                if self.eol_count >= self.config.end_of_data_eols() {
                    return Ok(self.end_of_data("EOFB/RTC"));
                }
                if self.config.k > 0 {
                    self.phase = Phase::ModeTag;
                }
                None
            }
            Ok(EolOutcome::NotFound(_)) => {
                if self.config.end_of_line && self.eol_count == 0 && self.row > 0 {
                    self.missing_eol()?;
                    return Ok(None);
                }
                if self.config.k > 0 && self.tag.is_none() {
                    self.phase = Phase::ModeTag;
                    return Ok(None);
                }
                if self.config.end_of_line && self.eol_count == 0 {
                    warn!("Missing EOL before row {}", self.row);
                }
                self.begin_row();
                None
            }
            Err(_) if cursor.is_last() => self.input_exhausted(),
            Err(_) => Some(Status::NeedInput),
        };
        Ok(status)
    }

    /// The previous row ended before its codes did
    fn missing_eol(&mut self) -> FaxResult<()> {
        if !self.config.recovers_damage() {
            return Err(FaxError::Malformed {
                row: self.row,
                column: 0,
                kind: Malformed::MissingEndOfLine,
            });
        }
        let row = self.row - 1;
        self.count_damage(row)?;
        warn!("Damaged row {}: {}", row, Malformed::MissingEndOfLine);
        self.phase = Phase::SkipDamage;
        Ok(())
    }

    fn mode_tag(&mut self, cursor: &mut BitCursor<'_>) -> Option<Status> {
        if cursor.ensure(1).is_err() {
            if cursor.is_last() {
                return self.input_exhausted();
            }
            return Some(Status::NeedInput);
        }
        self.tag = Some(cursor.peek::<1>() == 1);
        cursor.skip(1);
        self.phase = Phase::StartRow { aligned: true };
        None
    }

    fn begin_row(&mut self) {
        self.two_d = match self.config.k {
            k if k < 0 => true,
            0 => false,
            _ => self.tag == Some(false),
        };
        self.tag = None;
        self.eol_count = 0;
        self.current.clear();
        self.line = Line::default();
        self.phase = Phase::Decoding;
    }

    fn decode_row(&mut self, cursor: &mut BitCursor<'_>) -> FaxResult<Option<Status>> {
        let result = if self.two_d {
            g42d::decode_row(cursor, &mut self.line, &mut self.current, &self.reference)
        } else {
            g3::decode_row(cursor, &mut self.line, &mut self.current)
        };
        match result {
            Ok(()) => {
                self.damaged = 0;
                self.finish_row(false);
            }
            Err(CodeError::NeedMoreInput) if !cursor.is_last() => {
                return Ok(Some(Status::NeedInput));
            }
            Err(CodeError::NeedMoreInput) => self.damaged_row(Malformed::Truncated)?,
            Err(CodeError::Malformed(kind)) => self.damaged_row(kind)?,
        }
        Ok(None)
    }

    fn damaged_row(&mut self, kind: Malformed) -> FaxResult<()> {
        let column = self.line.a0;
        if !self.config.recovers_damage() {
            return Err(FaxError::Malformed {
                row: self.row,
                column,
                kind,
            });
        }
        self.count_damage(self.row)?;
        warn!("Damaged row {} at column {}: {}", self.row, column, kind);
        self.finish_row(true);
        Ok(())
    }

    fn count_damage(&mut self, row: u32) -> FaxResult<()> {
        self.damaged += 1;
        self.damaged_total += 1;
        if self.damaged > self.config.damaged_rows_before_error {
            return Err(FaxError::TooManyDamagedRows {
                row,
                count: self.damaged,
            });
        }
        Ok(())
    }

    fn finish_row(&mut self, damaged: bool) {
        trace!("Finished row {}", self.row);
        std::mem::swap(&mut self.current, &mut self.reference);
        self.row += 1;
        self.phase = Phase::Emit { offset: 0, damaged };
    }

    fn emit(
        &mut self,
        output: &mut [u8],
        produced: &mut usize,
        offset: usize,
        damaged: bool,
    ) -> Option<Status> {
        let row = self.reference.as_bytes();
        let room = &mut output[*produced..];
        let n = (row.len() - offset).min(room.len());
        for (dst, src) in room[..n].iter_mut().zip(&row[offset..offset + n]) {
            *dst = if self.config.black_is_one { *src } else { !*src };
        }
        *produced += n;

        if offset + n < row.len() {
            self.phase = Phase::Emit {
                offset: offset + n,
                damaged,
            };
            return Some(Status::NeedOutput);
        }
        self.phase = if damaged {
            Phase::SkipDamage
        } else {
            Phase::StartRow { aligned: false }
        };
        None
    }

    fn skip_damage(&mut self, cursor: &mut BitCursor<'_>) -> Option<Status> {
        match self.eol.scan_eol(cursor) {
            Ok(EolOutcome::Found) => {
                trace!("Resynchronized before row {}", self.row);
                self.eol_count = 1;
                self.tag = None;
                self.phase = if self.config.k > 0 {
                    Phase::ModeTag
                } else {
                    Phase::StartRow { aligned: true }
                };
                None
            }
            Ok(EolOutcome::NotFound(n)) => {
                cursor.skip(n);
                None
            }
            Err(_) if cursor.is_last() => self.end_of_data("input exhausted while skipping damage"),
            Err(_) => Some(Status::NeedInput),
        }
    }
}
