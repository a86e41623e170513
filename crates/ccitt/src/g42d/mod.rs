//! # CCITT Group 4 2D-encoding
//!
//! Each row is coded relative to the one above it (the reference row),
//! using the changing elements `b1` and `b2` of that row.
//!
//! Spec: ITU-T Recommendation T.6 (11/88) <https://www.itu.int/rec/T-REC-T.6-198811-I/en>

use crate::{
    bits::BitCursor,
    error::CodeError,
    row::{Line, RowBuffer, Step},
    run::{decode_run, peek_code},
    tables::{run_table, RunValue, MODE},
    uncompressed, Malformed,
};

/// Continue decoding a 2-D coded row until it is complete
pub(crate) fn decode_row(
    cursor: &mut BitCursor<'_>,
    line: &mut Line,
    current: &mut RowBuffer,
    reference: &RowBuffer,
) -> Result<(), CodeError> {
    while !line.is_done(current.columns()) {
        match line.step {
            Step::Uncompressed => uncompressed::decode_step(cursor, line, current)?,
            Step::HorizontalFirst | Step::HorizontalSecond => {
                match decode_run(cursor, run_table(line.color), &mut line.run)? {
                    RunValue::Length(len) => {
                        line.put_run(current, len)?;
                        line.step = match line.step {
                            Step::HorizontalFirst => Step::HorizontalSecond,
                            _ => Step::Code,
                        };
                    }
                    RunValue::EndOfLineFollows => {
                        return Err(Malformed::UnexpectedEndOfLine.into())
                    }
                    _ => return Err(Malformed::InvalidCode.into()),
                }
            }
            Step::Code => decode_mode(cursor, line, current, reference)?,
        }
    }
    Ok(())
}

fn decode_mode(
    cursor: &mut BitCursor<'_>,
    line: &mut Line,
    current: &mut RowBuffer,
    reference: &RowBuffer,
) -> Result<(), CodeError> {
    let entry = peek_code(cursor, &MODE)?;
    match entry.value {
        RunValue::EndOfLineFollows => return Err(Malformed::UnexpectedEndOfLine.into()),
        RunValue::Extension => return Err(Malformed::UnsupportedExtension.into()),
        _ => {}
    }

    match entry.value {
        RunValue::Vertical(offset) => {
            let (b1, _) = reference.transitions(line.a0, line.first, line.color);
            let a1 = i64::from(b1) + i64::from(offset);
            if a1 < i64::from(line.a0) {
                return Err(Malformed::BadReference.into());
            }
            let a1 = u32::try_from(a1).map_err(|_| Malformed::Overshoot)?;
            line.advance(current, a1)?;
            line.color.invert();
        }
        RunValue::Pass => {
            let (_, b2) = reference.transitions(line.a0, line.first, line.color);
            line.advance(current, b2)?;
        }
        RunValue::Horizontal => {
            line.run = 0;
            line.step = Step::HorizontalFirst;
        }
        RunValue::Uncompressed => line.step = Step::Uncompressed,
        _ => return Err(Malformed::InvalidCode.into()),
    }
    cursor.skip(entry.code_length.into());
    Ok(())
}
