//! # CCITT Group 3 1D-encoding
//!
//! Each row is a sequence of alternating white and black runs, starting
//! with white.
//!
//! Spec: ITU-T Recommendation T.4 (07/03) <https://www.itu.int/rec/T-REC-T.4-200307-I/en>

use crate::{
    bits::BitCursor,
    error::CodeError,
    row::{Line, RowBuffer, Step},
    run::decode_run,
    tables::{run_table, RunValue},
    uncompressed, Malformed,
};

/// Continue decoding a 1-D coded row until it is complete
pub(crate) fn decode_row(
    cursor: &mut BitCursor<'_>,
    line: &mut Line,
    row: &mut RowBuffer,
) -> Result<(), CodeError> {
    while !line.is_done(row.columns()) {
        if line.step == Step::Uncompressed {
            uncompressed::decode_step(cursor, line, row)?;
            continue;
        }
        match decode_run(cursor, run_table(line.color), &mut line.run)? {
            RunValue::Length(len) => line.put_run(row, len)?,
            RunValue::Uncompressed if line.run == 0 => line.step = Step::Uncompressed,
            RunValue::EndOfLineFollows => return Err(Malformed::UnexpectedEndOfLine.into()),
            _ => return Err(Malformed::InvalidCode.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::decode_row;
    use crate::{
        bits::{BitCursor, BitWriter},
        error::CodeError,
        row::{Line, RowBuffer},
        Malformed,
    };

    #[test]
    fn test_decode_row() {
        let mut bw = BitWriter::new();
        bw.write_bits(0b0111, 4); // 2 white
        bw.write_bits(0b10, 2); // 3 black
        bw.write_bits(0b1100, 4); // 5 white
        let data = bw.done();

        let mut cursor = BitCursor::new(&data, true);
        let mut row = RowBuffer::new(10, 2);
        let mut line = Line::default();
        decode_row(&mut cursor, &mut line, &mut row).unwrap();
        assert_eq!(row.as_bytes(), &[0b0011_1000, 0x00]);
        assert_eq!(cursor.available(), 6);
    }

    #[test]
    fn test_overshoot() {
        let mut bw = BitWriter::new();
        bw.write_bits(0b1111, 4); // 7 white
        bw.write_bits(0b0011, 4); // 5 black
        let data = bw.done();

        let mut cursor = BitCursor::new(&data, true);
        let mut row = RowBuffer::new(10, 2);
        let mut line = Line::default();
        assert_eq!(
            decode_row(&mut cursor, &mut line, &mut row),
            Err(CodeError::Malformed(Malformed::Overshoot))
        );
        assert_eq!(line.a0, 7);
    }

    #[test]
    fn test_resume_row() {
        let mut bw = BitWriter::new();
        bw.write_bits(0b11011, 5); // 64 white
        bw.write_bits(0b00110101, 8); // 0 white
        bw.write_bits(0b0000001111, 10); // 64 black
        bw.write_bits(0b0000110111, 10); // 0 black
        let data = bw.done();

        let mut row = RowBuffer::new(128, 16);
        let mut line = Line::default();
        let mut state = Default::default();
        for (i, byte) in data.iter().enumerate() {
            let last = i + 1 == data.len();
            let mut cursor = BitCursor::resume(state, std::slice::from_ref(byte), last);
            let result = decode_row(&mut cursor, &mut line, &mut row);
            if last {
                assert_eq!(result, Ok(()));
            } else {
                assert_eq!(result, Err(CodeError::NeedMoreInput));
            }
            state = cursor.suspend().0;
        }
        assert_eq!(&row.as_bytes()[..8], &[0; 8]);
        assert_eq!(&row.as_bytes()[8..], &[0xFF; 8]);
    }
}
