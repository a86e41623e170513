//! # End-of-line detection
//!
//! An EOL code is eleven zero bits followed by a one. Any number of
//! additional zero bits may precede it as fill.

use crate::{bits::BitCursor, NeedMoreInput};

/// Result of [`EolScanner::scan_eol`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EolOutcome {
    /// An EOL code was consumed
    Found,
    /// The next bits are no EOL code. Nothing was consumed, but the given
    /// number of bits can not be the start of an EOL either.
    NotFound(u32),
}

/// Finds EOL codes, possibly across multiple calls
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct EolScanner {
    zeros: u32,
}

impl EolScanner {
    /// Look for an EOL code at the current position
    pub fn scan_eol(&mut self, cursor: &mut BitCursor<'_>) -> Result<EolOutcome, NeedMoreInput> {
        if self.zeros < 11 {
            let avail = cursor.fill(12);
            let zeros = cursor.peek::<12>().leading_zeros() - 20;
            if zeros < 11 && zeros < avail {
                return Ok(EolOutcome::NotFound(zeros + 1));
            }
            if avail < 11 {
                return Err(NeedMoreInput);
            }
            cursor.skip(11);
            self.zeros = 11;
        }

        loop {
            let avail = cursor.fill(32).min(32);
            if avail == 0 {
                return Err(NeedMoreInput);
            }
            let bits = cursor.peek_var(avail);
            if bits == 0 {
                cursor.skip(avail);
                continue;
            }
            let zeros = bits.leading_zeros() - (32 - avail);
            cursor.skip(zeros + 1);
            self.zeros = 0;
            return Ok(EolOutcome::Found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EolOutcome, EolScanner};
    use crate::{bits::BitCursor, NeedMoreInput};

    #[test]
    fn test_eol() {
        let data = [0x00, 0x1A];
        let mut cursor = BitCursor::new(&data, true);
        let mut scanner = EolScanner::default();
        assert_eq!(scanner.scan_eol(&mut cursor), Ok(EolOutcome::Found));
        assert_eq!(cursor.available(), 4);
        assert_eq!(cursor.peek::<4>(), 0b1010);
    }

    #[test]
    fn test_not_eol() {
        let data = [0b0001_0000, 0x00];
        let mut cursor = BitCursor::new(&data, true);
        let mut scanner = EolScanner::default();
        assert_eq!(scanner.scan_eol(&mut cursor), Ok(EolOutcome::NotFound(4)));
        assert_eq!(cursor.available(), 16);
    }

    #[test]
    fn test_fill_before_eol() {
        // 21 zeros, then a one
        let data = [0x00, 0x00, 0b0000_0100];
        let mut scanner = EolScanner::default();
        let mut cursor = BitCursor::new(&data[..1], false);
        assert_eq!(scanner.scan_eol(&mut cursor), Err(NeedMoreInput));
        assert_eq!(scanner.zeros, 0);
        let (state, consumed) = cursor.suspend();
        assert_eq!(consumed, 1);

        let mut cursor = BitCursor::resume(state, &data[1..2], false);
        assert_eq!(scanner.scan_eol(&mut cursor), Err(NeedMoreInput));
        assert_eq!(scanner.zeros, 11);
        let (state, _) = cursor.suspend();

        let mut cursor = BitCursor::resume(state, &data[2..], true);
        assert_eq!(scanner.scan_eol(&mut cursor), Ok(EolOutcome::Found));
        assert_eq!(cursor.available(), 2);
        assert!(cursor.rest_is_zero());
    }
}
