//! # Code tables
//!
//! The T.4 code words, indexed for lookup by their first `initial_bits`
//! bits. Codes that are longer than that are resolved by a second lookup
//! into a sub-table appended to the same vector.
//!
//! Spec: ITU-T Recommendation T.4 (07/03), Tables 1-4 and Annex A

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::Color;

/// The meaning of a code word
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunValue {
    /// A run of that many pixels (terminating if `< 64`, makeup otherwise)
    Length(u32),
    /// The bits are fill or EOL, which ends the current row
    EndOfLineFollows,
    /// Switch to uncompressed mode
    Uncompressed,
    /// 2-D pass mode
    Pass,
    /// 2-D horizontal mode
    Horizontal,
    /// 2-D vertical mode, with the offset of `a1` relative to `b1`
    Vertical(i8),
    /// 2-D extension other than uncompressed mode
    Extension,
}

/// The meaning of a code word in uncompressed mode
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UncompressedCode {
    /// `white` white pixels, followed by one black pixel if `black` is set
    Pixels {
        /// number of white pixels
        white: u8,
        /// whether a black pixel follows
        black: bool,
    },
    /// `white` white pixels, then leave uncompressed mode; the next run has color `next`
    Exit {
        /// number of white pixels
        white: u8,
        /// the color of the next run
        next: Color,
    },
}

/// A matched code word
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CodeTableEntry<V> {
    /// Number of bits in the code word
    pub code_length: u8,
    /// What the code word stands for
    pub value: V,
}

#[derive(Debug, Copy, Clone)]
pub(crate) enum Slot<V> {
    Empty,
    Code(CodeTableEntry<V>),
    Link { extra_bits: u8, offset: u32 },
}

/// A prefix code, indexed for two-level lookup
#[derive(Debug)]
pub struct CodeTable<V> {
    initial_bits: u32,
    min_bits: u32,
    slots: Vec<Slot<V>>,
}

fn parse_code(code: &str) -> (u32, u32) {
    let bits = code
        .bytes()
        .fold(0, |acc, c| (acc << 1) | u32::from(c == b'1'));
    (bits, code.len() as u32)
}

impl<V: Copy> CodeTable<V> {
    /// Index a list of `(code word, value)` pairs
    ///
    /// The code words are strings of `0` and `1` and must be prefix-free.
    pub fn build(initial_bits: u32, codes: &[(&str, V)]) -> Self {
        let mut slots = vec![Slot::Empty; 1 << initial_bits];
        let mut long: BTreeMap<u32, u32> = BTreeMap::new();
        let mut min_bits = u32::MAX;

        for &(code, value) in codes {
            let (bits, len) = parse_code(code);
            min_bits = min_bits.min(len);
            if len <= initial_bits {
                let shift = initial_bits - len;
                let entry = CodeTableEntry {
                    code_length: len as u8,
                    value,
                };
                for suffix in 0..(1 << shift) {
                    let index = ((bits << shift) | suffix) as usize;
                    debug_assert!(matches!(slots[index], Slot::Empty), "{}", code);
                    slots[index] = Slot::Code(entry);
                }
            } else {
                let prefix = bits >> (len - initial_bits);
                let extra = long.entry(prefix).or_insert(0);
                *extra = (*extra).max(len - initial_bits);
            }
        }

        for (&prefix, &extra) in &long {
            let offset = slots.len();
            debug_assert!(matches!(slots[prefix as usize], Slot::Empty));
            slots[prefix as usize] = Slot::Link {
                extra_bits: extra as u8,
                offset: offset as u32,
            };
            slots.resize(offset + (1 << extra), Slot::Empty);
        }

        for &(code, value) in codes {
            let (bits, len) = parse_code(code);
            if len <= initial_bits {
                continue;
            }
            let rest_len = len - initial_bits;
            let prefix = bits >> rest_len;
            let rest = bits & ((1 << rest_len) - 1);
            if let Slot::Link { extra_bits, offset } = slots[prefix as usize] {
                let shift = u32::from(extra_bits) - rest_len;
                let entry = CodeTableEntry {
                    code_length: len as u8,
                    value,
                };
                for suffix in 0..(1 << shift) {
                    let index = offset as usize + ((rest << shift) | suffix) as usize;
                    debug_assert!(matches!(slots[index], Slot::Empty), "{}", code);
                    slots[index] = Slot::Code(entry);
                }
            }
        }

        Self {
            initial_bits,
            min_bits,
            slots,
        }
    }

    /// Number of bits used for the first lookup
    pub fn initial_bits(&self) -> u32 {
        self.initial_bits
    }

    /// Length of the shortest code word
    pub fn min_bits(&self) -> u32 {
        self.min_bits
    }

    pub(crate) fn slot(&self, index: usize) -> Slot<V> {
        self.slots.get(index).copied().unwrap_or(Slot::Empty)
    }

    /// Find the code word at the start of `bits`, which holds `len` bits
    ///
    /// Returns `None` if the bits are no valid code word, or if they are
    /// too short to tell.
    #[cfg(test)]
    fn lookup(&self, bits: u32, len: u32) -> Option<CodeTableEntry<V>> {
        if len < self.initial_bits {
            return self
                .lookup(bits << (self.initial_bits - len), self.initial_bits)
                .filter(|entry| u32::from(entry.code_length) <= len);
        }
        let first = (bits >> (len - self.initial_bits)) as usize;
        match self.slot(first) {
            Slot::Empty => None,
            Slot::Code(entry) => Some(entry),
            Slot::Link { extra_bits, offset } => {
                let extra = u32::from(extra_bits);
                let rest_len = len - self.initial_bits;
                let rest = bits & ((1u32 << rest_len) - 1);
                let rest = if rest_len >= extra {
                    rest >> (rest_len - extra)
                } else {
                    rest << (extra - rest_len)
                };
                match self.slot(offset as usize + rest as usize) {
                    Slot::Code(entry) if u32::from(entry.code_length) <= len => Some(entry),
                    _ => None,
                }
            }
        }
    }
}

#[rustfmt::skip]
const WHITE_TERMINATING: [&str; 64] = [
    "00110101", "000111", "0111", "1000", "1011", "1100", "1110", "1111",
    "10011", "10100", "00111", "01000", "001000", "000011", "110100", "110101",
    "101010", "101011", "0100111", "0001100", "0001000", "0010111", "0000011", "0000100",
    "0101000", "0101011", "0010011", "0100100", "0011000", "00000010", "00000011", "00011010",
    "00011011", "00010010", "00010011", "00010100", "00010101", "00010110", "00010111", "00101000",
    "00101001", "00101010", "00101011", "00101100", "00101101", "00000100", "00000101", "00001010",
    "00001011", "01010010", "01010011", "01010100", "01010101", "00100100", "00100101", "01011000",
    "01011001", "01011010", "01011011", "01001010", "01001011", "00110010", "00110011", "00110100",
];

/// Makeup codes for 64, 128, ..., 1728
#[rustfmt::skip]
const WHITE_MAKEUP: [&str; 27] = [
    "11011", "10010", "010111", "0110111", "00110110", "00110111", "01100100", "01100101",
    "01101000", "01100111", "011001100", "011001101", "011010010", "011010011", "011010100",
    "011010101", "011010110", "011010111", "011011000", "011011001", "011011010", "011011011",
    "010011000", "010011001", "010011010", "011000", "010011011",
];

#[rustfmt::skip]
const BLACK_TERMINATING: [&str; 64] = [
    "0000110111", "010", "11", "10", "011", "0011", "0010", "00011",
    "000101", "000100", "0000100", "0000101", "0000111", "00000100", "00000111", "000011000",
    "0000010111", "0000011000", "0000001000", "00001100111", "00001101000", "00001101100", "00000110111", "00000101000",
    "00000010111", "00000011000", "000011001010", "000011001011", "000011001100", "000011001101", "000001101000", "000001101001",
    "000001101010", "000001101011", "000011010010", "000011010011", "000011010100", "000011010101", "000011010110", "000011010111",
    "000001101100", "000001101101", "000011011010", "000011011011", "000001010100", "000001010101", "000001010110", "000001010111",
    "000001100100", "000001100101", "000001010010", "000001010011", "000000100100", "000000110111", "000000111000", "000000100111",
    "000000101000", "000001011000", "000001011001", "000000101011", "000000101100", "000001011010", "000001100110", "000001100111",
];

/// Makeup codes for 64, 128, ..., 1728
#[rustfmt::skip]
const BLACK_MAKEUP: [&str; 27] = [
    "0000001111", "000011001000", "000011001001", "000001011011", "000000110011", "000000110100",
    "000000110101", "0000001101100", "0000001101101", "0000001001010", "0000001001011",
    "0000001001100", "0000001001101", "0000001110010", "0000001110011", "0000001110100",
    "0000001110101", "0000001110110", "0000001110111", "0000001010010", "0000001010011",
    "0000001010100", "0000001010101", "0000001011010", "0000001011011", "0000001100100",
    "0000001100101",
];

/// Makeup codes for 1792, 1856, ..., 2560, shared by both colors
#[rustfmt::skip]
const EXTENDED_MAKEUP: [&str; 13] = [
    "00000001000", "00000001100", "00000001101", "000000010010", "000000010011",
    "000000010100", "000000010101", "000000010110", "000000010111", "000000011100",
    "000000011101", "000000011110", "000000011111",
];

/// The EOL code
pub const EOL: u32 = 0b0000_0000_0001;
/// Length of the EOL code
pub const EOL_BITS: u32 = 12;

fn run_codes(
    terminating: &'static [&'static str; 64],
    makeup: &'static [&'static str; 27],
) -> Vec<(&'static str, RunValue)> {
    let mut codes = Vec::with_capacity(64 + 27 + 13 + 3);
    for (len, code) in terminating.iter().enumerate() {
        codes.push((*code, RunValue::Length(len as u32)));
    }
    for (i, code) in makeup.iter().enumerate() {
        codes.push((*code, RunValue::Length(64 * (i as u32 + 1))));
    }
    for (i, code) in EXTENDED_MAKEUP.iter().enumerate() {
        codes.push((*code, RunValue::Length(1792 + 64 * i as u32)));
    }
    codes.push(("000000000001", RunValue::EndOfLineFollows));
    codes.push(("000000000000", RunValue::EndOfLineFollows));
    codes.push(("000000001111", RunValue::Uncompressed));
    codes
}

/// White run lengths
pub static WHITE: Lazy<CodeTable<RunValue>> =
    Lazy::new(|| CodeTable::build(9, &run_codes(&WHITE_TERMINATING, &WHITE_MAKEUP)));

/// Black run lengths
pub static BLACK: Lazy<CodeTable<RunValue>> =
    Lazy::new(|| CodeTable::build(8, &run_codes(&BLACK_TERMINATING, &BLACK_MAKEUP)));

/// 2-D mode codes
pub static MODE: Lazy<CodeTable<RunValue>> = Lazy::new(|| {
    use RunValue::*;
    CodeTable::build(
        7,
        &[
            ("1", Vertical(0)),
            ("011", Vertical(1)),
            ("010", Vertical(-1)),
            ("001", Horizontal),
            ("0001", Pass),
            ("000011", Vertical(2)),
            ("000010", Vertical(-2)),
            ("0000011", Vertical(3)),
            ("0000010", Vertical(-3)),
            ("0000001000", Extension),
            ("0000001001", Extension),
            ("0000001010", Extension),
            ("0000001011", Extension),
            ("0000001100", Extension),
            ("0000001101", Extension),
            ("0000001110", Extension),
            ("0000001111", Uncompressed),
            ("0000000", EndOfLineFollows),
        ],
    )
});

/// Uncompressed mode codes
pub static UNCOMPRESSED: Lazy<CodeTable<UncompressedCode>> = Lazy::new(|| {
    use Color::*;
    use UncompressedCode::*;
    CodeTable::build(
        6,
        &[
            ("1", Pixels { white: 0, black: true }),
            ("01", Pixels { white: 1, black: true }),
            ("001", Pixels { white: 2, black: true }),
            ("0001", Pixels { white: 3, black: true }),
            ("00001", Pixels { white: 4, black: true }),
            ("000001", Pixels { white: 5, black: false }),
            ("00000010", Exit { white: 0, next: White }),
            ("00000011", Exit { white: 0, next: Black }),
            ("000000010", Exit { white: 1, next: White }),
            ("000000011", Exit { white: 1, next: Black }),
            ("0000000010", Exit { white: 2, next: White }),
            ("0000000011", Exit { white: 2, next: Black }),
            ("00000000010", Exit { white: 3, next: White }),
            ("00000000011", Exit { white: 3, next: Black }),
            ("000000000010", Exit { white: 4, next: White }),
            ("000000000011", Exit { white: 4, next: Black }),
        ],
    )
});

/// The run-length table for a color
pub fn run_table(color: Color) -> &'static CodeTable<RunValue> {
    match color {
        Color::White => &WHITE,
        Color::Black => &BLACK,
    }
}

/// Write the code words for a run of `len` pixels of `color`
pub(crate) fn run_code_words(color: Color, mut len: u32, mut emit: impl FnMut(u32, u32)) {
    let (terminating, makeup) = match color {
        Color::White => (&WHITE_TERMINATING, &WHITE_MAKEUP),
        Color::Black => (&BLACK_TERMINATING, &BLACK_MAKEUP),
    };
    let mut put = |code: &str| {
        let (bits, len) = parse_code(code);
        emit(bits, len);
    };
    while len >= 2560 {
        put(EXTENDED_MAKEUP[12]);
        len -= 2560;
    }
    if len >= 1792 {
        put(EXTENDED_MAKEUP[(len / 64 - 28) as usize]);
    } else if len >= 64 {
        put(makeup[(len / 64 - 1) as usize]);
    }
    put(terminating[(len % 64) as usize]);
}
