//! # Bit Cursor and Writer
//!
//! Both sides of the codec see the data as a sequence of bits, most
//! significant bit of each byte first.

use crate::NeedMoreInput;

/// Bits that were pulled from the input but not yet consumed
///
/// This is what survives between two calls to [`Decoder::feed`](crate::Decoder::feed).
/// The valid bits are left-aligned in `acc`; all bits after them are zero.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BitState {
    acc: u64,
    avail: u32,
}

/// Read bits from a slice, on top of some previously buffered bits
#[derive(Debug)]
pub struct BitCursor<'a> {
    input: &'a [u8],
    consumed: usize,
    acc: u64,
    avail: u32,
    last: bool,
}

impl<'a> BitCursor<'a> {
    /// Creates a new instance with no buffered bits
    pub fn new(input: &'a [u8], last: bool) -> Self {
        Self::resume(BitState::default(), input, last)
    }

    /// Continue with the bits from a previous call
    ///
    /// `last` signals that no input follows after `input`.
    pub fn resume(state: BitState, input: &'a [u8], last: bool) -> Self {
        Self {
            input,
            consumed: 0,
            acc: state.acc,
            avail: state.avail,
            last,
        }
    }

    /// Save the buffered bits, returning them with the number of bytes read
    pub fn suspend(self) -> (BitState, usize) {
        let state = BitState {
            acc: self.acc,
            avail: self.avail,
        };
        (state, self.consumed)
    }

    /// Pull whole bytes from the input until at least `n` bits are buffered
    /// or the input is exhausted. Returns the number of buffered bits.
    pub fn fill(&mut self, n: u32) -> u32 {
        debug_assert!(n <= 32);
        while self.avail < n {
            let Some((&byte, rest)) = self.input.split_first() else {
                break;
            };
            self.acc |= u64::from(byte) << (56 - self.avail);
            self.avail += 8;
            self.input = rest;
            self.consumed += 1;
        }
        self.avail
    }

    /// Make sure that `n` bits can be peeked
    ///
    /// On failure, nothing is consumed, so the same call can be repeated
    /// once more input is available.
    pub fn ensure(&mut self, n: u32) -> Result<(), NeedMoreInput> {
        if self.fill(n) >= n {
            Ok(())
        } else {
            Err(NeedMoreInput)
        }
    }

    /// Get the next `N` bits without consuming them
    pub fn peek<const N: u32>(&self) -> u32 {
        self.peek_var(N)
    }

    /// Get the next `n` bits without consuming them
    ///
    /// Bits past the buffered ones read as zero.
    pub fn peek_var(&self, n: u32) -> u32 {
        debug_assert!(n <= 32);
        if n == 0 {
            0
        } else {
            (self.acc >> (64 - n)) as u32
        }
    }

    /// Consume `n` buffered bits
    pub fn skip(&mut self, n: u32) {
        debug_assert!(n <= self.avail);
        let n = n.min(self.avail);
        self.acc = if n >= 64 { 0 } else { self.acc << n };
        self.avail -= n;
    }

    /// Drop the bits up to the next byte boundary of the input
    pub fn align(&mut self) {
        self.skip(self.avail % 8);
    }

    /// Number of bits that are buffered
    pub fn available(&self) -> u32 {
        self.avail
    }

    /// Whether the caller said that no more input will follow
    pub fn is_last(&self) -> bool {
        self.last
    }

    /// Whether all remaining bits (buffered and unread) are zero
    pub fn rest_is_zero(&self) -> bool {
        self.acc == 0 && self.input.iter().all(|b| *b == 0)
    }
}

/// A bitwise writer
#[derive(Debug, Default)]
pub struct BitWriter {
    buffer: Vec<u8>,
    curr: u8,
    used: u32,
}

impl BitWriter {
    /// Creates a new instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a single bit
    pub fn write(&mut self, b: bool) {
        self.write_bits(u32::from(b), 1);
    }

    /// Write the lowest `len` bits of `val`, most significant first
    pub fn write_bits(&mut self, val: u32, len: u32) {
        debug_assert!(len <= 32);
        for i in (0..len).rev() {
            self.curr = (self.curr << 1) | ((val >> i) & 1) as u8;
            self.used += 1;
            if self.used == 8 {
                self.buffer.push(self.curr);
                self.curr = 0;
                self.used = 0;
            }
        }
    }

    /// Number of bits written so far
    pub fn bit_len(&self) -> usize {
        self.buffer.len() * 8 + self.used as usize
    }

    /// Pad the current byte with zero bits
    pub fn flush(&mut self) {
        if self.used > 0 {
            self.buffer.push(self.curr << (8 - self.used));
            self.curr = 0;
            self.used = 0;
        }
    }

    /// Flush and return the buffer
    pub fn done(mut self) -> Vec<u8> {
        self.flush();
        self.buffer
    }
}
