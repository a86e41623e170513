//! # Run decoding
//!
//! Matching a single code word against a [`CodeTable`], and summing up a
//! chain of makeup codes and its terminating code into one run length.

use crate::{
    bits::BitCursor,
    error::CodeError,
    tables::{CodeTable, CodeTableEntry, RunValue, Slot},
    Malformed, NeedMoreInput,
};

/// Match the next code word without consuming it
pub(crate) fn peek_code<V: Copy>(
    cursor: &mut BitCursor<'_>,
    table: &CodeTable<V>,
) -> Result<CodeTableEntry<V>, CodeError> {
    let initial = table.initial_bits();
    let avail = cursor.fill(initial);
    if avail < table.min_bits() {
        return Err(NeedMoreInput.into());
    }

    let (slot, need) = match table.slot(cursor.peek_var(initial) as usize) {
        Slot::Link { extra_bits, offset } => {
            let extra = u32::from(extra_bits);
            let total = initial + extra;
            cursor.fill(total);
            let rest = cursor.peek_var(total) & ((1 << extra) - 1);
            (table.slot(offset as usize + rest as usize), total)
        }
        slot => (slot, initial),
    };

    match slot {
        Slot::Code(entry) if u32::from(entry.code_length) <= cursor.available() => Ok(entry),
        Slot::Code(_) => Err(NeedMoreInput.into()),
        // the zero bits past the end of the input could still match
        _ if cursor.available() < need => Err(NeedMoreInput.into()),
        _ => Err(Malformed::InvalidCode.into()),
    }
}

/// Match and consume the next code word
pub(crate) fn decode_code<V: Copy>(
    cursor: &mut BitCursor<'_>,
    table: &CodeTable<V>,
) -> Result<V, CodeError> {
    let entry = peek_code(cursor, table)?;
    cursor.skip(entry.code_length.into());
    Ok(entry.value)
}

/// Decode one run from a run length table
///
/// Makeup codes are added to `partial` as they are consumed, so that a run
/// that is interrupted by the end of the input can be continued. The
/// returned `RunValue::Length` is the complete run, and `partial` is reset.
///
/// `RunValue::EndOfLineFollows` is returned without consuming anything.
pub(crate) fn decode_run(
    cursor: &mut BitCursor<'_>,
    table: &CodeTable<RunValue>,
    partial: &mut u32,
) -> Result<RunValue, CodeError> {
    loop {
        let entry = peek_code(cursor, table)?;
        match entry.value {
            RunValue::EndOfLineFollows => return Ok(entry.value),
            RunValue::Length(len) => {
                cursor.skip(entry.code_length.into());
                *partial = partial.saturating_add(len);
                if len < 64 {
                    return Ok(RunValue::Length(std::mem::take(partial)));
                }
            }
            value => {
                cursor.skip(entry.code_length.into());
                return Ok(value);
            }
        }
    }
}
