//! Bounded, zero-terminated character sequences over a byte-addressable medium.
//!
//! A sequence is stored one byte per address, terminator included, starting at
//! the key. At most [`MAX_CHAR_LEN`] bytes are accepted; the length scan reports
//! [`CHAR_LEN_ERROR`] for anything without a terminator in range.

use crate::nvm::NvmError;

/// Longest accepted sequence, terminator included.
pub const MAX_CHAR_LEN: u8 = 254;

/// Length reported for a sequence with no terminator within [`MAX_CHAR_LEN`].
pub const CHAR_LEN_ERROR: u8 = 255;

/// Length of `value` up to and including its terminator.
///
/// Returns 0 for an empty slice and [`CHAR_LEN_ERROR`] when no terminator
/// appears within the first [`MAX_CHAR_LEN`] bytes.
pub fn char_array_len(value: &[u8]) -> u8 {
    if value.is_empty() {
        return 0;
    }

    let scan = value.len().min(MAX_CHAR_LEN as usize);
    match value[..scan].iter().position(|&b| b == 0) {
        Some(pos) => (pos + 1) as u8,
        None => CHAR_LEN_ERROR,
    }
}

/// Checks a sequence for writing and returns its length, terminator included.
///
/// # Errors
/// * [`NvmError::ZeroLength`] - empty input
/// * [`NvmError::Unterminated`] - no terminator within [`MAX_CHAR_LEN`]
/// * [`NvmError::TooLong`] - longer than `max_len`
pub fn validate(value: &[u8], max_len: u8) -> Result<u8, NvmError> {
    match char_array_len(value) {
        0 => Err(NvmError::ZeroLength),
        CHAR_LEN_ERROR => Err(NvmError::Unterminated),
        len if len > max_len => Err(NvmError::TooLong),
        len => Ok(len),
    }
}

/// The first `len` bytes of `value`, the part a character write stores.
///
/// # Errors
/// * [`NvmError::ZeroLength`] - `len` is 0
/// * [`NvmError::OutOfBounds`] - `value` is shorter than `len`
pub fn payload(value: &[u8], len: u8) -> Result<&[u8], NvmError> {
    if len == 0 {
        return Err(NvmError::ZeroLength);
    }
    value.get(..len as usize).ok_or(NvmError::OutOfBounds)
}

/// Writes `value[..len]` one byte per address starting at `key`.
///
/// Stops at the first failed write; bytes already written stay in place.
/// Arguments are checked as in [`payload`] before anything is written.
pub fn write_chars<F>(key: u16, value: &[u8], len: u8, mut write_byte: F) -> Result<(), NvmError>
where
    F: FnMut(u16, u8) -> Result<(), NvmError>,
{
    for (i, &byte) in payload(value, len)?.iter().enumerate() {
        let addr = key.checked_add(i as u16).ok_or(NvmError::OutOfBounds)?;
        write_byte(addr, byte)?;
    }
    Ok(())
}

/// Reads a sequence of at most `max_len` bytes starting at `key` into `out`.
///
/// Returns the text length, terminator excluded. `out` is only written once the
/// terminator has been found and the whole sequence fits.
///
/// # Errors
/// * [`NvmError::ZeroLength`] - empty `out` or `max_len == 0`
/// * [`NvmError::Unterminated`] - no terminator within `max_len` bytes
/// * [`NvmError::BufferTooSmall`] - `out` cannot hold the sequence
pub fn read_chars<F>(
    key: u16,
    out: &mut [u8],
    max_len: u8,
    mut read_byte: F,
) -> Result<usize, NvmError>
where
    F: FnMut(u16) -> Result<u8, NvmError>,
{
    if out.is_empty() || max_len == 0 {
        return Err(NvmError::ZeroLength);
    }

    let mut temp = [0u8; CHAR_LEN_ERROR as usize];
    let mut end = None;

    for i in 0..max_len as usize {
        let addr = key.checked_add(i as u16).ok_or(NvmError::OutOfBounds)?;
        let byte = read_byte(addr)?;
        temp[i] = byte;
        if byte == 0 {
            end = Some(i);
            break;
        }
    }

    let text_len = end.ok_or(NvmError::Unterminated)?;
    if text_len >= out.len() {
        return Err(NvmError::BufferTooSmall);
    }

    out[..=text_len].copy_from_slice(&temp[..=text_len]);
    Ok(text_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medium() -> [u8; 300] {
        [0xAA; 300]
    }

    #[test]
    fn length_scan() {
        assert_eq!(char_array_len(b""), 0);
        assert_eq!(char_array_len(b"\0"), 1);
        assert_eq!(char_array_len(b"AB\0junk"), 3);
        assert_eq!(char_array_len(b"AB"), CHAR_LEN_ERROR);
    }

    #[test]
    fn length_scan_ceiling() {
        let mut max = [b'x'; 254];
        max[253] = 0;
        assert_eq!(char_array_len(&max), MAX_CHAR_LEN);

        let mut over = [b'x'; 300];
        over[254] = 0;
        assert_eq!(char_array_len(&over), CHAR_LEN_ERROR);
    }

    #[test]
    fn validate_rejections() {
        assert_eq!(validate(b"", 5), Err(NvmError::ZeroLength));
        assert_eq!(validate(&[b'x'; 254], 255), Err(NvmError::Unterminated));
        assert_eq!(validate(b"ABCDE\0", 5), Err(NvmError::TooLong));
        assert_eq!(validate(b"ABCD\0", 5), Ok(5));
    }

    #[test]
    fn write_then_read() {
        let mut mem = medium();
        write_chars(10, b"AB\0", 3, |addr, b| {
            mem[addr as usize] = b;
            Ok(())
        })
        .unwrap();
        assert_eq!(&mem[10..13], b"AB\0");

        let mut out = [0x55u8; 5];
        let len = read_chars(10, &mut out, 5, |addr| Ok(mem[addr as usize])).unwrap();
        assert_eq!(len, 2);
        assert_eq!(&out[..3], b"AB\0");
        // Past the terminator stays untouched
        assert_eq!(&out[3..], &[0x55, 0x55]);
    }

    #[test]
    fn write_stops_at_first_failure() {
        let mut mem = medium();
        let result = write_chars(0, b"ABCD\0", 5, |addr, b| {
            if addr == 2 {
                return Err(NvmError::WriteFailed);
            }
            mem[addr as usize] = b;
            Ok(())
        });
        assert_eq!(result, Err(NvmError::WriteFailed));
        assert_eq!(&mem[..3], &[b'A', b'B', 0xAA]);
    }

    #[test]
    fn write_rejects_length_outside_value() {
        let mut writes = 0;
        let mut count = |_: u16, _: u8| -> Result<(), NvmError> {
            writes += 1;
            Ok(())
        };
        assert_eq!(write_chars(0, b"AB", 5, &mut count), Err(NvmError::OutOfBounds));
        assert_eq!(write_chars(0, b"AB\0", 0, &mut count), Err(NvmError::ZeroLength));
        assert_eq!(writes, 0);
        assert_eq!(payload(b"AB\0", 3), Ok(&b"AB\0"[..]));
    }

    #[test]
    fn read_without_terminator_leaves_out_untouched() {
        let mem = *b"ABCDEFGH\0";
        let mut out = [0x55u8; 8];
        let result = read_chars(0, &mut out, 4, |addr| Ok(mem[addr as usize]));
        assert_eq!(result, Err(NvmError::Unterminated));
        assert_eq!(out, [0x55; 8]);
    }

    #[test]
    fn read_stops_at_terminator() {
        let mem = *b"A\0BCDEFG";
        let mut reads = 0;
        let mut out = [0u8; 8];
        read_chars(0, &mut out, 8, |addr| {
            reads += 1;
            Ok(mem[addr as usize])
        })
        .unwrap();
        assert_eq!(reads, 2);
    }

    #[test]
    fn read_into_short_buffer() {
        let mem = *b"ABCD\0";
        let mut out = [0u8; 3];
        let result = read_chars(0, &mut out, 5, |addr| Ok(mem[addr as usize]));
        assert_eq!(result, Err(NvmError::BufferTooSmall));
        assert_eq!(out, [0; 3]);
    }

    #[test]
    fn read_zero_lengths() {
        let mut out = [0u8; 4];
        assert_eq!(read_chars(0, &mut out, 0, |_| Ok(0)), Err(NvmError::ZeroLength));
        assert_eq!(read_chars(0, &mut [], 4, |_| Ok(0)), Err(NvmError::ZeroLength));
    }

    #[test]
    fn read_propagates_medium_error() {
        let mut out = [0u8; 4];
        let result = read_chars(0, &mut out, 4, |_| Err(NvmError::ReadFailed));
        assert_eq!(result, Err(NvmError::ReadFailed));
    }
}
