//! Address range calculations for byte stores.
//!
//! [`EepromBackend`](crate::nvm::EepromBackend) and
//! [`RamEeprom`](crate::nvm::RamEeprom) use these to bounds-check accesses;
//! they are also useful when implementing a custom
//! [`ByteStore`](crate::nvm::ByteStore) with paged storage.

use crate::nvm::NvmError;

/// Calculates the byte offset range for an address and length.
///
/// Returns `(start_offset, end_offset)` where end is exclusive,
/// or an error if the range is invalid.
///
/// # Arguments
/// * `addr` - Starting address
/// * `len` - Length of the range in bytes
/// * `limit` - Number of addressable bytes
///
/// # Errors
/// * [`NvmError::ZeroLength`] - if `len` is 0
/// * [`NvmError::OutOfBounds`] - if the range ends past `limit`
///
/// # Example
/// ```
/// use nvm_shim::nvm::{NvmError, helpers::range_span};
///
/// // A u32 at offset 12 of a 16-byte session fills bytes 12-15
/// assert_eq!(range_span(12, 4, 16), Ok((12, 16)));
///
/// // One byte further runs off the end
/// assert_eq!(range_span(13, 4, 16), Err(NvmError::OutOfBounds));
/// ```
pub fn range_span(addr: u16, len: usize, limit: usize) -> Result<(usize, usize), NvmError> {
    if len == 0 {
        return Err(NvmError::ZeroLength);
    }

    let offset = addr as usize;
    let end = offset.checked_add(len).ok_or(NvmError::OutOfBounds)?;

    if end > limit {
        return Err(NvmError::OutOfBounds);
    }

    Ok((offset, end))
}

/// Calculates which pages are spanned by an address range.
///
/// Returns the inclusive range `(first_page, last_page)`.
///
/// # Arguments
/// * `addr` - Starting address
/// * `len` - Length of the range in bytes
///
/// # Type Parameters
/// * `TS` - Total store size in bytes
/// * `PS` - Page size in bytes
/// * `PC` - Page count
///
/// # Errors
/// * [`NvmError::ZeroLength`] - if `len` is 0
/// * [`NvmError::OutOfBounds`] - if the range exceeds the store
///
/// # Example
/// ```
/// use nvm_shim::nvm::helpers::page_span;
///
/// // 128-byte store, 32-byte pages: a 16-byte string at 24 crosses pages 0 and 1
/// assert_eq!(page_span::<128, 32, 4>(24, 16), Ok((0, 1)));
/// ```
pub fn page_span<const TS: usize, const PS: usize, const PC: usize>(
    addr: u16,
    len: usize,
) -> Result<(usize, usize), NvmError> {
    let (offset, end) = range_span(addr, len, TS)?;
    let first = offset / PS;
    let last = (end - 1) / PS; // inclusive

    if last >= PC {
        return Err(NvmError::OutOfBounds);
    }

    Ok((first, last))
}

#[test]
fn range_span_edge_cases() {
    assert_eq!(range_span(0, 0, 16), Err(NvmError::ZeroLength));
    assert_eq!(range_span(15, 2, 16), Err(NvmError::OutOfBounds));
    assert_eq!(range_span(15, 1, 16), Ok((15, 16)));
    assert_eq!(range_span(u16::MAX, 1, usize::MAX), Ok((65535, 65536)));
}

#[test]
fn page_span_edge_cases() {
    // Single byte at page boundary
    assert_eq!(page_span::<16, 4, 4>(4, 1), Ok((1, 1)));

    // Spanning two pages
    assert_eq!(page_span::<16, 4, 4>(3, 2), Ok((0, 1)));

    // Whole store
    assert_eq!(page_span::<16, 4, 4>(0, 16), Ok((0, 3)));

    // Past the end
    assert_eq!(page_span::<16, 4, 4>(15, 2), Err(NvmError::OutOfBounds));
}
