use bitmaps::{Bitmap, Bits, BitsImpl};

use crate::nvm::{
    NvmError,
    eeprom::ByteStore,
    helpers::{page_span, range_span},
};

/// RAM-backed [`ByteStore`] with a write-back cache, modelling EEPROM
/// emulated in flash.
///
/// Writes land in the cache and mark their pages dirty; [`ByteStore::commit`]
/// copies dirty pages to the backing array. [`RamEeprom::power_cycle`] drops
/// everything that was not committed.
///
/// # Const Generics
/// - `TS`: Total size in bytes
/// - `PS`: Page size in bytes for dirty tracking granularity
/// - `PC`: Page count (must equal `TS / PS`)
pub struct RamEeprom<const TS: usize, const PS: usize, const PC: usize>
where
    BitsImpl<PC>: Bits,
{
    cache: [u8; TS],
    flash: [u8; TS],
    dirty: Bitmap<PC>,
    begin_size: Option<Option<u16>>,
    fail_begin: bool,
    fail_write_at: Option<u16>,
    writes: usize,
    commits: usize,
}

impl<const TS: usize, const PS: usize, const PC: usize> RamEeprom<TS, PS, PC>
where
    BitsImpl<PC>: Bits,
{
    /// Creates a zero-filled store.
    pub fn new() -> Self {
        Self::filled(0x00)
    }

    /// Creates a store in the erased state (all `0xFF`).
    pub fn erased() -> Self {
        Self::filled(0xFF)
    }

    fn filled(byte: u8) -> Self {
        debug_assert!(TS == PS * PC, "Total size must match page size x page count");

        Self {
            cache: [byte; TS],
            flash: [byte; TS],
            dirty: Bitmap::new(),
            begin_size: None,
            fail_begin: false,
            fail_write_at: None,
            writes: 0,
            commits: 0,
        }
    }

    /// Makes every `begin` call fail.
    pub fn fail_begin(mut self) -> Self {
        self.fail_begin = true;
        self
    }

    /// Makes any write touching `addr` fail.
    pub fn fail_writes_at(&mut self, addr: u16) {
        self.fail_write_at = Some(addr);
    }

    pub fn clear_faults(&mut self) {
        self.fail_write_at = None;
    }

    /// Current contents as seen by reads.
    pub fn as_bytes(&self) -> &[u8; TS] {
        &self.cache
    }

    /// Committed contents.
    pub fn committed(&self) -> &[u8; TS] {
        &self.flash
    }

    /// Size passed to the last successful `begin`, if any.
    pub fn begin_size(&self) -> Option<Option<u16>> {
        self.begin_size
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn commit_count(&self) -> usize {
        self.commits
    }

    pub fn any_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_dirty(&self, addr: u16, len: usize) -> Result<bool, NvmError> {
        let (first, last) = page_span::<TS, PS, PC>(addr, len)?;
        Ok((first..=last).any(|page| self.dirty.get(page)))
    }

    /// Discards uncommitted writes, as a reset would.
    pub fn power_cycle(&mut self) {
        self.cache.copy_from_slice(&self.flash);
        self.dirty = Bitmap::new();
        self.begin_size = None;
    }
}

impl<const TS: usize, const PS: usize, const PC: usize> Default for RamEeprom<TS, PS, PC>
where
    BitsImpl<PC>: Bits,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const TS: usize, const PS: usize, const PC: usize> ByteStore for RamEeprom<TS, PS, PC>
where
    BitsImpl<PC>: Bits,
{
    fn capacity(&self) -> usize {
        TS
    }

    fn begin(&mut self, size: Option<u16>) -> bool {
        if self.fail_begin {
            return false;
        }
        if size.is_some_and(|s| s as usize > TS) {
            return false;
        }
        self.begin_size = Some(size);
        true
    }

    fn read(&mut self, addr: u16, out: &mut [u8]) -> Result<(), NvmError> {
        let (offset, end) = range_span(addr, out.len(), TS)?;
        out.copy_from_slice(&self.cache[offset..end]);
        Ok(())
    }

    fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), NvmError> {
        let (offset, end) = range_span(addr, data.len(), TS)?;
        if self
            .fail_write_at
            .is_some_and(|at| (offset..end).contains(&(at as usize)))
        {
            return Err(NvmError::WriteFailed);
        }

        self.cache[offset..end].copy_from_slice(data);
        let (first, last) = page_span::<TS, PS, PC>(addr, data.len())?;
        for page in first..=last {
            self.dirty.set(page, true);
        }
        self.writes += 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), NvmError> {
        let mut idx = self.dirty.first_index();
        while let Some(page) = idx {
            let off = page * PS;
            self.flash[off..off + PS].copy_from_slice(&self.cache[off..off + PS]);
            idx = self.dirty.next_index(page);
        }
        self.dirty = Bitmap::new();
        self.commits += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 16-byte store, 4-byte pages, 4 pages
    type TestRam = RamEeprom<16, 4, 4>;

    #[test]
    fn new_store_has_no_dirty_pages() {
        let ram = TestRam::new();
        assert!(!ram.any_dirty());
        assert!(!ram.is_dirty(0, 16).unwrap());
    }

    #[test]
    fn write_marks_spanned_pages() {
        let mut ram = TestRam::new();
        ram.write(3, &[1, 2]).unwrap();
        assert!(ram.is_dirty(0, 4).unwrap());
        assert!(ram.is_dirty(4, 4).unwrap());
        assert!(!ram.is_dirty(8, 8).unwrap());
    }

    #[test]
    fn commit_persists_dirty_pages_only() {
        let mut ram = TestRam::new();
        ram.write(0, &[0x11]).unwrap();
        ram.commit().unwrap();
        ram.write(8, &[0x22]).unwrap();

        ram.power_cycle();
        assert_eq!(ram.read_byte(0), Ok(0x11));
        assert_eq!(ram.read_byte(8), Ok(0x00));
        assert_eq!(ram.commit_count(), 1);
    }

    #[test]
    fn out_of_bounds_access() {
        let mut ram = TestRam::new();
        assert_eq!(ram.write(15, &[0, 0]), Err(NvmError::OutOfBounds));
        let mut out = [0u8; 2];
        assert_eq!(ram.read(15, &mut out), Err(NvmError::OutOfBounds));
        assert_eq!(ram.write(0, &[]), Err(NvmError::ZeroLength));
    }

    #[test]
    fn injected_write_fault() {
        let mut ram = TestRam::new();
        ram.fail_writes_at(5);
        assert_eq!(ram.write(4, &[1, 2, 3]), Err(NvmError::WriteFailed));
        assert_eq!(ram.write_byte(4, 1), Ok(()));
        assert!(!ram.is_dirty(8, 4).unwrap());
        ram.clear_faults();
        assert_eq!(ram.write_byte(5, 1), Ok(()));
    }

    #[test]
    fn begin_rejects_oversize() {
        let mut ram = TestRam::new();
        assert!(!ram.begin(Some(17)));
        assert!(ram.begin(Some(16)));
        assert_eq!(ram.begin_size(), Some(Some(16)));
        assert!(!TestRam::new().fail_begin().begin(None));
    }

    #[test]
    fn erased_store_reads_ff() {
        let mut ram = TestRam::erased();
        assert_eq!(ram.read_byte(7), Ok(0xFF));
    }
}
