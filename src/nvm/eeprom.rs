use crate::nvm::{
    NvmError, chars,
    backend::NvmBackend,
    helpers::range_span,
    types::{MAX_VALUE_SIZE, NvmValue},
};

/// Flat, byte-addressable non-volatile medium such as raw EEPROM.
pub trait ByteStore {
    /// Capacity in bytes.
    fn capacity(&self) -> usize;

    /// Brings up the driver, sized when `size` is given.
    ///
    /// Drivers whose begin cannot fail return true.
    fn begin(&mut self, size: Option<u16>) -> bool;

    /// Reads `out.len()` bytes starting at `addr`.
    fn read(&mut self, addr: u16, out: &mut [u8]) -> Result<(), NvmError>;

    /// Writes `data` starting at `addr`.
    fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), NvmError>;

    fn read_byte(&mut self, addr: u16) -> Result<u8, NvmError> {
        let mut byte = [0u8; 1];
        self.read(addr, &mut byte)?;
        Ok(byte[0])
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), NvmError> {
        self.write(addr, &[value])
    }

    /// Flushes cached writes to the medium.
    fn commit(&mut self) -> Result<(), NvmError> {
        Ok(())
    }
}

/// How the byte store is brought up on `init`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BeginMode {
    /// Medium needs no bring-up.
    Skip,
    /// Call `begin` without a size.
    Plain,
    /// Call `begin` with the session size.
    #[default]
    WithSize,
}

/// Byte-store backend settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EepromConfig {
    pub begin: BeginMode,
    /// Commit after every successful write.
    pub commit_each_write: bool,
    /// Write 64-bit integers in one block instead of byte by byte.
    pub native_int64: bool,
}

impl Default for EepromConfig {
    fn default() -> Self {
        Self {
            begin: BeginMode::WithSize,
            commit_each_write: false,
            native_int64: true,
        }
    }
}

/// Backend over a [`ByteStore`]; keys are byte offsets.
pub struct EepromBackend<S: ByteStore> {
    store: S,
    config: EepromConfig,
    limit: usize,
}

impl<S: ByteStore> EepromBackend<S> {
    pub fn new(store: S, config: EepromConfig) -> Self {
        let limit = store.capacity();
        Self {
            store,
            config,
            limit,
        }
    }

    pub fn config(&self) -> &EepromConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn after_write(&mut self) -> Result<(), NvmError> {
        if self.config.commit_each_write {
            self.store.commit()?;
        }
        Ok(())
    }

    fn checked_read_byte(&mut self, addr: u16) -> Result<u8, NvmError> {
        range_span(addr, 1, self.limit)?;
        self.store.read_byte(addr)
    }
}

impl<S: ByteStore> NvmBackend for EepromBackend<S> {
    const LABEL: &'static str = "EEPROM";

    fn start(&mut self, size: u16) -> bool {
        self.limit = self.store.capacity().min(size as usize);
        match self.config.begin {
            BeginMode::Skip => true,
            BeginMode::Plain => self.store.begin(None),
            BeginMode::WithSize => self.store.begin(Some(size)),
        }
    }

    fn put_value<T: NvmValue>(&mut self, key: u16, value: T) -> Result<(), NvmError> {
        range_span(key, T::SIZE, self.limit)?;

        let mut buf = [0u8; MAX_VALUE_SIZE];
        value.write_le(&mut buf);
        let bytes = &buf[..T::SIZE];

        if T::WIDE && !self.config.native_int64 {
            let store = &mut self.store;
            chars::write_chars(key, bytes, T::SIZE as u8, |addr, b| {
                store.write_byte(addr, b)
            })?;
        } else {
            self.store.write(key, bytes)?;
        }

        self.after_write()
    }

    fn get_value<T: NvmValue>(&mut self, key: u16, _default: T) -> Result<T, NvmError> {
        range_span(key, T::SIZE, self.limit)?;

        let mut buf = [0u8; MAX_VALUE_SIZE];
        if T::WIDE && !self.config.native_int64 {
            for (i, slot) in buf[..T::SIZE].iter_mut().enumerate() {
                *slot = self.store.read_byte(key + i as u16)?;
            }
        } else {
            self.store.read(key, &mut buf[..T::SIZE])?;
        }

        Ok(T::read_le(&buf))
    }

    fn put_chars(&mut self, key: u16, value: &[u8], len: u8) -> Result<u8, NvmError> {
        range_span(key, len as usize, self.limit)?;

        let store = &mut self.store;
        chars::write_chars(key, value, len, |addr, b| store.write_byte(addr, b))?;

        self.after_write()?;
        Ok(len)
    }

    fn get_chars(&mut self, key: u16, out: &mut [u8], max_len: u8) -> Result<usize, NvmError> {
        chars::read_chars(key, out, max_len, |addr| self.checked_read_byte(addr))
    }

    fn commit(&mut self) -> Result<(), NvmError> {
        self.store.commit()
    }
}
