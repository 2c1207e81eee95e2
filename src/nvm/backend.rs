use crate::nvm::{NvmError, types::NvmValue};

/// Storage mechanism behind an [`Nvm`](crate::nvm::Nvm) session.
///
/// The session performs start gating, default detection, character-array
/// validation and logging; a backend only moves values to and from its medium.
pub trait NvmBackend {
    /// Label used in log output.
    const LABEL: &'static str;

    /// Brings up the driver for a session of `size` bytes.
    fn start(&mut self, size: u16) -> bool;

    /// Stores `value` under `key`.
    fn put_value<T: NvmValue>(&mut self, key: u16, value: T) -> Result<(), NvmError>;

    /// Loads the value under `key`, or `default` if the medium has none.
    fn get_value<T: NvmValue>(&mut self, key: u16, default: T) -> Result<T, NvmError>;

    /// Stores a validated character sequence.
    ///
    /// `value[..len]` ends with the terminator. Returns the length, terminator
    /// included, that the medium reports having stored.
    ///
    /// # Errors
    /// * [`NvmError::ZeroLength`] - `len` is 0
    /// * [`NvmError::OutOfBounds`] - `value` is shorter than `len`
    /// * [`NvmError::WriteFailed`] - the medium refused the write
    fn put_chars(&mut self, key: u16, value: &[u8], len: u8) -> Result<u8, NvmError>;

    /// Loads a character sequence of at most `max_len` bytes into `out`.
    ///
    /// Returns the text length, terminator excluded.
    fn get_chars(&mut self, key: u16, out: &mut [u8], max_len: u8) -> Result<usize, NvmError>;

    /// Flushes pending writes to the medium.
    fn commit(&mut self) -> Result<(), NvmError> {
        Ok(())
    }

    /// Returns true if `key` cannot be represented faithfully by this medium.
    fn key_is_degenerate(&self, _key: u16) -> bool {
        false
    }
}
