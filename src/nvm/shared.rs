use core::cell::RefCell;

use critical_section::Mutex;

use crate::nvm::{
    NvmError, StartCode,
    backend::NvmBackend,
    log::{NoLog, NvmLog},
    session::Nvm,
    types::{DefaultPolicy, NvmValue},
};

/// [`Nvm`] session shareable between execution contexts.
///
/// Every operation runs inside a critical section, so a multi-byte write such
/// as a character sequence is never observed half done by another context.
pub struct SharedNvm<B: NvmBackend, L: NvmLog = NoLog> {
    inner: Mutex<RefCell<Nvm<B, L>>>,
}

impl<B: NvmBackend, L: NvmLog> SharedNvm<B, L> {
    pub const fn new(nvm: Nvm<B, L>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(nvm)),
        }
    }

    /// Runs `f` with exclusive access to the session.
    ///
    /// # Panics
    /// Panics if called from within `f`.
    pub fn with<R>(&self, f: impl FnOnce(&mut Nvm<B, L>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow(cs).borrow_mut()))
    }

    pub fn init(&self, size: u16) -> StartCode {
        self.with(|nvm| nvm.init(size))
    }

    pub fn is_started(&self) -> bool {
        self.with(|nvm| nvm.is_started())
    }

    pub fn write_value<T: NvmValue>(&self, key: u16, value: T) -> Result<(), NvmError> {
        self.with(|nvm| nvm.write_value(key, value))
    }

    pub fn get_value<T: NvmValue>(&self, key: u16) -> Result<T, NvmError> {
        self.with(|nvm| nvm.get_value(key))
    }

    pub fn get_value_with<T: NvmValue>(
        &self,
        key: u16,
        policy: DefaultPolicy,
    ) -> Result<T, NvmError> {
        self.with(|nvm| nvm.get_value_with(key, policy))
    }

    pub fn write_chars(&self, key: u16, value: &[u8], max_len: u8) -> Result<(), NvmError> {
        self.with(|nvm| nvm.write_chars(key, value, max_len))
    }

    pub fn get_chars(&self, key: u16, out: &mut [u8], max_len: u8) -> Result<usize, NvmError> {
        self.with(|nvm| nvm.get_chars(key, out, max_len))
    }

    pub fn commit(&self) -> Result<(), NvmError> {
        self.with(|nvm| nvm.commit())
    }

    pub fn into_inner(self) -> Nvm<B, L> {
        self.inner.into_inner().into_inner()
    }
}
