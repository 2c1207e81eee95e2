use crate::nvm::{
    NvmError, StartCode,
    backend::NvmBackend,
    chars,
    log::{NoLog, NvmLog},
    types::{DefaultPolicy, NvmValue, VarType},
};

/// Reserved size meaning "not configured"; `init` rejects it.
pub const DEFAULT_NVM_SIZE: u16 = 0;

/// NVM session over one backend.
///
/// Created unstarted; every read or write fails with
/// [`NvmError::NotStarted`] and leaves the medium untouched until
/// [`Nvm::init`] returns [`StartCode::Ok`].
///
/// # Type Parameters
/// - `B`: Storage backend
/// - `L`: Logger receiving operation traces and failures
pub struct Nvm<B: NvmBackend, L: NvmLog = NoLog> {
    backend: B,
    log: L,
    started: bool,
    size: u16,
}

impl<B: NvmBackend> Nvm<B, NoLog> {
    pub const fn new(backend: B) -> Self {
        Self::with_logger(backend, NoLog)
    }
}

impl<B: NvmBackend, L: NvmLog> Nvm<B, L> {
    pub const fn with_logger(backend: B, log: L) -> Self {
        Self {
            backend,
            log,
            started: false,
            size: DEFAULT_NVM_SIZE,
        }
    }

    /// Starts the session with `size` bytes of NVM.
    ///
    /// Only [`StartCode::Ok`] changes state; a second call reports
    /// [`StartCode::AlreadyStarted`] and leaves stored values alone.
    pub fn init(&mut self, size: u16) -> StartCode {
        if self.started {
            self.log.nvm(format_args!("{} already started", B::LABEL));
            return StartCode::AlreadyStarted;
        }

        if size == DEFAULT_NVM_SIZE {
            self.log.nvm(format_args!("NVM size given was default, not initialized"));
            return StartCode::InvalidSize;
        }

        if !self.backend.start(size) {
            self.log.error(format_args!("'{}' library failed to start", B::LABEL));
            return StartCode::Failed;
        }

        self.started = true;
        self.size = size;
        self.log.nvm(format_args!("Started {} for NVM, {} bytes", B::LABEL, size));
        StartCode::Ok
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Size given to the successful `init`, or [`DEFAULT_NVM_SIZE`].
    pub fn size(&self) -> u16 {
        self.size
    }

    /// Writes `value` under `key`.
    pub fn write_value<T: NvmValue>(&mut self, key: u16, value: T) -> Result<(), NvmError> {
        self.ensure_started()?;
        self.check_key(key);

        if let Err(err) = self.backend.put_value(key, value) {
            self.log.error(format_args!(
                "{} couldn't write {} '{}' to key {}: {}",
                B::LABEL,
                T::VAR_TYPE,
                value,
                key,
                err
            ));
            return Err(err);
        }

        self.log.nvm(format_args!(
            "{} wrote, {}: '{}', key: '{}'",
            B::LABEL,
            T::VAR_TYPE,
            value,
            key
        ));
        Ok(())
    }

    /// Reads the value under `key`, accepting the sentinel default.
    pub fn get_value<T: NvmValue>(&mut self, key: u16) -> Result<T, NvmError> {
        self.get_value_with(key, DefaultPolicy::Allow)
    }

    /// Reads the value under `key`.
    ///
    /// With [`DefaultPolicy::Reject`], a result equal to the type's sentinel
    /// default (0, `false`, NaN) fails with [`NvmError::DefaultValue`], so a
    /// stored sentinel cannot be told apart from a missing key.
    pub fn get_value_with<T: NvmValue>(
        &mut self,
        key: u16,
        policy: DefaultPolicy,
    ) -> Result<T, NvmError> {
        self.ensure_started()?;
        self.check_key(key);

        let value = match self.backend.get_value(key, T::DEFAULT) {
            Ok(value) => value,
            Err(err) => {
                self.log.error(format_args!(
                    "{} couldn't get {} from key {}: {}",
                    B::LABEL,
                    T::VAR_TYPE,
                    key,
                    err
                ));
                return Err(err);
            }
        };

        if policy == DefaultPolicy::Reject && value.is_default() {
            self.log.nvm(format_args!("Can't get default value"));
            return Err(NvmError::DefaultValue);
        }

        self.log.nvm(format_args!(
            "{} got, {}: '{}', key: '{}'",
            B::LABEL,
            T::VAR_TYPE,
            value,
            key
        ));
        Ok(value)
    }

    /// Writes a zero-terminated character sequence under `key`.
    ///
    /// `value` must hold a terminator within its first 254 bytes and the
    /// sequence, terminator included, must not exceed `max_len`. Invalid input
    /// is rejected before anything is written.
    pub fn write_chars(&mut self, key: u16, value: &[u8], max_len: u8) -> Result<(), NvmError> {
        self.ensure_started()?;

        let len = match chars::validate(value, max_len) {
            Ok(len) => len,
            Err(err) => {
                self.log.nvm(format_args!("{} rejected char*: {}", B::LABEL, err));
                return Err(err);
            }
        };
        self.check_key(key);

        let stored = match self.backend.put_chars(key, value, len) {
            Ok(stored) => stored,
            Err(err) => {
                self.log.error(format_args!(
                    "{} couldn't write char* to key {}: {}",
                    B::LABEL,
                    key,
                    err
                ));
                return Err(err);
            }
        };

        if stored != len {
            self.log.error(format_args!(
                "{} failed write {}, stored {} of {} bytes",
                B::LABEL,
                VarType::CharArray,
                stored,
                len
            ));
        } else {
            self.log.nvm(format_args!(
                "{} wrote, {}: '{}', key: '{}'",
                B::LABEL,
                VarType::CharArray,
                text(&value[..len as usize - 1]),
                key
            ));
        }
        Ok(())
    }

    /// Reads a zero-terminated character sequence of at most `max_len` bytes.
    ///
    /// On success `out` holds the text and its terminator; the returned length
    /// excludes the terminator. On failure `out` must not be trusted.
    pub fn get_chars(&mut self, key: u16, out: &mut [u8], max_len: u8) -> Result<usize, NvmError> {
        self.ensure_started()?;
        self.check_key(key);

        match self.backend.get_chars(key, out, max_len) {
            Ok(len) => {
                self.log.nvm(format_args!(
                    "{} got, {}: '{}', key: '{}'",
                    B::LABEL,
                    VarType::CharArray,
                    text(&out[..len]),
                    key
                ));
                Ok(len)
            }
            Err(err) => {
                self.log.nvm(format_args!(
                    "{} couldn't get char* from key {}: {}",
                    B::LABEL,
                    key,
                    err
                ));
                Err(err)
            }
        }
    }

    /// Flushes pending writes on backends with a write-back cache.
    pub fn commit(&mut self) -> Result<(), NvmError> {
        self.ensure_started()?;
        self.backend.commit().inspect_err(|err| {
            self.log.error(format_args!("{} commit failed: {}", B::LABEL, err));
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn logger(&self) -> &L {
        &self.log
    }

    pub fn into_parts(self) -> (B, L) {
        (self.backend, self.log)
    }

    fn ensure_started(&mut self) -> Result<(), NvmError> {
        if !self.started {
            self.log.error(format_args!("{} not started", B::LABEL));
            return Err(NvmError::NotStarted);
        }
        Ok(())
    }

    fn check_key(&mut self, key: u16) {
        if self.backend.key_is_degenerate(key) {
            self.log.error(format_args!(
                "{} key {:#06x} collapses to an empty key",
                B::LABEL,
                key
            ));
        }
    }
}

fn text(bytes: &[u8]) -> &str {
    core::str::from_utf8(bytes).unwrap_or("<non-utf8>")
}
