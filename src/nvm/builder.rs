use core::marker::PhantomData;

use crate::nvm::{
    StartCode,
    backend::NvmBackend,
    eeprom::{ByteStore, EepromBackend, EepromConfig},
    log::{NoLog, NvmLog},
    pref::{KeyValueStore, PrefBackend, PrefConfig},
    session::Nvm,
    shared::SharedNvm,
};

// Builder states
pub struct NeedBackend;
pub struct Ready;

/// Typestate builder for [`Nvm`] sessions.
///
/// ```rust,no_run
/// use nvm_shim::prelude::*;
///
/// let nvm = NvmBuilder::new()
///     .preferences(RamPreferences::<32>::new())
///     .logger(LogFacade)
///     .start(1)
///     .unwrap();
/// assert!(nvm.is_started());
/// ```
pub struct NvmBuilder<B, L, State> {
    backend: B,
    log: L,
    _phantom: PhantomData<State>,
}

impl NvmBuilder<(), NoLog, NeedBackend> {
    pub fn new() -> Self {
        NvmBuilder {
            backend: (),
            log: NoLog,
            _phantom: PhantomData,
        }
    }
}

impl Default for NvmBuilder<(), NoLog, NeedBackend> {
    fn default() -> Self {
        Self::new()
    }
}

// Pick a backend
impl<L: NvmLog> NvmBuilder<(), L, NeedBackend> {
    pub fn backend<B: NvmBackend>(self, backend: B) -> NvmBuilder<B, L, Ready> {
        NvmBuilder {
            backend,
            log: self.log,
            _phantom: PhantomData,
        }
    }

    /// Byte-store backend with the default [`EepromConfig`].
    pub fn eeprom<S: ByteStore>(self, store: S) -> NvmBuilder<EepromBackend<S>, L, Ready> {
        self.eeprom_with(store, EepromConfig::default())
    }

    pub fn eeprom_with<S: ByteStore>(
        self,
        store: S,
        config: EepromConfig,
    ) -> NvmBuilder<EepromBackend<S>, L, Ready> {
        self.backend(EepromBackend::new(store, config))
    }

    /// Key/value backend with the default [`PrefConfig`].
    pub fn preferences<S: KeyValueStore>(self, store: S) -> NvmBuilder<PrefBackend<S>, L, Ready> {
        self.preferences_with(store, PrefConfig::default())
    }

    pub fn preferences_with<S: KeyValueStore>(
        self,
        store: S,
        config: PrefConfig,
    ) -> NvmBuilder<PrefBackend<S>, L, Ready> {
        self.backend(PrefBackend::new(store, config))
    }
}

// Finish
impl<B: NvmBackend, L: NvmLog> NvmBuilder<B, L, Ready> {
    /// Replaces the logger.
    pub fn logger<L2: NvmLog>(self, log: L2) -> NvmBuilder<B, L2, Ready> {
        NvmBuilder {
            backend: self.backend,
            log,
            _phantom: PhantomData,
        }
    }

    /// Builds an unstarted session.
    pub fn build(self) -> Nvm<B, L> {
        Nvm::with_logger(self.backend, self.log)
    }

    pub fn build_shared(self) -> SharedNvm<B, L> {
        SharedNvm::new(self.build())
    }

    /// Builds and starts a session, returning it only if `init` succeeded.
    pub fn start(self, size: u16) -> Result<Nvm<B, L>, StartCode> {
        let mut nvm = self.build();
        match nvm.init(size) {
            StartCode::Ok => Ok(nvm),
            code => Err(code),
        }
    }
}
