pub mod backend;
pub mod builder;
pub mod chars;
pub mod eeprom;
pub mod error;
pub mod helpers;
pub mod log;
pub mod pref;
pub mod ram;
pub mod ram_pref;
pub mod session;
pub mod shared;
pub mod types;

#[cfg(test)]
mod test_support;

pub use backend::NvmBackend;
pub use builder::NvmBuilder;
pub use chars::{CHAR_LEN_ERROR, MAX_CHAR_LEN, char_array_len};
pub use eeprom::{BeginMode, ByteStore, EepromBackend, EepromConfig};
pub use error::{NvmError, StartCode};
pub use log::{LogFacade, NoLog, NvmLog, SerialLog};
pub use pref::{KeyValueStore, PrefBackend, PrefConfig, PrefKey};
pub use ram::RamEeprom;
pub use ram_pref::RamPreferences;
pub use session::{DEFAULT_NVM_SIZE, Nvm};
pub use shared::SharedNvm;
pub use types::{DefaultPolicy, NvmValue, VarType};

pub mod prelude {
    pub use super::{
        BeginMode, ByteStore, DefaultPolicy, EepromBackend, EepromConfig, KeyValueStore,
        LogFacade, NoLog, Nvm, NvmBackend, NvmBuilder, NvmError, NvmLog, NvmValue, PrefBackend,
        PrefConfig, PrefKey, RamEeprom, RamPreferences, SerialLog, SharedNvm, StartCode, VarType,
    };
}
