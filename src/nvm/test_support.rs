//! Test support utilities - only compiled in test builds.

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::nvm::{
    EepromBackend, EepromConfig, Nvm, PrefBackend, PrefConfig, RamEeprom, RamPreferences,
    StartCode,
    log::{NoLog, NvmLog},
};

/// Standard test configuration: 128 bytes, 32-byte pages, 4 pages
pub type TestEeprom = RamEeprom<128, 32, 4>;
/// Room for a maximum-length character sequence: 256 bytes, 32-byte pages, 8 pages
pub type LargeEeprom = RamEeprom<256, 32, 8>;
pub type TestPrefs = RamPreferences<16>;
pub type TestPrefsNo64 = RamPreferences<16, false>;

pub type TestEepromNvm<L = NoLog> = Nvm<EepromBackend<TestEeprom>, L>;
pub type LargeEepromNvm<L = NoLog> = Nvm<EepromBackend<LargeEeprom>, L>;
pub type TestPrefNvm<L = NoLog> = Nvm<PrefBackend<TestPrefs>, L>;

pub fn test_eeprom() -> TestEeprom {
    TestEeprom::new()
}

pub fn test_prefs() -> TestPrefs {
    TestPrefs::new()
}

/// Started session over the whole test EEPROM.
pub fn eeprom_nvm() -> TestEepromNvm {
    let mut nvm = Nvm::new(EepromBackend::new(test_eeprom(), EepromConfig::default()));
    assert_eq!(nvm.init(128), StartCode::Ok);
    nvm
}

/// Started session over the whole large EEPROM.
pub fn large_eeprom_nvm() -> LargeEepromNvm {
    let mut nvm = Nvm::new(EepromBackend::new(LargeEeprom::new(), EepromConfig::default()));
    assert_eq!(nvm.init(256), StartCode::Ok);
    nvm
}

/// Started session over the test preference store.
pub fn pref_nvm() -> TestPrefNvm {
    let mut nvm = Nvm::new(PrefBackend::new(test_prefs(), PrefConfig::default()));
    assert_eq!(nvm.init(1), StartCode::Ok);
    nvm
}

/// Logger that keeps console-formatted lines for inspection.
#[derive(Default)]
pub struct RecordingLog {
    lines: Vec<String<96>, 16>,
}

impl RecordingLog {
    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(|l| l.as_str())
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    fn record(&mut self, tag: &str, args: fmt::Arguments<'_>) {
        let mut line = String::new();
        let _ = write!(line, "[{}]:{}", tag, args);
        let _ = self.lines.push(line);
    }
}

impl NvmLog for RecordingLog {
    fn nvm(&mut self, args: fmt::Arguments<'_>) {
        self.record("NVM", args);
    }

    fn error(&mut self, args: fmt::Arguments<'_>) {
        self.record("Err", args);
    }
}
