//! Basic example: storing settings through both backends
//!
//! This example demonstrates:
//! - Building an EEPROM session and a preference session with the builder
//! - Start gating: nothing is written before `init`
//! - Scalar round trips and default rejection
//! - Bounded character arrays
//! - Console logging in the `[NVM]:` / `[Err]:` format

use nvm_shim::prelude::*;

// ============ Layout ============
// EEPROM keys are byte offsets, so each setting owns a fixed address range.

/// Boot counter, u32 at 0x00
const BOOT_COUNT: u16 = 0x00;
/// Display brightness, u8 at 0x04
const BRIGHTNESS: u16 = 0x04;
/// Device name, up to 16 bytes at 0x10
const DEVICE_NAME: u16 = 0x10;
const DEVICE_NAME_LEN: u8 = 16;

/// Console that prints to stdout.
struct Stdout;

impl core::fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        print!("{}", s);
        Ok(())
    }
}

fn eeprom_demo() {
    let mut nvm = NvmBuilder::new()
        .eeprom_with(
            RamEeprom::<256, 32, 8>::new(),
            EepromConfig {
                commit_each_write: true,
                ..EepromConfig::default()
            },
        )
        .logger(SerialLog::new(Stdout))
        .build();

    // Not started yet: refused, medium untouched
    assert_eq!(nvm.write_value(BOOT_COUNT, 1u32), Err(NvmError::NotStarted));

    assert_eq!(nvm.init(256), StartCode::Ok);
    assert_eq!(nvm.init(256), StartCode::AlreadyStarted);

    let boots = nvm.get_value::<u32>(BOOT_COUNT).unwrap_or(0);
    nvm.write_value(BOOT_COUNT, boots + 1).unwrap();
    nvm.write_value(BRIGHTNESS, 180u8).unwrap();
    nvm.write_chars(DEVICE_NAME, b"rover-01\0", DEVICE_NAME_LEN)
        .unwrap();

    let mut name = [0u8; DEVICE_NAME_LEN as usize];
    let len = nvm
        .get_chars(DEVICE_NAME, &mut name, DEVICE_NAME_LEN)
        .unwrap();
    assert_eq!(&name[..len], b"rover-01");

    // Too long for its slot: rejected before any byte is written
    assert_eq!(
        nvm.write_chars(DEVICE_NAME, b"a-name-that-does-not-fit\0", DEVICE_NAME_LEN),
        Err(NvmError::TooLong)
    );
}

fn preferences_demo() {
    let mut nvm = NvmBuilder::new()
        .preferences(RamPreferences::<32>::new())
        .logger(SerialLog::new(Stdout))
        .start(1)
        .unwrap();

    // Never written: the default comes back unless rejected
    assert_eq!(nvm.get_value::<i16>(0x0101), Ok(0));
    assert_eq!(
        nvm.get_value_with::<i16>(0x0101, DefaultPolicy::Reject),
        Err(NvmError::DefaultValue)
    );

    nvm.write_value(0x0101, -40i16).unwrap();
    nvm.write_value(0x0102, 0.75f32).unwrap();
    assert_eq!(
        nvm.get_value_with::<i16>(0x0101, DefaultPolicy::Reject),
        Ok(-40)
    );
    assert_eq!(nvm.get_value::<f32>(0x0102), Ok(0.75));
}

pub fn main() {
    eeprom_demo();
    preferences_demo();
}
