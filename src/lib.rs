//! A `no_std`, no-alloc typed NVM layer for embedded firmware.
//!
//! Firmware stores and retrieves typed scalars (`bool`, fixed-width integers,
//! `f32`, `f64`) and bounded, zero-terminated character arrays through one
//! API, whichever non-volatile medium the board exposes.
//!
//! # Features
//!
//! - **Two backends, one surface** - raw EEPROM byte storage or a flash-backed
//!   key/value preference store, selected by type
//! - **Start gating** - nothing touches the medium before a successful `init`
//! - **Default detection** - optionally reject reads that returned the type's
//!   sentinel default (0, `false`, NaN)
//! - **Bounded strings** - terminator-checked character arrays up to 254 bytes
//! - **Injected logging** - no-op by default, `log` facade or a text console
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐      ┌────────────────────────────┐
//! │  Nvm<B, L>           │      │  B: NvmBackend             │
//! │                      │      │                            │
//! │  init(size)          │─────▶│  EepromBackend<ByteStore>  │
//! │  write_value(k, v)   │ gate │    key = byte offset       │
//! │  get_value(k)        │      │                            │
//! │  write_chars(k, ..)  │─────▶│  PrefBackend<KeyValueStore>│
//! │  get_chars(k, ..)    │      │    key = [lo, hi] text key │
//! └──────────────────────┘      └────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use nvm_shim::prelude::*;
//!
//! let mut nvm = NvmBuilder::new()
//!     .eeprom(RamEeprom::<256, 32, 8>::new())
//!     .build();
//!
//! assert_eq!(nvm.init(256), StartCode::Ok);
//!
//! nvm.write_value(0x10, 1234u16).unwrap();
//! assert_eq!(nvm.get_value::<u16>(0x10), Ok(1234));
//!
//! nvm.write_chars(0x20, b"hello\0", 16).unwrap();
//! let mut buf = [0u8; 16];
//! let len = nvm.get_chars(0x20, &mut buf, 16).unwrap();
//! assert_eq!(&buf[..len], b"hello");
//! ```

#![deny(unsafe_code)]
#![no_std]

pub mod nvm;

pub mod prelude {
    pub use crate::nvm::prelude::*;
}
