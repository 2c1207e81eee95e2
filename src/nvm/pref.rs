use crate::nvm::{
    NvmError,
    backend::NvmBackend,
    chars::{self, char_array_len},
    types::NvmValue,
};

/// Text key built from a numeric key: low byte, high byte, terminator.
///
/// The bytes are used as-is. A zero low byte yields an empty key and a zero
/// high byte a one-byte key, so numeric keys whose low byte is zero all share
/// the empty key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefKey {
    raw: [u8; 3],
}

impl PrefKey {
    pub const fn from_key(key: u16) -> Self {
        let [low, high] = key.to_le_bytes();
        Self {
            raw: [low, high, 0],
        }
    }

    /// Key bytes up to the first zero.
    pub fn as_bytes(&self) -> &[u8] {
        let len = self.raw.iter().position(|&b| b == 0).unwrap_or(2);
        &self.raw[..len]
    }

    /// Returns true if the key collapsed to the empty key.
    pub fn is_degenerate(&self) -> bool {
        self.raw[0] == 0
    }
}

/// String-keyed persistent dictionary such as a flash preference namespace.
///
/// Typed accessors follow the usual vendor contract: `put_*` returns the
/// number of bytes stored (0 on failure), `get_*` returns `default` when the
/// key is missing or holds another type.
pub trait KeyValueStore {
    /// Whether `put_i64`/`put_u64` are supported natively.
    const NATIVE_INT64: bool = true;

    /// Opens `namespace`; returns false if the driver failed.
    fn begin(&mut self, namespace: &str, read_only: bool) -> bool;

    fn put_bool(&mut self, key: &[u8], value: bool) -> usize;
    fn put_i8(&mut self, key: &[u8], value: i8) -> usize;
    fn put_u8(&mut self, key: &[u8], value: u8) -> usize;
    fn put_i16(&mut self, key: &[u8], value: i16) -> usize;
    fn put_u16(&mut self, key: &[u8], value: u16) -> usize;
    fn put_i32(&mut self, key: &[u8], value: i32) -> usize;
    fn put_u32(&mut self, key: &[u8], value: u32) -> usize;
    fn put_i64(&mut self, key: &[u8], value: i64) -> usize;
    fn put_u64(&mut self, key: &[u8], value: u64) -> usize;
    fn put_f32(&mut self, key: &[u8], value: f32) -> usize;
    fn put_f64(&mut self, key: &[u8], value: f64) -> usize;

    fn get_bool(&mut self, key: &[u8], default: bool) -> bool;
    fn get_i8(&mut self, key: &[u8], default: i8) -> i8;
    fn get_u8(&mut self, key: &[u8], default: u8) -> u8;
    fn get_i16(&mut self, key: &[u8], default: i16) -> i16;
    fn get_u16(&mut self, key: &[u8], default: u16) -> u16;
    fn get_i32(&mut self, key: &[u8], default: i32) -> i32;
    fn get_u32(&mut self, key: &[u8], default: u32) -> u32;
    fn get_i64(&mut self, key: &[u8], default: i64) -> i64;
    fn get_u64(&mut self, key: &[u8], default: u64) -> u64;
    fn get_f32(&mut self, key: &[u8], default: f32) -> f32;
    fn get_f64(&mut self, key: &[u8], default: f64) -> f64;

    /// Stores `text` (no terminator); returns the text length stored.
    fn put_string(&mut self, key: &[u8], text: &[u8]) -> usize;

    /// Copies the stored text and its terminator into `out`.
    ///
    /// Returns the bytes copied, terminator included, or 0 if the key is
    /// missing or `out` is too small. `out` is untouched on 0.
    fn get_string(&mut self, key: &[u8], out: &mut [u8]) -> usize;

    /// Stores a raw blob; returns its length stored.
    fn put_bytes(&mut self, key: &[u8], value: &[u8]) -> usize;

    /// Copies a raw blob into `out`; returns its length, or 0.
    fn get_bytes(&mut self, key: &[u8], out: &mut [u8]) -> usize;
}

/// Key/value backend settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefConfig {
    pub namespace: &'static str,
    pub read_only: bool,
}

impl Default for PrefConfig {
    fn default() -> Self {
        Self {
            namespace: "Osc",
            read_only: false,
        }
    }
}

/// Backend over a [`KeyValueStore`]; numeric keys become [`PrefKey`]s.
pub struct PrefBackend<S: KeyValueStore> {
    store: S,
    config: PrefConfig,
}

impl<S: KeyValueStore> PrefBackend<S> {
    pub fn new(store: S, config: PrefConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &PrefConfig {
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
}

impl<S: KeyValueStore> NvmBackend for PrefBackend<S> {
    const LABEL: &'static str = "Pref";

    fn start(&mut self, _size: u16) -> bool {
        self.store.begin(self.config.namespace, self.config.read_only)
    }

    fn put_value<T: NvmValue>(&mut self, key: u16, value: T) -> Result<(), NvmError> {
        let key = PrefKey::from_key(key);

        let stored = if T::WIDE && !S::NATIVE_INT64 {
            let mut buf = [0u8; 8];
            value.write_le(&mut buf);
            self.store.put_bytes(key.as_bytes(), &buf[..T::SIZE])
        } else {
            value.put_native(&mut self.store, key.as_bytes())
        };

        if stored == 0 {
            return Err(NvmError::WriteFailed);
        }
        Ok(())
    }

    fn get_value<T: NvmValue>(&mut self, key: u16, default: T) -> Result<T, NvmError> {
        let key = PrefKey::from_key(key);

        if T::WIDE && !S::NATIVE_INT64 {
            let mut buf = [0u8; 8];
            if self.store.get_bytes(key.as_bytes(), &mut buf) != T::SIZE {
                return Ok(default);
            }
            return Ok(T::read_le(&buf));
        }

        Ok(T::get_native(&mut self.store, key.as_bytes(), default))
    }

    fn put_chars(&mut self, key: u16, value: &[u8], len: u8) -> Result<u8, NvmError> {
        let text = &chars::payload(value, len)?[..len as usize - 1];
        let key = PrefKey::from_key(key);

        let stored = self.store.put_string(key.as_bytes(), text);
        if stored == 0 && !text.is_empty() {
            return Err(NvmError::WriteFailed);
        }
        Ok((stored + 1).min(u8::MAX as usize) as u8)
    }

    fn get_chars(&mut self, key: u16, out: &mut [u8], max_len: u8) -> Result<usize, NvmError> {
        if out.is_empty() || max_len == 0 {
            return Err(NvmError::ZeroLength);
        }

        let key = PrefKey::from_key(key);
        let window = out.len().min(max_len as usize);
        let out = &mut out[..window];

        let copied = self.store.get_string(key.as_bytes(), out);
        if copied == 0 {
            return Err(NvmError::NotFound);
        }

        if char_array_len(out) as usize != copied {
            return Err(NvmError::LengthMismatch);
        }
        Ok(copied - 1)
    }

    fn key_is_degenerate(&self, key: u16) -> bool {
        PrefKey::from_key(key).is_degenerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nvm::{
        RamPreferences,
        test_support::{TestPrefs, TestPrefsNo64, test_prefs},
    };

    fn backend() -> PrefBackend<TestPrefs> {
        let mut backend = PrefBackend::new(test_prefs(), PrefConfig::default());
        assert!(backend.start(1));
        backend
    }

    #[test]
    fn key_bytes_are_low_then_high() {
        assert_eq!(PrefKey::from_key(0x4241).as_bytes(), b"AB");
        assert_eq!(PrefKey::from_key(0x0041).as_bytes(), b"A");
        assert!(!PrefKey::from_key(0x0041).is_degenerate());
    }

    #[test]
    fn zero_low_byte_collapses_key() {
        let a = PrefKey::from_key(0x4100);
        let b = PrefKey::from_key(0x0000);
        assert!(a.is_degenerate());
        assert_eq!(a.as_bytes(), b"");
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn colliding_keys_share_storage() {
        let mut b = backend();
        b.put_value(0x0100, 5u8).unwrap();
        assert_eq!(b.get_value(0x0200, 0u8), Ok(5));
    }

    #[test]
    fn start_opens_configured_namespace() {
        let b = backend();
        assert_eq!(b.store().namespace(), Some("Osc"));
    }

    #[test]
    fn wide_values_as_blob_without_native_support() {
        let mut b = PrefBackend::new(TestPrefsNo64::new(), PrefConfig::default());
        assert!(b.start(1));
        b.put_value(0x0101, i64::MIN).unwrap();
        assert_eq!(b.get_value(0x0101, 0i64), Ok(i64::MIN));
        // Missing blob falls back to the default
        assert_eq!(b.get_value(0x0202, 0u64), Ok(0));
    }

    #[test]
    fn read_only_namespace_refuses_writes() {
        let config = PrefConfig {
            read_only: true,
            ..PrefConfig::default()
        };
        let mut b = PrefBackend::new(test_prefs(), config);
        assert!(b.start(1));
        assert_eq!(b.put_value(0x0101, 1u32), Err(NvmError::WriteFailed));
        assert_eq!(b.put_chars(0x0101, b"hello\0", 6), Err(NvmError::WriteFailed));
        assert!(b.store().is_empty());
    }

    #[test]
    fn full_store_refuses_strings() {
        let mut b = PrefBackend::new(RamPreferences::<1>::new(), PrefConfig::default());
        assert!(b.start(1));
        assert_eq!(b.put_chars(0x0101, b"a\0", 2), Ok(2));
        assert_eq!(b.put_chars(0x0202, b"b\0", 2), Err(NvmError::WriteFailed));
        // Overwriting the stored key still fits
        assert_eq!(b.put_chars(0x0101, b"c\0", 2), Ok(2));
    }

    #[test]
    fn empty_string_is_stored() {
        let mut b = backend();
        assert_eq!(b.put_chars(0x0101, b"\0", 1), Ok(1));
        assert!(b.store().contains(b"\x01\x01"));
    }

    #[test]
    fn chars_length_outside_value() {
        let mut b = backend();
        assert_eq!(b.put_chars(0x0101, b"AB", 5), Err(NvmError::OutOfBounds));
        assert_eq!(b.put_chars(0x0101, b"AB\0", 0), Err(NvmError::ZeroLength));
        assert!(b.store().is_empty());
    }

    #[test]
    fn string_round_trip() {
        let mut b = backend();
        assert_eq!(b.put_chars(0x0101, b"hello\0", 6), Ok(6));
        let mut out = [0u8; 8];
        assert_eq!(b.get_chars(0x0101, &mut out, 8), Ok(5));
        assert_eq!(&out[..6], b"hello\0");
    }

    #[test]
    fn string_longer_than_window() {
        let mut b = backend();
        b.put_chars(0x0101, b"hello\0", 6).unwrap();
        let mut out = [0x55u8; 8];
        assert_eq!(b.get_chars(0x0101, &mut out, 4), Err(NvmError::NotFound));
        assert_eq!(out, [0x55; 8]);
    }

    #[test]
    fn missing_string() {
        let mut b = backend();
        let mut out = [0u8; 8];
        assert_eq!(b.get_chars(0x0303, &mut out, 8), Err(NvmError::NotFound));
        assert_eq!(b.get_chars(0x0303, &mut out, 0), Err(NvmError::ZeroLength));
    }
}
