use heapless::{LinearMap, String, Vec};

use crate::nvm::{pref::KeyValueStore, types::NvmValue, types::VarType};

/// Largest value held by one entry, string terminator included.
pub const ENTRY_CAPACITY: usize = 256;

/// Longest namespace name accepted by `begin`.
pub const NAMESPACE_CAPACITY: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Scalar(VarType),
    Text,
    Blob,
}

struct Entry {
    kind: EntryKind,
    data: Vec<u8, ENTRY_CAPACITY>,
}

/// RAM-backed [`KeyValueStore`] holding up to `N` entries.
///
/// Entries are typed: a get for a different type than was stored returns
/// the caller's default. With `I64 = false` the 64-bit accessors are
/// unsupported, as on stores without native 64-bit values.
pub struct RamPreferences<const N: usize, const I64: bool = true> {
    entries: LinearMap<Vec<u8, 2>, Entry, N>,
    namespace: String<NAMESPACE_CAPACITY>,
    open: bool,
    read_only: bool,
    fail_begin: bool,
}

impl<const N: usize, const I64: bool> RamPreferences<N, I64> {
    pub fn new() -> Self {
        Self {
            entries: LinearMap::new(),
            namespace: String::new(),
            open: false,
            read_only: false,
            fail_begin: false,
        }
    }

    /// Makes every `begin` call fail.
    pub fn fail_begin(mut self) -> Self {
        self.fail_begin = true;
        self
    }

    /// Namespace opened by the last successful `begin`.
    pub fn namespace(&self) -> Option<&str> {
        self.open.then_some(self.namespace.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.lookup(key).is_some()
    }

    fn lookup(&self, key: &[u8]) -> Option<&Entry> {
        let key: Vec<u8, 2> = Vec::from_slice(key).ok()?;
        self.entries.get(&key)
    }

    fn store(&mut self, key: &[u8], kind: EntryKind, data: &[u8]) -> usize {
        if !self.open || self.read_only {
            return 0;
        }
        let Ok(key) = Vec::from_slice(key) else {
            return 0;
        };
        let Ok(data_buf) = Vec::from_slice(data) else {
            return 0;
        };

        let entry = Entry {
            kind,
            data: data_buf,
        };
        if self.entries.insert(key, entry).is_err() {
            return 0;
        }
        data.len()
    }

    fn put_scalar<T: NvmValue>(&mut self, key: &[u8], value: T) -> usize {
        let mut buf = [0u8; 8];
        value.write_le(&mut buf);
        self.store(key, EntryKind::Scalar(T::VAR_TYPE), &buf[..T::SIZE])
    }

    fn get_scalar<T: NvmValue>(&self, key: &[u8], default: T) -> T {
        match self.lookup(key) {
            Some(entry) if entry.kind == EntryKind::Scalar(T::VAR_TYPE) => T::read_le(&entry.data),
            _ => default,
        }
    }

    fn copy_out(&self, key: &[u8], kind: EntryKind, out: &mut [u8]) -> usize {
        match self.lookup(key) {
            Some(entry) if entry.kind == kind && entry.data.len() <= out.len() => {
                out[..entry.data.len()].copy_from_slice(&entry.data);
                entry.data.len()
            }
            _ => 0,
        }
    }
}

impl<const N: usize, const I64: bool> Default for RamPreferences<N, I64> {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards `put_<ty>` / `get_<ty>` to the generic scalar accessors.
macro_rules! scalar_accessors {
    ($($type:ty),*) => {
        paste::paste! {
            $(
                fn [<put_ $type>](&mut self, key: &[u8], value: $type) -> usize {
                    self.put_scalar(key, value)
                }

                fn [<get_ $type>](&mut self, key: &[u8], default: $type) -> $type {
                    self.get_scalar(key, default)
                }
            )*
        }
    };
}

impl<const N: usize, const I64: bool> KeyValueStore for RamPreferences<N, I64> {
    const NATIVE_INT64: bool = I64;

    fn begin(&mut self, namespace: &str, read_only: bool) -> bool {
        if self.fail_begin || namespace.is_empty() || namespace.len() > NAMESPACE_CAPACITY {
            return false;
        }
        self.namespace.clear();
        if self.namespace.push_str(namespace).is_err() {
            return false;
        }
        self.open = true;
        self.read_only = read_only;
        true
    }

    scalar_accessors!(bool, i8, u8, i16, u16, i32, u32, f32, f64);

    fn put_i64(&mut self, key: &[u8], value: i64) -> usize {
        if !I64 {
            return 0;
        }
        self.put_scalar(key, value)
    }

    fn put_u64(&mut self, key: &[u8], value: u64) -> usize {
        if !I64 {
            return 0;
        }
        self.put_scalar(key, value)
    }

    fn get_i64(&mut self, key: &[u8], default: i64) -> i64 {
        if !I64 {
            return default;
        }
        self.get_scalar(key, default)
    }

    fn get_u64(&mut self, key: &[u8], default: u64) -> u64 {
        if !I64 {
            return default;
        }
        self.get_scalar(key, default)
    }

    fn put_string(&mut self, key: &[u8], text: &[u8]) -> usize {
        if text.len() >= ENTRY_CAPACITY {
            return 0;
        }
        let mut buf = [0u8; ENTRY_CAPACITY];
        buf[..text.len()].copy_from_slice(text);
        match self.store(key, EntryKind::Text, &buf[..=text.len()]) {
            0 => 0,
            _ => text.len(),
        }
    }

    fn get_string(&mut self, key: &[u8], out: &mut [u8]) -> usize {
        self.copy_out(key, EntryKind::Text, out)
    }

    fn put_bytes(&mut self, key: &[u8], value: &[u8]) -> usize {
        self.store(key, EntryKind::Blob, value)
    }

    fn get_bytes(&mut self, key: &[u8], out: &mut [u8]) -> usize {
        self.copy_out(key, EntryKind::Blob, out)
    }
}
