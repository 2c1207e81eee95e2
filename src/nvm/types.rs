use crate::nvm::pref::KeyValueStore;

/// Value type label used in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Invalid,
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    CharArray,
}

impl VarType {
    pub const fn label(&self) -> &'static str {
        match self {
            VarType::Bool => "bool",
            VarType::Int8 => "i8",
            VarType::UInt8 => "iu8",
            VarType::Int16 => "i16",
            VarType::UInt16 => "iu16",
            VarType::Int32 => "i32",
            VarType::UInt32 => "iu32",
            VarType::Int64 => "i64",
            VarType::UInt64 => "iu64",
            VarType::Float => "float",
            VarType::Double => "double",
            VarType::CharArray => "char*",
            VarType::Invalid => "invalid",
        }
    }
}

impl core::fmt::Display for VarType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a read may return the type's sentinel default.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DefaultPolicy {
    /// Sentinel default is a valid result.
    #[default]
    Allow,
    /// Sentinel default is reported as
    /// [`NvmError::DefaultValue`](crate::nvm::NvmError::DefaultValue).
    Reject,
}

mod private {
    pub trait Sealed {}
}

/// A scalar that can be stored in NVM.
///
/// Implemented for `bool`, `i8`..`i64`, `u8`..`u64`, `f32` and `f64`.
pub trait NvmValue: Copy + PartialEq + core::fmt::Display + private::Sealed {
    /// Label for log output.
    const VAR_TYPE: VarType;
    /// Sentinel a backend returns for a key that was never written.
    const DEFAULT: Self;
    /// Encoded size in bytes.
    const SIZE: usize;
    /// 64-bit integers, which some stores cannot hold natively.
    const WIDE: bool = false;

    /// Returns true if `self` is the sentinel default.
    #[inline]
    fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }

    /// Encodes into the first `SIZE` bytes of `out`, little-endian.
    ///
    /// # Panics
    /// Panics if `out.len() < SIZE`.
    fn write_le(self, out: &mut [u8]);

    /// Decodes from the first `SIZE` bytes of `bytes`, little-endian.
    ///
    /// # Panics
    /// Panics if `bytes.len() < SIZE`.
    fn read_le(bytes: &[u8]) -> Self;

    /// Stores through the key/value store's accessor for this type.
    fn put_native<S: KeyValueStore + ?Sized>(self, store: &mut S, key: &[u8]) -> usize;

    /// Loads through the key/value store's accessor for this type.
    fn get_native<S: KeyValueStore + ?Sized>(store: &mut S, key: &[u8], default: Self) -> Self;
}

/// Implements [`NvmValue`] for a primitive, dispatching to `put_<ty>` / `get_<ty>`.
macro_rules! impl_nvm_value {
    // Floats - sentinel is NaN, which never compares equal to itself
    (float $type:ty, $var:ident, $size:literal) => {
        paste::paste! {
            impl private::Sealed for $type {}

            impl NvmValue for $type {
                const VAR_TYPE: VarType = VarType::$var;
                const DEFAULT: Self = <$type>::NAN;
                const SIZE: usize = $size;

                #[inline]
                fn is_default(&self) -> bool {
                    self.is_nan()
                }

                #[inline]
                fn write_le(self, out: &mut [u8]) {
                    out[..$size].copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; $size];
                    raw.copy_from_slice(&bytes[..$size]);
                    <$type>::from_le_bytes(raw)
                }

                #[inline]
                fn put_native<S: KeyValueStore + ?Sized>(self, store: &mut S, key: &[u8]) -> usize {
                    store.[<put_ $type>](key, self)
                }

                #[inline]
                fn get_native<S: KeyValueStore + ?Sized>(
                    store: &mut S,
                    key: &[u8],
                    default: Self,
                ) -> Self {
                    store.[<get_ $type>](key, default)
                }
            }
        }
    };
    // Integers - sentinel is zero
    ($type:ty, $var:ident, $size:literal, $wide:literal) => {
        paste::paste! {
            impl private::Sealed for $type {}

            impl NvmValue for $type {
                const VAR_TYPE: VarType = VarType::$var;
                const DEFAULT: Self = 0;
                const SIZE: usize = $size;
                const WIDE: bool = $wide;

                #[inline]
                fn write_le(self, out: &mut [u8]) {
                    out[..$size].copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; $size];
                    raw.copy_from_slice(&bytes[..$size]);
                    <$type>::from_le_bytes(raw)
                }

                #[inline]
                fn put_native<S: KeyValueStore + ?Sized>(self, store: &mut S, key: &[u8]) -> usize {
                    store.[<put_ $type>](key, self)
                }

                #[inline]
                fn get_native<S: KeyValueStore + ?Sized>(
                    store: &mut S,
                    key: &[u8],
                    default: Self,
                ) -> Self {
                    store.[<get_ $type>](key, default)
                }
            }
        }
    };
}

impl private::Sealed for bool {}

impl NvmValue for bool {
    const VAR_TYPE: VarType = VarType::Bool;
    const DEFAULT: Self = false;
    const SIZE: usize = 1;

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        out[0] = self as u8;
    }

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    #[inline]
    fn put_native<S: KeyValueStore + ?Sized>(self, store: &mut S, key: &[u8]) -> usize {
        store.put_bool(key, self)
    }

    #[inline]
    fn get_native<S: KeyValueStore + ?Sized>(store: &mut S, key: &[u8], default: Self) -> Self {
        store.get_bool(key, default)
    }
}

impl_nvm_value!(i8, Int8, 1, false);
impl_nvm_value!(u8, UInt8, 1, false);
impl_nvm_value!(i16, Int16, 2, false);
impl_nvm_value!(u16, UInt16, 2, false);
impl_nvm_value!(i32, Int32, 4, false);
impl_nvm_value!(u32, UInt32, 4, false);
impl_nvm_value!(i64, Int64, 8, true);
impl_nvm_value!(u64, UInt64, 8, true);
impl_nvm_value!(float f32, Float, 4);
impl_nvm_value!(float f64, Double, 8);

/// Largest encoded scalar.
pub(crate) const MAX_VALUE_SIZE: usize = 8;
