/// Errors that can occur during NVM operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NvmError {
    /// Operation attempted before a successful `init`.
    NotStarted,
    /// Read returned the type's sentinel default and defaulting was rejected.
    DefaultValue,
    /// Empty input or destination, or a maximum length of zero.
    ZeroLength,
    /// No terminator found within the allowed length.
    Unterminated,
    /// Character sequence longer than the caller's maximum length.
    TooLong,
    /// Destination buffer cannot hold the stored sequence.
    BufferTooSmall,
    /// Address or length exceeds the medium or the configured size.
    OutOfBounds,
    /// Medium refused the write.
    WriteFailed,
    /// Medium refused the read.
    ReadFailed,
    /// Key holds no character sequence.
    NotFound,
    /// Retrieved length disagrees with what the medium reported.
    LengthMismatch,
}

impl core::fmt::Display for NvmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NvmError::NotStarted => write!(f, "nvm not started"),
            NvmError::DefaultValue => write!(f, "can't get default value"),
            NvmError::ZeroLength => write!(f, "operation attempted with zero length"),
            NvmError::Unterminated => write!(f, "no terminator within allowed length"),
            NvmError::TooLong => write!(f, "max length not long enough"),
            NvmError::BufferTooSmall => write!(f, "destination buffer too small"),
            NvmError::OutOfBounds => write!(f, "address or length exceeds nvm bounds"),
            NvmError::WriteFailed => write!(f, "medium write failed"),
            NvmError::ReadFailed => write!(f, "medium read failed"),
            NvmError::NotFound => write!(f, "no value stored under key"),
            NvmError::LengthMismatch => write!(f, "retrieved length mismatch"),
        }
    }
}

/// Result of [`Nvm::init`](crate::nvm::Nvm::init).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartCode {
    /// Backend started; operations are now allowed.
    Ok,
    /// Session was already started; nothing changed.
    AlreadyStarted,
    /// Backend driver refused to start.
    Failed,
    /// Requested size was the reserved default.
    InvalidSize,
}

impl StartCode {
    #[inline]
    pub fn is_ok(&self) -> bool {
        matches!(self, StartCode::Ok)
    }
}

impl core::fmt::Display for StartCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StartCode::Ok => write!(f, "started"),
            StartCode::AlreadyStarted => write!(f, "already started"),
            StartCode::Failed => write!(f, "backend failed to start"),
            StartCode::InvalidSize => write!(f, "nvm size given was default"),
        }
    }
}
