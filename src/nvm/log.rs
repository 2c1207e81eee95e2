use core::fmt;

/// Receives diagnostics from NVM operations.
///
/// Implementations decide verbosity; behaviour of the NVM layer is identical
/// whichever logger is injected.
pub trait NvmLog {
    /// Operation trace, tagged `[NVM]` on a console.
    fn nvm(&mut self, args: fmt::Arguments<'_>);
    /// Failure detail, tagged `[Err]` on a console.
    fn error(&mut self, args: fmt::Arguments<'_>);
}

/// No-op logger that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLog;

impl NvmLog for NoLog {
    #[inline]
    fn nvm(&mut self, _args: fmt::Arguments<'_>) {}
    #[inline]
    fn error(&mut self, _args: fmt::Arguments<'_>) {}
}

/// Forwards to the [`log`] facade under the `nvm` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacade;

impl NvmLog for LogFacade {
    fn nvm(&mut self, args: fmt::Arguments<'_>) {
        ::log::debug!(target: "nvm", "{}", args);
    }

    fn error(&mut self, args: fmt::Arguments<'_>) {
        ::log::error!(target: "nvm", "{}", args);
    }
}

/// Writes tagged lines to a text console such as a serial port.
///
/// Output format is `[NVM]:<message>\r\n` and `[Err]:<message>\r\n`.
/// Console write errors are dropped.
pub struct SerialLog<W: fmt::Write> {
    out: W,
}

impl<W: fmt::Write> SerialLog<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn inner(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, tag: &str, args: fmt::Arguments<'_>) {
        let _ = write!(self.out, "[{}]:{}\r\n", tag, args);
    }
}

impl<W: fmt::Write> NvmLog for SerialLog<W> {
    fn nvm(&mut self, args: fmt::Arguments<'_>) {
        self.line("NVM", args);
    }

    fn error(&mut self, args: fmt::Arguments<'_>) {
        self.line("Err", args);
    }
}

impl<L: NvmLog + ?Sized> NvmLog for &mut L {
    #[inline]
    fn nvm(&mut self, args: fmt::Arguments<'_>) {
        (**self).nvm(args)
    }
    #[inline]
    fn error(&mut self, args: fmt::Arguments<'_>) {
        (**self).error(args)
    }
}
