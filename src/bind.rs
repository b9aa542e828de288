//! The layered binder: defaults, then the config file, then the arguments.
//!
//! [`Binder`] holds the sources; [`Binder::bind`] walks the record once and
//! runs both layers over the same option set, so each leaf ends up holding
//! the highest-priority value supplied for it:
//!
//! ```text
//! Record defaults      whatever the struct held before the call
//!        ↑ overridden by
//! Config file          TOML, one table per nested record
//!        ↑ overridden by
//! Arguments            -name=value
//! ```
//!
//! Nothing is printed and the process is never exited, except by
//! [`bind_or_exit`].

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::args;
use crate::error::BindError;
use crate::file;
use crate::record::Record;
use crate::walk::walk;

/// Builder for a bind call.
///
/// With no [`args`](Self::args) the argument layer is skipped; with no
/// [`file`](Self::file) the file layer is skipped. A configured file must
/// exist unless [`allow_missing_file`](Self::allow_missing_file) is set.
#[derive(Debug, Clone, Default)]
pub struct Binder {
    args: Option<Vec<String>>,
    file: Option<PathBuf>,
    allow_missing_file: bool,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The argument list, program name first.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// The TOML config file to read.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Treat a missing config file as empty (default: `false`).
    pub fn allow_missing_file(mut self, allow: bool) -> Self {
        self.allow_missing_file = allow;
        self
    }

    /// Bind `record` from the configured sources.
    ///
    /// On error the record may be partially written: values decoded from the
    /// file before a bad value are kept. Argument values are all-or-nothing.
    pub fn bind<R: Record>(&self, record: &mut R) -> Result<(), BindError> {
        if self.args.as_ref().is_some_and(Vec::is_empty) {
            return Err(BindError::MissingProgramName);
        }

        let mut options = walk(record)?;

        if let Some(path) = &self.file {
            file::load(path, self.allow_missing_file, &mut options)?;
        }
        if let Some(argv) = &self.args {
            args::apply(argv, &mut options)?;
        }
        Ok(())
    }
}

/// Bind `record` from `path` and `args` (program name first).
///
/// ```no_run
/// # use flagbind::Record;
/// #[derive(Record, Default)]
/// struct Config {
///     /// Listen port.
///     pub port: usize,
/// }
///
/// let mut config = Config { port: 8080 };
/// flagbind::bind(["server", "-port=9090"], "server.toml", &mut config, true)?;
/// # Ok::<(), flagbind::BindError>(())
/// ```
pub fn bind<R, I, S>(
    args: I,
    path: impl AsRef<Path>,
    record: &mut R,
    allow_missing_file: bool,
) -> Result<(), BindError>
where
    R: Record,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Binder::new()
        .args(args)
        .file(path.as_ref())
        .allow_missing_file(allow_missing_file)
        .bind(record)
}

/// Bind from the process arguments and `path`. The file must exist.
pub fn bind_from_env<R: Record>(path: impl AsRef<Path>, record: &mut R) -> Result<(), BindError> {
    let args = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());
    bind(args, path, record, false)
}

/// Like [`bind_from_env`], but reports any failure on stderr and exits.
///
/// Exits with status 0 when help was requested, 2 for argument errors and 1
/// for everything else.
pub fn bind_or_exit<R: Record>(path: impl AsRef<Path>, record: &mut R) {
    if let Err(err) = bind_from_env(path, record) {
        let code = report(&err, &mut std::io::stderr().lock());
        std::process::exit(code);
    }
}

/// Write `err` to `out` the way [`bind_or_exit`] does and return the exit
/// status it would use.
pub fn report(err: &BindError, out: &mut impl Write) -> i32 {
    let (code, written) = match err {
        BindError::HelpRequested { usage } => (0, writeln!(out, "{}", usage.trim_end())),
        BindError::Argument { message, usage } => (
            2,
            writeln!(out, "error: {message}\n\n{}", usage.trim_end()),
        ),
        other => (1, writeln!(out, "error: {other}")),
    };
    if let Err(e) = written {
        tracing::warn!(error = %e, "failed to write bind error report");
    }
    code
}
