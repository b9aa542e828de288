use std::path::PathBuf;

use thiserror::Error;

/// The caller's record shape cannot be bound. A programming mistake, not a
/// runtime condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unsupported type `{type_name}` for option '{name}'")]
    UnsupportedType { name: String, type_name: String },

    #[error("Option '{name}' is defined more than once")]
    DuplicateName { name: String },

    #[error("Option name '{name}' is reserved")]
    ReservedName { name: String },
}

/// The file layer failed.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for '{key}' in {path}: {reason}")]
    Decode {
        path: PathBuf,
        key: String,
        reason: String,
    },
}

/// A value could not be converted into a setting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValueError(String);

impl ValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Everything a bind call can fail with.
///
/// `Argument` and `HelpRequested` carry the rendered usage listing so the
/// caller decides whether and where to show it.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("Argument list is empty; the first element must be the program name")]
    MissingProgramName,

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    File(#[from] FileError),

    #[error("{message}")]
    Argument { message: String, usage: String },

    #[error("Help requested")]
    HelpRequested { usage: String },
}

impl BindError {
    /// True when the user asked for usage rather than misconfiguring anything.
    pub fn is_help(&self) -> bool {
        matches!(self, BindError::HelpRequested { .. })
    }

    /// The usage listing attached to argument failures and help requests.
    pub fn usage(&self) -> Option<&str> {
        match self {
            BindError::Argument { usage, .. } | BindError::HelpRequested { usage } => Some(usage),
            _ => None,
        }
    }
}

/// Free-function form of [`BindError::is_help`].
pub fn is_help(err: &BindError) -> bool {
    err.is_help()
}
