use thiserror::Error;

/// Exit code for command line usage errors (sysexits `EX_USAGE`).
pub const EXIT_USAGE: i32 = 64;
/// Exit code for malformed input values (sysexits `EX_DATAERR`).
pub const EXIT_DATAERR: i32 = 65;
/// Exit code for internal misuse of the API (sysexits `EX_SOFTWARE`).
pub const EXIT_SOFTWARE: i32 = 70;

/// Errors raised while declaring or parsing.
///
/// Declaration errors (`InvalidOptionName`, `DuplicateOptionName`) and `Usage`
/// are programmer errors. Everything else depends on the argument vector and
/// aborts the parse pass that raised it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is not a valid name for an option")]
    InvalidOptionName(String),

    #[error("option name {0} is declared more than once")]
    DuplicateOptionName(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("{0} requires a value")]
    MissingOptionValue(String),

    #[error("{message}")]
    InvalidOptionValue { option: String, message: String },

    #[error("{path} is not a valid path")]
    InvalidPath {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Usage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Whether the error was caused by the argument vector rather than by the
    /// program declaring or querying options.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::UnknownOption(_)
            | Self::MissingOptionValue(_)
            | Self::InvalidOptionValue { .. }
            | Self::InvalidPath { .. } => true,
            Self::InvalidOptionName(_) | Self::DuplicateOptionName(_) | Self::Usage(_) => false,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownOption(_) | Self::MissingOptionValue(_) => EXIT_USAGE,
            Self::InvalidOptionValue { .. } | Self::InvalidPath { .. } => EXIT_DATAERR,
            Self::InvalidOptionName(_) | Self::DuplicateOptionName(_) | Self::Usage(_) => {
                EXIT_SOFTWARE
            }
        }
    }

    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }
}
