use thiserror::Error;

pub type TimestepResult<T> = Result<T, TimestepError>;

/// Errors owned by the scheduler crate.
///
/// Errors raised by frame callbacks are not wrapped here; they leave
/// `Scheduler::run` exactly as the callback returned them.
#[derive(Debug, Error)]
pub enum TimestepError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("io error [{path}]: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("signal error: {0}")]
    Signal(String),
}

impl TimestepError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    #[inline]
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }
}

impl From<ctrlc::Error> for TimestepError {
    fn from(e: ctrlc::Error) -> Self {
        Self::Signal(e.to_string())
    }
}
