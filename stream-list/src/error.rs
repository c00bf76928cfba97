use core::fmt;

use thiserror::Error as ThisError;

use crate::Page;

/// Why a single fetch failed.
#[derive(Debug, ThisError)]
pub enum FetchError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Source(Box<dyn std::error::Error + Send + Sync>),

    #[error("Invalid load result. Key 'items' must be a list.")]
    MalformedPage,
}

impl FetchError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn from_error(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Source(Box::new(err))
    }
}

impl From<String> for FetchError {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<&str> for FetchError {
    fn from(message: &str) -> Self {
        Self::Message(message.to_owned())
    }
}

/// An option was assigned a value outside its accepted range.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
#[error("Invalid {option} '{value}'.")]
pub struct OptionError {
    pub option: &'static str,
    pub value: String,
}

impl OptionError {
    pub fn new(option: &'static str, value: impl fmt::Display) -> Self {
        Self {
            option,
            value: value.to_string(),
        }
    }
}

/// The outcome of a failed or aborted `load`.
///
/// Only the first page of a session can produce one; later pagination failures are
/// reported through the logger.
pub struct LoadError<R> {
    message: String,
    cause: Option<FetchError>,
    result: Option<Page<R>>,
    aborted: bool,
}

impl<R> LoadError<R> {
    pub(crate) fn failed(cause: FetchError, result: Option<Page<R>>) -> Self {
        Self {
            message: "Loading data failed.".to_owned(),
            cause: Some(cause),
            result,
            aborted: false,
        }
    }

    pub(crate) fn aborted() -> Self {
        Self {
            message: "Loading data was aborted.".to_owned(),
            cause: None,
            result: None,
            aborted: true,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The last fetch failure, if the load was not aborted.
    pub fn cause(&self) -> Option<&FetchError> {
        self.cause.as_ref()
    }

    /// The raw page, when the adapter resolved with a malformed one.
    pub fn result(&self) -> Option<&Page<R>> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<Page<R>> {
        self.result
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

impl<R> fmt::Debug for LoadError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadError")
            .field("message", &self.message)
            .field("cause", &self.cause)
            .field("has_result", &self.result.is_some())
            .field("aborted", &self.aborted)
            .finish()
    }
}

impl<R> fmt::Display for LoadError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " ({cause})")?;
        }
        Ok(())
    }
}

impl<R> std::error::Error for LoadError<R> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|e| e as _)
    }
}
