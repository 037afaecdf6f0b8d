//! The closed set of failure kinds produced and understood by this crate.

use std::{any::Any, error, fmt, sync::Arc};

/// Discriminates [`Error`] values without looking at their payloads.
///
/// Comparing kinds is the supported way to branch on well-known failures:
///
/// ```
/// use eventual::{Error, ErrorKind};
///
/// let err = Error::DeadlineExceeded;
/// assert!(err.is(ErrorKind::DeadlineExceeded));
/// assert!(!err.is(ErrorKind::Cancelled));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A promise that has not been assigned yet.
    Empty,
    /// A filter predicate rejected an otherwise successful value.
    Unsatisfied,
    /// A bounded wait elapsed before the future completed.
    DeadlineExceeded,
    /// The future's scope was cancelled before a result was produced.
    Cancelled,
    /// An [`Either`][crate::Either] left value that was not itself an error.
    Left,
    /// A recovered panic from a scheduled computation.
    Fault,
    /// A caller-supplied error.
    Other,
}

/// The error type carried by [`Outcome::Failure`][crate::Outcome::Failure].
///
/// The sentinel variants (`Empty`, `Unsatisfied`, `DeadlineExceeded`,
/// `Cancelled`, `Left`) are raised by this crate itself; `Fault` wraps the
/// description of a recovered panic; `Other` carries an arbitrary
/// caller-supplied error, shared so that many observers of the same future
/// can each receive the failure.
#[derive(Debug, Clone)]
pub enum Error {
    /// A promise that has not been assigned yet.
    Empty,
    /// A filter predicate rejected an otherwise successful value.
    Unsatisfied,
    /// A bounded wait elapsed before the future completed.
    DeadlineExceeded,
    /// The future's scope was cancelled before a result was produced.
    Cancelled,
    /// An `Either` left value that was not itself an error.
    Left,
    /// A recovered panic from a scheduled computation.
    Fault(String),
    /// A caller-supplied error.
    Other(Arc<dyn error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Wraps a caller-supplied error.
    pub fn other<E>(err: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        Self::Other(Arc::new(err))
    }

    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Empty => ErrorKind::Empty,
            Self::Unsatisfied => ErrorKind::Unsatisfied,
            Self::DeadlineExceeded => ErrorKind::DeadlineExceeded,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Left => ErrorKind::Left,
            Self::Fault(_) => ErrorKind::Fault,
            Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Returns `true` if this error is of the given [`ErrorKind`].
    #[inline]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }

    /// Converts a panic payload into an `Error`.
    ///
    /// A payload that already is an [`Error`] is taken verbatim; string
    /// payloads (the common case for `panic!` with a message) become a
    /// `Fault` carrying the message.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Error>() {
            Ok(error) => return *error,
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<String>() {
            Ok(message) => return Self::Fault(*message),
            Err(payload) => payload,
        };
        match payload.downcast::<&'static str>() {
            Ok(message) => Self::Fault((*message).to_string()),
            Err(_) => Self::Fault("unknown panic payload".to_string()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::Unsatisfied => f.write_str("unsatisfied"),
            Self::DeadlineExceeded => f.write_str("deadline exceeded"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Left => f.write_str("Left"),
            Self::Fault(message) => write!(f, "fault: {message}"),
            Self::Other(inner) => inner.fmt(f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Other(inner) => Some(&**inner),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};

    use super::*;

    fn capture_panic(payload: impl Any + Send + 'static) -> Error {
        let payload =
            catch_unwind(AssertUnwindSafe(|| resume_unwind(Box::new(payload)))).unwrap_err();
        Error::from_panic(payload)
    }

    #[test]
    fn kinds_are_distinguishable() {
        assert!(Error::Empty.is(ErrorKind::Empty));
        assert!(Error::Unsatisfied.is(ErrorKind::Unsatisfied));
        assert!(Error::DeadlineExceeded.is(ErrorKind::DeadlineExceeded));
        assert!(Error::Cancelled.is(ErrorKind::Cancelled));
        assert!(!Error::DeadlineExceeded.is(ErrorKind::Cancelled));
        assert!(Error::Fault("x".into()).is(ErrorKind::Fault));
    }

    #[test]
    fn panic_payload_conversion() {
        let fault = capture_panic("boom".to_string());
        match &fault {
            Error::Fault(message) => assert_eq!(message, "boom"),
            other => panic!("expected Fault, got {other:?}"),
        }
        assert!(capture_panic(Error::Empty).is(ErrorKind::Empty));
        assert!(capture_panic(42_u32).is(ErrorKind::Fault));
    }

    #[test]
    fn other_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::other(io);
        assert!(err.is(ErrorKind::Other));
        assert_eq!(err.to_string(), "gone");
        assert!(error::Error::source(&err).is_some());
    }

    #[test]
    fn display_is_deterministic() {
        assert_eq!(Error::Empty.to_string(), "empty");
        assert_eq!(Error::Unsatisfied.to_string(), "unsatisfied");
        assert_eq!(Error::DeadlineExceeded.to_string(), "deadline exceeded");
        assert_eq!(Error::Fault("boom".into()).to_string(), "fault: boom");
    }
}
