//! Tagged success-or-failure values.

use std::fmt;

use crate::{
    either::Either,
    error::{Error, ErrorKind},
};

/// The result of a computation: a value, or an [`Error`] describing why
/// there is none.
///
/// This is the value every [`Future`][crate::Future] eventually stores.
/// Unlike [`std::result::Result`], the error side is always this crate's
/// [`Error`], which keeps outcomes cheap to clone and lets the well-known
/// failure kinds (cancellation, deadlines, rejected filters) travel through
/// combinator chains unchanged.
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    /// The computation produced a value.
    Success(T),
    /// The computation failed.
    Failure(Error),
}

impl<T> Outcome<T> {
    /// Returns `true` if this is a [`Success`][Outcome::Success].
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` if this is a [`Failure`][Outcome::Failure].
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns the success value.
    ///
    /// # Panics
    ///
    /// Panics if this is a [`Failure`][Outcome::Failure]. Calling an
    /// accessor on the wrong variant is a programmer error, not a
    /// recoverable condition.
    #[track_caller]
    pub fn success(self) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(error) => {
                panic!("called `Outcome::success()` on a `Failure` value: {error}")
            }
        }
    }

    /// Returns the failure error.
    ///
    /// # Panics
    ///
    /// Panics if this is a [`Success`][Outcome::Success].
    #[track_caller]
    pub fn failure(self) -> Error {
        match self {
            Self::Failure(error) => error,
            Self::Success(_) => panic!("called `Outcome::failure()` on a `Success` value"),
        }
    }

    /// Converts into a standard [`Result`].
    #[inline]
    pub fn into_result(self) -> Result<T, Error> {
        self.into()
    }

    /// Returns the success value, discarding any error.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Returns the success value, or `default` if this is a failure.
    pub fn get_or_else(self, default: T) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => default,
        }
    }

    /// Returns `self` if successful, or `other` otherwise.
    pub fn or_else(self, other: Self) -> Self {
        match self {
            Self::Success(_) => self,
            Self::Failure(_) => other,
        }
    }

    /// Returns `true` if this is a success whose value satisfies `predicate`.
    pub fn exists<P>(&self, predicate: P) -> bool
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Self::Success(value) => predicate(value),
            Self::Failure(_) => false,
        }
    }

    /// Returns `true` if this is a failure, or a success whose value
    /// satisfies `predicate`.
    pub fn forall<P>(&self, predicate: P) -> bool
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Self::Success(value) => predicate(value),
            Self::Failure(_) => true,
        }
    }

    /// Applies `op` to the success value, if there is one.
    pub fn for_each<F>(self, op: F)
    where
        F: FnOnce(T),
    {
        if let Self::Success(value) = self {
            op(value);
        }
    }

    /// Keeps a success only if its value satisfies `predicate`.
    ///
    /// A rejected success becomes `Failure(Error::Unsatisfied)`; a failure
    /// passes through unchanged.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Self::Success(value) if !predicate(&value) => Self::Failure(Error::Unsatisfied),
            other => other,
        }
    }

    /// [`filter`][Outcome::filter] with the predicate inverted.
    pub fn filter_not<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        self.filter(|value| !predicate(value))
    }

    /// Transforms the success value, leaving failures unchanged.
    pub fn map<U, F>(self, op: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(value) => Outcome::Success(op(value)),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Chains a further fallible computation onto the success value.
    pub fn flat_map<U, F>(self, op: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Outcome<U>,
    {
        match self {
            Self::Success(value) => op(value),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Turns a failure back into a success by applying `op` to the error.
    pub fn recover<F>(self, op: F) -> Self
    where
        F: FnOnce(Error) -> T,
    {
        match self {
            Self::Success(_) => self,
            Self::Failure(error) => Self::Success(op(error)),
        }
    }

    /// Like [`recover`][Outcome::recover], but `op` may itself fail.
    pub fn recover_with<F>(self, op: F) -> Self
    where
        F: FnOnce(Error) -> Self,
    {
        match self {
            Self::Success(_) => self,
            Self::Failure(error) => op(error),
        }
    }

    /// Collapses both variants into a single value.
    pub fn fold<R, D, F>(self, fail: D, succ: F) -> R
    where
        D: FnOnce(Error) -> R,
        F: FnOnce(T) -> R,
    {
        match self {
            Self::Success(value) => succ(value),
            Self::Failure(error) => fail(error),
        }
    }

    /// Converts into an [`Either`], with the error on the left.
    pub fn either(self) -> Either<Error, T> {
        match self {
            Self::Success(value) => Either::Right(value),
            Self::Failure(error) => Either::Left(error),
        }
    }

    /// Returns the [`ErrorKind`] of the failure, if this is one.
    pub fn failure_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error.kind()),
        }
    }
}

impl<T> From<Result<T, Error>> for Outcome<T> {
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<T> From<Outcome<T>> for Result<T, Error> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }
}

impl<T: fmt::Debug> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => write!(f, "Success({value:?})"),
            Self::Failure(error) => write!(f, "Failure({error})"),
        }
    }
}
