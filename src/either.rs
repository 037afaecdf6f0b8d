//! A value that is exactly one of two alternatives.

use crate::{error::Error, outcome::Outcome};

/// Either a `Left(L)` or a `Right(R)`.
///
/// By convention the right side is the "positive" one: [`map`][Either::map]
/// and the other value-transforming operations are right-biased, and
/// conversions treat `Right` as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Either<L, R> {
    /// The left alternative, conventionally negative.
    Left(L),
    /// The right alternative, conventionally positive.
    Right(R),
}

impl<L, R> Either<L, R> {
    /// Returns `true` if this is a `Left`.
    #[inline]
    pub fn is_left(&self) -> bool {
        matches!(self, Self::Left(_))
    }

    /// Returns `true` if this is a `Right`.
    #[inline]
    pub fn is_right(&self) -> bool {
        matches!(self, Self::Right(_))
    }

    /// Returns the left value.
    ///
    /// # Panics
    ///
    /// Panics if this is a `Right`.
    #[track_caller]
    pub fn left(self) -> L {
        match self {
            Self::Left(value) => value,
            Self::Right(_) => panic!("called `Either::left()` on a `Right` value"),
        }
    }

    /// Returns the right value.
    ///
    /// # Panics
    ///
    /// Panics if this is a `Left`.
    #[track_caller]
    pub fn right(self) -> R {
        match self {
            Self::Right(value) => value,
            Self::Left(_) => panic!("called `Either::right()` on a `Left` value"),
        }
    }

    /// Collapses both sides into a single value.
    pub fn fold<T, FL, FR>(self, left: FL, right: FR) -> T
    where
        FL: FnOnce(L) -> T,
        FR: FnOnce(R) -> T,
    {
        match self {
            Self::Left(value) => left(value),
            Self::Right(value) => right(value),
        }
    }

    /// Transforms the right value, leaving a `Left` unchanged.
    pub fn map<U, F>(self, op: F) -> Either<L, U>
    where
        F: FnOnce(R) -> U,
    {
        match self {
            Self::Left(value) => Either::Left(value),
            Self::Right(value) => Either::Right(op(value)),
        }
    }

    /// Transforms the left value, leaving a `Right` unchanged.
    pub fn map_left<U, F>(self, op: F) -> Either<U, R>
    where
        F: FnOnce(L) -> U,
    {
        match self {
            Self::Left(value) => Either::Left(op(value)),
            Self::Right(value) => Either::Right(value),
        }
    }

    /// Chains a further two-sided computation onto the right value.
    pub fn flat_map<U, F>(self, op: F) -> Either<L, U>
    where
        F: FnOnce(R) -> Either<L, U>,
    {
        match self {
            Self::Left(value) => Either::Left(value),
            Self::Right(value) => op(value),
        }
    }

    /// Exchanges the two sides.
    pub fn swap(self) -> Either<R, L> {
        match self {
            Self::Left(value) => Either::Right(value),
            Self::Right(value) => Either::Left(value),
        }
    }

    /// Returns the right value, or `default` if this is a `Left`.
    pub fn get_or_else(self, default: R) -> R {
        match self {
            Self::Left(_) => default,
            Self::Right(value) => value,
        }
    }

    /// Returns `self` if this is a `Right`, or `other` otherwise.
    pub fn or_else(self, other: Self) -> Self {
        match self {
            Self::Left(_) => other,
            Self::Right(_) => self,
        }
    }

    /// Keeps a `Right` only if its value satisfies `predicate`; a rejected
    /// `Right` is replaced by `Left(fallback)`. A `Left` passes through.
    pub fn filter_or_else<P>(self, predicate: P, fallback: L) -> Self
    where
        P: FnOnce(&R) -> bool,
    {
        match self {
            Self::Right(value) if !predicate(&value) => Self::Left(fallback),
            other => other,
        }
    }

    /// Returns `true` if this is a `Right` whose value satisfies `predicate`.
    pub fn exists<P>(&self, predicate: P) -> bool
    where
        P: FnOnce(&R) -> bool,
    {
        match self {
            Self::Left(_) => false,
            Self::Right(value) => predicate(value),
        }
    }

    /// Returns `true` if this is a `Left`, or a `Right` whose value
    /// satisfies `predicate`.
    pub fn forall<P>(&self, predicate: P) -> bool
    where
        P: FnOnce(&R) -> bool,
    {
        match self {
            Self::Left(_) => true,
            Self::Right(value) => predicate(value),
        }
    }

    /// Applies `op` to the right value, if there is one.
    pub fn for_each<F>(self, op: F)
    where
        F: FnOnce(R),
    {
        if let Self::Right(value) = self {
            op(value);
        }
    }

    /// Returns the right value, discarding a `Left`.
    pub fn ok(self) -> Option<R> {
        match self {
            Self::Left(_) => None,
            Self::Right(value) => Some(value),
        }
    }

    /// Converts into an [`Outcome`], coercing the left side.
    ///
    /// The left value is not error-shaped, so it is discarded and the
    /// [`Error::Left`] sentinel substitutes for it. Use
    /// [`into_outcome`][Either::into_outcome] when the left side already
    /// carries an [`Error`].
    pub fn outcome(self) -> Outcome<R> {
        match self {
            Self::Left(_) => Outcome::Failure(Error::Left),
            Self::Right(value) => Outcome::Success(value),
        }
    }
}

impl<R> Either<Error, R> {
    /// Converts into an [`Outcome`], preserving the left error verbatim.
    pub fn into_outcome(self) -> Outcome<R> {
        match self {
            Self::Left(error) => Outcome::Failure(error),
            Self::Right(value) => Outcome::Success(value),
        }
    }
}
