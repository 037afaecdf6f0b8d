//! Thread-based futures with composable success/failure combinators.
//!
//! (if you're looking for cooperative, poll-based futures for running large
//! numbers of I/O tasks concurrently, you're probably better served by an
//! `async` runtime; this library runs a small number of computations on
//! plain OS threads and focuses on composing their *results*)
//!
//! # Overview
//!
//! This library features three main types: [`Future`], [`Outcome`] and
//! [`Scope`].
//!
//! A [`Future`] is a handle to a computation running on its own thread,
//! eventually completing exactly once with an [`Outcome`]: a value or an
//! [`Error`]. Completion can be consumed by pulling ([`Future::wait`],
//! [`Future::wait_within`], the non-blocking [`Future::get`]) or by pushing
//! ([`Future::on_completed`] and friends). Combinators ([`Future::map`],
//! [`Future::flat_map`], [`Future::zip`], [`Future::filter`], ...) derive
//! new futures without blocking; their waiting happens on background
//! threads.
//!
//! Every future signals through a [`Scope`], a cancellable scope that also
//! forms a tree: cancelling a scope wakes every observer of every future
//! created under it, letting abandoned waiters exit promptly. Failures,
//! including panics in scheduled computations (which are caught at the
//! thread boundary), travel through combinator chains as ordinary
//! [`Outcome::Failure`] values and never unwind into the caller.
//!
//! # Usage
//!
//! Schedule a computation, derive from it, and block on the result:
//!
//! ```
//! use eventual::{Future, Scope};
//!
//! let scope = Scope::new();
//! let future = Future::spawn(&scope, || 5);
//! let doubled = future.map(&scope, |x| x * 2);
//! assert_eq!(doubled.wait().success(), 10);
//! ```
//!
//! Join two independent computations, keeping both outcomes:
//!
//! ```
//! use eventual::{Future, Scope};
//!
//! let scope = Scope::new();
//! let a = Future::spawn(&scope, || "a");
//! let b = Future::spawn(&scope, || 1);
//!
//! let (left, right) = a.zip(&scope, &b).wait().success();
//! assert_eq!(left.success(), "a");
//! assert_eq!(right.success(), 1);
//! ```
//!
//! Bound a wait without giving up on the future:
//!
//! ```
//! use std::{thread, time::Duration};
//! use eventual::{ErrorKind, Future, Scope};
//!
//! let scope = Scope::new();
//! let slow = Future::spawn(&scope, || {
//!     thread::sleep(Duration::from_millis(200));
//!     5
//! });
//!
//! let bounded = slow.wait_within(&scope, Duration::from_millis(10));
//! assert!(bounded.failure().is(ErrorKind::DeadlineExceeded));
//!
//! // Only the bounded call gave up; the future still completes.
//! assert_eq!(slow.wait().success(), 5);
//! ```

mod combine;
mod drop;
mod either;
mod error;
mod future;
mod outcome;
mod scope;
pub mod sync;

pub use crate::either::Either;
pub use crate::error::{Error, ErrorKind};
pub use crate::future::{promise, Future, Promise};
pub use crate::outcome::Outcome;
pub use crate::scope::{Done, Scope};
