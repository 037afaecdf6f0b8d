//! Combinators: deriving new futures from one or two existing ones.
//!
//! None of these block the calling thread. Each derived future gets a
//! single background waiter thread that blocks on the source's signal (and
//! on the derived future's own, so that cancelling the derived scope makes
//! the waiter abandon promptly instead of waiting forever on an abandoned
//! source). A waiter that abandons drops its [`Promise`][crate::Promise],
//! which closes the derived future's signal without resolving it.

use std::thread;

use crossbeam_channel::{never, select};

use crate::{
    drop::defer,
    future::{promise, Future},
    outcome::Outcome,
    scope::Scope,
};

impl<T: Clone + Send + 'static> Future<T> {
    /// Returns a future resolved by applying `op` to this future's outcome.
    ///
    /// `op` sees the outcome whether it is a success or a failure, so it
    /// can recover failures as well as transform values. The derived
    /// future's scope is a child of `parent`.
    pub fn transform<U, F>(&self, parent: &Scope, op: F) -> Future<U>
    where
        U: Send + 'static,
        F: FnOnce(Outcome<T>) -> Outcome<U> + Send + 'static,
    {
        let (promise, derived) = promise(parent);
        let source = self.clone();
        thread::spawn(move || {
            log::trace!("transform waiter starting");
            let _guard = defer(|| log::trace!("transform waiter exiting"));

            let source_done = source.done().channel();
            let own_done = promise.scope().done().channel();
            select! {
                recv(source_done) -> _ => {
                    // A source whose signal fired without a completion was
                    // cancelled; abandoning here cancels the derived future.
                    if let Some(outcome) = source.get() {
                        promise.complete(op(outcome));
                    }
                }
                recv(own_done) -> _ => {}
            }
        });
        derived
    }

    /// Monadic bind: like [`transform`][Future::transform], but `op` returns
    /// a second future, and the derived future chains to its outcome.
    pub fn transform_with<U, F>(&self, parent: &Scope, op: F) -> Future<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(Outcome<T>) -> Future<U> + Send + 'static,
    {
        let (promise, derived) = promise(parent);
        let source = self.clone();
        thread::spawn(move || {
            log::trace!("transform_with waiter starting");
            let _guard = defer(|| log::trace!("transform_with waiter exiting"));

            let source_done = source.done().channel();
            let own_done = promise.scope().done().channel();
            select! {
                recv(source_done) -> _ => {
                    let outcome = match source.get() {
                        Some(outcome) => outcome,
                        None => return,
                    };
                    let next = op(outcome);
                    let next_done = next.done().channel();
                    select! {
                        recv(next_done) -> _ => {
                            if let Some(outcome) = next.get() {
                                promise.complete(outcome);
                            }
                        }
                        recv(own_done) -> _ => {}
                    }
                }
                recv(own_done) -> _ => {}
            }
        });
        derived
    }

    /// Returns a future holding `op` applied to this future's success
    /// value. A failure propagates unchanged, without invoking `op`.
    ///
    /// # Examples
    ///
    /// ```
    /// use eventual::{Future, Scope};
    ///
    /// let scope = Scope::new();
    /// let future = Future::spawn(&scope, || 5);
    /// let doubled = future.map(&scope, |x| x * 2);
    /// assert_eq!(doubled.wait().success(), 10);
    /// ```
    pub fn map<U, F>(&self, parent: &Scope, op: F) -> Future<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.transform(parent, move |outcome| outcome.map(op))
    }

    /// Sequences a dependent asynchronous step onto this future's success
    /// value. A failure short-circuits, without invoking `op`.
    pub fn flat_map<U, F>(&self, parent: &Scope, op: F) -> Future<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Future<U> + Send + 'static,
    {
        let scope = parent.clone();
        self.transform_with(parent, move |outcome| match outcome {
            Outcome::Success(value) => op(value),
            Outcome::Failure(error) => Future::ready(&scope, Outcome::Failure(error)),
        })
    }

    /// Pairs this future with `other`.
    ///
    /// The derived future completes only once *both* sources have
    /// completed, in whichever order they finish, and carries both
    /// outcomes: one side failing does not make the pair a failure. If
    /// either source is cancelled without completing, or the derived scope
    /// is cancelled first, the pair is abandoned unresolved.
    ///
    /// The fan-in blocks on exactly three signals (the derived future's
    /// own cancellation and the two sources) and re-arms by swapping a
    /// consumed source's receiver for [`never`], so an already-completed
    /// side is not busy-polled while the other is pending.
    pub fn zip<U>(&self, parent: &Scope, other: &Future<U>) -> Future<(Outcome<T>, Outcome<U>)>
    where
        U: Clone + Send + 'static,
    {
        let (promise, derived) = promise(parent);
        let left = self.clone();
        let right = other.clone();
        thread::spawn(move || {
            log::trace!("zip waiter starting");
            let _guard = defer(|| log::trace!("zip waiter exiting"));

            let own_done = promise.scope().done().channel();
            let left_done = left.done().channel();
            let right_done = right.done().channel();
            let disabled = never();
            let mut left_outcome = None;
            let mut right_outcome = None;

            while left_outcome.is_none() || right_outcome.is_none() {
                // A consumed side's (permanently ready) receiver is swapped
                // for `disabled` so only the pending side is blocked on.
                let left_rx = if left_outcome.is_none() {
                    left_done.clone()
                } else {
                    disabled.clone()
                };
                let right_rx = if right_outcome.is_none() {
                    right_done.clone()
                } else {
                    disabled.clone()
                };

                select! {
                    recv(own_done) -> _ => return,
                    recv(left_rx) -> _ => match left.get() {
                        Some(outcome) => left_outcome = Some(outcome),
                        None => return,
                    },
                    recv(right_rx) -> _ => match right.get() {
                        Some(outcome) => right_outcome = Some(outcome),
                        None => return,
                    },
                }
            }

            if let (Some(left), Some(right)) = (left_outcome, right_outcome) {
                promise.complete(Outcome::Success((left, right)));
            }
        });
        derived
    }

    /// [`zip`][Future::zip] followed by combining the paired outcomes
    /// through `op`.
    pub fn zip_with<U, R, F>(&self, parent: &Scope, other: &Future<U>, op: F) -> Future<R>
    where
        U: Clone + Send + 'static,
        R: Send + 'static,
        F: FnOnce(Outcome<T>, Outcome<U>) -> Outcome<R> + Send + 'static,
    {
        self.zip(parent, other).transform(parent, move |paired| {
            paired.flat_map(|(left, right)| op(left, right))
        })
    }
}
