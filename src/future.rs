//! The completion primitive: single-assignment futures and their promises.

use std::{
    fmt,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
    thread,
    time::Duration,
};

use crossbeam_channel::select;

use crate::{
    error::Error,
    outcome::Outcome,
    scope::{Done, Scope},
    sync::Mutex,
};

/// Creates a connected pair of [`Promise`] and [`Future`].
///
/// The future's scope is created as a child of `parent`: cancelling
/// `parent` closes the future's signal channel, waking every observer, even
/// if the promise is never completed.
///
/// This is the escape hatch for futures resolved by something other than a
/// spawned computation:
///
/// ```
/// use eventual::{promise, Outcome, Scope};
///
/// let scope = Scope::new();
/// let (promise, future) = promise(&scope);
/// promise.complete(Outcome::Success(5));
/// assert_eq!(future.wait().success(), 5);
/// ```
pub fn promise<T>(parent: &Scope) -> (Promise<T>, Future<T>) {
    let future = Future {
        shared: Arc::new(Shared {
            slot: Mutex::new(None),
        }),
        scope: parent.child(),
    };
    (
        Promise {
            future: future.clone(),
            fulfilled: false,
        },
        future,
    )
}

struct Shared<T> {
    /// `None` while pending; written exactly once.
    slot: Mutex<Option<Outcome<T>>>,
}

/// A computation producing an [`Outcome<T>`] at an unknown future time.
///
/// A `Future` is a cloneable handle: all clones observe the same eventual
/// outcome. It offers pull access ([`wait`][Future::wait],
/// [`wait_within`][Future::wait_within], non-blocking [`get`][Future::get])
/// and push access ([`on_completed`][Future::on_completed] and friends),
/// plus the combinators in this crate for deriving new futures without
/// blocking.
///
/// Futures are created by the scheduling entry points
/// ([`spawn`][Future::spawn], [`try_spawn`][Future::try_spawn]), by
/// [`ready`][Future::ready], by the combinators, or, for custom sources,
/// through a [`promise`] pair.
pub struct Future<T> {
    shared: Arc<Shared<T>>,
    scope: Scope,
}

impl<T> Clone for Future<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            scope: self.scope.clone(),
        }
    }
}

/// The exclusive capability to resolve a [`Future`], held by the task that
/// produces its value.
///
/// Dropping a `Promise` without completing it closes the future's signal
/// channel: observers wake up and see the future as cancelled, never as
/// completed. This typically means the resolving task decided not to
/// produce a value, or was abandoned.
pub struct Promise<T> {
    future: Future<T>,
    fulfilled: bool,
}

impl<T> Promise<T> {
    /// Completes the future with `outcome`, consuming the promise.
    ///
    /// The result write happens-before the signal channel closes, so any
    /// observer woken by the closure sees the fully-populated outcome.
    pub fn complete(mut self, outcome: Outcome<T>) {
        {
            let mut slot = self.future.shared.slot.lock();
            debug_assert!(slot.is_none(), "promise completed twice");
            *slot = Some(outcome);
        }
        self.future.scope.cancel();
        self.fulfilled = true;
    }

    /// Returns another handle to the future this promise resolves.
    pub fn future(&self) -> Future<T> {
        self.future.clone()
    }

    pub(crate) fn scope(&self) -> &Scope {
        &self.future.scope
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        if self.fulfilled {
            // `complete` already closed the scope.
            return;
        }

        self.future.scope.cancel();
    }
}

impl<T: Send + 'static> Future<T> {
    /// Runs `op` on a new thread and returns a future for its result.
    ///
    /// A normal return completes the future with
    /// [`Success`][Outcome::Success]. A panic is caught at the thread
    /// boundary and completes the future with a
    /// [`Fault`][Error::Fault]-flavored [`Failure`][Outcome::Failure]; it
    /// never unwinds into the caller and never leaves the future pending.
    ///
    /// # Examples
    ///
    /// ```
    /// use eventual::{Future, Scope};
    ///
    /// let scope = Scope::new();
    /// let future = Future::spawn(&scope, || 5);
    /// assert_eq!(future.wait().success(), 5);
    /// ```
    pub fn spawn<F>(parent: &Scope, op: F) -> Future<T>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (promise, future) = promise(parent);
        thread::spawn(move || {
            let outcome = match catch_unwind(AssertUnwindSafe(op)) {
                Ok(value) => Outcome::Success(value),
                Err(payload) => Outcome::Failure(Error::from_panic(payload)),
            };
            promise.complete(outcome);
        });
        future
    }

    /// Like [`spawn`][Future::spawn], but for fallible computations: an
    /// `Err` return completes the future with that failure. Panics are
    /// caught the same way.
    pub fn try_spawn<F>(parent: &Scope, op: F) -> Future<T>
    where
        F: FnOnce() -> Result<T, Error> + Send + 'static,
    {
        let (promise, future) = promise(parent);
        thread::spawn(move || {
            let outcome = match catch_unwind(AssertUnwindSafe(op)) {
                Ok(result) => result.into(),
                Err(payload) => Outcome::Failure(Error::from_panic(payload)),
            };
            promise.complete(outcome);
        });
        future
    }
}

impl<T> Future<T> {
    /// Returns an already-completed future holding `outcome`.
    pub fn ready(parent: &Scope, outcome: Outcome<T>) -> Future<T> {
        let (promise, future) = promise(parent);
        promise.complete(outcome);
        future
    }

    /// Returns `true` if the future has completed.
    ///
    /// Non-blocking. Once this returns `true` it stays `true`, and the
    /// stored outcome never changes.
    pub fn is_completed(&self) -> bool {
        self.shared.slot.lock().is_some()
    }

    /// Returns a handle that becomes ready when the future completes *or*
    /// its scope is cancelled, whichever happens first.
    ///
    /// A consumer woken through [`Done`] must distinguish real completion
    /// from cancellation via [`is_completed`][Future::is_completed] (or by
    /// [`get`][Future::get] returning `Some`).
    pub fn done(&self) -> Done {
        self.scope.done()
    }
}

impl<T: Clone> Future<T> {
    /// Returns the outcome if the future has completed, without blocking.
    ///
    /// `None` means the future is still pending (or was cancelled without
    /// ever completing).
    pub fn get(&self) -> Option<Outcome<T>> {
        self.shared.slot.lock().clone()
    }

    /// Blocks the calling thread until the future completes, then returns
    /// its outcome.
    ///
    /// If the future's scope is cancelled before completion, this returns
    /// `Failure(Error::Cancelled)` instead. If neither ever happens, this
    /// blocks forever; bounding the wait is the caller's job (see
    /// [`wait_within`][Future::wait_within]).
    pub fn wait(&self) -> Outcome<T> {
        self.done().wait();
        self.get()
            .unwrap_or_else(|| Outcome::Failure(Error::Cancelled))
    }

    /// Blocks until the future completes, `scope` is cancelled, or
    /// `at_most` elapses, whichever happens first.
    ///
    /// Expiry returns `Failure(Error::DeadlineExceeded)`; cancellation of
    /// `scope` returns `Failure(Error::Cancelled)`. Neither cancels the
    /// future itself: only this one blocking call gives up, and the future
    /// may still complete later and be awaited again.
    pub fn wait_within(&self, scope: &Scope, at_most: Duration) -> Outcome<T> {
        let own = self.done().channel();
        let outer = scope.done().channel();
        let deadline = crossbeam_channel::after(at_most);
        select! {
            recv(own) -> _ => self
                .get()
                .unwrap_or_else(|| Outcome::Failure(Error::Cancelled)),
            recv(outer) -> _ => Outcome::Failure(Error::Cancelled),
            recv(deadline) -> _ => Outcome::Failure(Error::DeadlineExceeded),
        }
    }
}

impl<T: Clone + Send + 'static> Future<T> {
    /// Registers a one-shot observer invoked with the outcome once the
    /// future completes.
    ///
    /// The callback runs on its own thread, never on the registrant's, and
    /// fires at most once. Registering on an already-completed future fires
    /// immediately. If the future is cancelled without completing, the
    /// callback is dropped uninvoked. Multiple registered observers all
    /// fire, in unspecified order.
    pub fn on_completed<F>(&self, op: F)
    where
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        let future = self.clone();
        thread::spawn(move || {
            future.done().wait();
            if let Some(outcome) = future.get() {
                op(outcome);
            }
        });
    }

    /// Registers an observer invoked with the success value, only if the
    /// future completes successfully.
    pub fn on_success<F>(&self, op: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.on_completed(move |outcome| {
            if let Outcome::Success(value) = outcome {
                op(value);
            }
        });
    }

    /// Registers an observer invoked with the error, only if the future
    /// completes with a failure.
    pub fn on_error<F>(&self, op: F)
    where
        F: FnOnce(Error) + Send + 'static,
    {
        self.on_completed(move |outcome| {
            if let Outcome::Failure(error) = outcome {
                op(error);
            }
        });
    }

    /// Returns a future that completes with this future's outcome if it is
    /// a failure or a success satisfying `predicate`, and with
    /// `Failure(Error::Unsatisfied)` otherwise.
    ///
    /// Returns immediately; the decision is made on a background waiter
    /// once this future completes.
    pub fn filter<P>(&self, parent: &Scope, predicate: P) -> Future<T>
    where
        P: FnOnce(&T) -> bool + Send + 'static,
    {
        let scope = parent.clone();
        self.transform_with(parent, move |outcome| {
            Future::ready(&scope, outcome.filter(predicate))
        })
    }

    /// [`filter`][Future::filter] with the predicate inverted.
    pub fn filter_not<P>(&self, parent: &Scope, predicate: P) -> Future<T>
    where
        P: FnOnce(&T) -> bool + Send + 'static,
    {
        self.filter(parent, move |value| !predicate(value))
    }
}

impl<T: fmt::Debug> fmt::Debug for Future<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.shared.slot.lock() {
            Some(outcome) => write!(f, "Completed({outcome})"),
            None => write!(f, "Future(?)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic::resume_unwind;

    use crate::error::ErrorKind;

    use super::*;

    fn assert_send<T: Send>() {}

    /// Panics without triggering the default panic hook's stderr output.
    fn silent_panic(payload: String) -> ! {
        resume_unwind(Box::new(payload))
    }

    #[test]
    fn future_is_send() {
        assert_send::<Future<i32>>();
        assert_send::<Promise<i32>>();
    }

    #[test]
    fn spawn_and_wait() {
        let scope = Scope::new();
        let future = Future::spawn(&scope, || 5);
        let outcome = future.wait();
        assert!(future.is_completed());
        assert_eq!(outcome.success(), 5);
    }

    #[test]
    fn completed_reads_are_idempotent() {
        let scope = Scope::new();
        let future = Future::spawn(&scope, || 5);
        assert_eq!(future.wait().success(), 5);
        for _ in 0..3 {
            assert_eq!(future.get().unwrap().success(), 5);
        }
        // `wait` after completion returns immediately with the same outcome.
        assert_eq!(future.wait().success(), 5);
    }

    #[test]
    fn get_before_completion_is_none() {
        let scope = Scope::new();
        let (promise, future) = promise::<i32>(&scope);
        assert!(!future.is_completed());
        assert!(future.get().is_none());
        promise.complete(Outcome::Success(1));
        assert_eq!(future.get().unwrap().success(), 1);
    }

    #[test]
    fn wait_returns_what_concurrent_get_sees() {
        let scope = Scope::new();
        let future = Future::spawn(&scope, || {
            thread::sleep(Duration::from_millis(50));
            7
        });

        let observer = {
            let future = future.clone();
            thread::spawn(move || future.wait().success())
        };
        assert_eq!(future.wait().success(), 7);
        assert_eq!(future.get().unwrap().success(), 7);
        assert_eq!(observer.join().unwrap(), 7);
    }

    #[test]
    fn panic_becomes_fault() {
        let scope = Scope::new();
        let future = Future::spawn(&scope, || -> i32 { silent_panic("boom".into()) });
        let error = future.wait().failure();
        assert!(error.is(ErrorKind::Fault));
        assert!(error.to_string().contains("boom"));
    }

    #[test]
    fn try_spawn_propagates_errors() {
        let scope = Scope::new();
        let ok = Future::try_spawn(&scope, || Ok(1));
        assert_eq!(ok.wait().success(), 1);

        let err = Future::try_spawn(&scope, || -> Result<i32, Error> { Err(Error::Empty) });
        assert!(err.wait().failure().is(ErrorKind::Empty));
    }

    #[test]
    fn ready_is_completed_immediately() {
        let scope = Scope::new();
        let future = Future::ready(&scope, Outcome::Success(3));
        assert!(future.is_completed());
        assert_eq!(future.wait().success(), 3);
    }

    #[test]
    fn bounded_wait_times_out_then_future_still_completes() {
        let scope = Scope::new();
        let future = Future::spawn(&scope, || {
            thread::sleep(Duration::from_millis(300));
            5
        });

        let bounded = future.wait_within(&scope, Duration::from_millis(20));
        assert!(bounded.failure().is(ErrorKind::DeadlineExceeded));

        // The timeout only abandoned the one blocking call.
        assert_eq!(future.wait().success(), 5);
    }

    #[test]
    fn bounded_wait_observes_outer_cancellation() {
        let scope = Scope::new();
        let future = Future::spawn(&scope, || {
            thread::sleep(Duration::from_millis(200));
            5
        });

        let outer = Scope::new();
        let canceller = {
            let outer = outer.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                outer.cancel();
            })
        };

        let outcome = future.wait_within(&outer, Duration::from_secs(5));
        assert!(outcome.failure().is(ErrorKind::Cancelled));
        canceller.join().unwrap();

        assert_eq!(future.wait().success(), 5);
    }

    #[test]
    fn dropped_promise_reads_as_cancelled() {
        let scope = Scope::new();
        let (promise, future) = promise::<i32>(&scope);
        drop(promise);
        assert!(future.wait().failure().is(ErrorKind::Cancelled));
        assert!(!future.is_completed());
    }

    #[test]
    fn parent_cancellation_wakes_waiters() {
        let scope = Scope::new();
        let (_promise, future) = promise::<i32>(&scope);

        let canceller = {
            let scope = scope.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                scope.cancel();
            })
        };

        assert!(future.wait().failure().is(ErrorKind::Cancelled));
        canceller.join().unwrap();
    }

    #[test]
    fn callbacks_fire_for_matching_state_only() {
        let scope = Scope::new();
        let (sender, receiver) = crossbeam_channel::unbounded();

        let future = Future::spawn(&scope, || 1);
        let tx = sender.clone();
        future.on_completed(move |outcome| tx.send(("completed", outcome.is_success())).unwrap());
        let tx = sender.clone();
        future.on_success(move |value| tx.send(("success", value == 1)).unwrap());
        let tx = sender;
        future.on_error(move |_| tx.send(("error", true)).unwrap());

        // The iterator ends once every observer thread has dropped its
        // sender, fired or not.
        let mut fired: Vec<_> = receiver.iter().collect();
        fired.sort();
        assert_eq!(fired, vec![("completed", true), ("success", true)]);
    }

    #[test]
    fn on_error_fires_on_failure() {
        let scope = Scope::new();
        let future = Future::try_spawn(&scope, || -> Result<i32, Error> { Err(Error::Empty) });

        let (sender, receiver) = crossbeam_channel::bounded(1);
        future.on_error(move |error| sender.send(error.kind()).unwrap());
        assert_eq!(
            receiver.recv_timeout(Duration::from_secs(5)).unwrap(),
            ErrorKind::Empty
        );
    }

    #[test]
    fn callback_registered_after_completion_fires_immediately() {
        let scope = Scope::new();
        let future = Future::spawn(&scope, || 1);
        future.wait();

        let (sender, receiver) = crossbeam_channel::bounded(1);
        future.on_success(move |value| sender.send(value).unwrap());
        assert_eq!(receiver.recv_timeout(Duration::from_secs(5)).unwrap(), 1);
    }

    #[test]
    fn filter_semantics() {
        let scope = Scope::new();
        let future = Future::spawn(&scope, || 5);
        future.wait();

        assert_eq!(future.filter(&scope, |&x| x > 0).wait().success(), 5);
        assert!(future
            .filter(&scope, |&x| x > 10)
            .wait()
            .failure()
            .is(ErrorKind::Unsatisfied));
        assert!(future
            .filter_not(&scope, |&x| x > 0)
            .wait()
            .failure()
            .is(ErrorKind::Unsatisfied));
        assert_eq!(future.filter_not(&scope, |&x| x > 10).wait().success(), 5);

        // A failure passes through unchanged, not replaced by `Unsatisfied`.
        let failing = Future::try_spawn(&scope, || -> Result<i32, Error> { Err(Error::Empty) });
        assert!(failing
            .filter(&scope, |_| true)
            .wait()
            .failure()
            .is(ErrorKind::Empty));
    }

    #[test]
    fn debug_rendering() {
        let scope = Scope::new();
        let (promise, future) = promise::<i32>(&scope);
        assert_eq!(format!("{future:?}"), "Future(?)");
        promise.complete(Outcome::Success(5));
        assert_eq!(format!("{future:?}"), "Completed(Success(5))");
    }
}
