//! Cancellation scopes and the completion signal they broadcast.
//!
//! Every [`Future`][crate::Future] owns a [`Scope`], used purely as its
//! completion/cancellation signaling channel: the scope closes exactly once,
//! either because the future completed or because the scope (or one of its
//! ancestors) was cancelled, and the closure is observable by any number of
//! concurrent waiters through [`Done`] handles.
//!
//! The signal itself is a [`crossbeam_channel`] channel that never carries a
//! message: dropping its [`Sender`] disconnects every [`Receiver`] clone at
//! once, which is a broadcast that can also participate in `select!`.

use std::{
    mem,
    sync::{Arc, Weak},
    time::Duration,
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::sync::Mutex;

/// An uninhabited message type: the only observable event on a signal
/// channel is its disconnection.
pub(crate) enum Never {}

struct State {
    /// Dropped to close the scope. `None` once the scope is closed.
    alive: Option<Sender<Never>>,
    /// Scopes to cancel transitively when this one closes.
    children: Vec<Weak<Inner>>,
}

struct Inner {
    state: Mutex<State>,
    done: Receiver<Never>,
}

/// A cancellable scope, forming a tree: cancelling a scope cancels all of
/// its descendants, never its ancestors.
///
/// Cloning a [`Scope`] yields another handle to the *same* scope.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<Inner>,
}

impl Scope {
    /// Creates a new root scope, unrelated to any other.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(0);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    alive: Some(sender),
                    children: Vec::new(),
                }),
                done: receiver,
            }),
        }
    }

    /// Creates a child scope that closes when `self` closes.
    ///
    /// The child can also be cancelled on its own, without affecting `self`.
    /// If `self` is already closed, the child starts out closed.
    pub fn child(&self) -> Scope {
        let child = Scope::new();
        let mut state = self.inner.state.lock();
        if state.alive.is_some() {
            // Prune entries for scopes that are gone before growing the list.
            if state.children.len() == state.children.capacity() {
                state.children.retain(|weak| weak.strong_count() != 0);
            }
            state.children.push(Arc::downgrade(&child.inner));
        } else {
            drop(state);
            child.cancel();
        }
        child
    }

    /// Closes this scope and all of its descendants.
    ///
    /// Closing is idempotent: only the first call has any effect. All
    /// current and future [`Done`] observers see the closure.
    pub fn cancel(&self) {
        let children = {
            let mut state = self.inner.state.lock();
            if state.alive.is_none() {
                return;
            }
            // Dropping the sender disconnects all `Done` receivers at once.
            state.alive = None;
            mem::take(&mut state.children)
        };

        for child in children {
            if let Some(inner) = child.upgrade() {
                Scope { inner }.cancel();
            }
        }
    }

    /// Returns `true` if this scope has been closed.
    pub fn is_cancelled(&self) -> bool {
        self.inner.state.lock().alive.is_none()
    }

    /// Returns a handle that becomes ready when this scope closes.
    pub fn done(&self) -> Done {
        Done {
            channel: self.inner.done.clone(),
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

/// A waitable handle to a [`Scope`]'s closure.
///
/// Becomes ready exactly once, when the scope closes, whether through
/// completion or cancellation. Any number of `Done` handles (and threads
/// blocked on them) observe the same closure.
#[derive(Clone)]
pub struct Done {
    channel: Receiver<Never>,
}

impl Done {
    /// Blocks the calling thread until the scope closes.
    ///
    /// Returns immediately if it already has.
    pub fn wait(&self) {
        match self.channel.recv() {
            Ok(never) => match never {},
            Err(_) => {}
        }
    }

    /// Blocks until the scope closes or `timeout` elapses.
    ///
    /// Returns `true` if the scope closed, `false` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        match self.channel.recv_timeout(timeout) {
            Ok(never) => match never {},
            Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
        }
    }

    /// The underlying channel, for `select!` fan-ins.
    pub(crate) fn channel(&self) -> Receiver<Never> {
        self.channel.clone()
    }
}
