//! Completion handle / continuation primitive.
//!
//! A [`CompletionHandle`] is a reference-counted handle over shared
//! completion state. Every live copy represents one pending unit of
//! asynchronous work; when the collective pending count reaches zero the
//! registered [`Continuation`] fires exactly once, carrying the first
//! failure recorded among all copies (or none). "Waiting" is represented
//! entirely by retained handle copies, never by a blocked thread.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::concurrency::context::AmbientToken;
use crate::error::{DoubleReleaseError, Failure};

/// Deferred unit of work fired exactly once when all pending work on a
/// completion handle has been released.
///
/// The ambient context token is captured at construction time and
/// reinstated for the duration of the body, regardless of which worker
/// thread performs the final release.
pub struct Continuation {
    token: AmbientToken,
    work: Box<dyn FnOnce(Option<Failure>) + Send + 'static>,
}

impl Continuation {
    /// Build a continuation, capturing the calling thread's ambient context.
    pub fn new(work: impl FnOnce(Option<Failure>) + Send + 'static) -> Self {
        Self::with_token(AmbientToken::capture(), work)
    }

    /// Build a continuation around an explicitly supplied context token.
    pub fn with_token(
        token: AmbientToken,
        work: impl FnOnce(Option<Failure>) + Send + 'static,
    ) -> Self {
        Self {
            token,
            work: Box::new(work),
        }
    }

    fn invoke(self, failure: Option<Failure>) {
        let Self { token, work } = self;
        token.with_installed(move || work(failure));
    }
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation").finish_non_exhaustive()
    }
}

/// Shared state behind all copies of one completion handle.
struct CompletionState {
    /// Outstanding pending units across all live copies.
    pending: AtomicUsize,
    /// First failure recorded by any release; later failures are discarded.
    first_failure: OnceLock<Failure>,
    /// Taken exactly once, by the release that drops pending to zero.
    continuation: Mutex<Option<Continuation>>,
}

impl CompletionState {
    fn release(&self, failure: Option<Failure>) {
        if let Some(failure) = failure {
            // First-writer-wins; a lost race means another copy already
            // recorded "the" failure for this handle.
            let _ = self.first_failure.set(failure);
        }

        let previous = self.pending.fetch_sub(1, Ordering::AcqRel);
        match previous {
            0 => panic!("{}", DoubleReleaseError),
            1 => {
                let continuation = self.continuation.lock().take();
                match continuation {
                    Some(continuation) => continuation.invoke(self.first_failure.get().cloned()),
                    None => panic!("{}", DoubleReleaseError),
                }
            }
            _ => {}
        }
    }
}

/// Reference-counted completion handle.
///
/// Cloning a handle adds one pending unit of work; releasing a copy
/// (explicitly via [`release`](Self::release) /
/// [`release_with`](Self::release_with), or implicitly by dropping it)
/// removes one. The consuming release API makes releasing the same copy
/// twice unrepresentable; the underflow guard in the shared state treats
/// any double release reached through misuse as the fatal
/// [`DoubleReleaseError`].
pub struct CompletionHandle {
    state: Option<Arc<CompletionState>>,
}

impl CompletionHandle {
    /// Create a handle carrying one pending unit of work for `continuation`.
    pub fn new(continuation: Continuation) -> Self {
        Self {
            state: Some(Arc::new(CompletionState {
                pending: AtomicUsize::new(1),
                first_failure: OnceLock::new(),
                continuation: Mutex::new(Some(continuation)),
            })),
        }
    }

    /// Outstanding pending units across all copies of this handle.
    pub fn pending(&self) -> usize {
        self.state
            .as_ref()
            .map(|state| state.pending.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    /// Release this copy, reporting success.
    pub fn release(mut self) {
        if let Some(state) = self.state.take() {
            state.release(None);
        }
    }

    /// Release this copy, reporting `failure`.
    ///
    /// The failure is recorded only if no other copy recorded one first.
    pub fn release_with(mut self, failure: Failure) {
        if let Some(state) = self.state.take() {
            state.release(Some(failure));
        }
    }
}

impl Clone for CompletionHandle {
    fn clone(&self) -> Self {
        let state = self
            .state
            .as_ref()
            .expect("cloned a completion handle that was already released")
            .clone();
        // The increment needs no ordering of its own: the clone is handed
        // to its user through some synchronizing edge, and the matching
        // decrement is AcqRel.
        state.pending.fetch_add(1, Ordering::Relaxed);
        Self { state: Some(state) }
    }
}

impl Drop for CompletionHandle {
    /// Dropping an unreleased copy is a success release (scope exit).
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            state.release(None);
        }
    }
}

impl fmt::Debug for CompletionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionHandle")
            .field("pending", &self.pending())
            .finish()
    }
}
