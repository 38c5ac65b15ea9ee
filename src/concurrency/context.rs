//! Ambient context propagation for continuations and fan-out tasks.
//!
//! Pipeline code observes an ambient execution context (service and
//! configuration bindings) through a thread-local slot. Continuations run on
//! arbitrary worker threads with no ambient context of their own, so the
//! orchestrator captures an [`AmbientToken`] on the calling thread and every
//! continuation body reinstates it for its duration.

use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

thread_local! {
    static CURRENT: RefCell<Option<Arc<AmbientContext>>> = const { RefCell::new(None) };
}

/// Immutable snapshot of call-site execution context.
///
/// Built once at setup time and shared by reference; never mutated after
/// capture, so cross-thread installation needs no synchronization.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AmbientContext {
    bindings: HashMap<String, String>,
}

impl AmbientContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named binding to the snapshot (builder style).
    pub fn with_binding(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.bindings.insert(key.into(), value.into());
        self
    }

    /// Look up a binding in the snapshot.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.bindings.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The context currently installed on this thread, if any.
    pub fn current() -> Option<Arc<AmbientContext>> {
        CURRENT.with(|slot| slot.borrow().clone())
    }
}

/// Opaque capture of the calling thread's ambient execution context.
///
/// Cloning a token is cheap; the underlying snapshot is shared. A token
/// captured on one thread may be installed on any other.
#[derive(Debug, Clone)]
pub struct AmbientToken {
    context: Option<Arc<AmbientContext>>,
}

impl AmbientToken {
    /// Capture whatever context is installed on the calling thread.
    ///
    /// Capturing on a thread with no installed context yields an empty
    /// token; installing an empty token clears the slot for the scope.
    pub fn capture() -> Self {
        Self {
            context: AmbientContext::current(),
        }
    }

    /// Build a token directly from a context snapshot.
    pub fn of(context: AmbientContext) -> Self {
        Self {
            context: Some(Arc::new(context)),
        }
    }

    pub fn context(&self) -> Option<&Arc<AmbientContext>> {
        self.context.as_ref()
    }

    /// Install this token's context on the current thread.
    ///
    /// The returned guard restores the previously installed context when it
    /// goes out of scope, on every exit path including unwinds.
    pub fn install(&self) -> ContextScope {
        let previous = CURRENT.with(|slot| slot.replace(self.context.clone()));
        ContextScope {
            previous,
            _not_send: PhantomData,
        }
    }

    /// Run `body` with this token's context installed.
    pub fn with_installed<R>(&self, body: impl FnOnce() -> R) -> R {
        let _scope = self.install();
        body()
    }
}

/// Scope guard for an installed ambient context.
///
/// Restores the prior context on drop. Not `Send`: the guard must be
/// dropped on the thread that created it.
pub struct ContextScope {
    previous: Option<Arc<AmbientContext>>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|slot| *slot.borrow_mut() = previous);
    }
}
