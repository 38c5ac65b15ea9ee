//! # Concurrency Primitives
//!
//! Non-blocking completion tracking and ambient context propagation for
//! asynchronous transition orchestration. Nothing in this module blocks a
//! thread: waiting is represented by retained completion-handle copies, and
//! continuations run on whichever worker thread performs the final release.

pub mod completion;
pub mod context;

pub use completion::{CompletionHandle, Continuation};
pub use context::{AmbientContext, AmbientToken, ContextScope};
