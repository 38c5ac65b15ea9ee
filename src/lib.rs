#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Conductor Core Rust
//!
//! High-performance Rust core for asynchronous global-transition
//! orchestration across hierarchical processing pipelines.
//!
//! ## Overview
//!
//! A global transition is a lifecycle event — begin or end of a processing
//! unit (a run, or a segment nested inside one) — applied across one
//! primary pipeline and an arbitrary number of dependent sub-pipelines.
//! Conductor drives such transitions with non-blocking continuations
//! instead of thread-blocking waits, while guaranteeing that exactly one
//! completion notification is delivered and that failure is neither lost
//! nor duplicated.
//!
//! ## Architecture
//!
//! Transitions run on worker threads drawn from a shared pool. The caller
//! hands in a [`CompletionHandle`]; the orchestrator schedules the primary
//! stage, and once that stage releases its handle, replays the same
//! transition across every sub-pipeline. A primary-stage failure still
//! fans out to the sub-pipelines (cleanup is never skipped) but always
//! wins the outcome reported to the caller; on primary success the caller
//! sees the first sub-pipeline failure, if any.
//!
//! ## Module Organization
//!
//! - [`concurrency`] - Completion handles, continuations, ambient context
//! - [`orchestration`] - Global-transition entry points, fan-out, contracts
//! - [`events`] - Transition lifecycle events over a broadcast channel
//! - [`config`] - Configuration management
//! - [`error`] - Failure payload and structured error handling
//! - [`logging`] - Structured logging initialization and helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use conductor_core::concurrency::{CompletionHandle, Continuation};
//! use conductor_core::orchestration::{
//!     begin_global_transition_async, ConditionsContext, Pipeline, SubPipelines, SyncKey,
//!     UnitKind,
//! };
//!
//! # fn example(pipeline: Arc<dyn Pipeline<u64>>, subs: SubPipelines<u64>) {
//! let caller = CompletionHandle::new(Continuation::new(|outcome| {
//!     match outcome {
//!         None => println!("run 7 began everywhere"),
//!         Some(failure) => eprintln!("begin run failed: {failure}"),
//!     }
//! }));
//!
//! begin_global_transition_async(
//!     caller,
//!     &pipeline,
//!     &Arc::new(7u64),
//!     SyncKey::for_run(7),
//!     &Arc::new(ConditionsContext::default()),
//!     &subs,
//!     UnitKind::Run,
//! );
//! # }
//! ```

pub mod concurrency;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod orchestration;

pub use concurrency::{AmbientContext, AmbientToken, CompletionHandle, Continuation};
pub use config::ConductorConfig;
pub use error::{ConductorError, DoubleReleaseError, Failure, Result};
pub use events::{EventPublisher, TransitionEvent, TransitionOutcome};
pub use orchestration::{
    begin_global_transition_async, end_global_transition_async, ConditionsContext, Direction,
    GlobalTransitionCoordinator, Pipeline, SubPipeline, SubPipelines, SyncKey, TransitionKind,
    UnitKind,
};
