//! # Global-Transition Orchestration
//!
//! Drives lifecycle transitions (begin/end of a run or segment) across one
//! primary pipeline and an arbitrary number of sub-pipelines, using
//! completion handles instead of blocked threads.
//!
//! ## Core Components
//!
//! - **global_transition**: the two asynchronous entry points composing
//!   primary-stage invocation with sub-pipeline fan-out
//! - **fanout**: dispatch from (direction, unit kind) to the matching
//!   sub-pipeline entry point
//! - **pipeline**: the `Pipeline` / `SubPipeline` collaborator contracts
//! - **coordinator**: convenience wrapper adding correlation ids, logging,
//!   and lifecycle events
//! - **types**: shared transition vocabulary (direction, unit kind, sync
//!   key, conditions context)

pub mod coordinator;
pub mod fanout;
pub mod global_transition;
pub mod pipeline;
pub mod types;

// Re-export core types and components for easy access
pub use coordinator::GlobalTransitionCoordinator;
pub use fanout::{sub_pipeline_do_global_begin_async, sub_pipeline_do_global_end_async};
pub use global_transition::{
    begin_global_transition_async, end_global_transition_async, SubPipelines,
};
pub use pipeline::{Pipeline, SubPipeline};
pub use types::{ConditionsContext, Direction, SyncKey, TransitionKind, UnitKind};
