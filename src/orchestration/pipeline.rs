//! Collaborator contracts consumed by the global-transition orchestrator.
//!
//! Both traits are asynchronous by contract, not by signature: every entry
//! point schedules its work and returns immediately, and the completion
//! handle it was given is released — possibly with a failure — when that
//! work finishes on some worker thread. Failures travel exclusively through
//! the handle; nothing crosses a scheduling boundary by panicking.

use std::sync::Arc;

use crate::concurrency::CompletionHandle;
use crate::orchestration::types::{ConditionsContext, SyncKey, TransitionKind};

/// The primary processing graph for one process.
///
/// `P` is the opaque processing unit (principal) being transitioned; the
/// orchestrator holds it non-owningly through an `Arc` for the duration of
/// the transition.
pub trait Pipeline<P>: Send + Sync
where
    P: Send + Sync + 'static,
{
    /// Schedule the global transition across the pipeline's internal stages.
    ///
    /// `cleaning_up_after_failure` is meaningful for end transitions only;
    /// collaborators must still attempt cleanup-oriented completion in that
    /// mode rather than aborting early. Begin transitions pass `false`.
    fn process_global_async(
        &self,
        transition: TransitionKind,
        handle: CompletionHandle,
        principal: &Arc<P>,
        conditions: &Arc<ConditionsContext>,
        cleaning_up_after_failure: bool,
    );
}

/// A nested pipeline that must observe the same transition after its parent.
///
/// One entry point per (direction, unit-kind) pair; the fan-out adapter
/// selects among them by [`UnitKind`](crate::orchestration::types::UnitKind).
pub trait SubPipeline<P>: Send + Sync
where
    P: Send + Sync + 'static,
{
    fn do_begin_run_async(&self, handle: CompletionHandle, principal: &Arc<P>, sync: SyncKey);

    fn do_begin_segment_async(&self, handle: CompletionHandle, principal: &Arc<P>, sync: SyncKey);

    fn do_end_run_async(
        &self,
        handle: CompletionHandle,
        principal: &Arc<P>,
        sync: SyncKey,
        cleaning_up_after_failure: bool,
    );

    fn do_end_segment_async(
        &self,
        handle: CompletionHandle,
        principal: &Arc<P>,
        sync: SyncKey,
        cleaning_up_after_failure: bool,
    );
}
