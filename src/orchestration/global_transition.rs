//! Global-transition orchestration.
//!
//! Drives one lifecycle transition (begin or end) across the primary
//! pipeline and every registered sub-pipeline using non-blocking
//! continuations. The entry points return immediately after scheduling the
//! primary stage; the caller's completion handle fires exactly once, after
//! the primary stage and every dispatched sub-pipeline have released.
//!
//! Failure precedence: a primary-stage failure always reaches the caller,
//! even when sub-pipelines fail too (their outcomes are logged and
//! discarded). When the primary stage succeeds, the caller sees the first
//! sub-pipeline failure, if any.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::concurrency::{AmbientToken, CompletionHandle, Continuation};
use crate::orchestration::fanout::{
    sub_pipeline_do_global_begin_async, sub_pipeline_do_global_end_async,
};
use crate::orchestration::pipeline::{Pipeline, SubPipeline};
use crate::orchestration::types::{
    ConditionsContext, Direction, SyncKey, TransitionKind, UnitKind,
};

/// Ordered collection of sub-pipelines sharing one transition.
///
/// Order is irrelevant to correctness: fan-out is unordered and concurrent,
/// but iteration visits every element exactly once.
pub type SubPipelines<P> = Arc<[Arc<dyn SubPipeline<P>>]>;

/// Begin a global transition for the given unit kind.
///
/// `caller` fires once the primary pipeline and all sub-pipelines have
/// completed, carrying the primary failure if the primary stage failed,
/// otherwise the first sub-pipeline failure, otherwise success.
pub fn begin_global_transition_async<P>(
    caller: CompletionHandle,
    pipeline: &Arc<dyn Pipeline<P>>,
    principal: &Arc<P>,
    sync: SyncKey,
    conditions: &Arc<ConditionsContext>,
    sub_pipelines: &SubPipelines<P>,
    unit: UnitKind,
) where
    P: Send + Sync + 'static,
{
    let transition = TransitionKind::new(Direction::Begin, unit);
    run_global_transition_async(
        caller,
        pipeline,
        principal,
        sync,
        conditions,
        sub_pipelines,
        transition,
        false,
    );
}

/// End a global transition for the given unit kind.
///
/// With `cleaning_up_after_failure` set, the transition is happening during
/// error unwind; collaborators still attempt cleanup-oriented completion
/// and the flag is propagated unchanged to every sub-pipeline.
pub fn end_global_transition_async<P>(
    caller: CompletionHandle,
    pipeline: &Arc<dyn Pipeline<P>>,
    principal: &Arc<P>,
    sync: SyncKey,
    conditions: &Arc<ConditionsContext>,
    sub_pipelines: &SubPipelines<P>,
    unit: UnitKind,
    cleaning_up_after_failure: bool,
) where
    P: Send + Sync + 'static,
{
    let transition = TransitionKind::new(Direction::End, unit);
    run_global_transition_async(
        caller,
        pipeline,
        principal,
        sync,
        conditions,
        sub_pipelines,
        transition,
        cleaning_up_after_failure,
    );
}

/// Shared shape of both entry points; only the transition variant and the
/// cleanup flag differ.
#[allow(clippy::too_many_arguments)]
fn run_global_transition_async<P>(
    caller: CompletionHandle,
    pipeline: &Arc<dyn Pipeline<P>>,
    principal: &Arc<P>,
    sync: SyncKey,
    conditions: &Arc<ConditionsContext>,
    sub_pipelines: &SubPipelines<P>,
    transition: TransitionKind,
    cleaning_up_after_failure: bool,
) where
    P: Send + Sync + 'static,
{
    let token = AmbientToken::capture();
    let subs = Arc::clone(sub_pipelines);
    let principal_for_subs = Arc::clone(principal);

    debug!(
        transition = transition.event_type(),
        run = sync.run,
        segment = sync.segment,
        sub_pipelines = subs.len(),
        cleaning_up_after_failure,
        "scheduling primary stage"
    );

    // Once the global stage for this process completes, replay the same
    // transition across every sub-pipeline. Which completion handle the
    // fan-out uses depends on whether the primary stage failed.
    let subs_continuation =
        Continuation::with_token(token.clone(), move |primary_outcome| match primary_outcome {
            Some(primary_failure) => {
                debug!(
                    transition = transition.event_type(),
                    run = sync.run,
                    segment = sync.segment,
                    error = %primary_failure,
                    "primary stage failed; sub-pipelines still dispatched"
                );
                // The barrier holds the caller's release until every
                // sub-pipeline has finished; whatever they report is
                // discarded in favor of the primary failure.
                let delay_error = Continuation::with_token(token, move |discarded| {
                    if let Some(sub_failure) = discarded {
                        warn!(
                            transition = transition.event_type(),
                            run = sync.run,
                            segment = sync.segment,
                            error = %sub_failure,
                            "discarding sub-pipeline failure; primary failure takes precedence"
                        );
                    }
                    caller.release_with(primary_failure);
                });
                let barrier = CompletionHandle::new(delay_error);
                for sub_pipeline in subs.iter() {
                    dispatch(
                        sub_pipeline.as_ref(),
                        transition,
                        barrier.clone(),
                        &principal_for_subs,
                        sync,
                        cleaning_up_after_failure,
                    );
                }
            }
            None => {
                // Each sub-pipeline feeds the caller's own pending count
                // directly; the caller fires once all of them (and this
                // continuation's copy) have released.
                for sub_pipeline in subs.iter() {
                    dispatch(
                        sub_pipeline.as_ref(),
                        transition,
                        caller.clone(),
                        &principal_for_subs,
                        sync,
                        cleaning_up_after_failure,
                    );
                }
            }
        });

    let handle = CompletionHandle::new(subs_continuation);
    pipeline.process_global_async(
        transition,
        handle,
        principal,
        conditions,
        cleaning_up_after_failure,
    );
}

fn dispatch<P>(
    sub_pipeline: &dyn SubPipeline<P>,
    transition: TransitionKind,
    handle: CompletionHandle,
    principal: &Arc<P>,
    sync: SyncKey,
    cleaning_up_after_failure: bool,
) where
    P: Send + Sync + 'static,
{
    match transition.direction() {
        Direction::Begin => sub_pipeline_do_global_begin_async(
            sub_pipeline,
            transition.unit(),
            handle,
            principal,
            sync,
        ),
        Direction::End => sub_pipeline_do_global_end_async(
            sub_pipeline,
            transition.unit(),
            handle,
            principal,
            sync,
            cleaning_up_after_failure,
        ),
    }
}
