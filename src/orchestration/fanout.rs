//! Sub-pipeline fan-out adapter.
//!
//! Thin dispatch from (direction, unit kind) onto the matching
//! [`SubPipeline`] entry point. Exhaustiveness of [`UnitKind`] is the whole
//! contract; there is nothing to validate at runtime.

use std::sync::Arc;

use crate::concurrency::CompletionHandle;
use crate::orchestration::pipeline::SubPipeline;
use crate::orchestration::types::{SyncKey, UnitKind};

/// Dispatch a begin transition to one sub-pipeline.
pub fn sub_pipeline_do_global_begin_async<P>(
    sub_pipeline: &dyn SubPipeline<P>,
    unit: UnitKind,
    handle: CompletionHandle,
    principal: &Arc<P>,
    sync: SyncKey,
) where
    P: Send + Sync + 'static,
{
    match unit {
        UnitKind::Run => sub_pipeline.do_begin_run_async(handle, principal, sync),
        UnitKind::Segment => sub_pipeline.do_begin_segment_async(handle, principal, sync),
    }
}

/// Dispatch an end transition to one sub-pipeline.
pub fn sub_pipeline_do_global_end_async<P>(
    sub_pipeline: &dyn SubPipeline<P>,
    unit: UnitKind,
    handle: CompletionHandle,
    principal: &Arc<P>,
    sync: SyncKey,
    cleaning_up_after_failure: bool,
) where
    P: Send + Sync + 'static,
{
    match unit {
        UnitKind::Run => {
            sub_pipeline.do_end_run_async(handle, principal, sync, cleaning_up_after_failure)
        }
        UnitKind::Segment => {
            sub_pipeline.do_end_segment_async(handle, principal, sync, cleaning_up_after_failure)
        }
    }
}
