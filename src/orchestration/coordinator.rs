//! # Transition Coordinator
//!
//! Convenience layer over the global-transition entry points. The
//! coordinator owns the primary pipeline, the sub-pipeline collection, an
//! event publisher, and configuration; each call gets a correlation id,
//! structured logs, and `TransitionStarted` / `TransitionCompleted`
//! lifecycle events. It adds no transition semantics of its own — outcome
//! precedence and completion accounting live in
//! [`global_transition`](crate::orchestration::global_transition).

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::concurrency::{CompletionHandle, Continuation};
use crate::config::ConductorConfig;
use crate::events::{EventPublisher, TransitionEvent, TransitionOutcome};
use crate::logging::log_transition_operation;
use crate::orchestration::global_transition::{
    begin_global_transition_async, end_global_transition_async, SubPipelines,
};
use crate::orchestration::pipeline::Pipeline;
use crate::orchestration::types::{
    ConditionsContext, Direction, SyncKey, TransitionKind, UnitKind,
};

/// Coordinates global transitions for one pipeline hierarchy.
pub struct GlobalTransitionCoordinator<P>
where
    P: Send + Sync + 'static,
{
    pipeline: Arc<dyn Pipeline<P>>,
    sub_pipelines: SubPipelines<P>,
    events: EventPublisher,
    config: ConductorConfig,
}

impl<P> GlobalTransitionCoordinator<P>
where
    P: Send + Sync + 'static,
{
    /// Create a coordinator with default configuration
    pub fn new(pipeline: Arc<dyn Pipeline<P>>, sub_pipelines: SubPipelines<P>) -> Self {
        Self::with_config(pipeline, sub_pipelines, ConductorConfig::default())
    }

    /// Create a coordinator with custom configuration
    pub fn with_config(
        pipeline: Arc<dyn Pipeline<P>>,
        sub_pipelines: SubPipelines<P>,
        config: ConductorConfig,
    ) -> Self {
        let events = EventPublisher::new(config.event_channel_capacity);
        Self {
            pipeline,
            sub_pipelines,
            events,
            config,
        }
    }

    /// The publisher carrying this coordinator's lifecycle events.
    pub fn events(&self) -> &EventPublisher {
        &self.events
    }

    pub fn sub_pipeline_count(&self) -> usize {
        self.sub_pipelines.len()
    }

    /// Begin a global transition for `unit`.
    ///
    /// Returns immediately; `caller` fires exactly once when the whole
    /// hierarchy has completed.
    pub fn begin_async(
        &self,
        caller: CompletionHandle,
        principal: &Arc<P>,
        sync: SyncKey,
        conditions: &Arc<ConditionsContext>,
        unit: UnitKind,
    ) {
        self.run(
            caller,
            principal,
            sync,
            conditions,
            TransitionKind::new(Direction::Begin, unit),
            false,
        );
    }

    /// End a global transition for `unit`, optionally in cleanup mode.
    pub fn end_async(
        &self,
        caller: CompletionHandle,
        principal: &Arc<P>,
        sync: SyncKey,
        conditions: &Arc<ConditionsContext>,
        unit: UnitKind,
        cleaning_up_after_failure: bool,
    ) {
        self.run(
            caller,
            principal,
            sync,
            conditions,
            TransitionKind::new(Direction::End, unit),
            cleaning_up_after_failure,
        );
    }

    fn run(
        &self,
        caller: CompletionHandle,
        principal: &Arc<P>,
        sync: SyncKey,
        conditions: &Arc<ConditionsContext>,
        transition: TransitionKind,
        cleaning_up_after_failure: bool,
    ) {
        let transition_id = Uuid::new_v4();

        info!(
            transition_id = %transition_id,
            transition = transition.event_type(),
            run = sync.run,
            segment = sync.segment,
            sub_pipelines = self.sub_pipelines.len(),
            cleaning_up_after_failure,
            "🚦 TRANSITION: scheduling global transition"
        );

        if let Err(error) = self.events.publish(TransitionEvent::TransitionStarted {
            transition_id,
            transition,
            sync,
            sub_pipelines: self.sub_pipelines.len(),
            started_at: Utc::now(),
        }) {
            warn!(transition_id = %transition_id, error = %error, "failed to publish start event");
        }

        // Interpose on the caller's handle so completion can be observed
        // without disturbing the outcome that reaches the caller.
        let events = self.events.clone();
        let telemetry_enabled = self.config.telemetry_enabled;
        let observed = CompletionHandle::new(Continuation::new(move |outcome| {
            let reported = TransitionOutcome::from_failure(outcome.as_ref());
            if telemetry_enabled {
                log_transition_operation(
                    "global_transition",
                    transition_id,
                    transition.event_type(),
                    sync,
                    if reported.is_success() { "completed" } else { "failed" },
                    outcome.as_ref().map(|f| f.message()).as_deref(),
                );
            }
            if let Err(error) = events.publish(TransitionEvent::TransitionCompleted {
                transition_id,
                transition,
                sync,
                outcome: reported,
                completed_at: Utc::now(),
            }) {
                warn!(transition_id = %transition_id, error = %error, "failed to publish completion event");
            }
            match outcome {
                Some(failure) => caller.release_with(failure),
                None => caller.release(),
            }
        }));

        match transition.direction() {
            Direction::Begin => begin_global_transition_async(
                observed,
                &self.pipeline,
                principal,
                sync,
                conditions,
                &self.sub_pipelines,
                transition.unit(),
            ),
            Direction::End => end_global_transition_async(
                observed,
                &self.pipeline,
                principal,
                sync,
                conditions,
                &self.sub_pipelines,
                transition.unit(),
                cleaning_up_after_failure,
            ),
        }
    }
}
