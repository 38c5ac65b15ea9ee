//! Transition lifecycle event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Failure;
use crate::orchestration::types::{SyncKey, TransitionKind};

/// Terminal outcome of a global transition, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionOutcome {
    Succeeded,
    Failed { message: String },
}

impl TransitionOutcome {
    /// Build an outcome from the payload delivered to a continuation.
    pub fn from_failure(failure: Option<&Failure>) -> Self {
        match failure {
            Some(failure) => Self::Failed {
                message: failure.message(),
            },
            None => Self::Succeeded,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Lifecycle events published by the transition coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TransitionEvent {
    /// A global transition was scheduled on the primary pipeline
    TransitionStarted {
        transition_id: Uuid,
        transition: TransitionKind,
        sync: SyncKey,
        sub_pipelines: usize,
        started_at: DateTime<Utc>,
    },
    /// The caller's continuation fired with the final outcome
    TransitionCompleted {
        transition_id: Uuid,
        transition: TransitionKind,
        sync: SyncKey,
        outcome: TransitionOutcome,
        completed_at: DateTime<Utc>,
    },
}

impl TransitionEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TransitionStarted { .. } => "transition_started",
            Self::TransitionCompleted { .. } => "transition_completed",
        }
    }

    /// Correlation id shared by all events of one coordinator call.
    pub fn transition_id(&self) -> Uuid {
        match self {
            Self::TransitionStarted { transition_id, .. }
            | Self::TransitionCompleted { transition_id, .. } => *transition_id,
        }
    }
}
