//! # Orchestration Types
//!
//! Shared vocabulary for global transitions: direction, processing-unit
//! kind, the closed set of transition variants, the synchronization key
//! that accompanies every transition, and the externally owned conditions
//! context handed to the primary pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Direction of a global transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Begin,
    End,
}

/// Kind of processing unit being transitioned.
///
/// A run is the outer unit; a segment is the lumi-like sub-interval nested
/// inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Run,
    Segment,
}

/// The closed set of global transitions.
///
/// Selecting the wrong variant for a given unit kind is a caller
/// programming error; correctness relies on this enum being exhaustive,
/// not on runtime validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    BeginRun,
    BeginSegment,
    EndRun,
    EndSegment,
}

impl TransitionKind {
    /// Compose a transition from its direction and unit kind.
    pub fn new(direction: Direction, unit: UnitKind) -> Self {
        match (direction, unit) {
            (Direction::Begin, UnitKind::Run) => Self::BeginRun,
            (Direction::Begin, UnitKind::Segment) => Self::BeginSegment,
            (Direction::End, UnitKind::Run) => Self::EndRun,
            (Direction::End, UnitKind::Segment) => Self::EndSegment,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::BeginRun | Self::BeginSegment => Direction::Begin,
            Self::EndRun | Self::EndSegment => Direction::End,
        }
    }

    pub fn unit(&self) -> UnitKind {
        match self {
            Self::BeginRun | Self::EndRun => UnitKind::Run,
            Self::BeginSegment | Self::EndSegment => UnitKind::Segment,
        }
    }

    /// String representation for logging and event payloads.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BeginRun => "begin_run",
            Self::BeginSegment => "begin_segment",
            Self::EndRun => "end_run",
            Self::EndSegment => "end_segment",
        }
    }
}

/// Ordering/validity key accompanying a transition.
///
/// Immutable and passed by value; collaborators use it to resolve
/// time/validity-dependent conditions. Ordered lexicographically by
/// (run, segment).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct SyncKey {
    pub run: u64,
    pub segment: u64,
}

impl SyncKey {
    /// Key for a run-level transition.
    pub fn for_run(run: u64) -> Self {
        Self { run, segment: 0 }
    }

    /// Key for a segment-level transition within a run.
    pub fn for_segment(run: u64, segment: u64) -> Self {
        Self { run, segment }
    }
}

/// Read-only conditions data applicable to a transition.
///
/// Owned externally and shared by reference; its lifetime outstrips any
/// single transition. The orchestrator never looks inside — the payload is
/// for pipeline code.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConditionsContext {
    /// Human-readable label of the conditions source.
    pub source: String,
    /// Opaque conditions payload for pipeline stages.
    pub data: Value,
}

impl ConditionsContext {
    pub fn new(source: impl Into<String>, data: Value) -> Self {
        Self {
            source: source.into(),
            data,
        }
    }
}
