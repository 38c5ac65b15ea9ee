//! Shared test doubles for global-transition integration tests.
#![allow(dead_code)] // not every test binary uses every helper

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use conductor_core::concurrency::{AmbientContext, CompletionHandle, Continuation};
use conductor_core::error::Failure;
use conductor_core::orchestration::{
    ConditionsContext, Pipeline, SubPipeline, SubPipelines, SyncKey, TransitionKind,
};

/// Opaque processing unit used by the tests.
pub struct TestPrincipal {
    pub run: u64,
}

/// Caller handle whose continuation reports through a oneshot channel.
pub fn observed_caller() -> (CompletionHandle, oneshot::Receiver<Option<Failure>>) {
    let (tx, rx) = oneshot::channel();
    let handle = CompletionHandle::new(Continuation::new(move |outcome| {
        let _ = tx.send(outcome);
    }));
    (handle, rx)
}

/// Primary pipeline double: records invocations, completes on a worker task.
pub struct RecordingPipeline {
    fail_with: Option<Failure>,
    pub invocations: AtomicUsize,
    pub seen: Mutex<Vec<(TransitionKind, bool)>>,
}

impl RecordingPipeline {
    pub fn succeeding() -> Arc<Self> {
        Self::build(None)
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::build(Some(Failure::msg(message)))
    }

    fn build(fail_with: Option<Failure>) -> Arc<Self> {
        Arc::new(Self {
            fail_with,
            invocations: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }
}

impl Pipeline<TestPrincipal> for RecordingPipeline {
    fn process_global_async(
        &self,
        transition: TransitionKind,
        handle: CompletionHandle,
        _principal: &Arc<TestPrincipal>,
        _conditions: &Arc<ConditionsContext>,
        cleaning_up_after_failure: bool,
    ) {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((transition, cleaning_up_after_failure));
        let fail = self.fail_with.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            match fail {
                Some(failure) => handle.release_with(failure),
                None => handle.release(),
            }
        });
    }
}

/// One recorded sub-pipeline dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct SubCall {
    pub entry_point: &'static str,
    pub sync: SyncKey,
    pub cleaning_up_after_failure: Option<bool>,
    /// Ambient "process" binding observed at dispatch time.
    pub ambient_process: Option<String>,
}

/// Sub-pipeline double: records every dispatch, completes on a worker task.
pub struct RecordingSubPipeline {
    fail_with: Option<Failure>,
    pub calls: Mutex<Vec<SubCall>>,
    pub completed: Arc<AtomicUsize>,
}

impl RecordingSubPipeline {
    pub fn succeeding() -> Arc<Self> {
        Self::build(None)
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::build(Some(Failure::msg(message)))
    }

    fn build(fail_with: Option<Failure>) -> Arc<Self> {
        Arc::new(Self {
            fail_with,
            calls: Mutex::new(Vec::new()),
            completed: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<SubCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record_and_finish(
        &self,
        entry_point: &'static str,
        sync: SyncKey,
        cleaning_up_after_failure: Option<bool>,
        handle: CompletionHandle,
    ) {
        let ambient_process =
            AmbientContext::current().and_then(|ctx| ctx.get("process").map(str::to_string));
        self.calls.lock().unwrap().push(SubCall {
            entry_point,
            sync,
            cleaning_up_after_failure,
            ambient_process,
        });
        let fail = self.fail_with.clone();
        let completed = Arc::clone(&self.completed);
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            completed.fetch_add(1, Ordering::SeqCst);
            match fail {
                Some(failure) => handle.release_with(failure),
                None => handle.release(),
            }
        });
    }
}

impl SubPipeline<TestPrincipal> for RecordingSubPipeline {
    fn do_begin_run_async(
        &self,
        handle: CompletionHandle,
        _principal: &Arc<TestPrincipal>,
        sync: SyncKey,
    ) {
        self.record_and_finish("do_begin_run_async", sync, None, handle);
    }

    fn do_begin_segment_async(
        &self,
        handle: CompletionHandle,
        _principal: &Arc<TestPrincipal>,
        sync: SyncKey,
    ) {
        self.record_and_finish("do_begin_segment_async", sync, None, handle);
    }

    fn do_end_run_async(
        &self,
        handle: CompletionHandle,
        _principal: &Arc<TestPrincipal>,
        sync: SyncKey,
        cleaning_up_after_failure: bool,
    ) {
        self.record_and_finish(
            "do_end_run_async",
            sync,
            Some(cleaning_up_after_failure),
            handle,
        );
    }

    fn do_end_segment_async(
        &self,
        handle: CompletionHandle,
        _principal: &Arc<TestPrincipal>,
        sync: SyncKey,
        cleaning_up_after_failure: bool,
    ) {
        self.record_and_finish(
            "do_end_segment_async",
            sync,
            Some(cleaning_up_after_failure),
            handle,
        );
    }
}

/// Erase recorder types into the orchestrator's sub-pipeline collection.
pub fn sub_set(subs: &[Arc<RecordingSubPipeline>]) -> SubPipelines<TestPrincipal> {
    subs.iter()
        .map(|s| Arc::clone(s) as Arc<dyn SubPipeline<TestPrincipal>>)
        .collect::<Vec<_>>()
        .into()
}

pub fn principal() -> Arc<TestPrincipal> {
    Arc::new(TestPrincipal { run: 42 })
}

pub fn conditions() -> Arc<ConditionsContext> {
    Arc::new(ConditionsContext::new(
        "test-conditions",
        serde_json::json!({"tag": "v1"}),
    ))
}
