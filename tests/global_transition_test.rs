//! Integration tests for the global-transition orchestrator.
//!
//! The recording doubles complete on spawned worker tasks, so every test
//! exercises the real cross-thread path: primary stage on one task,
//! fan-out continuation on whichever worker releases last.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use conductor_core::concurrency::{AmbientContext, AmbientToken, CompletionHandle, Continuation};
use conductor_core::orchestration::{
    begin_global_transition_async, end_global_transition_async, Pipeline, SyncKey, TransitionKind,
    UnitKind,
};

use common::{
    conditions, observed_caller, principal, sub_set, RecordingPipeline, RecordingSubPipeline,
};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn zero_sub_pipelines_primary_success_notifies_once() {
    let pipeline = RecordingPipeline::succeeding();
    let (caller, rx) = observed_caller();

    begin_global_transition_async(
        caller,
        &(pipeline.clone() as Arc<dyn Pipeline<common::TestPrincipal>>),
        &principal(),
        SyncKey::for_run(1),
        &conditions(),
        &sub_set(&[]),
        UnitKind::Run,
    );

    let outcome = rx.await.expect("continuation fired");
    assert!(outcome.is_none());
    assert_eq!(pipeline.invocations.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn all_sub_pipelines_succeed_reports_success() {
    let pipeline = RecordingPipeline::succeeding();
    let subs = [
        RecordingSubPipeline::succeeding(),
        RecordingSubPipeline::succeeding(),
        RecordingSubPipeline::succeeding(),
    ];
    let (caller, rx) = observed_caller();
    let p = principal();
    let sync = SyncKey::for_run(p.run);

    begin_global_transition_async(
        caller,
        &(pipeline as Arc<dyn Pipeline<common::TestPrincipal>>),
        &p,
        sync,
        &conditions(),
        &sub_set(&subs),
        UnitKind::Run,
    );

    let outcome = rx.await.expect("continuation fired");
    assert!(outcome.is_none());
    for sub in &subs {
        let calls = sub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].entry_point, "do_begin_run_async");
        assert_eq!(calls[0].sync, sync);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn single_sub_pipeline_failure_reaches_the_caller() {
    let pipeline = RecordingPipeline::succeeding();
    let subs = [
        RecordingSubPipeline::failing("E1"),
        RecordingSubPipeline::succeeding(),
    ];
    let (caller, rx) = observed_caller();

    begin_global_transition_async(
        caller,
        &(pipeline as Arc<dyn Pipeline<common::TestPrincipal>>),
        &principal(),
        SyncKey::for_segment(42, 3),
        &conditions(),
        &sub_set(&subs),
        UnitKind::Segment,
    );

    let outcome = rx.await.expect("continuation fired");
    assert_eq!(outcome.expect("failure reported").message(), "E1");
    assert_eq!(subs[0].calls()[0].entry_point, "do_begin_segment_async");
    assert_eq!(subs[1].call_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn primary_failure_wins_over_sub_pipeline_failure() {
    let pipeline = RecordingPipeline::failing("E0");
    let subs = [RecordingSubPipeline::failing("E1")];
    let completed = Arc::clone(&subs[0].completed);

    // Observe how many sub-pipelines had completed at the moment the
    // caller's continuation fired.
    let (tx, rx) = tokio::sync::oneshot::channel();
    let caller = CompletionHandle::new(Continuation::new(move |outcome| {
        let _ = tx.send((outcome, completed.load(Ordering::SeqCst)));
    }));

    end_global_transition_async(
        caller,
        &(pipeline as Arc<dyn Pipeline<common::TestPrincipal>>),
        &principal(),
        SyncKey::for_run(42),
        &conditions(),
        &sub_set(&subs),
        UnitKind::Run,
        false,
    );

    let (outcome, completed_before_fire) = rx.await.expect("continuation fired");
    assert_eq!(outcome.expect("failure reported").message(), "E0");
    // The sub-pipeline ran to completion before the caller heard anything.
    assert_eq!(completed_before_fire, 1);
    assert_eq!(subs[0].call_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn primary_failure_with_no_sub_pipelines_reports_primary() {
    let pipeline = RecordingPipeline::failing("E0");
    let (caller, rx) = observed_caller();

    end_global_transition_async(
        caller,
        &(pipeline as Arc<dyn Pipeline<common::TestPrincipal>>),
        &principal(),
        SyncKey::for_run(7),
        &conditions(),
        &sub_set(&[]),
        UnitKind::Run,
        false,
    );

    let outcome = rx.await.expect("continuation fired");
    assert_eq!(outcome.expect("failure reported").message(), "E0");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cleanup_mode_flag_propagates_to_every_sub_pipeline() {
    let pipeline = RecordingPipeline::succeeding();
    let subs = [
        RecordingSubPipeline::succeeding(),
        RecordingSubPipeline::succeeding(),
    ];
    let (caller, rx) = observed_caller();

    end_global_transition_async(
        caller,
        &(pipeline.clone() as Arc<dyn Pipeline<common::TestPrincipal>>),
        &principal(),
        SyncKey::for_segment(42, 9),
        &conditions(),
        &sub_set(&subs),
        UnitKind::Segment,
        true,
    );

    let outcome = rx.await.expect("continuation fired");
    assert!(outcome.is_none());
    assert_eq!(
        *pipeline.seen.lock().unwrap(),
        vec![(TransitionKind::EndSegment, true)]
    );
    for sub in &subs {
        let calls = sub.calls();
        assert_eq!(calls[0].entry_point, "do_end_segment_async");
        assert_eq!(calls[0].cleaning_up_after_failure, Some(true));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn caller_continuation_fires_exactly_once() {
    let pipeline = RecordingPipeline::failing("E0");
    let subs = [
        RecordingSubPipeline::failing("E1"),
        RecordingSubPipeline::succeeding(),
    ];
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_in = Arc::clone(&fired);
    let (tx, rx) = tokio::sync::oneshot::channel();
    let caller = CompletionHandle::new(Continuation::new(move |_| {
        fired_in.fetch_add(1, Ordering::SeqCst);
        let _ = tx.send(());
    }));

    begin_global_transition_async(
        caller,
        &(pipeline as Arc<dyn Pipeline<common::TestPrincipal>>),
        &principal(),
        SyncKey::for_run(1),
        &conditions(),
        &sub_set(&subs),
        UnitKind::Run,
    );

    rx.await.expect("continuation fired");
    // Give any erroneous second invocation a chance to land.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ambient_context_reaches_fan_out_bodies_on_worker_threads() {
    let pipeline = RecordingPipeline::succeeding();
    let subs = [RecordingSubPipeline::succeeding()];
    let (caller, rx) = observed_caller();

    let token = AmbientToken::of(AmbientContext::new().with_binding("process", "reco"));
    token.with_installed(|| {
        begin_global_transition_async(
            caller,
            &(pipeline as Arc<dyn Pipeline<common::TestPrincipal>>),
            &principal(),
            SyncKey::for_run(5),
            &conditions(),
            &sub_set(&subs),
            UnitKind::Run,
        );
    });

    let outcome = rx.await.expect("continuation fired");
    assert!(outcome.is_none());
    // The fan-out body ran on a worker thread with no context of its own;
    // it must have observed the call-site snapshot.
    assert_eq!(subs[0].calls()[0].ambient_process, Some("reco".to_string()));
}
