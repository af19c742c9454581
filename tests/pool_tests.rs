//! Worker pool dispatch, failure isolation and cancellation

mod common;

use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::watch;

use audiofetch::domain::model::{ClipRequest, OutputSpec};
use audiofetch::error::ManifestError;
use audiofetch::manifest::ManifestReader;
use audiofetch::pool::WorkerPool;
use audiofetch::report::Reporter;

use common::{stub_pipeline, StubInspector, StubResolver, StubTranscoder};

fn requests_for(ids: &[&str]) -> Vec<Result<ClipRequest, ManifestError>> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| Ok(ClipRequest::new(*id, i as f64).unwrap()))
        .collect()
}

fn parse_error() -> ManifestError {
    ManifestError::Parse {
        path: "test.csv".into(),
        line: 3,
        reason: "invalid start time".to_string(),
    }
}

#[tokio::test]
async fn one_failing_job_never_stops_the_batch() {
    let out = TempDir::new().unwrap();
    let spec = OutputSpec::default();
    let resolver = Arc::new(StubResolver::new(600.0).failing_for("bad"));
    let pipeline = Arc::new(stub_pipeline(
        Arc::clone(&resolver),
        Arc::new(StubTranscoder::ok()),
        Arc::new(StubInspector::matching(&spec, 10.0)),
    ));
    let reporter = Arc::new(Reporter::new());
    let pool = WorkerPool::new(pipeline, Arc::clone(&reporter), 4);

    let (_tx, rx) = watch::channel(false);
    let result = pool
        .run(requests_for(&["a", "b", "bad", "c", "d"]), out.path(), rx)
        .await
        .unwrap();

    assert!(!result.cancelled);
    assert_eq!(result.summary.succeeded, 4);
    assert_eq!(result.summary.failed, 1);
    assert_eq!(result.summary.skipped, 0);
    assert_eq!(resolver.calls(), 5);
}

#[tokio::test]
async fn duplicate_rows_skip_instead_of_overwriting() {
    let out = TempDir::new().unwrap();
    let spec = OutputSpec::default();
    let transcoder = Arc::new(StubTranscoder::ok());
    let pipeline = Arc::new(stub_pipeline(
        Arc::new(StubResolver::new(600.0)),
        Arc::clone(&transcoder),
        Arc::new(StubInspector::matching(&spec, 10.0)),
    ));
    let reporter = Arc::new(Reporter::new());
    // Single worker makes the duplicate deterministic: the second job
    // observes the first one's output
    let pool = WorkerPool::new(pipeline, Arc::clone(&reporter), 1);

    let duplicate = ClipRequest::new("abc123", 5.0).unwrap();
    let requests = vec![Ok(duplicate.clone()), Ok(duplicate)];
    let (_tx, rx) = watch::channel(false);
    let result = pool.run(requests, out.path(), rx).await.unwrap();

    assert_eq!(result.summary.succeeded, 1);
    assert_eq!(result.summary.skipped, 1);
    assert_eq!(transcoder.calls(), 1);
}

#[tokio::test]
async fn manifest_error_stops_dispatch_and_propagates_after_drain() {
    let out = TempDir::new().unwrap();
    let spec = OutputSpec::default();
    let resolver = Arc::new(StubResolver::new(600.0));
    let pipeline = Arc::new(stub_pipeline(
        Arc::clone(&resolver),
        Arc::new(StubTranscoder::ok()),
        Arc::new(StubInspector::matching(&spec, 10.0)),
    ));
    let reporter = Arc::new(Reporter::new());
    let pool = WorkerPool::new(pipeline, Arc::clone(&reporter), 2);

    let requests = vec![
        Ok(ClipRequest::new("a", 0.0).unwrap()),
        Err(parse_error()),
        Ok(ClipRequest::new("b", 1.0).unwrap()),
    ];
    let (_tx, rx) = watch::channel(false);
    let err = pool.run(requests, out.path(), rx).await.unwrap_err();

    assert!(matches!(err, ManifestError::Parse { line: 3, .. }));
    // The job dispatched before the bad row still ran; the one after it
    // was never dispatched
    assert_eq!(reporter.summary().succeeded, 1);
    assert_eq!(resolver.calls(), 1);
}

#[tokio::test]
async fn manifest_rows_flow_through_the_pool() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("train.csv");
    std::fs::write(
        &manifest,
        "audiocap_id,youtube_id,start_time,caption\n\
         #note,this row is a comment,0\n\
         1,vidA,5.0,a dog barks\n\
         2,vidB,20.0,rain on a roof\n",
    )
    .unwrap();

    let out = TempDir::new().unwrap();
    let spec = OutputSpec::default();
    let pipeline = Arc::new(stub_pipeline(
        Arc::new(StubResolver::new(600.0)),
        Arc::new(StubTranscoder::ok()),
        Arc::new(StubInspector::matching(&spec, 10.0)),
    ));
    let reporter = Arc::new(Reporter::new());
    let pool = WorkerPool::new(pipeline, Arc::clone(&reporter), 2);

    let (_tx, rx) = watch::channel(false);
    let result = pool
        .run(ManifestReader::open(&manifest).unwrap(), out.path(), rx)
        .await
        .unwrap();

    assert_eq!(result.summary.succeeded, 2);
    assert!(out.path().join("vidA_5000_15000.wav").exists());
    assert!(out.path().join("vidB_20000_30000.wav").exists());
}

#[tokio::test]
async fn cancellation_before_dispatch_runs_nothing() {
    let out = TempDir::new().unwrap();
    let spec = OutputSpec::default();
    let resolver = Arc::new(StubResolver::new(600.0));
    let pipeline = Arc::new(stub_pipeline(
        Arc::clone(&resolver),
        Arc::new(StubTranscoder::ok()),
        Arc::new(StubInspector::matching(&spec, 10.0)),
    ));
    let reporter = Arc::new(Reporter::new());
    let pool = WorkerPool::new(pipeline, Arc::clone(&reporter), 4);

    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();

    let result = pool
        .run(requests_for(&["a", "b", "c"]), out.path(), rx)
        .await
        .unwrap();

    assert!(result.cancelled);
    assert_eq!(result.summary.total(), 0);
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn completed_work_is_reported_when_cancelled_mid_batch() {
    let out = TempDir::new().unwrap();
    let spec = OutputSpec::default();
    let pipeline = Arc::new(stub_pipeline(
        Arc::new(StubResolver::new(600.0)),
        Arc::new(StubTranscoder::ok()),
        Arc::new(StubInspector::matching(&spec, 10.0)),
    ));
    let reporter = Arc::new(Reporter::new());
    let pool = WorkerPool::new(pipeline, Arc::clone(&reporter), 1);

    let (tx, rx) = watch::channel(false);
    // Cancel after the first item is handed out: the iterator side effect
    // fires between dispatches
    let requests = (0..10).map(move |i| {
        if i == 2 {
            tx.send(true).unwrap();
        }
        Ok(ClipRequest::new(format!("vid{i}"), i as f64).unwrap())
    });

    let result = pool.run(requests, out.path(), rx).await.unwrap();

    assert!(result.cancelled);
    // Everything dispatched before the signal was observed still drained
    // and was reported
    assert_eq!(result.summary.failed, 0);
    assert_eq!(result.summary.skipped, 0);
    assert!(result.summary.succeeded < 10);
}
