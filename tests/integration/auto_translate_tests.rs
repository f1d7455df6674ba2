/*!
 * Integration tests for auto-translation runs.
 *
 * Runs go through the batch translator and the pipeline with the in-crate
 * mock provider, so no network access is needed.
 */

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use i18n_contrib::errors::TranslationError;
use i18n_contrib::providers::libretranslate::LibreTranslate;
use i18n_contrib::providers::mock::MockProvider;
use i18n_contrib::session::TranslationSession;
use i18n_contrib::translation::{
    AutoTranslator, BatchProgress, BatchTranslator, PipelineState, ProgressReporter, RunSummary,
};

use crate::common::{numbered_session, pairs};

fn pipeline(mock: &MockProvider, batch_size: usize) -> AutoTranslator {
    crate::common::init_test_logger();
    AutoTranslator::new(BatchTranslator::new(Arc::new(mock.clone()), batch_size).unwrap())
}

fn record_progress(progress: &ProgressReporter) -> Arc<Mutex<Vec<BatchProgress>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    progress.set_listener(move |p| sink.lock().push(p));
    seen
}

fn hallo(text: &str, _target: &str) -> String {
    if text == "Hello" { "Hallo".to_string() } else { String::new() }
}

#[tokio::test]
async fn test_run_withOnePendingEntry_shouldTranslateOnlyThatEntry() {
    let mock = MockProvider::working().with_custom_response(hallo);
    let auto = pipeline(&mock, 10);
    let mut session = TranslationSession::start("de", "German", pairs(&[("a.x", "Hello"), ("a.y", "Bye")]));
    session.update_entry("a.y", "Tschüss", false).unwrap();

    let summary = auto.run(&mut session).await.unwrap();

    assert_eq!(summary, RunSummary { submitted: 1, translated: 1, failed: 0 });
    assert_eq!(mock.request_count(), 1);
    let x = session.entry("a.x").unwrap();
    assert_eq!(x.translated, "Hallo");
    assert!(x.is_auto);
    let y = session.entry("a.y").unwrap();
    assert_eq!(y.translated, "Tschüss");
    assert!(!y.is_auto);
}

#[tokio::test]
async fn test_run_withTwentyFiveEntries_shouldSendThreeBatchesAndReportEach() {
    let mock = MockProvider::working();
    let auto = pipeline(&mock, 10);
    let seen = record_progress(auto.progress());
    let mut session = numbered_session("fr", 25);

    let summary = auto.run(&mut session).await.unwrap();

    assert_eq!(summary.translated, 25);
    assert_eq!(mock.batch_sizes(), vec![10, 10, 5]);
    assert_eq!(
        *seen.lock(),
        vec![
            BatchProgress { current: 0, total: 25 },
            BatchProgress { current: 10, total: 25 },
            BatchProgress { current: 20, total: 25 },
            BatchProgress { current: 25, total: 25 },
            BatchProgress { current: 0, total: 0 },
        ]
    );
    assert_eq!(auto.progress().snapshot(), BatchProgress::default());
}

#[tokio::test]
async fn test_run_progressAfterEachBatch_shouldBeMinOfBatchesTimesSize() {
    let mock = MockProvider::working();
    let auto = pipeline(&mock, 4);
    let seen = record_progress(auto.progress());
    let mut session = numbered_session("it", 11);

    auto.run(&mut session).await.unwrap();

    let currents: Vec<usize> = seen.lock().iter().map(|p| p.current).collect();
    assert_eq!(currents, vec![0, 4, 8, 11, 0]);
}

#[tokio::test]
async fn test_run_withOneFailingItemInBatch_shouldKeepItPending() {
    let mock = MockProvider::intermittent(10);
    let auto = pipeline(&mock, 10);
    let mut session = numbered_session("es", 10);

    let summary = auto.run(&mut session).await.unwrap();

    assert_eq!(summary, RunSummary { submitted: 10, translated: 9, failed: 1 });
    assert!(session.entry("gen.s9").unwrap().is_pending());
    assert!(session.entries()[..9].iter().all(|e| e.is_auto && !e.translated.is_empty()));
    assert_eq!(auto.state(), PipelineState::Success { translated: 9, failed: 1 });
}

#[tokio::test]
async fn test_run_withEmptyProvider_shouldLeaveEverythingPending() {
    let mock = MockProvider::empty();
    let auto = pipeline(&mock, 10);
    let mut session = numbered_session("nl", 12);

    let summary = auto.run(&mut session).await.unwrap();

    assert_eq!(summary.failed, 12);
    assert_eq!(session.stats().translated, 0);
    assert_eq!(session.pending_submission().len(), 12);
}

#[tokio::test]
async fn test_run_withProviderErrorInLaterBatch_shouldMergeNothing() {
    let mock = MockProvider::fail_after(2);
    let auto = pipeline(&mock, 10);
    let mut session = numbered_session("pl", 25);

    let result = auto.run(&mut session).await;

    assert!(matches!(result, Err(TranslationError::Provider(_))));
    assert_eq!(mock.batch_sizes(), vec![10, 10, 5]);
    assert_eq!(session.stats().translated, 0);
    assert_eq!(auto.progress().snapshot(), BatchProgress::default());
    match auto.state() {
        PipelineState::Failed { message } => assert!(message.contains("Mock")),
        other => panic!("unexpected state: {:?}", other),
    }
}

#[tokio::test]
async fn test_run_afterFailure_shouldBeRunnableAgain() {
    let failing = MockProvider::failing();
    let auto = pipeline(&failing, 10);
    let mut session = numbered_session("tr", 3);

    assert!(auto.run(&mut session).await.is_err());
    auto.finish();
    assert_eq!(auto.state(), PipelineState::Idle);

    let working = MockProvider::working();
    let retry = pipeline(&working, 10);
    let summary = retry.run(&mut session).await.unwrap();
    assert_eq!(summary.translated, 3);
}

#[tokio::test]
async fn test_secondRun_shouldOnlySubmitWhatFirstRunMissed() {
    let first = MockProvider::intermittent(2);
    let mut session = numbered_session("ko", 6);
    pipeline(&first, 10).run(&mut session).await.unwrap();
    assert_eq!(session.stats().translated, 3);

    let second = MockProvider::working();
    let summary = pipeline(&second, 10).run(&mut session).await.unwrap();

    assert_eq!(summary.submitted, 3);
    assert_eq!(second.batch_sizes(), vec![3]);
    assert_eq!(session.stats().translated, 6);
    assert_eq!(session.stats().auto, 6);
}

#[tokio::test]
async fn test_batchTranslator_shouldReturnOneResultPerInput() {
    let mock = MockProvider::intermittent(3);
    let translator = BatchTranslator::new(Arc::new(mock), 5).unwrap();
    let texts: Vec<String> = (0..13).map(|i| format!("t{}", i)).collect();

    let results = translator.translate_all(&texts, "vi", &ProgressReporter::new()).await.unwrap();

    assert_eq!(results.len(), texts.len());
    for (i, result) in results.iter().enumerate() {
        if i % 3 == 2 {
            assert!(result.is_empty());
        } else {
            assert_eq!(result, &format!("[vi] t{}", i));
        }
    }
}

#[tokio::test]
async fn test_run_overHttp_withOneServerError_shouldKeepOnlyThatEntryPending() {
    let endpoint = crate::common::spawn_libretranslate_server(Duration::from_millis(50), "String 4")
        .await
        .unwrap();
    let provider = LibreTranslate::new(endpoint, Duration::from_secs(5));
    let auto = AutoTranslator::new(BatchTranslator::new(Arc::new(provider), 10).unwrap());
    let mut session = numbered_session("de", 10);

    let summary = auto.run(&mut session).await.unwrap();

    assert_eq!(summary, RunSummary { submitted: 10, translated: 9, failed: 1 });
    assert!(session.entry("gen.s4").unwrap().is_pending());
    assert_eq!(session.entry("gen.s0").unwrap().translated, "X-String 0");
    assert_eq!(session.stats().auto, 9);
}
