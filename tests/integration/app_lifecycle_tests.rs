/*!
 * Integration tests for the full application lifecycle.
 *
 * Source file in, session, auto-translation through the mock provider,
 * exports out.
 */

use std::sync::Arc;

use i18n_contrib::app_config::Config;
use i18n_contrib::app_controller::Controller;
use i18n_contrib::export::{parse_csv, ExportFormat};
use i18n_contrib::file_utils::FileManager;
use i18n_contrib::language_utils::resolve_target_language;
use i18n_contrib::providers::mock::MockProvider;
use i18n_contrib::translation::{AutoTranslator, BatchTranslator};

use crate::common::{self, pairs};

fn german_controller() -> Controller {
    common::init_test_logger();
    let mut config = Config::default();
    config.target_language = "de".to_string();
    Controller::with_config(config).unwrap()
}

#[test]
fn test_startSession_shouldLoadSourceInFileOrder() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_source_file(dir.path()).unwrap();

    let session = german_controller().start_session(&source, None).unwrap();

    assert_eq!(session.language_code(), "de");
    assert_eq!(session.language_name(), "German");
    assert_eq!(session.entries().len(), 6);
    assert_eq!(session.entries()[0].key, "nav.dashboard");
    assert_eq!(session.entries()[5].english, "Printing \"{name}\"");
    assert_eq!(session.categories(), vec!["button", "nav", "printer"]);
}

#[test]
fn test_startSession_withExistingTranslation_shouldPrefillAsManual() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_source_file(dir.path()).unwrap();
    let existing = common::create_test_file(
        dir.path(),
        "de.json",
        r#"{ "button.save": "Speichern", "removed.key": "Weg" }"#,
    )
    .unwrap();

    let session = german_controller().start_session(&source, Some(&existing)).unwrap();

    let stats = session.stats();
    assert_eq!(stats.translated, 1);
    assert_eq!(stats.manual(), 1);
    assert!(session.entry("removed.key").is_none());
}

#[test]
fn test_startSession_withInvalidSource_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_test_file(dir.path(), "en.json", r#"["not", "an", "object"]"#).unwrap();

    assert!(german_controller().start_session(&source, None).is_err());
    assert!(german_controller().start_session(&dir.path().join("missing.json"), None).is_err());
}

#[tokio::test]
async fn test_fullWorkflow_shouldTranslateAndExportBothFormats() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_source_file(dir.path()).unwrap();
    let out_dir = dir.path().join("out");
    let controller = german_controller();
    let mut session = controller.start_session(&source, None).unwrap();
    session.update_entry("button.save", "Speichern", false).unwrap();

    let mock = MockProvider::working();
    let pipeline = AutoTranslator::new(BatchTranslator::new(Arc::new(mock.clone()), 10).unwrap());
    let summary = controller.auto_translate_with(&pipeline, &mut session).await.unwrap();

    assert_eq!(summary.submitted, 5);
    assert_eq!(mock.batch_sizes(), vec![5]);

    let paths = controller
        .export(&session, &out_dir, &[ExportFormat::Json, ExportFormat::Csv])
        .unwrap();
    assert_eq!(paths, vec![out_dir.join("de.json"), out_dir.join("de.csv")]);

    let json = FileManager::read_string_map(&paths[0]).unwrap();
    assert_eq!(json.len(), 6);
    assert_eq!(json[2], ("button.save".to_string(), "Speichern".to_string()));
    assert_eq!(json[0], ("nav.dashboard".to_string(), "[de] Dashboard".to_string()));

    let csv = parse_csv(&FileManager::read_to_string(&paths[1]).unwrap()).unwrap();
    assert_eq!(csv, json);
    assert!(csv.contains(&(
        "printer.status.printing".to_string(),
        "[de] Printing \"{name}\"".to_string()
    )));
}

#[tokio::test]
async fn test_autoTranslate_withFailingProvider_shouldReportFailureAndKeepSession() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_source_file(dir.path()).unwrap();
    let controller = german_controller();
    let mut session = controller.start_session(&source, None).unwrap();

    let pipeline = AutoTranslator::new(BatchTranslator::new(Arc::new(MockProvider::failing()), 10).unwrap());
    let error = controller.auto_translate_with(&pipeline, &mut session).await.unwrap_err();

    assert!(error.to_string().contains("Translation failed"));
    assert_eq!(session.stats().translated, 0);
    assert_eq!(pipeline.state(), i18n_contrib::PipelineState::Idle);
}

#[test]
fn test_export_withNothingTranslated_shouldWriteEmptyFiles() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_source_file(dir.path()).unwrap();
    let controller = german_controller();
    let session = controller.start_session(&source, None).unwrap();

    let paths = controller.export(&session, dir.path(), &[ExportFormat::Json, ExportFormat::Csv]).unwrap();

    assert_eq!(FileManager::read_to_string(&paths[0]).unwrap(), "{}");
    assert_eq!(FileManager::read_to_string(&paths[1]).unwrap(), "Key,Translation");
    assert_eq!(session.export_data(), pairs(&[]));
}

#[test]
fn test_startSession_withCustomLanguage_shouldUseResolvedCodeAndName() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_source_file(dir.path()).unwrap();
    let (code, name) = resolve_target_language("XX", Some("My Lang")).unwrap();
    let mut config = Config::default();
    config.target_language = code;
    config.language_name = name;

    let controller = Controller::with_config(config).unwrap();
    let session = controller.start_session(&source, None).unwrap();

    assert_eq!(session.language_code(), "xx");
    assert_eq!(session.language_name(), "My Lang");
    assert_eq!(session.pending_submission().len(), 6);
}

#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.translation.active_provider_config_mut().batch_size = 0;
    assert!(Controller::with_config(config).is_err());
}

#[test]
fn test_newForTest_shouldBeInitialized() {
    let controller = Controller::new_for_test().unwrap();
    assert!(controller.is_initialized());
    assert!(controller.credential_known());
}

#[test]
fn test_checkConnection_withUnreachableEndpoint_shouldFail() {
    let mut config = Config::default();
    config.target_language = "de".to_string();
    let provider_config = config.translation.active_provider_config_mut();
    provider_config.endpoint = "http://127.0.0.1:9".to_string();
    provider_config.timeout_secs = 1;
    let controller = Controller::with_config(config).unwrap();

    let result = tokio_test::block_on(controller.check_connection());

    assert!(result.is_err());
}
