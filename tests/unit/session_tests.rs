/*!
 * Tests for session entries, the result merge and statistics
 */

use i18n_contrib::errors::TranslationError;
use i18n_contrib::session::{EntryFilter, StatusFilter, TranslationSession};

use crate::common::{numbered_session, pairs};

fn sample_session() -> TranslationSession {
    TranslationSession::start(
        "de",
        "German",
        pairs(&[
            ("nav.home", "Home"),
            ("nav.settings", "Settings"),
            ("button.save", "Save"),
            ("button.cancel", "Cancel"),
        ]),
    )
}

#[test]
fn test_merge_shouldMatchResultsByPosition() {
    let mut session = sample_session();
    session.update_entry("nav.settings", "Einstellungen", false).unwrap();
    let submission = session.pending_submission();
    assert_eq!(submission.keys, vec!["nav.home", "button.save", "button.cancel"]);

    let results = vec!["Startseite".to_string(), String::new(), "Abbrechen".to_string()];
    let merged = session.merge(&submission, &results).unwrap();

    assert_eq!(merged, 2);
    assert_eq!(session.entry("nav.home").unwrap().translated, "Startseite");
    assert!(session.entry("button.save").unwrap().is_pending());
    assert_eq!(session.entry("button.cancel").unwrap().translated, "Abbrechen");
    let settings = session.entry("nav.settings").unwrap();
    assert_eq!(settings.translated, "Einstellungen");
    assert!(!settings.is_auto);
}

#[test]
fn test_merge_twice_shouldGiveSameState() {
    let mut session = numbered_session("fr", 5);
    let submission = session.pending_submission();
    let results: Vec<String> = (0..5).map(|i| if i % 2 == 0 { format!("Chaîne {}", i) } else { String::new() }).collect();

    session.merge(&submission, &results).unwrap();
    let once = session.entries().to_vec();
    session.merge(&submission, &results).unwrap();

    assert_eq!(session.entries(), once.as_slice());
    assert_eq!(session.stats().auto, 3);
}

#[test]
fn test_merge_withTooManyResults_shouldFail() {
    let mut session = sample_session();
    let submission = session.pending_submission();
    let results = vec!["x".to_string(); 5];

    assert!(matches!(
        session.merge(&submission, &results),
        Err(TranslationError::ResultCountMismatch { expected: 4, actual: 5 })
    ));
    assert_eq!(session.stats().translated, 0);
}

#[test]
fn test_manualEdit_afterAutoTranslation_shouldClearAutoFlag() {
    let mut session = sample_session();
    let submission = session.pending_submission();
    session.merge(&submission, &vec!["Auto".to_string(); 4]).unwrap();

    session.update_entry("button.save", "Speichern", false).unwrap();

    let stats = session.stats();
    assert_eq!(stats.translated, 4);
    assert_eq!(stats.auto, 3);
    assert_eq!(stats.manual(), 1);
}

#[test]
fn test_clearingTranslation_shouldMakeEntryPendingAgain() {
    let mut session = sample_session();
    session.update_entry("button.save", "Speichern", false).unwrap();
    session.update_entry("button.save", "", false).unwrap();

    assert!(session.entry("button.save").unwrap().is_pending());
    assert_eq!(session.pending_submission().len(), 4);
}

#[test]
fn test_stats_shouldReportRoundedPercentage() {
    let mut session = numbered_session("ja", 3);
    session.update_entry("gen.s0", "文字列 0", false).unwrap();

    let stats = session.stats();
    assert_eq!(stats.percentage(), 33);
    assert_eq!(stats.pending(), 2);
}

#[test]
fn test_filter_shouldSelectByStatusAndCategory() {
    let mut session = sample_session();
    let submission = session.pending_submission();
    let results = vec!["Startseite".to_string(), String::new(), String::new(), String::new()];
    session.merge(&submission, &results).unwrap();
    session.update_entry("button.save", "Speichern", false).unwrap();

    let auto = EntryFilter { status: StatusFilter::Auto, ..EntryFilter::default() };
    let keys: Vec<&str> = session.filter(&auto).map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["nav.home"]);

    let pending_buttons = EntryFilter {
        category: Some("button".to_string()),
        status: StatusFilter::Pending,
        ..EntryFilter::default()
    };
    let keys: Vec<&str> = session.filter(&pending_buttons).map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["button.cancel"]);

    let all_categories = EntryFilter { category: Some("all".to_string()), ..EntryFilter::default() };
    assert_eq!(session.filter(&all_categories).count(), 4);
}

#[test]
fn test_exportData_shouldKeepSourceOrder() {
    let mut session = sample_session();
    session.update_entry("button.cancel", "Abbrechen", false).unwrap();
    session.update_entry("nav.home", "Startseite", true).unwrap();

    assert_eq!(
        session.export_data(),
        pairs(&[("nav.home", "Startseite"), ("button.cancel", "Abbrechen")])
    );
    assert_eq!(session.categories(), vec!["button", "nav"]);
}
