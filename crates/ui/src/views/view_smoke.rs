use std::sync::Arc;

use quiz_core::model::{CommitMode, QuestionId, QuestionRange, SelectionDraft};
use quiz_core::time::fixed_now;
use storage::repository::{SettingsRecord, SettingsRepository, Storage, StorageError};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_storage};

/// Persists a 数学 selection over ids 1..=10 with the given mastered ids, the
/// way a previous app run would have left it.
async fn save_math_selection(storage: &Storage, mastered: &[u64]) {
    let mut draft = SelectionDraft::new();
    draft.genres = vec!["数学".to_owned()];
    draft.subgenres.insert(
        "数学".to_owned(),
        vec!["幾何".to_owned(), "基礎".to_owned()],
    );
    draft.range = QuestionRange::new(Some(1), Some(10));
    let mut selection = draft
        .validate(CommitMode::Update)
        .expect("validate selection");
    for id in mastered {
        selection.toggle_mastered(QuestionId::new(*id));
    }
    let record = SettingsRecord::from_selection(&selection, fixed_now());
    storage
        .settings
        .save_settings(&record)
        .await
        .expect("save settings");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_first_run_renders_setup_panel() {
    let mut harness = setup_view_harness(ViewKind::Quiz);
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Choose your genres"),
        "missing setup title in {html}"
    );
    assert!(html.contains("英単語"), "missing genre row in {html}");
    assert!(html.contains("Start"), "missing start button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_with_saved_selection_renders_question_card() {
    let mut harness = setup_view_harness(ViewKind::Quiz);
    save_math_selection(&harness.storage, &[]).await;
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("0 mastered of 2 in range"),
        "missing progress line in {html}"
    );
    assert!(html.contains("数学"), "missing genre tag in {html}");
    assert!(html.contains("Show Answer"), "missing reveal button in {html}");
    assert!(html.contains("Next"), "missing next button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_renders_completion_when_scope_is_mastered() {
    let mut harness = setup_view_harness(ViewKind::Quiz);
    save_math_selection(&harness.storage, &[6, 7]).await;
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("All done"), "missing completion block in {html}");
    assert!(
        html.contains("2 mastered of 2 in range"),
        "missing progress line in {html}"
    );
    assert!(
        html.contains("Open Settings"),
        "missing settings button in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn settings_view_first_run_renders_checklist_without_mastery() {
    let mut harness = setup_view_harness(ViewKind::Settings);
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Genres"), "missing genre section in {html}");
    assert!(html.contains("日本史"), "missing genre row in {html}");
    assert!(
        html.contains("Select all") && html.contains("Select none"),
        "missing genre helpers in {html}"
    );
    assert!(
        html.contains("Question range"),
        "missing range section in {html}"
    );
    assert!(
        html.contains("Mastery appears here once the quiz has been started."),
        "missing mastery hint in {html}"
    );
    assert!(
        html.contains("Save and return"),
        "missing save button in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn settings_view_renders_mastery_stats_for_saved_selection() {
    let mut harness = setup_view_harness(ViewKind::Settings);
    save_math_selection(&harness.storage, &[6]).await;
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("1 question(s) mastered in total."),
        "missing mastery total in {html}"
    );
    assert!(html.contains("1 / 2"), "missing 数学 stats row in {html}");
    assert!(
        html.contains("Reset all mastery"),
        "missing reset button in {html}"
    );
    // the saved genre is expanded, so its subgenres are visible
    assert!(html.contains("幾何"), "missing subgenre row in {html}");
}

struct FailingSettingsStore;

#[async_trait::async_trait]
impl SettingsRepository for FailingSettingsStore {
    async fn load_settings(&self) -> Result<Option<SettingsRecord>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn save_settings(&self, _record: &SettingsRecord) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_renders_error_state_when_store_fails() {
    let storage = Storage {
        settings: Arc::new(FailingSettingsStore),
    };
    let mut harness = setup_view_harness_with_storage(ViewKind::Quiz, storage);
    harness.settle().await;

    let html = harness.render();
    assert!(
        html.contains("Something went wrong"),
        "missing error in {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
}
