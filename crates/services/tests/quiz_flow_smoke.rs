use std::path::PathBuf;

use quiz_core::filter::{available_questions, progress};
use quiz_core::model::{CommitMode, QuestionId, SelectionDraft};
use quiz_core::time::fixed_clock;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{DatasetSource, QuizLoopService, QuizSession};
use storage::repository::Storage;

#[tokio::test]
async fn quiz_flow_from_first_run_to_reload() {
    let storage = Storage::in_memory();
    let source = DatasetSource::File(PathBuf::from("no/such/questions.json"));
    let loop_svc = QuizLoopService::new(&storage, source, fixed_clock());

    // No file and no saved settings: fallback questions, first run.
    let bootstrap = loop_svc.bootstrap().await.unwrap();
    assert!(bootstrap.is_first_run());
    assert_eq!(bootstrap.dataset.total_questions(), 7);

    let mut draft = SelectionDraft::new();
    draft.genres = vec!["数学".to_owned()];
    draft.range.start = Some(1);
    draft.range.end = Some(10);
    let mut selection = loop_svc
        .commit_settings(&bootstrap.dataset, CommitMode::FirstRun, draft)
        .await
        .unwrap();
    assert_eq!(
        selection.subgenres_for("数学"),
        Some(["幾何".to_owned(), "基礎".to_owned()].as_slice())
    );

    let available = available_questions(&bootstrap.dataset, &selection);
    let ids: Vec<u64> = available.iter().map(|q| q.id.value()).collect();
    assert_eq!(ids, vec![6, 7]);

    let mut session = QuizSession::new(available);
    let mut rng = StdRng::seed_from_u64(21);
    let first = session.advance(&mut rng).unwrap().id;
    assert!(session.reveal());
    let second = session.advance(&mut rng).unwrap().id;
    assert_ne!(first, second);

    // Mastering a question shrinks the pool without touching the screen.
    let shown = session.current().unwrap().id;
    let mastered = loop_svc
        .toggle_mastered(&mut selection, QuestionId::new(6))
        .await
        .unwrap();
    assert!(mastered);
    session.refresh_available(available_questions(&bootstrap.dataset, &selection));
    assert_eq!(session.remaining(), 1);
    assert_eq!(session.current().unwrap().id, shown);

    let stats = progress(&bootstrap.dataset, &selection);
    assert_eq!(stats.total_in_range, 2);
    assert_eq!(stats.mastered_in_range, 1);
    assert_eq!(stats.remaining, 1);

    // A fresh bootstrap sees exactly what was persisted.
    let reloaded = loop_svc.bootstrap().await.unwrap();
    assert!(!reloaded.is_first_run());
    assert_eq!(reloaded.selection.unwrap(), selection);

    let cleared = loop_svc
        .reset_genre_mastered(&bootstrap.dataset, &mut selection)
        .await
        .unwrap();
    assert_eq!(cleared, 1);
    assert!(!selection.is_mastered(QuestionId::new(6)));
}

#[tokio::test]
async fn update_commit_drops_subgenres_of_dropped_genres() {
    let storage = Storage::in_memory();
    let source = DatasetSource::File(PathBuf::from("no/such/questions.json"));
    let loop_svc = QuizLoopService::new(&storage, source, fixed_clock());
    let bootstrap = loop_svc.bootstrap().await.unwrap();

    let mut draft = SelectionDraft::new();
    draft.genres = vec!["数学".to_owned(), "英単語".to_owned()];
    let selection = loop_svc
        .commit_settings(&bootstrap.dataset, CommitMode::FirstRun, draft)
        .await
        .unwrap();

    // Drop 英単語; its subgenre entry must not survive the commit.
    let mut draft = SelectionDraft::from_selection(&selection);
    draft.genres = vec!["数学".to_owned()];
    let updated = loop_svc
        .commit_settings(&bootstrap.dataset, CommitMode::Update, draft)
        .await
        .unwrap();

    assert!(updated.subgenres_for("英単語").is_none());
    assert_eq!(
        updated.subgenres_for("数学"),
        Some(["幾何".to_owned(), "基礎".to_owned()].as_slice())
    );

    let reloaded = loop_svc.bootstrap().await.unwrap();
    assert_eq!(reloaded.selection.unwrap(), updated);
}
