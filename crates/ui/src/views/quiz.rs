use dioxus::prelude::*;
use dioxus_router::use_navigator;
use rand::rng;

use quiz_core::filter::{available_questions, progress};
use quiz_core::model::{CommitMode, Dataset, QuestionId, Selection, SelectionDraft};
use services::QuizSession;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::map_question_card;

#[derive(Clone, Debug, PartialEq)]
struct QuizData {
    dataset: Dataset,
    selection: Option<Selection>,
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let quiz_loop = ctx.quiz_loop();

    let mut dataset = use_signal(|| None::<Dataset>);
    let mut selection = use_signal(|| None::<Selection>);
    let mut session = use_signal(|| None::<QuizSession>);
    let mut pool_exhausted = use_signal(|| false);
    let mut error = use_signal(|| None::<ViewError>);
    let mut did_seed = use_signal(|| false);
    let mut setup_genres = use_signal(Vec::<String>::new);
    let mut setup_notice = use_signal(|| None::<&'static str>);

    let quiz_loop_for_resource = quiz_loop.clone();
    let resource = use_resource(move || {
        let quiz_loop = quiz_loop_for_resource.clone();
        async move {
            let bootstrap = quiz_loop
                .bootstrap()
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(QuizData {
                dataset: bootstrap.dataset,
                selection: bootstrap.selection,
            })
        }
    });
    let state = view_state_from_resource(resource);

    // Seed the screen once per load; a saved selection goes straight to the
    // first question.
    use_effect(move || {
        if did_seed() {
            return;
        }
        let data = resource
            .value()
            .read()
            .as_ref()
            .and_then(|value| value.as_ref().ok())
            .cloned();
        let Some(data) = data else { return };
        did_seed.set(true);
        if let Some(loaded) = data.selection.clone() {
            let mut fresh = QuizSession::new(available_questions(&data.dataset, &loaded));
            let mut rng = rng();
            pool_exhausted.set(fresh.advance(&mut rng).is_err());
            session.set(Some(fresh));
            selection.set(Some(loaded));
        }
        dataset.set(Some(data.dataset));
    });

    let on_reveal = use_callback(move |()| {
        if let Some(session) = session.write().as_mut() {
            session.reveal();
        }
    });

    let on_next = use_callback(move |()| {
        let mut rng = rng();
        if let Some(session) = session.write().as_mut() {
            pool_exhausted.set(session.advance(&mut rng).is_err());
        }
    });

    let on_toggle_mastered = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |id: QuestionId| {
            let quiz_loop = quiz_loop.clone();
            let mut selection = selection;
            let mut session = session;
            let mut error = error;
            let dataset = dataset;
            spawn(async move {
                let Some(mut current) = selection() else { return };
                match quiz_loop.toggle_mastered(&mut current, id).await {
                    Ok(_) => {
                        if let Some(dataset) = dataset() {
                            if let Some(session) = session.write().as_mut() {
                                session
                                    .refresh_available(available_questions(&dataset, &current));
                            }
                        }
                        selection.set(Some(current));
                        error.set(None);
                    }
                    Err(_) => error.set(Some(ViewError::Unknown)),
                }
            });
        })
    };

    let on_setup_toggle = use_callback(move |genre: String| {
        let mut genres = setup_genres();
        if let Some(pos) = genres.iter().position(|g| g == &genre) {
            genres.remove(pos);
        } else {
            genres.push(genre);
        }
        setup_genres.set(genres);
    });

    let on_start = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |()| {
            let genres = setup_genres();
            if genres.is_empty() {
                setup_notice.set(Some("Select at least one genre to start."));
                return;
            }
            let quiz_loop = quiz_loop.clone();
            let mut selection = selection;
            let mut session = session;
            let mut pool_exhausted = pool_exhausted;
            let mut error = error;
            let mut setup_notice = setup_notice;
            let dataset_signal = dataset;
            spawn(async move {
                let Some(dataset) = dataset_signal() else { return };
                let mut draft = SelectionDraft::new();
                draft.genres = genres;
                match quiz_loop
                    .commit_settings(&dataset, CommitMode::FirstRun, draft)
                    .await
                {
                    Ok(committed) => {
                        let mut fresh =
                            QuizSession::new(available_questions(&dataset, &committed));
                        let mut rng = rng();
                        pool_exhausted.set(fresh.advance(&mut rng).is_err());
                        session.set(Some(fresh));
                        selection.set(Some(committed));
                        setup_notice.set(None);
                        error.set(None);
                    }
                    Err(_) => error.set(Some(ViewError::Unknown)),
                }
            });
        })
    };

    rsx! {
        div { class: "page quiz-page",
            header { class: "view-header",
                h2 { class: "view-title", "Quiz" }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(_) => {
                    let dataset_value = dataset();
                    let selection_value = selection();
                    match (dataset_value, selection_value) {
                        (Some(dataset_value), Some(selection_value)) => {
                            let stats = progress(&dataset_value, &selection_value);
                            let progress_label = format!(
                                "{} mastered of {} in range · {} to go",
                                stats.mastered_in_range, stats.total_in_range, stats.remaining,
                            );
                            let session_guard = session.read();
                            let card = session_guard.as_ref().and_then(|session| {
                                session
                                    .current()
                                    .map(|question| map_question_card(question, &selection_value))
                            });
                            let answer_shown =
                                session_guard.as_ref().is_some_and(QuizSession::answer_shown);
                            drop(session_guard);
                            let exhausted = pool_exhausted();
                            rsx! {
                                if let Some(err) = error() {
                                    p { class: "view-error", "{err.message()}" }
                                }
                                div { class: "quiz-progress", "{progress_label}" }
                                if exhausted {
                                    div { class: "quiz-complete",
                                        h3 { class: "quiz-complete-title", "All done" }
                                        p { class: "quiz-complete-body",
                                            "No unmastered questions are left in the current scope. Widen the filters or reset mastery to keep going."
                                        }
                                        button {
                                            class: "btn btn-primary",
                                            r#type: "button",
                                            onclick: move |_| {
                                                let _ = navigator.push(Route::Settings {});
                                            },
                                            "Open Settings"
                                        }
                                    }
                                } else if let Some(card) = card {
                                    {
                                        let card_id = card.id;
                                        let mastered_label = if card.mastered {
                                            "Unmark mastered"
                                        } else {
                                            "Mark as mastered"
                                        };
                                        rsx! {
                                            div { class: "question-card",
                                                header { class: "question-card-header",
                                                    span { class: "question-id", "{card.id_label}" }
                                                    span { class: "question-tag", "{card.tag_label}" }
                                                    if card.mastered {
                                                        span { class: "question-mastered-badge", "Mastered" }
                                                    }
                                                }
                                                p { class: "question-prompt", "{card.prompt}" }
                                                if answer_shown {
                                                    div { class: "question-answer",
                                                        p { class: "answer-text", "{card.answer}" }
                                                        if let Some(explanation) = card.explanation.as_ref() {
                                                            p { class: "answer-explanation", "{explanation}" }
                                                        }
                                                    }
                                                } else {
                                                    button {
                                                        class: "btn btn-reveal",
                                                        id: "quiz-reveal",
                                                        r#type: "button",
                                                        onclick: move |_| on_reveal.call(()),
                                                        "Show Answer"
                                                    }
                                                }
                                                footer { class: "question-card-actions",
                                                    button {
                                                        class: "btn btn-primary",
                                                        id: "quiz-next",
                                                        r#type: "button",
                                                        onclick: move |_| on_next.call(()),
                                                        "Next"
                                                    }
                                                    button {
                                                        class: "btn btn-secondary",
                                                        id: "quiz-toggle-mastered",
                                                        r#type: "button",
                                                        onclick: move |_| on_toggle_mastered.call(card_id),
                                                        "{mastered_label}"
                                                    }
                                                }
                                            }
                                        }
                                    }
                                } else {
                                    p { "No question on screen." }
                                }
                            }
                        }
                        (Some(dataset_value), None) => {
                            let chosen = setup_genres();
                            let genre_rows = dataset_value.genres().iter().map(|genre| {
                                let count = dataset_value.genre_question_count(genre);
                                let checked = chosen.iter().any(|g| g == genre);
                                let genre_name = genre.clone();
                                rsx! {
                                    label { class: "genre-option",
                                        input {
                                            r#type: "checkbox",
                                            checked,
                                            onchange: move |_| on_setup_toggle.call(genre_name.clone()),
                                        }
                                        span { class: "genre-option-name", "{genre}" }
                                        span { class: "genre-option-count", "{count} questions" }
                                    }
                                }
                            });
                            rsx! {
                                section { class: "setup-panel",
                                    h3 { class: "setup-title", "Choose your genres" }
                                    p { class: "setup-subtitle",
                                        "Pick at least one genre to start the quiz. Every subgenre of a chosen genre starts selected; narrow them later in Settings."
                                    }
                                    div { class: "genre-list", {genre_rows} }
                                    if let Some(notice) = setup_notice() {
                                        p { class: "form-error", "{notice}" }
                                    }
                                    if let Some(err) = error() {
                                        p { class: "view-error", "{err.message()}" }
                                    }
                                    button {
                                        class: "btn btn-primary",
                                        id: "quiz-start",
                                        r#type: "button",
                                        onclick: move |_| on_start.call(()),
                                        "Start"
                                    }
                                }
                            }
                        }
                        _ => rsx! {
                            p { "Loading..." }
                        },
                    }
                }
            }
        }
    }
}
