use std::collections::BTreeMap;

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::{CommitMode, Dataset, QuestionRange, Selection, SelectionDraft};
use services::SettingsError;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
struct SettingsData {
    dataset: Dataset,
    selection: Option<Selection>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SaveState {
    Idle,
    Saving,
    Error(ViewError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ResetKind {
    SelectedGenres,
    All,
}

#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let quiz_loop = ctx.quiz_loop();

    let mut dataset = use_signal(|| None::<Dataset>);
    let mut selection = use_signal(|| None::<Selection>);
    let mut draft_genres = use_signal(Vec::<String>::new);
    let mut draft_subgenres = use_signal(BTreeMap::<String, Vec<String>>::new);
    let mut range_start = use_signal(String::new);
    let mut range_end = use_signal(String::new);
    let mut save_state = use_signal(|| SaveState::Idle);
    let mut form_notice = use_signal(|| None::<&'static str>);
    let mut reset_confirm = use_signal(|| None::<ResetKind>);
    let mut reset_notice = use_signal(|| None::<String>);
    let mut did_seed = use_signal(|| false);

    let quiz_loop_for_resource = quiz_loop.clone();
    let resource = use_resource(move || {
        let quiz_loop = quiz_loop_for_resource.clone();
        async move {
            let bootstrap = quiz_loop
                .bootstrap()
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(SettingsData {
                dataset: bootstrap.dataset,
                selection: bootstrap.selection,
            })
        }
    });
    let state = view_state_from_resource(resource);

    // Seed the form once from the persisted selection.
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
        if let Some(saved) = data.selection.clone() {
            draft_genres.set(saved.selected_genres().to_vec());
            let mut subgenres = BTreeMap::new();
            for genre in saved.selected_genres() {
                if let Some(list) = saved.subgenres_for(genre) {
                    subgenres.insert(genre.clone(), list.to_vec());
                }
            }
            draft_subgenres.set(subgenres);
            let range = saved.range();
            range_start.set(range.start.map_or_else(String::new, |v| v.to_string()));
            range_end.set(range.end.map_or_else(String::new, |v| v.to_string()));
            selection.set(Some(saved));
        }
        dataset.set(Some(data.dataset));
    });

    // Selecting a genre selects all of its subgenres; deselecting drops them.
    let on_toggle_genre = use_callback(move |genre: String| {
        let mut genres = draft_genres();
        let mut subgenres = draft_subgenres();
        if let Some(pos) = genres.iter().position(|g| g == &genre) {
            genres.remove(pos);
            subgenres.remove(&genre);
        } else {
            if let Some(dataset) = dataset() {
                let all = dataset.subgenres_of(&genre);
                if !all.is_empty() {
                    subgenres.insert(genre.clone(), all);
                }
            }
            genres.push(genre);
        }
        draft_genres.set(genres);
        draft_subgenres.set(subgenres);
        save_state.set(SaveState::Idle);
    });

    let on_toggle_subgenre = use_callback(move |(genre, subgenre): (String, String)| {
        let mut subgenres = draft_subgenres();
        let entry = subgenres.entry(genre).or_default();
        if let Some(pos) = entry.iter().position(|s| s == &subgenre) {
            entry.remove(pos);
        } else {
            entry.push(subgenre);
        }
        draft_subgenres.set(subgenres);
        save_state.set(SaveState::Idle);
    });

    let on_select_all_genres = use_callback(move |()| {
        let Some(dataset) = dataset() else { return };
        let mut subgenres = BTreeMap::new();
        for genre in dataset.genres() {
            let all = dataset.subgenres_of(genre);
            if !all.is_empty() {
                subgenres.insert(genre.clone(), all);
            }
        }
        draft_genres.set(dataset.genres().to_vec());
        draft_subgenres.set(subgenres);
        save_state.set(SaveState::Idle);
    });

    let on_clear_genres = use_callback(move |()| {
        draft_genres.set(Vec::new());
        draft_subgenres.set(BTreeMap::new());
        save_state.set(SaveState::Idle);
    });

    let on_save = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |()| {
            let quiz_loop = quiz_loop.clone();
            let navigator = navigator;
            let mut save_state = save_state;
            let mut form_notice = form_notice;
            let selection_signal = selection;
            let dataset_signal = dataset;
            let genres = draft_genres();
            let subgenres = draft_subgenres();
            let range = QuestionRange::parse(&range_start(), &range_end());
            spawn(async move {
                let Some(dataset) = dataset_signal() else { return };
                // Start from the saved selection so the commit keeps the
                // mastered set.
                let (mode, mut draft) = match selection_signal() {
                    Some(saved) => (CommitMode::Update, SelectionDraft::from_selection(&saved)),
                    None => (CommitMode::FirstRun, SelectionDraft::new()),
                };
                draft.genres = genres;
                draft.subgenres = subgenres;
                draft.range = range;
                save_state.set(SaveState::Saving);
                match quiz_loop.commit_settings(&dataset, mode, draft).await {
                    Ok(_) => {
                        let _ = navigator.push(Route::Quiz {});
                    }
                    Err(SettingsError::Selection(_)) => {
                        save_state.set(SaveState::Idle);
                        form_notice.set(Some("Select at least one genre."));
                    }
                    Err(_) => {
                        save_state.set(SaveState::Error(ViewError::Unknown));
                    }
                }
            });
        })
    };

    let on_reset_confirmed = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |kind: ResetKind| {
            let quiz_loop = quiz_loop.clone();
            let mut selection = selection;
            let mut reset_confirm = reset_confirm;
            let mut reset_notice = reset_notice;
            let dataset_signal = dataset;
            spawn(async move {
                let Some(mut current) = selection() else {
                    reset_confirm.set(None);
                    return;
                };
                let result = match kind {
                    ResetKind::SelectedGenres => {
                        let Some(dataset) = dataset_signal() else { return };
                        quiz_loop.reset_genre_mastered(&dataset, &mut current).await
                    }
                    ResetKind::All => quiz_loop.reset_all_mastered(&mut current).await,
                };
                reset_confirm.set(None);
                match result {
                    Ok(cleared) => {
                        selection.set(Some(current));
                        reset_notice.set(Some(format!("Cleared {cleared} mastered question(s).")));
                    }
                    Err(SettingsError::Selection(_)) => {
                        reset_notice
                            .set(Some("Save at least one selected genre first.".to_owned()));
                    }
                    Err(_) => {
                        reset_notice.set(Some(ViewError::Unknown.message().to_owned()));
                    }
                }
            });
        })
    };

    rsx! {
        div { class: "page settings-page",
            header { class: "view-header",
                h2 { class: "view-title", "Settings" }
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
                ViewState::Ready(_) => match dataset() {
                    None => rsx! {
                        p { "Loading..." }
                    },
                    Some(dataset_value) => {
                        let selection_value = selection();
                        let chosen_genres = draft_genres();
                        let chosen_subgenres = draft_subgenres();
                        let genre_sections = dataset_value.genres().iter().map(|genre| {
                            let genre_selected = chosen_genres.iter().any(|g| g == genre);
                            let count = dataset_value.genre_question_count(genre);
                            let genre_for_toggle = genre.clone();
                            let subgenre_rows = genre_selected
                                .then(|| {
                                    let selected_subgenres = chosen_subgenres
                                        .get(genre)
                                        .cloned()
                                        .unwrap_or_default();
                                    dataset_value
                                        .subgenres_of(genre)
                                        .into_iter()
                                        .map(|subgenre| {
                                            let checked =
                                                selected_subgenres.iter().any(|s| s == &subgenre);
                                            let sub_count = dataset_value
                                                .subgenre_question_count(genre, &subgenre);
                                            let pair = (genre.clone(), subgenre.clone());
                                            rsx! {
                                                label { class: "subgenre-option",
                                                    input {
                                                        r#type: "checkbox",
                                                        checked,
                                                        onchange: move |_| on_toggle_subgenre.call(pair.clone()),
                                                    }
                                                    span { class: "subgenre-option-name", "{subgenre}" }
                                                    span { class: "subgenre-option-count", "{sub_count}" }
                                                }
                                            }
                                        })
                                        .collect::<Vec<_>>()
                                })
                                .unwrap_or_default();
                            rsx! {
                                div { class: "genre-section",
                                    label { class: "genre-option",
                                        input {
                                            r#type: "checkbox",
                                            checked: genre_selected,
                                            onchange: move |_| on_toggle_genre.call(genre_for_toggle.clone()),
                                        }
                                        span { class: "genre-option-name", "{genre}" }
                                        span { class: "genre-option-count", "{count} questions" }
                                    }
                                    if !subgenre_rows.is_empty() {
                                        div { class: "subgenre-list",
                                            for row in subgenre_rows {
                                                {row}
                                            }
                                        }
                                    }
                                }
                            }
                        });

                        let stats = selection_value
                            .as_ref()
                            .map(|sel| dataset_value.genre_stats(sel.mastered()));
                        let mastered_total = selection_value
                            .as_ref()
                            .map_or(0, Selection::mastered_count);
                        let status_label = match save_state() {
                            SaveState::Saving => Some("Saving..."),
                            SaveState::Error(_) => Some("Couldn't save"),
                            SaveState::Idle => None,
                        };
                        let metadata_line = dataset_value.metadata().map(|meta| {
                            let version = meta.version.as_deref().unwrap_or("unknown");
                            let updated = meta.last_updated.as_deref().unwrap_or("unknown");
                            format!("Data version {version} · updated {updated}")
                        });

                        rsx! {
                            section { class: "settings-section",
                                div { class: "settings-section-head",
                                    h3 { class: "settings-section-title", "Genres" }
                                    div { class: "settings-section-tools",
                                        button {
                                            class: "btn btn-ghost",
                                            r#type: "button",
                                            onclick: move |_| on_select_all_genres.call(()),
                                            "Select all"
                                        }
                                        button {
                                            class: "btn btn-ghost",
                                            r#type: "button",
                                            onclick: move |_| on_clear_genres.call(()),
                                            "Select none"
                                        }
                                    }
                                }
                                p { class: "settings-section-hint",
                                    "Unchecking every subgenre of a genre keeps the whole genre available."
                                }
                                div { class: "genre-list", {genre_sections} }
                            }

                            section { class: "settings-section",
                                h3 { class: "settings-section-title", "Question range" }
                                p { class: "settings-section-hint", "Filter by question number. Leave blank for no limit." }
                                div { class: "range-fields",
                                    label { class: "range-field",
                                        span { "From" }
                                        input {
                                            class: "range-input",
                                            r#type: "number",
                                            min: "0",
                                            value: "{range_start()}",
                                            oninput: move |evt| {
                                                range_start.set(evt.value());
                                                save_state.set(SaveState::Idle);
                                            },
                                        }
                                    }
                                    label { class: "range-field",
                                        span { "To" }
                                        input {
                                            class: "range-input",
                                            r#type: "number",
                                            min: "0",
                                            value: "{range_end()}",
                                            oninput: move |evt| {
                                                range_end.set(evt.value());
                                                save_state.set(SaveState::Idle);
                                            },
                                        }
                                    }
                                }
                            }

                            section { class: "settings-section",
                                h3 { class: "settings-section-title", "Mastery" }
                                if let Some(stats) = stats {
                                    p { class: "settings-section-hint", "{mastered_total} question(s) mastered in total." }
                                    table { class: "mastery-table",
                                        thead {
                                            tr {
                                                th { "Genre" }
                                                th { "Mastered" }
                                            }
                                        }
                                        tbody {
                                            for stat in stats {
                                                tr {
                                                    td { "{stat.genre}" }
                                                    td { "{stat.mastered} / {stat.total}" }
                                                }
                                            }
                                        }
                                    }
                                    div { class: "mastery-actions",
                                        button {
                                            class: "btn btn-secondary",
                                            id: "settings-reset-genre",
                                            r#type: "button",
                                            onclick: move |_| reset_confirm.set(Some(ResetKind::SelectedGenres)),
                                            "Reset mastery in selected genres"
                                        }
                                        button {
                                            class: "btn btn-danger",
                                            id: "settings-reset-all",
                                            r#type: "button",
                                            onclick: move |_| reset_confirm.set(Some(ResetKind::All)),
                                            "Reset all mastery"
                                        }
                                    }
                                    if let Some(notice) = reset_notice() {
                                        p { class: "settings-notice", "{notice}" }
                                    }
                                } else {
                                    p { class: "settings-section-hint", "Mastery appears here once the quiz has been started." }
                                }
                            }

                            if let Some(notice) = form_notice() {
                                p { class: "form-error", "{notice}" }
                            }
                            div { class: "settings-actions",
                                button {
                                    class: "btn btn-primary",
                                    id: "settings-save",
                                    r#type: "button",
                                    disabled: save_state() == SaveState::Saving,
                                    onclick: move |_| on_save.call(()),
                                    "Save and return"
                                }
                                button {
                                    class: "btn btn-ghost",
                                    r#type: "button",
                                    onclick: move |_| {
                                        let _ = navigator.push(Route::Quiz {});
                                    },
                                    "Cancel"
                                }
                                if let Some(label) = status_label {
                                    span { class: "settings-status", "{label}" }
                                }
                            }
                            if let Some(line) = metadata_line {
                                p { class: "settings-metadata", "{line}" }
                            }

                            if let Some(kind) = reset_confirm() {
                                div {
                                    class: "modal-overlay",
                                    onclick: move |_| reset_confirm.set(None),
                                    div {
                                        class: "modal",
                                        onclick: move |evt| evt.stop_propagation(),
                                        h3 { class: "modal-title", "Reset mastery?" }
                                        p { class: "modal-body",
                                            match kind {
                                                ResetKind::SelectedGenres => "This clears the mastered mark on every question in the selected genres.",
                                                ResetKind::All => "This clears every mastered mark.",
                                            }
                                        }
                                        div { class: "modal-actions",
                                            button {
                                                class: "btn btn-ghost",
                                                r#type: "button",
                                                onclick: move |_| reset_confirm.set(None),
                                                "Cancel"
                                            }
                                            button {
                                                class: "btn btn-danger",
                                                r#type: "button",
                                                onclick: move |_| on_reset_confirmed.call(kind),
                                                "Reset"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
