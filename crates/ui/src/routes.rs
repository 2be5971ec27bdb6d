use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{QuizView, SettingsView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", QuizView)] Quiz {},
        #[route("/settings", SettingsView)] Settings {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Topbar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Topbar() -> Element {
    rsx! {
        nav { class: "topbar",
            h1 { class: "topbar-title", "Quiz" }
            ul { class: "topbar-nav",
                li { Link { to: Route::Quiz {}, "Quiz" } }
                li { Link { to: Route::Settings {}, "Settings" } }
            }
        }
    }
}
