//! Landing page: one tile per court.

use dioxus::prelude::*;
use scoreboard_core::i18n::LanguageContext;
use scoreboard_core::model::CourtNumber;

use crate::app::Route;

#[component]
pub fn Home() -> Element {
    let t = use_context::<Signal<LanguageContext>>()();

    rsx! {
        section { class: "page",
            div { class: "court-grid",
                for court in CourtNumber::all() {
                    Link {
                        key: "{court}",
                        class: "court-tile",
                        to: Route::CourtStatusPage { number: court.to_string() },
                        {t.t_with("court.title", &[("court", &court.to_string())])}
                    }
                }
            }
            div { class: "actions",
                Link { class: "btn primary", to: Route::JoinMatch {}, {t.t("nav.join")} }
                Link { class: "btn", to: Route::NewMatchPage { court: String::new() }, {t.t("nav.new_match")} }
            }
        }
    }
}
