//! `/court-status/{number}`: is a match in progress on this court?

use dioxus::prelude::*;
use scoreboard_core::flows::FlowContext;
use scoreboard_core::flows::court_status::{CourtStatus, resolve_param};

use crate::app::{Route, use_services};

#[component]
pub fn CourtStatusPage(number: String) -> Element {
    // Keyed so a new court number remounts the panel and re-runs the lookup.
    rsx! { CourtStatusPanel { key: "{number}", number } }
}

#[component]
fn CourtStatusPanel(number: String) -> Element {
    let (services, lang) = use_services();
    let court = number.clone();
    let mut status = use_resource(move || {
        let services = services.clone();
        let court = court.clone();
        async move {
            let lang = lang();
            let ctx = FlowContext::new(&*services.store, &*services.logger, &lang);
            resolve_param(&ctx, &court).await
        }
    });

    let t = lang();
    let title = t.t_with("court.title", &[("court", &number)]);
    let body = match &*status.read() {
        None | Some(CourtStatus::Checking) => rsx! {
            p { class: "muted", {t.t("court.checking")} }
        },
        Some(CourtStatus::Error(message)) => rsx! {
            div { class: "notice error",
                p { "{message}" }
                button { class: "btn", onclick: move |_| status.restart(), {t.t("common.retry")} }
            }
        },
        Some(CourtStatus::Free) => rsx! {
            div { class: "notice success",
                p { {t.t_with("court.free", &[("court", &number)])} }
                Link {
                    class: "btn primary",
                    to: Route::NewMatchPage { court: number.clone() },
                    {t.t("court.start_match")}
                }
            }
        },
        Some(CourtStatus::Occupied(m)) => rsx! {
            div { class: "notice warning",
                p { {t.t_with("court.occupied", &[("court", &number)])} }
                p { class: "teams",
                    {format!("{} vs {}", m.team_a.display_name(), m.team_b.display_name())}
                }
                div { class: "actions",
                    Link { class: "btn primary", to: Route::MatchView { id: m.id.clone() }, {t.t("court.go_to_match")} }
                    Link { class: "btn", to: Route::CourtFinishPage { number: number.clone() }, {t.t("court.finish")} }
                }
            }
        },
    };

    rsx! {
        section { class: "page",
            h1 { "{title}" }
            {body}
        }
    }
}
