//! `/history`: every match, newest first.

use dioxus::prelude::*;
use scoreboard_core::flows::FlowContext;
use scoreboard_core::flows::history::load_history;
use scoreboard_core::i18n::LanguageContext;
use scoreboard_core::model::{MatchStatus, MatchSummary, TeamSide};

use crate::app::{Route, use_services};

#[component]
pub fn History() -> Element {
    let (services, lang) = use_services();
    let mut history = use_resource(move || {
        let services = services.clone();
        async move {
            let lang = lang();
            let ctx = FlowContext::new(&*services.store, &*services.logger, &lang);
            load_history(&ctx).await
        }
    });

    let t = lang();
    let body = match &*history.read() {
        None => rsx! { p { class: "muted", {t.t("common.loading")} } },
        Some(Err(message)) => rsx! {
            div { class: "notice error",
                p { "{message}" }
                button { class: "btn", onclick: move |_| history.restart(), {t.t("common.retry")} }
            }
        },
        Some(Ok(matches)) if matches.is_empty() => rsx! {
            p { class: "muted", {t.t("history.empty")} }
        },
        Some(Ok(matches)) => rsx! {
            ul { class: "history",
                for m in matches.iter() {
                    HistoryRow { key: "{m.id}", summary: m.clone() }
                }
            }
        },
    };

    rsx! {
        section { class: "page",
            h1 { {t.t("history.title")} }
            {body}
        }
    }
}

#[component]
fn HistoryRow(summary: MatchSummary) -> Element {
    let t = use_context::<Signal<LanguageContext>>()();
    let games = summary
        .games
        .iter()
        .map(|g| format!("{}-{}", g.team_a, g.team_b))
        .collect::<Vec<_>>()
        .join(", ");
    let status = match (summary.winner, summary.status) {
        (Some(TeamSide::TeamA), _) => format!("{}: {}", t.t("match.winner"), summary.team_a),
        (Some(TeamSide::TeamB), _) => format!("{}: {}", t.t("match.winner"), summary.team_b),
        (None, MatchStatus::Finished) => t.t("match.finished"),
        (None, MatchStatus::InProgress) => t.t("match.in_progress"),
    };
    let when = summary.created_at.format("%Y-%m-%d %H:%M").to_string();
    let court = summary
        .court_number
        .map(|c| t.t_with("court.title", &[("court", &c.to_string())]))
        .unwrap_or_default();

    rsx! {
        li { class: "history-row",
            Link { to: Route::MatchView { id: summary.id.clone() },
                span { class: "when", "{when}" }
                span { class: "court-label", "{court}" }
                span { class: "teams", "{summary.team_a} vs {summary.team_b}" }
                span { class: "games", "{games}" }
                span { class: "status", "{status}" }
            }
        }
    }
}
