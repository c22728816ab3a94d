//! `/fullscreen-scoreboard/{number}`: big-screen view of a court.
//!
//! `?layout=players` keeps team A on the left; the default mirrors the
//! physical ends.

use std::time::Duration;

use dioxus::prelude::*;
use scoreboard_core::flows::FlowContext;
use scoreboard_core::flows::court_status::{CourtStatus, resolve_param};
use scoreboard_core::layout::{LayoutMode, court_layout};

use crate::app::use_services;
use crate::components::court_view::CourtView;
use crate::platform;

const REFRESH: Duration = Duration::from_secs(3);

#[component]
pub fn FullscreenScoreboard(number: String) -> Element {
    rsx! { ScoreboardPanel { key: "{number}", number } }
}

#[component]
fn ScoreboardPanel(number: String) -> Element {
    let (services, lang) = use_services();
    let mode = use_hook(|| LayoutMode::from_query(platform::query_param("layout").as_deref()));
    let mut status = use_signal(|| CourtStatus::Checking);

    use_future({
        let number = number.clone();
        move || {
            let services = services.clone();
            let court = number.clone();
            async move {
                loop {
                    let lang = *lang.peek();
                    let ctx = FlowContext::new(&*services.store, &*services.logger, &lang);
                    let next = resolve_param(&ctx, &court).await;
                    status.set(next);
                    gloo_timers::future::sleep(REFRESH).await;
                }
            }
        }
    });

    let t = lang();
    let body = match &*status.read() {
        CourtStatus::Checking => rsx! { p { class: "muted", {t.t("common.loading")} } },
        CourtStatus::Error(message) => rsx! { p { class: "notice error", "{message}" } },
        CourtStatus::Free => rsx! {
            p { class: "idle", {t.t_with("scoreboard.no_match", &[("court", &number)])} }
        },
        CourtStatus::Occupied(m) => {
            let game = m.score.current_game.to_string();
            rsx! {
                div { class: "board-header",
                    span { {t.t_with("court.title", &[("court", &number)])} }
                    span { {t.t_with("match.game", &[("game", &game)])} }
                }
                CourtView { layout: court_layout(m, mode), serving_label: t.t("match.serving") }
            }
        }
    };

    rsx! {
        div { class: "fullscreen", {body} }
    }
}
