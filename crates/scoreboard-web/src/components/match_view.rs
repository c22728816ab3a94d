//! `/match/{id}`: live score, court drawing and point buttons.

use std::time::Duration;

use dioxus::prelude::*;
use scoreboard_core::error::FlowError;
use scoreboard_core::i18n::LanguageContext;
use scoreboard_core::layout::{LayoutMode, court_layout};
use scoreboard_core::model::{Match, TeamSide};
use scoreboard_core::store::MatchStore;

use crate::app::{AppServices, Route, use_services};
use crate::components::court_view::CourtView;

const SOURCE: &str = "match-view";
const REFRESH: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
enum MatchLoad {
    Loading,
    Ready(Box<Match>),
    Missing,
    Failed,
}

async fn fetch_match(services: &AppServices, id: &str) -> MatchLoad {
    match services.store.get_match(id).await {
        Ok(Some(m)) => MatchLoad::Ready(Box::new(m)),
        Ok(None) => {
            FlowError::NotFound(format!("match {id}")).report(
                &*services.logger,
                SOURCE,
                &format!("match {id} does not exist"),
            );
            MatchLoad::Missing
        }
        Err(e) => {
            FlowError::from(e).report(&*services.logger, SOURCE, &format!("failed to load match {id}"));
            MatchLoad::Failed
        }
    }
}

#[component]
pub fn MatchView(id: String) -> Element {
    rsx! { MatchPanel { key: "{id}", id } }
}

#[component]
fn MatchPanel(id: String) -> Element {
    let (services, lang) = use_services();
    let mut state = use_signal(|| MatchLoad::Loading);
    let mut layout = use_signal(LayoutMode::default);
    let mut point_failed = use_signal(|| false);
    let mut busy = use_signal(|| false);

    // Poll while the page is mounted.
    use_future({
        let services = services.clone();
        let id = id.clone();
        move || {
            let services = services.clone();
            let id = id.clone();
            async move {
                loop {
                    let loaded = fetch_match(&services, &id).await;
                    // Keep showing the last good copy through a failed refresh.
                    if !(loaded == MatchLoad::Failed && matches!(*state.peek(), MatchLoad::Ready(_))) {
                        state.set(loaded);
                    }
                    gloo_timers::future::sleep(REFRESH).await;
                }
            }
        }
    });

    let award = use_callback({
        let id = id.clone();
        move |team: TeamSide| {
            if busy() {
                return;
            }
            busy.set(true);
            point_failed.set(false);
            let services = services.clone();
            let id = id.clone();
            spawn(async move {
                match services.store.remote().award_point(&id, team).await {
                    Ok(m) => {
                        services.store.remember(&m).await;
                        state.set(MatchLoad::Ready(Box::new(m)));
                    }
                    Err(e) => {
                        FlowError::from(e).report(
                            &*services.logger,
                            SOURCE,
                            &format!("failed to award point in match {id}"),
                        );
                        point_failed.set(true);
                    }
                }
                busy.set(false);
            });
        }
    });

    let t = lang();
    let body = match &*state.read() {
        MatchLoad::Loading => rsx! { p { class: "muted", {t.t("common.loading")} } },
        MatchLoad::Missing => rsx! {
            div { class: "notice warning",
                p { {t.t("match.not_found")} }
                Link { class: "btn", to: Route::JoinMatch {}, {t.t("nav.join")} }
            }
        },
        MatchLoad::Failed => rsx! { p { class: "notice error", {t.t("match.error")} } },
        MatchLoad::Ready(m) => rsx! {
            MatchDetails {
                m: (**m).clone(),
                t,
                mode: layout(),
                busy: busy(),
                on_point: move |team| award.call(team),
                on_toggle: move |_| {
                    let next = layout().toggled();
                    layout.set(next);
                },
            }
        },
    };

    rsx! {
        section { class: "page",
            {body}
            if point_failed() {
                p { class: "notice error", {t.t("match.error")} }
            }
        }
    }
}

#[component]
fn MatchDetails(
    m: Match,
    t: LanguageContext,
    mode: LayoutMode,
    busy: bool,
    on_point: EventHandler<TeamSide>,
    on_toggle: EventHandler<()>,
) -> Element {
    let game = m.score.current_game.to_string();
    let open = !m.is_finished() && m.score.winner.is_none();
    let status = match m.score.winner {
        Some(team) => format!("{}: {}", t.t("match.winner"), m.team(team).display_name()),
        None if m.is_finished() => t.t("match.finished"),
        None => t.t("match.in_progress"),
    };
    let serving = m.serving_player().map(|p| p.name.clone()).unwrap_or_default();
    let serving_label = t.t("match.serving");
    let point_label = t.t("match.point");
    let (team_a, team_b) = (m.team_a.display_name(), m.team_b.display_name());

    rsx! {
        header { class: "match-header",
            h1 { "{team_a} vs {team_b}" }
            p { class: "muted", {t.t_with("match.code", &[("code", &m.id)])} }
            p { class: "status", "{status}" }
        }
        div { class: "scoreline",
            span { {t.t_with("match.game", &[("game", &game)])} }
            for (i, g) in m.score.completed_games.iter().enumerate() {
                span { key: "{i}", class: "game-result", "{g.team_a}-{g.team_b}" }
            }
        }
        CourtView { layout: court_layout(&m, mode), serving_label: serving_label.clone() }
        if open {
            p { class: "muted", "{serving_label}: {serving}" }
            div { class: "point-buttons",
                button {
                    class: "btn primary",
                    disabled: busy,
                    onclick: move |_| on_point.call(TeamSide::TeamA),
                    "{point_label} {team_a}"
                }
                button {
                    class: "btn primary",
                    disabled: busy,
                    onclick: move |_| on_point.call(TeamSide::TeamB),
                    "{point_label} {team_b}"
                }
            }
        }
        div { class: "actions",
            button { class: "btn", onclick: move |_| on_toggle.call(()), {t.t(mode.toggled().label_key())} }
            if let Some(court) = m.court_number {
                Link {
                    class: "btn",
                    to: Route::CourtFinishPage { number: court.to_string() },
                    {t.t("court.finish")}
                }
            }
        }
    }
}
