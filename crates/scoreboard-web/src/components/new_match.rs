//! `/new-match`: pick players and a court, then start the match.

use dioxus::prelude::*;
use scoreboard_core::error::{FlowError, StoreError};
use scoreboard_core::logger::LogLevel;
use scoreboard_core::model::{CourtNumber, NewMatch, Player};

use crate::app::{Route, use_services};
use crate::components::player_picker::PlayerPicker;

const SOURCE: &str = "new-match";

#[component]
pub fn NewMatchPage(court: String) -> Element {
    let (services, lang) = use_services();
    let nav = navigator();
    let team_a = use_signal(Vec::<Player>::new);
    let team_b = use_signal(Vec::<Player>::new);
    let mut court_choice = use_signal(|| court.parse::<CourtNumber>().ok());
    let mut error = use_signal(|| None::<String>);
    let mut creating = use_signal(|| false);

    let roster = use_resource({
        let services = services.clone();
        move || {
            let services = services.clone();
            async move {
                match services.store.remote().list_players().await {
                    Ok(players) => players,
                    Err(e) => {
                        services.logger.log(
                            LogLevel::Warn,
                            "failed to load player roster",
                            SOURCE,
                            Some(&e.to_string()),
                        );
                        Vec::new()
                    }
                }
            }
        }
    });

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        if creating() {
            return;
        }
        let request = NewMatch {
            team_a: team_a(),
            team_b: team_b(),
            court_number: court_choice(),
            first_server: None,
        };
        creating.set(true);
        error.set(None);
        let services = services.clone();
        spawn(async move {
            match services.store.remote().create_match(&request).await {
                Ok(m) => {
                    services.store.remember(&m).await;
                    nav.push(Route::MatchView { id: m.id });
                }
                Err(e) => {
                    let t = *lang.peek();
                    let message = match (&e, request.court_number) {
                        (&StoreError::CourtOccupied(court), _)
                        | (&StoreError::Remote { status: 409, .. }, Some(court)) => {
                            t.t_with("court.occupied", &[("court", &court.to_string())])
                        }
                        _ => t.t("new_match.error"),
                    };
                    FlowError::from(e).report(&*services.logger, SOURCE, "failed to create match");
                    error.set(Some(message));
                    creating.set(false);
                }
            }
        });
    };

    let t = lang();
    let players = roster.read().clone().unwrap_or_default();
    let (a, b) = (team_a(), team_b());
    let ready = !a.is_empty() && a.len() == b.len() && !creating();

    rsx! {
        section { class: "page",
            h1 { {t.t("new_match.title")} }
            form { class: "new-match", onsubmit: onsubmit,
                div { class: "teams-grid",
                    PlayerPicker {
                        label: t.t("new_match.team_a"),
                        roster: players.clone(),
                        selected: team_a,
                        exclude: b.clone(),
                    }
                    PlayerPicker {
                        label: t.t("new_match.team_b"),
                        roster: players,
                        selected: team_b,
                        exclude: a.clone(),
                    }
                }
                label { class: "field",
                    span { {t.t("new_match.court")} }
                    select {
                        onchange: move |e| court_choice.set(e.value().parse().ok()),
                        option { value: "", selected: court_choice().is_none(), {t.t("new_match.no_court")} }
                        for c in CourtNumber::all() {
                            option {
                                key: "{c}",
                                value: "{c}",
                                selected: court_choice() == Some(c),
                                "{c}"
                            }
                        }
                    }
                }
                button { class: "btn primary", r#type: "submit", disabled: !ready,
                    {t.t("new_match.create")}
                }
            }
            if let Some(message) = error() {
                p { class: "notice error", "{message}" }
            }
        }
    }
}
