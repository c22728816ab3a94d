//! Drawn court: two halves with points, games and the serving player.

use dioxus::prelude::*;
use scoreboard_core::layout::{CourtHalf, CourtLayout};

#[component]
pub fn CourtView(layout: CourtLayout, serving_label: String) -> Element {
    rsx! {
        div { class: "court",
            CourtHalfView { half: layout.left, serving_label: serving_label.clone() }
            div { class: "net" }
            CourtHalfView { half: layout.right, serving_label }
        }
    }
}

#[component]
fn CourtHalfView(half: CourtHalf, serving_label: String) -> Element {
    rsx! {
        div { class: "court-half",
            div { class: "games", "{half.games}" }
            div { class: "points", "{half.points}" }
            ul { class: "players",
                for (i, p) in half.players.iter().enumerate() {
                    li { key: "{i}", class: if p.serving { "serving" },
                        "{p.name}"
                        if p.serving {
                            span { class: "shuttle", title: "{serving_label}", "●" }
                        }
                    }
                }
            }
        }
    }
}
