//! Searchable player picker for one team.

use dioxus::prelude::*;
use scoreboard_core::i18n::LanguageContext;
use scoreboard_core::model::Player;
use scoreboard_core::roster::{contains_name, search_players};

#[component]
pub fn PlayerPicker(
    label: String,
    roster: Vec<Player>,
    selected: Signal<Vec<Player>>,
    #[props(default)] exclude: Vec<Player>,
    #[props(default = 2)] max: usize,
) -> Element {
    let t = use_context::<Signal<LanguageContext>>()();
    let mut selected = selected;
    let mut query = use_signal(String::new);

    let q = query();
    let picked = selected();
    let full = picked.len() >= max;
    let is_taken = |p: &Player| picked.iter().chain(&exclude).any(|other| other.id == p.id);
    let matches: Vec<Player> = search_players(&roster, &q)
        .into_iter()
        .filter(|p| !is_taken(p))
        .cloned()
        .collect();
    let new_name = q.trim().to_string();
    let can_add_new = !new_name.is_empty()
        && !contains_name(&roster, &new_name)
        && !contains_name(&picked, &new_name)
        && !contains_name(&exclude, &new_name);

    rsx! {
        fieldset { class: "picker",
            legend { "{label}" }
            ul { class: "picked",
                for (i, p) in picked.iter().enumerate() {
                    li { key: "{p.id}-{i}",
                        "{p.name}"
                        button {
                            class: "chip-remove",
                            r#type: "button",
                            onclick: move |_| {
                                selected.write().remove(i);
                            },
                            "×"
                        }
                    }
                }
            }
            if !full {
                input {
                    class: "input",
                    r#type: "search",
                    placeholder: t.t("player.search"),
                    value: "{q}",
                    oninput: move |e| query.set(e.value()),
                }
                ul { class: "suggestions",
                    {matches.into_iter().map(|p| {
                        let key = p.id.clone();
                        let name = p.name.clone();
                        rsx! {
                            li { key: "{key}",
                                button {
                                    class: "suggestion",
                                    r#type: "button",
                                    onclick: move |_| {
                                        selected.write().push(p.clone());
                                        query.set(String::new());
                                    },
                                    "{name}"
                                }
                            }
                        }
                    })}
                    if can_add_new {
                        li {
                            button {
                                class: "suggestion new",
                                r#type: "button",
                                onclick: move |_| {
                                    selected.write().push(Player::new("", new_name.clone()));
                                    query.set(String::new());
                                },
                                {t.t_with("player.add", &[("name", &q.trim().to_string())])}
                            }
                        }
                    } else if search_players(&roster, &q).is_empty() {
                        li { class: "muted", {t.t("player.none")} }
                    }
                }
            }
        }
    }
}
