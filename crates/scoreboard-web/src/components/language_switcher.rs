//! Language dropdown in the header.
//!
//! Switching updates the UI at once and remembers the choice on this device;
//! the global preference record is written in the background.

use dioxus::prelude::*;
use scoreboard_core::i18n::persist_preference;
use scoreboard_core::logger::LogLevel;

use crate::app::use_services;
use crate::platform;

#[component]
pub fn LanguageSwitcher() -> Element {
    let (services, mut lang) = use_services();
    let current = lang();

    let onchange = move |evt: FormEvent| {
        let mut next = lang();
        match next.set_language(&evt.value()) {
            Ok(pref) => {
                lang.set(next);
                platform::save_language(next.language());
                let services = services.clone();
                spawn(async move {
                    persist_preference(services.store.remote(), &pref, &*services.logger).await;
                });
            }
            Err(e) => services.logger.log(
                LogLevel::Warn,
                "language switch rejected",
                "language",
                Some(&e.to_string()),
            ),
        }
    };

    rsx! {
        label { class: "language",
            span { class: "sr-only", {current.t("language.label")} }
            select { onchange: onchange,
                for (code, name) in current.languages() {
                    option {
                        key: "{code}",
                        value: "{code}",
                        selected: code == current.language().code(),
                        "{name}"
                    }
                }
            }
        }
    }
}
