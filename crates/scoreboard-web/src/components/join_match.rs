//! `/join-match`: enter a match code and jump to the match.

use dioxus::prelude::*;
use scoreboard_core::flows::FlowContext;
use scoreboard_core::flows::join::{JoinFailure, SubmitGuard, join};

use crate::app::{Route, use_services};

#[component]
pub fn JoinMatch() -> Element {
    let (services, lang) = use_services();
    let nav = navigator();
    let guard = use_hook(SubmitGuard::default);
    let mut code = use_signal(String::new);
    let mut failure = use_signal(|| None::<JoinFailure>);
    let mut searching = use_signal(|| false);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        // A lookup is already outstanding.
        let Some(ticket) = guard.try_begin() else {
            return;
        };
        let services = services.clone();
        let entered = code();
        failure.set(None);
        searching.set(true);
        spawn(async move {
            let lang = *lang.peek();
            let ctx = FlowContext::new(&*services.store, &*services.logger, &lang);
            let result = join(&ctx, &entered).await;
            drop(ticket);
            searching.set(false);
            match result {
                Ok(id) => {
                    nav.push(Route::MatchView { id });
                }
                Err(reason) => failure.set(Some(reason)),
            }
        });
    };

    let t = lang();
    let busy = searching();

    rsx! {
        section { class: "page narrow",
            h1 { {t.t("join.title")} }
            form { class: "join-form", onsubmit: onsubmit,
                input {
                    class: "input code",
                    r#type: "text",
                    autocomplete: "off",
                    placeholder: t.t("join.placeholder"),
                    value: "{code}",
                    oninput: move |e| code.set(e.value()),
                }
                button { class: "btn primary", r#type: "submit", disabled: busy,
                    if busy { {t.t("join.searching")} } else { {t.t("join.submit")} }
                }
            }
            if let Some(reason) = failure() {
                p { class: "notice error", {t.t(reason.message_key())} }
            }
        }
    }
}
