//! `/court-finish/{number}`: finish the match on a court.
//!
//! The finish runs once on mount; retrying runs it again. There is no
//! automatic navigation afterwards.

use dioxus::prelude::*;
use scoreboard_core::flows::FlowContext;
use scoreboard_core::flows::court_finish::finish;

use crate::app::{Route, use_services};

#[component]
pub fn CourtFinishPage(number: String) -> Element {
    rsx! { CourtFinishPanel { key: "{number}", number } }
}

#[component]
fn CourtFinishPanel(number: String) -> Element {
    let (services, lang) = use_services();
    let court = number.clone();
    let mut outcome = use_resource(move || {
        let services = services.clone();
        let court = court.clone();
        async move {
            // Peek: a language switch must not finish the court again.
            let lang = *lang.peek();
            let ctx = FlowContext::new(&*services.store, &*services.logger, &lang);
            finish(&ctx, &court).await
        }
    });

    let t = lang();
    let body = match *outcome.read() {
        None => rsx! {
            p { class: "muted", {t.t("finish.working")} }
        },
        Some(true) => rsx! {
            div { class: "notice success",
                p { {t.t_with("finish.success", &[("court", &number)])} }
                Link { class: "btn", to: Route::Home {}, {t.t("common.back_home")} }
            }
        },
        Some(false) => rsx! {
            div { class: "notice error",
                p { {t.t("finish.error")} }
                p { class: "muted", {t.t("finish.retry_hint")} }
                div { class: "actions",
                    button { class: "btn", onclick: move |_| outcome.restart(), {t.t("common.retry")} }
                    Link {
                        class: "btn",
                        to: Route::CourtStatusPage { number: number.clone() },
                        {t.t_with("court.title", &[("court", &number)])}
                    }
                }
            }
        },
    };

    rsx! {
        section { class: "page",
            h1 { {t.t_with("court.title", &[("court", &number)])} }
            {body}
        }
    }
}
