//! Banner shown while the server cannot be reached.

use std::rc::Rc;

use dioxus::prelude::*;
use scoreboard_core::monitor::{AvailabilityMonitor, DEFAULT_PROBE_INTERVAL};

use crate::app::use_services;

#[component]
pub fn OfflineIndicator() -> Element {
    let (services, lang) = use_services();
    let mut online = use_signal(|| true);
    let monitor = use_hook(|| Rc::new(AvailabilityMonitor::new(DEFAULT_PROBE_INTERVAL)));

    use_future({
        let monitor = Rc::clone(&monitor);
        move || {
            let task = monitor.task();
            let services = services.clone();
            async move {
                task.run(&*services.store, gloo_timers::future::sleep, move |up| {
                    online.set(up)
                })
                .await;
            }
        }
    });

    use_drop(move || monitor.stop());

    if online() {
        return rsx! {};
    }
    rsx! {
        div { class: "offline-banner", role: "status", {lang().t("common.offline")} }
    }
}
