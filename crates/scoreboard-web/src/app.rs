//! Root application component for the web frontend.
//!
//! Provides the shared services (match store, logger) and the language
//! context to every page, and routes between the pages. The store talks to
//! the server the page was loaded from and keeps a copy of everything it has
//! seen in `localStorage`, so read-only pages keep working while offline,
//! even after a reload.

use std::rc::Rc;
use std::sync::Arc;

use dioxus::prelude::*;
use scoreboard_client::{FallbackStore, HttpMatchStore};
use scoreboard_core::i18n::LanguageContext;
use scoreboard_core::logger::{LogLevel, Logger, TracingLogger};
use scoreboard_core::store::PreferenceStore;

use crate::components::court_finish::CourtFinishPage;
use crate::components::court_status::CourtStatusPage;
use crate::components::history::History;
use crate::components::home::Home;
use crate::components::join_match::JoinMatch;
use crate::components::language_switcher::LanguageSwitcher;
use crate::components::match_view::MatchView;
use crate::components::new_match::NewMatchPage;
use crate::components::offline_indicator::OfflineIndicator;
use crate::components::scoreboard::FullscreenScoreboard;
use crate::platform;

const MAIN_CSS: Asset = asset!(
    "/assets/main.css",
    AssetOptions::css()
        .with_preload(true)
        .with_static_head(true)
);

pub type Store = FallbackStore<HttpMatchStore>;

/// Services shared by every page.
#[derive(Clone)]
pub struct AppServices {
    pub store: Rc<Store>,
    pub logger: Arc<dyn Logger>,
}

impl AppServices {
    fn new() -> Self {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger);
        let remote = HttpMatchStore::new(platform::api_origin());
        Self {
            store: Rc::new(FallbackStore::with_cache(
                remote,
                Arc::clone(&logger),
                Box::new(platform::LocalStorageCache),
            )),
            logger,
        }
    }
}

/// Services plus the language context, as provided by [`App`].
pub fn use_services() -> (AppServices, Signal<LanguageContext>) {
    (use_context(), use_context())
}

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/court-status/:number")]
        CourtStatusPage { number: String },
        #[route("/court-finish/:number")]
        CourtFinishPage { number: String },
        #[route("/join-match")]
        JoinMatch {},
        #[route("/history")]
        History {},
        #[route("/match/:id")]
        MatchView { id: String },
        #[route("/new-match?:court")]
        NewMatchPage { court: String },
    #[end_layout]
    #[route("/fullscreen-scoreboard/:number")]
    FullscreenScoreboard { number: String },
}

/// Root `<App>` component.
#[component]
pub fn App() -> Element {
    let services = use_context_provider(AppServices::new);
    let lang = use_context_provider(|| {
        Signal::new(LanguageContext::new(
            platform::load_language().unwrap_or_default(),
        ))
    });

    // First visit on this device: adopt the globally saved language.
    use_future(move || {
        let services = services.clone();
        let mut lang = lang;
        async move {
            if platform::load_language().is_some() {
                return;
            }
            match services.store.remote().load_language().await {
                Ok(Some(pref)) => lang.set(LanguageContext::from_preference(Some(&pref))),
                Ok(None) => {}
                Err(e) => services.logger.log(
                    LogLevel::Warn,
                    "failed to load language preference",
                    "language",
                    Some(&e.to_string()),
                ),
            }
        }
    });

    rsx! {
        document::Stylesheet { href: MAIN_CSS }
        document::Title { {lang.read().t("app.title")} }
        Router::<Route> {}
    }
}

/// Header, offline banner and the routed page.
#[component]
fn Shell() -> Element {
    let lang = use_context::<Signal<LanguageContext>>();
    let t = lang();

    rsx! {
        div { class: "app",
            header { class: "topbar",
                Link { class: "brand", to: Route::Home {}, {t.t("app.title")} }
                nav { class: "nav",
                    Link { to: Route::JoinMatch {}, {t.t("nav.join")} }
                    Link { to: Route::NewMatchPage { court: String::new() }, {t.t("nav.new_match")} }
                    Link { to: Route::History {}, {t.t("nav.history")} }
                }
                LanguageSwitcher {}
            }
            OfflineIndicator {}
            main { class: "content", Outlet::<Route> {} }
        }
    }
}
