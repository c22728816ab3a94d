//! Browser helpers: page origin, query string, and `localStorage`.

use scoreboard_client::SnapshotCache;
use scoreboard_core::flows::redirect::split_query;
use scoreboard_core::i18n::Language;

const LANGUAGE_KEY: &str = "scoreboard_language";
const CACHE_KEY: &str = "scoreboard_offline_cache";

/// Origin the API is served from (same host as the page).
pub fn api_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Last value of `name` in the page's query string.
pub fn query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    split_query(search.trim_start_matches('?'))
        .into_iter()
        .rev()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Language chosen on this device, if any.
pub fn load_language() -> Option<Language> {
    let code = local_storage()?.get_item(LANGUAGE_KEY).ok()??;
    Language::parse(&code)
}

pub fn save_language(language: Language) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(LANGUAGE_KEY, language.code());
    }
}

/// Offline copy of the match store, kept in `localStorage`.
pub struct LocalStorageCache;

impl SnapshotCache for LocalStorageCache {
    fn load(&self) -> Option<String> {
        local_storage()?.get_item(CACHE_KEY).ok()?
    }

    fn save(&self, json: &str) {
        if let Some(storage) = local_storage()
            && storage.set_item(CACHE_KEY, json).is_err()
        {
            tracing::warn!(key = CACHE_KEY, "localStorage rejected the offline cache");
        }
    }
}
