//! UI-triggered operations that query or mutate the store and map the
//! outcome to a display state.
//!
//! Flows perform no navigation and hold no UI state of their own; they take a
//! [`FlowContext`] carrying the store, the logger and the active language.

pub mod court_finish;
pub mod court_status;
pub mod history;
pub mod join;
pub mod redirect;

use crate::i18n::LanguageContext;
use crate::logger::Logger;

/// Collaborators injected into every flow.
pub struct FlowContext<'a, S> {
    pub store: &'a S,
    pub logger: &'a dyn Logger,
    pub lang: &'a LanguageContext,
}

impl<'a, S> FlowContext<'a, S> {
    pub fn new(store: &'a S, logger: &'a dyn Logger, lang: &'a LanguageContext) -> Self {
        Self {
            store,
            logger,
            lang,
        }
    }
}
