//! Pages and widgets of the web frontend.

pub mod court_finish;
pub mod court_status;
pub mod court_view;
pub mod history;
pub mod home;
pub mod join_match;
pub mod language_switcher;
pub mod match_view;
pub mod new_match;
pub mod offline_indicator;
pub mod player_picker;
pub mod scoreboard;
