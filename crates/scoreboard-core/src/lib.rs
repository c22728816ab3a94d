pub mod error;
pub mod flows;
pub mod i18n;
pub mod layout;
pub mod logger;
pub mod model;
pub mod monitor;
pub mod protocol;
pub mod roster;
pub mod scoring;
pub mod store;
