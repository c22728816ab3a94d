//! Environment-driven server settings.

use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATIC_DIR: &str = "./dist";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `PORT`, default 8080.
    pub port: u16,
    /// `STATIC_DIR`: the Dioxus web build output, default `./dist`.
    pub static_dir: String,
    /// `DATA_FILE`: optional JSON snapshot loaded on start and rewritten after
    /// every mutation. Without it the store lives in memory only.
    pub data_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let static_dir = lookup("STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());
        let data_file = lookup("DATA_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        Self {
            port,
            static_dir,
            data_file,
        }
    }
}
