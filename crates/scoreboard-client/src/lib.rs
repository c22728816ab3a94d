//! Client-side access to the scoreboard server.
//!
//! [`HttpMatchStore`](http_store::HttpMatchStore) talks to the JSON API;
//! [`FallbackStore`](fallback::FallbackStore) layers a local copy on top so
//! reads keep working while the server is unreachable, and can keep that
//! copy in a [`SnapshotCache`](fallback::SnapshotCache) across restarts.

pub mod fallback;
pub mod http_store;

pub use fallback::{FallbackStore, SnapshotCache};
pub use http_store::HttpMatchStore;
