//! Remote store with a local copy for offline reads.
//!
//! Reads go to the remote store first and refresh the local [`MemoryStore`].
//! When the remote fails, reads are served from the local copy if it has an
//! answer; otherwise the original fault is returned. Mutations always go to
//! the remote store.
//!
//! With a [`SnapshotCache`] attached, the local copy is written out as a
//! JSON [`StoreSnapshot`] after every change and restored on construction,
//! so it outlives a page reload.

use std::sync::Arc;

use thiserror::Error;

use scoreboard_core::error::StoreError;
use scoreboard_core::logger::{LogLevel, Logger};
use scoreboard_core::model::{CourtNumber, Match};
use scoreboard_core::store::{MatchStore, MemoryStore, StoreSnapshot};

const SOURCE: &str = "fallback-store";

/// Durable slot holding the serialized local copy (browser `localStorage`).
pub trait SnapshotCache {
    fn load(&self) -> Option<String>;
    fn save(&self, json: &str);
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("malformed offline cache: {0}")]
    Json(#[from] serde_json::Error),
    #[error("rejected offline cache: {0}")]
    Store(#[from] StoreError),
}

fn restore(json: &str) -> Result<MemoryStore, CacheError> {
    let snapshot: StoreSnapshot = serde_json::from_str(json)?;
    Ok(MemoryStore::from_snapshot(snapshot)?)
}

pub struct FallbackStore<R> {
    remote: R,
    local: MemoryStore,
    cache: Option<Box<dyn SnapshotCache>>,
    logger: Arc<dyn Logger>,
}

impl<R: MatchStore> FallbackStore<R> {
    /// Fallback store whose local copy lives in memory only.
    pub fn new(remote: R, logger: Arc<dyn Logger>) -> Self {
        Self {
            remote,
            local: MemoryStore::new(),
            cache: None,
            logger,
        }
    }

    /// Fallback store whose local copy is restored from `cache` and written
    /// back to it after every change. An unreadable cache is discarded.
    pub fn with_cache(
        remote: R,
        logger: Arc<dyn Logger>,
        cache: Box<dyn SnapshotCache>,
    ) -> Self {
        let local = match cache.load().map(|json| restore(&json)) {
            None => MemoryStore::new(),
            Some(Ok(local)) => local,
            Some(Err(e)) => {
                logger.log(
                    LogLevel::Warn,
                    "discarding offline cache",
                    SOURCE,
                    Some(&e.to_string()),
                );
                MemoryStore::new()
            }
        };
        Self {
            remote,
            local,
            cache: Some(cache),
            logger,
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn local(&self) -> &MemoryStore {
        &self.local
    }

    /// Refresh the local copy of `m`.
    pub async fn remember(&self, m: &Match) {
        self.cache_match(m).await;
        self.flush().await;
    }

    async fn cache_match(&self, m: &Match) {
        if let Err(e) = self.local.upsert_match(m.clone()).await {
            self.logger.log(
                LogLevel::Warn,
                "failed to cache match locally",
                SOURCE,
                Some(&e.to_string()),
            );
        }
    }

    async fn release_local(&self, court: CourtNumber) {
        if let Ok(true) = self.local.free_up_court(court).await {
            self.flush().await;
        }
    }

    /// Write the local copy to the attached cache, if any.
    async fn flush(&self) {
        let Some(cache) = &self.cache else {
            return;
        };
        match serde_json::to_string(&self.local.snapshot().await) {
            Ok(json) => cache.save(&json),
            Err(e) => self.logger.log(
                LogLevel::Warn,
                "failed to serialize offline cache",
                SOURCE,
                Some(&e.to_string()),
            ),
        }
    }

    fn note_fallback(&self, operation: &str, fault: &StoreError) {
        self.logger.log(
            LogLevel::Warn,
            &format!("{operation}: remote store failed, trying local copy"),
            SOURCE,
            Some(&fault.to_string()),
        );
    }
}

impl<R: MatchStore> MatchStore for FallbackStore<R> {
    async fn get_match(&self, id: &str) -> Result<Option<Match>, StoreError> {
        match self.remote.get_match(id).await {
            Ok(Some(m)) => {
                self.remember(&m).await;
                Ok(Some(m))
            }
            Ok(None) => Ok(None),
            Err(fault) => {
                self.note_fallback("get_match", &fault);
                match self.local.get_match(id).await {
                    Ok(Some(m)) => Ok(Some(m)),
                    _ => Err(fault),
                }
            }
        }
    }

    async fn get_match_by_court_number(
        &self,
        court: CourtNumber,
    ) -> Result<Option<Match>, StoreError> {
        match self.remote.get_match_by_court_number(court).await {
            Ok(Some(m)) => {
                self.remember(&m).await;
                Ok(Some(m))
            }
            Ok(None) => {
                // The remote is authoritative: drop any stale local occupant.
                self.release_local(court).await;
                Ok(None)
            }
            Err(fault) => {
                self.note_fallback("get_match_by_court_number", &fault);
                match self.local.get_match_by_court_number(court).await {
                    Ok(Some(m)) => Ok(Some(m)),
                    _ => Err(fault),
                }
            }
        }
    }

    async fn free_up_court(&self, court: CourtNumber) -> Result<bool, StoreError> {
        let freed = self.remote.free_up_court(court).await?;
        self.release_local(court).await;
        Ok(freed)
    }

    async fn list_matches(&self) -> Result<Vec<Match>, StoreError> {
        match self.remote.list_matches().await {
            Ok(matches) => {
                for m in &matches {
                    self.cache_match(m).await;
                }
                self.flush().await;
                Ok(matches)
            }
            Err(fault) => {
                self.note_fallback("list_matches", &fault);
                match self.local.list_matches().await {
                    Ok(matches) if !matches.is_empty() => Ok(matches),
                    _ => Err(fault),
                }
            }
        }
    }

    async fn is_available(&self) -> bool {
        self.remote.is_available().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::Utc;
    use scoreboard_core::logger::RecordingLogger;
    use scoreboard_core::model::{NewMatch, Player};

    use super::*;

    /// A memory store whose every call can be made to fail.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        down: AtomicBool,
    }

    impl FlakyStore {
        fn check(&self) -> Result<(), StoreError> {
            if self.down.load(Ordering::SeqCst) {
                Err(StoreError::Unavailable("offline".into()))
            } else {
                Ok(())
            }
        }
    }

    impl MatchStore for FlakyStore {
        async fn get_match(&self, id: &str) -> Result<Option<Match>, StoreError> {
            self.check()?;
            self.inner.get_match(id).await
        }
        async fn get_match_by_court_number(
            &self,
            court: CourtNumber,
        ) -> Result<Option<Match>, StoreError> {
            self.check()?;
            self.inner.get_match_by_court_number(court).await
        }
        async fn free_up_court(&self, court: CourtNumber) -> Result<bool, StoreError> {
            self.check()?;
            self.inner.free_up_court(court).await
        }
        async fn list_matches(&self) -> Result<Vec<Match>, StoreError> {
            self.check()?;
            self.inner.list_matches().await
        }
        async fn is_available(&self) -> bool {
            self.check().is_ok()
        }
    }

    /// Stands in for `localStorage`; clones share one slot.
    #[derive(Clone, Default)]
    struct SharedCache(Arc<Mutex<Option<String>>>);

    impl SnapshotCache for SharedCache {
        fn load(&self) -> Option<String> {
            self.0.lock().unwrap().clone()
        }
        fn save(&self, json: &str) {
            *self.0.lock().unwrap() = Some(json.to_string());
        }
    }

    fn reload(cache: &SharedCache, logger: Arc<RecordingLogger>) -> FallbackStore<FlakyStore> {
        let remote = FlakyStore::default();
        remote.down.store(true, Ordering::SeqCst);
        FallbackStore::with_cache(remote, logger, Box::new(cache.clone()))
    }

    fn request(court: u8) -> NewMatch {
        NewMatch {
            team_a: vec![Player::new("p1", "Anna")],
            team_b: vec![Player::new("p2", "Bo")],
            court_number: Some(CourtNumber::try_from(court).unwrap()),
            first_server: None,
        }
    }

    fn setup() -> (FallbackStore<FlakyStore>, Arc<RecordingLogger>) {
        let logger = Arc::new(RecordingLogger::default());
        let store = FallbackStore::new(FlakyStore::default(), logger.clone());
        (store, logger)
    }

    #[tokio::test]
    async fn offline_reads_use_cached_copy() {
        let (store, logger) = setup();
        let m = store.remote().inner.create_match(request(2)).await.unwrap();
        let court = CourtNumber::try_from(2).unwrap();

        assert_eq!(store.get_match(&m.id).await.unwrap(), Some(m.clone()));
        store.remote().down.store(true, Ordering::SeqCst);

        assert_eq!(store.get_match(&m.id).await.unwrap(), Some(m.clone()));
        assert_eq!(
            store.get_match_by_court_number(court).await.unwrap(),
            Some(m)
        );
        assert_eq!(logger.count(LogLevel::Warn), 2);
        assert!(!store.is_available().await);
    }

    #[tokio::test]
    async fn offline_without_local_copy_keeps_the_fault() {
        let (store, _logger) = setup();
        store.remote().down.store(true, Ordering::SeqCst);
        assert!(matches!(
            store.get_match("abc123").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.list_matches().await.is_err());
    }

    #[tokio::test]
    async fn remote_free_court_clears_local_copy() {
        let (store, _logger) = setup();
        let court = CourtNumber::try_from(5).unwrap();
        store.remote().inner.create_match(request(5)).await.unwrap();
        assert!(store.get_match_by_court_number(court).await.unwrap().is_some());

        assert!(store.free_up_court(court).await.unwrap());
        assert!(
            store
                .local()
                .get_match_by_court_number(court)
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.free_up_court(court).await.unwrap());
    }

    #[tokio::test]
    async fn mutations_do_not_fall_back() {
        let (store, _logger) = setup();
        let cached = Match::create("abc123".into(), request(1), Utc::now()).unwrap();
        store.remember(&cached).await;
        store.remote().down.store(true, Ordering::SeqCst);

        let court = CourtNumber::try_from(1).unwrap();
        assert!(store.free_up_court(court).await.is_err());
        assert!(
            store
                .local()
                .get_match_by_court_number(court)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn cached_copy_survives_a_reload() {
        let cache = SharedCache::default();
        let logger = Arc::new(RecordingLogger::default());
        let first = FallbackStore::with_cache(
            FlakyStore::default(),
            logger.clone(),
            Box::new(cache.clone()),
        );
        let m = first.remote().inner.create_match(request(3)).await.unwrap();
        assert_eq!(first.get_match(&m.id).await.unwrap(), Some(m.clone()));
        assert!(cache.load().is_some());
        drop(first);

        let court = CourtNumber::try_from(3).unwrap();
        let second = reload(&cache, logger);
        assert_eq!(second.get_match(&m.id).await.unwrap(), Some(m.clone()));
        assert_eq!(
            second.get_match_by_court_number(court).await.unwrap(),
            Some(m.clone())
        );
        assert_eq!(second.list_matches().await.unwrap(), vec![m]);
    }

    #[tokio::test]
    async fn freed_court_is_written_to_the_cache() {
        let cache = SharedCache::default();
        let logger = Arc::new(RecordingLogger::default());
        let first = FallbackStore::with_cache(
            FlakyStore::default(),
            logger.clone(),
            Box::new(cache.clone()),
        );
        let court = CourtNumber::try_from(6).unwrap();
        let m = first.remote().inner.create_match(request(6)).await.unwrap();
        first.get_match(&m.id).await.unwrap();
        assert!(first.free_up_court(court).await.unwrap());

        let second = reload(&cache, logger);
        assert!(
            second
                .local()
                .get_match_by_court_number(court)
                .await
                .unwrap()
                .is_none()
        );
        let cached = second.local().get_match(&m.id).await.unwrap().unwrap();
        assert!(cached.is_finished());
    }

    #[tokio::test]
    async fn unreadable_cache_starts_empty() {
        let cache = SharedCache::default();
        cache.save("{not json");
        let logger = Arc::new(RecordingLogger::default());

        let store = reload(&cache, logger.clone());
        assert!(store.local().list_matches().await.unwrap().is_empty());
        assert_eq!(logger.count(LogLevel::Warn), 1);
    }

    #[tokio::test]
    async fn memory_only_store_forgets_on_reload() {
        let (store, _logger) = setup();
        let cached = Match::create("abc123".into(), request(1), Utc::now()).unwrap();
        store.remember(&cached).await;
        drop(store);

        let (fresh, _logger) = setup();
        fresh.remote().down.store(true, Ordering::SeqCst);
        assert!(fresh.get_match("abc123").await.is_err());
    }
}
