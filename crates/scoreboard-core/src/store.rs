//! Store abstraction and the in-memory implementation.
//!
//! The traits describe the collaborator surface flows consume. The
//! [`MemoryStore`] is the authoritative store behind the HTTP server and the
//! local cache behind the client's fallback store. It enforces the one
//! active match per court invariant.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::i18n::LanguagePreference;
use crate::model::{CourtNumber, Match, NewMatch, Player, TeamSide};
use crate::protocol::{MATCH_CODE_ALPHABET, MATCH_CODE_LEN};
use crate::scoring::RallyOutcome;

/// Match lookups and the court-freeing mutation.
pub trait MatchStore {
    /// Look up a match by id. `Ok(None)` when no such match exists.
    fn get_match(&self, id: &str) -> impl Future<Output = Result<Option<Match>, StoreError>>;

    /// The active match on `court`, if any.
    fn get_match_by_court_number(
        &self,
        court: CourtNumber,
    ) -> impl Future<Output = Result<Option<Match>, StoreError>>;

    /// Finish the active match on `court`. `Ok(false)` when nothing was active.
    fn free_up_court(&self, court: CourtNumber) -> impl Future<Output = Result<bool, StoreError>>;

    /// All matches, newest first.
    fn list_matches(&self) -> impl Future<Output = Result<Vec<Match>, StoreError>>;

    /// Cheap reachability probe.
    fn is_available(&self) -> impl Future<Output = bool>;
}

/// Companion table holding the global language preference.
pub trait PreferenceStore {
    fn load_language(
        &self,
    ) -> impl Future<Output = Result<Option<LanguagePreference>, StoreError>>;

    fn save_language(
        &self,
        pref: &LanguagePreference,
    ) -> impl Future<Output = Result<(), StoreError>>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Serializable image of a [`MemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub matches: Vec<Match>,
    pub players: Vec<Player>,
    #[serde(default)]
    pub language: Option<LanguagePreference>,
}

#[derive(Default)]
struct StoreState {
    matches: HashMap<String, Match>,
    players: BTreeMap<String, Player>,
    language: Option<LanguagePreference>,
}

impl StoreState {
    fn active_on(&self, court: CourtNumber) -> Option<&Match> {
        self.matches.values().find(|m| m.is_active_on(court))
    }

    fn register_players(&mut self, m: &Match) {
        for p in m.team_a.players.iter().chain(&m.team_b.players) {
            self.players.insert(p.id.clone(), p.clone());
        }
    }
}

/// Thread-safe in-memory store.
///
/// A single `RwLock` guards all tables so court checks and inserts happen
/// atomically.
pub struct MemoryStore {
    state: RwLock<StoreState>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Rebuild a store from a snapshot, validating every record.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, StoreError> {
        let mut state = StoreState::default();
        for m in snapshot.matches {
            m.validate()?;
            if let Some(court) = m.court_number
                && !m.is_finished()
                && state.active_on(court).is_some()
            {
                return Err(StoreError::CourtOccupied(court));
            }
            state.register_players(&m);
            state.matches.insert(m.id.clone(), m);
        }
        for p in snapshot.players {
            state.players.insert(p.id.clone(), p);
        }
        state.language = snapshot.language;
        Ok(Self {
            state: RwLock::new(state),
            available: AtomicBool::new(true),
        })
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read().await;
        let mut matches: Vec<Match> = state.matches.values().cloned().collect();
        matches.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        StoreSnapshot {
            matches,
            players: state.players.values().cloned().collect(),
            language: state.language.clone(),
        }
    }

    /// Toggle the availability probe (maintenance mode, tests).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    /// Start a new match, assigning a fresh code and player ids as needed.
    ///
    /// Fails with [`StoreError::CourtOccupied`] if the requested court already
    /// has an active match.
    pub async fn create_match(&self, mut request: NewMatch) -> Result<Match, StoreError> {
        let mut state = self.state.write().await;

        if let Some(court) = request.court_number
            && state.active_on(court).is_some()
        {
            return Err(StoreError::CourtOccupied(court));
        }

        for p in request.team_a.iter_mut().chain(request.team_b.iter_mut()) {
            p.name = p.name.trim().to_string();
            if p.id.trim().is_empty() {
                p.id = existing_player_id(&state.players, &p.name)
                    .unwrap_or_else(|| format!("pl-{}", generate_code()));
            }
        }

        let id = loop {
            let code = generate_code();
            if !state.matches.contains_key(&code) {
                break code;
            }
        };

        let m = Match::create(id, request, Utc::now())?;
        state.register_players(&m);
        state.matches.insert(m.id.clone(), m.clone());
        Ok(m)
    }

    /// Insert or replace a record, e.g. a copy fetched from a remote store.
    ///
    /// The incoming record wins: any other match cached as active on the same
    /// court is detached from it.
    pub async fn upsert_match(&self, m: Match) -> Result<(), StoreError> {
        m.validate()?;
        let mut state = self.state.write().await;
        if let Some(court) = m.court_number.filter(|_| !m.is_finished()) {
            let now = Utc::now();
            for other in state.matches.values_mut() {
                if other.id != m.id && other.is_active_on(court) {
                    other.finish(now);
                }
            }
        }
        state.register_players(&m);
        state.matches.insert(m.id.clone(), m);
        Ok(())
    }

    /// Apply one rally to a match.
    pub async fn award_point(
        &self,
        id: &str,
        side: TeamSide,
    ) -> Result<(Match, RallyOutcome), StoreError> {
        let mut state = self.state.write().await;
        let m = state
            .matches
            .get_mut(id)
            .ok_or_else(|| StoreError::MatchNotFound(id.to_string()))?;
        let outcome = m.award_point(side)?;
        Ok((m.clone(), outcome))
    }

    pub async fn list_players(&self) -> Vec<Player> {
        let state = self.state.read().await;
        let mut players: Vec<Player> = state.players.values().cloned().collect();
        players.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        players
    }
}

impl MatchStore for MemoryStore {
    async fn get_match(&self, id: &str) -> Result<Option<Match>, StoreError> {
        let state = self.state.read().await;
        Ok(state.matches.get(id).cloned())
    }

    async fn get_match_by_court_number(
        &self,
        court: CourtNumber,
    ) -> Result<Option<Match>, StoreError> {
        let state = self.state.read().await;
        Ok(state.active_on(court).cloned())
    }

    async fn free_up_court(&self, court: CourtNumber) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        match state.matches.values_mut().find(|m| m.is_active_on(court)) {
            Some(m) => {
                m.finish(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_matches(&self) -> Result<Vec<Match>, StoreError> {
        let state = self.state.read().await;
        let mut matches: Vec<Match> = state.matches.values().cloned().collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(matches)
    }

    async fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}

impl PreferenceStore for MemoryStore {
    async fn load_language(&self) -> Result<Option<LanguagePreference>, StoreError> {
        Ok(self.state.read().await.language.clone())
    }

    async fn save_language(&self, pref: &LanguagePreference) -> Result<(), StoreError> {
        self.state.write().await.language = Some(pref.clone());
        Ok(())
    }
}

fn existing_player_id(players: &BTreeMap<String, Player>, name: &str) -> Option<String> {
    players
        .values()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .map(|p| p.id.clone())
}

/// Generate a random match code: six lowercase letters or digits, each
/// drawn uniformly from [`MATCH_CODE_ALPHABET`].
pub fn generate_code() -> String {
    use rand::RngExt;
    let mut rng = rand::rng();
    (0..MATCH_CODE_LEN)
        .map(|_| {
            let i = rng.random_range(0..MATCH_CODE_ALPHABET.len());
            char::from(MATCH_CODE_ALPHABET[i])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::{doubles, singles};
    use crate::protocol::validate_match_code;

    fn court(n: u8) -> CourtNumber {
        CourtNumber::try_from(n).unwrap()
    }

    #[test]
    fn code_characters_are_uniform() {
        // 20k codes: 3333 expected per character, sd about 57. A modulo-bias
        // draw over u8 would put `a`..`d` near 3750.
        let mut counts = [0u32; 36];
        for _ in 0..20_000 {
            for b in generate_code().bytes() {
                let i = MATCH_CODE_ALPHABET.iter().position(|&c| c == b).unwrap();
                counts[i] += 1;
            }
        }
        for (i, n) in counts.iter().enumerate() {
            assert!(
                (3033..=3633).contains(n),
                "{} drawn {n} times",
                char::from(MATCH_CODE_ALPHABET[i])
            );
        }
    }

    #[tokio::test]
    async fn create_assigns_code_and_occupies_court() {
        let store = MemoryStore::new();
        let m = store.create_match(doubles(Some(3))).await.unwrap();

        assert_eq!(m.id.len(), 6);
        assert!(validate_match_code(&m.id).is_ok());
        let on_court = store.get_match_by_court_number(court(3)).await.unwrap();
        assert_eq!(on_court.map(|m| m.id), Some(m.id.clone()));
        assert_eq!(store.get_match(&m.id).await.unwrap(), Some(m));
    }

    #[tokio::test]
    async fn second_match_on_same_court_is_rejected() {
        let store = MemoryStore::new();
        store.create_match(singles(Some(4))).await.unwrap();
        let err = store.create_match(singles(Some(4))).await.unwrap_err();
        assert_eq!(err, StoreError::CourtOccupied(court(4)));
        assert!(store.create_match(singles(Some(5))).await.is_ok());
    }

    #[tokio::test]
    async fn free_up_court_is_idempotent() {
        let store = MemoryStore::new();
        let m = store.create_match(singles(Some(3))).await.unwrap();

        assert!(store.free_up_court(court(3)).await.unwrap());
        assert!(!store.free_up_court(court(3)).await.unwrap());

        let finished = store.get_match(&m.id).await.unwrap().unwrap();
        assert!(finished.is_finished());
        assert_eq!(finished.court_number, None);
        assert!(store.get_match_by_court_number(court(3)).await.unwrap().is_none());
        assert!(store.create_match(singles(Some(3))).await.is_ok());
    }

    #[tokio::test]
    async fn unnamed_ids_are_assigned_and_reused_by_name() {
        let store = MemoryStore::new();
        let mut request = singles(None);
        request.team_a[0].id = String::new();
        request.team_a[0].name = " Eva ".into();
        let first = store.create_match(request.clone()).await.unwrap();
        let eva_id = first.team_a.players[0].id.clone();
        assert!(eva_id.starts_with("pl-"));
        assert_eq!(first.team_a.players[0].name, "Eva");

        let second = store.create_match(request).await.unwrap();
        assert_eq!(second.team_a.players[0].id, eva_id);
        assert_eq!(store.list_players().await.len(), 2);
    }

    #[tokio::test]
    async fn award_point_on_unknown_match_fails() {
        let store = MemoryStore::new();
        let err = store.award_point("nope", TeamSide::TeamA).await.unwrap_err();
        assert_eq!(err, StoreError::MatchNotFound("nope".into()));
    }

    #[tokio::test]
    async fn award_point_persists_score() {
        let store = MemoryStore::new();
        let m = store.create_match(singles(None)).await.unwrap();
        let (updated, outcome) = store.award_point(&m.id, TeamSide::TeamB).await.unwrap();
        assert_eq!(outcome, RallyOutcome::Point);
        assert_eq!(updated.score.points.team_b, 1);
        let stored = store.get_match(&m.id).await.unwrap().unwrap();
        assert_eq!(stored.score.points.team_b, 1);
    }

    #[tokio::test]
    async fn upsert_detaches_stale_occupant() {
        let store = MemoryStore::new();
        let stale = store.create_match(singles(Some(6))).await.unwrap();
        let fresh = Match::create("remote1".into(), singles(Some(6)), Utc::now()).unwrap();

        store.upsert_match(fresh.clone()).await.unwrap();

        let on_court = store.get_match_by_court_number(court(6)).await.unwrap();
        assert_eq!(on_court.map(|m| m.id), Some(fresh.id));
        let stale = store.get_match(&stale.id).await.unwrap().unwrap();
        assert!(stale.is_finished());
    }

    #[tokio::test]
    async fn snapshot_round_trip_preserves_records() {
        let store = MemoryStore::new();
        store.create_match(doubles(Some(1))).await.unwrap();
        store.create_match(singles(None)).await.unwrap();

        let snapshot = store.snapshot().await;
        let restored = MemoryStore::from_snapshot(snapshot.clone()).unwrap();
        assert_eq!(restored.snapshot().await, snapshot);
    }

    #[tokio::test]
    async fn snapshot_with_two_matches_on_one_court_is_rejected() {
        let a = Match::create("aaa111".into(), singles(Some(2)), Utc::now()).unwrap();
        let b = Match::create("bbb222".into(), singles(Some(2)), Utc::now()).unwrap();
        let snapshot = StoreSnapshot {
            matches: vec![a, b],
            ..StoreSnapshot::default()
        };
        assert!(matches!(
            MemoryStore::from_snapshot(snapshot),
            Err(StoreError::CourtOccupied(_))
        ));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_probe_toggles() {
        let store = MemoryStore::new();
        let first = store.create_match(singles(None)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create_match(singles(None)).await.unwrap();

        let ids: Vec<String> = store
            .list_matches()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);

        assert!(store.is_available().await);
        store.set_available(false);
        assert!(!store.is_available().await);
    }
}
