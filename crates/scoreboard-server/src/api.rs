//! JSON API handlers and the router that mounts them.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use scoreboard_core::flows::redirect::{build_redirect_target, split_query};
use scoreboard_core::i18n::{Language, LanguagePreference, PREFERENCE_ID};
use scoreboard_core::model::{CourtNumber, Match, NewMatch, Player};
use scoreboard_core::protocol::{
    FreeCourtResponse, HealthResponse, PointRequest, VmixHint, VmixRow, timestamp,
    validate_match_code,
};
use scoreboard_core::scoring::RallyOutcome;
use scoreboard_core::store::{MatchStore, MemoryStore, PreferenceStore};

use crate::error::ApiError;
use crate::persist;

/// Shared application state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<MemoryStore>,
    data_file: Option<Arc<FsPath>>,
    save_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store: Arc::new(store),
            data_file: None,
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Rewrite `path` after every mutation.
    pub fn with_data_file(mut self, path: impl AsRef<FsPath>) -> Self {
        self.data_file = Some(Arc::from(path.as_ref()));
        self
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Best-effort snapshot write; failures are logged and the request
    /// still succeeds.
    async fn persist(&self) {
        let Some(path) = &self.data_file else {
            return;
        };
        let _guard = self.save_lock.lock().await;
        if let Err(e) = persist::save(&self.store, path).await {
            tracing::warn!(path = %path.display(), error = %e, "failed to write data file");
        }
    }
}

/// All API routes plus the legacy `/sb/{number}` redirect.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/client-vmix", get(client_vmix))
        .route("/api/vmix/{id}", get(vmix_rows))
        .route("/api/health", get(health))
        .route("/api/matches", get(list_matches).post(create_match))
        .route("/api/matches/{id}", get(get_match))
        .route("/api/matches/{id}/point", post(award_point))
        .route("/api/courts/{number}", get(court_match))
        .route("/api/courts/{number}/free", post(free_court))
        .route("/api/players", get(list_players))
        .route("/api/language", get(get_language).put(put_language))
        .route("/sb/{number}", get(sb_redirect))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn parse_court(raw: &str) -> Result<CourtNumber, ApiError> {
    raw.parse::<CourtNumber>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

// ---------------------------------------------------------------------------
// vMix
// ---------------------------------------------------------------------------

/// `GET /api/client-vmix`: usage hint for wiring a vMix data source.
async fn client_vmix(State(state): State<AppState>) -> Result<Json<VmixHint>, ApiError> {
    if !state.store.is_available().await {
        return Err(ApiError::Internal("match store is unavailable".into()));
    }
    Ok(Json(VmixHint {
        message: "Add a JSON data source in vMix pointing at /api/vmix/{matchId}".into(),
        example: "/api/vmix/abc123".into(),
        timestamp: timestamp(),
    }))
}

/// `GET /api/vmix/{id}`: the match flattened into vMix data-source rows.
async fn vmix_rows(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<VmixRow>>, ApiError> {
    let m = find_match(&state, &id).await?;
    Ok(Json(vec![VmixRow::from(&m)]))
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        available: state.store.is_available().await,
        timestamp: timestamp(),
    })
}

async fn find_match(state: &AppState, id: &str) -> Result<Match, ApiError> {
    if validate_match_code(id).is_err() {
        return Err(ApiError::NotFound(format!("match '{id}' not found")));
    }
    state
        .store
        .get_match(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("match '{id}' not found")))
}

/// `GET /api/matches`: every match, newest first.
async fn list_matches(State(state): State<AppState>) -> Result<Json<Vec<Match>>, ApiError> {
    Ok(Json(state.store.list_matches().await?))
}

async fn create_match(
    State(state): State<AppState>,
    Json(request): Json<NewMatch>,
) -> Result<impl IntoResponse, ApiError> {
    let m = state.store.create_match(request).await?;
    tracing::info!(match_id = %m.id, court = ?m.court_number.map(CourtNumber::get), "match created");
    state.persist().await;
    Ok((StatusCode::CREATED, Json(m)))
}

async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Match>, ApiError> {
    Ok(Json(find_match(&state, &id).await?))
}

async fn award_point(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PointRequest>,
) -> Result<Json<Match>, ApiError> {
    let (m, outcome) = state.store.award_point(&id, request.team).await?;
    match outcome {
        RallyOutcome::Point => {}
        RallyOutcome::GameWon(team) => tracing::info!(match_id = %m.id, %team, "game won"),
        RallyOutcome::MatchWon(team) => tracing::info!(match_id = %m.id, %team, "match won"),
    }
    state.persist().await;
    Ok(Json(m))
}

// ---------------------------------------------------------------------------
// Courts
// ---------------------------------------------------------------------------

/// `GET /api/courts/{number}`: the active match or `null`.
async fn court_match(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<Option<Match>>, ApiError> {
    let court = parse_court(&number)?;
    Ok(Json(state.store.get_match_by_court_number(court).await?))
}

async fn free_court(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<FreeCourtResponse>, ApiError> {
    let court = parse_court(&number)?;
    let freed = state.store.free_up_court(court).await?;
    if freed {
        tracing::info!(court = court.get(), "court freed");
        state.persist().await;
    }
    Ok(Json(FreeCourtResponse { freed }))
}

async fn list_players(State(state): State<AppState>) -> Json<Vec<Player>> {
    Json(state.store.list_players().await)
}

// ---------------------------------------------------------------------------
// Language preference
// ---------------------------------------------------------------------------

async fn get_language(
    State(state): State<AppState>,
) -> Result<Json<Option<LanguagePreference>>, ApiError> {
    Ok(Json(state.store.load_language().await?))
}

async fn put_language(
    State(state): State<AppState>,
    Json(mut pref): Json<LanguagePreference>,
) -> Result<Json<LanguagePreference>, ApiError> {
    if pref.id != PREFERENCE_ID {
        return Err(ApiError::BadRequest(format!(
            "preference id must be '{PREFERENCE_ID}'"
        )));
    }
    let language = Language::parse(&pref.language).ok_or_else(|| {
        ApiError::BadRequest(format!("unsupported language '{}'", pref.language))
    })?;
    pref.language = language.code().to_string();
    state.store.save_language(&pref).await?;
    state.persist().await;
    Ok(Json(pref))
}

// ---------------------------------------------------------------------------
// Legacy short links
// ---------------------------------------------------------------------------

/// `GET /sb/{number}`: forward to the fullscreen scoreboard with the query
/// string carried over.
async fn sb_redirect(Path(number): Path<String>, RawQuery(query): RawQuery) -> Redirect {
    let pairs = split_query(query.as_deref().unwrap_or_default());
    Redirect::temporary(&build_redirect_target(&number, &pairs))
}
