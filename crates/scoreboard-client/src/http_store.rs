//! [`MatchStore`] over the scoreboard server's JSON API.
//!
//! Every record coming off the wire is validated before it is handed out.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use scoreboard_core::error::StoreError;
use scoreboard_core::i18n::LanguagePreference;
use scoreboard_core::model::{CourtNumber, Match, NewMatch, Player, TeamSide};
use scoreboard_core::protocol::{ErrorBody, FreeCourtResponse, PointRequest, validate_match_code};
use scoreboard_core::store::{MatchStore, PreferenceStore};

/// HTTP client for one scoreboard server.
#[derive(Debug, Clone)]
pub struct HttpMatchStore {
    base_url: String,
    http: Client,
}

impl HttpMatchStore {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = request.send().await.map_err(transport_error)?;
        decode(response).await
    }

    /// Start a new match on the server.
    pub async fn create_match(&self, request: &NewMatch) -> Result<Match, StoreError> {
        let m: Match = self
            .fetch(self.http.post(self.url("/api/matches")).json(request))
            .await?;
        m.validate()?;
        Ok(m)
    }

    /// Award one rally to `team`.
    pub async fn award_point(&self, id: &str, team: TeamSide) -> Result<Match, StoreError> {
        if validate_match_code(id).is_err() {
            return Err(StoreError::MatchNotFound(id.to_string()));
        }
        let m: Match = self
            .fetch(
                self.http
                    .post(self.url(&format!("/api/matches/{id}/point")))
                    .json(&PointRequest { team }),
            )
            .await?;
        m.validate()?;
        Ok(m)
    }

    pub async fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        self.fetch(self.http.get(self.url("/api/players"))).await
    }
}

impl MatchStore for HttpMatchStore {
    async fn get_match(&self, id: &str) -> Result<Option<Match>, StoreError> {
        if validate_match_code(id).is_err() {
            return Ok(None);
        }
        let response = self
            .http
            .get(self.url(&format!("/api/matches/{id}")))
            .send()
            .await
            .map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let m: Match = decode(response).await?;
        m.validate()?;
        Ok(Some(m))
    }

    async fn get_match_by_court_number(
        &self,
        court: CourtNumber,
    ) -> Result<Option<Match>, StoreError> {
        let m: Option<Match> = self
            .fetch(self.http.get(self.url(&format!("/api/courts/{court}"))))
            .await?;
        if let Some(m) = &m {
            m.validate()?;
        }
        Ok(m)
    }

    async fn free_up_court(&self, court: CourtNumber) -> Result<bool, StoreError> {
        let body: FreeCourtResponse = self
            .fetch(self.http.post(self.url(&format!("/api/courts/{court}/free"))))
            .await?;
        Ok(body.freed)
    }

    async fn list_matches(&self) -> Result<Vec<Match>, StoreError> {
        let matches: Vec<Match> = self.fetch(self.http.get(self.url("/api/matches"))).await?;
        for m in &matches {
            m.validate()?;
        }
        Ok(matches)
    }

    async fn is_available(&self) -> bool {
        match self.http.get(self.url("/api/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

impl PreferenceStore for HttpMatchStore {
    async fn load_language(&self) -> Result<Option<LanguagePreference>, StoreError> {
        self.fetch(self.http.get(self.url("/api/language"))).await
    }

    async fn save_language(&self, pref: &LanguagePreference) -> Result<(), StoreError> {
        let _: LanguagePreference = self
            .fetch(self.http.put(self.url("/api/language")).json(pref))
            .await?;
        Ok(())
    }
}

/// Decode a success body, or turn an error status into [`StoreError::Remote`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()));
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    Err(StoreError::Remote {
        status: status.as_u16(),
        message,
    })
}

fn transport_error(e: reqwest::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}
