//! UI translations and the language preference record.
//!
//! [`LanguageContext`] is a plain value passed into every flow. Changing the
//! language updates it immediately and yields a [`LanguagePreference`] the
//! caller persists in the background with [`persist_preference`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logger::{LogLevel, Logger};
use crate::store::PreferenceStore;

/// Key of the single global preference record.
pub const PREFERENCE_ID: &str = "global";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    En,
    Es,
    De,
}

/// Supported languages, in menu order.
pub const SUPPORTED_LANGUAGES: &[Language] = &[Language::En, Language::Es, Language::De];

impl Language {
    pub const fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::De => "de",
        }
    }

    /// Name of the language in that language.
    pub const fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::De => "Deutsch",
        }
    }

    /// Parse a code, tolerating case and region suffixes (`es-MX`).
    pub fn parse(code: &str) -> Option<Self> {
        let normalized = code.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        SUPPORTED_LANGUAGES.iter().copied().find(|l| l.code() == lang)
    }

    fn catalog(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Language::En => EN,
            Language::Es => ES,
            Language::De => DE,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum I18nError {
    #[error("unsupported language '{0}'")]
    Unsupported(String),
}

/// Persisted mirror of the chosen language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePreference {
    pub id: String,
    pub language: String,
    pub updated_at: DateTime<Utc>,
}

impl LanguagePreference {
    pub fn global(language: Language, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: PREFERENCE_ID.to_string(),
            language: language.code().to_string(),
            updated_at,
        }
    }
}

/// Active language plus translation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LanguageContext {
    language: Language,
}

impl LanguageContext {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Restore from a persisted record, falling back to the default.
    pub fn from_preference(pref: Option<&LanguagePreference>) -> Self {
        let language = pref
            .and_then(|p| Language::parse(&p.language))
            .unwrap_or_default();
        Self::new(language)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch language. Returns the record to persist.
    pub fn set_language(&mut self, code: &str) -> Result<LanguagePreference, I18nError> {
        let language =
            Language::parse(code).ok_or_else(|| I18nError::Unsupported(code.to_string()))?;
        self.language = language;
        Ok(LanguagePreference::global(language, Utc::now()))
    }

    /// `(code, display name)` for every supported language.
    pub fn languages(&self) -> Vec<(&'static str, &'static str)> {
        SUPPORTED_LANGUAGES
            .iter()
            .map(|l| (l.code(), l.display_name()))
            .collect()
    }

    /// Translate `key`. Missing keys fall back to English, then to the key.
    pub fn t(&self, key: &str) -> String {
        lookup(self.language, key)
            .or_else(|| lookup(Language::En, key))
            .unwrap_or(key)
            .to_string()
    }

    /// Translate `key` and substitute `{name}` placeholders.
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.t(key), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
    }
}

fn lookup(language: Language, key: &str) -> Option<&'static str> {
    language
        .catalog()
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Mirror a preference to the store. Failures are logged, never returned:
/// the in-memory context stays authoritative.
pub async fn persist_preference<S: PreferenceStore>(
    store: &S,
    pref: &LanguagePreference,
    logger: &dyn Logger,
) {
    if let Err(e) = store.save_language(pref).await {
        logger.log(
            LogLevel::Warn,
            "failed to persist language preference",
            "language",
            Some(&e.to_string()),
        );
    }
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

const EN: &[(&str, &str)] = &[
    ("app.title", "Badminton Scoreboard"),
    ("common.loading", "Loading…"),
    ("common.retry", "Try again"),
    ("common.back_home", "Back to start"),
    ("common.offline", "Offline: showing saved data. Changes are unavailable until the connection returns."),
    ("language.label", "Language"),
    ("nav.history", "History"),
    ("nav.join", "Join match"),
    ("nav.new_match", "New match"),
    ("court.title", "Court {court}"),
    ("court.checking", "Checking court status…"),
    ("court.free", "Court {court} is free"),
    ("court.start_match", "Start a match"),
    ("court.occupied", "Match in progress on court {court}"),
    ("court.go_to_match", "Go to match"),
    ("court.finish", "Finish match"),
    ("court.invalid", "Invalid court number"),
    ("court.error", "Could not check the court status."),
    ("finish.working", "Finishing match…"),
    ("finish.success", "Match finished. Court {court} is now free."),
    ("finish.error", "Could not finish the match on this court."),
    ("finish.retry_hint", "Check the court number and try again."),
    ("join.title", "Join a match"),
    ("join.placeholder", "Match code"),
    ("join.submit", "Join"),
    ("join.searching", "Searching…"),
    ("join.empty", "Please enter a match code."),
    ("join.not_found", "No match found with this code."),
    ("join.fault", "Something went wrong. Please try again."),
    ("history.title", "Match history"),
    ("history.empty", "No matches played yet."),
    ("history.error", "Could not load the match history."),
    ("match.not_found", "Match not found."),
    ("match.error", "Could not load the match."),
    ("match.serving", "Serving"),
    ("match.in_progress", "In progress"),
    ("match.finished", "Finished"),
    ("match.winner", "Winner"),
    ("match.game", "Game {game}"),
    ("match.point", "Point"),
    ("match.code", "Match code: {code}"),
    ("scoreboard.no_match", "No match on court {court}"),
    ("layout.fixed_sides", "Fixed sides"),
    ("layout.fixed_players", "Fixed players"),
    ("new_match.title", "New match"),
    ("new_match.team_a", "Team A"),
    ("new_match.team_b", "Team B"),
    ("new_match.court", "Court"),
    ("new_match.no_court", "No court"),
    ("new_match.create", "Create match"),
    ("new_match.error", "Could not create the match."),
    ("player.search", "Search players…"),
    ("player.add", "Add \"{name}\""),
    ("player.none", "No players found."),
];

const ES: &[(&str, &str)] = &[
    ("app.title", "Marcador de bádminton"),
    ("common.loading", "Cargando…"),
    ("common.retry", "Reintentar"),
    ("common.back_home", "Volver al inicio"),
    ("common.offline", "Sin conexión: se muestran datos guardados. No se pueden hacer cambios hasta que vuelva la conexión."),
    ("language.label", "Idioma"),
    ("nav.history", "Historial"),
    ("nav.join", "Unirse a partido"),
    ("nav.new_match", "Nuevo partido"),
    ("court.title", "Pista {court}"),
    ("court.checking", "Comprobando el estado de la pista…"),
    ("court.free", "La pista {court} está libre"),
    ("court.start_match", "Empezar un partido"),
    ("court.occupied", "Partido en curso en la pista {court}"),
    ("court.go_to_match", "Ir al partido"),
    ("court.finish", "Terminar partido"),
    ("court.invalid", "Número de pista no válido"),
    ("court.error", "No se pudo comprobar el estado de la pista."),
    ("finish.working", "Terminando el partido…"),
    ("finish.success", "Partido terminado. La pista {court} está libre."),
    ("finish.error", "No se pudo terminar el partido en esta pista."),
    ("finish.retry_hint", "Comprueba el número de pista e inténtalo de nuevo."),
    ("join.title", "Unirse a un partido"),
    ("join.placeholder", "Código del partido"),
    ("join.submit", "Unirse"),
    ("join.searching", "Buscando…"),
    ("join.empty", "Introduce un código de partido."),
    ("join.not_found", "No hay ningún partido con este código."),
    ("join.fault", "Algo salió mal. Inténtalo de nuevo."),
    ("history.title", "Historial de partidos"),
    ("history.empty", "Todavía no se ha jugado ningún partido."),
    ("history.error", "No se pudo cargar el historial."),
    ("match.not_found", "Partido no encontrado."),
    ("match.error", "No se pudo cargar el partido."),
    ("match.serving", "Saca"),
    ("match.in_progress", "En curso"),
    ("match.finished", "Terminado"),
    ("match.winner", "Ganador"),
    ("match.game", "Juego {game}"),
    ("match.point", "Punto"),
    ("match.code", "Código del partido: {code}"),
    ("scoreboard.no_match", "No hay partido en la pista {court}"),
    ("layout.fixed_sides", "Lados fijos"),
    ("layout.fixed_players", "Jugadores fijos"),
    ("new_match.title", "Nuevo partido"),
    ("new_match.team_a", "Equipo A"),
    ("new_match.team_b", "Equipo B"),
    ("new_match.court", "Pista"),
    ("new_match.no_court", "Sin pista"),
    ("new_match.create", "Crear partido"),
    ("new_match.error", "No se pudo crear el partido."),
    ("player.search", "Buscar jugadores…"),
    ("player.add", "Añadir \"{name}\""),
    ("player.none", "No se encontraron jugadores."),
];

const DE: &[(&str, &str)] = &[
    ("app.title", "Badminton-Anzeigetafel"),
    ("common.loading", "Wird geladen…"),
    ("common.retry", "Erneut versuchen"),
    ("common.back_home", "Zurück zum Start"),
    ("common.offline", "Offline: gespeicherte Daten werden angezeigt. Änderungen sind erst nach der Wiederverbindung möglich."),
    ("language.label", "Sprache"),
    ("nav.history", "Verlauf"),
    ("nav.join", "Spiel beitreten"),
    ("nav.new_match", "Neues Spiel"),
    ("court.title", "Feld {court}"),
    ("court.checking", "Feldstatus wird geprüft…"),
    ("court.free", "Feld {court} ist frei"),
    ("court.start_match", "Spiel starten"),
    ("court.occupied", "Spiel läuft auf Feld {court}"),
    ("court.go_to_match", "Zum Spiel"),
    ("court.finish", "Spiel beenden"),
    ("court.invalid", "Ungültige Feldnummer"),
    ("court.error", "Der Feldstatus konnte nicht geprüft werden."),
    ("finish.working", "Spiel wird beendet…"),
    ("finish.success", "Spiel beendet. Feld {court} ist jetzt frei."),
    ("finish.error", "Das Spiel auf diesem Feld konnte nicht beendet werden."),
    ("finish.retry_hint", "Feldnummer prüfen und erneut versuchen."),
    ("join.title", "Einem Spiel beitreten"),
    ("join.placeholder", "Spielcode"),
    ("join.submit", "Beitreten"),
    ("join.searching", "Suche läuft…"),
    ("join.empty", "Bitte einen Spielcode eingeben."),
    ("join.not_found", "Kein Spiel mit diesem Code gefunden."),
    ("join.fault", "Etwas ist schiefgelaufen. Bitte erneut versuchen."),
    ("history.title", "Spielverlauf"),
    ("history.empty", "Noch keine Spiele gespielt."),
    ("history.error", "Der Spielverlauf konnte nicht geladen werden."),
    ("match.not_found", "Spiel nicht gefunden."),
    ("match.error", "Das Spiel konnte nicht geladen werden."),
    ("match.serving", "Aufschlag"),
    ("match.in_progress", "Läuft"),
    ("match.finished", "Beendet"),
    ("match.winner", "Sieger"),
    ("match.game", "Satz {game}"),
    ("match.point", "Punkt"),
    ("match.code", "Spielcode: {code}"),
    ("scoreboard.no_match", "Kein Spiel auf Feld {court}"),
    ("layout.fixed_sides", "Feste Seiten"),
    ("layout.fixed_players", "Feste Spieler"),
    ("new_match.title", "Neues Spiel"),
    ("new_match.team_a", "Team A"),
    ("new_match.team_b", "Team B"),
    ("new_match.court", "Feld"),
    ("new_match.no_court", "Kein Feld"),
    ("new_match.create", "Spiel anlegen"),
    ("new_match.error", "Das Spiel konnte nicht angelegt werden."),
    ("player.search", "Spieler suchen…"),
    ("player.add", "\"{name}\" hinzufügen"),
    ("player.none", "Keine Spieler gefunden."),
];
