//! The flows driven through the HTTP client against a live router.

use std::net::SocketAddr;

use scoreboard_client::HttpMatchStore;
use scoreboard_core::flows::FlowContext;
use scoreboard_core::flows::court_finish::finish;
use scoreboard_core::flows::court_status::{CourtStatus, resolve};
use scoreboard_core::flows::history::load_history;
use scoreboard_core::flows::join::{JoinFailure, join};
use scoreboard_core::i18n::{Language, LanguageContext, LanguagePreference};
use scoreboard_core::logger::{LogLevel, RecordingLogger};
use scoreboard_core::model::{CourtNumber, NewMatch, Player, TeamSide};
use scoreboard_core::store::{MatchStore, MemoryStore, PreferenceStore};

use crate::api::{AppState, router};

async fn serve() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState::new(MemoryStore::new()));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn doubles(court: u8) -> NewMatch {
    NewMatch {
        team_a: vec![Player::new("", "Anna"), Player::new("", "Berit")],
        team_b: vec![Player::new("", "Carla"), Player::new("", "Dora")],
        court_number: Some(CourtNumber::try_from(court).unwrap()),
        first_server: Some(TeamSide::TeamB),
    }
}

#[tokio::test]
async fn finishing_an_occupied_court() {
    let addr = serve().await;
    let store = HttpMatchStore::new(format!("http://{addr}"));
    let logger = RecordingLogger::default();
    let lang = LanguageContext::default();
    let ctx = FlowContext::new(&store, &logger, &lang);

    let m = store.create_match(&doubles(3)).await.unwrap();
    assert_eq!(m.current_server.team, TeamSide::TeamB);
    assert!(m.team_a.players.iter().all(|p| p.id.starts_with("pl-")));

    match resolve(&ctx, 3).await {
        CourtStatus::Occupied(found) => assert_eq!(found.id, m.id),
        other => panic!("expected occupied court, got {other:?}"),
    }
    assert_eq!(resolve(&ctx, 4).await, CourtStatus::Free);

    assert!(finish(&ctx, "3").await);
    assert!(!finish(&ctx, "3").await);
    assert_eq!(resolve(&ctx, 3).await, CourtStatus::Free);
    assert_eq!(logger.count(LogLevel::Error), 0);
}

#[tokio::test]
async fn joining_by_code() {
    let addr = serve().await;
    let store = HttpMatchStore::new(format!("http://{addr}"));
    let logger = RecordingLogger::default();
    let lang = LanguageContext::default();
    let ctx = FlowContext::new(&store, &logger, &lang);

    let m = store.create_match(&doubles(1)).await.unwrap();
    assert_eq!(join(&ctx, &format!("  {}  ", m.id)).await, Ok(m.id.clone()));
    assert_eq!(join(&ctx, "zzz999").await, Err(JoinFailure::NotFound));
    assert_eq!(join(&ctx, "   ").await, Err(JoinFailure::Empty));

    let history = load_history(&ctx).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].team_a, "Anna / Berit");
}

#[tokio::test]
async fn occupied_court_and_points_over_http() {
    let addr = serve().await;
    let store = HttpMatchStore::new(format!("http://{addr}"));

    let m = store.create_match(&doubles(5)).await.unwrap();
    let err = store.create_match(&doubles(5)).await.unwrap_err();
    assert!(matches!(
        err,
        scoreboard_core::error::StoreError::Remote { status: 409, .. }
    ));

    let updated = store.award_point(&m.id, TeamSide::TeamA).await.unwrap();
    assert_eq!(updated.score.points.team_a, 1);
    assert!(store.is_available().await);
    assert_eq!(store.list_players().await.unwrap().len(), 4);
}

#[tokio::test]
async fn language_preference_round_trips() {
    let addr = serve().await;
    let store = HttpMatchStore::new(format!("http://{addr}"));

    assert_eq!(store.load_language().await.unwrap(), None);
    let pref = LanguagePreference::global(Language::De, chrono::Utc::now());
    store.save_language(&pref).await.unwrap();
    assert_eq!(store.load_language().await.unwrap(), Some(pref));
}

#[tokio::test]
async fn server_down_is_a_fault() {
    // A port nothing listens on: bind, read the address, drop the listener.
    let dead = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let store = HttpMatchStore::new(format!("http://{dead}"));
    let logger = RecordingLogger::default();
    let lang = LanguageContext::default();
    let ctx = FlowContext::new(&store, &logger, &lang);

    assert_eq!(join(&ctx, "abc123").await, Err(JoinFailure::Fault));
    assert!(matches!(resolve(&ctx, 2).await, CourtStatus::Error(_)));
    assert!(!finish(&ctx, "2").await);
    assert_eq!(logger.count(LogLevel::Error), 3);
}
