//! Court occupancy probe.

use crate::error::FlowError;
use crate::logger::LogLevel;
use crate::model::{CourtNumber, Match};
use crate::store::MatchStore;

use super::FlowContext;

const SOURCE: &str = "court-status";

/// What the court status page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourtStatus {
    /// Lookup not finished yet.
    Checking,
    /// Invalid court number or store fault, with a localized message.
    Error(String),
    /// An active match holds the court.
    Occupied(Box<Match>),
    Free,
}

/// Resolve the status of `court_number`. Out-of-range numbers never reach
/// the store.
pub async fn resolve<S: MatchStore>(ctx: &FlowContext<'_, S>, court_number: i64) -> CourtStatus {
    match CourtNumber::new(court_number) {
        Ok(court) => resolve_court(ctx, court).await,
        Err(e) => invalid(ctx, &court_number.to_string(), &e.to_string()),
    }
}

/// Resolve from a raw route parameter; non-integers are invalid.
pub async fn resolve_param<S: MatchStore>(ctx: &FlowContext<'_, S>, raw: &str) -> CourtStatus {
    match raw.parse::<CourtNumber>() {
        Ok(court) => resolve_court(ctx, court).await,
        Err(e) => invalid(ctx, raw, &e.to_string()),
    }
}

async fn resolve_court<S: MatchStore>(ctx: &FlowContext<'_, S>, court: CourtNumber) -> CourtStatus {
    match ctx.store.get_match_by_court_number(court).await {
        Ok(Some(m)) => CourtStatus::Occupied(Box::new(m)),
        Ok(None) => CourtStatus::Free,
        Err(e) => {
            FlowError::from(e).report(
                ctx.logger,
                SOURCE,
                &format!("failed to check status of court {court}"),
            );
            CourtStatus::Error(ctx.lang.t("court.error"))
        }
    }
}

fn invalid<S>(ctx: &FlowContext<'_, S>, raw: &str, reason: &str) -> CourtStatus {
    ctx.logger.log(
        LogLevel::Warn,
        &format!("invalid court number {raw:?}"),
        SOURCE,
        Some(reason),
    );
    CourtStatus::Error(ctx.lang.t("court.invalid"))
}
