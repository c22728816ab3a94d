//! Resolve a user-entered match code.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::FlowError;
use crate::logger::LogLevel;
use crate::protocol::validate_match_code;
use crate::store::MatchStore;

use super::FlowContext;

const SOURCE: &str = "join-match";

/// Why a join attempt did not resolve to a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinFailure {
    Empty,
    NotFound,
    Fault,
}

impl JoinFailure {
    /// Translation key of the user-facing message.
    pub fn message_key(self) -> &'static str {
        match self {
            JoinFailure::Empty => "join.empty",
            JoinFailure::NotFound => "join.not_found",
            JoinFailure::Fault => "join.fault",
        }
    }
}

/// Resolve `code` to a match id. On success the trimmed code is returned as
/// the route key; navigation is up to the caller.
pub async fn join<S: MatchStore>(ctx: &FlowContext<'_, S>, code: &str) -> Result<String, JoinFailure> {
    let code = code.trim();
    if code.is_empty() {
        ctx.logger
            .log(LogLevel::Info, "empty match code submitted", SOURCE, None);
        return Err(JoinFailure::Empty);
    }

    // Codes are generated alphanumeric; anything else cannot exist.
    if let Err(reason) = validate_match_code(code) {
        FlowError::NotFound(reason.to_string()).report(
            ctx.logger,
            SOURCE,
            &format!("malformed match code {code:?}"),
        );
        return Err(JoinFailure::NotFound);
    }

    match ctx.store.get_match(code).await {
        Ok(Some(_)) => Ok(code.to_string()),
        Ok(None) => {
            FlowError::NotFound(format!("match {code}")).report(
                ctx.logger,
                SOURCE,
                &format!("no match with code {code}"),
            );
            Err(JoinFailure::NotFound)
        }
        Err(e) => {
            FlowError::from(e).report(
                ctx.logger,
                SOURCE,
                &format!("lookup of match {code} failed"),
            );
            Err(JoinFailure::Fault)
        }
    }
}

// ---------------------------------------------------------------------------
// In-flight guard
// ---------------------------------------------------------------------------

/// Rejects re-entrant submissions while a lookup is outstanding.
///
/// Clones share the same flag, so the guard can be captured by several event
/// handlers of one component.
#[derive(Debug, Clone, Default)]
pub struct SubmitGuard {
    in_flight: Arc<AtomicBool>,
}

/// Held for the duration of one submission; releases the guard on drop.
#[derive(Debug)]
pub struct SubmitTicket {
    in_flight: Arc<AtomicBool>,
}

impl SubmitGuard {
    /// Claim the guard, or `None` if a submission is already running.
    pub fn try_begin(&self) -> Option<SubmitTicket> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitTicket {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Drop for SubmitTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::flows::testing::ProbeStore;
    use crate::i18n::LanguageContext;
    use crate::logger::RecordingLogger;
    use crate::model::tests::singles;

    #[tokio::test]
    async fn blank_codes_fail_fast() {
        let store = ProbeStore::default();
        let logger = RecordingLogger::default();
        let lang = LanguageContext::default();
        let ctx = FlowContext::new(&store, &logger, &lang);

        assert_eq!(join(&ctx, "").await, Err(JoinFailure::Empty));
        assert_eq!(join(&ctx, "   ").await, Err(JoinFailure::Empty));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let store = ProbeStore::default();
        let logger = RecordingLogger::default();
        let lang = LanguageContext::default();
        let ctx = FlowContext::new(&store, &logger, &lang);

        assert_eq!(join(&ctx, "abc123").await, Err(JoinFailure::NotFound));
        assert_eq!(store.calls(), 1);
        assert_eq!(logger.count(LogLevel::Warn), 1);
    }

    #[tokio::test]
    async fn known_code_resolves_to_trimmed_id() {
        let store = ProbeStore::default();
        let m = store.inner.create_match(singles(None)).await.unwrap();
        let logger = RecordingLogger::default();
        let lang = LanguageContext::default();
        let ctx = FlowContext::new(&store, &logger, &lang);

        let padded = format!("  {}\n", m.id);
        assert_eq!(join(&ctx, &padded).await, Ok(m.id.clone()));
    }

    #[tokio::test]
    async fn malformed_code_is_not_found_without_lookup() {
        let store = ProbeStore::default();
        let logger = RecordingLogger::default();
        let lang = LanguageContext::default();
        let ctx = FlowContext::new(&store, &logger, &lang);

        assert_eq!(join(&ctx, "../admin").await, Err(JoinFailure::NotFound));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn fault_is_logged_but_message_is_generic() {
        let store = ProbeStore::failing(StoreError::Unavailable("tls handshake eof".into()));
        let logger = RecordingLogger::default();
        let lang = LanguageContext::default();
        let ctx = FlowContext::new(&store, &logger, &lang);

        let failure = join(&ctx, "abc123").await.unwrap_err();
        assert_eq!(failure, JoinFailure::Fault);

        let shown = lang.t(failure.message_key());
        assert!(!shown.contains("tls"));
        assert!(logger.events()[0].detail.as_deref().unwrap().contains("tls handshake eof"));
    }

    #[test]
    fn guard_blocks_reentry_until_ticket_drops() {
        let guard = SubmitGuard::default();
        let ticket = guard.try_begin().expect("first submission");
        assert!(guard.is_in_flight());
        assert!(guard.clone().try_begin().is_none());

        drop(ticket);
        assert!(!guard.is_in_flight());
        assert!(guard.try_begin().is_some());
    }
}
