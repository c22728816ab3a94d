//! Finish the match on a court and release it.

use crate::error::FlowError;
use crate::logger::LogLevel;
use crate::model::CourtNumber;
use crate::store::MatchStore;

use super::FlowContext;

const SOURCE: &str = "court-finish";

/// Free `raw` (a route parameter). Returns `true` only when the store
/// confirms an active match was released; each failure cause is logged.
pub async fn finish<S: MatchStore>(ctx: &FlowContext<'_, S>, raw: &str) -> bool {
    let court = match raw.parse::<CourtNumber>() {
        Ok(court) => court,
        Err(e) => {
            ctx.logger.log(
                LogLevel::Warn,
                &format!("refusing to finish invalid court {raw:?}"),
                SOURCE,
                Some(&e.to_string()),
            );
            return false;
        }
    };

    match ctx.store.free_up_court(court).await {
        Ok(true) => {
            ctx.logger
                .log(LogLevel::Info, &format!("court {court} freed"), SOURCE, None);
            true
        }
        Ok(false) => {
            FlowError::NotFound(format!("no active match on court {court}")).report(
                ctx.logger,
                SOURCE,
                &format!("nothing to finish on court {court}"),
            );
            false
        }
        Err(e) => {
            FlowError::from(e).report(
                ctx.logger,
                SOURCE,
                &format!("failed to free court {court}"),
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::flows::court_status::{self, CourtStatus};
    use crate::flows::testing::ProbeStore;
    use crate::i18n::LanguageContext;
    use crate::logger::RecordingLogger;
    use crate::model::tests::singles;

    #[tokio::test]
    async fn finish_is_idempotent() {
        let store = ProbeStore::default();
        store.inner.create_match(singles(Some(3))).await.unwrap();
        let logger = RecordingLogger::default();
        let lang = LanguageContext::default();
        let ctx = FlowContext::new(&store, &logger, &lang);

        assert!(finish(&ctx, "3").await);
        assert!(!finish(&ctx, "3").await);
        assert_eq!(logger.count(LogLevel::Info), 1);
        assert_eq!(logger.count(LogLevel::Warn), 1);
    }

    #[tokio::test]
    async fn invalid_numbers_are_rejected_without_store_call() {
        let store = ProbeStore::default();
        let logger = RecordingLogger::default();
        let lang = LanguageContext::default();
        let ctx = FlowContext::new(&store, &logger, &lang);

        assert!(!finish(&ctx, "0").await);
        assert!(!finish(&ctx, "eleven").await);
        assert_eq!(store.calls(), 0);
        assert_eq!(logger.count(LogLevel::Warn), 2);
    }

    #[tokio::test]
    async fn store_fault_returns_false_and_logs_error() {
        let store = ProbeStore::failing(StoreError::Remote {
            status: 500,
            message: "db down".into(),
        });
        let logger = RecordingLogger::default();
        let lang = LanguageContext::default();
        let ctx = FlowContext::new(&store, &logger, &lang);

        assert!(!finish(&ctx, "2").await);
        let events = logger.events();
        assert_eq!(events[0].level, LogLevel::Error);
        assert!(events[0].detail.as_deref().unwrap().contains("db down"));
    }

    #[tokio::test]
    async fn occupied_court_can_be_finished_then_reports_free() {
        let store = ProbeStore::default();
        store.inner.create_match(singles(Some(3))).await.unwrap();
        let logger = RecordingLogger::default();
        let lang = LanguageContext::default();
        let ctx = FlowContext::new(&store, &logger, &lang);

        assert!(matches!(
            court_status::resolve(&ctx, 3).await,
            CourtStatus::Occupied(_)
        ));
        assert!(finish(&ctx, "3").await);
        assert_eq!(court_status::resolve(&ctx, 3).await, CourtStatus::Free);
        assert!(!finish(&ctx, "3").await);
    }
}
