//! Read-only list of played matches.

use crate::error::FlowError;
use crate::model::MatchSummary;
use crate::store::MatchStore;

use super::FlowContext;

const SOURCE: &str = "history";

/// Summaries of every match, newest first. Faults become a localized
/// message.
pub async fn load_history<S: MatchStore>(
    ctx: &FlowContext<'_, S>,
) -> Result<Vec<MatchSummary>, String> {
    match ctx.store.list_matches().await {
        Ok(matches) => Ok(matches.iter().map(MatchSummary::from).collect()),
        Err(e) => {
            FlowError::from(e).report(ctx.logger, SOURCE, "failed to load match history");
            Err(ctx.lang.t("history.error"))
        }
    }
}
