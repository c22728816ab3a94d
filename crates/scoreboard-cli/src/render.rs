//! Plain-text rendering of flow results.

use scoreboard_core::flows::court_status::CourtStatus;
use scoreboard_core::i18n::LanguageContext;
use scoreboard_core::model::{Match, MatchStatus, MatchSummary, TeamSide};

pub fn court_status(lang: &LanguageContext, court: &str, status: &CourtStatus) -> String {
    match status {
        CourtStatus::Checking => lang.t("court.checking"),
        CourtStatus::Error(message) => message.clone(),
        CourtStatus::Free => lang.t_with("court.free", &[("court", court)]),
        CourtStatus::Occupied(m) => format!(
            "{}\n{}",
            lang.t_with("court.occupied", &[("court", court)]),
            match_line(lang, m)
        ),
    }
}

/// `code  Team A 11-7 Team B  (Game 2)`
pub fn match_line(lang: &LanguageContext, m: &Match) -> String {
    let game = m.score.current_game.to_string();
    format!(
        "{}  {} {}-{} {}  ({})",
        m.id,
        m.team_a.display_name(),
        m.score.points.team_a,
        m.score.points.team_b,
        m.team_b.display_name(),
        lang.t_with("match.game", &[("game", &game)]),
    )
}

pub fn finish_result(lang: &LanguageContext, court: &str, freed: bool) -> String {
    if freed {
        lang.t_with("finish.success", &[("court", court)])
    } else {
        format!("{} {}", lang.t("finish.error"), lang.t("finish.retry_hint"))
    }
}

pub fn history(lang: &LanguageContext, matches: &[MatchSummary]) -> String {
    if matches.is_empty() {
        return lang.t("history.empty");
    }
    let mut out = lang.t("history.title");
    for m in matches {
        let games: Vec<String> = m
            .games
            .iter()
            .map(|g| format!("{}-{}", g.team_a, g.team_b))
            .collect();
        let status = match (m.status, m.winner) {
            (_, Some(TeamSide::TeamA)) => format!("{}: {}", lang.t("match.winner"), m.team_a),
            (_, Some(TeamSide::TeamB)) => format!("{}: {}", lang.t("match.winner"), m.team_b),
            (MatchStatus::Finished, None) => lang.t("match.finished"),
            (MatchStatus::InProgress, None) => lang.t("match.in_progress"),
        };
        let court = m
            .court_number
            .map(|c| format!("  {}", lang.t_with("court.title", &[("court", &c.to_string())])))
            .unwrap_or_default();
        out.push_str(&format!(
            "\n{}  {}{}  {} vs {}  [{}]  {}",
            m.created_at.format("%Y-%m-%d %H:%M"),
            m.id,
            court,
            m.team_a,
            m.team_b,
            games.join(", "),
            status
        ));
    }
    out
}
