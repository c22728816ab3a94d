//! Badminton rally scoring.
//!
//! Games go to 21 with a two-point margin, capped at 30. The first team to
//! win two games wins the match. The rally winner serves next; within a
//! doubles team the server follows the team's score parity. Teams change
//! ends after every game and at 11 in the deciding game.

use crate::error::ValidationError;
use crate::model::{GameResult, Match, ServerRef, TeamPoints, TeamSide};

pub const POINTS_TO_WIN: u32 = 21;
pub const POINT_CAP: u32 = 30;
pub const GAMES_TO_WIN: u32 = 2;
/// Leading score at which ends change in the deciding game.
pub const DECIDER_END_CHANGE: u32 = 11;

/// What a single rally changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RallyOutcome {
    Point,
    GameWon(TeamSide),
    MatchWon(TeamSide),
}

/// Whether `own` points beat `other` points for a finished game.
pub fn game_won(own: u32, other: u32) -> bool {
    own >= POINT_CAP || (own >= POINTS_TO_WIN && own >= other + 2)
}

impl Match {
    /// Award a rally to `side` and advance serve, games and ends.
    pub fn award_point(&mut self, side: TeamSide) -> Result<RallyOutcome, ValidationError> {
        if self.is_finished() {
            return Err(ValidationError::new("match is already finished"));
        }
        if self.score.winner.is_some() {
            return Err(ValidationError::new("match has already been decided"));
        }

        *self.score.points.get_mut(side) += 1;
        let own = self.score.points.get(side);
        let other = self.score.points.get(side.opposite());

        if game_won(own, other) {
            self.score.completed_games.push(GameResult {
                team_a: self.score.points.team_a,
                team_b: self.score.points.team_b,
                winner: side,
            });
            *self.score.games_won.get_mut(side) += 1;

            if self.score.games_won.get(side) >= GAMES_TO_WIN {
                self.score.winner = Some(side);
                return Ok(RallyOutcome::MatchWon(side));
            }

            self.score.current_game += 1;
            self.score.points = TeamPoints::default();
            self.court_sides.swap();
            self.current_server = ServerRef {
                team: side,
                player_index: 0,
            };
            return Ok(RallyOutcome::GameWon(side));
        }

        if self.is_deciding_game()
            && !self.score.decider_ends_changed
            && own.max(other) == DECIDER_END_CHANGE
        {
            self.court_sides.swap();
            self.score.decider_ends_changed = true;
        }

        let index = if self.team(side).players.len() < 2 || own % 2 == 0 {
            0
        } else {
            1
        };
        self.current_server = ServerRef {
            team: side,
            player_index: index,
        };
        Ok(RallyOutcome::Point)
    }

    /// Both teams have one game each.
    pub fn is_deciding_game(&self) -> bool {
        let won = self.score.games_won;
        won.team_a == GAMES_TO_WIN - 1 && won.team_b == GAMES_TO_WIN - 1
    }
}
