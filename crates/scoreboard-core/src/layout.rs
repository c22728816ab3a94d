//! Court visualization: which team is drawn on which half.

use crate::model::{CourtSide, Match, TeamSide};

/// How the scoreboard places teams on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Mirror the physical court: teams move when they change ends.
    #[default]
    FixedSides,
    /// Team A always on the left, whatever end it plays.
    FixedPlayers,
}

impl LayoutMode {
    pub fn label_key(self) -> &'static str {
        match self {
            LayoutMode::FixedSides => "layout.fixed_sides",
            LayoutMode::FixedPlayers => "layout.fixed_players",
        }
    }

    /// Mode named by a `layout=` query value (`sides` or `players`).
    /// Anything else falls back to the default.
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("players" | "fixed-players") => LayoutMode::FixedPlayers,
            _ => LayoutMode::FixedSides,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            LayoutMode::FixedSides => LayoutMode::FixedPlayers,
            LayoutMode::FixedPlayers => LayoutMode::FixedSides,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    pub name: String,
    pub serving: bool,
}

/// One half of the drawn court.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourtHalf {
    pub team: TeamSide,
    pub players: Vec<PlayerSlot>,
    pub points: u32,
    pub games: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourtLayout {
    pub left: CourtHalf,
    pub right: CourtHalf,
}

/// Compute the drawn layout of `m` in `mode`.
pub fn court_layout(m: &Match, mode: LayoutMode) -> CourtLayout {
    let left_team = match mode {
        LayoutMode::FixedSides => {
            if m.court_sides.side_of(TeamSide::TeamA) == CourtSide::Left {
                TeamSide::TeamA
            } else {
                TeamSide::TeamB
            }
        }
        LayoutMode::FixedPlayers => TeamSide::TeamA,
    };
    CourtLayout {
        left: half(m, left_team),
        right: half(m, left_team.opposite()),
    }
}

fn half(m: &Match, team: TeamSide) -> CourtHalf {
    let server = m.current_server;
    let players = m
        .team(team)
        .players
        .iter()
        .enumerate()
        .map(|(i, p)| PlayerSlot {
            name: p.name.clone(),
            serving: server.team == team && usize::from(server.player_index) == i,
        })
        .collect();
    CourtHalf {
        team,
        players,
        points: m.score.points.get(team),
        games: m.score.games_won.get(team),
    }
}
