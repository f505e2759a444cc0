use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::player::PlayerInfo;

/// A decoded tournament: the graph to publish plus the player records the
/// decoder extracted from the vendor file, keyed by temporary id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDocument {
    pub tournament: Tournament,
    pub player_infos: HashMap<i64, PlayerInfo>,
}

impl TournamentDocument {
    /// Re-apply birthday normalization to every player after decoding.
    pub fn normalize_birthdays(&mut self) {
        for player in self.player_infos.values_mut() {
            if let Some(birthday) = player.birthday {
                player.set_birthday(birthday);
            }
        }
    }

    /// Player records in deterministic (temporary id) order.
    pub fn sorted_player_infos(&self) -> Vec<PlayerInfo> {
        let mut players: Vec<PlayerInfo> = self.player_infos.values().cloned().collect();
        players.sort_by_key(|player| player.tmp_id);
        players
    }
}

/// Play mode attributes shared by every level of the tournament graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Modes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_mode: Option<GameMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizing_mode: Option<OrganizingMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_mode: Option<ScoreMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_mode: Option<TeamMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableModel>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    Official,
    Speedball,
    Classic,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizingMode {
    Elimination,
    Qualification,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreMode {
    OneSet,
    BestOfThree,
    BestOfFive,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamMode {
    Double,
    Single,
    Dyp,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableModel {
    Multitable,
    Garlando,
    Leonhart,
    Tornado,
    RobertoSport,
    Bonzini,
}

/// Shared result state of matches and games.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameResult {
    TeamAWins,
    TeamBWins,
    Draw,
    NotYetFinished,
    Nulled,
}

/// The tournament graph submitted to the registry. Player references start
/// out as temporary ids and are rewritten to registry ids before publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    /// The registry processes submissions asynchronously by default.
    #[serde(rename = "async", default = "default_async")]
    pub is_async: bool,
    pub name: String,
    /// Stable identifier the remote side keys create-vs-replace on.
    pub user_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament_list_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(flatten)]
    pub modes: Modes,
    pub competitions: Vec<Competition>,
}

fn default_async() -> bool {
    true
}

impl Tournament {
    /// Every list of player references in the graph: team rosters and both
    /// participant lists of every game. Collected once so remapping can
    /// verify all of them before it rewrites any.
    pub fn player_reference_sites(&mut self) -> Vec<&mut Vec<i64>> {
        let mut sites = Vec::new();
        for competition in &mut self.competitions {
            for team in &mut competition.teams {
                sites.push(&mut team.players);
            }
            for phase in &mut competition.phases {
                for game_match in &mut phase.matches {
                    for game in &mut game_match.games {
                        sites.push(&mut game.players_a);
                        sites.push(&mut game.players_b);
                    }
                }
            }
        }
        sites
    }

    pub fn team_count(&self) -> usize {
        self.competitions.iter().map(|c| c.teams.len()).sum()
    }

    pub fn match_count(&self) -> usize {
        self.competitions
            .iter()
            .flat_map(|c| &c.phases)
            .map(|p| p.matches.len())
            .sum()
    }

    pub fn game_count(&self) -> usize {
        self.competitions
            .iter()
            .flat_map(|c| &c.phases)
            .flat_map(|p| &p.matches)
            .map(|m| m.games.len())
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(flatten)]
    pub modes: Modes,
    pub teams: Vec<Team>,
    pub phases: Vec<Phase>,
    pub ranking_systems: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub rank: i32,
    pub start_number: i32,
    pub players: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub phase_number: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(flatten)]
    pub modes: Modes,
    pub next_phase_numbers: Vec<i32>,
    pub rankings: Vec<Ranking>,
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub rank: i32,
    pub unique_rank: i32,
    pub team_start_numbers: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub match_number: i32,
    pub rankings_a_unique_ranks: Vec<i32>,
    pub rankings_b_unique_ranks: Vec<i32>,
    pub result_a: i32,
    pub result_b: i32,
    pub result: GameResult,
    pub played: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(flatten)]
    pub modes: Modes,
    pub games: Vec<Game>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub game_number: i32,
    pub players_a: Vec<i64>,
    pub players_b: Vec<i64>,
    pub result_a: i32,
    pub result_b: i32,
    pub result: GameResult,
    pub played: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(flatten)]
    pub modes: Modes,
}

/// Vendor tournament file attached to the publish step, passed through
/// unread.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub extension: String,
}
