use std::collections::HashMap;

use crate::domain::{PlayerInfo, TournamentDocument};
use crate::errors::UploadError;

/// Rewrite every player reference in the tournament graph from temporary
/// ids to permanent registry ids.
///
/// Verification runs before any write: first every decoded player must
/// have a mapping, then every id in every reference site. A failure
/// leaves the graph untouched.
pub fn remap_player_references(
    document: &mut TournamentDocument,
    id_map: &HashMap<i64, i64>,
) -> Result<(), UploadError> {
    verify_players_mapped(&document.player_infos, id_map)?;

    let mut sites = document.tournament.player_reference_sites();
    verify_sites_mapped(&sites, id_map)?;

    for site in &mut sites {
        for id in site.iter_mut() {
            if let Some(mapped) = id_map.get(id) {
                *id = *mapped;
            }
        }
    }
    Ok(())
}

fn verify_players_mapped(
    players: &HashMap<i64, PlayerInfo>,
    id_map: &HashMap<i64, i64>,
) -> Result<(), UploadError> {
    for player in players.values() {
        if !id_map.contains_key(&player.tmp_id) {
            return Err(UploadError::UnmappedPlayer(player.display()));
        }
    }
    Ok(())
}

fn verify_sites_mapped(
    sites: &[&mut Vec<i64>],
    id_map: &HashMap<i64, i64>,
) -> Result<(), UploadError> {
    for site in sites {
        for id in site.iter() {
            if !id_map.contains_key(id) {
                return Err(UploadError::MissingId(*id));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Competition, Game, GameResult, Match, Modes, Phase, Team, Tournament,
    };

    fn make_player(tmp_id: i64) -> PlayerInfo {
        PlayerInfo {
            tmp_id,
            first_name: Some("Anna".to_string()),
            last_name: Some("Berger".to_string()),
            birthday: None,
            license_number: Some(111),
        }
    }

    fn make_document(team_players: Vec<i64>, players_a: Vec<i64>, players_b: Vec<i64>) -> TournamentDocument {
        let player_infos = team_players
            .iter()
            .map(|tmp_id| (*tmp_id, make_player(*tmp_id)))
            .collect();
        TournamentDocument {
            tournament: Tournament {
                is_async: true,
                name: "Spring Open".to_string(),
                user_identifier: "spring-open-2024".to_string(),
                tournament_list_id: None,
                finished: None,
                start_time: None,
                end_time: None,
                modes: Modes::default(),
                competitions: vec![Competition {
                    name: "Open Single".to_string(),
                    start_time: None,
                    end_time: None,
                    modes: Modes::default(),
                    teams: vec![Team {
                        rank: 1,
                        start_number: 1,
                        players: team_players,
                        name: None,
                    }],
                    phases: vec![Phase {
                        phase_number: 1,
                        name: None,
                        start_time: None,
                        end_time: None,
                        modes: Modes::default(),
                        next_phase_numbers: vec![],
                        rankings: vec![],
                        matches: vec![Match {
                            match_number: 1,
                            rankings_a_unique_ranks: vec![1],
                            rankings_b_unique_ranks: vec![2],
                            result_a: 1,
                            result_b: 0,
                            result: GameResult::TeamAWins,
                            played: true,
                            start_time: None,
                            end_time: None,
                            modes: Modes::default(),
                            games: vec![Game {
                                game_number: 1,
                                players_a,
                                players_b,
                                result_a: 5,
                                result_b: 2,
                                result: GameResult::TeamAWins,
                                played: true,
                                start_time: None,
                                end_time: None,
                                modes: Modes::default(),
                            }],
                        }],
                    }],
                    ranking_systems: vec![],
                }],
            },
            player_infos,
        }
    }

    fn graph_ids(document: &mut TournamentDocument) -> Vec<Vec<i64>> {
        document
            .tournament
            .player_reference_sites()
            .iter()
            .map(|site| (*site).clone())
            .collect()
    }

    #[test]
    fn rewrites_every_reference_site() {
        let mut document = make_document(vec![10, 20], vec![10], vec![20]);
        let id_map = HashMap::from([(10, 100), (20, 200)]);

        remap_player_references(&mut document, &id_map).unwrap();

        assert_eq!(
            graph_ids(&mut document),
            vec![vec![100, 200], vec![100], vec![200]]
        );
    }

    #[test]
    fn unmapped_player_info_fails_before_any_write() {
        let mut document = make_document(vec![10, 20], vec![10], vec![20]);
        let id_map = HashMap::from([(10, 100)]);

        let error = remap_player_references(&mut document, &id_map).unwrap_err();

        assert!(matches!(error, UploadError::UnmappedPlayer(_)));
        assert_eq!(
            graph_ids(&mut document),
            vec![vec![10, 20], vec![10], vec![20]]
        );
    }

    #[test]
    fn graph_id_outside_the_player_set_fails_naming_it() {
        let mut document = make_document(vec![10], vec![10], vec![30]);
        let id_map = HashMap::from([(10, 100)]);

        let error = remap_player_references(&mut document, &id_map).unwrap_err();

        assert!(matches!(error, UploadError::MissingId(30)));
        assert_eq!(graph_ids(&mut document), vec![vec![10], vec![10], vec![30]]);
    }

    #[test]
    fn second_remap_with_disjoint_map_leaves_graph_untouched() {
        let mut document = make_document(vec![10, 20], vec![10], vec![20]);
        let id_map = HashMap::from([(10, 100), (20, 200)]);
        remap_player_references(&mut document, &id_map).unwrap();

        let second_map = HashMap::from([(10, 1000), (20, 2000)]);
        let error = remap_player_references(&mut document, &second_map).unwrap_err();

        assert!(matches!(error, UploadError::MissingId(_)));
        assert_eq!(
            graph_ids(&mut document),
            vec![vec![100, 200], vec![100], vec![200]]
        );
    }
}
