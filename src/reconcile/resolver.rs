use crate::domain::PlayerInfo;
use crate::errors::UploadError;
use crate::reconcile::types::Resolution;
use crate::registry::{PlayerUpdate, RegistryPlayer, SearchResponse};

/// Classify each input player against its registry search outcome.
///
/// Ambiguity wins over everything: if any input matched more than one
/// registry entry, the whole pass fails listing every ambiguous player,
/// and no partial classification escapes.
pub fn resolve(inputs: &[PlayerInfo], results: &SearchResponse) -> Result<Resolution, UploadError> {
    let mut ambiguous = Vec::new();
    let mut resolution = Resolution::default();

    for (index, input) in inputs.iter().enumerate() {
        let candidates = candidates_for(results, index);
        if candidates.len() > 1 {
            ambiguous.push(input.display());
            continue;
        }
        match candidates.first() {
            Some(candidate) => resolve_single_match(&mut resolution, input, candidate),
            None => resolve_no_match(&mut resolution, input),
        }
    }

    if !ambiguous.is_empty() {
        return Err(UploadError::AmbiguousPlayers(ambiguous.join(", ")));
    }
    Ok(resolution)
}

/// Candidates for one input, in a stable order.
fn candidates_for<'a>(results: &'a SearchResponse, index: usize) -> Vec<&'a RegistryPlayer> {
    let mut candidates: Vec<&RegistryPlayer> = results
        .get(&index)
        .map(|by_id| by_id.values().collect())
        .unwrap_or_default();
    candidates.sort_by_key(|candidate| candidate.id);
    candidates
}

fn resolve_single_match(resolution: &mut Resolution, input: &PlayerInfo, candidate: &RegistryPlayer) {
    if let Some(license) = input.license_number {
        if needs_license_correction(candidate, license) {
            resolution
                .to_update
                .push(PlayerUpdate::adopt_license(candidate, input.tmp_id, license));
        }
    }
    resolution.record_match(input.tmp_id, candidate);
}

/// A differing license is only a correction when the registry has not
/// already absorbed it through a merge.
fn needs_license_correction(candidate: &RegistryPlayer, license: i64) -> bool {
    candidate.license_number != Some(license)
        && !candidate.license_numbers_before_merge.contains(&license)
}

fn resolve_no_match(resolution: &mut Resolution, input: &PlayerInfo) {
    if input.has_full_identity() {
        resolution.new_players.push(input.clone());
    } else {
        resolution.unresolved.push(input.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn make_player(tmp_id: i64, license: Option<i64>) -> PlayerInfo {
        PlayerInfo {
            tmp_id,
            first_name: None,
            last_name: None,
            birthday: None,
            license_number: license,
        }
    }

    fn make_full_player(tmp_id: i64, license: Option<i64>) -> PlayerInfo {
        PlayerInfo {
            tmp_id,
            first_name: Some("Anna".to_string()),
            last_name: Some("Berger".to_string()),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1),
            license_number: license,
        }
    }

    fn make_candidate(id: i64, license: Option<i64>) -> RegistryPlayer {
        RegistryPlayer {
            id,
            first_name: "Anna".to_string(),
            last_name: "Berger".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1),
            license_number: license,
            license_numbers_before_merge: vec![],
        }
    }

    fn search_with(entries: Vec<(usize, Vec<RegistryPlayer>)>) -> SearchResponse {
        entries
            .into_iter()
            .map(|(index, candidates)| {
                let by_id: HashMap<i64, RegistryPlayer> = candidates
                    .into_iter()
                    .map(|candidate| (candidate.id, candidate))
                    .collect();
                (index, by_id)
            })
            .collect()
    }

    #[test]
    fn unique_match_with_equal_license_only_maps() {
        let inputs = vec![make_player(10, Some(111))];
        let results = search_with(vec![(0, vec![make_candidate(100, Some(111))])]);

        let resolution = resolve(&inputs, &results).unwrap();

        assert_eq!(resolution.id_map.get(&10), Some(&100));
        assert!(resolution.to_update.is_empty());
        assert!(resolution.new_players.is_empty());
        assert!(resolution.unresolved.is_empty());
        assert_eq!(resolution.name_map.get(&100).unwrap(), "Anna Berger");
    }

    #[test]
    fn differing_license_queues_an_adopting_update() {
        let inputs = vec![make_player(10, Some(111))];
        let results = search_with(vec![(0, vec![make_candidate(100, Some(999))])]);

        let resolution = resolve(&inputs, &results).unwrap();

        assert_eq!(resolution.id_map.get(&10), Some(&100));
        assert_eq!(resolution.to_update.len(), 1);
        let update = &resolution.to_update[0];
        assert_eq!(update.id, 100);
        assert_eq!(update.tmp_id, 10);
        assert_eq!(update.license_number, Some(111));
    }

    #[test]
    fn candidate_without_license_adopts_the_local_one() {
        let inputs = vec![make_player(10, Some(111))];
        let results = search_with(vec![(0, vec![make_candidate(100, None)])]);

        let resolution = resolve(&inputs, &results).unwrap();

        assert_eq!(resolution.to_update.len(), 1);
        assert_eq!(resolution.to_update[0].license_number, Some(111));
    }

    #[test]
    fn absorbed_license_suppresses_the_update() {
        let inputs = vec![make_player(10, Some(111))];
        let mut candidate = make_candidate(100, Some(999));
        candidate.license_numbers_before_merge = vec![111];
        let results = search_with(vec![(0, vec![candidate])]);

        let resolution = resolve(&inputs, &results).unwrap();

        assert_eq!(resolution.id_map.get(&10), Some(&100));
        assert!(resolution.to_update.is_empty());
    }

    #[test]
    fn input_without_license_never_updates() {
        let inputs = vec![make_player(10, None)];
        let results = search_with(vec![(0, vec![make_candidate(100, Some(999))])]);

        let resolution = resolve(&inputs, &results).unwrap();

        assert!(resolution.to_update.is_empty());
        assert_eq!(resolution.id_map.get(&10), Some(&100));
    }

    #[test]
    fn multiple_candidates_abort_listing_every_ambiguous_player() {
        let inputs = vec![
            make_full_player(10, Some(111)),
            make_player(20, Some(222)),
        ];
        let results = search_with(vec![
            (0, vec![make_candidate(100, Some(111)), make_candidate(101, Some(111))]),
            (1, vec![make_candidate(200, Some(222)), make_candidate(201, Some(222))]),
        ]);

        let error = resolve(&inputs, &results).unwrap_err();

        match error {
            UploadError::AmbiguousPlayers(listed) => {
                assert!(listed.contains("Anna Berger(111)"));
                assert!(listed.contains("222"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn no_match_with_full_identity_goes_to_new_players() {
        let inputs = vec![make_full_player(10, Some(111))];
        let results = SearchResponse::new();

        let resolution = resolve(&inputs, &results).unwrap();

        assert_eq!(resolution.new_players.len(), 1);
        assert!(resolution.unresolved.is_empty());
        assert!(resolution.id_map.is_empty());
    }

    #[test]
    fn no_match_without_identity_goes_to_unresolved() {
        let inputs = vec![make_player(10, Some(111))];
        let results = SearchResponse::new();

        let resolution = resolve(&inputs, &results).unwrap();

        assert!(resolution.new_players.is_empty());
        assert_eq!(resolution.unresolved.len(), 1);
        assert_eq!(resolution.unresolved[0].tmp_id, 10);
    }
}
