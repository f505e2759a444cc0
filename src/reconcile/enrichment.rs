use log::info;
use std::collections::HashMap;

use crate::domain::PlayerInfo;
use crate::errors::UploadError;
use crate::reconcile::resolver;
use crate::reconcile::types::Resolution;
use crate::reference::{ReferenceDatabase, ReferenceEntry};
use crate::registry::RegistryApi;

/// Fill in the identity of unresolved players from the reference database,
/// then run the resolver once more over just those players.
///
/// This is the only retry in the pipeline: players the second pass still
/// cannot place are a hard failure, never a third search.
pub async fn enrich_and_resolve<R, D>(
    registry: &R,
    reference: &D,
    resolution: &mut Resolution,
) -> Result<(), UploadError>
where
    R: RegistryApi + Sync,
    D: ReferenceDatabase + Sync,
{
    let mut players = std::mem::take(&mut resolution.unresolved);

    let licenses: Vec<i64> = players.iter().filter_map(|p| p.license_number).collect();
    let entries = reference
        .lookup(&licenses)
        .await
        .map_err(UploadError::Reference)?;
    for player in &mut players {
        apply_entry(player, &entries);
    }
    verify_enriched(&players)?;

    info!("  → Searching the enriched players in the registry...");
    let results = registry.search_players(&players).await?;
    let second_pass = resolver::resolve(&players, &results)?;
    if !second_pass.unresolved.is_empty() {
        return Err(UploadError::EnrichmentIncomplete);
    }
    resolution.merge(second_pass);
    Ok(())
}

/// Copy whichever fields the reference database knows into the gaps the
/// decoder left. Fields the player already carries are kept.
fn apply_entry(player: &mut PlayerInfo, entries: &HashMap<i64, ReferenceEntry>) {
    let Some(license) = player.license_number else {
        return;
    };
    let Some(entry) = entries.get(&license) else {
        return;
    };
    if player.first_name.is_none() {
        player.first_name = entry.first_name.clone();
    }
    if player.last_name.is_none() {
        player.last_name = entry.last_name.clone();
    }
    if player.birthday.is_none() {
        if let Some(birthday) = entry.birthday {
            player.set_birthday(birthday);
        }
    }
}

fn verify_enriched(players: &[PlayerInfo]) -> Result<(), UploadError> {
    let missing: Vec<String> = players
        .iter()
        .filter(|player| !player.has_full_identity())
        .map(|player| match player.license_number {
            Some(license) => license.to_string(),
            None => "?".to_string(),
        })
        .collect();
    if !missing.is_empty() {
        return Err(UploadError::PlayersNotInReference(missing.join(", ")));
    }
    Ok(())
}
