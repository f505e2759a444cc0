use crate::errors::UploadError;
use crate::reconcile::types::Resolution;
use crate::registry::RegistryApi;

/// Create the resolver's new players in the registry and merge the
/// returned permanent ids into the resolution.
///
/// The registry must echo each created player's temporary id back; the
/// mapping is only trusted once every posted player is found in it.
pub async fn commit_new_players<R>(
    registry: &R,
    resolution: &mut Resolution,
) -> Result<(), UploadError>
where
    R: RegistryApi + Sync,
{
    let new_players = std::mem::take(&mut resolution.new_players);

    let created = registry.add_players(&new_players).await?;
    for record in &created {
        let tmp_id = record.tmp_id.ok_or(UploadError::MissingTmpIds)?;
        resolution.id_map.insert(tmp_id, record.id);
    }

    for player in &new_players {
        let id = resolution
            .id_map
            .get(&player.tmp_id)
            .copied()
            .ok_or_else(|| UploadError::PlayerNotAdded(player.display()))?;
        let name = player.full_name().unwrap_or_else(|| player.display());
        resolution.name_map.insert(id, name);
    }
    Ok(())
}

/// Post the queued license corrections; the registry acknowledges with a
/// plain boolean.
pub async fn commit_license_updates<R>(
    registry: &R,
    resolution: &mut Resolution,
) -> Result<(), UploadError>
where
    R: RegistryApi + Sync,
{
    let updates = std::mem::take(&mut resolution.to_update);

    let accepted = registry.update_players(&updates).await?;
    if !accepted {
        return Err(UploadError::UpdateRejected);
    }
    Ok(())
}
