use anyhow::Result;
use log::info;

use crate::config::settings::PollingSettings;
use crate::domain::{PlayerInfo, SourceFile, TournamentDocument};
use crate::reconcile::{enrichment, mutator, remap, resolver, Resolution};
use crate::reference::ReferenceDatabase;
use crate::registry::RegistryApi;
use crate::services::publish::{PublishOutcome, Publisher};

/// Runs the whole pipeline for one tournament: reconcile every decoded
/// player against the registry, rewrite the graph onto registry ids and
/// publish the result.
pub struct UploadService<'a, R, D> {
    registry: &'a R,
    reference: &'a D,
    polling: &'a PollingSettings,
}

impl<'a, R, D> UploadService<'a, R, D>
where
    R: RegistryApi + Sync,
    D: ReferenceDatabase + Sync,
{
    pub fn new(registry: &'a R, reference: &'a D, polling: &'a PollingSettings) -> Self {
        Self {
            registry,
            reference,
            polling,
        }
    }

    pub async fn run(
        &self,
        mut document: TournamentDocument,
        source: SourceFile,
    ) -> Result<PublishOutcome> {
        info!("=== Starting Tournament Upload ===\n");

        // Step 1: Match decoded players against the registry
        let players = document.sorted_player_infos();
        let mut resolution = self.match_players(&players).await?;

        // Step 2: Enrich the players the registry did not recognize
        if !resolution.unresolved.is_empty() {
            self.enrich_players(&mut resolution).await?;
        }

        // Step 3: Create the players that are new to the registry
        if !resolution.new_players.is_empty() {
            self.create_players(&mut resolution).await?;
        }

        // Step 4: Post the queued license corrections
        if !resolution.to_update.is_empty() {
            self.update_players(&mut resolution).await?;
        }

        // Step 5: Rewrite the graph onto registry ids
        self.remap_references(&mut document, &resolution)?;

        // Step 6: Publish the tournament
        let outcome = self.publish(&document, &source).await?;

        info!("=== Upload Complete ===");
        Ok(outcome)
    }

    async fn match_players(&self, players: &[PlayerInfo]) -> Result<Resolution> {
        info!("Step 1: Matching {} players against the registry...", players.len());

        let results = self.registry.search_players(players).await?;
        let resolution = resolver::resolve(players, &results)?;
        info!(
            "  → {} matched, {} unresolved, {} new, {} license corrections\n",
            resolution.id_map.len(),
            resolution.unresolved.len(),
            resolution.new_players.len(),
            resolution.to_update.len()
        );
        Ok(resolution)
    }

    async fn enrich_players(&self, resolution: &mut Resolution) -> Result<()> {
        info!(
            "Step 2: Enriching {} players from the reference database...",
            resolution.unresolved.len()
        );

        enrichment::enrich_and_resolve(self.registry, self.reference, resolution).await?;
        info!("  → Every player is now matched or queued for creation\n");
        Ok(())
    }

    async fn create_players(&self, resolution: &mut Resolution) -> Result<()> {
        info!(
            "Step 3: Creating {} players in the registry...",
            resolution.new_players.len()
        );

        mutator::commit_new_players(self.registry, resolution).await?;
        info!("  → The registry assigned ids to the new players\n");
        Ok(())
    }

    async fn update_players(&self, resolution: &mut Resolution) -> Result<()> {
        info!(
            "Step 4: Updating {} registry entries with local license numbers...",
            resolution.to_update.len()
        );

        mutator::commit_license_updates(self.registry, resolution).await?;
        info!("  → The registry accepted the corrections\n");
        Ok(())
    }

    fn remap_references(
        &self,
        document: &mut TournamentDocument,
        resolution: &Resolution,
    ) -> Result<()> {
        info!("Step 5: Rewriting player references to registry ids...");

        remap::remap_player_references(document, &resolution.id_map)?;
        info!("  → All references now carry registry ids\n");
        Ok(())
    }

    async fn publish(
        &self,
        document: &TournamentDocument,
        source: &SourceFile,
    ) -> Result<PublishOutcome> {
        info!("Step 6: Publishing the tournament...");

        let publisher = Publisher::new(self.registry, self.polling);
        let outcome = publisher.publish(&document.tournament, source).await?;
        match outcome {
            PublishOutcome::Created => info!("  → Created the tournament in the registry\n"),
            PublishOutcome::Replaced => info!("  → Replaced the tournament in the registry\n"),
        }
        Ok(outcome)
    }
}
