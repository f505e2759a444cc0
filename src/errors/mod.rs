use thiserror::Error;

use crate::http::ApiError;

/// Everything that can abort an upload attempt. Nothing here is retried;
/// each variant surfaces once as the terminal failure of the pipeline.
#[derive(Debug, Error)]
pub enum UploadError {
    /// More than one registry candidate matched at least one player.
    #[error("The following players are ambiguous in the registry: {0}")]
    AmbiguousPlayers(String),
    /// Enrichment left players without a full identity; lists their
    /// license numbers.
    #[error("Players not found in the reference database: {0}")]
    PlayersNotInReference(String),
    /// The second resolver pass still produced unresolved players.
    #[error("players remained unresolved after the enrichment pass")]
    EnrichmentIncomplete,
    #[error("registry returned created players without their temporary ids")]
    MissingTmpIds,
    #[error("player {0} was not added to the registry")]
    PlayerNotAdded(String),
    #[error("player update was rejected by the registry")]
    UpdateRejected,
    /// A player never made it into the id map before remapping.
    #[error("could not find or add player {0}")]
    UnmappedPlayer(String),
    /// A player reference in the graph has no registry id.
    #[error("no registry id mapped for player reference {0}")]
    MissingId(i64),
    #[error("the source file upload was rejected by the registry")]
    FileRejected,
    /// Terminal job state without a recognized success outcome.
    #[error("the registry reported a failure while processing the tournament")]
    PublishFailed,
    #[error("tournament processing did not finish within {0} seconds")]
    PublishTimeout(u64),
    #[error("reference database lookup failed: {0}")]
    Reference(anyhow::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}
