//! Folder routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::folder::{CreateFolderRequest, Folder, FolderDetail, ListFoldersResponse};
use persistence::repositories::{
    FolderRepository, OfferPlateRepository, ProfileRepository, QuoteRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

/// Create a folder pairing a client with the creating agent.
///
/// POST /api/v1/folders
///
/// Agent/admin only.
pub async fn create_folder(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<Folder>), ApiError> {
    if !actor.role.is_staff() {
        return Err(ApiError::Forbidden(
            "Only agents and admins can create folders".to_string(),
        ));
    }
    request.validate()?;

    let profile_repo = ProfileRepository::new(state.pool.clone());
    if !profile_repo.client_exists(request.client_id).await? {
        return Err(ApiError::NotFound("Client not found".to_string()));
    }

    let folder = FolderRepository::new(state.pool.clone())
        .create(&request.name, request.client_id, actor.id)
        .await?;

    info!(
        folder_id = %folder.id,
        client_id = %request.client_id,
        agent_id = %actor.id,
        "Folder created"
    );

    Ok((StatusCode::CREATED, Json(folder.into())))
}

/// Role-gated folder listing with content counts, newest first.
///
/// GET /api/v1/folders
pub async fn list_folders(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<ListFoldersResponse>, ApiError> {
    let repo = FolderRepository::new(state.pool.clone());
    let folders = repo.list_for_actor(actor.id, actor.role).await?;

    Ok(Json(ListFoldersResponse {
        data: folders.into_iter().map(Into::into).collect(),
    }))
}

/// Folder detail with its plates and quotes.
///
/// GET /api/v1/folders/:folder_id
pub async fn get_folder(
    State(state): State<AppState>,
    actor: Actor,
    Path(folder_id): Path<Uuid>,
) -> Result<Json<FolderDetail>, ApiError> {
    let repo = FolderRepository::new(state.pool.clone());
    let folder = repo
        .find_by_id(folder_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Folder not found".to_string()))?;

    if !actor.can_access(folder.client_id, folder.agent_id) {
        return Err(ApiError::NotFound("Folder not found".to_string()));
    }

    let plates = OfferPlateRepository::new(state.pool.clone())
        .list_for_folder(folder_id)
        .await?;
    let quotes = QuoteRepository::new(state.pool.clone())
        .list_for_folder(folder_id)
        .await?;

    Ok(Json(FolderDetail {
        folder: folder.into(),
        offer_plates: plates.into_iter().map(Into::into).collect(),
        quotes: quotes.into_iter().map(Into::into).collect(),
    }))
}
