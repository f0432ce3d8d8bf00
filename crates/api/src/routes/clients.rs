//! Client directory routes (agent/admin facing).

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::models::folder::Folder;
use domain::models::profile::{ClientSummary, Profile, UserRole};
use domain::models::quote::QuoteSummary;
use persistence::repositories::{FolderRepository, ProfileRepository, QuoteRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

/// Search parameters for the client directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClientQuery {
    /// Substring match on first name, last name or email.
    pub search: Option<String>,
}

/// Response for the client directory listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListClientsResponse {
    pub data: Vec<ClientSummary>,
}

/// Client detail: profile plus folders and quotes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClientDetailResponse {
    pub profile: Profile,
    pub folders: Vec<Folder>,
    pub quotes: Vec<QuoteSummary>,
}

/// List client profiles.
///
/// GET /api/v1/clients?search=
///
/// Agent/admin only.
pub async fn list_clients(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<ClientQuery>,
) -> Result<Json<ListClientsResponse>, ApiError> {
    if !actor.role.is_staff() {
        return Err(ApiError::Forbidden(
            "Only agents and admins can browse clients".to_string(),
        ));
    }

    let repo = ProfileRepository::new(state.pool.clone());
    let clients = repo.list_clients(query.search.as_deref()).await?;

    Ok(Json(ListClientsResponse {
        data: clients.into_iter().map(Into::into).collect(),
    }))
}

/// Client detail with their folders and quotes.
///
/// GET /api/v1/clients/:client_id
///
/// Agent/admin only.
pub async fn get_client(
    State(state): State<AppState>,
    actor: Actor,
    Path(client_id): Path<Uuid>,
) -> Result<Json<ClientDetailResponse>, ApiError> {
    if !actor.role.is_staff() {
        return Err(ApiError::Forbidden(
            "Only agents and admins can browse clients".to_string(),
        ));
    }

    let profile_repo = ProfileRepository::new(state.pool.clone());
    let profile: Profile = profile_repo
        .find_by_id(client_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?
        .into();

    if profile.role != UserRole::Client {
        return Err(ApiError::NotFound("Client not found".to_string()));
    }

    let folders = FolderRepository::new(state.pool.clone())
        .list_for_client(client_id)
        .await?;
    let quotes = QuoteRepository::new(state.pool.clone())
        .list_for_actor(client_id, UserRole::Client)
        .await?;

    Ok(Json(ClientDetailResponse {
        profile,
        folders: folders.into_iter().map(Into::into).collect(),
        quotes: quotes.into_iter().map(Into::into).collect(),
    }))
}
