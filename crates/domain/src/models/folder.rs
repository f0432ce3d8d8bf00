//! Folder domain models.
//!
//! A folder groups offer plates and quotes under one client/agent pairing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A grouping of offer plates and quotes for one client-agent relationship.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub client_id: Uuid,
    pub agent_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Folder entry in listings, with the client's display name joined.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FolderSummary {
    pub id: Uuid,
    pub name: String,
    pub client_id: Uuid,
    pub client_name: String,
    pub agent_id: Uuid,
    pub plate_count: i64,
    pub quote_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Folder detail: the folder plus its plates and quotes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FolderDetail {
    #[serde(flatten)]
    pub folder: Folder,
    pub offer_plates: Vec<super::offer_plate::OfferPlateSummary>,
    pub quotes: Vec<super::quote::QuoteSummary>,
}

/// Request to create a folder (agent/admin only).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateFolderRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,

    pub client_id: Uuid,
}

/// Response for folder listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListFoldersResponse {
    pub data: Vec<FolderSummary>,
}
