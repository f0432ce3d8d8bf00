//! Folder repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{FolderEntity, FolderSummaryEntity};
use crate::metrics::QueryTimer;
use domain::models::profile::UserRole;

const FOLDER_COLUMNS: &str = "id, name, client_id, agent_id, created_at";

/// Repository for folder database operations.
#[derive(Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Creates a new FolderRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a folder pairing a client with an agent.
    pub async fn create(
        &self,
        name: &str,
        client_id: Uuid,
        agent_id: Uuid,
    ) -> Result<FolderEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_folder");
        let result = sqlx::query_as::<_, FolderEntity>(&format!(
            r#"
            INSERT INTO folders (name, client_id, agent_id)
            VALUES ($1, $2, $3)
            RETURNING {FOLDER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(client_id)
        .bind(agent_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FolderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_folder_by_id");
        let result = sqlx::query_as::<_, FolderEntity>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Role-gated listing with content counts, newest first.
    ///
    /// Admins see all folders, agents their own, clients their own.
    pub async fn list_for_actor(
        &self,
        actor_id: Uuid,
        role: UserRole,
    ) -> Result<Vec<FolderSummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_folders_for_actor");
        let result = sqlx::query_as::<_, FolderSummaryEntity>(
            r#"
            SELECT
                f.id, f.name, f.client_id, f.agent_id, f.created_at,
                c.first_name AS client_first_name,
                c.last_name AS client_last_name,
                c.email AS client_email,
                (SELECT COUNT(*) FROM offer_plates WHERE folder_id = f.id) AS plate_count,
                (SELECT COUNT(*) FROM quotes WHERE folder_id = f.id) AS quote_count
            FROM folders f
            JOIN profiles c ON f.client_id = c.id
            WHERE ($2 = 'admin' OR ($2 = 'agent' AND f.agent_id = $1) OR ($2 = 'client' AND f.client_id = $1))
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(actor_id)
        .bind(role.to_string())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Folders of one client, newest first (client detail view).
    pub async fn list_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<FolderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_folders_for_client");
        let result = sqlx::query_as::<_, FolderEntity>(&format!(
            r#"
            SELECT {FOLDER_COLUMNS}
            FROM folders
            WHERE client_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
