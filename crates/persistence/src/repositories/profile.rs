//! Profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProfileEntity;
use crate::metrics::QueryTimer;

const PROFILE_COLUMNS: &str =
    "id, email, first_name, last_name, phone, address, role, created_at";

/// Repository for profile-related database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a profile by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_id");
        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List client profiles, optionally filtered by a case-insensitive
    /// substring match on first name, last name or email. Newest first.
    pub async fn list_clients(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_clients");
        let pattern = search.map(|s| format!("%{}%", s));
        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM profiles
            WHERE role = 'client'
              AND ($1::text IS NULL
                   OR first_name ILIKE $1
                   OR last_name ILIKE $1
                   OR email ILIKE $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// First available agent profile (oldest account), used to assign a
    /// counterpart when a client finalizes their own cart.
    pub async fn first_available_agent(&self) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("first_available_agent");
        let result = sqlx::query_as::<_, ProfileEntity>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM profiles
            WHERE role = 'agent'
            ORDER BY created_at ASC
            LIMIT 1
            "#
        ))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check that a profile exists with the client role.
    pub async fn client_exists(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_client_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1 AND role = 'client')",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
