//! Offer plate repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    ItemExtraEntity, OfferPlateEntity, OfferPlateStatusDb, OfferPlateSummaryEntity,
    PlateItemWithOfferEntity,
};
use crate::metrics::QueryTimer;
use domain::models::profile::UserRole;

const PLATE_COLUMNS: &str =
    "id, name, client_id, agent_id, folder_id, status, sent_at, created_at";

const SUMMARY_SELECT: &str = r#"
    SELECT
        p.id, p.name, p.client_id, p.agent_id, p.folder_id, p.status, p.created_at,
        c.first_name AS client_first_name,
        c.last_name AS client_last_name,
        c.email AS client_email,
        (SELECT COUNT(*) FROM offer_plate_items WHERE offer_plate_id = p.id) AS item_count
    FROM offer_plates p
    JOIN profiles c ON p.client_id = c.id
"#;

/// Repository for offer plate database operations.
#[derive(Clone)]
pub struct OfferPlateRepository {
    pool: PgPool,
}

impl OfferPlateRepository {
    /// Creates a new OfferPlateRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a plate by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OfferPlateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_plate_by_id");
        let result = sqlx::query_as::<_, OfferPlateEntity>(&format!(
            "SELECT {PLATE_COLUMNS} FROM offer_plates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Role-gated listing of non-draft plates, newest first.
    ///
    /// Admins see all plates, agents their own, clients their own.
    pub async fn list_for_actor(
        &self,
        actor_id: Uuid,
        role: UserRole,
    ) -> Result<Vec<OfferPlateSummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_plates_for_actor");
        let result = sqlx::query_as::<_, OfferPlateSummaryEntity>(&format!(
            r#"
            {SUMMARY_SELECT}
            WHERE p.status <> 'draft'
              AND ($2 = 'admin' OR ($2 = 'agent' AND p.agent_id = $1) OR ($2 = 'client' AND p.client_id = $1))
            ORDER BY p.created_at DESC
            "#
        ))
        .bind(actor_id)
        .bind(role.to_string())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Non-draft plates that no quote references yet, role-gated.
    ///
    /// Computed with NOT EXISTS rather than a client-side set difference.
    pub async fn list_without_quotes(
        &self,
        actor_id: Uuid,
        role: UserRole,
    ) -> Result<Vec<OfferPlateSummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_plates_without_quotes");
        let result = sqlx::query_as::<_, OfferPlateSummaryEntity>(&format!(
            r#"
            {SUMMARY_SELECT}
            WHERE p.status <> 'draft'
              AND NOT EXISTS (SELECT 1 FROM quotes q WHERE q.offer_plate_id = p.id)
              AND ($2 = 'admin' OR ($2 = 'agent' AND p.agent_id = $1) OR ($2 = 'client' AND p.client_id = $1))
            ORDER BY p.created_at DESC
            "#
        ))
        .bind(actor_id)
        .bind(role.to_string())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Plates filed under a folder, newest first.
    pub async fn list_for_folder(
        &self,
        folder_id: Uuid,
    ) -> Result<Vec<OfferPlateSummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_plates_for_folder");
        let result = sqlx::query_as::<_, OfferPlateSummaryEntity>(&format!(
            r#"
            {SUMMARY_SELECT}
            WHERE p.folder_id = $1
            ORDER BY p.created_at DESC
            "#
        ))
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Line items of a plate joined with offer details.
    pub async fn list_items(
        &self,
        plate_id: Uuid,
    ) -> Result<Vec<PlateItemWithOfferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_plate_items");
        let result = sqlx::query_as::<_, PlateItemWithOfferEntity>(
            r#"
            SELECT
                i.id, i.offer_plate_id, i.offer_id, i.quantity,
                o.name AS offer_name,
                o.description AS offer_description,
                o.price_monthly, o.setup_fee, o.category, o.image_url
            FROM offer_plate_items i
            JOIN offers o ON i.offer_id = o.id
            WHERE i.offer_plate_id = $1
            ORDER BY o.name
            "#,
        )
        .bind(plate_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Selected extras of all line items of a plate.
    pub async fn list_item_extras(
        &self,
        plate_id: Uuid,
    ) -> Result<Vec<ItemExtraEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_plate_item_extras");
        let result = sqlx::query_as::<_, ItemExtraEntity>(
            r#"
            SELECT
                x.item_id, x.extra_id, x.quantity,
                e.name AS extra_name,
                e.unit_price
            FROM offer_plate_item_extras x
            JOIN offer_extras e ON x.extra_id = e.id
            JOIN offer_plate_items i ON x.item_id = i.id
            WHERE i.offer_plate_id = $1
            ORDER BY e.name
            "#,
        )
        .bind(plate_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Conditionally move a plate from one status to another.
    ///
    /// The WHERE clause pins the expected current status so two concurrent
    /// writers cannot race an illegal edge through; zero rows affected
    /// means the plate moved in the meantime (or never existed).
    pub async fn update_status_guarded(
        &self,
        id: Uuid,
        from: OfferPlateStatusDb,
        to: OfferPlateStatusDb,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_plate_status");
        let result = sqlx::query(
            "UPDATE offer_plates SET status = $3 WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: OfferPlateRepository tests require a database connection and are
    // covered by integration tests.
}
