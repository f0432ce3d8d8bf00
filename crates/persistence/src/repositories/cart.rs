//! Cart repository for database operations.
//!
//! The cart is the client's single draft offer plate. The partial unique
//! index `offer_plates_one_draft_per_client` guarantees at most one draft
//! per client; every read here uses `fetch_optional` against it.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{OfferPlateEntity, PlateItemEntity};
use crate::metrics::QueryTimer;

const PLATE_COLUMNS: &str =
    "id, name, client_id, agent_id, folder_id, status, sent_at, created_at";

const ITEM_COLUMNS: &str = "id, offer_plate_id, offer_id, quantity";

/// Repository for cart (draft plate) database operations.
#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    /// Creates a new CartRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the client's draft plate, if any.
    pub async fn find_draft_plate(
        &self,
        client_id: Uuid,
    ) -> Result<Option<OfferPlateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_draft_plate");
        let result = sqlx::query_as::<_, OfferPlateEntity>(&format!(
            "SELECT {PLATE_COLUMNS} FROM offer_plates WHERE client_id = $1 AND status = 'draft'"
        ))
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the client's draft plate or create an empty one.
    ///
    /// The insert races against the partial unique index; on conflict the
    /// concurrently created draft is re-read instead of failing.
    pub async fn get_or_create_draft(
        &self,
        client_id: Uuid,
    ) -> Result<OfferPlateEntity, sqlx::Error> {
        if let Some(plate) = self.find_draft_plate(client_id).await? {
            return Ok(plate);
        }

        let timer = QueryTimer::new("create_draft_plate");
        let inserted = sqlx::query_as::<_, OfferPlateEntity>(&format!(
            r#"
            INSERT INTO offer_plates (name, client_id, agent_id, status)
            VALUES ('Mon panier', $1, $1, 'draft')
            ON CONFLICT (client_id) WHERE status = 'draft' DO NOTHING
            RETURNING {PLATE_COLUMNS}
            "#
        ))
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        match inserted {
            Some(plate) => Ok(plate),
            None => self
                .find_draft_plate(client_id)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// Add an offer to the draft plate.
    ///
    /// Adding an offer already in the cart increments that line's quantity
    /// atomically instead of duplicating rows.
    pub async fn add_item(
        &self,
        plate_id: Uuid,
        offer_id: Uuid,
        quantity: i32,
    ) -> Result<PlateItemEntity, sqlx::Error> {
        let timer = QueryTimer::new("add_cart_item");
        let result = sqlx::query_as::<_, PlateItemEntity>(&format!(
            r#"
            INSERT INTO offer_plate_items (offer_plate_id, offer_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (offer_plate_id, offer_id)
            DO UPDATE SET quantity = offer_plate_items.quantity + EXCLUDED.quantity
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(plate_id)
        .bind(offer_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set a line item's quantity. Scoped to the plate so one client cannot
    /// mutate another's cart rows.
    pub async fn update_item_quantity(
        &self,
        plate_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_cart_item_quantity");
        let result = sqlx::query(
            "UPDATE offer_plate_items SET quantity = $3 WHERE id = $2 AND offer_plate_id = $1",
        )
        .bind(plate_id)
        .bind(item_id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Remove a line item from the plate.
    pub async fn remove_item(&self, plate_id: Uuid, item_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("remove_cart_item");
        let result =
            sqlx::query("DELETE FROM offer_plate_items WHERE id = $2 AND offer_plate_id = $1")
                .bind(plate_id)
                .bind(item_id)
                .execute(&self.pool)
                .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Replace a line item's selected extras.
    ///
    /// Each selection is inserted through a join that checks the extra
    /// belongs to the line's offer; a selection that doesn't match inserts
    /// zero rows and is reported as not found.
    pub async fn set_item_extras(
        &self,
        plate_id: Uuid,
        item_id: Uuid,
        selections: &[(Uuid, i32)],
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("set_cart_item_extras");
        let mut tx = self.pool.begin().await?;

        // The item must belong to the caller's plate.
        let owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM offer_plate_items WHERE id = $1 AND offer_plate_id = $2)",
        )
        .bind(item_id)
        .bind(plate_id)
        .fetch_one(&mut *tx)
        .await?;
        if !owned {
            return Err(sqlx::Error::RowNotFound);
        }

        sqlx::query("DELETE FROM offer_plate_item_extras WHERE item_id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        for (extra_id, quantity) in selections {
            let inserted = sqlx::query(
                r#"
                INSERT INTO offer_plate_item_extras (item_id, extra_id, quantity)
                SELECT i.id, e.id, $3
                FROM offer_plate_items i
                JOIN offer_extras e ON e.offer_id = i.offer_id
                WHERE i.id = $1 AND e.id = $2
                "#,
            )
            .bind(item_id)
            .bind(extra_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

            if inserted.rows_affected() == 0 {
                return Err(sqlx::Error::RowNotFound);
            }
        }

        tx.commit().await?;
        timer.record();
        Ok(())
    }

    /// Finalize the draft into a sent plate, atomically.
    ///
    /// In one transaction: insert the sent plate, copy the draft's line
    /// items and their extras, then empty the draft. The draft row itself
    /// stays behind (with zero items) so the next add-to-cart reuses it.
    pub async fn finalize(
        &self,
        draft_id: Uuid,
        name: &str,
        client_id: Uuid,
        agent_id: Uuid,
        folder_id: Option<Uuid>,
    ) -> Result<OfferPlateEntity, sqlx::Error> {
        let timer = QueryTimer::new("finalize_cart");
        let mut tx = self.pool.begin().await?;

        let plate = sqlx::query_as::<_, OfferPlateEntity>(&format!(
            r#"
            INSERT INTO offer_plates (name, client_id, agent_id, folder_id, status, sent_at)
            VALUES ($1, $2, $3, $4, 'sent', NOW())
            RETURNING {PLATE_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(client_id)
        .bind(agent_id)
        .bind(folder_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO offer_plate_items (offer_plate_id, offer_id, quantity)
            SELECT $1, offer_id, quantity
            FROM offer_plate_items
            WHERE offer_plate_id = $2
            "#,
        )
        .bind(plate.id)
        .bind(draft_id)
        .execute(&mut *tx)
        .await?;

        // Copy extras across via the (plate, offer) uniqueness of line items.
        sqlx::query(
            r#"
            INSERT INTO offer_plate_item_extras (item_id, extra_id, quantity)
            SELECT ni.id, x.extra_id, x.quantity
            FROM offer_plate_item_extras x
            JOIN offer_plate_items oi ON oi.id = x.item_id
            JOIN offer_plate_items ni
              ON ni.offer_plate_id = $1 AND ni.offer_id = oi.offer_id
            WHERE oi.offer_plate_id = $2
            "#,
        )
        .bind(plate.id)
        .bind(draft_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM offer_plate_items WHERE offer_plate_id = $1")
            .bind(draft_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(plate)
    }
}

#[cfg(test)]
mod tests {
    // Note: CartRepository tests require a database connection and are
    // covered by integration tests.
}
