//! Offer catalog repository for database operations.

use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::{OfferEntity, OfferExtraEntity, OfferFeatureEntity};
use crate::metrics::QueryTimer;
use domain::models::offer::{CreateOfferRequest, Offer, UpdateOfferRequest};

const OFFER_COLUMNS: &str = "id, name, description, price_monthly, setup_fee, category, \
     image_url, is_active, created_at";

/// Repository for offer catalog database operations.
#[derive(Clone)]
pub struct OfferRepository {
    pool: PgPool,
}

impl OfferRepository {
    /// Creates a new OfferRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List active offers with their feature lists.
    ///
    /// `search` is a case-insensitive substring match on the name;
    /// `category` is an exact filter. Ordered by name.
    pub async fn list_active(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Offer>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_offers");
        let pattern = search.map(|s| format!("%{}%", s));
        let offers = sqlx::query_as::<_, OfferEntity>(&format!(
            r#"
            SELECT {OFFER_COLUMNS}
            FROM offers
            WHERE is_active = true
              AND ($1::text IS NULL OR name ILIKE $1)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY name
            "#
        ))
        .bind(pattern)
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        let mut features = self
            .features_by_offer(offers.iter().map(|o| o.id).collect())
            .await?;

        Ok(offers
            .into_iter()
            .map(|offer| {
                let offer_features = features.remove(&offer.id).unwrap_or_default();
                offer.into_model(offer_features)
            })
            .collect())
    }

    /// Find an offer by ID, with features.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Offer>, sqlx::Error> {
        let timer = QueryTimer::new("find_offer_by_id");
        let offer = sqlx::query_as::<_, OfferEntity>(&format!(
            "SELECT {OFFER_COLUMNS} FROM offers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();

        match offer {
            Some(offer) => {
                let mut features = self.features_by_offer(vec![offer.id]).await?;
                let offer_features = features.remove(&offer.id).unwrap_or_default();
                Ok(Some(offer.into_model(offer_features)))
            }
            None => Ok(None),
        }
    }

    /// Find an active offer row without features (cart validation path).
    pub async fn find_active_entity(&self, id: Uuid) -> Result<Option<OfferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_offer");
        let result = sqlx::query_as::<_, OfferEntity>(&format!(
            "SELECT {OFFER_COLUMNS} FROM offers WHERE id = $1 AND is_active = true"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Distinct category values, sorted.
    pub async fn list_categories(&self) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("list_offer_categories");
        let result = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM offers WHERE is_active = true ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List purchasable add-ons for an offer.
    pub async fn list_extras(&self, offer_id: Uuid) -> Result<Vec<OfferExtraEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_offer_extras");
        let result = sqlx::query_as::<_, OfferExtraEntity>(
            r#"
            SELECT id, offer_id, name, unit_price
            FROM offer_extras
            WHERE offer_id = $1
            ORDER BY name
            "#,
        )
        .bind(offer_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create an offer with its features and extras in one transaction.
    pub async fn create(&self, request: &CreateOfferRequest) -> Result<Offer, sqlx::Error> {
        let timer = QueryTimer::new("create_offer");
        let mut tx = self.pool.begin().await?;

        let offer = sqlx::query_as::<_, OfferEntity>(&format!(
            r#"
            INSERT INTO offers (name, description, price_monthly, setup_fee, category, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {OFFER_COLUMNS}
            "#
        ))
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price_monthly)
        .bind(request.setup_fee)
        .bind(&request.category)
        .bind(&request.image_url)
        .fetch_one(&mut *tx)
        .await?;

        for feature in &request.features {
            sqlx::query("INSERT INTO offer_features (offer_id, feature) VALUES ($1, $2)")
                .bind(offer.id)
                .bind(feature)
                .execute(&mut *tx)
                .await?;
        }

        for extra in &request.extras {
            sqlx::query("INSERT INTO offer_extras (offer_id, name, unit_price) VALUES ($1, $2, $3)")
                .bind(offer.id)
                .bind(&extra.name)
                .bind(extra.unit_price)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(offer.into_model(request.features.clone()))
    }

    /// Partially update an offer. Absent fields keep their current value.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateOfferRequest,
    ) -> Result<Option<OfferEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_offer");
        let result = sqlx::query_as::<_, OfferEntity>(&format!(
            r#"
            UPDATE offers
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price_monthly = COALESCE($4, price_monthly),
                setup_fee = COALESCE($5, setup_fee),
                category = COALESCE($6, category),
                image_url = COALESCE($7, image_url),
                is_active = COALESCE($8, is_active)
            WHERE id = $1
            RETURNING {OFFER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.price_monthly)
        .bind(request.setup_fee)
        .bind(&request.category)
        .bind(&request.image_url)
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Soft-delete an offer by hiding it from the catalog.
    pub async fn deactivate(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("deactivate_offer");
        let result = sqlx::query("UPDATE offers SET is_active = false WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Feature rows grouped by offer.
    async fn features_by_offer(
        &self,
        offer_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<String>>, sqlx::Error> {
        if offer_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let timer = QueryTimer::new("list_offer_features");
        let rows = sqlx::query_as::<_, OfferFeatureEntity>(
            r#"
            SELECT id, offer_id, feature
            FROM offer_features
            WHERE offer_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&offer_ids)
        .fetch_all(&self.pool)
        .await?;
        timer.record();

        let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in rows {
            grouped.entry(row.offer_id).or_default().push(row.feature);
        }
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    // Note: OfferRepository tests require a database connection and are
    // covered by integration tests.
}
