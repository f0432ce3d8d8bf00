//! Quote repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{PaymentInfoEntity, QuoteEntity, QuoteStatusDb, QuoteSummaryEntity};
use crate::metrics::QueryTimer;
use domain::models::profile::UserRole;

const QUOTE_COLUMNS: &str = "id, reference, offer_plate_id, client_id, agent_id, folder_id, \
     total_amount, status, payment_status, created_at";

const SUMMARY_SELECT: &str = r#"
    SELECT
        q.id, q.reference, q.offer_plate_id, q.client_id, q.agent_id,
        q.total_amount, q.status, q.payment_status, q.created_at,
        p.name AS offer_plate_name,
        c.first_name AS client_first_name,
        c.last_name AS client_last_name,
        c.email AS client_email
    FROM quotes q
    JOIN offer_plates p ON q.offer_plate_id = p.id
    JOIN profiles c ON q.client_id = c.id
"#;

/// Repository for quote database operations.
#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    /// Creates a new QuoteRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a quote from a sent offer plate.
    ///
    /// The total amount is computed by the caller once, here at creation
    /// time, and never recomputed afterwards.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        reference: &str,
        offer_plate_id: Uuid,
        client_id: Uuid,
        agent_id: Uuid,
        folder_id: Option<Uuid>,
        total_amount: f64,
    ) -> Result<QuoteEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_quote");
        let result = sqlx::query_as::<_, QuoteEntity>(&format!(
            r#"
            INSERT INTO quotes (reference, offer_plate_id, client_id, agent_id, folder_id, total_amount)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {QUOTE_COLUMNS}
            "#
        ))
        .bind(reference)
        .bind(offer_plate_id)
        .bind(client_id)
        .bind(agent_id)
        .bind(folder_id)
        .bind(total_amount)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a quote by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<QuoteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_quote_by_id");
        let result = sqlx::query_as::<_, QuoteEntity>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Role-gated listing, newest first.
    ///
    /// Admins see all quotes, agents their own, clients their own.
    pub async fn list_for_actor(
        &self,
        actor_id: Uuid,
        role: UserRole,
    ) -> Result<Vec<QuoteSummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_quotes_for_actor");
        let result = sqlx::query_as::<_, QuoteSummaryEntity>(&format!(
            r#"
            {SUMMARY_SELECT}
            WHERE ($2 = 'admin' OR ($2 = 'agent' AND q.agent_id = $1) OR ($2 = 'client' AND q.client_id = $1))
            ORDER BY q.created_at DESC
            "#
        ))
        .bind(actor_id)
        .bind(role.to_string())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Quotes filed under a folder, newest first.
    pub async fn list_for_folder(
        &self,
        folder_id: Uuid,
    ) -> Result<Vec<QuoteSummaryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_quotes_for_folder");
        let result = sqlx::query_as::<_, QuoteSummaryEntity>(&format!(
            r#"
            {SUMMARY_SELECT}
            WHERE q.folder_id = $1
            ORDER BY q.created_at DESC
            "#
        ))
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether a quote already references the plate.
    pub async fn exists_for_plate(&self, offer_plate_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_quote_exists_for_plate");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM quotes WHERE offer_plate_id = $1)",
        )
        .bind(offer_plate_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Conditionally move a quote from one status to another.
    ///
    /// The WHERE clause pins the expected current status; zero rows
    /// affected means a concurrent writer got there first.
    pub async fn update_status_guarded(
        &self,
        id: Uuid,
        from: QuoteStatusDb,
        to: QuoteStatusDb,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_quote_status");
        let result = sqlx::query("UPDATE quotes SET status = $3 WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(from)
            .bind(to)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Mark a quote as paid.
    ///
    /// Unconditional: the provider may deliver the same callback twice and
    /// the second write is a no-op.
    pub async fn mark_paid(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_quote_paid");
        let result = sqlx::query("UPDATE quotes SET payment_status = 'paid' WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Create or replace the bank details attached to a quote.
    pub async fn upsert_payment_info(
        &self,
        quote_id: Uuid,
        bank_name: &str,
        iban: &str,
        bic: &str,
    ) -> Result<PaymentInfoEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_payment_info");
        let result = sqlx::query_as::<_, PaymentInfoEntity>(
            r#"
            INSERT INTO payment_info (quote_id, bank_name, iban, bic)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (quote_id)
            DO UPDATE SET bank_name = EXCLUDED.bank_name,
                          iban = EXCLUDED.iban,
                          bic = EXCLUDED.bic
            RETURNING id, quote_id, bank_name, iban, bic, created_at
            "#,
        )
        .bind(quote_id)
        .bind(bank_name)
        .bind(iban)
        .bind(bic)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Bank details attached to a quote, if any.
    pub async fn find_payment_info(
        &self,
        quote_id: Uuid,
    ) -> Result<Option<PaymentInfoEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_payment_info");
        let result = sqlx::query_as::<_, PaymentInfoEntity>(
            "SELECT id, quote_id, bank_name, iban, bic, created_at FROM payment_info WHERE quote_id = $1",
        )
        .bind(quote_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: QuoteRepository tests require a database connection and are
    // covered by integration tests.
}
