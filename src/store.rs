use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::AnalysisResults;

/// Single slot the latest analysis is kept under.
pub const RESULTS_KEY: &str = "analysisResults";

#[derive(Debug, Clone)]
pub struct StoredRun {
    pub run_id: Uuid,
    pub stored_at: DateTime<Utc>,
    pub results: AnalysisResults,
}

/// Holds the most recent analysis between commands. Saving replaces whatever
/// was stored before; clearing empties the slot.
pub struct SessionStore {
    pool: PgPool,
}

impl SessionStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("failed to connect to Postgres")?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn save(&self, results: &AnalysisResults) -> anyhow::Result<Uuid> {
        let run_id = Uuid::new_v4();
        let payload = serde_json::to_string(results).context("failed to encode results")?;

        sqlx::query(
            r#"
            INSERT INTO plagiarism_results.session_results
            (storage_key, run_id, assignment_name, payload, stored_at)
            VALUES ($1, $2, $3, $4, now())
            ON CONFLICT (storage_key) DO UPDATE
            SET run_id = EXCLUDED.run_id,
                assignment_name = EXCLUDED.assignment_name,
                payload = EXCLUDED.payload,
                stored_at = EXCLUDED.stored_at
            "#,
        )
        .bind(RESULTS_KEY)
        .bind(run_id)
        .bind(&results.assignment_name)
        .bind(payload)
        .execute(&self.pool)
        .await
        .context("failed to store results")?;

        info!(%run_id, assignment = %results.assignment_name, "results stored");
        Ok(run_id)
    }

    /// The stored analysis, or `None` when nothing usable is stored.
    pub async fn load(&self) -> anyhow::Result<Option<StoredRun>> {
        let row = sqlx::query(
            "SELECT run_id, payload, stored_at FROM plagiarism_results.session_results \
             WHERE storage_key = $1",
        )
        .bind(RESULTS_KEY)
        .fetch_optional(&self.pool)
        .await
        .context("failed to read stored results")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let run_id: Uuid = row.get("run_id");
        let payload: String = row.get("payload");
        match decode_payload(&payload) {
            Some(results) => Ok(Some(StoredRun {
                run_id,
                stored_at: row.get("stored_at"),
                results,
            })),
            None => {
                warn!(%run_id, "stored results are malformed; ignoring them");
                Ok(None)
            }
        }
    }

    /// Returns whether anything was removed.
    pub async fn clear(&self) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "DELETE FROM plagiarism_results.session_results WHERE storage_key = $1",
        )
        .bind(RESULTS_KEY)
        .execute(&self.pool)
        .await
        .context("failed to clear stored results")?;
        Ok(result.rows_affected() > 0)
    }
}

pub fn decode_payload(payload: &str) -> Option<AnalysisResults> {
    serde_json::from_str(payload).ok()
}
