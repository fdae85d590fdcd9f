//! Reference biomarker definitions and their backing source
//!
//! The authoritative biomarker table lives in Postgres; [`ReferenceSource`]
//! abstracts the fetch so the validator and cache can be tested against
//! in-memory sources.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::future::Future;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};

/// A biomarker definition row from the reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomarkerReference {
    /// Canonical code, unique in the reference table
    pub code: String,
    /// Display name
    pub name: String,
    /// Preferred reporting unit, when the table records one
    pub unit: Option<String>,
}

/// Source of reference biomarker definitions.
///
/// Implementations must be cheap to share across tasks; the cache holds one
/// instance for the life of the process.
pub trait ReferenceSource: Send + Sync {
    /// Fetch every reference definition, ordered by code
    fn fetch_all(&self) -> impl Future<Output = AppResult<Vec<BiomarkerReference>>> + Send;
}

/// Postgres-backed reference source
#[derive(Debug, Clone)]
pub struct PgReferenceSource {
    pool: PgPool,
}

impl PgReferenceSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect using `DATABASE_URL`, loading `.env` first when present
    pub async fn connect() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| AppError::Config("DATABASE_URL must be set".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .context("Failed to connect to reference database")
            .map_err(|e| AppError::Reference(e.to_string()))?;

        info!("Connected to biomarker reference database");
        Ok(Self { pool })
    }
}

impl ReferenceSource for PgReferenceSource {
    async fn fetch_all(&self) -> AppResult<Vec<BiomarkerReference>> {
        debug!("Fetching biomarker reference definitions");

        let rows = sqlx::query("SELECT code, name, unit FROM biomarker_definitions ORDER BY code")
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch biomarker reference definitions")
            .map_err(|e| AppError::Reference(e.to_string()))?;

        let references: Vec<BiomarkerReference> = rows
            .iter()
            .map(|row| BiomarkerReference {
                code: row.get("code"),
                name: row.get("name"),
                unit: row.get("unit"),
            })
            .collect();

        info!(
            count = references.len(),
            "Fetched biomarker reference definitions"
        );
        Ok(references)
    }
}
