//! PostgreSQL implementation of ProDirectory.
//!
//! Queries active, verified professionals whose service area covers the
//! requested location. Returns raw candidate rows; ranking and reduction
//! to the caller-facing shape stay in the matching handler.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::ProId;
use crate::domain::matching::normalize_trade;
use crate::ports::{DirectoryError, DirectoryQuery, ProDirectory, ProRecord};

/// PostgreSQL implementation of [`ProDirectory`].
#[derive(Clone)]
pub struct PostgresProDirectory {
    pool: PgPool,
}

impl PostgresProDirectory {
    /// Creates a new PostgresProDirectory.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProDirectory for PostgresProDirectory {
    async fn find_pros(&self, query: &DirectoryQuery) -> Result<Vec<ProRecord>, DirectoryError> {
        let trade = normalize_trade(&query.trade);

        let rows = sqlx::query(
            r#"
            SELECT p.id, p.display_name, p.trades, p.active, p.verified,
                   p.rating, p.last_active_at, sa.distance_miles
            FROM pros p
            JOIN pro_service_areas sa ON sa.pro_id = p.id
            WHERE p.active
              AND p.verified
              AND $1 = ANY(p.trades)
              AND (
                    (sa.city = $2 AND sa.state = $3)
                 OR sa.zip = $4
              )
            ORDER BY sa.distance_miles ASC
            LIMIT $5
            "#,
        )
        .bind(&trade)
        .bind(query.city.as_deref())
        .bind(query.state.as_deref())
        .bind(query.zip.as_deref())
        .bind(i64::from(query.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DirectoryError::Unavailable(format!("pro query failed: {}", e)))?;

        let mut pros = Vec::with_capacity(rows.len());
        for row in rows {
            let id: Uuid = row
                .try_get("id")
                .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
            let display_name: String = row
                .try_get("display_name")
                .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
            let trades: Vec<String> = row
                .try_get("trades")
                .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
            let active: bool = row
                .try_get("active")
                .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
            let verified: bool = row
                .try_get("verified")
                .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
            let rating: Option<f64> = row
                .try_get("rating")
                .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
            let last_active_at: Option<DateTime<Utc>> = row
                .try_get("last_active_at")
                .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
            let distance_miles: Option<f64> = row
                .try_get("distance_miles")
                .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

            pros.push(ProRecord {
                id: ProId::from_uuid(id),
                display_name,
                trades,
                active,
                verified,
                distance_miles,
                rating,
                last_active_at,
            });
        }

        Ok(pros)
    }
}
