//! PostgreSQL implementation of LeadRepository.
//!
//! The `leads` table carries a unique index on `source_session_id`; a
//! conflicting insert is reported as `DuplicateSession` so the factory
//! can fall back to fetch-and-return.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{LeadId, SessionId};
use crate::domain::handoff::Lead;
use crate::ports::{LeadRepository, LeadRepositoryError};

/// PostgreSQL implementation of [`LeadRepository`].
#[derive(Clone)]
pub struct PostgresLeadRepository {
    pool: PgPool,
}

impl PostgresLeadRepository {
    /// Creates a new PostgresLeadRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadRepository for PostgresLeadRepository {
    async fn insert(&self, lead: &Lead) -> Result<(), LeadRepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leads (
                id, service_type, name, email, phone, address, city, state, zip,
                description, source_session_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (source_session_id) DO NOTHING
            "#,
        )
        .bind(lead.id.as_uuid())
        .bind(&lead.service_type)
        .bind(lead.name.as_deref())
        .bind(lead.email.as_deref())
        .bind(lead.phone.as_deref())
        .bind(lead.address.as_deref())
        .bind(lead.city.as_deref())
        .bind(lead.state.as_deref())
        .bind(lead.zip.as_deref())
        .bind(&lead.description)
        .bind(lead.source_session_id.as_uuid())
        .bind(lead.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| LeadRepositoryError::Unavailable(format!("lead insert failed: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(LeadRepositoryError::DuplicateSession(lead.source_session_id));
        }

        Ok(())
    }

    async fn find_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, service_type, name, email, phone, address, city, state, zip,
                   description, source_session_id, created_at
            FROM leads
            WHERE source_session_id = $1
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LeadRepositoryError::Unavailable(format!("lead lookup failed: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: Uuid = row
            .try_get("id")
            .map_err(|e| LeadRepositoryError::Unavailable(e.to_string()))?;
        let source_session_id: Uuid = row
            .try_get("source_session_id")
            .map_err(|e| LeadRepositoryError::Unavailable(e.to_string()))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| LeadRepositoryError::Unavailable(e.to_string()))?;

        let text = |name: &str| -> Result<Option<String>, LeadRepositoryError> {
            row.try_get(name)
                .map_err(|e| LeadRepositoryError::Unavailable(e.to_string()))
        };

        Ok(Some(Lead {
            id: LeadId::from_uuid(id),
            service_type: row
                .try_get("service_type")
                .map_err(|e| LeadRepositoryError::Unavailable(e.to_string()))?,
            name: text("name")?,
            email: text("email")?,
            phone: text("phone")?,
            address: text("address")?,
            city: text("city")?,
            state: text("state")?,
            zip: text("zip")?,
            description: row
                .try_get("description")
                .map_err(|e| LeadRepositoryError::Unavailable(e.to_string()))?,
            source_session_id: SessionId::from_uuid(source_session_id),
            created_at,
        }))
    }
}
