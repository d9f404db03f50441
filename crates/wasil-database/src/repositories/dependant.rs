//! Dependant repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use wasil_core::types::{DependantId, UserId};
use wasil_core::{AppError, AppResult};
use wasil_entity::dependant::{Dependant, Gender};

use super::persistence;
use crate::store::DependantStore;

#[derive(Debug, FromRow)]
struct DependantRow {
    id: DependantId,
    owner_id: UserId,
    name: String,
    date_of_birth: NaiveDate,
    gender: String,
    location: String,
    full_address: String,
    medical_conditions: String,
    medications: Vec<String>,
    photo_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DependantRow> for Dependant {
    type Error = AppError;

    fn try_from(row: DependantRow) -> Result<Self, Self::Error> {
        let gender = match row.gender.as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            other => {
                return Err(AppError::persistence(format!(
                    "Unexpected gender '{other}' on dependant {}",
                    row.id
                )));
            }
        };
        Ok(Self {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            date_of_birth: row.date_of_birth,
            gender,
            location: row.location.parse()?,
            full_address: row.full_address,
            medical_conditions: row.medical_conditions,
            medications: row.medications,
            photo_url: row.photo_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for `dependants`.
#[derive(Debug, Clone)]
pub struct DependantRepository {
    pool: PgPool,
}

impl DependantRepository {
    /// Create a new dependant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DependantStore for DependantRepository {
    async fn insert(&self, dependant: &Dependant) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO dependants (id, owner_id, name, date_of_birth, gender, location, full_address, \
             medical_conditions, medications, photo_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(dependant.id)
        .bind(dependant.owner_id)
        .bind(&dependant.name)
        .bind(dependant.date_of_birth)
        .bind(dependant.gender.as_str())
        .bind(dependant.location.as_str())
        .bind(&dependant.full_address)
        .bind(&dependant.medical_conditions)
        .bind(&dependant.medications)
        .bind(&dependant.photo_url)
        .bind(dependant.created_at)
        .bind(dependant.updated_at)
        .execute(&self.pool)
        .await
        .map_err(persistence("Failed to insert dependant"))?;
        Ok(())
    }

    async fn find(&self, id: DependantId) -> AppResult<Option<Dependant>> {
        sqlx::query_as::<_, DependantRow>("SELECT * FROM dependants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence("Failed to find dependant"))?
            .map(Dependant::try_from)
            .transpose()
    }

    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<Dependant>> {
        sqlx::query_as::<_, DependantRow>(
            "SELECT * FROM dependants WHERE owner_id = $1 ORDER BY created_at",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence("Failed to list dependants"))?
        .into_iter()
        .map(Dependant::try_from)
        .collect()
    }

    async fn update(&self, dependant: &Dependant) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE dependants SET name = $2, date_of_birth = $3, gender = $4, location = $5, \
             full_address = $6, medical_conditions = $7, medications = $8, photo_url = $9, \
             updated_at = $10 WHERE id = $1",
        )
        .bind(dependant.id)
        .bind(&dependant.name)
        .bind(dependant.date_of_birth)
        .bind(dependant.gender.as_str())
        .bind(dependant.location.as_str())
        .bind(&dependant.full_address)
        .bind(&dependant.medical_conditions)
        .bind(&dependant.medications)
        .bind(&dependant.photo_url)
        .bind(dependant.updated_at)
        .execute(&self.pool)
        .await
        .map_err(persistence("Failed to update dependant"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Dependant {} not found",
                dependant.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: DependantId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM dependants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(persistence("Failed to delete dependant"))?;
        Ok(result.rows_affected() > 0)
    }
}
