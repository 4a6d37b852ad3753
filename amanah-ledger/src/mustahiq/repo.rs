use sqlx::PgPool;

use super::{entity::*, error::MustahiqError};
use crate::primitives::*;

const COLUMNS: &str = "id, owner_id, name, asnaf, address, phone, notes, created_at";

#[derive(Debug, Clone)]
pub(super) struct MustahiqRepo {
    pool: PgPool,
}

impl MustahiqRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn insert(
        &self,
        owner: OwnerId,
        new_mustahiq: &NewMustahiq,
    ) -> Result<Mustahiq, MustahiqError> {
        let mustahiq = sqlx::query_as::<_, Mustahiq>(&format!(
            r#"INSERT INTO mustahiq (owner_id, name, asnaf, address, phone, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}"#
        ))
        .bind(owner)
        .bind(&new_mustahiq.name)
        .bind(new_mustahiq.asnaf)
        .bind(&new_mustahiq.address)
        .bind(&new_mustahiq.phone)
        .bind(&new_mustahiq.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(mustahiq)
    }

    pub async fn update(
        &self,
        owner: OwnerId,
        id: MustahiqId,
        update: &MustahiqUpdate,
    ) -> Result<Option<Mustahiq>, MustahiqError> {
        let mustahiq = sqlx::query_as::<_, Mustahiq>(&format!(
            r#"UPDATE mustahiq
            SET name = COALESCE($3, name),
                asnaf = COALESCE($4, asnaf),
                address = COALESCE($5, address),
                phone = COALESCE($6, phone),
                notes = COALESCE($7, notes)
            WHERE owner_id = $1 AND id = $2
            RETURNING {COLUMNS}"#
        ))
        .bind(owner)
        .bind(id)
        .bind(&update.name)
        .bind(update.asnaf)
        .bind(&update.address)
        .bind(&update.phone)
        .bind(&update.notes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(mustahiq)
    }

    pub async fn delete(
        &self,
        owner: OwnerId,
        id: MustahiqId,
    ) -> Result<Option<Mustahiq>, MustahiqError> {
        let mustahiq = sqlx::query_as::<_, Mustahiq>(&format!(
            "DELETE FROM mustahiq WHERE owner_id = $1 AND id = $2 RETURNING {COLUMNS}"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(mustahiq)
    }

    pub async fn find_by_id(
        &self,
        owner: OwnerId,
        id: MustahiqId,
    ) -> Result<Option<Mustahiq>, MustahiqError> {
        let mustahiq = sqlx::query_as::<_, Mustahiq>(&format!(
            "SELECT {COLUMNS} FROM mustahiq WHERE owner_id = $1 AND id = $2"
        ))
        .bind(owner)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(mustahiq)
    }

    pub async fn list(
        &self,
        owner: OwnerId,
        asnaf: Option<Asnaf>,
    ) -> Result<Vec<Mustahiq>, MustahiqError> {
        let list = sqlx::query_as::<_, Mustahiq>(&format!(
            r#"SELECT {COLUMNS} FROM mustahiq
            WHERE owner_id = $1 AND ($2::asnaf IS NULL OR asnaf = $2)
            ORDER BY name, id"#
        ))
        .bind(owner)
        .bind(asnaf)
        .fetch_all(&self.pool)
        .await?;
        Ok(list)
    }
}
