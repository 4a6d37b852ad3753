//! Registry of zakat recipients (`mustahiq`). Recipients never touch the
//! cash book.
mod entity;
pub mod error;
mod repo;

use sqlx::PgPool;
use tracing::instrument;

use crate::primitives::*;

pub use entity::*;
use error::*;
use repo::*;

#[derive(Clone)]
pub struct Beneficiaries {
    repo: MustahiqRepo,
}

impl Beneficiaries {
    pub(crate) fn new(pool: &PgPool) -> Self {
        Self {
            repo: MustahiqRepo::new(pool),
        }
    }

    #[instrument(name = "amanah_ledger.mustahiq.create", skip(self), err)]
    pub async fn create(
        &self,
        owner: OwnerId,
        new_mustahiq: NewMustahiq,
    ) -> Result<Mustahiq, MustahiqError> {
        self.repo.insert(owner, &new_mustahiq).await
    }

    #[instrument(name = "amanah_ledger.mustahiq.update", skip(self), err)]
    pub async fn update(
        &self,
        owner: OwnerId,
        id: MustahiqId,
        update: MustahiqUpdate,
    ) -> Result<Mustahiq, MustahiqError> {
        if update.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return Err(MustahiqError::InvalidUpdate(
                "name must not be empty".to_string(),
            ));
        }
        self.repo
            .update(owner, id, &update)
            .await?
            .ok_or(MustahiqError::NotFound(id))
    }

    #[instrument(name = "amanah_ledger.mustahiq.delete", skip(self), err)]
    pub async fn delete(&self, owner: OwnerId, id: MustahiqId) -> Result<Mustahiq, MustahiqError> {
        self.repo
            .delete(owner, id)
            .await?
            .ok_or(MustahiqError::NotFound(id))
    }

    pub async fn find_by_id(
        &self,
        owner: OwnerId,
        id: MustahiqId,
    ) -> Result<Mustahiq, MustahiqError> {
        self.repo
            .find_by_id(owner, id)
            .await?
            .ok_or(MustahiqError::NotFound(id))
    }

    #[instrument(name = "amanah_ledger.mustahiq.list", skip(self), err)]
    pub async fn list(
        &self,
        owner: OwnerId,
        asnaf: Option<Asnaf>,
    ) -> Result<Vec<Mustahiq>, MustahiqError> {
        self.repo.list(owner, asnaf).await
    }
}
