pub mod memory;
pub mod postgres;

use std::sync::Arc;

use crate::domain::{
    errors::DatabaseError,
    fields::{Address, Referral, ReferralCode, User},
};
use memory::MemoryStore;
use sqlx::PgPool;

/// Backing store handle, constructed once at startup and injected into the
/// application state. The per-entity surface is get / upsert / list; handler
/// logic never touches a backend directly, so either backend substitutes for
/// the other.
#[derive(Clone)]
pub enum Store {
    Postgres(PgPool),
    Memory(Arc<MemoryStore>),
}

impl Store {
    pub async fn referral_by_code(
        &self,
        code: &ReferralCode,
    ) -> Result<Option<Referral>, DatabaseError> {
        match self {
            Self::Postgres(pool) => postgres::referral_by_code(pool, code).await,
            Self::Memory(store) => Ok(store.referral_by_code(code).await),
        }
    }

    pub async fn referral_by_owner(
        &self,
        owner: &Address,
    ) -> Result<Option<Referral>, DatabaseError> {
        match self {
            Self::Postgres(pool) => postgres::referral_by_owner(pool, owner).await,
            Self::Memory(store) => Ok(store.referral_by_owner(owner).await),
        }
    }

    pub async fn referral_list(&self) -> Result<Vec<Referral>, DatabaseError> {
        match self {
            Self::Postgres(pool) => postgres::referral_list(pool).await,
            Self::Memory(store) => Ok(store.referral_list().await),
        }
    }

    pub async fn referral_upsert(&self, referral: &Referral) -> Result<(), DatabaseError> {
        match self {
            Self::Postgres(pool) => postgres::referral_upsert(pool, referral).await,
            Self::Memory(store) => {
                store.referral_upsert(referral).await;
                Ok(())
            }
        }
    }

    pub async fn user_by_address(&self, address: &Address) -> Result<Option<User>, DatabaseError> {
        match self {
            Self::Postgres(pool) => postgres::user_by_address(pool, address).await,
            Self::Memory(store) => Ok(store.user_by_address(address).await),
        }
    }

    pub async fn user_list(&self) -> Result<Vec<User>, DatabaseError> {
        match self {
            Self::Postgres(pool) => postgres::user_list(pool).await,
            Self::Memory(store) => Ok(store.user_list().await),
        }
    }

    pub async fn user_upsert(&self, user: &User) -> Result<(), DatabaseError> {
        match self {
            Self::Postgres(pool) => postgres::user_upsert(pool, user).await,
            Self::Memory(store) => {
                store.user_upsert(user).await;
                Ok(())
            }
        }
    }
}
