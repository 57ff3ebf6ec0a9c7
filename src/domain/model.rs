use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(FromRow)]
#[allow(dead_code)]
pub struct DbReferral {
    pub uid: Uuid,
    pub(crate) code: String,
    pub(crate) owner: String,
    pub(crate) referred: Vec<String>,
    pub(crate) created_on: OffsetDateTime,
}

#[derive(FromRow)]
#[allow(dead_code)]
pub struct DbUser {
    pub uid: Uuid,
    pub(crate) address: String,
    pub(crate) points: i64,
    pub(crate) boosts: i64,
    pub(crate) last_check_in: Option<i64>,
    pub(crate) last_boost: Option<i64>,
    pub(crate) created_on: OffsetDateTime,
}
