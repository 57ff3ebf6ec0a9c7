use crate::domain::{
    errors::DatabaseError,
    fields::{Address, Referral, ReferralCode, User},
    model::{DbReferral, DbUser},
};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn referral_by_code(
    pool: &PgPool,
    code: &ReferralCode,
) -> Result<Option<Referral>, DatabaseError> {
    let referral = sqlx::query_as::<_, DbReferral>("select * from referrals where code = $1")
        .bind(code.inner())
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("get referral by code failed >>> {}", e);
            DatabaseError::ServerError
        })?;

    Ok(referral.map(|r| r.into()))
}

pub async fn referral_by_owner(
    pool: &PgPool,
    owner: &Address,
) -> Result<Option<Referral>, DatabaseError> {
    let referral = sqlx::query_as::<_, DbReferral>("select * from referrals where owner = $1")
        .bind(owner.inner())
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("get referral by owner failed >>> {}", e);
            DatabaseError::ServerError
        })?;

    Ok(referral.map(|r| r.into()))
}

pub async fn referral_list(pool: &PgPool) -> Result<Vec<Referral>, DatabaseError> {
    let referrals =
        sqlx::query_as::<_, DbReferral>("select * from referrals order by created_on asc")
            .fetch_all(pool)
            .await
            .map_err(|e| {
                tracing::error!("listing referrals failed >>> {}", e);
                DatabaseError::ServerError
            })?;

    Ok(referrals.into_iter().map(|r| r.into()).collect())
}

pub async fn referral_upsert(pool: &PgPool, referral: &Referral) -> Result<(), DatabaseError> {
    let referred: Vec<String> = referral.referred.iter().map(|a| a.inner()).collect();
    sqlx::query(
        "insert into referrals (uid, code, owner, referred) values ($1, $2, $3, $4) \
         on conflict (code) do update set referred = excluded.referred",
    )
    .bind(Uuid::new_v4())
    .bind(referral.code.inner())
    .bind(referral.owner.inner())
    .bind(referred)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("upserting referral failed >>> {}", e);
        DatabaseError::ServerError
    })?;

    Ok(())
}

pub async fn user_by_address(
    pool: &PgPool,
    address: &Address,
) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, DbUser>("select * from users where address = $1")
        .bind(address.inner())
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("get user by address failed >>> {}", e);
            DatabaseError::ServerError
        })?;

    Ok(user.map(|u| u.into()))
}

pub async fn user_list(pool: &PgPool) -> Result<Vec<User>, DatabaseError> {
    let users = sqlx::query_as::<_, DbUser>("select * from users order by created_on asc")
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("listing users failed >>> {}", e);
            DatabaseError::ServerError
        })?;

    Ok(users.into_iter().map(|u| u.into()).collect())
}

pub async fn user_upsert(pool: &PgPool, user: &User) -> Result<(), DatabaseError> {
    sqlx::query(
        "insert into users (uid, address, points, boosts, last_check_in, last_boost) \
         values ($1, $2, $3, $4, $5, $6) \
         on conflict (address) do update set points = excluded.points, \
         boosts = excluded.boosts, last_check_in = excluded.last_check_in, \
         last_boost = excluded.last_boost",
    )
    .bind(Uuid::new_v4())
    .bind(user.address.inner())
    .bind(user.points)
    .bind(user.boosts)
    .bind(user.last_check_in)
    .bind(user.last_boost)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("upserting user failed >>> {}", e);
        DatabaseError::ServerError
    })?;

    Ok(())
}
