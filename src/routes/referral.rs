use std::sync::Arc;

use crate::{
    app::AppState,
    domain::{
        errors::ApiError,
        events::{AppEvent, ReferralRecordedEvent},
        fields::{Address, Referral, ReferralCode},
        rank::rank_desc,
    },
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Deserialize)]
pub struct ReferralQuery {
    code: Option<String>,
    address: Option<String>,
}

#[derive(Deserialize)]
pub struct ReferralActionRequest {
    action: String,
    code: Option<String>,
    owner: Option<String>,
    referred: Option<String>,
}

/// Shape returned for an owner lookup. `referrer` is always null: no reverse
/// link is persisted on the referral record.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    ref_code: ReferralCode,
    referrer: Option<Address>,
    invites: i64,
}

#[derive(Serialize)]
pub struct RankedReferrer {
    address: Address,
    invites: i64,
    rank: i64,
}

pub async fn get_referral(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReferralQuery>,
) -> Result<Response, ApiError> {
    let store = state.store();

    if let Some(code) = query.code {
        let referral = store.referral_by_code(&code.into()).await?;
        return Ok(Json(referral).into_response());
    }

    if let Some(address) = query.address {
        let referral = store.referral_by_owner(&Address::from(address)).await?;
        let summary = referral.map(|r| {
            let invites = r.invites();
            OwnerSummary {
                ref_code: r.code,
                referrer: None,
                invites,
            }
        });
        return Ok(Json(summary).into_response());
    }

    let referrals = store.referral_list().await?;
    let referrers: Vec<Referral> = referrals
        .into_iter()
        .filter(|r| !r.referred.is_empty())
        .collect();
    let leaderboard: Vec<RankedReferrer> = rank_desc(referrers, |r| r.invites())
        .into_iter()
        .map(|(r, rank)| {
            let invites = r.invites();
            RankedReferrer {
                address: r.owner,
                invites,
                rank,
            }
        })
        .collect();

    Ok(Json(leaderboard).into_response())
}

pub async fn post_referral(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ReferralActionRequest>,
) -> Result<Response, ApiError> {
    match payload.action.as_str() {
        "create" => create_referral(state, payload).await,
        "addReferral" => add_referral(state, payload).await,
        _ => Err(ApiError::Validation("Unknown action")),
    }
}

async fn create_referral(
    state: Arc<AppState>,
    payload: ReferralActionRequest,
) -> Result<Response, ApiError> {
    let (code, owner) = match (payload.code, payload.owner) {
        (Some(code), Some(owner)) if !code.is_empty() && !owner.is_empty() => {
            (ReferralCode::from(code), Address::from(owner))
        }
        _ => return Err(ApiError::Validation("Missing code or owner")),
    };

    let store = state.store();
    tracing::info!("creating referral code {} for {}", code, owner);

    // Both uniqueness checks happen before any write, so a failed create
    // leaves no partial state behind.
    if store.referral_by_owner(&owner).await?.is_some() {
        return Err(ApiError::Conflict("Owner already has a code"));
    }
    if store.referral_by_code(&code).await?.is_some() {
        return Err(ApiError::Conflict("Code already exists"));
    }

    let referral = Referral::new(code, owner);
    store.referral_upsert(&referral).await?;
    let _ = state.get_sender().send(AppEvent::CodeCreated(referral.clone()));

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "referral": referral })),
    )
        .into_response())
}

async fn add_referral(
    state: Arc<AppState>,
    payload: ReferralActionRequest,
) -> Result<Response, ApiError> {
    let (code, referred) = match (payload.code, payload.referred) {
        (Some(code), Some(referred)) if !code.is_empty() && !referred.is_empty() => {
            (ReferralCode::from(code), Address::from(referred))
        }
        _ => return Err(ApiError::Validation("Missing code or referred")),
    };

    let store = state.store();
    let mut referral = store
        .referral_by_code(&code)
        .await?
        .ok_or(ApiError::NotFound("Code not found"))?;

    if referral.is_owner(&referred) {
        return Err(ApiError::Validation("Self referral not allowed"));
    }

    // Re-submitting an already recorded address is a no-op success.
    if referral.add_referred(referred.clone()) {
        store.referral_upsert(&referral).await?;
        let _ = state
            .get_sender()
            .send(AppEvent::ReferralRecorded(ReferralRecordedEvent {
                code: referral.code.clone(),
                referred,
            }));
    }

    Ok(Json(json!({ "success": true, "referral": referral })).into_response())
}
