use std::sync::Arc;

use crate::{
    app::AppState,
    domain::{
        errors::ApiError,
        events::AppEvent,
        fields::{now_ms, Address, CheckInState, User},
        rank::rank_desc,
    },
};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct UserQuery {
    address: Option<String>,
}

#[derive(Deserialize)]
pub struct UserActionRequest {
    address: Option<String>,
    action: Option<String>,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    address: Address,
    points: i64,
    boosts: i64,
    last_check_in: Option<i64>,
    rank: i64,
}

fn build_leaderboard(users: Vec<User>) -> Vec<LeaderboardEntry> {
    rank_desc(users, |u| u.points)
        .into_iter()
        .map(|(u, rank)| LeaderboardEntry {
            address: u.address,
            points: u.points,
            boosts: u.boosts,
            last_check_in: u.last_check_in,
            rank,
        })
        .collect()
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Response, ApiError> {
    let users = state.store().user_list().await?;
    let leaderboard = build_leaderboard(users);

    if let Some(address) = query.address {
        let address = Address::from(address);
        let current = leaderboard.iter().find(|e| e.address == address).cloned();
        return Ok(Json(json!({ "leaderboard": leaderboard, "current": current })).into_response());
    }

    Ok(Json(leaderboard).into_response())
}

pub async fn post_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UserActionRequest>,
) -> Result<Json<Value>, ApiError> {
    let address = match payload.address {
        Some(a) if !a.is_empty() => Address::from(a),
        _ => return Err(ApiError::Validation("Invalid address")),
    };
    let action = payload.action.unwrap_or_default();

    let store = state.store();
    let mut user = store
        .user_by_address(&address)
        .await?
        .unwrap_or_else(|| User::new(address));
    let now = now_ms();

    match action.as_str() {
        "checkin" => {
            if let CheckInState::Cooling { remaining_ms } = user.check_in_state(now) {
                tracing::info!(
                    "check-in rejected for {} >>> {}ms remaining",
                    user.address,
                    remaining_ms
                );
                return Err(ApiError::CooldownActive);
            }
            user.apply_check_in(now);
            store.user_upsert(&user).await?;
            let _ = state.get_sender().send(AppEvent::CheckIn(user.clone()));
        }
        "boost" => {
            user.apply_boost(now);
            store.user_upsert(&user).await?;
            let _ = state.get_sender().send(AppEvent::Boost(user.clone()));
        }
        "ensure" => {
            store.user_upsert(&user).await?;
        }
        _ => return Err(ApiError::Validation("Unknown action")),
    }

    let users = store.user_list().await?;
    let leaderboard = build_leaderboard(users);
    let current = leaderboard
        .iter()
        .find(|e| e.address == user.address)
        .cloned();

    Ok(Json(
        json!({ "success": true, "user": current, "leaderboard": leaderboard }),
    ))
}
