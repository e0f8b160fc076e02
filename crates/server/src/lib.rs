//! HTTP serving layer for the recommendation engine.
//!
//! The service is deliberately thin: training happens before the
//! listener binds (a request can never observe a half-trained model),
//! and every handler reads the shared immutable engine without locking.
//!
//! ## Routes
//! - `POST /recommend`: `{"user_id": 42, "n": 5}` →
//!   `{"user_id": 42, "recommendations": [{"item_id": ..., "score": ...}]}`;
//!   unknown users get the popularity fallback plus an explanatory note
//! - `GET /users`: all user ids the model was trained on
//! - `GET /health`: liveness probe

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use recommender::{Recommender, ScoredItem};
use signal_store::UserId;

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Recommender>,
}

/// Body of a recommendation request. `n` defaults to 5.
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub user_id: UserId,
    #[serde(default = "default_n")]
    pub n: i64,
}

fn default_n() -> i64 {
    5
}

/// Response for one recommendation request.
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub user_id: UserId,
    pub recommendations: Vec<ScoredItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub user_ids: Vec<UserId>,
}

/// Build the application router around a trained engine.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/recommend", post(recommend))
        .route("/users", get(users))
        .route("/health", get(health))
        .with_state(state)
}

async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Json<RecommendResponse> {
    // Negative counts are treated as zero rather than rejected
    let n = request.n.max(0) as usize;
    let result = state.engine.recommend(request.user_id, n);
    info!(
        user_id = request.user_id,
        n,
        returned = result.items.len(),
        fallback = result.fallback,
        "Served recommendation request"
    );

    let note = result
        .fallback
        .then(|| "User not found, showing default recommendations.".to_string());
    Json(RecommendResponse {
        user_id: result.user_id,
        recommendations: result.items,
        note,
    })
}

async fn users(State(state): State<AppState>) -> Json<UsersResponse> {
    Json(UsersResponse {
        user_ids: state.engine.known_users().to_vec(),
    })
}

async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use factor_model::{AlsConfig, AlsTrainer};
    use recommender::build_snapshot;
    use signal_store::{Interaction, SignalSet, SignalWeights};

    fn test_state() -> AppState {
        let signals = SignalSet {
            clicks: vec![Interaction::new(7, 20, 2.0)],
            orders: vec![],
            ratings: vec![Interaction::new(3, 10, 4.0)],
        };
        let trainer = AlsTrainer::new(AlsConfig {
            factors: 4,
            iterations: 5,
            regularization: 0.1,
            alpha: 1.0,
            seed: 3,
        });
        let snapshot =
            build_snapshot(&signals, &SignalWeights::default(), &trainer).unwrap();
        AppState {
            engine: Arc::new(Recommender::new(snapshot)),
        }
    }

    #[tokio::test]
    async fn test_recommend_known_user() {
        let state = test_state();
        let response = recommend(
            State(state),
            Json(RecommendRequest { user_id: 7, n: 5 }),
        )
        .await;

        assert_eq!(response.0.user_id, 7);
        assert!(response.0.note.is_none());
        assert_eq!(response.0.recommendations.len(), 1);
        assert_eq!(response.0.recommendations[0].item_id, 10);
    }

    #[tokio::test]
    async fn test_recommend_unknown_user_notes_fallback() {
        let state = test_state();
        let response = recommend(
            State(state),
            Json(RecommendRequest { user_id: 999, n: 2 }),
        )
        .await;

        assert_eq!(
            response.0.note.as_deref(),
            Some("User not found, showing default recommendations.")
        );
        // Popularity order: item 10 (weight 12) before item 20 (weight 2)
        let ids: Vec<i64> = response
            .0
            .recommendations
            .iter()
            .map(|item| item.item_id)
            .collect();
        assert_eq!(ids, vec![10, 20]);
    }

    #[tokio::test]
    async fn test_negative_n_yields_empty_list() {
        let state = test_state();
        let response = recommend(
            State(state),
            Json(RecommendRequest { user_id: 7, n: -3 }),
        )
        .await;
        assert!(response.0.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_users_listing() {
        let state = test_state();
        let response = users(State(state)).await;
        assert_eq!(response.0.user_ids, vec![7, 3]);
    }

    #[test]
    fn test_request_n_defaults_to_five() {
        let request: RecommendRequest =
            serde_json::from_str(r#"{"user_id": 1}"#).unwrap();
        assert_eq!(request.n, 5);
    }
}
