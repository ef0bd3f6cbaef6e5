use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::AppState;

/// Liveness plus the deployment facts clients like to see.
pub async fn healthcheck(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "available",
        "environment": state.config().environment,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
