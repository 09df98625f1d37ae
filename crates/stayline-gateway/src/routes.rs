use axum::extract::{Request, State};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::Response;
use axum::routing::{get, put};
use axum::Router;

use crate::errors::GatewayError;
use crate::handlers;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-apikey";

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/o/{org_id}/cleanings", get(handlers::list_cleanings))
        .route("/o/{org_id}/reservations", get(handlers::list_reservations))
        .route(
            "/o/{org_id}/reservations/{conf}",
            put(handlers::update_reservation),
        )
        .route_layer(from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .with_state(state)
}

/// Rejects before routing reaches a handler, so a bad key never triggers a
/// token fetch or a backend call.
async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    match provided {
        Some(key) if key == state.api_key.as_str() => Ok(next.run(request).await),
        Some(_) => Err(GatewayError::unauthenticated("api key mismatch")),
        None => Err(GatewayError::unauthenticated("x-apikey header missing")),
    }
}
