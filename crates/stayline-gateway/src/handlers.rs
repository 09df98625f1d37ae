use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use stayline_net::prelude::*;
use stayline_schema::prelude::*;
use tracing::{debug, info};
use url::Url;

use crate::errors::GatewayError;
use crate::state::AppState;

#[derive(Clone, Copy, Debug)]
pub enum Collection {
    Cleanings,
    Reservations,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Cleanings => "cleanings",
            Collection::Reservations => "reservations",
        }
    }
}

/// What the backend returns for a collection read: the raw records plus a
/// per-response field map describing how to present them.
#[derive(Debug, Deserialize)]
struct CollectionPayload {
    #[serde(default)]
    records: Vec<Map<String, Value>>,
    #[serde(default)]
    fields: Map<String, Value>,
}

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub async fn list_cleanings(
    State(state): State<AppState>,
    Path(org_id): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    fetch_collection(&state, &org_id, Collection::Cleanings).await
}

pub async fn list_reservations(
    State(state): State<AppState>,
    Path(org_id): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    fetch_collection(&state, &org_id, Collection::Reservations).await
}

async fn fetch_collection(
    state: &AppState,
    org_id: &str,
    collection: Collection,
) -> Result<Json<Value>, GatewayError> {
    let audience = state.backend_audience()?;
    let token = state.tokens.token(&audience).await?;
    let url = backend_url(&audience, &format!("/o/{org_id}/{}", collection.as_str()))?;

    info!(org_id, collection = collection.as_str(), "fetching records");
    let response = state
        .invoker
        .invoke(BackendRequest::get(url, token.value))
        .await?;

    let payload: CollectionPayload = serde_json::from_value(response.body)
        .map_err(|err| GatewayError::upstream(&format!("unexpected collection payload: {err}")))?;
    // A duplicate display name in the backend's own field map makes the
    // response ambiguous; treat it like any other unusable upstream reply.
    let display = FieldSchema::from_backend_fields(&payload.fields)
        .map_err(|err| GatewayError::upstream(&format!("malformed backend field map: {err}")))?;

    let mapped: Vec<Value> = payload
        .records
        .iter()
        .map(|record| Value::Object(encode(record, &display)))
        .collect();

    let mut body = Map::new();
    body.insert(collection.as_str().to_string(), Value::Array(mapped));
    Ok(Json(Value::Object(body)))
}

pub async fn update_reservation(
    State(state): State<AppState>,
    Path((org_id, conf)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<String, GatewayError> {
    debug!(%org_id, %conf, payload = %body, "received reservation update");

    let Value::Object(external) = body else {
        return Err(GatewayError::validation("Request body must be a JSON object."));
    };

    let decoded = decode(&external, &state.schema)?;
    if decoded.is_empty() {
        return Err(GatewayError::validation(
            "No recognized fields in request body.",
        ));
    }

    let audience = state.backend_audience()?;
    let token = state.tokens.token(&audience).await?;
    let url = backend_url(&audience, "/events")?;

    let envelope = UpdateEnvelope::new(conf.clone(), decoded);
    let payload = serde_json::to_value(&envelope)
        .map_err(|err| GatewayError::internal(&format!("envelope encode: {err}")))?;

    info!(%org_id, %conf, "submitting reservation update");
    state
        .invoker
        .invoke(BackendRequest::post(url, token.value, payload))
        .await?;

    Ok(format!("reservation {conf} updated"))
}

fn backend_url(audience: &str, path: &str) -> Result<Url, GatewayError> {
    Url::parse(&format!("{audience}{path}"))
        .map_err(|err| GatewayError::config_missing(&format!("invalid backend url: {err}")))
}
