use anyhow::Result;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::decoded;
use crate::explain::explain_at;
use crate::hiro::{normalize_txid, FetchError, HiroClient, Network};
use crate::models::ExplainedTransaction;
use crate::resolve;

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Clone)]
pub struct AppState {
    pub hiro: HiroClient,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid transaction id {0:?}: expected 64 hex characters, optionally 0x-prefixed")]
    InvalidTxid(String),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidTxid(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Fetch(FetchError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Fetch(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TxResponse {
    pub network: Network,
    pub explanation: ExplainedTransaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct TxQuery {
    #[serde(default)]
    debug: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExplainRequest {
    tx: Value,
    #[serde(default)]
    events: Option<Vec<Value>>,
    #[serde(default)]
    tip_height: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExplainDecodedRequest {
    transaction: Value,
    #[serde(default)]
    tip_height: Option<u64>,
}

/// Fetches `input` from the indexer and explains it. The chain tip is only
/// looked up for transactions already in a block.
pub async fn explain_txid(
    hiro: &HiroClient,
    input: &str,
    debug: bool,
) -> Result<TxResponse, ApiError> {
    let txid = normalize_txid(input).ok_or_else(|| ApiError::InvalidTxid(input.to_string()))?;
    let fetched = hiro.fetch_transaction(&txid).await?;

    let tip_height = match resolve::resolve_u64(&fetched.tx, resolve::BLOCK_HEIGHT) {
        Some(_) => hiro.fetch_tip_height(fetched.network).await,
        None => None,
    };
    let explanation = explain_at(&fetched.tx, Some(fetched.events.as_slice()), tip_height);
    tracing::info!(network = %fetched.network, %txid, tx_type = %explanation.tx_type, "explained transaction");

    let raw = debug.then(|| json!({ "tx": fetched.tx, "events": fetched.events }));
    Ok(TxResponse {
        network: fetched.network,
        explanation,
        raw,
    })
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_tx(
    State(state): State<AppState>,
    Path(txid): Path<String>,
    query: Result<Query<TxQuery>, QueryRejection>,
) -> Result<Json<TxResponse>, ApiError> {
    let Query(query) = query?;
    explain_txid(&state.hiro, &txid, query.debug).await.map(Json)
}

async fn post_explain(
    req: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ExplainedTransaction>, ApiError> {
    let Json(req) = req?;
    if !req.tx.is_object() {
        return Err(ApiError::BadRequest("`tx` must be a JSON object".to_string()));
    }
    Ok(Json(explain_at(&req.tx, req.events.as_deref(), req.tip_height)))
}

async fn post_explain_decoded(
    req: Result<Json<ExplainDecodedRequest>, JsonRejection>,
) -> Result<Json<ExplainedTransaction>, ApiError> {
    let Json(req) = req?;
    if !req.transaction.is_object() {
        return Err(ApiError::BadRequest(
            "`transaction` must be a JSON object".to_string(),
        ));
    }
    let raw = decoded::to_raw_transaction(&req.transaction);
    Ok(Json(explain_at(&raw, None, req.tip_height)))
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/tx/:txid", get(get_tx))
        .route("/api/explain", post(post_explain))
        .route("/api/explain/decoded", post(post_explain_decoded))
        .with_state(state)
}

pub async fn run_http_server(addr: &str, state: AppState) -> Result<()> {
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_map_to_statuses() {
        assert_eq!(
            ApiError::Fetch(FetchError::NotFound("0x00".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Fetch(FetchError::Upstream {
                network: Network::Mainnet,
                status: 500
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::InvalidTxid("nope".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
