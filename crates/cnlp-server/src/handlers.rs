use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use cnlp_dict::{CountDictionary, DictError, LemmaDictionary};
use cnlp_lemma::Lemmatizer;
use cnlp_text::{CountOptions, count_with, tokenize};
use cnlp_types::{TransformMode, word_pos_lemma_to_lemma_category};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::registry::{DictionaryKind, Registry, RegistryError};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub lemmatizer: Arc<Lemmatizer>,
}

impl AppState {
    pub fn new(lemmatizer: Lemmatizer) -> Self {
        Self {
            registry: Arc::new(Registry::new()),
            lemmatizer: Arc::new(lemmatizer),
        }
    }
}

#[derive(Deserialize)]
pub struct TokenizeRequest {
    pub text: String,
}

#[derive(Serialize)]
struct TokenizeResponse {
    tokens: String,
}

#[derive(Deserialize)]
pub struct BuildRequest {
    pub entries: Vec<Value>,
}

#[derive(Serialize)]
struct BuildResponse {
    handle: u64,
    kind: DictionaryKind,
    entries: usize,
    duplicates: usize,
}

#[derive(Deserialize)]
pub struct LemmatizeRequest {
    pub word: String,
    pub handle: u64,
}

#[derive(Serialize)]
struct LemmatizeResponse {
    lemma: String,
    source: &'static str,
}

/// Transform given either as its numeric code or by name.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum TransformParam {
    Code(i64),
    Name(String),
}

#[derive(Deserialize)]
pub struct CountRequest {
    pub text: String,
    pub handle: u64,
    #[serde(default = "default_true")]
    pub duplicate_text: bool,
    #[serde(default)]
    pub lowercase: bool,
    pub transform: Option<TransformParam>,
}

#[derive(Serialize)]
struct CountResponse {
    frequencies: BTreeMap<i64, u64>,
    total: u64,
}

#[derive(Deserialize)]
pub struct WplRequest {
    pub token: String,
}

#[derive(Serialize)]
struct WplResponse {
    result: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn default_true() -> bool {
    true
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/tokenize", post(tokenize_text))
        .route("/v1/dictionaries/lemma", post(build_lemma_dictionary))
        .route("/v1/dictionaries/count", post(build_count_dictionary))
        .route("/v1/dictionaries/{handle}", delete(drop_dictionary))
        .route("/v1/lemmatize", post(lemmatize))
        .route("/v1/count", post(count))
        .route("/v1/wpl-to-wc", post(wpl_to_wc))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn tokenize_text(Json(req): Json<TokenizeRequest>) -> Json<TokenizeResponse> {
    Json(TokenizeResponse {
        tokens: tokenize(&req.text),
    })
}

async fn build_lemma_dictionary(
    State(state): State<AppState>,
    Json(req): Json<BuildRequest>,
) -> Result<Json<BuildResponse>, ApiError> {
    let pairs = req
        .entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let (key, value) = entry_pair(idx, entry)?;
            match value {
                Value::String(lemma) => Ok((key, lemma)),
                _ => Err(ApiError::bad_request(format!(
                    "entry {idx}: lemma is not a string"
                ))),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let dict = LemmaDictionary::build(pairs)?;
    let (entries, duplicates) = (dict.len(), dict.duplicates());
    let handle = state.registry.insert_lemma(dict);
    Ok(Json(BuildResponse {
        handle,
        kind: DictionaryKind::Lemma,
        entries,
        duplicates,
    }))
}

async fn build_count_dictionary(
    State(state): State<AppState>,
    Json(req): Json<BuildRequest>,
) -> Result<Json<BuildResponse>, ApiError> {
    let pairs = req
        .entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let (key, value) = entry_pair(idx, entry)?;
            value.as_i64().map(|id| (key, id)).ok_or_else(|| {
                ApiError::bad_request(format!("entry {idx}: id is not an integer"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let dict = CountDictionary::build(pairs)?;
    let (entries, duplicates) = (dict.len(), dict.duplicates());
    let handle = state.registry.insert_count(dict);
    Ok(Json(BuildResponse {
        handle,
        kind: DictionaryKind::Count,
        entries,
        duplicates,
    }))
}

/// Check that an entry is a two-element sequence with a non-empty string key.
fn entry_pair(idx: usize, entry: Value) -> Result<(String, Value), ApiError> {
    let Value::Array(items) = entry else {
        return Err(ApiError::bad_request(format!(
            "entry {idx} is not a sequence"
        )));
    };
    let [key, value] = <[Value; 2]>::try_from(items).map_err(|items| {
        ApiError::bad_request(format!(
            "entry {idx} length is {}, expected: 2",
            items.len()
        ))
    })?;
    match key {
        Value::String(key) if !key.is_empty() => Ok((key, value)),
        Value::String(_) => Err(ApiError::bad_request(format!("entry {idx}: key is empty"))),
        _ => Err(ApiError::bad_request(format!(
            "entry {idx}: key is not a string"
        ))),
    }
}

async fn drop_dictionary(
    State(state): State<AppState>,
    Path(handle): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .remove(handle)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| RegistryError::UnknownHandle(handle).into())
}

async fn lemmatize(
    State(state): State<AppState>,
    Json(req): Json<LemmatizeRequest>,
) -> Result<Json<LemmatizeResponse>, ApiError> {
    let dict = state.registry.lemma(req.handle)?;
    let lemma = state.lemmatizer.lemmatize(&req.word, &dict);
    Ok(Json(LemmatizeResponse {
        source: lemma.source.as_str(),
        lemma: lemma.into_owned(),
    }))
}

async fn count(
    State(state): State<AppState>,
    Json(req): Json<CountRequest>,
) -> Result<Json<CountResponse>, ApiError> {
    let transform = match req.transform {
        None => TransformMode::Identity,
        Some(TransformParam::Code(code)) => TransformMode::from_code(code).ok_or_else(|| {
            ApiError::bad_request(format!("unknown transform code: {code}"))
        })?,
        Some(TransformParam::Name(name)) => name.parse::<TransformMode>().map_err(ApiError::bad_request)?,
    };
    let dict = state.registry.count(req.handle)?;

    let mut text = req.text;
    let freq = count_with(
        &mut text,
        req.duplicate_text,
        &dict,
        CountOptions {
            lowercase: req.lowercase,
            transform,
        },
    );
    Ok(Json(CountResponse {
        total: freq.total(),
        frequencies: freq.into_inner(),
    }))
}

async fn wpl_to_wc(Json(req): Json<WplRequest>) -> Json<WplResponse> {
    Json(WplResponse {
        result: word_pos_lemma_to_lemma_category(&req.token),
    })
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl From<DictError> for ApiError {
    fn from(err: DictError) -> Self {
        match err {
            DictError::InputShape(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownHandle(_) => ApiError::NotFound(err.to_string()),
            RegistryError::WrongKind { .. } => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::BadRequest(msg) => {
                warn!("rejected request: {msg}");
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => {
                error!("request failed: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(ErrorResponse { error: msg })).into_response()
    }
}
