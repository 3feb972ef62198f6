//! HTTP surface for the storage service.
//!
//! - GET /storage/list - One directory level across both partitions
//! - GET /storage/file - Raw bytes (binary) or a JSON document (text)
//! - POST /storage/file - Create or replace a file
//! - DELETE /storage/file - Delete a file
//! - POST /storage/upload - Upload a file (multipart/form-data)
//! - POST /storage/data/init - Write the sample data set

use crate::error::{Error, ErrorKind, Result};
use crate::storage::constants::MAX_UPLOAD_SIZE;
use crate::storage::{FileContent, Listing, StorageClient, StorageService, Upload};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub type AppState = Arc<StorageService<StorageClient>>;

/// Build the router for all storage endpoints.
pub fn create_router(service: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/storage/list", get(handle_list))
        .route(
            "/storage/file",
            get(handle_get_file)
                .post(handle_create_file)
                .delete(handle_delete_file),
        )
        .route("/storage/upload", post(handle_upload))
        .route("/storage/data/init", post(handle_seed))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .with_state(service)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(service: AppState, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("Storage API listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(service)).await?;
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct OperationResponse {
    pub success: bool,
    pub message: String,
}

impl OperationResponse {
    fn ok(message: String) -> Json<Self> {
        Json(Self {
            success: true,
            message,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    path: String,
    #[serde(default = "default_sizes")]
    sizes: bool,
}

fn default_sizes() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct FileQuery {
    path: Option<String>,
    #[serde(default, alias = "is_binary")]
    binary: bool,
}

#[derive(Debug, Deserialize)]
struct CreateFileRequest {
    path: Option<String>,
    content: Option<String>,
    #[serde(default)]
    is_binary: bool,
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Validation {
            message: format!("'{field}' is required"),
        })
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_list(
    State(service): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Listing>> {
    let Query(query) = query?;
    log::info!("Listing storage at path: {}", query.path);
    Ok(Json(service.list(&query.path, query.sizes).await?))
}

async fn handle_get_file(
    State(service): State<AppState>,
    query: std::result::Result<Query<FileQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(query) = query?;
    let path = required(query.path, "path")?;
    log::info!("Getting file: {path}, binary: {}", query.binary);

    Ok(match service.get_file(&path, query.binary).await? {
        FileContent::Text(file) => Json(file).into_response(),
        FileContent::Binary { mime_type, content } => {
            ([(header::CONTENT_TYPE, mime_type)], content).into_response()
        }
    })
}

async fn handle_create_file(
    State(service): State<AppState>,
    query: std::result::Result<Query<FileQuery>, QueryRejection>,
    request: std::result::Result<Json<CreateFileRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>> {
    let (Query(query), Json(request)) = (query?, request?);
    let path = required(request.path.or(query.path), "path")?;
    let content = request.content.ok_or_else(|| Error::Validation {
        message: "'content' is required".to_string(),
    })?;
    log::info!("Creating file: {path}, binary: {}", request.is_binary);

    service
        .create_or_update(&path, &content, request.is_binary)
        .await?;
    Ok(OperationResponse::ok(format!(
        "File {path} created successfully"
    )))
}

async fn handle_delete_file(
    State(service): State<AppState>,
    query: std::result::Result<Query<FileQuery>, QueryRejection>,
) -> Result<Json<OperationResponse>> {
    let Query(query) = query?;
    let path = required(query.path, "path")?;
    log::info!("Deleting file: {path}, binary: {}", query.binary);

    service.delete_file(&path, query.binary).await?;
    Ok(OperationResponse::ok(format!(
        "File {path} deleted successfully"
    )))
}

async fn handle_upload(
    State(service): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<OperationResponse>> {
    let mut multipart = multipart?;
    let mut upload: Option<Upload> = None;
    let mut target_dir: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::Validation {
        message: format!("Failed to parse multipart: {e}"),
    })? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = required(field.file_name().map(str::to_string), "filename")?;
                let content_type = field.content_type().map(str::to_string);
                let content = field.bytes().await.map_err(|e| Error::Validation {
                    message: format!("Failed to read file data: {e}"),
                })?;
                upload = Some(Upload::new(file_name, content_type, content.to_vec()));
            }
            "path" => {
                let value = field.text().await.map_err(|e| Error::Validation {
                    message: format!("Failed to read path: {e}"),
                })?;
                target_dir = Some(value);
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| Error::Validation {
        message: "'file' is required".to_string(),
    })?;
    let target_dir = target_dir.ok_or_else(|| Error::Validation {
        message: "'path' is required".to_string(),
    })?;
    let file_name = upload.file_name.clone();
    log::info!("Uploading file: {file_name} to {target_dir}");

    service.upload(upload, &target_dir).await?;
    Ok(OperationResponse::ok(format!(
        "File {file_name} uploaded successfully"
    )))
}

async fn handle_seed(State(service): State<AppState>) -> Result<Json<OperationResponse>> {
    log::info!("Initializing data folder with sample files");
    service.seed().await?;
    Ok(OperationResponse::ok(
        "Data folder initialized with sample files".to_string(),
    ))
}

// Extractor rejections render through the same JSON error body as every other failure.
macro_rules! rejection_as_validation {
    ($($rejection:ty),*) => {
        $(impl From<$rejection> for Error {
            fn from(rejection: $rejection) -> Self {
                Error::Validation {
                    message: rejection.body_text(),
                }
            }
        })*
    };
}

rejection_as_validation!(QueryRejection, JsonRejection, MultipartRejection);

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self.kind() {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, self.to_string()),
            ErrorKind::Backend => {
                log::error!("Request failed: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal storage error".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
