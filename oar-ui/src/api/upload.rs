//! Dataset upload handling
//!
//! POST /api/upload takes a multipart form with a `file` part holding the
//! CSV. A successful upload installs a fresh session, replacing any
//! active one.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use oar_core::Session;

use crate::{csv_io, AppState};

/// Successful upload summary
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub rubric: String,
    /// True when an active session was thrown away for this one
    pub replaced: bool,
}

/// POST /api/upload
pub async fn upload_dataset(
    State(app): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload.csv").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| UploadError::Multipart(e.to_string()))?;
            upload = Some((filename, bytes.to_vec()));
        }
    }
    let (filename, bytes) = upload.ok_or(UploadError::MissingFile)?;

    let dataset =
        csv_io::read_dataset(&bytes).map_err(|e| UploadError::InvalidCsv(e.to_string()))?;
    if dataset.columns().is_empty() {
        return Err(UploadError::InvalidCsv("no header row found".to_string()));
    }

    let schema = (*app.schema).clone();
    let mut session = Session::new(dataset, schema).map_err(UploadError::Rejected)?;
    session.set_source_name(filename.as_str());

    let rows = session.len();
    let columns = session.dataset().columns().to_vec();
    let rubric = session.schema().name.clone();
    let replaced = app.state.install(session).await;
    info!(rows, file = %filename, replaced, "dataset uploaded");

    Ok(Json(UploadResponse {
        status: "ok".to_string(),
        rows,
        columns,
        rubric,
        replaced,
    }))
}

/// Upload API errors
#[derive(Debug)]
pub enum UploadError {
    MissingFile,
    Multipart(String),
    InvalidCsv(String),
    Rejected(oar_core::Error),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let message = match self {
            UploadError::MissingFile => "No file field in upload".to_string(),
            UploadError::Multipart(msg) => format!("Malformed upload: {}", msg),
            UploadError::InvalidCsv(msg) => {
                format!("Invalid CSV file. Please check the file format. ({})", msg)
            }
            UploadError::Rejected(err) => err.to_string(),
        };

        let body = Json(json!({
            "error": message,
        }));

        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
