//! Save and download endpoints
//!
//! Saving finalizes the export exactly once per session; downloading
//! serves the stored artifact as a CSV attachment. Downloading before
//! saving is a conflict, never an implicit save.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use oar_core::export;

use crate::{csv_io, AppState};

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub status: String,
    /// Name the export is stored under; the first save wins
    pub filename: String,
    pub already_saved: bool,
}

/// Keep alphanumerics, spaces and underscores; drop everything else and
/// trim trailing whitespace.
fn sanitize_filename(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// POST /api/save
///
/// Finalize the export under the given name. Repeating the call returns
/// the original save unchanged.
pub async fn save(
    State(app): State<AppState>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, ExportApiError> {
    let filename = sanitize_filename(&req.filename);
    if filename.is_empty() {
        return Err(ExportApiError::InvalidFilename(req.filename));
    }

    let mut guard = app.state.session.write().await;
    let session = guard.as_mut().ok_or(ExportApiError::NoSession)?;
    let already_saved = session.saved().is_some();
    let artifact = export::finalize(session, &filename)
        .map_err(|e| ExportApiError::ExportFailed(e.to_string()))?;

    Ok(Json(SaveResponse {
        status: "ok".to_string(),
        filename: artifact.filename.clone(),
        already_saved,
    }))
}

/// GET /api/download
///
/// Serve the saved export as `{filename}.csv`.
pub async fn download(State(app): State<AppState>) -> Result<Response, ExportApiError> {
    let guard = app.state.session.read().await;
    let session = guard.as_ref().ok_or(ExportApiError::NoSession)?;
    let artifact = session.saved().ok_or(ExportApiError::NotSaved)?;
    let bytes = csv_io::write_csv(&artifact.table)
        .map_err(|e| ExportApiError::ExportFailed(e.to_string()))?;
    info!(filename = %artifact.filename, bytes = bytes.len(), "export downloaded");

    let disposition = format!("attachment; filename=\"{}.csv\"", artifact.filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Export API errors
#[derive(Debug)]
pub enum ExportApiError {
    NoSession,
    NotSaved,
    InvalidFilename(String),
    ExportFailed(String),
}

impl IntoResponse for ExportApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ExportApiError::NoSession => (
                StatusCode::NOT_FOUND,
                "No active session. Upload a dataset first.".to_string(),
            ),
            ExportApiError::NotSaved => (
                StatusCode::CONFLICT,
                "Session has not been saved yet. Save before downloading.".to_string(),
            ),
            ExportApiError::InvalidFilename(raw) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid filename: {:?}", raw),
            ),
            ExportApiError::ExportFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Export failed: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::sanitize_filename;

    #[test]
    fn keeps_alphanumerics_spaces_underscores() {
        assert_eq!(sanitize_filename("run_1 final"), "run_1 final");
    }

    #[test]
    fn strips_path_separators_and_punctuation() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_filename("results.csv"), "resultscsv");
        assert_eq!(sanitize_filename("a\"b\\c"), "abc");
    }

    #[test]
    fn trims_trailing_whitespace() {
        assert_eq!(sanitize_filename("name  "), "name");
    }

    #[test]
    fn rejects_when_nothing_survives() {
        assert_eq!(sanitize_filename("!!!"), "");
        assert_eq!(sanitize_filename("   "), "");
    }
}
