//! Session state endpoints
//!
//! Everything the annotation screen needs: the current record with its
//! stored judgment, storing new judgments, skipping, navigating, and
//! ending the session. All endpoints answer 404 while no session is
//! active.

use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use oar_core::dataset::Record;
use oar_core::rubric::RubricSchema;
use oar_core::{Judgment, Progress};

use crate::AppState;

/// Everything the UI needs to render the current record
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub index: usize,
    pub total: usize,
    pub record: Record,
    /// Stored judgment for this record, `null` while untouched
    pub judgment: Option<Judgment>,
    pub progress: Progress,
    pub schema: RubricSchema,
    pub source_name: Option<String>,
    pub saved: bool,
    pub saved_filename: Option<String>,
}

/// GET /api/session
///
/// Snapshot of the record under the cursor plus progress and the rubric.
pub async fn get_session(
    State(app): State<AppState>,
) -> Result<Json<SessionView>, SessionApiError> {
    let guard = app.state.session.read().await;
    let session = guard.as_ref().ok_or(SessionApiError::NoSession)?;
    let (index, record) = session.current();
    Ok(Json(SessionView {
        index,
        total: session.len(),
        record: record.clone(),
        judgment: session.judgment(index).cloned(),
        progress: session.progress(),
        schema: session.schema().clone(),
        source_name: session.source_name().map(str::to_string),
        saved: session.saved().is_some(),
        saved_filename: session.saved().map(|a| a.filename.clone()),
    }))
}

/// Operator input for one record. Unknown keys are dropped during
/// normalization, missing ones default to empty or false.
#[derive(Debug, Deserialize)]
pub struct AnnotateRequest {
    pub index: usize,
    #[serde(default)]
    pub ratings: HashMap<String, String>,
    #[serde(default)]
    pub flags: HashMap<String, bool>,
    #[serde(default)]
    pub comments: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct AnnotateResponse {
    pub status: String,
    pub progress: Progress,
}

/// POST /api/annotate
///
/// Store the judgment for a record, replacing any previous one wholly.
pub async fn annotate(
    State(app): State<AppState>,
    Json(req): Json<AnnotateRequest>,
) -> Result<Json<AnnotateResponse>, SessionApiError> {
    let mut guard = app.state.session.write().await;
    let session = guard.as_mut().ok_or(SessionApiError::NoSession)?;
    let judgment = Judgment::from_parts(session.schema(), &req.ratings, &req.flags, &req.comments);
    session
        .record(req.index, judgment)
        .map_err(|e| SessionApiError::BadRequest(e.to_string()))?;
    Ok(Json(AnnotateResponse {
        status: "ok".to_string(),
        progress: session.progress(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SkipRequest {
    pub index: usize,
}

/// POST /api/skip
///
/// Mark a record as skipped, discarding any earlier input for it.
pub async fn skip(
    State(app): State<AppState>,
    Json(req): Json<SkipRequest>,
) -> Result<Json<AnnotateResponse>, SessionApiError> {
    let mut guard = app.state.session.write().await;
    let session = guard.as_mut().ok_or(SessionApiError::NoSession)?;
    session
        .skip(req.index)
        .map_err(|e| SessionApiError::BadRequest(e.to_string()))?;
    Ok(Json(AnnotateResponse {
        status: "ok".to_string(),
        progress: session.progress(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    /// "next" or "previous"
    pub direction: String,
}

#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub status: String,
    pub index: usize,
}

/// POST /api/navigate
///
/// Move the cursor one record in the given direction, clamped at both
/// ends. Returns the position actually reached.
pub async fn navigate(
    State(app): State<AppState>,
    Json(req): Json<NavigateRequest>,
) -> Result<Json<NavigateResponse>, SessionApiError> {
    let mut guard = app.state.session.write().await;
    let session = guard.as_mut().ok_or(SessionApiError::NoSession)?;
    let index = match req.direction.as_str() {
        "next" => session.advance(),
        "previous" => session.retreat(),
        other => {
            return Err(SessionApiError::BadRequest(format!(
                "unknown direction: {}",
                other
            )))
        }
    };
    Ok(Json(NavigateResponse {
        status: "ok".to_string(),
        index,
    }))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// POST /api/quit
///
/// Discard the session. Safe to call whether or not it was saved, and
/// with no session at all.
pub async fn quit(State(app): State<AppState>) -> Json<StatusResponse> {
    let had_unsaved = {
        let guard = app.state.session.read().await;
        matches!(guard.as_ref(), Some(s) if s.saved().is_none())
    };
    app.state.clear().await;
    if had_unsaved {
        info!("session discarded without saving");
    }
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

/// POST /api/restart
///
/// Drop the session so a new dataset can be uploaded.
pub async fn restart(State(app): State<AppState>) -> Json<StatusResponse> {
    if app.state.clear().await {
        info!("session cleared for a new upload");
    }
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

/// Session API errors
#[derive(Debug)]
pub enum SessionApiError {
    NoSession,
    BadRequest(String),
}

impl IntoResponse for SessionApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SessionApiError::NoSession => (
                StatusCode::NOT_FOUND,
                "No active session. Upload a dataset first.".to_string(),
            ),
            SessionApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
