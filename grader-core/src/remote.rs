//! Two-step exchange with the grading backend: upload, then score.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::config::GraderConfig;
use crate::constants::{FILE_FIELD, STUDENT_ID_FIELD, UPLOAD_SUCCESS_MARKER};
use crate::error::{GraderError, Result};
use crate::models::{GradingResult, ScoreBreakdown, ScoreReport, StagedFile};
use crate::render::FeedbackRenderer;
use crate::scoring::{FormPart, HttpResponse, ScoringClient, Transport};

#[derive(Debug, Default, Deserialize)]
struct UploadReply {
    message: Option<String>,
    filepath: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ScoreReply {
    score_breakdown: Option<ScoreBreakdown>,
    rationale: Option<String>,
    suggestions: Option<Vec<String>>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorReply {
    error: Option<String>,
}

/// Prefer the server's own `error` text, else the HTTP status line.
fn failure_detail(resp: &HttpResponse) -> String {
    serde_json::from_str::<ErrorReply>(&resp.body)
        .ok()
        .and_then(|r| r.error)
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {} {}", resp.status, resp.status_text).trim().to_string())
}

pub struct RemoteScoring<T> {
    transport: T,
    upload_url: String,
    score_url: String,
    send_student_id: bool,
    renderer: FeedbackRenderer,
}

impl<T: Transport> RemoteScoring<T> {
    pub fn new(transport: T, config: &GraderConfig) -> Self {
        RemoteScoring {
            transport,
            upload_url: config.upload_url(),
            score_url: config.score_url(),
            send_student_id: config.send_student_id,
            renderer: FeedbackRenderer::new(config.lang),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Step one: returns the server-side file path.
    pub async fn upload(&self, file: &StagedFile, student_id: &str) -> Result<String> {
        let mut parts = vec![FormPart::File {
            name: FILE_FIELD,
            file,
        }];
        if self.send_student_id {
            parts.push(FormPart::Text {
                name: STUDENT_ID_FIELD,
                value: student_id,
            });
        }
        debug!(url = %self.upload_url, file = %file.name(), "uploading");
        let resp = self
            .transport
            .post_form(&self.upload_url, &parts)
            .await
            .map_err(|e| GraderError::Upload(e.to_string()))?;
        if !resp.is_success() {
            return Err(GraderError::Upload(failure_detail(&resp)));
        }
        let reply: UploadReply = serde_json::from_str(&resp.body)
            .map_err(|e| GraderError::Upload(format!("malformed reply: {e}")))?;
        let accepted = reply
            .message
            .as_deref()
            .is_some_and(|m| m.contains(UPLOAD_SUCCESS_MARKER));
        match (accepted, reply.filepath) {
            (true, Some(path)) if !path.trim().is_empty() => Ok(path),
            _ => Err(GraderError::Upload(
                reply
                    .error
                    .unwrap_or_else(|| "upload was not acknowledged".to_string()),
            )),
        }
    }

    /// Step two: ask the backend to score an uploaded file.
    pub async fn fetch_score(&self, filepath: &str) -> Result<ScoreReport> {
        let body = serde_json::json!({ "filepath": filepath }).to_string();
        debug!(url = %self.score_url, %filepath, "requesting score");
        let resp = self
            .transport
            .post_json(&self.score_url, &body)
            .await
            .map_err(|e| GraderError::Scoring(e.to_string()))?;
        if !resp.is_success() {
            return Err(GraderError::Scoring(failure_detail(&resp)));
        }
        let reply: ScoreReply = serde_json::from_str(&resp.body)
            .map_err(|e| GraderError::Scoring(format!("malformed reply: {e}")))?;
        let Some(score_breakdown) = reply.score_breakdown else {
            return Err(GraderError::Scoring(
                reply
                    .error
                    .unwrap_or_else(|| "score breakdown missing".to_string()),
            ));
        };
        score_breakdown.check().map_err(GraderError::Scoring)?;
        Ok(ScoreReport {
            score_breakdown,
            rationale: reply.rationale.unwrap_or_default(),
            suggestions: reply.suggestions.unwrap_or_default(),
        })
    }
}

#[async_trait(?Send)]
impl<T: Transport> ScoringClient for RemoteScoring<T> {
    async fn submit(&self, file: &StagedFile, student_id: &str) -> Result<GradingResult> {
        let filepath = self.upload(file, student_id).await.inspect_err(|e| {
            error!(error = %e, "upload step failed");
        })?;
        let report = self.fetch_score(&filepath).await.inspect_err(|e| {
            error!(error = %e, "scoring step failed");
        })?;
        let total = report.score_breakdown.total();
        info!(%student_id, total, "remote score received");
        Ok(GradingResult::new(
            student_id,
            total,
            self.renderer.render_report(&report),
        ))
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
