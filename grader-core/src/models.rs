use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_CODE_QUALITY, MAX_COMPILABILITY, MAX_CORRECTNESS, MAX_READABILITY, MAX_TOTAL,
};

/// What is known about a chosen file before its bytes have been read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        FileMeta {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }
}

/// The one validated file awaiting submission, with its decoded content.
#[derive(Clone, PartialEq, Eq)]
pub struct StagedFile {
    meta: FileMeta,
    content: Vec<u8>,
    preview_url: String,
}

impl StagedFile {
    pub(crate) fn new(meta: FileMeta, content: Vec<u8>) -> Self {
        let preview_url = format!("data:{};base64,{}", meta.mime_type, STANDARD.encode(&content));
        StagedFile {
            meta,
            content,
            preview_url,
        }
    }

    pub fn meta(&self) -> &FileMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn mime_type(&self) -> &str {
        &self.meta.mime_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.meta.size_bytes
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// `data:` URL suitable for an `<img src>`.
    pub fn preview_url(&self) -> &str {
        &self.preview_url
    }
}

// Content can be megabytes; keep it out of logs.
impl fmt::Debug for StagedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedFile")
            .field("meta", &self.meta)
            .field("content_len", &self.content.len())
            .finish()
    }
}

/// Per-criterion scores plus the total. Read-only once built.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(default)]
    compilability: f64,
    #[serde(default)]
    correctness: f64,
    #[serde(default)]
    code_quality: f64,
    #[serde(default)]
    readability: f64,
    total: f64,
}

impl ScoreBreakdown {
    pub fn new(
        compilability: f64,
        correctness: f64,
        code_quality: f64,
        readability: f64,
        total: f64,
    ) -> Self {
        ScoreBreakdown {
            compilability,
            correctness,
            code_quality,
            readability,
            total,
        }
    }

    pub fn compilability(&self) -> f64 {
        self.compilability
    }

    pub fn correctness(&self) -> f64 {
        self.correctness
    }

    pub fn code_quality(&self) -> f64 {
        self.code_quality
    }

    pub fn readability(&self) -> f64 {
        self.readability
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// `(value, max)` per criterion in display order.
    pub fn criteria(&self) -> [(f64, f64); 4] {
        [
            (self.compilability, MAX_COMPILABILITY),
            (self.correctness, MAX_CORRECTNESS),
            (self.code_quality, MAX_CODE_QUALITY),
            (self.readability, MAX_READABILITY),
        ]
    }

    /// The total must be a finite number within `0..=100`.
    pub fn check(&self) -> Result<(), String> {
        if !self.total.is_finite() || !(0.0..=MAX_TOTAL).contains(&self.total) {
            return Err(format!("total score {} is outside 0..=100", self.total));
        }
        if self.criteria().iter().any(|(v, _)| !v.is_finite()) {
            return Err("sub-score is not a number".to_string());
        }
        Ok(())
    }
}

/// Decoded success reply of the scoring endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score_breakdown: ScoreBreakdown,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Normalized outcome of one grading run, handed from the upload page to the
/// result page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    pub student_id: String,
    pub total_score: f64,
    /// Markup produced by `FeedbackRenderer`.
    #[serde(rename = "ai_feedback")]
    pub feedback_markup: String,
}

impl GradingResult {
    pub fn new(student_id: impl Into<String>, total_score: f64, feedback_markup: String) -> Self {
        GradingResult {
            student_id: student_id.into(),
            total_score,
            feedback_markup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn staged_file_builds_data_url() {
        let f = StagedFile::new(FileMeta::new("a.png", "image/png", 3), vec![1, 2, 3]);
        assert_eq!(f.preview_url(), "data:image/png;base64,AQID");
        assert_eq!(f.size_bytes(), 3);
        assert!(!format!("{f:?}").contains("[1, 2, 3]"));
    }

    #[test]
    fn breakdown_defaults_missing_criteria_to_zero() {
        let b: ScoreBreakdown = serde_json::from_str(r#"{"correctness": 40, "total": 40}"#).unwrap();
        assert_eq!(b.compilability(), 0.0);
        assert_eq!(b.correctness(), 40.0);
        assert_eq!(b.total(), 40.0);
        assert!(serde_json::from_str::<ScoreBreakdown>(r#"{"correctness": 40}"#).is_err());
    }

    #[test]
    fn breakdown_check_rejects_out_of_range_totals() {
        assert!(ScoreBreakdown::new(20.0, 50.0, 20.0, 10.0, 100.0).check().is_ok());
        assert!(ScoreBreakdown::new(0.0, 0.0, 0.0, 0.0, 120.0).check().is_err());
        assert!(ScoreBreakdown::new(0.0, 0.0, 0.0, 0.0, -1.0).check().is_err());
        assert!(ScoreBreakdown::new(f64::NAN, 0.0, 0.0, 0.0, 10.0).check().is_err());
    }

    #[test]
    fn grading_result_uses_page_field_names() {
        let r = GradingResult::new("2023001", 88.0, "<p>ok</p>".to_string());
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "student_id": "2023001",
                "total_score": 88.0,
                "ai_feedback": "<p>ok</p>"
            })
        );
    }
}
