//! User-facing text in the two supported UI languages.

use serde::{Deserialize, Serialize};

use crate::error::{GraderError, ValidationError};
use crate::models::FileMeta;
use crate::utils::{format_score, mebibytes};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    /// Anything that is not recognizably English falls back to Chinese.
    pub fn parse(lang: &str) -> Locale {
        if lang.trim().to_lowercase().starts_with("en") {
            Locale::En
        } else {
            Locale::Zh
        }
    }
}

/// Headings and units used by the feedback renderer.
#[derive(Clone, Copy, Debug)]
pub struct FeedbackLabels {
    pub scores_heading: &'static str,
    pub criteria: [&'static str; 4],
    pub total: &'static str,
    pub rationale_heading: &'static str,
    pub suggestions_heading: &'static str,
    pub unit: &'static str,
}

pub fn feedback_labels(locale: Locale) -> FeedbackLabels {
    match locale {
        Locale::Zh => FeedbackLabels {
            scores_heading: "📊 评分细则",
            criteria: ["可编译性", "正确性", "代码质量", "可读性"],
            total: "总分",
            rationale_heading: "📝 评分理由",
            suggestions_heading: "💡 改进建议",
            unit: "分",
        },
        Locale::En => FeedbackLabels {
            scores_heading: "📊 Score breakdown",
            criteria: ["Compilability", "Correctness", "Code quality", "Readability"],
            total: "Total",
            rationale_heading: "📝 Rationale",
            suggestions_heading: "💡 Suggestions",
            unit: " pts",
        },
    }
}

pub fn preview_label(locale: Locale, meta: &FileMeta) -> String {
    let size = mebibytes(meta.size_bytes);
    match locale {
        Locale::Zh => format!("文件: {} ({} MB)", meta.name, size),
        Locale::En => format!("File: {} ({} MB)", meta.name, size),
    }
}

pub fn validation_prompt(locale: Locale, err: &ValidationError) -> String {
    match (locale, err) {
        (Locale::Zh, ValidationError::UnsupportedType { .. }) => {
            "请选择JPG或PNG格式的图片文件！".to_string()
        }
        (Locale::En, ValidationError::UnsupportedType { .. }) => {
            "Please choose a JPG or PNG image.".to_string()
        }
        (Locale::Zh, ValidationError::EmptyFile) => "所选文件为空，请重新选择".to_string(),
        (Locale::En, ValidationError::EmptyFile) => {
            "The selected file is empty, please choose another.".to_string()
        }
        (Locale::Zh, ValidationError::Unreadable { .. }) => {
            "无法读取所选文件，请重新选择".to_string()
        }
        (Locale::En, ValidationError::Unreadable { .. }) => {
            "The selected file could not be read, please choose another.".to_string()
        }
        (Locale::Zh, ValidationError::FileTooLarge { limit_bytes, .. }) => {
            format!("图片过大，请选择不超过 {} MB 的文件", mebibytes(*limit_bytes))
        }
        (Locale::En, ValidationError::FileTooLarge { limit_bytes, .. }) => {
            format!("The image is too large, the limit is {} MB.", mebibytes(*limit_bytes))
        }
        (Locale::Zh, ValidationError::MissingStudentId) => "请输入学号".to_string(),
        (Locale::En, ValidationError::MissingStudentId) => {
            "Please enter your student id.".to_string()
        }
        (Locale::Zh, ValidationError::MissingFile) => "请先选择要上传的图片！".to_string(),
        (Locale::En, ValidationError::MissingFile) => {
            "Please choose an image to upload first.".to_string()
        }
        (Locale::Zh, ValidationError::NothingToReset) => "请先上传图片".to_string(),
        (Locale::En, ValidationError::NothingToReset) => {
            "Please upload an image first.".to_string()
        }
        (Locale::Zh, ValidationError::SubmissionInFlight) => {
            "正在处理中，请稍候".to_string()
        }
        (Locale::En, ValidationError::SubmissionInFlight) => {
            "A submission is in progress, please wait.".to_string()
        }
        (Locale::Zh, ValidationError::ResultNotReady) => {
            "请先上传图片并获取评分".to_string()
        }
        (Locale::En, ValidationError::ResultNotReady) => {
            "Please upload an image and get a score first.".to_string()
        }
    }
}

/// Prompt shown on the upload page when anything goes wrong.
pub fn failure_prompt(locale: Locale, err: &GraderError) -> String {
    if let GraderError::Validation(v) = err {
        return validation_prompt(locale, v);
    }
    let detail = match (locale, err) {
        (Locale::Zh, GraderError::Upload(m)) => format!("上传失败: {m}"),
        (Locale::Zh, GraderError::Scoring(m)) => format!("获取评分失败: {m}"),
        (Locale::Zh, GraderError::Storage(m)) => format!("无法保存评分结果: {m}"),
        (Locale::Zh, GraderError::Navigation(m)) => format!("页面跳转失败: {m}"),
        _ => err.to_string(),
    };
    match locale {
        Locale::Zh => format!("处理失败：{detail}"),
        Locale::En => format!("Processing failed: {detail}"),
    }
}

/// Message for the result page's error state.
pub fn relay_failure(locale: Locale, err: &GraderError) -> String {
    match (locale, err) {
        (Locale::Zh, GraderError::RelayParse(_)) => "数据解析失败，请重新上传".to_string(),
        (Locale::En, GraderError::RelayParse(_)) => {
            "The result data could not be read, please upload again.".to_string()
        }
        (Locale::Zh, GraderError::Storage(_)) => "无法读取评分结果，请重新上传".to_string(),
        (Locale::En, GraderError::Storage(_)) => {
            "The result could not be loaded, please upload again.".to_string()
        }
        (Locale::Zh, _) => "没有找到评分结果，请先上传图片并获取评分".to_string(),
        (Locale::En, _) => {
            "No grading result found, please upload an image and get a score first.".to_string()
        }
    }
}

pub fn confirm_label(locale: Locale, submitting: bool) -> &'static str {
    match (locale, submitting) {
        (Locale::Zh, false) => "确认上传",
        (Locale::Zh, true) => "处理中...",
        (Locale::En, false) => "Upload",
        (Locale::En, true) => "Processing...",
    }
}

pub fn score_headline(locale: Locale, student_id: &str, total: f64) -> String {
    match locale {
        Locale::Zh => format!("{} - {}分", student_id, format_score(total)),
        Locale::En => format!("{} - {} pts", student_id, format_score(total)),
    }
}

pub fn load_failed_title(locale: Locale) -> &'static str {
    match locale {
        Locale::Zh => "加载失败",
        Locale::En => "Loading failed",
    }
}

pub fn back_to_upload(locale: Locale) -> &'static str {
    match locale {
        Locale::Zh => "返回上传页面",
        Locale::En => "Back to upload",
    }
}

pub fn dismiss_label(locale: Locale) -> &'static str {
    match locale {
        Locale::Zh => "确认",
        Locale::En => "OK",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn locale_parsing_defaults_to_chinese() {
        assert_eq!(Locale::parse("en-US"), Locale::En);
        assert_eq!(Locale::parse("EN"), Locale::En);
        assert_eq!(Locale::parse("zh-CN"), Locale::Zh);
        assert_eq!(Locale::parse(""), Locale::Zh);
    }

    #[test]
    fn preview_label_matches_page_format() {
        let meta = FileMeta::new("sol.png", "image/png", 2 * 1024 * 1024);
        assert_eq!(preview_label(Locale::Zh, &meta), "文件: sol.png (2.00 MB)");
        assert_eq!(preview_label(Locale::En, &meta), "File: sol.png (2.00 MB)");
    }

    #[test]
    fn remote_failures_carry_the_detail() {
        let err = GraderError::Upload("HTTP 500 INTERNAL SERVER ERROR".to_string());
        assert_eq!(
            failure_prompt(Locale::Zh, &err),
            "处理失败：上传失败: HTTP 500 INTERNAL SERVER ERROR"
        );
        let err = GraderError::Scoring("评分数据缺失".to_string());
        assert_eq!(
            failure_prompt(Locale::En, &err),
            "Processing failed: scoring failed: 评分数据缺失"
        );
    }

    #[test]
    fn relay_failures_are_distinguished() {
        assert_eq!(
            relay_failure(Locale::Zh, &GraderError::RelayNotFound),
            "没有找到评分结果，请先上传图片并获取评分"
        );
        assert_eq!(
            relay_failure(Locale::Zh, &GraderError::RelayParse("eof".into())),
            "数据解析失败，请重新上传"
        );
    }

    #[test]
    fn navigation_failure_is_not_reported_as_storage() {
        let err = GraderError::Navigation("SecurityError".to_string());
        assert_eq!(
            failure_prompt(Locale::Zh, &err),
            "处理失败：页面跳转失败: SecurityError"
        );
        assert_eq!(
            failure_prompt(Locale::En, &err),
            "Processing failed: navigation failed: SecurityError"
        );
    }
}
