//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then the JSON object a host page
//! assigns to `window.__GRADER_CONFIG`, then URL query parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_MAX_FILE_BYTES, DEFAULT_RESULT_PAGE,
    DEFAULT_SIMULATED_LATENCY_MS, DEFAULT_UPLOAD_PAGE, MAX_SIMULATED_LATENCY_MS, SCORE_PATH,
    UPLOAD_PATH,
};
use crate::error::{GraderError, Result};
use crate::messages::Locale;
use crate::utils::{get_query_param, join_url};

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Which scoring strategy the upload page uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Locally synthesized results, no network.
    #[default]
    Simulated,
    /// Real upload + score exchange.
    Remote,
}

impl FromStr for BackendMode {
    type Err = GraderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "simulated" | "mock" | "offline" => Ok(BackendMode::Simulated),
            "remote" | "real" => Ok(BackendMode::Remote),
            other => Err(GraderError::Config(format!("unknown backend '{other}'"))),
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendMode::Simulated => write!(f, "simulated"),
            BackendMode::Remote => write!(f, "remote"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraderConfig {
    pub api_base_url: String,
    pub backend: BackendMode,
    pub max_file_bytes: u64,
    pub simulated_latency_ms: u32,
    /// Adds the student id as an extra multipart field on upload.
    pub send_student_id: bool,
    pub lang: Locale,
    pub log_level: String,
    pub upload_page: String,
    pub result_page: String,
}

impl Default for GraderConfig {
    fn default() -> Self {
        GraderConfig {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            backend: BackendMode::default(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            simulated_latency_ms: DEFAULT_SIMULATED_LATENCY_MS,
            send_student_id: false,
            lang: Locale::default(),
            log_level: "info".to_string(),
            upload_page: DEFAULT_UPLOAD_PAGE.to_string(),
            result_page: DEFAULT_RESULT_PAGE.to_string(),
        }
    }
}

impl GraderConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| GraderError::Config(e.to_string()))
    }

    /// Overrides from `?backend=..&api=..&lang=..&log=..`.
    pub fn apply_query(&mut self, search: &str) -> Result<()> {
        if let Some(b) = get_query_param(search, "backend") {
            self.backend = b.parse()?;
        }
        if let Some(api) = get_query_param(search, "api") {
            self.api_base_url = api;
        }
        if let Some(lang) = get_query_param(search, "lang") {
            self.lang = Locale::parse(&lang);
        }
        if let Some(level) = get_query_param(search, "log") {
            self.log_level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(GraderError::Config("api_base_url is empty".to_string()));
        }
        if self.max_file_bytes == 0 {
            return Err(GraderError::Config("max_file_bytes must be positive".to_string()));
        }
        if self.simulated_latency_ms > MAX_SIMULATED_LATENCY_MS {
            return Err(GraderError::Config(format!(
                "simulated_latency_ms must be at most {MAX_SIMULATED_LATENCY_MS}"
            )));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(GraderError::Config(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        if self.upload_page.trim().is_empty() || self.result_page.trim().is_empty() {
            return Err(GraderError::Config("page paths must not be empty".to_string()));
        }
        Ok(())
    }

    /// Build the effective configuration. Any layer that fails to parse or
    /// validate is skipped with a warning, so the page always starts.
    pub fn resolve(host_json: Option<&str>, search: &str) -> Self {
        let (cfg, skipped) = GraderConfig::resolve_layers(host_json, search);
        for e in skipped {
            warn!(error = %e, "ignoring configuration layer");
        }
        cfg
    }

    /// Like [`GraderConfig::resolve`] but hands back the skipped layers'
    /// errors, for callers that set up logging from the result.
    pub fn resolve_layers(host_json: Option<&str>, search: &str) -> (Self, Vec<GraderError>) {
        let mut cfg = GraderConfig::default();
        let mut skipped = Vec::new();
        if let Some(text) = host_json {
            match GraderConfig::from_json(text).and_then(|c| c.validate().map(|_| c)) {
                Ok(c) => cfg = c,
                Err(e) => skipped.push(e),
            }
        }
        let mut overridden = cfg.clone();
        match overridden
            .apply_query(search)
            .and_then(|_| overridden.validate())
        {
            Ok(()) => cfg = overridden,
            Err(e) => skipped.push(e),
        }
        (cfg, skipped)
    }

    pub fn upload_url(&self) -> String {
        join_url(&self.api_base_url, UPLOAD_PATH)
    }

    pub fn score_url(&self) -> String {
        join_url(&self.api_base_url, SCORE_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_offline_build() {
        let cfg = GraderConfig::default();
        assert_eq!(cfg.backend, BackendMode::Simulated);
        assert_eq!(cfg.upload_url(), "http://localhost:5000/upload");
        assert_eq!(cfg.score_url(), "http://localhost:5000/ai_score");
        assert_eq!(cfg.max_file_bytes, 10 * 1024 * 1024);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn host_json_fills_missing_fields_with_defaults() {
        let cfg = GraderConfig::from_json(r#"{"backend": "remote", "lang": "en"}"#).unwrap();
        assert_eq!(cfg.backend, BackendMode::Remote);
        assert_eq!(cfg.lang, Locale::En);
        assert_eq!(cfg.result_page, "result.html");
    }

    #[test]
    fn query_overrides_host_json() {
        let cfg = GraderConfig::resolve(
            Some(r#"{"backend": "remote", "api_base_url": "http://a:1"}"#),
            "?api=http%3A%2F%2Fb%3A2&backend=simulated",
        );
        assert_eq!(cfg.api_base_url, "http://b:2");
        assert_eq!(cfg.backend, BackendMode::Simulated);
    }

    #[test]
    fn bad_layers_are_skipped() {
        let cfg = GraderConfig::resolve(Some("{not json"), "?backend=carrier-pigeon");
        assert_eq!(cfg, GraderConfig::default());

        let cfg = GraderConfig::resolve(Some(r#"{"max_file_bytes": 0}"#), "");
        assert_eq!(cfg.max_file_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn skipped_layers_are_reported() {
        let (cfg, skipped) =
            GraderConfig::resolve_layers(Some(r#"{"lang": "en"}"#), "?log=shouty");
        assert_eq!(cfg.lang, Locale::En);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(skipped.len(), 1);
        assert!(matches!(skipped[0], GraderError::Config(_)));

        let (_, skipped) = GraderConfig::resolve_layers(None, "?lang=en&log=debug");
        assert!(skipped.is_empty());
    }

    #[test]
    fn huge_latency_is_rejected() {
        let cfg = GraderConfig {
            simulated_latency_ms: u32::MAX,
            ..GraderConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(GraderError::Config(_))));

        let cfg = GraderConfig::resolve(Some(r#"{"simulated_latency_ms": 3000000000}"#), "");
        assert_eq!(cfg.simulated_latency_ms, 2000);
    }

    #[test]
    fn unknown_log_level_is_invalid() {
        let cfg = GraderConfig {
            log_level: "loud".to_string(),
            ..GraderConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(GraderError::Config(_))));
    }
}
