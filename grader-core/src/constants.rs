/// Shared constants for the grader client.
/// Sizes are in bytes unless noted otherwise.
pub const RELAY_KEY: &str = "gradingResult";
/// MIME types accepted by the intake.
pub const ACCEPTED_MIME_TYPES: [&str; 2] = ["image/jpeg", "image/png"];
/// Default upload size limit (10 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;
pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const UPLOAD_PATH: &str = "upload";
pub const SCORE_PATH: &str = "ai_score";
/// Multipart field names understood by the upload endpoint.
pub const FILE_FIELD: &str = "file";
pub const STUDENT_ID_FIELD: &str = "student_id";
/// Substring of the upload reply `message` that marks success.
pub const UPLOAD_SUCCESS_MARKER: &str = "successfully";

pub const DEFAULT_UPLOAD_PAGE: &str = "index.html";
pub const DEFAULT_RESULT_PAGE: &str = "result.html";

/// Artificial latency of the simulated backend (ms).
pub const DEFAULT_SIMULATED_LATENCY_MS: u32 = 2000;
/// Upper bound for the simulated latency; `setTimeout` takes an `i32`.
pub const MAX_SIMULATED_LATENCY_MS: u32 = 60_000;
/// Simulated totals are drawn from `MIN..MAX` (upper bound exclusive).
pub const SIMULATED_TOTAL_MIN: u32 = 70;
pub const SIMULATED_TOTAL_MAX: u32 = 100;

/// Maximum points per criterion.
pub const MAX_COMPILABILITY: f64 = 20.0;
pub const MAX_CORRECTNESS: f64 = 50.0;
pub const MAX_CODE_QUALITY: f64 = 20.0;
pub const MAX_READABILITY: f64 = 10.0;
pub const MAX_TOTAL: f64 = 100.0;
