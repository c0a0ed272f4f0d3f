//! Element ids and selectors the host pages provide.

// page markers
pub const UPLOAD_CARD: &str = ".upload-card";
pub const RESULT_CARD: &str = ".result-card";

// upload page
pub const UPLOAD_AREA: &str = "uploadArea";
pub const FILE_INPUT: &str = "fileInput";
pub const CONFIRM_BTN: &str = "confirmBtn";
pub const REUPLOAD_BTN: &str = "reuploadBtn";
pub const PREVIEW_AREA: &str = "previewArea";
pub const PREVIEW_IMAGE: &str = "previewImage";
pub const PREVIEW_FILENAME: &str = "previewFilename";
pub const UPLOAD_STATUS: &str = "uploadStatus";
pub const STUDENT_ID: &str = "studentId";

// result page
pub const UPLOAD_AGAIN_BTN: &str = "uploadAgainBtn";
pub const AI_CONTENT: &str = "aiContent";
pub const LOADING_CONTENT: &str = "loadingContent";
pub const STUDENT_SCORE: &str = "studentScore";

/// Class carried by the drop zone while a drag hovers it.
pub const DRAGOVER_CLASS: &str = "dragover";
/// Class added to the result card in its error state.
pub const ERROR_CLASS: &str = "error";

/// Global the host page may assign a JSON config object to.
pub const HOST_CONFIG_GLOBAL: &str = "__GRADER_CONFIG";
