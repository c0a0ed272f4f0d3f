//! Browser-independent core of the code grader client.
//!
//! Everything here is plain Rust with no DOM access: file intake, the scoring
//! strategies, the cross-page result relay, feedback rendering and the two
//! page controllers. The `grader-wasm` crate plugs browser implementations
//! into the [`Transport`], [`SessionStore`] and [`Navigator`] seams.

pub mod config;
pub mod constants;
pub mod error;
pub mod intake;
pub mod messages;
pub mod models;
pub mod relay;
pub mod remote;
pub mod render;
pub mod result_page;
pub mod scoring;
pub mod simulated;
#[cfg(test)]
mod testing;
pub mod upload_page;
pub mod utils;

pub use config::{BackendMode, GraderConfig};
pub use error::{GraderError, Result, TransportError, ValidationError};
pub use intake::FileIntake;
pub use messages::Locale;
pub use models::{FileMeta, GradingResult, ScoreBreakdown, ScoreReport, StagedFile};
pub use relay::{MemoryStore, Navigator, ResultRelay, SessionStore};
pub use remote::RemoteScoring;
pub use render::FeedbackRenderer;
pub use result_page::{ResultController, ResultView};
pub use scoring::{FormPart, HttpResponse, ScoringClient, Transport, build_scoring_client};
pub use simulated::SimulatedScoring;
pub use upload_page::{SelectionTicket, Submission, UploadController, UploadPhase, UploadView};
