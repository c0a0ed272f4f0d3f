//! Result page: read the relayed result once and describe what to show.

use tracing::{info, warn};

use crate::config::GraderConfig;
use crate::error::Result;
use crate::messages::{self, Locale};
use crate::relay::{Navigator, ResultRelay, SessionStore};

#[derive(Clone, Debug, PartialEq)]
pub enum ResultView {
    Loaded {
        headline: String,
        student_id: String,
        total_score: f64,
        /// Trusted markup produced by the feedback renderer.
        feedback_markup: String,
    },
    /// No usable result. Carries no score text at all.
    Failed {
        title: &'static str,
        message: String,
        action_label: &'static str,
    },
}

#[derive(Debug)]
pub struct ResultController {
    view: ResultView,
    upload_page: String,
}

impl ResultController {
    /// Consumes the pending result, if any. Call once per page load.
    pub fn load<S: SessionStore>(config: &GraderConfig, relay: &ResultRelay<S>) -> Self {
        let locale = config.lang;
        let view = match relay.consume() {
            Ok(result) => {
                info!(student_id = %result.student_id, total = result.total_score, "showing result");
                ResultView::Loaded {
                    headline: messages::score_headline(locale, &result.student_id, result.total_score),
                    student_id: result.student_id,
                    total_score: result.total_score,
                    feedback_markup: result.feedback_markup,
                }
            }
            Err(err) => {
                warn!(error = %err, "no result to show");
                failed(locale, &err)
            }
        };
        ResultController {
            view,
            upload_page: config.upload_page.clone(),
        }
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn is_error(&self) -> bool {
        matches!(self.view, ResultView::Failed { .. })
    }

    pub fn upload_page(&self) -> &str {
        &self.upload_page
    }

    /// "Upload again" / the error panel's back action.
    pub fn upload_again(&self, navigator: &dyn Navigator) -> Result<()> {
        navigator.navigate(&self.upload_page)
    }
}

fn failed(locale: Locale, err: &crate::error::GraderError) -> ResultView {
    ResultView::Failed {
        title: messages::load_failed_title(locale),
        message: messages::relay_failure(locale, err),
        action_label: messages::back_to_upload(locale),
    }
}
