//! State machine behind the upload page.
//!
//! ```text
//! Idle ──select+decode──▶ Previewing ──confirm──▶ Submitting ──ok──▶ NavigatingAway
//!                              ▲                      │
//!                              └──── ErrorShown ◀─err─┘
//! ```
//!
//! The browser shell calls one handler per DOM event and re-renders from
//! [`UploadController::view`]. Nothing here touches the DOM.

use tracing::{debug, info, warn};

use crate::config::GraderConfig;
use crate::error::{GraderError, Result, ValidationError};
use crate::intake::FileIntake;
use crate::messages::{self, Locale};
use crate::models::{FileMeta, GradingResult, StagedFile};
use crate::relay::{Navigator, ResultRelay, SessionStore};
use crate::scoring::ScoringClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Previewing,
    Submitting,
    NavigatingAway,
    ErrorShown,
}

/// Identifies one accepted selection whose content is still being read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionTicket(u64);

/// Owned snapshot handed to the scoring client, so no controller borrow is
/// held across the network calls.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub file: StagedFile,
    pub student_id: String,
}

/// Everything the page needs to draw itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadView {
    pub show_upload_area: bool,
    pub show_preview: bool,
    pub show_status: bool,
    pub confirm_enabled: bool,
    pub confirm_label: &'static str,
    pub reupload_enabled: bool,
    pub preview_label: Option<String>,
    pub preview_url: Option<String>,
}

#[derive(Debug)]
pub struct UploadController {
    intake: FileIntake,
    locale: Locale,
    result_page: String,
    phase: UploadPhase,
    staged: Option<StagedFile>,
    student_id: String,
    ever_staged: bool,
    next_ticket: u64,
    pending: Option<(SelectionTicket, FileMeta)>,
}

impl UploadController {
    pub fn new(config: &GraderConfig) -> Self {
        UploadController {
            intake: FileIntake::new(config.max_file_bytes),
            locale: config.lang,
            result_page: config.result_page.clone(),
            phase: UploadPhase::Idle,
            staged: None,
            student_id: String::new(),
            ever_staged: false,
            next_ticket: 0,
            pending: None,
        }
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn result_page(&self) -> &str {
        &self.result_page
    }

    pub fn staged(&self) -> Option<&StagedFile> {
        self.staged.as_ref()
    }

    /// Trimmed student id.
    pub fn student_id(&self) -> &str {
        self.student_id.trim()
    }

    fn transition(&mut self, to: UploadPhase) {
        if self.phase != to {
            debug!(from = ?self.phase, to = ?to, "upload phase");
            self.phase = to;
        }
    }

    fn busy(&self) -> bool {
        matches!(
            self.phase,
            UploadPhase::Submitting | UploadPhase::NavigatingAway
        )
    }

    /// A file was picked or dropped. On success the shell reads the content
    /// and reports back through [`Self::file_decoded`] with the ticket.
    /// On rejection nothing changes.
    pub fn select_file(&mut self, meta: FileMeta) -> Result<SelectionTicket> {
        if self.busy() {
            return Err(ValidationError::SubmissionInFlight.into());
        }
        self.intake.validate(&meta)?;
        self.next_ticket += 1;
        let ticket = SelectionTicket(self.next_ticket);
        debug!(file = %meta.name, ?ticket, "decoding selection");
        self.pending = Some((ticket, meta));
        Ok(ticket)
    }

    /// Content for `ticket` is available. Returns `Ok(false)` when the ticket
    /// was superseded by a newer selection or a reset.
    pub fn file_decoded(&mut self, ticket: SelectionTicket, content: Vec<u8>) -> Result<bool> {
        let meta = match self.pending.take() {
            Some((t, meta)) if t == ticket => meta,
            other => {
                self.pending = other;
                debug!(?ticket, "stale decode dropped");
                return Ok(false);
            }
        };
        if self.busy() {
            return Ok(false);
        }
        let staged = self.intake.stage(meta, content)?;
        self.staged = Some(staged);
        self.ever_staged = true;
        self.transition(UploadPhase::Previewing);
        Ok(true)
    }

    /// Reading the content failed; the previous state stays. Returns the
    /// error to show for the current selection, nothing for a stale one.
    pub fn decode_failed(&mut self, ticket: SelectionTicket, reason: &str) -> Result<()> {
        match &self.pending {
            Some((t, meta)) if *t == ticket => {
                warn!(file = %meta.name, %reason, "file could not be read");
                self.pending = None;
                Err(ValidationError::Unreadable {
                    reason: reason.to_string(),
                }
                .into())
            }
            _ => {
                debug!(?ticket, "stale read failure dropped");
                Ok(())
            }
        }
    }

    pub fn set_student_id(&mut self, raw: &str) {
        self.student_id = raw.to_string();
    }

    pub fn confirm_enabled(&self) -> bool {
        self.staged.is_some() && !self.student_id().is_empty() && !self.busy()
    }

    /// Confirm clicked. Student id is checked before the file.
    pub fn begin_submit(&mut self) -> Result<Submission> {
        if self.busy() {
            return Err(ValidationError::SubmissionInFlight.into());
        }
        if self.student_id().is_empty() {
            warn!("confirm without student id");
            return Err(ValidationError::MissingStudentId.into());
        }
        let Some(file) = self.staged.clone() else {
            warn!("confirm without staged file");
            return Err(ValidationError::MissingFile.into());
        };
        let submission = Submission {
            file,
            student_id: self.student_id().to_string(),
        };
        info!(student_id = %submission.student_id, file = %submission.file.name(), "submitting");
        self.transition(UploadPhase::Submitting);
        Ok(submission)
    }

    /// The result has been published and the page is leaving.
    pub fn submission_succeeded(&mut self) {
        self.staged = None;
        self.pending = None;
        self.transition(UploadPhase::NavigatingAway);
    }

    /// Back to a retryable state with the staged file kept. Returns the
    /// prompt to show.
    pub fn submission_failed(&mut self, err: &GraderError) -> String {
        warn!(error = %err, "submission failed");
        self.transition(UploadPhase::ErrorShown);
        self.prompt_for(err)
    }

    /// Re-upload: back to Idle. Only once a file has been staged, and not
    /// while a submission is running.
    pub fn reset(&mut self) -> Result<()> {
        if !self.ever_staged {
            return Err(ValidationError::NothingToReset.into());
        }
        if self.busy() {
            return Err(ValidationError::SubmissionInFlight.into());
        }
        self.staged = None;
        self.pending = None;
        self.transition(UploadPhase::Idle);
        Ok(())
    }

    /// Whether following a link to the result page is allowed right now.
    pub fn guard_result_navigation(&self, result_pending: bool) -> Result<()> {
        if result_pending || self.phase == UploadPhase::NavigatingAway {
            Ok(())
        } else {
            Err(ValidationError::ResultNotReady.into())
        }
    }

    pub fn prompt_for(&self, err: &GraderError) -> String {
        messages::failure_prompt(self.locale, err)
    }

    pub fn view(&self) -> UploadView {
        let has_file = self.staged.is_some();
        let submitting = self.phase == UploadPhase::Submitting;
        UploadView {
            show_upload_area: !has_file,
            show_preview: has_file,
            show_status: submitting,
            confirm_enabled: self.confirm_enabled(),
            confirm_label: messages::confirm_label(self.locale, submitting),
            reupload_enabled: !self.busy(),
            preview_label: self
                .staged
                .as_ref()
                .map(|f| messages::preview_label(self.locale, f.meta())),
            preview_url: self.staged.as_ref().map(|f| f.preview_url().to_string()),
        }
    }
}

/// Score a submission, publish the result and navigate to the result page.
/// Nothing is published when scoring fails.
pub async fn submit_and_publish<C, S>(
    client: &C,
    relay: &ResultRelay<S>,
    navigator: &dyn Navigator,
    destination: &str,
    submission: &Submission,
) -> Result<GradingResult>
where
    C: ScoringClient + ?Sized,
    S: SessionStore,
{
    debug!(client = client.name(), "starting submission");
    let result = client
        .submit(&submission.file, &submission.student_id)
        .await?;
    relay.publish(&result, navigator, destination)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::constants::RELAY_KEY;
    use crate::relay::MemoryStore;
    use crate::render::FeedbackRenderer;
    use crate::simulated::SimulatedScoring;
    use crate::testing::RecordingNavigator;
    use pretty_assertions::assert_eq;

    struct FailingScoring;

    #[async_trait(?Send)]
    impl ScoringClient for FailingScoring {
        async fn submit(&self, _file: &StagedFile, _student_id: &str) -> Result<GradingResult> {
            Err(GraderError::Upload("HTTP 503 Service Unavailable".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn controller() -> UploadController {
        UploadController::new(&GraderConfig::default())
    }

    fn png(name: &str, size: usize) -> (FileMeta, Vec<u8>) {
        (FileMeta::new(name, "image/png", size as u64), vec![7u8; size])
    }

    fn stage(c: &mut UploadController, name: &str, size: usize) {
        let (meta, bytes) = png(name, size);
        let ticket = c.select_file(meta).unwrap();
        assert!(c.file_decoded(ticket, bytes).unwrap());
    }

    #[test]
    fn starts_idle_with_confirm_disabled() {
        let c = controller();
        let v = c.view();
        assert_eq!(c.phase(), UploadPhase::Idle);
        assert!(v.show_upload_area);
        assert!(!v.show_preview);
        assert!(!v.confirm_enabled);
        assert_eq!(v.confirm_label, "确认上传");
    }

    #[test]
    fn two_megabyte_png_previews_with_label() {
        let mut c = controller();
        stage(&mut c, "sol.png", 2 * 1024 * 1024);

        let v = c.view();
        assert_eq!(c.phase(), UploadPhase::Previewing);
        assert_eq!(v.preview_label.as_deref(), Some("文件: sol.png (2.00 MB)"));
        assert!(v.preview_url.unwrap().starts_with("data:image/png;base64,"));
        assert!(!v.show_upload_area);
        assert!(v.show_preview);
        assert!(!v.confirm_enabled);

        c.set_student_id("   ");
        assert!(!c.view().confirm_enabled);
        c.set_student_id(" 2023001 ");
        assert!(c.view().confirm_enabled);
        assert_eq!(c.student_id(), "2023001");
    }

    #[test]
    fn rejected_type_leaves_staged_file_alone() {
        let mut c = controller();
        stage(&mut c, "first.png", 16);
        let before = c.staged().cloned();

        for mime in ["image/gif", "application/pdf", "text/x-c++src"] {
            let err = c.select_file(FileMeta::new("x", mime, 10)).unwrap_err();
            assert!(matches!(
                err,
                GraderError::Validation(ValidationError::UnsupportedType { .. })
            ));
            assert_eq!(c.prompt_for(&err), "请选择JPG或PNG格式的图片文件！");
        }
        assert_eq!(c.staged().cloned(), before);
        assert_eq!(c.phase(), UploadPhase::Previewing);
    }

    #[test]
    fn oversized_file_is_rejected() {
        let cfg = GraderConfig {
            max_file_bytes: 1024,
            ..GraderConfig::default()
        };
        let mut c = UploadController::new(&cfg);
        let err = c.select_file(FileMeta::new("big.png", "image/png", 4096)).unwrap_err();
        assert_eq!(
            err,
            GraderError::Validation(ValidationError::FileTooLarge {
                size_bytes: 4096,
                limit_bytes: 1024
            })
        );
        assert_eq!(c.phase(), UploadPhase::Idle);
    }

    #[test]
    fn stale_decode_is_dropped() {
        let mut c = controller();
        let (m1, b1) = png("one.png", 4);
        let (m2, b2) = png("two.png", 8);
        let t1 = c.select_file(m1).unwrap();
        let t2 = c.select_file(m2).unwrap();

        assert!(!c.file_decoded(t1, b1).unwrap());
        assert_eq!(c.phase(), UploadPhase::Idle);
        assert!(c.file_decoded(t2, b2).unwrap());
        assert_eq!(c.staged().map(|f| f.name()), Some("two.png"));
    }

    #[test]
    fn decode_after_reset_is_dropped() {
        let mut c = controller();
        stage(&mut c, "one.png", 4);
        let (meta, bytes) = png("two.png", 4);
        let ticket = c.select_file(meta).unwrap();
        c.reset().unwrap();
        assert!(!c.file_decoded(ticket, bytes).unwrap());
        assert_eq!(c.phase(), UploadPhase::Idle);
        assert!(c.staged().is_none());
    }

    #[test]
    fn read_failure_prompts_and_keeps_staged_file() {
        let mut c = controller();
        stage(&mut c, "first.png", 16);
        let ticket = c.select_file(png("second.png", 8).0).unwrap();

        let err = c.decode_failed(ticket, "NotReadableError").unwrap_err();
        assert_eq!(
            err,
            GraderError::Validation(ValidationError::Unreadable {
                reason: "NotReadableError".to_string()
            })
        );
        assert_eq!(c.prompt_for(&err), "无法读取所选文件，请重新选择");
        assert_eq!(c.phase(), UploadPhase::Previewing);
        assert_eq!(c.staged().map(|f| f.name()), Some("first.png"));

        // the ticket is spent, a late duplicate report is ignored
        assert!(c.decode_failed(ticket, "NotReadableError").is_ok());
    }

    #[test]
    fn stale_read_failure_is_ignored() {
        let mut c = controller();
        let (m1, _) = png("one.png", 4);
        let (m2, b2) = png("two.png", 8);
        let t1 = c.select_file(m1).unwrap();
        let t2 = c.select_file(m2).unwrap();

        assert!(c.decode_failed(t1, "AbortError").is_ok());
        assert!(c.file_decoded(t2, b2).unwrap());
        assert_eq!(c.staged().map(|f| f.name()), Some("two.png"));
    }

    #[test]
    fn id_restored_before_any_input_counts() {
        let mut c = controller();
        // the shell seeds the controller from the field's current value
        c.set_student_id("2023001");
        assert!(!c.view().confirm_enabled);
        stage(&mut c, "sol.png", 4);
        assert!(c.view().confirm_enabled);
    }

    #[test]
    fn confirm_reports_missing_fields() {
        let mut c = controller();
        assert_eq!(
            c.begin_submit(),
            Err(GraderError::Validation(ValidationError::MissingStudentId))
        );
        c.set_student_id("2023001");
        assert_eq!(
            c.begin_submit(),
            Err(GraderError::Validation(ValidationError::MissingFile))
        );

        stage(&mut c, "sol.png", 4);
        c.set_student_id("");
        let err = c.begin_submit().unwrap_err();
        assert_eq!(c.prompt_for(&err), "请输入学号");
        assert_eq!(c.phase(), UploadPhase::Previewing);
    }

    #[test]
    fn submitting_blocks_second_confirm_and_reselect() {
        let mut c = controller();
        stage(&mut c, "sol.png", 4);
        c.set_student_id("2023001");
        let sub = c.begin_submit().unwrap();
        assert_eq!(sub.student_id, "2023001");
        assert_eq!(c.phase(), UploadPhase::Submitting);

        let v = c.view();
        assert!(!v.confirm_enabled);
        assert!(v.show_status);
        assert_eq!(v.confirm_label, "处理中...");
        assert_eq!(
            c.begin_submit(),
            Err(GraderError::Validation(ValidationError::SubmissionInFlight))
        );
        assert!(c.select_file(png("b.png", 4).0).is_err());
        assert!(c.reset().is_err());
    }

    #[test]
    fn failure_keeps_file_and_allows_retry() {
        let mut c = controller();
        stage(&mut c, "sol.png", 4);
        c.set_student_id("2023001");
        c.begin_submit().unwrap();

        let prompt = c.submission_failed(&GraderError::Scoring("评分数据缺失".to_string()));
        assert_eq!(prompt, "处理失败：获取评分失败: 评分数据缺失");
        assert_eq!(c.phase(), UploadPhase::ErrorShown);
        assert!(c.staged().is_some());
        assert!(c.view().confirm_enabled);
        assert!(c.view().show_preview);

        c.begin_submit().unwrap();
        assert_eq!(c.phase(), UploadPhase::Submitting);
    }

    #[test]
    fn reset_requires_a_prior_staging() {
        let mut c = controller();
        let err = c.reset().unwrap_err();
        assert_eq!(c.prompt_for(&err), "请先上传图片");

        stage(&mut c, "sol.png", 4);
        c.reset().unwrap();
        assert_eq!(c.phase(), UploadPhase::Idle);
        assert!(c.view().show_upload_area);
        assert!(!c.view().confirm_enabled);
        // already staged once, so a second reset from Idle is fine
        c.reset().unwrap();
    }

    #[test]
    fn result_link_is_guarded_until_a_result_exists() {
        let mut c = controller();
        let err = c.guard_result_navigation(false).unwrap_err();
        assert_eq!(c.prompt_for(&err), "请先上传图片并获取评分");
        assert!(c.guard_result_navigation(true).is_ok());

        stage(&mut c, "sol.png", 4);
        c.set_student_id("1");
        c.begin_submit().unwrap();
        c.submission_succeeded();
        assert!(c.guard_result_navigation(false).is_ok());
    }

    #[tokio::test]
    async fn successful_submission_publishes_and_navigates() {
        let mut c = controller();
        stage(&mut c, "sol.png", 64);
        c.set_student_id("2023001");
        let sub = c.begin_submit().unwrap();

        let client = SimulatedScoring::from_seed(3, FeedbackRenderer::default());
        let relay = ResultRelay::new(MemoryStore::new());
        let nav = RecordingNavigator::default();
        let result = submit_and_publish(&client, &relay, &nav, c.result_page(), &sub)
            .await
            .unwrap();
        c.submission_succeeded();

        assert_eq!(c.phase(), UploadPhase::NavigatingAway);
        assert!(c.staged().is_none());
        assert_eq!(nav.visited(), vec!["result.html".to_string()]);
        assert_eq!(relay.consume().unwrap(), result);
    }

    #[tokio::test]
    async fn failed_submission_publishes_nothing() {
        let mut c = controller();
        stage(&mut c, "sol.png", 64);
        c.set_student_id("2023001");
        let sub = c.begin_submit().unwrap();

        let store = MemoryStore::new();
        let relay = ResultRelay::new(&store);
        let nav = RecordingNavigator::default();
        let err = submit_and_publish(&FailingScoring, &relay, &nav, "result.html", &sub)
            .await
            .unwrap_err();
        c.submission_failed(&err);

        assert!(store.get(RELAY_KEY).unwrap().is_none());
        assert!(nav.visited().is_empty());
        assert_eq!(c.phase(), UploadPhase::ErrorShown);
    }
}
