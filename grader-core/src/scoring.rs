//! The scoring contract and the HTTP seam used by the remote strategy.

use std::rc::Rc;

use async_trait::async_trait;

use crate::config::{BackendMode, GraderConfig};
use crate::error::{Result, TransportError};
use crate::models::{GradingResult, StagedFile};
use crate::remote::RemoteScoring;
use crate::render::FeedbackRenderer;
use crate::simulated::SimulatedScoring;

/// Turns a staged image into a [`GradingResult`].
///
/// Implementations run one submission per call and never retry; the caller
/// decides whether to try again.
#[async_trait(?Send)]
pub trait ScoringClient {
    async fn submit(&self, file: &StagedFile, student_id: &str) -> Result<GradingResult>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

#[async_trait(?Send)]
impl<C: ScoringClient + ?Sized> ScoringClient for Rc<C> {
    async fn submit(&self, file: &StagedFile, student_id: &str) -> Result<GradingResult> {
        (**self).submit(file, student_id).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[async_trait(?Send)]
impl<C: ScoringClient + ?Sized> ScoringClient for Box<C> {
    async fn submit(&self, file: &StagedFile, student_id: &str) -> Result<GradingResult> {
        (**self).submit(file, student_id).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Raw HTTP reply as seen by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One field of a multipart form.
#[derive(Clone, Copy, Debug)]
pub enum FormPart<'a> {
    Text { name: &'a str, value: &'a str },
    File { name: &'a str, file: &'a StagedFile },
}

/// Minimal HTTP client used by [`RemoteScoring`].
#[async_trait(?Send)]
pub trait Transport {
    async fn post_form(
        &self,
        url: &str,
        parts: &[FormPart<'_>],
    ) -> Result<HttpResponse, TransportError>;

    async fn post_json(&self, url: &str, body: &str) -> Result<HttpResponse, TransportError>;
}

/// Pick the strategy named by `config.backend`. `seed` feeds the simulated
/// backend's random source and is ignored for the remote one.
pub fn build_scoring_client<T>(config: &GraderConfig, transport: T, seed: u64) -> Rc<dyn ScoringClient>
where
    T: Transport + 'static,
{
    let renderer = FeedbackRenderer::new(config.lang);
    match config.backend {
        BackendMode::Remote => Rc::new(RemoteScoring::new(transport, config)),
        BackendMode::Simulated => Rc::new(SimulatedScoring::from_seed(seed, renderer)),
    }
}
