use std::rc::Rc;

use async_trait::async_trait;
use grader_core::{
    BackendMode, GradingResult, GraderConfig, Result, ScoringClient, StagedFile,
    build_scoring_client,
};
use js_sys::Promise;
use tracing::{debug, warn};
use wasm_bindgen_futures::JsFuture;
use web_sys::Window;

use crate::transport::FetchTransport;
use crate::utils::{js_error_text, random_seed};

/// Resolve after `ms` milliseconds.
async fn sleep(window: &Window, ms: u32) {
    let timeout = i32::try_from(ms).unwrap_or(i32::MAX);
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Err(e) =
            window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout)
        {
            warn!(error = %js_error_text(&e), "setTimeout failed");
            let _ = resolve.call0(&wasm_bindgen::JsValue::UNDEFINED);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Delays another client so the submitting state stays visible.
pub struct Paced<C> {
    inner: C,
    window: Window,
    delay_ms: u32,
}

impl<C> Paced<C> {
    pub fn new(inner: C, window: Window, delay_ms: u32) -> Self {
        Paced {
            inner,
            window,
            delay_ms,
        }
    }
}

#[async_trait(?Send)]
impl<C: ScoringClient> ScoringClient for Paced<C> {
    async fn submit(&self, file: &StagedFile, student_id: &str) -> Result<GradingResult> {
        if self.delay_ms > 0 {
            debug!(delay_ms = self.delay_ms, "pacing simulated backend");
            sleep(&self.window, self.delay_ms).await;
        }
        self.inner.submit(file, student_id).await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// The client for this page load: remote over `fetch`, or the simulated one
/// paced by the configured latency.
pub fn scoring_client(config: &GraderConfig, window: &Window) -> Rc<dyn ScoringClient> {
    let client = build_scoring_client(config, FetchTransport::new(window.clone()), random_seed());
    match config.backend {
        BackendMode::Remote => client,
        BackendMode::Simulated => Rc::new(Paced::new(
            client,
            window.clone(),
            config.simulated_latency_ms,
        )),
    }
}
