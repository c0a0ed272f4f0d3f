//! Browser entry point: picks the page by its marker element and wires it to
//! `grader-core`.

use grader_core::GraderConfig;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

mod constants;
mod dialog;
mod logging;
mod result;
mod scoring;
mod state;
mod storage;
mod transport;
mod upload;
mod utils;

use crate::constants::{RESULT_CARD, UPLOAD_CARD};
use crate::utils::host_config_json;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let search = window.location().search().unwrap_or_default();
    let (config, skipped) =
        GraderConfig::resolve_layers(host_config_json(&window).as_deref(), &search);
    logging::init(&config.log_level);
    for e in skipped {
        warn!(error = %e, "ignoring configuration layer");
    }
    info!(backend = %config.backend, lang = ?config.lang, "grader client starting");

    if document.query_selector(UPLOAD_CARD)?.is_some() {
        upload::init(window, document, &config)
    } else if document.query_selector(RESULT_CARD)?.is_some() {
        result::init(window, document, &config)
    } else {
        warn!("page has neither an upload nor a result card");
        Ok(())
    }
}
