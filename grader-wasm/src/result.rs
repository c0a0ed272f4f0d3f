//! Result page wiring.

use std::rc::Rc;

use grader_core::{GraderConfig, ResultController, ResultRelay, ResultView};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::constants::*;
use crate::state::ResultState;
use crate::storage::{BrowserNavigator, BrowserSession};
use crate::utils::{element, set_visible};

pub fn init(window: Window, document: Document, config: &GraderConfig) -> Result<(), JsValue> {
    let relay = ResultRelay::new(BrowserSession::open(&window));
    let state = Rc::new(ResultState {
        controller: ResultController::load(config, &relay),
        navigator: BrowserNavigator::new(window),
    });

    let content: HtmlElement = element(&document, AI_CONTENT)?;
    let score: HtmlElement = element(&document, STUDENT_SCORE)?;
    if let Ok(loading) = element::<HtmlElement>(&document, LOADING_CONTENT) {
        set_visible(&loading, false);
    }

    match state.controller.view() {
        ResultView::Loaded {
            headline,
            feedback_markup,
            ..
        } => {
            score.set_text_content(Some(headline.as_str()));
            content.set_inner_html(feedback_markup);
        }
        ResultView::Failed {
            title,
            message,
            action_label,
        } => {
            score.set_text_content(None);
            if let Some(card) = document.query_selector(RESULT_CARD)? {
                card.class_list().add_1(ERROR_CLASS)?;
            }
            content.set_text_content(None);
            let panel = error_panel(&document, title, message, action_label, state.clone())?;
            content.append_child(&panel)?;
        }
    }
    set_visible(&content, true);

    if let Ok(btn) = element::<HtmlElement>(&document, UPLOAD_AGAIN_BTN) {
        on_click_upload_again(&btn, state);
    }
    Ok(())
}

fn on_click_upload_again(target: &HtmlElement, state: Rc<ResultState>) {
    let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        if let Err(e) = state.controller.upload_again(&state.navigator) {
            warn!(error = %e, "navigation back failed");
        }
    }));
    target.set_onclick(Some(onclick.as_ref().unchecked_ref()));
    onclick.forget();
}

/// Static error panel built from text nodes only.
fn error_panel(
    doc: &Document,
    title: &str,
    message: &str,
    action_label: &str,
    state: Rc<ResultState>,
) -> Result<Element, JsValue> {
    let panel = doc.create_element("div")?;
    panel.set_class_name("error-message");
    let heading = doc.create_element("h3")?;
    heading.set_text_content(Some(title));
    let text = doc.create_element("p")?;
    text.set_text_content(Some(message));
    let button: HtmlElement = doc.create_element("button")?.dyn_into()?;
    button.set_class_name("btn btn-primary");
    button.set_text_content(Some(action_label));
    on_click_upload_again(&button, state);

    panel.append_child(&heading)?;
    panel.append_child(&text)?;
    panel.append_child(&button)?;
    Ok(panel)
}
