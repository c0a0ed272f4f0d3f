use std::rc::Rc;

use grader_core::{ResultController, ResultRelay, ScoringClient, UploadController};
use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlButtonElement, HtmlElement, HtmlImageElement, HtmlInputElement};

use crate::constants::*;
use crate::storage::{BrowserNavigator, BrowserSession};
use crate::utils::element;

/// Handles to the upload page's fixed elements.
#[derive(Clone)]
pub struct UploadElements {
    pub upload_area: HtmlElement,
    pub file_input: HtmlInputElement,
    pub confirm_btn: HtmlButtonElement,
    pub reupload_btn: HtmlButtonElement,
    pub preview_area: HtmlElement,
    pub preview_image: HtmlImageElement,
    pub preview_filename: HtmlElement,
    pub upload_status: HtmlElement,
    pub student_id: HtmlInputElement,
}

impl UploadElements {
    pub fn find(doc: &Document) -> Result<Self, JsValue> {
        Ok(UploadElements {
            upload_area: element(doc, UPLOAD_AREA)?,
            file_input: element(doc, FILE_INPUT)?,
            confirm_btn: element(doc, CONFIRM_BTN)?,
            reupload_btn: element(doc, REUPLOAD_BTN)?,
            preview_area: element(doc, PREVIEW_AREA)?,
            preview_image: element(doc, PREVIEW_IMAGE)?,
            preview_filename: element(doc, PREVIEW_FILENAME)?,
            upload_status: element(doc, UPLOAD_STATUS)?,
            student_id: element(doc, STUDENT_ID)?,
        })
    }
}

/// Upload page state, shared across callbacks behind an `Rc<RefCell<_>>`.
/// Never held borrowed across an `.await`.
pub struct UploadState {
    pub document: Document,
    pub elements: UploadElements,
    pub controller: UploadController,
    pub client: Rc<dyn ScoringClient>,
    pub relay: ResultRelay<BrowserSession>,
    pub navigator: BrowserNavigator,
}

/// Result page state. The controller has already consumed the relay.
pub struct ResultState {
    pub controller: ResultController,
    pub navigator: BrowserNavigator,
}
