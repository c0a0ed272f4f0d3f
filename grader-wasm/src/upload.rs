//! Upload page wiring: DOM events in, `UploadController` calls, re-render.

use std::cell::RefCell;
use std::rc::Rc;

use grader_core::upload_page::submit_and_publish;
use grader_core::utils::nav_link_selector;
use grader_core::{FileMeta, GraderError, ResultRelay, SelectionTicket, UploadController};
use js_sys::Uint8Array;
use tracing::{debug, error};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, DragEvent, Event, File, MouseEvent, Window};

use crate::constants::DRAGOVER_CLASS;
use crate::dialog;
use crate::scoring::scoring_client;
use crate::state::{UploadElements, UploadState};
use crate::storage::{BrowserNavigator, BrowserSession};
use crate::utils::{js_error_text, set_visible};

type Shared = Rc<RefCell<UploadState>>;

pub fn init(
    window: Window,
    document: Document,
    config: &grader_core::GraderConfig,
) -> Result<(), JsValue> {
    let elements = UploadElements::find(&document)?;
    let state = Rc::new(RefCell::new(UploadState {
        client: scoring_client(config, &window),
        relay: ResultRelay::new(BrowserSession::open(&window)),
        navigator: BrowserNavigator::new(window.clone()),
        controller: UploadController::new(config),
        elements,
        document,
    }));
    {
        // the browser may have restored the field without an input event
        let mut s = state.borrow_mut();
        let restored = s.elements.student_id.value();
        s.controller.set_student_id(&restored);
    }
    attach_ui(state.clone())?;
    render(&state.borrow());
    Ok(())
}

/// Sync the DOM with the controller's view.
fn render(s: &UploadState) {
    let view = s.controller.view();
    let el = &s.elements;
    set_visible(&el.upload_area, view.show_upload_area);
    set_visible(&el.preview_area, view.show_preview);
    set_visible(&el.upload_status, view.show_status);
    el.confirm_btn.set_disabled(!view.confirm_enabled);
    el.confirm_btn.set_text_content(Some(view.confirm_label));
    el.reupload_btn.set_disabled(!view.reupload_enabled);
    match view.preview_url {
        Some(url) => el.preview_image.set_src(&url),
        None => {
            let _ = el.preview_image.remove_attribute("src");
        }
    }
    el.preview_filename
        .set_text_content(view.preview_label.as_deref());
}

fn prompt(s: &UploadState, err: &GraderError) {
    let message = s.controller.prompt_for(err);
    dialog::alert(&s.document, s.controller.locale(), &message);
}

/// A file arrived from the picker or a drop: validate, then read it.
fn take_file(state: &Shared, file: File) {
    let meta = FileMeta::new(file.name(), file.type_(), file.size() as u64);
    let ticket = {
        let mut s = state.borrow_mut();
        match s.controller.select_file(meta) {
            Ok(ticket) => ticket,
            Err(e) => {
                prompt(&s, &e);
                return;
            }
        }
    };
    let st = state.clone();
    spawn_local(async move {
        let decoded = JsFuture::from(file.array_buffer()).await;
        let mut s = st.borrow_mut();
        match decoded {
            Ok(buf) => {
                let bytes = Uint8Array::new(&buf).to_vec();
                decoded_into(&mut s, ticket, bytes);
            }
            Err(e) => {
                let reason = js_error_text(&e);
                error!(error = %reason, "reading the file failed");
                if let Err(err) = s.controller.decode_failed(ticket, &reason) {
                    prompt(&s, &err);
                }
            }
        }
    });
}

fn decoded_into(s: &mut UploadState, ticket: SelectionTicket, bytes: Vec<u8>) {
    match s.controller.file_decoded(ticket, bytes) {
        Ok(true) => render(s),
        Ok(false) => {}
        Err(e) => prompt(s, &e),
    }
}

fn confirm(state: &Shared) {
    let (client, relay, navigator, destination, submission) = {
        let mut s = state.borrow_mut();
        let submission = match s.controller.begin_submit() {
            Ok(sub) => sub,
            Err(e) => {
                prompt(&s, &e);
                return;
            }
        };
        render(&s);
        (
            s.client.clone(),
            s.relay.clone(),
            s.navigator.clone(),
            s.controller.result_page().to_string(),
            submission,
        )
    };
    let st = state.clone();
    spawn_local(async move {
        let outcome =
            submit_and_publish(&*client, &relay, &navigator, &destination, &submission).await;
        let mut s = st.borrow_mut();
        match outcome {
            Ok(_) => s.controller.submission_succeeded(),
            Err(e) => {
                let message = s.controller.submission_failed(&e);
                dialog::alert(&s.document, s.controller.locale(), &message);
            }
        }
        render(&s);
    });
}

fn attach_ui(state: Shared) -> Result<(), JsValue> {
    let el = state.borrow().elements.clone();
    let doc = state.borrow().document.clone();

    // Clicking the drop zone opens the picker
    {
        let input = el.file_input.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || input.click()));
        el.upload_area.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    {
        let st = state.clone();
        let input = el.file_input.clone();
        let onchange = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
            if let Some(file) = input.files().and_then(|files| files.item(0)) {
                take_file(&st, file);
            }
            // allow picking the same file again
            input.set_value("");
        }));
        el.file_input
            .set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();
    }

    {
        let area = el.upload_area.clone();
        let ondragover = Closure::<dyn FnMut(DragEvent)>::wrap(Box::new(move |e: DragEvent| {
            e.prevent_default();
            let _ = area.class_list().add_1(DRAGOVER_CLASS);
        }));
        el.upload_area
            .add_event_listener_with_callback("dragover", ondragover.as_ref().unchecked_ref())?;
        ondragover.forget();
    }

    {
        let area = el.upload_area.clone();
        let ondragleave = Closure::<dyn FnMut(DragEvent)>::wrap(Box::new(move |_e: DragEvent| {
            let _ = area.class_list().remove_1(DRAGOVER_CLASS);
        }));
        el.upload_area
            .add_event_listener_with_callback("dragleave", ondragleave.as_ref().unchecked_ref())?;
        ondragleave.forget();
    }

    {
        let st = state.clone();
        let area = el.upload_area.clone();
        let ondrop = Closure::<dyn FnMut(DragEvent)>::wrap(Box::new(move |e: DragEvent| {
            e.prevent_default();
            let _ = area.class_list().remove_1(DRAGOVER_CLASS);
            let files = e.data_transfer().and_then(|dt| dt.files());
            let Some(files) = files else {
                return;
            };
            if files.length() > 1 {
                debug!(count = files.length(), "multiple files dropped, using the first");
            }
            if let Some(file) = files.item(0) {
                take_file(&st, file);
            }
        }));
        el.upload_area
            .add_event_listener_with_callback("drop", ondrop.as_ref().unchecked_ref())?;
        ondrop.forget();
    }

    {
        let st = state.clone();
        let input = el.student_id.clone();
        let oninput = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
            let mut s = st.borrow_mut();
            s.controller.set_student_id(&input.value());
            render(&s);
        }));
        el.student_id.set_oninput(Some(oninput.as_ref().unchecked_ref()));
        // autofill may only fire `change`
        el.student_id.set_onchange(Some(oninput.as_ref().unchecked_ref()));
        oninput.forget();
    }

    {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || confirm(&st)));
        el.confirm_btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            match s.controller.reset() {
                Ok(()) => render(&s),
                Err(e) => prompt(&s, &e),
            }
        }));
        el.reupload_btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Result link: only once a result exists
    let selector = nav_link_selector(state.borrow().controller.result_page());
    if let Some(link) = doc.query_selector(&selector)? {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let s = st.borrow();
            if let Err(err) = s.controller.guard_result_navigation(s.relay.has_pending()) {
                e.prevent_default();
                prompt(&s, &err);
            }
        }));
        link.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }
    Ok(())
}
