use grader_core::Locale;
use grader_core::messages::dismiss_label;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

fn create(doc: &Document, tag: &str, class: &str) -> Result<Element, JsValue> {
    let el = doc.create_element(tag)?;
    el.set_class_name(class);
    Ok(el)
}

/// Blocking-style prompt: an overlay with the message and a dismiss button.
/// The message is inserted as text, never as markup.
pub fn alert(doc: &Document, locale: Locale, message: &str) {
    if let Err(e) = try_alert(doc, locale, message) {
        tracing::warn!(error = ?e, "falling back to window.alert");
        if let Some(win) = web_sys::window() {
            let _ = win.alert_with_message(message);
        }
    }
}

fn try_alert(doc: &Document, locale: Locale, message: &str) -> Result<(), JsValue> {
    let body = doc.body().ok_or("no body")?;
    let overlay = create(doc, "div", "modal-overlay")?;
    let dialog = create(doc, "div", "modal-dialog")?;
    let text = create(doc, "p", "modal-message")?;
    text.set_text_content(Some(message));
    let button: HtmlElement = create(doc, "button", "modal-btn")?.dyn_into()?;
    button.set_text_content(Some(dismiss_label(locale)));

    dialog.append_child(&text)?;
    dialog.append_child(&button)?;
    overlay.append_child(&dialog)?;
    body.append_child(&overlay)?;

    let overlay_for_closure = overlay.clone();
    let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        overlay_for_closure.remove();
    }));
    button.set_onclick(Some(onclick.as_ref().unchecked_ref()));
    onclick.forget();

    // a click on the backdrop itself dismisses too, not one inside the dialog
    let overlay_for_closure = overlay.clone();
    let onbackdrop = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
        let on_backdrop = e
            .target()
            .is_some_and(|t| JsValue::from(t) == JsValue::from(overlay_for_closure.clone()));
        if on_backdrop {
            overlay_for_closure.remove();
        }
    }));
    overlay.add_event_listener_with_callback("click", onbackdrop.as_ref().unchecked_ref())?;
    onbackdrop.forget();
    let _ = button.focus();
    Ok(())
}
