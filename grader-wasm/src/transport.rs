//! `fetch`-based implementation of the core's HTTP seam.

use async_trait::async_trait;
use grader_core::{FormPart, HttpResponse, Transport, TransportError};
use js_sys::{Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response, Window};

use crate::utils::js_error_text;

fn transport_error(err: JsValue) -> TransportError {
    TransportError(js_error_text(&err))
}

pub struct FetchTransport {
    window: Window,
}

impl FetchTransport {
    pub fn new(window: Window) -> Self {
        FetchTransport { window }
    }

    async fn send(&self, url: &str, init: &RequestInit) -> Result<HttpResponse, TransportError> {
        let request = Request::new_with_str_and_init(url, init).map_err(transport_error)?;
        let reply = JsFuture::from(self.window.fetch_with_request(&request))
            .await
            .map_err(transport_error)?;
        let resp: Response = reply
            .dyn_into()
            .map_err(|_| TransportError("fetch did not return a Response".to_string()))?;
        let text = JsFuture::from(resp.text().map_err(transport_error)?)
            .await
            .map_err(transport_error)?;
        Ok(HttpResponse {
            status: resp.status(),
            status_text: resp.status_text(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}

fn file_blob(content: &[u8], mime_type: &str) -> Result<Blob, JsValue> {
    let parts = Array::new();
    parts.push(&Uint8Array::from(content));
    let bag = BlobPropertyBag::new();
    bag.set_type(mime_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &bag)
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn post_form(
        &self,
        url: &str,
        parts: &[FormPart<'_>],
    ) -> Result<HttpResponse, TransportError> {
        let form = FormData::new().map_err(transport_error)?;
        for part in parts {
            match part {
                FormPart::Text { name, value } => {
                    form.append_with_str(name, value).map_err(transport_error)?
                }
                FormPart::File { name, file } => {
                    let blob = file_blob(file.content(), file.mime_type()).map_err(transport_error)?;
                    form.append_with_blob_and_filename(name, &blob, file.name())
                        .map_err(transport_error)?
                }
            }
        }
        // the browser sets the multipart boundary header itself
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&form);
        self.send(url, &init).await
    }

    async fn post_json(&self, url: &str, body: &str) -> Result<HttpResponse, TransportError> {
        let headers = Headers::new().map_err(transport_error)?;
        headers
            .set("Content-Type", "application/json")
            .map_err(transport_error)?;
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(body));
        self.send(url, &init).await
    }
}
