//! Browser-backed `SessionStore` and `Navigator`.

use grader_core::{GraderError, Navigator, Result, SessionStore};
use tracing::{debug, warn};
use web_sys::{Storage, Window};

use crate::utils::js_error_text;

fn storage_error(err: wasm_bindgen::JsValue) -> GraderError {
    GraderError::Storage(js_error_text(&err))
}

/// `window.sessionStorage`, which is per-tab. When the browser refuses
/// access every operation fails with a storage error instead.
#[derive(Clone)]
pub struct BrowserSession {
    storage: Option<Storage>,
}

impl BrowserSession {
    pub fn open(window: &Window) -> Self {
        let storage = match window.session_storage() {
            Ok(storage) => storage,
            Err(e) => {
                warn!(error = %js_error_text(&e), "sessionStorage blocked");
                None
            }
        };
        BrowserSession { storage }
    }

    fn storage(&self) -> Result<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| GraderError::Storage("sessionStorage is not available".to_string()))
    }
}

impl SessionStore for BrowserSession {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage()?.get_item(key).map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?.set_item(key, value).map_err(storage_error)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage()?.remove_item(key).map_err(storage_error)
    }
}

/// Navigates by assigning `location.href`.
#[derive(Clone)]
pub struct BrowserNavigator {
    window: Window,
}

impl BrowserNavigator {
    pub fn new(window: Window) -> Self {
        BrowserNavigator { window }
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) -> Result<()> {
        debug!(%url, "navigating");
        self.window
            .location()
            .set_href(url)
            .map_err(|e| GraderError::Navigation(js_error_text(&e)))
    }
}
