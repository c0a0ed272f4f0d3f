//! Single-slot, read-once handoff of a [`GradingResult`] between pages.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::{debug, error, info};

use crate::constants::RELAY_KEY;
use crate::error::{GraderError, Result};
use crate::models::GradingResult;

/// Per-tab key/value storage (`sessionStorage` in the browser).
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Moves the tab to another page.
pub trait Navigator {
    fn navigate(&self, url: &str) -> Result<()>;
}

/// In-process store used by tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Clone, Debug)]
pub struct ResultRelay<S> {
    store: S,
    key: String,
}

impl<S: SessionStore> ResultRelay<S> {
    pub fn new(store: S) -> Self {
        ResultRelay::with_key(store, RELAY_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        ResultRelay {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store `result` in the single envelope slot, replacing anything
    /// unconsumed, then navigate to `destination`.
    pub fn publish(
        &self,
        result: &GradingResult,
        navigator: &dyn Navigator,
        destination: &str,
    ) -> Result<()> {
        let envelope = serde_json::to_string(result)
            .map_err(|e| GraderError::Storage(format!("cannot serialize result: {e}")))?;
        self.store.set(&self.key, &envelope)?;
        info!(student_id = %result.student_id, %destination, "grading result published");
        navigator.navigate(destination)
    }

    /// Take the pending result. Removed on a successful read; an unparsable
    /// envelope is left for the next publish to overwrite.
    pub fn consume(&self) -> Result<GradingResult> {
        let Some(envelope) = self.store.get(&self.key)? else {
            debug!(key = %self.key, "no pending grading result");
            return Err(GraderError::RelayNotFound);
        };
        let result: GradingResult = serde_json::from_str(&envelope).map_err(|e| {
            error!(error = %e, "stored grading result is corrupt");
            GraderError::RelayParse(e.to_string())
        })?;
        self.store.remove(&self.key)?;
        debug!(student_id = %result.student_id, "grading result consumed");
        Ok(result)
    }

    /// Whether an unconsumed envelope exists. Storage errors count as "no".
    pub fn has_pending(&self) -> bool {
        matches!(self.store.get(&self.key), Ok(Some(_)))
    }
}
