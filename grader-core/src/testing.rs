//! Fakes shared by the unit tests.

use std::cell::RefCell;

use crate::error::Result;
use crate::relay::Navigator;

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) -> Result<()> {
        self.visits.borrow_mut().push(url.to_string());
        Ok(())
    }
}
