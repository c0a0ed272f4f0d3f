//! Validation and staging of the single image chosen by the user.

use tracing::{debug, warn};

use crate::constants::{ACCEPTED_MIME_TYPES, DEFAULT_MAX_FILE_BYTES};
use crate::error::ValidationError;
use crate::models::{FileMeta, StagedFile};

pub fn is_accepted_mime(mime_type: &str) -> bool {
    ACCEPTED_MIME_TYPES
        .iter()
        .any(|m| m.eq_ignore_ascii_case(mime_type.trim()))
}

#[derive(Clone, Copy, Debug)]
pub struct FileIntake {
    max_file_bytes: u64,
}

impl Default for FileIntake {
    fn default() -> Self {
        FileIntake::new(DEFAULT_MAX_FILE_BYTES)
    }
}

impl FileIntake {
    pub fn new(max_file_bytes: u64) -> Self {
        FileIntake { max_file_bytes }
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// Check a selection before its content is read.
    pub fn validate(&self, meta: &FileMeta) -> Result<(), ValidationError> {
        let verdict = if !is_accepted_mime(&meta.mime_type) {
            Err(ValidationError::UnsupportedType {
                mime_type: meta.mime_type.clone(),
            })
        } else if meta.size_bytes == 0 {
            Err(ValidationError::EmptyFile)
        } else if meta.size_bytes > self.max_file_bytes {
            Err(ValidationError::FileTooLarge {
                size_bytes: meta.size_bytes,
                limit_bytes: self.max_file_bytes,
            })
        } else {
            Ok(())
        };
        if let Err(e) = &verdict {
            warn!(file = %meta.name, error = %e, "file rejected");
        }
        verdict
    }

    /// Turn decoded content into a [`StagedFile`]. The reported size is
    /// replaced by the real content length.
    pub fn stage(&self, meta: FileMeta, content: Vec<u8>) -> Result<StagedFile, ValidationError> {
        let meta = FileMeta {
            size_bytes: content.len() as u64,
            ..meta
        };
        self.validate(&meta)?;
        debug!(file = %meta.name, size = meta.size_bytes, "file staged");
        Ok(StagedFile::new(meta, content))
    }
}
