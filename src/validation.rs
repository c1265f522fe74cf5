//! Upload checks run before any network activity

use std::path::{Path, PathBuf};

use log::debug;

use crate::error::TryOnError;
use crate::messages::{IMAGE_TOO_LARGE, IMAGE_UNSUPPORTED_FORMAT};
use crate::models::ImageValidationOutcome;

/// Largest accepted upload, 5 MiB
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Declared content types accepted for try-on photos
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// Metadata of a file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    pub size: u64,
    pub mime_type: String,
}

impl ImageFile {
    pub fn new(path: impl Into<PathBuf>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            size,
            mime_type: mime_type.into(),
        }
    }

    /// Stats a file on disk. The declared type comes from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, TryOnError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| TryOnError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        Ok(Self::new(path, metadata.len(), mime_type))
    }

    pub fn validate(&self) -> ImageValidationOutcome {
        validate(self.size, &self.mime_type)
    }
}

/// Checks size first, then declared type
pub fn validate(size: u64, mime_type: &str) -> ImageValidationOutcome {
    if size > MAX_IMAGE_BYTES {
        debug!("[validate] Rejected upload of {} bytes", size);
        return ImageValidationOutcome::rejected(IMAGE_TOO_LARGE);
    }

    if !ACCEPTED_MIME_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(mime_type.trim()))
    {
        debug!("[validate] Rejected upload of type {:?}", mime_type);
        return ImageValidationOutcome::rejected(IMAGE_UNSUPPORTED_FORMAT);
    }

    ImageValidationOutcome::accepted()
}

impl ImageValidationOutcome {
    pub fn into_result(self) -> Result<(), TryOnError> {
        match self.error {
            Some(error) if !self.valid => Err(TryOnError::Validation(error)),
            _ => Ok(()),
        }
    }
}
