//! Self-describing image payloads (`data:` URLs)

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::ImageFormat;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, TryOnError};
use crate::validation::ImageFile;

/// An encoded image, usually `data:<mime>;base64,<payload>`. Whatever the
/// inference API returns is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", mime_type, BASE64.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when there is nothing after the data URL header, or nothing at all
    pub fn payload_is_empty(&self) -> bool {
        let payload = match self.0.strip_prefix("data:") {
            Some(rest) => rest.split_once(',').map_or("", |(_, payload)| payload),
            None => self.0.as_str(),
        };
        payload.trim().is_empty()
    }

    /// MIME type embedded in a data URL
    pub fn mime_type(&self) -> Option<&str> {
        let (header, _) = self.0.strip_prefix("data:")?.split_once(',')?;
        let mime = header.split(';').next()?;
        (!mime.is_empty()).then_some(mime)
    }

    /// Payload bytes of a data URL, or of a bare base64 string
    pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
        let payload = match self.0.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or(DecodeError::NotBase64DataUrl)?;
                if !header.ends_with(";base64") {
                    return Err(DecodeError::NotBase64DataUrl);
                }
                payload
            }
            None => self.0.as_str(),
        };
        Ok(BASE64.decode(payload.trim())?)
    }

    /// Sniffs the image format from the decoded bytes
    pub fn format(&self) -> Option<ImageFormat> {
        let bytes = self.decode().ok()?;
        image::guess_format(&bytes).ok()
    }
}

impl From<String> for EncodedImage {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EncodedImage {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads an upload and encodes it with its declared MIME type
pub async fn encode_file(file: &ImageFile) -> Result<EncodedImage, TryOnError> {
    let bytes = tokio::fs::read(&file.path)
        .await
        .map_err(|source| TryOnError::Read {
            path: file.path.clone(),
            source,
        })?;

    info!(
        "[encode] Encoded {:?}: {} bytes as {}",
        file.path,
        bytes.len(),
        file.mime_type
    );
    Ok(EncodedImage::from_bytes(&file.mime_type, &bytes))
}
