//! Data models exchanged between the storefront and the try-on gateway

use serde::{Deserialize, Serialize};

use crate::encoding::EncodedImage;
use crate::messages::DEMO_MODE_NOTICE;

/// A user photo plus the garments of the selected box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnRequest {
    pub user_image: EncodedImage,
    /// Garment image references, may be empty
    pub garment_images: Vec<String>,
    pub box_id: String,
}

/// What actually produced a try-on result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    RemoteSuccess,
    SimulatedFallback { reason: FallbackReason },
    ValidationRejected,
    ReadFailure,
}

/// Why the gateway answered with a simulated result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    MissingCredentials,
    Timeout,
    HttpStatus { status: u16 },
    Network,
    MalformedResponse,
    MissingOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnResult {
    pub success: bool,
    pub result_image: EncodedImage,
    /// Advisory only, never parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub outcome: Outcome,
}

impl TryOnResult {
    pub fn remote(result_image: EncodedImage) -> Self {
        Self {
            success: true,
            result_image,
            message: None,
            outcome: Outcome::RemoteSuccess,
        }
    }

    /// Demo-mode result: the user's own photo, unmodified
    pub fn simulated(user_image: EncodedImage, reason: FallbackReason) -> Self {
        Self {
            success: true,
            result_image: user_image,
            message: Some(DEMO_MODE_NOTICE.to_string()),
            outcome: Outcome::SimulatedFallback { reason },
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self.outcome, Outcome::SimulatedFallback { .. })
    }
}

/// Result of checking an upload's metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageValidationOutcome {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageValidationOutcome {
    pub fn accepted() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}
