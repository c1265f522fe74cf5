//! Try-on request lifecycle
//!
//! `Idle → Validating → {Rejected | Validated} → AwaitingPhoto → Submitting → Resolved`
//!
//! A session belongs to one selected box. `reset` starts over from `Idle`.

use std::sync::Arc;

use log::debug;

use crate::catalog::ClothingBox;
use crate::encoding::{encode_file, EncodedImage};
use crate::error::TryOnError;
use crate::gateway::TryOnGateway;
use crate::messages::IMAGE_EMPTY;
use crate::models::{Outcome, TryOnRequest, TryOnResult};
use crate::validation::ImageFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Rejected,
    Validated,
    AwaitingPhoto,
    Submitting,
    Resolved,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Validating,
    Rejected { outcome: Outcome, error: String },
    Validated,
    AwaitingPhoto { photo: EncodedImage },
    Submitting { photo: EncodedImage },
    Resolved { photo: EncodedImage, result: TryOnResult },
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Idle => Phase::Idle,
            SessionState::Validating => Phase::Validating,
            SessionState::Rejected { .. } => Phase::Rejected,
            SessionState::Validated => Phase::Validated,
            SessionState::AwaitingPhoto { .. } => Phase::AwaitingPhoto,
            SessionState::Submitting { .. } => Phase::Submitting,
            SessionState::Resolved { .. } => Phase::Resolved,
        }
    }
}

pub struct TryOnSession {
    gateway: Arc<TryOnGateway>,
    selected_box: ClothingBox,
    state: SessionState,
}

impl TryOnSession {
    pub fn new(gateway: Arc<TryOnGateway>, selected_box: ClothingBox) -> Self {
        Self {
            gateway,
            selected_box,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn selected_box(&self) -> &ClothingBox {
        &self.selected_box
    }

    /// Validates and encodes a photo. Replaces any photo already chosen.
    pub async fn select_photo(&mut self, file: &ImageFile) -> Result<EncodedImage, TryOnError> {
        match self.state.phase() {
            Phase::Submitting | Phase::Resolved => {
                return Err(TryOnError::InvalidState {
                    actual: self.state.phase(),
                    expected: "idle or awaiting a photo",
                });
            }
            _ => {}
        }

        self.transition(SessionState::Validating);
        if let Err(e) = file.validate().into_result() {
            self.reject(&e);
            return Err(e);
        }
        self.transition(SessionState::Validated);

        match encode_file(file).await {
            Ok(photo) if photo.payload_is_empty() => {
                let e = TryOnError::Validation(IMAGE_EMPTY.to_string());
                self.reject(&e);
                Err(e)
            }
            Ok(photo) => {
                self.transition(SessionState::AwaitingPhoto {
                    photo: photo.clone(),
                });
                Ok(photo)
            }
            Err(e) => {
                self.reject(&e);
                Err(e)
            }
        }
    }

    /// Sends the chosen photo with the box's garments to the gateway
    pub async fn submit(&mut self) -> Result<TryOnResult, TryOnError> {
        let photo = match &self.state {
            SessionState::AwaitingPhoto { photo } => photo.clone(),
            other => {
                return Err(TryOnError::InvalidState {
                    actual: other.phase(),
                    expected: "awaiting a photo",
                });
            }
        };

        let request = TryOnRequest {
            user_image: photo.clone(),
            garment_images: self.selected_box.images.clone(),
            box_id: self.selected_box.id.clone(),
        };
        self.transition(SessionState::Submitting {
            photo: photo.clone(),
        });

        let result = self.gateway.request_try_on(&request).await;
        self.transition(SessionState::Resolved {
            photo,
            result: result.clone(),
        });
        Ok(result)
    }

    pub fn reset(&mut self) {
        self.transition(SessionState::Idle);
    }

    fn reject(&mut self, error: &TryOnError) {
        let outcome = error.outcome().unwrap_or(Outcome::ValidationRejected);
        self.transition(SessionState::Rejected {
            outcome,
            error: error.to_string(),
        });
    }

    fn transition(&mut self, next: SessionState) {
        debug!(
            "[session] {}: {:?} -> {:?}",
            self.selected_box.id,
            self.state.phase(),
            next.phase()
        );
        self.state = next;
    }
}

/// Validates, encodes and submits a photo in one go
pub async fn run_try_on(
    gateway: Arc<TryOnGateway>,
    file: &ImageFile,
    selected_box: ClothingBox,
) -> Result<TryOnResult, TryOnError> {
    let mut session = TryOnSession::new(gateway, selected_box);
    session.select_photo(file).await?;
    session.submit().await
}
