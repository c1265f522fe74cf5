//! Virtual try-on gateway
//!
//! Sends one inference request per try-on and never fails towards the
//! caller: missing credentials and every transport failure resolve to a
//! simulated result that shows the user's own photo. The [`Outcome`] on the
//! result tells the two paths apart.
//!
//! [`Outcome`]: crate::models::Outcome

use log::{error, info, warn};
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};

use crate::config::{Credentials, GatewayConfig};
use crate::encoding::EncodedImage;
use crate::error::{TransportError, TryOnError};
use crate::models::{FallbackReason, TryOnRequest, TryOnResult};

/// Fixed inference parameters sent with every request
pub const GUIDANCE_SCALE: f64 = 7.5;
pub const NUM_INFERENCE_STEPS: u32 = 50;

pub struct TryOnGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl TryOnGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, TryOnError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub async fn request_try_on(&self, request: &TryOnRequest) -> TryOnResult {
        if request.user_image.payload_is_empty() {
            warn!("[try_on] Empty user image for box {}", request.box_id);
        }

        let Some(credentials) = self.config.credentials() else {
            warn!("[try_on] Try-on API not configured, using demo mode");
            return self.simulate(request, FallbackReason::MissingCredentials).await;
        };

        info!(
            "[try_on] Requesting try-on for box {} with {} garment image(s)",
            request.box_id,
            request.garment_images.len()
        );

        match self.call_inference(credentials, request).await {
            Ok(result_image) => {
                info!("[try_on] Try-on for box {} completed", request.box_id);
                TryOnResult::remote(result_image)
            }
            Err(e) => {
                error!("[try_on] Inference API call failed: {}", e);
                self.simulate(request, e.reason()).await
            }
        }
    }

    async fn call_inference(
        &self,
        credentials: Credentials<'_>,
        request: &TryOnRequest,
    ) -> Result<EncodedImage, TransportError> {
        let body = json!({
            "apiKey": credentials.api_key,
            "modelKey": credentials.model_key,
            "modelInputs": {
                "person_image": request.user_image,
                "garment_images": request.garment_images,
                "guidance_scale": GUIDANCE_SCALE,
                "num_inference_steps": NUM_INFERENCE_STEPS,
            }
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let json: Value = response.json().await?;
        json["modelOutputs"]["output_image"]
            .as_str()
            .filter(|image| !image.is_empty())
            .map(EncodedImage::from)
            .ok_or(TransportError::MissingOutput)
    }

    async fn simulate(&self, request: &TryOnRequest, reason: FallbackReason) -> TryOnResult {
        tokio::time::sleep(self.config.simulation_delay()).await;
        TryOnResult::simulated(request.user_image.clone(), reason)
    }
}
