use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use serde_json::Value;

use restyle::{EncodedImage, GatewayConfig, TryOnGateway, TryOnRequest};

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: Arc<Mutex<Vec<Value>>>,
    content_types: Arc<Mutex<Vec<String>>>,
}

/// A local stand-in for the inference API
pub struct MockInference {
    pub endpoint: String,
    pub requests: Arc<Mutex<Vec<Value>>>,
    pub content_types: Arc<Mutex<Vec<String>>>,
}

impl MockInference {
    pub fn received(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    /// `Content-Type` of every request, empty when the header was absent
    pub fn content_types(&self) -> Vec<String> {
        self.content_types.lock().unwrap().clone()
    }
}

async fn inference(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    state
        .content_types
        .lock()
        .unwrap()
        .push(content_type.to_string());
    if let Ok(value) = serde_json::from_str(&body) {
        state.requests.lock().unwrap().push(value);
    }
    tokio::time::sleep(state.delay).await;
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}

pub async fn spawn_inference(
    status: StatusCode,
    body: impl Into<String>,
    delay: Duration,
) -> MockInference {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let content_types = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status,
        body: body.into(),
        delay,
        requests: requests.clone(),
        content_types: content_types.clone(),
    };
    let app = Router::new()
        .route("/v4/inference", post(inference))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockInference {
        endpoint: format!("http://{}/v4/inference", addr),
        requests,
        content_types,
    }
}

/// Gateway with credentials pointed at `endpoint`, no simulation delay
pub fn gateway_for(endpoint: &str, timeout_ms: u64) -> TryOnGateway {
    TryOnGateway::new(GatewayConfig {
        api_key: Some("test-api-key".into()),
        model_key: Some("test-model-key".into()),
        endpoint: endpoint.to_string(),
        timeout_ms,
        simulation_delay_ms: 0,
        ..Default::default()
    })
    .unwrap()
}

pub fn sample_request() -> TryOnRequest {
    TryOnRequest {
        user_image: EncodedImage::from("data:image/png;base64,AAAA"),
        garment_images: vec![
            "https://example.com/jacket.jpg".to_string(),
            "https://example.com/jeans.jpg".to_string(),
        ],
        box_id: "box-1".to_string(),
    }
}
