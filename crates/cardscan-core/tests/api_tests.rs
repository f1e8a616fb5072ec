//! Integration tests for the API module.

#![cfg(feature = "api")]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use cardscan_core::{
    CardStore, CardscanConfig, ContactFields, MemoryCardStore, NewContact, OcrEngine, OcrResult,
    api::{ApiState, HealthResponse, create_router},
    error::OcrError,
};

const CARD_TEXT: &str = "John Smith\nSenior Manager\nAcme Corp\njohn.smith@acme.com\n(555) 123-4567\n123 Main Street\n";
const BOUNDARY: &str = "----cardscan-boundary";

/// Engine returning canned text and remembering what it was asked to read.
struct FakeEngine {
    text: Option<String>,
    calls: Mutex<Vec<(PathBuf, String)>>,
}

impl FakeEngine {
    fn returning(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            text: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl OcrEngine for FakeEngine {
    fn recognize(&self, image_path: &Path, language: &str) -> Result<OcrResult, OcrError> {
        self.calls
            .lock()
            .unwrap()
            .push((image_path.to_path_buf(), language.to_string()));

        match &self.text {
            Some(text) => Ok(OcrResult::from_text(text.clone())),
            None => Err(OcrError::InvalidImage("corrupt image".to_string())),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

struct Harness {
    app: Router,
    engine: Arc<FakeEngine>,
    store: Arc<MemoryCardStore>,
    upload_dir: PathBuf,
    _dir: tempfile::TempDir,
}

fn harness(engine: FakeEngine) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let upload_dir = dir.path().join("uploads");

    let mut config = CardscanConfig::default();
    config.storage.upload_dir = upload_dir.clone();

    let engine = Arc::new(engine);
    let store = Arc::new(MemoryCardStore::new());
    let app = create_router(ApiState::new(config, engine.clone(), store.clone()));

    Harness {
        app,
        engine,
        store,
        upload_dir,
        _dir: dir,
    }
}

fn multipart_request(field: &str, filename: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: image/png\r\n\
         \r\n\
         {content}\r\n\
         --{b}--\r\n",
        b = BOUNDARY,
    );

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let h = harness(FakeEngine::returning(""));

    let response = h.app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "healthy");
}

#[tokio::test]
async fn test_upload_extracts_and_stores() {
    let h = harness(FakeEngine::returning(CARD_TEXT));

    let response = h
        .app
        .clone()
        .oneshot(multipart_request("file", "card.png", "fake image bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let fields: ContactFields = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(fields.name, "John Smith");
    assert_eq!(fields.job_title, "Manager");
    assert_eq!(fields.company_name, "John Smith");
    assert_eq!(fields.email, "john.smith@acme.com");
    assert_eq!(fields.phone_number, "(555) 123-4567");
    assert_eq!(fields.address, "123 Main Street");
    assert_eq!(json.as_object().unwrap().len(), 6);

    let calls = h.engine.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, "eng");
    assert!(calls[0].0.starts_with(&h.upload_dir));
    assert_eq!(std::fs::read(&calls[0].0).unwrap(), b"fake image bytes");

    let stored = h.store.list(Default::default()).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].fields, fields);

    let filename = calls[0].0.file_name().unwrap().to_str().unwrap().to_string();
    assert_eq!(stored[0].image, format!("/uploads/{}", filename));
    assert!(filename.ends_with(".png"));
}

#[tokio::test]
async fn test_uploaded_image_is_served() {
    let h = harness(FakeEngine::returning(CARD_TEXT));

    h.app
        .clone()
        .oneshot(multipart_request("file", "card.png", "served bytes"))
        .await
        .unwrap();

    let image = h.store.list(Default::default()).unwrap()[0].image.clone();
    let response = h.app.oneshot(get(&image)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"served bytes");
}

#[tokio::test]
async fn test_upload_of_unreadable_text_stores_empty_card() {
    let h = harness(FakeEngine::returning("###\n???\n"));

    let response = h
        .app
        .oneshot(multipart_request("file", "blurry.jpg", "x"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let fields: ContactFields = serde_json::from_value(body_json(response).await).unwrap();
    assert!(fields.is_empty());
    assert_eq!(h.store.count().unwrap(), 1);
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let h = harness(FakeEngine::returning(CARD_TEXT));

    let response = h
        .app
        .oneshot(multipart_request("attachment", "card.png", "x"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
    assert_eq!(h.store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_ocr_failure_returns_500() {
    let h = harness(FakeEngine::failing());

    let response = h
        .app
        .oneshot(multipart_request("file", "card.png", "x"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Failed to process file");
    assert_eq!(h.store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_cards_pagination() {
    let h = harness(FakeEngine::returning(""));
    for n in 1..=25 {
        h.store
            .insert(NewContact::new(
                ContactFields {
                    name: format!("Person {}", n),
                    ..Default::default()
                },
                format!("/uploads/{}", n),
            ))
            .unwrap();
    }

    let response = h
        .app
        .clone()
        .oneshot(get("/cards?page=2&limit=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cards = body_json(response).await;
    let names: Vec<&str> = cards
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    let expected: Vec<String> = (11..=20).map(|n| format!("Person {}", n)).collect();
    assert_eq!(names, expected);
    assert!(cards[0]["createdAt"].is_string());
    assert_eq!(cards[0]["jobTitle"], "");

    let response = h.app.clone().oneshot(get("/cards")).await.unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 10);

    let response = h.app.oneshot(get("/cards?page=3")).await.unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_cards_invalid_query() {
    let h = harness(FakeEngine::returning(""));

    let response = h.app.oneshot(get("/cards?page=abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
