#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, Router};
use http::{Method, Request};
use http_body_util::BodyExt;
use serde_json::Value;
use studio_content_service::{
    bridge::{BridgeError, CompletionModel, CompletionRequest},
    build_app,
    ideas::ContentIdeaGenerator,
    media::{MediaError, MediaStorage, MediaUpload, StoredMedia},
    notify::LastShownSink,
    AppState,
};

pub struct CountingModel {
    reply: Result<&'static str, ()>,
    calls: AtomicUsize,
}

impl CountingModel {
    pub fn answering(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionModel for CountingModel {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, BridgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Ok(text) => Ok(text.to_string()),
            Err(()) => Err(BridgeError::EmptyCompletion),
        }
    }
}

#[derive(Default)]
pub struct MemoryMedia {
    pub uploads: Mutex<Vec<MediaUpload>>,
    pub deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaStorage for MemoryMedia {
    async fn upload(&self, file: MediaUpload) -> Result<StoredMedia, MediaError> {
        if file.bytes.is_empty() {
            return Err(MediaError::EmptyFile);
        }
        let public_id = format!("makeup-studio/{}", file.file_name);
        self.uploads.lock().unwrap().push(file);
        Ok(StoredMedia {
            url: format!("https://cdn.test/{public_id}"),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        if public_id.ends_with("missing") {
            return Err(MediaError::Delete(format!("{public_id} not found")));
        }
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub media: Arc<MemoryMedia>,
    pub notifier: Arc<LastShownSink>,
}

pub fn test_app(model: Arc<dyn CompletionModel>) -> TestApp {
    test_app_with_phone(model, "+54 9 11 5555-0000")
}

pub fn test_app_with_phone(model: Arc<dyn CompletionModel>, contact_phone: &str) -> TestApp {
    let media = Arc::new(MemoryMedia::default());
    let notifier = Arc::new(LastShownSink::new());
    let router = build_app(AppState {
        generator: Arc::new(ContentIdeaGenerator::new(model)),
        media: media.clone(),
        notifier: notifier.clone(),
        contact_phone: contact_phone.to_string(),
    });
    TestApp {
        router,
        media,
        notifier,
    }
}

pub fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
