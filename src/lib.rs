pub mod api;
pub mod bridge;
pub mod config;
pub mod contact;
pub mod content;
pub mod ideas;
pub mod media;
pub mod notify;
pub mod sections;

use std::sync::Arc;

use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bridge::OpenAiCompatibleModel;
use crate::config::AppConfig;
use crate::ideas::ContentIdeaGenerator;
use crate::media::{CloudinaryStorage, MediaStorage};
use crate::notify::{NotificationSink, TracingSink};

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ContentIdeaGenerator>,
    pub media: Arc<dyn MediaStorage>,
    pub notifier: Arc<dyn NotificationSink>,
    pub contact_phone: String,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        let model = OpenAiCompatibleModel::new(config.model.clone());
        Self {
            generator: Arc::new(ContentIdeaGenerator::new(Arc::new(model))),
            media: Arc::new(CloudinaryStorage::new(config.cloudinary.clone())),
            notifier: Arc::new(TracingSink),
            contact_phone: config.contact_phone.clone(),
        }
    }
}

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub fn build_app(state: AppState) -> Router {
    api::router(state)
}

pub async fn run_server(app: Router, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "listening");
    axum::serve(listener, app).await
}
