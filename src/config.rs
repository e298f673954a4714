use std::env;

use crate::bridge::ModelConfig;
use crate::media::CloudinaryConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MODEL_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL_NAME: &str = "gpt-4o-mini";
const DEFAULT_MODEL_TIMEOUT_MS: u64 = 20_000;
const DEFAULT_MEDIA_FOLDER: &str = "makeup-studio";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub model: ModelConfig,
    pub cloudinary: CloudinaryConfig,
    pub contact_phone: String,
}

impl AppConfig {
    /// Reads the process environment. Values that are missing or fail to
    /// parse fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let timeout_ms = lookup("MODEL_TIMEOUT_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_MODEL_TIMEOUT_MS);

        let model = ModelConfig::new(
            var_or("MODEL_API_BASE", DEFAULT_MODEL_API_BASE),
            var_or("MODEL_API_KEY", ""),
            var_or("MODEL_NAME", DEFAULT_MODEL_NAME),
            timeout_ms,
        );

        let cloudinary = CloudinaryConfig {
            cloud_name: var_or("CLOUDINARY_CLOUD_NAME", ""),
            api_key: var_or("CLOUDINARY_API_KEY", ""),
            api_secret: var_or("CLOUDINARY_API_SECRET", ""),
            folder: var_or("CLOUDINARY_FOLDER", DEFAULT_MEDIA_FOLDER),
        };

        Self {
            port,
            model,
            cloudinary,
            contact_phone: var_or("CONTACT_PHONE", ""),
        }
    }
}
