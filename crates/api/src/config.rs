use std::time::Duration;

use premortem_core::prompt::{DEFAULT_HORIZON_YEAR, DEFAULT_OUTPUT_LANGUAGE};
use premortem_gemini::api::DEFAULT_BASE_URL;
use premortem_gemini::messages::ImageConfig;
use premortem_pipeline::config::{GenerationSettings, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`). Image generation
    /// alone can take well over a minute.
    pub request_timeout_secs: u64,
    pub gemini: GeminiConfig,
}

/// Gemini client and generation settings.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// `GEMINI_API_KEY` (or `API_KEY`). `None` leaves the key gate closed.
    pub api_key: Option<String>,
    pub base_url: String,
    pub http_timeout: Duration,
    pub generation: GenerationSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                                            |
    /// |----------------------------|----------------------------------------------------|
    /// | `HOST`                     | `0.0.0.0`                                          |
    /// | `PORT`                     | `3000`                                             |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`                            |
    /// | `REQUEST_TIMEOUT_SECS`     | `300`                                              |
    /// | `GEMINI_API_KEY`           | unset                                              |
    /// | `GEMINI_BASE_URL`          | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `GEMINI_HTTP_TIMEOUT_SECS` | `240`                                              |
    /// | `GEMINI_TEXT_MODEL`        | `gemini-3-pro-preview`                             |
    /// | `GEMINI_IMAGE_MODEL`       | `gemini-3-pro-image-preview`                       |
    /// | `PREMORTEM_HORIZON_YEAR`   | `2027`                                             |
    /// | `PREMORTEM_LANGUAGE`       | `JAPANESE`                                         |
    /// | `IMAGE_ASPECT_RATIO`       | `16:9`                                             |
    /// | `IMAGE_SIZE`               | `2K`                                               |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            gemini: GeminiConfig::from_env(),
        }
    }
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let base_url = std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let http_timeout_secs: u64 = std::env::var("GEMINI_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "240".into())
            .parse()
            .expect("GEMINI_HTTP_TIMEOUT_SECS must be a valid u64");

        let horizon_year: i32 = std::env::var("PREMORTEM_HORIZON_YEAR")
            .map(|v| v.parse().expect("PREMORTEM_HORIZON_YEAR must be a valid year"))
            .unwrap_or(DEFAULT_HORIZON_YEAR);

        let generation = GenerationSettings {
            text_model: std::env::var("GEMINI_TEXT_MODEL")
                .unwrap_or_else(|_| DEFAULT_TEXT_MODEL.into()),
            image_model: std::env::var("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.into()),
            image_config: ImageConfig {
                aspect_ratio: std::env::var("IMAGE_ASPECT_RATIO").unwrap_or_else(|_| "16:9".into()),
                image_size: std::env::var("IMAGE_SIZE").unwrap_or_else(|_| "2K".into()),
            },
            horizon_year,
            language: std::env::var("PREMORTEM_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_OUTPUT_LANGUAGE.into()),
        };

        Self {
            api_key,
            base_url,
            http_timeout: Duration::from_secs(http_timeout_secs),
            generation,
        }
    }
}
