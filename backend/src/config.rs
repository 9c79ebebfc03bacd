use crate::services::analyzer::Analyzer;
use crate::services::video_service::VideoStrategy;
use crate::AppState;
use anyhow::Result;
use env_logger::Builder;
use log::{info, warn, LevelFilter};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::str::FromStr;

/// Process-wide settings, read once at startup and passed to whoever needs them.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub youtube_api_key: Option<String>,
    pub suggest_url: String,
    pub youtube_api_url: String,
    pub youtube_web_url: String,
    pub trends_url: String,
    pub http_timeout_secs: u64,
    pub default_region: String,
    pub default_strategy: VideoStrategy,
    pub keyword_limit: usize,
    pub max_results: u32,
    pub frontend_origin: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            suggest_url: "https://suggestqueries.google.com/complete/search".to_string(),
            youtube_api_url: "https://www.googleapis.com/youtube/v3".to_string(),
            youtube_web_url: "https://www.youtube.com".to_string(),
            trends_url: "https://trends.google.com/trends".to_string(),
            http_timeout_secs: 10,
            default_region: String::new(),
            default_strategy: VideoStrategy::Structured,
            keyword_limit: 5,
            max_results: 5,
            frontend_origin: "http://localhost:8080".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable lookup; unset or unparseable
    /// values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |name: &str, default: String| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        Self {
            youtube_api_key: lookup("YOUTUBE_API_KEY")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            suggest_url: text("SUGGEST_URL", defaults.suggest_url),
            youtube_api_url: text("YOUTUBE_API_URL", defaults.youtube_api_url),
            youtube_web_url: text("YOUTUBE_WEB_URL", defaults.youtube_web_url),
            trends_url: text("TRENDS_URL", defaults.trends_url),
            http_timeout_secs: parse_or(&lookup, "HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            default_region: text("DEFAULT_REGION", defaults.default_region).to_uppercase(),
            default_strategy: parse_or(&lookup, "DEFAULT_STRATEGY", defaults.default_strategy),
            keyword_limit: parse_or(&lookup, "KEYWORD_LIMIT", defaults.keyword_limit),
            max_results: parse_or(&lookup, "MAX_RESULTS", defaults.max_results),
            frontend_origin: text("FRONTEND_ORIGIN", defaults.frontend_origin),
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Ignoring invalid value '{raw}' for {name}");
            default
        }),
        None => default,
    }
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting niche finder backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn create_app_state(config: AppConfig) -> Result<AppState> {
    if config.youtube_api_key.is_none() {
        warn!("YOUTUBE_API_KEY is not set; only the scrape strategy will return videos.");
    }

    let analyzer = Analyzer::new(&config)?;
    info!(
        "Sources: suggestions={}, api={}, web={}, trends={}",
        config.suggest_url, config.youtube_api_url, config.youtube_web_url, config.trends_url
    );

    Ok(AppState { analyzer, config })
}

pub fn create_cors(config: &AppConfig) -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&[config.frontend_origin.as_str()]))
        .allowed_methods(
            vec![Method::Get, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .allow_credentials(false)
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
