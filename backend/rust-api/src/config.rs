use serde::Deserialize;
use std::env;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8081";
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4";
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub completion: CompletionConfig,
    /// `user:password` expected on `/metrics`.
    pub metrics_auth: String,
}

#[derive(Clone, Deserialize)]
pub struct CompletionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

// Keeps the API key out of logs.
impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load environment variables from root .env file (two levels up)
        // Try root .env first, then fallback to local .env
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        // Determine environment (defaults to dev)
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let api_key = match settings
            .get_string("completion.api_key")
            .or_else(|_| env::var("OPENAI_API_KEY"))
        {
            Ok(key) => key,
            Err(_) if app_env == "prod" => {
                return Err(config::ConfigError::NotFound(
                    "OPENAI_API_KEY must be set in production".to_string(),
                ));
            }
            Err(_) => {
                eprintln!("WARNING: OPENAI_API_KEY is not set, completion calls will be rejected");
                String::new()
            }
        };

        let base_url = settings
            .get_string("completion.base_url")
            .or_else(|_| env::var("OPENAI_BASE_URL"))
            .unwrap_or_else(|_| DEFAULT_COMPLETION_BASE_URL.to_string());

        let model = settings
            .get_string("completion.model")
            .or_else(|_| env::var("OPENAI_MODEL"))
            .unwrap_or_else(|_| DEFAULT_COMPLETION_MODEL.to_string());

        let timeout_secs = match settings.get_int("completion.timeout_secs") {
            Ok(value) => u64::try_from(value).map_err(|_| {
                config::ConfigError::Message(format!(
                    "completion.timeout_secs must be positive, got {}",
                    value
                ))
            })?,
            Err(_) => match env::var("OPENAI_TIMEOUT_SECS") {
                Ok(raw) => raw.parse().map_err(|_| {
                    config::ConfigError::Message(format!(
                        "OPENAI_TIMEOUT_SECS is not a number: {}",
                        raw
                    ))
                })?,
                Err(_) => DEFAULT_COMPLETION_TIMEOUT_SECS,
            },
        };

        let metrics_auth = settings
            .get_string("metrics.auth")
            .or_else(|_| env::var("METRICS_AUTH"))
            .unwrap_or_else(|_| "admin:changeme".to_string());

        Ok(Config {
            bind_addr,
            completion: CompletionConfig {
                api_key,
                base_url: base_url.trim_end_matches('/').to_string(),
                model,
                timeout_secs,
            },
            metrics_auth,
        })
    }
}
