use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Secrets have no defaults: a process missing one refuses to start rather
/// than running with a guessable or empty key.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Platform JWT configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Tally integration configuration.
    pub tally: TallyConfig,
}

/// Configuration for the Tally form-provider integration.
#[derive(Debug, Clone)]
pub struct TallyConfig {
    /// Secret signing form session tokens. Distinct from `JWT_SECRET` and
    /// from the per-webhook signing secrets.
    pub session_token_secret: String,
    /// API key for the provider's management API.
    pub api_key: String,
    /// Base URL of the provider's management API.
    pub api_base: String,
    /// Base URL for embed / share links shown to applicants.
    pub embed_base: String,
    /// Public base URL of this service, used to build webhook callback URLs.
    pub callback_base: String,
    /// Application session lifetime in hours (default: 24).
    pub nonce_ttl_hours: i64,
}

/// Default session/nonce lifetime in hours.
const DEFAULT_NONCE_TTL_HOURS: i64 = 24;

impl TallyConfig {
    /// Load Tally configuration from environment variables.
    ///
    /// `SESSION_TOKEN_SECRET`, `TALLY_API_KEY`, and `WEBHOOK_CALLBACK_BASE`
    /// are required; the base URLs default to the public Tally endpoints.
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or empty.
    pub fn from_env() -> Self {
        let session_token_secret = std::env::var("SESSION_TOKEN_SECRET")
            .expect("SESSION_TOKEN_SECRET must be set in the environment");
        assert!(
            !session_token_secret.is_empty(),
            "SESSION_TOKEN_SECRET must not be empty"
        );

        let api_key = std::env::var("TALLY_API_KEY").expect("TALLY_API_KEY must be set");

        let api_base =
            std::env::var("TALLY_API_BASE").unwrap_or_else(|_| "https://api.tally.so".into());
        let embed_base =
            std::env::var("TALLY_EMBED_BASE").unwrap_or_else(|_| "https://tally.so".into());

        let callback_base =
            std::env::var("WEBHOOK_CALLBACK_BASE").expect("WEBHOOK_CALLBACK_BASE must be set");

        let nonce_ttl_hours: i64 = std::env::var("NONCE_TTL_HOURS")
            .unwrap_or_else(|_| DEFAULT_NONCE_TTL_HOURS.to_string())
            .parse()
            .expect("NONCE_TTL_HOURS must be a valid i64");

        Self {
            session_token_secret,
            api_key,
            api_base,
            embed_base,
            callback_base,
            nonce_ttl_hours,
        }
    }

    /// The callback URL registered with the provider for webhook deliveries.
    pub fn webhook_callback_url(&self) -> String {
        format!(
            "{}/api/v1/applications",
            self.callback_base.trim_end_matches('/')
        )
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
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
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            tally: TallyConfig::from_env(),
        }
    }
}
