use anyhow::{Context, Result};

/// Server configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Google Places API key. When absent the server runs with a no-op
    /// provider client: searches stay local and foreign ids never resolve.
    pub google_maps_api_key: Option<String>,
    pub jwt_secret: String,
    pub jwt_issuer: String,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("PORT must be a valid port number")?;

        let google_maps_api_key = std::env::var("GOOGLE_MAPS_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let jwt_issuer =
            std::env::var("JWT_ISSUER").unwrap_or_else(|_| "roamstay".to_string());

        Ok(Self {
            database_url,
            port,
            google_maps_api_key,
            jwt_secret,
            jwt_issuer,
        })
    }
}
