use std::path::PathBuf;

/// Server configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub base_url: String,
    pub jwt_secret: String,
    /// `SITEWORK_REGISTRATION=closed` turns off `/api/auth/signup` and `/signup`.
    pub registration_open: bool,
    /// Adds `Secure` to the session cookie. Enable behind HTTPS.
    pub secure_cookies: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = get("SITEWORK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));

        let port = match get("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT {p:?}: {e}"))?,
            None => 3000,
        };

        let base_url = get("BASE_URL").unwrap_or_else(|| format!("http://localhost:{port}"));

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                tracing::warn!(
                    "JWT_SECRET not set; using an ephemeral secret, sessions end on restart"
                );
                sitework_api::crypto::random_secret()
                    .map_err(|e| anyhow::anyhow!("generating JWT secret: {e}"))?
            }
        };

        let registration_open = get("SITEWORK_REGISTRATION")
            .is_none_or(|v| !v.trim().eq_ignore_ascii_case("closed"));
        let secure_cookies = get("SITEWORK_SECURE_COOKIES")
            .is_some_and(|v| matches!(v.trim(), "1" | "true" | "yes"));

        Ok(Self {
            data_dir,
            port,
            base_url,
            jwt_secret,
            registration_open,
            secure_cookies,
        })
    }
}
