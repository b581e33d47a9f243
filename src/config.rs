use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; persistence is disabled when absent
    #[serde(default)]
    pub database_url: Option<String>,

    /// Naver Open API client id
    #[serde(default)]
    pub naver_client_id: Option<String>,

    /// Naver Open API client secret
    #[serde(default)]
    pub naver_client_secret: Option<String>,

    /// Naver Open API base URL
    #[serde(default = "default_naver_api_url")]
    pub naver_api_url: String,

    /// Number of results requested per web search
    #[serde(default = "default_naver_display")]
    pub naver_display: u32,

    /// Google API key for Gemini
    #[serde(default)]
    pub google_api_key: Option<String>,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_gemini_temperature")]
    pub gemini_temperature: f32,

    /// Cap applied to search results before they reach the synthesizer
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,

    /// Escalate an empty search outcome to a pipeline error
    #[serde(default)]
    pub require_search_results: bool,

    /// Fall back to the built-in restaurant catalogue when web search is unusable
    #[serde(default = "default_true")]
    pub use_backup_search: bool,

    /// Timeout for outbound HTTP calls, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_naver_api_url() -> String {
    "https://openapi.naver.com".to_string()
}

fn default_naver_display() -> u32 {
    50
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_temperature() -> f32 {
    0.7
}

fn default_max_search_results() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_env() {
        let vars: Vec<(String, String)> = Vec::new();
        let config: Config = envy::from_iter(vars).unwrap();

        assert!(config.database_url.is_none());
        assert!(config.naver_client_id.is_none());
        assert_eq!(config.naver_display, 50);
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.max_search_results, 5);
        assert!(!config.require_search_results);
        assert!(config.use_backup_search);
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            ("PORT".to_string(), "9090".to_string()),
            ("REQUIRE_SEARCH_RESULTS".to_string(), "true".to_string()),
            ("NAVER_CLIENT_ID".to_string(), "id".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.port, 9090);
        assert!(config.require_search_results);
        assert_eq!(config.naver_client_id.as_deref(), Some("id"));
    }
}
