/// Naver Open API web search provider
///
/// Queries `/v1/search/webkr.json` sorted by similarity. Requests carry the
/// client id/secret pair as headers; without them the provider reports a
/// configuration error and the orchestrator moves on to the next provider.
use crate::{
    error::SearchError,
    models::{NaverSearchResponse, SearchResult},
    services::providers::SearchProvider,
};
use reqwest::Client as HttpClient;

const PROVIDER_NAME: &str = "naver";

#[derive(Debug, Clone)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl NaverCredentials {
    /// Builds credentials only when both halves are present and non-blank
    pub fn from_parts(client_id: Option<String>, client_secret: Option<String>) -> Option<Self> {
        match (client_id, client_secret) {
            (Some(id), Some(secret)) if !id.trim().is_empty() && !secret.trim().is_empty() => {
                Some(Self {
                    client_id: id,
                    client_secret: secret,
                })
            }
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct NaverSearchProvider {
    http_client: HttpClient,
    credentials: Option<NaverCredentials>,
    api_url: String,
    display: u32,
}

impl NaverSearchProvider {
    pub fn new(
        http_client: HttpClient,
        credentials: Option<NaverCredentials>,
        api_url: String,
        display: u32,
    ) -> Self {
        Self {
            http_client,
            credentials,
            api_url,
            display,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/search/webkr.json", self.api_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl SearchProvider for NaverSearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            SearchError::Configuration(
                "NAVER_CLIENT_ID and NAVER_CLIENT_SECRET must be set".to_string(),
            )
        })?;

        let display = self.display.to_string();
        let response = self
            .http_client
            .get(self.endpoint())
            .header("X-Naver-Client-Id", &credentials.client_id)
            .header("X-Naver-Client-Secret", &credentials.client_secret)
            .query(&[
                ("query", query),
                ("display", display.as_str()),
                ("start", "1"),
                ("sort", "sim"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Transport(format!(
                "Naver API returned status {}: {}",
                status, body
            )));
        }

        let payload: NaverSearchResponse = response.json().await?;
        let results: Vec<SearchResult> = payload.items.into_iter().map(SearchResult::from).collect();

        tracing::info!(
            query = %query,
            results = results.len(),
            provider = PROVIDER_NAME,
            "Web search completed"
        );

        Ok(results)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
