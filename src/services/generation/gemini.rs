/// Google Gemini `generateContent` client
use crate::{error::GenerationError, services::generation::Generator};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

impl GeminiResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .find(|t| !t.trim().is_empty())
    }
}

#[derive(Clone)]
pub struct GeminiGenerator {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    model: String,
    temperature: f32,
}

impl GeminiGenerator {
    pub fn new(
        http_client: HttpClient,
        api_key: Option<String>,
        api_url: String,
        model: String,
        temperature: f32,
    ) -> Self {
        Self {
            http_client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            api_url,
            model,
            temperature,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.temperature,
            },
        }
    }
}

#[async_trait::async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::NotConfigured)?;

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Request(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let payload: GeminiResponse = response.json().await?;
        let text = payload.into_text().ok_or(GenerationError::EmptyResponse)?;

        tracing::info!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            response_chars = text.chars().count(),
            "Recommendation generated"
        );

        Ok(text)
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}
