use crate::error::GenerationError;

pub mod gemini;

pub use gemini::GeminiGenerator;

/// Language-model collaborator that turns a prompt into prose
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Model identifier recorded alongside generated text
    fn model(&self) -> String;
}
