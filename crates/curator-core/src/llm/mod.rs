mod claude;
mod error;
mod gemini;
mod openai;
mod provider;

pub use claude::ClaudeClient;
pub use error::LLMError;
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
pub use provider::Provider;

use async_trait::async_trait;

/// Trait for Large Language Model providers.
///
/// This abstraction allows swapping between different LLM providers
/// without changing the rest of the code.
///
/// # Supported Providers
///
/// - **Gemini** (default): Google Generative Language API, native JSON schema output
/// - **OpenAI-compatible**: Works with OpenAI, Azure, vLLM, OpenRouter, etc.
/// - **Anthropic**: Claude models via Anthropic API
/// - **Ollama**: Local models via Ollama's OpenAI-compatible endpoint
///
/// # Example
///
/// ```ignore
/// use curator_core::llm::{Provider, LLM};
///
/// let llm = Provider::from_env()?;
/// let schema = serde_json::json!({ "type": "object" });
/// let json = llm.complete_structured("Be terse.", "Hello!", &schema).await?;
/// ```
#[async_trait]
pub trait LLM: Send + Sync {
    /// Complete a prompt with a system message.
    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, LLMError>;

    /// Complete a prompt whose answer must be JSON matching `schema`.
    ///
    /// Default implementation states the schema in the system message;
    /// providers with native structured output override it.
    async fn complete_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, LLMError> {
        let schema_text = serde_json::to_string_pretty(schema)
            .map_err(|e| LLMError::RequestFailed(e.to_string()))?;
        let system = format!(
            "{system}\n\nRespond with a single JSON object matching this JSON schema, and nothing else:\n{schema_text}"
        );
        self.complete_with_system(&system, prompt).await
    }
}

/// Blanket implementation for boxed trait objects.
#[async_trait]
impl LLM for Box<dyn LLM> {
    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, LLMError> {
        (**self).complete_with_system(system, prompt).await
    }

    async fn complete_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, LLMError> {
        (**self).complete_structured(system, prompt, schema).await
    }
}

/// Blanket implementation for references, so callers can keep ownership.
#[async_trait]
impl<T: LLM + ?Sized> LLM for &T {
    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, LLMError> {
        (**self).complete_with_system(system, prompt).await
    }

    async fn complete_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, LLMError> {
        (**self).complete_structured(system, prompt, schema).await
    }
}
