use super::{ClaudeClient, GeminiClient, LLMError, OpenAIClient, LLM};
use crate::config::{
    LLMConfig, DEFAULT_ANTHROPIC_MODEL, DEFAULT_GEMINI_MAX_TOKENS, DEFAULT_GEMINI_MODEL,
    DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL,
};

/// LLM Provider configuration.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Google Gemini (default)
    Gemini {
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
        max_tokens: u32,
    },
    /// OpenAI-compatible endpoint
    OpenAI {
        base_url: Option<String>,
        api_key: Option<String>,
        model: Option<String>,
        max_tokens: u32,
    },
    /// Anthropic Claude
    Anthropic {
        api_key: Option<String>,
        model: Option<String>,
        api_version: Option<String>,
        max_tokens: u32,
    },
    /// Local Ollama instance
    Ollama {
        base_url: Option<String>,
        model: String,
        max_tokens: u32,
    },
}

impl Default for Provider {
    fn default() -> Self {
        Provider::Gemini {
            api_key: None,
            model: None,
            base_url: None,
            max_tokens: DEFAULT_GEMINI_MAX_TOKENS,
        }
    }
}

impl Provider {
    /// Creates a provider from LLMConfig.
    pub fn from_config(config: &LLMConfig) -> Result<Self, LLMError> {
        let max_tokens = config.max_tokens_or_default();
        let provider = match config.provider.to_lowercase().as_str() {
            "gemini" | "google" => Provider::Gemini {
                api_key: config.api_key.clone(),
                model: config.model.clone(),
                base_url: config.base_url.clone(),
                max_tokens,
            },
            "openai" | "openai-compatible" => Provider::OpenAI {
                base_url: config.base_url.clone(),
                api_key: config.api_key.clone(),
                model: config.model.clone(),
                max_tokens,
            },
            "anthropic" | "claude" => Provider::Anthropic {
                api_key: config.api_key.clone(),
                model: config.model.clone(),
                api_version: config.api_version.clone(),
                max_tokens,
            },
            "ollama" => Provider::Ollama {
                base_url: config.base_url.clone(),
                model: config
                    .model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
                max_tokens,
            },
            other => return Err(LLMError::UnknownProvider(other.to_string())),
        };
        Ok(provider)
    }

    /// Creates an LLM client from the provider configuration.
    pub fn build(self) -> Result<Box<dyn LLM>, LLMError> {
        match self {
            Provider::Gemini {
                api_key,
                model,
                base_url,
                max_tokens,
            } => {
                let key = api_key
                    .or_else(|| std::env::var("CURATOR_LLM_API_KEY").ok())
                    .or_else(|| std::env::var("GEMINI_API_KEY").ok())
                    .ok_or(LLMError::MissingApiKey)?;

                let mdl = model
                    .or_else(|| std::env::var("GEMINI_MODEL").ok())
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

                let mut client = GeminiClient::new(key)
                    .with_model(mdl)
                    .with_max_tokens(max_tokens);
                if let Some(url) = base_url {
                    client = client.with_base_url(url);
                }

                Ok(Box::new(client))
            }

            Provider::OpenAI {
                base_url,
                api_key,
                model,
                max_tokens,
            } => {
                let base = base_url
                    .or_else(|| std::env::var("OPENAI_BASE_URL").ok())
                    .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());

                let key = api_key
                    .or_else(|| std::env::var("CURATOR_LLM_API_KEY").ok())
                    .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                    .unwrap_or_default();

                let mdl = model
                    .or_else(|| std::env::var("OPENAI_MODEL").ok())
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

                Ok(Box::new(
                    OpenAIClient::new(base, key, mdl).with_max_tokens(max_tokens),
                ))
            }

            Provider::Anthropic {
                api_key,
                model,
                api_version,
                max_tokens,
            } => {
                let key = api_key
                    .or_else(|| std::env::var("CURATOR_LLM_API_KEY").ok())
                    .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
                    .ok_or(LLMError::MissingApiKey)?;

                let mdl = model
                    .or_else(|| std::env::var("ANTHROPIC_MODEL").ok())
                    .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string());

                let mut client = ClaudeClient::new(key)
                    .with_model(mdl)
                    .with_max_tokens(max_tokens);
                if let Some(version) = api_version {
                    client = client.with_api_version(version);
                }

                Ok(Box::new(client))
            }

            Provider::Ollama {
                base_url,
                model,
                max_tokens,
            } => {
                let base = base_url
                    .or_else(|| {
                        std::env::var("OLLAMA_HOST")
                            .ok()
                            .map(|h| format!("{}/v1", h.trim_end_matches('/')))
                    })
                    .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

                Ok(Box::new(
                    OpenAIClient::new(base, "", model).with_max_tokens(max_tokens),
                ))
            }
        }
    }

    /// Auto-detect provider from environment variables.
    ///
    /// Detection order:
    /// 1. CURATOR_LLM_PROVIDER explicitly set
    /// 2. GEMINI_API_KEY set → Gemini
    /// 3. OPENAI_API_KEY set → OpenAI
    /// 4. ANTHROPIC_API_KEY set → Anthropic
    /// 5. OLLAMA_HOST set → Ollama
    /// 6. Default to Gemini (fails without a key)
    pub fn from_env() -> Result<Box<dyn LLM>, LLMError> {
        if let Ok(provider) = std::env::var("CURATOR_LLM_PROVIDER") {
            let config = LLMConfig {
                provider,
                model: std::env::var("CURATOR_LLM_MODEL").ok(),
                ..LLMConfig::default()
            };
            return Provider::from_config(&config)?.build();
        }

        let provider = if std::env::var("GEMINI_API_KEY").is_ok() {
            "gemini"
        } else if std::env::var("OPENAI_API_KEY").is_ok() {
            "openai"
        } else if std::env::var("ANTHROPIC_API_KEY").is_ok() {
            "anthropic"
        } else if std::env::var("OLLAMA_HOST").is_ok() {
            "ollama"
        } else {
            "gemini"
        };

        let config = LLMConfig {
            provider: provider.to_string(),
            ..LLMConfig::default()
        };
        Provider::from_config(&config)?.build()
    }
}
