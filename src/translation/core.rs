/*!
 * Core translation service implementation.
 *
 * `TranslationService` is the production [`Translator`]: it turns one
 * extraction unit into one provider request and caches the answer.
 */

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use std::time::{Duration, Instant};
use url::Url;

use crate::app_config::{Config, TranslationProvider as ConfigTranslationProvider};
use crate::errors::TranslationError;
use crate::language_utils;
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;

use super::cache::TranslationCache;
use super::Translator;

/// Normalize an endpoint into a base URL with scheme and no trailing slash
fn normalize_endpoint(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)
    } else {
        Url::parse(&format!("http://{}", endpoint))
    }
    .with_context(|| format!("Invalid endpoint: {}", endpoint))?;

    if url.host_str().is_none() {
        return Err(anyhow!("Invalid host in endpoint: {}", endpoint));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },

    /// OpenAI API service
    OpenAI {
        /// Client instance
        client: OpenAI,
    },

    /// LM Studio local server (OpenAI-compatible)
    LMStudio {
        /// Client instance (OpenAI-compatible)
        client: OpenAI,
    },
}

/// Main translation service for document paragraphs
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Which provider is configured
    provider_kind: ConfigTranslationProvider,

    /// Model name sent with every request
    model: String,

    /// Sampling temperature
    temperature: f32,

    /// System prompt with language names filled in
    system_prompt: String,

    /// Source language code
    source_language: String,

    /// Target language code
    target_language: String,

    /// Translation cache for storing and retrieving translations
    pub cache: TranslationCache,
}

impl TranslationService {
    /// Create a new translation service from the application configuration
    pub fn new(config: &Config) -> Result<Self> {
        let translation = &config.translation;
        let timeout = Duration::from_secs(translation.get_timeout_secs());
        let endpoint = normalize_endpoint(&translation.get_endpoint())?;

        let provider = match translation.provider {
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new(endpoint, timeout),
            },
            ConfigTranslationProvider::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new(translation.get_api_key(), endpoint, timeout),
            },
            ConfigTranslationProvider::LMStudio => {
                // LM Studio accepts any bearer token
                let api_key = {
                    let k = translation.get_api_key();
                    if k.is_empty() { "lm-studio".to_string() } else { k }
                };
                TranslationProviderImpl::LMStudio {
                    client: OpenAI::new(api_key, endpoint, timeout),
                }
            }
        };

        Ok(Self {
            provider,
            provider_kind: translation.provider.clone(),
            model: translation.get_model(),
            temperature: translation.common.temperature,
            system_prompt: render_system_prompt(
                &translation.common.system_prompt,
                &config.source_language,
                &config.target_language,
            ),
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            cache: TranslationCache::new(translation.common.cache_enabled, translation.common.cache_max_entries),
        })
    }

    /// The rendered system prompt
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Provider display name and model, for log lines
    pub fn describe(&self) -> String {
        format!("{} ({})", self.provider_kind.display_name(), self.model)
    }

    async fn request(&self, text: &str) -> Result<String, TranslationError> {
        let translated = match &self.provider {
            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(&self.model, text)
                    .system(&self.system_prompt)
                    .temperature(self.temperature);
                let response = client.complete(request).await?;
                Ollama::extract_text(&response)
            }
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                let request = OpenAIRequest::new(&self.model)
                    .add_message("system", &self.system_prompt)
                    .add_message("user", text)
                    .temperature(self.temperature);
                let response = client.complete(request).await?;
                OpenAI::extract_text(&response)
            }
        };

        let translated = translated.trim();
        if translated.is_empty() {
            return Err(TranslationError::EmptyResponse);
        }
        Ok(translated.to_string())
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        if let Some(cached) = self.cache.get(text, &self.source_language, &self.target_language) {
            return Ok(cached);
        }

        let start_time = Instant::now();
        let translated = self.request(text).await?;
        debug!("{} answered in {:?}", self.provider_kind.display_name(), start_time.elapsed());

        self.cache.store(text, &self.source_language, &self.target_language, &translated);
        Ok(translated)
    }

    async fn check_available(&self) -> Result<(), TranslationError> {
        let result = match &self.provider {
            TranslationProviderImpl::Ollama { client } => client.test_connection().await,
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                client.test_connection().await
            }
        };

        result.map_err(|e| {
            TranslationError::ServiceUnavailable(format!("{}: {}", self.describe(), e))
        })
    }

    fn usage_summary(&self) -> Option<String> {
        if !self.cache.is_enabled() {
            return None;
        }
        let (hits, misses, hit_rate) = self.cache.stats();
        Some(format!(
            "cache {} hits, {} misses ({:.1}% hit rate), {}/{} entries",
            hits,
            misses,
            hit_rate * 100.0,
            self.cache.len(),
            self.cache.max_entries()
        ))
    }
}

/// Fill the `{source_language}` and `{target_language}` slots of a prompt
///
/// Language names come from ISO 639; unknown codes are used as-is.
pub fn render_system_prompt(template: &str, source_language: &str, target_language: &str) -> String {
    let source = language_utils::get_language_name(source_language)
        .unwrap_or_else(|_| source_language.to_string());
    let target = language_utils::get_language_name(target_language)
        .unwrap_or_else(|_| target_language.to_string());

    template
        .replace("{source_language}", &source)
        .replace("{target_language}", &target)
}
