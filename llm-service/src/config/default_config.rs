//! Default model configs loaded strictly from environment variables.
//!
//! This module provides convenience constructors for [`LlmModelConfig`],
//! grouped by provider and role:
//!
//! - **Answer**    → the model that produces the final answer text
//! - **Embedding** → the embedding generator backing similarity search
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND` = provider kind (`ollama` (default) or `openai`)
//! - `LLM_MAX_TOKENS` = optional max tokens (u32)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = answer model (mandatory)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY`         = API key (mandatory)
//! - `OPENAI_URL`             = endpoint (default `https://api.openai.com`)
//! - `OPENAI_MODEL`           = answer model (mandatory)
//! - `OPENAI_EMBEDDING_MODEL` = embedding model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{ConfigError, LlmServiceError, env_opt_u32, must_env},
};

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint() -> Result<String, LlmServiceError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(LlmServiceError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// Constructs a config for the **answer** Ollama model.
///
/// # Env
/// - `OLLAMA_MODEL` (required)
/// - `LLM_MAX_TOKENS` (optional)
///
/// # Defaults
/// - `temperature = Some(0.2)`
/// - `timeout_secs = Some(120)`
pub fn config_ollama_answer() -> Result<LlmModelConfig, LlmServiceError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("OLLAMA_MODEL")?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(120),
    })
}

/// Constructs a config for the **embedding** Ollama model.
///
/// # Env
/// - `EMBEDDING_MODEL` (required)
///
/// # Defaults
/// - `temperature = Some(0.0)` (deterministic)
/// - `max_tokens = None`
/// - `timeout_secs = Some(30)`
pub fn config_ollama_embedding() -> Result<LlmModelConfig, LlmServiceError> {
    let endpoint = ollama_endpoint()?;
    let model = must_env("EMBEDDING_MODEL")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}

/// Constructs a config for the **answer** OpenAI model.
///
/// # Env
/// - `OPENAI_API_KEY` (required)
/// - `OPENAI_MODEL` (required)
/// - `OPENAI_URL` (optional, default `https://api.openai.com`)
/// - `LLM_MAX_TOKENS` (optional)
pub fn config_openai_answer() -> Result<LlmModelConfig, LlmServiceError> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = must_env("OPENAI_MODEL")?;
    let endpoint =
        std::env::var("OPENAI_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens,
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(120),
    })
}

/// Constructs a config for the **embedding** OpenAI model.
///
/// # Env
/// - `OPENAI_API_KEY` (required)
/// - `OPENAI_EMBEDDING_MODEL` (required)
/// - `OPENAI_URL` (optional, default `https://api.openai.com`)
pub fn config_openai_embedding() -> Result<LlmModelConfig, LlmServiceError> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let model = must_env("OPENAI_EMBEDDING_MODEL")?;
    let endpoint =
        std::env::var("OPENAI_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}

/// Resolves the answer-role config for the provider selected by `LLM_KIND`.
///
/// # Errors
/// Returns [`ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`,
/// plus whatever the provider-specific constructor returns.
pub fn answer_config_from_env() -> Result<LlmModelConfig, LlmServiceError> {
    match llm_kind()?.as_str() {
        "ollama" => config_ollama_answer(),
        "openai" => config_openai_answer(),
        other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
    }
}

/// Resolves the embedding-role config for the provider selected by `LLM_KIND`.
///
/// # Errors
/// Returns [`ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`,
/// plus whatever the provider-specific constructor returns.
pub fn embedding_config_from_env() -> Result<LlmModelConfig, LlmServiceError> {
    match llm_kind()?.as_str() {
        "ollama" => config_ollama_embedding(),
        "openai" => config_openai_embedding(),
        other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
    }
}

fn llm_kind() -> Result<String, LlmServiceError> {
    Ok(std::env::var("LLM_KIND")
        .unwrap_or_else(|_| "ollama".to_string())
        .trim()
        .to_ascii_lowercase())
}
