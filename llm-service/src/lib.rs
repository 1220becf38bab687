//! Shared LLM service with two logical roles: **answer** and **embedding**.
//!
//! This crate is the integration point for the external model providers.
//! It exposes:
//! - Provider configs ([`LlmModelConfig`], [`LlmProvider`]) with strict
//!   env-driven constructors in [`config::default_config`]
//! - Thin non-streaming HTTP clients for Ollama and OpenAI
//! - A role facade ([`LlmServiceRoles`]) that caches clients per config and
//!   applies a bounded retry policy to transient failures
//!
//! Everything network-bound lives here; the retrieval and session crates
//! consume this service through their own capability traits.

pub mod config;
pub mod error_handler;
pub mod retry;
pub mod service_roles;
pub mod services;

pub use config::default_config;
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{LlmServiceError, Result};
pub use retry::RetryPolicy;
pub use service_roles::LlmServiceRoles;
