//! Model Provider Module
//!
//! Provides a unified interface for vision-language model backends behind
//! the [`ModelProvider`] trait: one operation turning a structured
//! conversation (system instruction plus a user turn interleaving text
//! segments and image references) into one generated completion.
//!
//! ## Backends
//!
//! - **QwenVlProvider** (feature `llm`): Qwen2.5-VL via mistral.rs, loaded
//!   from the Hugging Face hub. GPU when CUDA is available, CPU otherwise.
//! - **TemplateProvider** (always compiled): deterministic markdown template,
//!   used when the `llm` feature is disabled and by the test suite.
//!
//! The provider is constructed once at process start and passed by reference
//! into every report-generation call; there is no global lookup.

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ModelConfig;

#[cfg(feature = "llm")]
mod qwen_vl;
#[cfg(feature = "llm")]
pub use qwen_vl::QwenVlProvider;
#[cfg(feature = "llm")]
pub use qwen_vl::is_cuda_available;

mod template;
pub use template::TemplateProvider;

/// Model provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backend returned no completion text
    #[error("model returned an empty completion")]
    EmptyCompletion,

    /// An attached image could not be read or decoded
    #[cfg(feature = "llm")]
    #[error("failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// One item of the user turn, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    /// A descriptive text segment
    Text(String),
    /// A reference to an image on disk
    Image(PathBuf),
}

/// A structured conversation: fixed system instruction plus an ordered
/// user turn of text segments and image references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub system: String,
    pub user_content: Vec<ContentItem>,
}

impl Conversation {
    /// All user text segments, in order.
    pub fn text_items(&self) -> impl Iterator<Item = &str> {
        self.user_content.iter().filter_map(|item| match item {
            ContentItem::Text(text) => Some(text.as_str()),
            ContentItem::Image(_) => None,
        })
    }

    /// All image references, in order.
    pub fn image_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.user_content.iter().filter_map(|item| match item {
            ContentItem::Image(path) => Some(path),
            ContentItem::Text(_) => None,
        })
    }
}

/// Unified trait for vision-language model backends
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Generate one completion for the given conversation.
    ///
    /// Returns only newly generated text — the echoed prompt is excluded.
    async fn generate(&self, conversation: &Conversation) -> Result<String>;

    /// Get the provider name for logging
    fn provider_name(&self) -> &'static str;

    /// Check if this provider uses GPU
    fn uses_gpu(&self) -> bool;
}

/// Factory for creating the model provider
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the vision-language provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded.
    #[cfg(feature = "llm")]
    pub async fn create(config: &ModelConfig) -> Result<Arc<dyn ModelProvider>> {
        tracing::info!(
            model_id = %config.model_id,
            "Attempting to load mistral.rs vision backend"
        );

        let provider = QwenVlProvider::load(config).await?;
        let provider = Arc::new(provider);

        tracing::info!(
            provider = provider.provider_name(),
            uses_gpu = provider.uses_gpu(),
            "Vision backend loaded successfully"
        );

        Ok(provider)
    }

    /// Create the template provider (when the `llm` feature is disabled).
    #[cfg(not(feature = "llm"))]
    pub async fn create(config: &ModelConfig) -> Result<Arc<dyn ModelProvider>> {
        tracing::info!(
            model_id = %config.model_id,
            "llm feature disabled — using deterministic template provider"
        );
        Ok(Arc::new(TemplateProvider::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_item_accessors() {
        let conversation = Conversation {
            system: "inspect".to_string(),
            user_content: vec![
                ContentItem::Text("Below are 1 RGB images for Turbine-2_A:".to_string()),
                ContentItem::Image(PathBuf::from("/data/Turbine-2_A_01.jpg")),
                ContentItem::Text("Below are 1 thermal images for Turbine-2_A:".to_string()),
                ContentItem::Image(PathBuf::from("/data/Turbine-2_A_thermal_01.jpg")),
            ],
        };

        assert_eq!(conversation.text_items().count(), 2);
        let images: Vec<_> = conversation.image_paths().collect();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0], &PathBuf::from("/data/Turbine-2_A_01.jpg"));
    }
}
