//! Qwen2.5-VL Backend
//!
//! Vision-language inference using mistral.rs with hub-hosted models.
//! Automatically detects CUDA availability at runtime:
//! - **CUDA available** (requires `cuda` feature): GPU inference
//! - **CPU fallback**: CPU inference (slow; suitable for small batches)

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::DynamicImage;
use mistralrs::{
    IsqType, Model, RequestBuilder, TextMessageRole, VisionMessages, VisionModelBuilder,
};

use super::{Conversation, ModelProvider, ProviderError};
use crate::config::ModelConfig;

/// Check if CUDA is available at runtime.
///
/// Returns `true` only if the binary was compiled with the `cuda` feature
/// AND CUDA libraries/drivers are detected on the system.
pub fn is_cuda_available() -> bool {
    #[cfg(feature = "cuda")]
    {
        // Check for CUDA environment variables and libraries
        std::env::var("CUDA_VISIBLE_DEVICES").is_ok()
            || std::path::Path::new("/usr/local/cuda").exists()
            || std::path::Path::new("/opt/cuda").exists()
            || std::path::Path::new("/usr/lib/x86_64-linux-gnu/libcuda.so").exists()
    }
    #[cfg(not(feature = "cuda"))]
    {
        false
    }
}

/// mistral.rs vision backend with optional CUDA GPU support
pub struct QwenVlProvider {
    /// The loaded vision model
    model: Model,
    /// Hub model identifier for logging
    model_id: String,
    /// Fixed generation budget per request
    max_new_tokens: usize,
    /// Whether GPU is being used
    uses_gpu: bool,
}

impl QwenVlProvider {
    /// Load a vision-language model from the Hugging Face hub.
    ///
    /// The model and its processor are loaded once and reused read-only
    /// across all report generations.
    pub async fn load(config: &ModelConfig) -> Result<Self> {
        let uses_gpu = is_cuda_available();

        tracing::info!(
            model_id = %config.model_id,
            uses_gpu = uses_gpu,
            "Loading vision-language model with mistral.rs backend"
        );

        if uses_gpu {
            tracing::info!("CUDA detected, using GPU inference");
        } else {
            tracing::info!("CUDA not available, using CPU inference");
        }

        let start = std::time::Instant::now();

        let model = VisionModelBuilder::new(&config.model_id)
            .with_isq(IsqType::Q4K)
            .with_logging()
            .build()
            .await
            .with_context(|| format!("Failed to load vision model {}", config.model_id))?;

        let load_time = start.elapsed();

        tracing::info!(
            load_time_secs = load_time.as_secs_f32(),
            uses_gpu = uses_gpu,
            "Model loaded successfully ({})",
            if uses_gpu { "GPU" } else { "CPU" }
        );

        Ok(Self {
            model,
            model_id: config.model_id.clone(),
            max_new_tokens: config.max_new_tokens,
            uses_gpu,
        })
    }

    /// Decode all image references of the conversation, in order.
    ///
    /// A malformed or unreadable image fails the whole request; the caller
    /// has no retry policy.
    fn load_images(conversation: &Conversation) -> Result<Vec<DynamicImage>, ProviderError> {
        conversation
            .image_paths()
            .map(|path| {
                image::open(path).map_err(|source| ProviderError::ImageLoad {
                    path: path.clone(),
                    source,
                })
            })
            .collect()
    }
}

#[async_trait]
impl ModelProvider for QwenVlProvider {
    async fn generate(&self, conversation: &Conversation) -> Result<String> {
        let images = Self::load_images(conversation)?;
        let user_text = conversation.text_items().collect::<Vec<_>>().join("\n");

        tracing::debug!(
            model_id = %self.model_id,
            image_count = images.len(),
            text_length = user_text.len(),
            max_new_tokens = self.max_new_tokens,
            "Sending vision request to mistral.rs"
        );

        // The descriptive text items are joined into one user message; the
        // decoded images are attached in the same RGB-then-thermal order the
        // conversation lists them.
        let messages = VisionMessages::new()
            .add_message(TextMessageRole::System, &conversation.system)
            .add_image_message(TextMessageRole::User, user_text, images, &self.model)
            .context("Failed to attach images to vision request")?;

        let request = RequestBuilder::from(messages).set_sampler_max_len(self.max_new_tokens);

        let response = self
            .model
            .send_chat_request(request)
            .await
            .context("Vision model request failed")?;

        // mistral.rs returns only newly generated tokens; the echoed prompt
        // is never part of the completion text.
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyCompletion)?;

        tracing::debug!(
            response_length = text.len(),
            "Received completion from mistral.rs"
        );

        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        if self.uses_gpu {
            "mistral.rs Qwen2.5-VL (CUDA)"
        } else {
            "mistral.rs Qwen2.5-VL (CPU)"
        }
    }

    fn uses_gpu(&self) -> bool {
        self.uses_gpu
    }
}
