//! Backend-agnostic pipeline traits.
//!
//! All backends (in-process synthetic, hosted inference server) implement
//! these traits, allowing the rest of the system to be decoupled from
//! where the pretrained weights actually run.

use studio_core::config::GenerationConfig;
use studio_core::types::{GeneratedImage, Sentiment};
use thiserror::Error;

/// Sampling parameters for one text-generation call.
#[derive(Debug, Clone)]
pub struct TextParams {
    pub max_length: usize,
    pub num_return_sequences: usize,
    pub temperature: f32,
}

/// Diffusion parameters for one image-generation call.
#[derive(Debug, Clone)]
pub struct ImageParams {
    pub steps: u32,
    pub guidance_scale: f32,
    pub width: u32,
    pub height: u32,
}

impl From<&GenerationConfig> for TextParams {
    fn from(cfg: &GenerationConfig) -> Self {
        Self {
            max_length: cfg.max_length,
            num_return_sequences: cfg.num_return_sequences,
            temperature: cfg.temperature,
        }
    }
}

impl From<&GenerationConfig> for ImageParams {
    fn from(cfg: &GenerationConfig) -> Self {
        Self {
            steps: cfg.image_steps,
            guidance_scale: cfg.guidance_scale,
            width: cfg.image_width,
            height: cfg.image_height,
        }
    }
}

/// Errors that can occur while loading or invoking a pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("model not loaded: {0}")]
    ModelNotLoaded(String),

    #[error("backend failure: {0}")]
    Backend(String),

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}

/// Causal text generation pipeline (prompt continuation).
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Continue `prompt`, returning the full generated text (prompt
    /// included, as causal LM pipelines do).
    async fn generate(&self, prompt: &str, params: &TextParams) -> Result<String, PipelineError>;

    /// Model identifier for logging.
    fn model_id(&self) -> &str;
}

/// Text-to-image diffusion pipeline.
#[async_trait::async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        params: &ImageParams,
    ) -> Result<GeneratedImage, PipelineError>;

    fn model_id(&self) -> &str;
}

/// Binary sentiment classification pipeline.
#[async_trait::async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Sentiment, PipelineError>;

    fn model_id(&self) -> &str;
}
