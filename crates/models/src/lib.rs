//! Pipeline abstraction and model registry.
//!
//! The three pretrained pipelines (text generation, image generation,
//! sentiment analysis) are opaque collaborators behind the traits in
//! [`pipeline`]. [`registry::ModelRegistry`] loads them exactly once per
//! process and hands out the shared read-only [`registry::ModelBundle`].

pub mod backends;
pub mod pipeline;
pub mod registry;

pub use pipeline::{
    ImageGenerator, ImageParams, PipelineError, SentimentClassifier, TextGenerator, TextParams,
};
pub use registry::{ModelBundle, ModelRegistry};
