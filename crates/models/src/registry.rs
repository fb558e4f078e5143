//! One-time model loading and the shared bundle.

use crate::backends::hosted::{HostedImageModel, HostedSentimentModel, HostedTextModel};
use crate::backends::local::{LocalImageModel, LocalSentimentModel, LocalTextModel};
use crate::pipeline::{ImageGenerator, SentimentClassifier, TextGenerator};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use studio_core::config::{ModelProvider, ModelsConfig};
use studio_core::{CampaignError, CampaignResult};
use tokio::sync::OnceCell;
use tracing::info;

/// The three opaque pipeline handles, shared read-only across requests.
pub struct ModelBundle {
    pub text: Arc<dyn TextGenerator>,
    pub image: Arc<dyn ImageGenerator>,
    pub sentiment: Arc<dyn SentimentClassifier>,
}

/// Loads the pipelines lazily and caches them for the process lifetime.
///
/// Loading is the one expensive operation in the system, so the cell
/// guarantees a single successful initialization. A failed load caches
/// nothing: the next call runs the full load again, and no partial bundle
/// is ever visible.
pub struct ModelRegistry {
    config: ModelsConfig,
    bundle: OnceCell<Arc<ModelBundle>>,
    load_attempts: AtomicUsize,
}

impl ModelRegistry {
    pub fn new(config: ModelsConfig) -> Self {
        Self {
            config,
            bundle: OnceCell::new(),
            load_attempts: AtomicUsize::new(0),
        }
    }

    /// Registry whose bundle is already initialized. Used when models are
    /// warmed up as an explicit startup step, and by tests injecting stub
    /// pipelines.
    pub fn preloaded(config: ModelsConfig, bundle: ModelBundle) -> Self {
        Self {
            config,
            bundle: OnceCell::new_with(Some(Arc::new(bundle))),
            load_attempts: AtomicUsize::new(0),
        }
    }

    /// Get the shared bundle, loading all three pipelines on first use.
    pub async fn bundle(&self) -> CampaignResult<Arc<ModelBundle>> {
        let bundle = self
            .bundle
            .get_or_try_init(|| async {
                self.load_attempts.fetch_add(1, Ordering::SeqCst);
                self.load_all().await
            })
            .await?;
        Ok(bundle.clone())
    }

    /// Number of load attempts so far. Observable so callers can assert
    /// the at-most-once guarantee and the no-model-call-on-invalid-input
    /// guarantee.
    pub fn load_attempts(&self) -> usize {
        self.load_attempts.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &ModelsConfig {
        &self.config
    }

    async fn load_all(&self) -> CampaignResult<Arc<ModelBundle>> {
        let started = std::time::Instant::now();
        info!(
            provider = ?self.config.provider,
            text_model = %self.config.text_model,
            image_model = %self.config.image_model,
            sentiment_model = %self.config.sentiment_model,
            "Loading model bundle"
        );

        let bundle = match self.config.provider {
            ModelProvider::Local => ModelBundle {
                text: Arc::new(LocalTextModel::new(&self.config.text_model)),
                image: Arc::new(LocalImageModel::new(&self.config.image_model)),
                sentiment: Arc::new(LocalSentimentModel::new(&self.config.sentiment_model)),
            },
            ModelProvider::Hosted => {
                let client = reqwest::Client::new();
                let text = HostedTextModel::connect(
                    client.clone(),
                    &self.config.endpoint,
                    &self.config.text_model,
                )
                .await
                .map_err(|e| CampaignError::ModelLoad(e.to_string()))?;
                let image = HostedImageModel::connect(
                    client.clone(),
                    &self.config.endpoint,
                    &self.config.image_model,
                )
                .await
                .map_err(|e| CampaignError::ModelLoad(e.to_string()))?;
                let sentiment = HostedSentimentModel::connect(
                    client,
                    &self.config.endpoint,
                    &self.config.sentiment_model,
                )
                .await
                .map_err(|e| CampaignError::ModelLoad(e.to_string()))?;
                ModelBundle {
                    text: Arc::new(text),
                    image: Arc::new(image),
                    sentiment: Arc::new(sentiment),
                }
            }
        };

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model bundle ready"
        );
        Ok(Arc::new(bundle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::config::ModelsConfig;

    #[tokio::test]
    async fn test_bundle_loads_at_most_once() {
        let registry = ModelRegistry::new(ModelsConfig::default());
        assert_eq!(registry.load_attempts(), 0);

        let first = registry.bundle().await.unwrap();
        let second = registry.bundle().await.unwrap();
        let third = registry.bundle().await.unwrap();

        assert_eq!(registry.load_attempts(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &third));
    }

    #[tokio::test]
    async fn test_no_load_before_first_use() {
        let registry = ModelRegistry::new(ModelsConfig::default());
        assert_eq!(registry.load_attempts(), 0);
    }
}
