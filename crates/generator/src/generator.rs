//! Sequential generation chain: copy, then visual, then sentiment.

use std::sync::Arc;
use std::time::Instant;
use studio_core::config::GenerationConfig;
use studio_core::types::GenerationResult;
use studio_core::{CampaignError, CampaignResult};
use studio_models::{ImageParams, ModelBundle, ModelRegistry, TextParams};
use tracing::{debug, error, info};

/// Runs one generation cycle against the shared model bundle.
///
/// The three pipeline calls are strictly sequential and share the prompt
/// between text and image. There is no partial-success path: the first
/// stage to fail aborts the cycle, the cause is logged, and the caller
/// sees the single generic generation error.
pub struct ContentGenerator {
    registry: Arc<ModelRegistry>,
    config: GenerationConfig,
}

impl ContentGenerator {
    pub fn new(registry: Arc<ModelRegistry>, config: GenerationConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Generate copy, image, and sentiment for one prompt, loading the
    /// bundle first if this is the process's first request.
    pub async fn generate(&self, prompt: &str) -> CampaignResult<GenerationResult> {
        let bundle = self.registry.bundle().await.map_err(|e| {
            error!(error = %e, "Model bundle unavailable");
            e.into_generation()
        })?;
        self.generate_with_bundle(prompt, &bundle).await
    }

    /// Generate against an explicit bundle.
    pub async fn generate_with_bundle(
        &self,
        prompt: &str,
        bundle: &ModelBundle,
    ) -> CampaignResult<GenerationResult> {
        let started = Instant::now();

        let text_params = TextParams::from(&self.config);
        let text = bundle
            .text
            .generate(prompt, &text_params)
            .await
            .map_err(|e| {
                error!(stage = "text", model = bundle.text.model_id(), error = %e, "Generation stage failed");
                CampaignError::Generation(e.to_string())
            })?;
        debug!(
            stage = "text",
            chars = text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Text generation complete"
        );

        let image_params = ImageParams::from(&self.config);
        let image = bundle
            .image
            .generate(prompt, &image_params)
            .await
            .map_err(|e| {
                error!(stage = "image", model = bundle.image.model_id(), error = %e, "Generation stage failed");
                CampaignError::Generation(e.to_string())
            })?;
        debug!(
            stage = "image",
            width = image.width,
            height = image.height,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Image generation complete"
        );

        let snippet = truncate_chars(&text, self.config.sentiment_max_chars);
        let sentiment = bundle.sentiment.classify(snippet).await.map_err(|e| {
            error!(stage = "sentiment", model = bundle.sentiment.model_id(), error = %e, "Generation stage failed");
            CampaignError::Generation(e.to_string())
        })?;

        info!(
            label = sentiment.label.as_str(),
            score = sentiment.score,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generation cycle complete"
        );

        Ok(GenerationResult {
            text,
            image,
            sentiment,
        })
    }
}

/// First `max_chars` characters of `s`, respecting char boundaries.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use studio_core::config::ModelsConfig;
    use studio_core::types::{GeneratedImage, Sentiment, SentimentLabel};
    use studio_models::{
        ImageGenerator, PipelineError, SentimentClassifier, TextGenerator,
    };

    /// Shared call log so tests can assert stage ordering.
    type CallLog = Arc<Mutex<Vec<&'static str>>>;

    struct StubText {
        log: CallLog,
        output: String,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl TextGenerator for StubText {
        async fn generate(
            &self,
            _prompt: &str,
            _params: &TextParams,
        ) -> Result<String, PipelineError> {
            self.log.lock().unwrap().push("text");
            if self.fail {
                return Err(PipelineError::Backend("text backend down".to_string()));
            }
            Ok(self.output.clone())
        }

        fn model_id(&self) -> &str {
            "stub-text"
        }
    }

    struct StubImage {
        log: CallLog,
    }

    #[async_trait::async_trait]
    impl ImageGenerator for StubImage {
        async fn generate(
            &self,
            _prompt: &str,
            _params: &ImageParams,
        ) -> Result<GeneratedImage, PipelineError> {
            self.log.lock().unwrap().push("image");
            Ok(GeneratedImage::solid(8, 8, [1, 2, 3]))
        }

        fn model_id(&self) -> &str {
            "stub-image"
        }
    }

    struct StubSentiment {
        log: CallLog,
        seen: Arc<Mutex<Option<String>>>,
    }

    #[async_trait::async_trait]
    impl SentimentClassifier for StubSentiment {
        async fn classify(&self, text: &str) -> Result<Sentiment, PipelineError> {
            self.log.lock().unwrap().push("sentiment");
            *self.seen.lock().unwrap() = Some(text.to_string());
            Ok(Sentiment {
                label: SentimentLabel::Positive,
                score: 0.932,
            })
        }

        fn model_id(&self) -> &str {
            "stub-sentiment"
        }
    }

    fn stub_bundle(text_output: &str, text_fails: bool) -> (ModelBundle, CallLog, Arc<Mutex<Option<String>>>) {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::new(Mutex::new(None));
        let bundle = ModelBundle {
            text: Arc::new(StubText {
                log: log.clone(),
                output: text_output.to_string(),
                fail: text_fails,
            }),
            image: Arc::new(StubImage { log: log.clone() }),
            sentiment: Arc::new(StubSentiment {
                log: log.clone(),
                seen: seen.clone(),
            }),
        };
        (bundle, log, seen)
    }

    fn generator() -> ContentGenerator {
        ContentGenerator::new(
            Arc::new(ModelRegistry::new(ModelsConfig::default())),
            GenerationConfig::default(),
        )
    }

    // 1. Stage ordering and aggregation -------------------------------------

    #[tokio::test]
    async fn test_stages_run_in_order() {
        let (bundle, log, _) = stub_bundle("Slogans:\nGo\nHashtags:\n#go", false);
        let result = generator()
            .generate_with_bundle("prompt", &bundle)
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["text", "image", "sentiment"]);
        assert_eq!(result.text, "Slogans:\nGo\nHashtags:\n#go");
        assert_eq!(result.image.width, 8);
        assert_eq!(result.sentiment.label, SentimentLabel::Positive);
    }

    // 2. Failure aborts the chain -------------------------------------------

    #[tokio::test]
    async fn test_text_failure_prevents_image_call() {
        let (bundle, log, _) = stub_bundle("", true);
        let err = generator()
            .generate_with_bundle("prompt", &bundle)
            .await
            .unwrap_err();

        assert!(matches!(err, CampaignError::Generation(_)));
        assert_eq!(*log.lock().unwrap(), vec!["text"]);
    }

    // 3. Sentiment input truncation -----------------------------------------

    #[tokio::test]
    async fn test_sentiment_input_truncated_to_512_chars() {
        let long_text = "x".repeat(2000);
        let (bundle, _, seen) = stub_bundle(&long_text, false);
        generator()
            .generate_with_bundle("prompt", &bundle)
            .await
            .unwrap();

        let seen = seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.chars().count(), 512);
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        // Multibyte chars must not be split mid-sequence.
        let s = "héllo wörld";
        assert_eq!(truncate_chars(s, 2), "hé");
        assert_eq!(truncate_chars(s, 100), s);
    }
}
