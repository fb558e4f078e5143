use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CAMPAIGN_STUDIO__` (double-underscore separator).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Generated campaigns are kept in memory this long so the results
    /// page, image, and download can be served; expired sessions are
    /// swept when a new campaign is stored.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

/// Which pipelines to load and where. The model identifiers are fixed
/// collaborators, not something the request can vary.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_provider")]
    pub provider: ModelProvider,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_sentiment_model")]
    pub sentiment_model: String,
}

/// Backend used to run the three pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// In-process synthetic pipelines (development, tests).
    Local,
    /// Remote inference server speaking the hosted-pipeline protocol.
    Hosted,
}

/// Fixed generation hyperparameters. The values are inherited from the
/// pipelines' tuned defaults; they are configurable constants, not
/// request-level knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_num_return_sequences")]
    pub num_return_sequences: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_image_steps")]
    pub image_steps: u32,
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f32,
    #[serde(default = "default_image_size")]
    pub image_width: u32,
    #[serde(default = "default_image_size")]
    pub image_height: u32,
    /// Generated text is truncated to this many characters before
    /// sentiment classification (classifier input window).
    #[serde(default = "default_sentiment_max_chars")]
    pub sentiment_max_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// Default functions
fn default_node_id() -> String {
    "studio-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_session_ttl_secs() -> u64 {
    900
}
fn default_provider() -> ModelProvider {
    ModelProvider::Local
}
fn default_endpoint() -> String {
    "http://localhost:8500".to_string()
}
fn default_text_model() -> String {
    "gpt2".to_string()
}
fn default_image_model() -> String {
    "stabilityai/stable-diffusion-2-1-base".to_string()
}
fn default_sentiment_model() -> String {
    "distilbert-base-uncased-finetuned-sst-2-english".to_string()
}
fn default_max_length() -> usize {
    150
}
fn default_num_return_sequences() -> usize {
    1
}
fn default_temperature() -> f32 {
    0.7
}
fn default_image_steps() -> u32 {
    25
}
fn default_guidance_scale() -> f32 {
    7.5
}
fn default_image_size() -> u32 {
    512
}
fn default_sentiment_max_chars() -> usize {
    512
}
fn default_metrics_port() -> u16 {
    9091
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_endpoint(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            sentiment_model: default_sentiment_model(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            num_return_sequences: default_num_return_sequences(),
            temperature: default_temperature(),
            image_steps: default_image_steps(),
            guidance_scale: default_guidance_scale(),
            image_width: default_image_size(),
            image_height: default_image_size(),
            sentiment_max_chars: default_sentiment_max_chars(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            models: ModelsConfig::default(),
            generation: GenerationConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CAMPAIGN_STUDIO")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hyperparameters() {
        let cfg = GenerationConfig::default();
        assert_eq!(cfg.max_length, 150);
        assert_eq!(cfg.num_return_sequences, 1);
        assert!((cfg.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(cfg.image_steps, 25);
        assert!((cfg.guidance_scale - 7.5).abs() < f32::EPSILON);
        assert_eq!(cfg.sentiment_max_chars, 512);
    }

    #[test]
    fn test_default_session_ttl() {
        assert_eq!(ApiConfig::default().session_ttl_secs, 900);
    }

    #[test]
    fn test_default_model_identifiers() {
        let cfg = ModelsConfig::default();
        assert_eq!(cfg.text_model, "gpt2");
        assert_eq!(cfg.image_model, "stabilityai/stable-diffusion-2-1-base");
        assert_eq!(
            cfg.sentiment_model,
            "distilbert-base-uncased-finetuned-sst-2-english"
        );
        assert_eq!(cfg.provider, ModelProvider::Local);
    }
}
