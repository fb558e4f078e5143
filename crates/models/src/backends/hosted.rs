//! Hosted inference-server backend.
//!
//! Talks to a remote pipeline server holding the real pretrained weights.
//! Text and sentiment use JSON request/response; the image pipeline
//! returns encoded PNG bytes which are decoded to the RGB8 buffer the
//! rest of the system works with.

use crate::pipeline::{
    ImageGenerator, ImageParams, PipelineError, SentimentClassifier, TextGenerator, TextParams,
};
use serde::{Deserialize, Serialize};
use studio_core::types::{GeneratedImage, Sentiment, SentimentLabel};
use tracing::debug;

fn model_url(endpoint: &str, model_id: &str) -> String {
    format!("{}/models/{}", endpoint.trim_end_matches('/'), model_id)
}

/// Probe the server for a model before handing out a handle, so load
/// failures surface at bundle-load time rather than mid-request.
async fn probe(
    client: &reqwest::Client,
    endpoint: &str,
    model_id: &str,
) -> Result<(), PipelineError> {
    let url = model_url(endpoint, model_id);
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| PipelineError::ModelNotLoaded(format!("{model_id}: {e}")))?;
    if !response.status().is_success() {
        return Err(PipelineError::ModelNotLoaded(format!(
            "{model_id}: server returned {}",
            response.status()
        )));
    }
    debug!(model_id = %model_id, "Hosted pipeline available");
    Ok(())
}

async fn check_status(
    response: reqwest::Response,
    model_id: &str,
) -> Result<reqwest::Response, PipelineError> {
    if !response.status().is_success() {
        return Err(PipelineError::Backend(format!(
            "{model_id}: server returned {}",
            response.status()
        )));
    }
    Ok(response)
}

// ─── Text generation ────────────────────────────────────────────────────

#[derive(Serialize)]
struct TextRequest<'a> {
    inputs: &'a str,
    parameters: TextRequestParams,
}

#[derive(Serialize)]
struct TextRequestParams {
    max_length: usize,
    num_return_sequences: usize,
    do_sample: bool,
    temperature: f32,
}

#[derive(Deserialize)]
struct TextResponseEntry {
    generated_text: String,
}

pub struct HostedTextModel {
    client: reqwest::Client,
    url: String,
    model_id: String,
}

impl HostedTextModel {
    pub async fn connect(
        client: reqwest::Client,
        endpoint: &str,
        model_id: &str,
    ) -> Result<Self, PipelineError> {
        probe(&client, endpoint, model_id).await?;
        Ok(Self {
            url: model_url(endpoint, model_id),
            client,
            model_id: model_id.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl TextGenerator for HostedTextModel {
    async fn generate(&self, prompt: &str, params: &TextParams) -> Result<String, PipelineError> {
        let body = TextRequest {
            inputs: prompt,
            parameters: TextRequestParams {
                max_length: params.max_length,
                num_return_sequences: params.num_return_sequences,
                do_sample: true,
                temperature: params.temperature,
            },
        };
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Backend(format!("{}: {e}", self.model_id)))?;
        let entries: Vec<TextResponseEntry> = check_status(response, &self.model_id)
            .await?
            .json()
            .await
            .map_err(|e| PipelineError::MalformedResponse(e.to_string()))?;
        entries
            .into_iter()
            .next()
            .map(|e| e.generated_text)
            .ok_or_else(|| {
                PipelineError::MalformedResponse("empty text generation response".to_string())
            })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ─── Image generation ───────────────────────────────────────────────────

#[derive(Serialize)]
struct ImageRequest<'a> {
    inputs: &'a str,
    parameters: ImageRequestParams,
}

#[derive(Serialize)]
struct ImageRequestParams {
    num_inference_steps: u32,
    guidance_scale: f32,
    width: u32,
    height: u32,
}

pub struct HostedImageModel {
    client: reqwest::Client,
    url: String,
    model_id: String,
}

impl HostedImageModel {
    pub async fn connect(
        client: reqwest::Client,
        endpoint: &str,
        model_id: &str,
    ) -> Result<Self, PipelineError> {
        probe(&client, endpoint, model_id).await?;
        Ok(Self {
            url: model_url(endpoint, model_id),
            client,
            model_id: model_id.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ImageGenerator for HostedImageModel {
    async fn generate(
        &self,
        prompt: &str,
        params: &ImageParams,
    ) -> Result<GeneratedImage, PipelineError> {
        let body = ImageRequest {
            inputs: prompt,
            parameters: ImageRequestParams {
                num_inference_steps: params.steps,
                guidance_scale: params.guidance_scale,
                width: params.width,
                height: params.height,
            },
        };
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Backend(format!("{}: {e}", self.model_id)))?;
        let bytes = check_status(response, &self.model_id)
            .await?
            .bytes()
            .await
            .map_err(|e| PipelineError::Backend(e.to_string()))?;

        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| PipelineError::MalformedResponse(format!("image decode: {e}")))?
            .to_rgb8();
        let (width, height) = decoded.dimensions();
        Ok(GeneratedImage {
            pixels: decoded.into_raw(),
            width,
            height,
        })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ─── Sentiment analysis ─────────────────────────────────────────────────

#[derive(Serialize)]
struct SentimentRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct SentimentResponseEntry {
    label: String,
    score: f32,
}

pub struct HostedSentimentModel {
    client: reqwest::Client,
    url: String,
    model_id: String,
}

impl HostedSentimentModel {
    pub async fn connect(
        client: reqwest::Client,
        endpoint: &str,
        model_id: &str,
    ) -> Result<Self, PipelineError> {
        probe(&client, endpoint, model_id).await?;
        Ok(Self {
            url: model_url(endpoint, model_id),
            client,
            model_id: model_id.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl SentimentClassifier for HostedSentimentModel {
    async fn classify(&self, text: &str) -> Result<Sentiment, PipelineError> {
        let response = self
            .client
            .post(&self.url)
            .json(&SentimentRequest { inputs: text })
            .send()
            .await
            .map_err(|e| PipelineError::Backend(format!("{}: {e}", self.model_id)))?;
        let entries: Vec<SentimentResponseEntry> = check_status(response, &self.model_id)
            .await?
            .json()
            .await
            .map_err(|e| PipelineError::MalformedResponse(e.to_string()))?;
        let entry = entries.into_iter().next().ok_or_else(|| {
            PipelineError::MalformedResponse("empty sentiment response".to_string())
        })?;

        let label = match entry.label.to_ascii_lowercase().as_str() {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            other => {
                return Err(PipelineError::MalformedResponse(format!(
                    "unknown sentiment label: {other}"
                )))
            }
        };
        Ok(Sentiment {
            label,
            score: entry.score,
        })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_url_joins_cleanly() {
        assert_eq!(
            model_url("http://localhost:8500/", "gpt2"),
            "http://localhost:8500/models/gpt2"
        );
        assert_eq!(
            model_url("http://localhost:8500", "stabilityai/stable-diffusion-2-1-base"),
            "http://localhost:8500/models/stabilityai/stable-diffusion-2-1-base"
        );
    }
}
