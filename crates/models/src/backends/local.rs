//! In-process synthetic pipelines.
//!
//! Stand-ins for the hosted pretrained models: deterministic content is
//! derived from string hashes, with unseeded sampling jitter scaled by
//! temperature so repeated runs differ the way real sampling does. Used
//! for development and tests; behaviorally shaped like the real
//! pipelines (prompt continuation, RGB8 canvas, label + confidence).

use crate::pipeline::{
    ImageGenerator, ImageParams, PipelineError, SentimentClassifier, TextGenerator, TextParams,
};
use rand::Rng;
use studio_core::types::{GeneratedImage, Sentiment, SentimentLabel};

/// Deterministic hash of a string (same construction as the scoring hash
/// used by the synthetic accelerator backends).
fn hash_str(s: &str) -> u32 {
    s.bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32))
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

// ─── Text generation ────────────────────────────────────────────────────

const SLOGAN_TEMPLATES: &[&str] = &[
    "Where {theme} meets tomorrow",
    "Made for the bold, built for {theme}",
    "{theme}, reimagined for you",
    "Less noise, more {theme}",
    "Your story, powered by {theme}",
    "The future of {theme} starts here",
    "Dare to {verb}",
    "Every day deserves {theme}",
];

const THEMES: &[&str] = &[
    "momentum",
    "connection",
    "discovery",
    "impact",
    "excellence",
    "energy",
    "trust",
    "innovation",
];

const VERBS: &[&str] = &["shine", "move", "grow", "create", "lead", "explore"];

const HASHTAG_STEMS: &[&str] = &[
    "GameChanger",
    "LevelUp",
    "MadeForYou",
    "JoinTheMovement",
    "NextBigThing",
    "StayInspired",
    "BoldMoves",
    "FreshStart",
    "DreamBigger",
    "OwnIt",
];

/// Synthetic causal text generator. Continues the prompt with a
/// slogans-and-hashtags block the way the instruction-following prompt
/// nudges the real model to (most of the time).
pub struct LocalTextModel {
    model_id: String,
}

impl LocalTextModel {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
        }
    }

    /// Pick an index into `len` items: hash-anchored, with sampling
    /// jitter proportional to temperature.
    fn sample_index(seed: u32, position: usize, len: usize, temperature: f32) -> usize {
        let base = seed.wrapping_add(position as u32 * 7919) as usize % len;
        let spread = ((temperature * len as f32).round() as usize).min(len);
        if spread == 0 {
            return base;
        }
        let jitter = rand::thread_rng().gen_range(0..=spread);
        (base + jitter) % len
    }
}

#[async_trait::async_trait]
impl TextGenerator for LocalTextModel {
    async fn generate(&self, prompt: &str, params: &TextParams) -> Result<String, PipelineError> {
        let seed = hash_str(prompt);
        let mut out = String::from(prompt);
        out.push_str("\n\nSlogans:\n");

        for i in 0..3 {
            let template = SLOGAN_TEMPLATES[Self::sample_index(
                seed,
                i,
                SLOGAN_TEMPLATES.len(),
                params.temperature,
            )];
            let theme = THEMES[Self::sample_index(seed, i + 3, THEMES.len(), params.temperature)];
            let verb = VERBS[Self::sample_index(seed, i + 6, VERBS.len(), params.temperature)];
            let slogan = template.replace("{theme}", theme).replace("{verb}", verb);
            out.push_str(&slogan);
            out.push('\n');
        }

        out.push_str("\nHashtags:\n");
        for i in 0..5 {
            let stem = HASHTAG_STEMS[Self::sample_index(
                seed,
                i + 11,
                HASHTAG_STEMS.len(),
                params.temperature,
            )];
            out.push('#');
            out.push_str(stem);
            out.push('\n');
        }

        // Honor the max output length the way the real pipeline does: the
        // cap covers prompt plus continuation. Line structure survives
        // unless the cap actually truncates.
        if out.split_whitespace().count() > params.max_length {
            let capped = out
                .split_whitespace()
                .take(params.max_length)
                .collect::<Vec<_>>()
                .join(" ");
            out = capped;
        }
        Ok(out)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ─── Image generation ───────────────────────────────────────────────────

/// Synthetic diffusion stand-in: a prompt-seeded procedural gradient.
/// Step count feeds the palette phase so different settings produce
/// visibly different canvases.
pub struct LocalImageModel {
    model_id: String,
}

impl LocalImageModel {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ImageGenerator for LocalImageModel {
    async fn generate(
        &self,
        prompt: &str,
        params: &ImageParams,
    ) -> Result<GeneratedImage, PipelineError> {
        if params.width == 0 || params.height == 0 {
            return Err(PipelineError::Backend(
                "image dimensions must be non-zero".to_string(),
            ));
        }

        let seed = hash_str(prompt);
        let phase = (seed % 360) as f32 / 360.0 + params.steps as f32 * 0.01;
        let contrast = (params.guidance_scale / 10.0).clamp(0.2, 1.0);

        let mut pixels = Vec::with_capacity((params.width * params.height * 3) as usize);
        for y in 0..params.height {
            for x in 0..params.width {
                let u = x as f32 / params.width as f32;
                let v = y as f32 / params.height as f32;
                let r = ((u + phase) * std::f32::consts::TAU).sin() * 0.5 + 0.5;
                let g = ((v + phase * 1.3) * std::f32::consts::TAU).sin() * 0.5 + 0.5;
                let b = ((u + v + phase * 0.7) * std::f32::consts::TAU).sin() * 0.5 + 0.5;
                pixels.push((r * contrast * 255.0) as u8);
                pixels.push((g * contrast * 255.0) as u8);
                pixels.push((b * contrast * 255.0) as u8);
            }
        }

        Ok(GeneratedImage {
            pixels,
            width: params.width,
            height: params.height,
        })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ─── Sentiment analysis ─────────────────────────────────────────────────

const POSITIVE_WORDS: &[&str] = &[
    "creative", "bold", "great", "love", "best", "fresh", "inspired", "future", "win", "grow",
    "shine", "excellence", "trust", "impact", "dream",
];

const NEGATIVE_WORDS: &[&str] = &[
    "noise", "worst", "fail", "boring", "hate", "weak", "slow", "problem", "risk", "loss",
];

/// Lexicon-based binary sentiment stand-in with a sigmoid confidence.
pub struct LocalSentimentModel {
    model_id: String,
}

impl LocalSentimentModel {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl SentimentClassifier for LocalSentimentModel {
    async fn classify(&self, text: &str) -> Result<Sentiment, PipelineError> {
        let lower = text.to_lowercase();
        let mut balance: i32 = 0;
        for word in lower.split(|c: char| !c.is_alphanumeric()) {
            if POSITIVE_WORDS.contains(&word) {
                balance += 1;
            } else if NEGATIVE_WORDS.contains(&word) {
                balance -= 1;
            }
        }

        let positive_prob = sigmoid(balance as f32 * 0.8);
        let (label, score) = if positive_prob >= 0.5 {
            (SentimentLabel::Positive, positive_prob)
        } else {
            (SentimentLabel::Negative, 1.0 - positive_prob)
        };

        Ok(Sentiment { label, score })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_params() -> TextParams {
        TextParams {
            max_length: 150,
            num_return_sequences: 1,
            temperature: 0.7,
        }
    }

    // 1. Text generation ----------------------------------------------------

    #[tokio::test]
    async fn test_text_continues_prompt_with_markers() {
        let model = LocalTextModel::new("gpt2");
        let text = model
            .generate("Create a marketing campaign for Acme.", &text_params())
            .await
            .unwrap();

        assert!(text.starts_with("Create a marketing campaign for Acme."));
        let slogans_at = text.find("Slogans:").expect("Slogans marker");
        let hashtags_at = text.find("Hashtags:").expect("Hashtags marker");
        assert!(slogans_at < hashtags_at);
    }

    #[tokio::test]
    async fn test_text_respects_max_length() {
        let model = LocalTextModel::new("gpt2");
        let mut params = text_params();
        params.max_length = 10;
        let text = model.generate("a b c d e", &params).await.unwrap();
        assert!(text.split_whitespace().count() <= 10);
    }

    // 2. Image generation ---------------------------------------------------

    #[tokio::test]
    async fn test_image_has_requested_dimensions() {
        let model = LocalImageModel::new("sd-2-1");
        let params = ImageParams {
            steps: 25,
            guidance_scale: 7.5,
            width: 32,
            height: 16,
        };
        let image = model.generate("a red bicycle", &params).await.unwrap();
        assert_eq!(image.width, 32);
        assert_eq!(image.height, 16);
        assert_eq!(image.pixels.len(), 32 * 16 * 3);
    }

    #[tokio::test]
    async fn test_image_rejects_zero_dimensions() {
        let model = LocalImageModel::new("sd-2-1");
        let params = ImageParams {
            steps: 25,
            guidance_scale: 7.5,
            width: 0,
            height: 16,
        };
        assert!(model.generate("x", &params).await.is_err());
    }

    // 3. Sentiment ----------------------------------------------------------

    #[tokio::test]
    async fn test_positive_copy_classified_positive() {
        let model = LocalSentimentModel::new("distilbert-sst2");
        let s = model
            .classify("A bold, creative campaign everyone will love")
            .await
            .unwrap();
        assert_eq!(s.label, SentimentLabel::Positive);
        assert!(s.score > 0.5 && s.score <= 1.0);
    }

    #[tokio::test]
    async fn test_negative_copy_classified_negative() {
        let model = LocalSentimentModel::new("distilbert-sst2");
        let s = model
            .classify("The worst, boring launch; a slow fail and a big problem")
            .await
            .unwrap();
        assert_eq!(s.label, SentimentLabel::Negative);
        assert!(s.score > 0.5 && s.score <= 1.0);
    }
}
