use crate::error::{CampaignError, CampaignResult};
use serde::{Deserialize, Serialize};

/// Maximum brand name length accepted at the API boundary.
pub const MAX_BRAND_LEN: usize = 256;

/// Target audience segments offered on the campaign form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Teens,
    YoungAdults,
    Parents,
    Seniors,
    Professionals,
}

impl Audience {
    pub const ALL: [Audience; 5] = [
        Audience::Teens,
        Audience::YoungAdults,
        Audience::Parents,
        Audience::Seniors,
        Audience::Professionals,
    ];

    /// Human-readable name shown on the form and interpolated into prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Audience::Teens => "Teens",
            Audience::YoungAdults => "Young Adults",
            Audience::Parents => "Parents",
            Audience::Seniors => "Seniors",
            Audience::Professionals => "Professionals",
        }
    }

    /// Stable identifier used as the form field value.
    pub fn key(&self) -> &'static str {
        match self {
            Audience::Teens => "teens",
            Audience::YoungAdults => "young_adults",
            Audience::Parents => "parents",
            Audience::Seniors => "seniors",
            Audience::Professionals => "professionals",
        }
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Social platforms a campaign can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    TikTok,
    Twitter,
    Facebook,
    LinkedIn,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Instagram,
        Platform::TikTok,
        Platform::Twitter,
        Platform::Facebook,
        Platform::LinkedIn,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::Twitter => "Twitter",
            Platform::Facebook => "Facebook",
            Platform::LinkedIn => "LinkedIn",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::TikTok => "tik_tok",
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
            Platform::LinkedIn => "linked_in",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single campaign brief as submitted from the form.
///
/// Immutable once created; drives exactly one generation cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRequest {
    pub brand: String,
    #[serde(default)]
    pub audience: Vec<Audience>,
    pub platform: Option<Platform>,
    #[serde(default)]
    pub goals: String,
}

impl CampaignRequest {
    /// Validate required fields at the API boundary. Brand and platform
    /// are mandatory; audience and goals are free to be empty.
    pub fn validate(&self) -> CampaignResult<()> {
        if self.brand.trim().is_empty() || self.platform.is_none() {
            return Err(CampaignError::Validation(
                "Brand Name and Platform".to_string(),
            ));
        }
        if self.brand.len() > MAX_BRAND_LEN {
            return Err(CampaignError::Validation("Brand Name".to_string()));
        }
        Ok(())
    }
}

/// Sentiment polarity emitted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
        }
    }

    /// Title-cased form shown in the UI ("positive" -> "Positive").
    pub fn title(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
        }
    }
}

/// Label plus classifier confidence in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f32,
}

/// Raw RGB8 pixel buffer produced by the image pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl GeneratedImage {
    /// Solid-color canvas, used as a fallback and in tests.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&rgb);
        }
        Self {
            pixels,
            width,
            height,
        }
    }
}

/// Combined output of one generation cycle: copy, visual, sentiment.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub text: String,
    pub image: GeneratedImage,
    pub sentiment: Sentiment,
}

/// Slogans and hashtags recovered from the generated copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContent {
    pub slogans: Vec<String>,
    pub hashtags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CampaignRequest {
        CampaignRequest {
            brand: "Acme".to_string(),
            audience: vec![Audience::YoungAdults],
            platform: Some(Platform::Instagram),
            goals: "Increase engagement by 40%".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_missing_brand_rejected() {
        let mut req = valid_request();
        req.brand = "   ".to_string();
        assert!(matches!(
            req.validate(),
            Err(CampaignError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_platform_rejected() {
        let mut req = valid_request();
        req.platform = None;
        assert!(matches!(
            req.validate(),
            Err(CampaignError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_audience_and_goals_allowed() {
        let mut req = valid_request();
        req.audience.clear();
        req.goals.clear();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_label_title_case() {
        assert_eq!(SentimentLabel::Positive.title(), "Positive");
        assert_eq!(SentimentLabel::Negative.title(), "Negative");
    }

    #[test]
    fn test_audience_display_names() {
        assert_eq!(Audience::YoungAdults.to_string(), "Young Adults");
        assert_eq!(Audience::Teens.to_string(), "Teens");
    }

    #[test]
    fn test_solid_image_dimensions() {
        let img = GeneratedImage::solid(4, 2, [10, 20, 30]);
        assert_eq!(img.pixels.len(), 4 * 2 * 3);
        assert_eq!(&img.pixels[0..3], &[10, 20, 30]);
    }
}
