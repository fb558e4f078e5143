use thiserror::Error;

pub type CampaignResult<T> = Result<T, CampaignError>;

/// Top-level error type.
///
/// Only two kinds ever reach the user: `Validation` (before any model is
/// touched) and `Generation` (everything that goes wrong afterwards,
/// collapsed into one message). The remaining variants exist for internal
/// plumbing and are folded into `Generation` at the API surface.
#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Please fill in required fields: {0}")]
    Validation(String),

    #[error("Error generating campaign: {0}")]
    Generation(String),

    #[error("Model loading error: {0}")]
    ModelLoad(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CampaignError {
    /// Collapse any non-validation error into the single generation kind
    /// surfaced to the user.
    pub fn into_generation(self) -> CampaignError {
        match self {
            CampaignError::Validation(_) | CampaignError::Generation(_) => self,
            other => CampaignError::Generation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_format() {
        let err = CampaignError::Validation("Brand Name and Platform".to_string());
        assert_eq!(
            err.to_string(),
            "Please fill in required fields: Brand Name and Platform"
        );
    }

    #[test]
    fn test_model_load_collapses_to_generation() {
        let err = CampaignError::ModelLoad("weights missing".to_string()).into_generation();
        assert!(matches!(err, CampaignError::Generation(_)));
        assert!(err.to_string().starts_with("Error generating campaign:"));
    }

    #[test]
    fn test_validation_survives_collapse() {
        let err = CampaignError::Validation("Brand Name".to_string()).into_generation();
        assert!(matches!(err, CampaignError::Validation(_)));
    }
}
