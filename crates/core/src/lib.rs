pub mod config;
pub mod error;
pub mod prompt;
pub mod types;

pub use config::AppConfig;
pub use error::{CampaignError, CampaignResult};
