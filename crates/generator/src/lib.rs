//! Content generation orchestration.

pub mod generator;

pub use generator::ContentGenerator;
