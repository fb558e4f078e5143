//! HTTP surface: campaign form, generation endpoint, results rendering,
//! download packaging, and operational probes.

pub mod content;
pub mod progress;
pub mod rest;
pub mod server;
pub mod views;

pub use server::ApiServer;
