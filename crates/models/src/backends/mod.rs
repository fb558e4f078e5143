//! Pipeline backends.
//!
//! Each module implements the [`crate::pipeline`] traits for a different
//! execution environment: `local` runs self-contained synthetic pipelines
//! in-process (development and tests), `hosted` talks to a remote
//! inference server holding the real pretrained weights.

pub mod hosted;
pub mod local;
