//! Infrastructure layer - Stores, providers and process plumbing

pub mod embedding;
pub mod logging;
pub mod metrics;
pub mod services;
pub mod session_cache;
