//! Infrastructure layer - Configuration and sidecar persistence

pub mod config;
pub mod filesystem;
pub mod sidecar;

pub use config::Config;
pub use sidecar::SidecarStore;
