//! Application layer - Use cases and orchestration

pub mod merge;
pub mod query;
pub mod tagging;

pub use merge::{log_skip, MergeEngine, MergeReport};
pub use query::{ClearOptions, FindOptions, QueryEngine};
pub use tagging::TagService;
