//! tagger - Attach, query and clear tags on files and directories
//!
//! Tags are kept in per-directory sidecar records instead of a central
//! database. Searches walk the tree layer by layer and skip every branch
//! that holds no record at all.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::TaggerError;
