//! Domain layer - Tag model, storage abstraction and traversal

pub mod naming;
pub mod store;
pub mod tag_set;
pub mod traversal;

pub use naming::unique_target;
pub use store::TagStore;
pub use tag_set::TagSet;
pub use traversal::{Candidate, Traversal};
