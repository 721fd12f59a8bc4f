//! Expert selection
//!
//! - [`similarity::jaccard`] - tag overlap between two experts
//! - [`diversity::DiversitySelector`] - greedy MMR top-k over gated candidates

pub mod diversity;
pub mod similarity;

pub use diversity::{DiversitySelector, SelectionResult};
pub use similarity::jaccard;
