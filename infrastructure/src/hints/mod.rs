//! Hint persistence adapters

mod json_hint_store;

pub use json_hint_store::JsonHintStore;
