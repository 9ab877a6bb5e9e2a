// src/circle/mod.rs
pub mod cache;
pub mod resolver;
pub mod store;

pub use cache::{CIRCLE_TTL_SECONDS, TrustedCircleCache};
pub use resolver::{CircleMatches, TrustedCircleResolver};
pub use store::{FileStore, KeyValueStore, MemoryStore};
