// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod crawl;
pub mod feed;
pub mod talents;

// ---- Re-exports for stable public API ----
pub use crate::crawl::types::{Branch, PageFetcher, Snapshot, StreamRecord, CATCH_ALL_BRANCH};
pub use crate::talents::{Group, Talent, TalentIndex, UNKNOWN_TALENT_ID};
