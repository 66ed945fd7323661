// Duplicate-story detection: hybrid decision engine plus batch and history filters
pub const TARGET_DEDUP: &str = "dedup";

pub mod batch;
pub mod engine;
pub mod scenarios;
pub mod types;

pub use batch::{
    dedup_stories, filter_against_history, FilterMode, DEFAULT_BATCH_THRESHOLD,
    DEFAULT_HISTORY_THRESHOLD,
};
pub use engine::{DetectorConfig, DuplicateDetector};
pub use types::{DecisionRecord, FilterOutcome, Removal};
