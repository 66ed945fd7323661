pub mod extraction;
pub mod lexicon;
pub mod overlap;
pub mod types;

pub use extraction::extract_entities;
pub use lexicon::{default_lexicon, Lexicon, LexiconTable};
pub use overlap::{classify_overlap, Confidence, Overlap};
pub use types::*;

// Module-level constants
pub const TARGET_ENTITY: &str = "entity";
