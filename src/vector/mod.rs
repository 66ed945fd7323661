// Embedding provider and similarity configuration
pub const TARGET_VECTOR: &str = "embedding";

pub mod cached;
pub mod config;
pub mod embedding;
pub mod similarity;

// Re-export main components
pub use cached::*;
pub use config::*;
pub use embedding::*;
pub use similarity::*;

/// Returns at most the first `max_chars` characters of `text`
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
