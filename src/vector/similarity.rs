use tracing::debug;

use crate::vector::{CachedEmbedder, TARGET_VECTOR};

/// Calculate cosine similarity between two vectors
///
/// Returns `0.0` when either vector is empty, the dimensions differ, or either
/// vector has (near) zero magnitude, so a failed embedding never looks similar.
pub fn cosine(vec1: &[f32], vec2: &[f32]) -> f64 {
    if vec1.is_empty() || vec2.is_empty() || vec1.len() != vec2.len() {
        return 0.0;
    }

    let mag1: f64 = vec1.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt();
    let mag2: f64 = vec2.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt();

    if mag1 < f64::EPSILON || mag2 < f64::EPSILON {
        return 0.0;
    }

    let dot_product: f64 = vec1
        .iter()
        .zip(vec2.iter())
        .map(|(&a, &b)| a as f64 * b as f64)
        .sum();

    dot_product / (mag1 * mag2)
}

/// Embed both texts and return their cosine similarity
pub async fn embedding_similarity(embedder: &CachedEmbedder, text1: &str, text2: &str) -> f64 {
    let embedding1 = embedder.embed(text1).await;
    let embedding2 = embedder.embed(text2).await;
    let similarity = cosine(&embedding1, &embedding2);

    debug!(
        target: TARGET_VECTOR,
        "Embedding similarity {:.3} (dimensions {} / {})",
        similarity,
        embedding1.len(),
        embedding2.len()
    );

    similarity
}
