//! Text-to-vector seam for the embedding strategy.

/// Converts text into fixed-length vectors for cosine-similarity search.
///
/// Implementations must be deterministic — the same text always yields the
/// same vector — and must return L2-normalized vectors so cosine similarity
/// reduces to a dot product.
pub trait TextEncoder: Send + Sync {
    /// Vector dimensionality.
    fn dim(&self) -> usize;

    /// Encode a single text into a unit-norm vector.
    fn encode(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    /// Encode a batch of texts, one vector per input.
    fn encode_batch(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.encode(text)).collect()
    }
}

/// L2-normalize a vector in place.
pub(crate) fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity of two unit-norm vectors.
pub(crate) fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
