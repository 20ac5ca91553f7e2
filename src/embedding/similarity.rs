// file: src/embedding/similarity.rs
// description: cosine similarity between embedding vectors
// reference: https://en.wikipedia.org/wiki/Cosine_similarity

/// Cosine similarity `dot(a, b) / (|a| * |b|)`.
///
/// Returns a value in `[-1.0, 1.0]`, or `0.0` when either vector has zero
/// magnitude (or the result is otherwise not finite), so callers never see NaN.
///
/// # Panics
///
/// Panics if `a` and `b` differ in length. Comparing vectors from different
/// models is a caller bug, not a recoverable condition.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(
        a.len(),
        b.len(),
        "cosine similarity requires equal-length vectors"
    );

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }

    let score = dot / denom;
    if score.is_finite() {
        score.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
