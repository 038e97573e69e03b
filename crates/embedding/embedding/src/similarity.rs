//! Cosine similarity over sparse term vectors.

use crate::vectorizer::TermVector;

/// Calculates cosine similarity between two sparse vectors.
///
/// Similarity = (a · b) / (||a|| * ||b||), where terms missing from one side count as zero.
///
/// # Special Cases
///
/// - Empty vectors return 0.0 similarity
/// - Zero-norm vectors return 0.0 similarity (to avoid division by zero)
///
/// With non-negative weights the result lies in `[0, 1]`; it is clamped so rounding
/// can never push an identical pair above `1.0`.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Walk the smaller vector; terms absent from either side add nothing to the dot product.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot_product: f64 = small
        .iter()
        .filter_map(|(term, weight)| large.get(term).map(|other| weight * other))
        .sum();

    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot_product / (norm_a * norm_b)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextVectorizer;

    fn vec_of(text: &str) -> TermVector {
        TextVectorizer::new().vectorize(text)
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec_of("memories are made of this");
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);

        let b = vec_of("a a a b c c");
        assert!((cosine_similarity(&b, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_disjoint() {
        let a = vec_of("apple banana");
        let b = vec_of("car truck");
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_similarity_symmetric() {
        let a = vec_of("the user likes pizza and pasta pasta");
        let b = vec_of("pizza night with the user");
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn test_cosine_similarity_partial_overlap() {
        // 3 of 4 unit-weight terms shared: 3 / (2 * 2)
        let a = vec_of("the user likes pizza");
        let b = vec_of("the user loves pizza");
        assert!((cosine_similarity(&a, &b) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_empty() {
        let empty = vec_of("");
        let a = vec_of("hello world");
        assert_eq!(cosine_similarity(&empty, &a), 0.0);
        assert_eq!(cosine_similarity(&a, &empty), 0.0);
        assert_eq!(cosine_similarity(&empty, &empty), 0.0);
    }
}
