//! Tokenization and term-frequency vectors.
//!
//! A [`TermVector`] maps each token to its count divided by the highest count in the
//! same text, so the most frequent token always weighs `1.0`. Keys are kept in a
//! `BTreeMap` so iteration (and therefore every float sum built on it) is ordered.

use std::collections::BTreeMap;

/// Splits text into lowercase tokens.
///
/// Characters that are neither word characters (Unicode alphanumerics or `_`) nor
/// whitespace are removed before splitting, so `"don't"` becomes `"dont"` and
/// `"a-b"` becomes `"ab"`.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Sparse term-frequency vector normalized by the maximum term count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: BTreeMap<String, f64>,
}

impl TermVector {
    /// Returns the weight of `term`, or `None` when the term does not occur.
    pub fn get(&self, term: &str) -> Option<f64> {
        self.weights.get(term).copied()
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterates `(term, weight)` pairs in term order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(term, weight)| (term.as_str(), *weight))
    }

    /// Euclidean norm of the vector.
    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }
}

impl FromIterator<(String, f64)> for TermVector {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}

/// Builds [`TermVector`]s from text.
///
/// Stateless; kept as a type so callers can hold one next to the data it vectorizes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextVectorizer;

impl TextVectorizer {
    pub fn new() -> Self {
        Self
    }

    /// Lowercase tokens of `text`; see [`tokenize`].
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize(text)
    }

    /// Counts token frequency and divides every count by the maximum count.
    ///
    /// Text without tokens (empty, whitespace, punctuation only) yields an empty vector.
    pub fn vectorize(&self, text: &str) -> TermVector {
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for token in tokenize(text) {
            *counts.entry(token).or_insert(0) += 1;
        }

        let max = match counts.values().max() {
            Some(&max) => f64::from(max),
            None => return TermVector::default(),
        };

        counts
            .into_iter()
            .map(|(term, count)| (term, f64::from(count) / max))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("Hello, World! It's  me_again"),
            vec!["hello", "world", "its", "me_again"]
        );
    }

    #[test]
    fn test_tokenize_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n ").is_empty());
        assert!(tokenize("?!... ---").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_non_ascii_letters() {
        assert_eq!(tokenize("Café 北京"), vec!["café", "北京"]);
    }

    #[test]
    fn test_vectorize_normalizes_by_max_count() {
        let vector = TextVectorizer::new().vectorize("pizza pizza pasta PIZZA salad");

        assert_eq!(vector.len(), 3);
        assert_eq!(vector.get("pizza"), Some(1.0));
        assert!((vector.get("pasta").unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert!((vector.get("salad").unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(vector.get("pepperoni"), None);
    }

    #[test]
    fn test_vectorize_single_occurrences_all_weigh_one() {
        let vector = TextVectorizer::new().vectorize("apple banana cherry");
        assert!(vector.iter().all(|(_, w)| w == 1.0));
    }

    #[test]
    fn test_vectorize_without_tokens_is_empty() {
        let vectorizer = TextVectorizer::new();
        assert!(vectorizer.vectorize("").is_empty());
        assert!(vectorizer.vectorize("    ").is_empty());
        assert_eq!(vectorizer.vectorize("").norm(), 0.0);
    }

    #[test]
    fn test_vectorize_is_deterministic() {
        let vectorizer = TextVectorizer::new();
        let text = "the quick brown fox jumps over the lazy dog";
        assert_eq!(vectorizer.vectorize(text), vectorizer.vectorize(text));
    }
}
