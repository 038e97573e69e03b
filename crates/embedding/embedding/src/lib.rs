//! # Text Embeddings
//!
//! This crate turns short text into sparse term-frequency vectors and compares them.
//! No model, no network: the same text always yields the same vector.
//!
//! ## Modules
//!
//! - [`vectorizer`] - [`TextVectorizer`], [`TermVector`], [`tokenize`]
//! - [`similarity`] - [`cosine_similarity`]
//!
//! ## Example
//!
//! ```rust
//! use embedding::{cosine_similarity, TextVectorizer};
//!
//! let vectorizer = TextVectorizer::new();
//! let a = vectorizer.vectorize("the user likes pizza");
//! let b = vectorizer.vectorize("the user loves pizza");
//!
//! let score = cosine_similarity(&a, &b);
//! assert!((score - 0.75).abs() < 1e-9);
//! ```

pub mod similarity;
pub mod vectorizer;

pub use similarity::cosine_similarity;
pub use vectorizer::{tokenize, TermVector, TextVectorizer};
