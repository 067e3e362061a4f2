//! Intent classification over a labeled utterance corpus.
//!
//! Two strategies, chosen explicitly at build time: sentence embeddings with
//! cosine similarity and an unknown-intent threshold, or TF-IDF label
//! centroids with plain argmax.

pub mod classifier;
pub mod encoder;
mod error;
pub mod tfidf;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxEncoder;

pub use classifier::{DEFAULT_THRESHOLD, Model, Prediction, Strategy, UNKNOWN_INTENT};
pub use encoder::TextEncoder;
pub use error::{BuildError, PredictError};
