//! Nearest-label intent classification.
//!
//! A [`Model`] is built once from a corpus and then serves read-only
//! `predict` calls. Two strategies exist and are never blended:
//!
//! - [`Strategy::Embedding`]: every corpus utterance is encoded once through
//!   a [`TextEncoder`]; a query is scored by cosine similarity against each
//!   stored vector, and a best match scoring below the threshold falls back
//!   to [`UNKNOWN_INTENT`].
//! - [`Strategy::Linear`]: TF-IDF weighted term vectors with one unit-norm
//!   centroid per label; a query takes the argmax label and there is no
//!   unknown fallback.

use std::sync::Arc;

use tracing::info;

use lensbot_core::Corpus;

use crate::encoder::{TextEncoder, cosine_sim, normalize};
use crate::error::{BuildError, PredictError};
use crate::tfidf::TfIdfVectorizer;

/// Intent returned when no corpus example is similar enough to the query.
pub const UNKNOWN_INTENT: &str = "unknown";

/// Default similarity threshold for the embedding strategy.
pub const DEFAULT_THRESHOLD: f32 = 0.6;

/// Classification strategy, fixed at build time.
#[derive(Clone)]
pub enum Strategy {
    /// Sentence embeddings + cosine similarity. A best match scoring below
    /// `threshold` yields [`UNKNOWN_INTENT`]; a score exactly at the
    /// threshold is accepted.
    Embedding {
        encoder: Arc<dyn TextEncoder>,
        threshold: f32,
    },
    /// TF-IDF label centroids. The argmax label always wins; this strategy
    /// never yields [`UNKNOWN_INTENT`].
    Linear,
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedding { threshold, .. } => f
                .debug_struct("Embedding")
                .field("threshold", threshold)
                .finish_non_exhaustive(),
            Self::Linear => write!(f, "Linear"),
        }
    }
}

/// A classification outcome: the chosen intent and its confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub intent: String,
    /// Cosine similarity of the winning match: 1.0 for an exact repeat of a
    /// corpus utterance, 0.0 for a query sharing nothing with the corpus.
    pub score: f32,
}

/// A built intent model. Immutable; `predict` is read-only and shareable
/// across threads.
pub enum Model {
    Embedding(EmbeddingModel),
    Linear(LinearModel),
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedding(_) => f.write_str("Model::Embedding"),
            Self::Linear(_) => f.write_str("Model::Linear"),
        }
    }
}

impl Model {
    /// Build a model from a corpus with the given strategy.
    ///
    /// Fails on an empty corpus, on an utterance with a blank text or
    /// label, or when the encoder rejects a corpus text.
    pub fn build(corpus: &Corpus, strategy: Strategy) -> Result<Self, BuildError> {
        validate(corpus)?;
        match strategy {
            Strategy::Embedding { encoder, threshold } => Ok(Self::Embedding(
                EmbeddingModel::build(corpus, encoder, threshold)?,
            )),
            Strategy::Linear => Ok(Self::Linear(LinearModel::build(corpus))),
        }
    }

    /// Classify a query. Empty or all-whitespace input is rejected without
    /// touching the model.
    pub fn predict(&self, query: &str) -> Result<Prediction, PredictError> {
        match self {
            Self::Embedding(model) => model.predict(query),
            Self::Linear(model) => model.predict(query),
        }
    }
}

/// Per-example vectors with a nearest-example decision rule.
pub struct EmbeddingModel {
    encoder: Arc<dyn TextEncoder>,
    /// (label, unit-norm vector) in corpus order.
    examples: Vec<(String, Vec<f32>)>,
    threshold: f32,
}

impl EmbeddingModel {
    fn build(
        corpus: &Corpus,
        encoder: Arc<dyn TextEncoder>,
        threshold: f32,
    ) -> Result<Self, BuildError> {
        let texts: Vec<&str> = corpus.iter().map(|u| u.text.as_str()).collect();
        let vectors = encoder.encode_batch(&texts).map_err(BuildError::Encode)?;

        let examples: Vec<(String, Vec<f32>)> = corpus
            .iter()
            .zip(vectors)
            .map(|(utterance, vector)| (utterance.label.clone(), vector))
            .collect();

        info!(
            examples = examples.len(),
            dim = encoder.dim(),
            threshold,
            "built embedding intent model"
        );
        Ok(Self {
            encoder,
            examples,
            threshold,
        })
    }

    fn predict(&self, query: &str) -> Result<Prediction, PredictError> {
        let query = non_empty(query)?;
        let vector = self.encoder.encode(query).map_err(PredictError::Encode)?;

        // Strictly-greater scan: the first example in corpus order wins ties.
        let mut best_label = UNKNOWN_INTENT;
        let mut best_score = f32::NEG_INFINITY;
        for (label, example) in &self.examples {
            let sim = cosine_sim(&vector, example);
            if sim > best_score {
                best_score = sim;
                best_label = label;
            }
        }

        let intent = if best_score < self.threshold {
            UNKNOWN_INTENT
        } else {
            best_label
        };
        Ok(Prediction {
            intent: intent.to_string(),
            score: best_score,
        })
    }
}

/// TF-IDF label centroids with an argmax decision rule.
pub struct LinearModel {
    vectorizer: TfIdfVectorizer,
    /// (label, unit-norm centroid) in label-first-appearance order, so ties
    /// never depend on hash iteration order.
    centroids: Vec<(String, Vec<f32>)>,
}

impl LinearModel {
    fn build(corpus: &Corpus) -> Self {
        let texts: Vec<&str> = corpus.iter().map(|u| u.text.as_str()).collect();
        let vectorizer = TfIdfVectorizer::fit(&texts);

        // Accumulate per-label sums in first-appearance order.
        let mut accum: Vec<(String, Vec<f32>, usize)> = Vec::new();
        for utterance in corpus.iter() {
            let vector = vectorizer.transform(&utterance.text);
            match accum.iter_mut().find(|(label, _, _)| *label == utterance.label) {
                Some((_, sum, count)) => {
                    for (acc, v) in sum.iter_mut().zip(&vector) {
                        *acc += v;
                    }
                    *count += 1;
                }
                None => accum.push((utterance.label.clone(), vector, 1)),
            }
        }

        let centroids: Vec<(String, Vec<f32>)> = accum
            .into_iter()
            .map(|(label, mut sum, count)| {
                for v in &mut sum {
                    *v /= count as f32;
                }
                normalize(&mut sum);
                (label, sum)
            })
            .collect();

        info!(
            labels = centroids.len(),
            vocabulary = vectorizer.vocabulary_size(),
            "built linear intent model"
        );
        Self {
            vectorizer,
            centroids,
        }
    }

    fn predict(&self, query: &str) -> Result<Prediction, PredictError> {
        let query = non_empty(query)?;
        let mut vector = self.vectorizer.transform(query);
        normalize(&mut vector);

        let mut best_label = "";
        let mut best_score = f32::NEG_INFINITY;
        for (label, centroid) in &self.centroids {
            let sim = cosine_sim(&vector, centroid);
            if sim > best_score {
                best_score = sim;
                best_label = label;
            }
        }

        Ok(Prediction {
            intent: best_label.to_string(),
            score: best_score,
        })
    }
}

fn validate(corpus: &Corpus) -> Result<(), BuildError> {
    if corpus.is_empty() {
        return Err(BuildError::EmptyCorpus);
    }
    for (index, utterance) in corpus.iter().enumerate() {
        if utterance.text.trim().is_empty() {
            return Err(BuildError::BlankField {
                index,
                field: "text",
            });
        }
        if utterance.label.trim().is_empty() {
            return Err(BuildError::BlankField {
                index,
                field: "label",
            });
        }
    }
    Ok(())
}

fn non_empty(query: &str) -> Result<&str, PredictError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(PredictError::EmptyQuery);
    }
    Ok(trimmed)
}
