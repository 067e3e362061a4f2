use thiserror::Error;

/// Failures while building a model from a corpus.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("corpus contains no examples")]
    EmptyCorpus,

    #[error("corpus example {index} has an empty {field}")]
    BlankField { index: usize, field: &'static str },

    #[error("encoding corpus: {0}")]
    Encode(anyhow::Error),
}

/// Failures while classifying a query.
///
/// A low-confidence query is not an error: it is a successful prediction of
/// the unknown intent.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("encoding query: {0}")]
    Encode(anyhow::Error),
}
