//! Core data model for lensbot: labeled utterances and corpus loading.

pub mod corpus;
mod error;

pub use corpus::{Corpus, Utterance};
pub use error::CorpusError;
