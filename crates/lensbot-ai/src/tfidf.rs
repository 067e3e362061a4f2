//! TF-IDF vectorizer for the linear classification strategy.

use std::collections::{HashMap, HashSet};

use unicode_segmentation::UnicodeSegmentation;

/// Term-frequency / inverse-document-frequency vectorizer.
///
/// Fit once on the corpus texts; transforms any text into a fixed-length
/// weighted term vector over the fitted vocabulary.
#[derive(Clone)]
pub struct TfIdfVectorizer {
    /// Vocabulary: token → index, assigned in first-appearance order.
    vocabulary: HashMap<String, usize>,
    /// Smoothed inverse document frequency per vocabulary index.
    idf: Vec<f32>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Fit vocabulary and IDF weights on the training texts.
    pub fn fit(texts: &[&str]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for text in texts {
            let mut seen: HashSet<String> = HashSet::new();
            for token in tokenize(text) {
                if !seen.insert(token.clone()) {
                    continue;
                }
                match vocabulary.get(&token) {
                    Some(&idx) => document_frequency[idx] += 1,
                    None => {
                        let idx = vocabulary.len();
                        vocabulary.insert(token, idx);
                        document_frequency.push(1);
                    }
                }
            }
        }

        // IDF = ln((N + 1) / (df + 1)) + 1
        let n = texts.len() as f32;
        let idf = document_frequency
            .iter()
            .map(|&df| ((n + 1.0) / (df as f32 + 1.0)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    /// Transform a text into a TF-IDF vector over the fitted vocabulary.
    ///
    /// Out-of-vocabulary tokens are ignored; a text with no known token
    /// maps to the zero vector.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut tf = vec![0.0f32; self.vocabulary.len()];
        let mut n_tokens = 0usize;

        for token in tokenize(text) {
            n_tokens += 1;
            if let Some(&idx) = self.vocabulary.get(&token) {
                tf[idx] += 1.0;
            }
        }

        // Normalize by token count, then apply IDF.
        if n_tokens > 0 {
            let len = n_tokens as f32;
            for weight in &mut tf {
                *weight /= len;
            }
        }
        for (weight, idf) in tf.iter_mut().zip(&self.idf) {
            *weight *= idf;
        }

        tf
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Lowercased Unicode word tokens.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.unicode_words().map(|w| w.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_builds_vocabulary() {
        let vectorizer = TfIdfVectorizer::fit(&[
            "can I rent for 10 days",
            "what if I damage the camera",
            "tell me about IPL",
        ]);
        assert!(vectorizer.vocabulary_size() > 0);

        let features = vectorizer.transform("can I damage IPL");
        assert_eq!(features.len(), vectorizer.vocabulary_size());
    }

    #[test]
    fn transform_is_deterministic() {
        let vectorizer = TfIdfVectorizer::fit(&["rent a camera", "damage policy"]);
        assert_eq!(
            vectorizer.transform("rent the camera"),
            vectorizer.transform("rent the camera")
        );
    }

    #[test]
    fn unseen_tokens_map_to_zero_vector() {
        let vectorizer = TfIdfVectorizer::fit(&["rent a camera"]);
        let features = vectorizer.transform("zzz qqq");
        assert!(features.iter().all(|&w| w == 0.0));
    }

    #[test]
    fn rare_terms_outweigh_common_ones() {
        let vectorizer = TfIdfVectorizer::fit(&[
            "the camera broke",
            "the lens broke",
            "the telephoto zoom",
        ]);

        // "telephoto" appears in one document, "the" in all three.
        let features = vectorizer.transform("the telephoto");
        let idx_of = |token: &str| vectorizer.vocabulary[token];
        assert!(features[idx_of("telephoto")] > features[idx_of("the")]);
    }

    #[test]
    fn tokenization_is_case_insensitive() {
        let vectorizer = TfIdfVectorizer::fit(&["Camera Rental"]);
        assert_eq!(
            vectorizer.transform("CAMERA rental"),
            vectorizer.transform("camera RENTAL")
        );
    }
}
