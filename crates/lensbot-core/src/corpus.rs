//! Labeled utterance corpus: the training data for intent classification.
//!
//! A corpus is an ordered list of (text, label) pairs. Order is load order
//! and doubles as the tie-break order at prediction time, so loading
//! preserves it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CorpusError;

/// One labeled example: a customer utterance and its intent label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub label: String,
}

impl Utterance {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Ordered set of labeled utterances, immutable after load.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    utterances: Vec<Utterance>,
}

impl Corpus {
    pub fn new(utterances: Vec<Utterance>) -> Self {
        Self { utterances }
    }

    /// Load from `text,label` lines.
    ///
    /// Each line splits on its **last** comma so the utterance text may
    /// itself contain commas. Lines that do not yield a non-empty text and
    /// a non-empty label are skipped with a warning; an unreadable file or
    /// a file with no usable line at all is an error.
    pub fn from_csv_path(path: &Path) -> Result<Self, CorpusError> {
        let content = fs::read_to_string(path)?;
        Self::from_csv_str(&content)
    }

    /// Parse `text,label` lines from an in-memory string. Same semantics as
    /// [`Corpus::from_csv_path`].
    pub fn from_csv_str(content: &str) -> Result<Self, CorpusError> {
        let mut utterances = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(utterance) => utterances.push(utterance),
                None => warn!(line = lineno + 1, "skipping malformed corpus line"),
            }
        }
        if utterances.is_empty() {
            return Err(CorpusError::Empty);
        }
        Ok(Self { utterances })
    }

    /// Load from a JSON array of `{"text": …, "label": …}` records.
    pub fn from_json_path(path: &Path) -> Result<Self, CorpusError> {
        let content = fs::read_to_string(path)?;
        let utterances: Vec<Utterance> = serde_json::from_str(&content)?;
        if utterances.is_empty() {
            return Err(CorpusError::Empty);
        }
        Ok(Self { utterances })
    }

    pub fn utterances(&self) -> &[Utterance] {
        &self.utterances
    }

    pub fn iter(&self) -> impl Iterator<Item = &Utterance> {
        self.utterances.iter()
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    /// Distinct labels with example counts, in first-appearance order.
    pub fn label_counts(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for utterance in &self.utterances {
            match counts.iter_mut().find(|(label, _)| *label == utterance.label) {
                Some((_, n)) => *n += 1,
                None => counts.push((&utterance.label, 1)),
            }
        }
        counts
    }
}

/// Split a line on its last comma into a (text, label) pair.
///
/// Returns `None` when either side trims down to nothing.
fn parse_line(line: &str) -> Option<Utterance> {
    let (text, label) = line.rsplit_once(',')?;
    let text = text.trim();
    let label = label.trim();
    if text.is_empty() || label.is_empty() {
        return None;
    }
    Some(Utterance::new(text, label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_simple_lines() {
        let corpus = Corpus::from_csv_str(
            "Can I rent for 10 days,rental_policy\nWhat if I damage the camera?,faq_damage\n",
        )
        .unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.utterances()[0].text, "Can I rent for 10 days");
        assert_eq!(corpus.utterances()[0].label, "rental_policy");
        assert_eq!(corpus.utterances()[1].label, "faq_damage");
    }

    #[test]
    fn splits_on_last_comma_only() {
        let corpus =
            Corpus::from_csv_str("I need gear for low light, indoor events,gear_suggestion")
                .unwrap();

        assert_eq!(corpus.len(), 1);
        assert_eq!(
            corpus.utterances()[0].text,
            "I need gear for low light, indoor events"
        );
        assert_eq!(corpus.utterances()[0].label, "gear_suggestion");
    }

    #[test]
    fn skips_malformed_lines() {
        let corpus = Corpus::from_csv_str(
            "no comma in this line\nCan I rent for 10 days,rental_policy\n,blank_text\nblank label,\n",
        )
        .unwrap();

        // Only the well-formed line survives.
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.utterances()[0].label, "rental_policy");
    }

    #[test]
    fn ignores_blank_lines() {
        let corpus = Corpus::from_csv_str("\n\na,b\n\n").unwrap();
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            Corpus::from_csv_str(""),
            Err(CorpusError::Empty)
        ));
        assert!(matches!(
            Corpus::from_csv_str("only malformed\nlines here\n"),
            Err(CorpusError::Empty)
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Tell me about IPL,unrelated").unwrap();
        writeln!(file, "Can I extend my rental by a week,rental_policy").unwrap();

        let corpus = Corpus::from_csv_path(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Corpus::from_csv_path(Path::new("/nonexistent/intents.csv")).unwrap_err();
        assert!(matches!(err, CorpusError::Io(_)));
    }

    #[test]
    fn loads_json_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"text": "Can I rent for 10 days", "label": "rental_policy"}}]"#
        )
        .unwrap();

        let corpus = Corpus::from_json_path(file.path()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.utterances()[0].label, "rental_policy");
    }

    #[test]
    fn empty_json_array_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        assert!(matches!(
            Corpus::from_json_path(file.path()),
            Err(CorpusError::Empty)
        ));
    }

    #[test]
    fn label_counts_in_first_appearance_order() {
        let corpus = Corpus::from_csv_str(
            "a,gear_suggestion\nb,rental_policy\nc,gear_suggestion\nd,unrelated\n",
        )
        .unwrap();

        assert_eq!(
            corpus.label_counts(),
            vec![("gear_suggestion", 2), ("rental_policy", 1), ("unrelated", 1)]
        );
    }

    #[test]
    fn duplicate_texts_are_kept() {
        let corpus = Corpus::from_csv_str("same text,a\nsame text,b\n").unwrap();
        assert_eq!(corpus.len(), 2);
    }
}
