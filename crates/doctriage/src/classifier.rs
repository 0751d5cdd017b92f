use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::categories::CategoryStore;
use crate::error::ClassifierError;

static RE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").unwrap());

/// Keyword-scoring text classifier.
///
/// The model is the per-category keyword profile captured at training
/// time. Construction goes through [`Classifier::train`], which refuses
/// an empty training set — `predict` is therefore only ever reachable on
/// a validated model, and at call time it is failure-tolerant: anything
/// it cannot score comes back as `None` ("unknown"), never an error.
pub struct Classifier {
    profiles: BTreeMap<String, Vec<String>>,
}

impl Classifier {
    /// Builds a classifier from the category keyword sets. Fails fast if
    /// no category carries any keyword; a model with nothing to score on
    /// must not be invoked for prediction.
    pub fn train(store: &CategoryStore) -> Result<Self, ClassifierError> {
        let profiles: BTreeMap<String, Vec<String>> = store
            .iter()
            .filter(|(_, keywords)| !keywords.is_empty())
            .map(|(name, keywords)| {
                (
                    name.clone(),
                    keywords.iter().map(|k| k.to_lowercase()).collect(),
                )
            })
            .collect();

        if profiles.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }

        Ok(Self { profiles })
    }

    /// Predicts a label for `text`, or `None` when nothing matches.
    ///
    /// Text is lower-cased and tokenized; non-alphanumeric characters are
    /// discarded. Each category scores one point per token matching one
    /// of its keywords; the highest positive score wins, ties broken by
    /// name order so the result is deterministic.
    pub fn predict(&self, text: &str) -> Option<String> {
        if text.is_empty() {
            return None;
        }

        let lowered = text.to_lowercase();
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for token in RE_TOKEN.find_iter(&lowered) {
            *counts.entry(token.as_str()).or_default() += 1;
        }
        if counts.is_empty() {
            return None;
        }

        let mut best: Option<(&String, usize)> = None;
        for (name, keywords) in &self.profiles {
            let score: usize = keywords
                .iter()
                .map(|k| counts.get(k.as_str()).copied().unwrap_or(0))
                .sum();
            if score > 0 {
                let beats = match best {
                    Some((_, best_score)) => score > best_score,
                    None => true,
                };
                if beats {
                    best = Some((name, score));
                }
            }
        }

        best.map(|(name, _)| name.clone())
    }
}
