// Text relevance scoring for the in-memory store
// Author: Gabriel Demetrios Lafis

use crate::data::Record;

/// Split text into lowercase alphanumeric terms
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Fields of a record that participate in full-text search
#[derive(Debug, Clone, Default)]
pub struct TextIndex {
    fields: Vec<String>,
}

impl TextIndex {
    pub fn new(fields: Vec<String>) -> Self {
        TextIndex { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Relevance of a record for a search term.
    ///
    /// Each query term contributes the number of indexed terms equal to it;
    /// zero means no match.
    pub fn score(&self, record: &Record, term: &str) -> f64 {
        let query = tokenize(term);
        if query.is_empty() {
            return 0.0;
        }

        let mut fragments = Vec::new();
        for field in &self.fields {
            if let Some(value) = record.get(field) {
                value.collect_text(&mut fragments);
            }
        }

        let indexed: Vec<String> = fragments.iter().flat_map(|f| tokenize(f)).collect();

        query
            .iter()
            .map(|q| indexed.iter().filter(|t| *t == q).count() as f64)
            .sum()
    }
}
