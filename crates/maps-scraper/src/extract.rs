//! Record extraction: turns the visible text of the game search screen
//! into map listings.

use crate::classify::{Classifier, LineKind};
use serde::Serialize;

/// One map listing reconstructed from page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Title line, verbatim.
    pub name: String,
    /// First identifier line seen while this record was open.
    pub id: Option<String>,
    /// First player-count line seen while this record was open.
    pub players: Option<String>,
}

impl Record {
    fn open(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: None,
            players: None,
        }
    }
}

/// Split raw page text into trimmed, non-empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Extracts records with a fixed classifier.
pub struct Extractor {
    classifier: Classifier,
}

impl Extractor {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    /// Walk `lines` once, keeping a single open record.
    ///
    /// A title line closes the open record (if any) and opens a new one.
    /// Identifier and player-count lines fill the open record's field only
    /// while it is unset; with no open record they are dropped. Whatever is
    /// still open at the end is emitted last. There is no cap here.
    pub fn extract<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Record> {
        let mut records = Vec::new();
        let mut current: Option<Record> = None;

        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            match self.classifier.classify(line) {
                Some(LineKind::Title) => {
                    if let Some(done) = current.replace(Record::open(line)) {
                        records.push(done);
                    }
                }
                Some(LineKind::Identifier) => {
                    if let Some(rec) = current.as_mut() {
                        rec.id.get_or_insert_with(|| line.to_string());
                    }
                }
                Some(LineKind::Players) => {
                    if let Some(rec) = current.as_mut() {
                        rec.players.get_or_insert_with(|| line.to_string());
                    }
                }
                None => {}
            }
        }

        records.extend(current);
        records
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(Classifier::new())
    }
}

/// Extract with the built-in keyword set.
pub fn extract<S: AsRef<str>>(lines: &[S]) -> Vec<Record> {
    Extractor::default().extract(lines)
}
