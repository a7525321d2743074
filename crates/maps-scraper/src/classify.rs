//! Line classification for scraped page text.
//!
//! Each rule pairs a [`LineKind`] with a predicate. Rules are evaluated
//! top to bottom and the first match wins, so precedence is the order of
//! the rule list and nothing else.

use std::fmt;

/// Map-type keywords that mark the start of a listing. Matched against the
/// upper-cased line.
pub const TITLE_KEYWORDS: &[&str] = &[
    "СВІТОВ",
    "АПОКАЛІПСИС",
    "ТОЧКА",
    "БЕЗ ОБМЕЖЕНЬ",
    "СТРІМ",
    "НАЙНОВІШ",
    "ГАРЯЧ",
];

/// What a single line of page text contributes to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Opens a new record; the line becomes its name.
    Title,
    /// Game identifier (`#12345`, `ID: 12345`).
    Identifier,
    /// Player count (`14/40`).
    Players,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Identifier => f.write_str("identifier"),
            Self::Players => f.write_str("players"),
        }
    }
}

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

struct Rule {
    kind: LineKind,
    matches: Predicate,
}

/// Ordered rule list: title, then identifier, then player count.
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    /// Classifier with the built-in title keywords.
    pub fn new() -> Self {
        Self::with_title_keywords(TITLE_KEYWORDS.iter().map(|k| k.to_string()))
    }

    /// Classifier with a custom title keyword set. Keywords are upper-cased
    /// once here so matching stays a plain substring test.
    pub fn with_title_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.into().to_uppercase())
            .filter(|k| !k.is_empty())
            .collect();

        let rules = vec![
            Rule {
                kind: LineKind::Title,
                matches: Box::new(move |line: &str| {
                    let upper = line.to_uppercase();
                    keywords.iter().any(|k| upper.contains(k.as_str()))
                }),
            },
            Rule {
                kind: LineKind::Identifier,
                matches: Box::new(is_identifier),
            },
            Rule {
                kind: LineKind::Players,
                matches: Box::new(is_player_count),
            },
        ];

        Self { rules }
    }

    /// Classify a trimmed, non-empty line. `None` means the line is ignored.
    pub fn classify(&self, line: &str) -> Option<LineKind> {
        self.rules
            .iter()
            .find(|rule| (rule.matches)(line))
            .map(|rule| rule.kind)
    }

    /// Rule kinds in evaluation order.
    pub fn precedence(&self) -> Vec<LineKind> {
        self.rules.iter().map(|r| r.kind).collect()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

fn is_identifier(line: &str) -> bool {
    line.contains('#') || line.to_uppercase().contains("ID")
}

fn is_player_count(line: &str) -> bool {
    line.contains('/') && line.chars().any(|c| c.is_ascii_digit())
}
