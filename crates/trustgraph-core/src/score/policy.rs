//! Scoring policy: sentiment lexicon, category keywords, and weights

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentiment carried by a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

/// Keyword → polarity mapping used to classify claim text.
///
/// Keywords are matched as lower-case substrings. When a text contains both
/// a positive and a negative keyword the attestation counts as negative:
/// "untrusted" contains "trusted", and must still read as a negative signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Polarity>",
    into = "BTreeMap<String, Polarity>"
)]
pub struct SentimentLexicon {
    keywords: BTreeMap<String, Polarity>,
}

impl SentimentLexicon {
    /// Empty lexicon: classifies nothing.
    pub fn empty() -> Self {
        Self {
            keywords: BTreeMap::new(),
        }
    }

    /// Add or replace a keyword.
    pub fn with(mut self, keyword: impl Into<String>, polarity: Polarity) -> Self {
        self.keywords.insert(keyword.into().to_lowercase(), polarity);
        self
    }

    /// Keywords of the given polarity, in lexical order.
    pub fn keywords(&self, polarity: Polarity) -> impl Iterator<Item = &str> {
        self.keywords
            .iter()
            .filter(move |(_, p)| **p == polarity)
            .map(|(k, _)| k.as_str())
    }

    /// Classify already lower-cased text.
    pub fn classify(&self, lowered: &str) -> Option<Polarity> {
        let mut positive = false;
        for (keyword, polarity) in &self.keywords {
            if lowered.contains(keyword.as_str()) {
                match polarity {
                    Polarity::Negative => return Some(Polarity::Negative),
                    Polarity::Positive => positive = true,
                }
            }
        }
        positive.then_some(Polarity::Positive)
    }
}

impl From<BTreeMap<String, Polarity>> for SentimentLexicon {
    fn from(keywords: BTreeMap<String, Polarity>) -> Self {
        keywords
            .into_iter()
            .fold(Self::empty(), |lexicon, (keyword, polarity)| {
                lexicon.with(keyword, polarity)
            })
    }
}

impl From<SentimentLexicon> for BTreeMap<String, Polarity> {
    fn from(lexicon: SentimentLexicon) -> Self {
        lexicon.keywords
    }
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        let positive = ["expert", "trusted", "verified", "credible", "reliable"];
        let negative = ["scam", "fraud", "untrusted", "suspicious"];

        let mut lexicon = Self::empty();
        for keyword in positive {
            lexicon = lexicon.with(keyword, Polarity::Positive);
        }
        for keyword in negative {
            lexicon = lexicon.with(keyword, Polarity::Negative);
        }
        lexicon
    }
}

/// Predicate keywords selecting the subset each breakdown facet is scored on.
///
/// Facets are independent: one attestation may feed none, one, or several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryKeywords {
    pub credibility: Vec<String>,
    pub expertise: Vec<String>,
    pub reliability: Vec<String>,
}

impl Default for CategoryKeywords {
    fn default() -> Self {
        Self {
            credibility: vec!["credib".into(), "trust".into()],
            expertise: vec!["expert".into(), "skill".into()],
            reliability: vec!["reliab".into(), "verified".into()],
        }
    }
}

/// Complete, injectable scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub lexicon: SentimentLexicon,
    pub categories: CategoryKeywords,
    /// Multiplier applied to negative signals
    pub negative_weight: f64,
    /// Score of a perfectly neutral record
    pub baseline: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            lexicon: SentimentLexicon::default(),
            categories: CategoryKeywords::default(),
            negative_weight: 2.0,
            baseline: 50.0,
        }
    }
}

impl ScoringPolicy {
    /// Parse a policy from JSON. Missing sections fall back to defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_lexicon_keywords() {
        let lexicon = SentimentLexicon::default();
        let positive: Vec<&str> = lexicon.keywords(Polarity::Positive).collect();
        let negative: Vec<&str> = lexicon.keywords(Polarity::Negative).collect();
        assert_eq!(
            positive,
            vec!["credible", "expert", "reliable", "trusted", "verified"]
        );
        assert_eq!(negative, vec!["fraud", "scam", "suspicious", "untrusted"]);
    }

    #[test]
    fn test_classify() {
        let lexicon = SentimentLexicon::default();
        assert_eq!(lexicon.classify("expert-in-defitrue"), Some(Polarity::Positive));
        assert_eq!(lexicon.classify("scam-alertwarning"), Some(Polarity::Negative));
        assert_eq!(lexicon.classify("likescoffee"), None);
    }

    #[test]
    fn test_negative_wins_over_embedded_positive() {
        let lexicon = SentimentLexicon::default();
        assert_eq!(lexicon.classify("isuntrusted"), Some(Polarity::Negative));
        assert_eq!(
            lexicon.classify("verified-expertfraud"),
            Some(Polarity::Negative)
        );
    }

    #[test]
    fn test_custom_lexicon_lowercases_keywords() {
        let lexicon = SentimentLexicon::empty().with("AUDITED", Polarity::Positive);
        assert_eq!(lexicon.classify("audited-by"), Some(Polarity::Positive));
    }

    #[test]
    fn test_policy_from_partial_json() {
        let policy = ScoringPolicy::from_json(
            r#"{"lexicon": {"audited": "positive", "rugpull": "negative"}, "negative_weight": 3.0}"#,
        )
        .unwrap();

        assert_eq!(policy.negative_weight, 3.0);
        assert_eq!(policy.baseline, 50.0);
        assert_eq!(policy.categories, CategoryKeywords::default());
        assert_eq!(policy.lexicon.classify("rugpull"), Some(Polarity::Negative));
        assert_eq!(policy.lexicon.classify("expert"), None);
    }

    #[test]
    fn test_policy_json_keywords_are_case_insensitive() {
        let policy =
            ScoringPolicy::from_json(r#"{"lexicon": {"Audited": "positive", "RUGPULL": "negative"}}"#)
                .unwrap();

        assert_eq!(policy.lexicon.classify("audited-by"), Some(Polarity::Positive));
        assert_eq!(policy.lexicon.classify("rugpull"), Some(Polarity::Negative));
        let positive: Vec<&str> = policy.lexicon.keywords(Polarity::Positive).collect();
        assert_eq!(positive, vec!["audited"]);
    }

    #[test]
    fn test_lexicon_serializes_as_plain_map() {
        let lexicon = SentimentLexicon::empty().with("Audited", Polarity::Positive);
        assert_eq!(
            serde_json::to_value(&lexicon).unwrap(),
            serde_json::json!({ "audited": "positive" })
        );
    }
}
