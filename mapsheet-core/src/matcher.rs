//! Field name similarity and candidate ranking.
//!
//! Scoring is a cascade: the first rule that applies decides the score.
//!
//! | Rule            | Condition                                   | Score                         |
//! |-----------------|---------------------------------------------|-------------------------------|
//! | `exact`         | equal ignoring case                         | 1.0                           |
//! | `normalized`    | equal after separator/plural normalization  | 0.9                           |
//! | `substring`     | one normalized name contains the other (≥3) | 0.6 + 0.1 × shorter / longer  |
//! | `token_overlap` | the token sets intersect                    | 0.7 × Jaccard                 |
//! | `edit_distance` | anything else                               | 1 − levenshtein / max length  |

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

/// Minimum length of the shorter normalized name for a substring hit
const MIN_SUBSTRING_LEN: usize = 3;

/// Short words that look plural (or are irregular forms to the inflector)
/// but carry their own meaning in field names; kept as written.
const SINGULAR_STOP_WORDS: &[&str] = &[
    "as", "is", "us", "vs", "os", "ss", "has", "was", "does", "yes", "bus", "gas", "plus",
    "are", "were", "have", "this", "these", "that", "those", "he", "she", "we", "me",
    "they", "them",
];

/// Which scoring rule produced a candidate's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Names equal after case folding
    Exact,
    /// Names equal after dropping separators and singularizing tokens
    Normalized,
    /// One normalized name contains the other
    Substring,
    /// Jaccard overlap of singular tokens
    TokenOverlap,
    /// Normalized Levenshtein similarity
    EditDistance,
}

impl std::fmt::Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchRule::Exact => "exact name",
            MatchRule::Normalized => "normalized name",
            MatchRule::Substring => "name substring",
            MatchRule::TokenOverlap => "shared name tokens",
            MatchRule::EditDistance => "edit distance",
        };
        f.write_str(name)
    }
}

/// A scored target field name.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Target field name as declared
    pub target_name: String,
    /// Position of the target in the ranked name list
    pub position: usize,
    /// Name score in `[0, 1]`
    pub score: f64,
    /// Rule that produced `score`
    pub rule: MatchRule,
}

/// Precomputed comparison forms of a field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameKey {
    original: String,
    folded: String,
    normalized: String,
    tokens: BTreeSet<String>,
}

impl NameKey {
    /// Builds the comparison forms of `name`.
    pub fn new(name: &str) -> Self {
        let tokens: Vec<String> = tokenize(name).into_iter().map(singularize).collect();
        Self {
            original: name.to_string(),
            folded: name.to_lowercase(),
            normalized: tokens.concat(),
            tokens: tokens.into_iter().collect(),
        }
    }

    /// The name as written in the schema.
    pub fn name(&self) -> &str {
        &self.original
    }

    /// Separator-free, singularized, lowercase form.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// Splits a field name on separators and camel-case boundaries.
///
/// `"CustomerID"`, `"customer_id"` and `"Customer-Id"` all yield
/// `["customer", "id"]`; `"HTTPStatus2"` yields `["http", "status", "2"]`.
pub fn tokenize(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush(&mut current, &mut tokens);
            continue;
        }
        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next = chars.get(i + 1).copied();
            let boundary = (c.is_uppercase() && (prev.is_lowercase() || prev.is_numeric()))
                || (c.is_uppercase()
                    && prev.is_uppercase()
                    && next.is_some_and(char::is_lowercase))
                || (c.is_numeric() && prev.is_alphabetic())
                || (c.is_alphabetic() && prev.is_numeric());
            if boundary {
                flush(&mut current, &mut tokens);
            }
        }
        current.extend(c.to_lowercase());
    }
    flush(&mut current, &mut tokens);

    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

/// Singular form of an alphabetic token. Single letters, tokens with digits
/// and stop words are returned unchanged.
fn singularize(token: String) -> String {
    if token.chars().count() < 2
        || !token.chars().all(char::is_alphabetic)
        || SINGULAR_STOP_WORDS.contains(&token.as_str())
    {
        return token;
    }
    pluralizer::pluralize(&token, 1, false)
}

/// Scores two prepared names and reports the rule that decided the score.
pub fn score_keys(source: &NameKey, target: &NameKey) -> (f64, MatchRule) {
    if source.folded == target.folded {
        return (1.0, MatchRule::Exact);
    }
    if !source.normalized.is_empty() && source.normalized == target.normalized {
        return (0.9, MatchRule::Normalized);
    }

    let (shorter, longer) = if source.normalized.len() <= target.normalized.len() {
        (&source.normalized, &target.normalized)
    } else {
        (&target.normalized, &source.normalized)
    };
    let shorter_len = shorter.chars().count();
    let longer_len = longer.chars().count();
    if shorter_len >= MIN_SUBSTRING_LEN && longer.contains(shorter.as_str()) {
        return (
            0.6 + 0.1 * (shorter_len as f64 / longer_len as f64),
            MatchRule::Substring,
        );
    }

    let shared = source.tokens.intersection(&target.tokens).count();
    if shared > 0 {
        let union = source.tokens.union(&target.tokens).count();
        return (0.7 * (shared as f64 / union as f64), MatchRule::TokenOverlap);
    }

    if longer_len == 0 {
        return (0.0, MatchRule::EditDistance);
    }
    let distance = levenshtein(&source.normalized, &target.normalized);
    let similarity = 1.0 - distance as f64 / longer_len as f64;
    (similarity.max(0.0), MatchRule::EditDistance)
}

/// Similarity of two field names in `[0, 1]`.
///
/// # Example
/// ```rust
/// use mapsheet_core::matcher::name_score;
///
/// assert_eq!(name_score("CustomerID", "customerid"), 1.0);
/// assert_eq!(name_score("CustomerID", "customer_id"), 0.9);
/// assert!(name_score("Notes", "IsActive") < 0.5);
/// ```
pub fn name_score(source: &str, target: &str) -> f64 {
    score_keys(&NameKey::new(source), &NameKey::new(target)).0
}

/// Target names prepared once and ranked against many source names.
#[derive(Debug, Clone)]
pub struct TargetIndex {
    keys: Vec<NameKey>,
}

impl TargetIndex {
    /// Indexes target names, keeping their order.
    pub fn new<S: AsRef<str>>(target_names: &[S]) -> Self {
        Self {
            keys: target_names.iter().map(|n| NameKey::new(n.as_ref())).collect(),
        }
    }

    /// Ranks every target not in `taken` against `source_name`.
    ///
    /// Sorted by score descending; equal scores keep target order.
    pub fn best_candidates(&self, source_name: &str, taken: &BTreeSet<String>) -> Vec<Candidate> {
        let source = NameKey::new(source_name);
        let mut candidates: Vec<Candidate> = self
            .keys
            .iter()
            .enumerate()
            .filter(|(_, key)| !taken.contains(key.name()))
            .map(|(position, key)| {
                let (score, rule) = score_keys(&source, key);
                Candidate {
                    target_name: key.name().to_string(),
                    position,
                    score,
                    rule,
                }
            })
            .collect();

        // sort_by is stable
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates
    }
}

/// Ranks `target_names` against `source_name`, skipping names in `taken`.
///
/// `taken` holds target names exactly as they appear in `target_names`.
pub fn best_candidates<S: AsRef<str>>(
    source_name: &str,
    target_names: &[S],
    taken: &BTreeSet<String>,
) -> Vec<Candidate> {
    TargetIndex::new(target_names).best_candidates(source_name, taken)
}
