//! Extraction rules: (subject path, object path) pairs.
//!
//! Raw rules come from a per-document locator learner; generalized rules are
//! the same type, produced by folding a cluster of raw rules together.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PathResult, WrapError, WrapResult};
use crate::path::{PathExpr, Shape};

/// A pair of path expressions locating a subject and an object in one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractionRule {
    subject: PathExpr,
    object: PathExpr,
}

/// An extraction rule produced by generalizing a cluster.
pub type GeneralizedRule = ExtractionRule;

impl ExtractionRule {
    pub fn new(subject: PathExpr, object: PathExpr) -> Self {
        Self { subject, object }
    }

    /// Parse both path-expression strings.
    pub fn parse(subject: &str, object: &str) -> PathResult<Self> {
        Ok(Self::new(PathExpr::parse(subject)?, PathExpr::parse(object)?))
    }

    pub fn subject(&self) -> &PathExpr {
        &self.subject
    }

    pub fn object(&self) -> &PathExpr {
        &self.object
    }

    /// Structural signature of both paths.
    pub fn shape(&self) -> RuleShape<'_> {
        RuleShape {
            subject: self.subject.shape(),
            object: self.object.shape(),
        }
    }

    /// Wildcard steps across both paths.
    pub fn wildcard_count(&self) -> usize {
        self.subject.wildcard_count() + self.object.wildcard_count()
    }

    /// Position-pinned steps across both paths.
    pub fn positional_count(&self) -> usize {
        self.subject.positional_count() + self.object.positional_count()
    }
}

impl fmt::Display for ExtractionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.subject, self.object)
    }
}

/// Read extraction rules from a JSON array of `{"subject", "object"}` objects.
///
/// Every path is tokenized while deserializing, so a malformed locator fails
/// the whole file with [`WrapError::RuleFileParse`].
pub fn load_rules(path: &Path) -> WrapResult<Vec<ExtractionRule>> {
    let content = std::fs::read_to_string(path).map_err(|source| WrapError::RuleFileRead {
        path: path.display().to_string(),
        source,
    })?;
    let rules: Vec<ExtractionRule> =
        serde_json::from_str(&content).map_err(|e| WrapError::RuleFileParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    tracing::debug!(count = rules.len(), file = %path.display(), "loaded rules");
    Ok(rules)
}

/// The `(subject shape, object shape)` pair rules are clustered by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleShape<'a> {
    pub subject: Shape<'a>,
    pub object: Shape<'a>,
}

impl fmt::Display for RuleShape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.subject, self.object)
    }
}

// ---------------------------------------------------------------------------
// Weighted output
// ---------------------------------------------------------------------------

/// A generalized rule with the number of raw rules that support it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedRule {
    pub rule: GeneralizedRule,
    /// Count of raw rules folded into `rule` (always at least 1).
    pub support: usize,
}

/// Generalized rules with support weights, unique by rule, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightedRules {
    entries: Vec<WeightedRule>,
}

impl WeightedRules {
    pub(crate) fn from_entries(entries: Vec<WeightedRule>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeightedRule> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Support weight of `rule`, if it is present.
    pub fn support_of(&self, rule: &GeneralizedRule) -> Option<usize> {
        self.entries
            .iter()
            .find(|w| &w.rule == rule)
            .map(|w| w.support)
    }

    /// Sum of all support weights.
    pub fn total_support(&self) -> usize {
        self.entries.iter().map(|w| w.support).sum()
    }

    pub fn into_vec(self) -> Vec<WeightedRule> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a WeightedRules {
    type Item = &'a WeightedRule;
    type IntoIter = std::slice::Iter<'a, WeightedRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
