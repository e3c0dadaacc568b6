//! Path expressions: ordered sequences of node steps locating a position
//! inside a hierarchical document.
//!
//! A [`PathExpr`] is always non-empty and conceptually rooted; its canonical
//! string form is `/step/step[n]/*` (leading separator, no trailing one).
//! Strings are turned into paths by the [`tokenize`] function, and paths
//! serialize back to that same canonical string.

pub mod tokenize;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PathError, PathResult};

pub use tokenize::{SEPARATOR, WILDCARD, tag_sequence, tokenize};

// ---------------------------------------------------------------------------
// Node steps
// ---------------------------------------------------------------------------

/// One segment of a path expression.
///
/// The wildcard never carries a sibling position, and element steps can only
/// be built through [`NodeStep::element`] / [`NodeStep::positioned`], which
/// reject tags that would not survive a round trip through the string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeStep {
    /// Matches any element at this depth.
    Wildcard,
    /// A named element, optionally pinned to a 1-based sibling index.
    Element(ElementStep),
}

/// Payload of [`NodeStep::Element`]. Fields are private so the tag is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementStep {
    tag: String,
    position: Option<u32>,
}

impl ElementStep {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn position(&self) -> Option<u32> {
        self.position
    }

    /// Same tag, sibling index dropped.
    pub(crate) fn without_position(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            position: None,
        }
    }
}

impl NodeStep {
    /// A positionless element step.
    ///
    /// Fails with [`PathError::MalformedStep`] when the tag is empty, starts
    /// with the reserved `*`, contains `/`, `[` or `]`, or has surrounding
    /// whitespace. Use [`NodeStep::Wildcard`] for the wildcard.
    pub fn element(tag: impl Into<String>) -> PathResult<Self> {
        Self::checked(tag.into(), None)
    }

    /// An element step pinned to a sibling index. Same tag rules as [`NodeStep::element`].
    pub fn positioned(tag: impl Into<String>, position: u32) -> PathResult<Self> {
        Self::checked(tag.into(), Some(position))
    }

    fn checked(tag: String, position: Option<u32>) -> PathResult<Self> {
        if let Err(reason) = check_tag(&tag) {
            return Err(PathError::MalformedStep {
                segment: tag.clone(),
                expr: tag,
                reason: reason.to_string(),
            });
        }
        Ok(NodeStep::Element(ElementStep { tag, position }))
    }

    /// The element tag, or `*` for the wildcard.
    pub fn tag(&self) -> &str {
        match self {
            NodeStep::Wildcard => WILDCARD,
            NodeStep::Element(el) => el.tag(),
        }
    }

    /// The sibling index, if any.
    pub fn position(&self) -> Option<u32> {
        match self {
            NodeStep::Wildcard => None,
            NodeStep::Element(el) => el.position(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, NodeStep::Wildcard)
    }
}

/// Tag rules shared by the constructors and the tokenizer.
fn check_tag(tag: &str) -> Result<(), &'static str> {
    if tag.is_empty() {
        return Err("empty tag");
    }
    if tag.starts_with(WILDCARD) {
        return Err("`*` is only valid as a whole step");
    }
    if tag.contains(']') {
        return Err("unmatched `]`");
    }
    if tag.contains([SEPARATOR, '[']) {
        return Err("tag contains `/` or `[`");
    }
    if tag.trim() != tag {
        return Err("tag has surrounding whitespace");
    }
    Ok(())
}

impl fmt::Display for NodeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStep::Wildcard => f.write_str(WILDCARD),
            NodeStep::Element(ElementStep {
                tag,
                position: Some(n),
            }) => write!(f, "{tag}[{n}]"),
            NodeStep::Element(ElementStep {
                tag,
                position: None,
            }) => f.write_str(tag),
        }
    }
}

// ---------------------------------------------------------------------------
// Path expressions
// ---------------------------------------------------------------------------

/// An ordered, non-empty sequence of [`NodeStep`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PathExpr {
    steps: Vec<NodeStep>,
}

impl PathExpr {
    /// Build a path from steps. Fails with [`PathError::EmptyPath`] on an empty list.
    ///
    /// Steps are valid by construction, so the result always prints to a
    /// string that parses back to an equal path.
    pub fn new(steps: Vec<NodeStep>) -> PathResult<Self> {
        if steps.is_empty() {
            return Err(PathError::EmptyPath {
                expr: String::new(),
            });
        }
        Ok(Self { steps })
    }

    /// Parse a path expression string. Equivalent to [`tokenize`].
    pub fn parse(expr: &str) -> PathResult<Self> {
        tokenize(expr)
    }

    /// Callers guarantee `steps` is non-empty.
    pub(crate) fn from_steps(steps: Vec<NodeStep>) -> Self {
        debug_assert!(!steps.is_empty(), "path expressions are never empty");
        Self { steps }
    }

    pub fn steps(&self) -> &[NodeStep] {
        &self.steps
    }

    /// Number of steps (depth below the implied root).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`: a path expression holds at least one step.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The tag-only projection used for structural comparison.
    pub fn shape(&self) -> Shape<'_> {
        Shape(self.steps.iter().map(NodeStep::tag).collect())
    }

    /// Whether both paths have the same tag sequence, ignoring positions.
    pub fn is_shape_equivalent(&self, other: &PathExpr) -> bool {
        self.len() == other.len()
            && self
                .steps
                .iter()
                .zip(&other.steps)
                .all(|(a, b)| a.tag() == b.tag())
    }

    /// Count wildcard steps.
    pub fn wildcard_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_wildcard()).count()
    }

    /// Count steps still pinned to a sibling index.
    pub fn positional_count(&self) -> usize {
        self.steps.iter().filter(|s| s.position().is_some()).count()
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{SEPARATOR}{step}")?;
        }
        Ok(())
    }
}

impl FromStr for PathExpr {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        tokenize(s)
    }
}

impl TryFrom<String> for PathExpr {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        tokenize(&value)
    }
}

impl From<PathExpr> for String {
    fn from(path: PathExpr) -> Self {
        path.to_string()
    }
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// Tag-only projection of a path expression (structural signature).
///
/// Borrowed from the path it was taken from, so shapes are cheap to build
/// and compare during clustering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape<'a>(Vec<&'a str>);

impl<'a> Shape<'a> {
    pub fn tags(&self) -> &[&'a str] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_owned_tags(&self) -> Vec<String> {
        self.0.iter().map(|t| t.to_string()).collect()
    }
}

impl fmt::Display for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
