//! Generalization of path expressions.
//!
//! Finds the least specific common pattern of two or more same-depth paths,
//! step by step:
//!
//! | inputs                              | result             |
//! |-------------------------------------|--------------------|
//! | identical steps                     | that step          |
//! | either step is `*`                  | `*`                |
//! | same tag, positions differ          | tag, no position   |
//! | different tags                      | `*`                |
//!
//! The step operator is commutative, associative and idempotent, and `*` is
//! absorbing, so folding a list of same-length paths gives the same result
//! in any order.

use crate::error::{PathError, PathResult};
use crate::path::{NodeStep, PathExpr};

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// Generalize two node steps into one.
pub fn generalize_step(a: &NodeStep, b: &NodeStep) -> NodeStep {
    if a == b {
        return a.clone();
    }

    match (a, b) {
        (NodeStep::Wildcard, _) | (_, NodeStep::Wildcard) => NodeStep::Wildcard,
        (NodeStep::Element(ea), NodeStep::Element(eb)) if ea.tag() == eb.tag() => {
            NodeStep::Element(ea.without_position())
        }
        _ => NodeStep::Wildcard,
    }
}

// ---------------------------------------------------------------------------
// Paths: pair
// ---------------------------------------------------------------------------

/// Generalize two path expressions position by position.
///
/// Fails with [`PathError::LengthMismatch`] when the paths differ in depth;
/// no alignment is attempted.
pub fn generalize_pair(p1: &PathExpr, p2: &PathExpr) -> PathResult<PathExpr> {
    if p1 == p2 {
        return Ok(p1.clone());
    }
    if p1.len() != p2.len() {
        return Err(PathError::LengthMismatch {
            left: p1.len(),
            right: p2.len(),
        });
    }

    let steps = p1
        .steps()
        .iter()
        .zip(p2.steps())
        .map(|(a, b)| generalize_step(a, b))
        .collect();
    Ok(PathExpr::from_steps(steps))
}

// ---------------------------------------------------------------------------
// Paths: fold
// ---------------------------------------------------------------------------

/// Generalize any number of path expressions by left-folding [`generalize_pair`].
///
/// A single path comes back unchanged. A length mismatch is reported at the
/// first pair the fold reaches, which is not necessarily the first offender
/// in the list.
pub fn generalize_all<'a, I>(paths: I) -> PathResult<PathExpr>
where
    I: IntoIterator<Item = &'a PathExpr>,
{
    let mut iter = paths.into_iter();
    let first = iter.next().ok_or(PathError::NoPaths)?;
    iter.try_fold(first.clone(), |acc, path| generalize_pair(&acc, path))
}

// ---------------------------------------------------------------------------
// String façade
// ---------------------------------------------------------------------------

/// Generalize two path-expression strings, returning the canonical string form.
///
/// ```
/// use wrapgen::generalize::generalize_exprs;
///
/// let g = generalize_exprs("/html/body/div[1]/a", "/html/body/div[2]/a").unwrap();
/// assert_eq!(g, "/html/body/div/a");
/// ```
pub fn generalize_exprs(a: &str, b: &str) -> PathResult<String> {
    let a = PathExpr::parse(a)?;
    let b = PathExpr::parse(b)?;
    Ok(generalize_pair(&a, &b)?.to_string())
}

/// Generalize a list of path-expression strings.
pub fn generalize_expr_list<S: AsRef<str>>(exprs: &[S]) -> PathResult<String> {
    let paths = exprs
        .iter()
        .map(|e| PathExpr::parse(e.as_ref()))
        .collect::<PathResult<Vec<_>>>()?;
    Ok(generalize_all(&paths)?.to_string())
}
