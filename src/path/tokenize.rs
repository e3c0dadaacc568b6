//! Path-expression tokenizer.
//!
//! Splits on `/`, drops empty segments, trims whitespace, and parses each
//! segment into a [`NodeStep`]. Malformed brackets are reported rather than
//! coerced.

use crate::error::{PathError, PathResult};

use super::{ElementStep, NodeStep, PathExpr, check_tag};

/// Step separator.
pub const SEPARATOR: char = '/';

/// The reserved wildcard tag.
pub const WILDCARD: &str = "*";

/// Parse a path-expression string into a [`PathExpr`].
///
/// - `"/html/body/div[2]"` → `html`, `body`, `div[2]`
/// - leading, trailing and repeated separators are ignored
/// - `*` and `*[n]` are the wildcard (the index is dropped); any other
///   segment starting with `*` is malformed
pub fn tokenize(expr: &str) -> PathResult<PathExpr> {
    let steps = expr
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| parse_step(segment, expr))
        .collect::<PathResult<Vec<_>>>()?;

    if steps.is_empty() {
        return Err(PathError::EmptyPath {
            expr: expr.to_string(),
        });
    }
    Ok(PathExpr::from_steps(steps))
}

/// Tag sequence of a path-expression string, positions stripped.
pub fn tag_sequence(expr: &str) -> PathResult<Vec<String>> {
    Ok(tokenize(expr)?.shape().to_owned_tags())
}

fn parse_step(segment: &str, expr: &str) -> PathResult<NodeStep> {
    let malformed = |reason: &str| PathError::MalformedStep {
        segment: segment.to_string(),
        expr: expr.to_string(),
        reason: reason.to_string(),
    };

    let (tag, position) = match segment.find('[') {
        Some(open) => {
            let position = parse_position(&segment[open..]).map_err(malformed)?;
            (segment[..open].trim_end(), Some(position))
        }
        None => (segment, None),
    };

    // `*` and `*[n]` are the wildcard; the index is discarded.
    if tag == WILDCARD {
        return Ok(NodeStep::Wildcard);
    }
    if tag.is_empty() {
        return Err(malformed("missing tag before `[`"));
    }
    check_tag(tag).map_err(malformed)?;

    Ok(NodeStep::Element(ElementStep {
        tag: tag.to_string(),
        position,
    }))
}

/// Parse a `[n]` suffix (starting at the `[`).
fn parse_position(suffix: &str) -> Result<u32, &'static str> {
    let Some(inner) = suffix
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return Err("unmatched `[`");
    };
    if inner.contains(['[', ']']) {
        return Err("only one `[n]` suffix is allowed");
    }

    let inner = inner.trim();
    if inner.is_empty() || !inner.bytes().all(|b| b.is_ascii_digit()) {
        return Err("position is not a non-negative integer");
    }
    inner.parse().map_err(|_| "position is out of range")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason_of(err: PathError) -> String {
        match err {
            PathError::MalformedStep { reason, .. } => reason,
            other => panic!("expected MalformedStep, got {other:?}"),
        }
    }

    #[test]
    fn tokenize_plain_and_positioned_steps() {
        let path = tokenize("/html/body/div[1]/a").unwrap();
        assert_eq!(
            path.steps(),
            &[
                NodeStep::element("html").unwrap(),
                NodeStep::element("body").unwrap(),
                NodeStep::positioned("div", 1).unwrap(),
                NodeStep::element("a").unwrap(),
            ]
        );
    }

    #[test]
    fn tokenize_ignores_redundant_separators_and_whitespace() {
        let path = tokenize("//html/ body //div[ 2 ]/").unwrap();
        assert_eq!(path.to_string(), "/html/body/div[2]");
    }

    #[test]
    fn tokenize_without_leading_separator() {
        assert_eq!(tokenize("a/b").unwrap(), tokenize("/a/b").unwrap());
    }

    #[test]
    fn wildcard_drops_its_position() {
        let path = tokenize("/a/*[3]/ * ").unwrap();
        assert_eq!(
            path.steps(),
            &[
                NodeStep::element("a").unwrap(),
                NodeStep::Wildcard,
                NodeStep::Wildcard
            ]
        );
        assert_eq!(path.positional_count(), 0);
        assert_eq!(path.to_string(), "/a/*/*");
    }

    #[test]
    fn wildcard_with_trailing_text_is_malformed() {
        assert_eq!(
            reason_of(tokenize("/a/*junk").unwrap_err()),
            "`*` is only valid as a whole step"
        );
        assert_eq!(
            reason_of(tokenize("/a/*foo[1]").unwrap_err()),
            "`*` is only valid as a whole step"
        );
        assert_eq!(
            reason_of(tokenize("/a/*[x]").unwrap_err()),
            "position is not a non-negative integer"
        );
        assert_eq!(
            reason_of(tokenize("/a/*]").unwrap_err()),
            "`*` is only valid as a whole step"
        );
    }

    #[test]
    fn zero_position_is_accepted() {
        let path = tokenize("/a[0]").unwrap();
        assert_eq!(path.steps()[0].position(), Some(0));
    }

    #[test]
    fn empty_expressions_fail() {
        for expr in ["", "/", "///", " / / "] {
            assert!(
                matches!(tokenize(expr), Err(PathError::EmptyPath { .. })),
                "expected EmptyPath for {expr:?}"
            );
        }
    }

    #[test]
    fn malformed_brackets_fail_with_segment_and_source() {
        let err = tokenize("/html/div[x]/a").unwrap_err();
        match &err {
            PathError::MalformedStep { segment, expr, .. } => {
                assert_eq!(segment, "div[x]");
                assert_eq!(expr, "/html/div[x]/a");
            }
            other => panic!("expected MalformedStep, got {other:?}"),
        }

        assert_eq!(reason_of(tokenize("/div[1").unwrap_err()), "unmatched `[`");
        assert_eq!(reason_of(tokenize("/div1]").unwrap_err()), "unmatched `]`");
        assert_eq!(
            reason_of(tokenize("/[1]").unwrap_err()),
            "missing tag before `[`"
        );
        assert_eq!(
            reason_of(tokenize("/div[1][2]").unwrap_err()),
            "only one `[n]` suffix is allowed"
        );
        assert_eq!(
            reason_of(tokenize("/div[-1]").unwrap_err()),
            "position is not a non-negative integer"
        );
        assert_eq!(
            reason_of(tokenize("/div[+1]").unwrap_err()),
            "position is not a non-negative integer"
        );
        assert_eq!(
            reason_of(tokenize("/div[]").unwrap_err()),
            "position is not a non-negative integer"
        );
        assert_eq!(
            reason_of(tokenize("/div[99999999999]").unwrap_err()),
            "position is out of range"
        );
    }

    #[test]
    fn tag_sequence_strips_positions() {
        assert_eq!(
            tag_sequence("/a/b[2]/*/c[1]").unwrap(),
            vec!["a", "b", "*", "c"]
        );
        assert!(tag_sequence("/a/b[").is_err());
    }
}
