//! Rich diagnostic error types for wrapgen.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so callers know exactly
//! which rule or path expression was rejected and why.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for wrapgen.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum WrapError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Induction(#[from] InductionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("failed to read rules from {path}")]
    #[diagnostic(
        code(wrapgen::rules::read),
        help("Ensure the rule file exists and is readable.")
    )]
    RuleFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rule file {path}: {message}")]
    #[diagnostic(
        code(wrapgen::rules::parse),
        help(
            "Expected a JSON array of objects with `subject` and `object` path \
             expressions, e.g. [{{\"subject\": \"/html/h1\", \"object\": \"/html/p[2]\"}}]."
        )
    )]
    RuleFileParse { path: String, message: String },

    #[error("failed to serialize output: {message}")]
    #[diagnostic(code(wrapgen::output::serialize))]
    Serialization { message: String },
}

// ---------------------------------------------------------------------------
// Path errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("malformed step \"{segment}\" in \"{expr}\": {reason}")]
    #[diagnostic(
        code(wrapgen::path::malformed_step),
        help(
            "Each segment must be a tag optionally followed by `[n]`, where n is a \
             non-negative integer, e.g. `div[2]`. Brackets must be balanced, \
             the tag must not be empty, and `*` may only appear as `*` or `*[n]`."
        )
    )]
    MalformedStep {
        segment: String,
        expr: String,
        reason: String,
    },

    #[error("empty path expression: \"{expr}\"")]
    #[diagnostic(
        code(wrapgen::path::empty),
        help("A path expression needs at least one non-empty segment, e.g. `/html/body`.")
    )]
    EmptyPath { expr: String },

    #[error("cannot generalize paths of different length: {left} vs {right} steps")]
    #[diagnostic(
        code(wrapgen::path::length_mismatch),
        help(
            "Generalization is defined only over structurally aligned paths. \
             Group rules by shape first (see `cluster_rules`), or check the \
             lengths of the inputs before folding."
        )
    )]
    LengthMismatch { left: usize, right: usize },

    #[error("no path expressions to generalize")]
    #[diagnostic(
        code(wrapgen::path::no_paths),
        help("Provide at least one path expression to the fold.")
    )]
    NoPaths,
}

/// Convenience alias for path operations.
pub type PathResult<T> = std::result::Result<T, PathError>;

// ---------------------------------------------------------------------------
// Induction errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum InductionError {
    #[error("no extraction rules to cluster")]
    #[diagnostic(
        code(wrapgen::induce::empty_input),
        help("Clustering requires at least one extraction rule.")
    )]
    EmptyInput,

    #[error("cluster {cluster} holds rules of differing depth")]
    #[diagnostic(
        code(wrapgen::induce::inconsistent_cluster),
        help(
            "Every member of a cluster must share the representative's shape. \
             This is an internal fault in clustering; please file a bug report \
             with the input rules."
        )
    )]
    InconsistentCluster {
        cluster: usize,
        #[source]
        source: PathError,
    },

    #[error("clusters {first} and {second} both generalize to {rule}")]
    #[diagnostic(
        code(wrapgen::induce::weight_collision),
        help(
            "Two clusters produced the same generalized rule. Set \
             `on_collision = \"sum\"` to merge their support instead of failing."
        )
    )]
    WeightCollision {
        rule: String,
        first: usize,
        second: usize,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),
}

/// Convenience alias for induction operations.
pub type InductionResult<T> = std::result::Result<T, InductionError>;

/// Convenience alias for functions returning wrapgen results.
pub type WrapResult<T> = std::result::Result<T, WrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_error_converts_to_wrap_error() {
        let err = PathError::EmptyPath { expr: "//".into() };
        let top: WrapError = err.into();
        assert!(matches!(top, WrapError::Path(PathError::EmptyPath { .. })));
    }

    #[test]
    fn every_subsystem_error_lifts_into_wrap_error() {
        let from_induction: WrapError = InductionError::EmptyInput.into();
        assert!(matches!(
            from_induction,
            WrapError::Induction(InductionError::EmptyInput)
        ));

        let from_config: WrapError = crate::config::ConfigError::Parse {
            path: "induce.toml".into(),
            message: "bad".into(),
        }
        .into();
        assert!(matches!(from_config, WrapError::Config(_)));
        assert!(from_config.to_string().contains("induce.toml"));
    }

    #[test]
    fn induction_error_wraps_path_error() {
        let err: InductionError = PathError::NoPaths.into();
        assert!(matches!(err, InductionError::Path(PathError::NoPaths)));
    }

    #[test]
    fn inconsistent_cluster_keeps_source() {
        let err = InductionError::InconsistentCluster {
            cluster: 2,
            source: PathError::LengthMismatch { left: 3, right: 2 },
        };
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("3 vs 2"));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = PathError::MalformedStep {
            segment: "div[x]".into(),
            expr: "/html/div[x]".into(),
            reason: "position is not a non-negative integer".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("div[x]"));
        assert!(msg.contains("/html/div[x]"));
    }
}
