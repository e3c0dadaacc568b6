// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # wrapgen
//!
//! Wrapper induction over structural locators. Given many `(subject path,
//! object path)` rules, each pinpointing a subject and an object inside one
//! document, wrapgen infers a small set of template-level rules that apply to
//! every document sharing the same skeleton, each with a support weight.
//!
//! ## Architecture
//!
//! - **Paths** (`path`): tokenizer for `/tag[n]/...` expressions and shape projection
//! - **Generalization** (`generalize`): step table, pairwise and folded path generalization
//! - **Rules** (`rule`): extraction rules, generalized rules, support weights
//! - **Clustering** (`cluster`): first-fit grouping of rules by structural shape
//! - **Induction** (`induce`): per-cluster folding into generalized rules
//!
//! Everything is pure and synchronous; no state is kept between calls.
//!
//! ## Library usage
//!
//! ```
//! use wrapgen::induce::generalize_rules_weighted;
//! use wrapgen::rule::ExtractionRule;
//!
//! let rules = vec![
//!     ExtractionRule::parse("/a/b[1]/c", "/a/d[1]").unwrap(),
//!     ExtractionRule::parse("/a/b[2]/c", "/a/d[2]").unwrap(),
//!     ExtractionRule::parse("/x/y[1]", "/x/z[1]").unwrap(),
//! ];
//! let weighted = generalize_rules_weighted(&rules).unwrap();
//! let general = ExtractionRule::parse("/a/b/c", "/a/d").unwrap();
//! assert_eq!(weighted.support_of(&general), Some(2));
//! ```

pub mod cluster;
pub mod config;
pub mod error;
pub mod generalize;
pub mod induce;
pub mod path;
pub mod rule;
