//! Structural-signature clustering of extraction rules.
//!
//! Rules whose subject and object paths share tag sequences (positions
//! ignored) land in the same cluster. Assignment is first-fit against each
//! cluster's representative, its first member, so clusters and their members
//! both keep input order.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::ClusterStrategy;
use crate::error::{InductionError, InductionResult};
use crate::rule::{ExtractionRule, RuleShape};

/// A non-empty, insertion-ordered group of shape-equivalent rules.
#[derive(Debug, Clone)]
pub struct Cluster<'a> {
    members: Vec<&'a ExtractionRule>,
    positions: Vec<usize>,
}

impl<'a> Cluster<'a> {
    fn open(position: usize, rule: &'a ExtractionRule) -> Self {
        Self {
            members: vec![rule],
            positions: vec![position],
        }
    }

    fn push(&mut self, position: usize, rule: &'a ExtractionRule) {
        self.members.push(rule);
        self.positions.push(position);
    }

    /// The first rule assigned to this cluster.
    pub fn representative(&self) -> &'a ExtractionRule {
        self.members[0]
    }

    pub fn members(&self) -> &[&'a ExtractionRule] {
        &self.members
    }

    /// Indices of the members in the clustered input, ascending.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`: a cluster is opened with its representative.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn shape(&self) -> RuleShape<'a> {
        self.representative().shape()
    }

    /// Owned, serializable view of this cluster.
    pub fn summary(&self) -> ClusterSummary {
        let shape = self.shape();
        ClusterSummary {
            size: self.len(),
            subject_shape: shape.subject.to_string(),
            object_shape: shape.object.to_string(),
            positions: self.positions.clone(),
            members: self.members.iter().map(|r| (*r).clone()).collect(),
        }
    }
}

/// Serializable cluster description, used by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
    pub size: usize,
    pub subject_shape: String,
    pub object_shape: String,
    pub positions: Vec<usize>,
    pub members: Vec<ExtractionRule>,
}

/// Cluster rules by shape with the first-fit linear scan.
///
/// Fails with [`InductionError::EmptyInput`] when `rules` is empty.
pub fn cluster_rules(rules: &[ExtractionRule]) -> InductionResult<Vec<Cluster<'_>>> {
    cluster_with(rules, ClusterStrategy::Linear)
}

/// Cluster rules by shape using the given strategy.
pub fn cluster_with(
    rules: &[ExtractionRule],
    strategy: ClusterStrategy,
) -> InductionResult<Vec<Cluster<'_>>> {
    if rules.is_empty() {
        return Err(InductionError::EmptyInput);
    }

    let clusters = match strategy {
        ClusterStrategy::Linear => cluster_linear(rules),
        ClusterStrategy::Indexed => cluster_indexed(rules),
    };

    tracing::debug!(
        rules = rules.len(),
        clusters = clusters.len(),
        %strategy,
        "clustered extraction rules"
    );
    Ok(clusters)
}

fn cluster_linear(rules: &[ExtractionRule]) -> Vec<Cluster<'_>> {
    let mut clusters: Vec<Cluster<'_>> = Vec::new();
    // Representative shapes, parallel to `clusters`.
    let mut shapes: Vec<RuleShape<'_>> = Vec::new();

    for (position, rule) in rules.iter().enumerate() {
        let shape = rule.shape();
        match shapes.iter().position(|s| *s == shape) {
            Some(idx) => clusters[idx].push(position, rule),
            None => {
                shapes.push(shape);
                clusters.push(Cluster::open(position, rule));
            }
        }
    }
    clusters
}

fn cluster_indexed(rules: &[ExtractionRule]) -> Vec<Cluster<'_>> {
    let mut clusters: Vec<Cluster<'_>> = Vec::new();
    let mut index: HashMap<RuleShape<'_>, usize> = HashMap::new();

    for (position, rule) in rules.iter().enumerate() {
        match index.get(&rule.shape()) {
            Some(&idx) => clusters[idx].push(position, rule),
            None => {
                index.insert(rule.shape(), clusters.len());
                clusters.push(Cluster::open(position, rule));
            }
        }
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(s: &str, o: &str) -> ExtractionRule {
        ExtractionRule::parse(s, o).unwrap()
    }

    fn mixed_rules() -> Vec<ExtractionRule> {
        vec![
            rule("/a/b[1]/c", "/a/d[1]"),
            rule("/x/y[1]", "/x/z[1]"),
            rule("/a/b[2]/c", "/a/d[2]"),
            rule("/a/b[3]/c", "/a/e[1]"),
            rule("/x/y[4]", "/x/z"),
            rule("/a/b/c", "/a/d[9]"),
            rule("/a/*/c", "/a/d"),
        ]
    }

    #[test]
    fn groups_by_shape() {
        let rules = vec![
            rule("/a/b[1]/c", "/a/d[1]"),
            rule("/a/b[2]/c", "/a/d[2]"),
            rule("/x/y[1]", "/x/z[1]"),
        ];
        let clusters = cluster_rules(&rules).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].positions(), &[0, 1]);
        assert_eq!(clusters[1].positions(), &[2]);
        assert_eq!(clusters[0].shape().to_string(), "(a/b/c, a/d)");
        assert_eq!(clusters[1].shape().to_string(), "(x/y, x/z)");
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(cluster_rules(&[]), Err(InductionError::EmptyInput)));
        assert!(matches!(
            cluster_with(&[], ClusterStrategy::Indexed),
            Err(InductionError::EmptyInput)
        ));
    }

    #[test]
    fn clusters_partition_the_input_in_order() {
        let rules = mixed_rules();
        let clusters = cluster_rules(&rules).unwrap();

        let mut seen: Vec<usize> = clusters
            .iter()
            .flat_map(|c| c.positions().iter().copied())
            .collect();
        for c in &clusters {
            assert!(!c.is_empty() && c.len() == c.members().len());
            assert!(c.positions().windows(2).all(|w| w[0] < w[1]));
            for (member, &pos) in c.members().iter().zip(c.positions()) {
                assert_eq!(*member, &rules[pos]);
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..rules.len()).collect::<Vec<_>>());
    }

    #[test]
    fn members_share_the_representative_shape() {
        let rules = mixed_rules();
        for c in cluster_rules(&rules).unwrap() {
            let shape = c.representative().shape();
            assert!(c.members().iter().all(|m| m.shape() == shape));
        }
    }

    #[test]
    fn wildcard_is_its_own_shape() {
        let rules = mixed_rules();
        let clusters = cluster_rules(&rules).unwrap();
        // a/b/c+a/d, x/y+x/z, a/b/c+a/e, a/*/c+a/d
        assert_eq!(clusters.len(), 4);
        assert_eq!(clusters[0].positions(), &[0, 2, 5]);
        assert_eq!(clusters[1].positions(), &[1, 4]);
        assert_eq!(clusters[2].positions(), &[3]);
        assert_eq!(clusters[3].positions(), &[6]);
    }

    #[test]
    fn strategies_agree() {
        let rules = mixed_rules();
        let linear = cluster_with(&rules, ClusterStrategy::Linear).unwrap();
        let indexed = cluster_with(&rules, ClusterStrategy::Indexed).unwrap();
        assert_eq!(linear.len(), indexed.len());
        for (l, i) in linear.iter().zip(&indexed) {
            assert_eq!(l.positions(), i.positions());
        }
    }

    #[test]
    fn summary_is_owned_and_serializable() {
        let rules = mixed_rules();
        let clusters = cluster_rules(&rules).unwrap();
        let summary = clusters[1].summary();
        assert_eq!(summary.size, 2);
        assert_eq!(summary.subject_shape, "x/y");
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["members"][1]["object"], "/x/z");
    }
}
