//! Rule induction: cluster raw extraction rules by shape, then fold each
//! cluster into one generalized rule.
//!
//! The free functions [`generalize_rules`] and [`generalize_rules_weighted`]
//! run with the default [`InductionConfig`]; use an [`Inducer`] to pick the
//! clustering strategy, collision policy or parallelism threshold.
//!
//! ## Support weights
//!
//! The weighted variant pairs every generalized rule with the size of the
//! cluster it came from. Output is unique by rule; if two clusters ever
//! produce the same rule, [`WeightCollision`] decides whether their support
//! is summed or the call fails. Support is never silently dropped.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::cluster::{Cluster, cluster_with};
use crate::config::{InductionConfig, WeightCollision};
use crate::error::{InductionError, InductionResult, PathError};
use crate::generalize::generalize_all;
use crate::rule::{ExtractionRule, GeneralizedRule, WeightedRule, WeightedRules};

/// Generalize rules with the default configuration: one rule per cluster, in cluster order.
pub fn generalize_rules(rules: &[ExtractionRule]) -> InductionResult<Vec<GeneralizedRule>> {
    Inducer::default().generalize(rules)
}

/// Generalize rules with the default configuration, weighting each by its cluster size.
pub fn generalize_rules_weighted(rules: &[ExtractionRule]) -> InductionResult<WeightedRules> {
    Inducer::default().generalize_weighted(rules)
}

/// Config-driven induction driver. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct Inducer {
    config: InductionConfig,
}

impl Inducer {
    pub fn new(config: InductionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InductionConfig {
        &self.config
    }

    /// Cluster `rules` with the configured strategy.
    pub fn cluster<'a>(&self, rules: &'a [ExtractionRule]) -> InductionResult<Vec<Cluster<'a>>> {
        cluster_with(rules, self.config.strategy)
    }

    /// One generalized rule per cluster, in cluster order.
    pub fn generalize(&self, rules: &[ExtractionRule]) -> InductionResult<Vec<GeneralizedRule>> {
        let clusters = self.cluster(rules)?;
        let generalized = self.fold_clusters(&clusters)?;

        tracing::info!(
            rules = rules.len(),
            clusters = clusters.len(),
            strategy = %self.config.strategy,
            "induced generalized rules"
        );
        Ok(generalized)
    }

    /// Generalized rules with support weights.
    ///
    /// Rules below `min_support` are dropped after merging.
    pub fn generalize_weighted(&self, rules: &[ExtractionRule]) -> InductionResult<WeightedRules> {
        let clusters = self.cluster(rules)?;
        let generalized = self.fold_clusters(&clusters)?;

        let supported = generalized
            .into_iter()
            .zip(clusters.iter().map(Cluster::len));
        let mut entries = merge_support(supported, self.config.on_collision)?;

        let before = entries.len();
        entries.retain(|w| w.support >= self.config.min_support);

        tracing::info!(
            rules = rules.len(),
            clusters = clusters.len(),
            kept = entries.len(),
            dropped = before - entries.len(),
            strategy = %self.config.strategy,
            "induced weighted rules"
        );
        Ok(WeightedRules::from_entries(entries))
    }

    fn fold_clusters(&self, clusters: &[Cluster<'_>]) -> InductionResult<Vec<GeneralizedRule>> {
        if clusters.len() >= self.config.parallel_threshold {
            clusters
                .par_iter()
                .enumerate()
                .map(|(idx, cluster)| generalize_cluster(idx, cluster))
                .collect()
        } else {
            clusters
                .iter()
                .enumerate()
                .map(|(idx, cluster)| generalize_cluster(idx, cluster))
                .collect()
        }
    }
}

/// Fold one cluster's subject paths and object paths independently.
///
/// `index` only labels diagnostics. A length mismatch here means the cluster
/// broke its shape invariant and is reported as
/// [`InductionError::InconsistentCluster`].
pub fn generalize_cluster(index: usize, cluster: &Cluster<'_>) -> InductionResult<GeneralizedRule> {
    let inconsistent = |source: PathError| InductionError::InconsistentCluster {
        cluster: index,
        source,
    };

    let subject = generalize_all(cluster.members().iter().map(|r| r.subject()))
        .map_err(inconsistent)?;
    let object = generalize_all(cluster.members().iter().map(|r| r.object()))
        .map_err(inconsistent)?;

    tracing::debug!(
        cluster = index,
        size = cluster.len(),
        %subject,
        %object,
        "generalized cluster"
    );
    Ok(ExtractionRule::new(subject, object))
}

/// Merge `(rule, support)` pairs into unique rules, keeping first-seen order.
fn merge_support<I>(supported: I, policy: WeightCollision) -> InductionResult<Vec<WeightedRule>>
where
    I: IntoIterator<Item = (GeneralizedRule, usize)>,
{
    let mut entries: Vec<WeightedRule> = Vec::new();
    // rule -> (entry index, first cluster index)
    let mut seen: HashMap<GeneralizedRule, (usize, usize)> = HashMap::new();

    for (cluster, (rule, support)) in supported.into_iter().enumerate() {
        if let Some(&(entry, first)) = seen.get(&rule) {
            match policy {
                WeightCollision::Sum => {
                    tracing::warn!(
                        %rule,
                        first,
                        second = cluster,
                        "clusters generalize to the same rule, summing support"
                    );
                    entries[entry].support += support;
                }
                WeightCollision::Reject => {
                    return Err(InductionError::WeightCollision {
                        rule: rule.to_string(),
                        first,
                        second: cluster,
                    });
                }
            }
        } else {
            seen.insert(rule.clone(), (entries.len(), cluster));
            entries.push(WeightedRule { rule, support });
        }
    }
    Ok(entries)
}
