//! Pruning configuration.

use std::sync::Arc;

use section_domain::TupleDomain;

use crate::{
    observability::log_debug,
    pruning::{NoopPredicate, SectionPredicate, TupleDomainPredicate},
    statistics::ColumnId,
};

/// Which predicate implementation a scan uses.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PredicatePolicy {
    /// Statistics-driven pruning via [`TupleDomainPredicate`].
    TupleDomain,
    /// Keep every section.
    Noop,
}

/// Configuration for pruning behavior.
///
/// The default prunes on statistics but leaves membership filters off.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PruningConfig {
    /// Disable pruning entirely; every section is read.
    pub no_pruning: bool,
    /// Consult membership filters for point lookups.
    pub enable_bloom: bool,
}

impl PruningConfig {
    /// Resolve the policy for a scan constrained by `tuple_domain`.
    #[must_use]
    pub fn resolve_policy(&self, tuple_domain: &TupleDomain<ColumnId>) -> PredicatePolicy {
        if self.no_pruning {
            return PredicatePolicy::Noop;
        }
        if tuple_domain.is_all() {
            return PredicatePolicy::Noop;
        }
        PredicatePolicy::TupleDomain
    }

    /// Build the predicate a scan should evaluate against every section.
    #[must_use]
    pub fn build_predicate(
        &self,
        tuple_domain: &TupleDomain<ColumnId>,
    ) -> Arc<dyn SectionPredicate> {
        let policy = self.resolve_policy(tuple_domain);
        log_debug!(
            component = "config",
            event = "predicate_policy_resolved",
            policy = ?policy,
            enable_bloom = self.enable_bloom,
        );
        match policy {
            PredicatePolicy::Noop => Arc::new(NoopPredicate),
            PredicatePolicy::TupleDomain => Arc::new(
                TupleDomainPredicate::builder()
                    .add_tuple_domain(tuple_domain)
                    .set_bloom_filters_enabled(self.enable_bloom)
                    .build(),
            ),
        }
    }
}
