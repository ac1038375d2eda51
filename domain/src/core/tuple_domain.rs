//! Conjunctions of per-column domains.

use std::collections::BTreeMap;

use super::domain::Domain;

/// A conjunction of independent column domains.
///
/// Columns without an entry are unconstrained. The `none` tuple domain is
/// unsatisfiable and carries no column entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TupleDomain<C: Ord> {
    domains: Option<BTreeMap<C, Domain>>,
}

impl<C: Ord + Clone> TupleDomain<C> {
    /// No constraint on any column.
    #[must_use]
    pub fn all() -> Self {
        Self {
            domains: Some(BTreeMap::new()),
        }
    }

    /// Nothing matches.
    #[must_use]
    pub fn none() -> Self {
        Self { domains: None }
    }

    /// Builds a tuple domain from column domains.
    ///
    /// Unconstrained domains are dropped; any unsatisfiable domain makes the
    /// whole tuple domain `none`.
    #[must_use]
    pub fn with_column_domains<I>(domains: I) -> Self
    where
        I: IntoIterator<Item = (C, Domain)>,
    {
        let mut out = BTreeMap::new();
        for (column, domain) in domains {
            if domain.is_none() {
                return Self::none();
            }
            if domain.is_all() {
                continue;
            }
            let merged = match out.remove(&column) {
                Some(existing) => Domain::intersect(&existing, &domain),
                None => domain,
            };
            if merged.is_none() {
                return Self::none();
            }
            out.insert(column, merged);
        }
        Self { domains: Some(out) }
    }

    /// Whether nothing matches.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.domains.is_none()
    }

    /// Whether no column is constrained.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(&self.domains, Some(domains) if domains.is_empty())
    }

    /// Column domains, or `None` when the tuple domain is unsatisfiable.
    #[must_use]
    pub fn domains(&self) -> Option<&BTreeMap<C, Domain>> {
        self.domains.as_ref()
    }

    /// Domain of one column; unconstrained columns return `None`.
    #[must_use]
    pub fn domain(&self, column: &C) -> Option<&Domain> {
        self.domains.as_ref()?.get(column)
    }

    /// Column-wise intersection.
    #[must_use]
    pub fn intersect(&self, other: &TupleDomain<C>) -> TupleDomain<C> {
        let (Some(left), Some(right)) = (&self.domains, &other.domains) else {
            return Self::none();
        };
        Self::with_column_domains(
            left.iter()
                .chain(right.iter())
                .map(|(column, domain)| (column.clone(), domain.clone())),
        )
    }
}

impl<C: Ord + Clone> Default for TupleDomain<C> {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{range::Range, types::ColumnType, value::Value, value_set::ValueSet};

    fn at_least(value: i64) -> Domain {
        Domain::new(
            ColumnType::Integer,
            ValueSet::of_ranges(vec![Range::greater_than_or_equal(Value::Long(value))]),
            false,
        )
    }

    fn at_most(value: i64) -> Domain {
        Domain::new(
            ColumnType::Integer,
            ValueSet::of_ranges(vec![Range::less_than_or_equal(Value::Long(value))]),
            false,
        )
    }

    #[test]
    fn none_column_collapses_tuple() {
        let tuple = TupleDomain::with_column_domains(vec![
            (1_u32, at_least(3)),
            (2_u32, Domain::none(ColumnType::Integer)),
        ]);
        assert!(tuple.is_none());
        assert!(tuple.domains().is_none());
    }

    #[test]
    fn all_domains_are_dropped() {
        let tuple =
            TupleDomain::with_column_domains(vec![(1_u32, Domain::all(ColumnType::Integer))]);
        assert!(tuple.is_all());
    }

    #[test]
    fn repeated_columns_are_intersected() {
        let tuple = TupleDomain::with_column_domains(vec![(7_u32, at_least(3)), (7, at_most(5))]);
        let domain = tuple.domain(&7).expect("constrained");
        assert!(domain.includes_null_or_value(Some(&Value::Long(4))));
        assert!(!domain.includes_null_or_value(Some(&Value::Long(6))));
    }

    #[test]
    fn intersect_detects_contradiction() {
        let left = TupleDomain::with_column_domains(vec![(1_u32, at_least(10))]);
        let right = TupleDomain::with_column_domains(vec![(1_u32, at_most(5))]);
        assert!(left.intersect(&right).is_none());
        assert!(left.intersect(&TupleDomain::none()).is_none());
        assert_eq!(left.intersect(&TupleDomain::all()), left);
    }
}
