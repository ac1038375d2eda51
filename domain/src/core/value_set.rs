//! Sets of permissible non-null values.

use super::{
    range::{Range, SortedRangeSet},
    value::Value,
};

/// The non-null part of a domain.
///
/// Constructors normalize: an all-covering range set becomes [`ValueSet::All`]
/// and an empty range set or value list becomes [`ValueSet::None`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueSet {
    /// Every value of the type.
    All,
    /// No value.
    None,
    /// Disjoint sorted ranges.
    Ranges(SortedRangeSet),
    /// An explicit sorted, de-duplicated list of values.
    Discrete(Vec<Value>),
}

impl ValueSet {
    /// Every value.
    #[must_use]
    pub fn all() -> Self {
        ValueSet::All
    }

    /// No value.
    #[must_use]
    pub fn none() -> Self {
        ValueSet::None
    }

    /// The given single values, as singleton ranges.
    #[must_use]
    pub fn of<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::from_range_set(SortedRangeSet::of(values))
    }

    /// The union of the given ranges.
    #[must_use]
    pub fn of_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = Range>,
    {
        Self::from_range_set(SortedRangeSet::from_ranges(ranges))
    }

    /// An explicit list of values.
    #[must_use]
    pub fn discrete<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut values: Vec<Value> = values.into_iter().collect();
        values.sort();
        values.dedup();
        if values.is_empty() {
            ValueSet::None
        } else {
            ValueSet::Discrete(values)
        }
    }

    fn from_range_set(set: SortedRangeSet) -> Self {
        if set.is_none() {
            ValueSet::None
        } else if set.is_all() {
            ValueSet::All
        } else {
            ValueSet::Ranges(set)
        }
    }

    /// Whether every value is permitted.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, ValueSet::All)
    }

    /// Whether no value is permitted.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, ValueSet::None)
    }

    /// Whether exactly one value is permitted.
    #[must_use]
    pub fn is_single_value(&self) -> bool {
        self.single_value().is_some()
    }

    /// The only permitted value, if there is exactly one.
    #[must_use]
    pub fn single_value(&self) -> Option<&Value> {
        match self {
            ValueSet::Ranges(set) => set.single_value(),
            ValueSet::Discrete(values) if values.len() == 1 => values.first(),
            _ => None,
        }
    }

    /// Whether `value` is permitted.
    #[must_use]
    pub fn contains_value(&self, value: &Value) -> bool {
        match self {
            ValueSet::All => true,
            ValueSet::None => false,
            ValueSet::Ranges(set) => set.contains(value),
            ValueSet::Discrete(values) => values.binary_search(value).is_ok(),
        }
    }

    /// Whether the two sets share at least one value.
    #[must_use]
    pub fn overlaps(&self, other: &ValueSet) -> bool {
        match (self, other) {
            (ValueSet::None, _) | (_, ValueSet::None) => false,
            (ValueSet::All, _) | (_, ValueSet::All) => true,
            (ValueSet::Ranges(a), ValueSet::Ranges(b)) => a.overlaps(b),
            (ValueSet::Ranges(set), ValueSet::Discrete(values))
            | (ValueSet::Discrete(values), ValueSet::Ranges(set)) => {
                values.iter().any(|value| set.contains(value))
            }
            (ValueSet::Discrete(a), ValueSet::Discrete(b)) => {
                a.iter().any(|value| b.binary_search(value).is_ok())
            }
        }
    }

    /// Values in both sets.
    #[must_use]
    pub fn intersect(&self, other: &ValueSet) -> ValueSet {
        match (self, other) {
            (ValueSet::None, _) | (_, ValueSet::None) => ValueSet::None,
            (ValueSet::All, other) | (other, ValueSet::All) => other.clone(),
            (ValueSet::Ranges(a), ValueSet::Ranges(b)) => Self::from_range_set(a.intersect(b)),
            (ValueSet::Ranges(set), ValueSet::Discrete(values))
            | (ValueSet::Discrete(values), ValueSet::Ranges(set)) => Self::discrete(
                values
                    .iter()
                    .filter(|value| set.contains(value))
                    .cloned(),
            ),
            (ValueSet::Discrete(a), ValueSet::Discrete(b)) => Self::discrete(
                a.iter()
                    .filter(|value| b.binary_search(value).is_ok())
                    .cloned(),
            ),
        }
    }

    /// Values in either set.
    #[must_use]
    pub fn union(&self, other: &ValueSet) -> ValueSet {
        match (self, other) {
            (ValueSet::All, _) | (_, ValueSet::All) => ValueSet::All,
            (ValueSet::None, other) | (other, ValueSet::None) => other.clone(),
            (ValueSet::Discrete(a), ValueSet::Discrete(b)) => {
                Self::discrete(a.iter().chain(b.iter()).cloned())
            }
            (a, b) => Self::from_range_set(a.to_range_set().union(&b.to_range_set())),
        }
    }

    fn to_range_set(&self) -> SortedRangeSet {
        match self {
            ValueSet::All => SortedRangeSet::all(),
            ValueSet::None => SortedRangeSet::none(),
            ValueSet::Ranges(set) => set.clone(),
            ValueSet::Discrete(values) => SortedRangeSet::of(values.iter().cloned()),
        }
    }

    /// Every value mentioned by the set, for representation checks.
    pub(crate) fn mentioned_values(&self) -> Vec<&Value> {
        match self {
            ValueSet::All | ValueSet::None => Vec::new(),
            ValueSet::Ranges(set) => set.iter().flat_map(Range::bound_values).collect(),
            ValueSet::Discrete(values) => values.iter().collect(),
        }
    }
}
