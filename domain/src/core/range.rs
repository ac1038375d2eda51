//! Value ranges and normalized range sets.
//!
//! A [`SortedRangeSet`] keeps its ranges sorted by lower bound with overlapping
//! and adjacent ranges merged, so overlap and containment checks only ever walk
//! each side once.

use std::{cmp::Ordering, ops::Bound};

use super::value::Value;

/// A contiguous run of values with owned, possibly unbounded, ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Range {
    low: Bound<Value>,
    high: Bound<Value>,
}

impl Range {
    /// Creates a range from explicit bounds.
    ///
    /// # Panics
    ///
    /// Panics if the bounds describe an empty range.
    #[must_use]
    pub fn new(low: Bound<Value>, high: Bound<Value>) -> Self {
        assert!(
            !is_empty_range(&low, &high),
            "range bounds {low:?}..{high:?} describe an empty range"
        );
        Self { low, high }
    }

    /// The unbounded range.
    #[must_use]
    pub fn all() -> Self {
        Self {
            low: Bound::Unbounded,
            high: Bound::Unbounded,
        }
    }

    /// `[value, value]`
    #[must_use]
    pub fn equal(value: Value) -> Self {
        Self {
            low: Bound::Included(value.clone()),
            high: Bound::Included(value),
        }
    }

    /// A range between two values with explicit inclusivity.
    #[must_use]
    pub fn between(low: Value, low_inclusive: bool, high: Value, high_inclusive: bool) -> Self {
        Self::new(
            bound(low, low_inclusive),
            bound(high, high_inclusive),
        )
    }

    /// `(value, +inf)`
    #[must_use]
    pub fn greater_than(value: Value) -> Self {
        Self::new(Bound::Excluded(value), Bound::Unbounded)
    }

    /// `[value, +inf)`
    #[must_use]
    pub fn greater_than_or_equal(value: Value) -> Self {
        Self::new(Bound::Included(value), Bound::Unbounded)
    }

    /// `(-inf, value)`
    #[must_use]
    pub fn less_than(value: Value) -> Self {
        Self::new(Bound::Unbounded, Bound::Excluded(value))
    }

    /// `(-inf, value]`
    #[must_use]
    pub fn less_than_or_equal(value: Value) -> Self {
        Self::new(Bound::Unbounded, Bound::Included(value))
    }

    /// Lower bound.
    #[must_use]
    pub fn low(&self) -> &Bound<Value> {
        &self.low
    }

    /// Upper bound.
    #[must_use]
    pub fn high(&self) -> &Bound<Value> {
        &self.high
    }

    /// Whether both ends are unbounded.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!((&self.low, &self.high), (Bound::Unbounded, Bound::Unbounded))
    }

    /// Whether the range holds exactly one value.
    #[must_use]
    pub fn is_single_value(&self) -> bool {
        self.single_value().is_some()
    }

    /// The only value of a `[v, v]` range.
    #[must_use]
    pub fn single_value(&self) -> Option<&Value> {
        match (&self.low, &self.high) {
            (Bound::Included(low), Bound::Included(high)) if low == high => Some(low),
            _ => None,
        }
    }

    /// Whether `value` lies inside the range.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        let above_low = match &self.low {
            Bound::Unbounded => true,
            Bound::Included(low) => value >= low,
            Bound::Excluded(low) => value > low,
        };
        above_low
            && match &self.high {
                Bound::Unbounded => true,
                Bound::Included(high) => value <= high,
                Bound::Excluded(high) => value < high,
            }
    }

    /// Whether the two ranges share at least one value.
    #[must_use]
    pub fn overlaps(&self, other: &Range) -> bool {
        let low = max_lower(&self.low, &other.low);
        let high = min_upper(&self.high, &other.high);
        !is_empty_range(low, high)
    }

    /// The values common to both ranges, if any.
    #[must_use]
    pub fn intersect(&self, other: &Range) -> Option<Range> {
        let low = max_lower(&self.low, &other.low);
        let high = min_upper(&self.high, &other.high);
        if is_empty_range(low, high) {
            return None;
        }
        Some(Range {
            low: low.clone(),
            high: high.clone(),
        })
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn span(&self, other: &Range) -> Range {
        let low = if cmp_lower(&self.low, &other.low) == Ordering::Greater {
            other.low.clone()
        } else {
            self.low.clone()
        };
        let high = if cmp_upper(&self.high, &other.high) == Ordering::Less {
            other.high.clone()
        } else {
            self.high.clone()
        };
        Range { low, high }
    }

    /// Values appearing in the bounds.
    pub(crate) fn bound_values(&self) -> impl Iterator<Item = &Value> {
        bound_value(&self.low)
            .into_iter()
            .chain(bound_value(&self.high))
    }
}

/// A normalized set of disjoint, sorted ranges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortedRangeSet {
    ranges: Vec<Range>,
}

impl SortedRangeSet {
    /// The empty set.
    #[must_use]
    pub fn none() -> Self {
        Self { ranges: Vec::new() }
    }

    /// The set containing every value.
    #[must_use]
    pub fn all() -> Self {
        Self {
            ranges: vec![Range::all()],
        }
    }

    /// Builds a set of single values.
    #[must_use]
    pub fn of<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::from_ranges(values.into_iter().map(Range::equal))
    }

    /// Sorts and merges overlapping or adjacent ranges.
    #[must_use]
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = Range>,
    {
        let mut ranges: Vec<Range> = ranges.into_iter().collect();
        ranges.sort_by(|a, b| cmp_lower(&a.low, &b.low));
        let mut merged: Vec<Range> = Vec::with_capacity(ranges.len());
        for range in ranges {
            if let Some(last) = merged.last_mut() {
                if overlaps_or_adjacent(&last.high, &range.low) {
                    if cmp_upper(&range.high, &last.high) == Ordering::Greater {
                        last.high = range.high;
                    }
                    continue;
                }
            }
            merged.push(range);
        }
        Self { ranges: merged }
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Whether the set covers every value.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.ranges.len() == 1 && self.ranges[0].is_all()
    }

    /// Whether the set holds exactly one value.
    #[must_use]
    pub fn is_single_value(&self) -> bool {
        self.single_value().is_some()
    }

    /// The only value of the set, if it has exactly one.
    #[must_use]
    pub fn single_value(&self) -> Option<&Value> {
        match self.ranges.as_slice() {
            [range] => range.single_value(),
            _ => None,
        }
    }

    /// Number of disjoint ranges.
    #[must_use]
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Iterates the ranges in ascending order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Range> {
        self.ranges.iter()
    }

    /// Ranges in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[Range] {
        &self.ranges
    }

    /// Smallest range covering the whole set.
    #[must_use]
    pub fn span(&self) -> Option<Range> {
        let first = self.ranges.first()?;
        let last = self.ranges.last()?;
        Some(first.span(last))
    }

    /// Whether `value` lies in any range.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.ranges.iter().any(|range| range.contains(value))
    }

    /// Whether the two sets share at least one value.
    #[must_use]
    pub fn overlaps(&self, other: &SortedRangeSet) -> bool {
        let (mut left, mut right) = (0, 0);
        while left < self.ranges.len() && right < other.ranges.len() {
            let a = &self.ranges[left];
            let b = &other.ranges[right];
            if a.overlaps(b) {
                return true;
            }
            if cmp_upper(&a.high, &b.high) == Ordering::Less {
                left += 1;
            } else {
                right += 1;
            }
        }
        false
    }

    /// Values in both sets.
    #[must_use]
    pub fn intersect(&self, other: &SortedRangeSet) -> SortedRangeSet {
        let mut out = Vec::new();
        let (mut left, mut right) = (0, 0);
        while left < self.ranges.len() && right < other.ranges.len() {
            let a = &self.ranges[left];
            let b = &other.ranges[right];
            if let Some(common) = a.intersect(b) {
                out.push(common);
            }
            if cmp_upper(&a.high, &b.high) == Ordering::Less {
                left += 1;
            } else {
                right += 1;
            }
        }
        SortedRangeSet { ranges: out }
    }

    /// Values in either set.
    #[must_use]
    pub fn union(&self, other: &SortedRangeSet) -> SortedRangeSet {
        if self.is_none() {
            return other.clone();
        }
        if other.is_none() {
            return self.clone();
        }
        SortedRangeSet::from_ranges(self.ranges.iter().chain(other.ranges.iter()).cloned())
    }
}

fn bound(value: Value, inclusive: bool) -> Bound<Value> {
    if inclusive {
        Bound::Included(value)
    } else {
        Bound::Excluded(value)
    }
}

fn bound_value(bound: &Bound<Value>) -> Option<&Value> {
    match bound {
        Bound::Included(value) | Bound::Excluded(value) => Some(value),
        Bound::Unbounded => None,
    }
}

// Lower bounds: Unbounded < Included(x) < Excluded(x) < Included(y) for x < y.
fn cmp_lower<K: Ord>(a: &Bound<K>, b: &Bound<K>) -> Ordering {
    match (a, b) {
        (Bound::Unbounded, Bound::Unbounded) => Ordering::Equal,
        (Bound::Unbounded, _) => Ordering::Less,
        (_, Bound::Unbounded) => Ordering::Greater,
        (Bound::Included(x), Bound::Excluded(y)) => x.cmp(y).then(Ordering::Less),
        (Bound::Excluded(x), Bound::Included(y)) => x.cmp(y).then(Ordering::Greater),
        (Bound::Included(x), Bound::Included(y)) | (Bound::Excluded(x), Bound::Excluded(y)) => {
            x.cmp(y)
        }
    }
}

// Upper bounds: Excluded(x) < Included(x) < Excluded(y) for x < y, Unbounded last.
fn cmp_upper<K: Ord>(a: &Bound<K>, b: &Bound<K>) -> Ordering {
    match (a, b) {
        (Bound::Unbounded, Bound::Unbounded) => Ordering::Equal,
        (Bound::Unbounded, _) => Ordering::Greater,
        (_, Bound::Unbounded) => Ordering::Less,
        (Bound::Included(x), Bound::Excluded(y)) => x.cmp(y).then(Ordering::Greater),
        (Bound::Excluded(x), Bound::Included(y)) => x.cmp(y).then(Ordering::Less),
        (Bound::Included(x), Bound::Included(y)) | (Bound::Excluded(x), Bound::Excluded(y)) => {
            x.cmp(y)
        }
    }
}

fn max_lower<'a, K: Ord>(a: &'a Bound<K>, b: &'a Bound<K>) -> &'a Bound<K> {
    if cmp_lower(a, b) == Ordering::Less {
        b
    } else {
        a
    }
}

fn min_upper<'a, K: Ord>(a: &'a Bound<K>, b: &'a Bound<K>) -> &'a Bound<K> {
    if cmp_upper(a, b) == Ordering::Greater {
        b
    } else {
        a
    }
}

// Whether a range ending at `end` touches or overlaps one starting at `start`.
fn overlaps_or_adjacent<K: Ord>(end: &Bound<K>, start: &Bound<K>) -> bool {
    match (end, start) {
        (Bound::Unbounded, _) | (_, Bound::Unbounded) => true,
        (Bound::Excluded(x), Bound::Excluded(y)) => x > y,
        (Bound::Included(x), Bound::Included(y))
        | (Bound::Included(x), Bound::Excluded(y))
        | (Bound::Excluded(x), Bound::Included(y)) => x >= y,
    }
}

fn is_empty_range<K: Ord>(low: &Bound<K>, high: &Bound<K>) -> bool {
    match (low, high) {
        (Bound::Unbounded, _) | (_, Bound::Unbounded) => false,
        (Bound::Included(a), Bound::Included(b)) => a > b,
        (Bound::Included(a), Bound::Excluded(b))
        | (Bound::Excluded(a), Bound::Included(b))
        | (Bound::Excluded(a), Bound::Excluded(b)) => a >= b,
    }
}
