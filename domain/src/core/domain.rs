//! Typed value domains.

use std::fmt;

use super::{types::ColumnType, value::Value, value_set::ValueSet};

/// Values a column may hold, plus whether null is among them.
///
/// `none` with nulls disallowed means nothing can match; `all` with nulls
/// allowed means no constraint; `none` with nulls allowed means only null.
#[derive(Clone, PartialEq, Eq)]
pub struct Domain {
    column_type: ColumnType,
    values: ValueSet,
    null_allowed: bool,
}

impl Domain {
    /// Creates a domain.
    ///
    /// # Panics
    ///
    /// Panics if any value in `values` does not use the representation of
    /// `column_type`.
    #[must_use]
    pub fn new(column_type: ColumnType, values: ValueSet, null_allowed: bool) -> Self {
        for value in values.mentioned_values() {
            column_type.check_value(value);
        }
        Self {
            column_type,
            values,
            null_allowed,
        }
    }

    /// Every value and null.
    #[must_use]
    pub fn all(column_type: ColumnType) -> Self {
        Self::new(column_type, ValueSet::All, true)
    }

    /// Nothing, not even null.
    #[must_use]
    pub fn none(column_type: ColumnType) -> Self {
        Self::new(column_type, ValueSet::None, false)
    }

    /// Only null.
    #[must_use]
    pub fn only_null(column_type: ColumnType) -> Self {
        Self::new(column_type, ValueSet::None, true)
    }

    /// Every non-null value.
    #[must_use]
    pub fn not_null(column_type: ColumnType) -> Self {
        Self::new(column_type, ValueSet::All, false)
    }

    /// Exactly `value`.
    #[must_use]
    pub fn single_value(column_type: ColumnType, value: Value) -> Self {
        Self::new(column_type, ValueSet::of([value]), false)
    }

    /// Any of `values`, without null.
    #[must_use]
    pub fn multiple_values<I>(column_type: ColumnType, values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::new(column_type, ValueSet::of(values), false)
    }

    /// Declared column type.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// The non-null part of the domain.
    #[must_use]
    pub fn values(&self) -> &ValueSet {
        &self.values
    }

    /// Whether null is permitted.
    #[must_use]
    pub fn is_null_allowed(&self) -> bool {
        self.null_allowed
    }

    /// Whether the domain places no constraint.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.values.is_all() && self.null_allowed
    }

    /// Whether nothing satisfies the domain.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.values.is_none() && !self.null_allowed
    }

    /// Whether only null satisfies the domain.
    #[must_use]
    pub fn is_only_null(&self) -> bool {
        self.values.is_none() && self.null_allowed
    }

    /// Whether exactly one non-null value and no null satisfy the domain.
    #[must_use]
    pub fn is_single_value(&self) -> bool {
        !self.null_allowed && self.values.is_single_value()
    }

    /// The only satisfying value, if the domain is a single value.
    #[must_use]
    pub fn single_value_of(&self) -> Option<&Value> {
        if self.null_allowed {
            return None;
        }
        self.values.single_value()
    }

    /// Whether a row holding `value` (`None` for null) satisfies the domain.
    ///
    /// # Panics
    ///
    /// Panics if `value` does not use this domain's representation.
    #[must_use]
    pub fn includes_null_or_value(&self, value: Option<&Value>) -> bool {
        match value {
            None => self.null_allowed,
            Some(value) => {
                self.column_type.check_value(value);
                self.values.contains_value(value)
            }
        }
    }

    /// Whether some value, or null, satisfies both domains.
    ///
    /// # Panics
    ///
    /// Panics if the domains use different value representations.
    #[must_use]
    pub fn overlaps(&self, other: &Domain) -> bool {
        self.check_compatible(other);
        (self.null_allowed && other.null_allowed) || self.values.overlaps(&other.values)
    }

    /// Values, and null, satisfying both domains.
    ///
    /// # Panics
    ///
    /// Panics if the domains use different value representations.
    #[must_use]
    pub fn intersect(&self, other: &Domain) -> Domain {
        self.check_compatible(other);
        Domain {
            column_type: self.column_type,
            values: self.values.intersect(&other.values),
            null_allowed: self.null_allowed && other.null_allowed,
        }
    }

    /// Values, and null, satisfying either domain.
    ///
    /// # Panics
    ///
    /// Panics if the domains use different value representations.
    #[must_use]
    pub fn union(&self, other: &Domain) -> Domain {
        self.check_compatible(other);
        Domain {
            column_type: self.column_type,
            values: self.values.union(&other.values),
            null_allowed: self.null_allowed || other.null_allowed,
        }
    }

    fn check_compatible(&self, other: &Domain) {
        assert!(
            self.column_type.value_kind() == other.column_type.value_kind(),
            "mismatched domain types: {} and {}",
            self.column_type,
            other.column_type
        );
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return write!(f, "Domain[{}: ALL]", self.column_type);
        }
        if self.is_none() {
            return write!(f, "Domain[{}: NONE]", self.column_type);
        }
        if self.is_only_null() {
            return write!(f, "Domain[{}: NULL]", self.column_type);
        }
        write!(
            f,
            "Domain[{}: {:?}{}]",
            self.column_type,
            self.values,
            if self.null_allowed { " OR NULL" } else { "" }
        )
    }
}
