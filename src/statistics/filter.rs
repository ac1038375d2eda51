use std::fmt;

/// Approximate set membership over a section's values.
///
/// A `false` answer must be definite; `true` may be a false positive.
pub trait MembershipFilter: fmt::Debug + Send + Sync {
    /// Tests an integer-valued key.
    fn test_long(&self, value: i64) -> bool;

    /// Tests a double-precision key.
    fn test_double(&self, value: f64) -> bool;

    /// Tests a single-precision key.
    fn test_float(&self, value: f32) -> bool;

    /// Tests a byte string key.
    fn test_bytes(&self, value: &[u8]) -> bool;
}
