//! Native value representations and their total ordering.

use std::{cmp::Ordering, fmt};

use bytes::Bytes;

use super::types::ValueKind;

/// Microseconds in one millisecond.
pub const MICROSECONDS_PER_MILLISECOND: i64 = 1_000;
/// Picoseconds in one microsecond.
pub const PICOSECONDS_PER_MICROSECOND: i64 = 1_000_000;
/// Picoseconds in one millisecond.
pub const PICOSECONDS_PER_MILLISECOND: i64 = 1_000_000_000;

const TIME_ZONE_MASK: i64 = 0xFFF;
const MILLIS_SHIFT: u32 = 12;
const MAX_PACKABLE_MILLIS: i64 = (1 << 51) - 1;
const MIN_PACKABLE_MILLIS: i64 = -(1 << 51);

/// Identifier of a time zone inside packed timestamp-with-zone values.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeZoneKey(u16);

impl TimeZoneKey {
    /// The UTC zone.
    pub const UTC: TimeZoneKey = TimeZoneKey(0);

    /// Creates a zone key; only the low 12 bits are representable.
    ///
    /// # Panics
    ///
    /// Panics if `key` does not fit in 12 bits.
    #[must_use]
    pub fn new(key: u16) -> Self {
        assert!(
            i64::from(key) <= TIME_ZONE_MASK,
            "time zone key {key} does not fit in 12 bits"
        );
        Self(key)
    }

    /// Raw key.
    #[must_use]
    pub fn key(self) -> u16 {
        self.0
    }
}

/// Packs epoch milliseconds and a zone into the short timestamp-with-zone encoding.
///
/// Returns `None` when the milliseconds do not fit the 52-bit payload.
#[must_use]
pub fn pack_date_time_with_zone(epoch_millis: i64, zone: TimeZoneKey) -> Option<i64> {
    if !(MIN_PACKABLE_MILLIS..=MAX_PACKABLE_MILLIS).contains(&epoch_millis) {
        return None;
    }
    Some((epoch_millis << MILLIS_SHIFT) | (i64::from(zone.0) & TIME_ZONE_MASK))
}

/// Extracts the UTC epoch milliseconds of a packed timestamp-with-zone value.
#[must_use]
pub fn unpack_millis_utc(packed: i64) -> i64 {
    packed >> MILLIS_SHIFT
}

/// Extracts the zone of a packed timestamp-with-zone value.
#[must_use]
pub fn unpack_zone_key(packed: i64) -> TimeZoneKey {
    TimeZoneKey((packed & TIME_ZONE_MASK) as u16)
}

/// Timestamp with more than microsecond precision.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct LongTimestamp {
    epoch_micros: i64,
    picos_of_micro: u32,
}

impl LongTimestamp {
    /// Creates a timestamp from epoch microseconds and the sub-microsecond fraction.
    ///
    /// # Panics
    ///
    /// Panics if `picos_of_micro` is not below one microsecond.
    #[must_use]
    pub fn new(epoch_micros: i64, picos_of_micro: u32) -> Self {
        assert!(
            i64::from(picos_of_micro) < PICOSECONDS_PER_MICROSECOND,
            "picos_of_micro {picos_of_micro} out of range"
        );
        Self {
            epoch_micros,
            picos_of_micro,
        }
    }

    /// Microseconds since the epoch.
    #[must_use]
    pub fn epoch_micros(&self) -> i64 {
        self.epoch_micros
    }

    /// Picoseconds within the microsecond.
    #[must_use]
    pub fn picos_of_micro(&self) -> u32 {
        self.picos_of_micro
    }
}

/// Timestamp with time zone and more than millisecond precision.
///
/// Ordering and equality look at the UTC instant only; the zone is carried
/// for display purposes.
#[derive(Clone, Copy, Debug)]
pub struct LongTimestampWithTimeZone {
    epoch_millis: i64,
    picos_of_milli: u32,
    zone: TimeZoneKey,
}

impl LongTimestampWithTimeZone {
    /// Creates a value from UTC epoch milliseconds and the sub-millisecond fraction.
    ///
    /// # Panics
    ///
    /// Panics if `picos_of_milli` is not below one millisecond.
    #[must_use]
    pub fn from_epoch_millis_and_fraction(
        epoch_millis: i64,
        picos_of_milli: u32,
        zone: TimeZoneKey,
    ) -> Self {
        assert!(
            i64::from(picos_of_milli) < PICOSECONDS_PER_MILLISECOND,
            "picos_of_milli {picos_of_milli} out of range"
        );
        Self {
            epoch_millis,
            picos_of_milli,
            zone,
        }
    }

    /// UTC milliseconds since the epoch.
    #[must_use]
    pub fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }

    /// Picoseconds within the millisecond.
    #[must_use]
    pub fn picos_of_milli(&self) -> u32 {
        self.picos_of_milli
    }

    /// Zone the value was written in.
    #[must_use]
    pub fn zone(&self) -> TimeZoneKey {
        self.zone
    }
}

impl PartialEq for LongTimestampWithTimeZone {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LongTimestampWithTimeZone {}

impl PartialOrd for LongTimestampWithTimeZone {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LongTimestampWithTimeZone {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch_millis
            .cmp(&other.epoch_millis)
            .then(self.picos_of_milli.cmp(&other.picos_of_milli))
    }
}

/// Total order over doubles: `-0.0 < +0.0`, all NaNs are equal and sort last.
#[must_use]
pub fn float_compare(lhs: f64, rhs: f64) -> Ordering {
    match (lhs.is_nan(), rhs.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => lhs.total_cmp(&rhs),
    }
}

/// A non-null value in a column type's native comparison representation.
#[derive(Clone)]
pub enum Value {
    /// Boolean columns.
    Boolean(bool),
    /// Integers, dates, times, short decimals, short timestamps.
    Long(i64),
    /// Unscaled long decimals.
    Int128(i128),
    /// Raw bit pattern of a single-precision float.
    Real(i32),
    /// Double-precision float.
    Double(f64),
    /// Character and binary strings.
    Slice(Bytes),
    /// Timestamps finer than microseconds.
    LongTimestamp(LongTimestamp),
    /// Timestamps with zone finer than milliseconds.
    LongTimestampWithTimeZone(LongTimestampWithTimeZone),
}

impl Value {
    /// Stores `value` as its raw bit pattern.
    #[must_use]
    pub fn real(value: f32) -> Self {
        Value::Real(value.to_bits() as i32)
    }

    /// Wraps a byte string.
    #[must_use]
    pub fn slice<B>(bytes: B) -> Self
    where
        B: Into<Bytes>,
    {
        Value::Slice(bytes.into())
    }

    /// Representation tag of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Long(_) => ValueKind::Long,
            Value::Int128(_) => ValueKind::Int128,
            Value::Real(_) => ValueKind::Real,
            Value::Double(_) => ValueKind::Double,
            Value::Slice(_) => ValueKind::Slice,
            Value::LongTimestamp(_) => ValueKind::LongTimestamp,
            Value::LongTimestampWithTimeZone(_) => ValueKind::LongTimestampWithTimeZone,
        }
    }

    /// Returns the integer payload of a [`Value::Long`].
    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(value) => Some(*value),
            _ => None,
        }
    }

    /// Decodes the payload of a [`Value::Real`].
    #[must_use]
    pub fn as_real(&self) -> Option<f32> {
        match self {
            Value::Real(bits) => Some(f32::from_bits(*bits as u32)),
            _ => None,
        }
    }

    /// Returns the bytes of a [`Value::Slice`].
    #[must_use]
    pub fn as_slice(&self) -> Option<&[u8]> {
        match self {
            Value::Slice(bytes) => Some(bytes.as_ref()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Boolean(lhs), Value::Boolean(rhs)) => lhs.cmp(rhs),
            (Value::Long(lhs), Value::Long(rhs)) => lhs.cmp(rhs),
            (Value::Int128(lhs), Value::Int128(rhs)) => lhs.cmp(rhs),
            (Value::Real(lhs), Value::Real(rhs)) => float_compare(
                f64::from(f32::from_bits(*lhs as u32)),
                f64::from(f32::from_bits(*rhs as u32)),
            ),
            (Value::Double(lhs), Value::Double(rhs)) => float_compare(*lhs, *rhs),
            (Value::Slice(lhs), Value::Slice(rhs)) => lhs.as_ref().cmp(rhs.as_ref()),
            (Value::LongTimestamp(lhs), Value::LongTimestamp(rhs)) => lhs.cmp(rhs),
            (Value::LongTimestampWithTimeZone(lhs), Value::LongTimestampWithTimeZone(rhs)) => {
                lhs.cmp(rhs)
            }
            // Domains never mix kinds; keep the order total anyway.
            (lhs, rhs) => lhs.kind().cmp(&rhs.kind()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Long(value) => write!(f, "{value}"),
            Value::Int128(value) => write!(f, "{value}i128"),
            Value::Real(bits) => write!(f, "{}f32", f32::from_bits(*bits as u32)),
            Value::Double(value) => write!(f, "{value}f64"),
            Value::Slice(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => write!(f, "{text:?}"),
                Err(_) => write!(f, "{:?}", bytes.as_ref()),
            },
            Value::LongTimestamp(ts) => {
                write!(f, "{}us+{}ps", ts.epoch_micros, ts.picos_of_micro)
            }
            Value::LongTimestampWithTimeZone(ts) => write!(
                f,
                "{}ms+{}ps@{}",
                ts.epoch_millis,
                ts.picos_of_milli,
                ts.zone.key()
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Slice(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl From<LongTimestamp> for Value {
    fn from(value: LongTimestamp) -> Self {
        Value::LongTimestamp(value)
    }
}

impl From<LongTimestampWithTimeZone> for Value {
    fn from(value: LongTimestampWithTimeZone) -> Self {
        Value::LongTimestampWithTimeZone(value)
    }
}
