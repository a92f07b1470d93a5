//! Host-supplied time.
//!
//! The engine never reads a clock. Every evaluation receives the current
//! [`Timestamp`] from the caller, which keeps ticks deterministic.

use serde::{Deserialize, Serialize};

use crate::constants::{MICROS_PER_MILLI, MICROS_PER_SECOND};

/// Absolute time on the host clock, in microseconds.
///
/// # Examples
///
/// ```
/// use rumble_ffb::Timestamp;
///
/// let t = Timestamp::from_secs(2).saturating_add_micros(500_000);
/// assert_eq!(t.as_micros(), 2_500_000);
/// assert_eq!(t.micros_since(Timestamp::from_secs(2)), Some(500_000));
/// assert_eq!(Timestamp::ZERO.micros_since(t), None);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The clock origin.
    pub const ZERO: Self = Self(0);

    /// Latest representable time; used as the end of unbounded windows.
    pub const MAX: Self = Self(u64::MAX);

    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(MICROS_PER_MILLI))
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(MICROS_PER_SECOND))
    }

    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// Advances by `micros`, pinning at [`Timestamp::MAX`].
    pub const fn saturating_add_micros(self, micros: u64) -> Self {
        Self(self.0.saturating_add(micros))
    }

    /// Microseconds elapsed since `earlier`, or `None` if `earlier` is in the future.
    pub const fn micros_since(self, earlier: Self) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }
}
