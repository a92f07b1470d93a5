//! Envelope calculation
//!
//! Converts the position inside a cycle into a sustain rate plus the additive
//! attack and fade contributions. Times are whole milliseconds and all
//! division truncates.

use crate::constants::{MICROS_PER_MILLI, RATE_FULL};
use crate::effects::Envelope;

/// Blend factors for one instant of a cycle.
///
/// `normal_rate` is the percentage of the configured magnitude that survives;
/// `attack_level` and `fade_level` are already multiplied by their rates, so
/// the shaped magnitude is `(magnitude * normal_rate + attack_level + fade_level) / 100`.
///
/// `normal_rate` is not clamped and goes negative when the attack and fade
/// windows overlap inside a short cycle.
///
/// # Examples
///
/// ```
/// use rumble_ffb::{Envelope, EnvelopeShape};
///
/// // 200 ms attack from level 0, queried 50 ms in
/// let envelope = Envelope::new(0, 200_000, 0, 0);
/// let shape = EnvelopeShape::compute(1_000, 50, Some(&envelope));
/// assert_eq!(shape.normal_rate, 25);
/// assert_eq!(shape.apply(8_000), 2_000);
///
/// assert_eq!(EnvelopeShape::compute(1_000, 50, None), EnvelopeShape::FLAT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeShape {
    pub normal_rate: i64,
    pub attack_level: i64,
    pub fade_level: i64,
}

impl Default for EnvelopeShape {
    fn default() -> Self {
        Self::FLAT
    }
}

impl EnvelopeShape {
    /// Full strength, no shaping.
    pub const FLAT: Self = Self {
        normal_rate: RATE_FULL,
        attack_level: 0,
        fade_level: 0,
    };

    /// Computes the shape at `position_ms` within a cycle of `cycle_ms`.
    pub fn compute(cycle_ms: u64, position_ms: u64, envelope: Option<&Envelope>) -> Self {
        let Some(envelope) = envelope else {
            return Self::FLAT;
        };

        let attack_time = window_millis(envelope.attack_time_us);
        let attack_rate = if position_ms < attack_time {
            percent_of(attack_time.saturating_sub(position_ms), attack_time)
        } else {
            0
        };

        // Unsigned: a fade window longer than the cycle never starts.
        let fade_time = window_millis(envelope.fade_time_us);
        let fade_rate = match cycle_ms.checked_sub(fade_time) {
            Some(fade_pos) if fade_pos < position_ms => {
                percent_of(position_ms.saturating_sub(fade_pos), fade_time)
            }
            _ => 0,
        };

        Self {
            normal_rate: RATE_FULL.saturating_sub(attack_rate).saturating_sub(fade_rate),
            attack_level: i64::from(envelope.attack_level).saturating_mul(attack_rate),
            fade_level: i64::from(envelope.fade_level).saturating_mul(fade_rate),
        }
    }

    /// Shapes a raw magnitude.
    pub fn apply(&self, magnitude: i64) -> i64 {
        magnitude
            .saturating_mul(self.normal_rate)
            .saturating_add(self.attack_level)
            .saturating_add(self.fade_level)
            / RATE_FULL
    }
}

const PERCENT: u64 = 100;

fn window_millis(micros: u32) -> u64 {
    (u64::from(micros) / MICROS_PER_MILLI).max(1)
}

/// `part * 100 / whole`, with `whole >= 1`.
fn percent_of(part: u64, whole: u64) -> i64 {
    let rate = part.saturating_mul(PERCENT) / whole.max(1);
    i64::try_from(rate).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_envelope_is_flat() {
        for position in [0, 1, 500, 999] {
            assert_eq!(EnvelopeShape::compute(1_000, position, None), EnvelopeShape::FLAT);
        }
        assert_eq!(EnvelopeShape::FLAT.apply(1_234), 1_234);
    }

    #[test]
    fn test_attack_start_uses_attack_level() {
        let envelope = Envelope::new(3_000, 200_000, 0, 0);
        let shape = EnvelopeShape::compute(1_000, 0, Some(&envelope));
        assert_eq!(shape.normal_rate, 0);
        assert_eq!(shape.attack_level, 300_000);
        assert_eq!(shape.apply(10_000), 3_000);
    }

    #[test]
    fn test_attack_midway() {
        let envelope = Envelope::new(0, 200_000, 0, 0);
        let shape = EnvelopeShape::compute(1_000, 100, Some(&envelope));
        assert_eq!(shape.normal_rate, 50);
        assert_eq!(shape.apply(10_000), 5_000);
    }

    #[test]
    fn test_after_attack_is_sustain() {
        let envelope = Envelope::new(9_000, 200_000, 9_000, 200_000);
        let shape = EnvelopeShape::compute(1_000, 500, Some(&envelope));
        assert_eq!(shape, EnvelopeShape::FLAT);
    }

    #[test]
    fn test_fade_tail() {
        let envelope = Envelope::new(0, 0, 2_000, 200_000);
        // fade starts at 800 ms
        let shape = EnvelopeShape::compute(1_000, 900, Some(&envelope));
        assert_eq!(shape.normal_rate, 50);
        assert_eq!(shape.fade_level, 100_000);
        assert_eq!(shape.apply(10_000), 6_000);

        let at_start = EnvelopeShape::compute(1_000, 800, Some(&envelope));
        assert_eq!(at_start.fade_level, 0);
    }

    #[test]
    fn test_zero_times_floor_to_one_millisecond() {
        let envelope = Envelope::new(4_000, 0, 0, 0);
        let shape = EnvelopeShape::compute(1_000, 0, Some(&envelope));
        assert_eq!(shape.normal_rate, 0);
        assert_eq!(shape.apply(10_000), 4_000);

        let later = EnvelopeShape::compute(1_000, 1, Some(&envelope));
        assert_eq!(later.normal_rate, RATE_FULL);
    }

    #[test]
    fn test_overlapping_windows_go_negative() {
        let envelope = Envelope::new(0, 2_000_000, 0, 1_000_000);
        let shape = EnvelopeShape::compute(1_000, 500, Some(&envelope));
        // attack 75, fade 50
        assert_eq!(shape.normal_rate, -25);
        assert_eq!(shape.apply(10_000), -2_500);
    }

    #[test]
    fn test_percent_of_truncates() {
        assert_eq!(percent_of(0, 200), 0);
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(200, 200), RATE_FULL);
        assert_eq!(percent_of(5, 0), 500);
    }

    #[test]
    fn test_fade_longer_than_cycle_never_applies() {
        let envelope = Envelope::new(0, 0, 5_000, 2_000_000);
        let shape = EnvelopeShape::compute(1_000, 999, Some(&envelope));
        assert_eq!(shape.fade_level, 0);
        assert_eq!(shape.normal_rate, RATE_FULL);
    }
}
