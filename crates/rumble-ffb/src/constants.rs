//! FFB constants and limits

/// Maximum per-channel output level after scaling (rumble motor byte range).
pub const SCALE_MAX: i32 = 255;

/// Full scale for gain, envelope levels and nominal magnitudes (ten-thousandths).
pub const NOMINAL_MAX: u32 = 10_000;

/// Raw duration / iteration value hosts use to request unbounded playback.
pub const FF_INFINITE: u32 = u32::MAX;

/// Cycle length in milliseconds reported for effects with unbounded duration
pub const INFINITE_CYCLE_MS: u64 = u32::MAX as u64;

/// Envelope rates are expressed in percent.
pub const RATE_FULL: i64 = 100;

/// Degrees in one period of a periodic waveform
pub const DEGREES_PER_CYCLE: i64 = 360;

pub const MICROS_PER_MILLI: u64 = 1_000;
pub const MICROS_PER_SECOND: u64 = 1_000_000;

/// Maximum number of concurrent effects
pub const MAX_EFFECTS: usize = 16;

/// Raw effect IDs as sent by the host
pub const EFFECT_ID_CONSTANT: u8 = 1;
pub const EFFECT_ID_RAMP: u8 = 2;
pub const EFFECT_ID_SQUARE: u8 = 3;
pub const EFFECT_ID_SINE: u8 = 4;
pub const EFFECT_ID_TRIANGLE: u8 = 5;
pub const EFFECT_ID_SAWTOOTH_UP: u8 = 6;
pub const EFFECT_ID_SAWTOOTH_DOWN: u8 = 7;
pub const EFFECT_ID_CUSTOM: u8 = 11;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!(SCALE_MAX > 0);
        assert_eq!(NOMINAL_MAX, 10_000);
        assert_eq!(MICROS_PER_SECOND, MICROS_PER_MILLI * 1_000);
        assert!(MAX_EFFECTS > 0);
    }

    #[test]
    fn test_effect_ids_are_distinct() {
        let mut ids = [
            EFFECT_ID_CONSTANT,
            EFFECT_ID_RAMP,
            EFFECT_ID_SQUARE,
            EFFECT_ID_SINE,
            EFFECT_ID_TRIANGLE,
            EFFECT_ID_SAWTOOTH_UP,
            EFFECT_ID_SAWTOOTH_DOWN,
            EFFECT_ID_CUSTOM,
        ];
        ids.sort_unstable();
        let before = ids.len();
        let mut deduped = ids.to_vec();
        deduped.dedup();
        assert_eq!(before, deduped.len());
    }
}
