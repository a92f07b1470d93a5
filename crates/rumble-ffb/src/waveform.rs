//! Waveform synthesis
//!
//! Turns an effect's parameters and envelope shape into one signed level for
//! the current instant. Everything except the sine family is integer math
//! with truncating division, so outputs are bit-exact across platforms.

use std::f64::consts::PI;

use tracing::trace;

use crate::constants::{DEGREES_PER_CYCLE, NOMINAL_MAX, RATE_FULL};
use crate::effects::{EffectForce, PeriodicForce, RampForce};
use crate::envelope::EnvelopeShape;

const QUARTER_TURN: i64 = DEGREES_PER_CYCLE / 4;
const HALF_TURN: i64 = DEGREES_PER_CYCLE / 2;

/// Computes the gain-scaled level of a parametric effect.
///
/// Returns `None` for custom forces, which play raw samples instead of a
/// synthesized waveform.
///
/// # Examples
///
/// ```
/// use rumble_ffb::{ConstantForce, EffectForce, EnvelopeShape, waveform};
///
/// let force = EffectForce::Constant(ConstantForce::new(5_000));
/// let level = waveform::synthesize(&force, 5_000, 1_000, 500, &EnvelopeShape::FLAT);
/// assert_eq!(level, Some(2_500));
/// ```
pub fn synthesize(
    force: &EffectForce,
    gain: u32,
    cycle_ms: u64,
    position_ms: u64,
    shape: &EnvelopeShape,
) -> Option<i64> {
    let magnitude = shaped_magnitude(force, cycle_ms, position_ms, shape)?;
    let level = apply_gain(magnitude, gain);
    trace!(kind = ?force.kind(), position_ms, magnitude, level, "synthesized level");
    Some(level)
}

/// Envelope-shaped magnitude before gain.
pub fn shaped_magnitude(
    force: &EffectForce,
    cycle_ms: u64,
    position_ms: u64,
    shape: &EnvelopeShape,
) -> Option<i64> {
    let magnitude = match force {
        EffectForce::Constant(constant) => shape.apply(i64::from(constant.magnitude)),
        EffectForce::Ramp(ramp) => shape.apply(ramp_magnitude(ramp, cycle_ms, position_ms)),
        EffectForce::Square(wave) => periodic(wave, position_ms, shape, square),
        EffectForce::Sine(wave) => periodic(wave, position_ms, shape, sine),
        EffectForce::Triangle(wave) => periodic(wave, position_ms, shape, triangle),
        EffectForce::SawtoothUp(wave) => periodic(wave, position_ms, shape, sawtooth_up),
        EffectForce::SawtoothDown(wave) => periodic(wave, position_ms, shape, sawtooth_down),
        EffectForce::Custom(_) => return None,
    };
    Some(magnitude)
}

/// Scales a level by a ten-thousandths gain.
pub fn apply_gain(level: i64, gain: u32) -> i64 {
    level.saturating_mul(i64::from(gain)) / i64::from(NOMINAL_MAX)
}

/// Waveform angle in whole degrees (`0..360`) at `position_ms`.
///
/// # Examples
///
/// ```
/// use rumble_ffb::{PeriodicForce, waveform};
///
/// let wave = PeriodicForce::new(10_000, 1_000_000);
/// assert_eq!(waveform::phase_angle(&wave, 600), 216);
/// assert_eq!(waveform::phase_angle(&wave.with_phase(18_000), 600), 36);
/// ```
pub fn phase_angle(wave: &PeriodicForce, position_ms: u64) -> i64 {
    let period = wave.period_millis();
    let turns = DEGREES_PER_CYCLE.unsigned_abs();
    let angle = ((position_ms % period).saturating_mul(turns) / period)
        .saturating_add(wave.phase_degrees())
        % turns;
    i64::try_from(angle).unwrap_or(0)
}

fn periodic(
    wave: &PeriodicForce,
    position_ms: u64,
    shape: &EnvelopeShape,
    waveshape: fn(i64, i64) -> i64,
) -> i64 {
    let amplitude = shape.apply(i64::from(wave.magnitude));
    waveshape(amplitude, phase_angle(wave, position_ms)).saturating_add(i64::from(wave.offset))
}

fn square(amplitude: i64, angle: i64) -> i64 {
    if angle >= HALF_TURN {
        amplitude.saturating_neg()
    } else {
        amplitude
    }
}

fn sine(amplitude: i64, angle: i64) -> i64 {
    let radians = angle as f64 * PI / HALF_TURN as f64;
    (amplitude as f64 * radians.sin()) as i64
}

fn triangle(amplitude: i64, angle: i64) -> i64 {
    match angle {
        0..90 => amplitude.saturating_neg().saturating_mul(QUARTER_TURN - angle) / QUARTER_TURN,
        90..180 => amplitude.saturating_mul(angle - QUARTER_TURN) / QUARTER_TURN,
        180..270 => amplitude.saturating_mul(QUARTER_TURN - (angle - HALF_TURN)) / QUARTER_TURN,
        270..360 => amplitude.saturating_neg().saturating_mul(angle - 270) / QUARTER_TURN,
        _ => amplitude,
    }
}

fn sawtooth_up(amplitude: i64, angle: i64) -> i64 {
    if angle < HALF_TURN {
        amplitude.saturating_neg().saturating_mul(HALF_TURN - angle) / HALF_TURN
    } else {
        amplitude.saturating_mul(angle - HALF_TURN) / HALF_TURN
    }
}

fn sawtooth_down(amplitude: i64, angle: i64) -> i64 {
    if angle < HALF_TURN {
        amplitude.saturating_mul(HALF_TURN - angle) / HALF_TURN
    } else {
        amplitude.saturating_neg().saturating_mul(angle - HALF_TURN) / HALF_TURN
    }
}

fn ramp_magnitude(ramp: &RampForce, cycle_ms: u64, position_ms: u64) -> i64 {
    let cycle = cycle_ms.max(1);
    let remaining = cycle.saturating_sub(position_ms).saturating_mul(100) / cycle;
    let rate = i64::try_from(remaining).unwrap_or(RATE_FULL);
    i64::from(ramp.start)
        .saturating_mul(rate)
        .saturating_add(i64::from(ramp.end).saturating_mul(RATE_FULL - rate))
        / RATE_FULL
}
