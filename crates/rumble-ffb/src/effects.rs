//! FFB effect types

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{FfbError, FfbResult};

/// Types of force feedback effects
///
/// # Examples
///
/// ```
/// use rumble_ffb::EffectKind;
///
/// let kind = EffectKind::try_from(4)?;
/// assert_eq!(kind, EffectKind::Sine);
/// assert!(kind.is_periodic());
///
/// // Unknown tags are a configuration error, not a silent zero force
/// assert!(EffectKind::try_from(200).is_err());
/// # Ok::<(), rumble_ffb::FfbError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Constant,
    Ramp,
    Square,
    Sine,
    Triangle,
    SawtoothUp,
    SawtoothDown,
    Custom,
}

impl EffectKind {
    /// All supported kinds, in raw ID order.
    pub const ALL: [EffectKind; 8] = [
        EffectKind::Constant,
        EffectKind::Ramp,
        EffectKind::Square,
        EffectKind::Sine,
        EffectKind::Triangle,
        EffectKind::SawtoothUp,
        EffectKind::SawtoothDown,
        EffectKind::Custom,
    ];

    /// Raw ID used by the host for this kind.
    pub fn id(self) -> u8 {
        match self {
            EffectKind::Constant => EFFECT_ID_CONSTANT,
            EffectKind::Ramp => EFFECT_ID_RAMP,
            EffectKind::Square => EFFECT_ID_SQUARE,
            EffectKind::Sine => EFFECT_ID_SINE,
            EffectKind::Triangle => EFFECT_ID_TRIANGLE,
            EffectKind::SawtoothUp => EFFECT_ID_SAWTOOTH_UP,
            EffectKind::SawtoothDown => EFFECT_ID_SAWTOOTH_DOWN,
            EffectKind::Custom => EFFECT_ID_CUSTOM,
        }
    }

    /// Whether this kind is driven by [`PeriodicForce`] parameters.
    pub fn is_periodic(self) -> bool {
        matches!(
            self,
            EffectKind::Square
                | EffectKind::Sine
                | EffectKind::Triangle
                | EffectKind::SawtoothUp
                | EffectKind::SawtoothDown
        )
    }
}

impl TryFrom<u8> for EffectKind {
    type Error = FfbError;

    fn try_from(id: u8) -> FfbResult<Self> {
        EffectKind::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or(FfbError::UnknownEffectType(id))
    }
}

/// Length of one effect cycle.
///
/// # Examples
///
/// ```
/// use rumble_ffb::EffectDuration;
///
/// // Finite durations are truncated to whole seconds, never below one
/// assert_eq!(EffectDuration::from_millis(2_700).cycle_millis(), 2_000);
/// assert_eq!(EffectDuration::Finite(0).cycle_millis(), 1_000);
///
/// assert_eq!(EffectDuration::from_raw(u32::MAX), EffectDuration::Infinite);
/// assert_eq!(EffectDuration::Infinite.cycle_micros(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectDuration {
    /// Duration in microseconds.
    Finite(u32),
    /// Plays until stopped.
    Infinite,
}

impl Default for EffectDuration {
    fn default() -> Self {
        EffectDuration::Finite(0)
    }
}

impl EffectDuration {
    /// Decodes a raw host duration, where [`FF_INFINITE`] means unbounded.
    pub fn from_raw(micros: u32) -> Self {
        if micros == FF_INFINITE {
            EffectDuration::Infinite
        } else {
            EffectDuration::Finite(micros)
        }
    }

    pub fn from_millis(millis: u32) -> Self {
        EffectDuration::Finite(millis.saturating_mul(1_000))
    }

    /// Cycle length in microseconds, `None` when unbounded.
    ///
    /// Cycles are whole seconds with a floor of one second.
    pub fn cycle_micros(self) -> Option<u64> {
        match self {
            EffectDuration::Finite(micros) => {
                let secs = (u64::from(micros) / MICROS_PER_SECOND).max(1);
                Some(secs.saturating_mul(MICROS_PER_SECOND))
            }
            EffectDuration::Infinite => None,
        }
    }

    /// Cycle length in milliseconds as seen by the envelope and waveform stages.
    pub fn cycle_millis(self) -> u64 {
        match self.cycle_micros() {
            Some(micros) => micros / MICROS_PER_MILLI,
            None => INFINITE_CYCLE_MS,
        }
    }
}

/// Attack/fade shaping around the sustain level.
///
/// Levels are on the `0..=10000` scale, times in microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub attack_level: u32,
    pub attack_time_us: u32,
    pub fade_level: u32,
    pub fade_time_us: u32,
}

impl Envelope {
    pub fn new(attack_level: u32, attack_time_us: u32, fade_level: u32, fade_time_us: u32) -> Self {
        Self {
            attack_level,
            attack_time_us,
            fade_level,
            fade_time_us,
        }
    }
}

/// Constant force effect parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantForce {
    pub magnitude: i32,
}

impl ConstantForce {
    pub fn new(magnitude: i32) -> Self {
        Self { magnitude }
    }
}

/// Parameters shared by the square, sine, triangle and sawtooth waveforms.
///
/// # Examples
///
/// ```
/// use rumble_ffb::PeriodicForce;
///
/// // 10000 magnitude, 250 ms period, starting a quarter turn in
/// let wave = PeriodicForce::new(10_000, 250_000).with_phase(9_000);
/// assert_eq!(wave.period_millis(), 250);
/// assert_eq!(wave.phase_degrees(), 90);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicForce {
    /// Peak amplitude, `0..=10000`.
    pub magnitude: u32,
    /// Added to the shaped waveform.
    pub offset: i32,
    /// Phase in hundredths of a degree.
    pub phase: u32,
    /// Period in microseconds.
    pub period_us: u32,
}

impl PeriodicForce {
    pub fn new(magnitude: u32, period_us: u32) -> Self {
        Self {
            magnitude,
            offset: 0,
            phase: 0,
            period_us,
        }
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_phase(mut self, phase: u32) -> Self {
        self.phase = phase;
        self
    }

    /// Period in whole milliseconds, floored to one.
    pub fn period_millis(&self) -> u64 {
        (u64::from(self.period_us) / MICROS_PER_MILLI).max(1)
    }

    /// Phase in whole degrees.
    pub fn phase_degrees(&self) -> u64 {
        u64::from(self.phase) / 100
    }
}

/// Ramp force effect parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RampForce {
    pub start: i32,
    pub end: i32,
}

impl RampForce {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }
}

/// Pre-sampled two-channel force data.
///
/// Each sample carries a raw `[left, right]` pair that is played back at
/// most once per `sample_period_us`.
///
/// # Examples
///
/// ```
/// use rumble_ffb::CustomForce;
///
/// let custom = CustomForce::from_interleaved(&[100, -100, 200, -200], 10_000)?;
/// assert_eq!(custom.sample_count(), 2);
/// assert_eq!(custom.sample(1), Some([200, -200]));
/// assert_eq!(custom.sample(2), None);
/// # Ok::<(), rumble_ffb::FfbError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomForce {
    samples: Vec<[i32; 2]>,
    sample_period_us: u32,
}

impl CustomForce {
    pub fn new(samples: Vec<[i32; 2]>, sample_period_us: u32) -> FfbResult<Self> {
        let custom = Self {
            samples,
            sample_period_us,
        };
        custom.validate()?;
        Ok(custom)
    }

    /// Builds from host data laid out as `[l0, r0, l1, r1, ...]`.
    pub fn from_interleaved(data: &[i32], sample_period_us: u32) -> FfbResult<Self> {
        let (pairs, remainder) = data.as_chunks::<2>();
        if !remainder.is_empty() {
            return Err(FfbError::UnpairedCustomSamples(data.len()));
        }
        Self::new(pairs.to_vec(), sample_period_us)
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn sample(&self, index: usize) -> Option<[i32; 2]> {
        self.samples.get(index).copied()
    }

    pub fn sample_period_us(&self) -> u32 {
        self.sample_period_us
    }

    fn validate(&self) -> FfbResult<()> {
        if self.samples.is_empty() {
            return Err(FfbError::EmptyCustomForce);
        }
        Ok(())
    }
}

/// Type-specific parameter block as delivered by the host, before it is
/// paired with a type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForceBlock {
    Constant(ConstantForce),
    Periodic(PeriodicForce),
    Ramp(RampForce),
    Custom(CustomForce),
}

impl ForceBlock {
    fn name(&self) -> &'static str {
        match self {
            ForceBlock::Constant(_) => "constant",
            ForceBlock::Periodic(_) => "periodic",
            ForceBlock::Ramp(_) => "ramp",
            ForceBlock::Custom(_) => "custom",
        }
    }
}

/// One case per waveform family, each carrying its own parameters.
///
/// # Examples
///
/// ```
/// use rumble_ffb::{EffectForce, EffectKind, ForceBlock, PeriodicForce};
///
/// let force = EffectForce::from_parts(
///     EffectKind::Triangle,
///     ForceBlock::Periodic(PeriodicForce::new(5_000, 100_000)),
/// )?;
/// assert_eq!(force.kind(), EffectKind::Triangle);
/// # Ok::<(), rumble_ffb::FfbError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectForce {
    Constant(ConstantForce),
    Ramp(RampForce),
    Square(PeriodicForce),
    Sine(PeriodicForce),
    Triangle(PeriodicForce),
    SawtoothUp(PeriodicForce),
    SawtoothDown(PeriodicForce),
    Custom(CustomForce),
}

impl Default for EffectForce {
    fn default() -> Self {
        EffectForce::Constant(ConstantForce::default())
    }
}

impl EffectForce {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectForce::Constant(_) => EffectKind::Constant,
            EffectForce::Ramp(_) => EffectKind::Ramp,
            EffectForce::Square(_) => EffectKind::Square,
            EffectForce::Sine(_) => EffectKind::Sine,
            EffectForce::Triangle(_) => EffectKind::Triangle,
            EffectForce::SawtoothUp(_) => EffectKind::SawtoothUp,
            EffectForce::SawtoothDown(_) => EffectKind::SawtoothDown,
            EffectForce::Custom(_) => EffectKind::Custom,
        }
    }

    /// Pairs a type tag with its parameter block.
    ///
    /// # Errors
    ///
    /// [`FfbError::ParameterMismatch`] if the block does not belong to `kind`.
    pub fn from_parts(kind: EffectKind, block: ForceBlock) -> FfbResult<Self> {
        let force = match (kind, block) {
            (EffectKind::Constant, ForceBlock::Constant(p)) => EffectForce::Constant(p),
            (EffectKind::Ramp, ForceBlock::Ramp(p)) => EffectForce::Ramp(p),
            (EffectKind::Square, ForceBlock::Periodic(p)) => EffectForce::Square(p),
            (EffectKind::Sine, ForceBlock::Periodic(p)) => EffectForce::Sine(p),
            (EffectKind::Triangle, ForceBlock::Periodic(p)) => EffectForce::Triangle(p),
            (EffectKind::SawtoothUp, ForceBlock::Periodic(p)) => EffectForce::SawtoothUp(p),
            (EffectKind::SawtoothDown, ForceBlock::Periodic(p)) => EffectForce::SawtoothDown(p),
            (EffectKind::Custom, ForceBlock::Custom(p)) => EffectForce::Custom(p),
            (kind, block) => {
                return Err(FfbError::ParameterMismatch {
                    kind,
                    block: block.name(),
                });
            }
        };
        Ok(force)
    }

    /// Periodic parameters, if this is one of the periodic families.
    pub fn periodic(&self) -> Option<&PeriodicForce> {
        match self {
            EffectForce::Square(p)
            | EffectForce::Sine(p)
            | EffectForce::Triangle(p)
            | EffectForce::SawtoothUp(p)
            | EffectForce::SawtoothDown(p) => Some(p),
            _ => None,
        }
    }

    /// Custom sample data, if this is a custom force.
    pub fn custom(&self) -> Option<&CustomForce> {
        match self {
            EffectForce::Custom(custom) => Some(custom),
            _ => None,
        }
    }

    pub fn validate(&self) -> FfbResult<()> {
        match self {
            EffectForce::Custom(custom) => custom.validate(),
            _ => Ok(()),
        }
    }
}

/// Base parameters for all FFB effects
///
/// # Examples
///
/// ```
/// use rumble_ffb::{ConstantForce, EffectDuration, EffectForce, EffectKind, EffectParams};
///
/// let params = EffectParams::new(
///     EffectForce::Constant(ConstantForce::new(5_000)),
///     EffectDuration::from_millis(1_000),
/// )
/// .with_gain(7_500)
/// .with_start_delay(250_000);
///
/// assert_eq!(params.kind(), EffectKind::Constant);
/// assert_eq!(params.gain, 7_500);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectParams {
    pub force: EffectForce,
    pub duration: EffectDuration,
    /// Delay before the first cycle, in microseconds.
    #[serde(default)]
    pub start_delay_us: u32,
    /// Overall gain, `0..=10000`.
    #[serde(default = "default_gain")]
    pub gain: u32,
    #[serde(default)]
    pub envelope: Option<Envelope>,
}

fn default_gain() -> u32 {
    NOMINAL_MAX
}

impl EffectParams {
    pub fn new(force: EffectForce, duration: EffectDuration) -> Self {
        Self {
            force,
            duration,
            start_delay_us: 0,
            gain: NOMINAL_MAX,
            envelope: None,
        }
    }

    pub fn with_gain(mut self, gain: u32) -> Self {
        self.gain = gain;
        self
    }

    pub fn with_start_delay(mut self, start_delay_us: u32) -> Self {
        self.start_delay_us = start_delay_us;
        self
    }

    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    pub fn kind(&self) -> EffectKind {
        self.force.kind()
    }

    /// Checks the invariants evaluation relies on.
    ///
    /// # Errors
    ///
    /// [`FfbError::GainOutOfRange`] for gains above 10000, or the force's own
    /// validation error.
    pub fn validate(&self) -> FfbResult<()> {
        if self.gain > NOMINAL_MAX {
            return Err(FfbError::GainOutOfRange(self.gain));
        }
        self.force.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_id_round_trip() -> FfbResult<()> {
        for kind in EffectKind::ALL {
            assert_eq!(EffectKind::try_from(kind.id())?, kind);
        }
        Ok(())
    }

    #[test]
    fn test_unknown_kind() {
        assert_eq!(
            EffectKind::try_from(0),
            Err(FfbError::UnknownEffectType(0))
        );
        assert_eq!(
            EffectKind::try_from(8),
            Err(FfbError::UnknownEffectType(8))
        );
    }

    #[test]
    fn test_cycle_is_whole_seconds() {
        assert_eq!(EffectDuration::from_millis(1_000).cycle_millis(), 1_000);
        assert_eq!(EffectDuration::from_millis(1_999).cycle_millis(), 1_000);
        assert_eq!(EffectDuration::from_millis(500).cycle_millis(), 1_000);
        assert_eq!(EffectDuration::from_millis(3_000).cycle_micros(), Some(3_000_000));
        assert_eq!(EffectDuration::Infinite.cycle_millis(), INFINITE_CYCLE_MS);
    }

    #[test]
    fn test_period_floor() {
        assert_eq!(PeriodicForce::new(1, 0).period_millis(), 1);
        assert_eq!(PeriodicForce::new(1, 999).period_millis(), 1);
        assert_eq!(PeriodicForce::new(1, 20_500).period_millis(), 20);
    }

    #[test]
    fn test_from_parts_mismatch() {
        let result = EffectForce::from_parts(
            EffectKind::Constant,
            ForceBlock::Ramp(RampForce::new(1, 2)),
        );
        assert_eq!(
            result,
            Err(FfbError::ParameterMismatch {
                kind: EffectKind::Constant,
                block: "ramp",
            })
        );
    }

    #[test]
    fn test_from_parts_periodic_families() -> FfbResult<()> {
        let wave = PeriodicForce::new(1_000, 100_000);
        for kind in EffectKind::ALL.into_iter().filter(|k| k.is_periodic()) {
            let force = EffectForce::from_parts(kind, ForceBlock::Periodic(wave))?;
            assert_eq!(force.kind(), kind);
            assert_eq!(force.periodic(), Some(&wave));
        }
        Ok(())
    }

    #[test]
    fn test_custom_requires_samples() {
        assert_eq!(
            CustomForce::new(Vec::new(), 1_000),
            Err(FfbError::EmptyCustomForce)
        );
        assert_eq!(
            CustomForce::from_interleaved(&[1, 2, 3], 1_000),
            Err(FfbError::UnpairedCustomSamples(3))
        );
    }

    #[test]
    fn test_params_gain_validation() {
        let params = EffectParams::new(EffectForce::default(), EffectDuration::Infinite)
            .with_gain(10_001);
        assert_eq!(params.validate(), Err(FfbError::GainOutOfRange(10_001)));
    }

    #[test]
    fn test_deserialized_empty_custom_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let json = r#"{
            "force": { "type": "custom", "samples": [], "sample_period_us": 1000 },
            "duration": "infinite"
        }"#;
        let params: EffectParams = serde_json::from_str(json)?;
        assert_eq!(params.gain, NOMINAL_MAX);
        assert_eq!(params.validate(), Err(FfbError::EmptyCustomForce));
        Ok(())
    }
}
