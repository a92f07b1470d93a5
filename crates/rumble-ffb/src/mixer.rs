//! Output accumulation and the per-tick driver
//!
//! Every effect evaluated in a tick adds into one [`ChannelLevels`] buffer.
//! [`render_tick`] sweeps a set of effects sequentially over a buffer the
//! caller owns exclusively; [`EffectMixer`] wraps that sweep with a
//! fixed-capacity slot registry.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{MAX_EFFECTS, NOMINAL_MAX, SCALE_MAX};
use crate::effect::{Effect, PlayCount, TickOutcome};
use crate::effects::EffectParams;
use crate::error::{FfbError, FfbResult};
use crate::time::Timestamp;

/// Left and right motor levels.
///
/// # Examples
///
/// ```
/// use rumble_ffb::ChannelLevels;
///
/// let mut out = ChannelLevels::ZERO;
/// out.accumulate(ChannelLevels::from_nominal(6_000, 2_000));
/// out.accumulate(ChannelLevels::from_nominal(6_000, -1_000));
/// assert_eq!(out, ChannelLevels::new(306, 26));
///
/// // Caller-side clamp before handing levels to the device
/// assert_eq!(out.clamped(), ChannelLevels::new(255, 26));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelLevels {
    pub left: i32,
    pub right: i32,
}

impl ChannelLevels {
    pub const ZERO: Self = Self { left: 0, right: 0 };

    pub const fn new(left: i32, right: i32) -> Self {
        Self { left, right }
    }

    /// Scales nominal (`±10000`) levels into device range.
    pub fn from_nominal(left: i64, right: i64) -> Self {
        Self {
            left: scale_to_device(left),
            right: scale_to_device(right),
        }
    }

    /// Adds `other` channel by channel, saturating at `i32` bounds.
    pub fn accumulate(&mut self, other: ChannelLevels) {
        self.left = self.left.saturating_add(other.left);
        self.right = self.right.saturating_add(other.right);
    }

    /// Both channels limited to `[-SCALE_MAX, SCALE_MAX]`.
    pub fn clamped(self) -> Self {
        Self {
            left: self.left.clamp(-SCALE_MAX, SCALE_MAX),
            right: self.right.clamp(-SCALE_MAX, SCALE_MAX),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// `raw * SCALE_MAX / 10000`, clamped to `[-SCALE_MAX, SCALE_MAX]`.
pub fn scale_to_device(raw: i64) -> i32 {
    let scaled = raw.saturating_mul(i64::from(SCALE_MAX)) / i64::from(NOMINAL_MAX);
    let limit = i64::from(SCALE_MAX);
    i32::try_from(scaled.clamp(-limit, limit)).unwrap_or(0)
}

/// How the effects of one tick behaved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub contributed: usize,
    pub not_due: usize,
    pub idle: usize,
}

impl TickSummary {
    fn record(&mut self, outcome: TickOutcome) {
        let counter = match outcome {
            TickOutcome::Contributed(_) => &mut self.contributed,
            TickOutcome::NotDue => &mut self.not_due,
            TickOutcome::Idle => &mut self.idle,
        };
        *counter = counter.saturating_add(1);
    }
}

/// Evaluates `effects` in order at `now`, accumulating into `out`.
///
/// # Examples
///
/// ```
/// use rumble_ffb::{
///     ChannelLevels, ConstantForce, Effect, EffectDuration, EffectForce, EffectParams,
///     PlayCount, Timestamp, render_tick,
/// };
///
/// let params = EffectParams::new(
///     EffectForce::Constant(ConstantForce::new(2_000)),
///     EffectDuration::Infinite,
/// );
/// let mut effects = vec![Effect::new(params.clone())?, Effect::new(params)?];
/// effects[0].start(Timestamp::ZERO, PlayCount::Infinite);
///
/// let mut out = ChannelLevels::ZERO;
/// let summary = render_tick(&mut effects, Timestamp::from_secs(1), &mut out);
/// assert_eq!((summary.contributed, summary.idle), (1, 1));
/// assert_eq!(out, ChannelLevels::new(51, 51));
/// # Ok::<(), rumble_ffb::FfbError>(())
/// ```
pub fn render_tick<'a, I>(effects: I, now: Timestamp, out: &mut ChannelLevels) -> TickSummary
where
    I: IntoIterator<Item = &'a mut Effect>,
{
    let mut summary = TickSummary::default();
    for effect in effects {
        summary.record(effect.evaluate(now, out));
    }
    summary
}

/// Mixer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixerConfig {
    /// Number of effect slots.
    pub max_effects: usize,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            max_effects: MAX_EFFECTS,
        }
    }
}

/// Slot index of a registered effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectHandle(usize);

impl EffectHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Levels produced by one mixer tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MixedTick {
    /// Sum of all contributions, clamped to device range.
    pub levels: ChannelLevels,
    pub summary: TickSummary,
}

/// Fixed-capacity registry of effects sharing one output.
///
/// # Examples
///
/// ```
/// use rumble_ffb::{
///     ConstantForce, EffectDuration, EffectForce, EffectMixer, EffectParams, PlayCount,
///     Timestamp,
/// };
///
/// let mut mixer = EffectMixer::new();
/// let strong = mixer.add(EffectParams::new(
///     EffectForce::Constant(ConstantForce::new(8_000)),
///     EffectDuration::Infinite,
/// ))?;
/// let weak = mixer.add(EffectParams::new(
///     EffectForce::Constant(ConstantForce::new(4_000)),
///     EffectDuration::Infinite,
/// ))?;
/// mixer.start(strong, Timestamp::ZERO, PlayCount::Infinite)?;
/// mixer.start(weak, Timestamp::ZERO, PlayCount::Infinite)?;
///
/// // 204 + 102 saturates at the motor maximum
/// let tick = mixer.tick(Timestamp::from_secs(1));
/// assert_eq!(tick.levels.left, 255);
/// assert_eq!(tick.summary.contributed, 2);
/// # Ok::<(), rumble_ffb::FfbError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EffectMixer {
    config: MixerConfig,
    slots: Vec<Option<Effect>>,
}

impl EffectMixer {
    pub fn new() -> Self {
        Self::with_config(MixerConfig::default())
    }

    pub fn with_config(config: MixerConfig) -> Self {
        Self {
            config,
            slots: Vec::with_capacity(config.max_effects),
        }
    }

    pub fn capacity(&self) -> usize {
        self.config.max_effects
    }

    /// Number of registered effects.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a stopped effect in the first free slot.
    ///
    /// # Errors
    ///
    /// [`FfbError::SlotsExhausted`] when every slot is taken, or the
    /// validation error of `params`.
    pub fn add(&mut self, params: EffectParams) -> FfbResult<EffectHandle> {
        let kind = params.kind();
        let effect = Effect::new(params)?;
        let index = match self.slots.iter().position(Option::is_none) {
            Some(free) => free,
            None if self.slots.len() < self.config.max_effects => {
                self.slots.push(None);
                self.slots.len().saturating_sub(1)
            }
            None => {
                warn!(capacity = self.config.max_effects, "no free effect slot");
                return Err(FfbError::SlotsExhausted(self.config.max_effects));
            }
        };
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(FfbError::InvalidHandle(index))?;
        *slot = Some(effect);
        debug!(?kind, slot = index, "effect registered");
        Ok(EffectHandle(index))
    }

    /// Unregisters an effect, handing it back to the caller.
    pub fn remove(&mut self, handle: EffectHandle) -> FfbResult<Effect> {
        let effect = self
            .slots
            .get_mut(handle.0)
            .and_then(Option::take)
            .ok_or(FfbError::InvalidHandle(handle.0))?;
        debug!(kind = ?effect.kind(), slot = handle.0, "effect removed");
        Ok(effect)
    }

    pub fn get(&self, handle: EffectHandle) -> Option<&Effect> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, handle: EffectHandle) -> Option<&mut Effect> {
        self.slots.get_mut(handle.0).and_then(Option::as_mut)
    }

    pub fn start(
        &mut self,
        handle: EffectHandle,
        now: Timestamp,
        play_count: PlayCount,
    ) -> FfbResult<()> {
        self.get_mut(handle)
            .ok_or(FfbError::InvalidHandle(handle.0))?
            .start(now, play_count);
        Ok(())
    }

    pub fn stop(&mut self, handle: EffectHandle) -> FfbResult<()> {
        self.get_mut(handle)
            .ok_or(FfbError::InvalidHandle(handle.0))?
            .stop();
        Ok(())
    }

    pub fn stop_all(&mut self) {
        for effect in self.slots.iter_mut().flatten() {
            effect.stop();
        }
    }

    /// Evaluates every registered effect at `now`.
    pub fn tick(&mut self, now: Timestamp) -> MixedTick {
        let mut levels = ChannelLevels::ZERO;
        let summary = render_tick(self.slots.iter_mut().flatten(), now, &mut levels);
        MixedTick {
            levels: levels.clamped(),
            summary,
        }
    }
}
