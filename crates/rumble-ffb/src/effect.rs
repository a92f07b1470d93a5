//! Effect playback and evaluation
//!
//! An [`Effect`] pairs validated [`EffectParams`] with the mutable playback
//! state the host drives (start/stop) and the evaluator advances (custom
//! sample cursor). [`Effect::evaluate`] is the per-tick entry point: it gates
//! on the active window, runs the envelope and waveform stages, scales the
//! result into device range and adds it to the caller's accumulator.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::constants::{FF_INFINITE, INFINITE_CYCLE_MS, MICROS_PER_MILLI};
use crate::effects::{CustomForce, EffectForce, EffectKind, EffectParams};
use crate::envelope::EnvelopeShape;
use crate::error::FfbResult;
use crate::mixer::ChannelLevels;
use crate::time::Timestamp;
use crate::waveform;

/// Whether the host has the effect running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
}

/// Number of cycles to play.
///
/// # Examples
///
/// ```
/// use rumble_ffb::PlayCount;
///
/// assert_eq!(PlayCount::from_raw(3), PlayCount::Times(3));
/// assert_eq!(PlayCount::from_raw(u32::MAX), PlayCount::Infinite);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayCount {
    Times(u32),
    Infinite,
}

impl Default for PlayCount {
    fn default() -> Self {
        PlayCount::Times(0)
    }
}

impl PlayCount {
    /// Decodes a raw host iteration count, where [`FF_INFINITE`] means forever.
    pub fn from_raw(iterations: u32) -> Self {
        if iterations == FF_INFINITE {
            PlayCount::Infinite
        } else {
            PlayCount::Times(iterations)
        }
    }
}

/// Mutable per-effect playback state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    /// When the effect was last (re)started.
    pub start_time: Timestamp,
    pub play_count: PlayCount,
    /// Next custom sample to play, always below the sample count.
    pub sample_index: usize,
    /// When the custom cursor last advanced.
    pub last_sample_time: Option<Timestamp>,
}

/// Span of host time in which an effect contributes output, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow {
    pub begin: Timestamp,
    /// [`Timestamp::MAX`] when unbounded.
    pub end: Timestamp,
}

impl ActiveWindow {
    pub fn contains(&self, now: Timestamp) -> bool {
        self.begin <= now && now <= self.end
    }

    pub fn is_unbounded(&self) -> bool {
        self.end == Timestamp::MAX
    }
}

/// Result of evaluating one effect for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Levels were added to the accumulator.
    Contributed(ChannelLevels),
    /// Custom force whose sample period has not elapsed yet.
    NotDue,
    /// Stopped or outside the active window; nothing changed.
    Idle,
}

/// A configured haptic effect with its playback state.
///
/// # Examples
///
/// ```
/// use rumble_ffb::{
///     ChannelLevels, ConstantForce, Effect, EffectDuration, EffectForce, EffectParams,
///     PlayCount, TickOutcome, Timestamp,
/// };
///
/// let params = EffectParams::new(
///     EffectForce::Constant(ConstantForce::new(5_000)),
///     EffectDuration::from_millis(1_000),
/// );
/// let mut effect = Effect::new(params)?;
/// effect.start(Timestamp::from_secs(10), PlayCount::Times(1));
///
/// let mut out = ChannelLevels::ZERO;
/// let outcome = effect.evaluate(Timestamp::from_millis(10_500), &mut out);
/// assert_eq!(outcome, TickOutcome::Contributed(ChannelLevels::new(127, 127)));
/// assert_eq!(out, ChannelLevels::new(127, 127));
/// # Ok::<(), rumble_ffb::FfbError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    params: EffectParams,
    state: PlaybackState,
}

impl Effect {
    /// Creates a stopped effect with zeroed playback state.
    ///
    /// # Errors
    ///
    /// Returns the validation error of `params`.
    pub fn new(params: EffectParams) -> FfbResult<Self> {
        params
            .validate()
            .inspect_err(|e| warn!(kind = ?params.kind(), "rejected effect parameters: {e}"))?;
        Ok(Self {
            params,
            state: PlaybackState::default(),
        })
    }

    pub fn params(&self) -> &EffectParams {
        &self.params
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn kind(&self) -> EffectKind {
        self.params.kind()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.state.status
    }

    /// Replaces the parameters while keeping playback running.
    ///
    /// The custom cursor is rewound if it would fall outside the new sample set.
    ///
    /// # Errors
    ///
    /// Returns the validation error of `params`; the effect is left unchanged.
    pub fn set_params(&mut self, params: EffectParams) -> FfbResult<()> {
        params
            .validate()
            .inspect_err(|e| warn!(kind = ?params.kind(), "rejected effect parameters: {e}"))?;
        let sample_count = params.force.custom().map_or(0, CustomForce::sample_count);
        if self.state.sample_index >= sample_count {
            self.state.sample_index = 0;
        }
        debug!(kind = ?params.kind(), "effect parameters updated");
        self.params = params;
        Ok(())
    }

    /// Starts (or restarts) playback at `now`.
    pub fn start(&mut self, now: Timestamp, play_count: PlayCount) {
        self.state = PlaybackState {
            status: PlaybackStatus::Playing,
            start_time: now,
            play_count,
            sample_index: 0,
            last_sample_time: None,
        };
        debug!(kind = ?self.kind(), ?play_count, start_us = now.as_micros(), "effect started");
    }

    pub fn stop(&mut self) {
        self.state.status = PlaybackStatus::Stopped;
        debug!(kind = ?self.kind(), "effect stopped");
    }

    /// Host-time window in which the current playback contributes.
    pub fn active_window(&self) -> ActiveWindow {
        // Delay is honored to the microsecond, not truncated to whole seconds.
        let begin = self
            .state
            .start_time
            .saturating_add_micros(u64::from(self.params.start_delay_us));
        let end = match (self.params.duration.cycle_micros(), self.state.play_count) {
            (_, PlayCount::Times(0)) => begin,
            (Some(cycle), PlayCount::Times(count)) => {
                begin.saturating_add_micros(cycle.saturating_mul(u64::from(count)))
            }
            _ => Timestamp::MAX,
        };
        ActiveWindow { begin, end }
    }

    /// Playing, but past the end of its last cycle.
    pub fn is_finished(&self, now: Timestamp) -> bool {
        self.state.status == PlaybackStatus::Playing && now > self.active_window().end
    }

    /// Evaluates the effect at `now` and adds its levels to `out`.
    pub fn evaluate(&mut self, now: Timestamp, out: &mut ChannelLevels) -> TickOutcome {
        if self.state.status != PlaybackStatus::Playing {
            return TickOutcome::Idle;
        }
        let window = self.active_window();
        if !window.contains(now) {
            return TickOutcome::Idle;
        }
        let Some(elapsed) = now.micros_since(window.begin) else {
            return TickOutcome::Idle;
        };

        let cycle_ms = self.params.duration.cycle_millis();
        let position_ms = match self.params.duration.cycle_micros() {
            Some(cycle) => (elapsed % cycle) / MICROS_PER_MILLI,
            None => (elapsed / MICROS_PER_MILLI).min(INFINITE_CYCLE_MS),
        };
        let shape = EnvelopeShape::compute(cycle_ms, position_ms, self.params.envelope.as_ref());

        let Self { params, state } = self;
        let contribution = match &params.force {
            EffectForce::Custom(custom) if custom.sample_count() == 0 => {
                return TickOutcome::Idle;
            }
            EffectForce::Custom(custom) => {
                match next_custom_sample(custom, state, params.gain, now, &shape) {
                    Some(levels) => levels,
                    None => return TickOutcome::NotDue,
                }
            }
            force => {
                let Some(level) =
                    waveform::synthesize(force, params.gain, cycle_ms, position_ms, &shape)
                else {
                    return TickOutcome::Idle;
                };
                // Standard effects drive both motors as one.
                let level = level.saturating_abs();
                ChannelLevels::from_nominal(level, level)
            }
        };

        out.accumulate(contribution);
        TickOutcome::Contributed(contribution)
    }
}

/// Plays the sample under the cursor if its period has elapsed, then advances.
fn next_custom_sample(
    custom: &CustomForce,
    state: &mut PlaybackState,
    gain: u32,
    now: Timestamp,
    shape: &EnvelopeShape,
) -> Option<ChannelLevels> {
    let period = u64::from(custom.sample_period_us());
    let due = state
        .last_sample_time
        .is_none_or(|last| now.micros_since(last).is_some_and(|since| since >= period));
    if !due {
        trace!(index = state.sample_index, "custom sample not yet due");
        return None;
    }

    let count = custom.sample_count();
    let index = state.sample_index.checked_rem(count)?;
    let [left, right] = custom.sample(index)?;
    let left = waveform::apply_gain(shape.apply(i64::from(left)), gain);
    let right = waveform::apply_gain(shape.apply(i64::from(right)), gain);

    state.sample_index = index.saturating_add(1).checked_rem(count).unwrap_or(0);
    state.last_sample_time = Some(now);
    Some(ChannelLevels::from_nominal(left, right))
}
