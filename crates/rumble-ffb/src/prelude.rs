//! Convenience re-exports for hosts driving effects.

pub use crate::constants::{NOMINAL_MAX, SCALE_MAX};
pub use crate::effect::{Effect, PlayCount, PlaybackStatus, TickOutcome};
pub use crate::effects::{
    ConstantForce, CustomForce, EffectDuration, EffectForce, EffectKind, EffectParams, Envelope,
    PeriodicForce, RampForce,
};
pub use crate::error::{FfbError, FfbResult};
pub use crate::mixer::{ChannelLevels, EffectHandle, EffectMixer, MixerConfig, render_tick};
pub use crate::time::Timestamp;
