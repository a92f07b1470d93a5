//! Force feedback effect synthesis for dual-motor controllers
//!
//! This crate turns force feedback effects (constant, periodic, ramp and
//! custom-sampled forces) into left/right motor levels, one sampling tick at
//! a time.
//!
//! # Pipeline
//!
//! For each tick the host calls [`Effect::evaluate`] (or [`render_tick`] /
//! [`EffectMixer::tick`] for a whole set of effects) with the current
//! [`Timestamp`]:
//!
//! 1. **Time gate**: the effect contributes only while playing and inside
//!    its [`ActiveWindow`] (start delay, cycle length, play count).
//! 2. **Envelope**: [`EnvelopeShape`] blends attack and fade levels into the
//!    sustain magnitude.
//! 3. **Waveform**: [`waveform::synthesize`] applies the effect's shape and
//!    gain. Custom forces skip this and play their next raw sample pair.
//! 4. **Scaling**: levels are mapped into `[-SCALE_MAX, SCALE_MAX]` and added
//!    to the caller's [`ChannelLevels`].
//!
//! All arithmetic except the sine family is truncating integer math, so
//! outputs are exact and reproducible.
//!
//! # Example
//!
//! ```
//! use rumble_ffb::prelude::*;
//!
//! let wave = PeriodicForce::new(10_000, 1_000_000);
//! let params = EffectParams::new(EffectForce::Square(wave), EffectDuration::from_millis(1_000));
//!
//! let mut mixer = EffectMixer::new();
//! let handle = mixer.add(params)?;
//! mixer.start(handle, Timestamp::ZERO, PlayCount::Times(1))?;
//!
//! let tick = mixer.tick(Timestamp::from_millis(600));
//! assert_eq!(tick.levels, ChannelLevels::new(SCALE_MAX, SCALE_MAX));
//!
//! // Past the single cycle nothing plays
//! assert!(mixer.tick(Timestamp::from_millis(1_001)).levels.is_zero());
//! # Ok::<(), rumble_ffb::FfbError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod constants;
pub mod effect;
pub mod effects;
pub mod envelope;
pub mod error;
pub mod mixer;
pub mod prelude;
pub mod time;
pub mod waveform;

pub use constants::*;
pub use effect::{ActiveWindow, Effect, PlayCount, PlaybackState, PlaybackStatus, TickOutcome};
pub use effects::*;
pub use envelope::EnvelopeShape;
pub use error::{FfbError, FfbResult};
pub use mixer::{
    ChannelLevels, EffectHandle, EffectMixer, MixedTick, MixerConfig, TickSummary, render_tick,
    scale_to_device,
};
pub use time::Timestamp;
