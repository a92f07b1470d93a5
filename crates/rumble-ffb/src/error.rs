//! Configuration errors for effect setup.
//!
//! Evaluation itself never fails; every error here is raised while an effect
//! is being built, reconfigured or registered.

use crate::effects::EffectKind;

/// Error type for effect configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FfbError {
    /// The host sent an effect type tag this engine does not know.
    #[error("Unknown effect type id {0}")]
    UnknownEffectType(u8),

    /// The type tag and the supplied parameter block disagree.
    #[error("Effect type {kind:?} cannot be built from {block} parameters")]
    ParameterMismatch {
        /// Requested effect type
        kind: EffectKind,
        /// Name of the parameter block that was supplied
        block: &'static str,
    },

    /// Gain outside `[0, 10000]`.
    #[error("Gain {0} is out of range [0, 10000]")]
    GainOutOfRange(u32),

    /// Custom force with no samples to play.
    #[error("Custom force requires at least one sample")]
    EmptyCustomForce,

    /// Interleaved custom data that does not split into left/right pairs.
    #[error("Custom force data has {0} values, expected an even count for two channels")]
    UnpairedCustomSamples(usize),

    /// Every mixer slot is occupied.
    #[error("Effect slots exhausted (capacity {0})")]
    SlotsExhausted(usize),

    /// No effect is registered under the handle.
    #[error("No effect registered for handle {0}")]
    InvalidHandle(usize),
}

/// A specialized `Result` type for effect configuration.
pub type FfbResult<T> = std::result::Result<T, FfbError>;
