//! Snapshot tests for waveform tables using insta.
//!
//! Tables are sampled every 30 degrees of a 360 ms period, so each entry is
//! the exact integer the synthesizer produces at that angle.

use rumble_ffb::{
    ChannelLevels, ConstantForce, Effect, EffectDuration, EffectForce, EffectParams, Envelope,
    EnvelopeShape, PeriodicForce, PlayCount, Timestamp, waveform,
};

fn wave() -> PeriodicForce {
    PeriodicForce::new(10_000, 360_000)
}

fn table(force: &EffectForce) -> String {
    (0..360)
        .step_by(30)
        .map(|position| {
            waveform::shaped_magnitude(force, 1_000, position, &EnvelopeShape::FLAT)
                .map_or_else(|| "-".to_string(), |v| v.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn snapshot_square_table() {
    insta::assert_snapshot!(
        table(&EffectForce::Square(wave())),
        @"10000 10000 10000 10000 10000 10000 -10000 -10000 -10000 -10000 -10000 -10000"
    );
}

#[test]
fn snapshot_sine_table() {
    insta::assert_snapshot!(
        table(&EffectForce::Sine(wave())),
        @"0 4999 8660 10000 8660 4999 0 -5000 -8660 -10000 -8660 -5000"
    );
}

#[test]
fn snapshot_triangle_table() {
    insta::assert_snapshot!(
        table(&EffectForce::Triangle(wave())),
        @"-10000 -6666 -3333 0 3333 6666 10000 6666 3333 0 -3333 -6666"
    );
}

#[test]
fn snapshot_sawtooth_up_table() {
    insta::assert_snapshot!(
        table(&EffectForce::SawtoothUp(wave())),
        @"-10000 -8333 -6666 -5000 -3333 -1666 0 1666 3333 5000 6666 8333"
    );
}

#[test]
fn snapshot_sawtooth_down_table() {
    insta::assert_snapshot!(
        table(&EffectForce::SawtoothDown(wave())),
        @"10000 8333 6666 5000 3333 1666 0 -1666 -3333 -5000 -6666 -8333"
    );
}

#[test]
fn snapshot_sine_device_levels() -> Result<(), Box<dyn std::error::Error>> {
    let params = EffectParams::new(EffectForce::Sine(wave()), EffectDuration::Infinite);
    let mut effect = Effect::new(params)?;
    effect.start(Timestamp::ZERO, PlayCount::Infinite);

    let levels = (0..360)
        .step_by(30)
        .map(|ms| {
            let mut out = ChannelLevels::ZERO;
            effect.evaluate(Timestamp::from_millis(ms), &mut out);
            out.left.to_string()
        })
        .collect::<Vec<_>>()
        .join(" ");
    insta::assert_snapshot!(levels, @"0 127 220 255 220 127 0 127 220 255 220 127");
    Ok(())
}

#[test]
fn snapshot_enveloped_constant() {
    let envelope = Envelope::new(2_000, 250_000, 0, 250_000);
    let force = EffectForce::Constant(ConstantForce::new(10_000));
    let levels = (0..1_000)
        .step_by(125)
        .map(|position| {
            let shape = EnvelopeShape::compute(1_000, position, Some(&envelope));
            let level = waveform::shaped_magnitude(&force, 1_000, position, &shape);
            format!("{position}:{}", level.unwrap_or_default())
        })
        .collect::<Vec<_>>()
        .join(" ");
    insta::assert_snapshot!(
        levels,
        @"0:2000 125:6000 250:10000 375:10000 500:10000 625:10000 750:10000 875:5000"
    );
}
