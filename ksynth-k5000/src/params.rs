//! K5000 parameter domains and selectors

use ksynth_core::{WireRule, ranged_value, wire_kind};

ranged_value! {
    /// Generic 7-bit level, time or rate (0...127)
    pub struct Level(0..=127, default 0, WireRule::Direct);
    /// Signed depth and pan, 64 on the wire is zero (-63...+63)
    pub struct Bipolar(-63..=63, default 0, WireRule::Centered(64));
    /// Controller and macro depth (-31...+31), 64 on the wire is zero
    pub struct ControlDepth(-31..=31, default 0, WireRule::Centered(64));
    /// Controller destination (0...31)
    pub struct Destination(0..=31, default 0, WireRule::Direct);
    /// Assignable controller source (0...31)
    pub struct ControlSource(0..=31, default 0, WireRule::Direct);
    /// Pitch bend range in semitones (0...24)
    pub struct BendRange(0..=24, default 2, WireRule::Direct);
    /// Bender to cutoff depth (0...31)
    pub struct BendCutoff(0..=31, default 0, WireRule::Direct);
    /// Coarse tuning and combi transpose (-24...+24)
    pub struct Coarse(-24..=24, default 0, WireRule::Centered(24));
    /// MIDI key number (0...127)
    pub struct Key(0..=127, default 60, WireRule::Direct);
    /// PCM wave number (0...511), assembled from two wire bytes
    pub struct PcmWave(0..=511, default 0, WireRule::Unmasked, wide);
    /// Playable fixed key (21...108)
    pub struct FixedKey(21..=108, default 60, WireRule::Direct);
    /// Velocity curve (1...12)
    pub struct VelocityCurve(1..=12, default 1, WireRule::OneBased);
    /// Filter resonance (0...7)
    pub struct Resonance(0..=7, default 0, WireRule::Direct);
    /// Filter level (0...7)
    pub struct FilterLevel(0..=7, default 7, WireRule::Direct);
    /// LFO to pitch depth (0...63)
    pub struct LfoDepth(0..=63, default 0, WireRule::Direct);
    /// Key scaling to pitch step (0...4)
    pub struct KsPitch(0..=4, default 0, WireRule::Direct);
    /// Velocity switch threshold (0...31)
    pub struct Threshold(0..=31, default 0, WireRule::Direct);
    /// Effect path (0...3)
    pub struct EffectPath(0..=3, default 0, WireRule::Direct);
    /// Amplitude-modulated source, 0 for none (0...5)
    pub struct AmSource(0..=5, default 0, WireRule::Direct);
    /// Front-panel switch function (0...15)
    pub struct SwitchAssign(0..=15, default 0, WireRule::Direct);
    /// Source within a morf reference (1...12)
    pub struct MorfSource(1..=12, default 1, WireRule::OneBased);
    /// MIDI channel (1...16)
    pub struct Channel(1..=16, default 1, WireRule::OneBased);
    /// Patch slot within a bank (0...127)
    pub struct PatchSlot(0..=127, default 0, WireRule::Direct);
}

wire_kind! {
    /// Voice assignment
    pub enum Polyphony {
        #[default]
        Poly = 0,
        Solo1 = 1,
        Solo2 = 2,
    }
}

wire_kind! {
    /// How velocity selects a source
    pub enum VelocitySwitchKind {
        #[default]
        Off = 0,
        Loud = 1,
        Soft = 2,
    }
}

wire_kind! {
    /// How a source is placed in the stereo field
    pub enum PanKind {
        #[default]
        Normal = 0,
        KeyScale = 1,
        NegativeKeyScale = 2,
        Random = 3,
    }
}

wire_kind! {
    /// Filter response
    pub enum FilterMode {
        #[default]
        LowPass = 0,
        HighPass = 1,
    }
}

wire_kind! {
    /// LFO waveform
    pub enum LfoWaveform {
        #[default]
        Triangle = 0,
        Square = 1,
        Sawtooth = 2,
        Sine = 3,
        Random = 4,
    }
}

wire_kind! {
    /// Harmonic range edited by the additive kit
    pub enum HarmonicGroup {
        #[default]
        Low = 0,
        High = 1,
    }
}

wire_kind! {
    /// Morf playback loop
    pub enum MorfLoop {
        #[default]
        Off = 0,
        Forward = 1,
        Alternate = 2,
    }
}

wire_kind! {
    /// What modulates the formant filter
    pub enum FormantModulator {
        #[default]
        Envelope = 0,
        Lfo = 1,
    }
}

wire_kind! {
    /// Formant LFO waveform
    pub enum FormantLfoShape {
        #[default]
        Triangle = 0,
        Sawtooth = 1,
        Random = 2,
    }
}

wire_kind! {
    /// Bank a combi section plays from
    pub enum PatchBank {
        #[default]
        A = 0,
        D = 1,
        E = 2,
        F = 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ksynth_core::{ByteValue, RangedValue};

    fn assert_round_trips<T: ByteValue + PartialEq + std::fmt::Debug>() {
        for v in T::MIN..=T::MAX {
            let value = T::new(v).unwrap();
            assert_eq!(T::from_wire(value.to_wire()), Ok(value), "{} {v}", T::NAME);
        }
    }

    #[test]
    fn test_every_domain_round_trips() {
        assert_round_trips::<Level>();
        assert_round_trips::<Bipolar>();
        assert_round_trips::<ControlDepth>();
        assert_round_trips::<Destination>();
        assert_round_trips::<ControlSource>();
        assert_round_trips::<BendRange>();
        assert_round_trips::<BendCutoff>();
        assert_round_trips::<Coarse>();
        assert_round_trips::<Key>();
        assert_round_trips::<FixedKey>();
        assert_round_trips::<VelocityCurve>();
        assert_round_trips::<Resonance>();
        assert_round_trips::<FilterLevel>();
        assert_round_trips::<LfoDepth>();
        assert_round_trips::<KsPitch>();
        assert_round_trips::<Threshold>();
        assert_round_trips::<EffectPath>();
        assert_round_trips::<AmSource>();
        assert_round_trips::<SwitchAssign>();
        assert_round_trips::<MorfSource>();
        assert_round_trips::<Channel>();
        assert_round_trips::<PatchSlot>();
    }

    #[test]
    fn test_pcm_wave_spans_two_bytes() {
        for v in PcmWave::MIN..=PcmWave::MAX {
            let wave = PcmWave::new(v).unwrap();
            assert_eq!(PcmWave::from_wide(wave.to_wide()), Ok(wave));
        }
        // 256 and 0 share a low byte; only the wide image tells them apart
        assert_eq!(PcmWave::new(256).unwrap().to_wide(), 256);
    }
}
