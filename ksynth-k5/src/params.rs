//! K5 parameter domains and selectors

use ksynth_core::{WireRule, ranged_value, wire_kind};

ranged_value! {
    /// Harmonic, filter and output levels (0...99)
    pub struct Level(0..=99, default 0, WireRule::Direct);
    /// Modulation depth (0...31)
    pub struct Depth(0..=31, default 0, WireRule::Direct);
    /// Envelope rate, delay and trend (0...31)
    pub struct Rate(0..=31, default 0, WireRule::Direct);
    /// Signed depth, balance and fine tuning (-31...+31)
    pub struct Bipolar(-31..=31, default 0, WireRule::Centered(31));
    /// Patch volume, portamento speed and formant band level (0...63)
    pub struct Volume(0..=63, default 0, WireRule::Direct);
    /// Pitch bend range in semitones (0...24)
    pub struct BendRange(0..=24, default 2, WireRule::Direct);
    /// MIDI key number (0...127)
    pub struct Key(0..=127, default 60, WireRule::Direct);
    /// Transpose and pitch envelope depth (-24...+24)
    pub struct Transpose(-24..=24, default 0, WireRule::Centered(24));
    /// Source coarse tuning (-48...+48)
    pub struct Coarse(-48..=48, default 0, WireRule::Centered(48));
    /// Harmonic number (1...63)
    pub struct HarmonicNumber(1..=63, default 1, WireRule::OneBased);
    /// Harmonic envelope selector (1...4)
    pub struct EnvelopeNumber(1..=4, default 1, WireRule::OneBased);
    /// Envelope rate scaling (0...15)
    pub struct RateScaling(0..=15, default 0, WireRule::Direct);
}

wire_kind! {
    /// Pedal and wheel destination
    pub enum ControlAssign {
        #[default]
        Vibrato = 0,
        Lfo = 1,
        Filter = 2,
        Volume = 3,
    }
}

wire_kind! {
    /// Source layering
    pub enum SourceMode {
        #[default]
        Twin = 0,
        Full = 1,
    }
}

wire_kind! {
    /// Voice assignment
    pub enum KeyMode {
        #[default]
        Poly = 0,
        Mono = 1,
    }
}

wire_kind! {
    /// LFO waveform
    pub enum LfoShape {
        #[default]
        Triangle = 0,
        InverseTriangle = 1,
        Square = 2,
        InverseSquare = 3,
        Sawtooth = 4,
        InverseSawtooth = 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nybble::Nybble;
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
        assert_round_trips::<Depth>();
        assert_round_trips::<Rate>();
        assert_round_trips::<Bipolar>();
        assert_round_trips::<Volume>();
        assert_round_trips::<BendRange>();
        assert_round_trips::<Key>();
        assert_round_trips::<Transpose>();
        assert_round_trips::<Coarse>();
        assert_round_trips::<HarmonicNumber>();
        assert_round_trips::<EnvelopeNumber>();
        assert_round_trips::<RateScaling>();
        assert_round_trips::<Nybble>();
    }
}
