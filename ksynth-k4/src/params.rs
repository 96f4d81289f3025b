//! K4 parameter domains and selectors

use ksynth_core::{WireRule, ranged_value, wire_kind};

ranged_value! {
    /// Level, rate or time (0...100)
    pub struct Level(0..=100, default 0, WireRule::Direct);
    /// Bipolar modulation depth (-50...+50), 50 on the wire is zero
    pub struct Depth(-50..=50, default 0, WireRule::Centered(50));
    /// Effect patch number (1...32)
    pub struct EffectNumber(1..=32, default 1, WireRule::OneBased);
    /// Pitch bend range in semitones (0...12)
    pub struct BendRange(0..=12, default 2, WireRule::Direct);
    /// Coarse tuning in semitones (-24...+24)
    pub struct Coarse(-24..=24, default 0, WireRule::Centered(24));
    /// MIDI key number (0...127)
    pub struct Key(0..=127, default 60, WireRule::Direct);
    /// PCM wave number (1...256), split as high bit + low seven bits
    pub struct WaveNumber(1..=256, default 1, WireRule::OneBased);
    /// Key scaling or velocity curve (1...8)
    pub struct Curve(1..=8, default 1, WireRule::OneBased);
    /// Filter resonance (1...8)
    pub struct Resonance(1..=8, default 1, WireRule::OneBased);
    /// Single patch slot referenced by a multi section (1...64)
    pub struct PatchNumber(1..=64, default 1, WireRule::OneBased);
    /// MIDI channel (1...16)
    pub struct Channel(1..=16, default 1, WireRule::OneBased);
    /// Multi section transpose in semitones (-24...+24)
    pub struct Transpose(-24..=24, default 0, WireRule::Centered(24));
    /// Effect type (1...16)
    pub struct EffectType(1..=16, default 1, WireRule::OneBased);
    /// Effect parameters 1 and 2 (-7...+7)
    pub struct EffectParam(-7..=7, default 0, WireRule::Centered(7));
    /// Effect parameter 3 (0...31)
    pub struct EffectParam3(0..=31, default 0, WireRule::Direct);
    /// Submix pan (-7...+7)
    pub struct Pan(-7..=7, default 0, WireRule::Centered(7));
}

wire_kind! {
    /// Submix channel / output
    pub enum Submix {
        #[default]
        A = 0,
        B = 1,
        C = 2,
        D = 3,
        E = 4,
        F = 5,
        G = 6,
        H = 7,
    }
}

wire_kind! {
    /// How the four sources are combined
    pub enum SourceMode {
        #[default]
        Normal = 0,
        Twin = 1,
        Double = 2,
    }
}

wire_kind! {
    /// Voice assignment
    pub enum PolyMode {
        #[default]
        Poly1 = 0,
        Poly2 = 1,
        Solo1 = 2,
        Solo2 = 3,
    }
}

wire_kind! {
    /// LFO and vibrato waveform
    pub enum LfoShape {
        #[default]
        Triangle = 0,
        Sawtooth = 1,
        Square = 2,
        Random = 3,
    }
}

wire_kind! {
    /// Modulation wheel destination
    pub enum WheelAssign {
        #[default]
        Vibrato = 0,
        Lfo = 1,
        Dcf = 2,
    }
}

wire_kind! {
    /// Velocity range a multi section responds to
    pub enum VelocitySwitch {
        #[default]
        All = 0,
        Soft = 1,
        Loud = 2,
    }
}

wire_kind! {
    /// Where a multi section takes its notes from
    pub enum PlayMode {
        #[default]
        Keyboard = 0,
        Midi = 1,
        Mix = 2,
    }
}
