//! Single patch: common settings, four sources and two filters
//!
//! ```text
//! 0    name (10)
//! 10   volume, effect, submix, mode bits, mutes/vibrato shape, bend/wheel
//! 16   vibrato, wheel depth, auto-bend, LFO, pressure→freq
//! 30   sources, 18 rows × 4
//! 102  filters, 14 rows × 2
//! 130  checksum
//! ```

mod envelope;
mod filter;
mod source;

use ksynth_core::bits::{bit_range, is_bit_set, set_bit_range, with_bit};
use ksynth_core::interleave::{decode_interleaved, encode_interleaved};
use ksynth_core::{
    ByteValue, DecodeOptions, PatchName, RangedValue, Result, SyxReader, SyxWriter, SystemExclusiveData,
    WireKind,
};
use rand::Rng;

pub use envelope::{Envelope, Modulation, TimeModulation};
pub use filter::Filter;
pub use source::Source;

use crate::params::{
    BendRange, Depth, EffectNumber, Level, LfoShape, PolyMode, SourceMode, Submix, WheelAssign,
};
use crate::{FILTER_SIZE, SINGLE_SIZE, SOURCE_SIZE, unit};

/// Pitch vibrato
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vibrato {
    pub shape: LfoShape,
    pub speed: Level,
    pub pressure: Depth,
    pub depth: Depth,
}

/// Pitch bend applied at note-on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoBend {
    pub time: Level,
    pub depth: Depth,
    pub ks_time: Depth,
    pub velocity_depth: Depth,
}

/// Low-frequency oscillator feeding the filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lfo {
    pub shape: LfoShape,
    pub speed: Level,
    pub delay: Level,
    pub depth: Depth,
    pub pressure_depth: Depth,
}

/// K4 single patch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SinglePatch {
    pub name: PatchName<10>,
    pub volume: Level,
    pub effect: EffectNumber,
    pub submix: Submix,
    pub source_mode: SourceMode,
    pub poly_mode: PolyMode,
    /// Source 1 amplitude-modulated by source 2
    pub am12: bool,
    /// Source 3 amplitude-modulated by source 4
    pub am34: bool,
    pub source_muted: [bool; 4],
    pub bend_range: BendRange,
    pub wheel_assign: WheelAssign,
    pub wheel_depth: Depth,
    pub vibrato: Vibrato,
    pub auto_bend: AutoBend,
    pub lfo: Lfo,
    pub pressure_freq: Depth,
    pub sources: [Source; 4],
    pub filters: [Filter; 2],
}

impl SinglePatch {
    /// Patch with every parameter drawn at random
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            name: PatchName::random(rng),
            volume: Level::random(rng),
            effect: EffectNumber::random(rng),
            submix: Submix::random(rng),
            source_mode: SourceMode::random(rng),
            poly_mode: PolyMode::random(rng),
            am12: rng.random(),
            am34: rng.random(),
            source_muted: std::array::from_fn(|_| rng.random()),
            bend_range: BendRange::random(rng),
            wheel_assign: WheelAssign::random(rng),
            wheel_depth: Depth::random(rng),
            vibrato: Vibrato {
                shape: LfoShape::random(rng),
                speed: Level::random(rng),
                pressure: Depth::random(rng),
                depth: Depth::random(rng),
            },
            auto_bend: AutoBend {
                time: Level::random(rng),
                depth: Depth::random(rng),
                ks_time: Depth::random(rng),
                velocity_depth: Depth::random(rng),
            },
            lfo: Lfo {
                shape: LfoShape::random(rng),
                speed: Level::random(rng),
                delay: Level::random(rng),
                depth: Depth::random(rng),
                pressure_depth: Depth::random(rng),
            },
            pressure_freq: Depth::random(rng),
            sources: std::array::from_fn(|_| Source::random(rng)),
            filters: std::array::from_fn(|_| Filter::random(rng)),
        }
    }
}

impl SystemExclusiveData for SinglePatch {
    const UNIT: &'static str = "single";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        unit::CHECKSUM.verify_trailing(reader, SINGLE_SIZE, options)?;

        let name = PatchName::read(reader)?;
        let volume = reader.value()?;
        let effect = reader.value()?;
        let b = reader.read_u8()?;
        let submix = reader.decode_kind(bit_range(b, 0, 3))?;

        let b = reader.read_u8()?;
        let source_mode = reader.decode_kind(bit_range(b, 0, 2))?;
        let poly_mode = reader.decode_kind(bit_range(b, 2, 2))?;
        let am12 = is_bit_set(b, 4);
        let am34 = is_bit_set(b, 5);

        // a set bit means the source plays
        let b = reader.read_u8()?;
        let source_muted = std::array::from_fn(|i| !is_bit_set(b, i as u8));
        let vibrato_shape = reader.decode_kind(bit_range(b, 4, 2))?;

        let b = reader.read_u8()?;
        let bend_range = reader.decode(bit_range(b, 0, 4))?;
        let wheel_assign = reader.decode_kind(bit_range(b, 4, 2))?;

        let vibrato_speed = reader.value()?;
        let wheel_depth = reader.value()?;
        let auto_bend = AutoBend {
            time: reader.value()?,
            depth: reader.value()?,
            ks_time: reader.value()?,
            velocity_depth: reader.value()?,
        };
        let vibrato = Vibrato {
            shape: vibrato_shape,
            speed: vibrato_speed,
            pressure: reader.value()?,
            depth: reader.value()?,
        };
        let b = reader.read_u8()?;
        let lfo = Lfo {
            shape: reader.decode_kind(bit_range(b, 0, 2))?,
            speed: reader.value()?,
            delay: reader.value()?,
            depth: reader.value()?,
            pressure_depth: reader.value()?,
        };
        let pressure_freq = reader.value()?;

        let sources = decode_interleaved(reader, SOURCE_SIZE, options)?;
        let filters = decode_interleaved(reader, FILTER_SIZE, options)?;
        reader.skip(1)?;

        Ok(Self {
            name,
            volume,
            effect,
            submix,
            source_mode,
            poly_mode,
            am12,
            am34,
            source_muted,
            bend_range,
            wheel_assign,
            wheel_depth,
            vibrato,
            auto_bend,
            lfo,
            pressure_freq,
            sources,
            filters,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        let start = writer.len();
        self.name.write(writer);
        writer.value(self.volume);
        writer.value(self.effect);
        writer.kind(self.submix);

        let mode = set_bit_range(self.source_mode.to_wire(), 2, 2, self.poly_mode.to_wire());
        writer.push(with_bit(with_bit(mode, 4, self.am12), 5, self.am34));

        let playing = self
            .source_muted
            .iter()
            .enumerate()
            .fold(0, |b, (i, &muted)| with_bit(b, i as u8, !muted));
        writer.push(set_bit_range(playing, 4, 2, self.vibrato.shape.to_wire()));

        writer.push(set_bit_range(self.bend_range.to_wire(), 4, 2, self.wheel_assign.to_wire()));
        writer.value(self.vibrato.speed);
        writer.value(self.wheel_depth);
        writer.value(self.auto_bend.time);
        writer.value(self.auto_bend.depth);
        writer.value(self.auto_bend.ks_time);
        writer.value(self.auto_bend.velocity_depth);
        writer.value(self.vibrato.pressure);
        writer.value(self.vibrato.depth);
        writer.kind(self.lfo.shape);
        writer.value(self.lfo.speed);
        writer.value(self.lfo.delay);
        writer.value(self.lfo.depth);
        writer.value(self.lfo.pressure_depth);
        writer.value(self.pressure_freq);

        encode_interleaved(writer, &self.sources)?;
        encode_interleaved(writer, &self.filters)?;
        unit::CHECKSUM.append(writer, start);
        Ok(())
    }

    fn data_size(&self) -> usize {
        SINGLE_SIZE
    }
}
