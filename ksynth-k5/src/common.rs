//! Patch-wide settings at the start of a single patch

use ksynth_core::bits::{
    high_nybble, is_bit_set, join_flag, low_nybble, nybbles_to_byte, split_flag, with_bit,
};
use ksynth_core::{
    ByteValue, DecodeOptions, PatchName, RangedValue, Result, SyxReader, SyxWriter, SystemExclusiveData,
    WireKind,
};
use rand::Rng;

use crate::params::{
    BendRange, Bipolar, ControlAssign, Depth, Key, KeyMode, Level, LfoShape, Rate, SourceMode,
    Transpose, Volume,
};
use crate::{COMMON_SIZE, FORMANT_BANDS};

/// Patch LFO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lfo {
    pub shape: LfoShape,
    pub speed: Level,
    pub delay: Rate,
    pub trend: Rate,
    pub pitch_depth: Depth,
    pub filter_depth: Depth,
    pub amp_depth: Depth,
}

/// Common block of a K5 single patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Common {
    pub name: PatchName<8>,
    pub volume: Volume,
    pub balance: Bipolar,
    pub portamento: bool,
    pub portamento_speed: Volume,
    pub pedal_assign: ControlAssign,
    pub wheel_assign: ControlAssign,
    pub pedal_depth: Depth,
    pub wheel_depth: Depth,
    pub bend_range: BendRange,
    pub source_mode: SourceMode,
    pub key_mode: KeyMode,
    pub formant: bool,
    pub lfo: Lfo,
    /// Formant filter band levels, lowest band first
    pub formant_levels: [Volume; FORMANT_BANDS],
    pub velocity_volume: Bipolar,
    pub pressure_volume: Bipolar,
    pub ks_volume: Bipolar,
    pub ks_break: Key,
    pub zone_low: Key,
    pub zone_high: Key,
    pub transpose: Transpose,
    pub fine: Bipolar,
}

impl Default for Common {
    fn default() -> Self {
        Self {
            name: PatchName::default(),
            volume: Volume::clamped(63),
            balance: Bipolar::default(),
            portamento: false,
            portamento_speed: Volume::default(),
            pedal_assign: ControlAssign::default(),
            wheel_assign: ControlAssign::default(),
            pedal_depth: Depth::default(),
            wheel_depth: Depth::default(),
            bend_range: BendRange::default(),
            source_mode: SourceMode::default(),
            key_mode: KeyMode::default(),
            formant: false,
            lfo: Lfo::default(),
            formant_levels: [Volume::clamped(32); FORMANT_BANDS],
            velocity_volume: Bipolar::default(),
            pressure_volume: Bipolar::default(),
            ks_volume: Bipolar::default(),
            ks_break: Key::default(),
            zone_low: Key::clamped(0),
            zone_high: Key::clamped(127),
            transpose: Transpose::default(),
            fine: Bipolar::default(),
        }
    }
}

impl Common {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            name: PatchName::random(rng),
            volume: Volume::random(rng),
            balance: Bipolar::random(rng),
            portamento: rng.random(),
            portamento_speed: Volume::random(rng),
            pedal_assign: ControlAssign::random(rng),
            wheel_assign: ControlAssign::random(rng),
            pedal_depth: Depth::random(rng),
            wheel_depth: Depth::random(rng),
            bend_range: BendRange::random(rng),
            source_mode: SourceMode::random(rng),
            key_mode: KeyMode::random(rng),
            formant: rng.random(),
            lfo: Lfo {
                shape: LfoShape::random(rng),
                speed: Level::random(rng),
                delay: Rate::random(rng),
                trend: Rate::random(rng),
                pitch_depth: Depth::random(rng),
                filter_depth: Depth::random(rng),
                amp_depth: Depth::random(rng),
            },
            formant_levels: std::array::from_fn(|_| Volume::random(rng)),
            velocity_volume: Bipolar::random(rng),
            pressure_volume: Bipolar::random(rng),
            ks_volume: Bipolar::random(rng),
            ks_break: Key::random(rng),
            zone_low: Key::random(rng),
            zone_high: Key::random(rng),
            transpose: Transpose::random(rng),
            fine: Bipolar::random(rng),
        }
    }
}

impl SystemExclusiveData for Common {
    const UNIT: &'static str = "common";

    fn decode(reader: &mut SyxReader<'_>, _options: &DecodeOptions) -> Result<Self> {
        let name = PatchName::read(reader)?;
        let volume = reader.value()?;
        let balance = reader.value()?;
        let (portamento, speed) = split_flag(reader.read_u8()?);
        let portamento_speed = reader.decode(speed)?;

        let b = reader.read_u8()?;
        let pedal_assign = reader.decode_kind(high_nybble(b))?;
        let wheel_assign = reader.decode_kind(low_nybble(b))?;
        let pedal_depth = reader.value()?;
        let wheel_depth = reader.value()?;
        let bend_range = reader.value()?;

        let b = reader.read_u8()?;
        let source_mode = reader.decode_kind(b & 0x01)?;
        let key_mode = reader.decode_kind((b >> 1) & 0x01)?;
        let formant = is_bit_set(b, 2);

        let lfo = Lfo {
            shape: reader.kind()?,
            speed: reader.value()?,
            delay: reader.value()?,
            trend: reader.value()?,
            pitch_depth: reader.value()?,
            filter_depth: reader.value()?,
            amp_depth: reader.value()?,
        };

        let mut formant_levels = [Volume::default(); FORMANT_BANDS];
        for level in formant_levels.iter_mut() {
            *level = reader.value()?;
        }

        Ok(Self {
            name,
            volume,
            balance,
            portamento,
            portamento_speed,
            pedal_assign,
            wheel_assign,
            pedal_depth,
            wheel_depth,
            bend_range,
            source_mode,
            key_mode,
            formant,
            lfo,
            formant_levels,
            velocity_volume: reader.value()?,
            pressure_volume: reader.value()?,
            ks_volume: reader.value()?,
            ks_break: reader.value()?,
            zone_low: reader.value()?,
            zone_high: reader.value()?,
            transpose: reader.value()?,
            fine: reader.value()?,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        self.name.write(writer);
        writer.value(self.volume);
        writer.value(self.balance);
        writer.push(join_flag(self.portamento, self.portamento_speed.to_wire()));
        writer.push(nybbles_to_byte(
            self.pedal_assign.to_wire(),
            self.wheel_assign.to_wire(),
        ));
        writer.value(self.pedal_depth);
        writer.value(self.wheel_depth);
        writer.value(self.bend_range);

        let mode = with_bit(self.source_mode.to_wire(), 1, self.key_mode == KeyMode::Mono);
        writer.push(with_bit(mode, 2, self.formant));

        writer.kind(self.lfo.shape);
        writer.value(self.lfo.speed);
        writer.value(self.lfo.delay);
        writer.value(self.lfo.trend);
        writer.value(self.lfo.pitch_depth);
        writer.value(self.lfo.filter_depth);
        writer.value(self.lfo.amp_depth);
        for level in &self.formant_levels {
            writer.value(*level);
        }
        writer.value(self.velocity_volume);
        writer.value(self.pressure_volume);
        writer.value(self.ks_volume);
        writer.value(self.ks_break);
        writer.value(self.zone_low);
        writer.value(self.zone_high);
        writer.value(self.transpose);
        writer.value(self.fine);
        Ok(())
    }

    fn data_size(&self) -> usize {
        COMMON_SIZE
    }
}
