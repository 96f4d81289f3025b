//! One sound source: zone, controllers, oscillator, DCF, DCA and LFO
//!
//! The 86-byte source body is followed by an 806-byte
//! [`AdditiveKit`](crate::AdditiveKit) when the oscillator wave is
//! [`ADDITIVE_WAVE`](crate::ADDITIVE_WAVE). PCM sources carry nothing extra.

mod amplifier;
mod filter;
mod lfo;

pub use amplifier::{AmpEnvelope, AmpModifiers, Amplifier};
pub use filter::{Filter, FilterEnvelope};
pub use lfo::{Lfo, LfoTarget};

use ksynth_core::bits::{bit_range, set_bit_range};
use ksynth_core::{
    ByteValue, DecodeOptions, RangedValue, Result, SyxReader, SyxWriter, SystemExclusiveData, WireKind,
};
use rand::Rng;

use crate::kit::AdditiveKit;
use crate::params::{
    BendCutoff, BendRange, Bipolar, Coarse, ControlDepth, ControlSource, Destination, EffectPath,
    FixedKey, Key, KsPitch, Level, PanKind, PcmWave, Threshold, VelocitySwitchKind,
};
use crate::{ADDITIVE_WAVE, KIT_SIZE, SOURCE_SIZE};

/// Velocity switch: kind in bits 5-6, threshold in bits 0-4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VelocitySwitch {
    pub kind: VelocitySwitchKind,
    pub threshold: Threshold,
}

impl VelocitySwitch {
    pub(crate) fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        let b = reader.read_u8()?;
        Ok(Self {
            kind: reader.decode_kind(bit_range(b, 5, 2))?,
            threshold: reader.decode(bit_range(b, 0, 5))?,
        })
    }

    pub(crate) fn write(&self, writer: &mut SyxWriter) {
        let b = set_bit_range(0, 5, 2, self.kind.to_wire());
        writer.push(set_bit_range(b, 0, 5, self.threshold.to_wire()));
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            kind: VelocitySwitchKind::random(rng),
            threshold: Threshold::random(rng),
        }
    }
}

/// Fixed-assignment controller (pressure, wheel, expression)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Control {
    pub destination: Destination,
    pub depth: ControlDepth,
}

/// Freely assignable controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignableController {
    pub source: ControlSource,
    pub destination: Destination,
    pub depth: ControlDepth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PitchEnvelope {
    pub start_level: Bipolar,
    pub attack_time: Level,
    pub attack_level: Bipolar,
    pub decay_time: Level,
    pub time_velocity: Bipolar,
    pub level_velocity: Bipolar,
}

/// Oscillator wave selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wave {
    /// Sampled wave from ROM
    Pcm(PcmWave),
    /// Additive synthesis, with its kit
    Additive(Box<AdditiveKit>),
}

impl Default for Wave {
    fn default() -> Self {
        Self::Pcm(PcmWave::default())
    }
}

impl Wave {
    /// 10-bit wire number
    pub fn number(&self) -> u16 {
        match self {
            Self::Pcm(wave) => wave.to_wide(),
            Self::Additive(_) => ADDITIVE_WAVE,
        }
    }

    pub fn kit(&self) -> Option<&AdditiveKit> {
        match self {
            Self::Pcm(_) => None,
            Self::Additive(kit) => Some(kit.as_ref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub zone_low: Key,
    pub zone_high: Key,
    pub velocity_switch: VelocitySwitch,
    pub effect_path: EffectPath,
    pub volume: Level,
    pub bender_pitch: BendRange,
    pub bender_cutoff: BendCutoff,
    pub pressure: Control,
    pub wheel: Control,
    pub expression: Control,
    pub key_on_delay: Level,
    pub pan_kind: PanKind,
    pub pan: Bipolar,
    pub wave: Wave,
    pub coarse: Coarse,
    pub fine: Bipolar,
    /// `None` tracks the keyboard
    pub fixed_key: Option<FixedKey>,
    pub ks_pitch: KsPitch,
    pub pitch_envelope: PitchEnvelope,
    pub filter: Filter,
    pub amplifier: Amplifier,
    pub lfo: Lfo,
    pub assignable: [AssignableController; 3],
    pub ks_center: Key,
    pub velocity_pan: Bipolar,
    pub effect_send: Level,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            zone_low: Key::clamped(0),
            zone_high: Key::clamped(127),
            velocity_switch: VelocitySwitch::default(),
            effect_path: EffectPath::default(),
            volume: Level::clamped(120),
            bender_pitch: BendRange::default(),
            bender_cutoff: BendCutoff::default(),
            pressure: Control::default(),
            wheel: Control::default(),
            expression: Control::default(),
            key_on_delay: Level::default(),
            pan_kind: PanKind::default(),
            pan: Bipolar::default(),
            wave: Wave::default(),
            coarse: Coarse::default(),
            fine: Bipolar::default(),
            fixed_key: None,
            ks_pitch: KsPitch::default(),
            pitch_envelope: PitchEnvelope::default(),
            filter: Filter::default(),
            amplifier: Amplifier::default(),
            lfo: Lfo::default(),
            assignable: [AssignableController::default(); 3],
            ks_center: Key::default(),
            velocity_pan: Bipolar::default(),
            effect_send: Level::default(),
        }
    }
}

fn read_control(reader: &mut SyxReader<'_>) -> Result<Control> {
    Ok(Control {
        destination: reader.value()?,
        depth: reader.value()?,
    })
}

fn write_control(writer: &mut SyxWriter, control: &Control) {
    writer.value(control.destination);
    writer.value(control.depth);
}

fn random_control<R: Rng>(rng: &mut R) -> Control {
    Control {
        destination: Destination::random(rng),
        depth: ControlDepth::random(rng),
    }
}

impl Source {
    /// A source playing the given PCM wave
    pub fn pcm(wave: PcmWave) -> Self {
        Self {
            wave: Wave::Pcm(wave),
            ..Self::default()
        }
    }

    /// A source playing an additive kit
    pub fn additive(kit: AdditiveKit) -> Self {
        Self {
            wave: Wave::Additive(Box::new(kit)),
            ..Self::default()
        }
    }

    pub fn is_additive(&self) -> bool {
        matches!(self.wave, Wave::Additive(_))
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let wave = if rng.random_bool(0.25) {
            Wave::Additive(Box::new(AdditiveKit::random(rng)))
        } else {
            Wave::Pcm(PcmWave::random(rng))
        };
        Self {
            zone_low: Key::random(rng),
            zone_high: Key::random(rng),
            velocity_switch: VelocitySwitch::random(rng),
            effect_path: EffectPath::random(rng),
            volume: Level::random(rng),
            bender_pitch: BendRange::random(rng),
            bender_cutoff: BendCutoff::random(rng),
            pressure: random_control(rng),
            wheel: random_control(rng),
            expression: random_control(rng),
            key_on_delay: Level::random(rng),
            pan_kind: PanKind::random(rng),
            pan: Bipolar::random(rng),
            wave,
            coarse: Coarse::random(rng),
            fine: Bipolar::random(rng),
            fixed_key: rng.random_bool(0.5).then(|| FixedKey::random(rng)),
            ks_pitch: KsPitch::random(rng),
            pitch_envelope: PitchEnvelope {
                start_level: Bipolar::random(rng),
                attack_time: Level::random(rng),
                attack_level: Bipolar::random(rng),
                decay_time: Level::random(rng),
                time_velocity: Bipolar::random(rng),
                level_velocity: Bipolar::random(rng),
            },
            filter: Filter::random(rng),
            amplifier: Amplifier::random(rng),
            lfo: Lfo::random(rng),
            assignable: std::array::from_fn(|_| AssignableController {
                source: ControlSource::random(rng),
                destination: Destination::random(rng),
                depth: ControlDepth::random(rng),
            }),
            ks_center: Key::random(rng),
            velocity_pan: Bipolar::random(rng),
            effect_send: Level::random(rng),
        }
    }

    /// Emit the 86-byte body without the kit
    ///
    /// The patch checksum covers source bodies only; kits carry their own.
    pub(crate) fn encode_body(&self, writer: &mut SyxWriter) {
        writer.value(self.zone_low);
        writer.value(self.zone_high);
        self.velocity_switch.write(writer);
        writer.value(self.effect_path);
        writer.value(self.volume);
        writer.value(self.bender_pitch);
        writer.value(self.bender_cutoff);
        write_control(writer, &self.pressure);
        write_control(writer, &self.wheel);
        write_control(writer, &self.expression);
        writer.value(self.key_on_delay);
        writer.kind(self.pan_kind);
        writer.value(self.pan);

        let wave = self.wave.number();
        writer.push((wave >> 7) as u8 & 0x07);
        writer.push(wave as u8 & 0x7F);
        writer.value(self.coarse);
        writer.value(self.fine);
        writer.push(self.fixed_key.map_or(0, |key| key.to_wire()));
        writer.value(self.ks_pitch);
        let env = &self.pitch_envelope;
        writer.value(env.start_level);
        writer.value(env.attack_time);
        writer.value(env.attack_level);
        writer.value(env.decay_time);
        writer.value(env.time_velocity);
        writer.value(env.level_velocity);

        self.filter.write(writer);
        self.amplifier.write(writer);
        self.lfo.write(writer);

        for control in &self.assignable {
            writer.value(control.source);
            writer.value(control.destination);
            writer.value(control.depth);
        }
        writer.value(self.ks_center);
        writer.value(self.velocity_pan);
        writer.value(self.effect_send);
    }
}

impl SystemExclusiveData for Source {
    const UNIT: &'static str = "source";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        let zone_low = reader.value()?;
        let zone_high = reader.value()?;
        let velocity_switch = VelocitySwitch::read(reader)?;
        let effect_path = reader.value()?;
        let volume = reader.value()?;
        let bender_pitch = reader.value()?;
        let bender_cutoff = reader.value()?;
        let pressure = read_control(reader)?;
        let wheel = read_control(reader)?;
        let expression = read_control(reader)?;
        let key_on_delay = reader.value()?;
        let pan_kind = reader.kind()?;
        let pan = reader.value()?;

        let high = reader.read_u8()?;
        let low = reader.read_u8()?;
        let number = (u16::from(high & 0x07) << 7) | u16::from(low & 0x7F);
        // 512 is not a PCM wave; the kit is read once the body is done
        let pcm = if number == ADDITIVE_WAVE {
            None
        } else {
            Some(reader.decode_wide::<PcmWave>(number)?)
        };

        let coarse = reader.value()?;
        let fine = reader.value()?;
        let fixed_key = match reader.read_u8()? {
            0 => None,
            b => Some(reader.decode(b)?),
        };
        let ks_pitch = reader.value()?;
        let pitch_envelope = PitchEnvelope {
            start_level: reader.value()?,
            attack_time: reader.value()?,
            attack_level: reader.value()?,
            decay_time: reader.value()?,
            time_velocity: reader.value()?,
            level_velocity: reader.value()?,
        };

        let filter = Filter::read(reader)?;
        let amplifier = Amplifier::read(reader)?;
        let lfo = Lfo::read(reader)?;

        let mut assignable = [AssignableController::default(); 3];
        for control in assignable.iter_mut() {
            *control = AssignableController {
                source: reader.value()?,
                destination: reader.value()?,
                depth: reader.value()?,
            };
        }
        let ks_center = reader.value()?;
        let velocity_pan = reader.value()?;
        let effect_send = reader.value()?;

        let wave = match pcm {
            Some(wave) => Wave::Pcm(wave),
            None => {
                tracing::trace!("additive kit @ {:#06x}", reader.position());
                Wave::Additive(Box::new(AdditiveKit::decode_nested(reader, options)?))
            }
        };

        Ok(Self {
            zone_low,
            zone_high,
            velocity_switch,
            effect_path,
            volume,
            bender_pitch,
            bender_cutoff,
            pressure,
            wheel,
            expression,
            key_on_delay,
            pan_kind,
            pan,
            wave,
            coarse,
            fine,
            fixed_key,
            ks_pitch,
            pitch_envelope,
            filter,
            amplifier,
            lfo,
            assignable,
            ks_center,
            velocity_pan,
            effect_send,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        writer.unit_with(Self::UNIT, SOURCE_SIZE, |body| {
            self.encode_body(body);
            Ok(())
        })?;
        if let Wave::Additive(kit) = &self.wave {
            kit.encode_nested(writer)?;
        }
        Ok(())
    }

    fn data_size(&self) -> usize {
        if self.is_additive() {
            SOURCE_SIZE + KIT_SIZE
        } else {
            SOURCE_SIZE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ksynth_core::SyxError;

    #[test]
    fn test_pcm_body_layout() {
        let mut source = Source::pcm(PcmWave::new(300).unwrap());
        source.fixed_key = Some(FixedKey::new(21).unwrap());
        source.velocity_switch = VelocitySwitch {
            kind: VelocitySwitchKind::Soft,
            threshold: Threshold::new(17).unwrap(),
        };
        let bytes = source.to_bytes().unwrap();
        assert_eq!(bytes.len(), SOURCE_SIZE);
        assert_eq!(bytes[2], 0b0101_0001);
        // 300 = 2 << 7 | 44
        assert_eq!(bytes[16], 2);
        assert_eq!(bytes[17], 44);
        assert_eq!(bytes[19], 64);
        assert_eq!(bytes[20], 21);
        assert_eq!(Source::from_bytes(&bytes).unwrap(), source);
    }

    #[test]
    fn test_fixed_key_off() {
        let bytes = Source::default().to_bytes().unwrap();
        assert_eq!(bytes[20], 0);
        assert_eq!(Source::from_bytes(&bytes).unwrap().fixed_key, None);
    }

    #[test]
    fn test_fixed_key_below_keyboard() {
        let mut bytes = Source::default().to_bytes().unwrap();
        bytes[20] = 20;
        let err = Source::from_bytes(&bytes).unwrap_err();
        assert_eq!(err.offset(), Some(20));
    }

    #[test]
    fn test_additive_source_carries_kit() {
        let source = Source::additive(AdditiveKit::default());
        let bytes = source.to_bytes().unwrap();
        assert_eq!(bytes.len(), SOURCE_SIZE + KIT_SIZE);
        assert_eq!(bytes[16], 4);
        assert_eq!(bytes[17], 0);
        assert_eq!(Source::from_bytes(&bytes).unwrap(), source);
    }

    #[test]
    fn test_wave_above_additive_is_rejected() {
        let mut bytes = Source::default().to_bytes().unwrap();
        bytes[16] = 4;
        bytes[17] = 1;
        assert!(matches!(
            Source::from_bytes(&bytes),
            Err(SyxError::Value { unit: "source", offset: 17, .. })
        ));
    }
}
