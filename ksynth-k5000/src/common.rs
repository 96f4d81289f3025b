//! Common block of a single patch

use ksynth_core::bits::{high_nybble, is_bit_set, low_nybble, nybbles_to_byte, with_bit};
use ksynth_core::{ByteValue, PatchName, RangedValue, Result, SyxReader, SyxWriter, WireKind};
use rand::Rng;

use crate::MAX_SOURCES;
use crate::params::{
    AmSource, BendRange, ControlDepth, Destination, Level, Polyphony, SwitchAssign,
};

/// One macro controller: two destinations moved together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacroController {
    pub destination1: Destination,
    pub depth1: ControlDepth,
    pub destination2: Destination,
    pub depth2: ControlDepth,
}

impl MacroController {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            destination1: Destination::random(rng),
            depth1: ControlDepth::random(rng),
            destination2: Destination::random(rng),
            depth2: ControlDepth::random(rng),
        }
    }
}

/// Patch-wide settings
///
/// The source count byte is not stored here; it is derived from the number
/// of sources in the [`SinglePatch`](crate::SinglePatch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Common {
    pub name: PatchName<8>,
    pub volume: Level,
    pub polyphony: Polyphony,
    /// One entry per possible source, whether present or not
    pub source_muted: [bool; MAX_SOURCES],
    pub am: AmSource,
    pub portamento: bool,
    pub portamento_speed: Level,
    pub bend_range: BendRange,
    pub macros: [MacroController; 4],
    pub switch1: SwitchAssign,
    pub switch2: SwitchAssign,
}

impl Default for Common {
    fn default() -> Self {
        Self {
            name: PatchName::default(),
            volume: Level::clamped(115),
            polyphony: Polyphony::default(),
            source_muted: [false; MAX_SOURCES],
            am: AmSource::default(),
            portamento: false,
            portamento_speed: Level::default(),
            bend_range: BendRange::default(),
            macros: [MacroController::default(); 4],
            switch1: SwitchAssign::default(),
            switch2: SwitchAssign::default(),
        }
    }
}

impl Common {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            name: PatchName::random(rng),
            volume: Level::random(rng),
            polyphony: Polyphony::random(rng),
            source_muted: std::array::from_fn(|_| rng.random()),
            am: AmSource::random(rng),
            portamento: rng.random(),
            portamento_speed: Level::random(rng),
            bend_range: BendRange::random(rng),
            macros: std::array::from_fn(|_| MacroController::random(rng)),
            switch1: SwitchAssign::random(rng),
            switch2: SwitchAssign::random(rng),
        }
    }

    /// Read the block, returning the raw source count alongside it
    ///
    /// The count is range-checked by the caller, which knows the offset to
    /// report it at.
    pub(crate) fn read(reader: &mut SyxReader<'_>) -> Result<(Self, u8)> {
        let name = PatchName::read(reader)?;
        let volume = reader.value()?;
        let polyphony = reader.kind()?;
        let count = reader.read_u8()?;
        // a set bit means the source plays
        let b = reader.read_u8()?;
        let source_muted = std::array::from_fn(|i| !is_bit_set(b, i as u8));
        let am = reader.value()?;
        let portamento = reader.flag()?;
        let portamento_speed = reader.value()?;
        let bend_range = reader.value()?;

        let mut macros = [MacroController::default(); 4];
        for m in macros.iter_mut() {
            *m = MacroController {
                destination1: reader.value()?,
                depth1: reader.value()?,
                destination2: reader.value()?,
                depth2: reader.value()?,
            };
        }

        let b = reader.read_u8()?;
        let common = Self {
            name,
            volume,
            polyphony,
            source_muted,
            am,
            portamento,
            portamento_speed,
            bend_range,
            macros,
            switch1: reader.decode(high_nybble(b))?,
            switch2: reader.decode(low_nybble(b))?,
        };
        Ok((common, count))
    }

    pub(crate) fn write(&self, writer: &mut SyxWriter, source_count: u8) {
        self.name.write(writer);
        writer.value(self.volume);
        writer.kind(self.polyphony);
        writer.push(source_count);
        let playing = self
            .source_muted
            .iter()
            .enumerate()
            .fold(0, |b, (i, &muted)| with_bit(b, i as u8, !muted));
        writer.push(playing);
        writer.value(self.am);
        writer.flag(self.portamento);
        writer.value(self.portamento_speed);
        writer.value(self.bend_range);
        for m in &self.macros {
            writer.value(m.destination1);
            writer.value(m.depth1);
            writer.value(m.destination2);
            writer.value(m.depth2);
        }
        writer.push(nybbles_to_byte(self.switch1.to_wire(), self.switch2.to_wire()));
    }
}
