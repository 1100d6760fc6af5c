//! Hardware color models.
//!
//! [Machine] names a model, [MachineTransform] is the ready to run
//! transform built from validated [MachineSettings].

pub mod amstrad;
pub mod apple2;
pub mod attribute;
pub mod c64;
pub mod msx;
pub mod zx_spectrum;

use std::{fmt::Display, str::FromStr};

use crate::{
    dithering::{Dither, DitherConfig, Parallelism, halftone::HalftoneCluster},
    error::{Error, Result},
    texture::{Shape, TextureMutSlice},
    transform::prelude::*,
};

use amstrad::AmstradCpc;
use apple2::Apple2Transform;
use attribute::AttributeTransform;
use c64::C64;
use msx::Msx;
use zx_spectrum::{ZxSelector, ZxSpectrum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Machine {
    #[default]
    AmstradCpc,
    C64,
    Msx,
    ZxSpectrum,
    Apple2,
}

impl Machine {
    pub const ALL: [Machine; 5] = [
        Machine::AmstradCpc,
        Machine::C64,
        Machine::Msx,
        Machine::ZxSpectrum,
        Machine::Apple2,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Machine::AmstradCpc => "amstrad_cpc",
            Machine::C64 => "c64",
            Machine::Msx => "msx",
            Machine::ZxSpectrum => "zx_spectrum",
            Machine::Apple2 => "apple2",
        }
    }
}

impl FromStr for Machine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Machine::ALL
            .into_iter()
            .find(|machine| machine.name() == s)
            .ok_or_else(|| Error::invalid("machine", s))
    }
}

impl Display for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Every knob a machine may read. Machines ignore the ones they have no use
/// for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineSettings {
    pub dither: Dither,
    pub strength: u8,
    pub serpentine: bool,
    pub halftone: HalftoneCluster,
    /// Apple II binary dot pass
    pub use_halftone: bool,
    pub zx_selector: ZxSelector,
    pub parallelism: Parallelism,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            dither: Dither::None,
            strength: 100,
            serpentine: true,
            halftone: HalftoneCluster::One,
            use_halftone: true,
            zx_selector: ZxSelector::Search,
            parallelism: Parallelism::Auto,
        }
    }
}

pub enum MachineTransform {
    AmstradCpc(AmstradCpc),
    C64(AttributeTransform<C64>),
    Msx(AttributeTransform<Msx>),
    ZxSpectrum(AttributeTransform<ZxSpectrum>),
    Apple2(Apple2Transform),
}

impl MachineTransform {
    /// Validates `settings` for `machine`; nothing is built on error.
    pub fn new(machine: Machine, settings: &MachineSettings) -> Result<Self> {
        let parallelism = settings.parallelism;
        // ranges are checked for every machine, used or not
        let config = DitherConfig::new(
            settings.dither,
            settings.strength,
            settings.serpentine,
            amstrad::PIXEL_WIDTH,
        )?;
        let transform = match machine {
            Machine::AmstradCpc => {
                MachineTransform::AmstradCpc(AmstradCpc::new(config).with_parallelism(parallelism))
            }
            Machine::C64 => MachineTransform::C64(
                AttributeTransform::new(C64::new()).with_parallelism(parallelism),
            ),
            Machine::Msx => MachineTransform::Msx(
                AttributeTransform::new(Msx::new(settings.halftone)).with_parallelism(parallelism),
            ),
            Machine::ZxSpectrum => MachineTransform::ZxSpectrum(
                AttributeTransform::new(ZxSpectrum::new(settings.halftone, settings.zx_selector))
                    .with_parallelism(parallelism),
            ),
            Machine::Apple2 => MachineTransform::Apple2(Apple2Transform::new(
                settings.use_halftone.then_some(settings.halftone),
            )),
        };
        tracing::debug!(%machine, ?settings, "built machine transform");
        Ok(transform)
    }

    pub fn machine(&self) -> Machine {
        match self {
            MachineTransform::AmstradCpc(_) => Machine::AmstradCpc,
            MachineTransform::C64(_) => Machine::C64,
            MachineTransform::Msx(_) => Machine::Msx,
            MachineTransform::ZxSpectrum(_) => Machine::ZxSpectrum,
            MachineTransform::Apple2(_) => Machine::Apple2,
        }
    }
}

impl TextureTransform for MachineTransform {
    fn apply<'t>(
        &mut self,
        texture: TextureMutSlice<'t, u8>,
        progress: &Progress,
    ) -> TextureMutSlice<'t, u8> {
        match self {
            MachineTransform::AmstradCpc(t) => t.apply(texture, progress),
            MachineTransform::C64(t) => t.apply(texture, progress),
            MachineTransform::Msx(t) => t.apply(texture, progress),
            MachineTransform::ZxSpectrum(t) => t.apply(texture, progress),
            MachineTransform::Apple2(t) => t.apply(texture, progress),
        }
    }

    fn prepare(&mut self, shape: Shape) {
        match self {
            MachineTransform::AmstradCpc(t) => t.prepare(shape),
            MachineTransform::C64(t) => t.prepare(shape),
            MachineTransform::Msx(t) => t.prepare(shape),
            MachineTransform::ZxSpectrum(t) => t.prepare(shape),
            MachineTransform::Apple2(t) => t.prepare(shape),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_names() {
        for machine in Machine::ALL {
            assert_eq!(machine.name().parse::<Machine>().unwrap(), machine);
        }
        assert!("spectrum".parse::<Machine>().is_err());
    }

    #[test]
    fn test_invalid_strength_is_rejected() {
        let settings = MachineSettings {
            strength: 101,
            ..Default::default()
        };
        for machine in Machine::ALL {
            assert!(MachineTransform::new(machine, &settings).is_err());
        }
        let transform = MachineTransform::new(Machine::Msx, &MachineSettings::default()).unwrap();
        assert_eq!(transform.machine(), Machine::Msx);
    }
}
