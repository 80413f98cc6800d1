//! Presentation units. Everything below this layer is SI.

use clap::ValueEnum;
use ps_core::units::{Angle, Length};
use uom::si::angle::degree;
use uom::si::length::{inch, meter, millimeter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LengthUnit {
    /// Metres
    M,
    /// Millimetres
    Mm,
    /// Inches
    In,
}

impl LengthUnit {
    pub fn label(self) -> &'static str {
        match self {
            Self::M => "m",
            Self::Mm => "mm",
            Self::In => "in",
        }
    }

    pub fn value(self, length: Length) -> f64 {
        match self {
            Self::M => length.get::<meter>(),
            Self::Mm => length.get::<millimeter>(),
            Self::In => length.get::<inch>(),
        }
    }

    pub fn show(self, length: Length) -> String {
        format!("{:.5} {}", self.value(length), self.label())
    }
}

pub fn degrees(angle: Angle) -> f64 {
    angle.get::<degree>()
}
