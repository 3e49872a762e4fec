//! Current carriers: strands, tape stacks and stabilizers.

use crate::error::{Result, ScableError};

/// Kind of current carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierKind {
    /// Round or mixed strand
    Strand,
    /// Stack of superconducting tapes
    Stack,
    /// Stabilizer (pure normal metal)
    Stabilizer,
}

/// One layer of a tape in a stack.
#[derive(Debug, Clone, PartialEq)]
pub struct TapeLayer {
    /// Material name; "none" marks an unused layer slot
    pub material: String,
    /// Layer thickness [m]
    pub thickness: f64,
    /// Electrical resistivity [Ohm m]
    pub resistivity: f64,
}

impl TapeLayer {
    pub fn new(material: impl Into<String>, thickness: f64, resistivity: f64) -> Self {
        Self {
            material: material.into(),
            thickness,
            resistivity,
        }
    }

    /// Unused slots are skipped when homogenizing the stack.
    pub fn is_used(&self) -> bool {
        self.thickness > 0.0 && !self.material.eq_ignore_ascii_case("none")
    }
}

/// A current carrier running along the whole cable.
///
/// Properties are per unit length; the cable multiplies them by the element
/// length.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentCarrier {
    pub name: String,
    pub kind: CarrierKind,
    /// Longitudinal conductance per unit length times length, i.e. A/rho [S m]
    conductance_length: f64,
    /// Self inductance per unit length [H/m]
    pub inductance: f64,
}

impl CurrentCarrier {
    /// A strand of cross section `area` [m^2] and resistivity [Ohm m].
    pub fn strand(
        name: impl Into<String>,
        area: f64,
        resistivity: f64,
        inductance: f64,
    ) -> Result<Self> {
        Self::homogeneous(name.into(), CarrierKind::Strand, area, resistivity, inductance)
    }

    /// A stabilizer; same model as a strand.
    pub fn stabilizer(
        name: impl Into<String>,
        area: f64,
        resistivity: f64,
        inductance: f64,
    ) -> Result<Self> {
        Self::homogeneous(name.into(), CarrierKind::Stabilizer, area, resistivity, inductance)
    }

    /// A stack of tapes of the given width whose layers conduct in parallel.
    pub fn stack(
        name: impl Into<String>,
        width: f64,
        layers: &[TapeLayer],
        inductance: f64,
    ) -> Result<Self> {
        let name = name.into();
        positive(&name, "width", width)?;
        non_negative(&name, "inductance", inductance)?;

        let mut conductance_length = 0.0;
        let mut used = 0;
        for layer in layers.iter().filter(|l| l.is_used()) {
            positive(&name, &format!("{} resistivity", layer.material), layer.resistivity)?;
            conductance_length += width * layer.thickness / layer.resistivity;
            used += 1;
        }
        if used == 0 {
            return Err(ScableError::invalid_parameter(
                name,
                "stack has no conducting layer",
            ));
        }

        Ok(Self {
            name,
            kind: CarrierKind::Stack,
            conductance_length,
            inductance,
        })
    }

    fn homogeneous(
        name: String,
        kind: CarrierKind,
        area: f64,
        resistivity: f64,
        inductance: f64,
    ) -> Result<Self> {
        positive(&name, "area", area)?;
        positive(&name, "resistivity", resistivity)?;
        non_negative(&name, "inductance", inductance)?;
        Ok(Self {
            name,
            kind,
            conductance_length: area / resistivity,
            inductance,
        })
    }

    /// Resistance per unit length [Ohm/m].
    pub fn resistance_per_length(&self) -> f64 {
        1.0 / self.conductance_length
    }

    /// Inverse of [`resistance_per_length`](Self::resistance_per_length), used
    /// to share the operating current.
    pub fn conductance_length(&self) -> f64 {
        self.conductance_length
    }
}

fn positive(carrier: &str, what: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ScableError::invalid_parameter(
            carrier,
            format!("{what} must be positive, got {value}"),
        ))
    }
}

fn non_negative(carrier: &str, what: &str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ScableError::invalid_parameter(
            carrier,
            format!("{what} must be non-negative, got {value}"),
        ))
    }
}
