//! Electric contacts between current carriers.

use crate::error::{Result, ScableError};

/// How a contact conductance value is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConductanceDefinition {
    /// Value in S/m, multiplied by the length each node represents
    #[default]
    PerUnitLength,
    /// Value in S for the whole cable, spread over nodes by length
    Lumped,
}

/// Transverse conductance (and optional mutual inductance) between two
/// carriers, present at every node.
#[derive(Debug, Clone, PartialEq)]
pub struct InterCarrierConductance {
    /// Indices of the two carriers in contact
    pub carriers: [usize; 2],
    pub value: f64,
    pub definition: ConductanceDefinition,
    /// Mutual inductance per unit length [H/m]
    pub mutual_inductance: f64,
}

impl InterCarrierConductance {
    /// Create a contact between two different carriers.
    pub fn new(
        carriers: [usize; 2],
        value: f64,
        definition: ConductanceDefinition,
    ) -> Result<Self> {
        if carriers[0] == carriers[1] {
            return Err(ScableError::invalid_parameter(
                "contact",
                format!("carrier {} cannot contact itself", carriers[0]),
            ));
        }
        if !(value >= 0.0 && value.is_finite()) {
            return Err(ScableError::invalid_parameter(
                "contact",
                format!("conductance must be non-negative, got {value}"),
            ));
        }
        Ok(Self {
            carriers,
            value,
            definition,
            mutual_inductance: 0.0,
        })
    }

    /// Set the mutual inductance per unit length.
    pub fn with_mutual_inductance(mut self, mutual_inductance: f64) -> Self {
        self.mutual_inductance = mutual_inductance;
        self
    }

    /// Conductance [S] lumped at a node standing for `node_length` of a
    /// cable of total length `cable_length`.
    pub fn node_conductance(&self, node_length: f64, cable_length: f64) -> f64 {
        match self.definition {
            ConductanceDefinition::PerUnitLength => self.value * node_length,
            ConductanceDefinition::Lumped => self.value * node_length / cable_length,
        }
    }
}
