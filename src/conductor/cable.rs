//! Reference conductor: a 1-D discretized cable of parallel current carriers.
//!
//! DOF layout, with `E` elements and `E + 1` nodes per carrier:
//!
//! ```text
//! [ I(0,0) .. I(0,E-1) | I(1,0) .. | ... | phi(0,0) .. phi(0,E) | phi(1,0) .. | ... ]
//! ```
//!
//! Element rows hold Ohm's law along the carrier, node rows hold current
//! conservation including the transverse contact currents:
//!
//! ```text
//! R_e I_e + phi_{e+1} - phi_e         = 0      (stiffness)
//! L_e dI_e/dt + sum_k M_e dI_k,e/dt            (mass)
//! sum I_out - sum I_in + sum G (phi_c - phi_k) = injected current
//! ```

use log::{debug, trace};
use nalgebra::DVector;

use crate::components::{CurrentCarrier, CurrentWaveform, InterCarrierConductance};
use crate::error::{Result, ScableError};
use crate::solver::{from_triplets, ElectricSolution};

use super::{
    check_length, ConductorAggregate, DofIndex, ElectricConstraints, ElectricMatrices,
    EquipotentialSurfaces, FixedPotentials,
};

/// Geometry, carriers, contacts and boundary conditions of a cable.
#[derive(Debug, Clone, PartialEq)]
pub struct CableDescriptor {
    /// Cable length [m]
    pub length: f64,
    /// Elements per carrier
    pub elements: usize,
    pub carriers: Vec<CurrentCarrier>,
    pub contacts: Vec<InterCarrierConductance>,
    pub current: CurrentWaveform,
    /// Coordinates [m] where all carriers share one potential
    pub equipotential_coordinates: Vec<f64>,
    /// (coordinate [m], potential [V]) imposed on all carriers
    pub fixed_potentials: Vec<(f64, f64)>,
}

impl CableDescriptor {
    /// An empty cable; add carriers and at least one fixed potential.
    pub fn new(length: f64, elements: usize) -> Self {
        Self {
            length,
            elements,
            carriers: Vec::new(),
            contacts: Vec::new(),
            current: CurrentWaveform::default(),
            equipotential_coordinates: Vec::new(),
            fixed_potentials: Vec::new(),
        }
    }

    pub fn with_carrier(mut self, carrier: CurrentCarrier) -> Self {
        self.carriers.push(carrier);
        self
    }

    pub fn with_contact(mut self, contact: InterCarrierConductance) -> Self {
        self.contacts.push(contact);
        self
    }

    pub fn with_current(mut self, current: CurrentWaveform) -> Self {
        self.current = current;
        self
    }

    pub fn with_equipotential_at(mut self, coordinate: f64) -> Self {
        self.equipotential_coordinates.push(coordinate);
        self
    }

    pub fn with_fixed_potential_at(mut self, coordinate: f64, potential: f64) -> Self {
        self.fixed_potentials.push((coordinate, potential));
        self
    }

    /// Element length [m].
    pub fn element_length(&self) -> f64 {
        self.length / self.elements as f64
    }

    /// Node nearest to `coordinate`.
    pub fn nearest_node(&self, coordinate: f64) -> usize {
        let node = (coordinate / self.element_length()).round();
        (node.max(0.0) as usize).min(self.elements)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.length > 0.0 && self.length.is_finite()) {
            return Err(ScableError::invalid_cable(format!(
                "length must be positive, got {}",
                self.length
            )));
        }
        if self.elements == 0 {
            return Err(ScableError::invalid_cable("at least one element is required"));
        }
        if self.carriers.is_empty() {
            return Err(ScableError::invalid_cable("no current carriers"));
        }
        for contact in &self.contacts {
            if let Some(&c) = contact.carriers.iter().find(|&&c| c >= self.carriers.len()) {
                return Err(ScableError::invalid_cable(format!(
                    "contact references carrier {c}, only {} defined",
                    self.carriers.len()
                )));
            }
        }
        if self.fixed_potentials.is_empty() {
            return Err(ScableError::invalid_cable(
                "at least one fixed potential is required to define the potential level",
            ));
        }

        let in_range = |x: f64| (0.0..=self.length).contains(&x);
        let mut fixed_nodes = Vec::new();
        for &(x, value) in &self.fixed_potentials {
            if !in_range(x) || !value.is_finite() {
                return Err(ScableError::invalid_cable(format!(
                    "fixed potential {value} V at {x} m is not usable"
                )));
            }
            fixed_nodes.push(self.nearest_node(x));
        }
        let mut surface_nodes = Vec::new();
        for &x in &self.equipotential_coordinates {
            if !in_range(x) {
                return Err(ScableError::invalid_cable(format!(
                    "equipotential surface at {x} m is outside the cable"
                )));
            }
            let node = self.nearest_node(x);
            if surface_nodes.contains(&node) || fixed_nodes.contains(&node) {
                return Err(ScableError::invalid_cable(format!(
                    "equipotential surface at {x} m collides with another constraint at node {node}"
                )));
            }
            surface_nodes.push(node);
        }
        Ok(())
    }
}

/// [`ConductorAggregate`] for a [`CableDescriptor`].
#[derive(Debug, Clone)]
pub struct CableModel {
    descriptor: CableDescriptor,
    constraints: ElectricConstraints<f64>,
    /// Element resistance [Ohm] per carrier, refreshed by the em update
    resistance: Vec<f64>,
    /// Operating current [A] from the last current evaluation
    operating_current: f64,
    /// Per carrier, per element [A]
    currents: Vec<Vec<f64>>,
    /// Per carrier, per node [V]
    potentials: Vec<Vec<f64>>,
    resistive_power: Vec<f64>,
    conductance_power: Vec<f64>,
}

impl CableModel {
    pub fn new(descriptor: CableDescriptor) -> Result<Self> {
        descriptor.validate()?;
        let carriers = descriptor.carriers.len();
        let elements = descriptor.elements;
        let mut model = Self {
            constraints: ElectricConstraints::default(),
            resistance: vec![0.0; carriers],
            operating_current: descriptor.current.current_at(0.0),
            currents: vec![vec![0.0; elements]; carriers],
            potentials: vec![vec![0.0; elements + 1]; carriers],
            resistive_power: vec![0.0; carriers],
            conductance_power: vec![0.0; carriers],
            descriptor,
        };
        model.constraints = model.build_constraints()?;
        model.update_resistance();
        debug!(
            "cable model: {carriers} carriers, {elements} elements, {} DOFs",
            model.dof_count()
        );
        Ok(model)
    }

    pub fn descriptor(&self) -> &CableDescriptor {
        &self.descriptor
    }

    /// Index of the current DOF of `element` in `carrier`.
    pub fn current_dof(&self, carrier: usize, element: usize) -> DofIndex {
        carrier * self.descriptor.elements + element
    }

    /// Index of the potential DOF of `node` in `carrier`.
    pub fn potential_dof(&self, carrier: usize, node: usize) -> DofIndex {
        self.descriptor.carriers.len() * self.descriptor.elements
            + carrier * (self.descriptor.elements + 1)
            + node
    }

    /// Node coordinates [m].
    pub fn node_coordinates(&self) -> Vec<f64> {
        let dx = self.descriptor.element_length();
        (0..=self.descriptor.elements).map(|n| n as f64 * dx).collect()
    }

    /// Operating current [A] from the last evaluation.
    pub fn operating_current(&self) -> f64 {
        self.operating_current
    }

    /// Element currents of a carrier from the last reorganized solution.
    pub fn carrier_currents(&self, carrier: usize) -> &[f64] {
        &self.currents[carrier]
    }

    /// Node potentials of a carrier from the last reorganized solution.
    pub fn carrier_potentials(&self, carrier: usize) -> &[f64] {
        &self.potentials[carrier]
    }

    /// Joule power [W] from the longitudinal resistance, per carrier.
    pub fn resistive_power(&self) -> &[f64] {
        &self.resistive_power
    }

    /// Joule power [W] from the contact conductances, per carrier.
    pub fn conductance_power(&self) -> &[f64] {
        &self.conductance_power
    }

    /// Fraction of the operating current entering each carrier.
    fn current_shares(&self) -> Vec<f64> {
        let total: f64 = self
            .descriptor
            .carriers
            .iter()
            .map(CurrentCarrier::conductance_length)
            .sum();
        self.descriptor
            .carriers
            .iter()
            .map(|c| c.conductance_length() / total)
            .collect()
    }

    /// Length represented by `node`: half elements at the ends.
    fn node_length(&self, node: usize) -> f64 {
        let dx = self.descriptor.element_length();
        if node == 0 || node == self.descriptor.elements {
            0.5 * dx
        } else {
            dx
        }
    }

    fn update_resistance(&mut self) {
        let dx = self.descriptor.element_length();
        for (r, carrier) in self.resistance.iter_mut().zip(&self.descriptor.carriers) {
            *r = carrier.resistance_per_length() * dx;
        }
    }

    fn build_constraints(&self) -> Result<ElectricConstraints<f64>> {
        let carriers = self.descriptor.carriers.len();

        let mut indices = Vec::new();
        let mut values = Vec::new();
        for &(x, value) in &self.descriptor.fixed_potentials {
            let node = self.descriptor.nearest_node(x);
            for c in 0..carriers {
                indices.push(self.potential_dof(c, node));
                values.push(value);
            }
        }
        let fixed = FixedPotentials::new(indices, values)?;

        let equipotential = if self.descriptor.equipotential_coordinates.is_empty() {
            EquipotentialSurfaces::disabled()
        } else {
            let groups = self
                .descriptor
                .equipotential_coordinates
                .iter()
                .map(|&x| {
                    let node = self.descriptor.nearest_node(x);
                    (0..carriers).map(|c| self.potential_dof(c, node)).collect()
                })
                .collect();
            EquipotentialSurfaces::new(groups)
        };

        Ok(ElectricConstraints::new(fixed, equipotential))
    }
}

impl ConductorAggregate for CableModel {
    type Scalar = f64;

    fn dof_count(&self) -> usize {
        self.descriptor.carriers.len() * (2 * self.descriptor.elements + 1)
    }

    fn carrier_count(&self) -> usize {
        self.descriptor.carriers.len()
    }

    fn operating_conditions_em(&mut self, time: f64) -> Result<()> {
        self.update_resistance();
        trace!("cable em properties refreshed at t = {time:e} s");
        Ok(())
    }

    fn eval_total_operating_current(&mut self, time: f64) -> Result<()> {
        self.operating_current = self.descriptor.current.current_at(time);
        Ok(())
    }

    fn electric_matrices(&mut self) -> Result<ElectricMatrices<f64>> {
        let n = self.dof_count();
        let elements = self.descriptor.elements;
        let dx = self.descriptor.element_length();
        let mut stiffness = Vec::new();
        let mut mass = Vec::new();

        for (c, carrier) in self.descriptor.carriers.iter().enumerate() {
            for e in 0..elements {
                let row = self.current_dof(c, e);
                let (from, to) = (self.potential_dof(c, e), self.potential_dof(c, e + 1));

                stiffness.push((row, row, self.resistance[c]));
                stiffness.push((row, to, 1.0));
                stiffness.push((row, from, -1.0));
                mass.push((row, row, carrier.inductance * dx));

                // Current leaves `from` and enters `to`
                stiffness.push((from, row, 1.0));
                stiffness.push((to, row, -1.0));
            }
        }

        for contact in &self.descriptor.contacts {
            let [a, b] = contact.carriers;
            for node in 0..=elements {
                let g = contact.node_conductance(self.node_length(node), self.descriptor.length);
                let (pa, pb) = (self.potential_dof(a, node), self.potential_dof(b, node));
                stiffness.extend([(pa, pa, g), (pa, pb, -g), (pb, pb, g), (pb, pa, -g)]);
            }
            if contact.mutual_inductance != 0.0 {
                for e in 0..elements {
                    let (ia, ib) = (self.current_dof(a, e), self.current_dof(b, e));
                    let m = contact.mutual_inductance * dx;
                    mass.extend([(ia, ib, m), (ib, ia, m)]);
                }
            }
        }

        Ok(ElectricMatrices {
            stiffness: from_triplets(n, &stiffness),
            mass: from_triplets(n, &mass),
        })
    }

    fn known_term(&mut self, _time: f64) -> Result<DVector<f64>> {
        let mut b = DVector::zeros(self.dof_count());
        let outlet = self.descriptor.elements;
        for (c, share) in self.current_shares().into_iter().enumerate() {
            let injected = share * self.operating_current;
            b[self.potential_dof(c, 0)] += injected;
            b[self.potential_dof(c, outlet)] -= injected;
        }
        Ok(b)
    }

    fn constraints(&self) -> &ElectricConstraints<f64> {
        &self.constraints
    }

    fn reorganize_solution(&mut self, solution: &ElectricSolution) -> Result<()> {
        check_length(solution.len(), self.dof_count(), "cable solution")?;
        let carriers = self.descriptor.carriers.len();
        let elements = self.descriptor.elements;

        for c in 0..carriers {
            for e in 0..elements {
                self.currents[c][e] = solution.re(self.current_dof(c, e));
            }
            for node in 0..=elements {
                self.potentials[c][node] = solution.re(self.potential_dof(c, node));
            }
        }

        for c in 0..carriers {
            self.resistive_power[c] = self.currents[c]
                .iter()
                .map(|i| self.resistance[c] * i * i)
                .sum();
        }

        self.conductance_power.fill(0.0);
        for contact in &self.descriptor.contacts {
            let [a, b] = contact.carriers;
            let mut power = 0.0;
            for node in 0..=elements {
                let g = contact.node_conductance(self.node_length(node), self.descriptor.length);
                let dv = self.potentials[a][node] - self.potentials[b][node];
                power += g * dv * dv;
            }
            // Split evenly between the two carriers
            self.conductance_power[a] += 0.5 * power;
            self.conductance_power[b] += 0.5 * power;
        }
        Ok(())
    }

    fn joule_power(&self) -> Result<Vec<f64>> {
        Ok(self
            .resistive_power
            .iter()
            .zip(&self.conductance_power)
            .map(|(r, g)| r + g)
            .collect())
    }
}
