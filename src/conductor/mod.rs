//! Conductor side of the electric problem.
//!
//! This module contains:
//! - Constraint descriptors (fixed potentials, equipotential surfaces)
//! - Validation of constraints and assembled shapes
//! - The [`ConductorAggregate`] contract the solver drives
//! - [`CableModel`], a reference multi-carrier cable

mod aggregate;
mod cable;
mod types;
mod validate;

pub use aggregate::{ConductorAggregate, ElectricMatrices};
pub use cable::{CableDescriptor, CableModel};
pub use types::{DofIndex, ElectricConstraints, EquipotentialSurfaces, FixedPotentials};
pub use validate::{check_length, check_square, validate_constraints};
