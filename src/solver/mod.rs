//! Electric solver for multi-carrier cables.
//!
//! This module provides the numerical engine for the electric problem.
//!
//! ## Constrained system
//!
//! The conductor assembles a system `A x = b` (steady state) or
//! `M dx/dt + A x = b` (transient) over N DOFs, together with:
//! - fixed potentials: DOFs whose value is imposed
//! - equipotential surfaces: groups of DOFs forced to share one value
//!
//! Every solve follows the same pipeline:
//! ```text
//! reduce (lift fixed, merge groups, drop rows)
//!   -> sparse direct solve on the reduced system
//!   -> expand (write solved, fixed and merged values back to N DOFs)
//! ```
//!
//! The transient uses the theta method with `steps_per_call` sub-steps per
//! outer step and integrates the conductor's Joule power over them.

mod expand;
mod joule;
mod lu;
mod reduce;
mod scalar;
mod simulator;
mod sparse;
mod state;
mod steady;
mod transient;

#[cfg(test)]
pub(crate) mod testing;

pub use expand::{expand_solution, ElectricSolution};
pub use joule::JoulePowerAccumulator;
pub use lu::solve_natural;
pub use reduce::{
    lift_fixed, merge_equipotential_matrix, merge_equipotential_vector, reduce_system,
    retained_indices, ReducedSystem,
};
pub use scalar::ElectricScalar;
pub use simulator::ElectricSimulator;
pub use sparse::{from_triplets, linear_combination, matvec};
pub use state::{ElectricConfig, ElectricSystem};
pub use steady::solve_steady_state;
pub use transient::solve_transient;

/// Default number of electric sub-steps per outer step.
pub const DEFAULT_ELECTRIC_STEPS: usize = 10;

/// Default theta-method parameter (backward Euler).
pub const DEFAULT_THETA: f64 = 1.0;

/// Pivots with modulus at or below this are treated as zero.
pub const PIVOT_TOLERANCE: f64 = 1e-300;
