//! # Scable Core
//!
//! Electric solver for discretized multi-carrier superconducting cables.
//!
//! This library provides:
//! - Reduction of sparse linear systems under fixed potentials and
//!   equipotential surfaces, and expansion of the reduced solution
//! - Steady-state and theta-method transient electric solves
//! - Time integration of Joule power per current carrier
//! - A reference 1-D cable model (strands, tape stacks, stabilizers, contacts)
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`conductor`] - Constraints, the conductor contract and the cable model
//! - [`components`] - Carrier, current waveform and contact models
//! - [`solver`] - Reduction, sparse direct solve, steady and transient drivers
//! - [`report`] - Step report output (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! scable --length 10 --elements 50 --carriers 2 --contact 1e3 --steps 20 --outer-dt 1e-3
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use scable_core::components::{CurrentCarrier, CurrentWaveform};
//! use scable_core::conductor::{CableDescriptor, CableModel};
//! use scable_core::ElectricSimulator;
//!
//! let cable = CableDescriptor::new(1.0, 10)
//!     .with_carrier(CurrentCarrier::strand("cu", 1e-6, 1.7e-8, 1e-7)?)
//!     .with_current(CurrentWaveform::Constant(100.0))
//!     .with_fixed_potential_at(1.0, 0.0);
//! let mut sim = ElectricSimulator::new(CableModel::new(cable)?)?;
//! sim.steady_state()?;
//! sim.advance(1e-3)?;
//! println!("{:?}", sim.joule().integrals());
//! # Ok::<(), scable_core::ScableError>(())
//! ```
//!
//! ## Electric Solution Method
//!
//! Every solve works on the system reduced by the constraints:
//!
//! 1. Lift fixed potentials into the right-hand side
//! 2. Merge each equipotential group into its representative DOF
//! 3. Solve the reduced sparse system by direct elimination
//! 4. Expand back to all DOFs
//!
//! The transient uses the theta method (backward Euler by default) with
//! several electric sub-steps per outer (thermal) step.

pub mod components;
pub mod conductor;
pub mod error;
pub mod solver;

#[cfg(feature = "cli")]
pub mod report;

// Re-export main types for convenience
pub use conductor::{CableDescriptor, CableModel, ConductorAggregate};
pub use error::{Result, ScableError};
pub use solver::{ElectricConfig, ElectricSimulator, ElectricSolution};

/// Default outer (thermal) time step in seconds
pub const DEFAULT_OUTER_TIME_STEP: f64 = 1e-3;
