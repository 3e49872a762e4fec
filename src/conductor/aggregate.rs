//! The call contract between the electric solver and the conductor that
//! owns the cable components.

use nalgebra::DVector;
use nalgebra_sparse::CscMatrix;

use crate::error::Result;
use crate::solver::{ElectricScalar, ElectricSolution};

use super::ElectricConstraints;

/// Raw (unconstrained) matrices of the electric problem.
#[derive(Debug, Clone)]
pub struct ElectricMatrices<T: ElectricScalar> {
    /// Resistance/conductance couplings, N x N
    pub stiffness: CscMatrix<T>,
    /// Inductive/capacitive couplings, N x N
    pub mass: CscMatrix<T>,
}

/// Host aggregate that assembles the electric problem.
///
/// The solver calls these in a fixed order on every sub-step:
/// `operating_conditions_em` -> `eval_total_operating_current` ->
/// `electric_matrices` -> `known_term` -> (solve) -> `reorganize_solution` ->
/// `joule_power`.
pub trait ConductorAggregate {
    /// Scalar type of the assembled matrices.
    type Scalar: ElectricScalar;

    /// Number of electric DOFs N.
    fn dof_count(&self) -> usize;

    /// Number of current carriers that receive Joule power.
    fn carrier_count(&self) -> usize;

    /// Refresh electromagnetic quantities at integration points for `time`.
    fn operating_conditions_em(&mut self, time: f64) -> Result<()>;

    /// Refresh the total operating current for `time`.
    fn eval_total_operating_current(&mut self, time: f64) -> Result<()>;

    /// Assemble the raw stiffness and mass matrices.
    fn electric_matrices(&mut self) -> Result<ElectricMatrices<Self::Scalar>>;

    /// Full-size known-term vector (source terms) at `time`.
    ///
    /// An empty vector means the conductor has not sized it yet; the solver
    /// treats it as all zeros.
    fn known_term(&mut self, time: f64) -> Result<DVector<Self::Scalar>>;

    /// Fixed potentials and equipotential surfaces.
    fn constraints(&self) -> &ElectricConstraints<Self::Scalar>;

    /// Split the expanded solution into per-component quantities.
    fn reorganize_solution(&mut self, solution: &ElectricSolution) -> Result<()>;

    /// Instantaneous Joule power per carrier from the last reorganized
    /// solution (longitudinal resistance plus inter-carrier conductance).
    fn joule_power(&self) -> Result<Vec<f64>>;
}
