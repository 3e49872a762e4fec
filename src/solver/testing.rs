//! Test aggregate serving fixed matrices through the conductor contract.

use nalgebra::DVector;
use nalgebra_sparse::CscMatrix;

use crate::conductor::{ConductorAggregate, ElectricConstraints, ElectricMatrices};
use crate::error::Result;

use super::sparse::from_triplets;
use super::{ElectricScalar, ElectricSolution};

/// Tridiagonal (2, -1) matrix.
pub fn laplacian(n: usize) -> CscMatrix<f64> {
    let mut t = Vec::new();
    for i in 0..n {
        t.push((i, i, 2.0));
        if i + 1 < n {
            t.push((i, i + 1, -1.0));
            t.push((i + 1, i, -1.0));
        }
    }
    from_triplets(n, &t)
}

pub struct MatrixAggregate<T: ElectricScalar> {
    pub stiffness: CscMatrix<T>,
    pub mass: CscMatrix<T>,
    pub known_term: DVector<T>,
    pub constraints: ElectricConstraints<T>,
    pub power: Vec<f64>,
    pub calls: Vec<&'static str>,
    pub times: Vec<f64>,
    pub last_solution: Option<ElectricSolution>,
}

impl<T: ElectricScalar> MatrixAggregate<T> {
    /// Identity mass, zero known term, unit carrier with no power.
    pub fn new(stiffness: CscMatrix<T>, constraints: ElectricConstraints<T>) -> Self {
        let n = stiffness.nrows();
        let identity: Vec<_> = (0..n).map(|i| (i, i, T::one())).collect();
        Self {
            mass: from_triplets(n, &identity),
            known_term: DVector::from_element(n, T::zero()),
            stiffness,
            constraints,
            power: vec![0.0],
            calls: Vec::new(),
            times: Vec::new(),
            last_solution: None,
        }
    }

    pub fn with_known_term(mut self, known_term: DVector<T>) -> Self {
        self.known_term = known_term;
        self
    }

    pub fn with_power(mut self, power: Vec<f64>) -> Self {
        self.power = power;
        self
    }
}

impl<T: ElectricScalar> ConductorAggregate for MatrixAggregate<T> {
    type Scalar = T;

    fn dof_count(&self) -> usize {
        self.stiffness.nrows()
    }

    fn carrier_count(&self) -> usize {
        self.power.len()
    }

    fn operating_conditions_em(&mut self, time: f64) -> Result<()> {
        self.calls.push("em");
        self.times.push(time);
        Ok(())
    }

    fn eval_total_operating_current(&mut self, _time: f64) -> Result<()> {
        self.calls.push("current");
        Ok(())
    }

    fn electric_matrices(&mut self) -> Result<ElectricMatrices<T>> {
        self.calls.push("matrices");
        Ok(ElectricMatrices {
            stiffness: self.stiffness.clone(),
            mass: self.mass.clone(),
        })
    }

    fn known_term(&mut self, _time: f64) -> Result<DVector<T>> {
        self.calls.push("known");
        Ok(self.known_term.clone())
    }

    fn constraints(&self) -> &ElectricConstraints<T> {
        &self.constraints
    }

    fn reorganize_solution(&mut self, solution: &ElectricSolution) -> Result<()> {
        self.calls.push("reorganize");
        self.last_solution = Some(solution.clone());
        Ok(())
    }

    fn joule_power(&self) -> Result<Vec<f64>> {
        Ok(self.power.clone())
    }
}
