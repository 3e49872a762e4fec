//! Steady-state electric solve.

use log::debug;
use nalgebra::DVector;

use crate::conductor::{check_length, check_square, ConductorAggregate, ElectricMatrices};
use crate::error::Result;

use super::{expand_solution, reduce_system, solve_natural, ElectricSolution, ElectricSystem};

/// Solve the time-invariant problem `A x = b` once.
///
/// Refreshes the conductor's electromagnetic quantities at the current
/// electric time, reduces, solves and expands. The result becomes both the
/// current solution and the steady-state snapshot that seeds the transient.
pub fn solve_steady_state<C: ConductorAggregate>(
    system: &mut ElectricSystem<C::Scalar>,
    conductor: &mut C,
) -> Result<()> {
    let dofs = system.dof_count();
    check_length(conductor.dof_count(), dofs, "conductor DOF count")?;
    let time = system.time;

    conductor.operating_conditions_em(time)?;
    let matrices = fetch_matrices(conductor, dofs)?;
    let known_term = fetch_known_term(conductor, time, dofs)?;

    let reduced = reduce_system(&matrices.stiffness, &known_term, conductor.constraints())?;
    let reduced_solution = solve_natural(&reduced.matrix, &reduced.known_term)?;

    let mut solution = ElectricSolution::zeros(dofs);
    expand_solution(&mut solution, &reduced_solution, &reduced)?;

    debug!(
        "steady electric solution at t = {time:e} s ({} of {dofs} DOFs solved{})",
        reduced.size(),
        if solution.is_complex() { ", complex" } else { "" }
    );

    system.solution = solution.clone();
    system.steady = Some(solution);
    Ok(())
}

/// Fetch the raw matrices and check their shape.
pub(super) fn fetch_matrices<C: ConductorAggregate>(
    conductor: &mut C,
    dofs: usize,
) -> Result<ElectricMatrices<C::Scalar>> {
    let matrices = conductor.electric_matrices()?;
    check_square(&matrices.stiffness, dofs, "stiffness matrix")?;
    check_square(&matrices.mass, dofs, "mass matrix")?;
    Ok(matrices)
}

/// Fetch the full-size known term; an unsized one counts as zeros.
pub(super) fn fetch_known_term<C: ConductorAggregate>(
    conductor: &mut C,
    time: f64,
    dofs: usize,
) -> Result<DVector<C::Scalar>> {
    let known_term = conductor.known_term(time)?;
    if known_term.is_empty() {
        return Ok(DVector::zeros(dofs));
    }
    check_length(known_term.len(), dofs, "known-term vector")?;
    Ok(known_term)
}
