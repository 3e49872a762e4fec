//! Transient electric solve with the theta method.
//!
//! Each sub-step solves
//!
//! ```text
//! (M/dt + θA) x_new = (M/dt − (1−θ)A) x_old + θ b_new + (1−θ) b_old
//! ```
//!
//! with the fixed potentials lifted through the implicit matrix and the
//! equipotential groups merged, exactly as in the steady-state solve.

use log::{debug, trace};
use nalgebra::DVector;

use crate::conductor::{check_length, ConductorAggregate};
use crate::error::{Result, ScableError};

use super::sparse::{linear_combination, matvec};
use super::steady::{fetch_known_term, fetch_matrices};
use super::{expand_solution, reduce_system, solve_natural, ElectricScalar, ElectricSystem};

/// Run one outer call: `steps_per_call` electric sub-steps.
///
/// On the first call after a (re)start the working solution is seeded from
/// the steady-state snapshot. Later calls continue from the previous
/// sub-step's solution.
pub fn solve_transient<C: ConductorAggregate>(
    system: &mut ElectricSystem<C::Scalar>,
    conductor: &mut C,
) -> Result<()> {
    let dofs = system.dof_count();
    check_length(conductor.dof_count(), dofs, "conductor DOF count")?;
    if system.time_step <= 0.0 {
        return Err(ScableError::invalid_parameter(
            "time_step",
            "electric time step not set",
        ));
    }

    if system.step_count == 0 {
        let steady = system.steady.clone().ok_or(ScableError::MissingSteadyState)?;
        system.solution = steady;
    }

    system.known_term_old = fetch_known_term(conductor, system.time, dofs)?;

    for _ in 0..system.steps_per_call() {
        transient_step(system, conductor)?;
    }

    debug!(
        "electric transient reached t = {:e} s after {} sub-steps",
        system.time, system.step_count
    );
    Ok(())
}

/// One implicit sub-step. Sequential by construction: it needs the previous
/// solution and known term.
fn transient_step<C: ConductorAggregate>(
    system: &mut ElectricSystem<C::Scalar>,
    conductor: &mut C,
) -> Result<()> {
    let dofs = system.dof_count();
    let dt = system.time_step;
    let theta = system.theta();

    system.time += dt;
    system.step_count += 1;
    let time = system.time;

    conductor.operating_conditions_em(time)?;
    conductor.eval_total_operating_current(time)?;
    let matrices = fetch_matrices(conductor, dofs)?;

    let inv_dt = C::Scalar::from_real(1.0 / dt);
    let implicit = linear_combination(
        &matrices.mass,
        inv_dt,
        &matrices.stiffness,
        C::Scalar::from_real(theta),
    )?;
    let explicit = linear_combination(
        &matrices.mass,
        inv_dt,
        &matrices.stiffness,
        C::Scalar::from_real(theta - 1.0),
    )?;

    // Boundary contribution alone: reduce with a zero known term
    let zero = DVector::zeros(dofs);
    let boundary = reduce_system(&implicit, &zero, conductor.constraints())?;

    let known_new = fetch_known_term(conductor, time, dofs)?;
    let x_old = system.solution.to_scalar::<C::Scalar>();

    let w_new = C::Scalar::from_real(theta);
    let w_old = C::Scalar::from_real(1.0 - theta);
    let mut rhs_full = matvec(&explicit, &x_old);
    for i in 0..dofs {
        rhs_full[i] += w_new * known_new[i] + w_old * system.known_term_old[i];
    }

    let mut rhs = boundary.reduce_vector(&rhs_full)?;
    rhs += &boundary.known_term;

    let reduced_solution = solve_natural(&boundary.matrix, &rhs)?;

    system.known_term_old = known_new;
    expand_solution(&mut system.solution, &reduced_solution, &boundary)?;

    conductor.reorganize_solution(&system.solution)?;
    let power = conductor.joule_power()?;
    system.joule.accumulate(&power, dt)?;

    trace!(
        "electric sub-step {} at t = {time:e} s, {} unknowns",
        system.step_count,
        boundary.size()
    );
    Ok(())
}
