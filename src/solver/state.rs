//! Solver context carried between electric sub-steps.

use nalgebra::DVector;

use crate::error::{Result, ScableError};

use super::{ElectricScalar, ElectricSolution, JoulePowerAccumulator, DEFAULT_ELECTRIC_STEPS, DEFAULT_THETA};

/// Configuration for the electric time integration.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectricConfig {
    /// Sub-steps per outer (thermal) step.
    pub steps_per_call: usize,
    /// Theta-method blending (1 = backward Euler, 0.5 = Crank-Nicolson).
    pub theta: f64,
}

impl Default for ElectricConfig {
    fn default() -> Self {
        Self {
            steps_per_call: DEFAULT_ELECTRIC_STEPS,
            theta: DEFAULT_THETA,
        }
    }
}

impl ElectricConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of sub-steps per outer step.
    pub fn with_steps_per_call(mut self, steps: usize) -> Self {
        self.steps_per_call = steps;
        self
    }

    /// Set the theta-method parameter.
    ///
    /// - 1.0 (default): fully implicit, damps everything
    /// - 0.5: second order, may ring on discontinuous excitation
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.steps_per_call == 0 {
            return Err(ScableError::invalid_parameter(
                "steps_per_call",
                "at least one electric sub-step is required",
            ));
        }
        if !(0.0..=1.0).contains(&self.theta) {
            return Err(ScableError::invalid_parameter(
                "theta",
                format!("{} is outside [0, 1]", self.theta),
            ));
        }
        Ok(())
    }
}

/// Explicit electric solver context.
///
/// Written only by the steady-state and transient procedures; read by the
/// host between calls.
#[derive(Debug, Clone)]
pub struct ElectricSystem<T: ElectricScalar> {
    dofs: usize,
    config: ElectricConfig,
    /// Sub-step length [s]
    pub(crate) time_step: f64,
    /// Electric time [s]
    pub(crate) time: f64,
    /// Sub-steps taken since the transient started (0 = not started)
    pub(crate) step_count: usize,
    /// Latest full solution, also the "old" one for the next sub-step
    pub(crate) solution: ElectricSolution,
    /// Snapshot from the steady-state solve
    pub(crate) steady: Option<ElectricSolution>,
    /// Full-size known term of the previous sub-step
    pub(crate) known_term_old: DVector<T>,
    pub(crate) joule: JoulePowerAccumulator,
}

impl<T: ElectricScalar> ElectricSystem<T> {
    /// Create a context for `dofs` DOFs and `carriers` current carriers.
    pub fn new(dofs: usize, carriers: usize, config: ElectricConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dofs,
            config,
            time_step: 0.0,
            time: 0.0,
            step_count: 0,
            solution: ElectricSolution::zeros(dofs),
            steady: None,
            known_term_old: DVector::from_element(dofs, T::zero()),
            joule: JoulePowerAccumulator::new(carriers),
        })
    }

    pub fn dof_count(&self) -> usize {
        self.dofs
    }

    pub fn config(&self) -> &ElectricConfig {
        &self.config
    }

    pub fn theta(&self) -> f64 {
        self.config.theta
    }

    pub fn steps_per_call(&self) -> usize {
        self.config.steps_per_call
    }

    /// Set the sub-step length directly.
    pub fn set_time_step(&mut self, dt: f64) -> Result<()> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(ScableError::invalid_parameter(
                "time_step",
                format!("{dt} is not a positive finite duration"),
            ));
        }
        self.time_step = dt;
        Ok(())
    }

    /// Derive the sub-step length from an outer step: `dt = outer / K`.
    pub fn set_outer_time_step(&mut self, outer: f64) -> Result<()> {
        self.set_time_step(outer / self.config.steps_per_call as f64)
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Electric time [s].
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Sub-steps taken since the transient started.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn solution(&self) -> &ElectricSolution {
        &self.solution
    }

    /// Steady-state snapshot, if computed.
    pub fn steady_state(&self) -> Option<&ElectricSolution> {
        self.steady.as_ref()
    }

    /// Use `initial` as the transient's starting point instead of a
    /// computed steady state.
    pub fn set_steady_state(&mut self, initial: ElectricSolution) -> Result<()> {
        if initial.len() != self.dofs {
            return Err(ScableError::dimension_mismatch(
                "initial solution",
                self.dofs,
                initial.len(),
            ));
        }
        self.steady = Some(initial);
        Ok(())
    }

    /// Forget transient history so the next call seeds from the steady state.
    pub fn restart_transient(&mut self) {
        self.step_count = 0;
    }

    pub fn joule(&self) -> &JoulePowerAccumulator {
        &self.joule
    }

    /// Mutable access for the consumer's reset policy.
    pub fn joule_mut(&mut self) -> &mut JoulePowerAccumulator {
        &mut self.joule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(ElectricConfig::new().validate().is_ok());
        assert!(ElectricConfig::new().with_theta(1.5).validate().is_err());
        assert!(ElectricConfig::new().with_steps_per_call(0).validate().is_err());
    }

    #[test]
    fn test_outer_step_is_split() {
        let mut sys = ElectricSystem::<f64>::new(4, 1, ElectricConfig::new()).unwrap();
        sys.set_outer_time_step(1e-2).unwrap();
        assert!((sys.time_step() - 1e-3).abs() < 1e-15);
        assert!(sys.set_time_step(0.0).is_err());
    }

    #[test]
    fn test_initial_solution_length() {
        let mut sys = ElectricSystem::<f64>::new(4, 1, ElectricConfig::new()).unwrap();
        assert!(sys.set_steady_state(ElectricSolution::zeros(3)).is_err());
        assert!(sys.set_steady_state(ElectricSolution::zeros(4)).is_ok());
    }
}
