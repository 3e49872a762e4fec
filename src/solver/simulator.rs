//! Main simulator interface.

use log::debug;

use crate::conductor::{validate_constraints, ConductorAggregate};
use crate::error::Result;

use super::{
    solve_steady_state, solve_transient, ElectricConfig, ElectricSolution, ElectricSystem,
    JoulePowerAccumulator,
};

/// A conductor together with its electric solver context.
pub struct ElectricSimulator<C: ConductorAggregate> {
    /// The conductor being simulated
    conductor: C,
    /// Solver context
    system: ElectricSystem<C::Scalar>,
}

impl<C: ConductorAggregate> ElectricSimulator<C> {
    /// Create a new simulator for the given conductor with default configuration.
    pub fn new(conductor: C) -> Result<Self> {
        Self::with_config(conductor, ElectricConfig::default())
    }

    /// Create a new simulator for the given conductor with custom configuration.
    pub fn with_config(conductor: C, config: ElectricConfig) -> Result<Self> {
        let dofs = conductor.dof_count();
        validate_constraints(conductor.constraints(), dofs)?;
        let system = ElectricSystem::new(dofs, conductor.carrier_count(), config)?;
        Ok(Self { conductor, system })
    }

    /// Solve the steady state and keep it as the transient's starting point.
    pub fn steady_state(&mut self) -> Result<&ElectricSolution> {
        solve_steady_state(&mut self.system, &mut self.conductor)?;
        Ok(self.system.solution())
    }

    /// Advance by one outer step, split into `steps_per_call` sub-steps.
    pub fn advance(&mut self, outer_dt: f64) -> Result<&ElectricSolution> {
        self.system.set_outer_time_step(outer_dt)?;
        solve_transient(&mut self.system, &mut self.conductor)?;
        debug!(
            "outer step done at t = {:e} s, Joule integrals {:?}",
            self.system.time(),
            self.system.joule().integrals()
        );
        Ok(self.system.solution())
    }

    /// Electric time [s].
    pub fn time(&self) -> f64 {
        self.system.time()
    }

    pub fn solution(&self) -> &ElectricSolution {
        self.system.solution()
    }

    pub fn joule(&self) -> &JoulePowerAccumulator {
        self.system.joule()
    }

    /// Get a reference to the conductor.
    pub fn conductor(&self) -> &C {
        &self.conductor
    }

    pub fn conductor_mut(&mut self) -> &mut C {
        &mut self.conductor
    }

    /// Get a reference to the solver context.
    pub fn system(&self) -> &ElectricSystem<C::Scalar> {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut ElectricSystem<C::Scalar> {
        &mut self.system
    }
}
