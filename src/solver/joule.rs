//! Time integral of Joule power over the electric sub-steps.

use crate::conductor::check_length;
use crate::error::Result;

/// Running left-rectangle integral of Joule power, one entry per current
/// carrier.
///
/// The integral is only ever added to here; whoever consumes it (the thermal
/// step) decides when to [`reset`](JoulePowerAccumulator::reset).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JoulePowerAccumulator {
    /// Sum of P_i * dt per carrier [J/m or J, as supplied by the conductor]
    integrals: Vec<f64>,
    /// Electric time covered since the last reset [s]
    elapsed: f64,
}

impl JoulePowerAccumulator {
    /// Create an accumulator for `carriers` current carriers.
    pub fn new(carriers: usize) -> Self {
        Self {
            integrals: vec![0.0; carriers],
            elapsed: 0.0,
        }
    }

    /// Add `power * dt` for every carrier.
    pub fn accumulate(&mut self, power: &[f64], dt: f64) -> Result<()> {
        check_length(power.len(), self.integrals.len(), "Joule power per carrier")?;
        for (integral, &p) in self.integrals.iter_mut().zip(power) {
            *integral += p * dt;
        }
        self.elapsed += dt;
        Ok(())
    }

    /// Current integral per carrier.
    pub fn integrals(&self) -> &[f64] {
        &self.integrals
    }

    /// Electric time accumulated since the last reset.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Zero the integrals. Called by the consumer, never by the solver.
    pub fn reset(&mut self) {
        self.integrals.fill(0.0);
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_steps_are_additive() {
        let dt = 1e-3;
        let p1 = [2.0, 0.5];
        let p2 = [4.0, 1.5];
        let mut acc = JoulePowerAccumulator::new(2);
        acc.accumulate(&p1, dt).unwrap();
        acc.accumulate(&p2, dt).unwrap();
        for i in 0..2 {
            assert_relative_eq!(acc.integrals()[i], (p1[i] + p2[i]) * dt, epsilon = 1e-15);
        }
        assert_relative_eq!(acc.elapsed(), 2.0 * dt);
    }

    #[test]
    fn test_carrier_count_must_match() {
        let mut acc = JoulePowerAccumulator::new(3);
        assert!(acc.accumulate(&[1.0], 0.1).is_err());
        assert_eq!(acc.integrals(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_reset() {
        let mut acc = JoulePowerAccumulator::new(1);
        acc.accumulate(&[10.0], 0.5).unwrap();
        acc.reset();
        assert_eq!(acc.integrals(), &[0.0]);
        assert_eq!(acc.elapsed(), 0.0);
    }
}
