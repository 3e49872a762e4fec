//! Solution expansion.
//!
//! Scatters a reduced solution back to full size, writes the fixed
//! potentials verbatim and copies each representative's value to the rest of
//! its equipotential group.

use nalgebra::DVector;
use num_complex::Complex64;

use crate::conductor::{check_length, DofIndex};
use crate::error::Result;

use super::{ElectricScalar, ReducedSystem};

/// Full-size potential solution.
///
/// Starts real and is promoted to complex the first time a solve produces a
/// value with a nonzero imaginary part.
#[derive(Debug, Clone, PartialEq)]
pub enum ElectricSolution {
    Real(DVector<f64>),
    Complex(DVector<Complex64>),
}

impl ElectricSolution {
    /// Real zero solution of length `dofs`.
    pub fn zeros(dofs: usize) -> Self {
        ElectricSolution::Real(DVector::zeros(dofs))
    }

    pub fn len(&self) -> usize {
        match self {
            ElectricSolution::Real(v) => v.len(),
            ElectricSolution::Complex(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, ElectricSolution::Complex(_))
    }

    /// Value at `index`, widened to complex.
    pub fn get(&self, index: DofIndex) -> Complex64 {
        match self {
            ElectricSolution::Real(v) => Complex64::new(v[index], 0.0),
            ElectricSolution::Complex(v) => v[index],
        }
    }

    /// Real part at `index`.
    pub fn re(&self, index: DofIndex) -> f64 {
        self.get(index).re
    }

    /// The real vector, if the solution was never promoted.
    pub fn as_real(&self) -> Option<&DVector<f64>> {
        match self {
            ElectricSolution::Real(v) => Some(v),
            ElectricSolution::Complex(_) => None,
        }
    }

    /// Upcast to complex in place. No-op if already complex.
    pub fn promote(&mut self) {
        if let ElectricSolution::Real(v) = self {
            let widened = v.map(|x| Complex64::new(x, 0.0));
            *self = ElectricSolution::Complex(widened);
        }
    }

    /// Copy into a vector of the system's scalar type.
    pub fn to_scalar<T: ElectricScalar>(&self) -> DVector<T> {
        match self {
            ElectricSolution::Real(v) => v.map(T::from_real),
            ElectricSolution::Complex(v) => v.map(T::from_complex),
        }
    }

    /// Write one value, promoting first if it is complex-valued.
    pub fn set<T: ElectricScalar>(&mut self, index: DofIndex, value: T) {
        if value.has_imaginary() {
            self.promote();
        }
        match self {
            ElectricSolution::Real(v) => v[index] = value.to_complex().re,
            ElectricSolution::Complex(v) => v[index] = value.to_complex(),
        }
    }

    /// Copy the value at `source` to every index in `targets`.
    fn spread(&mut self, source: DofIndex, targets: &[DofIndex]) {
        match self {
            ElectricSolution::Real(v) => {
                let value = v[source];
                for &t in targets {
                    v[t] = value;
                }
            }
            ElectricSolution::Complex(v) => {
                let value = v[source];
                for &t in targets {
                    v[t] = value;
                }
            }
        }
    }
}

/// Rebuild the full solution from the reduced one.
///
/// `solution` keeps its previous contents at indices the reduction did not
/// touch, which only matters if the caller reuses a buffer of the right size.
pub fn expand_solution<T: ElectricScalar>(
    solution: &mut ElectricSolution,
    reduced_solution: &DVector<T>,
    reduced: &ReducedSystem<T>,
) -> Result<()> {
    check_length(solution.len(), reduced.full_size, "full solution")?;
    check_length(reduced_solution.len(), reduced.retained.len(), "reduced solution")?;

    // Checked once per solve
    let complex = reduced_solution.iter().any(|v| v.has_imaginary())
        || reduced.fixed.values().iter().any(|v| v.has_imaginary());
    if complex {
        solution.promote();
    }

    for (&index, &value) in reduced.retained.iter().zip(reduced_solution.iter()) {
        solution.set(index, value);
    }

    for (index, value) in reduced.fixed.iter() {
        solution.set(index, value);
    }

    if reduced.equipotential.is_active() {
        for group in &reduced.equipotential.groups {
            if let Some((&rep, rest)) = group.split_first() {
                solution.spread(rep, rest);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conductor::{ElectricConstraints, EquipotentialSurfaces, FixedPotentials};
    use crate::solver::reduce_system;
    use crate::solver::sparse::from_triplets;

    fn identity_system<T: ElectricScalar>(
        n: usize,
        constraints: &ElectricConstraints<T>,
    ) -> ReducedSystem<T> {
        let t: Vec<_> = (0..n).map(|i| (i, i, T::one())).collect();
        let a = from_triplets(n, &t);
        reduce_system(&a, &DVector::from_element(n, T::zero()), constraints).unwrap()
    }

    #[test]
    fn test_scatter_fixed_and_groups() {
        let c = ElectricConstraints::new(
            FixedPotentials::new(vec![4, 0], vec![-1.5, 2.5]).unwrap(),
            EquipotentialSurfaces::new(vec![vec![1, 3]]),
        );
        let reduced = identity_system::<f64>(5, &c);
        assert_eq!(reduced.retained, vec![1, 2]);

        let mut x = ElectricSolution::zeros(5);
        expand_solution(&mut x, &DVector::from_vec(vec![7.0, 8.0]), &reduced).unwrap();
        assert_eq!(
            x.as_real().unwrap().as_slice(),
            &[2.5, 7.0, 8.0, 7.0, -1.5]
        );
    }

    #[test]
    fn test_complex_result_promotes_solution() {
        let c = ElectricConstraints::fixed_only(FixedPotentials::single(0, Complex64::new(1.0, 0.0)));
        let reduced = identity_system::<Complex64>(3, &c);
        let mut x = ElectricSolution::zeros(3);
        let xr = DVector::from_vec(vec![Complex64::new(0.5, 0.25), Complex64::new(2.0, 0.0)]);
        expand_solution(&mut x, &xr, &reduced).unwrap();
        assert!(x.is_complex());
        assert_eq!(x.get(0), Complex64::new(1.0, 0.0));
        assert_eq!(x.get(1), Complex64::new(0.5, 0.25));
    }

    #[test]
    fn test_real_valued_complex_result_stays_real() {
        let reduced = identity_system::<Complex64>(2, &ElectricConstraints::default());
        let mut x = ElectricSolution::zeros(2);
        let xr = DVector::from_vec(vec![Complex64::new(3.0, 0.0), Complex64::new(4.0, 0.0)]);
        expand_solution(&mut x, &xr, &reduced).unwrap();
        assert!(!x.is_complex());
        assert_eq!(x.as_real().unwrap().as_slice(), &[3.0, 4.0]);
    }

    #[test]
    fn test_wrong_reduced_length() {
        let reduced = identity_system::<f64>(3, &ElectricConstraints::default());
        let mut x = ElectricSolution::zeros(3);
        assert!(expand_solution(&mut x, &DVector::from_vec(vec![1.0]), &reduced).is_err());
    }

    #[test]
    fn test_to_scalar_roundtrip() {
        let mut x = ElectricSolution::zeros(2);
        x.set(1, 4.0);
        let v: DVector<Complex64> = x.to_scalar();
        assert_eq!(v[1], Complex64::new(4.0, 0.0));
        x.promote();
        assert!(x.is_complex());
        let back: DVector<f64> = x.to_scalar();
        assert_eq!(back.as_slice(), &[0.0, 4.0]);
    }
}
