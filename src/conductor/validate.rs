//! Consistency checks on what the conductor hands to the solver.

use std::collections::BTreeSet;

use nalgebra_sparse::CscMatrix;

use crate::error::{Result, ScableError};

use super::ElectricConstraints;

/// Validate the boundary conditions against the DOF count.
///
/// Checks:
/// - Fixed indices are in range
/// - Equipotential groups are non-empty, in range and disjoint
/// - The declared surface count matches the groups
pub fn validate_constraints<T: Copy>(constraints: &ElectricConstraints<T>, dofs: usize) -> Result<()> {
    for &index in constraints.fixed.indices() {
        if index >= dofs {
            return Err(ScableError::index_out_of_range("fixed potentials", index, dofs));
        }
    }

    let eq = &constraints.equipotential;
    if !eq.enabled {
        return Ok(());
    }

    let mut seen = BTreeSet::new();
    for (number, group) in eq.groups.iter().enumerate() {
        if group.is_empty() {
            return Err(ScableError::invalid_equipotential(format!(
                "surface {number} has no nodes"
            )));
        }
        for &index in group {
            if index >= dofs {
                return Err(ScableError::index_out_of_range("equipotential surfaces", index, dofs));
            }
            if !seen.insert(index) {
                return Err(ScableError::invalid_equipotential(format!(
                    "node {index} belongs to more than one surface"
                )));
            }
        }
    }

    // Every group contributes len - 1 merged rows
    let merged = eq.total_rows() - eq.groups.len();
    let expected = eq.total_rows().checked_sub(eq.surface_count);
    if expected != Some(merged) {
        return Err(ScableError::invalid_equipotential(format!(
            "{} surfaces declared but {} groups given",
            eq.surface_count,
            eq.groups.len()
        )));
    }

    Ok(())
}

/// Check that a matrix is `dofs` x `dofs`.
pub fn check_square<T>(matrix: &CscMatrix<T>, dofs: usize, what: &str) -> Result<()> {
    if matrix.nrows() != dofs {
        return Err(ScableError::dimension_mismatch(
            format!("{what} rows"),
            dofs,
            matrix.nrows(),
        ));
    }
    if matrix.ncols() != dofs {
        return Err(ScableError::dimension_mismatch(
            format!("{what} columns"),
            dofs,
            matrix.ncols(),
        ));
    }
    Ok(())
}

/// Check a vector length.
pub fn check_length(len: usize, expected: usize, what: &str) -> Result<()> {
    if len != expected {
        return Err(ScableError::dimension_mismatch(what, expected, len));
    }
    Ok(())
}
