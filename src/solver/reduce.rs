//! Boundary-condition reduction.
//!
//! Removes fixed-potential DOFs (Dirichlet lifting) and merges equipotential
//! groups into their representative DOF, producing a smaller system whose
//! solution is scattered back by [`expand_solution`](super::expand_solution).
//!
//! ## Steps
//!
//! 1. De-duplicate the fixed set (first-seen value wins); a group holding a
//!    fixed node is fixed as a whole and leaves the merge
//! 2. `b <- b - A[:, fixed] * values`
//! 3. Sum every group's columns, then rows, into the representative; same for `b`
//! 4. `idx = all - (fixed U merged)`, ascending
//! 5. `A' = A[idx, idx]`, `b' = b[idx]`, drop explicit zeros from `A'`

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use nalgebra::DVector;
use nalgebra_sparse::{coo::CooMatrix, CscMatrix};

use crate::conductor::{
    check_length, check_square, validate_constraints, DofIndex, ElectricConstraints,
    EquipotentialSurfaces, FixedPotentials,
};
use crate::error::{Result, ScableError};

use super::sparse::{compact, select, select_vector};
use super::ElectricScalar;

/// A constrained system after reduction.
#[derive(Debug, Clone)]
pub struct ReducedSystem<T: ElectricScalar> {
    /// `A[idx, idx]` after lifting and merging
    pub matrix: CscMatrix<T>,
    /// `b[idx]` after lifting and merging
    pub known_term: DVector<T>,
    /// Retained DOF indices, ascending
    pub retained: Vec<DofIndex>,
    /// Canonical fixed set used for the lifting, including every member of
    /// a group that holds a fixed node
    pub fixed: FixedPotentials<T>,
    /// Equipotential groups used for the merge (those without fixed nodes)
    pub equipotential: EquipotentialSurfaces,
    /// Size of the unreduced system
    pub full_size: usize,
}

impl<T: ElectricScalar> ReducedSystem<T> {
    /// Number of unknowns left after reduction.
    pub fn size(&self) -> usize {
        self.retained.len()
    }

    /// Reduce another full-size vector with the same merge and selection.
    pub fn reduce_vector(&self, vector: &DVector<T>) -> Result<DVector<T>> {
        check_length(vector.len(), self.full_size, "vector to reduce")?;
        let merged = merge_equipotential_vector(vector, &self.equipotential);
        Ok(select_vector(&merged, &self.retained))
    }
}

/// Reduce `A x = b` under the given constraints.
pub fn reduce_system<T: ElectricScalar>(
    matrix: &CscMatrix<T>,
    known_term: &DVector<T>,
    constraints: &ElectricConstraints<T>,
) -> Result<ReducedSystem<T>> {
    let dofs = known_term.len();
    check_square(matrix, dofs, "stiffness matrix")?;
    validate_constraints(constraints, dofs)?;

    let fixed = canonical_fixed(&constraints.fixed);
    let (fixed, surfaces) = absorb_fixed_groups(fixed, &constraints.equipotential)?;
    let lifted = lift_fixed(matrix, known_term, &fixed);

    let eq = &surfaces;
    let (merged_matrix, merged_known) = if eq.is_active() {
        (
            merge_equipotential_matrix(matrix, eq),
            merge_equipotential_vector(&lifted, eq),
        )
    } else {
        (matrix.clone(), lifted)
    };

    let merged = eq.merged_indices();
    let retained = retained_indices(dofs, &fixed.index_set(), &merged);
    let reduced_matrix = compact(&select(&merged_matrix, &retained));
    let reduced_known = select_vector(&merged_known, &retained);

    debug!(
        "reduced electric system {} -> {} ({} fixed, {} merged)",
        dofs,
        retained.len(),
        fixed.len(),
        merged.len()
    );

    Ok(ReducedSystem {
        matrix: reduced_matrix,
        known_term: reduced_known,
        retained,
        fixed,
        equipotential: eq.clone(),
        full_size: dofs,
    })
}

/// De-duplicate, reporting conflicting values that get discarded.
fn canonical_fixed<T: ElectricScalar>(fixed: &FixedPotentials<T>) -> FixedPotentials<T> {
    if fixed.is_canonical() {
        return fixed.clone();
    }
    let canonical = fixed.deduplicated();
    let kept: BTreeMap<DofIndex, T> = canonical.iter().collect();
    for (index, value) in fixed.iter() {
        if kept.get(&index).is_some_and(|&k| k != value) {
            warn!("conflicting fixed potential {value} at node {index} ignored");
        }
    }
    canonical
}

/// Fix every member of a group that holds a fixed node.
///
/// The members take the value of the group's first fixed node and the group
/// leaves the merge. Fixed nodes of one group must agree.
fn absorb_fixed_groups<T: ElectricScalar>(
    fixed: FixedPotentials<T>,
    eq: &EquipotentialSurfaces,
) -> Result<(FixedPotentials<T>, EquipotentialSurfaces)> {
    if fixed.is_empty() || !eq.is_active() {
        return Ok((fixed, eq.clone()));
    }

    let mut values: BTreeMap<DofIndex, T> = fixed.iter().collect();
    let mut free = Vec::new();
    for (number, group) in eq.groups.iter().enumerate() {
        let imposed: Vec<(DofIndex, T)> = group
            .iter()
            .filter_map(|i| values.get(i).map(|&v| (*i, v)))
            .collect();
        let Some(&(first, value)) = imposed.first() else {
            free.push(group.clone());
            continue;
        };
        if let Some(&(other, _)) = imposed.iter().find(|&&(_, v)| v != value) {
            return Err(ScableError::invalid_equipotential(format!(
                "surface {number} fixes nodes {first} and {other} to different potentials"
            )));
        }
        debug!("surface {number} holds fixed node {first}, fixing its {} nodes", group.len());
        for &index in group {
            values.insert(index, value);
        }
    }

    if free.len() == eq.groups.len() {
        return Ok((fixed, eq.clone()));
    }
    let (indices, values): (Vec<DofIndex>, Vec<T>) = values.into_iter().unzip();
    let surfaces = EquipotentialSurfaces {
        enabled: eq.enabled,
        surface_count: free.len(),
        groups: free,
    };
    Ok((FixedPotentials::new(indices, values)?, surfaces))
}

/// `b - A[:, fixed] * values`
pub fn lift_fixed<T: ElectricScalar>(
    matrix: &CscMatrix<T>,
    known_term: &DVector<T>,
    fixed: &FixedPotentials<T>,
) -> DVector<T> {
    let mut lifted = known_term.clone();
    if fixed.is_empty() {
        return lifted;
    }
    let values: BTreeMap<DofIndex, T> = fixed.iter().collect();
    for (row, col, &val) in matrix.triplet_iter() {
        if let Some(&fixed_value) = values.get(&col) {
            lifted[row] -= val * fixed_value;
        }
    }
    lifted
}

/// Group membership: index -> representative, for merged-away members only.
fn member_map(eq: &EquipotentialSurfaces) -> BTreeMap<DofIndex, DofIndex> {
    let mut members = BTreeMap::new();
    for group in &eq.groups {
        if let Some((&rep, rest)) = group.split_first() {
            for &m in rest {
                members.insert(m, rep);
            }
        }
    }
    members
}

/// Sum each group's columns into the representative column, then each
/// group's rows into the representative row.
///
/// Member rows and columns are left in place; the reduction drops them.
pub fn merge_equipotential_matrix<T: ElectricScalar>(
    matrix: &CscMatrix<T>,
    eq: &EquipotentialSurfaces,
) -> CscMatrix<T> {
    let members = member_map(eq);
    let targets = |index: DofIndex| -> (DofIndex, Option<DofIndex>) {
        match members.get(&index) {
            Some(&rep) => (index, Some(rep)),
            None => (index, None),
        }
    };

    let mut coo = CooMatrix::new(matrix.nrows(), matrix.ncols());
    for (row, col, &val) in matrix.triplet_iter() {
        let (col_self, col_rep) = targets(col);
        let (row_self, row_rep) = targets(row);
        for c in std::iter::once(col_self).chain(col_rep) {
            for r in std::iter::once(row_self).chain(row_rep) {
                coo.push(r, c, val);
            }
        }
    }
    CscMatrix::from(&coo)
}

/// Sum each group's entries into the representative entry.
pub fn merge_equipotential_vector<T: ElectricScalar>(
    vector: &DVector<T>,
    eq: &EquipotentialSurfaces,
) -> DVector<T> {
    let mut merged = vector.clone();
    if !eq.is_active() {
        return merged;
    }
    for group in &eq.groups {
        if let Some((&rep, rest)) = group.split_first() {
            for &m in rest {
                merged[rep] += vector[m];
            }
        }
    }
    merged
}

/// `0..dofs` minus fixed and merged indices, ascending.
pub fn retained_indices(
    dofs: usize,
    fixed: &BTreeSet<DofIndex>,
    merged: &BTreeSet<DofIndex>,
) -> Vec<DofIndex> {
    let removed: BTreeSet<DofIndex> = fixed.union(merged).copied().collect();
    let all: BTreeSet<DofIndex> = (0..dofs).collect();
    all.difference(&removed).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::sparse::{from_triplets, to_dense};
    use crate::solver::testing::laplacian;
    use approx::assert_relative_eq;

    #[test]
    fn test_retained_indices_are_ascending_difference() {
        let fixed: BTreeSet<_> = [4, 0].into_iter().collect();
        let merged: BTreeSet<_> = [2, 4].into_iter().collect();
        assert_eq!(retained_indices(6, &fixed, &merged), vec![1, 3, 5]);
    }

    #[test]
    fn test_dirichlet_lifting() {
        let a = laplacian(5);
        let b = DVector::zeros(5);
        let fixed = FixedPotentials::new(vec![0, 4], vec![10.0, 0.0]).unwrap();
        let reduced = reduce_system(&a, &b, &ElectricConstraints::fixed_only(fixed)).unwrap();
        assert_eq!(reduced.retained, vec![1, 2, 3]);
        assert_eq!(reduced.known_term.as_slice(), &[10.0, 0.0, 0.0]);
        assert_eq!(
            to_dense(&reduced.matrix),
            vec![
                vec![2.0, -1.0, 0.0],
                vec![-1.0, 2.0, -1.0],
                vec![0.0, -1.0, 2.0],
            ]
        );
    }

    #[test]
    fn test_no_fixed_is_a_no_op() {
        let a = laplacian(3);
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let reduced = reduce_system(&a, &b, &ElectricConstraints::default()).unwrap();
        assert_eq!(reduced.retained, vec![0, 1, 2]);
        assert_eq!(reduced.known_term, b);
        assert_eq!(to_dense(&reduced.matrix), to_dense(&a));
    }

    #[test]
    fn test_scalar_fixed_input() {
        let a = laplacian(3);
        let b = DVector::zeros(3);
        let c = ElectricConstraints::fixed_only(FixedPotentials::single(1, 2.0));
        let reduced = reduce_system(&a, &b, &c).unwrap();
        assert_eq!(reduced.retained, vec![0, 2]);
        assert_eq!(reduced.known_term.as_slice(), &[2.0, 2.0]);
    }

    #[test]
    fn test_second_reduction_with_canonical_set_is_identical() {
        let a = laplacian(6);
        let b = DVector::from_vec(vec![1.0, 0.0, -2.0, 0.5, 0.0, 3.0]);
        let raw = FixedPotentials::new(vec![5, 0, 5, 2], vec![1.0, 4.0, 9.0, -1.0]).unwrap();
        let first = reduce_system(&a, &b, &ElectricConstraints::fixed_only(raw)).unwrap();
        let again = reduce_system(
            &a,
            &b,
            &ElectricConstraints::fixed_only(first.fixed.clone()),
        )
        .unwrap();
        assert_eq!(first.fixed.indices(), &[0, 2, 5]);
        assert_eq!(first.fixed.values(), &[4.0, -1.0, 1.0]);
        assert_eq!(again.retained, first.retained);
        assert_eq!(again.known_term, first.known_term);
        assert_eq!(to_dense(&again.matrix), to_dense(&first.matrix));
    }

    #[test]
    fn test_merge_conserves_rows_and_known_term() {
        let a = from_triplets(
            4,
            &[
                (0, 0, 3.0), (0, 1, -1.0), (0, 3, 0.5),
                (1, 0, -1.0), (1, 1, 4.0), (1, 2, -2.0),
                (2, 1, -2.0), (2, 2, 5.0), (2, 3, -1.5),
                (3, 0, 0.25), (3, 2, -1.5), (3, 3, 2.0),
            ],
        );
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let eq = EquipotentialSurfaces::new(vec![vec![1, 2]]);

        let merged = to_dense(&merge_equipotential_matrix(&a, &eq));
        let dense = to_dense(&a);

        // Column merge first, then rows
        let mut cols = dense.clone();
        for row in cols.iter_mut() {
            row[1] += row[2];
        }
        for j in 0..4 {
            assert_relative_eq!(merged[1][j], cols[1][j] + cols[2][j]);
            assert_relative_eq!(merged[0][j], cols[0][j]);
            assert_relative_eq!(merged[3][j], cols[3][j]);
        }
        // Total of every column survives the merge on the representative side
        let total: f64 = (0..4).map(|i| dense[i][1] + dense[i][2]).sum();
        let merged_total: f64 = [0, 1, 3].iter().map(|&i| merged[i][1]).sum();
        assert_relative_eq!(total, merged_total);

        let mb = merge_equipotential_vector(&b, &eq);
        assert_eq!(mb[1], 5.0);
        assert_eq!(mb.sum() - mb[2], b.sum());
    }

    #[test]
    fn test_merge_happens_before_fixed_removal() {
        let a = laplacian(4);
        let b = DVector::from_vec(vec![0.0, 1.0, 2.0, 0.0]);
        let c = ElectricConstraints::new(
            FixedPotentials::single(3, 1.0),
            EquipotentialSurfaces::new(vec![vec![1, 2]]),
        );
        let reduced = reduce_system(&a, &b, &c).unwrap();
        assert_eq!(reduced.retained, vec![0, 1]);
        // Node 2's source and its coupling to the fixed node land on node 1
        assert_relative_eq!(reduced.known_term[1], 1.0 + 2.0 + 1.0);
        assert_eq!(to_dense(&reduced.matrix), vec![vec![2.0, -1.0], vec![-1.0, 2.0]]);
    }

    #[test]
    fn test_exact_zeros_are_compacted() {
        // Merging 1 and 2 cancels the (1, 1) coupling exactly
        let a = from_triplets(3, &[(0, 0, 1.0), (1, 1, 1.0), (1, 2, -1.0), (2, 1, -1.0), (2, 2, 1.0), (1, 0, 1.0), (0, 1, 1.0)]);
        let b = DVector::zeros(3);
        let c = ElectricConstraints::new(
            FixedPotentials::<f64>::none(),
            EquipotentialSurfaces::new(vec![vec![1, 2]]),
        );
        let reduced = reduce_system(&a, &b, &c).unwrap();
        assert_eq!(reduced.retained, vec![0, 1]);
        assert!(reduced.matrix.triplet_iter().all(|(_, _, &v)| v != 0.0));
        assert_eq!(reduced.matrix.nnz(), 3);
    }

    #[test]
    fn test_group_with_fixed_member_is_fixed_whole() {
        let a = laplacian(4);
        let b = DVector::zeros(4);
        let c = ElectricConstraints::new(
            FixedPotentials::new(vec![0, 2], vec![0.0, 5.0]).unwrap(),
            EquipotentialSurfaces::new(vec![vec![1, 2]]),
        );
        let reduced = reduce_system(&a, &b, &c).unwrap();
        assert_eq!(reduced.retained, vec![3]);
        assert_eq!(reduced.fixed.indices(), &[0, 1, 2]);
        assert_eq!(reduced.fixed.values(), &[0.0, 5.0, 5.0]);
        assert!(!reduced.equipotential.is_active());
        assert_eq!(reduced.known_term.as_slice(), &[5.0]);
    }

    #[test]
    fn test_group_with_fixed_representative_is_fixed_whole() {
        let a = laplacian(4);
        let b = DVector::zeros(4);
        let c = ElectricConstraints::new(
            FixedPotentials::single(1, 5.0),
            EquipotentialSurfaces::new(vec![vec![1, 2]]),
        );
        let reduced = reduce_system(&a, &b, &c).unwrap();
        assert_eq!(reduced.retained, vec![0, 3]);
        // Both neighbours see the imposed value through their own coupling
        assert_eq!(reduced.known_term.as_slice(), &[5.0, 5.0]);
        assert_eq!(to_dense(&reduced.matrix), vec![vec![2.0, 0.0], vec![0.0, 2.0]]);
    }

    #[test]
    fn test_untouched_groups_still_merge() {
        let a = laplacian(6);
        let b = DVector::zeros(6);
        let c = ElectricConstraints::new(
            FixedPotentials::single(0, 1.0),
            EquipotentialSurfaces::new(vec![vec![0, 1], vec![3, 4]]),
        );
        let reduced = reduce_system(&a, &b, &c).unwrap();
        assert_eq!(reduced.retained, vec![2, 3, 5]);
        assert_eq!(reduced.equipotential.groups, vec![vec![3, 4]]);
        assert_eq!(reduced.equipotential.surface_count, 1);
    }

    #[test]
    fn test_conflicting_fixed_values_in_one_group() {
        let a = laplacian(4);
        let b = DVector::zeros(4);
        let c = ElectricConstraints::new(
            FixedPotentials::new(vec![1, 2], vec![1.0, 2.0]).unwrap(),
            EquipotentialSurfaces::new(vec![vec![1, 2]]),
        );
        assert!(matches!(
            reduce_system(&a, &b, &c),
            Err(ScableError::InvalidEquipotential { .. })
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = laplacian(4);
        let b = DVector::zeros(3);
        assert!(reduce_system(&a, &b, &ElectricConstraints::default()).is_err());
    }
}
