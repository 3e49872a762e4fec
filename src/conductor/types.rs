//! Boundary-condition descriptors for the electric network.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, ScableError};

/// Index of one electric degree of freedom (node potential or element current).
pub type DofIndex = usize;

/// Set of DOFs with user-imposed potential values.
///
/// Indices may repeat on input; [`FixedPotentials::deduplicated`] produces the
/// canonical form used by the reduction (ascending, unique, first-seen value).
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPotentials<T> {
    indices: Vec<DofIndex>,
    values: Vec<T>,
}

impl<T: Copy> FixedPotentials<T> {
    /// Create a fixed-potential set from parallel index/value arrays.
    pub fn new(indices: Vec<DofIndex>, values: Vec<T>) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(ScableError::dimension_mismatch(
                "fixed potential values",
                indices.len(),
                values.len(),
            ));
        }
        Ok(Self { indices, values })
    }

    /// Fix a single node.
    pub fn single(index: DofIndex, value: T) -> Self {
        Self {
            indices: vec![index],
            values: vec![value],
        }
    }

    /// No fixed potentials.
    pub fn none() -> Self {
        Self {
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &[DofIndex] {
        &self.indices
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Iterate over `(index, value)` pairs in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (DofIndex, T)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Remove repeated indices, keeping the first value seen for each one.
    ///
    /// The result is sorted by index.
    pub fn deduplicated(&self) -> Self {
        let mut unique: BTreeMap<DofIndex, T> = BTreeMap::new();
        for (index, value) in self.iter() {
            unique.entry(index).or_insert(value);
        }
        let (indices, values) = unique.into_iter().unzip();
        Self { indices, values }
    }

    /// Whether the set is already in canonical (sorted, unique) form.
    pub fn is_canonical(&self) -> bool {
        self.indices.windows(2).all(|w| w[0] < w[1])
    }

    /// Fixed indices as an ordered set.
    pub fn index_set(&self) -> BTreeSet<DofIndex> {
        self.indices.iter().copied().collect()
    }
}

impl<T: Copy> Default for FixedPotentials<T> {
    fn default() -> Self {
        Self::none()
    }
}

/// Groups of DOFs forced to share one potential.
///
/// The first index of each group is its representative; the others are
/// merged into it before solving and receive its value afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EquipotentialSurfaces {
    /// Whether the surfaces take part in the solve
    pub enabled: bool,
    /// Ordered DOF groups, representative first
    pub groups: Vec<Vec<DofIndex>>,
    /// Number of surfaces declared by the input
    pub surface_count: usize,
}

impl EquipotentialSurfaces {
    /// Enabled surfaces, one per group.
    pub fn new(groups: Vec<Vec<DofIndex>>) -> Self {
        let surface_count = groups.len();
        Self {
            enabled: true,
            groups,
            surface_count,
        }
    }

    /// Enabled surfaces with an explicitly declared surface count.
    ///
    /// The count is checked against the groups by
    /// [`validate_constraints`](super::validate_constraints).
    pub fn with_declared_count(groups: Vec<Vec<DofIndex>>, surface_count: usize) -> Self {
        Self {
            enabled: true,
            groups,
            surface_count,
        }
    }

    /// No equipotential surfaces.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether any merging happens.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.groups.is_empty()
    }

    /// Total number of DOFs listed across all groups.
    pub fn total_rows(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Representative index of every group.
    pub fn representatives(&self) -> Vec<DofIndex> {
        self.groups.iter().filter_map(|g| g.first().copied()).collect()
    }

    /// Indices merged away into their representative.
    ///
    /// Empty when the surfaces are disabled.
    pub fn merged_indices(&self) -> BTreeSet<DofIndex> {
        if !self.is_active() {
            return BTreeSet::new();
        }
        self.groups
            .iter()
            .flat_map(|g| g.iter().skip(1).copied())
            .collect()
    }
}

/// Everything that constrains the electric system besides its equations.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectricConstraints<T> {
    pub fixed: FixedPotentials<T>,
    pub equipotential: EquipotentialSurfaces,
}

impl<T: Copy> ElectricConstraints<T> {
    pub fn new(fixed: FixedPotentials<T>, equipotential: EquipotentialSurfaces) -> Self {
        Self {
            fixed,
            equipotential,
        }
    }

    /// Only fixed potentials.
    pub fn fixed_only(fixed: FixedPotentials<T>) -> Self {
        Self::new(fixed, EquipotentialSurfaces::disabled())
    }
}

impl<T: Copy> Default for ElectricConstraints<T> {
    fn default() -> Self {
        Self::new(FixedPotentials::none(), EquipotentialSurfaces::disabled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_value() {
        let fixed = FixedPotentials::new(vec![4, 1, 4, 0, 1], vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let dedup = fixed.deduplicated();
        assert_eq!(dedup.indices(), &[0, 1, 4]);
        assert_eq!(dedup.values(), &[4.0, 2.0, 1.0]);
        assert!(dedup.is_canonical());
        assert!(!fixed.is_canonical());
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let fixed = FixedPotentials::new(vec![3, 3, 2], vec![7.0, 8.0, 9.0]).unwrap();
        let once = fixed.deduplicated();
        assert_eq!(once.deduplicated(), once);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let err = FixedPotentials::new(vec![0, 1], vec![1.0]).unwrap_err();
        assert!(matches!(err, ScableError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_merged_indices() {
        let eq = EquipotentialSurfaces::new(vec![vec![5, 2, 9], vec![0, 1]]);
        assert_eq!(eq.representatives(), vec![5, 0]);
        assert_eq!(eq.merged_indices().into_iter().collect::<Vec<_>>(), vec![1, 2, 9]);
        assert_eq!(eq.total_rows(), 5);

        let mut off = eq.clone();
        off.enabled = false;
        assert!(off.merged_indices().is_empty());
    }
}
