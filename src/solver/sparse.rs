//! Sparse matrix helpers on top of `nalgebra_sparse`.
//!
//! Matrices are assembled as COO triplets (duplicates are summed on
//! conversion) and stored as CSC.

use nalgebra::DVector;
use nalgebra_sparse::{coo::CooMatrix, CscMatrix};

use crate::conductor::check_square;
use crate::error::Result;

use super::ElectricScalar;

/// y = A x
pub fn matvec<T: ElectricScalar>(matrix: &CscMatrix<T>, x: &DVector<T>) -> DVector<T> {
    matrix * x
}

/// alpha * A + beta * B, for matrices of equal shape.
pub fn linear_combination<T: ElectricScalar>(
    a: &CscMatrix<T>,
    alpha: T,
    b: &CscMatrix<T>,
    beta: T,
) -> Result<CscMatrix<T>> {
    check_square(b, a.nrows(), "matrix combination")?;
    Ok(&(a * alpha) + &(b * beta))
}

/// Drop explicitly stored zeros.
pub fn compact<T: ElectricScalar>(matrix: &CscMatrix<T>) -> CscMatrix<T> {
    matrix.filter(|_, _, val| !val.is_zero())
}

/// Extract `A[retained, :][:, retained]`.
///
/// `retained` must be strictly ascending.
pub fn select<T: ElectricScalar>(matrix: &CscMatrix<T>, retained: &[usize]) -> CscMatrix<T> {
    let position = positions(matrix.nrows().max(matrix.ncols()), retained);
    let mut coo = CooMatrix::new(retained.len(), retained.len());
    for (row, col, &val) in matrix.triplet_iter() {
        if let (Some(r), Some(c)) = (position[row], position[col]) {
            coo.push(r, c, val);
        }
    }
    CscMatrix::from(&coo)
}

/// Extract `v[retained]`.
pub fn select_vector<T: ElectricScalar>(vector: &DVector<T>, retained: &[usize]) -> DVector<T> {
    DVector::from_iterator(retained.len(), retained.iter().map(|&i| vector[i]))
}

/// Map from full index to position in `retained`.
fn positions(size: usize, retained: &[usize]) -> Vec<Option<usize>> {
    let mut position = vec![None; size];
    for (new, &old) in retained.iter().enumerate() {
        position[old] = Some(new);
    }
    position
}

/// Build a square matrix from triplets.
pub fn from_triplets<T: ElectricScalar>(size: usize, triplets: &[(usize, usize, T)]) -> CscMatrix<T> {
    let mut coo = CooMatrix::new(size, size);
    for &(row, col, val) in triplets {
        coo.push(row, col, val);
    }
    CscMatrix::from(&coo)
}

/// Dense row-major copy.
#[cfg(test)]
pub fn to_dense<T: ElectricScalar>(matrix: &CscMatrix<T>) -> Vec<Vec<T>> {
    let mut dense = vec![vec![T::zero(); matrix.ncols()]; matrix.nrows()];
    for (row, col, &val) in matrix.triplet_iter() {
        dense[row][col] += val;
    }
    dense
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matvec() {
        let a = from_triplets(2, &[(0, 0, 2.0), (0, 1, 1.0), (1, 1, 3.0)]);
        let y = matvec(&a, &DVector::from_vec(vec![1.0, 2.0]));
        assert_eq!(y.as_slice(), &[4.0, 6.0]);
    }

    #[test]
    fn test_linear_combination_sums_patterns() {
        let m = from_triplets(2, &[(0, 0, 1.0), (1, 1, 1.0)]);
        let a = from_triplets(2, &[(0, 0, 2.0), (0, 1, -1.0)]);
        let c = linear_combination(&m, 10.0, &a, 0.5).unwrap();
        assert_eq!(to_dense(&c), vec![vec![11.0, -0.5], vec![0.0, 10.0]]);
    }

    #[test]
    fn test_compact_removes_cancelled_entries() {
        let a = from_triplets(2, &[(0, 0, 1.0), (0, 1, 1.0), (0, 1, -1.0)]);
        assert_eq!(a.nnz(), 2);
        assert_eq!(compact(&a).nnz(), 1);
    }

    #[test]
    fn test_select() {
        let a = from_triplets(3, &[(0, 0, 1.0), (0, 2, 2.0), (1, 1, 3.0), (2, 0, 4.0), (2, 2, 5.0)]);
        let s = select(&a, &[0, 2]);
        assert_eq!(to_dense(&s), vec![vec![1.0, 2.0], vec![4.0, 5.0]]);
        let v = select_vector(&DVector::from_vec(vec![7.0, 8.0, 9.0]), &[0, 2]);
        assert_eq!(v.as_slice(), &[7.0, 9.0]);
    }
}
