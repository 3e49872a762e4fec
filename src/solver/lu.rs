//! Sparse direct solve.
//!
//! Gaussian elimination on a row-wise sparse store, columns taken in
//! natural order (no fill-reducing permutation). Rows are pivoted by
//! largest magnitude within the current column.

use std::collections::{BTreeMap, BTreeSet};

use log::trace;
use nalgebra::DVector;
use nalgebra_sparse::CscMatrix;

use crate::conductor::check_square;
use crate::error::{Result, ScableError};

use super::{ElectricScalar, PIVOT_TOLERANCE};

/// Solve `A x = b` with natural column ordering.
pub fn solve_natural<T: ElectricScalar>(matrix: &CscMatrix<T>, rhs: &DVector<T>) -> Result<DVector<T>> {
    let n = rhs.len();
    check_square(matrix, n, "reduced matrix")?;

    let mut lu = SparseLu::new(matrix);
    let mut b = rhs.clone();
    lu.eliminate(&mut b)?;
    let x = lu.back_substitute(&b)?;

    if let Some(index) = x.iter().position(|v| !v.is_finite_value()) {
        return Err(ScableError::NonFiniteSolution { index });
    }
    Ok(x)
}

/// Row store undergoing elimination.
struct SparseLu<T> {
    n: usize,
    /// Row `i` as column -> value
    rows: Vec<BTreeMap<usize, T>>,
    /// Column `j` -> rows holding an entry in it
    cols: Vec<BTreeSet<usize>>,
    fill_in: usize,
}

impl<T: ElectricScalar> SparseLu<T> {
    fn new(matrix: &CscMatrix<T>) -> Self {
        let n = matrix.nrows();
        let mut rows = vec![BTreeMap::new(); n];
        let mut cols = vec![BTreeSet::new(); n];
        for (row, col, &val) in matrix.triplet_iter() {
            *rows[row].entry(col).or_insert_with(T::zero) += val;
            cols[col].insert(row);
        }
        Self {
            n,
            rows,
            cols,
            fill_in: 0,
        }
    }

    /// Forward elimination to upper-triangular form, applying the same
    /// operations to `b`.
    fn eliminate(&mut self, b: &mut DVector<T>) -> Result<()> {
        for k in 0..self.n {
            let pivot_row = self.find_pivot(k)?;
            if pivot_row != k {
                self.swap_rows(k, pivot_row);
                b.swap_rows(k, pivot_row);
            }

            let pivot = self.rows[k][&k];
            let below: Vec<usize> = self.cols[k].range(k + 1..).copied().collect();
            let upper: Vec<(usize, T)> = self.rows[k]
                .range(k + 1..)
                .map(|(&j, &v)| (j, v))
                .collect();

            for r in below {
                let Some(entry) = self.rows[r].remove(&k) else {
                    continue;
                };
                self.cols[k].remove(&r);
                let factor = entry / pivot;
                for &(j, v) in &upper {
                    let slot = self.rows[r].entry(j).or_insert_with(|| {
                        self.fill_in += 1;
                        T::zero()
                    });
                    *slot -= factor * v;
                    self.cols[j].insert(r);
                }
                let bk = b[k];
                b[r] -= factor * bk;
            }
        }
        trace!("sparse elimination of {} unknowns, {} fill-in entries", self.n, self.fill_in);
        Ok(())
    }

    /// Row at or below `k` with the largest entry in column `k`.
    fn find_pivot(&self, k: usize) -> Result<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &r in self.cols[k].range(k..) {
            let Some(&v) = self.rows[r].get(&k) else {
                continue;
            };
            let m = v.modulus();
            if best.map_or(true, |(_, bm)| m > bm) {
                best = Some((r, m));
            }
        }
        match best {
            Some((r, m)) if m > PIVOT_TOLERANCE && m.is_finite() => Ok(r),
            _ => Err(ScableError::SingularMatrix { column: k }),
        }
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        for &j in self.rows[a].keys() {
            self.cols[j].remove(&a);
        }
        for &j in self.rows[b].keys() {
            self.cols[j].remove(&b);
        }
        self.rows.swap(a, b);
        for &j in self.rows[a].keys() {
            self.cols[j].insert(a);
        }
        for &j in self.rows[b].keys() {
            self.cols[j].insert(b);
        }
    }

    fn back_substitute(&self, b: &DVector<T>) -> Result<DVector<T>> {
        let mut x = DVector::from_element(self.n, T::zero());
        for i in (0..self.n).rev() {
            let mut sum = b[i];
            for (&j, &v) in self.rows[i].range(i + 1..) {
                sum -= v * x[j];
            }
            let diag = self.rows[i]
                .get(&i)
                .copied()
                .ok_or(ScableError::SingularMatrix { column: i })?;
            x[i] = sum / diag;
        }
        Ok(x)
    }
}
