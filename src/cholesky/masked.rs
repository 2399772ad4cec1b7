#![allow(non_snake_case)]
use super::indexmap::ActiveIndexMap;
use crate::algebra::*;
use thiserror::Error;

/// Error codes returnable from [`MaskedCholesky`](MaskedCholesky) operations

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CholeskyError {
    #[error("Matrix dimension fields are incompatible")]
    IncompatibleDimension,
    #[error("Every row of the factorization is masked")]
    NoActiveRows,
    #[error("Matrix is not symmetric positive definite")]
    NotPositiveDefinite,
    #[error("Row {0} is already masked")]
    AlreadyMasked(usize),
    #[error("Row {0} is not masked")]
    NotMasked(usize),
    #[error("Row {0} is out of bounds")]
    IndexOutOfBounds(usize),
}

/// Cholesky factorization of the principal submatrices of a fixed symmetric
/// positive definite matrix $A$.
///
/// A subset of the row/column indices of $A$ is *masked*.  The factor $L$
/// always satisfies $LL^T = A_{SS}$ where $S$ is the set of active (unmasked)
/// indices taken in the engine's active ordering.  Masking an index removes
/// its row from $L$ and restores triangularity with Givens rotations, and
/// unmasking an index appends a new last row by forward substitution, so
/// neither operation refactors from scratch.
///
/// The engine never looks at the original matrix again after construction.
/// The strict upper triangle of the full factor buffer caches the off
/// diagonal entries of $A$ and a separate vector caches its diagonal.
#[derive(Debug, Clone)]
pub struct MaskedCholesky<T = f64> {
    // dimension of A
    n: usize,
    // lower triangle: factor of the full matrix (fully factored mode only)
    // strict upper triangle: off diagonal entries of A
    Lfull: Matrix<T>,
    // diagonal of A
    Adiagfull: Vec<T>,
    // factor of the active submatrix, leading nactive x nactive block
    L: Matrix<T>,
    // active / masked bookkeeping
    map: ActiveIndexMap<T>,
    isspd: bool,
    // constructed without a full factorization
    deferred: bool,
    // row of A against the active indices, used by unmask_row
    work: Vec<T>,
}

impl<T> MaskedCholesky<T>
where
    T: FloatT,
{
    /// Factors `A` with every index active.
    ///
    /// The result is flagged as not SPD if `A` is not square, is not exactly
    /// symmetric, or produces a non-positive pivot.  Non-positive pivots are
    /// clamped to zero before taking the square root.  A non-square `A`
    /// is treated through its leading square block.
    pub fn new(A: &Matrix<T>) -> Self {
        let (n, mut isspd) = Self::dim_and_symmetry(A);
        let (mut Lfull, Adiagfull) = Self::cache_entries(A, n);

        // row oriented factorization, one appended row at a time
        let mut arow = Vec::with_capacity(n);
        for j in 0..n {
            arow.clear();
            arow.extend((0..j).map(|k| Lfull[(k, j)]));
            let d = append_factor_row(&mut Lfull, j, &arow, Adiagfull[j]);
            isspd &= d > T::zero();
        }

        if !isspd {
            log::warn!("matrix of dimension {n} is not symmetric positive definite");
        }

        // active factor is the lower triangle of the full one
        let mut L = Matrix::zeros((n, n));
        for c in 0..n {
            for r in c..n {
                L[(r, c)] = Lfull[(r, c)];
            }
        }

        let map = ActiveIndexMap::new_all(&Adiagfull);

        Self {
            n,
            Lfull,
            Adiagfull,
            L,
            map,
            isspd,
            deferred: false,
            work: Vec::with_capacity(n),
        }
    }

    /// Prepares a factorization of `A` in which only `row` is active.
    ///
    /// No full factorization is computed.  The factor is instead built up
    /// by subsequent calls to [`unmask_row`](Self::unmask_row), each of which
    /// clears the SPD flag if it meets a non-positive pivot.
    pub fn new_with_row(A: &Matrix<T>, row: usize) -> Result<Self, CholeskyError> {
        let n = usize::min(A.nrows(), A.ncols());
        if row >= n {
            return Err(CholeskyError::IndexOutOfBounds(row));
        }
        let (Lfull, Adiagfull) = Self::cache_entries(A, n);

        let d = Adiagfull[row];
        let isspd = A.is_square() && d > T::zero();

        let mut L = Matrix::zeros((n, n));
        L[(0, 0)] = T::sqrt(T::max(d, T::zero()));

        let map = ActiveIndexMap::new_single(n, row, d);

        Ok(Self {
            n,
            Lfull,
            Adiagfull,
            L,
            map,
            isspd,
            deferred: true,
            work: Vec::with_capacity(n),
        })
    }

    fn dim_and_symmetry(A: &Matrix<T>) -> (usize, bool) {
        let n = usize::min(A.nrows(), A.ncols());
        (n, A.is_symmetric())
    }

    // copy the strict upper triangle and the diagonal of A
    fn cache_entries(A: &Matrix<T>, n: usize) -> (Matrix<T>, Vec<T>) {
        let mut Lfull = Matrix::zeros((n, n));
        let mut Adiagfull = vec![T::zero(); n];
        for j in 0..n {
            for i in 0..j {
                Lfull[(i, j)] = A[(i, j)];
            }
            Adiagfull[j] = A[(j, j)];
        }
        (Lfull, Adiagfull)
    }

    // entry (i,j) of the original matrix
    #[inline]
    fn cached_entry(&self, i: usize, j: usize) -> T {
        match i.cmp(&j) {
            std::cmp::Ordering::Equal => self.Adiagfull[i],
            std::cmp::Ordering::Less => self.Lfull[(i, j)],
            std::cmp::Ordering::Greater => self.Lfull[(j, i)],
        }
    }

    /// dimension of the full matrix
    pub fn dim(&self) -> usize {
        self.n
    }

    /// number of active (unmasked) indices
    pub fn nactive(&self) -> usize {
        self.map.len()
    }

    /// full indices of the active rows, in factor order
    pub fn active(&self) -> &[usize] {
        self.map.active()
    }

    /// SPD status of the matrix as determined at construction
    pub fn is_spd(&self) -> bool {
        self.isspd
    }

    /// true if index `i` is currently excluded from the factor
    ///
    /// # Panics
    /// Panics if `i` is out of bounds.
    pub fn is_masked(&self, i: usize) -> bool {
        assert!(i < self.n);
        self.map.is_masked(i)
    }

    /// A copy of the current `nactive x nactive` factor
    pub fn factor(&self) -> Matrix<T> {
        let m = self.nactive();
        let mut F = Matrix::zeros((m, m));
        for c in 0..m {
            for r in c..m {
                F[(r, c)] = self.L[(r, c)];
            }
        }
        F
    }

    /// Removes index `i` from the active set, downdating the factor.
    pub fn mask_row(&mut self, i: usize) -> Result<(), CholeskyError> {
        if i >= self.n {
            return Err(CholeskyError::IndexOutOfBounds(i));
        }
        // size of the factor before removal
        let m = self.map.len();
        let row = self.map.remove(i).ok_or(CholeskyError::AlreadyMasked(i))?;

        let L = &mut self.L;

        // close the gap.  Rows below `row` move up one place and
        // each carries one entry above the diagonal afterwards.
        for k in (row + 1)..m {
            for c in 0..=k {
                L[(k - 1, c)] = L[(k, c)];
            }
        }
        for c in 0..m {
            L[(m - 1, c)] = T::zero();
        }

        // rotate column pairs (p,p+1) to annihilate the entry above the
        // diagonal of row p.  Rows above p are already zero in both columns.
        for p in row..(m - 1) {
            let (c, s, r) = givens(L[(p, p)], L[(p, p + 1)]);
            L[(p, p)] = r;
            L[(p, p + 1)] = T::zero();
            for q in (p + 1)..(m - 1) {
                let x = L[(q, p)];
                let y = L[(q, p + 1)];
                L[(q, p)] = c * x + s * y;
                L[(q, p + 1)] = c * y - s * x;
            }
        }

        log::debug!("masked row {i} at position {row}, {} active", m - 1);
        Ok(())
    }

    /// Appends index `i` as the last active row, updating the factor.
    pub fn unmask_row(&mut self, i: usize) -> Result<(), CholeskyError> {
        if i >= self.n {
            return Err(CholeskyError::IndexOutOfBounds(i));
        }
        if let Some(k) = self.map.position(i) {
            log::debug!("row {i} is already active at position {k}");
            return Err(CholeskyError::NotMasked(i));
        }

        let mut arow = std::mem::take(&mut self.work);
        arow.clear();
        arow.extend(self.map.active().iter().map(|&j| self.cached_entry(i, j)));

        let newrow = self.map.push(i, self.Adiagfull[i]);
        let d = append_factor_row(&mut self.L, newrow, &arow, self.map.adiag(newrow));
        self.work = arow;

        if self.deferred && !(d > T::zero()) && self.isspd {
            log::warn!("non-positive pivot {d:e} when unmasking row {i}");
            self.isspd = false;
        }

        log::debug!("unmasked row {i} at position {newrow}, {} active", newrow + 1);
        Ok(())
    }

    /// Solves $A_{SS} X_S = B_S$ over the active index set $S$.
    ///
    /// `B` has one row per full index.  The result has the same shape as
    /// `B`, with zero in every masked row.
    pub fn solve(&self, B: &Matrix<T>) -> Result<Matrix<T>, CholeskyError> {
        if B.nrows() != self.n {
            return Err(CholeskyError::IncompatibleDimension);
        }
        if self.map.len() == 0 {
            return Err(CholeskyError::NoActiveRows);
        }
        if !self.isspd {
            return Err(CholeskyError::NotPositiveDefinite);
        }

        let active = self.map.active();
        let mut X = Matrix::zeros(B.size());
        let mut y = vec![T::zero(); active.len()];

        for col in 0..B.ncols() {
            let b = B.col_slice(col);
            for (yk, &i) in y.iter_mut().zip(active) {
                *yk = b[i];
            }

            self.solve_in_place(&mut y);

            let x = X.col_slice_mut(col);
            for (k, &yk) in y.iter().enumerate() {
                x[self.map.full_index(k)] = yk;
            }
        }
        Ok(X)
    }

    /// Single right hand side version of [`solve`](Self::solve)
    pub fn solve_vec(&self, b: &[T]) -> Result<Vec<T>, CholeskyError> {
        let B = Matrix::from_column(b);
        Ok(self.solve(&B)?.data)
    }

    // L*L'*y = b in place, b in active order
    fn solve_in_place(&self, y: &mut [T]) {
        let m = y.len();
        let L = &self.L;

        // forward substitution with L
        for p in 0..m {
            let mut s = y[p];
            for q in 0..p {
                s -= L[(p, q)] * y[q];
            }
            y[p] = s / L[(p, p)];
        }

        // back substitution with L'
        for p in (0..m).rev() {
            let mut s = y[p];
            for q in (p + 1)..m {
                s -= L[(q, p)] * y[q];
            }
            y[p] = s / L[(p, p)];
        }
    }

    #[cfg(test)]
    pub(crate) fn index_map(&self) -> &ActiveIndexMap<T> {
        &self.map
    }
}

// Computes row `row` of a lower triangular factor from the entries `arow`
// of the matrix row against the previous rows and its diagonal entry `adiag`.
// Returns the pivot before it is clamped and square rooted.
pub(crate) fn append_factor_row<T: FloatT>(L: &mut Matrix<T>, row: usize, arow: &[T], adiag: T) -> T {
    assert_eq!(arow.len(), row);

    let mut d = T::zero();
    for k in 0..row {
        let mut s = arow[k];
        for j in 0..k {
            s -= L[(row, j)] * L[(k, j)];
        }
        s /= L[(k, k)];
        L[(row, k)] = s;
        d += s * s;
    }
    let d = adiag - d;
    L[(row, row)] = T::sqrt(T::max(d, T::zero()));
    d
}

// Rotation (c,s) with [a b]*[c -s; s c] = [r 0] and r >= 0
pub(crate) fn givens<T: FloatT>(a: T, b: T) -> (T, T, T) {
    let r = T::hypot(a, b);
    if r == T::zero() {
        (T::one(), T::zero(), T::zero())
    } else {
        (a / r, b / r, r)
    }
}
