use crate::algebra::FloatT;

/// Bookkeeping for the rows of a [`MaskedCholesky`](super::MaskedCholesky)
/// that currently take part in the factor.
///
/// Every full index is either active, in which case it occupies exactly one
/// position of the active ordering, or masked.  The two maps below are kept
/// mutually inverse on the active indices by `push` and `remove`, which are
/// the only mutating operations.
#[derive(Debug, Clone)]
pub(crate) struct ActiveIndexMap<T> {
    // position of each full index in the active ordering, None if masked
    full2partial: Vec<Option<usize>>,
    // full index occupying each active position
    partial2full: Vec<usize>,
    // original diagonal entries of A, in active order
    adiag: Vec<T>,
}

impl<T> ActiveIndexMap<T>
where
    T: FloatT,
{
    /// all indices active in their natural order
    pub fn new_all(adiagfull: &[T]) -> Self {
        let n = adiagfull.len();
        Self {
            full2partial: (0..n).map(Some).collect(),
            partial2full: (0..n).collect(),
            adiag: adiagfull.to_vec(),
        }
    }

    /// every index masked except `row`
    pub fn new_single(n: usize, row: usize, adiag_row: T) -> Self {
        assert!(row < n);
        let mut full2partial = vec![None; n];
        full2partial[row] = Some(0);

        let mut partial2full = Vec::with_capacity(n);
        partial2full.push(row);
        let mut adiag = Vec::with_capacity(n);
        adiag.push(adiag_row);

        Self {
            full2partial,
            partial2full,
            adiag,
        }
    }

    /// number of full indices
    pub fn dim(&self) -> usize {
        self.full2partial.len()
    }

    /// number of active indices
    pub fn len(&self) -> usize {
        self.partial2full.len()
    }

    pub fn is_masked(&self, i: usize) -> bool {
        self.full2partial[i].is_none()
    }

    /// position of full index `i` in the active ordering
    pub fn position(&self, i: usize) -> Option<usize> {
        self.full2partial[i]
    }

    /// full index at active position `k`
    pub fn full_index(&self, k: usize) -> usize {
        self.partial2full[k]
    }

    /// full indices in active order
    pub fn active(&self) -> &[usize] {
        &self.partial2full
    }

    pub fn adiag(&self, k: usize) -> T {
        self.adiag[k]
    }

    /// Appends masked index `i` as the last active position and
    /// returns that position.
    pub fn push(&mut self, i: usize, adiag_i: T) -> usize {
        assert!(self.is_masked(i));
        let k = self.partial2full.len();
        self.partial2full.push(i);
        self.adiag.push(adiag_i);
        self.full2partial[i] = Some(k);
        debug_assert!(self.check());
        k
    }

    /// Masks active index `i` and returns the position it occupied, or
    /// `None` if it was already masked.  Every later position moves up by one.
    pub fn remove(&mut self, i: usize) -> Option<usize> {
        let k = self.full2partial[i]?;
        self.partial2full.remove(k);
        self.adiag.remove(k);
        self.full2partial[i] = None;
        for (p, &j) in self.partial2full.iter().enumerate().skip(k) {
            self.full2partial[j] = Some(p);
        }
        debug_assert!(self.check());
        Some(k)
    }

    /// true if the two maps are mutually inverse on the active indices
    pub fn check(&self) -> bool {
        if self.adiag.len() != self.partial2full.len() {
            return false;
        }
        for (k, &i) in self.partial2full.iter().enumerate() {
            if i >= self.dim() || self.full2partial[i] != Some(k) {
                return false;
            }
        }
        let nactive = self.full2partial.iter().filter(|p| p.is_some()).count();
        nactive == self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_and_push() {
        let mut map = ActiveIndexMap::new_all(&[1., 2., 3., 4.]);
        assert_eq!(map.len(), 4);

        assert_eq!(map.remove(1), Some(1));
        assert_eq!(map.remove(1), None);
        assert_eq!(map.active(), &[0, 2, 3]);
        assert_eq!(map.position(3), Some(2));
        assert_eq!(map.adiag(1), 3.);
        assert!(map.is_masked(1));

        assert_eq!(map.push(1, 2.), 3);
        assert_eq!(map.active(), &[0, 2, 3, 1]);
        assert_eq!(map.adiag(3), 2.);
        assert!(map.check());
    }

    #[test]
    fn test_single() {
        let mut map = ActiveIndexMap::new_single(3, 2, 5.0);
        assert_eq!(map.len(), 1);
        assert_eq!(map.dim(), 3);
        assert!(map.is_masked(0) && map.is_masked(1));
        assert_eq!(map.full_index(0), 2);

        map.push(0, 1.0);
        map.remove(2);
        assert_eq!(map.active(), &[0]);
        assert_eq!(map.position(0), Some(0));
        assert!(map.check());
    }
}
