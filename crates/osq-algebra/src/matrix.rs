//! Generic complex-matrix comparison used by replacement and decomposer checks.

use num_complex::Complex64;

use crate::axis::EPSILON;

/// A square complex matrix stored row-major, used for `MatrixGate` bodies and
/// for comparing the accumulated unitary of a decomposed sub-circuit against
/// the gate it replaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix2 {
    pub dim: usize,
    pub data: Vec<Complex64>,
}

impl Matrix2 {
    pub fn new(dim: usize, data: Vec<Complex64>) -> Self {
        assert_eq!(data.len(), dim * dim, "matrix data must be dim*dim");
        Matrix2 { dim, data }
    }

    pub fn identity(dim: usize) -> Self {
        let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = Complex64::new(1.0, 0.0);
        }
        Matrix2 { dim, data }
    }

    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim + col]
    }

    /// Matrix product `self * other`.
    pub fn mul(&self, other: &Matrix2) -> Matrix2 {
        assert_eq!(self.dim, other.dim);
        let n = self.dim;
        let mut data = vec![Complex64::new(0.0, 0.0); n * n];
        for i in 0..n {
            for j in 0..n {
                let mut acc = Complex64::new(0.0, 0.0);
                for k in 0..n {
                    acc += self.get(i, k) * other.get(k, j);
                }
                data[i * n + j] = acc;
            }
        }
        Matrix2 { dim: n, data }
    }

    /// Checks that `self` is unitary within `eps` (columns orthonormal).
    pub fn is_unitary(&self, eps: f64) -> bool {
        let n = self.dim;
        let dagger_product = {
            let mut data = vec![Complex64::new(0.0, 0.0); n * n];
            for i in 0..n {
                for j in 0..n {
                    let mut acc = Complex64::new(0.0, 0.0);
                    for k in 0..n {
                        acc += self.get(k, i).conj() * self.get(k, j);
                    }
                    data[i * n + j] = acc;
                }
            }
            Matrix2 { dim: n, data }
        };
        let identity = Matrix2::identity(n);
        frobenius_distance(&dagger_product, &identity) <= eps
    }
}

fn frobenius_distance(a: &Matrix2, b: &Matrix2) -> f64 {
    a.data
        .iter()
        .zip(b.data.iter())
        .map(|(x, y)| (x - y).norm_sqr())
        .sum::<f64>()
        .sqrt()
}

/// Returns `true` iff there exists a complex scalar `c` with `|c| = 1` such that
/// `‖U - c·V‖_F ≤ eps`.
///
/// `c` is derived from the largest-magnitude entry of `U`, per the standard
/// trick: pick `(i, j)` maximizing `|U[i][j]|`, set `c = U[i][j] / V[i][j]`
/// (after normalizing `c` back to the unit circle), then check the full
/// Frobenius distance.
pub fn equal_up_to_global_phase(u: &Matrix2, v: &Matrix2, eps: f64) -> bool {
    if u.dim != v.dim || u.data.len() != v.data.len() {
        return false;
    }
    let Some((idx, _)) = u
        .data
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))
    else {
        return true;
    };
    let u_entry = u.data[idx];
    let v_entry = v.data[idx];
    if v_entry.norm() < EPSILON {
        // Reference entry vanished too: fall back to a direct comparison.
        return frobenius_distance(u, v) <= eps;
    }
    let raw = u_entry / v_entry;
    let c = raw / raw.norm();
    let scaled_v = Matrix2 {
        dim: v.dim,
        data: v.data.iter().map(|x| c * x).collect(),
    };
    frobenius_distance(u, &scaled_v) <= eps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_equals_itself() {
        let id = Matrix2::identity(2);
        assert!(equal_up_to_global_phase(&id, &id, 1e-8));
    }

    #[test]
    fn global_phase_is_ignored() {
        let id = Matrix2::identity(2);
        let phased = Matrix2 {
            dim: 2,
            data: id.data.iter().map(|x| x * Complex64::new(0.0, 1.0)).collect(),
        };
        assert!(equal_up_to_global_phase(&id, &phased, 1e-8));
    }

    #[test]
    fn distinct_matrices_are_unequal() {
        let id = Matrix2::identity(2);
        let mut x = Matrix2::identity(2);
        x.data.swap(0, 1);
        x.data.swap(2, 3);
        assert!(!equal_up_to_global_phase(&id, &x, 1e-8));
    }
}
