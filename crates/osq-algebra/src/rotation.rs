//! Bloch-sphere rotation algebra: composition, matrix conversion, and
//! axis/angle decomposition.

use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::axis::{Axis, EPSILON};
use crate::error::{AlgebraError, AlgebraResult};
use crate::matrix::{equal_up_to_global_phase as matrix_equal_up_to_global_phase, Matrix2};

/// A single-qubit unitary expressed as a rotation about a Bloch-sphere axis,
/// plus an explicit global phase:
///
/// `U = exp(i·phase) · (cos(angle/2)·I − i·sin(angle/2)·(axis·σ))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlochRotation {
    pub axis: Axis,
    /// Canonicalized into `(-π, π]`.
    pub angle: f64,
    pub phase: f64,
}

impl BlochRotation {
    /// Identity rotation (axis is the conventional z-axis, angle zero).
    pub fn identity() -> Self {
        BlochRotation { axis: Axis::Z, angle: 0.0, phase: 0.0 }
    }

    /// Constructs a rotation from raw axis components, an angle, and a phase.
    ///
    /// The axis is normalized; the angle is canonicalized into `(-π, π]`,
    /// compensating `phase` for every full `2π` fold (see [`canonicalize`]).
    /// If the axis has near-zero norm, the angle is folded to the nearest
    /// multiple of `2π` anyway — the identity convention in the crate treats
    /// the axis as arbitrary whenever `angle ≈ 0`.
    pub fn new(axis_x: f64, axis_y: f64, axis_z: f64, angle: f64, phase: f64) -> AlgebraResult<Self> {
        if !angle.is_finite() || !phase.is_finite() {
            return Err(AlgebraError::DomainError("non-finite angle or phase".into()));
        }
        let axis = match Axis::new(axis_x, axis_y, axis_z) {
            Some(axis) => axis,
            None => {
                if angle.abs() <= EPSILON || (angle.abs() - 2.0 * PI).abs() <= EPSILON {
                    Axis::Z
                } else {
                    return Err(AlgebraError::DegenerateAxis { angle });
                }
            }
        };
        let (angle, phase) = canonicalize(angle, phase);
        Ok(BlochRotation { axis, angle, phase })
    }

    /// Builds a rotation directly from an already-normalized axis.
    pub fn from_axis(axis: Axis, angle: f64, phase: f64) -> AlgebraResult<Self> {
        Self::new(axis.x, axis.y, axis.z, angle, phase)
    }

    pub fn is_identity(&self, eps: f64) -> bool {
        self.angle.abs() <= eps
    }

    /// Composes two rotations: `self` applied first, then `other`.
    ///
    /// Implemented via the 2×2 matrix representation (matrix product,
    /// then re-extraction) rather than raw quaternion arithmetic, which
    /// sidesteps the SU(2) double-cover sign bookkeeping while producing
    /// an identical result: the global phase of the composed matrix already
    /// accounts for `self.phase + other.phase` plus any phase accrued by the
    /// quaternion product.
    pub fn compose(&self, other: &Self) -> AlgebraResult<Self> {
        let m_self = self.to_matrix();
        let m_other = other.to_matrix();
        let product = m_other.mul(&m_self);
        Self::from_matrix(&product)
    }

    /// Converts to a dense 2×2 unitary matrix.
    pub fn to_matrix(&self) -> Matrix2 {
        let half = self.angle / 2.0;
        let (s, c) = half.sin_cos();
        let phase = Complex64::from_polar(1.0, self.phase);
        let Axis { x: nx, y: ny, z: nz } = self.axis;

        let m00 = Complex64::new(c, -nz * s);
        let m01 = Complex64::new(-ny * s, -nx * s);
        let m10 = Complex64::new(ny * s, -nx * s);
        let m11 = Complex64::new(c, nz * s);

        Matrix2::new(2, vec![phase * m00, phase * m01, phase * m10, phase * m11])
    }

    /// Extracts `(axis, angle, phase)` from a 2×2 unitary.
    ///
    /// Degenerate branch: if `sin(angle/2) ≈ 0` within [`EPSILON`], the axis
    /// is reported as the conventional z-axis and `angle = 0`.
    pub fn from_matrix(m: &Matrix2) -> AlgebraResult<Self> {
        if m.dim != 2 {
            return Err(AlgebraError::NotUnitary {
                reason: format!("expected a 2x2 matrix, got {0}x{0}", m.dim),
            });
        }
        if !m.is_unitary(1e-6) {
            return Err(AlgebraError::NotUnitary { reason: "matrix is not unitary".into() });
        }

        let det = m.get(0, 0) * m.get(1, 1) - m.get(0, 1) * m.get(1, 0);
        let phase = det.arg() / 2.0;
        let unphase = Complex64::from_polar(1.0, -phase);

        let a = unphase * m.get(0, 0);
        let b = unphase * m.get(0, 1);

        let s = (a.im * a.im + b.norm_sqr()).sqrt();
        if s <= EPSILON {
            return Ok(BlochRotation { axis: Axis::Z, angle: 0.0, phase });
        }

        let c = a.re;
        let angle = 2.0 * s.atan2(c);
        let nx = -b.im / s;
        let ny = -b.re / s;
        let nz = -a.im / s;
        let axis = Axis::new(nx, ny, nz).unwrap_or(Axis::Z);

        let (angle, phase) = canonicalize(angle, phase);
        Ok(BlochRotation { axis, angle, phase })
    }

    /// ABA decomposition: factors `self` as `Rc(θ1)·Rb(θ2)·Ra(θ3)` for the
    /// orthonormal axis pair `(a, b)`, where `c = b × a`.
    ///
    /// Degenerate branch: when `sin(θ2/2) ≈ 0` the rotation lies entirely
    /// along `a`; the result collapses to a single angle `θ1 = p`, `θ2 = 0`,
    /// `θ3 = 0`.
    pub fn decompose_to_axes(&self, a: Axis, b: Axis) -> AbaAngles {
        let c = b.cross(&a);
        let half = self.angle / 2.0;
        let (sin_half, cos_half) = half.sin_cos();

        let n_a = self.axis.dot(&a);
        let n_b = self.axis.dot(&b);
        let n_c = self.axis.dot(&c);

        let p = 2.0 * (n_b * sin_half).atan2(cos_half);

        let radicand = (1.0 + n_a * n_a * (half.tan()).powi(2)).max(0.0);
        let theta2_arg = (cos_half * radicand.sqrt()).clamp(-1.0, 1.0);
        let theta2 = 2.0 * theta2_arg.acos();

        let sin_half_theta2 = (theta2 / 2.0).sin();
        if sin_half_theta2.abs() <= EPSILON {
            return AbaAngles { theta1: p, theta2: 0.0, theta3: 0.0 };
        }

        let m_arg = (n_c * sin_half / sin_half_theta2).clamp(-1.0, 1.0);
        let m = 2.0 * m_arg.acos();

        AbaAngles { theta1: (p + m) / 2.0, theta2, theta3: (p - m) / 2.0 }
    }
}

/// The three ABA decomposition angles `Ra(θ1)·Rb(θ2)·Ra(θ3)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbaAngles {
    pub theta1: f64,
    pub theta2: f64,
    pub theta3: f64,
}

/// Canonicalizes `angle` into `(-π, π]`, compensating `phase` by `π` for
/// every `2π` subtracted — `Rn(θ+2π, phase)` and `Rn(θ, phase+π)` describe
/// the same unitary (see `BlochRotation::to_matrix`), so naively wrapping
/// the angle without the compensating phase shift would silently change
/// the represented operator.
pub fn canonicalize(angle: f64, phase: f64) -> (f64, f64) {
    let folds = ((angle + PI) / (2.0 * PI)).floor();
    let wrapped = angle - folds * 2.0 * PI;
    let phase = phase + folds * PI;
    (wrapped, phase)
}

/// `θ′ = ((θ+π) mod 2π) − π`, favoring `+π` at the boundary.
///
/// Standalone angle-only canonicalization, used for parameters that are not
/// attached to a phase-carrying rotation (e.g. the reader's `theta`/`phi`
/// normalization).
pub fn canonical_angle(theta: f64) -> f64 {
    let (angle, _) = canonicalize(theta, 0.0);
    angle
}

/// `true` iff `U ≡ c·V` for some `|c| = 1`, within `eps` on the Frobenius norm.
pub fn equal_up_to_global_phase(u: &Matrix2, v: &Matrix2, eps: f64) -> bool {
    matrix_equal_up_to_global_phase(u, v, eps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} != {b}");
    }

    #[test]
    fn canonical_angle_boundary_cases() {
        assert_close(canonical_angle(-3.0 * PI), PI, 1e-9);
        assert_close(canonical_angle(-PI), PI, 1e-9);
        assert_close(canonical_angle(0.0), 0.0, 1e-9);
        assert_close(canonical_angle(PI), PI, 1e-9);
        assert_close(canonical_angle(3.0 * PI), PI, 1e-9);
        assert_close(canonical_angle(PI / 2.0), PI / 2.0, 1e-9);
        assert_close(canonical_angle(2.0 * PI + 1e-10), 1e-10, 1e-9);
    }

    #[test]
    fn identity_round_trips_through_matrix() {
        let id = BlochRotation::identity();
        let m = id.to_matrix();
        let back = BlochRotation::from_matrix(&m).unwrap();
        assert!(back.is_identity(1e-9));
    }

    #[test]
    fn x_pi_round_trips() {
        let r = BlochRotation::from_axis(Axis::X, PI, 0.0).unwrap();
        let m = r.to_matrix();
        let back = BlochRotation::from_matrix(&m).unwrap();
        let m2 = back.to_matrix();
        assert!(equal_up_to_global_phase(&m, &m2, 1e-9));
    }

    #[test]
    fn compose_hadamard_squared_is_identity() {
        // H = rotation by pi about (1,0,1)/sqrt(2).
        let h = BlochRotation::new(1.0, 0.0, 1.0, PI, 0.0).unwrap();
        let composed = h.compose(&h).unwrap();
        let id = BlochRotation::identity().to_matrix();
        assert!(equal_up_to_global_phase(&composed.to_matrix(), &id, 1e-8));
    }

    #[test]
    fn aba_decomposition_round_trips_hadamard() {
        let h = BlochRotation::new(1.0, 0.0, 1.0, PI, 0.0).unwrap();
        let angles = h.decompose_to_axes(Axis::Z, Axis::Y);
        let rz1 = BlochRotation::from_axis(Axis::Z, angles.theta1, 0.0).unwrap();
        let ry = BlochRotation::from_axis(Axis::Y, angles.theta2, 0.0).unwrap();
        let rz3 = BlochRotation::from_axis(Axis::Z, angles.theta3, 0.0).unwrap();
        // Target order is Rz(θ1)·Ry(θ2)·Rz(θ3) (matrix notation, θ3 applied
        // first); `compose(self, other)` applies `self` first.
        let recomposed = rz3.compose(&ry).unwrap().compose(&rz1).unwrap();
        assert!(equal_up_to_global_phase(&recomposed.to_matrix(), &h.to_matrix(), 1e-6));
    }
}
