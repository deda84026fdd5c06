//! Semantic algebra for single-qubit Bloch-sphere rotations.
//!
//! This crate is the numerical core shared by every other `osq-*` crate: it
//! represents a single-qubit unitary as `(axis, angle, phase)`, provides
//! composition via the 2×2 matrix representation, conversions to and from
//! dense matrices, canonical angle folding, and an equivalence check that
//! ignores global phase.
//!
//! # Example
//!
//! ```rust
//! use osq_algebra::{Axis, BlochRotation};
//!
//! let rx = BlochRotation::from_axis(Axis::X, std::f64::consts::FRAC_PI_2, 0.0).unwrap();
//! let rx2 = rx.compose(&rx).unwrap();
//! assert!((rx2.angle - std::f64::consts::PI).abs() < 1e-9);
//! ```

mod axis;
pub mod error;
mod matrix;
mod rotation;

pub use axis::{Axis, EPSILON};
pub use error::{AlgebraError, AlgebraResult};
pub use matrix::Matrix2;
pub use rotation::{canonical_angle, equal_up_to_global_phase, AbaAngles, BlochRotation};
