//! 2x2 unitary algebra for single-qubit resynthesis.

use num_complex::Complex64;
use std::f64::consts::{FRAC_PI_4, PI};
use std::ops::Mul;

/// Tolerance for identity and angle checks.
const EPSILON: f64 = 1e-10;

/// A 2x2 complex matrix representing a single-qubit unitary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2 {
    /// Row-major entries.
    pub m: [[Complex64; 2]; 2],
}

impl Unitary2x2 {
    /// Construct from row-major entries.
    pub fn new(m00: Complex64, m01: Complex64, m10: Complex64, m11: Complex64) -> Self {
        Self {
            m: [[m00, m01], [m10, m11]],
        }
    }

    /// The identity matrix.
    pub fn identity() -> Self {
        Self::new(1.0.into(), 0.0.into(), 0.0.into(), 1.0.into())
    }

    /// Pauli-X.
    pub fn x() -> Self {
        Self::new(0.0.into(), 1.0.into(), 1.0.into(), 0.0.into())
    }

    /// Pauli-Y.
    pub fn y() -> Self {
        let i = Complex64::i();
        Self::new(0.0.into(), -i, i, 0.0.into())
    }

    /// Pauli-Z.
    pub fn z() -> Self {
        Self::new(1.0.into(), 0.0.into(), 0.0.into(), (-1.0).into())
    }

    /// Hadamard.
    pub fn h() -> Self {
        let s = Complex64::from(std::f64::consts::FRAC_1_SQRT_2);
        Self::new(s, s, s, -s)
    }

    /// S gate.
    pub fn s() -> Self {
        Self::new(1.0.into(), 0.0.into(), 0.0.into(), Complex64::i())
    }

    /// S-dagger gate.
    pub fn sdg() -> Self {
        Self::new(1.0.into(), 0.0.into(), 0.0.into(), -Complex64::i())
    }

    /// T gate.
    pub fn t() -> Self {
        Self::new(
            1.0.into(),
            0.0.into(),
            0.0.into(),
            Complex64::from_polar(1.0, FRAC_PI_4),
        )
    }

    /// T-dagger gate.
    pub fn tdg() -> Self {
        Self::new(
            1.0.into(),
            0.0.into(),
            0.0.into(),
            Complex64::from_polar(1.0, -FRAC_PI_4),
        )
    }

    /// sqrt(X) gate.
    pub fn sx() -> Self {
        let a = Complex64::new(0.5, 0.5);
        let b = Complex64::new(0.5, -0.5);
        Self::new(a, b, b, a)
    }

    /// sqrt(X)-dagger gate.
    pub fn sxdg() -> Self {
        let a = Complex64::new(0.5, -0.5);
        let b = Complex64::new(0.5, 0.5);
        Self::new(a, b, b, a)
    }

    /// X rotation.
    pub fn rx(theta: f64) -> Self {
        let c = Complex64::from((theta / 2.0).cos());
        let s = -Complex64::i() * (theta / 2.0).sin();
        Self::new(c, s, s, c)
    }

    /// Y rotation.
    pub fn ry(theta: f64) -> Self {
        let c = Complex64::from((theta / 2.0).cos());
        let s = Complex64::from((theta / 2.0).sin());
        Self::new(c, -s, s, c)
    }

    /// Z rotation.
    pub fn rz(theta: f64) -> Self {
        Self::new(
            Complex64::from_polar(1.0, -theta / 2.0),
            0.0.into(),
            0.0.into(),
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Phase gate.
    pub fn p(theta: f64) -> Self {
        Self::new(
            1.0.into(),
            0.0.into(),
            0.0.into(),
            Complex64::from_polar(1.0, theta),
        )
    }

    /// Universal single-qubit gate U(θ, φ, λ).
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            c.into(),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
    }

    /// Check whether this is the identity up to global phase.
    pub fn is_identity(&self) -> bool {
        self.m[0][1].norm() < EPSILON
            && self.m[1][0].norm() < EPSILON
            && (self.m[0][0] - self.m[1][1]).norm() < EPSILON
            && (self.m[0][0].norm() - 1.0).abs() < EPSILON
    }

    /// Decompose into ZYZ Euler angles.
    ///
    /// Returns `(alpha, beta, gamma, phase)` such that the unitary
    /// equals `e^{i phase} · Rz(alpha) · Ry(beta) · Rz(gamma)`, i.e.
    /// in circuit application order: Rz(gamma), Ry(beta), Rz(alpha).
    pub fn zyz_decomposition(&self) -> (f64, f64, f64, f64) {
        let det = self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0];
        let phase = 0.5 * det.arg();
        let scale = Complex64::from_polar(1.0, -phase);

        let m00 = self.m[0][0] * scale;
        let m10 = self.m[1][0] * scale;
        let m11 = self.m[1][1] * scale;

        let cos_half = m00.norm();
        let sin_half = m10.norm();
        let beta = 2.0 * sin_half.atan2(cos_half);

        let (alpha, gamma) = if sin_half < EPSILON {
            (2.0 * m11.arg(), 0.0)
        } else if cos_half < EPSILON {
            (2.0 * m10.arg(), 0.0)
        } else {
            (m11.arg() + m10.arg(), m11.arg() - m10.arg())
        };

        (alpha, beta, gamma, phase)
    }

    /// Wrap an angle into (-pi, pi].
    pub fn normalize_angle(angle: f64) -> f64 {
        let mut a = angle % (2.0 * PI);
        if a > PI {
            a -= 2.0 * PI;
        } else if a <= -PI {
            a += 2.0 * PI;
        }
        a
    }
}

impl Mul for Unitary2x2 {
    type Output = Unitary2x2;

    fn mul(self, rhs: Unitary2x2) -> Unitary2x2 {
        let mut out = [[Complex64::from(0.0); 2]; 2];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.m[i][0] * rhs.m[0][j] + self.m[i][1] * rhs.m[1][j];
            }
        }
        Unitary2x2 { m: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_h_squared_is_identity() {
        let hh = Unitary2x2::h() * Unitary2x2::h();
        assert!(hh.is_identity());
    }

    #[test]
    fn test_s_squared_is_z() {
        let ss = Unitary2x2::s() * Unitary2x2::s();
        let z = Unitary2x2::z();
        for i in 0..2 {
            for j in 0..2 {
                assert!((ss.m[i][j] - z.m[i][j]).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn test_zyz_of_rz() {
        let (alpha, beta, gamma, _) = Unitary2x2::rz(0.7).zyz_decomposition();
        assert_close(beta, 0.0);
        assert_close(Unitary2x2::normalize_angle(alpha + gamma), 0.7);
    }

    #[test]
    fn test_zyz_of_ry() {
        let (alpha, beta, gamma, _) = Unitary2x2::ry(1.1).zyz_decomposition();
        assert_close(beta, 1.1);
        assert_close(Unitary2x2::normalize_angle(alpha), 0.0);
        assert_close(Unitary2x2::normalize_angle(gamma), 0.0);
    }

    #[test]
    fn test_zyz_roundtrip() {
        let u = Unitary2x2::u(0.3, 1.2, -0.4);
        let (alpha, beta, gamma, phase) = u.zyz_decomposition();
        let rebuilt = Unitary2x2::rz(alpha) * Unitary2x2::ry(beta) * Unitary2x2::rz(gamma);
        let scale = Complex64::from_polar(1.0, phase);
        for i in 0..2 {
            for j in 0..2 {
                assert!((rebuilt.m[i][j] * scale - u.m[i][j]).norm() < 1e-9);
            }
        }
    }

    #[test]
    fn test_normalize_angle() {
        assert_close(Unitary2x2::normalize_angle(3.0 * PI), PI);
        assert_close(Unitary2x2::normalize_angle(-3.0 * PI), PI);
        assert_close(Unitary2x2::normalize_angle(0.5), 0.5);
    }
}
