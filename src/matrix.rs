//! 2x3 affine matrix in Canvas/DOMMatrix component order (a, b, c, d, e, f).
//!
//! A point maps as `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.

use std::ops::Mul;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translation(x: f64, y: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub const fn scaling(x: f64, y: f64) -> Self {
        Self::new(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Returns `self * other`: `other` is applied to a point first, then `self`.
    /// This is how Canvas composes `transform()` onto the current matrix.
    pub fn then_apply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det != 0.0 && det.is_finite()
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// The same matrix with its translation dropped.
    pub fn linear(&self) -> Matrix {
        Matrix::new(self.a, self.b, self.c, self.d, 0.0, 0.0)
    }

    pub fn invert(&self) -> Option<Matrix> {
        if !self.is_invertible() {
            return None;
        }
        let det = self.determinant();
        Some(Matrix {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Solves `self(p) = (x, y)` for `p`.
    ///
    /// The translation is subtracted from the target before the linear part is
    /// inverted, so a target and translation of similar large magnitude cancel
    /// exactly instead of being mixed into the inverse first.
    pub fn preimage(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !self.is_invertible() {
            return None;
        }
        let det = self.determinant();
        let dx = x - self.e;
        let dy = y - self.f;
        Some((
            (self.d * dx - self.c * dy) / det,
            (self.a * dy - self.b * dx) / det,
        ))
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::IDENTITY
    }
}

impl From<[f64; 6]> for Matrix {
    fn from(m: [f64; 6]) -> Self {
        let [a, b, c, d, e, f] = m;
        Matrix::new(a, b, c, d, e, f)
    }
}

impl From<Matrix> for [f64; 6] {
    fn from(m: Matrix) -> Self {
        m.to_array()
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        self.then_apply(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_almost_eq(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn composes_in_canvas_order() {
        let m = Matrix::translation(5.0, 6.0) * Matrix::scaling(2.0, 3.0);
        assert_eq!(m, Matrix::new(2.0, 0.0, 0.0, 3.0, 5.0, 6.0));
        assert_eq!(m.apply(1.0, 1.0), (7.0, 9.0));
    }

    #[test]
    fn rotation_turns_x_axis_onto_y_axis() {
        let (x, y) = Matrix::rotation(FRAC_PI_2).apply(1.0, 0.0);
        assert_almost_eq(x, 0.0);
        assert_almost_eq(y, 1.0);
    }

    #[test]
    fn inverse_undoes_the_matrix() {
        let m = Matrix::new(2.0, 0.5, -1.0, 3.0, 7.0, -4.0);
        let inv = m.invert().unwrap();
        let (x, y) = m.apply(3.0, -2.0);
        let (bx, by) = inv.apply(x, y);
        assert_almost_eq(bx, 3.0);
        assert_almost_eq(by, -2.0);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let m = Matrix::scaling(0.0, 1.0);
        assert!(m.invert().is_none());
        assert!(m.preimage(1.0, 1.0).is_none());
    }

    #[test]
    fn preimage_cancels_large_translations_exactly() {
        let m = Matrix::translation(1.0e9 + 100.0, 1.0e9);
        assert_eq!(m.preimage(1.0e9, 1.0e9), Some((-100.0, 0.0)));
    }

    #[test]
    fn serializes_by_component_name() {
        let m = Matrix::new(1.0, 0.0, 0.0, 2.0, 1.0e9, -3.5);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"a":1.0,"b":0.0,"c":0.0,"d":2.0,"e":1000000000.0,"f":-3.5}"#);
        let back: Matrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn linear_part_drops_translation() {
        let m = Matrix::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(m.linear().to_array(), [1.0, 2.0, 3.0, 4.0, 0.0, 0.0]);
    }
}
