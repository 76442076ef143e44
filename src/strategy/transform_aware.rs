use log::debug;

use crate::api::CanvasTransforms;
use crate::error::Result;
use crate::focus::FocusOffset;
use crate::matrix::Matrix;
use crate::stack::{StateStack, TransformFrame};

use super::{CoordinateStrategy, StrategyKind};

/// Strategy for contexts whose matrix can be replaced.
///
/// With user transform `U` (linear part `A`, translation `t`), focus `o` and
/// scale `s`, a world point `p` must land on `s * (U(p) - o)`. The native
/// matrix only ever receives `A`, never a translation; points are sent as
/// `s * (p - k)` with the pivot `k = U⁻¹(o)`, so that
/// `A * s * (p - k) = s * (U(p) - o)`. Geometry that is on screen has
/// `p` near `k`, which keeps the native arguments small.
pub struct TransformAware {
    base: FocusOffset,
    pivot: FocusOffset,
    user: Matrix,
    stack: StateStack,
}

impl TransformAware {
    pub fn new(focus: FocusOffset) -> Self {
        Self {
            base: focus,
            pivot: focus,
            user: Matrix::IDENTITY,
            stack: StateStack::new(),
        }
    }

    fn pivot_for(&self, user: &Matrix) -> FocusOffset {
        // A singular user matrix collapses every point, any pivot will do.
        match user.preimage(self.base.x(), self.base.y()) {
            Some((x, y)) if x.is_finite() && y.is_finite() => self.base.refocus(x, y),
            _ => self.base,
        }
    }

    /// Hands the linear part to the native context, then commits `user`.
    fn apply(&mut self, native: &mut dyn CanvasTransforms, user: Matrix) -> Result<()> {
        if !user.is_finite() {
            return Ok(());
        }
        native.set_transform(user.a, user.b, user.c, user.d, 0.0, 0.0)?;
        self.pivot = self.pivot_for(&user);
        self.user = user;
        Ok(())
    }

    fn compose(&mut self, native: &mut dyn CanvasTransforms, m: Matrix) -> Result<()> {
        let user = self.user * m;
        self.apply(native, user)
    }
}

impl CoordinateStrategy for TransformAware {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TransformAware
    }

    fn focus(&self) -> &FocusOffset {
        &self.base
    }

    fn point(&self, x: f64, y: f64) -> (f64, f64) {
        self.pivot.to_screen(x, y)
    }

    fn install(&mut self, native: &mut dyn CanvasTransforms) -> Result<()> {
        debug!(
            "transform-aware strategy focused at ({}, {}) with scale {}",
            self.base.x(),
            self.base.y(),
            self.base.scale()
        );
        self.apply(native, Matrix::IDENTITY)
    }

    fn translate(&mut self, native: &mut dyn CanvasTransforms, x: f64, y: f64) -> Result<()> {
        self.compose(native, Matrix::translation(x, y))
    }

    fn scale(&mut self, native: &mut dyn CanvasTransforms, x: f64, y: f64) -> Result<()> {
        self.compose(native, Matrix::scaling(x, y))
    }

    fn rotate(&mut self, native: &mut dyn CanvasTransforms, radians: f64) -> Result<()> {
        if !radians.is_finite() {
            return Ok(());
        }
        self.compose(native, Matrix::rotation(radians))
    }

    fn transform(&mut self, native: &mut dyn CanvasTransforms, m: Matrix) -> Result<()> {
        if !m.is_finite() {
            return Ok(());
        }
        self.compose(native, m)
    }

    fn set_transform(&mut self, native: &mut dyn CanvasTransforms, m: Matrix) -> Result<()> {
        self.apply(native, m)
    }

    fn reset_transform(&mut self, native: &mut dyn CanvasTransforms) -> Result<()> {
        self.apply(native, Matrix::IDENTITY)
    }

    fn get_transform(&self) -> Result<Matrix> {
        Ok(self.user)
    }

    fn save(&mut self) {
        self.stack.push(TransformFrame {
            user: Some(self.user),
        });
    }

    fn restore(&mut self, native: &mut dyn CanvasTransforms) -> Result<()> {
        let user = match self.stack.pop() {
            Some(frame) => frame.user.unwrap_or(Matrix::IDENTITY),
            None => {
                log::warn!("restore() without matching save(), resetting user transform");
                Matrix::IDENTITY
            }
        };
        self.apply(native, user)
    }

    fn reset(&mut self, native: &mut dyn CanvasTransforms) -> Result<()> {
        self.stack.clear();
        self.apply(native, Matrix::IDENTITY)
    }

    fn depth(&self) -> usize {
        self.stack.depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::recording::RecordingCanvas;
    use std::f64::consts::FRAC_PI_2;

    fn assert_almost_eq(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    fn strategy(x: f64, y: f64, scale: f64) -> (TransformAware, RecordingCanvas) {
        let mut native = RecordingCanvas::new();
        let mut s = TransformAware::new(FocusOffset::new(x, y, scale).unwrap());
        s.install(&mut native).unwrap();
        (s, native)
    }

    #[test]
    fn identity_maps_like_the_focus_offset() {
        let (s, native) = strategy(1000.0, 2000.0, 2.0);
        assert_eq!(s.point(100.0, 200.0), (-1800.0, -3600.0));
        assert_eq!(s.distance(50.0), 100.0);
        assert_eq!(native.get_transform().unwrap(), Matrix::IDENTITY);
    }

    #[test]
    fn translation_moves_the_pivot_not_the_native_matrix() {
        let (mut s, mut native) = strategy(1.0e9, 1.0e9, 2.0);
        s.translate(&mut native, 1.0e9 + 100.0, 1.0e9 + 50.0).unwrap();
        assert_eq!(native.get_transform().unwrap(), Matrix::IDENTITY);
        // Drawing at the translated origin lands 100/50 world units from the focus.
        assert_eq!(s.point(0.0, 0.0), (200.0, 100.0));
        assert_eq!(s.get_transform().unwrap(), Matrix::translation(1.0e9 + 100.0, 1.0e9 + 50.0));
    }

    #[test]
    fn native_receives_only_the_linear_part() {
        let (mut s, mut native) = strategy(10.0, 20.0, 1.0);
        s.translate(&mut native, 5.0, 5.0).unwrap();
        s.rotate(&mut native, FRAC_PI_2).unwrap();
        let m = native.get_transform().unwrap();
        assert_almost_eq(m.a, 0.0);
        assert_almost_eq(m.b, 1.0);
        assert_eq!((m.e, m.f), (0.0, 0.0));
    }

    #[test]
    fn composed_mapping_matches_user_transform_then_focus() {
        let (mut s, mut native) = strategy(300.0, -40.0, 1.5);
        s.translate(&mut native, 310.0, -30.0).unwrap();
        s.rotate(&mut native, 0.7).unwrap();
        s.scale(&mut native, 2.0, 0.5).unwrap();

        let user = s.get_transform().unwrap();
        let linear = native.get_transform().unwrap();
        for (x, y) in [(0.0, 0.0), (3.0, -4.0), (-12.5, 8.25)] {
            let (qx, qy) = s.point(x, y);
            let (dx, dy) = linear.apply(qx, qy);
            let (ux, uy) = user.apply(x, y);
            assert_almost_eq(dx, 1.5 * (ux - 300.0));
            assert_almost_eq(dy, 1.5 * (uy + 40.0));
        }
    }

    #[test]
    fn non_finite_arguments_are_ignored() {
        let (mut s, mut native) = strategy(0.0, 0.0, 1.0);
        s.translate(&mut native, 3.0, 4.0).unwrap();
        s.translate(&mut native, f64::NAN, 1.0).unwrap();
        s.rotate(&mut native, f64::INFINITY).unwrap();
        s.set_transform(&mut native, Matrix::new(1.0, 0.0, 0.0, f64::NAN, 0.0, 0.0)).unwrap();
        assert_eq!(s.get_transform().unwrap(), Matrix::translation(3.0, 4.0));
    }

    #[test]
    fn singular_transform_keeps_mapping_finite() {
        let (mut s, mut native) = strategy(5.0, 5.0, 1.0);
        s.scale(&mut native, 0.0, 0.0).unwrap();
        let (x, y) = s.point(6.0, 7.0);
        assert!(x.is_finite() && y.is_finite());
    }

    #[test]
    fn restore_reapplies_saved_transform() {
        let (mut s, mut native) = strategy(0.0, 0.0, 2.0);
        s.scale(&mut native, 3.0, 3.0).unwrap();
        s.save();
        s.rotate(&mut native, 1.0).unwrap();
        s.restore(&mut native).unwrap();
        assert_eq!(s.get_transform().unwrap(), Matrix::scaling(3.0, 3.0));
        assert_eq!(native.get_transform().unwrap(), Matrix::scaling(3.0, 3.0));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn unmatched_restore_resets_to_identity() {
        let (mut s, mut native) = strategy(0.0, 0.0, 2.0);
        s.translate(&mut native, 7.0, 8.0).unwrap();
        s.restore(&mut native).unwrap();
        assert_eq!(s.get_transform().unwrap(), Matrix::IDENTITY);
        assert_eq!(s.point(1.0, 1.0), (2.0, 2.0));
    }
}
