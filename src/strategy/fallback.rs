use log::debug;

use crate::api::CanvasTransforms;
use crate::error::{FarCanvasError, Result};
use crate::focus::FocusOffset;
use crate::matrix::Matrix;
use crate::stack::{StateStack, TransformFrame};

use super::{CoordinateStrategy, StrategyKind};

/// Strategy for contexts without a settable matrix: every argument is mapped
/// through the focus offset and user transforms are refused.
pub struct Fallback {
    focus: FocusOffset,
    stack: StateStack,
}

impl Fallback {
    pub fn new(focus: FocusOffset) -> Self {
        Self {
            focus,
            stack: StateStack::new(),
        }
    }
}

impl CoordinateStrategy for Fallback {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fallback
    }

    fn focus(&self) -> &FocusOffset {
        &self.focus
    }

    fn point(&self, x: f64, y: f64) -> (f64, f64) {
        self.focus.to_screen(x, y)
    }

    fn install(&mut self, _native: &mut dyn CanvasTransforms) -> Result<()> {
        debug!(
            "fallback strategy focused at ({}, {}) with scale {}",
            self.focus.x(),
            self.focus.y(),
            self.focus.scale()
        );
        Ok(())
    }

    fn translate(&mut self, _native: &mut dyn CanvasTransforms, _x: f64, _y: f64) -> Result<()> {
        Err(FarCanvasError::unsupported("translate"))
    }

    fn scale(&mut self, _native: &mut dyn CanvasTransforms, _x: f64, _y: f64) -> Result<()> {
        Err(FarCanvasError::unsupported("scale"))
    }

    fn rotate(&mut self, _native: &mut dyn CanvasTransforms, _radians: f64) -> Result<()> {
        Err(FarCanvasError::unsupported("rotate"))
    }

    fn transform(&mut self, _native: &mut dyn CanvasTransforms, _m: Matrix) -> Result<()> {
        Err(FarCanvasError::unsupported("transform"))
    }

    fn set_transform(&mut self, _native: &mut dyn CanvasTransforms, _m: Matrix) -> Result<()> {
        Err(FarCanvasError::unsupported("setTransform"))
    }

    fn reset_transform(&mut self, _native: &mut dyn CanvasTransforms) -> Result<()> {
        Err(FarCanvasError::unsupported("resetTransform"))
    }

    fn get_transform(&self) -> Result<Matrix> {
        Err(FarCanvasError::unsupported("getTransform"))
    }

    fn save(&mut self) {
        self.stack.push(TransformFrame { user: None });
    }

    fn restore(&mut self, _native: &mut dyn CanvasTransforms) -> Result<()> {
        if self.stack.pop().is_none() {
            log::warn!("restore() without matching save()");
        }
        Ok(())
    }

    fn reset(&mut self, _native: &mut dyn CanvasTransforms) -> Result<()> {
        self.stack.clear();
        Ok(())
    }

    fn depth(&self) -> usize {
        self.stack.depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::recording::RecordingCanvas;

    #[test]
    fn maps_through_the_focus_offset() {
        let s = Fallback::new(FocusOffset::new(100.0, 200.0, 2.0).unwrap());
        assert_eq!(s.point(50.0, 60.0), (-100.0, -280.0));
        assert_eq!(s.distance(15.0), 30.0);
        assert_eq!(s.inverse_distance(30.0), 15.0);
    }

    #[test]
    fn refuses_every_transform_operation() {
        let mut native = RecordingCanvas::without_transforms();
        let mut s = Fallback::new(FocusOffset::new(3.0, 0.0, 1.5).unwrap());
        let results = [
            ("translate", s.translate(&mut native, 1.0, 2.0)),
            ("scale", s.scale(&mut native, 2.0, 2.0)),
            ("rotate", s.rotate(&mut native, 1.0)),
            ("transform", s.transform(&mut native, Matrix::IDENTITY)),
            ("setTransform", s.set_transform(&mut native, Matrix::IDENTITY)),
            ("resetTransform", s.reset_transform(&mut native)),
        ];
        for (name, result) in results {
            match result {
                Err(FarCanvasError::Unsupported { operation }) => assert_eq!(operation, name),
                other => panic!("{name} should be unsupported, got {other:?}"),
            }
        }
        assert!(matches!(
            s.get_transform(),
            Err(FarCanvasError::Unsupported { operation: "getTransform" })
        ));
        assert!(native.ops().is_empty());
    }

    #[test]
    fn tracks_depth_and_tolerates_extra_restores() {
        let mut native = RecordingCanvas::without_transforms();
        let mut s = Fallback::new(FocusOffset::new(0.0, 0.0, 1.0).unwrap());
        s.save();
        s.save();
        assert_eq!(s.depth(), 2);
        s.restore(&mut native).unwrap();
        s.restore(&mut native).unwrap();
        s.restore(&mut native).unwrap();
        assert_eq!(s.depth(), 0);
    }
}
