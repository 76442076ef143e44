//! The two ways of composing the focus offset with user transforms.
//!
//! Which one a facade uses is decided once, from the wrapped context's
//! [`TransformCapability`], and never re-checked per call.

mod fallback;
mod transform_aware;

pub use fallback::Fallback;
pub use transform_aware::TransformAware;

use crate::api::{CanvasTransforms, TransformCapability};
use crate::error::Result;
use crate::focus::FocusOffset;
use crate::matrix::Matrix;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    TransformAware,
    Fallback,
}

/// Maps world arguments to native arguments and owns the user transform and
/// its save/restore frames.
///
/// Methods that touch the native context get it passed in; a strategy never
/// holds on to it.
pub trait CoordinateStrategy {
    fn kind(&self) -> StrategyKind;

    /// The configured focus offset, independent of any user transform.
    fn focus(&self) -> &FocusOffset;

    /// Maps a world point to the native argument for the current user transform.
    fn point(&self, x: f64, y: f64) -> (f64, f64);

    fn distance(&self, distance: f64) -> f64 {
        self.focus().distance_to_screen(distance)
    }

    fn inverse_distance(&self, distance: f64) -> f64 {
        self.focus().distance_to_world(distance)
    }

    /// Puts the native context into the state this strategy expects.
    fn install(&mut self, native: &mut dyn CanvasTransforms) -> Result<()>;

    fn translate(&mut self, native: &mut dyn CanvasTransforms, x: f64, y: f64) -> Result<()>;
    fn scale(&mut self, native: &mut dyn CanvasTransforms, x: f64, y: f64) -> Result<()>;
    fn rotate(&mut self, native: &mut dyn CanvasTransforms, radians: f64) -> Result<()>;
    fn transform(&mut self, native: &mut dyn CanvasTransforms, m: Matrix) -> Result<()>;
    fn set_transform(&mut self, native: &mut dyn CanvasTransforms, m: Matrix) -> Result<()>;
    fn reset_transform(&mut self, native: &mut dyn CanvasTransforms) -> Result<()>;
    fn get_transform(&self) -> Result<Matrix>;

    /// Pushes a frame. Called after the native save succeeded.
    fn save(&mut self);
    /// Pops a frame and reapplies it. Called after the native restore succeeded.
    fn restore(&mut self, native: &mut dyn CanvasTransforms) -> Result<()>;
    /// Drops every frame and the user transform. Called after a native reset.
    fn reset(&mut self, native: &mut dyn CanvasTransforms) -> Result<()>;
    fn depth(&self) -> usize;
}

pub fn select(capability: TransformCapability, focus: FocusOffset) -> Box<dyn CoordinateStrategy> {
    match capability {
        TransformCapability::Settable => Box::new(TransformAware::new(focus)),
        TransformCapability::Unavailable => Box::new(Fallback::new(focus)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_follows_capability() {
        let focus = FocusOffset::new(1.0, 2.0, 3.0).unwrap();
        assert_eq!(
            select(TransformCapability::Settable, focus).kind(),
            StrategyKind::TransformAware
        );
        assert_eq!(
            select(TransformCapability::Unavailable, focus).kind(),
            StrategyKind::Fallback
        );
    }
}
