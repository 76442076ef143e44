//! Surface-level wrapper handing out a memoized far-canvas 2D context.

use log::{debug, warn};

use crate::api::{CanvasSurface, ContextAttributes};
use crate::context::FarContext2D;
use crate::error::{FarCanvasError, Result};
use crate::focus::{FocusConfig, FocusOffset};

/// The only context kind a [`FarCanvas`] hands out.
pub const CONTEXT_2D: &str = "2d";

pub struct FarCanvas<S: CanvasSurface> {
    surface: S,
    focus: FocusOffset,
    context: Option<FarContext2D<S::Context>>,
}

impl<S: CanvasSurface> FarCanvas<S> {
    /// Fails with [`FarCanvasError::Configuration`] before touching the surface
    /// if the focus cannot produce a usable mapping.
    pub fn new(surface: S, config: FocusConfig) -> Result<Self> {
        let focus = FocusOffset::try_from(config)?;
        Ok(Self {
            surface,
            focus,
            context: None,
        })
    }

    /// Returns the far-canvas context, creating it on first use.
    ///
    /// The native context is requested from the surface once per context
    /// lifetime; resizing the surface ends that lifetime.
    pub fn get_context(
        &mut self,
        kind: &str,
        attributes: Option<&ContextAttributes>,
    ) -> Result<&mut FarContext2D<S::Context>> {
        if kind != CONTEXT_2D {
            warn!("far canvas only provides a \"2d\" context, got {kind:?}");
            return Err(FarCanvasError::ContextType(format!(
                "unsupported context type {kind:?}"
            )));
        }
        if let Some(attributes) = attributes {
            warn!("context attributes are not supported: {attributes:?}");
            return Err(FarCanvasError::ContextType(
                "context attributes are not supported".to_string(),
            ));
        }
        let ctx = match self.context.take() {
            Some(ctx) => ctx,
            None => {
                let native = self.surface.context_2d()?;
                debug!(
                    "created native 2d context for {}x{} surface",
                    self.surface.width(),
                    self.surface.height()
                );
                FarContext2D::with_focus(native, self.focus)?
            }
        };
        Ok(self.context.insert(ctx))
    }

    /// The current context, if one was created and not invalidated since.
    pub fn context(&self) -> Option<&FarContext2D<S::Context>> {
        self.context.as_ref()
    }

    pub fn set_dimensions(&mut self, width: u32, height: u32) -> Result<()> {
        self.surface.set_dimensions(width, height)?;
        self.context = None;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn set_width(&mut self, width: u32) -> Result<()> {
        self.set_dimensions(width, self.surface.height())
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn set_height(&mut self, height: u32) -> Result<()> {
        self.set_dimensions(self.surface.width(), height)
    }

    pub fn focus(&self) -> &FocusOffset {
        &self.focus
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CanvasState;
    use crate::backends::recording::RecordingSurface;

    fn canvas() -> FarCanvas<RecordingSurface> {
        FarCanvas::new(
            RecordingSurface::new(64, 32),
            FocusConfig {
                x: 1.0e9,
                y: 0.0,
                scale: 2.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn rejects_other_context_kinds() {
        let mut canvas = canvas();
        for kind in ["webgl", "2D", "bitmaprenderer", ""] {
            assert!(matches!(
                canvas.get_context(kind, None),
                Err(FarCanvasError::ContextType(_))
            ));
        }
        assert_eq!(canvas.surface().context_requests(), 0);
    }

    #[test]
    fn rejects_context_attributes() {
        let mut canvas = canvas();
        let attributes = ContextAttributes {
            alpha: Some(false),
            ..Default::default()
        };
        assert!(matches!(
            canvas.get_context(CONTEXT_2D, Some(&attributes)),
            Err(FarCanvasError::ContextType(_))
        ));
        assert!(canvas.context().is_none());
    }

    #[test]
    fn memoizes_the_context() {
        let mut canvas = canvas();
        canvas.get_context("2d", None).unwrap().save().unwrap();
        let ctx = canvas.get_context("2d", None).unwrap();
        assert_eq!(ctx.depth(), 1);
        assert_eq!(canvas.surface().context_requests(), 1);
    }

    #[test]
    fn resizing_drops_the_context() {
        let mut canvas = canvas();
        canvas.get_context("2d", None).unwrap();
        canvas.set_width(128).unwrap();
        assert!(canvas.context().is_none());
        assert_eq!((canvas.width(), canvas.height()), (128, 32));

        canvas.get_context("2d", None).unwrap();
        canvas.set_height(16).unwrap();
        canvas.get_context("2d", None).unwrap();
        assert_eq!(canvas.surface().context_requests(), 3);
        assert_eq!(canvas.height(), 16);
    }

    #[test]
    fn rejects_invalid_focus_before_touching_the_surface() {
        let result = FarCanvas::new(
            RecordingSurface::new(1, 1),
            FocusConfig {
                x: f64::NAN,
                y: 0.0,
                scale: 1.0,
            },
        );
        assert!(matches!(result, Err(FarCanvasError::Configuration(_))));
    }
}
