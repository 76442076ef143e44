//! A Canvas 2D context proxy for drawing at very large world coordinates.
//!
//! Canvas implementations typically lose precision once coordinates reach
//! ~1e9, because the transform is evaluated in reduced precision. A
//! [`FarContext2D`] is configured with a focus point and a scale; every
//! coordinate it receives has the focus subtracted before it is scaled and
//! handed to the wrapped context, so the native side only ever sees values
//! near the visible region.
//!
//! ```
//! use far_canvas::api::CanvasRectangles;
//! use far_canvas::backends::recording::RecordingCanvas;
//! use far_canvas::{FarContext2D, FocusConfig};
//!
//! let focus = FocusConfig { x: 1.0e9, y: 1.0e9, scale: 2.0 };
//! let mut ctx = FarContext2D::new(RecordingCanvas::new(), focus)?;
//! ctx.fill_rect(1.0e9 + 10.0, 1.0e9 + 20.0, 5.0, 5.0)?;
//! # Ok::<(), far_canvas::FarCanvasError>(())
//! ```

pub mod api;
pub mod canvas;
pub mod context;
pub mod error;
pub mod focus;
pub mod font;
pub mod matrix;
pub mod stack;
pub mod strategy;

pub mod backends {
    #[cfg(feature = "cairo")]
    pub mod cairo;
    pub mod recording;
}

pub use canvas::FarCanvas;
pub use context::FarContext2D;
pub use error::{FarCanvasError, Result};
pub use focus::{FocusConfig, FocusOffset};
pub use matrix::Matrix;
pub use strategy::StrategyKind;
