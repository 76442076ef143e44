//! The far-canvas 2D context: a drop-in [`CanvasRenderingContext2D`] that
//! takes world coordinates and hands bounded coordinates to the context it
//! wraps.

use log::debug;

use crate::api::*;
use crate::error::{FarCanvasError, Result};
use crate::focus::{FocusConfig, FocusOffset};
use crate::font;
use crate::matrix::Matrix;
use crate::strategy::{self, CoordinateStrategy, StrategyKind};

/// Last font string set by the caller and what was sent to the native context for it.
#[derive(Clone)]
struct FontMemo {
    client: String,
    native: String,
}

pub struct FarContext2D<C: CanvasRenderingContext2D> {
    inner: C,
    strategy: Box<dyn CoordinateStrategy>,
    font: Option<FontMemo>,
    // One entry per native save frame.
    saved_fonts: Vec<Option<FontMemo>>,
}

impl<C: CanvasRenderingContext2D> FarContext2D<C> {
    /// Wraps an already obtained native context.
    pub fn new(inner: C, config: FocusConfig) -> Result<Self> {
        let focus = FocusOffset::try_from(config)?;
        Self::with_focus(inner, focus)
    }

    /// Probes the native context once, picks the strategy, and converts the
    /// native default line width and font into world units.
    pub fn with_focus(mut inner: C, focus: FocusOffset) -> Result<Self> {
        let capability = inner.transform_capability();
        let mut strategy = strategy::select(capability, focus);
        debug!(
            "creating far context with {:?} strategy (native capability {:?})",
            strategy.kind(),
            capability
        );
        strategy.install(&mut inner)?;
        let mut ctx = Self {
            inner,
            strategy,
            font: None,
            saved_fonts: Vec::new(),
        };
        ctx.scale_initial_state()?;
        Ok(ctx)
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn focus(&self) -> &FocusOffset {
        self.strategy.focus()
    }

    /// Saved frames on the facade's stack; matches the native depth after
    /// balanced calls.
    pub fn depth(&self) -> usize {
        self.strategy.depth()
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn scale_initial_state(&mut self) -> Result<()> {
        let width = self.inner.line_width()?;
        self.inner.set_line_width(self.strategy.distance(width))?;
        let native_font = self.inner.font()?;
        let mapped = font::map_size(&native_font, |size| self.strategy.distance(size));
        self.inner.set_font(mapped)?;
        self.font = None;
        Ok(())
    }

    fn point(&self, x: f64, y: f64) -> (f64, f64) {
        self.strategy.point(x, y)
    }

    fn distance(&self, d: f64) -> f64 {
        self.strategy.distance(d)
    }

    fn inverse_distance(&self, d: f64) -> f64 {
        self.strategy.inverse_distance(d)
    }
}

impl<C: CanvasRenderingContext2D> CanvasState for FarContext2D<C> {
    fn save(&mut self) -> Result<()> {
        self.inner.save()?;
        self.strategy.save();
        self.saved_fonts.push(self.font.clone());
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        self.inner.restore()?;
        // Unmatched restores leave the native font, so the memo stays valid.
        if let Some(memo) = self.saved_fonts.pop() {
            self.font = memo;
        }
        self.strategy.restore(&mut self.inner)
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.reset()?;
        self.strategy.reset(&mut self.inner)?;
        self.saved_fonts.clear();
        self.scale_initial_state()
    }

    fn set_global_alpha(&mut self, value: f64) -> Result<()> {
        self.inner.set_global_alpha(value)
    }

    fn global_alpha(&self) -> Result<f64> {
        self.inner.global_alpha()
    }

    fn set_global_composite_operation(&mut self, op: CompositeOperation) -> Result<()> {
        self.inner.set_global_composite_operation(op)
    }

    fn global_composite_operation(&self) -> Result<CompositeOperation> {
        self.inner.global_composite_operation()
    }

    fn set_image_smoothing_enabled(&mut self, enabled: bool) -> Result<()> {
        self.inner.set_image_smoothing_enabled(enabled)
    }

    fn image_smoothing_enabled(&self) -> Result<bool> {
        self.inner.image_smoothing_enabled()
    }

    fn set_image_smoothing_quality(&mut self, quality: ImageSmoothingQuality) -> Result<()> {
        self.inner.set_image_smoothing_quality(quality)
    }

    fn image_smoothing_quality(&self) -> Result<ImageSmoothingQuality> {
        self.inner.image_smoothing_quality()
    }
}

impl<C: CanvasRenderingContext2D> CanvasTransforms for FarContext2D<C> {
    fn scale(&mut self, x: f64, y: f64) -> Result<()> {
        self.strategy.scale(&mut self.inner, x, y)
    }

    fn rotate(&mut self, radians: f64) -> Result<()> {
        self.strategy.rotate(&mut self.inner, radians)
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<()> {
        self.strategy.translate(&mut self.inner, x, y)
    }

    fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<()> {
        self.strategy
            .transform(&mut self.inner, Matrix::new(a, b, c, d, e, f))
    }

    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<()> {
        self.strategy
            .set_transform(&mut self.inner, Matrix::new(a, b, c, d, e, f))
    }

    fn reset_transform(&mut self) -> Result<()> {
        self.strategy.reset_transform(&mut self.inner)
    }

    /// The user transform only; the focus offset is never part of it.
    fn get_transform(&self) -> Result<Matrix> {
        self.strategy.get_transform()
    }

    fn transform_capability(&self) -> TransformCapability {
        match self.strategy.kind() {
            StrategyKind::TransformAware => TransformCapability::Settable,
            StrategyKind::Fallback => TransformCapability::Unavailable,
        }
    }
}

impl<C: CanvasRenderingContext2D> CanvasFilters for FarContext2D<C> {
    fn set_filter(&mut self, value: String) -> Result<()> {
        self.inner.set_filter(value)
    }

    fn filter(&self) -> Result<String> {
        self.inner.filter()
    }
}

impl<C: CanvasRenderingContext2D> CanvasCompositing for FarContext2D<C> {
    fn set_shadow_offset_x(&mut self, value: f64) -> Result<()> {
        self.inner.set_shadow_offset_x(self.distance(value))
    }

    fn shadow_offset_x(&self) -> Result<f64> {
        Ok(self.inverse_distance(self.inner.shadow_offset_x()?))
    }

    fn set_shadow_offset_y(&mut self, value: f64) -> Result<()> {
        self.inner.set_shadow_offset_y(self.distance(value))
    }

    fn shadow_offset_y(&self) -> Result<f64> {
        Ok(self.inverse_distance(self.inner.shadow_offset_y()?))
    }

    fn set_shadow_blur(&mut self, value: f64) -> Result<()> {
        self.inner.set_shadow_blur(value)
    }

    fn shadow_blur(&self) -> Result<f64> {
        self.inner.shadow_blur()
    }

    fn set_shadow_color(&mut self, value: String) -> Result<()> {
        self.inner.set_shadow_color(value)
    }

    fn shadow_color(&self) -> Result<String> {
        self.inner.shadow_color()
    }
}

impl<C: CanvasRenderingContext2D> CanvasLineStyles for FarContext2D<C> {
    fn set_line_width(&mut self, value: f64) -> Result<()> {
        self.inner.set_line_width(self.distance(value))
    }

    fn line_width(&self) -> Result<f64> {
        Ok(self.inverse_distance(self.inner.line_width()?))
    }

    fn set_line_cap(&mut self, value: LineCap) -> Result<()> {
        self.inner.set_line_cap(value)
    }

    fn line_cap(&self) -> Result<LineCap> {
        self.inner.line_cap()
    }

    fn set_line_join(&mut self, value: LineJoin) -> Result<()> {
        self.inner.set_line_join(value)
    }

    fn line_join(&self) -> Result<LineJoin> {
        self.inner.line_join()
    }

    fn set_miter_limit(&mut self, value: f64) -> Result<()> {
        self.inner.set_miter_limit(value)
    }

    fn miter_limit(&self) -> Result<f64> {
        self.inner.miter_limit()
    }

    fn set_line_dash(&mut self, segments: Vec<f64>) -> Result<()> {
        let mapped = segments.into_iter().map(|s| self.distance(s)).collect();
        self.inner.set_line_dash(mapped)
    }

    fn line_dash(&self) -> Result<Vec<f64>> {
        Ok(self
            .inner
            .line_dash()?
            .into_iter()
            .map(|s| self.inverse_distance(s))
            .collect())
    }

    fn set_line_dash_offset(&mut self, value: f64) -> Result<()> {
        self.inner.set_line_dash_offset(self.distance(value))
    }

    fn line_dash_offset(&self) -> Result<f64> {
        Ok(self.inverse_distance(self.inner.line_dash_offset()?))
    }
}

impl<C: CanvasRenderingContext2D> CanvasFillStrokeStyles for FarContext2D<C> {
    fn set_fill_style(&mut self, style: Paint) -> Result<()> {
        self.inner.set_fill_style(style)
    }

    fn fill_style(&self) -> Result<Paint> {
        self.inner.fill_style()
    }

    fn set_stroke_style(&mut self, style: Paint) -> Result<()> {
        self.inner.set_stroke_style(style)
    }

    fn stroke_style(&self) -> Result<Paint> {
        self.inner.stroke_style()
    }

    /// The gradient is created in native coordinates and stays valid for as
    /// long as the user transform it was created under.
    fn create_linear_gradient(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<CanvasGradient> {
        let (x0, y0) = self.point(x0, y0);
        let (x1, y1) = self.point(x1, y1);
        self.inner.create_linear_gradient(x0, y0, x1, y1)
    }

    fn create_radial_gradient(
        &mut self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
    ) -> Result<CanvasGradient> {
        let (x0, y0) = self.point(x0, y0);
        let (x1, y1) = self.point(x1, y1);
        let (r0, r1) = (self.distance(r0), self.distance(r1));
        self.inner.create_radial_gradient(x0, y0, r0, x1, y1, r1)
    }

    fn create_pattern(
        &mut self,
        image: &dyn CanvasImageSource,
        repetition: PatternRepetition,
    ) -> Result<CanvasPattern> {
        self.inner.create_pattern(image, repetition)
    }
}

impl<C: CanvasRenderingContext2D> CanvasRectangles for FarContext2D<C> {
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        let (x, y) = self.point(x, y);
        self.inner.clear_rect(x, y, self.distance(w), self.distance(h))
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        let (x, y) = self.point(x, y);
        self.inner.fill_rect(x, y, self.distance(w), self.distance(h))
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        let (x, y) = self.point(x, y);
        self.inner.stroke_rect(x, y, self.distance(w), self.distance(h))
    }
}

impl<C: CanvasRenderingContext2D> CanvasPaths for FarContext2D<C> {
    fn begin_path(&mut self) -> Result<()> {
        self.inner.begin_path()
    }

    fn close_path(&mut self) -> Result<()> {
        self.inner.close_path()
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        let (x, y) = self.point(x, y);
        self.inner.move_to(x, y)
    }

    fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        let (x, y) = self.point(x, y);
        self.inner.line_to(x, y)
    }

    fn bezier_curve_to(
        &mut self,
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        x: f64,
        y: f64,
    ) -> Result<()> {
        let (cp1x, cp1y) = self.point(cp1x, cp1y);
        let (cp2x, cp2y) = self.point(cp2x, cp2y);
        let (x, y) = self.point(x, y);
        self.inner.bezier_curve_to(cp1x, cp1y, cp2x, cp2y, x, y)
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) -> Result<()> {
        let (cpx, cpy) = self.point(cpx, cpy);
        let (x, y) = self.point(x, y);
        self.inner.quadratic_curve_to(cpx, cpy, x, y)
    }

    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        ccw: bool,
    ) -> Result<()> {
        let (x, y) = self.point(x, y);
        let radius = self.distance(radius);
        self.inner.arc(x, y, radius, start_angle, end_angle, ccw)
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<()> {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let radius = self.distance(radius);
        self.inner.arc_to(x1, y1, x2, y2, radius)
    }

    fn ellipse(
        &mut self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        ccw: bool,
    ) -> Result<()> {
        let (x, y) = self.point(x, y);
        let (radius_x, radius_y) = (self.distance(radius_x), self.distance(radius_y));
        self.inner
            .ellipse(x, y, radius_x, radius_y, rotation, start_angle, end_angle, ccw)
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        let (x, y) = self.point(x, y);
        self.inner.rect(x, y, self.distance(w), self.distance(h))
    }

    fn round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radii: &[f64]) -> Result<()> {
        let (x, y) = self.point(x, y);
        let radii: Vec<f64> = radii.iter().map(|r| self.distance(*r)).collect();
        self.inner
            .round_rect(x, y, self.distance(w), self.distance(h), &radii)
    }

    fn fill(&mut self, fill_rule: FillRule) -> Result<()> {
        self.inner.fill(fill_rule)
    }

    fn stroke(&mut self) -> Result<()> {
        self.inner.stroke()
    }

    fn clip(&mut self, fill_rule: FillRule) -> Result<()> {
        self.inner.clip(fill_rule)
    }

    fn fill_path(&mut self, _path: &Path2D, _fill_rule: FillRule) -> Result<()> {
        Err(FarCanvasError::unsupported("fill(path)"))
    }

    fn stroke_path(&mut self, _path: &Path2D) -> Result<()> {
        Err(FarCanvasError::unsupported("stroke(path)"))
    }

    fn clip_path(&mut self, _path: &Path2D, _fill_rule: FillRule) -> Result<()> {
        Err(FarCanvasError::unsupported("clip(path)"))
    }

    // Hit points are device-space on a canvas, so only the focus applies.
    fn is_point_in_path(&self, x: f64, y: f64, opts: HitOptions) -> Result<bool> {
        let (x, y) = self.focus().to_screen(x, y);
        self.inner.is_point_in_path(x, y, opts)
    }

    fn is_point_in_stroke(&self, x: f64, y: f64) -> Result<bool> {
        let (x, y) = self.focus().to_screen(x, y);
        self.inner.is_point_in_stroke(x, y)
    }
}

impl<C: CanvasRenderingContext2D> CanvasText for FarContext2D<C> {
    fn set_font(&mut self, value: String) -> Result<()> {
        let native = font::map_size(&value, |size| self.distance(size));
        self.inner.set_font(native.clone())?;
        self.font = Some(FontMemo {
            client: value,
            native,
        });
        Ok(())
    }

    fn font(&self) -> Result<String> {
        let native = self.inner.font()?;
        match &self.font {
            Some(memo) if memo.native == native => Ok(memo.client.clone()),
            _ => Ok(font::map_size(&native, |size| self.inverse_distance(size))),
        }
    }

    fn set_text_align(&mut self, value: TextAlign) -> Result<()> {
        self.inner.set_text_align(value)
    }

    fn text_align(&self) -> Result<TextAlign> {
        self.inner.text_align()
    }

    fn set_text_baseline(&mut self, value: TextBaseline) -> Result<()> {
        self.inner.set_text_baseline(value)
    }

    fn text_baseline(&self) -> Result<TextBaseline> {
        self.inner.text_baseline()
    }

    fn set_direction(&mut self, value: Direction) -> Result<()> {
        self.inner.set_direction(value)
    }

    fn direction(&self) -> Result<Direction> {
        self.inner.direction()
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>) -> Result<()> {
        let (x, y) = self.point(x, y);
        let max_width = max_width.map(|w| self.distance(w));
        self.inner.fill_text(text, x, y, max_width)
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>) -> Result<()> {
        let (x, y) = self.point(x, y);
        let max_width = max_width.map(|w| self.distance(w));
        self.inner.stroke_text(text, x, y, max_width)
    }

    fn measure_text(&self, text: &str) -> Result<TextMetrics> {
        let metrics = self.inner.measure_text(text)?;
        Ok(TextMetrics {
            width: self.inverse_distance(metrics.width),
        })
    }
}

impl<C: CanvasRenderingContext2D> CanvasImageData for FarContext2D<C> {
    fn create_image_data(&mut self, width: u32, height: u32) -> Result<ImageData> {
        self.inner.create_image_data(width, height)
    }

    fn get_image_data(&self, _sx: u32, _sy: u32, _sw: u32, _sh: u32) -> Result<ImageData> {
        Err(FarCanvasError::unsupported("getImageData"))
    }

    fn put_image_data(&mut self, _data: &ImageData, _dx: f64, _dy: f64) -> Result<()> {
        Err(FarCanvasError::unsupported("putImageData"))
    }

    fn put_image_data_dirty(
        &mut self,
        _data: &ImageData,
        _dx: f64,
        _dy: f64,
        _dirty_x: u32,
        _dirty_y: u32,
        _dirty_width: u32,
        _dirty_height: u32,
    ) -> Result<()> {
        Err(FarCanvasError::unsupported("putImageData"))
    }
}

impl<C: CanvasRenderingContext2D> CanvasDrawImage for FarContext2D<C> {
    /// Drawn at the image's pixel size in world units.
    fn draw_image(&mut self, image: &dyn CanvasImageSource, dx: f64, dy: f64) -> Result<()> {
        let (dx, dy) = self.point(dx, dy);
        let dw = self.distance(f64::from(image.width()));
        let dh = self.distance(f64::from(image.height()));
        self.inner.draw_image_scaled(image, dx, dy, dw, dh)
    }

    fn draw_image_scaled(
        &mut self,
        image: &dyn CanvasImageSource,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) -> Result<()> {
        let (dx, dy) = self.point(dx, dy);
        let (dw, dh) = (self.distance(dw), self.distance(dh));
        self.inner.draw_image_scaled(image, dx, dy, dw, dh)
    }

    fn draw_image_subrect(
        &mut self,
        image: &dyn CanvasImageSource,
        sx: f64,
        sy: f64,
        sw: f64,
        sh: f64,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) -> Result<()> {
        let (dx, dy) = self.point(dx, dy);
        let (dw, dh) = (self.distance(dw), self.distance(dh));
        self.inner
            .draw_image_subrect(image, sx, sy, sw, sh, dx, dy, dw, dh)
    }
}

impl<C: CanvasRenderingContext2D> CanvasRenderingContext2D for FarContext2D<C> {}
