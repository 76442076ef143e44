//! Cairo backend implementing the 2D context traits behind the optional
//! `cairo` crate feature. Rasterizes onto an ARGB32 image surface, which is
//! what the pixel-consistency tests compare.
//!
//! Cairo has no shadows or CSS filters; those properties are stored and
//! reported back but have no visual effect.

use std::f64::consts::{FRAC_PI_2, PI};

use cairo::{
    Context, Extend, Filter, FillRule as CairoFillRule, FontSlant, FontWeight, Format,
    ImageSurface, LineCap as CairoLineCap, LineJoin as CairoLineJoin, Operator, SurfacePattern,
};

use crate::api::*;
use crate::error::{FarCanvasError, Result};
use crate::font;
use crate::matrix::Matrix;

const DEFAULT_FONT: &str = "10px sans-serif";

/// Drawing state Cairo does not keep in its own graphics state.
#[derive(Clone, Debug)]
struct PaintState {
    fill_style: Paint,
    stroke_style: Paint,
    global_alpha: f64,
    composite: CompositeOperation,
    shadow_offset_x: f64,
    shadow_offset_y: f64,
    shadow_blur: f64,
    shadow_color: String,
    filter: String,
    image_smoothing_enabled: bool,
    image_smoothing_quality: ImageSmoothingQuality,
    font: String,
    text_align: TextAlign,
    text_baseline: TextBaseline,
    direction: Direction,
    /// A non-invertible user matrix. Cairo refuses these, so it is kept here
    /// and nothing is drawn until an invertible matrix replaces it.
    singular: Option<Matrix>,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            fill_style: Paint::Color("#000000".into()),
            stroke_style: Paint::Color("#000000".into()),
            global_alpha: 1.0,
            composite: CompositeOperation::SourceOver,
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            shadow_blur: 0.0,
            shadow_color: "rgba(0,0,0,0)".into(),
            filter: "none".into(),
            image_smoothing_enabled: true,
            image_smoothing_quality: ImageSmoothingQuality::Low,
            font: DEFAULT_FONT.into(),
            text_align: TextAlign::Start,
            text_baseline: TextBaseline::Alphabetic,
            direction: Direction::Inherit,
            singular: None,
        }
    }
}

/// Adapter that translates 2D context calls into Cairo operations.
pub struct CairoCanvas {
    ctx: Context,
    state: PaintState,
    stack: Vec<PaintState>,
}

impl CairoCanvas {
    pub fn new(ctx: Context) -> Self {
        let canvas = Self {
            ctx,
            state: PaintState::default(),
            stack: Vec::new(),
        };
        canvas.apply_line_defaults();
        canvas
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    // Cairo starts with a line width of 2; a canvas starts with 1.
    fn apply_line_defaults(&self) {
        self.ctx.set_line_width(1.0);
        self.ctx.set_line_cap(CairoLineCap::Butt);
        self.ctx.set_line_join(CairoLineJoin::Miter);
        self.ctx.set_miter_limit(10.0);
        self.ctx.set_dash(&[], 0.0);
        self.ctx.set_operator(Operator::Over);
    }

    fn apply_composite(&self) {
        self.ctx.set_operator(map_composite(&self.state.composite));
    }

    fn apply_paint(&self, paint: &Paint) -> Result<()> {
        let alpha = self.state.global_alpha;
        match paint {
            Paint::Color(s) => {
                let (r, g, b, a) = parse_color(s);
                self.ctx.set_source_rgba(r, g, b, a * alpha);
            }
            Paint::Gradient(grad) => match grad.kind {
                GradientKind::Linear { x0, y0, x1, y1 } => {
                    let pattern = cairo::LinearGradient::new(x0, y0, x1, y1);
                    for stop in &grad.stops {
                        let (r, g, b, a) = parse_color(&stop.color);
                        pattern.add_color_stop_rgba(stop.offset, r, g, b, a * alpha);
                    }
                    self.ctx.set_source(&pattern)?;
                }
                GradientKind::Radial {
                    x0,
                    y0,
                    r0,
                    x1,
                    y1,
                    r1,
                } => {
                    let pattern = cairo::RadialGradient::new(x0, y0, r0, x1, y1, r1);
                    for stop in &grad.stops {
                        let (r, g, b, a) = parse_color(&stop.color);
                        pattern.add_color_stop_rgba(stop.offset, r, g, b, a * alpha);
                    }
                    self.ctx.set_source(&pattern)?;
                }
            },
            // A CanvasPattern does not carry its image.
            Paint::Pattern(_) => return Err(FarCanvasError::unsupported("pattern paint")),
        }
        Ok(())
    }

    fn apply_font(&self) {
        let (size, family) = font::size_and_family(&self.state.font, 10.0, "sans-serif");
        let lower = self.state.font.to_ascii_lowercase();
        let slant = if lower.contains("italic") {
            FontSlant::Italic
        } else if lower.contains("oblique") {
            FontSlant::Oblique
        } else {
            FontSlant::Normal
        };
        let weight = if lower.contains("bold") {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        };
        self.ctx
            .select_font_face(family.trim_matches('"'), slant, weight);
        self.ctx.set_font_size(size);
    }

    /// Runs `draw` on an empty path, then puts the caller's path back.
    /// Canvas rectangle, text and image calls never touch the current path.
    fn with_detached_path(&self, draw: impl FnOnce() -> Result<()>) -> Result<()> {
        let path = self.ctx.copy_path()?;
        self.ctx.new_path();
        let result = draw();
        self.ctx.new_path();
        self.ctx.append_path(&path);
        result
    }

    fn current_matrix(&self) -> Matrix {
        if let Some(m) = self.state.singular {
            return m;
        }
        let m = self.ctx.matrix();
        Matrix::new(m.xx(), m.yx(), m.xy(), m.yy(), m.x0(), m.y0())
    }

    fn drawable(&self) -> bool {
        self.state.singular.is_none()
    }

    fn apply_matrix(&mut self, m: Matrix) {
        if m.is_invertible() && m.is_finite() {
            self.ctx
                .set_matrix(cairo::Matrix::new(m.a, m.b, m.c, m.d, m.e, m.f));
            self.state.singular = None;
        } else {
            self.state.singular = Some(m);
        }
    }

    /// Applies `step` before the current matrix. Non-finite steps are ignored.
    fn compose(&mut self, step: Matrix) {
        if step.is_finite() {
            let next = self.current_matrix().then_apply(&step);
            self.apply_matrix(next);
        }
    }

    /// Maps a device-space point into the current user space.
    fn device_to_user(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.current_matrix().preimage(x, y)
    }

    fn ensure_subpath(&self, x: f64, y: f64) -> Result<()> {
        if !self.ctx.has_current_point()? {
            self.ctx.move_to(x, y);
        }
        Ok(())
    }

    fn show_text(&self, text: &str, x: f64, y: f64, max_width: Option<f64>, stroke: bool) -> Result<()> {
        if !self.drawable() {
            return Ok(());
        }
        self.apply_font();
        let paint = if stroke {
            &self.state.stroke_style
        } else {
            &self.state.fill_style
        };
        self.apply_paint(paint)?;
        self.apply_composite();
        let extents = self.ctx.text_extents(text)?;
        let squeeze = match max_width {
            Some(w) if w <= 0.0 || !w.is_finite() => return Ok(()),
            Some(w) if extents.x_advance() > w => w / extents.x_advance(),
            _ => 1.0,
        };
        let (dx, dy) = text_anchor_offset(
            &self.state.text_align,
            &self.state.text_baseline,
            &self.state.direction,
            extents.x_advance() * squeeze,
            extents.height(),
            extents.y_bearing(),
        );
        self.with_detached_path(|| {
            self.ctx.save()?;
            self.ctx.translate(x + dx, y + dy);
            self.ctx.scale(squeeze, 1.0);
            self.ctx.move_to(0.0, 0.0);
            if stroke {
                self.ctx.text_path(text);
                self.ctx.stroke()?;
            } else {
                self.ctx.show_text(text)?;
            }
            self.ctx.restore()?;
            Ok(())
        })
    }

    fn image_surface_from_rgba(&self, image: &dyn CanvasImageSource) -> Result<ImageSurface> {
        let width = image.width();
        let height = image.height();
        let data = image.data_rgba().ok_or_else(|| {
            FarCanvasError::Other(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "CanvasImageSource missing RGBA data",
            )))
        })?;

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| {
                FarCanvasError::Other(Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "image dimensions overflow",
                )))
            })?;

        if data.len() != expected {
            return Err(FarCanvasError::Other(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "RGBA buffer length does not match width*height*4",
            ))));
        }

        let mut buf = vec![0u8; expected];
        for (src, dst) in data.chunks_exact(4).zip(buf.chunks_exact_mut(4)) {
            dst.copy_from_slice(&premultiply(src));
        }

        let stride = (width * 4) as i32;
        let surface =
            ImageSurface::create_for_data(buf, Format::ARgb32, width as i32, height as i32, stride)?;
        Ok(surface)
    }

    fn make_image_pattern(&self, surface: &ImageSurface) -> SurfacePattern {
        let pattern = SurfacePattern::create(surface);
        let filter = if !self.state.image_smoothing_enabled {
            Filter::Nearest
        } else {
            match self.state.image_smoothing_quality {
                ImageSmoothingQuality::Low => Filter::Fast,
                ImageSmoothingQuality::Medium => Filter::Good,
                ImageSmoothingQuality::High => Filter::Best,
            }
        };
        pattern.set_filter(filter);
        pattern.set_extend(Extend::None);
        pattern
    }

    /// Copies pixels straight into the target, ignoring transform, clip,
    /// alpha and compositing.
    fn put_pixels(&self, data: &ImageData, dx: f64, dy: f64, dirty: (f64, f64, f64, f64)) -> Result<()> {
        let surface = self.image_surface_from_rgba(data)?;
        let (x, y, w, h) = dirty;
        self.with_detached_path(|| {
            self.ctx.save()?;
            self.ctx.identity_matrix();
            self.ctx.reset_clip();
            self.ctx.set_operator(Operator::Source);
            self.ctx.set_source_surface(&surface, dx.round(), dy.round())?;
            self.ctx.rectangle(dx.round() + x, dy.round() + y, w, h);
            self.ctx.fill()?;
            self.ctx.restore()?;
            Ok(())
        })
    }

    fn paint_image(&self, pattern: &SurfacePattern, clip: (f64, f64, f64, f64), place: Matrix) -> Result<()> {
        if !self.drawable() {
            return Ok(());
        }
        self.with_detached_path(|| {
            self.ctx.save()?;
            self.apply_composite();
            self.ctx.rectangle(clip.0, clip.1, clip.2, clip.3);
            self.ctx.clip();
            self.ctx.transform(cairo::Matrix::new(
                place.a, place.b, place.c, place.d, place.e, place.f,
            ));
            self.ctx.set_source(pattern)?;
            self.ctx.paint_with_alpha(self.state.global_alpha)?;
            self.ctx.restore()?;
            Ok(())
        })
    }
}

impl CanvasState for CairoCanvas {
    fn save(&mut self) -> Result<()> {
        self.ctx.save()?;
        self.stack.push(self.state.clone());
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        // Unbalanced restores are ignored, as on a canvas.
        if !self.stack.is_empty() {
            self.ctx.restore()?;
        }
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        for _ in self.stack.drain(..) {
            self.ctx.restore()?;
        }
        self.state = PaintState::default();
        self.ctx.identity_matrix();
        self.ctx.reset_clip();
        self.ctx.new_path();
        self.apply_line_defaults();
        self.ctx.save()?;
        self.ctx.set_operator(Operator::Clear);
        self.ctx.paint()?;
        self.ctx.restore()?;
        Ok(())
    }

    fn set_global_alpha(&mut self, value: f64) -> Result<()> {
        if (0.0..=1.0).contains(&value) {
            self.state.global_alpha = value;
        }
        Ok(())
    }

    fn global_alpha(&self) -> Result<f64> {
        Ok(self.state.global_alpha)
    }

    fn set_global_composite_operation(&mut self, op: CompositeOperation) -> Result<()> {
        self.state.composite = op;
        self.apply_composite();
        Ok(())
    }

    fn global_composite_operation(&self) -> Result<CompositeOperation> {
        Ok(self.state.composite.clone())
    }

    fn set_image_smoothing_enabled(&mut self, enabled: bool) -> Result<()> {
        self.state.image_smoothing_enabled = enabled;
        Ok(())
    }

    fn image_smoothing_enabled(&self) -> Result<bool> {
        Ok(self.state.image_smoothing_enabled)
    }

    fn set_image_smoothing_quality(&mut self, quality: ImageSmoothingQuality) -> Result<()> {
        self.state.image_smoothing_quality = quality;
        Ok(())
    }

    fn image_smoothing_quality(&self) -> Result<ImageSmoothingQuality> {
        Ok(self.state.image_smoothing_quality.clone())
    }
}

impl CanvasTransforms for CairoCanvas {
    fn scale(&mut self, x: f64, y: f64) -> Result<()> {
        self.compose(Matrix::scaling(x, y));
        Ok(())
    }

    fn rotate(&mut self, radians: f64) -> Result<()> {
        if radians.is_finite() {
            self.compose(Matrix::rotation(radians));
        }
        Ok(())
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<()> {
        self.compose(Matrix::translation(x, y));
        Ok(())
    }

    fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<()> {
        self.compose(Matrix::new(a, b, c, d, e, f));
        Ok(())
    }

    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<()> {
        let m = Matrix::new(a, b, c, d, e, f);
        if m.is_finite() {
            self.apply_matrix(m);
        }
        Ok(())
    }

    fn reset_transform(&mut self) -> Result<()> {
        self.apply_matrix(Matrix::IDENTITY);
        Ok(())
    }

    fn get_transform(&self) -> Result<Matrix> {
        Ok(self.current_matrix())
    }

    fn transform_capability(&self) -> TransformCapability {
        TransformCapability::Settable
    }
}

impl CanvasFilters for CairoCanvas {
    fn set_filter(&mut self, value: String) -> Result<()> {
        self.state.filter = value;
        Ok(())
    }

    fn filter(&self) -> Result<String> {
        Ok(self.state.filter.clone())
    }
}

impl CanvasCompositing for CairoCanvas {
    fn set_shadow_offset_x(&mut self, value: f64) -> Result<()> {
        self.state.shadow_offset_x = value;
        Ok(())
    }

    fn shadow_offset_x(&self) -> Result<f64> {
        Ok(self.state.shadow_offset_x)
    }

    fn set_shadow_offset_y(&mut self, value: f64) -> Result<()> {
        self.state.shadow_offset_y = value;
        Ok(())
    }

    fn shadow_offset_y(&self) -> Result<f64> {
        Ok(self.state.shadow_offset_y)
    }

    fn set_shadow_blur(&mut self, value: f64) -> Result<()> {
        self.state.shadow_blur = value;
        Ok(())
    }

    fn shadow_blur(&self) -> Result<f64> {
        Ok(self.state.shadow_blur)
    }

    fn set_shadow_color(&mut self, value: String) -> Result<()> {
        self.state.shadow_color = value;
        Ok(())
    }

    fn shadow_color(&self) -> Result<String> {
        Ok(self.state.shadow_color.clone())
    }
}

impl CanvasLineStyles for CairoCanvas {
    fn set_line_width(&mut self, value: f64) -> Result<()> {
        if value > 0.0 && value.is_finite() {
            self.ctx.set_line_width(value);
        }
        Ok(())
    }

    fn line_width(&self) -> Result<f64> {
        Ok(self.ctx.line_width())
    }

    fn set_line_cap(&mut self, value: LineCap) -> Result<()> {
        self.ctx.set_line_cap(map_line_cap(value));
        Ok(())
    }

    fn line_cap(&self) -> Result<LineCap> {
        Ok(map_line_cap_back(self.ctx.line_cap()))
    }

    fn set_line_join(&mut self, value: LineJoin) -> Result<()> {
        self.ctx.set_line_join(map_line_join(value));
        Ok(())
    }

    fn line_join(&self) -> Result<LineJoin> {
        Ok(map_line_join_back(self.ctx.line_join()))
    }

    fn set_miter_limit(&mut self, value: f64) -> Result<()> {
        self.ctx.set_miter_limit(value);
        Ok(())
    }

    fn miter_limit(&self) -> Result<f64> {
        Ok(self.ctx.miter_limit())
    }

    fn set_line_dash(&mut self, segments: Vec<f64>) -> Result<()> {
        if segments.iter().any(|s| *s < 0.0 || !s.is_finite()) {
            return Ok(());
        }
        // Canvas repeats odd-length dash lists to make them even.
        let segments = if segments.len() % 2 == 1 {
            segments.repeat(2)
        } else {
            segments
        };
        let (_, offset) = self.ctx.dash();
        self.ctx.set_dash(&segments, offset);
        Ok(())
    }

    fn line_dash(&self) -> Result<Vec<f64>> {
        Ok(self.ctx.dash().0)
    }

    fn set_line_dash_offset(&mut self, value: f64) -> Result<()> {
        let (segments, _) = self.ctx.dash();
        self.ctx.set_dash(&segments, value);
        Ok(())
    }

    fn line_dash_offset(&self) -> Result<f64> {
        Ok(self.ctx.dash().1)
    }
}

impl CanvasFillStrokeStyles for CairoCanvas {
    fn set_fill_style(&mut self, style: Paint) -> Result<()> {
        self.state.fill_style = style;
        Ok(())
    }

    fn fill_style(&self) -> Result<Paint> {
        Ok(self.state.fill_style.clone())
    }

    fn set_stroke_style(&mut self, style: Paint) -> Result<()> {
        self.state.stroke_style = style;
        Ok(())
    }

    fn stroke_style(&self) -> Result<Paint> {
        Ok(self.state.stroke_style.clone())
    }

    fn create_linear_gradient(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<CanvasGradient> {
        Ok(CanvasGradient {
            kind: GradientKind::Linear { x0, y0, x1, y1 },
            stops: Vec::new(),
        })
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
        Ok(CanvasGradient {
            kind: GradientKind::Radial {
                x0,
                y0,
                r0,
                x1,
                y1,
                r1,
            },
            stops: Vec::new(),
        })
    }

    fn create_pattern(
        &mut self,
        _image: &dyn CanvasImageSource,
        repetition: PatternRepetition,
    ) -> Result<CanvasPattern> {
        Ok(CanvasPattern {
            repetition,
            transform: None,
        })
    }
}

impl CanvasRectangles for CairoCanvas {
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        if !self.drawable() {
            return Ok(());
        }
        self.with_detached_path(|| {
            self.ctx.save()?;
            self.ctx.rectangle(x, y, w, h);
            self.ctx.set_operator(Operator::Clear);
            self.ctx.fill()?;
            self.ctx.restore()?;
            Ok(())
        })
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        if !self.drawable() {
            return Ok(());
        }
        self.with_detached_path(|| {
            self.ctx.rectangle(x, y, w, h);
            self.ctx.set_fill_rule(CairoFillRule::Winding);
            self.apply_paint(&self.state.fill_style)?;
            self.ctx.fill()?;
            Ok(())
        })
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        if !self.drawable() {
            return Ok(());
        }
        self.with_detached_path(|| {
            self.ctx.rectangle(x, y, w, h);
            self.apply_paint(&self.state.stroke_style)?;
            self.ctx.stroke()?;
            Ok(())
        })
    }
}

impl CanvasPaths for CairoCanvas {
    fn begin_path(&mut self) -> Result<()> {
        self.ctx.new_path();
        Ok(())
    }

    fn close_path(&mut self) -> Result<()> {
        self.ctx.close_path();
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        if !self.drawable() {
            return Ok(());
        }
        self.ctx.move_to(x, y);
        Ok(())
    }

    fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        if !self.drawable() {
            return Ok(());
        }
        self.ctx.line_to(x, y);
        Ok(())
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
        if !self.drawable() {
            return Ok(());
        }
        self.ensure_subpath(cp1x, cp1y)?;
        self.ctx.curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
        Ok(())
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) -> Result<()> {
        if !self.drawable() {
            return Ok(());
        }
        self.ensure_subpath(cpx, cpy)?;
        let (sx, sy) = self.ctx.current_point()?;
        self.ctx.curve_to(
            sx + 2.0 / 3.0 * (cpx - sx),
            sy + 2.0 / 3.0 * (cpy - sy),
            x + 2.0 / 3.0 * (cpx - x),
            y + 2.0 / 3.0 * (cpy - y),
            x,
            y,
        );
        Ok(())
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
        if !self.drawable() {
            return Ok(());
        }
        if ccw {
            self.ctx.arc_negative(x, y, radius, start_angle, end_angle);
        } else {
            self.ctx.arc(x, y, radius, start_angle, end_angle);
        }
        Ok(())
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<()> {
        if !self.drawable() {
            return Ok(());
        }
        self.ensure_subpath(x1, y1)?;
        let (x0, y0) = self.ctx.current_point()?;
        let r = radius;

        // Degenerate cases: treat as straight segments.
        if r == 0.0
            || ((x0 - x1).abs() < 1e-9 && (y0 - y1).abs() < 1e-9)
            || ((x1 - x2).abs() < 1e-9 && (y1 - y2).abs() < 1e-9)
        {
            return self.line_to(x1, y1);
        }

        let v1 = (x0 - x1, y0 - y1);
        let v2 = (x2 - x1, y2 - y1);
        let len1 = v1.0.hypot(v1.1);
        let len2 = v2.0.hypot(v2.1);
        let v1n = (v1.0 / len1, v1.1 / len1);
        let v2n = (v2.0 / len2, v2.1 / len2);
        let dot = (v1n.0 * v2n.0 + v1n.1 * v2n.1).clamp(-1.0, 1.0);

        // Collinear: draw straight.
        if (1.0 - dot).abs() < 1e-6 || (1.0 + dot).abs() < 1e-6 {
            return self.line_to(x1, y1);
        }

        let tan_half = (dot.acos() / 2.0).tan();
        let dist = r / tan_half;

        let tp1 = (x1 + v1n.0 * dist, y1 + v1n.1 * dist);
        let tp2 = (x1 + v2n.0 * dist, y1 + v2n.1 * dist);

        let cross = v1n.0 * v2n.1 - v1n.1 * v2n.0;
        let n1 = if cross < 0.0 {
            (v1n.1, -v1n.0)
        } else {
            (-v1n.1, v1n.0)
        };
        let center = (tp1.0 + n1.0 * r, tp1.1 + n1.1 * r);
        let start_ang = (tp1.1 - center.1).atan2(tp1.0 - center.0);
        let end_ang = (tp2.1 - center.1).atan2(tp2.0 - center.0);

        self.line_to(tp1.0, tp1.1)?;
        if cross > 0.0 {
            self.ctx.arc(center.0, center.1, r, start_ang, end_ang);
        } else {
            self.ctx.arc_negative(center.0, center.1, r, start_ang, end_ang);
        }
        Ok(())
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
        if !self.drawable() {
            return Ok(());
        }
        if radius_x == 0.0 || radius_y == 0.0 {
            return self.line_to(x, y);
        }
        self.ctx.save()?;
        self.ctx.translate(x, y);
        self.ctx.rotate(rotation);
        self.ctx.scale(radius_x, radius_y);
        self.arc(0.0, 0.0, 1.0, start_angle, end_angle, ccw)?;
        self.ctx.restore()?;
        Ok(())
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        if !self.drawable() {
            return Ok(());
        }
        self.ctx.rectangle(x, y, w, h);
        Ok(())
    }

    fn round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radii: &[f64]) -> Result<()> {
        if !self.drawable() {
            return Ok(());
        }
        let (x, w) = if w < 0.0 { (x + w, -w) } else { (x, w) };
        let (y, h) = if h < 0.0 { (y + h, -h) } else { (y, h) };
        let [tl, tr, br, bl] = corner_radii(radii).map(f64::abs);
        // Radii that overlap on any side are shrunk together.
        let shrink = [w / (tl + tr), h / (tr + br), w / (br + bl), h / (bl + tl)]
            .into_iter()
            .filter(|f| f.is_finite())
            .fold(1.0_f64, f64::min);
        let [tl, tr, br, bl] = [tl, tr, br, bl].map(|r| r * shrink);

        self.ctx.new_sub_path();
        self.ctx.arc(x + tl, y + tl, tl, PI, PI + FRAC_PI_2);
        self.ctx.arc(x + w - tr, y + tr, tr, PI + FRAC_PI_2, 2.0 * PI);
        self.ctx.arc(x + w - br, y + h - br, br, 0.0, FRAC_PI_2);
        self.ctx.arc(x + bl, y + h - bl, bl, FRAC_PI_2, PI);
        self.ctx.close_path();
        self.ctx.move_to(x, y);
        Ok(())
    }

    fn fill(&mut self, fill_rule: FillRule) -> Result<()> {
        if !self.drawable() {
            return Ok(());
        }
        self.ctx.set_fill_rule(map_fill_rule(&fill_rule));
        self.apply_paint(&self.state.fill_style)?;
        self.ctx.fill_preserve()?;
        Ok(())
    }

    fn stroke(&mut self) -> Result<()> {
        if !self.drawable() {
            return Ok(());
        }
        self.apply_paint(&self.state.stroke_style)?;
        self.ctx.stroke_preserve()?;
        Ok(())
    }

    fn clip(&mut self, fill_rule: FillRule) -> Result<()> {
        self.ctx.set_fill_rule(map_fill_rule(&fill_rule));
        self.ctx.clip_preserve();
        Ok(())
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

    fn is_point_in_path(&self, x: f64, y: f64, opts: HitOptions) -> Result<bool> {
        let Some((ux, uy)) = self.device_to_user(x, y) else {
            return Ok(false);
        };
        self.ctx.set_fill_rule(map_fill_rule(&opts.fill_rule));
        Ok(self.ctx.in_fill(ux, uy)?)
    }

    fn is_point_in_stroke(&self, x: f64, y: f64) -> Result<bool> {
        let Some((ux, uy)) = self.device_to_user(x, y) else {
            return Ok(false);
        };
        Ok(self.ctx.in_stroke(ux, uy)?)
    }
}

impl CanvasText for CairoCanvas {
    fn set_font(&mut self, value: String) -> Result<()> {
        if font::locate_size(&value).is_some() {
            self.state.font = value;
        }
        Ok(())
    }

    fn font(&self) -> Result<String> {
        Ok(self.state.font.clone())
    }

    fn set_text_align(&mut self, value: TextAlign) -> Result<()> {
        self.state.text_align = value;
        Ok(())
    }

    fn text_align(&self) -> Result<TextAlign> {
        Ok(self.state.text_align.clone())
    }

    fn set_text_baseline(&mut self, value: TextBaseline) -> Result<()> {
        self.state.text_baseline = value;
        Ok(())
    }

    fn text_baseline(&self) -> Result<TextBaseline> {
        Ok(self.state.text_baseline.clone())
    }

    fn set_direction(&mut self, value: Direction) -> Result<()> {
        self.state.direction = value;
        Ok(())
    }

    fn direction(&self) -> Result<Direction> {
        Ok(self.state.direction.clone())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>) -> Result<()> {
        self.show_text(text, x, y, max_width, false)
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>) -> Result<()> {
        self.show_text(text, x, y, max_width, true)
    }

    fn measure_text(&self, text: &str) -> Result<TextMetrics> {
        self.apply_font();
        let extents = self.ctx.text_extents(text)?;
        Ok(TextMetrics {
            width: extents.x_advance(),
        })
    }
}

impl CanvasImageData for CairoCanvas {
    fn create_image_data(&mut self, width: u32, height: u32) -> Result<ImageData> {
        Ok(ImageData {
            width,
            height,
            data: vec![0; (width * height * 4) as usize],
        })
    }

    fn get_image_data(&self, sx: u32, sy: u32, sw: u32, sh: u32) -> Result<ImageData> {
        let target = ImageSurface::try_from(self.ctx.target()).map_err(|_| {
            FarCanvasError::Backend(Box::new(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "target is not an image surface",
            )))
        })?;
        let pixels = read_rgba(&target)?;
        let (width, height) = (target.width() as u32, target.height() as u32);
        let mut data = vec![0u8; (sw * sh * 4) as usize];
        for row in 0..sh {
            for col in 0..sw {
                let (x, y) = (sx + col, sy + row);
                if x >= width || y >= height {
                    continue;
                }
                let src = ((y * width + x) * 4) as usize;
                let dst = ((row * sw + col) * 4) as usize;
                data[dst..dst + 4].copy_from_slice(&pixels[src..src + 4]);
            }
        }
        Ok(ImageData {
            width: sw,
            height: sh,
            data,
        })
    }

    fn put_image_data(&mut self, data: &ImageData, dx: f64, dy: f64) -> Result<()> {
        let full = (0.0, 0.0, f64::from(data.width), f64::from(data.height));
        self.put_pixels(data, dx, dy, full)
    }

    fn put_image_data_dirty(
        &mut self,
        data: &ImageData,
        dx: f64,
        dy: f64,
        dirty_x: u32,
        dirty_y: u32,
        dirty_width: u32,
        dirty_height: u32,
    ) -> Result<()> {
        let dirty = (
            f64::from(dirty_x),
            f64::from(dirty_y),
            f64::from(dirty_width),
            f64::from(dirty_height),
        );
        self.put_pixels(data, dx, dy, dirty)
    }
}

impl CanvasDrawImage for CairoCanvas {
    fn draw_image(&mut self, image: &dyn CanvasImageSource, dx: f64, dy: f64) -> Result<()> {
        let (w, h) = (f64::from(image.width()), f64::from(image.height()));
        self.draw_image_subrect(image, 0.0, 0.0, w, h, dx, dy, w, h)
    }

    fn draw_image_scaled(
        &mut self,
        image: &dyn CanvasImageSource,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) -> Result<()> {
        let (w, h) = (f64::from(image.width()), f64::from(image.height()));
        self.draw_image_subrect(image, 0.0, 0.0, w, h, dx, dy, dw, dh)
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
        if sw == 0.0 || sh == 0.0 || dw == 0.0 || dh == 0.0 {
            return Ok(());
        }
        let surface = self.image_surface_from_rgba(image)?;
        let pattern = self.make_image_pattern(&surface);
        let (scale_x, scale_y) = (dw / sw, dh / sh);
        // Source space -> destination rectangle.
        let place = Matrix::translation(dx, dy)
            * Matrix::scaling(scale_x, scale_y)
            * Matrix::translation(-sx, -sy);
        self.paint_image(&pattern, (dx, dy, dw, dh), place)
    }
}

impl CanvasRenderingContext2D for CairoCanvas {}

/// Image surface that hands out [`CairoCanvas`] contexts.
pub struct CairoSurface {
    surface: ImageSurface,
}

impl CairoSurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32)?;
        Ok(Self { surface })
    }

    pub fn image_surface(&self) -> &ImageSurface {
        &self.surface
    }

    /// Straight-alpha RGBA copy of every pixel, row by row.
    pub fn to_rgba(&self) -> Result<Vec<u8>> {
        read_rgba(&self.surface)
    }
}

impl CanvasSurface for CairoSurface {
    type Context = CairoCanvas;

    fn width(&self) -> u32 {
        self.surface.width() as u32
    }

    fn height(&self) -> u32 {
        self.surface.height() as u32
    }

    fn set_dimensions(&mut self, width: u32, height: u32) -> Result<()> {
        self.surface = ImageSurface::create(Format::ARgb32, width as i32, height as i32)?;
        Ok(())
    }

    fn context_2d(&mut self) -> Result<CairoCanvas> {
        Ok(CairoCanvas::new(Context::new(&self.surface)?))
    }
}

fn read_rgba(surface: &ImageSurface) -> Result<Vec<u8>> {
    surface.flush();
    let width = surface.width() as usize;
    let height = surface.height() as usize;
    let stride = surface.stride() as usize;
    let mut out = vec![0u8; width * height * 4];
    surface.with_data(|data| {
        for y in 0..height {
            let row = &data[y * stride..y * stride + width * 4];
            for (x, px) in row.chunks_exact(4).enumerate() {
                let dst = (y * width + x) * 4;
                out[dst..dst + 4].copy_from_slice(&unpremultiply(px));
            }
        }
    })?;
    Ok(out)
}

// Cairo ARgb32 is premultiplied and native-endian: BGRA bytes on little-endian.
fn premultiply(rgba: &[u8]) -> [u8; 4] {
    let a = u16::from(rgba[3]);
    let mul = |c: u8| ((u16::from(c) * a + 127) / 255) as u8;
    [mul(rgba[2]), mul(rgba[1]), mul(rgba[0]), rgba[3]]
}

fn unpremultiply(bgra: &[u8]) -> [u8; 4] {
    let a = u16::from(bgra[3]);
    if a == 0 {
        return [0; 4];
    }
    let div = |c: u8| ((u16::from(c) * 255 + a / 2) / a).min(255) as u8;
    [div(bgra[2]), div(bgra[1]), div(bgra[0]), bgra[3]]
}

fn text_anchor_offset(
    align: &TextAlign,
    baseline: &TextBaseline,
    direction: &Direction,
    width: f64,
    height: f64,
    y_bearing: f64,
) -> (f64, f64) {
    let rtl = *direction == Direction::Rtl;
    let dx = match align {
        TextAlign::Left => 0.0,
        TextAlign::Start if !rtl => 0.0,
        TextAlign::End if rtl => 0.0,
        TextAlign::Center => -width / 2.0,
        TextAlign::Right | TextAlign::Start | TextAlign::End => -width,
    };
    let dy = match baseline {
        TextBaseline::Top => height,
        TextBaseline::Hanging => height * 0.8,
        TextBaseline::Middle => height * 0.5,
        TextBaseline::Alphabetic => 0.0,
        TextBaseline::Ideographic => height * 0.1,
        TextBaseline::Bottom => -y_bearing,
    };
    (dx, dy)
}

fn map_line_cap(cap: LineCap) -> CairoLineCap {
    match cap {
        LineCap::Butt => CairoLineCap::Butt,
        LineCap::Round => CairoLineCap::Round,
        LineCap::Square => CairoLineCap::Square,
    }
}

fn map_line_cap_back(cap: CairoLineCap) -> LineCap {
    match cap {
        CairoLineCap::Round => LineCap::Round,
        CairoLineCap::Square => LineCap::Square,
        _ => LineCap::Butt,
    }
}

fn map_line_join(join: LineJoin) -> CairoLineJoin {
    match join {
        LineJoin::Bevel => CairoLineJoin::Bevel,
        LineJoin::Miter => CairoLineJoin::Miter,
        LineJoin::Round => CairoLineJoin::Round,
    }
}

fn map_line_join_back(join: CairoLineJoin) -> LineJoin {
    match join {
        CairoLineJoin::Bevel => LineJoin::Bevel,
        CairoLineJoin::Round => LineJoin::Round,
        _ => LineJoin::Miter,
    }
}

fn map_fill_rule(rule: &FillRule) -> CairoFillRule {
    match rule {
        FillRule::NonZero => CairoFillRule::Winding,
        FillRule::EvenOdd => CairoFillRule::EvenOdd,
    }
}

fn map_composite(op: &CompositeOperation) -> Operator {
    match op {
        CompositeOperation::SourceOver => Operator::Over,
        CompositeOperation::SourceIn => Operator::In,
        CompositeOperation::SourceOut => Operator::Out,
        CompositeOperation::SourceAtop => Operator::Atop,
        CompositeOperation::DestinationOver => Operator::DestOver,
        CompositeOperation::DestinationIn => Operator::DestIn,
        CompositeOperation::DestinationOut => Operator::DestOut,
        CompositeOperation::DestinationAtop => Operator::DestAtop,
        CompositeOperation::Lighter => Operator::Add,
        CompositeOperation::Copy => Operator::Source,
        CompositeOperation::Xor => Operator::Xor,
        CompositeOperation::Multiply => Operator::Multiply,
        CompositeOperation::Screen => Operator::Screen,
        CompositeOperation::Overlay => Operator::Overlay,
        CompositeOperation::Darken => Operator::Darken,
        CompositeOperation::Lighten => Operator::Lighten,
        CompositeOperation::ColorDodge => Operator::ColorDodge,
        CompositeOperation::ColorBurn => Operator::ColorBurn,
        CompositeOperation::HardLight => Operator::HardLight,
        CompositeOperation::SoftLight => Operator::SoftLight,
        CompositeOperation::Difference => Operator::Difference,
        CompositeOperation::Exclusion => Operator::Exclusion,
        CompositeOperation::Hue => Operator::HslHue,
        CompositeOperation::Saturation => Operator::HslSaturation,
        CompositeOperation::Color => Operator::HslColor,
        CompositeOperation::Luminosity => Operator::HslLuminosity,
    }
}

/// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()` and a
/// handful of named colors. Anything else is opaque black.
fn parse_color(color: &str) -> (f64, f64, f64, f64) {
    let c = color.trim().to_ascii_lowercase();
    if let Some(hex) = c.strip_prefix('#').filter(|h| h.is_ascii()) {
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| f64::from(v) / 255.0);
        let short = |i: usize| channel(&hex[i..i + 1].repeat(2));
        let parsed = match hex.len() {
            3 => short(0).zip(short(1)).zip(short(2)).map(|((r, g), b)| (r, g, b, 1.0)),
            4 => short(0)
                .zip(short(1))
                .zip(short(2))
                .zip(short(3))
                .map(|(((r, g), b), a)| (r, g, b, a)),
            6 => channel(&hex[0..2])
                .zip(channel(&hex[2..4]))
                .zip(channel(&hex[4..6]))
                .map(|((r, g), b)| (r, g, b, 1.0)),
            8 => channel(&hex[0..2])
                .zip(channel(&hex[2..4]))
                .zip(channel(&hex[4..6]))
                .zip(channel(&hex[6..8]))
                .map(|(((r, g), b), a)| (r, g, b, a)),
            _ => None,
        };
        if let Some(rgba) = parsed {
            return rgba;
        }
    }

    if let Some(args) = c
        .strip_prefix("rgba(")
        .or_else(|| c.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<f64> = args
            .split(',')
            .filter_map(|p| p.trim().parse::<f64>().ok())
            .collect();
        match parts[..] {
            [r, g, b] => return (r / 255.0, g / 255.0, b / 255.0, 1.0),
            [r, g, b, a] => return (r / 255.0, g / 255.0, b / 255.0, a.clamp(0.0, 1.0)),
            _ => {}
        }
    }

    match c.as_str() {
        "white" => (1.0, 1.0, 1.0, 1.0),
        "red" => (1.0, 0.0, 0.0, 1.0),
        "green" => (0.0, 128.0 / 255.0, 0.0, 1.0),
        "blue" => (0.0, 0.0, 1.0, 1.0),
        "transparent" => (0.0, 0.0, 0.0, 0.0),
        // Fallback to opaque black if parsing fails.
        _ => (0.0, 0.0, 0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(surface: &CairoSurface, x: usize, y: usize) -> [u8; 4] {
        let width = surface.width() as usize;
        let rgba = surface.to_rgba().unwrap();
        let i = (y * width + x) * 4;
        [rgba[i], rgba[i + 1], rgba[i + 2], rgba[i + 3]]
    }

    #[test]
    fn parses_css_colors() {
        assert_eq!(parse_color("#ff0000"), (1.0, 0.0, 0.0, 1.0));
        assert_eq!(parse_color("#f00"), (1.0, 0.0, 0.0, 1.0));
        assert_eq!(parse_color("rgba(0, 0, 255, 0.5)"), (0.0, 0.0, 1.0, 0.5));
        assert_eq!(parse_color("White"), (1.0, 1.0, 1.0, 1.0));
        assert_eq!(parse_color("nonsense"), (0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn premultiply_round_trips_opaque_pixels() {
        let px = [10, 20, 30, 255];
        assert_eq!(unpremultiply(&premultiply(&px)), px);
        assert_eq!(unpremultiply(&[5, 5, 5, 0]), [0; 4]);
    }

    #[test]
    fn starts_with_canvas_defaults() {
        let mut surface = CairoSurface::new(4, 4).unwrap();
        let ctx = surface.context_2d().unwrap();
        assert_eq!(ctx.line_width().unwrap(), 1.0);
        assert_eq!(ctx.font().unwrap(), DEFAULT_FONT);
        assert_eq!(ctx.get_transform().unwrap(), Matrix::IDENTITY);
    }

    #[test]
    fn fill_rect_keeps_the_current_path() {
        let mut surface = CairoSurface::new(20, 20).unwrap();
        let mut ctx = surface.context_2d().unwrap();
        ctx.begin_path().unwrap();
        ctx.rect(0.0, 0.0, 4.0, 4.0).unwrap();
        ctx.set_fill_style(Paint::Color("#ff0000".into())).unwrap();
        ctx.fill_rect(10.0, 10.0, 4.0, 4.0).unwrap();
        ctx.fill(FillRule::NonZero).unwrap();
        drop(ctx);
        assert_eq!(pixel(&surface, 2, 2), [255, 0, 0, 255]);
        assert_eq!(pixel(&surface, 12, 12), [255, 0, 0, 255]);
        assert_eq!(pixel(&surface, 7, 7), [0, 0, 0, 0]);
    }

    #[test]
    fn save_restore_covers_styles_and_matrix() {
        let mut surface = CairoSurface::new(4, 4).unwrap();
        let mut ctx = surface.context_2d().unwrap();
        ctx.save().unwrap();
        ctx.set_fill_style(Paint::Color("#00ff00".into())).unwrap();
        ctx.translate(1.0, 2.0).unwrap();
        ctx.set_line_width(5.0).unwrap();
        ctx.restore().unwrap();
        assert_eq!(ctx.fill_style().unwrap(), Paint::Color("#000000".into()));
        assert_eq!(ctx.get_transform().unwrap(), Matrix::IDENTITY);
        assert_eq!(ctx.line_width().unwrap(), 1.0);
        // Extra restore is a no-op.
        ctx.restore().unwrap();
    }

    #[test]
    fn singular_matrix_draws_nothing_until_restored() {
        let mut surface = CairoSurface::new(8, 8).unwrap();
        let mut ctx = surface.context_2d().unwrap();
        ctx.save().unwrap();
        ctx.scale(0.0, 0.0).unwrap();
        assert_eq!(ctx.get_transform().unwrap(), Matrix::scaling(0.0, 0.0));
        ctx.fill_rect(0.0, 0.0, 8.0, 8.0).unwrap();
        ctx.translate(1.0, 1.0).unwrap();
        ctx.restore().unwrap();
        assert_eq!(ctx.get_transform().unwrap(), Matrix::IDENTITY);
        ctx.fill_rect(4.0, 4.0, 4.0, 4.0).unwrap();

        ctx.set_transform(0.0, 0.0, 0.0, 0.0, 3.0, 3.0).unwrap();
        ctx.fill_rect(0.0, 0.0, 2.0, 2.0).unwrap();
        ctx.reset_transform().unwrap();
        drop(ctx);
        assert_eq!(pixel(&surface, 1, 1), [0, 0, 0, 0]);
        assert_eq!(pixel(&surface, 3, 3), [0, 0, 0, 0]);
        assert_eq!(pixel(&surface, 5, 5), [0, 0, 0, 255]);
    }

    #[test]
    fn reports_transform_in_canvas_order() {
        let mut surface = CairoSurface::new(4, 4).unwrap();
        let mut ctx = surface.context_2d().unwrap();
        ctx.set_transform(1.0, 2.0, 3.0, 4.0, 5.0, 6.0).unwrap();
        assert_eq!(ctx.get_transform().unwrap(), Matrix::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0));
    }

    #[test]
    fn hit_tests_in_device_space() {
        let mut surface = CairoSurface::new(40, 40).unwrap();
        let mut ctx = surface.context_2d().unwrap();
        ctx.scale(2.0, 2.0).unwrap();
        ctx.begin_path().unwrap();
        ctx.rect(5.0, 5.0, 5.0, 5.0).unwrap();
        assert!(ctx.is_point_in_path(15.0, 15.0, HitOptions::default()).unwrap());
        assert!(!ctx.is_point_in_path(8.0, 8.0, HitOptions::default()).unwrap());
    }

    #[test]
    fn put_and_get_image_data_round_trip() {
        let mut surface = CairoSurface::new(8, 8).unwrap();
        let mut ctx = surface.context_2d().unwrap();
        let mut data = ctx.create_image_data(2, 1).unwrap();
        data.data.copy_from_slice(&[255, 0, 0, 255, 0, 0, 255, 255]);
        ctx.translate(3.0, 3.0).unwrap();
        ctx.put_image_data(&data, 1.0, 2.0).unwrap();
        let back = ctx.get_image_data(1, 2, 2, 1).unwrap();
        assert_eq!(back.data, data.data);
    }

    #[test]
    fn measures_text_with_font_size() {
        let mut surface = CairoSurface::new(4, 4).unwrap();
        let mut ctx = surface.context_2d().unwrap();
        ctx.set_font("10px sans-serif".into()).unwrap();
        let small = ctx.measure_text("hello").unwrap().width;
        ctx.set_font("20px sans-serif".into()).unwrap();
        let large = ctx.measure_text("hello").unwrap().width;
        assert!(small > 0.0);
        assert!(large > small * 1.5, "{large} vs {small}");
    }
}
