//! In-memory context that records every drawing call together with the state
//! it was issued under. It rasterizes nothing; tests use it to see exactly
//! which arguments reached the native side.

use crate::api::*;
use crate::error::{FarCanvasError, Result};
use crate::font;
use crate::matrix::Matrix;

#[derive(Debug, Clone, PartialEq)]
pub struct ClipState {
    pub path: Path2D,
    pub rule: FillRule,
    pub transform: Matrix,
}

/// Complete drawing state; also what `save()` pushes.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub global_alpha: f64,
    pub composite: CompositeOperation,
    pub image_smoothing_enabled: bool,
    pub image_smoothing_quality: ImageSmoothingQuality,
    pub shadow_offset_x: f64,
    pub shadow_offset_y: f64,
    pub shadow_blur: f64,
    pub shadow_color: String,
    pub filter: String,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub line_dash: Vec<f64>,
    pub line_dash_offset: f64,
    pub fill_style: Paint,
    pub stroke_style: Paint,
    pub font: String,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
    pub direction: Direction,
    pub transform: Matrix,
    pub clip: Option<ClipState>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            global_alpha: 1.0,
            composite: CompositeOperation::SourceOver,
            image_smoothing_enabled: true,
            image_smoothing_quality: ImageSmoothingQuality::Low,
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            shadow_blur: 0.0,
            shadow_color: "rgba(0,0,0,0)".to_string(),
            filter: "none".to_string(),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
            fill_style: Paint::Color("#000".to_string()),
            stroke_style: Paint::Color("#000".to_string()),
            font: "10px sans-serif".to_string(),
            text_align: TextAlign::Start,
            text_baseline: TextBaseline::Alphabetic,
            direction: Direction::Inherit,
            transform: Matrix::IDENTITY,
            clip: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Reset,
    SetTransform {
        matrix: Matrix,
    },
    FillPath {
        path: Path2D,
        state: Snapshot,
        rule: FillRule,
    },
    StrokePath {
        path: Path2D,
        state: Snapshot,
    },
    Clip {
        path: Path2D,
        state: Snapshot,
        rule: FillRule,
    },
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        state: Snapshot,
    },
    StrokeRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        state: Snapshot,
    },
    ClearRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        state: Snapshot,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        max_width: Option<f64>,
        state: Snapshot,
    },
    StrokeText {
        text: String,
        x: f64,
        y: f64,
        max_width: Option<f64>,
        state: Snapshot,
    },
    DrawImage {
        source_width: u32,
        source_height: u32,
        dx: f64,
        dy: f64,
        state: Snapshot,
    },
    DrawImageScaled {
        source_width: u32,
        source_height: u32,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
        state: Snapshot,
    },
    DrawImageSubrect {
        source_width: u32,
        source_height: u32,
        sx: f64,
        sy: f64,
        sw: f64,
        sh: f64,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
        state: Snapshot,
    },
    PutImageData {
        data: ImageData,
        dx: f64,
        dy: f64,
    },
}

pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    state: Snapshot,
    stack: Vec<Snapshot>,
    current_path: Vec<PathCommand>,
    current_point: Option<(f64, f64)>,
    subpath_start: Option<(f64, f64)>,
    capability: TransformCapability,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::with_capability(TransformCapability::Settable)
    }

    /// A context that refuses every transform call, like a surface without
    /// matrix support.
    pub fn without_transforms() -> Self {
        Self::with_capability(TransformCapability::Unavailable)
    }

    pub fn with_capability(capability: TransformCapability) -> Self {
        Self {
            ops: Vec::new(),
            state: Snapshot::default(),
            stack: Vec::new(),
            current_path: Vec::new(),
            current_point: None,
            subpath_start: None,
            capability,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    pub fn state(&self) -> &Snapshot {
        &self.state
    }

    /// Number of saved states currently on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Commands of the path under construction.
    pub fn current_path(&self) -> &[PathCommand] {
        &self.current_path
    }

    fn check_transforms(&self, operation: &'static str) -> Result<()> {
        match self.capability {
            TransformCapability::Settable => Ok(()),
            TransformCapability::Unavailable => Err(FarCanvasError::unsupported(operation)),
        }
    }

    fn multiply_transform(&mut self, m: Matrix) {
        self.state.transform = self.state.transform * m;
    }

    fn ensure_subpath(&mut self, x: f64, y: f64) {
        if self.current_point.is_none() {
            self.start_subpath(x, y);
        }
    }

    fn start_subpath(&mut self, x: f64, y: f64) {
        self.current_path.push(PathCommand::MoveTo { x, y });
        self.subpath_start = Some((x, y));
        self.current_point = Some((x, y));
    }

    fn push_path(&mut self, cmd: PathCommand, end: (f64, f64)) {
        self.current_path.push(cmd);
        self.current_point = Some(end);
    }

    fn consume_path(&mut self) -> Option<Path2D> {
        if self.current_path.is_empty() {
            return None;
        }
        let path = Path2D::new(std::mem::take(&mut self.current_path));
        self.current_point = None;
        self.subpath_start = None;
        Some(path)
    }

    fn record_op(&mut self, op: DrawOp) {
        self.ops.push(op);
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasState for RecordingCanvas {
    fn save(&mut self) -> Result<()> {
        self.stack.push(self.state.clone());
        self.record_op(DrawOp::Save);
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        self.record_op(DrawOp::Restore);
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.state = Snapshot::default();
        self.stack.clear();
        self.current_path.clear();
        self.current_point = None;
        self.subpath_start = None;
        self.record_op(DrawOp::Reset);
        Ok(())
    }

    fn set_global_alpha(&mut self, value: f64) -> Result<()> {
        self.state.global_alpha = value;
        Ok(())
    }

    fn global_alpha(&self) -> Result<f64> {
        Ok(self.state.global_alpha)
    }

    fn set_global_composite_operation(&mut self, op: CompositeOperation) -> Result<()> {
        self.state.composite = op;
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

impl CanvasTransforms for RecordingCanvas {
    fn scale(&mut self, x: f64, y: f64) -> Result<()> {
        self.check_transforms("scale")?;
        self.multiply_transform(Matrix::scaling(x, y));
        Ok(())
    }

    fn rotate(&mut self, radians: f64) -> Result<()> {
        self.check_transforms("rotate")?;
        self.multiply_transform(Matrix::rotation(radians));
        Ok(())
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<()> {
        self.check_transforms("translate")?;
        self.multiply_transform(Matrix::translation(x, y));
        Ok(())
    }

    fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<()> {
        self.check_transforms("transform")?;
        self.multiply_transform(Matrix::new(a, b, c, d, e, f));
        Ok(())
    }

    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<()> {
        self.check_transforms("setTransform")?;
        let matrix = Matrix::new(a, b, c, d, e, f);
        self.state.transform = matrix;
        self.record_op(DrawOp::SetTransform { matrix });
        Ok(())
    }

    fn reset_transform(&mut self) -> Result<()> {
        self.check_transforms("resetTransform")?;
        self.state.transform = Matrix::IDENTITY;
        Ok(())
    }

    fn get_transform(&self) -> Result<Matrix> {
        self.check_transforms("getTransform")?;
        Ok(self.state.transform)
    }

    fn transform_capability(&self) -> TransformCapability {
        self.capability
    }
}

impl CanvasFilters for RecordingCanvas {
    fn set_filter(&mut self, value: String) -> Result<()> {
        self.state.filter = value;
        Ok(())
    }

    fn filter(&self) -> Result<String> {
        Ok(self.state.filter.clone())
    }
}

impl CanvasCompositing for RecordingCanvas {
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

impl CanvasLineStyles for RecordingCanvas {
    fn set_line_width(&mut self, value: f64) -> Result<()> {
        self.state.line_width = value;
        Ok(())
    }

    fn line_width(&self) -> Result<f64> {
        Ok(self.state.line_width)
    }

    fn set_line_cap(&mut self, value: LineCap) -> Result<()> {
        self.state.line_cap = value;
        Ok(())
    }

    fn line_cap(&self) -> Result<LineCap> {
        Ok(self.state.line_cap.clone())
    }

    fn set_line_join(&mut self, value: LineJoin) -> Result<()> {
        self.state.line_join = value;
        Ok(())
    }

    fn line_join(&self) -> Result<LineJoin> {
        Ok(self.state.line_join.clone())
    }

    fn set_miter_limit(&mut self, value: f64) -> Result<()> {
        self.state.miter_limit = value;
        Ok(())
    }

    fn miter_limit(&self) -> Result<f64> {
        Ok(self.state.miter_limit)
    }

    fn set_line_dash(&mut self, segments: Vec<f64>) -> Result<()> {
        self.state.line_dash = segments;
        Ok(())
    }

    fn line_dash(&self) -> Result<Vec<f64>> {
        Ok(self.state.line_dash.clone())
    }

    fn set_line_dash_offset(&mut self, value: f64) -> Result<()> {
        self.state.line_dash_offset = value;
        Ok(())
    }

    fn line_dash_offset(&self) -> Result<f64> {
        Ok(self.state.line_dash_offset)
    }
}

impl CanvasFillStrokeStyles for RecordingCanvas {
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

impl CanvasRectangles for RecordingCanvas {
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        let state = self.state.clone();
        self.record_op(DrawOp::ClearRect { x, y, w, h, state });
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        let state = self.state.clone();
        self.record_op(DrawOp::FillRect { x, y, w, h, state });
        Ok(())
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        let state = self.state.clone();
        self.record_op(DrawOp::StrokeRect { x, y, w, h, state });
        Ok(())
    }
}

impl CanvasPaths for RecordingCanvas {
    fn begin_path(&mut self) -> Result<()> {
        self.current_path.clear();
        self.current_point = None;
        self.subpath_start = None;
        Ok(())
    }

    fn close_path(&mut self) -> Result<()> {
        self.current_path.push(PathCommand::ClosePath);
        self.current_point = self.subpath_start;
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.start_subpath(x, y);
        Ok(())
    }

    fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        if self.current_point.is_none() {
            self.start_subpath(x, y);
            return Ok(());
        }
        self.push_path(PathCommand::LineTo { x, y }, (x, y));
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
        self.ensure_subpath(cp1x, cp1y);
        self.push_path(
            PathCommand::BezierCurveTo {
                cp1x,
                cp1y,
                cp2x,
                cp2y,
                x,
                y,
            },
            (x, y),
        );
        Ok(())
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) -> Result<()> {
        self.ensure_subpath(cpx, cpy);
        self.push_path(PathCommand::QuadraticCurveTo { cpx, cpy, x, y }, (x, y));
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
        let end = (x + radius * end_angle.cos(), y + radius * end_angle.sin());
        self.push_path(
            PathCommand::Arc {
                x,
                y,
                radius,
                start_angle,
                end_angle,
                ccw,
            },
            end,
        );
        Ok(())
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<()> {
        self.ensure_subpath(x1, y1);
        self.push_path(
            PathCommand::ArcTo {
                x1,
                y1,
                x2,
                y2,
                radius,
            },
            (x2, y2),
        );
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
        let (sin_r, cos_r) = rotation.sin_cos();
        let ex = radius_x * end_angle.cos();
        let ey = radius_y * end_angle.sin();
        let end = (x + ex * cos_r - ey * sin_r, y + ex * sin_r + ey * cos_r);
        self.push_path(
            PathCommand::Ellipse {
                x,
                y,
                radius_x,
                radius_y,
                rotation,
                start_angle,
                end_angle,
                ccw,
            },
            end,
        );
        Ok(())
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        self.push_path(PathCommand::Rect { x, y, w, h }, (x, y));
        self.subpath_start = Some((x, y));
        Ok(())
    }

    fn round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radii: &[f64]) -> Result<()> {
        let radii = corner_radii(radii);
        self.push_path(PathCommand::RoundRect { x, y, w, h, radii }, (x, y));
        self.subpath_start = Some((x, y));
        Ok(())
    }

    fn fill(&mut self, fill_rule: FillRule) -> Result<()> {
        if let Some(path) = self.consume_path() {
            let state = self.state.clone();
            self.record_op(DrawOp::FillPath {
                path,
                state,
                rule: fill_rule,
            });
        }
        Ok(())
    }

    fn stroke(&mut self) -> Result<()> {
        if let Some(path) = self.consume_path() {
            let state = self.state.clone();
            self.record_op(DrawOp::StrokePath { path, state });
        }
        Ok(())
    }

    fn clip(&mut self, fill_rule: FillRule) -> Result<()> {
        if let Some(path) = self.consume_path() {
            self.clip_path(&path, fill_rule)?;
        }
        Ok(())
    }

    fn fill_path(&mut self, path: &Path2D, fill_rule: FillRule) -> Result<()> {
        let state = self.state.clone();
        self.record_op(DrawOp::FillPath {
            path: path.clone(),
            state,
            rule: fill_rule,
        });
        Ok(())
    }

    fn stroke_path(&mut self, path: &Path2D) -> Result<()> {
        let state = self.state.clone();
        self.record_op(DrawOp::StrokePath {
            path: path.clone(),
            state,
        });
        Ok(())
    }

    fn clip_path(&mut self, path: &Path2D, fill_rule: FillRule) -> Result<()> {
        self.state.clip = Some(ClipState {
            path: path.clone(),
            rule: fill_rule.clone(),
            transform: self.state.transform,
        });
        let state = self.state.clone();
        self.record_op(DrawOp::Clip {
            path: path.clone(),
            state,
            rule: fill_rule,
        });
        Ok(())
    }

    fn is_point_in_path(&self, x: f64, y: f64, _opts: HitOptions) -> Result<bool> {
        // Only axis-aligned rectangles are hit-tested; enough for a recorder.
        Ok(self.current_path.iter().any(|cmd| match *cmd {
            PathCommand::Rect { x: rx, y: ry, w, h } => {
                x >= rx.min(rx + w) && x <= rx.max(rx + w) && y >= ry.min(ry + h) && y <= ry.max(ry + h)
            }
            _ => false,
        }))
    }

    fn is_point_in_stroke(&self, _x: f64, _y: f64) -> Result<bool> {
        Ok(false)
    }
}

impl CanvasText for RecordingCanvas {
    fn set_font(&mut self, value: String) -> Result<()> {
        self.state.font = value;
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
        let state = self.state.clone();
        self.record_op(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
            max_width,
            state,
        });
        Ok(())
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>) -> Result<()> {
        let state = self.state.clone();
        self.record_op(DrawOp::StrokeText {
            text: text.to_string(),
            x,
            y,
            max_width,
            state,
        });
        Ok(())
    }

    /// Pretends every glyph advances by half the font size.
    fn measure_text(&self, text: &str) -> Result<TextMetrics> {
        let (size, _) = font::size_and_family(&self.state.font, 10.0, "sans-serif");
        Ok(TextMetrics {
            width: text.chars().count() as f64 * size * 0.5,
        })
    }
}

impl CanvasImageData for RecordingCanvas {
    fn create_image_data(&mut self, width: u32, height: u32) -> Result<ImageData> {
        Ok(ImageData {
            width,
            height,
            data: vec![0; (width * height * 4) as usize],
        })
    }

    fn get_image_data(&self, _sx: u32, _sy: u32, sw: u32, sh: u32) -> Result<ImageData> {
        Ok(ImageData {
            width: sw,
            height: sh,
            data: vec![0; (sw * sh * 4) as usize],
        })
    }

    fn put_image_data(&mut self, data: &ImageData, dx: f64, dy: f64) -> Result<()> {
        self.record_op(DrawOp::PutImageData {
            data: data.clone(),
            dx,
            dy,
        });
        Ok(())
    }

    fn put_image_data_dirty(
        &mut self,
        data: &ImageData,
        dx: f64,
        dy: f64,
        _dirty_x: u32,
        _dirty_y: u32,
        _dirty_width: u32,
        _dirty_height: u32,
    ) -> Result<()> {
        self.put_image_data(data, dx, dy)
    }
}

impl CanvasDrawImage for RecordingCanvas {
    fn draw_image(&mut self, image: &dyn CanvasImageSource, dx: f64, dy: f64) -> Result<()> {
        let state = self.state.clone();
        self.record_op(DrawOp::DrawImage {
            source_width: image.width(),
            source_height: image.height(),
            dx,
            dy,
            state,
        });
        Ok(())
    }

    fn draw_image_scaled(
        &mut self,
        image: &dyn CanvasImageSource,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) -> Result<()> {
        let state = self.state.clone();
        self.record_op(DrawOp::DrawImageScaled {
            source_width: image.width(),
            source_height: image.height(),
            dx,
            dy,
            dw,
            dh,
            state,
        });
        Ok(())
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
        let state = self.state.clone();
        self.record_op(DrawOp::DrawImageSubrect {
            source_width: image.width(),
            source_height: image.height(),
            sx,
            sy,
            sw,
            sh,
            dx,
            dy,
            dw,
            dh,
            state,
        });
        Ok(())
    }
}

impl CanvasRenderingContext2D for RecordingCanvas {}

/// Surface handing out [`RecordingCanvas`] contexts; counts how often it was asked.
pub struct RecordingSurface {
    width: u32,
    height: u32,
    capability: TransformCapability,
    context_requests: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_capability(width, height, TransformCapability::Settable)
    }

    pub fn with_capability(width: u32, height: u32, capability: TransformCapability) -> Self {
        Self {
            width,
            height,
            capability,
            context_requests: 0,
        }
    }

    pub fn context_requests(&self) -> usize {
        self.context_requests
    }
}

impl CanvasSurface for RecordingSurface {
    type Context = RecordingCanvas;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_dimensions(&mut self, width: u32, height: u32) -> Result<()> {
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn context_2d(&mut self) -> Result<RecordingCanvas> {
        self.context_requests += 1;
        Ok(RecordingCanvas::with_capability(self.capability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_almost_eq(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn records_fill_rect() {
        let mut c = RecordingCanvas::new();
        c.set_fill_style(Paint::Color("#f00".into())).unwrap();
        c.fill_rect(1.0, 2.0, 3.0, 4.0).unwrap();
        let ops = c.ops();
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            DrawOp::FillRect { x, y, w, h, state } => {
                assert_almost_eq(*x, 1.0);
                assert_almost_eq(*y, 2.0);
                assert_almost_eq(*w, 3.0);
                assert_almost_eq(*h, 4.0);
                assert_eq!(state.fill_style, Paint::Color("#f00".into()));
                assert_eq!(state.transform, Matrix::IDENTITY);
            }
            _ => panic!("unexpected op"),
        }
    }

    #[test]
    fn records_clip_and_fill_path() {
        let mut c = RecordingCanvas::new();
        c.begin_path().unwrap();
        c.move_to(0.0, 0.0).unwrap();
        c.line_to(10.0, 0.0).unwrap();
        c.line_to(10.0, 10.0).unwrap();
        c.clip(FillRule::EvenOdd).unwrap();

        c.begin_path().unwrap();
        c.rect(1.0, 1.0, 2.0, 2.0).unwrap();
        c.fill(FillRule::NonZero).unwrap();

        let ops = c.ops();
        assert_eq!(ops.len(), 2);
        match &ops[0] {
            DrawOp::Clip { path, rule, state } => {
                assert_eq!(*rule, FillRule::EvenOdd);
                assert_eq!(path.commands.len(), 3);
                assert_eq!(state.clip.as_ref().unwrap().rule, FillRule::EvenOdd);
            }
            _ => panic!("unexpected op"),
        }
        match &ops[1] {
            DrawOp::FillPath { path, state, rule } => {
                assert_eq!(path.commands.len(), 1);
                assert_eq!(*rule, FillRule::NonZero);
                assert!(state.clip.is_some());
            }
            _ => panic!("unexpected op"),
        }
    }

    #[test]
    fn records_transforms_in_draw_state() {
        let mut c = RecordingCanvas::new();
        c.translate(5.0, 6.0).unwrap();
        c.scale(2.0, 3.0).unwrap();
        c.begin_path().unwrap();
        c.move_to(0.0, 0.0).unwrap();
        c.line_to(1.0, 1.0).unwrap();
        c.stroke().unwrap();

        match &c.ops()[0] {
            DrawOp::StrokePath { state, .. } => {
                assert_eq!(state.transform, Matrix::new(2.0, 0.0, 0.0, 3.0, 5.0, 6.0));
            }
            _ => panic!("unexpected op"),
        }
    }

    #[test]
    fn restore_brings_back_saved_state() {
        let mut c = RecordingCanvas::new();
        c.set_line_width(4.0).unwrap();
        c.save().unwrap();
        c.set_line_width(9.0).unwrap();
        c.set_transform(2.0, 0.0, 0.0, 2.0, 0.0, 0.0).unwrap();
        assert_eq!(c.depth(), 1);
        c.restore().unwrap();
        assert_eq!(c.line_width().unwrap(), 4.0);
        assert_eq!(c.get_transform().unwrap(), Matrix::IDENTITY);
        assert_eq!(c.depth(), 0);
        // Extra restores are ignored.
        c.restore().unwrap();
        assert_eq!(c.depth(), 0);
    }

    #[test]
    fn refuses_transforms_without_capability() {
        let mut c = RecordingCanvas::without_transforms();
        assert_eq!(c.transform_capability(), TransformCapability::Unavailable);
        assert!(c.translate(1.0, 1.0).is_err());
        assert!(c.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).is_err());
        assert!(c.get_transform().is_err());
        assert!(c.ops().is_empty());
    }

    #[test]
    fn measures_half_the_font_size_per_glyph() {
        let mut c = RecordingCanvas::new();
        c.set_font("20px serif".into()).unwrap();
        assert_eq!(c.measure_text("abcd").unwrap().width, 40.0);
    }

    #[test]
    fn surface_counts_context_requests() {
        let mut surface = RecordingSurface::new(10, 20);
        let _ = surface.context_2d().unwrap();
        let _ = surface.context_2d().unwrap();
        assert_eq!(surface.context_requests(), 2);
        assert_eq!((surface.width(), surface.height()), (10, 20));
    }
}
