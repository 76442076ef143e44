#![cfg(feature = "cairo")]

use std::f64::consts::PI;

use far_canvas::api::*;
use far_canvas::backends::cairo::CairoSurface;
use far_canvas::{FarCanvas, FocusConfig, Result};

const SIZE: u32 = 96;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Everything is placed relative to `base`; offsets are dyadic so that
/// `base + offset - base` is exact for `base` up to ~1e9.
fn scene(ctx: &mut impl CanvasRenderingContext2D, base: f64) -> Result<()> {
    ctx.set_fill_style(Paint::Color("#336699".into()))?;
    ctx.fill_rect(base + 4.0, base + 4.0, 30.0, 20.5)?;

    ctx.set_stroke_style(Paint::Color("#ff0000".into()))?;
    ctx.set_line_width(2.5)?;
    ctx.begin_path()?;
    ctx.move_to(base + 2.0, base + 60.0)?;
    ctx.line_to(base + 90.0, base + 70.5)?;
    ctx.quadratic_curve_to(base + 50.0, base + 94.0, base + 8.0, base + 80.0)?;
    ctx.stroke()?;

    ctx.set_fill_style(Paint::Color("rgba(0, 160, 0, 0.75)".into()))?;
    ctx.begin_path()?;
    ctx.arc(base + 60.5, base + 30.25, 12.0, 0.0, 2.0 * PI, false)?;
    ctx.fill(FillRule::NonZero)?;

    ctx.save()?;
    ctx.translate(base + 70.0, base + 60.0)?;
    ctx.rotate(0.375)?;
    ctx.set_fill_style(Paint::Color("#000000".into()))?;
    ctx.fill_rect(-10.0, -5.0, 20.0, 10.0)?;
    ctx.set_line_dash(vec![3.0, 1.5])?;
    ctx.stroke_rect(-14.0, -9.0, 28.0, 18.0)?;
    ctx.restore()?;

    ctx.begin_path()?;
    ctx.round_rect(base + 40.0, base + 4.0, 16.0, 12.0, &[3.0])?;
    ctx.ellipse(base + 20.0, base + 40.0, 10.0, 4.5, 0.5, 0.0, PI, false)?;
    ctx.stroke()?;
    Ok(())
}

fn render_scene(base: f64, scale: f64) -> Vec<u8> {
    init_logging();
    let config = FocusConfig {
        x: base,
        y: base,
        scale,
    };
    let mut canvas = FarCanvas::new(CairoSurface::new(SIZE, SIZE).unwrap(), config).unwrap();
    scene(canvas.get_context("2d", None).unwrap(), base).unwrap();
    canvas.surface().to_rgba().unwrap()
}

#[test]
fn scene_renders_identically_near_zero_and_near_a_billion() {
    for scale in [1.0, 1.5, 0.5] {
        let near = render_scene(0.0, scale);
        let far = render_scene(1.0e9, scale);
        assert!(near.iter().any(|b| *b != 0), "scene drew nothing at scale {scale}");
        assert!(near == far, "pixels differ at scale {scale}");
    }
}

#[test]
fn negative_far_focus_matches_too() {
    assert!(render_scene(0.0, 1.0) == render_scene(-1.0e9, 1.0));
}

#[test]
fn unit_focus_matches_the_plain_context() {
    init_logging();
    let mut plain = CairoSurface::new(SIZE, SIZE).unwrap();
    {
        let mut ctx = plain.context_2d().unwrap();
        ctx.fill_rect(8.0, 8.0, 40.0, 24.0).unwrap();
        ctx.begin_path().unwrap();
        ctx.move_to(50.0, 50.0).unwrap();
        ctx.line_to(90.0, 56.0).unwrap();
        ctx.line_to(64.0, 90.0).unwrap();
        ctx.close_path().unwrap();
        ctx.fill(FillRule::NonZero).unwrap();
    }

    // Same picture at scale 2, drawn in half-size world units.
    let mut canvas = FarCanvas::new(
        CairoSurface::new(SIZE, SIZE).unwrap(),
        FocusConfig {
            x: 0.0,
            y: 0.0,
            scale: 2.0,
        },
    )
    .unwrap();
    {
        let ctx = canvas.get_context("2d", None).unwrap();
        ctx.fill_rect(4.0, 4.0, 20.0, 12.0).unwrap();
        ctx.begin_path().unwrap();
        ctx.move_to(25.0, 25.0).unwrap();
        ctx.line_to(45.0, 28.0).unwrap();
        ctx.line_to(32.0, 45.0).unwrap();
        ctx.close_path().unwrap();
        ctx.fill(FillRule::NonZero).unwrap();
    }

    assert!(plain.to_rgba().unwrap() == canvas.surface().to_rgba().unwrap());
}

#[test]
fn images_land_at_world_size() {
    init_logging();
    let mut canvas = FarCanvas::new(
        CairoSurface::new(32, 32).unwrap(),
        FocusConfig {
            x: 1.0e9,
            y: 1.0e9,
            scale: 2.0,
        },
    )
    .unwrap();
    let red = ImageData {
        width: 4,
        height: 4,
        data: [255, 0, 0, 255].repeat(16),
    };
    let ctx = canvas.get_context("2d", None).unwrap();
    ctx.set_image_smoothing_enabled(false).unwrap();
    ctx.draw_image(&red, 1.0e9 + 2.0, 1.0e9 + 2.0).unwrap();

    let pixels = canvas.surface().to_rgba().unwrap();
    let at = |x: usize, y: usize| &pixels[(y * 32 + x) * 4..(y * 32 + x) * 4 + 4];
    assert_eq!(at(4, 4), &[255, 0, 0, 255]);
    assert_eq!(at(11, 11), &[255, 0, 0, 255]);
    assert_eq!(at(12, 12), &[0, 0, 0, 0]);
    assert_eq!(at(3, 3), &[0, 0, 0, 0]);
}

#[test]
fn singular_user_transform_keeps_the_stacks_in_step() {
    init_logging();
    let mut canvas = FarCanvas::new(
        CairoSurface::new(16, 16).unwrap(),
        FocusConfig {
            x: 1.0e9,
            y: 1.0e9,
            scale: 2.0,
        },
    )
    .unwrap();
    let ctx = canvas.get_context("2d", None).unwrap();
    ctx.save().unwrap();
    ctx.scale(0.0, 0.0).unwrap();
    ctx.fill_rect(1.0e9, 1.0e9, 2.0, 2.0).unwrap();
    ctx.restore().unwrap();
    assert_eq!(ctx.depth(), 0);
    ctx.fill_rect(1.0e9 + 4.0, 1.0e9 + 4.0, 2.0, 2.0).unwrap();

    let pixels = canvas.surface().to_rgba().unwrap();
    let at = |x: usize, y: usize| &pixels[(y * 16 + x) * 4..(y * 16 + x) * 4 + 4];
    assert_eq!(at(1, 1), &[0, 0, 0, 0]);
    assert_eq!(at(9, 9), &[0, 0, 0, 255]);
}
