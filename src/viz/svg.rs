//! Scene output through plotters' drawing areas.

use super::scene::{Anchor, Scene, Shape, Stroke, dash_segments};
use crate::style::Rgba;
use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;
use std::path::Path;

fn color(c: Rgba, opacity: f32) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, c.alpha_with(opacity) as f64)
}

fn px(p: (f32, f32)) -> (i32, i32) {
    (p.0.round() as i32, p.1.round() as i32)
}

fn stroke_style(stroke: &Stroke, opacity: f32) -> ShapeStyle {
    color(stroke.color, opacity).stroke_width(stroke.width.round().max(1.0) as u32)
}

fn draw_path<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &[(f32, f32)],
    stroke: &Stroke,
    opacity: f32,
) -> Result<()> {
    let style = stroke_style(stroke, opacity);
    match stroke.dash {
        Some((on, off)) => {
            for (a, b) in dash_segments(points, on, off) {
                root.draw(&PathElement::new(vec![px(a), px(b)], style))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            }
        }
        None => {
            let pts: Vec<(i32, i32)> = points.iter().copied().map(px).collect();
            root.draw(&PathElement::new(pts, style))
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
    }
    Ok(())
}

/// Draw every shape of `scene` onto `root`, in order.
pub fn draw_scene<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &Scene) -> Result<()> {
    root.fill(&color(scene.background, 1.0))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    for shape in &scene.shapes {
        match shape {
            Shape::Line {
                from,
                to,
                stroke,
                opacity,
            } => draw_path(root, &[*from, *to], stroke, *opacity)?,
            Shape::Polyline {
                points,
                stroke,
                opacity,
            } => {
                if points.len() >= 2 {
                    draw_path(root, points, stroke, *opacity)?;
                }
            }
            Shape::Area {
                upper,
                lower,
                fill,
                opacity,
            } => {
                if upper.len() < 2 || *opacity <= 0.0 {
                    continue;
                }
                let outline: Vec<(i32, i32)> = upper
                    .iter()
                    .chain(lower.iter().rev())
                    .copied()
                    .map(px)
                    .collect();
                root.draw(&Polygon::new(outline, color(*fill, *opacity).filled()))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            }
            Shape::Rect {
                min,
                max,
                fill,
                opacity,
                stroke,
            } => {
                root.draw(&Rectangle::new([px(*min), px(*max)], color(*fill, *opacity).filled()))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                if let Some(s) = stroke {
                    root.draw(&Rectangle::new([px(*min), px(*max)], stroke_style(s, 1.0)))
                        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                }
            }
            Shape::Circle {
                center,
                radius,
                fill,
                opacity,
                stroke,
            } => {
                let r = radius.round().max(1.0) as i32;
                root.draw(&Circle::new(px(*center), r, color(*fill, *opacity).filled()))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                if let Some(s) = stroke {
                    root.draw(&Circle::new(px(*center), r, stroke_style(s, 1.0)))
                        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
                }
            }
            Shape::Text {
                pos,
                text,
                size,
                color: c,
                anchor,
                bold,
            } => {
                let h = match anchor {
                    Anchor::Start => HPos::Left,
                    Anchor::Middle => HPos::Center,
                    Anchor::End => HPos::Right,
                };
                let font = if *bold {
                    FontDesc::new(FontFamily::SansSerif, *size as f64, FontStyle::Bold)
                } else {
                    FontDesc::new(FontFamily::SansSerif, *size as f64, FontStyle::Normal)
                };
                let text_color = color(*c, 1.0);
                let style = TextStyle::from(font)
                    .color(&text_color)
                    .pos(Pos::new(h, VPos::Center));
                root.draw(&Text::new(text.as_str(), px(*pos), style))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            }
        }
    }
    Ok(())
}

/// Render `scene` to an SVG document in memory.
pub fn render_svg_string(scene: &Scene) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (scene.width, scene.height)).into_drawing_area();
        draw_scene(&root, scene)?;
        root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(buf)
}

/// Render `scene` to an SVG file.
pub fn write_svg<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<()> {
    let path = path.as_ref();
    let svg = render_svg_string(scene)?;
    std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style;

    #[test]
    fn svg_contains_text_and_shapes() {
        let mut scene = Scene::new(120, 80, style::BACKGROUND);
        scene.push(Shape::rect((10.0, 10.0), (30.0, 30.0), style::RWA_TVL, 0.5));
        scene.push(Shape::Line {
            from: (0.0, 40.0),
            to: (120.0, 40.0),
            stroke: Stroke::dashed(style::CROSSHAIR, 1.0, 3.0, 3.0),
            opacity: 1.0,
        });
        scene.push(Shape::text((60.0, 60.0), "hello", 12.0, style::TEXT, Anchor::Middle));
        let svg = render_svg_string(&scene).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("hello"));
        assert!(svg.contains("<rect"));
    }
}
