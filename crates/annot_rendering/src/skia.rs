//! tiny-skia raster backend.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

use crate::error::RenderError;
use crate::image::{decode_payload, svg_options};
use crate::render_list::RenderBackend;
use crate::types::{Color, DrawStyle, Glow, PathSegment, Point, Rectangle, TextStyle};

/// Number of translucent passes painted under a glowing stroke.
const GLOW_PASSES: u32 = 3;
/// Alpha of each glow pass.
const GLOW_PASS_ALPHA: f32 = 0.18;
/// Cubic control-point factor approximating a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// Raster surface the canvas paints every frame.
pub struct SkiaSurface {
    pixmap: Pixmap,
    /// Decoded image payloads keyed by payload hash.
    images: HashMap<u64, Pixmap>,
}

impl SkiaSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::SurfaceAllocation(width, height))?;
        Ok(Self {
            pixmap,
            images: HashMap::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Drop decoded images no longer referenced by any payload in `live`.
    pub fn retain_images<'a>(&mut self, live: impl IntoIterator<Item = &'a str>) {
        let keep: Vec<u64> = live.into_iter().map(payload_key).collect();
        self.images.retain(|key, _| keep.contains(key));
    }

    pub fn cached_image_count(&self) -> usize {
        self.images.len()
    }

    fn fill(&mut self, path: &Path, color: Color) {
        let paint = solid_paint(color);
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn stroke(&mut self, path: &Path, style: &DrawStyle) {
        if !style.has_stroke() {
            return;
        }
        if let Some(glow) = style.glow {
            self.stroke_glow(path, style.stroke_width, glow);
        }
        let paint = solid_paint(style.stroke_color);
        self.pixmap
            .stroke_path(path, &paint, &round_stroke(style.stroke_width), Transform::identity(), None);
    }

    fn stroke_glow(&mut self, path: &Path, base_width: f32, glow: Glow) {
        let paint = solid_paint(glow.color.scale_alpha(GLOW_PASS_ALPHA));
        for pass in (1..=GLOW_PASSES).rev() {
            let extra = glow.radius * pass as f32 / GLOW_PASSES as f32;
            let stroke = round_stroke(base_width + extra * 2.0);
            self.pixmap
                .stroke_path(path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn fill_and_stroke(&mut self, path: &Path, style: &DrawStyle) {
        if let Some(fill) = style.fill_color {
            self.fill(path, fill);
        }
        self.stroke(path, style);
    }

    fn render_svg_text(&mut self, text: &str, position: Point, style: &TextStyle) -> Result<(), RenderError> {
        let mut attrs = format!(
            r#"x="{}" y="{}" font-size="{}" font-family="{}" fill="{}" fill-opacity="{}""#,
            position.x,
            position.y,
            style.font_size,
            escape_xml(&style.font_family),
            style.color.to_css_hex(),
            style.color.a
        );
        if let Some((color, width)) = style.outline {
            attrs.push_str(&format!(
                r#" stroke="{}" stroke-opacity="{}" stroke-width="{}""#,
                color.to_css_hex(),
                color.a,
                width
            ));
        }
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}"><text {attrs} xml:space="preserve">{}</text></svg>"#,
            self.width(),
            self.height(),
            escape_xml(text)
        );
        let tree = usvg::Tree::from_str(&svg, &svg_options())?;
        resvg::render(&tree, Transform::identity(), &mut self.pixmap.as_mut());
        Ok(())
    }
}

impl RenderBackend for SkiaSurface {
    type Error = RenderError;

    fn clear(&mut self, color: Color) -> Result<(), RenderError> {
        self.pixmap.fill(to_skia_color(color));
        Ok(())
    }

    fn draw_rectangle(&mut self, rect: Rectangle, style: &DrawStyle) -> Result<(), RenderError> {
        if let Some(path) = rect_path(rect.normalized()) {
            self.fill_and_stroke(&path, style);
        }
        Ok(())
    }

    fn draw_rounded_rectangle(
        &mut self,
        rect: Rectangle,
        radius: f32,
        style: &DrawStyle,
    ) -> Result<(), RenderError> {
        if let Some(path) = rounded_rect_path(rect.normalized(), radius) {
            self.fill_and_stroke(&path, style);
        }
        Ok(())
    }

    fn draw_ellipse(&mut self, rect: Rectangle, style: &DrawStyle) -> Result<(), RenderError> {
        let rect = rect.normalized();
        if rect.is_empty() {
            return Ok(());
        }
        let oval = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height);
        if let Some(path) = oval.and_then(PathBuilder::from_oval) {
            self.fill_and_stroke(&path, style);
        }
        Ok(())
    }

    fn draw_polygon(&mut self, points: &[Point], style: &DrawStyle) -> Result<(), RenderError> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        pb.close();
        if let Some(path) = pb.finish() {
            self.fill_and_stroke(&path, style);
        }
        Ok(())
    }

    fn draw_path(&mut self, segments: &[PathSegment], style: &DrawStyle) -> Result<(), RenderError> {
        let mut pb = PathBuilder::new();
        for segment in segments {
            match *segment {
                PathSegment::MoveTo(p) => pb.move_to(p.x, p.y),
                PathSegment::LineTo(p) => pb.line_to(p.x, p.y),
                PathSegment::QuadTo { control, to } => pb.quad_to(control.x, control.y, to.x, to.y),
            }
        }
        if let Some(path) = pb.finish() {
            self.stroke(&path, style);
        }
        Ok(())
    }

    fn draw_line(&mut self, start: Point, end: Point, style: &DrawStyle) -> Result<(), RenderError> {
        let mut pb = PathBuilder::new();
        pb.move_to(start.x, start.y);
        pb.line_to(end.x, end.y);
        if let Some(path) = pb.finish() {
            self.stroke(&path, style);
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) -> Result<(), RenderError> {
        if text.is_empty() {
            return Ok(());
        }
        if let Some(glow) = style.glow {
            let halo = TextStyle {
                color: glow.color.scale_alpha(GLOW_PASS_ALPHA),
                outline: Some((glow.color.scale_alpha(GLOW_PASS_ALPHA), glow.radius * 2.0)),
                glow: None,
                ..style.clone()
            };
            self.render_svg_text(text, position, &halo)?;
        }
        self.render_svg_text(text, position, style)
    }

    fn draw_image(&mut self, rect: Rectangle, source: &str, opacity: f32) -> Result<(), RenderError> {
        let rect = rect.normalized();
        if rect.is_empty() {
            return Ok(());
        }

        let key = payload_key(source);
        if !self.images.contains_key(&key) {
            let decoded = decode_payload(source)?;
            self.images.insert(key, decoded);
        }
        let Some(image) = self.images.get(&key) else {
            return Ok(());
        };

        let sx = rect.width / image.width() as f32;
        let sy = rect.height / image.height() as f32;
        let paint = PixmapPaint {
            opacity: opacity.clamp(0.0, 1.0),
            quality: tiny_skia::FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            image.as_ref(),
            &paint,
            Transform::from_row(sx, 0.0, 0.0, sy, rect.x, rect.y),
            None,
        );
        Ok(())
    }
}

fn payload_key(source: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    hasher.finish()
}

pub(crate) fn to_skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(
        color.r.clamp(0.0, 1.0),
        color.g.clamp(0.0, 1.0),
        color.b.clamp(0.0, 1.0),
        color.a.clamp(0.0, 1.0),
    )
    .unwrap_or(tiny_skia::Color::TRANSPARENT)
}

fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color));
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    }
}

fn rect_path(rect: Rectangle) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(rect.x, rect.y);
    pb.line_to(rect.right(), rect.y);
    pb.line_to(rect.right(), rect.bottom());
    pb.line_to(rect.x, rect.bottom());
    pb.close();
    pb.finish()
}

fn rounded_rect_path(rect: Rectangle, radius: f32) -> Option<Path> {
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    if r == 0.0 {
        return rect_path(rect);
    }
    let (l, t, rt, b) = (rect.x, rect.y, rect.right(), rect.bottom());
    let k = r * KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(l + r, t);
    pb.line_to(rt - r, t);
    pb.cubic_to(rt - r + k, t, rt, t + r - k, rt, t + r);
    pb.line_to(rt, b - r);
    pb.cubic_to(rt, b - r + k, rt - r + k, b, rt - r, b);
    pb.line_to(l + r, b);
    pb.cubic_to(l + r - k, b, l, b - r + k, l, b - r);
    pb.line_to(l, t + r);
    pb.cubic_to(l, t + r - k, l + r - k, t, l + r, t);
    pb.close();
    pb.finish()
}

/// Whether `ch` may appear in an XML 1.0 document.
fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | '\u{20}'..='\u{d7ff}' | '\u{e000}'..='\u{fffd}' | '\u{10000}'..)
}

/// Escape markup characters and drop characters XML cannot carry.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars().filter(|&c| is_xml_char(c)) {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
