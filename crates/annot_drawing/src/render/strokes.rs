use annot_rendering::{PathSegment, Point, RenderItem};

use super::{RenderContext, Renderable};
use crate::element::{Element, defaults};

fn endpoints(element: &Element) -> (Point, Point) {
    (
        Point::new(element.x, element.y),
        Point::new(element.x + element.width, element.y + element.height),
    )
}

/// Wing tips of an arrow head at `end`, for a shaft pointing along `angle`.
pub fn arrow_head(end: Point, angle: f32) -> [Point; 2] {
    let wing = |a: f32| {
        Point::new(
            end.x - defaults::ARROW_HEAD_LENGTH * a.cos(),
            end.y - defaults::ARROW_HEAD_LENGTH * a.sin(),
        )
    };
    [
        wing(angle + defaults::ARROW_HEAD_ANGLE),
        wing(angle - defaults::ARROW_HEAD_ANGLE),
    ]
}

/// Shaft from start to `start + size` plus a two-wing head at the end.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArrowRenderer;

impl Renderable for ArrowRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext) {
        let (start, end) = endpoints(element);
        let angle = element.height.atan2(element.width);
        let [left, right] = arrow_head(end, angle);

        let item = RenderItem::Path {
            segments: vec![
                PathSegment::MoveTo(start),
                PathSegment::LineTo(end),
                PathSegment::MoveTo(left),
                PathSegment::LineTo(end),
                PathSegment::LineTo(right),
            ],
            style: ctx.draw_style(element),
            z_order: ctx.z_order,
        };
        ctx.submit(item);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LineRenderer;

impl Renderable for LineRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext) {
        let (start, end) = endpoints(element);
        let item = RenderItem::Line {
            start,
            end,
            style: ctx.draw_style(element),
            z_order: ctx.z_order,
        };
        ctx.submit(item);
    }
}

/// Path segments for a sampled stroke.
///
/// Up to two samples are joined with straight segments. Longer strokes are
/// smoothed with quadratic curves through each sample towards the midpoint of
/// the next pair, then finish with a straight segment to the last sample.
pub fn smooth_stroke_segments(points: &[Point]) -> Vec<PathSegment> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };

    let mut segments = Vec::with_capacity(points.len() + 1);
    segments.push(PathSegment::MoveTo(first));

    match rest {
        [] => segments.push(PathSegment::LineTo(first)),
        [second] => segments.push(PathSegment::LineTo(*second)),
        _ => {
            for pair in points[1..].windows(2) {
                segments.push(PathSegment::QuadTo {
                    control: pair[0],
                    to: pair[0].midpoint(&pair[1]),
                });
            }
            if let Some(&last) = points.last() {
                segments.push(PathSegment::LineTo(last));
            }
        }
    }
    segments
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FreehandRenderer;

impl Renderable for FreehandRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext) {
        let points: Vec<Point> = element.points().iter().map(|&p| p.into()).collect();
        let segments = smooth_stroke_segments(&points);
        if segments.is_empty() {
            return;
        }
        let mut style = ctx.draw_style(element);
        style.fill_color = None;
        let item = RenderItem::Path {
            segments,
            style,
            z_order: ctx.z_order,
        };
        ctx.submit(item);
    }
}
