use annot_rendering::{Point, RenderItem};

use super::{RenderContext, Renderable};
use crate::element::Element;

/// Rectangles and bars.
#[derive(Debug, Default, Clone, Copy)]
pub struct RectangleRenderer;

impl Renderable for RectangleRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext) {
        let rect = element.bounds();
        let style = ctx.draw_style(element);
        let z_order = ctx.z_order;
        let item = if element.corner_radius > 0.0 {
            RenderItem::RoundedRectangle {
                rect,
                radius: element.corner_radius,
                style,
                z_order,
            }
        } else {
            RenderItem::Rectangle {
                rect,
                style,
                z_order,
            }
        };
        ctx.submit(item);
    }
}

/// Ellipse inscribed in the normalized bounds.
#[derive(Debug, Default, Clone, Copy)]
pub struct EllipseRenderer;

impl Renderable for EllipseRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext) {
        let item = RenderItem::Ellipse {
            rect: element.bounds(),
            style: ctx.draw_style(element),
            z_order: ctx.z_order,
        };
        ctx.submit(item);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DiamondRenderer;

impl DiamondRenderer {
    /// Midpoints of the four bounding-box edges: top, right, bottom, left.
    pub fn vertices(element: &Element) -> [Point; 4] {
        let b = element.bounds();
        let c = b.center();
        [
            Point::new(c.x, b.y),
            Point::new(b.right(), c.y),
            Point::new(c.x, b.bottom()),
            Point::new(b.x, c.y),
        ]
    }
}

impl Renderable for DiamondRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext) {
        let item = RenderItem::Polygon {
            points: Self::vertices(element).to_vec(),
            style: ctx.draw_style(element),
            z_order: ctx.z_order,
        };
        ctx.submit(item);
    }
}
