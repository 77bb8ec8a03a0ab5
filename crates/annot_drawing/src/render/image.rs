use annot_rendering::{DrawStyle, RenderItem};

use super::{RenderContext, Renderable};
use crate::element::Element;

/// Pasted images, scaled into the normalized bounds.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageRenderer;

impl Renderable for ImageRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext) {
        let Some(source) = element.image.clone() else {
            return;
        };
        let rect = element.bounds();
        let z_order = ctx.z_order;
        ctx.submit(RenderItem::Image {
            rect,
            source,
            opacity: element.opacity,
            z_order,
        });

        if ctx.selected {
            let style = DrawStyle {
                fill_color: None,
                ..ctx.draw_style(element)
            };
            ctx.submit(RenderItem::Rectangle { rect, style, z_order });
        }
    }
}
