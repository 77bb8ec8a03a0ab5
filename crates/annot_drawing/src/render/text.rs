use annot_rendering::{Point, RenderItem};

use super::{RenderContext, Renderable};
use crate::element::Element;

/// Text labels, baseline at the bottom-left of the box.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl Renderable for TextRenderer {
    fn render(&self, element: &Element, ctx: &mut RenderContext) {
        let Some(text) = element.text.as_deref().filter(|t| !t.is_empty()) else {
            return;
        };
        let item = RenderItem::Text {
            text: text.to_string(),
            position: Point::new(element.x, element.y + element.height),
            style: ctx.text_style(element),
            z_order: ctx.z_order,
        };
        ctx.submit(item);
    }
}

#[cfg(test)]
mod tests {
    use annot_rendering::{Point, RenderItem, RenderList};

    use super::{Renderable, TextRenderer};
    use crate::element::{ElementKind, ElementStyle, Geometry, create_element};
    use crate::render::{RenderContext, RenderOptions};

    #[test]
    fn test_baseline_and_min_font_size() {
        let el = create_element(ElementKind::Text, Geometry::rect(5.0, 5.0, 60.0, 8.0), ElementStyle::default())
            .with_text("note");
        let options = RenderOptions::default();
        let mut list = RenderList::new();
        let mut ctx = RenderContext {
            list: &mut list,
            z_order: 0,
            selected: true,
            options: &options,
        };
        TextRenderer.render(&el, &mut ctx);

        let Some(RenderItem::Text { text, position, style, .. }) = list.iter().next() else {
            panic!("expected text item");
        };
        assert_eq!(text, "note");
        assert_eq!(*position, Point::new(5.0, 13.0));
        assert_eq!(style.font_size, 12.0);
        assert!(style.outline.is_some());
        assert!(style.glow.is_some());
    }

    #[test]
    fn test_empty_label_draws_nothing() {
        let el = create_element(ElementKind::Text, Geometry::rect(0.0, 0.0, 0.0, 20.0), ElementStyle::default());
        let options = RenderOptions::default();
        let mut list = RenderList::new();
        let mut ctx = RenderContext {
            list: &mut list,
            z_order: 0,
            selected: false,
            options: &options,
        };
        TextRenderer.render(&el, &mut ctx);
        assert!(list.is_empty());
    }
}
