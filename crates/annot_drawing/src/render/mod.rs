//! Per-kind element renderers.
//!
//! Each element kind has a unit renderer implementing [`Renderable`]; the
//! [`RendererRegistry`] dispatches on [`ElementKind`]. Renderers only submit
//! [`RenderItem`]s, the raster backend executes them later.

mod image;
mod shapes;
mod strokes;
mod text;

use annot_rendering::{
    Color as RenderColor, DrawStyle, Glow, RenderItem, RenderList, TextStyle, z_order,
};

use crate::document::Document;
use crate::element::{Color, Element, ElementId, ElementKind, defaults};

pub use image::ImageRenderer;
pub use shapes::{DiamondRenderer, EllipseRenderer, RectangleRenderer};
pub use strokes::{ArrowRenderer, FreehandRenderer, LineRenderer, arrow_head, smooth_stroke_segments};
pub use text::TextRenderer;

/// Options shared by every renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Stroke color forced onto selected elements.
    pub highlight_color: Color,
    pub highlight_width: f32,
    pub glow_radius: f32,
    pub font_family: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            highlight_color: defaults::HIGHLIGHT_COLOR,
            highlight_width: defaults::HIGHLIGHT_WIDTH,
            glow_radius: defaults::HIGHLIGHT_GLOW,
            font_family: "sans-serif".to_string(),
        }
    }
}

/// Per-element render state.
pub struct RenderContext<'a> {
    pub list: &'a mut RenderList,
    pub z_order: i32,
    pub selected: bool,
    pub options: &'a RenderOptions,
}

impl RenderContext<'_> {
    pub fn submit(&mut self, item: RenderItem) {
        self.list.submit(item);
    }

    /// Stroke/fill style for `element`, with opacity and the selected override applied.
    pub fn draw_style(&self, element: &Element) -> DrawStyle {
        let opacity = element.opacity;
        let fill_color = element
            .fill
            .color()
            .map(|c| RenderColor::from(c).scale_alpha(opacity));

        if self.selected {
            let highlight = RenderColor::from(self.options.highlight_color);
            DrawStyle {
                stroke_color: highlight,
                fill_color,
                stroke_width: self.options.highlight_width,
                glow: Some(Glow {
                    color: highlight,
                    radius: self.options.glow_radius,
                }),
            }
        } else {
            DrawStyle {
                stroke_color: RenderColor::from(element.stroke_color).scale_alpha(opacity),
                fill_color,
                stroke_width: element.stroke_width,
                glow: None,
            }
        }
    }

    /// Style for text labels. Selected labels get an outline plus glow.
    pub fn text_style(&self, element: &Element) -> TextStyle {
        let color = element.fill.color().unwrap_or(element.stroke_color);
        let highlight = RenderColor::from(self.options.highlight_color);
        TextStyle {
            font_size: element.font_size(),
            color: RenderColor::from(color).scale_alpha(element.opacity),
            font_family: self.options.font_family.clone(),
            outline: self.selected.then_some((highlight, self.options.highlight_width)),
            glow: self.selected.then_some(Glow {
                color: highlight,
                radius: self.options.glow_radius,
            }),
        }
    }
}

/// Turns one element into render items.
pub trait Renderable {
    fn render(&self, element: &Element, ctx: &mut RenderContext);
}

/// Dispatches elements to the renderer for their kind.
#[derive(Debug, Default)]
pub struct RendererRegistry {
    pub rectangle: RectangleRenderer,
    pub ellipse: EllipseRenderer,
    pub diamond: DiamondRenderer,
    pub arrow: ArrowRenderer,
    pub line: LineRenderer,
    pub freehand: FreehandRenderer,
    pub text: TextRenderer,
    pub image: ImageRenderer,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_renderer(&self, kind: ElementKind) -> &dyn Renderable {
        match kind {
            ElementKind::Rectangle | ElementKind::Bar => &self.rectangle,
            ElementKind::Ellipse => &self.ellipse,
            ElementKind::Diamond => &self.diamond,
            ElementKind::Arrow => &self.arrow,
            ElementKind::Line => &self.line,
            ElementKind::Freehand => &self.freehand,
            ElementKind::Text => &self.text,
            ElementKind::Image => &self.image,
        }
    }

    pub fn render_element(&self, element: &Element, ctx: &mut RenderContext) {
        self.get_renderer(element.kind()).render(element, ctx);
    }
}

/// Build the render list for one frame.
///
/// Committed elements are emitted in document order; the provisional element
/// goes on top and is always drawn selected.
pub fn build_frame(
    document: &Document,
    provisional: Option<&Element>,
    selected: Option<ElementId>,
    options: &RenderOptions,
) -> RenderList {
    let registry = RendererRegistry::new();
    let mut list = RenderList::with_capacity(document.len() + 1);

    for element in document {
        let mut ctx = RenderContext {
            list: &mut list,
            z_order: z_order::STATIC_ELEMENTS,
            selected: selected == Some(element.id()),
            options,
        };
        registry.render_element(element, &mut ctx);
    }

    if let Some(element) = provisional {
        let mut ctx = RenderContext {
            list: &mut list,
            z_order: z_order::CURRENT_ELEMENT,
            selected: true,
            options,
        };
        registry.render_element(element, &mut ctx);
    }

    list.sort_by_z_order();
    list
}
