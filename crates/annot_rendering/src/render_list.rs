use std::fmt;
use std::sync::Arc;

use crate::types::{Color, DrawStyle, PathSegment, Point, Rectangle, TextStyle};

/// Backend that executes render items against a concrete surface.
pub trait RenderBackend {
    type Error;

    fn clear(&mut self, color: Color) -> Result<(), Self::Error>;
    fn draw_rectangle(&mut self, rect: Rectangle, style: &DrawStyle) -> Result<(), Self::Error>;
    fn draw_rounded_rectangle(
        &mut self,
        rect: Rectangle,
        radius: f32,
        style: &DrawStyle,
    ) -> Result<(), Self::Error>;
    /// Ellipse inscribed in `rect`.
    fn draw_ellipse(&mut self, rect: Rectangle, style: &DrawStyle) -> Result<(), Self::Error>;
    /// Closed polygon.
    fn draw_polygon(&mut self, points: &[Point], style: &DrawStyle) -> Result<(), Self::Error>;
    /// Open path, stroked only.
    fn draw_path(&mut self, segments: &[PathSegment], style: &DrawStyle)
    -> Result<(), Self::Error>;
    fn draw_line(&mut self, start: Point, end: Point, style: &DrawStyle)
    -> Result<(), Self::Error>;
    /// Draw `text` with its baseline starting at `position`.
    fn draw_text(
        &mut self,
        text: &str,
        position: Point,
        style: &TextStyle,
    ) -> Result<(), Self::Error>;
    /// Draw an image payload scaled into `rect`.
    fn draw_image(
        &mut self,
        rect: Rectangle,
        source: &str,
        opacity: f32,
    ) -> Result<(), Self::Error>;
}

/// Render primitive.
#[derive(Debug, Clone)]
pub enum RenderItem {
    Rectangle {
        rect: Rectangle,
        style: DrawStyle,
        z_order: i32,
    },

    RoundedRectangle {
        rect: Rectangle,
        radius: f32,
        style: DrawStyle,
        z_order: i32,
    },

    Ellipse {
        rect: Rectangle,
        style: DrawStyle,
        z_order: i32,
    },

    Polygon {
        points: Vec<Point>,
        style: DrawStyle,
        z_order: i32,
    },

    Path {
        segments: Vec<PathSegment>,
        style: DrawStyle,
        z_order: i32,
    },

    Line {
        start: Point,
        end: Point,
        style: DrawStyle,
        z_order: i32,
    },

    Text {
        text: String,
        position: Point,
        style: TextStyle,
        z_order: i32,
    },

    Image {
        rect: Rectangle,
        source: Arc<str>,
        opacity: f32,
        z_order: i32,
    },
}

impl RenderItem {
    /// Get z-order for sorting.
    pub fn z_order(&self) -> i32 {
        match self {
            RenderItem::Rectangle { z_order, .. } => *z_order,
            RenderItem::RoundedRectangle { z_order, .. } => *z_order,
            RenderItem::Ellipse { z_order, .. } => *z_order,
            RenderItem::Polygon { z_order, .. } => *z_order,
            RenderItem::Path { z_order, .. } => *z_order,
            RenderItem::Line { z_order, .. } => *z_order,
            RenderItem::Text { z_order, .. } => *z_order,
            RenderItem::Image { z_order, .. } => *z_order,
        }
    }
}

/// Z-order layer constants.
pub mod z_order {
    /// Committed document elements.
    pub const STATIC_ELEMENTS: i32 = 200;
    /// Element being drawn.
    pub const CURRENT_ELEMENT: i32 = 400;
}

/// Render list.
#[derive(Debug, Default)]
pub struct RenderList {
    items: Vec<RenderItem>,
}

impl RenderList {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn submit(&mut self, item: RenderItem) {
        self.items.push(item);
    }

    /// Stable sort: items sharing a layer keep submission order.
    pub fn sort_by_z_order(&mut self) {
        self.items.sort_by_key(|item| item.z_order());
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderItem> {
        self.items.iter()
    }

    /// Execute all items against a backend.
    ///
    /// An item the backend rejects is logged and skipped so the rest of the
    /// frame still lands. Returns the number of skipped items.
    pub fn execute<B>(&mut self, backend: &mut B) -> usize
    where
        B: RenderBackend,
        B::Error: fmt::Display,
    {
        self.sort_by_z_order();

        let mut skipped = 0;
        for item in &self.items {
            if let Err(e) = Self::render_item(backend, item) {
                tracing::warn!(z_order = item.z_order(), "render item skipped: {e}");
                skipped += 1;
            }
        }
        skipped
    }

    fn render_item<B: RenderBackend>(backend: &mut B, item: &RenderItem) -> Result<(), B::Error> {
        match item {
            RenderItem::Rectangle { rect, style, .. } => backend.draw_rectangle(*rect, style)?,
            RenderItem::RoundedRectangle {
                rect,
                radius,
                style,
                ..
            } => backend.draw_rounded_rectangle(*rect, *radius, style)?,
            RenderItem::Ellipse { rect, style, .. } => backend.draw_ellipse(*rect, style)?,
            RenderItem::Polygon { points, style, .. } => backend.draw_polygon(points, style)?,
            RenderItem::Path {
                segments, style, ..
            } => backend.draw_path(segments, style)?,
            RenderItem::Line {
                start, end, style, ..
            } => backend.draw_line(*start, *end, style)?,
            RenderItem::Text {
                text,
                position,
                style,
                ..
            } => backend.draw_text(text, *position, style)?,
            RenderItem::Image {
                rect,
                source,
                opacity,
                ..
            } => backend.draw_image(*rect, source, *opacity)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the order in which primitives reach the backend.
    /// Text starting with `!` is rejected.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    type Res = Result<(), String>;

    impl RenderBackend for Recorder {
        type Error = String;

        fn clear(&mut self, _color: Color) -> Res {
            self.calls.push("clear".into());
            Ok(())
        }
        fn draw_rectangle(&mut self, rect: Rectangle, _style: &DrawStyle) -> Res {
            self.calls.push(format!("rect {}", rect.x));
            Ok(())
        }
        fn draw_rounded_rectangle(&mut self, _rect: Rectangle, _radius: f32, _style: &DrawStyle) -> Res {
            self.calls.push("rounded".into());
            Ok(())
        }
        fn draw_ellipse(&mut self, _rect: Rectangle, _style: &DrawStyle) -> Res {
            self.calls.push("ellipse".into());
            Ok(())
        }
        fn draw_polygon(&mut self, _points: &[Point], _style: &DrawStyle) -> Res {
            self.calls.push("polygon".into());
            Ok(())
        }
        fn draw_path(&mut self, _segments: &[PathSegment], _style: &DrawStyle) -> Res {
            self.calls.push("path".into());
            Ok(())
        }
        fn draw_line(&mut self, _start: Point, _end: Point, _style: &DrawStyle) -> Res {
            self.calls.push("line".into());
            Ok(())
        }
        fn draw_text(&mut self, text: &str, _position: Point, _style: &TextStyle) -> Res {
            if text.starts_with('!') {
                return Err(format!("bad text {text}"));
            }
            self.calls.push(format!("text {text}"));
            Ok(())
        }
        fn draw_image(&mut self, _rect: Rectangle, _source: &str, _opacity: f32) -> Res {
            self.calls.push("image".into());
            Ok(())
        }
    }

    fn rect_at(x: f32) -> RenderItem {
        RenderItem::Rectangle {
            rect: Rectangle::new(x, 0.0, 1.0, 1.0),
            style: DrawStyle::default(),
            z_order: z_order::STATIC_ELEMENTS,
        }
    }

    fn text(text: &str, z_order: i32) -> RenderItem {
        RenderItem::Text {
            text: text.to_string(),
            position: Point::ZERO,
            style: TextStyle::default(),
            z_order,
        }
    }

    #[test]
    fn test_execute_sorts_by_layer_and_keeps_submission_order() {
        let mut list = RenderList::new();
        list.submit(text("draft", z_order::CURRENT_ELEMENT));
        list.submit(rect_at(1.0));
        list.submit(rect_at(2.0));

        let mut recorder = Recorder::default();
        assert_eq!(list.execute(&mut recorder), 0);

        assert_eq!(recorder.calls, vec!["rect 1", "rect 2", "text draft"]);
    }

    #[test]
    fn test_failed_item_is_skipped() {
        let mut list = RenderList::new();
        list.submit(rect_at(1.0));
        list.submit(text("!broken", z_order::STATIC_ELEMENTS));
        list.submit(rect_at(2.0));

        let mut recorder = Recorder::default();
        assert_eq!(list.execute(&mut recorder), 1);
        assert_eq!(recorder.calls, vec!["rect 1", "rect 2"]);
    }

    #[test]
    fn test_clear_empties_list() {
        let mut list = RenderList::with_capacity(1);
        list.submit(RenderItem::Line {
            start: Point::ZERO,
            end: Point::new(1.0, 1.0),
            style: DrawStyle::default(),
            z_order: z_order::STATIC_ELEMENTS,
        });
        assert_eq!(list.len(), 1);
        list.clear();
        assert!(list.is_empty());
    }
}
