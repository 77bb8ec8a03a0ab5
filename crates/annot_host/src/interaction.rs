use annot_drawing::{
    DrawingTool, Element, ElementId, ElementKind, Geometry, InteractionState, Point,
    create_element, defaults,
};

use super::AnnotationCanvas;

/// Where a dragged element started.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DragOrigin {
    pub id: ElementId,
    pub x: f32,
    pub y: f32,
    pub moved: bool,
}

/// Transient pointer session. At most one per canvas.
#[derive(Debug, Default)]
pub(crate) struct Session {
    pub state: InteractionState,
    /// Pointer position at pointer-down.
    pub start: Point,
    pub provisional: Option<Element>,
    pub drag: Option<DragOrigin>,
}

impl Session {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Whether a provisional element is worth keeping when its session is cut short.
fn is_finalizable(element: &Element) -> bool {
    match element.kind() {
        ElementKind::Freehand => element.points().len() >= 2,
        _ => element.width != 0.0 || element.height != 0.0,
    }
}

/// Stretch a freehand element's box over its samples.
fn fit_stroke_bounds(element: &mut Element) {
    let Some(first) = element.points().first().copied() else {
        return;
    };
    let (mut min, mut max) = (first, first);
    for p in element.points() {
        min = Point::new(min.x.min(p.x), min.y.min(p.y));
        max = Point::new(max.x.max(p.x), max.y.max(p.y));
    }
    element.x = min.x;
    element.y = min.y;
    element.width = max.x - min.x;
    element.height = max.y - min.y;
}

/// Estimated box for a text label.
pub fn text_extent(text: &str, font_size: f32) -> (f32, f32) {
    let chars = text.chars().count() as f32;
    (chars * font_size * defaults::TEXT_CHAR_WIDTH_FACTOR, font_size)
}

impl AnnotationCanvas {
    /// Arm a tool.
    ///
    /// An in-progress draw is finalized when it has some extent and dropped
    /// otherwise; an in-progress drag is committed. The selection is cleared.
    pub fn set_tool(&mut self, tool: DrawingTool) {
        match self.session.state {
            InteractionState::Drawing => {
                let provisional = self.session.provisional.take();
                self.session.reset();
                match provisional {
                    Some(element) if is_finalizable(&element) => self.commit_element(element),
                    Some(element) => {
                        tracing::debug!(kind = ?element.kind(), "discarding empty provisional element");
                    }
                    None => {}
                }
                self.needs_redraw = true;
            }
            InteractionState::Dragging => self.finish_drag(),
            InteractionState::Idle => {}
        }
        self.tools.set_current_tool(tool);
        self.set_selection(None);
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if self.session.state.is_active() {
            tracing::debug!("pointer-down during an active session ignored");
            return;
        }
        let point = Point::new(x, y);
        let tool = self.tools.current_tool();

        match tool {
            DrawingTool::Select => match self.document.hit_test(point) {
                Some(id) => {
                    self.set_selection(Some(id));
                    if let Some(element) = self.document.get(id) {
                        self.session = Session {
                            state: InteractionState::Dragging,
                            start: point,
                            provisional: None,
                            drag: Some(DragOrigin {
                                id,
                                x: element.x,
                                y: element.y,
                                moved: false,
                            }),
                        };
                    }
                }
                None => self.set_selection(None),
            },
            DrawingTool::Text => {
                let Some(text) = self.text_prompt.prompt(x, y) else {
                    tracing::debug!("text prompt cancelled");
                    return;
                };
                self.commit_text(x, y, &text);
            }
            _ => {
                let Some(kind) = tool.element_kind() else {
                    return;
                };
                let mut geometry = Geometry::at(x, y);
                if kind == ElementKind::Freehand {
                    geometry.points.push(point);
                }
                let element = create_element(kind, geometry, self.tools.style_for(tool));
                self.session = Session {
                    state: InteractionState::Drawing,
                    start: point,
                    provisional: Some(element),
                    drag: None,
                };
                self.needs_redraw = true;
            }
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        match self.session.state {
            InteractionState::Drawing => {
                self.update_provisional(x, y);
                self.needs_redraw = true;
            }
            InteractionState::Dragging => {
                self.update_drag(x, y);
                self.needs_redraw = true;
            }
            InteractionState::Idle => {}
        }
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        match self.session.state {
            InteractionState::Drawing => {
                // Freehand samples come from move events only.
                if self
                    .session
                    .provisional
                    .as_ref()
                    .is_some_and(|e| e.kind() != ElementKind::Freehand)
                {
                    self.update_provisional(x, y);
                }
                let provisional = self.session.provisional.take();
                self.session.reset();
                if let Some(element) = provisional {
                    self.commit_element(element);
                }
            }
            InteractionState::Dragging => {
                self.update_drag(x, y);
                self.finish_drag();
            }
            InteractionState::Idle => {}
        }
    }

    /// Create and commit a text label at `(x, y)`. Blank text is a no-op.
    pub fn commit_text(&mut self, x: f32, y: f32, text: &str) -> Option<ElementId> {
        if text.trim().is_empty() {
            tracing::debug!("blank text ignored");
            return None;
        }
        let (width, height) = text_extent(text, self.tools.font_size());
        let element = create_element(
            ElementKind::Text,
            Geometry::rect(x, y, width, height),
            self.tools.style_for(DrawingTool::Text),
        )
        .with_text(text);
        let id = element.id();
        self.commit_element(element);
        Some(id)
    }

    /// Append to the document and record.
    pub(crate) fn commit_element(&mut self, element: Element) {
        let kind = element.kind();
        if self.document.push(element) {
            self.commit(match kind {
                ElementKind::Text => "text",
                ElementKind::Image => "paste",
                ElementKind::Freehand => "stroke",
                _ => "shape",
            });
        }
    }

    /// Drop any in-progress session without recording. A dragged element
    /// returns to where it started.
    pub(crate) fn abandon_session(&mut self) {
        if !self.session.state.is_active() {
            return;
        }
        if let Some(drag) = self.session.drag {
            self.document.set_position(drag.id, drag.x, drag.y);
        }
        tracing::debug!(state = ?self.session.state, "session abandoned");
        self.session.reset();
        self.needs_redraw = true;
    }

    fn update_provisional(&mut self, x: f32, y: f32) {
        let start = self.session.start;
        let Some(element) = self.session.provisional.as_mut() else {
            return;
        };
        if element.kind() == ElementKind::Freehand {
            element.push_point(Point::new(x, y));
            fit_stroke_bounds(element);
        } else {
            element.width = x - start.x;
            element.height = y - start.y;
        }
    }

    /// Position from drag-start plus the total pointer delta.
    fn update_drag(&mut self, x: f32, y: f32) {
        let Some(drag) = self.session.drag.as_mut() else {
            return;
        };
        let (dx, dy) = (x - self.session.start.x, y - self.session.start.y);
        if dx != 0.0 || dy != 0.0 {
            drag.moved = true;
        }
        self.document.set_position(drag.id, drag.x + dx, drag.y + dy);
    }

    fn finish_drag(&mut self) {
        let drag = self.session.drag.take();
        self.session.reset();
        match drag {
            Some(drag) if drag.moved => self.commit("drag"),
            _ => tracing::debug!("click without movement"),
        }
        self.needs_redraw = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawingConfig, QueuedTextPrompt};

    fn canvas() -> AnnotationCanvas {
        AnnotationCanvas::new(DrawingConfig::default())
    }

    #[test]
    fn test_shape_draw_commits_on_release() {
        let mut canvas = canvas();
        canvas.set_tool(DrawingTool::Rectangle);
        canvas.pointer_down(10.0, 10.0);
        assert_eq!(canvas.state(), InteractionState::Drawing);
        canvas.pointer_move(110.0, 60.0);
        assert!(canvas.document().is_empty());
        assert_eq!(canvas.provisional().map(|e| (e.width, e.height)), Some((100.0, 50.0)));

        canvas.pointer_up(110.0, 60.0);
        assert_eq!(canvas.state(), InteractionState::Idle);
        assert!(canvas.provisional().is_none());
        assert_eq!(canvas.document().len(), 1);
        assert_eq!(canvas.history().len(), 1);
    }

    #[test]
    fn test_zero_length_draw_is_kept() {
        let mut canvas = canvas();
        canvas.set_tool(DrawingTool::Ellipse);
        canvas.pointer_down(30.0, 30.0);
        canvas.pointer_up(30.0, 30.0);
        let el = canvas.document().iter().next().expect("committed");
        assert_eq!((el.width, el.height), (0.0, 0.0));
    }

    #[test]
    fn test_freehand_records_every_move() {
        let mut canvas = canvas();
        canvas.set_tool(DrawingTool::Freehand);
        canvas.pointer_down(0.0, 0.0);
        for i in 1..=5 {
            canvas.pointer_move(i as f32, (i * 2) as f32);
        }
        canvas.pointer_move(5.0, 10.0);
        canvas.pointer_up(5.0, 10.0);

        let stroke = canvas.document().iter().next().expect("committed");
        assert_eq!(stroke.points().len(), 7);
        assert_eq!((stroke.width, stroke.height), (5.0, 10.0));
    }

    #[test]
    fn test_drag_uses_total_delta() {
        let mut canvas = canvas();
        canvas.set_tool(DrawingTool::Rectangle);
        canvas.pointer_down(10.0, 10.0);
        canvas.pointer_up(60.0, 60.0);
        let id = canvas.document().iter().next().map(Element::id).expect("committed");

        canvas.set_tool(DrawingTool::Select);
        canvas.pointer_down(20.0, 20.0);
        assert_eq!(canvas.state(), InteractionState::Dragging);
        canvas.pointer_move(25.0, 30.0);
        canvas.pointer_move(30.0, 40.0);
        assert_eq!(canvas.document().get(id).map(|e| (e.x, e.y)), Some((20.0, 30.0)));
        assert_eq!(canvas.history().len(), 1);

        canvas.pointer_up(30.0, 40.0);
        assert_eq!(canvas.history().len(), 2);
        assert_eq!(canvas.selected(), Some(id));
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let mut canvas = canvas();
        canvas.set_tool(DrawingTool::Rectangle);
        canvas.pointer_down(0.0, 0.0);
        canvas.pointer_up(40.0, 40.0);

        canvas.set_tool(DrawingTool::Select);
        canvas.pointer_down(20.0, 20.0);
        canvas.pointer_up(20.0, 20.0);
        assert_eq!(canvas.history().len(), 1);
        assert!(canvas.selected().is_some());
    }

    #[test]
    fn test_tool_switch_finalizes_or_discards() {
        let mut canvas = canvas();
        canvas.set_tool(DrawingTool::Arrow);
        canvas.pointer_down(0.0, 0.0);
        canvas.set_tool(DrawingTool::Line);
        assert!(canvas.document().is_empty());
        assert_eq!(canvas.state(), InteractionState::Idle);

        canvas.pointer_down(0.0, 0.0);
        canvas.pointer_move(10.0, 0.0);
        canvas.set_tool(DrawingTool::Select);
        assert_eq!(canvas.document().len(), 1);
        assert_eq!(canvas.history().len(), 1);
    }

    #[test]
    fn test_tool_switch_commits_drag() {
        let mut canvas = canvas();
        canvas.set_tool(DrawingTool::Rectangle);
        canvas.pointer_down(0.0, 0.0);
        canvas.pointer_up(40.0, 40.0);
        canvas.set_tool(DrawingTool::Select);
        canvas.pointer_down(10.0, 10.0);
        canvas.pointer_move(20.0, 10.0);
        canvas.set_tool(DrawingTool::Bar);
        assert_eq!(canvas.history().len(), 2);
        assert_eq!(canvas.selected(), None);
        assert_eq!(canvas.document().iter().next().map(|e| e.x), Some(10.0));
    }

    #[test]
    fn test_text_tool_uses_prompt() {
        let mut canvas = canvas();
        canvas.set_text_prompt(Box::new(QueuedTextPrompt::new(["hello", "   "])));
        canvas.set_tool(DrawingTool::Text);

        canvas.pointer_down(5.0, 5.0);
        assert_eq!(canvas.state(), InteractionState::Idle);
        let label = canvas.document().iter().next().expect("committed");
        assert_eq!(label.text.as_deref(), Some("hello"));
        assert_eq!(label.width, 5.0 * 20.0 * 0.6);
        assert_eq!(label.height, 20.0);

        canvas.pointer_down(50.0, 50.0);
        canvas.pointer_down(60.0, 60.0);
        assert_eq!(canvas.document().len(), 1);
        assert_eq!(canvas.history().len(), 1);
    }

    #[test]
    fn test_undo_mid_drag_restores_position() {
        let mut canvas = canvas();
        canvas.set_tool(DrawingTool::Rectangle);
        canvas.pointer_down(0.0, 0.0);
        canvas.pointer_up(40.0, 40.0);
        canvas.set_tool(DrawingTool::Select);
        canvas.pointer_down(10.0, 10.0);
        canvas.pointer_move(100.0, 100.0);

        canvas.redo();
        assert_eq!(canvas.state(), InteractionState::Idle);
        assert_eq!(canvas.document().iter().next().map(|e| (e.x, e.y)), Some((0.0, 0.0)));
    }
}
