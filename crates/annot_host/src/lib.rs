pub mod interaction;
pub mod paste;
pub mod prompt;
pub mod rendering;
pub mod tools;

use annot_rendering::{RenderError, SkiaSurface};

use annot_protocol::{CanvasMessage, Command};

// Re-export core types for convenience.
pub use annot_drawing::{
    Color, Document, DrawingTool, Element, ElementId, ElementKind, ElementPatch, Fill, History,
    InteractionState, RenderOptions, defaults,
};
pub use prompt::{NoTextPrompt, QueuedTextPrompt, TextPrompt};

use interaction::Session;
use tools::ToolManager;

/// Selection-change callback.
pub type SelectCallback = Box<dyn FnMut(Option<&Element>)>;

/// Host-provided drawing configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingConfig {
    /// Logical canvas size; also the capture size.
    pub width: u32,
    pub height: u32,

    pub stroke_color: Color,
    pub stroke_width: f32,
    pub freehand_width: f32,
    pub bar_corner_radius: f32,

    // Text config
    pub font_size: f32,
    pub font_family: String,

    // Selected-state treatment
    pub highlight_color: Color,
    pub highlight_width: f32,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,

            stroke_color: Color::default(),
            stroke_width: defaults::STROKE_WIDTH,
            freehand_width: defaults::FREEHAND_WIDTH,
            bar_corner_radius: defaults::BAR_CORNER_RADIUS,

            font_size: defaults::FONT_SIZE,
            font_family: "sans-serif".to_string(),

            highlight_color: defaults::HIGHLIGHT_COLOR,
            highlight_width: defaults::HIGHLIGHT_WIDTH,
        }
    }
}

impl DrawingConfig {
    pub(crate) fn render_options(&self) -> RenderOptions {
        RenderOptions {
            highlight_color: self.highlight_color,
            highlight_width: self.highlight_width,
            font_family: self.font_family.clone(),
            ..RenderOptions::default()
        }
    }
}

/// One annotation canvas: document, history, selection, the pointer session
/// and the raster surface it renders into.
pub struct AnnotationCanvas {
    config: DrawingConfig,
    tools: ToolManager,
    document: Document,
    history: History,
    selected: Option<ElementId>,
    session: Session,
    /// `None` until mounted.
    surface: Option<SkiaSurface>,
    render_options: RenderOptions,
    text_prompt: Box<dyn TextPrompt>,
    on_select: Option<SelectCallback>,
    /// Set whenever the visible frame changed; consumed by `handle_message`.
    needs_redraw: bool,
}

impl AnnotationCanvas {
    /// Create an unmounted canvas.
    pub fn new(config: DrawingConfig) -> Self {
        Self {
            tools: ToolManager::new(&config),
            render_options: config.render_options(),
            config,
            document: Document::new(),
            history: History::new(),
            selected: None,
            session: Session::default(),
            surface: None,
            text_prompt: Box::new(NoTextPrompt),
            on_select: None,
            needs_redraw: true,
        }
    }

    pub fn config(&self) -> &DrawingConfig {
        &self.config
    }

    /// Apply a new configuration. Remounts the surface if the size changed.
    pub fn update_config(&mut self, config: DrawingConfig) -> Result<(), DrawingError> {
        let resized = (config.width, config.height) != (self.config.width, self.config.height);
        self.tools.update_config(&config);
        self.render_options = config.render_options();
        self.config = config;
        if resized && self.is_mounted() {
            self.mount()?;
        }
        Ok(())
    }

    pub fn set_text_prompt(&mut self, prompt: Box<dyn TextPrompt>) {
        self.text_prompt = prompt;
    }

    pub fn set_on_select(&mut self, callback: impl FnMut(Option<&Element>) + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    /// Active stroke color for new elements.
    pub fn set_color(&mut self, color: Color) {
        self.tools.set_color(color);
    }

    pub fn color(&self) -> Color {
        self.tools.color()
    }

    pub fn tool(&self) -> DrawingTool {
        self.tools.current_tool()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.document.get(id))
    }

    pub fn state(&self) -> InteractionState {
        self.session.state
    }

    /// Element currently being drawn.
    pub fn provisional(&self) -> Option<&Element> {
        self.session.provisional.as_ref()
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Step back one committed action. No-op at the bottom of the history.
    pub fn undo(&mut self) {
        self.abandon_session();
        match self.history.undo() {
            Some(document) => {
                tracing::debug!(step = self.history.step(), "undo");
                self.replace_document(document);
            }
            None => tracing::debug!("nothing to undo"),
        }
    }

    /// Re-apply one undone action. No-op at the top of the history.
    pub fn redo(&mut self) {
        self.abandon_session();
        match self.history.redo() {
            Some(document) => {
                tracing::debug!(step = self.history.step(), "redo");
                self.replace_document(document);
            }
            None => tracing::debug!("nothing to redo"),
        }
    }

    /// Empty the document. Recorded, so one undo restores it.
    pub fn clear(&mut self) {
        self.abandon_session();
        self.document.clear();
        self.commit("clear");
        self.set_selection(None);
    }

    /// Patch an element by id and record the change.
    ///
    /// Any in-progress session is abandoned first, so a dragged element is
    /// back at its origin before the patch applies.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if !self.document.contains(id) {
            tracing::warn!(%id, "update for unknown element ignored");
            return false;
        }
        self.abandon_session();
        self.document.apply_patch(id, patch);
        self.commit("update element");
        if self.selected == Some(id) {
            self.notify_selection();
        }
        true
    }

    /// Remove the selected element. Returns `false` when nothing is selected.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        self.abandon_session();
        if self.document.remove(id).is_none() {
            self.set_selection(None);
            return false;
        }
        self.commit("delete element");
        self.set_selection(None);
        true
    }

    /// Dispatch a host message and report what changed.
    pub fn handle_message(&mut self, message: CanvasMessage) -> Vec<Command> {
        let selected_before = self.selected;
        let history_before = (self.history.len(), self.history.step());
        let mut commands = Vec::new();
        self.needs_redraw = false;

        match message {
            CanvasMessage::SelectTool { tool } => self.set_tool(tool),
            CanvasMessage::SetColor { color } => self.set_color(color),
            CanvasMessage::PointerDown { x, y } => self.pointer_down(x, y),
            CanvasMessage::PointerMove { x, y } => self.pointer_move(x, y),
            CanvasMessage::PointerUp { x, y } => self.pointer_up(x, y),
            CanvasMessage::CommitText { x, y, text } => {
                self.commit_text(x, y, &text);
            }
            CanvasMessage::Undo => self.undo(),
            CanvasMessage::Redo => self.redo(),
            CanvasMessage::Clear => self.clear(),
            CanvasMessage::DeleteSelected => {
                self.delete_selected();
            }
            CanvasMessage::PasteImage { source, x, y } => {
                self.paste_image(&source, x, y);
            }
            CanvasMessage::UpdateElement { id, patch } => {
                self.update_element(id, &patch);
            }
            CanvasMessage::Capture => commands.push(Command::Captured(self.capture())),
            CanvasMessage::RenderFrame => {
                if let Err(e) = self.render_frame() {
                    tracing::debug!("frame skipped: {e}");
                }
            }
        }

        if self.selected != selected_before {
            commands.push(Command::SelectionChanged(self.selected));
        }
        let history_after = (self.history.len(), self.history.step());
        if history_after != history_before {
            commands.push(Command::HistoryChanged {
                len: history_after.0,
                step: history_after.1,
            });
        }
        if self.needs_redraw {
            commands.push(Command::RequestRedraw);
        }
        if commands.is_empty() {
            commands.push(Command::None);
        }
        commands
    }

    /// Record the document as a new history entry.
    pub(crate) fn commit(&mut self, reason: &str) {
        self.history.record(&self.document);
        self.needs_redraw = true;
        tracing::debug!(
            reason,
            elements = self.document.len(),
            len = self.history.len(),
            step = self.history.step(),
            "history recorded"
        );
    }

    /// Swap in a history snapshot. Always drops the selection.
    fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.needs_redraw = true;
        self.set_selection(None);
    }

    /// Change the selection, notifying `on_select` when it differs.
    pub(crate) fn set_selection(&mut self, id: Option<ElementId>) {
        if self.selected == id {
            return;
        }
        self.selected = id;
        self.needs_redraw = true;
        self.notify_selection();
    }

    fn notify_selection(&mut self) {
        if let Some(callback) = self.on_select.as_mut() {
            callback(self.selected.and_then(|id| self.document.get(id)));
        }
    }
}

/// Drawing errors.
#[derive(Debug, thiserror::Error)]
pub enum DrawingError {
    #[error("canvas is not mounted")]
    NotMounted,
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("unsupported paste source: {0}")]
    UnsupportedSource(String),
    #[error("failed to read paste source: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch paste source: {0}")]
    Fetch(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn draw_rect(canvas: &mut AnnotationCanvas, from: (f32, f32), to: (f32, f32)) -> ElementId {
        canvas.set_tool(DrawingTool::Rectangle);
        canvas.pointer_down(from.0, from.1);
        canvas.pointer_move(to.0, to.1);
        canvas.pointer_up(to.0, to.1);
        canvas.document().iter().last().map(Element::id).expect("committed")
    }

    #[test]
    fn test_update_element_records_once() {
        let mut canvas = AnnotationCanvas::new(DrawingConfig::default());
        let id = draw_rect(&mut canvas, (10.0, 10.0), (110.0, 60.0));
        let len = canvas.history().len();

        let patch = ElementPatch {
            fill: Some(Fill::Solid(Color::rgb(255, 0, 0))),
            ..ElementPatch::default()
        };
        assert!(canvas.update_element(id, &patch));
        assert_eq!(canvas.history().len(), len + 1);
        assert_eq!(canvas.document().get(id).map(|e| e.fill.to_string()).as_deref(), Some("#ff0000"));

        assert!(!canvas.update_element(ElementId(u64::MAX), &patch));
        assert_eq!(canvas.history().len(), len + 1);
    }

    #[test]
    fn test_on_select_fires_on_change_and_update() {
        let mut canvas = AnnotationCanvas::new(DrawingConfig::default());
        let id = draw_rect(&mut canvas, (0.0, 0.0), (50.0, 50.0));

        let seen: Rc<RefCell<Vec<Option<ElementId>>>> = Rc::default();
        let sink = seen.clone();
        canvas.set_on_select(move |el| sink.borrow_mut().push(el.map(Element::id)));

        canvas.set_tool(DrawingTool::Select);
        canvas.pointer_down(25.0, 25.0);
        canvas.pointer_up(25.0, 25.0);
        canvas.update_element(
            id,
            &ElementPatch {
                opacity: Some(0.5),
                ..ElementPatch::default()
            },
        );
        canvas.pointer_down(400.0, 400.0);

        assert_eq!(*seen.borrow(), vec![Some(id), Some(id), None]);
    }

    #[test]
    fn test_undo_and_redo_clear_selection() {
        let mut canvas = AnnotationCanvas::new(DrawingConfig::default());
        let first = draw_rect(&mut canvas, (0.0, 0.0), (50.0, 50.0));
        let second = draw_rect(&mut canvas, (100.0, 100.0), (150.0, 150.0));

        canvas.set_tool(DrawingTool::Select);
        canvas.pointer_down(10.0, 10.0);
        canvas.pointer_up(10.0, 10.0);
        assert_eq!(canvas.selected(), Some(first));

        canvas.undo();
        assert!(!canvas.document().contains(second));
        assert!(canvas.document().contains(first));
        assert_eq!(canvas.selected(), None);

        canvas.pointer_down(10.0, 10.0);
        canvas.pointer_up(10.0, 10.0);
        assert_eq!(canvas.selected(), Some(first));
        canvas.redo();
        assert_eq!(canvas.selected(), None);

        // Out-of-range moves leave the selection alone.
        canvas.pointer_down(10.0, 10.0);
        canvas.pointer_up(10.0, 10.0);
        canvas.redo();
        assert_eq!(canvas.selected(), Some(first));
    }

    #[test]
    fn test_update_element_mid_drag_records_once() {
        let mut canvas = AnnotationCanvas::new(DrawingConfig::default());
        let id = draw_rect(&mut canvas, (0.0, 0.0), (40.0, 40.0));

        canvas.set_tool(DrawingTool::Select);
        canvas.pointer_down(10.0, 10.0);
        canvas.pointer_move(30.0, 30.0);
        let patch = ElementPatch {
            x: Some(100.0),
            ..ElementPatch::default()
        };
        assert!(canvas.update_element(id, &patch));
        assert_eq!(canvas.state(), InteractionState::Idle);
        assert_eq!(canvas.history().len(), 2);

        canvas.pointer_move(60.0, 60.0);
        canvas.pointer_up(60.0, 60.0);
        assert_eq!(canvas.document().get(id).map(|e| (e.x, e.y)), Some((100.0, 0.0)));
        assert_eq!(canvas.history().len(), 2);
    }

    #[test]
    fn test_handle_message_reports_changes() {
        let mut canvas = AnnotationCanvas::new(DrawingConfig::default());
        canvas.handle_message(CanvasMessage::SelectTool {
            tool: DrawingTool::Ellipse,
        });
        canvas.handle_message(CanvasMessage::PointerDown { x: 0.0, y: 0.0 });
        let commands = canvas.handle_message(CanvasMessage::PointerUp { x: 20.0, y: 20.0 });
        assert!(commands.contains(&Command::HistoryChanged { len: 1, step: 0 }));
        assert!(commands.contains(&Command::RequestRedraw));

        let commands = canvas.handle_message(CanvasMessage::Redo);
        assert_eq!(commands, vec![Command::None]);

        let commands = canvas.handle_message(CanvasMessage::Capture);
        assert_eq!(commands, vec![Command::Captured(None)]);
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut canvas = AnnotationCanvas::new(DrawingConfig::default());
        draw_rect(&mut canvas, (0.0, 0.0), (10.0, 10.0));
        assert!(!canvas.delete_selected());
        assert_eq!(canvas.history().len(), 1);
    }
}
