use annot_drawing::{Color, DrawingTool, ElementId, ElementPatch};
use serde::{Deserialize, Serialize};

/// Messages a host sends to the annotation canvas.
///
/// Internally tagged by `type`, so recorded sessions read as
/// `{"type": "pointerDown", "x": 10, "y": 10}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CanvasMessage {
    /// Arm a tool.
    SelectTool { tool: DrawingTool },
    /// Set the active stroke color.
    SetColor { color: Color },
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    /// Commit a text label without going through the prompt.
    CommitText { x: f32, y: f32, text: String },
    Undo,
    Redo,
    Clear,
    DeleteSelected,
    /// Paste an image centered at `(x, y)`.
    PasteImage { source: String, x: f32, y: f32 },
    UpdateElement { id: ElementId, patch: ElementPatch },
    /// Export the current frame.
    Capture,
    /// Render one frame.
    RenderFrame,
}

/// Commands the canvas hands back to its host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Command {
    /// Request redraw.
    RequestRedraw,
    /// Selection changed.
    SelectionChanged(Option<ElementId>),
    /// A history entry was recorded or the cursor moved.
    HistoryChanged { len: usize, step: isize },
    /// Capture result; `None` when there is nothing to export.
    Captured(Option<String>),
    /// No-op.
    None,
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_message_json_shape() {
        let msg: super::CanvasMessage =
            serde_json::from_str(r#"{"type":"pointerDown","x":10,"y":12.5}"#).unwrap();
        assert_eq!(msg, super::CanvasMessage::PointerDown { x: 10.0, y: 12.5 });

        let msg: super::CanvasMessage =
            serde_json::from_str(r#"{"type":"selectTool","tool":"rectangle"}"#).unwrap();
        assert_eq!(
            msg,
            super::CanvasMessage::SelectTool {
                tool: super::DrawingTool::Rectangle
            }
        );

        let msg: super::CanvasMessage = serde_json::from_str(r#"{"type":"undo"}"#).unwrap();
        assert_eq!(msg, super::CanvasMessage::Undo);
    }

    #[test]
    fn test_update_element_carries_partial_patch() {
        let msg: super::CanvasMessage = serde_json::from_str(
            r##"{"type":"updateElement","id":7,"patch":{"fillColor":"#ff0000"}}"##,
        )
        .unwrap();
        let super::CanvasMessage::UpdateElement { id, patch } = msg else {
            panic!("expected updateElement");
        };
        assert_eq!(id, super::ElementId(7));
        assert_eq!(patch.fill.map(|f| f.to_string()).as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_command_serializes() {
        let json = serde_json::to_string(&super::Command::HistoryChanged { len: 2, step: 1 }).unwrap();
        assert_eq!(json, r#"{"type":"historyChanged","value":{"len":2,"step":1}}"#);
    }
}
