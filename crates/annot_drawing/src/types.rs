use serde::{Deserialize, Serialize};

use crate::element::ElementKind;

/// Tool armed on the canvas.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingTool {
    /// Select and drag existing elements.
    #[default]
    Select,
    Freehand,
    Rectangle,
    /// Filled rounded bar.
    Bar,
    Ellipse,
    Diamond,
    Arrow,
    Line,
    Text,
}

impl DrawingTool {
    /// Whether the tool drags out a bounding box.
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            Self::Rectangle | Self::Bar | Self::Ellipse | Self::Diamond | Self::Arrow | Self::Line
        )
    }

    pub fn is_freeform(&self) -> bool {
        matches!(self, Self::Freehand)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }

    /// Whether the tool creates elements (everything but select).
    pub fn can_draw(&self) -> bool {
        !matches!(self, Self::Select)
    }

    /// Element kind produced by this tool.
    pub fn element_kind(&self) -> Option<ElementKind> {
        match self {
            Self::Select => None,
            Self::Freehand => Some(ElementKind::Freehand),
            Self::Rectangle => Some(ElementKind::Rectangle),
            Self::Bar => Some(ElementKind::Bar),
            Self::Ellipse => Some(ElementKind::Ellipse),
            Self::Diamond => Some(ElementKind::Diamond),
            Self::Arrow => Some(ElementKind::Arrow),
            Self::Line => Some(ElementKind::Line),
            Self::Text => Some(ElementKind::Text),
        }
    }
}

/// Pointer interaction state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionState {
    #[default]
    Idle,
    /// A provisional element is being built.
    Drawing,
    /// The selected element follows the pointer.
    Dragging,
}

impl InteractionState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging)
    }

    /// Whether a pointer session is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_drawing_tool_properties() {
        assert!(super::DrawingTool::Rectangle.is_shape());
        assert!(super::DrawingTool::Bar.is_shape());
        assert!(super::DrawingTool::Diamond.is_shape());
        assert!(super::DrawingTool::Line.is_shape());
        assert!(!super::DrawingTool::Freehand.is_shape());
        assert!(!super::DrawingTool::Text.is_shape());

        assert!(super::DrawingTool::Freehand.is_freeform());
        assert!(!super::DrawingTool::Rectangle.is_freeform());

        assert!(super::DrawingTool::Text.is_text());
        assert!(!super::DrawingTool::Freehand.is_text());

        assert!(super::DrawingTool::Freehand.can_draw());
        assert!(!super::DrawingTool::Select.can_draw());
        assert_eq!(super::DrawingTool::Select.element_kind(), None);
        assert_eq!(
            super::DrawingTool::Bar.element_kind(),
            Some(super::ElementKind::Bar)
        );
    }

    #[test]
    fn test_tool_names_round_trip_through_json() {
        let json = serde_json::to_string(&super::DrawingTool::Freehand).unwrap();
        assert_eq!(json, "\"freehand\"");
        let tool: super::DrawingTool = serde_json::from_str("\"diamond\"").unwrap();
        assert_eq!(tool, super::DrawingTool::Diamond);
    }

    #[test]
    fn test_interaction_state_properties() {
        assert!(!super::InteractionState::Idle.is_active());
        assert!(super::InteractionState::Drawing.is_drawing());
        assert!(super::InteractionState::Dragging.is_dragging());
        assert!(super::InteractionState::Dragging.is_active());
    }
}
