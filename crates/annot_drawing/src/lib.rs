pub mod document;
pub mod element;
pub mod history;
pub mod render;
pub mod types;

pub use annot_rendering;

// Re-export common types.
pub use document::Document;
pub use element::{
    Color, ColorParseError, Element, ElementId, ElementKind, ElementPatch, ElementStyle, Fill,
    Geometry, Point, create_element, defaults,
};
pub use history::History;
pub use render::{RenderOptions, Renderable, build_frame};
pub use types::{DrawingTool, InteractionState};
