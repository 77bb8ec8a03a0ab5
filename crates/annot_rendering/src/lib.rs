pub mod capture;
pub mod error;
pub mod image;
pub mod render_list;
pub mod skia;
pub mod types;

// Re-export common types.
pub use capture::{CAPTURE_BACKGROUND, encode_capture};
pub use error::RenderError;
pub use render_list::{RenderBackend, RenderItem, RenderList, z_order};
pub use skia::SkiaSurface;
pub use types::{Color, DrawStyle, Glow, PathSegment, Point, Rectangle, TextStyle};
