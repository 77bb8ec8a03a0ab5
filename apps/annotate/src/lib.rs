pub mod replay;

// Public modules (re-exporting the workspace crates).
pub use annot_drawing as drawing;
pub use annot_host as host;
pub use annot_protocol as protocol;
pub use annot_rendering as rendering;
pub use annot_settings as settings;

pub use annot_host::{AnnotationCanvas, DrawingConfig};
pub use replay::{Replayer, ReplaySummary, drawing_config, load_script};
