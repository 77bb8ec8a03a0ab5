use std::sync::Arc;

use annot_drawing::build_frame;
use annot_rendering::{Color, RenderBackend, SkiaSurface, encode_capture};

use super::{AnnotationCanvas, DrawingError};

impl AnnotationCanvas {
    /// Allocate the raster surface at the configured size.
    pub fn mount(&mut self) -> Result<(), DrawingError> {
        let surface = SkiaSurface::new(self.config.width, self.config.height)?;
        tracing::info!(width = self.config.width, height = self.config.height, "canvas mounted");
        self.surface = Some(surface);
        self.needs_redraw = true;
        Ok(())
    }

    pub fn unmount(&mut self) {
        self.surface = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Draw the committed document plus any provisional element.
    pub fn render_frame(&mut self) -> Result<(), DrawingError> {
        let surface = self.surface.as_mut().ok_or(DrawingError::NotMounted)?;

        let mut list = build_frame(
            &self.document,
            self.session.provisional.as_ref(),
            self.selected,
            &self.render_options,
        );

        let live: Vec<Arc<str>> = self
            .document
            .image_payloads()
            .chain(self.session.provisional.as_ref().and_then(|e| e.image.as_ref()))
            .cloned()
            .collect();
        surface.retain_images(live.iter().map(|s| &**s));

        surface.clear(Color::TRANSPARENT)?;
        let skipped = list.execute(surface);
        if skipped > 0 {
            tracing::debug!(skipped, "frame rendered with skipped items");
        }
        Ok(())
    }

    /// Render the current frame and export it as base64 PNG over white.
    ///
    /// Returns `None` when the canvas is not mounted or encoding fails.
    pub fn capture(&mut self) -> Option<String> {
        if !self.is_mounted() {
            tracing::warn!("capture requested before mount");
            return None;
        }
        if let Err(e) = self.render_frame() {
            tracing::warn!("capture render failed: {e}");
            return None;
        }
        let surface = self.surface.as_ref()?;
        match encode_capture(surface) {
            Ok(payload) => {
                tracing::debug!(bytes = payload.len(), "captured");
                Some(payload)
            }
            Err(e) => {
                tracing::warn!("capture encode failed: {e}");
                None
            }
        }
    }
}
