use base64::{Engine as _, engine::general_purpose};
use tiny_skia::{Pixmap, PixmapPaint, Transform};

use crate::error::RenderError;
use crate::skia::{SkiaSurface, to_skia_color};
use crate::types::Color;

/// Opaque background the surface is composited onto before encoding.
pub const CAPTURE_BACKGROUND: Color = Color::WHITE;

/// Composite the surface onto an opaque background and encode it as PNG.
///
/// Returns the base64 payload without any `data:image/png;base64,` prefix.
/// Reads the surface only, so repeated calls yield identical output.
pub fn encode_capture(surface: &SkiaSurface) -> Result<String, RenderError> {
    let png = encode_capture_png(surface)?;
    Ok(general_purpose::STANDARD.encode(png))
}

/// Same as [`encode_capture`] but returns the raw PNG bytes.
pub fn encode_capture_png(surface: &SkiaSurface) -> Result<Vec<u8>, RenderError> {
    let (width, height) = (surface.width(), surface.height());
    let mut target = Pixmap::new(width, height).ok_or(RenderError::SurfaceAllocation(width, height))?;
    target.fill(to_skia_color(CAPTURE_BACKGROUND));
    target.draw_pixmap(
        0,
        0,
        surface.pixmap().as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    target
        .encode_png()
        .map_err(|e| RenderError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_list::RenderBackend;
    use crate::types::{DrawStyle, Rectangle};

    #[test]
    fn test_transparent_surface_exports_white() {
        let surface = SkiaSurface::new(4, 4).unwrap();
        let png = encode_capture_png(&surface).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert!(decoded.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_capture_is_idempotent_and_unprefixed() {
        let mut surface = SkiaSurface::new(32, 32).unwrap();
        let style = DrawStyle {
            fill_color: Some(Color::rgb(0.0, 0.0, 1.0)),
            ..DrawStyle::default()
        };
        surface
            .draw_rectangle(Rectangle::new(4.0, 4.0, 10.0, 10.0), &style)
            .unwrap();

        let first = encode_capture(&surface).unwrap();
        let second = encode_capture(&surface).unwrap();
        assert_eq!(first, second);
        assert!(!first.starts_with("data:"));

        let bytes = general_purpose::STANDARD.decode(&first).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(8, 8).0, [0, 0, 255, 255]);
        assert_eq!(decoded.get_pixel(30, 30).0, [255, 255, 255, 255]);
    }
}
