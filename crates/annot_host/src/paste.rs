//! Image paste.
//!
//! A paste source is one of:
//! - inline SVG markup,
//! - a `data:image/...;base64,` URL,
//! - an `http(s)://` URL, fetched synchronously,
//! - a filesystem path to an SVG file or a raster image.
//!
//! Everything is normalized into a payload the raster backend can decode
//! (SVG markup or a data URL) before an element is created.

use std::path::Path;
use std::time::Duration;

use annot_drawing::{ElementId, ElementKind, ElementStyle, Geometry, create_element};
use annot_rendering::image::{is_data_url, is_svg_markup, payload_size, raster_data_url};

use super::{AnnotationCanvas, DrawingError};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Turn a paste source into a decodable payload.
pub fn resolve_source(source: &str) -> Result<String, DrawingError> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(DrawingError::UnsupportedSource("empty source".to_string()));
    }
    if is_svg_markup(trimmed) || is_data_url(trimmed) {
        return Ok(trimmed.to_string());
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return fetch(trimmed);
    }
    read_file(Path::new(trimmed))
}

fn fetch(url: &str) -> Result<String, DrawingError> {
    tracing::debug!(url, "fetching paste source");
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    bytes_to_payload(&bytes, url)
}

fn read_file(path: &Path) -> Result<String, DrawingError> {
    let bytes = std::fs::read(path)?;
    bytes_to_payload(&bytes, &path.display().to_string())
}

fn bytes_to_payload(bytes: &[u8], origin: &str) -> Result<String, DrawingError> {
    if let Ok(text) = std::str::from_utf8(bytes)
        && is_svg_markup(text)
    {
        return Ok(text.to_string());
    }
    raster_data_url(bytes).map_err(|_| DrawingError::UnsupportedSource(origin.to_string()))
}

impl AnnotationCanvas {
    /// Paste an image centered at `(x, y)` at its natural size.
    ///
    /// Failures are logged and leave the document untouched.
    pub fn paste_image(&mut self, source: &str, x: f32, y: f32) -> bool {
        match self.try_paste_image(source, x, y) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("paste ignored: {e}");
                false
            }
        }
    }

    /// Same as [`AnnotationCanvas::paste_image`], surfacing the error.
    pub fn try_paste_image(&mut self, source: &str, x: f32, y: f32) -> Result<ElementId, DrawingError> {
        let payload = resolve_source(source)?;
        let (width, height) = payload_size(&payload)?;

        self.abandon_session();
        let element = create_element(
            ElementKind::Image,
            Geometry::rect(x - width / 2.0, y - height / 2.0, width, height),
            ElementStyle {
                stroke_width: 0.0,
                ..ElementStyle::default()
            },
        )
        .with_image(payload);
        let id = element.id();
        self.commit_element(element);
        tracing::info!(%id, width, height, "image pasted");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::{AnnotationCanvas, DrawingConfig, DrawingError};

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#00ff00"/></svg>"##;

    #[test]
    fn test_svg_paste_is_centered() {
        let mut canvas = AnnotationCanvas::new(DrawingConfig::default());
        let id = canvas.try_paste_image(SVG, 100.0, 100.0).unwrap();
        let el = canvas.document().get(id).unwrap();
        assert_eq!((el.x, el.y, el.width, el.height), (80.0, 90.0, 40.0, 20.0));
        assert_eq!(canvas.history().len(), 1);
    }

    #[test]
    fn test_svg_file_paste() {
        let mut file = tempfile::Builder::new().suffix(".svg").tempfile().unwrap();
        file.write_all(SVG.as_bytes()).unwrap();

        let mut canvas = AnnotationCanvas::new(DrawingConfig::default());
        let path = file.path().to_string_lossy().into_owned();
        assert!(canvas.paste_image(&path, 20.0, 10.0));
        let el = canvas.document().iter().next().unwrap();
        assert_eq!(el.image.as_deref(), Some(SVG));
    }

    #[test]
    fn test_bad_source_is_a_noop() {
        let mut canvas = AnnotationCanvas::new(DrawingConfig::default());
        assert!(!canvas.paste_image("<svg this is not svg", 0.0, 0.0));
        assert!(!canvas.paste_image("/definitely/not/here.png", 0.0, 0.0));
        assert!(matches!(
            canvas.try_paste_image("   ", 0.0, 0.0),
            Err(DrawingError::UnsupportedSource(_))
        ));
        assert!(canvas.document().is_empty());
        assert!(canvas.history().is_empty());
    }
}
