//! Image payload decoding.
//!
//! A payload is either raw SVG markup or a `data:image/<type>;base64,<data>` URL.
//! Both decode into a premultiplied `tiny_skia::Pixmap` at their natural size.

use std::sync::{Arc, OnceLock};

use base64::{Engine as _, engine::general_purpose};
use tiny_skia::{IntSize, Pixmap, Transform};

use crate::error::RenderError;

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

static FONT_DATABASE: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

/// System font database, loaded on first use and shared afterwards.
pub fn font_database() -> Arc<usvg::fontdb::Database> {
    FONT_DATABASE
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

/// usvg options sharing the system font database.
pub fn svg_options() -> usvg::Options<'static> {
    let mut options = usvg::Options::default();
    options.fontdb = font_database();
    options
}

/// Whether the payload looks like inline SVG markup.
pub fn is_svg_markup(payload: &str) -> bool {
    let trimmed = payload.trim_start();
    trimmed.starts_with("<svg") || trimmed.starts_with("<?xml")
}

/// Whether the payload is a base64 data URL.
pub fn is_data_url(payload: &str) -> bool {
    payload.starts_with(DATA_URL_PREFIX) && payload.contains(BASE64_MARKER)
}

/// Decode a payload into a pixmap at its natural size.
pub fn decode_payload(payload: &str) -> Result<Pixmap, RenderError> {
    if is_svg_markup(payload) {
        decode_svg(payload)
    } else if is_data_url(payload) {
        decode_data_url(payload)
    } else {
        Err(RenderError::UnsupportedPayload)
    }
}

/// Natural `(width, height)` of a payload.
pub fn payload_size(payload: &str) -> Result<(f32, f32), RenderError> {
    if is_svg_markup(payload) {
        let tree = usvg::Tree::from_str(payload, &svg_options())?;
        let size = tree.size();
        return Ok((size.width(), size.height()));
    }
    let pixmap = decode_payload(payload)?;
    Ok((pixmap.width() as f32, pixmap.height() as f32))
}

/// Wrap encoded raster bytes (PNG, JPEG, ...) into a data URL.
pub fn raster_data_url(bytes: &[u8]) -> Result<String, RenderError> {
    let format = image::guess_format(bytes)?;
    Ok(format!(
        "{DATA_URL_PREFIX}{}{BASE64_MARKER}{}",
        format.to_mime_type(),
        general_purpose::STANDARD.encode(bytes)
    ))
}

fn decode_svg(markup: &str) -> Result<Pixmap, RenderError> {
    let tree = usvg::Tree::from_str(markup, &svg_options())?;
    let size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(size.width(), size.height())
        .ok_or(RenderError::SurfaceAllocation(size.width(), size.height()))?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}

fn decode_data_url(url: &str) -> Result<Pixmap, RenderError> {
    let data = url
        .split_once(BASE64_MARKER)
        .map(|(_, data)| data)
        .ok_or(RenderError::UnsupportedPayload)?;
    let bytes = general_purpose::STANDARD.decode(data.trim())?;
    let rgba = image::load_from_memory(&bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut pixels = rgba.into_raw();
    premultiply(&mut pixels);

    let size = IntSize::from_wh(width, height).ok_or(RenderError::SurfaceAllocation(width, height))?;
    Pixmap::from_vec(pixels, size).ok_or(RenderError::SurfaceAllocation(width, height))
}

/// tiny-skia stores premultiplied RGBA.
fn premultiply(rgba: &mut [u8]) {
    for chunk in rgba.chunks_exact_mut(4) {
        let a = chunk[3] as u16;
        if a == 255 {
            continue;
        }
        chunk[0] = ((chunk[0] as u16 * a + 127) / 255) as u8;
        chunk[1] = ((chunk[1] as u16 * a + 127) / 255) as u8;
        chunk[2] = ((chunk[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
mod tests {
    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#00ff00"/></svg>"##;

    fn png_bytes() -> Vec<u8> {
        let mut img = image::RgbaImage::new(3, 2);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgba([255, 0, 0, 255]);
        }
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_svg_markup_decodes_at_natural_size() {
        let pixmap = super::decode_payload(SQUARE_SVG).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (40, 20));
        assert_eq!(super::payload_size(SQUARE_SVG).unwrap(), (40.0, 20.0));
    }

    #[test]
    fn test_data_url_round_trip() {
        let url = super::raster_data_url(&png_bytes()).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        let pixmap = super::decode_payload(&url).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (3, 2));
        let first = pixmap.pixel(0, 0).unwrap();
        assert_eq!((first.red(), first.alpha()), (255, 255));
    }

    #[test]
    fn test_unknown_payload_is_rejected() {
        assert!(matches!(
            super::decode_payload("https://example.invalid/cat.png"),
            Err(super::RenderError::UnsupportedPayload)
        ));
        assert!(super::decode_payload("<svg").is_err());
    }

    #[test]
    fn test_premultiply_half_alpha() {
        let mut px = [200u8, 100, 0, 128];
        super::premultiply(&mut px);
        assert_eq!(px, [100, 50, 0, 128]);
    }
}
