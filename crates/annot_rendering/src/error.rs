/// Rendering and encoding errors.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("cannot allocate a {0}x{1} surface")]
    SurfaceAllocation(u32, u32),
    #[error("unsupported image payload")]
    UnsupportedPayload,
    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image decode failed: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("SVG parse failed: {0}")]
    Svg(#[from] usvg::Error),
    #[error("PNG encode failed: {0}")]
    Encode(String),
}
