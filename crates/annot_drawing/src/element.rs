use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use annot_rendering::Rectangle;
use serde::{Deserialize, Serialize};

/// Global element id generator.
static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Drawing defaults.
pub mod defaults {
    use super::Color;

    pub const STROKE_WIDTH: f32 = 2.0;
    pub const FREEHAND_WIDTH: f32 = 3.0;
    pub const BAR_CORNER_RADIUS: f32 = 8.0;
    pub const FONT_SIZE: f32 = 20.0;
    pub const MIN_FONT_SIZE: f32 = 12.0;
    /// Estimated glyph advance as a fraction of the font size.
    pub const TEXT_CHAR_WIDTH_FACTOR: f32 = 0.6;
    pub const ARROW_HEAD_LENGTH: f32 = 15.0;
    /// Angle between the shaft and each head wing, in radians.
    pub const ARROW_HEAD_ANGLE: f32 = 0.5;
    pub const HIGHLIGHT_COLOR: Color = Color::rgb(0x1e, 0x90, 0xff);
    pub const HIGHLIGHT_WIDTH: f32 = 2.0;
    pub const HIGHLIGHT_GLOW: f32 = 4.0;
}

/// Opaque element identifier, unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl ElementId {
    fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Freehand,
    Rectangle,
    /// Rounded, filled bar.
    Bar,
    Ellipse,
    Diamond,
    Arrow,
    Line,
    Text,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Point> for annot_rendering::Point {
    fn from(p: Point) -> Self {
        annot_rendering::Point::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color `{0}`: expected #rgb, #rrggbb or #rrggbbaa")]
pub struct ColorParseError(pub String);

/// 8-bit RGBA color, serialized as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(err)?;
        if !digits.is_ascii() {
            return Err(err());
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
        let nibble = |s: &str| byte(s).map(|v| v * 17);

        match digits.len() {
            3 => Ok(Self::rgb(
                nibble(&digits[0..1])?,
                nibble(&digits[1..2])?,
                nibble(&digits[2..3])?,
            )),
            6 => Ok(Self::rgb(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
            )),
            8 => Ok(Self::rgba(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])?,
            )),
            _ => Err(err()),
        }
    }

    /// `#rrggbb` for opaque colors, `#rrggbbaa` otherwise.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        // Annotation red.
        Color::rgb(0xe0, 0x31, 0x31)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl From<Color> for annot_rendering::Color {
    fn from(c: Color) -> Self {
        annot_rendering::Color::from_rgba8(c.r, c.g, c.b, c.a)
    }
}

/// Fill paint; `"none"` disables filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Fill {
    #[default]
    None,
    Solid(Color),
}

impl Fill {
    pub fn color(&self) -> Option<Color> {
        match self {
            Fill::None => None,
            Fill::Solid(c) => Some(*c),
        }
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fill::None => f.write_str("none"),
            Fill::Solid(c) => f.write_str(&c.to_hex()),
        }
    }
}

impl FromStr for Fill {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("none") || s == "transparent" {
            Ok(Fill::None)
        } else {
            Color::from_hex(s).map(Fill::Solid)
        }
    }
}

impl TryFrom<String> for Fill {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fill> for String {
    fn from(fill: Fill) -> Self {
        fill.to_string()
    }
}

/// Initial geometry of a new element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Freehand samples; ignored by other kinds.
    pub points: Vec<Point>,
}

impl Geometry {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            points: Vec::new(),
        }
    }
}

/// Paint attributes of a new element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub stroke_color: Color,
    pub fill: Fill,
    pub stroke_width: f32,
    pub corner_radius: f32,
    pub opacity: f32,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::default(),
            fill: Fill::None,
            stroke_width: defaults::STROKE_WIDTH,
            corner_radius: 0.0,
            opacity: 1.0,
        }
    }
}

/// One drawable object.
///
/// `width`/`height` keep the sign of the drag that produced them; use
/// [`Element::bounds`] for anything that needs a normalized box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub stroke_color: Color,
    #[serde(rename = "fillColor")]
    pub fill: Fill,
    pub stroke_width: f32,
    pub corner_radius: f32,
    pub opacity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "textContent")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "imagePayload")]
    pub image: Option<Arc<str>>,
}

/// Create an element with a fresh id.
pub fn create_element(kind: ElementKind, geometry: Geometry, style: ElementStyle) -> Element {
    Element {
        id: ElementId::next(),
        kind,
        x: geometry.x,
        y: geometry.y,
        width: geometry.width,
        height: geometry.height,
        stroke_color: style.stroke_color,
        fill: style.fill,
        stroke_width: style.stroke_width.max(0.0),
        corner_radius: style.corner_radius.max(0.0),
        opacity: style.opacity.clamp(0.0, 1.0),
        text: None,
        points: if kind == ElementKind::Freehand {
            geometry.points
        } else {
            Vec::new()
        },
        image: None,
    }
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Attach text content (text labels only).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        if self.kind == ElementKind::Text {
            self.text = Some(text.into());
        }
        self
    }

    /// Attach an image payload (pasted images only).
    pub fn with_image(mut self, payload: impl Into<Arc<str>>) -> Self {
        if self.kind == ElementKind::Image {
            self.image = Some(payload.into());
        }
        self
    }

    /// Append a freehand sample. Only meaningful while the stroke is provisional.
    pub fn push_point(&mut self, point: Point) {
        if self.kind == ElementKind::Freehand {
            self.points.push(point);
        }
    }

    /// Normalized bounding box; never mutates the element.
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(self.x, self.y, self.width, self.height).normalized()
    }

    /// Whether hit-testing may return this element.
    pub fn is_hit_testable(&self) -> bool {
        self.kind != ElementKind::Freehand
    }

    /// Bounding-box containment.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.is_hit_testable() && self.bounds().contains(x, y)
    }

    /// Move the anchor.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Apply a partial update. `id`, `kind` and `points` are never touched.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(color) = patch.stroke_color {
            self.stroke_color = color;
        }
        if let Some(fill) = patch.fill {
            self.fill = fill;
        }
        if let Some(width) = patch.stroke_width {
            self.stroke_width = width.max(0.0);
        }
        if let Some(radius) = patch.corner_radius {
            self.corner_radius = radius.max(0.0);
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(text) = &patch.text
            && self.kind == ElementKind::Text
        {
            self.text = Some(text.clone());
        }
    }

    /// Font size used for text labels.
    pub fn font_size(&self) -> f32 {
        self.height.max(defaults::MIN_FONT_SIZE)
    }
}

/// Partial element update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub stroke_color: Option<Color>,
    #[serde(rename = "fillColor")]
    pub fill: Option<Fill>,
    pub stroke_width: Option<f32>,
    pub corner_radius: Option<f32>,
    pub opacity: Option<f32>,
    #[serde(rename = "textContent")]
    pub text: Option<String>,
}

impl ElementPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
