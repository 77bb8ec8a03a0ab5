use annot_drawing::{Color, DrawingTool, ElementStyle, Fill};

use crate::DrawingConfig;

/// Tool manager
///
/// Tracks the armed tool and active color, and derives the default style a new
/// element gets from the host-injected [`DrawingConfig`].
#[derive(Debug, Clone)]
pub struct ToolManager {
    current_tool: DrawingTool,
    color: Color,
    stroke_width: f32,
    freehand_width: f32,
    bar_corner_radius: f32,
    font_size: f32,
}

impl ToolManager {
    pub fn new(config: &DrawingConfig) -> Self {
        let mut tools = Self {
            current_tool: DrawingTool::Select,
            color: config.stroke_color,
            stroke_width: 0.0,
            freehand_width: 0.0,
            bar_corner_radius: 0.0,
            font_size: 0.0,
        };
        tools.update_config(config);
        tools
    }

    /// Pick up new widths and sizes. The active color is left alone.
    pub fn update_config(&mut self, config: &DrawingConfig) {
        self.stroke_width = config.stroke_width;
        self.freehand_width = config.freehand_width;
        self.bar_corner_radius = config.bar_corner_radius;
        self.font_size = config.font_size;
    }

    pub fn set_current_tool(&mut self, tool: DrawingTool) {
        self.current_tool = tool;
    }

    pub fn current_tool(&self) -> DrawingTool {
        self.current_tool
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Default style for elements created by `tool`.
    ///
    /// Bars are filled with no stroke and rounded corners; every other shape is
    /// stroked and unfilled.
    pub fn style_for(&self, tool: DrawingTool) -> ElementStyle {
        let base = ElementStyle {
            stroke_color: self.color,
            ..ElementStyle::default()
        };
        match tool {
            DrawingTool::Bar => ElementStyle {
                fill: Fill::Solid(self.color),
                stroke_width: 0.0,
                corner_radius: self.bar_corner_radius,
                ..base
            },
            DrawingTool::Freehand => ElementStyle {
                stroke_width: self.freehand_width,
                ..base
            },
            DrawingTool::Text => ElementStyle {
                stroke_width: 0.0,
                ..base
            },
            _ => ElementStyle {
                stroke_width: self.stroke_width,
                ..base
            },
        }
    }
}
