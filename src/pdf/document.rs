//! Input model for the paginator.

/// The two Type1 core fonts the exports use. Core fonts need no
/// embedding and have well-known metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    pub fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name inside page content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }
}

/// Full text style for a block. Every block carries its complete style;
/// nothing is inherited from the previously rendered block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size_pt: f64,
    /// 0-255 per channel.
    pub color_rgb: (u8, u8, u8),
}

impl TextStyle {
    pub fn normal(size_pt: f64) -> Self {
        Self {
            font: Font::Helvetica,
            size_pt,
            color_rgb: (0, 0, 0),
        }
    }

    pub fn bold(size_pt: f64) -> Self {
        Self {
            font: Font::HelveticaBold,
            size_pt,
            color_rgb: (0, 0, 0),
        }
    }

    pub fn with_color(mut self, rgb: (u8, u8, u8)) -> Self {
        self.color_rgb = rgb;
        self
    }

    /// Baseline-to-baseline advance for this style.
    pub fn line_height(&self) -> f64 {
        self.size_pt + 3.0
    }
}

/// A run of text rendered at a fixed left indent from the margin.
/// Embedded newlines force line breaks; everything else wraps to the
/// usable width.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub style: TextStyle,
    pub indent_pt: f64,
    pub text: String,
}

impl TextBlock {
    pub fn new(style: TextStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            indent_pt: 0.0,
            text: text.into(),
        }
    }

    pub fn indented(style: TextStyle, indent_pt: f64, text: impl Into<String>) -> Self {
        Self {
            style,
            indent_pt,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocSection {
    pub heading: String,
    pub heading_style: TextStyle,
    pub blocks: Vec<TextBlock>,
}

/// A structured document: a title followed by ordered sections.
#[derive(Debug, Clone)]
pub struct PaginationDocument {
    pub title: String,
    pub sections: Vec<DocSection>,
}

/// Fixed per-call page geometry and spacing. `max_y_pt` is the
/// page-break threshold: no line's baseline advance may pass it.
#[derive(Debug, Clone, Copy)]
pub struct PageConfig {
    pub width_pt: f64,
    pub height_pt: f64,
    pub margin_pt: f64,
    pub max_y_pt: f64,
    pub title_style: TextStyle,
    /// Gap between the divider rule and the first section.
    pub rule_gap_pt: f64,
    /// Gap appended after every block.
    pub block_gap_pt: f64,
    /// Extra gap appended after every section.
    pub section_gap_pt: f64,
}

impl PageConfig {
    /// A4 in points, used by the multi-session study book.
    pub fn a4_study_book() -> Self {
        Self {
            width_pt: 595.28,
            height_pt: 841.89,
            margin_pt: 40.0,
            max_y_pt: 780.0,
            title_style: TextStyle::bold(20.0),
            rule_gap_pt: 14.0,
            block_gap_pt: 10.0,
            section_gap_pt: 20.0,
        }
    }

    /// US Letter, used by the single-session exports.
    pub fn letter_single() -> Self {
        Self {
            width_pt: 612.0,
            height_pt: 792.0,
            margin_pt: 45.0,
            max_y_pt: 730.0,
            title_style: TextStyle::bold(16.0),
            rule_gap_pt: 14.0,
            block_gap_pt: 8.0,
            section_gap_pt: 16.0,
        }
    }

    pub fn usable_width(&self) -> f64 {
        self.width_pt - 2.0 * self.margin_pt
    }
}
