//! The paginator core: turns a [`PaginationDocument`] into positioned,
//! page-broken lines.
//!
//! Coordinates are top-down (y grows toward the page bottom); the writer
//! flips them into PDF space. The page-break check runs per wrapped line,
//! before the line is placed, so a long block may split mid-paragraph
//! but no line ever lands past the threshold.

use super::document::{PageConfig, PaginationDocument, TextStyle};
use super::metrics::{text_width, wrap};

#[derive(Debug, Clone)]
pub struct PositionedLine {
    pub x: f64,
    /// Top-down baseline position.
    pub y: f64,
    pub text: String,
    pub style: TextStyle,
}

/// A horizontal rule spanning `x1..x2` at height `y`.
#[derive(Debug, Clone)]
pub struct Rule {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
    pub line_width: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub lines: Vec<PositionedLine>,
    pub rules: Vec<Rule>,
}

struct Cursor {
    pages: Vec<PageLayout>,
    y: f64,
    margin: f64,
    max_y: f64,
}

impl Cursor {
    fn new(config: &PageConfig) -> Self {
        Self {
            pages: vec![PageLayout::default()],
            y: config.margin_pt,
            margin: config.margin_pt,
            max_y: config.max_y_pt,
        }
    }

    /// Insert a page boundary if advancing by `line_height` would pass
    /// the threshold. Must run before every line placement.
    fn ensure_fits(&mut self, line_height: f64) {
        if self.y + line_height > self.max_y {
            self.pages.push(PageLayout::default());
            self.y = self.margin;
        }
    }

    fn place_line(&mut self, x: f64, text: String, style: TextStyle) {
        let line_height = style.line_height();
        self.ensure_fits(line_height);
        // Baseline sits one line below the cursor top.
        self.y += line_height;
        let y = self.y;
        self.current_page().lines.push(PositionedLine { x, y, text, style });
    }

    fn place_rule(&mut self, x1: f64, x2: f64, gap_after: f64) {
        self.ensure_fits(gap_after);
        let y = self.y + 4.0;
        self.current_page().rules.push(Rule {
            x1,
            x2,
            y,
            line_width: 0.7,
        });
        self.y += gap_after;
    }

    fn advance(&mut self, gap: f64) {
        self.y += gap;
    }

    fn current_page(&mut self) -> &mut PageLayout {
        self.pages.last_mut().expect("cursor always has a page")
    }
}

/// Lay out the whole document. Pure: identical input yields identical
/// pages.
pub fn layout(doc: &PaginationDocument, config: &PageConfig) -> Vec<PageLayout> {
    let mut cursor = Cursor::new(config);
    let usable = config.usable_width();

    // Title: bold, wrapped, each line centered.
    let title_style = config.title_style;
    for line in wrap(&doc.title, title_style.font, title_style.size_pt, usable) {
        let line_width = text_width(&line, title_style.font, title_style.size_pt);
        let x = (config.width_pt - line_width) / 2.0;
        cursor.place_line(x, line, title_style);
    }

    // Divider rule under the title.
    cursor.place_rule(
        config.margin_pt,
        config.width_pt - config.margin_pt,
        config.rule_gap_pt,
    );

    for section in &doc.sections {
        let hs = section.heading_style;
        for line in wrap(&section.heading, hs.font, hs.size_pt, usable) {
            cursor.place_line(config.margin_pt, line, hs);
        }
        cursor.advance(config.block_gap_pt);

        for block in &section.blocks {
            let width = usable - block.indent_pt;
            let x = config.margin_pt + block.indent_pt;
            for line in wrap(&block.text, block.style.font, block.style.size_pt, width) {
                cursor.place_line(x, line, block.style);
            }
            cursor.advance(config.block_gap_pt);
        }

        cursor.advance(config.section_gap_pt);
    }

    cursor.pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::document::{DocSection, TextBlock, TextStyle};

    fn doc_with_blocks(n: usize, words_per_block: usize) -> PaginationDocument {
        let text = vec!["word"; words_per_block].join(" ");
        PaginationDocument {
            title: "Test Document".to_string(),
            sections: vec![DocSection {
                heading: "Section".to_string(),
                heading_style: TextStyle::bold(14.0),
                blocks: (0..n)
                    .map(|_| TextBlock::new(TextStyle::normal(12.0), text.clone()))
                    .collect(),
            }],
        }
    }

    #[test]
    fn test_single_short_doc_fits_one_page() {
        let pages = layout(&doc_with_blocks(2, 5), &PageConfig::letter_single());
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_long_doc_breaks_pages() {
        let pages = layout(&doc_with_blocks(200, 10), &PageConfig::a4_study_book());
        assert!(pages.len() > 1);
        // Every page after the first starts near the top margin.
        for page in &pages[1..] {
            let first = page.lines.first().expect("page has lines");
            assert!(first.y <= 80.0);
        }
    }

    #[test]
    fn test_no_line_past_threshold() {
        let config = PageConfig::a4_study_book();
        let pages = layout(&doc_with_blocks(300, 12), &config);
        for page in &pages {
            for line in &page.lines {
                assert!(
                    line.y <= config.max_y_pt,
                    "line at y={} past threshold {}",
                    line.y,
                    config.max_y_pt
                );
            }
        }
    }

    #[test]
    fn test_block_may_split_across_pages() {
        // One huge block must span at least two pages.
        let config = PageConfig::letter_single();
        let pages = layout(&doc_with_blocks(1, 2000), &config);
        assert!(pages.len() > 1);
    }

    #[test]
    fn test_title_lines_are_centered() {
        let config = PageConfig::letter_single();
        let pages = layout(&doc_with_blocks(1, 3), &config);
        let title_line = &pages[0].lines[0];
        let width = text_width(&title_line.text, title_line.style.font, title_line.style.size_pt);
        let expected_x = (config.width_pt - width) / 2.0;
        assert!((title_line.x - expected_x).abs() < 1e-9);
    }

    #[test]
    fn test_divider_rule_present_on_first_page() {
        let pages = layout(&doc_with_blocks(1, 3), &PageConfig::letter_single());
        assert_eq!(pages[0].rules.len(), 1);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let doc = doc_with_blocks(50, 8);
        let config = PageConfig::a4_study_book();
        let a = layout(&doc, &config);
        let b = layout(&doc, &config);
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(pa.lines.len(), pb.lines.len());
            for (la, lb) in pa.lines.iter().zip(&pb.lines) {
                assert_eq!(la.text, lb.text);
                assert_eq!(la.x, lb.x);
                assert_eq!(la.y, lb.y);
            }
        }
    }

    #[test]
    fn test_every_block_line_carries_its_own_style() {
        // Styling is stateful in PDF content; the layout must attach the
        // full style to each line so the writer can re-assert it.
        let green = TextStyle::bold(12.0).with_color((34, 139, 34));
        let doc = PaginationDocument {
            title: "T".to_string(),
            sections: vec![DocSection {
                heading: "Quiz".to_string(),
                heading_style: TextStyle::bold(14.0),
                blocks: vec![
                    TextBlock::new(green, "Correct Answer: B"),
                    TextBlock::new(TextStyle::normal(12.0), "next question"),
                ],
            }],
        };
        let pages = layout(&doc, &PageConfig::letter_single());
        let lines = &pages[0].lines;
        let answer = lines.iter().find(|l| l.text.starts_with("Correct")).unwrap();
        let next = lines.iter().find(|l| l.text == "next question").unwrap();
        assert_eq!(answer.style.color_rgb, (34, 139, 34));
        assert_eq!(next.style.color_rgb, (0, 0, 0));
        assert_eq!(next.style, TextStyle::normal(12.0));
    }
}
