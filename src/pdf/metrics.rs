//! Text measurement and word wrapping for the Type1 core fonts.
//!
//! Glyph widths come from the standard AFM tables (1000-unit em) for the
//! printable ASCII range; anything outside it falls back to an average
//! width. Wrapping is greedy and must be re-run whenever font size or
//! target width changes, because the caller advances its cursor by the
//! wrapped line count.

use super::document::Font;

/// Helvetica glyph widths for chars 0x20..=0x7E.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, // A..P
    778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // Q..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, // a..p
    556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // q..z
    334, 260, 334, 584, // {..~
];

/// Helvetica-Bold glyph widths for chars 0x20..=0x7E.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667,
    778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611,
    611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

const FALLBACK_WIDTH: u16 = 556;

fn glyph_width(font: Font, c: char) -> u16 {
    let table = match font {
        Font::Helvetica => &HELVETICA_WIDTHS,
        Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
    };
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Width of `text` in points at the given font and size.
pub fn text_width(text: &str, font: Font, size_pt: f64) -> f64 {
    let units: u64 = text.chars().map(|c| glyph_width(font, c) as u64).sum();
    units as f64 * size_pt / 1000.0
}

/// Break a single word that is wider than `max_width` into fitting
/// chunks. Always emits at least one character per chunk.
fn break_word(word: &str, font: Font, size_pt: f64, max_width: f64) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        let candidate_width = text_width(&current, font, size_pt) + text_width(&c.to_string(), font, size_pt);
        if !current.is_empty() && candidate_width > max_width {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn wrap_paragraph(paragraph: &str, font: Font, size_pt: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in paragraph.split_whitespace() {
        let pieces = if text_width(word, font, size_pt) > max_width {
            break_word(word, font, size_pt, max_width)
        } else {
            vec![word.to_string()]
        };

        for piece in pieces {
            if current.is_empty() {
                current = piece;
                continue;
            }
            let candidate = format!("{} {}", current, piece);
            if text_width(&candidate, font, size_pt) > max_width {
                lines.push(std::mem::take(&mut current));
                current = piece;
            } else {
                current = candidate;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        // A blank paragraph still occupies one line.
        lines.push(String::new());
    }
    lines
}

/// Greedy word wrap: lines never exceed `max_width` in the given font
/// and size. Embedded newlines force breaks.
pub fn wrap(text: &str, font: Font, size_pt: f64, max_width: f64) -> Vec<String> {
    text.split('\n')
        .flat_map(|p| wrap_paragraph(p, font, size_pt, max_width))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_scales_with_size() {
        let w12 = text_width("hello", Font::Helvetica, 12.0);
        let w24 = text_width("hello", Font::Helvetica, 24.0);
        assert!((w24 - 2.0 * w12).abs() < 1e-9);
    }

    #[test]
    fn test_bold_is_wider() {
        let normal = text_width("study notes", Font::Helvetica, 12.0);
        let bold = text_width("study notes", Font::HelveticaBold, 12.0);
        assert!(bold > normal);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "the quick brown fox jumps over the lazy dog and keeps on running";
        let lines = wrap(text, Font::Helvetica, 12.0, 120.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Font::Helvetica, 12.0) <= 120.0);
        }
    }

    #[test]
    fn test_wrap_preserves_words_in_order() {
        let text = "mitochondria are the powerhouse of the cell and synthesize ATP";
        let lines = wrap(text, Font::Helvetica, 12.0, 150.0);
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_wrap_honors_embedded_newlines() {
        let lines = wrap("Q: short\nA: also short", Font::Helvetica, 12.0, 500.0);
        assert_eq!(lines, vec!["Q: short", "A: also short"]);
    }

    #[test]
    fn test_wrap_breaks_oversized_word() {
        let word = "a".repeat(200);
        let lines = wrap(&word, Font::Helvetica, 12.0, 100.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Font::Helvetica, 12.0) <= 100.0);
        }
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_empty_text_is_single_blank_line() {
        assert_eq!(wrap("", Font::Helvetica, 12.0, 100.0), vec![""]);
    }
}
