//! Materializes laid-out pages as a PDF byte stream with `lopdf`.
//!
//! Only the two core fonts are referenced, so no font embedding is
//! needed. Nothing time- or randomness-dependent goes into the file;
//! rendering the same layout twice yields byte-identical output.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use super::document::{Font, PageConfig};
use super::layout::PageLayout;

/// Encode text for a Type1 font using WinAnsi: Latin-1 bytes, anything
/// else replaced with '?'. Measurement in `metrics` makes the same
/// ASCII-or-fallback assumption.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF {
                code as u8
            } else {
                b'?'
            }
        })
        .collect()
}

fn font_dictionary(font: Font) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_name(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn page_operations(page: &PageLayout, config: &PageConfig) -> Vec<Operation> {
    let mut ops = Vec::new();

    for rule in &page.rules {
        let y = config.height_pt - rule.y;
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new("w", vec![real(rule.line_width)]));
        ops.push(Operation::new("m", vec![real(rule.x1), real(y)]));
        ops.push(Operation::new("l", vec![real(rule.x2), real(y)]));
        ops.push(Operation::new("S", vec![]));
        ops.push(Operation::new("Q", vec![]));
    }

    for line in &page.lines {
        if line.text.is_empty() {
            continue;
        }
        let (r, g, b) = line.style.color_rgb;
        let y = config.height_pt - line.y;
        ops.push(Operation::new("BT", vec![]));
        // Font and color are asserted for every line; content-stream
        // graphics state never leaks from one block into the next.
        ops.push(Operation::new(
            "Tf",
            vec![
                Object::Name(line.style.font.resource_name().into()),
                real(line.style.size_pt),
            ],
        ));
        ops.push(Operation::new(
            "rg",
            vec![
                real(r as f64 / 255.0),
                real(g as f64 / 255.0),
                real(b as f64 / 255.0),
            ],
        ));
        ops.push(Operation::new("Td", vec![real(line.x), real(y)]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_text(&line.text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    ops
}

/// Write the laid-out pages into a complete PDF document.
pub fn write_pdf(pages: &[PageLayout], config: &PageConfig) -> Result<Vec<u8>, String> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();

    let helvetica_id = doc.add_object(font_dictionary(Font::Helvetica));
    let helvetica_bold_id = doc.add_object(font_dictionary(Font::HelveticaBold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Helvetica.resource_name() => helvetica_id,
            Font::HelveticaBold.resource_name() => helvetica_bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let content = Content {
            operations: page_operations(page, config),
        };
        let encoded = content
            .encode()
            .map_err(|e| format!("content encoding failed: {}", e))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                real(config.width_pt),
                real(config.height_pt),
            ],
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| format!("PDF serialization failed: {}", e))?;
    Ok(bytes)
}
