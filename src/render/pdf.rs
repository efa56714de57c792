//! PDF encoding of a laid-out document.
//!
//! Layout works in millimetres from the top-left corner of an A4 page; PDF user
//! space is points from the bottom-left, so every coordinate is flipped and
//! scaled here. Text uses the two standard Helvetica faces with WinAnsi
//! encoding, which covers the bullet, em-dash and degree sign the layout emits.

use crate::Result;
use crate::diagnostics;
use crate::render::layout::{Align, Block, Document, RuleBlock, TextBlock};
use crate::render::measure::{FontWeight, PT_PER_MM, TextMeasure};

use anyhow::Context;
use chrono::{DateTime, Local};
use lopdf::content::{Content, Operation};
use lopdf::{Object, Stream, StringFormat, dictionary};

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

/// Default stroke width (0.2 mm).
const LINE_WIDTH_MM: f64 = 0.2;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

fn pt(mm: f64) -> f32 {
    (mm * PT_PER_MM) as f32
}

fn pdf_y(mm: f64) -> f32 {
    pt(PAGE_HEIGHT_MM - mm)
}

/// Map text to WinAnsiEncoding bytes; unmappable characters become '?'.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '€' => 0x80,
            '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn text_ops(block: &TextBlock, measure: &dyn TextMeasure, ops: &mut Vec<Operation>) {
    let font = match block.style.weight {
        FontWeight::Regular => REGULAR_FONT,
        FontWeight::Bold => BOLD_FONT,
    };
    let x = match block.align {
        Align::Left => block.x,
        Align::Center => block.x - measure.width(&block.text, block.style) / 2.0,
    };

    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![font.into(), (block.style.size as f32).into()],
    ));
    ops.push(Operation::new(
        "Tm",
        vec![
            Object::Integer(1),
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(1),
            pt(x).into(),
            pdf_y(block.y).into(),
        ],
    ));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi(&block.text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn rule_ops(rule: &RuleBlock, ops: &mut Vec<Operation>) {
    let gray = f32::from(rule.gray) / 255.0;
    ops.push(Operation::new("RG", vec![gray.into(), gray.into(), gray.into()]));
    ops.push(Operation::new("w", vec![pt(LINE_WIDTH_MM).into()]));
    ops.push(Operation::new("m", vec![pt(rule.x1).into(), pdf_y(rule.y).into()]));
    ops.push(Operation::new("l", vec![pt(rule.x2).into(), pdf_y(rule.y).into()]));
    ops.push(Operation::new("S", vec![]));
}

/// Encode `doc` as PDF bytes. `measure` must be the backend the layout used,
/// so centered text lands where it was measured.
pub fn encode(doc: &Document, measure: &dyn TextMeasure, created: DateTime<Local>) -> Result<Vec<u8>> {
    let mut pdf = lopdf::Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let regular_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(doc.pages.len());
    for (index, page) in doc.pages.iter().enumerate() {
        let mut ops = Vec::new();
        for block in &page.blocks {
            match block {
                Block::Text(text) => text_ops(text, measure, &mut ops),
                Block::Rule(rule) => rule_ops(rule, &mut ops),
            }
        }

        let content = Content { operations: ops }.encode().with_context(|| {
            diagnostics::error_message(format!("encode content of page {}", index + 1))
        })?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                pt(PAGE_WIDTH_MM).into(),
                pt(PAGE_HEIGHT_MM).into(),
            ],
        }),
    );

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);

    let date = created.format("D:%Y%m%d%H%M%S").to_string();
    let info_id = pdf.add_object(dictionary! {
        "Title" => Object::String(win_ansi(&doc.title), StringFormat::Literal),
        "Producer" => Object::string_literal("protocol-builder"),
        "CreationDate" => Object::string_literal(date),
    });
    pdf.trailer.set("Info", info_id);

    let mut out = Vec::new();
    pdf.save_to(&mut out)
        .with_context(|| diagnostics::error_message("serialize pdf"))?;
    Ok(out)
}
