//! PDF fixtures built with lopdf.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One line of page text.
#[derive(Debug, Clone, Copy)]
pub enum Line<'a> {
    /// 16pt Helvetica-Bold
    Heading(&'a str),
    /// 11pt Helvetica
    Body(&'a str),
    /// 11pt Helvetica, first line of an indented paragraph
    Indented(&'a str),
    /// Vertical gap that starts a new paragraph
    Break,
}

const TOP: i64 = 740;
const BODY_LEADING: i64 = 14;
const MARGIN: i64 = 72;
const INDENT: i64 = 36;

fn page_operations(lines: &[Line<'_>]) -> Vec<Operation> {
    let mut ops = Vec::new();
    let mut y = TOP;
    let mut first = true;

    for line in lines {
        let (font, size, x, text) = match *line {
            Line::Heading(text) => {
                if !first {
                    y -= 16;
                }
                ("F2", 16, MARGIN, text)
            }
            Line::Body(text) => ("F1", 11, MARGIN, text),
            Line::Indented(text) => ("F1", 11, MARGIN + INDENT, text),
            Line::Break => {
                y -= 20;
                continue;
            }
        };
        first = false;

        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
        ops.push(Operation::new("ET", vec![]));

        y -= if size == 16 { 22 } else { BODY_LEADING };
    }
    ops
}

/// Build a PDF document with one entry of `pages` per page.
pub fn build_pdf(pages: &[Vec<Line<'_>>]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let content = Content {
            operations: page_operations(lines),
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Write a PDF into `dir` and return its path.
pub fn write_pdf(dir: &Path, name: &str, pages: &[Vec<Line<'_>>]) -> PathBuf {
    let path = dir.join(name);
    build_pdf(pages).save(&path).expect("save pdf");
    path
}

/// Serialize a PDF to bytes.
pub fn pdf_bytes(pages: &[Vec<Line<'_>>]) -> Vec<u8> {
    let mut buf = Vec::new();
    build_pdf(pages).save_to(&mut buf).expect("save pdf");
    buf
}

/// Things to do on the Riviera: three sections over two pages.
pub fn activities_pdf(dir: &Path) -> PathBuf {
    write_pdf(
        dir,
        "Riviera - Things to Do.pdf",
        &[
            vec![
                Line::Heading("Coastal Adventures"),
                Line::Body("sandy beaches stretch along the coast near Nice and Antibes."),
                Line::Body("beach clubs rent loungers and offer swimming in calm water."),
                Line::Heading("Nightlife and Entertainment"),
                Line::Body("bars and clubs in the old town stay open until dawn."),
                Line::Body("live music venues host concerts for groups of friends."),
            ],
            vec![
                Line::Heading("Museum Collections"),
                Line::Body("paintings by Matisse and Chagall fill quiet galleries."),
                Line::Body("sculpture gardens display bronze works from several eras."),
            ],
        ],
    )
}

/// Riviera food guide: two sections on one page.
pub fn cuisine_pdf(dir: &Path) -> PathBuf {
    write_pdf(
        dir,
        "Riviera - Cuisine.pdf",
        &[vec![
            Line::Heading("Culinary Experiences"),
            Line::Body("cooking classes teach socca, pissaladiere and ratatouille."),
            Line::Body("wine tastings visit vineyards in the hills above Bandol."),
            Line::Heading("Local Markets"),
            Line::Body("morning markets sell olives, cheese, herbs and fresh fish."),
        ]],
    )
}

/// Riviera hotels: one section.
pub fn hotels_pdf(dir: &Path) -> PathBuf {
    write_pdf(
        dir,
        "Riviera - Hotels.pdf",
        &[vec![
            Line::Heading("Budget Hotels"),
            Line::Body("hostels offer dormitory beds with shared kitchens for students."),
            Line::Body("guesthouses near the station have rooms for four people."),
        ]],
    )
}
