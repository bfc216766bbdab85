//! Layout analysis for PDF pages.
//!
//! Interprets a page's text operators into positioned glyph runs, merges runs
//! sharing a baseline into lines, and groups lines into text blocks. Each line
//! becomes one [`TextSpan`] carrying its block index, so the segmenter can
//! tell a wrapped line from a new paragraph.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::backend::{ContentOp, PdfValue};
use crate::model::TextSpan;

/// TJ adjustments larger than this (thousandths of text space) read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Average glyph advance as a fraction of the font size, used when widths are unknown.
const GLYPH_WIDTH_RATIO: f32 = 0.5;

/// A run of text shown by one text operator.
#[derive(Debug, Clone)]
pub struct GlyphRun {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the run
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
    /// Whether the font appears to be bold
    pub is_bold: bool,
}

impl GlyphRun {
    /// Create a run, detecting boldness from the base font name.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, base_font: &str) -> Self {
        let width = text.chars().count() as f32 * font_size * GLYPH_WIDTH_RATIO;
        Self {
            text,
            x,
            y,
            width,
            font_size,
            is_bold: is_bold_font(base_font),
        }
    }
}

/// Whether a base font name denotes a bold weight.
pub fn is_bold_font(base_font: &str) -> bool {
    let name = base_font.to_ascii_lowercase();
    ["bold", "black", "heavy", "semibold", "demi"]
        .iter()
        .any(|weight| name.contains(weight))
}

/// A text line composed of runs on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The runs in this line, sorted by X position
    pub runs: Vec<GlyphRun>,
    /// Y position (baseline)
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
    /// Font size carrying the most characters
    pub font_size: f32,
}

impl TextLine {
    /// Create a line from runs.
    pub fn from_runs(mut runs: Vec<GlyphRun>) -> Self {
        runs.sort_by(|a, b| a.x.total_cmp(&b.x));

        let mut chars_by_size: Vec<(f32, usize)> = Vec::new();
        for run in &runs {
            let chars = run.text.chars().count();
            match chars_by_size
                .iter_mut()
                .find(|(size, _)| (size - run.font_size).abs() < 0.05)
            {
                Some((_, count)) => *count += chars,
                None => chars_by_size.push((run.font_size, chars)),
            }
        }
        let font_size = chars_by_size
            .iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(a.0.total_cmp(&b.0)))
            .map(|(size, _)| *size)
            .unwrap_or(0.0);

        let (x, y) = runs.first().map(|r| (r.x, r.y)).unwrap_or((0.0, 0.0));

        Self {
            runs,
            y,
            x,
            font_size,
        }
    }

    /// Combined text of all runs, with spaces inserted at visible gaps.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, run) in self.runs.iter().enumerate() {
            if i > 0 {
                let prev = &self.runs[i - 1];
                let gap = run.x - (prev.x + prev.width);
                let threshold = run.font_size * GLYPH_WIDTH_RATIO * 0.2;

                let spaceless = prev
                    .text
                    .chars()
                    .last()
                    .zip(run.text.chars().next())
                    .map(|(a, b)| is_spaceless_script_char(a) && is_spaceless_script_char(b))
                    .unwrap_or(false);
                let is_space = |c: char| c == ' ' || c == '\u{00A0}';
                let has_space = prev.text.ends_with(is_space) || run.text.starts_with(is_space);

                if gap > threshold && !spaceless && !has_space {
                    result.push(' ');
                }
            }
            result.push_str(&run.text);
        }

        result
    }

    /// Whether more than half of the line's characters are bold.
    pub fn is_bold(&self) -> bool {
        let bold_chars: usize = self
            .runs
            .iter()
            .filter(|r| r.is_bold)
            .map(|r| r.text.chars().count())
            .sum();
        let total_chars: usize = self.runs.iter().map(|r| r.text.chars().count()).sum();
        total_chars > 0 && bold_chars * 2 > total_chars
    }
}

/// Text positioning state within a BT/ET block.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    /// Start of the current line (X translation)
    e: f32,
    /// Start of the current line (Y translation)
    f: f32,
    /// Horizontal advance since the start of the line, in text space
    advance: f32,
    /// Text leading set by TL/TD
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            advance: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.advance = 0.0;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
        self.advance = 0.0;
    }

    fn next_line(&mut self, font_size: f32) {
        let leading = if self.leading > 0.0 {
            self.leading
        } else {
            font_size * 1.2
        };
        self.translate(0.0, -leading);
    }

    fn advance_by(&mut self, amount: f32) {
        self.advance += amount;
    }

    fn position(&self) -> (f32, f32) {
        (
            self.e + self.advance * self.a,
            self.f + self.advance * self.b,
        )
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Interpret one page's content stream into glyph runs.
///
/// `fonts` maps font resource names to base font names; `decode` turns a
/// string operand into text for a given font resource.
pub fn interpret_content(
    ops: &[ContentOp],
    fonts: &HashMap<Vec<u8>, String>,
    decode: &dyn Fn(&[u8], &[u8]) -> String,
) -> Vec<GlyphRun> {
    let mut runs = Vec::new();
    let mut font_resource: Vec<u8> = Vec::new();
    let mut base_font = String::new();
    let mut font_size: f32 = 12.0;
    let mut matrix = TextMatrix::default();
    let mut in_text = false;

    for op in ops {
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                let leading = matrix.leading;
                matrix = TextMatrix::default();
                matrix.leading = leading;
            }
            "ET" => in_text = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    font_resource = name.clone();
                    base_font = fonts
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                }
                font_size = op.number(1, 12.0);
            }
            "TL" => matrix.leading = op.number(0, 0.0),
            "Td" => matrix.translate(op.number(0, 0.0), op.number(1, 0.0)),
            "TD" => {
                let ty = op.number(1, 0.0);
                matrix.leading = -ty;
                matrix.translate(op.number(0, 0.0), ty);
            }
            "Tm" if op.operands.len() >= 6 => matrix.set(
                op.number(0, 1.0),
                op.number(1, 0.0),
                op.number(2, 0.0),
                op.number(3, 1.0),
                op.number(4, 0.0),
                op.number(5, 0.0),
            ),
            "T*" => matrix.next_line(font_size),
            "Tj" | "TJ" | "'" | "\"" => {
                if matches!(op.operator.as_str(), "'" | "\"") {
                    matrix.next_line(font_size);
                }
                if !in_text {
                    continue;
                }

                let (text, advance) = match op.operator.as_str() {
                    "TJ" => match op.operands.first() {
                        Some(PdfValue::Array(items)) => {
                            show_array(items, &font_resource, font_size, decode)
                        }
                        _ => continue,
                    },
                    operator => {
                        let idx = if operator == "\"" { 2 } else { 0 };
                        match op.operands.get(idx) {
                            Some(PdfValue::Str(bytes)) => {
                                let text = decode(&font_resource, bytes);
                                let advance = glyph_advance(&text, font_size);
                                (text, advance)
                            }
                            _ => continue,
                        }
                    }
                };

                if !text.trim().is_empty() {
                    let (x, y) = matrix.position();
                    runs.push(GlyphRun::new(
                        text,
                        x,
                        y,
                        font_size * matrix.scale(),
                        &base_font,
                    ));
                }
                matrix.advance_by(advance);
            }
            _ => {}
        }
    }

    runs
}

fn glyph_advance(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * GLYPH_WIDTH_RATIO
}

/// Decode a TJ array, inserting spaces at large positioning adjustments.
fn show_array(
    items: &[PdfValue],
    font_resource: &[u8],
    font_size: f32,
    decode: &dyn Fn(&[u8], &[u8]) -> String,
) -> (String, f32) {
    let mut combined = String::new();
    let mut advance = 0.0;

    for item in items {
        match item {
            PdfValue::Str(bytes) => {
                let decoded = decode(font_resource, bytes);
                advance += glyph_advance(&decoded, font_size);
                combined.push_str(&decoded);
            }
            PdfValue::Integer(_) | PdfValue::Real(_) => {
                // Negative values move the next glyph to the right.
                let adjustment = -item.as_number().unwrap_or(0.0);
                advance += adjustment / 1000.0 * font_size;
                let ends_spaceless = combined
                    .chars()
                    .last()
                    .map(|c| c.is_whitespace() || is_spaceless_script_char(c))
                    .unwrap_or(true);
                if adjustment > TJ_SPACE_THRESHOLD && !ends_spaceless {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }

    (combined, advance)
}

/// Group runs into lines by baseline, top to bottom.
pub fn group_runs_into_lines(mut runs: Vec<GlyphRun>) -> Vec<TextLine> {
    // PDF Y grows upwards; read from the top.
    runs.sort_by(|a, b| match b.y.total_cmp(&a.y) {
        Ordering::Equal => a.x.total_cmp(&b.x),
        other => other,
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<GlyphRun> = Vec::new();
    let mut current_y: Option<f32> = None;

    for run in runs {
        let tolerance = run.font_size * 0.3;
        match current_y {
            Some(y) if (run.y - y).abs() <= tolerance => current.push(run),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_runs(std::mem::take(&mut current)));
                }
                current_y = Some(run.y);
                current.push(run);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_runs(current));
    }

    lines
}

/// Assign a block index to each line.
///
/// A new block starts after a large vertical gap, a font size change, or a
/// line indented further than the one before it. Returning to the left margin
/// continues the block, so a paragraph keeps its indented first line.
pub fn assign_blocks(lines: &[TextLine]) -> Vec<u32> {
    let avg_spacing = average_line_spacing(lines);
    let mut block = 0;

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i > 0 && should_break_block(&lines[i - 1], line, avg_spacing) {
                block += 1;
            }
            block
        })
        .collect()
}

fn average_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev: &TextLine, curr: &TextLine, avg_spacing: f32) -> bool {
    let spacing = (prev.y - curr.y).abs();
    spacing > avg_spacing * 1.5
        || (prev.font_size - curr.font_size).abs() > 1.0
        || curr.x - prev.x > 20.0
}

/// Turn a page's glyph runs into spans in reading order.
pub fn page_spans(runs: Vec<GlyphRun>, page: u32) -> Vec<TextSpan> {
    let lines = group_runs_into_lines(runs);
    let blocks = assign_blocks(&lines);

    lines
        .iter()
        .zip(blocks)
        .map(|(line, block)| TextSpan {
            text: line.text(),
            font_size: line.font_size,
            is_bold: line.is_bold(),
            page,
            y: line.y,
            block,
        })
        .filter(|span| !span.text.trim().is_empty())
        .collect()
}

/// Whether a character belongs to a script written without word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
