//! Fixed-flow page layout on top of `lopdf`.
//!
//! A document is a sequence of [`Block`]s laid top to bottom. Lines wider than
//! the printable area wrap at word boundaries and a new page starts whenever
//! the cursor would pass the bottom margin. Text uses the standard Type1
//! Helvetica faces so no font file is embedded.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::common::encode_win_ansi;

pub const A4_WIDTH: f32 = 595.0;
pub const A4_HEIGHT: f32 = 842.0;
pub const DEFAULT_MARGIN: f32 = 50.0;

/// Distance between consecutive baselines, relative to the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;
/// Helvetica ascender, relative to the font size.
const ASCENT_FACTOR: f32 = 0.718;
const UNDERLINE_OFFSET: f32 = 2.0;
const UNDERLINE_WIDTH: f32 = 0.75;
const FALLBACK_GLYPH_WIDTH: u16 = 556;

// Glyph advance widths (1/1000 em) for ASCII 0x20..=0x7E.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a..m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n..z
    389, 280, 389, 584, // {..~
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
        }
    }

    fn glyph_width(self, ch: char) -> u16 {
        let table = match self {
            Font::Regular => &HELVETICA_WIDTHS,
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        match u32::from(ch) {
            code @ 0x20..=0x7e => table[(code - 0x20) as usize],
            _ => FALLBACK_GLYPH_WIDTH,
        }
    }

    /// Rendered width of `text` in points at `size`.
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|ch| u32::from(self.glyph_width(ch))).sum();
        units as f32 * size / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub font: Font,
    pub text: String,
}

/// One line of text made of differently styled runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub spans: Vec<Span>,
    pub size: f32,
    pub align: Align,
    pub underline: bool,
}

impl Line {
    pub fn new(font: Font, text: impl Into<String>, size: f32) -> Self {
        Self {
            spans: vec![Span {
                font,
                text: text.into(),
            }],
            size,
            align: Align::Left,
            underline: false,
        }
    }

    /// Bold label followed by a regular value, e.g. "Gender: Male".
    pub fn labelled(label: &str, value: &str, size: f32) -> Self {
        let mut line = Self::new(Font::Bold, label, size);
        line.spans.push(Span {
            font: Font::Regular,
            text: format!(" {}", value),
        });
        line
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn width(&self) -> f32 {
        self.spans
            .iter()
            .map(|span| span.font.text_width(&span.text, self.size))
            .sum()
    }

    /// Plain text of the line, styles dropped.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    fn empty_like(&self) -> Self {
        Self {
            spans: Vec::new(),
            size: self.size,
            align: self.align,
            underline: self.underline,
        }
    }

    fn push_text(&mut self, font: Font, text: &str) {
        match self.spans.last_mut() {
            Some(last) if last.font == font => last.text.push_str(text),
            _ => self.spans.push(Span {
                font,
                text: text.to_string(),
            }),
        }
    }

    /// Split into lines no wider than `max_width`, breaking between words.
    /// Words wider than a whole line are broken between characters.
    pub fn wrap(&self, max_width: f32) -> Vec<Line> {
        if self.width() <= max_width {
            return vec![self.clone()];
        }

        let mut lines = Vec::new();
        let mut current = self.empty_like();
        let mut current_width = 0.0;

        for span in &self.spans {
            for word in span.text.split_whitespace() {
                for piece in split_to_width(span.font, word, self.size, max_width) {
                    let separator = if current.spans.is_empty() { "" } else { " " };
                    let piece_width = span.font.text_width(separator, self.size)
                        + span.font.text_width(&piece, self.size);

                    if !current.spans.is_empty() && current_width + piece_width > max_width {
                        lines.push(std::mem::replace(&mut current, self.empty_like()));
                        current_width = 0.0;
                        current.push_text(span.font, &piece);
                        current_width += span.font.text_width(&piece, self.size);
                    } else {
                        current.push_text(span.font, &format!("{}{}", separator, piece));
                        current_width += piece_width;
                    }
                }
            }
        }

        if !current.spans.is_empty() {
            lines.push(current);
        }
        lines
    }
}

fn split_to_width(font: Font, word: &str, size: f32, max_width: f32) -> Vec<String> {
    if font.text_width(word, size) <= max_width {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0;
    for ch in word.chars() {
        let ch_width = f32::from(font.glyph_width(ch)) * size / 1000.0;
        if !piece.is_empty() && width + ch_width > max_width {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(ch);
        width += ch_width;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Line(Line),
    /// Vertical space in points.
    Gap(f32),
}

impl Block {
    /// Vertical space of `lines` lines at font `size`.
    pub fn move_down(lines: f32, size: f32) -> Self {
        Block::Gap(lines * size * LINE_HEIGHT_FACTOR)
    }
}

impl From<Line> for Block {
    fn from(line: Line) -> Self {
        Block::Line(line)
    }
}

/// A line with its final position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub line: Line,
    pub x: f32,
    pub baseline: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            margin: DEFAULT_MARGIN,
        }
    }
}

impl PageLayout {
    pub fn printable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Position every line, starting new pages as needed. Always yields at least one page.
    pub fn paginate(&self, blocks: &[Block]) -> Vec<Page> {
        let top = self.height - self.margin;
        let mut pages = Vec::new();
        let mut page = Page::default();
        let mut cursor = top;

        for block in blocks {
            match block {
                Block::Gap(points) => {
                    cursor -= points;
                    if cursor < self.margin {
                        pages.push(std::mem::take(&mut page));
                        cursor = top;
                    }
                }
                Block::Line(line) => {
                    for wrapped in line.wrap(self.printable_width()) {
                        let advance = wrapped.size * LINE_HEIGHT_FACTOR;
                        if cursor - advance < self.margin && !page.lines.is_empty() {
                            pages.push(std::mem::take(&mut page));
                            cursor = top;
                        }

                        let x = match wrapped.align {
                            Align::Left => self.margin,
                            Align::Center => {
                                self.margin
                                    + (self.printable_width() - wrapped.width()).max(0.0) / 2.0
                            }
                        };
                        let baseline = cursor - wrapped.size * ASCENT_FACTOR;
                        page.lines.push(PlacedLine {
                            line: wrapped,
                            x,
                            baseline,
                        });
                        cursor -= advance;
                    }
                }
            }
        }

        if !page.lines.is_empty() || pages.is_empty() {
            pages.push(page);
        }
        pages
    }

    /// Lay out `blocks` and assemble an uncompressed PDF document.
    pub fn build_document(&self, blocks: &[Block], title: &str) -> Result<Document, lopdf::Error> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for font in [Font::Regular, Font::Bold] {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        let mut kids: Vec<Object> = Vec::new();
        for page in self.paginate(blocks) {
            let content = Content {
                operations: page_operations(&page),
            };
            let content_id = doc.add_object(
                Stream::new(lopdf::Dictionary::new(), content.encode()?).with_compression(false),
            );
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), self.width.into(), self.height.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_win_ansi(title)),
            "Producer" => Object::string_literal("birth-certificate-server"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        Ok(doc)
    }
}

fn page_operations(page: &Page) -> Vec<Operation> {
    let mut operations = Vec::new();

    for placed in &page.lines {
        let line = &placed.line;
        operations.push(Operation::new("BT", vec![]));
        for (index, span) in line.spans.iter().enumerate() {
            operations.push(Operation::new(
                "Tf",
                vec![span.font.resource_name().into(), line.size.into()],
            ));
            if index == 0 {
                operations.push(Operation::new(
                    "Td",
                    vec![placed.x.into(), placed.baseline.into()],
                ));
            }
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(encode_win_ansi(&span.text))],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        if line.underline {
            let y = placed.baseline - UNDERLINE_OFFSET;
            operations.push(Operation::new("w", vec![UNDERLINE_WIDTH.into()]));
            operations.push(Operation::new("m", vec![placed.x.into(), y.into()]));
            operations.push(Operation::new(
                "l",
                vec![(placed.x + line.width()).into(), y.into()],
            ));
            operations.push(Operation::new("S", vec![]));
        }
    }

    operations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_uses_glyph_metrics() {
        // "i" is much narrower than "m" in Helvetica
        assert!(Font::Regular.text_width("iii", 12.0) < Font::Regular.text_width("mmm", 12.0));
        assert!(Font::Bold.text_width("Aarav", 12.0) > Font::Regular.text_width("Aarav", 12.0));
        assert_eq!(Font::Regular.text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_short_line_is_not_wrapped() {
        let line = Line::labelled("Gender:", "Male", 12.0);
        let wrapped = line.wrap(495.0);
        assert_eq!(wrapped, vec![line]);
    }

    #[test]
    fn test_long_line_wraps_within_width() {
        let value = "Municipal Corporation of Greater Mumbai Registration Office ".repeat(4);
        let line = Line::labelled("Issuing Authority:", value.trim(), 12.0);
        let wrapped = line.wrap(200.0);

        assert!(wrapped.len() > 1);
        for part in &wrapped {
            assert!(part.width() <= 200.0, "line too wide: {}", part.text());
        }
        assert_eq!(wrapped[0].spans[0].font, Font::Bold);
        assert!(wrapped[0].text().starts_with("Issuing Authority:"));
    }

    #[test]
    fn test_overlong_word_is_broken() {
        let line = Line::new(Font::Regular, "X".repeat(200), 12.0);
        let wrapped = line.wrap(100.0);
        assert!(wrapped.len() > 1);
        let rejoined: String = wrapped.iter().map(Line::text).collect();
        assert_eq!(rejoined, "X".repeat(200));
    }

    #[test]
    fn test_paginate_starts_new_page_at_bottom_margin() {
        let layout = PageLayout::default();
        let blocks: Vec<Block> = (0..120)
            .map(|i| Line::new(Font::Regular, format!("Row {}", i), 12.0).into())
            .collect();

        let pages = layout.paginate(&blocks);
        assert!(pages.len() >= 2);
        let total: usize = pages.iter().map(|p| p.lines.len()).sum();
        assert_eq!(total, 120);
        for page in &pages {
            for placed in &page.lines {
                assert!(placed.baseline >= layout.margin - 12.0);
                assert!(placed.baseline <= layout.height - layout.margin);
            }
        }
    }

    #[test]
    fn test_paginate_empty_yields_one_page() {
        let pages = PageLayout::default().paginate(&[]);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }

    #[test]
    fn test_centered_line_is_centered() {
        let layout = PageLayout::default();
        let line = Line::new(Font::Bold, "BIRTH CERTIFICATE", 24.0).centered();
        let width = line.width();
        let pages = layout.paginate(&[line.into()]);
        let placed = &pages[0].lines[0];
        let right_gap = layout.width - (placed.x + width);
        assert!((placed.x - right_gap).abs() < 0.01);
    }

    #[test]
    fn test_build_document_counts_pages() {
        let layout = PageLayout::default();
        let blocks: Vec<Block> = (0..120)
            .map(|i| Line::new(Font::Regular, format!("Row {}", i), 12.0).into())
            .collect();

        let doc = layout.build_document(&blocks, "Test").unwrap();
        assert_eq!(doc.get_pages().len(), layout.paginate(&blocks).len());
    }
}
