//! In-memory document tree.
//!
//! Lengths are twips and font sizes are half-points so the model maps onto the
//! package XML without any further conversion.

/// Paragraph horizontal alignment (`w:jc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Both,
}

impl Alignment {
    pub fn as_xml(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Both => "both",
        }
    }

    pub fn from_xml(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" | "end" => Some(Self::Right),
            "both" => Some(Self::Both),
            _ => None,
        }
    }
}

/// Page size and margins of the single document section, in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSetup {
    pub width: u32,
    pub height: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
    pub margin_right: u32,
}

impl PageSetup {
    /// Portrait A4 with the same margin on every side.
    pub fn a4(margin: u32) -> Self {
        Self {
            width: 11906,
            height: 16838,
            margin_top: margin,
            margin_bottom: margin,
            margin_left: margin,
            margin_right: margin,
        }
    }

    /// Width left between the left and right margins.
    pub fn usable_width(&self) -> u32 {
        self.width
            .saturating_sub(self.margin_left)
            .saturating_sub(self.margin_right)
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::a4(1440)
    }
}

/// Character formatting of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFormat {
    pub font_name: Option<String>,
    /// Size in half-points.
    pub size: Option<u32>,
    pub bold: bool,
}

impl RunFormat {
    pub fn is_empty(&self) -> bool {
        self.font_name.is_none() && self.size.is_none() && !self.bold
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub format: RunFormat,
    /// Run carries a `w:br w:type="page"` instead of (or before) its text.
    pub page_break: bool,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: RunFormat) -> Self {
        self.format = format;
        self
    }

    pub fn page_break() -> Self {
        Self {
            page_break: true,
            ..Default::default()
        }
    }
}

/// Paragraph-level properties (`w:pPr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphFormat {
    pub alignment: Option<Alignment>,
    pub keep_with_next: bool,
    pub keep_together: bool,
    /// Spacing in twentieths of a point.
    pub space_before: Option<u32>,
    pub space_after: Option<u32>,
}

impl ParagraphFormat {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub format: ParagraphFormat,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paragraph holding a single run of text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            format: ParagraphFormat::default(),
            runs: vec![Run::new(text)],
        }
    }

    pub fn add_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Concatenated text of every run.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn has_page_break(&self) -> bool {
        self.runs.iter().any(|r| r.page_break)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    /// Preferred width in twips (`w:tcW`).
    pub width: Option<u32>,
    pub paragraphs: Vec<Paragraph>,
}

impl TableCell {
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    /// Repeat this row at the top of every page the table spans.
    pub repeat_header: bool,
    /// Do not let the row break across pages.
    pub cant_split: bool,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub style: Option<String>,
    /// Total width in twips (`w:tblW` of type `dxa`).
    pub width: Option<u32>,
    pub fixed_layout: bool,
    /// Grid column widths in twips.
    pub columns: Vec<u32>,
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub page: PageSetup,
    pub body: Vec<Block>,
}

impl Document {
    pub fn new(page: PageSetup) -> Self {
        Self {
            page,
            body: Vec::new(),
        }
    }

    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.body.push(Block::Paragraph(paragraph));
    }

    pub fn add_table(&mut self, table: Table) {
        self.body.push(Block::Table(table));
    }

    /// Append a paragraph containing only a page break.
    pub fn add_page_break(&mut self) {
        self.add_paragraph(Paragraph {
            format: ParagraphFormat::default(),
            runs: vec![Run::page_break()],
        });
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    /// Split the body at page-break paragraphs. The break paragraph itself
    /// belongs to neither side.
    pub fn sections(&self) -> Vec<&[Block]> {
        let mut sections = Vec::new();
        let mut start = 0;
        for (idx, block) in self.body.iter().enumerate() {
            if let Block::Paragraph(p) = block {
                if p.has_page_break() {
                    sections.push(&self.body[start..idx]);
                    start = idx + 1;
                }
            }
        }
        sections.push(&self.body[start..]);
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_width_subtracts_side_margins() {
        let page = PageSetup::a4(850);
        assert_eq!(page.usable_width(), 11906 - 1700);
    }

    #[test]
    fn test_sections_split_on_page_break() {
        let mut doc = Document::new(PageSetup::default());
        doc.add_paragraph(Paragraph::with_text("first"));
        doc.add_page_break();
        doc.add_paragraph(Paragraph::with_text("second"));
        doc.add_table(Table::default());

        let sections = doc.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].len(), 1);
        assert_eq!(sections[1].len(), 2);
    }

    #[test]
    fn test_paragraph_text_joins_runs() {
        let mut p = Paragraph::new();
        p.add_run(Run::new("07/09"));
        p.add_run(Run::new("/2025"));
        assert_eq!(p.text(), "07/09/2025");
    }
}
