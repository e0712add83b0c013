//! Generator for the musicians/organists attendance list.
//!
//! The document has two sections separated by a page break. Each section is a
//! centered header block followed by a fixed-layout name/signature table.

use crate::config::AttendanceLayout;
use crate::docx::{
    pt_to_half_points, pt_to_twentieths, write_document, Alignment, Document, Paragraph,
    ParagraphFormat, Run, RunFormat, Table, TableCell, TableRow,
};

use super::models::{AttendanceRequest, AttendanceSheet};
use super::traits::Generator;
use super::{GeneratedDocument, GenerationError, ATTENDANCE_FILENAME};

/// Blank rows appended after the names when the caller does not choose a count.
pub const DEFAULT_PADDING_ROWS: usize = 20;

const MUSICIANS_TITLE: &str = "MÚSICOS";
const ORGANISTS_TITLE: &str = "ORGANISTAS";

/// Builder for one name/signature table.
pub struct SignatureTable<'a> {
    layout: &'a AttendanceLayout,
    name_title: String,
    padding_rows: usize,
}

impl<'a> SignatureTable<'a> {
    pub fn new(layout: &'a AttendanceLayout, name_title: impl Into<String>) -> Self {
        Self {
            layout,
            name_title: name_title.into(),
            padding_rows: DEFAULT_PADDING_ROWS,
        }
    }

    pub fn padding_rows(mut self, count: usize) -> Self {
        self.padding_rows = count;
        self
    }

    /// One header row, one row per name, then the padding rows.
    pub fn build(&self, names: &[String]) -> Table {
        let [name_width, signature_width] = self.layout.column_widths();
        let mut table = Table {
            style: Some(self.layout.table_style.clone()),
            width: Some(self.layout.table_width()),
            fixed_layout: true,
            columns: vec![name_width, signature_width],
            rows: Vec::with_capacity(names.len() + self.padding_rows + 1),
        };

        table.add_row(self.header_row(name_width, signature_width));
        for name in names {
            table.add_row(self.body_row(name.trim(), name_width, signature_width));
        }
        for _ in 0..self.padding_rows {
            table.add_row(self.body_row("", name_width, signature_width));
        }
        table
    }

    fn header_row(&self, name_width: u32, signature_width: u32) -> TableRow {
        let cell = |title: &str, width: u32| {
            let format = ParagraphFormat {
                alignment: Some(Alignment::Center),
                keep_with_next: true,
                keep_together: true,
                ..Default::default()
            };
            let run = Run::new(title).with_format(RunFormat {
                font_name: Some(self.layout.font_name.clone()),
                size: Some(pt_to_half_points(self.layout.table_header_size_pt)),
                bold: true,
            });
            TableCell {
                width: Some(width),
                paragraphs: vec![Paragraph {
                    format,
                    runs: vec![run],
                }],
            }
        };

        TableRow {
            repeat_header: true,
            cant_split: false,
            cells: vec![
                cell(&self.name_title, name_width),
                cell(&self.layout.signature_title, signature_width),
            ],
        }
    }

    fn body_row(&self, name: &str, name_width: u32, signature_width: u32) -> TableRow {
        TableRow {
            repeat_header: false,
            cant_split: true,
            cells: vec![
                self.body_cell(name, Alignment::Left, name_width),
                self.body_cell("", Alignment::Center, signature_width),
            ],
        }
    }

    fn body_cell(&self, text: &str, alignment: Alignment, width: u32) -> TableCell {
        let spacing = pt_to_twentieths(self.layout.row_spacing_pt);
        let format = ParagraphFormat {
            alignment: Some(alignment),
            space_before: Some(spacing),
            space_after: Some(spacing),
            ..Default::default()
        };
        let run = Run::new(text).with_format(RunFormat {
            font_name: Some(self.layout.font_name.clone()),
            size: Some(pt_to_half_points(self.layout.row_size_pt)),
            bold: false,
        });
        TableCell {
            width: Some(width),
            paragraphs: vec![Paragraph {
                format,
                runs: vec![run],
            }],
        }
    }
}

/// Generator for `LISTA_ENSAIO_LOCAL_EDITADO.docx`.
#[derive(Debug, Clone, Default)]
pub struct AttendanceListGenerator {
    layout: AttendanceLayout,
}

impl AttendanceListGenerator {
    pub fn new(layout: AttendanceLayout) -> Self {
        Self { layout }
    }

    /// Build the in-memory document: musicians first, then organists.
    pub fn assemble(&self, sheet: &AttendanceSheet) -> Document {
        let mut document = Document::new(self.layout.page_setup());

        self.add_section(&mut document, &sheet.date_text, MUSICIANS_TITLE, &sheet.musicians);
        document.add_page_break();
        self.add_section(&mut document, &sheet.date_text, ORGANISTS_TITLE, &sheet.organists);

        document
    }

    fn add_section(&self, document: &mut Document, date_text: &str, title: &str, names: &[String]) {
        self.add_header(document, date_text, title);

        let table = SignatureTable::new(&self.layout, format!("{title} - NOME"))
            .padding_rows(self.layout.padding_rows)
            .build(names);
        document.add_table(table);
    }

    fn add_header(&self, document: &mut Document, date_text: &str, title: &str) {
        let layout = &self.layout;

        document.add_paragraph(self.centered(&layout.institution, layout.title_size_pt, true));
        document.add_paragraph(self.centered(
            &format!("{}{}", layout.subtitle_prefix, date_text),
            layout.subtitle_size_pt,
            false,
        ));
        document.add_paragraph(Paragraph::new());

        let mut heading = self.centered(title, layout.title_size_pt, true);
        heading.format.keep_with_next = true;
        document.add_paragraph(heading);
    }

    fn centered(&self, text: &str, size_pt: f64, bold: bool) -> Paragraph {
        let mut paragraph = Paragraph::new();
        paragraph.format.alignment = Some(Alignment::Center);
        paragraph.add_run(Run::new(text).with_format(RunFormat {
            font_name: Some(self.layout.font_name.clone()),
            size: Some(pt_to_half_points(size_pt)),
            bold,
        }));
        paragraph
    }
}

impl Generator<AttendanceRequest> for AttendanceListGenerator {
    fn generate(&self, request: AttendanceRequest) -> Result<GeneratedDocument, GenerationError> {
        let sheet = request.normalize();
        log::debug!(
            "Assembling attendance list: {} musicians, {} organists",
            sheet.musicians.len(),
            sheet.organists.len()
        );

        let bytes = write_document(&self.assemble(&sheet))?;

        Ok(GeneratedDocument {
            filename: ATTENDANCE_FILENAME,
            bytes,
        })
    }
}
