#![allow(dead_code)]

use std::fs;
use std::path::Path;

use actix_web::web;
use ensaio_local_server::docx::{
    write_document, Document, PageSetup, Paragraph, Run, Table, TableCell, TableRow,
};
use ensaio_local_server::{AppConfig, AppState};
use tempfile::TempDir;

pub const TEMPLATE_FILE: &str = "Comparecimento ensaio local.docx";

/// A comparecimento-like template: the date in a top-level paragraph split
/// across two runs and again inside a table cell.
pub fn comparecimento_template() -> Document {
    let mut document = Document::new(PageSetup::default());
    document.add_paragraph(Paragraph::with_text("COMPARECIMENTO"));

    let mut dated = Paragraph::new();
    dated.add_run(Run::new("Ensaio local em 07/0"));
    dated.add_run(Run::new("9/2025 às 17h"));
    document.add_paragraph(dated);

    document.add_table(Table {
        columns: vec![4000, 4000],
        rows: vec![TableRow {
            cells: vec![
                TableCell {
                    width: Some(4000),
                    paragraphs: vec![Paragraph::with_text("Data")],
                },
                TableCell {
                    width: Some(4000),
                    paragraphs: vec![Paragraph::with_text("07/09/2025")],
                },
            ],
            ..Default::default()
        }],
        ..Default::default()
    });
    document
}

pub fn write_template(dir: &Path) -> std::path::PathBuf {
    let path = dir.join(TEMPLATE_FILE);
    let bytes = write_document(&comparecimento_template()).expect("Failed to write template");
    fs::write(&path, bytes).expect("Failed to store template");
    path
}

/// App state rooted in a fresh temporary directory holding the form page and,
/// optionally, the comparecimento template.
pub fn setup_test_app_state(with_template: bool) -> (TempDir, web::Data<AppState>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("index.html"), "<html>form</html>").expect("Failed to write index");

    let template = if with_template {
        write_template(dir.path())
    } else {
        dir.path().join(TEMPLATE_FILE)
    };

    let config = AppConfig {
        static_dir: dir.path().to_path_buf(),
        comparecimento_template: template,
        ..AppConfig::default()
    };
    (dir, web::Data::new(AppState::new(config)))
}
