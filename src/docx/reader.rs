//! Parses `word/document.xml` back into the [`Document`] model.
//!
//! Only the properties the model knows about are read; everything else in the
//! part is ignored.

use roxmltree::Node;

use super::model::{
    Alignment, Block, Document, PageSetup, Paragraph, Run, RunFormat, Table, TableCell, TableRow,
};
use super::package::read_part_string;
use super::{DocxError, DOCUMENT_PART, W_NS};

/// Open `.docx` bytes and parse the main document part.
pub fn read_document(bytes: &[u8]) -> Result<Document, DocxError> {
    let xml = read_part_string(bytes, DOCUMENT_PART)?;
    parse_document_xml(&xml)
}

pub fn parse_document_xml(xml: &str) -> Result<Document, DocxError> {
    let tree = roxmltree::Document::parse(xml)?;
    let body = tree
        .root_element()
        .children()
        .find(|n| is_w(n, "body"))
        .ok_or_else(|| DocxError::MissingPart("w:body".to_string()))?;

    let mut document = Document::new(PageSetup::default());
    for node in body.children().filter(Node::is_element) {
        if is_w(&node, "p") {
            document.body.push(Block::Paragraph(parse_paragraph(node)));
        } else if is_w(&node, "tbl") {
            document.body.push(Block::Table(parse_table(node)));
        } else if is_w(&node, "sectPr") {
            document.page = parse_section(node, document.page);
        }
    }
    Ok(document)
}

fn is_w(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(W_NS)
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_w(n, name))
}

fn w_attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute((W_NS, name))
}

fn w_attr_u32(node: Node, name: &str) -> Option<u32> {
    w_attr(node, name).and_then(|v| v.parse().ok())
}

/// `w:ST_OnOff` toggle: present without a value means on.
fn is_on(node: Option<Node>) -> bool {
    match node {
        Some(n) => !matches!(w_attr(n, "val"), Some("0") | Some("false") | Some("off")),
        None => false,
    }
}

fn parse_section(node: Node, fallback: PageSetup) -> PageSetup {
    let mut page = fallback;
    if let Some(size) = child(node, "pgSz") {
        page.width = w_attr_u32(size, "w").unwrap_or(page.width);
        page.height = w_attr_u32(size, "h").unwrap_or(page.height);
    }
    if let Some(margins) = child(node, "pgMar") {
        page.margin_top = w_attr_u32(margins, "top").unwrap_or(page.margin_top);
        page.margin_bottom = w_attr_u32(margins, "bottom").unwrap_or(page.margin_bottom);
        page.margin_left = w_attr_u32(margins, "left").unwrap_or(page.margin_left);
        page.margin_right = w_attr_u32(margins, "right").unwrap_or(page.margin_right);
    }
    page
}

fn parse_paragraph(node: Node) -> Paragraph {
    let mut paragraph = Paragraph::new();

    if let Some(props) = child(node, "pPr") {
        let format = &mut paragraph.format;
        format.keep_with_next = is_on(child(props, "keepNext"));
        format.keep_together = is_on(child(props, "keepLines"));
        if let Some(spacing) = child(props, "spacing") {
            format.space_before = w_attr_u32(spacing, "before");
            format.space_after = w_attr_u32(spacing, "after");
        }
        format.alignment = child(props, "jc")
            .and_then(|jc| w_attr(jc, "val"))
            .and_then(Alignment::from_xml);
    }

    collect_runs(node, &mut paragraph.runs);
    paragraph
}

/// Runs may sit directly in the paragraph or one level down inside inline
/// containers such as hyperlinks and tracked insertions.
fn collect_runs(node: Node, runs: &mut Vec<Run>) {
    for item in node.children().filter(Node::is_element) {
        if is_w(&item, "r") {
            runs.push(parse_run(item));
        } else if ["hyperlink", "ins", "smartTag", "fldSimple"]
            .iter()
            .any(|name| is_w(&item, name))
        {
            collect_runs(item, runs);
        }
    }
}

fn parse_run(node: Node) -> Run {
    let mut run = Run::default();

    if let Some(props) = child(node, "rPr") {
        run.format = RunFormat {
            font_name: child(props, "rFonts")
                .and_then(|f| w_attr(f, "ascii").or_else(|| w_attr(f, "hAnsi")))
                .map(str::to_string),
            size: child(props, "sz").and_then(|sz| w_attr_u32(sz, "val")),
            bold: is_on(child(props, "b")),
        };
    }

    for item in node.children().filter(Node::is_element) {
        if is_w(&item, "t") {
            run.text.push_str(item.text().unwrap_or_default());
        } else if is_w(&item, "tab") {
            run.text.push('\t');
        } else if is_w(&item, "br") {
            if w_attr(item, "type") == Some("page") {
                run.page_break = true;
            } else {
                run.text.push('\n');
            }
        }
    }

    run
}

fn parse_table(node: Node) -> Table {
    let mut table = Table::default();

    if let Some(props) = child(node, "tblPr") {
        table.style = child(props, "tblStyle")
            .and_then(|s| w_attr(s, "val"))
            .map(str::to_string);
        table.width = child(props, "tblW")
            .filter(|w| w_attr(*w, "type") == Some("dxa"))
            .and_then(|w| w_attr_u32(w, "w"));
        table.fixed_layout = child(props, "tblLayout")
            .and_then(|l| w_attr(l, "type"))
            .map_or(false, |t| t == "fixed");
    }

    if let Some(grid) = child(node, "tblGrid") {
        table.columns = grid
            .children()
            .filter(|n| is_w(n, "gridCol"))
            .filter_map(|col| w_attr_u32(col, "w"))
            .collect();
    }

    for row_node in node.children().filter(|n| is_w(n, "tr")) {
        let mut row = TableRow::default();
        if let Some(props) = child(row_node, "trPr") {
            row.cant_split = is_on(child(props, "cantSplit"));
            row.repeat_header = is_on(child(props, "tblHeader"));
        }
        for cell_node in row_node.children().filter(|n| is_w(n, "tc")) {
            let width = child(cell_node, "tcPr")
                .and_then(|p| child(p, "tcW"))
                .and_then(|w| w_attr_u32(w, "w"));
            let paragraphs = cell_node
                .children()
                .filter(|n| is_w(n, "p"))
                .map(parse_paragraph)
                .collect();
            row.cells.push(TableCell { width, paragraphs });
        }
        table.rows.push(row);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:pPr><w:keepNext/><w:jc w:val="center"/></w:pPr>
      <w:r><w:rPr><w:rFonts w:ascii="Cambria" w:hAnsi="Cambria"/><w:b w:val="0"/><w:sz w:val="24"/></w:rPr><w:t>Data: 07/09</w:t></w:r>
      <w:hyperlink><w:r><w:t>/2025</w:t></w:r></w:hyperlink>
    </w:p>
    <w:tbl>
      <w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr>
      <w:tr><w:trPr><w:tblHeader/></w:trPr><w:tc><w:p><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t></w:r></w:p></w:tc></w:tr>
    </w:tbl>
    <w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="720" w:bottom="1440" w:left="720"/></w:sectPr>
  </w:body>
</w:document>"#;

    #[test]
    fn test_parse_paragraph_properties_and_runs() {
        let doc = parse_document_xml(SAMPLE).unwrap();
        let paragraph = doc.paragraphs().next().unwrap();

        assert!(paragraph.format.keep_with_next);
        assert_eq!(paragraph.format.alignment, Some(Alignment::Center));
        assert_eq!(paragraph.runs.len(), 2);
        assert_eq!(paragraph.text(), "Data: 07/09/2025");

        let first = &paragraph.runs[0].format;
        assert_eq!(first.font_name.as_deref(), Some("Cambria"));
        assert_eq!(first.size, Some(24));
        assert!(!first.bold);
    }

    #[test]
    fn test_parse_table_and_section() {
        let doc = parse_document_xml(SAMPLE).unwrap();
        let table = doc.tables().next().unwrap();

        assert_eq!(table.width, None);
        assert!(!table.fixed_layout);
        assert!(table.rows[0].repeat_header);
        assert_eq!(table.rows[0].cells[0].text(), "A\tB");
        assert_eq!(doc.page.width, 12240);
        assert_eq!(doc.page.margin_left, 720);
    }

    #[test]
    fn test_missing_body_is_an_error() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;
        assert!(matches!(
            parse_document_xml(xml),
            Err(DocxError::MissingPart(_))
        ));
    }
}
