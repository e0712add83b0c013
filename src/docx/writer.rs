//! Serializes a [`Document`] into a complete `.docx` package held in memory.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::model::{Block, Document, PageSetup, Paragraph, Run, Table};
use super::package::{write_parts, Part};
use super::{DocxError, DOCUMENT_PART, W_NS};

const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const APP_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>ensaio-local-server</Application></Properties>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="pt-BR"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/><w:uiPriority w:val="99"/><w:semiHidden/><w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/><w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:basedOn w:val="TableNormal"/><w:uiPriority w:val="59"/><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr></w:style></w:styles>"#;

/// Serialize the document into `.docx` bytes.
pub fn write_document(document: &Document) -> Result<Vec<u8>, DocxError> {
    let document_xml = document_xml(document)?;

    let parts: Vec<Part> = vec![
        ("[Content_Types].xml".to_string(), CONTENT_TYPES.as_bytes().to_vec()),
        ("_rels/.rels".to_string(), PACKAGE_RELS.as_bytes().to_vec()),
        ("docProps/core.xml".to_string(), core_properties().into_bytes()),
        ("docProps/app.xml".to_string(), APP_PROPS.as_bytes().to_vec()),
        (DOCUMENT_PART.to_string(), document_xml),
        ("word/_rels/document.xml.rels".to_string(), DOCUMENT_RELS.as_bytes().to_vec()),
        ("word/styles.xml".to_string(), STYLES.as_bytes().to_vec()),
    ];

    write_parts(&parts)
}

/// Render only the `word/document.xml` part.
pub fn document_xml(document: &Document) -> Result<Vec<u8>, DocxError> {
    let mut out = XmlOut::new();
    out.decl()?;
    out.start("w:document", &[("xmlns:w", W_NS), ("xmlns:r", R_NS)])?;
    out.start("w:body", &[])?;

    for block in &document.body {
        match block {
            Block::Paragraph(p) => write_paragraph(&mut out, p)?,
            Block::Table(t) => write_table(&mut out, t)?,
        }
    }

    write_section(&mut out, &document.page)?;
    out.end("w:body")?;
    out.end("w:document")?;
    Ok(out.into_inner())
}

fn core_properties() -> String {
    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:creator>ensaio-local-server</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified></cp:coreProperties>"#
    )
}

fn write_section(out: &mut XmlOut, page: &PageSetup) -> Result<(), DocxError> {
    let width = page.width.to_string();
    let height = page.height.to_string();
    let top = page.margin_top.to_string();
    let right = page.margin_right.to_string();
    let bottom = page.margin_bottom.to_string();
    let left = page.margin_left.to_string();

    out.start("w:sectPr", &[])?;
    out.empty("w:pgSz", &[("w:w", &width), ("w:h", &height)])?;
    out.empty(
        "w:pgMar",
        &[
            ("w:top", &top),
            ("w:right", &right),
            ("w:bottom", &bottom),
            ("w:left", &left),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    out.end("w:sectPr")
}

fn write_paragraph(out: &mut XmlOut, paragraph: &Paragraph) -> Result<(), DocxError> {
    out.start("w:p", &[])?;

    let format = &paragraph.format;
    if !format.is_empty() {
        out.start("w:pPr", &[])?;
        if format.keep_with_next {
            out.empty("w:keepNext", &[])?;
        }
        if format.keep_together {
            out.empty("w:keepLines", &[])?;
        }
        if format.space_before.is_some() || format.space_after.is_some() {
            let before = format.space_before.map(|v| v.to_string());
            let after = format.space_after.map(|v| v.to_string());
            let mut attrs: Vec<(&str, &str)> = Vec::new();
            if let Some(before) = before.as_deref() {
                attrs.push(("w:before", before));
            }
            if let Some(after) = after.as_deref() {
                attrs.push(("w:after", after));
            }
            out.empty("w:spacing", &attrs)?;
        }
        if let Some(alignment) = format.alignment {
            out.empty("w:jc", &[("w:val", alignment.as_xml())])?;
        }
        out.end("w:pPr")?;
    }

    for run in &paragraph.runs {
        write_run(out, run)?;
    }

    out.end("w:p")
}

fn write_run(out: &mut XmlOut, run: &Run) -> Result<(), DocxError> {
    out.start("w:r", &[])?;

    let format = &run.format;
    if !format.is_empty() {
        out.start("w:rPr", &[])?;
        if let Some(font) = format.font_name.as_deref() {
            out.empty(
                "w:rFonts",
                &[("w:ascii", font), ("w:hAnsi", font), ("w:cs", font)],
            )?;
        }
        if format.bold {
            out.empty("w:b", &[])?;
        }
        if let Some(size) = format.size {
            let size = size.to_string();
            out.empty("w:sz", &[("w:val", &size)])?;
            out.empty("w:szCs", &[("w:val", &size)])?;
        }
        out.end("w:rPr")?;
    }

    if run.page_break {
        out.empty("w:br", &[("w:type", "page")])?;
    }
    if !run.page_break || !run.text.is_empty() {
        out.start("w:t", &[("xml:space", "preserve")])?;
        out.text(&run.text)?;
        out.end("w:t")?;
    }

    out.end("w:r")
}

fn write_table(out: &mut XmlOut, table: &Table) -> Result<(), DocxError> {
    out.start("w:tbl", &[])?;

    out.start("w:tblPr", &[])?;
    if let Some(style) = table.style.as_deref() {
        out.empty("w:tblStyle", &[("w:val", style)])?;
    }
    match table.width {
        Some(width) => {
            let width = width.to_string();
            out.empty("w:tblW", &[("w:w", &width), ("w:type", "dxa")])?;
        }
        None => out.empty("w:tblW", &[("w:w", "0"), ("w:type", "auto")])?,
    }
    if table.fixed_layout {
        out.empty("w:tblLayout", &[("w:type", "fixed")])?;
    }
    out.empty(
        "w:tblLook",
        &[
            ("w:val", "04A0"),
            ("w:firstRow", "1"),
            ("w:lastRow", "0"),
            ("w:firstColumn", "1"),
            ("w:lastColumn", "0"),
            ("w:noHBand", "0"),
            ("w:noVBand", "1"),
        ],
    )?;
    out.end("w:tblPr")?;

    out.start("w:tblGrid", &[])?;
    for column in &table.columns {
        let column = column.to_string();
        out.empty("w:gridCol", &[("w:w", &column)])?;
    }
    out.end("w:tblGrid")?;

    for row in &table.rows {
        out.start("w:tr", &[])?;
        if row.cant_split || row.repeat_header {
            out.start("w:trPr", &[])?;
            if row.cant_split {
                out.empty("w:cantSplit", &[])?;
            }
            if row.repeat_header {
                out.empty("w:tblHeader", &[])?;
            }
            out.end("w:trPr")?;
        }

        for cell in &row.cells {
            out.start("w:tc", &[])?;
            if let Some(width) = cell.width {
                let width = width.to_string();
                out.start("w:tcPr", &[])?;
                out.empty("w:tcW", &[("w:w", &width), ("w:type", "dxa")])?;
                out.end("w:tcPr")?;
            }
            if cell.paragraphs.is_empty() {
                // a cell must end with a paragraph
                out.empty("w:p", &[])?;
            }
            for paragraph in &cell.paragraphs {
                write_paragraph(out, paragraph)?;
            }
            out.end("w:tc")?;
        }

        out.end("w:tr")?;
    }

    out.end("w:tbl")
}

/// Thin wrapper over the quick-xml writer with element-level helpers.
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    fn decl(&mut self) -> Result<(), DocxError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(())
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), DocxError> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), DocxError> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), DocxError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), DocxError> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    fn into_inner(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}
