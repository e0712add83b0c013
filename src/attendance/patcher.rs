//! Literal date substitution inside an existing `.docx` template.
//!
//! `word/document.xml` is streamed with quick-xml. Every `w:p` (top-level or
//! inside a table cell) is buffered and inspected as a unit; paragraphs that do
//! not contain the target literal are written back event for event, so an
//! untouched template keeps its exact markup.
//!
//! Only `w:t` elements that are direct children of a `w:r` contribute text.
//! Runs nested in hyperlinks, fields or text boxes are left alone.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::config::{ComparecimentoStyle, PatchStrategy};
use crate::docx::package::{read_parts, write_parts};
use crate::docx::{DocxError, DOCUMENT_PART};

type Events = Vec<Event<'static>>;

/// `w:rPr` children in schema order. Elements not listed sort after these and
/// before `w:rPrChange`, which must stay last.
const RUN_PROPERTY_ORDER: &[&[u8]] = &[
    b"w:rStyle",
    b"w:rFonts",
    b"w:b",
    b"w:bCs",
    b"w:i",
    b"w:iCs",
    b"w:caps",
    b"w:smallCaps",
    b"w:strike",
    b"w:dstrike",
    b"w:outline",
    b"w:shadow",
    b"w:emboss",
    b"w:imprint",
    b"w:noProof",
    b"w:snapToGrid",
    b"w:vanish",
    b"w:webHidden",
    b"w:color",
    b"w:spacing",
    b"w:w",
    b"w:kern",
    b"w:position",
    b"w:sz",
    b"w:szCs",
    b"w:highlight",
    b"w:u",
    b"w:effect",
    b"w:bdr",
    b"w:shd",
    b"w:fitText",
    b"w:vertAlign",
    b"w:rtl",
    b"w:cs",
    b"w:em",
    b"w:lang",
    b"w:eastAsianLayout",
    b"w:specVanish",
    b"w:oMath",
];

/// Result of patching a template.
#[derive(Debug)]
pub struct PatchOutcome {
    pub bytes: Vec<u8>,
    /// Number of literal occurrences replaced across the document.
    pub replacements: usize,
}

pub struct TemplatePatcher<'a> {
    style: &'a ComparecimentoStyle,
}

impl<'a> TemplatePatcher<'a> {
    pub fn new(style: &'a ComparecimentoStyle) -> Self {
        Self { style }
    }

    /// Replace the template date with `new_text` in a whole package.
    ///
    /// When the literal is not found the template bytes are returned untouched.
    pub fn patch(&self, template: &[u8], new_text: &str) -> Result<PatchOutcome, DocxError> {
        let mut parts = read_parts(template)?;
        let part = parts
            .iter_mut()
            .find(|(name, _)| name == DOCUMENT_PART)
            .ok_or_else(|| DocxError::MissingPart(DOCUMENT_PART.to_string()))?;

        let xml = String::from_utf8(std::mem::take(&mut part.1))?;
        let (patched, replacements) = self.patch_xml(&xml, new_text)?;

        if replacements == 0 {
            return Ok(PatchOutcome {
                bytes: template.to_vec(),
                replacements,
            });
        }

        part.1 = patched.into_bytes();
        Ok(PatchOutcome {
            bytes: write_parts(&parts)?,
            replacements,
        })
    }

    /// Replace the template date inside a `word/document.xml` string.
    pub fn patch_xml(&self, xml: &str, new_text: &str) -> Result<(String, usize), DocxError> {
        let mut reader = Reader::from_str(xml);
        let mut writer = Writer::new(Vec::with_capacity(xml.len()));
        let mut paragraph: Events = Vec::new();
        let mut depth = 0usize;
        let mut replacements = 0;

        loop {
            let event = reader.read_event()?;
            if matches!(event, Event::Eof) {
                break;
            }

            let opens = matches!(&event, Event::Start(e) if e.name().as_ref() == b"w:p");
            let closes = matches!(&event, Event::End(e) if e.name().as_ref() == b"w:p");

            if opens {
                depth += 1;
                paragraph.push(event.into_owned());
            } else if closes && depth > 0 {
                depth -= 1;
                paragraph.push(event.into_owned());
                if depth == 0 {
                    let events = std::mem::take(&mut paragraph);
                    replacements += self.rewrite_paragraph(&events, new_text, &mut writer)?;
                }
            } else if depth > 0 {
                paragraph.push(event.into_owned());
            } else {
                writer.write_event(event)?;
            }
        }

        if depth != 0 {
            return Err(DocxError::Unbalanced("w:p"));
        }

        Ok((String::from_utf8(writer.into_inner())?, replacements))
    }

    fn rewrite_paragraph(
        &self,
        events: &[Event<'static>],
        new_text: &str,
        writer: &mut Writer<Vec<u8>>,
    ) -> Result<usize, DocxError> {
        let old = self.style.template_date.as_str();
        let nodes = parse_paragraph(events)?;
        let full_text: String = nodes
            .iter()
            .filter_map(|node| match node {
                Node::Run(run) => Some(run.text()),
                Node::Other(_) => None,
            })
            .collect();

        if old.is_empty() || !full_text.contains(old) {
            for event in events {
                writer.write_event(event.clone())?;
            }
            return Ok(0);
        }

        let matches: Vec<(usize, usize)> = full_text
            .match_indices(old)
            .map(|(start, m)| (start, start + m.len()))
            .collect();

        let rewritten = match self.style.strategy {
            PatchStrategy::RunAware => self.run_aware(events, &nodes, &matches, new_text)?,
            PatchStrategy::CollapseParagraph => {
                self.collapse(events, &nodes, &full_text.replace(old, new_text))?
            }
        };

        for event in rewritten {
            writer.write_event(event)?;
        }
        Ok(matches.len())
    }

    /// Cut runs at match boundaries: text outside a match keeps its run
    /// properties, each match becomes one new run carrying the style.
    fn run_aware(
        &self,
        events: &[Event<'static>],
        nodes: &[Node],
        matches: &[(usize, usize)],
        new_text: &str,
    ) -> Result<Events, DocxError> {
        let mut out = vec![events[0].clone()];
        let mut offset = 0usize;

        for node in nodes {
            let run = match node {
                Node::Other(group) => {
                    out.extend(group.iter().cloned());
                    continue;
                }
                Node::Run(run) => run,
            };

            let start = offset;
            let end = offset + run.text_len();
            offset = end;

            if !matches.iter().any(|&(ms, me)| ms < end && me > start) {
                out.extend(run.raw.iter().cloned());
                continue;
            }

            let mut pending: Vec<Piece> = Vec::new();
            let mut cursor = start;
            for piece in &run.pieces {
                let text = match piece {
                    Piece::Other(_) => {
                        pending.push(piece.clone());
                        continue;
                    }
                    Piece::Separator { text, .. } => {
                        pending.push(piece.clone());
                        cursor += text.len();
                        continue;
                    }
                    Piece::Text(text) => text,
                };

                let piece_start = cursor;
                let piece_end = cursor + text.len();
                while cursor < piece_end {
                    match matches.iter().find(|&&(ms, me)| ms <= cursor && cursor < me) {
                        Some(&(ms, me)) => {
                            if ms == cursor {
                                if !pending.is_empty() {
                                    out.extend(run.rebuild(&std::mem::take(&mut pending)));
                                }
                                out.extend(self.styled_run(run, new_text)?);
                            }
                            cursor = me.min(piece_end);
                        }
                        None => {
                            let next = matches
                                .iter()
                                .map(|&(ms, _)| ms)
                                .filter(|&ms| ms > cursor)
                                .min()
                                .unwrap_or(piece_end)
                                .min(piece_end);
                            pending.push(Piece::Text(
                                text[cursor - piece_start..next - piece_start].to_string(),
                            ));
                            cursor = next;
                        }
                    }
                }
            }

            if !pending.is_empty() {
                out.extend(run.rebuild(&pending));
            }
        }

        out.push(events[events.len() - 1].clone());
        Ok(out)
    }

    /// Keep the paragraph properties and replace all content with a single
    /// styled run holding the substituted text.
    fn collapse(
        &self,
        events: &[Event<'static>],
        nodes: &[Node],
        replaced: &str,
    ) -> Result<Events, DocxError> {
        let mut out = vec![events[0].clone()];
        for node in nodes {
            if let Node::Other(group) = node {
                if group.first().is_some_and(|e| is_element(e, b"w:pPr")) {
                    out.extend(group.iter().cloned());
                }
            }
        }

        let bare = RunNode {
            start: BytesStart::new("w:r"),
            props: Vec::new(),
            pieces: Vec::new(),
            raw: Vec::new(),
        };
        out.extend(self.styled_run(&bare, replaced)?);
        out.push(events[events.len() - 1].clone());
        Ok(out)
    }

    fn styled_run(&self, run: &RunNode, text: &str) -> Result<Events, DocxError> {
        let mut out = vec![Event::Start(run.start.clone())];
        out.extend(self.styled_props(&run.props)?);
        out.extend(run_content(text));
        out.push(Event::End(BytesEnd::new("w:r")));
        Ok(out)
    }

    /// Merge the configured font, size and weight into existing run properties.
    fn styled_props(&self, props: &[Event<'static>]) -> Result<Events, DocxError> {
        let mut children = match props.first() {
            Some(Event::Start(_)) if props.len() >= 2 => split_children(&props[1..props.len() - 1])?,
            _ => Vec::new(),
        };

        children.retain(|group| {
            !group.first().is_some_and(|e| {
                is_element(e, b"w:rFonts") || is_element(e, b"w:b") || is_element(e, b"w:sz")
            })
        });

        let font = self.style.font_name.as_str();
        let size = self.style.size_half_points().to_string();
        children.push(vec![Event::Empty(
            BytesStart::new("w:rFonts")
                .with_attributes([("w:ascii", font), ("w:hAnsi", font), ("w:cs", font)])
                .into_owned(),
        )]);
        let bold = if self.style.bold {
            BytesStart::new("w:b")
        } else {
            BytesStart::new("w:b").with_attributes([("w:val", "0")])
        };
        children.push(vec![Event::Empty(bold)]);
        children.push(vec![Event::Empty(
            BytesStart::new("w:sz")
                .with_attributes([("w:val", size.as_str())])
                .into_owned(),
        )]);

        children.sort_by_key(|group| group.first().map_or(usize::MAX, property_rank));

        let mut out = vec![Event::Start(BytesStart::new("w:rPr"))];
        out.extend(children.into_iter().flatten());
        out.push(Event::End(BytesEnd::new("w:rPr")));
        Ok(out)
    }
}

/// Top-level child of a buffered paragraph.
enum Node {
    Run(RunNode),
    Other(Events),
}

#[derive(Clone)]
enum Piece {
    Text(String),
    /// `w:tab`, `w:br` or `w:cr`: searched as `\t` / `\n`, written back as is.
    Separator { text: &'static str, events: Events },
    Other(Events),
}

struct RunNode {
    start: BytesStart<'static>,
    /// The `w:rPr` element, empty when the run has none.
    props: Events,
    pieces: Vec<Piece>,
    /// Original events, written back when the run is not touched.
    raw: Events,
}

impl RunNode {
    fn text(&self) -> String {
        self.pieces
            .iter()
            .filter_map(|p| match p {
                Piece::Text(t) => Some(t.as_str()),
                Piece::Separator { text, .. } => Some(*text),
                Piece::Other(_) => None,
            })
            .collect()
    }

    fn text_len(&self) -> usize {
        self.pieces
            .iter()
            .map(|p| match p {
                Piece::Text(t) => t.len(),
                Piece::Separator { text, .. } => text.len(),
                Piece::Other(_) => 0,
            })
            .sum()
    }

    /// Emit a copy of this run holding only `pieces`, with its own properties.
    fn rebuild(&self, pieces: &[Piece]) -> Events {
        let mut out = vec![Event::Start(self.start.clone())];
        out.extend(self.props.iter().cloned());
        for piece in pieces {
            match piece {
                Piece::Text(text) => out.extend(text_element(text)),
                Piece::Separator { events, .. } | Piece::Other(events) => {
                    out.extend(events.iter().cloned())
                }
            }
        }
        out.push(Event::End(BytesEnd::new("w:r")));
        out
    }
}

fn text_element(text: &str) -> Events {
    vec![
        Event::Start(BytesStart::new("w:t").with_attributes([("xml:space", "preserve")])),
        Event::Text(BytesText::new(text).into_owned()),
        Event::End(BytesEnd::new("w:t")),
    ]
}

/// Text with tabs and line breaks turned back into `w:tab` / `w:br`.
fn run_content(text: &str) -> Events {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(idx) = rest.find(['\t', '\n']) {
        if idx > 0 {
            out.extend(text_element(&rest[..idx]));
        }
        let name = if rest[idx..].starts_with('\t') { "w:tab" } else { "w:br" };
        out.push(Event::Empty(BytesStart::new(name)));
        rest = &rest[idx + 1..];
    }
    if !rest.is_empty() || out.is_empty() {
        out.extend(text_element(rest));
    }
    out
}

fn is_element(event: &Event, name: &[u8]) -> bool {
    match event {
        Event::Start(e) | Event::Empty(e) => e.name().as_ref() == name,
        _ => false,
    }
}

fn property_rank(event: &Event) -> usize {
    if is_element(event, b"w:rPrChange") {
        return usize::MAX;
    }
    RUN_PROPERTY_ORDER
        .iter()
        .position(|name| is_element(event, name))
        .unwrap_or(RUN_PROPERTY_ORDER.len())
}

/// Group a flat event slice into its top-level elements.
fn split_children(events: &[Event<'static>]) -> Result<Vec<Events>, DocxError> {
    let mut groups = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;

    for event in events {
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or(DocxError::Unbalanced("w:p"))?;
            }
            _ => {}
        }
        current.push(event.clone());
        if depth == 0 {
            groups.push(std::mem::take(&mut current));
        }
    }

    if depth != 0 {
        return Err(DocxError::Unbalanced("w:p"));
    }
    Ok(groups)
}

fn parse_paragraph(events: &[Event<'static>]) -> Result<Vec<Node>, DocxError> {
    if events.len() < 2 {
        return Err(DocxError::Unbalanced("w:p"));
    }

    split_children(&events[1..events.len() - 1])?
        .into_iter()
        .map(|group| {
            let is_run = matches!(group.first(), Some(Event::Start(e)) if e.name().as_ref() == b"w:r");
            if is_run {
                parse_run(group).map(Node::Run)
            } else {
                Ok(Node::Other(group))
            }
        })
        .collect()
}

fn parse_run(group: Events) -> Result<RunNode, DocxError> {
    let start = match group.first() {
        Some(Event::Start(e)) => e.clone(),
        _ => return Err(DocxError::Unbalanced("w:r")),
    };

    let mut props = Vec::new();
    let mut pieces = Vec::new();
    for child in split_children(&group[1..group.len() - 1])? {
        let Some(first) = child.first() else { continue };
        if is_element(first, b"w:rPr") {
            props = child;
        } else if is_element(first, b"w:t") {
            let mut text = String::new();
            for event in &child {
                match event {
                    Event::Text(t) => text.push_str(&t.unescape()?),
                    Event::CData(c) => text.push_str(&String::from_utf8_lossy(c)),
                    _ => {}
                }
            }
            pieces.push(Piece::Text(text));
        } else if is_element(first, b"w:tab") {
            pieces.push(Piece::Separator {
                text: "\t",
                events: child,
            });
        } else if is_element(first, b"w:br") || is_element(first, b"w:cr") {
            pieces.push(Piece::Separator {
                text: "\n",
                events: child,
            });
        } else {
            pieces.push(Piece::Other(child));
        }
    }

    Ok(RunNode {
        start,
        props,
        pieces,
        raw: group,
    })
}
