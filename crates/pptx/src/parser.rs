//! PPTX package parser implementation.
//!
//! Produces one text string per slide, in presentation order. A slide's text
//! is its collected lines joined with newlines: one line per non-empty
//! text-frame paragraph, and one line per non-empty table row with the row's
//! non-empty cells joined by `" | "`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use textract_core::{Error, Result};
use zip::ZipArchive;

/// Relationships of the main presentation part.
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// The main presentation part, holding the slide list.
const PRESENTATION_PATH: &str = "ppt/presentation.xml";

/// Directory that presentation relationship targets are relative to.
const PRESENTATION_DIR: &str = "ppt";

/// Separator between the non-empty cells of a table row.
pub const CELL_SEPARATOR: &str = " | ";

/// Parser for PPTX (Office Open XML) packages.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX package, returning the text of each slide in order.
    ///
    /// A slide with no text yields an empty string. Any structural problem is
    /// reported as [`Error::InvalidPresentationPackage`].
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<Vec<String>> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| package_error(format!("not a zip package ({})", e)))?;

        let slide_paths = self.get_slide_order(&mut archive)?;
        log::debug!("Package lists {} slides", slide_paths.len());

        let mut slides = Vec::with_capacity(slide_paths.len());
        for slide_path in &slide_paths {
            let content = self.read_file_from_archive(&mut archive, slide_path)?;
            let lines = extract_slide_lines(&content)
                .map_err(|e| package_error(format!("malformed XML in '{}': {}", slide_path, e)))?;
            slides.push(lines.join("\n"));
        }

        Ok(slides)
    }

    /// Get the ordered list of slide part paths.
    ///
    /// Order comes from `sldIdLst` in the presentation part; each entry's
    /// relationship id is resolved through the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, PRESENTATION_RELS_PATH)?;
        let targets = parse_slide_relationships(&rels_content)
            .map_err(|e| package_error(format!("error parsing relationships: {}", e)))?;

        let presentation = self.read_file_from_archive(archive, PRESENTATION_PATH)?;
        let rel_ids = parse_slide_id_list(&presentation)
            .map_err(|e| package_error(format!("error parsing slide list: {}", e)))?;

        rel_ids
            .iter()
            .map(|id| {
                targets
                    .get(id)
                    .map(|target| resolve_target(PRESENTATION_DIR, target))
                    .ok_or_else(|| package_error(format!("slide relationship '{}' is missing", id)))
            })
            .collect()
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| package_error(format!("part '{}' not found ({})", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| package_error(format!("failed to read '{}' ({})", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

fn package_error(detail: String) -> Error {
    Error::InvalidPresentationPackage(detail)
}

/// Map slide relationship ids to their targets.
fn parse_slide_relationships(xml: &str) -> quick_xml::Result<HashMap<String, String>> {
    let mut targets = HashMap::new();
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Empty(ref e) | Event::Start(ref e)
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut id = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }

                // Layouts and masters share the "/slide" prefix
                if rel_type.ends_with("/slide") {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(targets)
}

/// Collect the relationship ids of `p:sldId` entries, in presentation order.
fn parse_slide_id_list(xml: &str) -> quick_xml::Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Empty(ref e) | Event::Start(ref e)
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                if let Some(id) = relationship_id(e) {
                    ids.push(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ids)
}

/// The namespaced `r:id` attribute of an element.
fn relationship_id(e: &BytesStart<'_>) -> Option<String> {
    e.attributes().flatten().find_map(|attr| {
        let key = attr.key;
        if key.prefix().is_some() && key.local_name().as_ref() == b"id" {
            Some(String::from_utf8_lossy(&attr.value).to_string())
        } else {
            None
        }
    })
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Walk one slide's XML and collect its text lines in document order.
///
/// Shapes nested in groups are visited too. Content under `mc:Fallback`
/// is skipped because it repeats the preferred `mc:Choice` content.
fn extract_slide_lines(xml: &str) -> quick_xml::Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut reader = Reader::from_str(xml);

    let mut walker = SlideWalker::default();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => walker.open(local_name(e.name().as_ref())),
            Event::Empty(ref e) => walker.empty(local_name(e.name().as_ref())),
            Event::Text(ref e) => {
                if walker.capturing_text() {
                    let text = e.unescape()?;
                    walker.push_text(&text);
                }
            }
            Event::End(ref e) => {
                if let Some(line) = walker.close(local_name(e.name().as_ref())) {
                    lines.push(line);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(lines)
}

/// Tracks where the reader is inside a slide's shape tree.
#[derive(Debug, Default)]
struct SlideWalker {
    /// Depth of `mc:Fallback` elements; nothing is collected while non-zero.
    fallback_depth: usize,
    /// Depth of text bodies (`p:txBody` for shapes, `a:txBody` for cells).
    text_body_depth: usize,
    /// Inside an `a:r` run.
    in_run: bool,
    /// Inside the `a:t` text of a run.
    in_text: bool,
    /// Run text of the current paragraph.
    paragraph: Option<String>,
    /// Paragraphs of the current table cell.
    cell: Option<Vec<String>>,
    /// Cell texts of the current table row.
    row: Option<Vec<String>>,
}

impl SlideWalker {
    fn open(&mut self, name: &[u8]) {
        if name == b"Fallback" {
            self.fallback_depth += 1;
            return;
        }
        if self.fallback_depth > 0 {
            return;
        }

        match name {
            b"tr" => self.row = Some(Vec::new()),
            b"tc" if self.row.is_some() => self.cell = Some(Vec::new()),
            b"txBody" => self.text_body_depth += 1,
            b"p" if self.text_body_depth > 0 => self.paragraph = Some(String::new()),
            b"r" if self.paragraph.is_some() => self.in_run = true,
            b"t" if self.in_run => self.in_text = true,
            _ => {}
        }
    }

    fn empty(&mut self, name: &[u8]) {
        if self.fallback_depth > 0 {
            return;
        }
        // A self-closing cell has no text but still occupies its column
        if name == b"tc" {
            if let Some(row) = self.row.as_mut() {
                row.push(String::new());
            }
        }
    }

    fn capturing_text(&self) -> bool {
        self.fallback_depth == 0 && self.in_text
    }

    fn push_text(&mut self, text: &str) {
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.push_str(text);
        }
    }

    /// Handle an end tag, returning a completed slide line if there is one.
    fn close(&mut self, name: &[u8]) -> Option<String> {
        if name == b"Fallback" {
            self.fallback_depth = self.fallback_depth.saturating_sub(1);
            return None;
        }
        if self.fallback_depth > 0 {
            return None;
        }

        match name {
            b"t" => self.in_text = false,
            b"r" => self.in_run = false,
            b"txBody" => self.text_body_depth = self.text_body_depth.saturating_sub(1),
            b"p" => {
                let paragraph = self.paragraph.take()?;
                match self.cell.as_mut() {
                    Some(cell) => cell.push(paragraph),
                    None => {
                        let line = paragraph.trim();
                        if !line.is_empty() {
                            return Some(line.to_string());
                        }
                    }
                }
            }
            b"tc" => {
                let cell = self.cell.take()?;
                if let Some(row) = self.row.as_mut() {
                    row.push(cell.join("\n").trim().to_string());
                }
            }
            b"tr" => {
                let row = self.row.take()?;
                let cells: Vec<String> = row.into_iter().filter(|c| !c.is_empty()).collect();
                if !cells.is_empty() {
                    return Some(cells.join(CELL_SEPARATOR));
                }
            }
            _ => {}
        }

        None
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{build_package, build_pptx, FixtureSlide};
    use std::io::Cursor;

    fn parse(bytes: Vec<u8>) -> Result<Vec<String>> {
        PptxParser::new().parse(Cursor::new(bytes))
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("ppt", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_target("ppt", "/ppt/slides/slide2.xml"), "ppt/slides/slide2.xml");
        assert_eq!(resolve_target("ppt/slides", "../media/image1.png"), "ppt/media/image1.png");
        assert_eq!(resolve_target("ppt", "./slides/slide3.xml"), "ppt/slides/slide3.xml");
    }

    #[test]
    fn test_text_frame_paragraphs_join_runs() {
        let slide = FixtureSlide::new()
            .text_box(&["Title"])
            .runs(&["Hello ", "world", "!"])
            .text_box(&["", "   ", "Second paragraph"]);

        let slides = parse(build_pptx(&[slide])).unwrap();
        assert_eq!(slides, vec!["Title\nHello world!\nSecond paragraph"]);
    }

    #[test]
    fn test_table_rows_drop_blank_cells() {
        let slide = FixtureSlide::new().table(&[&["A", "B"], &["", "C"], &["", ""]]);

        let slides = parse(build_pptx(&[slide])).unwrap();
        assert_eq!(slides, vec!["A | B\nC"]);
    }

    #[test]
    fn test_shapes_keep_document_order() {
        let slide = FixtureSlide::new()
            .text_box(&["Before"])
            .table(&[&["x", "y"]])
            .picture()
            .text_box(&["After"]);

        let slides = parse(build_pptx(&[slide])).unwrap();
        assert_eq!(slides, vec!["Before\nx | y\nAfter"]);
    }

    #[test]
    fn test_group_shapes_are_visited() {
        let slide = FixtureSlide::new()
            .text_box(&["Outside"])
            .group(FixtureSlide::new().text_box(&["Inside"]).table(&[&["1", "2"]]));

        let slides = parse(build_pptx(&[slide])).unwrap();
        assert_eq!(slides, vec!["Outside\nInside\n1 | 2"]);
    }

    #[test]
    fn test_escaped_text_is_unescaped() {
        let slide = FixtureSlide::new().text_box(&["Q&A <draft>"]);

        let slides = parse(build_pptx(&[slide])).unwrap();
        assert_eq!(slides, vec!["Q&A <draft>"]);
    }

    #[test]
    fn test_empty_slide_yields_empty_string() {
        let slides = parse(build_pptx(&[
            FixtureSlide::new().text_box(&["One"]),
            FixtureSlide::new().picture(),
        ]))
        .unwrap();
        assert_eq!(slides, vec!["One".to_string(), String::new()]);
    }

    #[test]
    fn test_fallback_content_is_skipped() {
        let slide = FixtureSlide::new().raw(
            "<mc:AlternateContent xmlns:mc=\"http://schemas.openxmlformats.org/markup-compatibility/2006\">\
             <mc:Choice Requires=\"p14\"><p:sp><p:txBody><a:p><a:r><a:t>Chosen</a:t></a:r></a:p></p:txBody></p:sp></mc:Choice>\
             <mc:Fallback><p:sp><p:txBody><a:p><a:r><a:t>Chosen</a:t></a:r></a:p></p:txBody></p:sp></mc:Fallback>\
             </mc:AlternateContent>",
        );

        let slides = parse(build_pptx(&[slide])).unwrap();
        assert_eq!(slides, vec!["Chosen"]);
    }

    #[test]
    fn test_slide_order_follows_slide_id_list() {
        let first = FixtureSlide::new().text_box(&["First"]).xml();
        let second = FixtureSlide::new().text_box(&["Second"]).xml();

        // slide2.xml is listed first in the presentation
        let rels = "<?xml version=\"1.0\"?>\
            <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
            <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster\" Target=\"slideMasters/slideMaster1.xml\"/>\
            <Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" Target=\"slides/slide1.xml\"/>\
            <Relationship Id=\"rId3\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" Target=\"slides/slide2.xml\"/>\
            </Relationships>";
        let presentation = "<?xml version=\"1.0\"?>\
            <p:presentation xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\" \
             xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
            <p:sldIdLst><p:sldId id=\"256\" r:id=\"rId3\"/><p:sldId id=\"257\" r:id=\"rId2\"/></p:sldIdLst>\
            </p:presentation>";

        let bytes = build_package(&[
            (PRESENTATION_RELS_PATH, rels),
            (PRESENTATION_PATH, presentation),
            ("ppt/slides/slide1.xml", first.as_str()),
            ("ppt/slides/slide2.xml", second.as_str()),
        ]);

        assert_eq!(parse(bytes).unwrap(), vec!["Second", "First"]);
    }

    #[test]
    fn test_zero_slides() {
        assert_eq!(parse(build_pptx(&[])).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_missing_presentation_part() {
        let bytes = build_package(&[("docProps/app.xml", "<Properties/>")]);
        match parse(bytes) {
            Err(Error::InvalidPresentationPackage(detail)) => {
                assert!(detail.contains(PRESENTATION_RELS_PATH), "{}", detail)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            parse(b"definitely not a zip archive".to_vec()),
            Err(Error::InvalidPresentationPackage(_))
        ));
    }
}
