//! In-memory PPTX packages for tests.
//!
//! Enabled for this crate's tests and, through the `test-fixtures` feature,
//! for dependent crates' tests.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const SLIDE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const MASTER_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

/// A slide under construction, as a list of shape XML fragments.
#[derive(Debug, Clone, Default)]
pub struct FixtureSlide {
    shapes: Vec<String>,
}

impl FixtureSlide {
    /// An empty slide with no shapes.
    pub fn new() -> Self {
        Self::default()
    }

    /// A text box with one single-run paragraph per entry.
    pub fn text_box(mut self, paragraphs: &[&str]) -> Self {
        let body: String = paragraphs.iter().map(|p| paragraph(&[*p])).collect();
        self.shapes.push(text_shape(&body));
        self
    }

    /// A text box with one paragraph made of several runs.
    pub fn runs(mut self, runs: &[&str]) -> Self {
        self.shapes.push(text_shape(&paragraph(runs)));
        self
    }

    /// A table shape; each inner slice is a row of cell texts.
    pub fn table(mut self, rows: &[&[&str]]) -> Self {
        let rows: String = rows
            .iter()
            .map(|cells| {
                let cells: String = cells
                    .iter()
                    .map(|c| {
                        format!(
                            "<a:tc><a:txBody><a:bodyPr/><a:lstStyle/>{}</a:txBody><a:tcPr/></a:tc>",
                            paragraph(&[*c])
                        )
                    })
                    .collect();
                format!("<a:tr h=\"370840\">{}</a:tr>", cells)
            })
            .collect();

        self.shapes.push(format!(
            "<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id=\"4\" name=\"Table\"/>\
             <p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm/>\
             <a:graphic><a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/table\">\
             <a:tbl><a:tblPr/><a:tblGrid><a:gridCol w=\"3000000\"/></a:tblGrid>{}</a:tbl>\
             </a:graphicData></a:graphic></p:graphicFrame>",
            rows
        ));
        self
    }

    /// A picture shape, which carries no text.
    pub fn picture(mut self) -> Self {
        self.shapes.push(
            "<p:pic><p:nvPicPr><p:cNvPr id=\"5\" name=\"Picture\"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>\
             <p:blipFill/><p:spPr/></p:pic>"
                .to_string(),
        );
        self
    }

    /// A group shape containing `inner`'s shapes.
    pub fn group(mut self, inner: FixtureSlide) -> Self {
        self.shapes.push(format!(
            "<p:grpSp><p:nvGrpSpPr><p:cNvPr id=\"6\" name=\"Group\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
             <p:grpSpPr/>{}</p:grpSp>",
            inner.shapes.concat()
        ));
        self
    }

    /// A verbatim XML fragment inside the shape tree.
    pub fn raw(mut self, xml: &str) -> Self {
        self.shapes.push(xml.to_string());
        self
    }

    /// The complete slide part.
    pub fn xml(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <p:sld xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
             xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
             xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
             <p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
             <p:grpSpPr/>{}</p:spTree></p:cSld></p:sld>",
            self.shapes.concat()
        )
    }
}

fn text_shape(body: &str) -> String {
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"2\" name=\"TextBox\"/><p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
         <p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp>",
        body
    )
}

fn paragraph(runs: &[&str]) -> String {
    let runs: String = runs
        .iter()
        .filter(|r| !r.is_empty())
        .map(|r| format!("<a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r>", escape(r)))
        .collect();
    format!("<a:p>{}<a:endParaRPr lang=\"en-US\"/></a:p>", runs)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build a complete PPTX package with `slides` in order.
pub fn build_pptx(slides: &[FixtureSlide]) -> Vec<u8> {
    let mut rels = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"{}\" Target=\"slideMasters/slideMaster1.xml\"/>",
        MASTER_REL_TYPE
    );
    let mut id_list = String::new();
    let mut parts: Vec<(String, String)> = Vec::new();

    for (idx, slide) in slides.iter().enumerate() {
        let number = idx + 1;
        let rel_id = format!("rId{}", number + 1);
        rels.push_str(&format!(
            "<Relationship Id=\"{}\" Type=\"{}\" Target=\"slides/slide{}.xml\"/>",
            rel_id, SLIDE_REL_TYPE, number
        ));
        id_list.push_str(&format!("<p:sldId id=\"{}\" r:id=\"{}\"/>", 255 + number, rel_id));
        parts.push((format!("ppt/slides/slide{}.xml", number), slide.xml()));
    }
    rels.push_str("</Relationships>");

    let presentation = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <p:presentation xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         <p:sldIdLst>{}</p:sldIdLst><p:sldSz cx=\"9144000\" cy=\"6858000\"/></p:presentation>",
        id_list
    );

    let content_types = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
        <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
        <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
        <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
        </Types>";

    let mut all: Vec<(&str, &str)> = vec![
        ("[Content_Types].xml", content_types),
        ("ppt/_rels/presentation.xml.rels", rels.as_str()),
        ("ppt/presentation.xml", presentation.as_str()),
    ];
    all.extend(parts.iter().map(|(name, xml)| (name.as_str(), xml.as_str())));

    build_package(&all)
}

/// Zip arbitrary `(path, content)` parts into a package.
pub fn build_package(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, content) in parts {
        zip.start_file(*name, options).expect("start zip entry");
        zip.write_all(content.as_bytes()).expect("write zip entry");
    }

    zip.finish().expect("finish zip").into_inner()
}
