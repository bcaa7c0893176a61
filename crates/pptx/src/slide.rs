//! Slide part assembly.
//!
//! Builds the XML for one `ppt/slides/slideN.xml` part with quick-xml, shape
//! by shape, and records the image relationships the part references. Shape
//! ids start at 2; id 1 belongs to the root group of the shape tree.

use std::io::Cursor;

use deck_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::emu::{font_size, points};
use crate::theme::Color;
use crate::{XMLNS_A, XMLNS_P, XMLNS_R};

/// Paragraph alignment for a text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

impl Align {
    fn code(self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
        }
    }
}

/// A single-run text box to place at a fixed position. All coordinates and
/// extents are in EMU.
#[derive(Debug, Clone)]
pub struct TextBox<'a> {
    pub text: &'a str,
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
    pub size_pt: u32,
    pub bold: bool,
    pub color: Option<Color>,
    pub align: Align,
}

/// An image relationship recorded while building a slide.
#[derive(Debug, Clone)]
pub struct SlideImageRel {
    /// Relationship id referenced by `r:embed`.
    pub id: String,

    /// Media part file name, e.g. `image1.png`.
    pub media: String,
}

/// Incremental builder for one slide part.
pub struct SlideBuilder {
    writer: Writer<Cursor<Vec<u8>>>,
    shape_id: u32,
    image_rels: Vec<SlideImageRel>,
}

impl SlideBuilder {
    /// Start a blank slide: document declaration, root element, and the
    /// shape-tree group header.
    pub fn new() -> Result<Self> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_err)?;

        let sld = BytesStart::new("p:sld").with_attributes([
            ("xmlns:a", XMLNS_A),
            ("xmlns:r", XMLNS_R),
            ("xmlns:p", XMLNS_P),
        ]);
        writer.write_event(Event::Start(sld)).map_err(xml_err)?;

        let mut builder = Self {
            writer,
            shape_id: 2,
            image_rels: Vec::new(),
        };
        builder.start("p:cSld")?;
        builder.start("p:spTree")?;
        builder.write_group_header()?;
        Ok(builder)
    }

    /// Place a text box.
    pub fn add_text_box(&mut self, text_box: &TextBox) -> Result<()> {
        let id = self.next_shape_id().to_string();
        let name = format!("TextBox {}", id);

        self.start("p:sp")?;

        self.start("p:nvSpPr")?;
        self.empty(
            BytesStart::new("p:cNvPr")
                .with_attributes([("id", id.as_str()), ("name", name.as_str())]),
        )?;
        self.empty(BytesStart::new("p:cNvSpPr").with_attributes([("txBox", "1")]))?;
        self.empty(BytesStart::new("p:nvPr"))?;
        self.end("p:nvSpPr")?;

        self.start("p:spPr")?;
        self.transform(text_box.x, text_box.y, text_box.cx, text_box.cy)?;
        self.preset_geometry("rect")?;
        self.empty(BytesStart::new("a:noFill"))?;
        self.end("p:spPr")?;

        self.start("p:txBody")?;
        self.empty(BytesStart::new("a:bodyPr").with_attributes([("wrap", "square")]))?;
        self.empty(BytesStart::new("a:lstStyle"))?;
        self.start("a:p")?;
        self.empty(BytesStart::new("a:pPr").with_attributes([("algn", text_box.align.code())]))?;
        self.start("a:r")?;

        let size = font_size(text_box.size_pt).to_string();
        let mut run_props = BytesStart::new("a:rPr")
            .with_attributes([("lang", "en-US"), ("sz", size.as_str()), ("dirty", "0")]);
        if text_box.bold {
            run_props.push_attribute(("b", "1"));
        }
        match text_box.color {
            Some(color) => {
                self.start_with(run_props)?;
                self.solid_fill(color)?;
                self.end("a:rPr")?;
            }
            None => self.empty(run_props)?,
        }

        self.start("a:t")?;
        self.writer
            .write_event(Event::Text(BytesText::new(text_box.text)))
            .map_err(xml_err)?;
        self.end("a:t")?;

        self.end("a:r")?;
        self.end("a:p")?;
        self.end("p:txBody")?;

        self.end("p:sp")
    }

    /// Place an image already registered with the package. `media` is the
    /// media part file name; `descr` carries the alt text when present.
    pub fn add_picture(
        &mut self,
        media: &str,
        descr: &str,
        x: i64,
        y: i64,
        cx: i64,
        cy: i64,
    ) -> Result<()> {
        let id = self.next_shape_id().to_string();
        let name = format!("Picture {}", id);
        // rId1 is reserved for the slide layout relationship.
        let rel_id = format!("rId{}", self.image_rels.len() + 2);
        self.image_rels.push(SlideImageRel {
            id: rel_id.clone(),
            media: media.to_string(),
        });

        self.start("p:pic")?;

        self.start("p:nvPicPr")?;
        let mut props = BytesStart::new("p:cNvPr")
            .with_attributes([("id", id.as_str()), ("name", name.as_str())]);
        if !descr.is_empty() {
            props.push_attribute(("descr", descr));
        }
        self.empty(props)?;
        self.start("p:cNvPicPr")?;
        self.empty(BytesStart::new("a:picLocks").with_attributes([("noChangeAspect", "1")]))?;
        self.end("p:cNvPicPr")?;
        self.empty(BytesStart::new("p:nvPr"))?;
        self.end("p:nvPicPr")?;

        self.start("p:blipFill")?;
        self.empty(BytesStart::new("a:blip").with_attributes([("r:embed", rel_id.as_str())]))?;
        self.start("a:stretch")?;
        self.empty(BytesStart::new("a:fillRect"))?;
        self.end("a:stretch")?;
        self.end("p:blipFill")?;

        self.start("p:spPr")?;
        self.transform(x, y, cx, cy)?;
        self.preset_geometry("rect")?;
        self.end("p:spPr")?;

        self.end("p:pic")
    }

    /// Place a rounded-rectangle card background with a solid fill and a
    /// colored outline.
    pub fn add_rounded_rect(
        &mut self,
        x: i64,
        y: i64,
        cx: i64,
        cy: i64,
        fill: Color,
        outline: Color,
        outline_pt: f64,
    ) -> Result<()> {
        let id = self.next_shape_id().to_string();
        let name = format!("Rounded Rectangle {}", id);

        self.start("p:sp")?;

        self.start("p:nvSpPr")?;
        self.empty(
            BytesStart::new("p:cNvPr")
                .with_attributes([("id", id.as_str()), ("name", name.as_str())]),
        )?;
        self.empty(BytesStart::new("p:cNvSpPr"))?;
        self.empty(BytesStart::new("p:nvPr"))?;
        self.end("p:nvSpPr")?;

        self.start("p:spPr")?;
        self.transform(x, y, cx, cy)?;
        self.preset_geometry("roundRect")?;
        self.solid_fill(fill)?;
        let width = points(outline_pt).to_string();
        self.start_with(BytesStart::new("a:ln").with_attributes([("w", width.as_str())]))?;
        self.solid_fill(outline)?;
        self.end("a:ln")?;
        self.end("p:spPr")?;

        // p:sp requires a text body even when the shape carries no text.
        self.start("p:txBody")?;
        self.empty(BytesStart::new("a:bodyPr"))?;
        self.empty(BytesStart::new("a:lstStyle"))?;
        self.empty(BytesStart::new("a:p"))?;
        self.end("p:txBody")?;

        self.end("p:sp")
    }

    /// Close the slide document and hand back its XML plus the image
    /// relationships the rels part must carry.
    pub fn finish(mut self) -> Result<(Vec<u8>, Vec<SlideImageRel>)> {
        self.end("p:spTree")?;
        self.end("p:cSld")?;
        self.start("p:clrMapOvr")?;
        self.empty(BytesStart::new("a:masterClrMapping"))?;
        self.end("p:clrMapOvr")?;
        self.end("p:sld")?;
        Ok((self.writer.into_inner().into_inner(), self.image_rels))
    }

    /// The fixed non-visual group header every shape tree opens with.
    fn write_group_header(&mut self) -> Result<()> {
        self.start("p:nvGrpSpPr")?;
        self.empty(BytesStart::new("p:cNvPr").with_attributes([("id", "1"), ("name", "")]))?;
        self.empty(BytesStart::new("p:cNvGrpSpPr"))?;
        self.empty(BytesStart::new("p:nvPr"))?;
        self.end("p:nvGrpSpPr")?;

        self.start("p:grpSpPr")?;
        self.start("a:xfrm")?;
        self.empty(BytesStart::new("a:off").with_attributes([("x", "0"), ("y", "0")]))?;
        self.empty(BytesStart::new("a:ext").with_attributes([("cx", "0"), ("cy", "0")]))?;
        self.empty(BytesStart::new("a:chOff").with_attributes([("x", "0"), ("y", "0")]))?;
        self.empty(BytesStart::new("a:chExt").with_attributes([("cx", "0"), ("cy", "0")]))?;
        self.end("a:xfrm")?;
        self.end("p:grpSpPr")?;
        Ok(())
    }

    fn transform(&mut self, x: i64, y: i64, cx: i64, cy: i64) -> Result<()> {
        let (x, y) = (x.to_string(), y.to_string());
        let (cx, cy) = (cx.to_string(), cy.to_string());
        self.start("a:xfrm")?;
        self.empty(
            BytesStart::new("a:off").with_attributes([("x", x.as_str()), ("y", y.as_str())]),
        )?;
        self.empty(
            BytesStart::new("a:ext").with_attributes([("cx", cx.as_str()), ("cy", cy.as_str())]),
        )?;
        self.end("a:xfrm")
    }

    fn preset_geometry(&mut self, preset: &str) -> Result<()> {
        self.start_with(BytesStart::new("a:prstGeom").with_attributes([("prst", preset)]))?;
        self.empty(BytesStart::new("a:avLst"))?;
        self.end("a:prstGeom")
    }

    fn solid_fill(&mut self, color: Color) -> Result<()> {
        let hex = color.hex();
        self.start("a:solidFill")?;
        self.empty(BytesStart::new("a:srgbClr").with_attributes([("val", hex.as_str())]))?;
        self.end("a:solidFill")
    }

    fn next_shape_id(&mut self) -> u32 {
        let id = self.shape_id;
        self.shape_id += 1;
        id
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_err)
    }

    fn start_with(&mut self, element: BytesStart) -> Result<()> {
        self.writer
            .write_event(Event::Start(element))
            .map_err(xml_err)
    }

    fn empty(&mut self, element: BytesStart) -> Result<()> {
        self.writer
            .write_event(Event::Empty(element))
            .map_err(xml_err)
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_err)
    }
}

fn xml_err(e: impl std::fmt::Display) -> Error {
    Error::XmlError(e.to_string())
}
