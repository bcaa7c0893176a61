//! OPC package assembly for the finished deck.
//!
//! Collects slide parts and media, synthesizes the content-types and
//! relationship parts, and writes everything out as a single ZIP archive.
//! Static parts (master, layout, theme, document properties) are fixed
//! templates; the deck varies only in its slides and media.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use deck_core::{Error, Result};
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::slide::SlideImageRel;
use crate::{XMLNS_A, XMLNS_P, XMLNS_R};

/// Deck canvas width: 10 inches.
pub const SLIDE_WIDTH_EMU: i64 = 9_144_000;

/// Deck canvas height: 7.5 inches.
pub const SLIDE_HEIGHT_EMU: i64 = 6_858_000;

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_APP_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

struct SlidePart {
    xml: Vec<u8>,
    image_rels: Vec<SlideImageRel>,
}

struct MediaPart {
    name: String,
    data: Vec<u8>,
}

/// In-memory deck package, written to disk in one shot at the end.
pub struct PptxPackage {
    slides: Vec<SlidePart>,
    media: Vec<MediaPart>,
    media_by_source: HashMap<PathBuf, String>,
}

impl PptxPackage {
    /// Create an empty package.
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            media: Vec::new(),
            media_by_source: HashMap::new(),
        }
    }

    /// Number of slides added so far.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Register an image file as a media part, deduplicated by source path.
    /// Returns the media part file name, e.g. `image1.png`.
    pub fn add_media(&mut self, source: &Path) -> Result<String> {
        if let Some(name) = self.media_by_source.get(source) {
            return Ok(name.clone());
        }

        let data = std::fs::read(source)?;
        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png")
            .to_ascii_lowercase();
        let name = format!("image{}.{}", self.media.len() + 1, extension);

        self.media.push(MediaPart {
            name: name.clone(),
            data,
        });
        self.media_by_source.insert(source.to_path_buf(), name.clone());
        Ok(name)
    }

    /// Append a finished slide part and its image relationships.
    pub fn add_slide(&mut self, xml: Vec<u8>, image_rels: Vec<SlideImageRel>) {
        self.slides.push(SlidePart { xml, image_rels });
    }

    /// Persist the package, overwriting any existing file at `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| Error::SaveError(format!("{}: {}", path.display(), e)))?;
        self.write_to(file)
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Write the package to any seekable sink.
    pub fn write_to<W: Write + Seek>(&self, sink: W) -> Result<()> {
        let mut zip = ZipWriter::new(sink);
        let options = FileOptions::default();

        write_entry(&mut zip, "[Content_Types].xml", self.content_types().as_bytes(), options)?;
        write_entry(&mut zip, "_rels/.rels", ROOT_RELS.as_bytes(), options)?;
        write_entry(&mut zip, "docProps/core.xml", CORE_PROPS.as_bytes(), options)?;
        write_entry(&mut zip, "docProps/app.xml", APP_PROPS.as_bytes(), options)?;
        write_entry(&mut zip, "ppt/presentation.xml", self.presentation().as_bytes(), options)?;
        write_entry(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            self.presentation_rels().as_bytes(),
            options,
        )?;
        write_entry(&mut zip, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER.as_bytes(), options)?;
        write_entry(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            SLIDE_MASTER_RELS.as_bytes(),
            options,
        )?;
        write_entry(&mut zip, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT.as_bytes(), options)?;
        write_entry(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            SLIDE_LAYOUT_RELS.as_bytes(),
            options,
        )?;
        write_entry(&mut zip, "ppt/theme/theme1.xml", THEME.as_bytes(), options)?;

        for (index, slide) in self.slides.iter().enumerate() {
            let number = index + 1;
            let part = format!("ppt/slides/slide{}.xml", number);
            write_entry(&mut zip, part.as_str(), &slide.xml, options)?;
            let rels = format!("ppt/slides/_rels/slide{}.xml.rels", number);
            write_entry(&mut zip, rels.as_str(), self.slide_rels(slide).as_bytes(), options)?;
        }

        for media in &self.media {
            let part = format!("ppt/media/{}", media.name);
            write_entry(&mut zip, part.as_str(), &media.data, options)?;
        }

        zip.finish().map_err(|e| Error::ZipError(e.to_string()))?;
        Ok(())
    }

    fn content_types(&self) -> String {
        let mut xml = String::from(XML_DECL);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        xml.push_str(
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        );
        xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

        let mut seen = BTreeSet::new();
        for media in &self.media {
            let extension = media.name.rsplit('.').next().unwrap_or("png");
            if seen.insert(extension) {
                xml.push_str(&format!(
                    r#"<Default Extension="{}" ContentType="{}"/>"#,
                    extension,
                    image_content_type(extension)
                ));
            }
        }

        xml.push_str(
            r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#,
        );
        xml.push_str(
            r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#,
        );
        xml.push_str(
            r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#,
        );
        xml.push_str(
            r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#,
        );
        for number in 1..=self.slides.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                number
            ));
        }
        xml.push_str(
            r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
        );
        xml.push_str(
            r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
        );
        xml.push_str("</Types>");
        xml
    }

    fn presentation(&self) -> String {
        let mut xml = String::from(XML_DECL);
        xml.push_str(&format!(
            r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
            XMLNS_A, XMLNS_R, XMLNS_P
        ));
        xml.push_str(
            r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
        );
        xml.push_str("<p:sldIdLst>");
        for index in 0..self.slides.len() {
            xml.push_str(&format!(
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                256 + index,
                index + 2
            ));
        }
        xml.push_str("</p:sldIdLst>");
        xml.push_str(&format!(
            r#"<p:sldSz cx="{}" cy="{}"/>"#,
            SLIDE_WIDTH_EMU, SLIDE_HEIGHT_EMU
        ));
        xml.push_str(&format!(
            r#"<p:notesSz cx="{}" cy="{}"/>"#,
            SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU
        ));
        xml.push_str("</p:presentation>");
        xml
    }

    fn presentation_rels(&self) -> String {
        let mut xml = rels_open();
        xml.push_str(&relationship("rId1", REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"));
        for index in 0..self.slides.len() {
            xml.push_str(&relationship(
                &format!("rId{}", index + 2),
                REL_SLIDE,
                &format!("slides/slide{}.xml", index + 1),
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }

    fn slide_rels(&self, slide: &SlidePart) -> String {
        let mut xml = rels_open();
        xml.push_str(&relationship("rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"));
        for rel in &slide.image_rels {
            xml.push_str(&relationship(&rel.id, REL_IMAGE, &format!("../media/{}", rel.media)));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

impl Default for PptxPackage {
    fn default() -> Self {
        Self::new()
    }
}

fn write_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    data: &[u8],
    options: FileOptions,
) -> Result<()> {
    zip.start_file(name, options)
        .map_err(|e| Error::ZipError(format!("{}: {}", name, e)))?;
    zip.write_all(data)
        .map_err(|e| Error::ZipError(format!("{}: {}", name, e)))?;
    Ok(())
}

fn image_content_type(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "image/png",
    }
}

fn rels_open() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    xml
}

fn relationship(id: &str, rel_type: &str, target: &str) -> String {
    format!(
        r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
        id, rel_type, target
    )
}

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

const ROOT_RELS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#,
);

const CORE_PROPS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>MailingPigeon</dc:title><dc:creator>deck-gen</dc:creator></cp:coreProperties>"#,
);

const APP_PROPS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>deck-gen</Application></Properties>"#,
);

const SLIDE_MASTER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    r#"<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#,
);

const SLIDE_MASTER_RELS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/></Relationships>"#,
);

const SLIDE_LAYOUT: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
);

const SLIDE_LAYOUT_RELS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#,
);

const THEME: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Sepia"><a:themeElements><a:clrScheme name="Sepia"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="3D2817"/></a:dk2><a:lt2><a:srgbClr val="F5F1E8"/></a:lt2><a:accent1><a:srgbClr val="8B6F47"/></a:accent1><a:accent2><a:srgbClr val="5C4033"/></a:accent2><a:accent3><a:srgbClr val="A68A64"/></a:accent3><a:accent4><a:srgbClr val="704214"/></a:accent4><a:accent5><a:srgbClr val="C0A080"/></a:accent5><a:accent6><a:srgbClr val="2B1B10"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Sepia"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Sepia"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#,
);
