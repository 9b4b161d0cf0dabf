/// A slide being built from a layout.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::pptx::format::ImageFormat;
use crate::ooxml::pptx::shapes::{Geometry, PlaceholderFormat};
use crate::ooxml::pptx::writer::shape::{MutableShape, TextBody};
use crate::ooxml::xml::{escape_xml, sanitize_text};
use bytes::Bytes;
use std::fmt::Write as FmtWrite;

const SLIDE_NAMESPACES: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#,
);

/// A placeholder of a layout that new slides receive a copy of.
#[derive(Debug, Clone)]
pub struct LayoutPlaceholder {
    pub name: String,
    pub format: PlaceholderFormat,
    /// From the layout's own transform, else from the master placeholder
    /// it inherits from.
    pub geometry: Option<Geometry>,
}

/// What a new slide needs to know about its layout.
#[derive(Debug, Clone)]
pub struct LayoutTemplate {
    pub partname: PackURI,
    pub name: String,
    pub placeholders: Vec<LayoutPlaceholder>,
}

/// A new slide.
///
/// Starts with one shape per cloneable layout placeholder, in layout order.
#[derive(Debug, Clone)]
pub struct MutableSlide {
    layout: PackURI,
    shapes: Vec<MutableShape>,
    images: Vec<(Bytes, ImageFormat)>,
    notes: Option<String>,
    notes_supported: bool,
    next_shape_id: u32,
}

impl MutableSlide {
    pub(crate) fn from_layout(layout: &LayoutTemplate, notes_supported: bool) -> Self {
        let mut slide = Self {
            layout: layout.partname.clone(),
            shapes: Vec::with_capacity(layout.placeholders.len() + 2),
            images: Vec::new(),
            notes: None,
            notes_supported,
            // id 1 is the shape tree itself
            next_shape_id: 2,
        };
        for ph in &layout.placeholders {
            let shape_id = slide.take_shape_id();
            slide.shapes.push(MutableShape::new_placeholder(
                shape_id,
                ph.name.clone(),
                ph.format.clone(),
                ph.geometry,
            ));
        }
        slide
    }

    fn take_shape_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    #[inline]
    pub fn layout_partname(&self) -> &PackURI {
        &self.layout
    }

    #[inline]
    pub fn shapes(&self) -> &[MutableShape] {
        &self.shapes
    }

    #[inline]
    pub fn shape_mut(&mut self, index: usize) -> Option<&mut MutableShape> {
        self.shapes.get_mut(index)
    }

    /// Add a free-floating text box holding `text`.
    pub fn add_text_box(&mut self, geometry: Geometry, text: TextBody) {
        let shape_id = self.take_shape_id();
        self.shapes
            .push(MutableShape::new_text_box(shape_id, geometry, text));
    }

    /// Add a picture. Fails when the blob is not a recognized image format.
    pub fn add_picture(&mut self, image: Bytes, geometry: Geometry) -> Result<()> {
        let format = ImageFormat::detect_from_bytes(&image).ok_or_else(|| {
            OoxmlError::InvalidFormat("unrecognized image format".to_string())
        })?;
        self.images.push((image, format));
        let shape_id = self.take_shape_id();
        self.shapes
            .push(MutableShape::new_picture(shape_id, self.images.len() - 1, geometry));
        Ok(())
    }

    #[inline]
    pub fn images(&self) -> &[(Bytes, ImageFormat)] {
        &self.images
    }

    #[inline]
    pub fn supports_notes(&self) -> bool {
        self.notes_supported
    }

    /// Set speaker notes. Fails when the deck has no notes master.
    pub fn set_notes(&mut self, notes: &str) -> Result<()> {
        if !self.notes_supported {
            return Err(OoxmlError::Unsupported(
                "presentation has no notes master".to_string(),
            ));
        }
        self.notes = Some(notes.to_string());
        Ok(())
    }

    #[inline]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Slide XML. `image_rids` maps the slide's images to relationship ids.
    pub(crate) fn to_xml(&self, image_rids: &[String]) -> Result<String> {
        let mut xml = String::with_capacity(2048);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(xml, "<p:sld {}>", SLIDE_NAMESPACES).map_err(|e| OoxmlError::Xml(e.to_string()))?;
        xml.push_str("<p:cSld>");
        xml.push_str("<p:spTree>");
        write_group_properties(&mut xml);

        for shape in &self.shapes {
            shape.to_xml(&mut xml, image_rids)?;
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        Ok(xml)
    }

    /// Notes slide XML, one paragraph per line of the notes.
    pub(crate) fn notes_xml(&self) -> Option<Result<String>> {
        let notes = self.notes.as_ref()?;

        let mut xml = String::with_capacity(1024 + notes.len());

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        if let Err(e) = write!(xml, "<p:notes {}>", SLIDE_NAMESPACES) {
            return Some(Err(OoxmlError::Xml(e.to_string())));
        }
        xml.push_str("<p:cSld>");
        xml.push_str("<p:spTree>");
        write_group_properties(&mut xml);

        xml.push_str("<p:sp>");
        xml.push_str("<p:nvSpPr>");
        xml.push_str(r#"<p:cNvPr id="2" name="Slide Image Placeholder 1"/>"#);
        xml.push_str(
            r#"<p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>"#,
        );
        xml.push_str(r#"<p:nvPr><p:ph type="sldImg"/></p:nvPr>"#);
        xml.push_str("</p:nvSpPr>");
        xml.push_str("<p:spPr/>");
        xml.push_str("</p:sp>");

        xml.push_str("<p:sp>");
        xml.push_str("<p:nvSpPr>");
        xml.push_str(r#"<p:cNvPr id="3" name="Notes Placeholder 2"/>"#);
        xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
        xml.push_str(r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr>"#);
        xml.push_str("</p:nvSpPr>");
        xml.push_str("<p:spPr/>");
        xml.push_str("<p:txBody>");
        xml.push_str("<a:bodyPr/>");
        xml.push_str("<a:lstStyle/>");
        let notes = sanitize_text(notes);
        let mut lines: Vec<&str> = notes.lines().collect();
        if lines.is_empty() {
            lines.push("");
        }
        for line in lines {
            xml.push_str("<a:p>");
            if line.is_empty() {
                xml.push_str(r#"<a:endParaRPr lang="en-US" dirty="0"/>"#);
            } else {
                xml.push_str(r#"<a:r><a:rPr lang="en-US" dirty="0"/>"#);
                if let Err(e) = write!(xml, "<a:t>{}</a:t>", escape_xml(line)) {
                    return Some(Err(OoxmlError::Xml(e.to_string())));
                }
                xml.push_str("</a:r>");
            }
            xml.push_str("</a:p>");
        }
        xml.push_str("</p:txBody>");
        xml.push_str("</p:sp>");

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:notes>");

        Some(Ok(xml))
    }
}

fn write_group_properties(xml: &mut String) {
    xml.push_str("<p:nvGrpSpPr>");
    xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
    xml.push_str("<p:cNvGrpSpPr/>");
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvGrpSpPr>");
    xml.push_str("<p:grpSpPr>");
    xml.push_str("<a:xfrm>");
    xml.push_str(r#"<a:off x="0" y="0"/>"#);
    xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
    xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
    xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
    xml.push_str("</a:xfrm>");
    xml.push_str("</p:grpSpPr>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::parts::slide::parse_shape_tree;
    use crate::ooxml::pptx::shapes::{PlaceholderRole, PlaceholderType, ShapeType, TextFrame};
    use crate::ooxml::pptx::testing::png_bytes;

    fn layout() -> LayoutTemplate {
        let ph = |ph_type, idx, name: &str| LayoutPlaceholder {
            name: name.to_string(),
            format: PlaceholderFormat {
                ph_type,
                idx,
                orient: None,
                sz: None,
            },
            geometry: Some(Geometry::new(10, 20, 30, 40)),
        };
        LayoutTemplate {
            partname: PackURI::new("/ppt/slideLayouts/slideLayout2.xml").unwrap(),
            name: "Title and Content".to_string(),
            placeholders: vec![
                ph(PlaceholderType::Title, 0, "Title 1"),
                ph(PlaceholderType::Object, 1, "Content Placeholder 2"),
            ],
        }
    }

    #[test]
    fn test_slide_clones_layout_placeholders() {
        let slide = MutableSlide::from_layout(&layout(), true);
        let roles: Vec<_> = slide.shapes().iter().map(MutableShape::role).collect();
        assert_eq!(roles, vec![PlaceholderRole::Title, PlaceholderRole::Body]);
        assert_eq!(slide.shapes()[0].shape_id(), 2);
        assert_eq!(slide.shapes()[1].shape_id(), 3);
    }

    #[test]
    fn test_slide_xml_shapes_parse_back() {
        let mut slide = MutableSlide::from_layout(&layout(), true);
        let mut text = TextBody::new();
        text.add_paragraph("loose", Some(18.0));
        slide.add_text_box(Geometry::new(914400, 1828800, 7315200, 2743200), text);
        slide
            .add_picture(Bytes::from(png_bytes(7)), Geometry::new(1, 2, 3, 4))
            .unwrap();

        let xml = slide.to_xml(&["rId2".to_string()]).unwrap();
        let shapes = parse_shape_tree(&xml).unwrap();
        assert_eq!(shapes.len(), 4);
        assert_eq!(shapes[3].shape_type(), ShapeType::Picture);
        assert_eq!(shapes[2].text().unwrap(), "loose");
        assert_eq!(shapes[2].geometry().unwrap(), Some(Geometry::new(914400, 1828800, 7315200, 2743200)));
        assert!(shapes[0].is_placeholder());
    }

    #[test]
    fn test_add_picture_rejects_unknown_blob() {
        let mut slide = MutableSlide::from_layout(&layout(), true);
        let err = slide.add_picture(Bytes::from_static(b"not an image"), Geometry::new(0, 0, 1, 1));
        assert!(err.is_err());
        assert!(slide.images().is_empty());
        assert_eq!(slide.shapes().len(), 2);
    }

    #[test]
    fn test_notes_need_notes_master() {
        let mut slide = MutableSlide::from_layout(&layout(), false);
        assert!(slide.set_notes("remember").is_err());
        assert!(slide.notes_xml().is_none());

        let mut slide = MutableSlide::from_layout(&layout(), true);
        slide.set_notes("line one\nline two").unwrap();
        let xml = slide.notes_xml().unwrap().unwrap();
        let shapes = parse_shape_tree(&xml).unwrap();
        let body = TextFrame::parse(shapes[1].xml()).unwrap();
        assert_eq!(body.paragraphs().len(), 2);
        assert_eq!(body.text(), "line one\nline two");
    }
}
