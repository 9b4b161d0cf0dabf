/// Slide, slide layout, slide master and notes slide parts.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::Part;
use crate::ooxml::pptx::shapes::base::{BaseShape, ShapeType};
use crate::ooxml::xml::{attr, prefixed_attr};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Top-level shapes of the first `<p:spTree>` in `xml`, in document order.
///
/// Group shapes are returned whole; their members are not flattened.
pub(crate) fn parse_shape_tree(xml: &str) -> Result<Vec<BaseShape>> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();
    let mut in_tree = false;

    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) if !in_tree && e.local_name().as_ref() == b"spTree" => in_tree = true,
            Event::End(e) if e.local_name().as_ref() == b"spTree" => break,
            Event::Start(e) if in_tree => {
                reader.read_to_end(e.name())?;
                if let Some(shape_type) = ShapeType::from_local_name(e.local_name().as_ref()) {
                    let end = reader.buffer_position() as usize;
                    shapes.push(BaseShape::new(xml[start..end].to_string(), shape_type));
                }
            },
            Event::Empty(e) if in_tree => {
                if let Some(shape_type) = ShapeType::from_local_name(e.local_name().as_ref()) {
                    let end = reader.buffer_position() as usize;
                    shapes.push(BaseShape::new(xml[start..end].to_string(), shape_type));
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(shapes)
}

/// `name` attribute of `<p:cSld>`.
fn common_slide_name(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"cSld" => {
                return Ok(attr(&e, b"name").unwrap_or_default());
            },
            Event::Eof => return Ok(String::new()),
            _ => {},
        }
    }
}

fn xml_of<'a>(part: &'a dyn Part) -> Result<&'a str> {
    std::str::from_utf8(part.blob()).map_err(|e| OoxmlError::Xml(e.to_string()))
}

/// Partname of the single relationship of `reltype` on `part`, if present.
fn related_partname(part: &dyn Part, reltype: &str) -> Option<PackURI> {
    part.rels()
        .with_reltype(reltype)
        .find_map(|rel| rel.target_partname().ok())
}

/// A slide part, `/ppt/slides/slideN.xml`.
pub struct SlidePart<'a> {
    part: &'a dyn Part,
}

impl<'a> SlidePart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    #[inline]
    pub fn part(&self) -> &'a dyn Part {
        self.part
    }

    pub fn name(&self) -> Result<String> {
        common_slide_name(xml_of(self.part)?)
    }

    pub fn shapes(&self) -> Result<Vec<BaseShape>> {
        parse_shape_tree(xml_of(self.part)?)
    }

    pub fn layout_partname(&self) -> Option<PackURI> {
        related_partname(self.part, rt::SLIDE_LAYOUT)
    }

    pub fn notes_slide_partname(&self) -> Option<PackURI> {
        related_partname(self.part, rt::NOTES_SLIDE)
    }
}

/// A slide layout part, `/ppt/slideLayouts/slideLayoutN.xml`.
pub struct SlideLayoutPart<'a> {
    part: &'a dyn Part,
}

impl<'a> SlideLayoutPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    #[inline]
    pub fn part(&self) -> &'a dyn Part {
        self.part
    }

    pub fn name(&self) -> Result<String> {
        common_slide_name(xml_of(self.part)?)
    }

    pub fn shapes(&self) -> Result<Vec<BaseShape>> {
        parse_shape_tree(xml_of(self.part)?)
    }

    pub fn master_partname(&self) -> Option<PackURI> {
        related_partname(self.part, rt::SLIDE_MASTER)
    }
}

/// A slide master part, `/ppt/slideMasters/slideMasterN.xml`.
pub struct SlideMasterPart<'a> {
    part: &'a dyn Part,
}

impl<'a> SlideMasterPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    #[inline]
    pub fn part(&self) -> &'a dyn Part {
        self.part
    }

    pub fn name(&self) -> Result<String> {
        common_slide_name(xml_of(self.part)?)
    }

    pub fn shapes(&self) -> Result<Vec<BaseShape>> {
        parse_shape_tree(xml_of(self.part)?)
    }

    /// rIds of `<p:sldLayoutIdLst>` in declaration order.
    pub fn slide_layout_rids(&self) -> Result<Vec<String>> {
        let mut reader = Reader::from_str(xml_of(self.part)?);
        let mut rids = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e)
                    if e.local_name().as_ref() == b"sldLayoutId" =>
                {
                    if let Some(r_id) = prefixed_attr(&e, b"id") {
                        rids.push(r_id);
                    }
                },
                Event::End(e) if e.local_name().as_ref() == b"sldLayoutIdLst" => break,
                Event::Eof => break,
                _ => {},
            }
        }
        Ok(rids)
    }
}

/// A notes slide part, `/ppt/notesSlides/notesSlideN.xml`.
pub struct NotesSlidePart<'a> {
    part: &'a dyn Part,
}

impl<'a> NotesSlidePart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    pub fn shapes(&self) -> Result<Vec<BaseShape>> {
        parse_shape_tree(xml_of(self.part)?)
    }
}
