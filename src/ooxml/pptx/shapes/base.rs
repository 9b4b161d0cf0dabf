/// Base shape types for PresentationML slides, layouts and masters.
use crate::ooxml::error::Result;
use crate::ooxml::pptx::shapes::placeholder::PlaceholderFormat;
use crate::ooxml::pptx::shapes::textframe::TextFrame;
use crate::ooxml::xml::attr;
use quick_xml::Reader;
use quick_xml::events::Event;

/// Which element a shape was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    /// `p:sp`
    Shape,
    /// `p:pic`
    Picture,
    /// `p:graphicFrame`, tables and charts
    GraphicFrame,
    /// `p:grpSp`
    GroupShape,
    /// `p:cxnSp`
    Connector,
}

impl ShapeType {
    pub fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"sp" => Some(Self::Shape),
            b"pic" => Some(Self::Picture),
            b"graphicFrame" => Some(Self::GraphicFrame),
            b"grpSp" => Some(Self::GroupShape),
            b"cxnSp" => Some(Self::Connector),
            _ => None,
        }
    }
}

pub const EMUS_PER_INCH: i64 = 914_400;

/// Position and size in EMUs (914400 per inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Geometry {
    pub const fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Geometry given in inches, rounded to whole EMUs.
    pub fn from_inches(left: f64, top: f64, width: f64, height: f64) -> Self {
        let emu = |inches: f64| (inches * EMUS_PER_INCH as f64).round() as i64;
        Self::new(emu(left), emu(top), emu(width), emu(height))
    }
}

/// One top-level shape, holding the raw XML of its element.
#[derive(Debug, Clone)]
pub struct BaseShape {
    xml: String,
    shape_type: ShapeType,
}

impl BaseShape {
    pub fn new(xml: String, shape_type: ShapeType) -> Self {
        Self { xml, shape_type }
    }

    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    #[inline]
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// `name` of the shape's `<p:cNvPr>`.
    pub fn name(&self) -> Result<String> {
        Ok(self
            .first_element_attr(b"cNvPr", b"name")?
            .unwrap_or_default())
    }

    /// Position and size from the shape's own transform, if it has one.
    ///
    /// Placeholders usually leave this out and inherit it from their layout.
    pub fn geometry(&self) -> Result<Option<Geometry>> {
        let mut reader = Reader::from_str(&self.xml);
        let mut in_xfrm = false;
        let mut off = None;
        let mut ext = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) if e.local_name().as_ref() == b"xfrm" => in_xfrm = true,
                Event::End(e) if e.local_name().as_ref() == b"xfrm" => break,
                Event::Start(e) | Event::Empty(e) if in_xfrm => match e.local_name().as_ref() {
                    b"off" => off = Some((emu(&e, b"x"), emu(&e, b"y"))),
                    b"ext" => ext = Some((emu(&e, b"cx"), emu(&e, b"cy"))),
                    _ => {},
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(match (off, ext) {
            (Some((left, top)), Some((width, height))) => {
                Some(Geometry::new(left, top, width, height))
            },
            _ => None,
        })
    }

    /// The `<p:ph>` of this shape, `None` for ordinary shapes.
    pub fn placeholder(&self) -> Result<Option<PlaceholderFormat>> {
        let mut reader = Reader::from_str(&self.xml);
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"ph" => {
                    return Ok(Some(PlaceholderFormat::from_element(&e)));
                },
                // Only the shape's own non-visual properties; group members
                // carry their own.
                Event::End(e) if e.local_name().as_ref() == b"nvPr" => return Ok(None),
                Event::Eof => return Ok(None),
                _ => {},
            }
        }
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        matches!(self.placeholder(), Ok(Some(_)))
    }

    pub fn text_frame(&self) -> Result<TextFrame> {
        TextFrame::parse(&self.xml)
    }

    pub fn text(&self) -> Result<String> {
        Ok(self.text_frame()?.text())
    }

    pub(crate) fn first_element_attr(&self, local: &[u8], key: &[u8]) -> Result<Option<String>> {
        let mut reader = Reader::from_str(&self.xml);
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == local => {
                    return Ok(attr(&e, key));
                },
                Event::Eof => return Ok(None),
                _ => {},
            }
        }
    }
}

fn emu(e: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> i64 {
    attr(e, key)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0)
}
