/// Picture shapes (`<p:pic>`).
use crate::ooxml::error::Result;
use crate::ooxml::pptx::shapes::base::{BaseShape, ShapeType};
use crate::ooxml::xml::prefixed_attr;
use quick_xml::Reader;
use quick_xml::events::Event;

#[derive(Debug, Clone)]
pub struct Picture<'a> {
    base: &'a BaseShape,
}

impl<'a> Picture<'a> {
    /// View a shape as a picture. `None` unless it is a `p:pic`.
    pub fn from_shape(base: &'a BaseShape) -> Option<Self> {
        (base.shape_type() == ShapeType::Picture).then_some(Self { base })
    }

    #[inline]
    pub fn base(&self) -> &BaseShape {
        self.base
    }

    /// rId of the embedded image (`<a:blip r:embed>`). `None` for pictures
    /// that only link to an external file.
    pub fn image_r_id(&self) -> Result<Option<String>> {
        let mut reader = Reader::from_str(self.base.xml());
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"blip" => {
                    return Ok(prefixed_attr(&e, b"embed"));
                },
                Event::Eof => return Ok(None),
                _ => {},
            }
        }
    }
}
