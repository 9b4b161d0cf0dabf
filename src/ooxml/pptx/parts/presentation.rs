/// Presentation part, `/ppt/presentation.xml`.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::part::Part;
use crate::ooxml::xml::{attr, prefixed_attr};
use quick_xml::Reader;
use quick_xml::events::Event;

pub struct PresentationPart<'a> {
    part: &'a dyn Part,
}

impl<'a> PresentationPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    #[inline]
    pub fn part(&self) -> &'a dyn Part {
        self.part
    }

    fn xml(&self) -> Result<&'a str> {
        std::str::from_utf8(self.part.blob()).map_err(|e| OoxmlError::Xml(e.to_string()))
    }

    /// Number of `<p:sldId>` entries.
    pub fn slide_count(&self) -> Result<usize> {
        Ok(self.slide_rids()?.len())
    }

    /// rIds of `<p:sldIdLst>` in presentation order.
    pub fn slide_rids(&self) -> Result<Vec<String>> {
        self.id_list_rids(b"sldId")
    }

    /// rIds of `<p:sldMasterIdLst>` in declaration order.
    pub fn slide_master_rids(&self) -> Result<Vec<String>> {
        self.id_list_rids(b"sldMasterId")
    }

    fn id_list_rids(&self, entry: &[u8]) -> Result<Vec<String>> {
        let mut reader = Reader::from_str(self.xml()?);
        let mut rids = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == entry => {
                    if let Some(r_id) = prefixed_attr(&e, b"id") {
                        rids.push(r_id);
                    }
                },
                Event::Eof => break,
                _ => {},
            }
        }
        Ok(rids)
    }

    /// Slide width and height in EMUs from `<p:sldSz>`.
    pub fn slide_size(&self) -> Result<Option<(i64, i64)>> {
        let mut reader = Reader::from_str(self.xml()?);
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldSz" => {
                    let dim = |key: &[u8]| attr(&e, key).and_then(|v| v.parse::<i64>().ok());
                    return Ok(dim(b"cx").zip(dim(b"cy")));
                },
                Event::Eof => return Ok(None),
                _ => {},
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;
    use crate::ooxml::opc::packuri::PackURI;
    use crate::ooxml::opc::part::XmlPart;

    #[test]
    fn test_presentation_lists() {
        let xml = r#"<p:presentation xmlns:p="p" xmlns:r="r">
            <p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>
            <p:sldIdLst><p:sldId id="256" r:id="rId3"/><p:sldId id="257" r:id="rId2"/></p:sldIdLst>
            <p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/>
        </p:presentation>"#;
        let part = XmlPart::new(
            PackURI::new("/ppt/presentation.xml").unwrap(),
            ct::PML_PRESENTATION_MAIN.to_string(),
            xml.to_string(),
        );
        let pres = PresentationPart::from_part(&part).unwrap();

        assert_eq!(pres.slide_rids().unwrap(), vec!["rId3", "rId2"]);
        assert_eq!(pres.slide_count().unwrap(), 2);
        assert_eq!(pres.slide_master_rids().unwrap(), vec!["rId1"]);
        assert_eq!(pres.slide_size().unwrap(), Some((12192000, 6858000)));
    }
}
