/// Package parts.
///
/// Every part has a partname, a content type, a blob and its outgoing
/// relationships. XML parts additionally expose a `quick-xml` reader over
/// their content; everything else (media, printer settings, fonts) is an
/// opaque [`BlobPart`].
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;
use bytes::Bytes;
use memchr::memmem;
use quick_xml::Reader;

pub trait Part: Send + Sync {
    fn partname(&self) -> &PackURI;

    fn content_type(&self) -> &str;

    fn blob(&self) -> &[u8];

    /// Replace the serialized content of this part.
    fn set_blob(&mut self, blob: Vec<u8>);

    fn set_content_type(&mut self, content_type: &str);

    fn rels(&self) -> &Relationships;

    fn rels_mut(&mut self) -> &mut Relationships;

    /// Add or get a relationship to another part and return its rId.
    ///
    /// `target_ref` is relative to this part's directory.
    fn relate_to(&mut self, target_ref: &str, reltype: &str) -> String {
        self.rels_mut().get_or_add(reltype, target_ref)
    }

    /// Add or get a relationship to `target` and return its rId.
    fn relate_to_part(&mut self, target: &PackURI, reltype: &str) -> String {
        let target_ref = target.relative_ref(self.partname().base_uri());
        self.relate_to(&target_ref, reltype)
    }

    /// Absolute partname behind an rId.
    fn target_partname(&self, r_id: &str) -> Result<PackURI> {
        self.rels()
            .get(r_id)
            .ok_or_else(|| OpcError::RelationshipNotFound(format!("rId: {}", r_id)))?
            .target_partname()
    }

    /// Count `r:id="…"` / `r:embed="…"` style references to an rId in the blob.
    fn rel_ref_count(&self, r_id: &str) -> usize {
        let pattern = format!("=\"{}\"", r_id);
        memmem::Finder::new(pattern.as_bytes())
            .find_iter(self.blob())
            .count()
    }
}

/// Binary part. The blob is reference counted so harvested media can be
/// shared without copying.
#[derive(Debug, Clone)]
pub struct BlobPart {
    partname: PackURI,
    content_type: String,
    blob: Bytes,
    rels: Relationships,
}

impl BlobPart {
    pub fn new(partname: PackURI, content_type: String, blob: impl Into<Bytes>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type,
            blob: blob.into(),
            rels,
        }
    }

    /// Shared handle to the blob.
    pub fn bytes(&self) -> Bytes {
        self.blob.clone()
    }
}

impl Part for BlobPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        &self.blob
    }

    fn set_blob(&mut self, blob: Vec<u8>) {
        self.blob = Bytes::from(blob);
    }

    fn set_content_type(&mut self, content_type: &str) {
        self.content_type = content_type.to_string();
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }
}

/// XML part. Content is guaranteed to be valid UTF-8.
#[derive(Debug, Clone)]
pub struct XmlPart {
    partname: PackURI,
    content_type: String,
    xml: String,
    rels: Relationships,
}

impl XmlPart {
    pub fn new(partname: PackURI, content_type: String, xml: String) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type,
            xml,
            rels,
        }
    }

    /// Load an XML part from raw bytes, rejecting invalid UTF-8.
    pub fn load(partname: PackURI, content_type: String, xml_bytes: Vec<u8>) -> Result<Self> {
        let xml = String::from_utf8(xml_bytes).map_err(|e| {
            OpcError::XmlError(format!("invalid UTF-8 in {}: {}", partname, e.utf8_error()))
        })?;
        Ok(Self::new(partname, content_type, xml))
    }

    pub fn xml_str(&self) -> &str {
        &self.xml
    }

    /// A streaming reader over the part content.
    pub fn reader(&self) -> Reader<&[u8]> {
        Reader::from_reader(self.xml.as_bytes())
    }

    pub fn set_xml(&mut self, xml: String) {
        self.xml = xml;
    }
}

impl Part for XmlPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        self.xml.as_bytes()
    }

    fn set_blob(&mut self, blob: Vec<u8>) {
        self.xml = match String::from_utf8(blob) {
            Ok(xml) => xml,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
    }

    fn set_content_type(&mut self, content_type: &str) {
        self.content_type = content_type.to_string();
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }
}

/// Chooses the part implementation from the content type.
pub struct PartFactory;

impl PartFactory {
    pub fn load(partname: PackURI, content_type: String, blob: Vec<u8>) -> Result<Box<dyn Part>> {
        if Self::is_xml_content_type(&content_type) {
            Ok(Box::new(XmlPart::load(partname, content_type, blob)?))
        } else {
            Ok(Box::new(BlobPart::new(partname, content_type, blob)))
        }
    }

    #[inline]
    fn is_xml_content_type(content_type: &str) -> bool {
        content_type.ends_with("+xml") || content_type.ends_with("/xml")
    }
}
