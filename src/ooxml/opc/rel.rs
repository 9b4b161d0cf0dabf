/// Relationships between parts of an OPC package.
///
/// Each source part (and the package itself) owns one [`Relationships`]
/// collection keyed by rId. Internal targets are stored as references relative
/// to the source part's directory, exactly as they appear in the `.rels` XML.
use crate::ooxml::opc::constants::target_mode;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::xml::escape_xml;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Relationship {
    r_id: String,
    reltype: String,
    target_ref: String,
    base_uri: String,
    is_external: bool,
}

impl Relationship {
    pub fn new(
        r_id: String,
        reltype: String,
        target_ref: String,
        base_uri: String,
        is_external: bool,
    ) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            base_uri,
            is_external,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Relative part reference for internal relationships, a URL otherwise.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Absolute partname of the target. Fails for external relationships.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OpcError::InvalidRelationship(format!(
                "{} targets an external resource: {}",
                self.r_id, self.target_ref
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref)
    }
}

#[derive(Debug, Clone)]
pub struct Relationships {
    base_uri: String,
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    pub fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            rels: HashMap::new(),
        }
    }

    pub fn add_relationship(
        &mut self,
        reltype: String,
        target_ref: String,
        r_id: String,
        is_external: bool,
    ) {
        let rel = Relationship::new(
            r_id.clone(),
            reltype,
            target_ref,
            self.base_uri.clone(),
            is_external,
        );
        self.rels.insert(r_id, rel);
    }

    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.get(r_id)
    }

    /// rId of the internal relationship of `reltype` to `target_ref`, created
    /// with the next free rId when none exists yet.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> String {
        if let Some(rel) = self.rels.values().find(|rel| {
            !rel.is_external() && rel.reltype() == reltype && rel.target_ref() == target_ref
        }) {
            return rel.r_id().to_string();
        }

        let r_id = self.next_r_id();
        self.add_relationship(reltype.to_string(), target_ref.to_string(), r_id.clone(), false);
        r_id
    }

    /// Lowest unused `rIdN`, filling gaps left by removed relationships.
    fn next_r_id(&self) -> String {
        let mut used: Vec<u32> = self
            .rels
            .keys()
            .filter_map(|r_id| r_id.strip_prefix("rId"))
            .filter_map(|digits| atoi_simd::parse::<u32, false, false>(digits.as_bytes()).ok())
            .collect();
        used.sort_unstable();

        let mut next = 1u32;
        for num in used {
            match num.cmp(&next) {
                std::cmp::Ordering::Equal => next += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }
        format!("rId{}", next)
    }

    /// The single relationship of `reltype`, if exactly one exists.
    pub fn part_with_reltype(&self, reltype: &str) -> Result<&Relationship> {
        let mut matching = self.rels.values().filter(|rel| rel.reltype() == reltype);
        match (matching.next(), matching.next()) {
            (Some(rel), None) => Ok(rel),
            (None, _) => Err(OpcError::RelationshipNotFound(format!(
                "no relationship of type '{}'",
                reltype
            ))),
            (Some(_), Some(_)) => Err(OpcError::InvalidRelationship(format!(
                "multiple relationships of type '{}'",
                reltype
            ))),
        }
    }

    pub fn with_reltype<'a>(&'a self, reltype: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.rels.values().filter(move |rel| rel.reltype() == reltype)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    pub fn remove(&mut self, r_id: &str) -> Option<Relationship> {
        self.rels.remove(r_id)
    }

    /// Serialize to `.rels` XML, ordered by numeric rId.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(128 + self.rels.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        let mut rels: Vec<&Relationship> = self.rels.values().collect();
        rels.sort_by_key(|rel| rid_sort_key(rel.r_id()));

        for rel in rels {
            xml.push_str(r#"<Relationship Id=""#);
            xml.push_str(&escape_xml(rel.r_id()));
            xml.push_str(r#"" Type=""#);
            xml.push_str(&escape_xml(rel.reltype()));
            xml.push_str(r#"" Target=""#);
            xml.push_str(&escape_xml(rel.target_ref()));
            xml.push('"');
            if rel.is_external() {
                xml.push_str(r#" TargetMode=""#);
                xml.push_str(target_mode::EXTERNAL);
                xml.push('"');
            }
            xml.push_str("/>");
        }

        xml.push_str("</Relationships>");
        xml
    }
}

fn rid_sort_key(r_id: &str) -> (u32, &str) {
    let num = r_id
        .strip_prefix("rId")
        .and_then(|digits| atoi_simd::parse::<u32, false, false>(digits.as_bytes()).ok())
        .unwrap_or(u32::MAX);
    (num, r_id)
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new("/".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE: &str = crate::ooxml::opc::constants::relationship_type::SLIDE;

    #[test]
    fn test_target_partname() {
        let rel = Relationship::new(
            "rId1".to_string(),
            SLIDE.to_string(),
            "slides/slide1.xml".to_string(),
            "/ppt".to_string(),
            false,
        );
        assert_eq!(rel.target_partname().unwrap().as_str(), "/ppt/slides/slide1.xml");

        let ext = Relationship::new(
            "rId2".to_string(),
            "hyperlink".to_string(),
            "https://example.com".to_string(),
            "/ppt".to_string(),
            true,
        );
        assert!(ext.target_partname().is_err());
    }

    #[test]
    fn test_get_or_add_reuses_and_fills_gaps() {
        let mut rels = Relationships::new("/ppt".to_string());
        assert_eq!(rels.get_or_add(SLIDE, "slides/slide1.xml"), "rId1");
        assert_eq!(rels.get_or_add(SLIDE, "slides/slide1.xml"), "rId1");
        assert_eq!(rels.get_or_add(SLIDE, "slides/slide2.xml"), "rId2");
        assert_eq!(rels.get_or_add(SLIDE, "slides/slide3.xml"), "rId3");

        rels.remove("rId2");
        assert_eq!(rels.get_or_add(SLIDE, "slides/slide4.xml"), "rId2");
    }

    #[test]
    fn test_part_with_reltype() {
        let mut rels = Relationships::new("/ppt".to_string());
        assert!(rels.part_with_reltype(SLIDE).is_err());
        rels.get_or_add(SLIDE, "slides/slide1.xml");
        assert_eq!(rels.part_with_reltype(SLIDE).unwrap().r_id(), "rId1");
        rels.get_or_add(SLIDE, "slides/slide2.xml");
        assert!(rels.part_with_reltype(SLIDE).is_err());
        assert_eq!(rels.with_reltype(SLIDE).count(), 2);
    }

    #[test]
    fn test_part_with_reltype_outlives_query() {
        let mut rels = Relationships::new("/ppt".to_string());
        rels.get_or_add(SLIDE, "slides/slide1.xml");
        let found = {
            let reltype = SLIDE.to_string();
            rels.part_with_reltype(&reltype).unwrap()
        };
        assert_eq!(found.r_id(), "rId1");
        assert_eq!(found.reltype(), SLIDE);
    }

    #[test]
    fn test_to_xml_numeric_order() {
        let mut rels = Relationships::new("/ppt".to_string());
        for i in 1..=10 {
            rels.get_or_add(SLIDE, &format!("slides/slide{}.xml", i));
        }
        let xml = rels.to_xml();
        let pos2 = xml.find(r#"Id="rId2""#).unwrap();
        let pos10 = xml.find(r#"Id="rId10""#).unwrap();
        assert!(pos2 < pos10);
    }
}
