/// A new presentation built on top of a template package.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::{content_type as ct, namespace, relationship_type as rt};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::part::{BlobPart, Part, XmlPart};
use crate::ooxml::pptx::package::Package;
use crate::ooxml::pptx::shapes::{BaseShape, Geometry, PlaceholderFormat, PlaceholderType};
use crate::ooxml::pptx::slide::SlideLayout;
use crate::ooxml::pptx::writer::slide::{LayoutPlaceholder, LayoutTemplate, MutableSlide};
use crate::ooxml::xml::{escape_xml, namespace_prefix, qualify};
use memchr::memmem;
use quick_xml::Reader;
use quick_xml::events::Event;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;
use std::ops::Range;
use tracing::debug;

/// First `id` of `<p:sldId>`; lower values are reserved.
const FIRST_SLIDE_ID: usize = 256;

/// A presentation that keeps the template's masters, layouts, theme and
/// media, drops its slides and collects new ones.
///
/// # Examples
///
/// ```rust,no_run
/// use slidegen::ooxml::pptx::MutablePresentation;
///
/// let template = std::fs::read("template.potx")?;
/// let mut pres = MutablePresentation::from_template(&template)?;
/// pres.add_slide(0)?;
/// std::fs::write("deck.pptx", pres.to_bytes()?)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct MutablePresentation {
    package: OpcPackage,
    pres_partname: PackURI,
    layouts: Vec<LayoutTemplate>,
    notes_master: Option<PackURI>,
    slides: Vec<MutableSlide>,
}

impl MutablePresentation {
    /// Open `data` as the base of a new deck.
    ///
    /// Fails when the package is not a presentation or its first slide
    /// master has no layouts.
    pub fn from_template(data: &[u8]) -> Result<Self> {
        let package = Package::from_bytes(data)?;
        let pres_partname = package.opc_package().main_document_partname()?;

        let (layouts, notes_master, template_slides) = {
            let pres = package.presentation()?;
            let master = pres.slide_masters()?.into_iter().next().ok_or_else(|| {
                OoxmlError::InvalidFormat("presentation has no slide master".to_string())
            })?;
            let master_placeholders = master.placeholders()?;

            let mut layouts = Vec::new();
            for layout in master.slide_layouts()? {
                layouts.push(layout_template(&layout, &master_placeholders)?);
            }
            if layouts.is_empty() {
                return Err(OoxmlError::InvalidFormat(
                    "slide master has no layouts".to_string(),
                ));
            }

            let notes_master = pres
                .notes_master_partname()
                .filter(|partname| package.opc_package().contains_part(partname));

            let template_slides: Vec<(String, PackURI)> = pres
                .part()
                .part()
                .rels()
                .with_reltype(rt::SLIDE)
                .filter_map(|rel| {
                    rel.target_partname()
                        .ok()
                        .map(|partname| (rel.r_id().to_string(), partname))
                })
                .collect();

            (layouts, notes_master, template_slides)
        };

        let mut opc = package.into_opc_package();
        detach_slides(&mut opc, &pres_partname, &template_slides)?;
        debug!(
            layouts = layouts.len(),
            dropped_slides = template_slides.len(),
            notes = notes_master.is_some(),
            "opened template"
        );

        Ok(Self {
            package: opc,
            pres_partname,
            layouts,
            notes_master,
            slides: Vec::new(),
        })
    }

    /// Layouts of the first slide master, in `<p:sldLayoutIdLst>` order.
    #[inline]
    pub fn layouts(&self) -> &[LayoutTemplate] {
        &self.layouts
    }

    #[inline]
    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    #[inline]
    pub fn has_notes_master(&self) -> bool {
        self.notes_master.is_some()
    }

    /// Append a slide made from layout `layout_idx`.
    pub fn add_slide(&mut self, layout_idx: usize) -> Result<&mut MutableSlide> {
        let layout = self.layouts.get(layout_idx).ok_or_else(|| {
            OoxmlError::InvalidFormat(format!("no slide layout at index {}", layout_idx))
        })?;
        let slide = MutableSlide::from_layout(layout, self.notes_master.is_some());
        self.slides.push(slide);
        let idx = self.slides.len() - 1;
        Ok(&mut self.slides[idx])
    }

    #[inline]
    pub fn slides(&self) -> &[MutableSlide] {
        &self.slides
    }

    #[inline]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide_mut(&mut self, index: usize) -> Option<&mut MutableSlide> {
        self.slides.get_mut(index)
    }

    /// Write the slides into the package and serialize it as a `.pptx`.
    pub fn to_bytes(mut self) -> Result<Vec<u8>> {
        let mut media = self.media_index();
        let slides = std::mem::take(&mut self.slides);

        let mut slide_rids = Vec::with_capacity(slides.len());
        for slide in &slides {
            slide_rids.push(self.write_slide(slide, &mut media)?);
        }

        let pres_part = self.package.get_part_mut(&self.pres_partname)?;
        let xml = std::str::from_utf8(pres_part.blob())
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        let rewritten = rewrite_presentation_xml(xml, &slide_rids)?;
        pres_part.set_blob(rewritten.into_bytes());
        if pres_part.content_type() != ct::PML_PRESENTATION_MAIN {
            debug!(from = pres_part.content_type(), "writing template as presentation");
            pres_part.set_content_type(ct::PML_PRESENTATION_MAIN);
        }

        Ok(self.package.to_bytes()?)
    }

    /// Image parts already in the package, keyed by SHA-256 of their bytes.
    fn media_index(&self) -> HashMap<Vec<u8>, PackURI> {
        self.package
            .iter_parts()
            .filter(|part| part.content_type().starts_with("image/"))
            .map(|part| (Sha256::digest(part.blob()).to_vec(), part.partname().clone()))
            .collect()
    }

    /// Add the parts of one slide and relate it to the presentation.
    /// Returns the presentation's rId for the slide.
    fn write_slide(
        &mut self,
        slide: &MutableSlide,
        media: &mut HashMap<Vec<u8>, PackURI>,
    ) -> Result<String> {
        let partname = self.package.next_partname("/ppt/slides/slide%d.xml")?;
        let mut part = XmlPart::new(partname.clone(), ct::PML_SLIDE.to_string(), String::new());
        part.relate_to_part(slide.layout_partname(), rt::SLIDE_LAYOUT);

        let mut image_rids = Vec::with_capacity(slide.images().len());
        for (blob, format) in slide.images() {
            let digest = Sha256::digest(blob).to_vec();
            let image_partname = match media.get(&digest) {
                Some(existing) => existing.clone(),
                None => {
                    let template = format!("/ppt/media/image%d.{}", format.extension());
                    let image_partname = self.package.next_partname(&template)?;
                    self.package.add_part(Box::new(BlobPart::new(
                        image_partname.clone(),
                        format.mime_type().to_string(),
                        blob.clone(),
                    )));
                    media.insert(digest, image_partname.clone());
                    image_partname
                },
            };
            image_rids.push(part.relate_to_part(&image_partname, rt::IMAGE));
        }

        if let Some(notes_master) = self.notes_master.clone()
            && let Some(notes_xml) = slide.notes_xml()
        {
            let notes_partname = self
                .package
                .next_partname("/ppt/notesSlides/notesSlide%d.xml")?;
            let mut notes_part =
                XmlPart::new(notes_partname.clone(), ct::PML_NOTES_SLIDE.to_string(), notes_xml?);
            notes_part.relate_to_part(&notes_master, rt::NOTES_MASTER);
            notes_part.relate_to_part(&partname, rt::SLIDE);
            part.relate_to_part(&notes_partname, rt::NOTES_SLIDE);
            self.package.add_part(Box::new(notes_part));
        }

        part.set_xml(slide.to_xml(&image_rids)?);
        self.package.add_part(Box::new(part));

        let pres_part = self.package.get_part_mut(&self.pres_partname)?;
        Ok(pres_part.relate_to_part(&partname, rt::SLIDE))
    }
}

/// Collect the cloneable placeholders of a layout with their bounds.
fn layout_template(
    layout: &SlideLayout<'_>,
    master_placeholders: &[(PlaceholderFormat, BaseShape)],
) -> Result<LayoutTemplate> {
    let mut placeholders = Vec::new();
    for (format, shape) in layout.placeholders()? {
        if !format.ph_type.is_cloneable() {
            continue;
        }
        let geometry = match shape.geometry()? {
            Some(geometry) => Some(geometry),
            None => inherited_geometry(format.ph_type, master_placeholders)?,
        };
        placeholders.push(LayoutPlaceholder {
            name: shape.name()?,
            format,
            geometry,
        });
    }

    Ok(LayoutTemplate {
        partname: layout.partname().clone(),
        name: layout.name()?,
        placeholders,
    })
}

/// Bounds of the master placeholder a layout placeholder inherits from.
fn inherited_geometry(
    ph_type: PlaceholderType,
    master_placeholders: &[(PlaceholderFormat, BaseShape)],
) -> Result<Option<Geometry>> {
    let wanted = master_type(ph_type);
    for (format, shape) in master_placeholders {
        if master_type(format.ph_type) == wanted
            && let Some(geometry) = shape.geometry()?
        {
            return Ok(Some(geometry));
        }
    }
    Ok(None)
}

/// Masters only carry title and body slots for text; the other text types
/// inherit from those.
fn master_type(ph_type: PlaceholderType) -> PlaceholderType {
    match ph_type {
        PlaceholderType::CenterTitle => PlaceholderType::Title,
        PlaceholderType::SubTitle | PlaceholderType::Object => PlaceholderType::Body,
        other => other,
    }
}

/// Remove the template's slides (and their notes slides) from the part
/// graph. Media they used stays in the package and is only written out if a
/// new slide references it again.
fn detach_slides(
    opc: &mut OpcPackage,
    pres_partname: &PackURI,
    slides: &[(String, PackURI)],
) -> Result<()> {
    for (r_id, partname) in slides {
        opc.get_part_mut(pres_partname)?.rels_mut().remove(r_id);
        if let Some(part) = opc.remove_part(partname) {
            for rel in part.rels().with_reltype(rt::NOTES_SLIDE) {
                if let Ok(notes_partname) = rel.target_partname() {
                    opc.remove_part(&notes_partname);
                }
            }
        }
    }
    Ok(())
}

/// Replace `<p:sldIdLst>` with one listing `slide_rids`.
///
/// Custom shows and section lists refer to the dropped slides, so they are
/// removed too. The new list goes where the old one was, else before
/// `<p:sldSz>`/`<p:notesSz>`. No list is written for an empty deck.
fn rewrite_presentation_xml(xml: &str, slide_rids: &[String]) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut pml_prefix = String::from("p");
    let mut rel_prefix: Option<String> = None;
    let mut removals: Vec<Range<usize>> = Vec::new();
    let mut anchor: Option<usize> = None;
    let mut in_root = false;
    let mut in_ext_lst = false;

    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) if !in_root => {
                if let Some(prefix) = namespace_prefix(&e, namespace::PML_MAIN) {
                    pml_prefix = prefix;
                }
                rel_prefix = namespace_prefix(&e, namespace::OFC_RELATIONSHIPS);
                in_root = true;
            },
            Event::Start(e) if in_ext_lst => {
                reader.read_to_end(e.name())?;
                let end = reader.buffer_position() as usize;
                if e.local_name().as_ref() == b"ext"
                    && memmem::find(xml[start..end].as_bytes(), b"sectionLst").is_some()
                {
                    removals.push(start..end);
                }
            },
            Event::Start(e) => match e.local_name().as_ref() {
                b"extLst" => in_ext_lst = true,
                local => {
                    reader.read_to_end(e.name())?;
                    let end = reader.buffer_position() as usize;
                    match local {
                        b"sldIdLst" => {
                            removals.push(start..end);
                            anchor.get_or_insert(start);
                        },
                        b"custShowLst" => removals.push(start..end),
                        b"sldSz" | b"notesSz" => {
                            anchor.get_or_insert(start);
                        },
                        _ => {},
                    }
                },
            },
            Event::Empty(e) if in_root && !in_ext_lst => match e.local_name().as_ref() {
                b"sldIdLst" => {
                    let end = reader.buffer_position() as usize;
                    removals.push(start..end);
                    anchor.get_or_insert(start);
                },
                b"sldSz" | b"notesSz" => {
                    anchor.get_or_insert(start);
                },
                _ => {},
            },
            Event::End(e) if in_ext_lst && e.local_name().as_ref() == b"extLst" => {
                in_ext_lst = false;
            },
            Event::End(_) if in_root => {
                anchor.get_or_insert(start);
                break;
            },
            Event::Eof => break,
            _ => {},
        }
    }

    let mut edits: Vec<(Range<usize>, String)> =
        removals.into_iter().map(|range| (range, String::new())).collect();
    if !slide_rids.is_empty() {
        let at = anchor.ok_or_else(|| {
            OoxmlError::InvalidFormat("presentation.xml has no root element".to_string())
        })?;
        edits.push((at..at, slide_id_list(&pml_prefix, rel_prefix.as_deref(), slide_rids)?));
    }
    edits.sort_by_key(|(range, _)| (range.start, range.end));

    let mut out = String::with_capacity(xml.len() + slide_rids.len() * 48);
    let mut pos = 0;
    for (range, replacement) in edits {
        out.push_str(&xml[pos..range.start]);
        out.push_str(&replacement);
        pos = range.end;
    }
    out.push_str(&xml[pos..]);
    Ok(out)
}

fn slide_id_list(pml_prefix: &str, rel_prefix: Option<&str>, slide_rids: &[String]) -> Result<String> {
    let list = qualify(pml_prefix, "sldIdLst");
    let entry = qualify(pml_prefix, "sldId");
    // Declare the relationships namespace locally when the root does not.
    let (r, decl) = match rel_prefix {
        Some(prefix) => (prefix.to_string(), String::new()),
        None => (
            "r".to_string(),
            format!(r#" xmlns:r="{}""#, namespace::OFC_RELATIONSHIPS),
        ),
    };
    let id_attr = qualify(&r, "id");

    let mut xml = String::with_capacity(32 + slide_rids.len() * 48);
    write!(xml, "<{}{}>", list, decl).map_err(|e| OoxmlError::Xml(e.to_string()))?;
    for (i, r_id) in slide_rids.iter().enumerate() {
        write!(
            xml,
            r#"<{} id="{}" {}="{}"/>"#,
            entry,
            FIRST_SLIDE_ID + i,
            id_attr,
            escape_xml(r_id)
        )
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    }
    write!(xml, "</{}>", list).map_err(|e| OoxmlError::Xml(e.to_string()))?;
    Ok(xml)
}
