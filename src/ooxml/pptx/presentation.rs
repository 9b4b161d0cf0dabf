/// Read-only presentation API over an opened package.
use crate::ooxml::error::Result;
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::pptx::parts::{PresentationPart, SlideMasterPart, SlidePart};
use crate::ooxml::pptx::slide::{Slide, SlideLayout, SlideMaster};

/// A PowerPoint presentation.
///
/// Obtained through [`Package::presentation`](crate::ooxml::pptx::Package::presentation).
pub struct Presentation<'a> {
    part: PresentationPart<'a>,
    package: &'a OpcPackage,
}

impl<'a> Presentation<'a> {
    #[inline]
    pub(crate) fn new(part: PresentationPart<'a>, package: &'a OpcPackage) -> Self {
        Self { part, package }
    }

    pub fn slide_count(&self) -> Result<usize> {
        self.part.slide_count()
    }

    /// Slide width and height in EMUs.
    pub fn slide_size(&self) -> Result<Option<(i64, i64)>> {
        self.part.slide_size()
    }

    /// Slides in presentation order.
    pub fn slides(&self) -> Result<Vec<Slide<'a>>> {
        let pres_part = self.part.part();
        let mut slides = Vec::new();
        for r_id in self.part.slide_rids()? {
            let part = self.package.related_part(pres_part, &r_id)?;
            slides.push(Slide::new(SlidePart::from_part(part)?, self.package));
        }
        Ok(slides)
    }

    pub fn slide_masters(&self) -> Result<Vec<SlideMaster<'a>>> {
        let pres_part = self.part.part();
        let mut masters = Vec::new();
        for r_id in self.part.slide_master_rids()? {
            let part = self.package.related_part(pres_part, &r_id)?;
            masters.push(SlideMaster::new(SlideMasterPart::from_part(part)?, self.package));
        }
        Ok(masters)
    }

    /// Layouts of the first slide master, the set new slides are made from.
    pub fn slide_layouts(&self) -> Result<Vec<SlideLayout<'a>>> {
        match self.slide_masters()?.into_iter().next() {
            Some(master) => master.slide_layouts(),
            None => Ok(Vec::new()),
        }
    }

    pub fn notes_master_partname(&self) -> Option<PackURI> {
        self.part
            .part()
            .rels()
            .with_reltype(rt::NOTES_MASTER)
            .find_map(|rel| rel.target_partname().ok())
    }

    #[inline]
    pub fn part(&self) -> &PresentationPart<'a> {
        &self.part
    }
}
