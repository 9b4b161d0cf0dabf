/// Slides, slide layouts and slide masters of an opened presentation.
use crate::ooxml::error::Result;
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::pptx::parts::{NotesSlidePart, SlideLayoutPart, SlideMasterPart, SlidePart};
use crate::ooxml::pptx::shapes::{BaseShape, PlaceholderFormat, PlaceholderRole, PlaceholderType};

/// A slide in a presentation.
///
/// # Examples
///
/// ```rust,no_run
/// use slidegen::ooxml::pptx::Package;
///
/// let pkg = Package::open("deck.pptx")?;
/// let pres = pkg.presentation()?;
///
/// for slide in pres.slides()? {
///     println!("{}", slide.title()?.unwrap_or_default());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Slide<'a> {
    part: SlidePart<'a>,
    package: &'a OpcPackage,
}

impl<'a> Slide<'a> {
    #[inline]
    pub(crate) fn new(part: SlidePart<'a>, package: &'a OpcPackage) -> Self {
        Self { part, package }
    }

    pub fn name(&self) -> Result<String> {
        self.part.name()
    }

    #[inline]
    pub fn part(&self) -> &SlidePart<'a> {
        &self.part
    }

    pub fn partname(&self) -> &PackURI {
        self.part.part().partname()
    }

    /// Top-level shapes in z-order.
    pub fn shapes(&self) -> Result<Vec<BaseShape>> {
        self.part.shapes()
    }

    /// Placeholder shapes with their parsed `<p:ph>`.
    pub fn placeholders(&self) -> Result<Vec<(PlaceholderFormat, BaseShape)>> {
        placeholders_of(self.shapes()?)
    }

    /// Text of the first title placeholder.
    pub fn title(&self) -> Result<Option<String>> {
        for (ph, shape) in self.placeholders()? {
            if ph.role() == PlaceholderRole::Title {
                return Ok(Some(shape.text()?));
            }
        }
        Ok(None)
    }

    pub fn layout(&self) -> Result<Option<SlideLayout<'a>>> {
        let Some(partname) = self.part.layout_partname() else {
            return Ok(None);
        };
        let part = self.package.get_part(&partname)?;
        Ok(Some(SlideLayout::new(SlideLayoutPart::from_part(part)?, self.package)))
    }

    /// Speaker notes text, taken from the notes slide's body placeholder.
    pub fn notes(&self) -> Result<Option<String>> {
        let Some(partname) = self.part.notes_slide_partname() else {
            return Ok(None);
        };
        let notes = NotesSlidePart::from_part(self.package.get_part(&partname)?)?;
        for (ph, shape) in placeholders_of(notes.shapes()?)? {
            if ph.ph_type == PlaceholderType::Body {
                return Ok(Some(shape.text()?));
            }
        }
        Ok(None)
    }
}

/// A slide layout.
pub struct SlideLayout<'a> {
    part: SlideLayoutPart<'a>,
    package: &'a OpcPackage,
}

impl<'a> SlideLayout<'a> {
    #[inline]
    pub(crate) fn new(part: SlideLayoutPart<'a>, package: &'a OpcPackage) -> Self {
        Self { part, package }
    }

    pub fn name(&self) -> Result<String> {
        self.part.name()
    }

    #[inline]
    pub fn part(&self) -> &SlideLayoutPart<'a> {
        &self.part
    }

    pub fn partname(&self) -> &PackURI {
        self.part.part().partname()
    }

    pub fn shapes(&self) -> Result<Vec<BaseShape>> {
        self.part.shapes()
    }

    pub fn placeholders(&self) -> Result<Vec<(PlaceholderFormat, BaseShape)>> {
        placeholders_of(self.shapes()?)
    }

    pub fn slide_master(&self) -> Result<Option<SlideMaster<'a>>> {
        let Some(partname) = self.part.master_partname() else {
            return Ok(None);
        };
        let part = self.package.get_part(&partname)?;
        Ok(Some(SlideMaster::new(SlideMasterPart::from_part(part)?, self.package)))
    }
}

/// A slide master.
pub struct SlideMaster<'a> {
    part: SlideMasterPart<'a>,
    package: &'a OpcPackage,
}

impl<'a> SlideMaster<'a> {
    #[inline]
    pub(crate) fn new(part: SlideMasterPart<'a>, package: &'a OpcPackage) -> Self {
        Self { part, package }
    }

    pub fn name(&self) -> Result<String> {
        self.part.name()
    }

    pub fn placeholders(&self) -> Result<Vec<(PlaceholderFormat, BaseShape)>> {
        placeholders_of(self.part.shapes()?)
    }

    /// Layouts in `<p:sldLayoutIdLst>` order.
    pub fn slide_layouts(&self) -> Result<Vec<SlideLayout<'a>>> {
        let master = self.part.part();
        let mut layouts = Vec::new();
        for r_id in self.part.slide_layout_rids()? {
            let part = self.package.related_part(master, &r_id)?;
            layouts.push(SlideLayout::new(SlideLayoutPart::from_part(part)?, self.package));
        }
        Ok(layouts)
    }
}

fn placeholders_of(shapes: Vec<BaseShape>) -> Result<Vec<(PlaceholderFormat, BaseShape)>> {
    let mut placeholders = Vec::new();
    for shape in shapes {
        if let Some(ph) = shape.placeholder()? {
            placeholders.push((ph, shape));
        }
    }
    Ok(placeholders)
}
