//! Harvesting reusable images from a template's existing slides.
use crate::deck::error::{RenderError, Result};
use crate::ooxml::OpcPackage;
use crate::ooxml::pptx::shapes::{BaseShape, Picture};
use crate::ooxml::pptx::{Package, Slide};
use bytes::Bytes;
use tracing::debug;

/// Images found on the template's slides, in encounter order.
///
/// Identical images are kept once per occurrence; the writer shares their
/// media part when the deck is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateAssets {
    pictures: Vec<Bytes>,
}

impl TemplateAssets {
    pub fn new(pictures: Vec<Bytes>) -> Self {
        Self { pictures }
    }

    #[inline]
    pub fn pictures(&self) -> &[Bytes] {
        &self.pictures
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }

    /// The picture for slide `slide_index`, cycling through the list.
    pub fn cycled(&self, slide_index: usize) -> Option<&Bytes> {
        if self.pictures.is_empty() {
            return None;
        }
        self.pictures.get(slide_index % self.pictures.len())
    }
}

/// Collect the embedded image of every top-level picture on every slide.
///
/// Pictures whose image cannot be resolved are skipped. Only a template that
/// does not open as a presentation is an error.
pub fn extract_assets(template: &[u8]) -> Result<TemplateAssets> {
    let package = Package::from_bytes(template).map_err(RenderError::MalformedTemplate)?;
    let presentation = package
        .presentation()
        .map_err(RenderError::MalformedTemplate)?;
    let slides = presentation
        .slides()
        .map_err(RenderError::MalformedTemplate)?;

    let mut pictures = Vec::new();
    for slide in &slides {
        let shapes = match slide.shapes() {
            Ok(shapes) => shapes,
            Err(e) => {
                debug!(slide = %slide.partname(), error = %e, "extract_assets: unreadable slide");
                continue;
            },
        };
        for shape in &shapes {
            let Some(picture) = Picture::from_shape(shape) else {
                continue;
            };
            match picture_blob(package.opc_package(), slide, &picture) {
                Ok(blob) => pictures.push(blob),
                Err(reason) => debug!(
                    slide = %slide.partname(),
                    shape = %shape_label(shape),
                    %reason,
                    "extract_assets: skipped picture"
                ),
            }
        }
    }

    debug!(count = pictures.len(), "extract_assets: harvested pictures");
    Ok(TemplateAssets { pictures })
}

fn picture_blob(
    package: &OpcPackage,
    slide: &Slide<'_>,
    picture: &Picture<'_>,
) -> std::result::Result<Bytes, String> {
    let r_id = picture
        .image_r_id()
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "no embedded image".to_string())?;
    let part = package
        .related_part(slide.part().part(), &r_id)
        .map_err(|e| e.to_string())?;
    Ok(Bytes::copy_from_slice(part.blob()))
}

fn shape_label(shape: &BaseShape) -> String {
    shape.name().unwrap_or_default()
}
