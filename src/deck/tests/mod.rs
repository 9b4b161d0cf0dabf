//! Whole-deck tests: render against in-memory templates, then read the
//! result back as an ordinary presentation.


use crate::ooxml::pptx::Package;
use crate::ooxml::pptx::shapes::{Picture, PlaceholderRole, ShapeType};
use crate::outline::{Outline, SlideSpec};

/// Observable content of one rendered slide.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct RenderedSlide {
    pub layout: String,
    pub title: Option<String>,
    pub body: Option<Vec<String>>,
    /// Text of every shape, in z-order.
    pub texts: Vec<String>,
    pub pictures: Vec<Vec<u8>>,
    pub notes: Option<String>,
}

pub(super) fn read_deck(bytes: &[u8]) -> Vec<RenderedSlide> {
    let package = Package::from_bytes(bytes).expect("open rendered deck");
    let opc = package.opc_package();
    let presentation = package.presentation().expect("presentation part");

    let mut slides = Vec::new();
    for slide in presentation.slides().expect("slides") {
        let shapes = slide.shapes().expect("shapes");
        let body = slide
            .placeholders()
            .expect("placeholders")
            .into_iter()
            .find(|(ph, _)| ph.role() == PlaceholderRole::Body)
            .map(|(_, shape)| {
                shape
                    .text_frame()
                    .expect("body text")
                    .paragraphs()
                    .iter()
                    .map(|p| p.text().to_string())
                    .collect()
            });
        let texts = shapes
            .iter()
            .filter(|shape| shape.shape_type() == ShapeType::Shape)
            .map(|shape| shape.text().expect("shape text"))
            .collect();
        let pictures = shapes
            .iter()
            .filter_map(Picture::from_shape)
            .map(|picture| {
                let r_id = picture.image_r_id().expect("blip").expect("embedded image");
                opc.related_part(slide.part().part(), &r_id)
                    .expect("image part")
                    .blob()
                    .to_vec()
            })
            .collect();

        slides.push(RenderedSlide {
            layout: slide
                .layout()
                .expect("layout")
                .expect("slide has a layout")
                .name()
                .expect("layout name"),
            title: slide.title().expect("title"),
            body,
            texts,
            pictures,
            notes: slide.notes().expect("notes"),
        });
    }
    slides
}

pub(super) fn slide(title: &str, bullets: &[&str]) -> SlideSpec {
    SlideSpec::new(title, bullets.iter().map(|b| b.to_string()).collect())
}

pub(super) fn outline(slides: Vec<SlideSpec>) -> Outline {
    Outline::new(slides)
}
