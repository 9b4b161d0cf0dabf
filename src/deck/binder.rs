//! Filling a new slide with one outline entry.
//!
//! Every step is best effort: a step that cannot do its work reports why in
//! the returned [`SlideOutcome`] and the remaining steps still run.
use crate::config::RenderConfig;
use crate::deck::assets::TemplateAssets;
use crate::deck::error::{SkipReason, StepOutcome};
use crate::ooxml::pptx::shapes::PlaceholderRole;
use crate::ooxml::pptx::writer::{MutableSlide, TextBody};
use crate::outline::SlideSpec;
use tracing::debug;

/// What each binding step did for one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideOutcome {
    pub index: usize,
    pub title: StepOutcome,
    pub body: StepOutcome,
    pub fallback: StepOutcome,
    pub notes: StepOutcome,
    pub picture: StepOutcome,
}

impl SlideOutcome {
    /// Steps as `(name, outcome)` pairs, in binding order.
    pub fn steps(&self) -> [(&'static str, &StepOutcome); 5] {
        [
            ("title", &self.title),
            ("body", &self.body),
            ("fallback", &self.fallback),
            ("notes", &self.notes),
            ("picture", &self.picture),
        ]
    }

    pub fn has_failures(&self) -> bool {
        self.steps().iter().any(|(_, outcome)| outcome.is_failed())
    }
}

/// First shape index per role. Shapes of role `Other` are never bound.
#[derive(Debug, Default, Clone, Copy)]
struct Slots {
    title: Option<usize>,
    body: Option<usize>,
    picture: Option<usize>,
}

impl Slots {
    fn classify(slide: &MutableSlide) -> Self {
        let mut slots = Self::default();
        for (idx, shape) in slide.shapes().iter().enumerate() {
            let slot = match shape.role() {
                PlaceholderRole::Title => &mut slots.title,
                PlaceholderRole::Body => &mut slots.body,
                PlaceholderRole::Picture => &mut slots.picture,
                PlaceholderRole::Other => continue,
            };
            slot.get_or_insert(idx);
        }
        slots
    }
}

/// Write `spec` onto `slide`.
///
/// The title and bullets go into the slide's Title and Body placeholders.
/// Whatever has no placeholder lands in a free-floating text box. Speaker
/// notes are set when present, and a picture placeholder receives harvested
/// image `slide_index % assets.len()`.
pub fn bind_slide(
    slide: &mut MutableSlide,
    spec: &SlideSpec,
    slide_index: usize,
    assets: &TemplateAssets,
    config: &RenderConfig,
) -> SlideOutcome {
    let slots = Slots::classify(slide);
    let mut unplaced = TextBody::new();

    let title = match slots.title {
        Some(idx) => fill_text(slide, idx, |body| {
            body.add_paragraph(spec.title.as_str(), Some(config.title_font_pt));
        }),
        None => {
            unplaced.add_paragraph(spec.title.as_str(), Some(config.body_font_pt));
            StepOutcome::Skipped(SkipReason::NoPlaceholder)
        },
    };

    let body = match slots.body {
        Some(idx) => fill_text(slide, idx, |body| {
            if spec.bullets.is_empty() {
                body.add_paragraph("", Some(config.body_font_pt));
            }
            for bullet in &spec.bullets {
                body.add_paragraph(bullet.as_str(), Some(config.body_font_pt));
            }
        }),
        None => {
            for bullet in &spec.bullets {
                unplaced.add_paragraph(bullet.as_str(), Some(config.body_font_pt));
            }
            StepOutcome::Skipped(SkipReason::NoPlaceholder)
        },
    };

    let fallback = if unplaced.paragraphs().is_empty() {
        StepOutcome::Skipped(SkipReason::NothingToPlace)
    } else {
        slide.add_text_box(config.fallback_box.into(), unplaced);
        StepOutcome::Applied
    };

    let notes = bind_notes(slide, spec);
    let picture = bind_picture(slide, slots.picture, slide_index, assets);

    let outcome = SlideOutcome {
        index: slide_index,
        title,
        body,
        fallback,
        notes,
        picture,
    };
    debug!(index = slide_index, ?outcome, "bind_slide: done");
    outcome
}

fn fill_text(
    slide: &mut MutableSlide,
    idx: usize,
    write: impl FnOnce(&mut TextBody),
) -> StepOutcome {
    match slide.shape_mut(idx).and_then(|shape| shape.text_body_mut()) {
        Some(body) => {
            body.clear();
            write(body);
            StepOutcome::Applied
        },
        None => StepOutcome::Failed(format!("shape {} has no text body", idx)),
    }
}

fn bind_notes(slide: &mut MutableSlide, spec: &SlideSpec) -> StepOutcome {
    let Some(notes) = spec.notes_text() else {
        return StepOutcome::Skipped(SkipReason::NoNotes);
    };
    if !slide.supports_notes() {
        return StepOutcome::Skipped(SkipReason::NotesUnsupported);
    }
    match slide.set_notes(notes) {
        Ok(()) => StepOutcome::Applied,
        Err(e) => StepOutcome::Failed(e.to_string()),
    }
}

fn bind_picture(
    slide: &mut MutableSlide,
    slot: Option<usize>,
    slide_index: usize,
    assets: &TemplateAssets,
) -> StepOutcome {
    let Some(idx) = slot else {
        return StepOutcome::Skipped(SkipReason::NoPlaceholder);
    };
    let Some(image) = assets.cycled(slide_index) else {
        return StepOutcome::Skipped(SkipReason::NoAssets);
    };
    let Some(geometry) = slide.shapes().get(idx).and_then(|shape| shape.geometry()) else {
        return StepOutcome::Skipped(SkipReason::MissingBounds);
    };
    match slide.add_picture(image.clone(), geometry) {
        Ok(()) => StepOutcome::Applied,
        Err(e) => {
            debug!(index = slide_index, error = %e, "bind_picture: image rejected");
            StepOutcome::Skipped(SkipReason::UnrecognizedImage)
        },
    }
}
