//! Building a whole deck from a template and an outline.
use crate::config::RenderConfig;
use crate::deck::assets::{TemplateAssets, extract_assets};
use crate::deck::binder::{SlideOutcome, bind_slide};
use crate::deck::error::{RenderError, Result};
use crate::ooxml::pptx::MutablePresentation;
use crate::outline::Outline;
use tracing::{debug, info, warn};

/// A finished deck and what happened on each of its slides.
#[derive(Debug, Clone)]
pub struct RenderedDeck {
    pub bytes: Vec<u8>,
    pub outcomes: Vec<SlideOutcome>,
}

/// Renders outlines onto templates.
///
/// # Examples
///
/// ```rust,no_run
/// use slidegen::config::RenderConfig;
/// use slidegen::deck::Assembler;
/// use slidegen::outline::{Outline, SlideSpec};
///
/// let template = std::fs::read("template.potx")?;
/// let outline = Outline::new(vec![SlideSpec::new("Hello", vec!["World".into()])]);
///
/// let deck = Assembler::new(RenderConfig::default()).assemble(&template, &outline)?;
/// std::fs::write("deck.pptx", &deck.bytes)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    config: RenderConfig,
}

impl Assembler {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `outline` onto `template`, one slide per outline entry.
    ///
    /// The template's own slides are harvested for pictures and left out of
    /// the result. Its masters, layouts and theme carry over unchanged.
    pub fn assemble(&self, template: &[u8], outline: &Outline) -> Result<RenderedDeck> {
        let assets = extract_assets(template).unwrap_or_else(|e| {
            warn!(error = %e, "assemble: no template assets");
            TemplateAssets::default()
        });

        let mut pres =
            MutablePresentation::from_template(template).map_err(RenderError::MalformedTemplate)?;
        let layout_count = pres.layout_count();
        debug!(
            layouts = layout_count,
            assets = assets.len(),
            slides = outline.len(),
            "assemble: template opened"
        );

        let mut outcomes = Vec::with_capacity(outline.len());
        for (index, spec) in outline.slides.iter().enumerate() {
            let layout = layout_for(index, layout_count);
            debug!(index, layout, title = %spec.title, "assemble: adding slide");
            let slide = pres
                .add_slide(layout)
                .map_err(RenderError::MalformedTemplate)?;
            outcomes.push(bind_slide(slide, spec, index, &assets, &self.config));
        }

        let bytes = pres.to_bytes().map_err(RenderError::Write)?;
        info!(
            slides = outcomes.len(),
            bytes = bytes.len(),
            "assemble: deck written"
        );
        Ok(RenderedDeck { bytes, outcomes })
    }
}

/// Layout for outline entry `index`: the first layout opens the deck,
/// every later slide uses the second layout when there is one.
pub fn layout_for(index: usize, layout_count: usize) -> usize {
    if index == 0 || layout_count < 2 { 0 } else { 1 }
}

/// Render with the default [`RenderConfig`] and return the deck bytes.
pub fn render(template: &[u8], outline: &Outline) -> Result<Vec<u8>> {
    Assembler::default()
        .assemble(template, outline)
        .map(|deck| deck.bytes)
}
