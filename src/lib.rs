//! Slidegen - render text outlines into PowerPoint decks built on a template
//!
//! A deck is produced in two stages. First some text becomes an
//! [`Outline`](outline::Outline): a list of slides with titles, bullets and
//! optional speaker notes. A language-model provider is asked for it, and a
//! deterministic heuristic takes over whenever the provider is unavailable.
//! Then the outline is rendered onto a `.pptx` or `.potx` template. The
//! template's masters, layouts and theme carry over, and images found on its
//! existing slides are reused on the new ones.
//!
//! # Features
//!
//! - **Template-aware binding**: titles and bullets go into the layout's own
//!   title and body placeholders, with a fallback text box when a layout
//!   lacks them
//! - **Asset reuse**: pictures harvested from the template are cycled into
//!   picture placeholders, sharing media parts with identical bytes
//! - **Speaker notes** written against the template's notes master
//! - **Outline providers**: OpenAI chat completions, or the offline heuristic
//!
//! # Example - Rendering an outline
//!
//! ```no_run
//! use slidegen::deck::render;
//! use slidegen::outline::{Outline, SlideSpec};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let template = std::fs::read("brand.potx")?;
//! let outline = Outline::new(vec![
//!     SlideSpec::new("Quarterly review", vec!["Revenue up".into(), "Costs flat".into()]),
//!     SlideSpec::new("Next steps", vec![]).with_notes("Keep this short"),
//! ]);
//!
//! let deck = render(&template, &outline)?;
//! std::fs::write("review.pptx", deck)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Outlining text without a provider
//!
//! ```
//! use slidegen::outline::derive_outline;
//!
//! let outline = derive_outline("# Intro\nWhy we are here\n\n# Plan\n- one\n- two", None);
//! assert_eq!(outline.slides.len(), 2);
//! assert_eq!(outline.slides[1].bullets, vec!["one", "two"]);
//! ```

pub mod cli;
pub mod config;
pub mod deck;
pub mod intake;
pub mod ooxml;
pub mod outline;

pub use config::Config;
pub use deck::{Assembler, RenderError, RenderedDeck, render};
pub use outline::{Outline, SlideSpec};
