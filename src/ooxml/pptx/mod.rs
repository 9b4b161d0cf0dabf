//! PowerPoint (.pptx / .potx) support.
//!
//! Two halves:
//!
//! - Read-only views: [`Package`] opens a presentation or template,
//!   [`Presentation`] exposes its slides, masters and layouts, and the
//!   [`shapes`] module classifies placeholders and reads text and pictures.
//! - [`writer`]: [`MutablePresentation`] reuses a template's masters,
//!   layouts and theme, adds slides cloned from its layouts and serializes
//!   the result.
//!
//! # Example
//!
//! ```rust,no_run
//! use slidegen::ooxml::pptx::{MutablePresentation, Package};
//!
//! let template = std::fs::read("brand.potx")?;
//! let pkg = Package::from_bytes(&template)?;
//! for layout in pkg.presentation()?.slide_layouts()? {
//!     println!("layout: {}", layout.name()?);
//! }
//!
//! let mut deck = MutablePresentation::from_template(&template)?;
//! deck.add_slide(0)?;
//! std::fs::write("out.pptx", deck.to_bytes()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod format;
pub mod package;
pub mod parts;
pub mod presentation;
pub mod shapes;
pub mod slide;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

pub use format::ImageFormat;
pub use package::Package;
pub use presentation::Presentation;
pub use slide::{Slide, SlideLayout, SlideMaster};
pub use writer::{MutablePresentation, MutableShape, MutableSlide, TextBody};
