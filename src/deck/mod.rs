//! Rendering outlines onto presentation templates.
//!
//! - [`assets`]: harvest reusable pictures from the template's slides
//! - [`binder`]: fill one new slide from one outline entry
//! - [`assembler`]: drive a whole render and serialize the result
//!
//! A render only fails when the template cannot be opened or the result
//! cannot be written. Per-slide problems are reported in
//! [`SlideOutcome`]s.

pub mod assembler;
pub mod assets;
pub mod binder;
pub mod error;

#[cfg(test)]
mod tests;

pub use assembler::{Assembler, RenderedDeck, layout_for, render};
pub use assets::{TemplateAssets, extract_assets};
pub use binder::{SlideOutcome, bind_slide};
pub use error::{RenderError, SkipReason, StepOutcome};
