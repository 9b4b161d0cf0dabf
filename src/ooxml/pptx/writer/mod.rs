//! Building new decks on top of a template package.

pub mod pres;
pub mod shape;
pub mod slide;

pub use pres::MutablePresentation;
pub use shape::{MutableShape, ShapeKind, TextBody, TextParagraph};
pub use slide::{LayoutPlaceholder, LayoutTemplate, MutableSlide};
