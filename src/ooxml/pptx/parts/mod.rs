/// Typed views over the XML parts of a presentation package.
pub mod presentation;
pub mod slide;

pub use presentation::PresentationPart;
pub use slide::{NotesSlidePart, SlideLayoutPart, SlideMasterPart, SlidePart};
