/// Shapes found on slides, layouts and masters.
pub mod base;
pub mod picture;
pub mod placeholder;
pub mod textframe;

pub use base::{BaseShape, EMUS_PER_INCH, Geometry, ShapeType};
pub use picture::Picture;
pub use placeholder::{PlaceholderFormat, PlaceholderRole, PlaceholderType};
pub use textframe::{Paragraph, TextFrame};
