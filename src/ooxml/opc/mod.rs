/// Open Packaging Conventions (OPC) layer used to read templates and write decks.
///
/// A package is a zip container of parts. Each part has a partname, a content
/// type and optionally a set of relationships to other parts. Reading walks the
/// relationship graph from the package root; writing emits only what is still
/// reachable from that root, so parts detached from the graph simply drop out.

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part, XmlPart};
pub use rel::{Relationship, Relationships};
