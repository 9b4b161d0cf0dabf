//! Office Open XML support for presentations.
//!
//! The module is organized in layers:
//!
//! 1. **OPC Layer** (`opc`): package handling (ZIP, parts, relationships)
//! 2. **Shared Utilities** (`xml`, `error`): XML helpers and error types
//! 3. **PresentationML** (`pptx`): read-only presentation views and the
//!    template-based deck writer
//!
//! # Example
//!
//! ```rust,no_run
//! use slidegen::ooxml::pptx::Package;
//!
//! let pkg = Package::open("template.pptx")?;
//! let pres = pkg.presentation()?;
//! println!("{} slides", pres.slide_count()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod error;
pub mod opc;
pub mod pptx;
pub mod xml;

pub use opc::{OpcPackage, PackURI};

pub use error::{OoxmlError, Result};
