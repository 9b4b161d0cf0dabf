/// Package implementation for PowerPoint presentations and templates.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::pptx::parts::PresentationPart;
use crate::ooxml::pptx::presentation::Presentation;
use std::path::Path;

/// Main part content types accepted as a presentation.
const PRESENTATION_CONTENT_TYPES: [&str; 3] = [
    ct::PML_PRESENTATION_MAIN,
    ct::PML_PRES_MACRO_MAIN,
    ct::PML_TEMPLATE_MAIN,
];

/// A .pptx / .pptm / .potx package.
///
/// # Examples
///
/// ```rust,no_run
/// use slidegen::ooxml::pptx::Package;
///
/// let pkg = Package::open("template.potx")?;
/// let pres = pkg.presentation()?;
/// println!("{} layouts", pres.slide_layouts()?.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Package {
    opc: OpcPackage,
}

impl Package {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| OoxmlError::Opc(crate::ooxml::opc::error::OpcError::IoError(e)))?;
        Self::from_bytes(&data)
    }

    /// Open a package held in memory, verifying the main part is a presentation.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let opc = OpcPackage::from_bytes(data)?;

        let main_part = opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;

        let content_type = main_part.content_type();
        if !PRESENTATION_CONTENT_TYPES.contains(&content_type) {
            return Err(OoxmlError::InvalidContentType {
                expected: PRESENTATION_CONTENT_TYPES.join(" or "),
                got: content_type.to_string(),
            });
        }

        Ok(Self { opc })
    }

    pub fn presentation(&self) -> Result<Presentation<'_>> {
        let main_part = self
            .opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;
        Ok(Presentation::new(PresentationPart::from_part(main_part)?, &self.opc))
    }

    #[inline]
    pub fn opc_package(&self) -> &OpcPackage {
        &self.opc
    }

    #[inline]
    pub fn into_opc_package(self) -> OpcPackage {
        self.opc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::testing::TemplateBuilder;

    #[test]
    fn test_open_template() {
        let bytes = TemplateBuilder::standard().with_existing_slide_picture().build();
        let pkg = Package::from_bytes(&bytes).unwrap();
        let pres = pkg.presentation().unwrap();

        assert_eq!(pres.slide_count().unwrap(), 1);
        assert_eq!(pres.slide_masters().unwrap().len(), 1);
        let layouts = pres.slide_layouts().unwrap();
        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts[0].name().unwrap(), "Title Slide");
        assert!(pres.notes_master_partname().is_some());
    }

    #[test]
    fn test_potx_is_accepted() {
        let bytes = TemplateBuilder::standard().as_potx().build();
        assert!(Package::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn test_wrong_main_part_is_rejected() {
        let bytes = TemplateBuilder::standard()
            .with_main_content_type(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
            )
            .build();
        assert!(matches!(
            Package::from_bytes(&bytes),
            Err(OoxmlError::InvalidContentType { .. })
        ));
    }

    #[test]
    fn test_not_a_package() {
        assert!(Package::from_bytes(b"hello").is_err());
    }
}
