//! Template intake policy, applied before any rendering work.
use crate::config::LimitsConfig;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateRejected {
    #[error("template is {size} bytes, the limit is {max}")]
    TooLarge { size: u64, max: u64 },

    #[error("unsupported template file {0:?}; expected one of: {1}")]
    UnsupportedExtension(String, String),
}

/// Accept a template by file name and size.
///
/// The extension check is case-insensitive.
pub fn check_template(
    name: &str,
    size: u64,
    limits: &LimitsConfig,
) -> Result<(), TemplateRejected> {
    let extension = Path::new(name).extension().and_then(|ext| ext.to_str());
    let accepted = extension.is_some_and(|ext| {
        limits
            .template_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    });
    if !accepted {
        return Err(TemplateRejected::UnsupportedExtension(
            name.to_string(),
            limits.template_extensions.join(", "),
        ));
    }

    if size > limits.max_template_bytes {
        return Err(TemplateRejected::TooLarge {
            size,
            max: limits.max_template_bytes,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_presentations_and_templates() {
        let limits = LimitsConfig::default();
        assert!(check_template("deck.pptx", 10, &limits).is_ok());
        assert!(check_template("/tmp/Brand.POTX", 10, &limits).is_ok());
    }

    #[test]
    fn test_rejects_other_extensions() {
        let limits = LimitsConfig::default();
        for name in ["deck.ppt", "deck.pptm", "deck", "pptx", "deck.pptx.zip"] {
            assert!(
                matches!(
                    check_template(name, 10, &limits),
                    Err(TemplateRejected::UnsupportedExtension(..))
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_size_limit() {
        let limits = LimitsConfig {
            max_template_bytes: 100,
            ..LimitsConfig::default()
        };
        assert!(check_template("a.pptx", 100, &limits).is_ok());
        assert_eq!(
            check_template("a.pptx", 101, &limits),
            Err(TemplateRejected::TooLarge { size: 101, max: 100 })
        );
    }

    #[test]
    fn test_configured_extensions() {
        let limits = LimitsConfig {
            template_extensions: vec!["pptm".to_string()],
            ..LimitsConfig::default()
        };
        assert!(check_template("macro.pptm", 1, &limits).is_ok());
        assert!(check_template("deck.pptx", 1, &limits).is_err());
    }
}
