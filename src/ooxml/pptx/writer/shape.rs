/// Shapes of a slide under construction.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::shapes::{Geometry, PlaceholderFormat, PlaceholderRole};
use crate::ooxml::xml::{escape_xml, sanitize_text};
use std::fmt::Write as FmtWrite;

/// One paragraph of generated text. `size` is in hundredths of a point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextParagraph {
    pub text: String,
    pub size: Option<u32>,
}

const MIN_FONT_SIZE: f64 = 100.0;
const MAX_FONT_SIZE: f64 = 400_000.0;

/// Points to hundredths of a point. NaN maps to the minimum.
fn font_size(pt: f64) -> u32 {
    (pt * 100.0).round().max(MIN_FONT_SIZE).min(MAX_FONT_SIZE) as u32
}

/// Paragraphs of a text-bearing shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBody {
    paragraphs: Vec<TextParagraph>,
}

impl TextBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every paragraph.
    pub fn clear(&mut self) -> &mut Self {
        self.paragraphs.clear();
        self
    }

    /// Append a paragraph; `size_pt` is a point size such as `18.0`.
    ///
    /// Sizes are clamped to the 1 to 4000 pt range `a:rPr/@sz` allows.
    pub fn add_paragraph(&mut self, text: impl Into<String>, size_pt: Option<f64>) -> &mut Self {
        self.paragraphs.push(TextParagraph {
            text: text.into(),
            size: size_pt.map(font_size),
        });
        self
    }

    #[inline]
    pub fn paragraphs(&self) -> &[TextParagraph] {
        &self.paragraphs
    }

    /// Paragraph texts joined with newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn write_paragraphs(&self, xml: &mut String) -> Result<()> {
        if self.paragraphs.is_empty() {
            xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
            return Ok(());
        }

        for para in &self.paragraphs {
            let sz = para
                .size
                .map(|sz| format!(r#" sz="{}""#, sz))
                .unwrap_or_default();
            let text = sanitize_text(&para.text);
            xml.push_str("<a:p>");
            if text.is_empty() {
                write!(xml, r#"<a:endParaRPr lang="en-US"{} dirty="0"/>"#, sz)
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            } else {
                for (i, line) in text.split('\n').enumerate() {
                    if i > 0 {
                        xml.push_str("<a:br/>");
                    }
                    write!(
                        xml,
                        r#"<a:r><a:rPr lang="en-US"{} dirty="0"/><a:t>{}</a:t></a:r>"#,
                        sz,
                        escape_xml(line)
                    )
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                }
            }
            xml.push_str("</a:p>");
        }
        Ok(())
    }
}

/// A shape on a slide being built.
#[derive(Debug, Clone)]
pub struct MutableShape {
    pub(crate) shape_id: u32,
    pub(crate) name: String,
    pub(crate) kind: ShapeKind,
}

#[derive(Debug, Clone)]
pub enum ShapeKind {
    /// Placeholder cloned from the slide layout. Position and formatting are
    /// inherited, so `geometry` is only informational.
    Placeholder {
        format: PlaceholderFormat,
        geometry: Option<Geometry>,
        text: Option<TextBody>,
    },
    TextBox { geometry: Geometry, text: TextBody },
    /// `image` indexes the owning slide's image list.
    Picture { image: usize, geometry: Geometry },
}

impl MutableShape {
    pub(crate) fn new_placeholder(
        shape_id: u32,
        name: String,
        format: PlaceholderFormat,
        geometry: Option<Geometry>,
    ) -> Self {
        let text = format.ph_type.takes_text().then(TextBody::new);
        Self {
            shape_id,
            name,
            kind: ShapeKind::Placeholder {
                format,
                geometry,
                text,
            },
        }
    }

    pub(crate) fn new_text_box(shape_id: u32, geometry: Geometry, text: TextBody) -> Self {
        Self {
            shape_id,
            name: format!("TextBox {}", shape_id - 1),
            kind: ShapeKind::TextBox { geometry, text },
        }
    }

    pub(crate) fn new_picture(shape_id: u32, image: usize, geometry: Geometry) -> Self {
        Self {
            shape_id,
            name: format!("Picture {}", shape_id - 1),
            kind: ShapeKind::Picture { image, geometry },
        }
    }

    #[inline]
    pub fn shape_id(&self) -> u32 {
        self.shape_id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn placeholder(&self) -> Option<&PlaceholderFormat> {
        match &self.kind {
            ShapeKind::Placeholder { format, .. } => Some(format),
            _ => None,
        }
    }

    /// Role of the slot; ordinary shapes are [`PlaceholderRole::Other`].
    pub fn role(&self) -> PlaceholderRole {
        self.placeholder()
            .map_or(PlaceholderRole::Other, PlaceholderFormat::role)
    }

    /// Own or inherited bounds.
    pub fn geometry(&self) -> Option<Geometry> {
        match &self.kind {
            ShapeKind::Placeholder { geometry, .. } => *geometry,
            ShapeKind::TextBox { geometry, .. } | ShapeKind::Picture { geometry, .. } => {
                Some(*geometry)
            },
        }
    }

    pub fn text_body(&self) -> Option<&TextBody> {
        match &self.kind {
            ShapeKind::Placeholder { text, .. } => text.as_ref(),
            ShapeKind::TextBox { text, .. } => Some(text),
            ShapeKind::Picture { .. } => None,
        }
    }

    pub fn text_body_mut(&mut self) -> Option<&mut TextBody> {
        match &mut self.kind {
            ShapeKind::Placeholder { text, .. } => text.as_mut(),
            ShapeKind::TextBox { text, .. } => Some(text),
            ShapeKind::Picture { .. } => None,
        }
    }

    /// Serialize into `xml`. `image_rids[i]` is the slide relationship of
    /// the slide's i-th image.
    pub(crate) fn to_xml(&self, xml: &mut String, image_rids: &[String]) -> Result<()> {
        match &self.kind {
            ShapeKind::Placeholder { format, text, .. } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="{}"/>"#,
                    self.shape_id,
                    escape_xml(&self.name)
                )
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
                xml.push_str("<p:nvPr>");
                xml.push_str(&format.to_xml());
                xml.push_str("</p:nvPr>");
                xml.push_str("</p:nvSpPr>");
                xml.push_str("<p:spPr/>");

                if let Some(text) = text {
                    xml.push_str("<p:txBody>");
                    xml.push_str("<a:bodyPr/>");
                    xml.push_str("<a:lstStyle/>");
                    text.write_paragraphs(xml)?;
                    xml.push_str("</p:txBody>");
                }

                xml.push_str("</p:sp>");
            },
            ShapeKind::TextBox { geometry, text } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="{}"/>"#,
                    self.shape_id,
                    escape_xml(&self.name)
                )
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str(r#"<p:cNvSpPr txBox="1"/>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, geometry)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("<a:noFill/>");
                xml.push_str("</p:spPr>");

                xml.push_str("<p:txBody>");
                xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0">"#);
                xml.push_str("<a:spAutoFit/>");
                xml.push_str("</a:bodyPr>");
                xml.push_str("<a:lstStyle/>");
                text.write_paragraphs(xml)?;
                xml.push_str("</p:txBody>");

                xml.push_str("</p:sp>");
            },
            ShapeKind::Picture { image, geometry } => {
                let r_id = image_rids.get(*image).ok_or_else(|| {
                    OoxmlError::InvalidFormat(format!(
                        "no relationship for image {} of shape {}",
                        image, self.shape_id
                    ))
                })?;

                xml.push_str("<p:pic>");
                xml.push_str("<p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="{}"/>"#,
                    self.shape_id,
                    escape_xml(&self.name)
                )
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvPicPr>");

                xml.push_str("<p:blipFill>");
                write!(xml, r#"<a:blip r:embed="{}"/>"#, escape_xml(r_id))
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
                xml.push_str("</p:blipFill>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, geometry)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("</p:spPr>");

                xml.push_str("</p:pic>");
            },
        }
        Ok(())
    }
}

fn write_xfrm(xml: &mut String, geometry: &Geometry) -> Result<()> {
    xml.push_str("<a:xfrm>");
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, geometry.left, geometry.top)
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    write!(
        xml,
        r#"<a:ext cx="{}" cy="{}"/>"#,
        geometry.width, geometry.height
    )
    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str("</a:xfrm>");
    Ok(())
}
