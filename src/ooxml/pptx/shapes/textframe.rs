/// Read-only view of a DrawingML text body (`<p:txBody>` / `<a:txBody>`).
use crate::ooxml::error::Result;
use crate::ooxml::xml::{attr, unescape_xml};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Paragraphs of a text body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFrame {
    paragraphs: Vec<Paragraph>,
}

/// One `<a:p>`. Line breaks (`<a:br/>`) appear as `\n` in the text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    text: String,
    font_size: Option<u32>,
}

impl TextFrame {
    /// Parse the paragraphs of the first text body found in `xml`.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut paragraphs = Vec::new();
        let mut in_body = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) if e.local_name().as_ref() == b"txBody" => in_body = true,
                Event::End(e) if e.local_name().as_ref() == b"txBody" => break,
                Event::Start(e) if in_body && e.local_name().as_ref() == b"p" => {
                    paragraphs.push(Paragraph::default());
                },
                Event::Empty(e) if in_body && e.local_name().as_ref() == b"p" => {
                    paragraphs.push(Paragraph::default());
                },
                Event::Start(e) if in_body && e.local_name().as_ref() == b"t" => {
                    let span = reader.read_to_end(e.name())?;
                    let raw = &xml[span.start as usize..span.end as usize];
                    if let Some(para) = paragraphs.last_mut() {
                        para.text.push_str(&unescape_xml(raw));
                    }
                },
                Event::Empty(e) if in_body && e.local_name().as_ref() == b"br" => {
                    if let Some(para) = paragraphs.last_mut() {
                        para.text.push('\n');
                    }
                },
                Event::Start(e) | Event::Empty(e)
                    if in_body
                        && matches!(e.local_name().as_ref(), b"rPr" | b"endParaRPr") =>
                {
                    if let Some(para) = paragraphs.last_mut()
                        && para.font_size.is_none()
                    {
                        para.font_size =
                            attr(&e, b"sz").and_then(|sz| atoi_simd::parse::<u32, false, false>(sz.as_bytes()).ok());
                    }
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(Self { paragraphs })
    }

    #[inline]
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Paragraph texts joined with newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Paragraph {
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Font size of the first run, in hundredths of a point.
    #[inline]
    pub fn font_size(&self) -> Option<u32> {
        self.font_size
    }
}
