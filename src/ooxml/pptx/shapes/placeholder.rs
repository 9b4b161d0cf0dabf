/// Placeholder metadata (`<p:ph>`) and its semantic classification.
use crate::ooxml::xml::attr;
use quick_xml::events::BytesStart;

/// `ST_PlaceholderType`. A `<p:ph>` without a `type` attribute is [`Object`](Self::Object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderType {
    Title,
    CenterTitle,
    SubTitle,
    Body,
    Object,
    Picture,
    Chart,
    Table,
    ClipArt,
    Diagram,
    Media,
    SlideImage,
    Date,
    Footer,
    SlideNumber,
    Header,
}

impl PlaceholderType {
    /// Parse the `type` attribute value. Unknown values are treated as `obj`.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("title") => Self::Title,
            Some("ctrTitle") => Self::CenterTitle,
            Some("subTitle") => Self::SubTitle,
            Some("body") => Self::Body,
            Some("pic") => Self::Picture,
            Some("chart") => Self::Chart,
            Some("tbl") => Self::Table,
            Some("clipArt") => Self::ClipArt,
            Some("dgm") => Self::Diagram,
            Some("media") => Self::Media,
            Some("sldImg") => Self::SlideImage,
            Some("dt") => Self::Date,
            Some("ftr") => Self::Footer,
            Some("sldNum") => Self::SlideNumber,
            Some("hdr") => Self::Header,
            _ => Self::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::CenterTitle => "ctrTitle",
            Self::SubTitle => "subTitle",
            Self::Body => "body",
            Self::Object => "obj",
            Self::Picture => "pic",
            Self::Chart => "chart",
            Self::Table => "tbl",
            Self::ClipArt => "clipArt",
            Self::Diagram => "dgm",
            Self::Media => "media",
            Self::SlideImage => "sldImg",
            Self::Date => "dt",
            Self::Footer => "ftr",
            Self::SlideNumber => "sldNum",
            Self::Header => "hdr",
        }
    }

    pub fn role(&self) -> PlaceholderRole {
        match self {
            Self::Title | Self::CenterTitle => PlaceholderRole::Title,
            Self::Body | Self::Object | Self::SubTitle => PlaceholderRole::Body,
            Self::Picture => PlaceholderRole::Picture,
            _ => PlaceholderRole::Other,
        }
    }

    /// Date, footer and slide number placeholders are not copied from the
    /// layout onto new slides.
    pub fn is_cloneable(&self) -> bool {
        !matches!(self, Self::Date | Self::Footer | Self::SlideNumber)
    }

    /// Whether a cloned placeholder of this type gets a `<p:txBody>`.
    pub fn takes_text(&self) -> bool {
        !matches!(
            self,
            Self::Picture | Self::Chart | Self::Table | Self::ClipArt | Self::Diagram | Self::Media
        )
    }
}

/// What content a slide slot is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderRole {
    Title,
    Body,
    Picture,
    Other,
}

/// Attributes of one `<p:ph>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderFormat {
    pub ph_type: PlaceholderType,
    pub idx: u32,
    pub orient: Option<String>,
    pub sz: Option<String>,
}

impl PlaceholderFormat {
    pub fn from_element(e: &BytesStart<'_>) -> Self {
        Self {
            ph_type: PlaceholderType::from_attr(attr(e, b"type").as_deref()),
            idx: attr(e, b"idx")
                .and_then(|v| atoi_simd::parse::<u32, false, false>(v.as_bytes()).ok())
                .unwrap_or(0),
            orient: attr(e, b"orient"),
            sz: attr(e, b"sz"),
        }
    }

    #[inline]
    pub fn role(&self) -> PlaceholderRole {
        self.ph_type.role()
    }

    /// Serialize as a `<p:ph>` element, omitting defaulted attributes.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<p:ph");
        if self.ph_type != PlaceholderType::Object {
            xml.push_str(&format!(r#" type="{}""#, self.ph_type.as_str()));
        }
        if let Some(orient) = &self.orient {
            xml.push_str(&format!(r#" orient="{}""#, orient));
        }
        if let Some(sz) = &self.sz {
            xml.push_str(&format!(r#" sz="{}""#, sz));
        }
        if self.idx != 0 {
            xml.push_str(&format!(r#" idx="{}""#, self.idx));
        }
        xml.push_str("/>");
        xml
    }
}
