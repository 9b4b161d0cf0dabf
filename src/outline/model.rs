//! The outline data contract between outline producers and the renderer.
//!
//! Outlines travel as JSON. Only the `slides` array is required; every
//! other field falls back to a default so loosely formed provider output
//! still deserializes.

use serde::{Deserialize, Deserializer, Serialize};

/// A sequence of slide descriptions plus advisory metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Advisory only; the renderer always follows `slides`.
    #[serde(default, deserialize_with = "lenient_count")]
    pub estimated_slide_count: u32,
    pub slides: Vec<SlideSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

impl Outline {
    pub fn new(slides: Vec<SlideSpec>) -> Self {
        Self {
            estimated_slide_count: u32::try_from(slides.len()).unwrap_or(u32::MAX),
            slides,
            tone: None,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Content for one slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Accepted and carried through, but not used for layout selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_hint: Option<String>,
}

impl SlideSpec {
    pub fn new(title: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            title: title.into(),
            bullets,
            ..Self::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Bullets joined into one body, one bullet per line.
    pub fn body_text(&self) -> String {
        self.bullets.join("\n")
    }

    /// Notes that are present and not blank.
    pub fn notes_text(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// Accepts integers, numeric strings and floats; anything else becomes 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let count = match &value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    };
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}
