//! Deterministic outline derivation from raw text.
//!
//! Used whenever no outline provider is configured or the provider fails.
//! The same input always yields the same outline.

use crate::outline::model::{Outline, SlideSpec};
use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on slides derived from one text.
pub const MAX_SLIDES: usize = 30;
/// Upper bound on bullets per derived slide.
pub const MAX_BULLETS: usize = 6;
/// Untitled blocks take at most this many characters of their first line.
pub const MAX_TITLE_CHARS: usize = 80;

static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#+\s*(.+)").unwrap());
static HEADING_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#+\s*.*\n?").unwrap());
static TITLE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n|\.").unwrap());
static BULLET_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n|-|•|—").unwrap());
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s+").unwrap());

/// Split `text` into an outline.
///
/// Blocks are separated by blank lines. A block that opens with a `#`
/// heading is titled by it; any other block is titled by its text up to
/// the first newline or period.
pub fn derive_outline(text: &str, guidance: Option<&str>) -> Outline {
    let slides: Vec<SlideSpec> = BLOCK_SEPARATOR
        .split(text.trim())
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .take(MAX_SLIDES)
        .map(block_to_slide)
        .collect();

    let tone = guidance
        .filter(|g| !g.is_empty())
        .unwrap_or("default")
        .to_string();

    Outline {
        estimated_slide_count: slides.len() as u32,
        slides,
        tone: Some(tone),
    }
}

fn block_to_slide(block: &str) -> SlideSpec {
    let (title, body) = match HEADING.captures(block) {
        Some(caps) => {
            let title = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            let body = HEADING_LINE.replace(block, "");
            (title, body.trim().to_string())
        },
        None => {
            let mut parts = TITLE_BREAK.splitn(block, 2);
            let head: String = parts
                .next()
                .unwrap_or_default()
                .trim()
                .chars()
                .take(MAX_TITLE_CHARS)
                .collect();
            let title = if head.is_empty() {
                "Slide".to_string()
            } else {
                head
            };
            (title, parts.next().unwrap_or_default().trim().to_string())
        },
    };

    SlideSpec::new(title, split_bullets(&body))
}

fn split_bullets(body: &str) -> Vec<String> {
    let mut bullets = non_empty_pieces(&BULLET_SEPARATOR, body);
    if bullets.is_empty() && !body.is_empty() {
        bullets = non_empty_pieces(&SENTENCE_END, body);
    }
    bullets.truncate(MAX_BULLETS);
    bullets
}

fn non_empty_pieces(separator: &Regex, text: &str) -> Vec<String> {
    separator
        .split(text)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
