//! Deck outlines and the ways of producing one from raw text.
//!
//! - [`model`]: the outline data contract shared with the renderer
//! - [`provider`]: language-model backed outline generation
//! - [`heuristic`]: deterministic text splitting, the fallback when no
//!   provider answers

pub mod heuristic;
pub mod model;
pub mod provider;

pub use heuristic::derive_outline;
pub use model::{Outline, SlideSpec};
pub use provider::{
    Credential, OpenAiProvider, OutlineProvider, OutlineRequest, ProviderError,
    parse_outline_response, provider_for, resolve_outline,
};
