//! Language-model outline providers.
//!
//! A provider turns raw text into an [`Outline`] or reports that it could
//! not. Every failure collapses to `None` at the trait boundary so callers
//! only ever choose between the provider's answer and the heuristic one.

use crate::config::ProviderConfig;
use crate::outline::heuristic::derive_outline;
use crate::outline::model::Outline;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Why a provider produced no outline. Logged, never surfaced.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("response carried no message content")]
    MissingContent,

    #[error("response content is not an outline: {0}")]
    Json(String),

    #[error("no API credential supplied")]
    MissingCredential,
}

/// An API key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// `None` for a blank key.
    pub fn non_empty(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        (!key.trim().is_empty()).then_some(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Everything a provider needs for one outline.
#[derive(Debug, Clone, Default)]
pub struct OutlineRequest {
    pub text: String,
    pub guidance: Option<String>,
    pub credential: Option<Credential>,
}

impl OutlineRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_guidance(mut self, guidance: Option<String>) -> Self {
        self.guidance = guidance.filter(|g| !g.trim().is_empty());
        self
    }

    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }
}

#[async_trait]
pub trait OutlineProvider: Send + Sync {
    /// Provider id used in logs
    fn id(&self) -> &str;

    /// Produce an outline for `request`, or `None` on any failure
    async fn generate_outline(&self, request: &OutlineRequest) -> Option<Outline>;
}

/// Select a provider by id. Ids starting with `openai` (any case) select
/// the OpenAI chat-completions provider; anything else yields `None`.
pub fn provider_for(id: &str, config: &ProviderConfig) -> Option<Box<dyn OutlineProvider>> {
    if !id.to_ascii_lowercase().starts_with("openai") {
        debug!(id, "provider_for: unknown provider id");
        return None;
    }
    match OpenAiProvider::from_config(config) {
        Ok(provider) => Some(Box::new(provider)),
        Err(e) => {
            warn!(error = %e, "provider_for: failed to build OpenAI provider");
            None
        },
    }
}

/// Ask `provider` for an outline, falling back to the heuristic.
pub async fn resolve_outline(
    provider: Option<&dyn OutlineProvider>,
    request: &OutlineRequest,
) -> Outline {
    if let Some(provider) = provider {
        if let Some(outline) = provider.generate_outline(request).await {
            info!(
                provider = provider.id(),
                slides = outline.len(),
                "resolve_outline: outline from provider"
            );
            return outline;
        }
        warn!(
            provider = provider.id(),
            "resolve_outline: provider returned no outline, using heuristic"
        );
    } else {
        debug!("resolve_outline: no provider, using heuristic");
    }
    derive_outline(&request.text, request.guidance.as_deref())
}

/// Parse model output into an outline.
///
/// The trimmed content is tried as JSON first; failing that, the span from
/// the first `{` to the last `}` is tried, which strips code fences and
/// chatter around the object.
pub fn parse_outline_response(content: &str) -> Option<Outline> {
    let trimmed = content.trim();
    if let Ok(outline) = Outline::from_json(trimmed) {
        return Some(outline);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    Outline::from_json(&trimmed[start..=end]).ok()
}

fn build_prompt(text: &str, guidance: Option<&str>) -> String {
    let guidance = guidance.filter(|g| !g.trim().is_empty()).unwrap_or("none");
    format!(
        "You are a slide outline generator. Convert the input text into a JSON outline for slides.\n\
         Be concise. Aim for a reasonable slide count (6–18) unless guidance requests otherwise.\n\
         \n\
         Input text:\n\
         \n\
         {text}\n\
         \n\
         Guidance: {guidance}\n\
         \n\
         Return EXACTLY parseable JSON with:\n\
         - slides: array of objects {{ \"title\": str, \"bullets\": [str], \"notes\"?: str }}\n\
         - estimated_slide_count: int\n\
         - tone: optional string\n\
         \n\
         No commentary, only JSON."
    )
}

/// OpenAI chat-completions outline provider.
pub struct OpenAiProvider {
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
    http: Client,
}

impl OpenAiProvider {
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        debug!(model = %config.model, base_url = %config.base_url, "OpenAiProvider::from_config");
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            http,
        })
    }

    fn build_request_body(&self, request: &OutlineRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": build_prompt(&request.text, request.guidance.as_deref()),
                },
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }

    async fn request_outline(&self, request: &OutlineRequest) -> Result<Outline, ProviderError> {
        let credential = request
            .credential
            .as_ref()
            .ok_or(ProviderError::MissingCredential)?;

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(credential.expose())
            .json(&self.build_request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response.json().await?;
        let content = extract_content(&body).ok_or(ProviderError::MissingContent)?;
        parse_outline_response(content)
            .ok_or_else(|| ProviderError::Json(content.chars().take(200).collect()))
    }
}

#[async_trait]
impl OutlineProvider for OpenAiProvider {
    fn id(&self) -> &str {
        "openai"
    }

    async fn generate_outline(&self, request: &OutlineRequest) -> Option<Outline> {
        match self.request_outline(request).await {
            Ok(outline) => Some(outline),
            Err(e) => {
                warn!(error = %e, "OpenAiProvider::generate_outline: failed");
                None
            },
        }
    }
}

fn extract_content(body: &serde_json::Value) -> Option<&str> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider returning a canned answer
    pub struct MockProvider {
        answer: Option<Outline>,
        calls: AtomicUsize,
    }

    impl MockProvider {
        pub fn new(answer: Option<Outline>) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OutlineProvider for MockProvider {
        fn id(&self) -> &str {
            "mock"
        }

        async fn generate_outline(&self, _request: &OutlineRequest) -> Option<Outline> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockProvider;
    use super::*;
    use crate::outline::model::SlideSpec;

    #[test]
    fn test_parse_plain_json() {
        let outline = parse_outline_response(
            r#"  {"slides": [{"title": "A", "bullets": ["x"]}], "estimated_slide_count": 1}  "#,
        )
        .unwrap();
        assert_eq!(outline.slides[0].title, "A");
        assert_eq!(outline.estimated_slide_count, 1);
    }

    #[test]
    fn test_parse_fenced_json() {
        let content = "Here you go:\n```json\n{\"slides\": [{\"title\": \"A\"}], \"tone\": \"dry\"}\n```";
        let outline = parse_outline_response(content).unwrap();
        assert_eq!(outline.slides.len(), 1);
        assert_eq!(outline.tone.as_deref(), Some("dry"));
    }

    #[test]
    fn test_parse_rejects_non_outlines() {
        assert!(parse_outline_response("no json here").is_none());
        assert!(parse_outline_response("} backwards {").is_none());
        assert!(parse_outline_response(r#"{"title": "no slides"}"#).is_none());
        assert!(parse_outline_response(r#"{"slides": {"title": "A"}}"#).is_none());
    }

    #[test]
    fn test_prompt_mentions_guidance() {
        let prompt = build_prompt("Body", Some("for kids"));
        assert!(prompt.contains("Input text:\n\nBody\n\nGuidance: for kids\n"));
        assert!(prompt.ends_with("No commentary, only JSON."));
        assert!(build_prompt("Body", None).contains("Guidance: none"));
        assert!(build_prompt("Body", Some(" ")).contains("Guidance: none"));
    }

    #[test]
    fn test_request_body() {
        let provider = OpenAiProvider::from_config(&ProviderConfig::default()).unwrap();
        let body = provider.build_request_body(&OutlineRequest::new("Hello"));
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(
            body["messages"][1]["content"]
                .as_str()
                .unwrap()
                .contains("Hello")
        );
    }

    #[test]
    fn test_extract_content() {
        let body = serde_json::json!({"choices": [{"message": {"content": "{}"}}]});
        assert_eq!(extract_content(&body), Some("{}"));
        assert_eq!(extract_content(&serde_json::json!({"choices": []})), None);
    }

    #[test]
    fn test_provider_selection() {
        let config = ProviderConfig::default();
        assert_eq!(provider_for("openai", &config).unwrap().id(), "openai");
        assert!(provider_for("OpenAI-compatible", &config).is_some());
        assert!(provider_for("anthropic", &config).is_none());
        assert!(provider_for("", &config).is_none());
    }

    #[test]
    fn test_credential_is_redacted() {
        let credential = Credential::new("sk-secret");
        assert!(!format!("{credential:?}").contains("sk-secret"));
        let request = OutlineRequest::new("t").with_credential(Some(credential));
        assert!(!format!("{request:?}").contains("sk-secret"));
        assert!(Credential::non_empty("  ").is_none());
    }

    #[tokio::test]
    async fn test_missing_credential_yields_none() {
        let provider = OpenAiProvider::from_config(&ProviderConfig::default()).unwrap();
        let err = provider
            .request_outline(&OutlineRequest::new("text"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential));
        assert!(
            provider
                .generate_outline(&OutlineRequest::new("text"))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_none() {
        let config = ProviderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: 500,
            ..ProviderConfig::default()
        };
        let provider = OpenAiProvider::from_config(&config).unwrap();
        let request =
            OutlineRequest::new("text").with_credential(Some(Credential::new("sk-test")));
        assert!(provider.generate_outline(&request).await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_prefers_provider() {
        let answer = Outline::new(vec![SlideSpec::new("From model", vec![])]);
        let provider = MockProvider::new(Some(answer.clone()));
        let outline = resolve_outline(Some(&provider), &OutlineRequest::new("# Other")).await;
        assert_eq!(outline, answer);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_heuristic() {
        let request = OutlineRequest::new("# Heading\nbody").with_guidance(Some("calm".into()));
        let expected = derive_outline("# Heading\nbody", Some("calm"));

        let provider = MockProvider::new(None);
        assert_eq!(resolve_outline(Some(&provider), &request).await, expected);
        assert_eq!(provider.calls(), 1);

        assert_eq!(resolve_outline(None, &request).await, expected);
    }
}
