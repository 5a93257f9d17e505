//! External language-model oracle.
//!
//! The responder only sees the [`Oracle`] trait; provider request/response
//! shapes stay in this file.

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AuthState;
use crate::config::OracleSection;

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const OPENAI_DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("oracle returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed oracle response: {0}")]
    Malformed(String),

    #[error("oracle returned an empty answer")]
    Empty,

    #[error("invalid oracle credentials: {0}")]
    Credentials(String),
}

/// One bounded exchange: persona system prompt plus a single user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OraclePrompt {
    pub system: String,
    pub message: String,
}

impl OraclePrompt {
    pub fn new(system: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait Oracle: Send + Sync {
    /// Provider label for logs and status output.
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &OraclePrompt) -> Result<String, OracleError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Anthropic,
}

impl Provider {
    fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => OPENAI_BASE_URL,
            Provider::Anthropic => ANTHROPIC_BASE_URL,
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => OPENAI_DEFAULT_MODEL,
            Provider::Anthropic => ANTHROPIC_DEFAULT_MODEL,
        }
    }

    fn other(&self) -> Provider {
        match self {
            Provider::OpenAI => Provider::Anthropic,
            Provider::Anthropic => Provider::OpenAI,
        }
    }
}

#[derive(Clone)]
pub struct HttpOracle {
    provider: Provider,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
    api_key: String,
    client: reqwest::Client,
}

impl HttpOracle {
    pub fn new(provider: Provider, cfg: &OracleSection, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            model: resolve_model(provider, &cfg.model),
            base_url: resolve_base_url(provider, &cfg.base_url),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Empty or another provider's default URL falls back to this provider's own.
fn resolve_base_url(provider: Provider, configured: &str) -> String {
    let trimmed = configured.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed == provider.other().default_base_url() {
        provider.default_base_url().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Same rule for the model name.
fn resolve_model(provider: Provider, configured: &str) -> String {
    let trimmed = configured.trim();
    if trimmed.is_empty() || trimmed == provider.other().default_model() {
        provider.default_model().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the oracle named by config, if its credential is present.
///
/// Provider values:
/// - "openai" / "anthropic": that provider or nothing
/// - "auto": whichever key is configured, OpenAI first
/// - "none" (or anything empty): never delegate
pub fn from_config(cfg: &OracleSection, auth: &AuthState) -> Result<Option<HttpOracle>> {
    let provider = cfg.provider.trim().to_lowercase();
    let picked = match provider.as_str() {
        "" | "none" | "off" => None,
        "openai" => auth.openai_key().map(|k| (Provider::OpenAI, k)),
        "anthropic" => auth.anthropic_key().map(|k| (Provider::Anthropic, k)),
        "auto" => auth
            .openai_key()
            .map(|k| (Provider::OpenAI, k))
            .or_else(|| auth.anthropic_key().map(|k| (Provider::Anthropic, k))),
        other => bail!("unknown oracle provider: {other} (expected openai, anthropic, auto or none)"),
    };
    Ok(picked.map(|(p, key)| HttpOracle::new(p, cfg, key)))
}

#[async_trait]
impl Oracle for HttpOracle {
    fn name(&self) -> &str {
        match self.provider {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    async fn complete(&self, prompt: &OraclePrompt) -> Result<String, OracleError> {
        let text = match self.provider {
            Provider::OpenAI => self.openai_complete(prompt).await?,
            Provider::Anthropic => self.anthropic_complete(prompt).await?,
        };
        let text = text.trim();
        if text.is_empty() {
            return Err(OracleError::Empty);
        }
        Ok(text.to_string())
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

impl HttpOracle {
    async fn openai_complete(&self, prompt: &OraclePrompt) -> Result<String, OracleError> {
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            max_tokens: u32,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MsgOut,
        }

        #[derive(Deserialize)]
        struct MsgOut {
            content: Option<String>,
        }

        let body = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: &prompt.system,
                },
                Msg {
                    role: "user",
                    content: &prompt.message,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let resp = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: txt,
            });
        }

        let out: Resp = resp
            .json()
            .await
            .map_err(|e| OracleError::Malformed(e.to_string()))?;
        let content = out
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| OracleError::Malformed("no choices in response".to_string()))?;
        Ok(content)
    }

    async fn anthropic_complete(&self, prompt: &OraclePrompt) -> Result<String, OracleError> {
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            max_tokens: u32,
            temperature: f32,
            system: &'a str,
            messages: Vec<Msg<'a>>,
        }

        #[derive(Deserialize)]
        struct Resp {
            content: Vec<ContentBlock>,
        }

        #[derive(Deserialize)]
        struct ContentBlock {
            #[serde(rename = "type")]
            t: String,
            text: Option<String>,
        }

        let body = Req {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: &prompt.system,
            messages: vec![Msg {
                role: "user",
                content: &prompt.message,
            }],
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| OracleError::Credentials(e.to_string()))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static("2023-06-01"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: txt,
            });
        }

        let out: Resp = resp
            .json()
            .await
            .map_err(|e| OracleError::Malformed(e.to_string()))?;
        let mut s = String::new();
        for b in out.content {
            if b.t == "text" {
                if let Some(t) = b.text {
                    s.push_str(&t);
                }
            }
        }
        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_mock(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn section(base_url: &str) -> OracleSection {
        OracleSection {
            base_url: base_url.to_string(),
            ..OracleSection::default()
        }
    }

    fn prompt() -> OraclePrompt {
        OraclePrompt::new("be kind", "I had a rough day")
    }

    #[test]
    fn test_from_config_requires_a_key() {
        let cfg = OracleSection::default();
        assert!(from_config(&cfg, &AuthState::default()).unwrap().is_none());

        let auth = AuthState {
            openai_api_key: Some("sk-test".to_string()),
            anthropic_token: None,
        };
        let o = from_config(&cfg, &auth).unwrap().unwrap();
        assert_eq!(o.provider(), Provider::OpenAI);
        assert_eq!(o.base_url(), OPENAI_BASE_URL);
    }

    #[test]
    fn test_model_follows_provider() {
        let auth = AuthState {
            openai_api_key: Some("sk-test".to_string()),
            anthropic_token: Some("sk-ant-x".to_string()),
        };
        let mut cfg = OracleSection::default();

        let o = from_config(&cfg, &auth).unwrap().unwrap();
        assert_eq!(o.model(), OPENAI_DEFAULT_MODEL);

        cfg.provider = "anthropic".to_string();
        let o = from_config(&cfg, &auth).unwrap().unwrap();
        assert_eq!(o.model(), ANTHROPIC_DEFAULT_MODEL);

        cfg.model = "claude-3-5-sonnet-latest".to_string();
        let o = from_config(&cfg, &auth).unwrap().unwrap();
        assert_eq!(o.model(), "claude-3-5-sonnet-latest");

        cfg.provider = "openai".to_string();
        cfg.model = "  ".to_string();
        let o = from_config(&cfg, &auth).unwrap().unwrap();
        assert_eq!(o.model(), OPENAI_DEFAULT_MODEL);
    }

    #[test]
    fn test_from_config_provider_selection() {
        let auth = AuthState {
            openai_api_key: None,
            anthropic_token: Some("sk-ant-x".to_string()),
        };
        let mut cfg = OracleSection::default();

        cfg.provider = "openai".to_string();
        assert!(from_config(&cfg, &auth).unwrap().is_none());

        cfg.provider = "auto".to_string();
        let o = from_config(&cfg, &auth).unwrap().unwrap();
        assert_eq!(o.provider(), Provider::Anthropic);
        // openai defaults are not reused for anthropic
        assert_eq!(o.base_url(), ANTHROPIC_BASE_URL);
        assert_eq!(o.model(), ANTHROPIC_DEFAULT_MODEL);

        cfg.provider = "none".to_string();
        assert!(from_config(&cfg, &auth).unwrap().is_none());

        cfg.provider = "llama".to_string();
        assert!(from_config(&cfg, &auth).is_err());
    }

    #[tokio::test]
    async fn test_openai_success() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|Json(req): Json<Value>| async move {
                assert_eq!(req["messages"][0]["role"], "system");
                assert_eq!(req["messages"][1]["content"], "I had a rough day");
                Json(json!({"choices": [{"message": {"content": "  I'm sorry to hear that.  "}}]}))
            }),
        );
        let base = spawn_mock(app).await;
        let o = HttpOracle::new(Provider::OpenAI, &section(&base), "sk-test");
        assert_eq!(o.complete(&prompt()).await.unwrap(), "I'm sorry to hear that.");
    }

    #[tokio::test]
    async fn test_anthropic_success() {
        let app = Router::new().route(
            "/v1/messages",
            post(|Json(req): Json<Value>| async move {
                assert_eq!(req["system"], "be kind");
                Json(json!({"content": [{"type": "text", "text": "That sounds hard."}]}))
            }),
        );
        let base = spawn_mock(app).await;
        let o = HttpOracle::new(Provider::Anthropic, &section(&base), "sk-ant-test");
        assert_eq!(o.complete(&prompt()).await.unwrap(), "That sounds hard.");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let base = spawn_mock(app).await;
        let o = HttpOracle::new(Provider::OpenAI, &section(&base), "sk-test");
        match o.complete(&prompt()).await {
            Err(OracleError::Status { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_and_empty_answers() {
        let app = Router::new()
            .route(
                "/v1/chat/completions",
                post(|| async { Json(json!({"unexpected": true})) }),
            )
            .route(
                "/v1/messages",
                post(|| async { Json(json!({"content": []})) }),
            );
        let base = spawn_mock(app).await;

        let o = HttpOracle::new(Provider::OpenAI, &section(&base), "sk-test");
        assert!(matches!(o.complete(&prompt()).await, Err(OracleError::Malformed(_))));

        let o = HttpOracle::new(Provider::Anthropic, &section(&base), "sk-ant-test");
        assert!(matches!(o.complete(&prompt()).await, Err(OracleError::Empty)));
    }
}
