//! Delegator: oracle first when configured, canned classifier path otherwise.

use anyhow::Result;
use mindcare_core::{fallback_response, Classifier, ResponseEvent};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthState;
use crate::boundary::{ChatRequest, ChatResponse};
use crate::config::{Config, DEFAULT_SYSTEM_PROMPT};
use crate::oracle::{self, Oracle, OraclePrompt};

pub struct Responder {
    oracle: Option<Arc<dyn Oracle>>,
    classifier: Classifier,
    system_prompt: String,
    delay: Option<(Duration, Duration)>,
}

impl Responder {
    /// Canned path only, no simulated latency.
    pub fn new(classifier: Classifier) -> Self {
        Self {
            oracle: None,
            classifier,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            delay: None,
        }
    }

    /// Wire up from config; the oracle is decided once, here.
    pub fn from_config(cfg: &Config, auth: &AuthState) -> Result<Self> {
        mindcare_core::validate_tables()?;
        let mut r = Self::new(cfg.chat.classifier()?)
            .with_system_prompt(cfg.oracle.system_prompt.clone())
            .with_delay(cfg.chat.delay_range());

        match oracle::from_config(&cfg.oracle, auth)? {
            Some(o) => {
                tracing::info!(provider = o.name(), model = %cfg.oracle.model, "external oracle active");
                r = r.with_oracle(Arc::new(o));
            }
            None => tracing::info!("no oracle credential configured; using canned responses"),
        }
        Ok(r)
    }

    pub fn with_oracle(mut self, oracle: Arc<dyn Oracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_delay(mut self, delay: Option<(Duration, Duration)>) -> Self {
        self.delay = delay;
        self
    }

    pub fn without_delay(self) -> Self {
        self.with_delay(None)
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    pub fn oracle_name(&self) -> Option<&str> {
        self.oracle.as_deref().map(|o| o.name())
    }

    /// Answer one message. Never fails: oracle errors fall through to the canned path.
    pub async fn respond<S: AsRef<str>>(&self, message: &str, history: &[S]) -> ResponseEvent {
        if let Some(o) = &self.oracle {
            let prompt = OraclePrompt::new(self.system_prompt.clone(), message);
            match o.complete(&prompt).await {
                Ok(text) => {
                    let ev = ResponseEvent::from_oracle(message, text);
                    log_event(&ev);
                    return ev;
                }
                Err(e) => {
                    tracing::warn!(provider = o.name(), error = %e, "oracle failed; using canned response");
                }
            }
        }

        if let Some(d) = self.pick_delay() {
            tokio::time::sleep(d).await;
        }

        let ev = self.canned(message, history);
        log_event(&ev);
        ev
    }

    /// Boundary form of [`respond`](Self::respond). `None` when the message is missing or blank.
    pub async fn handle(&self, req: &ChatRequest) -> Option<ChatResponse> {
        let message = req.validated_message()?;
        let ev = self.respond(message, &req.conversation_history).await;
        Some(ChatResponse {
            success: true,
            response: ev.response.clone(),
            using_external_oracle: ev.used_oracle(),
            timestamp: ev.timestamp_iso(),
        })
    }

    fn canned<S: AsRef<str>>(&self, message: &str, history: &[S]) -> ResponseEvent {
        fallback_response(&self.classifier, message, history, &mut rand::thread_rng())
    }

    fn pick_delay(&self) -> Option<Duration> {
        let (lo, hi) = self.delay?;
        if hi <= lo {
            return Some(lo);
        }
        Some(rand::thread_rng().gen_range(lo..=hi))
    }
}

fn log_event(ev: &ResponseEvent) {
    tracing::info!(
        path = ?ev.path,
        topic = ev.topic.map(|t| t.id()).unwrap_or("-"),
        source = ?ev.source,
        template = ?ev.template_index,
        "response served"
    );
}
