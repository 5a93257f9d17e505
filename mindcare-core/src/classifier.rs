//! Deterministic topic classification.
//!
//! No model involved: an ordered list of keyword rules, first match wins.
//! Evaluation order:
//! 1) crisis (message only, always first, never skipped)
//! 2) greeting (only for a fresh conversation)
//! 3) anxiety, depression, stress, anger, loneliness, sleep, motivation,
//!    self_esteem, relationships
//! 4) general_support
//!
//! Keywords overlap across rules ("overwhelmed", "exhausted", "worthless");
//! the order above is the tie-break.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::topic::Topic;
use crate::window::ConversationWindow;

/// Self-harm / suicide indicators. Errs toward over-matching.
const CRISIS_PATTERN: &str = concat!(
    r"(?i)(suicid|kill myself|killing myself|end it all|end my life|ending it|",
    r"want to die|wanna die|better off dead|not worth living|no reason to live|",
    r"harm myself|hurt myself|self[- ]?harm|cut myself)"
);

const GREETING_PATTERN: &str =
    r"(?i)\b(hello|hi|hiya|hey|greetings|good morning|good afternoon|good evening)\b";

/// Topic rules in evaluation order: (topic, message pattern, history cues).
const TOPIC_RULES: &[(Topic, &str, &[&str])] = &[
    (
        Topic::Anxiety,
        r"(?i)\b(anxious|anxiety|nervous|worr(y|ied|ies|ying)|panic|overwhelmed|scared|fear|overthink)",
        &["anxious", "worry", "panic"],
    ),
    (
        Topic::Depression,
        r"(?i)\b(depress|sad|down\b|hopeless|empty|miserable|blue\b|unhappy|worthless)",
        &["depress", "sad", "hopeless"],
    ),
    (
        Topic::Stress,
        r"(?i)(\bstress|\boverwhelm|\bpressure|\bburnout|\bburned out|too much|can'?t handle|\bexhausted)",
        &["stress", "overwhelm", "pressure"],
    ),
    (
        Topic::Anger,
        r"(?i)\b(angry|mad\b|furious|rage|annoyed|frustrat|pissed|irritated)",
        &["angry", "mad", "frustrat"],
    ),
    (
        Topic::Loneliness,
        r"(?i)\b(lonely|alone|isolated|no friends|no one cares|nobody cares|disconnected)",
        &["lonely", "alone", "isolated"],
    ),
    (
        Topic::Sleep,
        r"(?i)(can'?t sleep|\binsomnia|\btired|\bexhausted|sleep problem|\bawake|wake up)",
        &["sleep", "tired", "insomnia"],
    ),
    (
        Topic::Motivation,
        r"(?i)(\bmotivat|\bprocrastinat|\blazy|\bunproductive|can'?t start|no energy|\bstuck)",
        &["motivat", "procrastinat", "stuck"],
    ),
    (
        Topic::SelfEsteem,
        r"(?i)(\bugly|\bstupid|\bworthless|not good enough|hate myself|low confidence|\binadequate)",
        &["self-esteem", "confidence", "worth"],
    ),
    (
        Topic::Relationships,
        r"(?i)\b(relationship|friend|partner|family|communication|argument|fight|conflict)",
        &["relationship", "friend", "partner"],
    ),
];

/// Where the winning evidence came from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Message,
    History,
    Default,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Classification {
    pub topic: Topic,
    pub source: MatchSource,
}

/// One keyword rule. Matches on the current message or on the recent history.
#[derive(Debug, Clone)]
pub struct Rule {
    pub topic: Topic,
    pattern: Regex,
    history_cues: &'static [&'static str],
}

impl Rule {
    pub fn new(topic: Topic, pattern: &str, history_cues: &'static [&'static str]) -> Result<Self> {
        let pattern = Regex::new(pattern).with_context(|| format!("compile {topic} rule"))?;
        Ok(Self {
            topic,
            pattern,
            history_cues,
        })
    }

    /// History is checked first, matching the way cues carry a topic across turns.
    pub fn evaluate(&self, message: &str, window: &ConversationWindow) -> Option<MatchSource> {
        if self.history_cues.iter().any(|c| window.contains(c)) {
            return Some(MatchSource::History);
        }
        if self.pattern.is_match(message) {
            return Some(MatchSource::Message);
        }
        None
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    crisis: Regex,
    greeting: Regex,
    rules: Vec<Rule>,
    window_size: usize,
}

impl Classifier {
    /// Compile the built-in rule table.
    pub fn builtin() -> Result<Self> {
        let rules = TOPIC_RULES
            .iter()
            .map(|(topic, pattern, cues)| Rule::new(*topic, pattern, *cues))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            crisis: Regex::new(CRISIS_PATTERN).context("compile crisis rule")?,
            greeting: Regex::new(GREETING_PATTERN).context("compile greeting rule")?,
            rules,
            window_size: crate::window::DEFAULT_WINDOW,
        })
    }

    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Topic rules in evaluation order (crisis and greeting excluded).
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_crisis(&self, message: &str) -> bool {
        self.crisis.is_match(message)
    }

    pub fn classify<S: AsRef<str>>(&self, message: &str, history: &[S]) -> Topic {
        self.classify_detailed(message, history).topic
    }

    pub fn classify_detailed<S: AsRef<str>>(&self, message: &str, history: &[S]) -> Classification {
        let message = message.to_lowercase();
        let window = ConversationWindow::new(history, self.window_size);

        if self.crisis.is_match(&message) {
            return Classification {
                topic: Topic::Crisis,
                source: MatchSource::Message,
            };
        }

        if window.is_fresh() && self.greeting.is_match(&message) {
            return Classification {
                topic: Topic::Greeting,
                source: MatchSource::Message,
            };
        }

        for rule in &self.rules {
            if let Some(source) = rule.evaluate(&message, &window) {
                return Classification {
                    topic: rule.topic,
                    source,
                };
            }
        }

        Classification {
            topic: Topic::GeneralSupport,
            source: MatchSource::Default,
        }
    }
}

static BUILTIN: LazyLock<Classifier> =
    LazyLock::new(|| Classifier::builtin().expect("built-in classifier patterns are valid"));

/// Shared classifier built from the constant rule table.
pub fn classifier() -> &'static Classifier {
    &BUILTIN
}

/// Classify with the shared built-in rules.
pub fn classify<S: AsRef<str>>(message: &str, history: &[S]) -> Topic {
    classifier().classify(message, history)
}
