//! Topic identifiers for the canned-response buckets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named bucket of response templates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Crisis,
    Greeting,
    Anxiety,
    Depression,
    Stress,
    Anger,
    Loneliness,
    Sleep,
    Motivation,
    SelfEsteem,
    Relationships,
    GeneralSupport,
}

impl Topic {
    /// Every topic, crisis first, default last.
    pub const ALL: [Topic; 12] = [
        Topic::Crisis,
        Topic::Greeting,
        Topic::Anxiety,
        Topic::Depression,
        Topic::Stress,
        Topic::Anger,
        Topic::Loneliness,
        Topic::Sleep,
        Topic::Motivation,
        Topic::SelfEsteem,
        Topic::Relationships,
        Topic::GeneralSupport,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Topic::Crisis => "crisis",
            Topic::Greeting => "greeting",
            Topic::Anxiety => "anxiety",
            Topic::Depression => "depression",
            Topic::Stress => "stress",
            Topic::Anger => "anger",
            Topic::Loneliness => "loneliness",
            Topic::Sleep => "sleep",
            Topic::Motivation => "motivation",
            Topic::SelfEsteem => "self_esteem",
            Topic::Relationships => "relationships",
            Topic::GeneralSupport => "general_support",
        }
    }

    /// Response templates for this topic (never empty).
    pub fn templates(&self) -> &'static [&'static str] {
        crate::responses::templates(*self)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Topic {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('-', "_");
        Topic::ALL
            .iter()
            .copied()
            .find(|t| t.id() == needle)
            .ok_or_else(|| anyhow::anyhow!("unknown topic: {s}"))
    }
}
