use anyhow::{Context, Result};
use mindcare_core::Classifier;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::state::ensure_mindcare_home;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are MindCare AI, a compassionate mental health assistant. \
Provide supportive, empathetic responses with practical coping strategies. \
Use a warm, professional tone. If the user mentions self-harm or suicide, \
urge them to contact emergency services or a crisis helpline right away.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub oracle: OracleSection,
    pub chat: ChatSection,
    pub server: ServerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OracleSection {
    /// "openai", "anthropic" or "none"
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatSection {
    /// Prior turns the classifier may look at.
    pub history_window: usize,
    /// Simulated latency on the canned path: base + uniform(0, jitter).
    pub delay_base_ms: u64,
    pub delay_jitter_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for OracleSection {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            history_window: mindcare_core::DEFAULT_WINDOW,
            delay_base_ms: 800,
            delay_jitter_ms: 400,
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
        }
    }
}

impl ChatSection {
    /// Built-in keyword rules with this section's history window.
    pub fn classifier(&self) -> Result<Classifier> {
        Ok(Classifier::builtin()?.with_window_size(self.history_window))
    }

    /// Bounds of the simulated delay, `None` when disabled.
    pub fn delay_range(&self) -> Option<(Duration, Duration)> {
        if self.delay_base_ms == 0 && self.delay_jitter_ms == 0 {
            return None;
        }
        Some((
            Duration::from_millis(self.delay_base_ms),
            Duration::from_millis(self.delay_base_ms.saturating_add(self.delay_jitter_ms)),
        ))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_mindcare_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.chat.history_window, 4);
        assert_eq!(cfg.server.port, 5001);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let cfg = parse_config(
            r#"
[oracle]
provider = "anthropic"
model = "claude-3-5-haiku-latest"

[chat]
delay_base_ms = 0
delay_jitter_ms = 0
"#,
        )
        .unwrap();
        assert_eq!(cfg.oracle.provider, "anthropic");
        assert_eq!(cfg.oracle.max_tokens, 500);
        assert_eq!(cfg.chat.history_window, 4);
        assert!(cfg.chat.delay_range().is_none());
    }

    #[test]
    fn test_default_delay_range() {
        let (lo, hi) = ChatSection::default().delay_range().unwrap();
        assert_eq!(lo, Duration::from_millis(800));
        assert_eq!(hi, Duration::from_millis(1200));
    }

    #[test]
    fn test_classifier_uses_history_window() {
        let history = ["I feel so lonely", "a", "b", "c", "d"];
        let default = ChatSection::default().classifier().unwrap();
        assert_eq!(default.classify("ok", &history), mindcare_core::Topic::GeneralSupport);

        let wide = ChatSection {
            history_window: 5,
            ..ChatSection::default()
        };
        assert_eq!(
            wide.classifier().unwrap().classify("ok", &history),
            mindcare_core::Topic::Loneliness
        );
    }

    #[test]
    fn test_huge_delay_values_saturate() {
        let chat = ChatSection {
            delay_base_ms: u64::MAX,
            delay_jitter_ms: 5,
            ..ChatSection::default()
        };
        let (lo, hi) = chat.delay_range().unwrap();
        assert_eq!(lo, Duration::from_millis(u64::MAX));
        assert_eq!(hi, lo);
    }

    #[test]
    fn test_missing_file_is_default() {
        let cfg = load_config_from(Path::new("/nonexistent/mindcare/config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(parse_config("[oracle\nprovider=").is_err());
    }
}
