use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::state::ensure_mindcare_home;

/// Value shipped in the sample `.env`; never a real key.
const PLACEHOLDER_KEY: &str = "your-actual-openai-api-key-here";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AuthState {
    pub openai_api_key: Option<String>,
    pub anthropic_token: Option<String>,
}

impl AuthState {
    /// Environment variables win over the stored file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(k) = std::env::var("OPENAI_API_KEY") {
            self.openai_api_key = Some(k);
        }
        if let Ok(k) = std::env::var("ANTHROPIC_API_KEY") {
            self.anthropic_token = Some(k);
        }
        self
    }

    pub fn openai_key(&self) -> Option<&str> {
        usable(self.openai_api_key.as_deref())
    }

    pub fn anthropic_key(&self) -> Option<&str> {
        usable(self.anthropic_token.as_deref())
    }
}

fn usable(key: Option<&str>) -> Option<&str> {
    key.map(str::trim)
        .filter(|k| !k.is_empty() && *k != PLACEHOLDER_KEY)
}

fn auth_path() -> Result<PathBuf> {
    Ok(ensure_mindcare_home()?.join("auth.json"))
}

pub fn load_auth() -> Result<AuthState> {
    let p = auth_path()?;
    if !p.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

/// Stored credentials plus environment overrides.
pub fn resolve_auth() -> Result<AuthState> {
    Ok(load_auth()?.with_env_overrides())
}

pub fn save_auth(auth: &AuthState) -> Result<()> {
    let p = auth_path()?;
    let s = serde_json::to_string_pretty(auth)?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

fn prompt_secret(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn openai_paste_api_key() -> Result<()> {
    let mut auth = load_auth()?;
    let key = prompt_secret("Paste OpenAI API key (starts with sk-)")?;
    if !key.starts_with("sk-") {
        bail!("key didn't look like an OpenAI API key (expected prefix sk-)");
    }
    auth.openai_api_key = Some(key);
    save_auth(&auth)?;
    println!("Saved OpenAI API key to {}", auth_path()?.display());
    Ok(())
}

pub fn anthropic_paste_token() -> Result<()> {
    let mut auth = load_auth()?;
    let token = prompt_secret("Paste Anthropic API key (starts with sk-ant-)")?;
    if !token.starts_with("sk-ant-") {
        bail!("token didn't look like an Anthropic key (expected prefix sk-ant-)");
    }
    auth.anthropic_token = Some(token);
    save_auth(&auth)?;
    println!("Saved Anthropic API key to {}", auth_path()?.display());
    Ok(())
}

pub fn print_status() -> Result<()> {
    let a = resolve_auth()?;
    let show = |k: Option<&str>| if k.is_some() { "configured" } else { "missing" };
    println!("openai:    {}", show(a.openai_key()));
    println!("anthropic: {}", show(a.anthropic_key()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_and_blank_keys_are_unusable() {
        let a = AuthState {
            openai_api_key: Some(PLACEHOLDER_KEY.to_string()),
            anthropic_token: Some("   ".to_string()),
        };
        assert_eq!(a.openai_key(), None);
        assert_eq!(a.anthropic_key(), None);
    }

    #[test]
    fn test_real_key_is_trimmed() {
        let a = AuthState {
            openai_api_key: Some(" sk-test \n".to_string()),
            anthropic_token: None,
        };
        assert_eq!(a.openai_key(), Some("sk-test"));
    }

    #[test]
    fn test_auth_json_shape() {
        let a: AuthState = serde_json::from_str(r#"{"openai_api_key":"sk-1"}"#).unwrap();
        assert_eq!(a.openai_api_key.as_deref(), Some("sk-1"));
        assert_eq!(a.anthropic_token, None);
    }
}
