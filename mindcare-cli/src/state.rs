use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$MINDCARE_HOME`, or `~/.mindcare`.
pub fn mindcare_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("MINDCARE_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".mindcare"))
}

pub fn ensure_mindcare_home() -> Result<PathBuf> {
    let dir = mindcare_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn chat_log_dir() -> Result<PathBuf> {
    let dir = ensure_mindcare_home()?.join("chat");
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
