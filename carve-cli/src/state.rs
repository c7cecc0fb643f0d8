use anyhow::{Context, Result};
use carve_core::DayRequest;
use std::fs;
use std::path::{Path, PathBuf};

pub fn carve_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".carve"))
}

pub fn ensure_carve_home() -> Result<PathBuf> {
    let dir = carve_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn read_day_request(path: &Path) -> Result<DayRequest> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse day request {}", path.display()))
}
