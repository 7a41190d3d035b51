use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::constants::{PANEL_HEIGHT, PANEL_WIDTH, SAFE_HEIGHT};

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// e.g., "info" | "debug"
    pub log_level: Option<String>,
    pub feed: Option<FeedConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeedConfig {
    pub url: Option<String>,
    /// Name of the environment variable carrying the access key. The key
    /// itself never lives in a file.
    pub api_key_env: Option<String>,
    pub fetch_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Rows of the panel actually driven; the rest stays blank.
    pub safe_height: Option<u32>,
    pub backlight: Option<u8>, // 0-255
    pub page_secs: Option<u64>,
    pub panel: Option<PanelKind>,
    /// Frame dump target for the `ppm` panel.
    pub frame_path: Option<PathBuf>,
    pub touch: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    Null,
    Ppm,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "NetWorS", about = "NetWorS net worth panel", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub feed_url: Option<String>,
    #[arg(long)]
    pub fetch_secs: Option<u64>,
    #[arg(long)]
    pub page_secs: Option<u64>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub frame_path: Option<PathBuf>,
    #[arg(long, action = ArgAction::Set)]
    pub touch: Option<bool>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    load_with(cli)
}

fn load_with(cli: Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, &cli);

    // 4) Validate
    validate(&cfg)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/networs/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/networs/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/networs.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["networs.yaml", "config.yaml", "config/networs.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some() { dst.log_level = src.log_level; }
    match (&mut dst.feed, src.feed) {
        (None, Some(f)) => dst.feed = Some(f),
        (Some(d), Some(s)) => merge_feed(d, s),
        _ => {}
    }
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
}

fn merge_feed(dst: &mut FeedConfig, src: FeedConfig) {
    if src.url.is_some()         { dst.url = src.url; }
    if src.api_key_env.is_some() { dst.api_key_env = src.api_key_env; }
    if src.fetch_secs.is_some()  { dst.fetch_secs = src.fetch_secs; }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.width.is_some()       { dst.width = src.width; }
    if src.height.is_some()      { dst.height = src.height; }
    if src.safe_height.is_some() { dst.safe_height = src.safe_height; }
    if src.backlight.is_some()   { dst.backlight = src.backlight; }
    if src.page_secs.is_some()   { dst.page_secs = src.page_secs; }
    if src.panel.is_some()       { dst.panel = src.panel; }
    if src.frame_path.is_some()  { dst.frame_path = src.frame_path; }
    if src.touch.is_some()       { dst.touch = src.touch; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }

    if (cli.feed_url.is_some() || cli.fetch_secs.is_some()) && cfg.feed.is_none() {
        cfg.feed = Some(FeedConfig::default());
    }
    if let Some(feed) = cfg.feed.as_mut() {
        if cli.feed_url.is_some()   { feed.url = cli.feed_url.clone(); }
        if cli.fetch_secs.is_some() { feed.fetch_secs = cli.fetch_secs; }
    }

    let any_display = cli.page_secs.is_some() || cli.frame_path.is_some() || cli.touch.is_some();
    if any_display && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.page_secs.is_some()  { display.page_secs = cli.page_secs; }
        if cli.frame_path.is_some() { display.frame_path = cli.frame_path.clone(); }
        if cli.touch.is_some()      { display.touch = cli.touch; }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(feed) = cfg.feed.as_ref() {
        if let Some(secs) = feed.fetch_secs {
            if secs == 0 {
                return Err(ConfigError::Validation("feed fetch_secs must be > 0".into()));
            }
        }
    }
    if let Some(display) = cfg.display.as_ref() {
        if let (Some(w), Some(h)) = (display.width, display.height) {
            if w == 0 || h == 0 {
                return Err(ConfigError::Validation("display width/height must be > 0".into()));
            }
        }
        if let Some(safe) = display.safe_height {
            let height = display.height.unwrap_or(PANEL_HEIGHT);
            if safe == 0 || safe > height {
                return Err(ConfigError::Validation(
                    "display safe_height must be in 1..=height".into(),
                ));
            }
        }
        if let Some(secs) = display.page_secs {
            if secs == 0 {
                return Err(ConfigError::Validation("display page_secs must be > 0".into()));
            }
        }
    }
    Ok(())
}

// Effective values with defaults applied, read at the use site.
impl Config {
    pub fn feed_url(&self) -> Option<String> {
        self.feed.as_ref().and_then(|f| f.url.clone())
    }

    pub fn api_key_env(&self) -> String {
        self.feed
            .as_ref()
            .and_then(|f| f.api_key_env.clone())
            .unwrap_or_else(|| "NETWORS_API_KEY".to_string())
    }

    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.feed.as_ref().and_then(|f| f.fetch_secs).unwrap_or(60))
    }

    pub fn page_cycle(&self) -> Duration {
        Duration::from_secs(self.display.as_ref().and_then(|d| d.page_secs).unwrap_or(8))
    }

    pub fn panel_size(&self) -> (u32, u32) {
        let d = self.display.as_ref();
        (
            d.and_then(|d| d.width).unwrap_or(PANEL_WIDTH),
            d.and_then(|d| d.height).unwrap_or(PANEL_HEIGHT),
        )
    }

    pub fn safe_height(&self) -> u32 {
        self.display.as_ref().and_then(|d| d.safe_height).unwrap_or(SAFE_HEIGHT)
    }

    pub fn backlight(&self) -> u8 {
        self.display.as_ref().and_then(|d| d.backlight).unwrap_or(200)
    }

    pub fn panel_kind(&self) -> PanelKind {
        self.display.as_ref().and_then(|d| d.panel).unwrap_or(PanelKind::Null)
    }

    pub fn frame_path(&self) -> PathBuf {
        self.display
            .as_ref()
            .and_then(|d| d.frame_path.clone())
            .unwrap_or_else(|| PathBuf::from("networs-frame.ppm"))
    }

    pub fn touch_enabled(&self) -> bool {
        self.display.as_ref().and_then(|d| d.touch).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_an_empty_config() {
        let cfg = Config::default();
        assert_eq!(cfg.fetch_interval(), Duration::from_secs(60));
        assert_eq!(cfg.page_cycle(), Duration::from_secs(8));
        assert_eq!(cfg.panel_size(), (PANEL_WIDTH, PANEL_HEIGHT));
        assert_eq!(cfg.panel_kind(), PanelKind::Null);
        assert!(!cfg.touch_enabled());
        assert!(cfg.feed_url().is_none());
    }

    #[test]
    fn yaml_merges_under_defaults() {
        let yaml = "feed:\n  url: http://feed.local/portfolio\n  fetch_secs: 120\ndisplay:\n  page_secs: 5\n  panel: ppm\n";
        let parsed: Config = serde_yaml::from_str(yaml).unwrap();
        let mut cfg = Config::default();
        merge(&mut cfg, parsed);
        assert_eq!(cfg.feed_url().as_deref(), Some("http://feed.local/portfolio"));
        assert_eq!(cfg.fetch_interval(), Duration::from_secs(120));
        assert_eq!(cfg.page_cycle(), Duration::from_secs(5));
        assert_eq!(cfg.panel_kind(), PanelKind::Ppm);
    }

    #[test]
    fn validation_rejects_zero_intervals_and_bad_geometry() {
        let bad: Config = serde_yaml::from_str("feed:\n  fetch_secs: 0\n").unwrap();
        assert!(validate(&bad).is_err());

        let bad: Config = serde_yaml::from_str("display:\n  safe_height: 400\n").unwrap();
        assert!(validate(&bad).is_err());

        let ok: Config = serde_yaml::from_str("display:\n  safe_height: 240\n").unwrap();
        assert!(validate(&ok).is_ok());
    }
}
